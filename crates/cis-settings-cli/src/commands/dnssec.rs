use anyhow::Result;
use cis_zones_settings::{DnssecResult, GetZoneDnssecOptions, UpdateZoneDnssecOptions};
use serde_json::Value;

use crate::output::{
    OutputStyle, create_table, format_header, header_cell, print_json, regular_cell, value_cell,
};
use crate::{ClientArgs, DnssecCommands, OutputFormat};

pub async fn handle(cmd: DnssecCommands, args: &ClientArgs, format: OutputFormat) -> Result<()> {
    let client = args.client()?;
    let options = args.request_options();

    let response = match cmd {
        DnssecCommands::Get => {
            let options = GetZoneDnssecOptions {
                headers: options.headers,
                timeout: options.timeout,
            };
            client.get_zone_dnssec(&options).await?
        }
        DnssecCommands::Set { status } => {
            let options = UpdateZoneDnssecOptions {
                status: Some(status),
                headers: options.headers,
                timeout: options.timeout,
            };
            client.update_zone_dnssec(&options).await?
        }
    };

    if format != OutputFormat::Text {
        print_json(&response.result, format)?;
        return Ok(());
    }

    match response.result {
        Some(resp) => print_dnssec(&resp.result),
        None => println!("dnssec: no content"),
    }
    Ok(())
}

fn print_dnssec(result: &DnssecResult) {
    let style = OutputStyle::new();
    println!("{}", format_header("DNSSEC", &style));

    let mut table = create_table(&style);
    table.set_header(vec![header_cell("Field", &style), header_cell("Value", &style)]);
    table.add_row(vec![
        regular_cell("status"),
        value_cell(&Value::String(result.status.to_string()), &style),
    ]);

    let optional = [
        ("flags", result.flags.map(|v| v.to_string())),
        ("algorithm", result.algorithm.clone()),
        ("key_type", result.key_type.clone()),
        ("digest_type", result.digest_type.clone()),
        ("digest_algorithm", result.digest_algorithm.clone()),
        ("digest", result.digest.clone()),
        ("ds", result.ds.clone()),
        ("key_tag", result.key_tag.map(|v| v.to_string())),
        ("public_key", result.public_key.clone()),
    ];
    for (field, value) in optional {
        if let Some(value) = value {
            table.add_row(vec![regular_cell(field), regular_cell(&value)]);
        }
    }
    println!("{table}");
}
