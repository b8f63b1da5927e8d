use anyhow::Result;
use cis_zones_settings::{DetailedResponse, SettingKind, SettingResp};
use futures::stream::{self, StreamExt};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::output::{
    OutputStyle, create_table, error_cell, format_success, header_cell, print_json, regular_cell,
    value_cell,
};
use crate::{ClientArgs, OutputFormat, SetArgs};

/// List the known settings; needs no connection
pub fn handle_list(format: OutputFormat) -> Result<()> {
    if format != OutputFormat::Text {
        let ids: Vec<_> = SettingKind::ALL.iter().map(|kind| kind.id()).collect();
        print_json(&ids, format)?;
        return Ok(());
    }

    let style = OutputStyle::new();
    let mut table = create_table(&style);
    table.set_header(vec![header_cell("Setting", &style), header_cell("Path", &style)]);
    for kind in SettingKind::ALL {
        table.add_row(vec![regular_cell(kind.id()), regular_cell(kind.path())]);
    }
    println!("{table}");
    Ok(())
}

pub async fn handle_get(setting: SettingKind, args: &ClientArgs, format: OutputFormat) -> Result<()> {
    let client = args.client()?;
    let response = client
        .get_setting_json(setting, &args.request_options())
        .await?;
    print_setting(setting, response, format)
}

/// Read every setting, `concurrency` requests at a time
pub async fn handle_all(args: &ClientArgs, concurrency: usize, format: OutputFormat) -> Result<()> {
    let client = args.client()?;
    let options = args.request_options();
    info!(
        "Reading {} settings with concurrency {}",
        SettingKind::ALL.len(),
        concurrency
    );

    let results: Vec<_> = stream::iter(SettingKind::ALL.iter().copied())
        .map(|kind| {
            let client = &client;
            let options = &options;
            async move { (kind, client.get_setting_json(kind, options).await) }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    if format != OutputFormat::Text {
        let mut map = Map::new();
        for (kind, result) in results {
            let entry = match result {
                Ok(response) => response
                    .into_result()
                    .map_or(Value::Null, |resp| resp.result.value),
                Err(e) => json!({ "error": e.to_string() }),
            };
            map.insert(kind.id().to_string(), entry);
        }
        print_json(&map, format)?;
        return Ok(());
    }

    let style = OutputStyle::new();
    let mut table = create_table(&style);
    table.set_header(vec![
        header_cell("Setting", &style),
        header_cell("Value", &style),
        header_cell("Editable", &style),
    ]);
    for (kind, result) in results {
        match result {
            Ok(response) => {
                let (value, editable) = response.into_result().map_or((Value::Null, None), |resp| {
                    (resp.result.value, resp.result.editable)
                });
                table.add_row(vec![
                    regular_cell(kind.id()),
                    value_cell(&value, &style),
                    regular_cell(&editable.map_or_else(|| "-".to_string(), |e| e.to_string())),
                ]);
            }
            Err(e) => {
                warn!("Failed to read {}: {}", kind, e);
                table.add_row(vec![
                    regular_cell(kind.id()),
                    error_cell(&e.to_string(), &style),
                    regular_cell("-"),
                ]);
            }
        }
    }
    println!("{table}");
    Ok(())
}

pub async fn handle_set(set: SetArgs, args: &ClientArgs, format: OutputFormat) -> Result<()> {
    let client = args.client()?;
    let value = setting_value(set.setting, &set.value);
    let response = client
        .update_setting_json(set.setting, value, &args.request_options())
        .await?;

    if format == OutputFormat::Text {
        let style = OutputStyle::new();
        println!(
            "{}",
            format_success(&format!("✓ Updated {}", set.setting), &style)
        );
    }
    print_setting(set.setting, response, format)
}

/// Parse a command-line value as JSON, falling back to a plain string so
/// `set http2 on` works without quoting
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// `1.2` parses as a number but `min_tls_version` wants the string "1.2"
fn setting_value(setting: SettingKind, raw: &str) -> Value {
    let parsed = parse_value(raw);
    if !parsed.is_string() && setting.encode_update(parsed.clone()).is_err() {
        return Value::String(raw.to_string());
    }
    parsed
}

fn print_setting(
    setting: SettingKind,
    response: DetailedResponse<SettingResp<Value>>,
    format: OutputFormat,
) -> Result<()> {
    if format != OutputFormat::Text {
        print_json(&response.result, format)?;
        return Ok(());
    }

    let Some(resp) = response.result else {
        println!("{setting}: no content");
        return Ok(());
    };

    let style = OutputStyle::new();
    let mut table = create_table(&style);
    table.set_header(vec![
        header_cell("Setting", &style),
        header_cell("Value", &style),
        header_cell("Editable", &style),
        header_cell("Modified", &style),
    ]);
    table.add_row(vec![
        regular_cell(&resp.result.id),
        value_cell(&resp.result.value, &style),
        regular_cell(
            &resp
                .result
                .editable
                .map_or_else(|| "-".to_string(), |e| e.to_string()),
        ),
        regular_cell(
            &resp
                .result
                .modified_on
                .map_or_else(|| "-".to_string(), |t| t.to_rfc3339()),
        ),
    ]);
    println!("{table}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("on"), json!("on"));
        assert_eq!(parse_value("\"1.2\""), json!("1.2"));
        assert_eq!(parse_value("1.2"), json!(1.2));
        assert_eq!(parse_value("300"), json!(300));
        assert_eq!(
            parse_value(r#"{"css":"on","html":"off","js":"on"}"#),
            json!({"css": "on", "html": "off", "js": "on"})
        );
    }

    #[test]
    fn test_setting_value_falls_back_to_string() {
        assert_eq!(
            setting_value(SettingKind::MinTlsVersion, "1.2"),
            json!("1.2")
        );
        assert_eq!(setting_value(SettingKind::MaxUpload, "200"), json!(200));
        assert_eq!(setting_value(SettingKind::Http2, "on"), json!("on"));
    }
}
