use anyhow::Result;
use cis_zones_settings::{GetLogRetentionOptions, UpdateLogRetentionOptions};

use crate::output::{OutputStyle, format_success, print_json};
use crate::{ClientArgs, LogRetentionCommands, OutputFormat};

pub async fn handle(
    cmd: LogRetentionCommands,
    args: &ClientArgs,
    format: OutputFormat,
) -> Result<()> {
    let client = args.client()?;
    let options = args.request_options();

    let response = match cmd {
        LogRetentionCommands::Get => {
            let options = GetLogRetentionOptions {
                headers: options.headers,
                timeout: options.timeout,
            };
            client.get_log_retention(&options).await?
        }
        LogRetentionCommands::Set { flag } => {
            let options = UpdateLogRetentionOptions {
                flag: Some(flag),
                headers: options.headers,
                timeout: options.timeout,
            };
            client.update_log_retention(&options).await?
        }
    };

    if format != OutputFormat::Text {
        print_json(&response.result, format)?;
        return Ok(());
    }

    match response.result {
        Some(resp) if resp.result.flag => {
            println!("{}", format_success("Log retention: on", &OutputStyle::new()));
        }
        Some(_) => println!("Log retention: off"),
        None => println!("log retention: no content"),
    }
    Ok(())
}
