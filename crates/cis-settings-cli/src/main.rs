use clap::{Parser, Subcommand};
use tracing::Level;

use cis_settings_cli::{
    ClientArgs, DnssecCommands, LogRetentionCommands, OutputFormat, SetArgs, commands,
};
use cis_zones_settings::SettingKind;

#[derive(Parser)]
#[command(
    name = "cis-settings",
    about = "Read and change CIS zone settings",
    version,
    author,
    long_about = "A command-line tool for the CIS zone settings API: DNSSEC, TLS versions, HTTP/2 and HTTP/3, minification, bot management and the other per-zone switches. Credentials and endpoint come from ZONES_SETTINGS_* environment variables."
)]
struct Cli {
    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(flatten)]
    client: ClientArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the settings this tool knows about
    List,

    /// Show the current value of a setting
    Get {
        /// Setting id, e.g. min_tls_version or always-use-https
        setting: SettingKind,
    },

    /// Show every setting of the zone
    All {
        /// Requests in flight at once
        #[arg(long, default_value_t = 8)]
        concurrency: usize,
    },

    /// Change a setting
    Set(SetArgs),

    /// Show or change DNSSEC
    #[command(subcommand)]
    Dnssec(DnssecCommands),

    /// Show or change log retention
    #[command(subcommand)]
    LogRetention(LogRetentionCommands),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays machine readable
    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::List => commands::settings::handle_list(cli.format)?,
        Commands::Get { setting } => {
            commands::settings::handle_get(setting, &cli.client, cli.format).await?;
        }
        Commands::All { concurrency } => {
            commands::settings::handle_all(&cli.client, concurrency, cli.format).await?;
        }
        Commands::Set(set) => commands::settings::handle_set(set, &cli.client, cli.format).await?,
        Commands::Dnssec(cmd) => commands::dnssec::handle(cmd, &cli.client, cli.format).await?,
        Commands::LogRetention(cmd) => {
            commands::log_retention::handle(cmd, &cli.client, cli.format).await?;
        }
    }

    Ok(())
}
