//! Argument parsing and command dispatch.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use remote_store_config::{Env, Platform};
use remote_store_data::FileStore;
use remote_store_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::{debug, error};
use uuid::Uuid;

use crate::client::{AppContext, CliResult};
use crate::commands::app_config::{
    handle_check, handle_clean, handle_migrate, handle_show, handle_watch,
};

const DEFAULT_STORE_PATH: &str = "remote-store.json";

/// Parses CLI arguments, executes the requested command, and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);
    let invocation = Uuid::new_v4();

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.map_or_else(LogFormat::infer, LogFormat::from),
        build_sha: option_env!("REMOTE_STORE_BUILD_SHA").unwrap_or("dev"),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err}");
    }
    debug!(command = command_name, %invocation, "dispatching command");

    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            let exit_code = err.exit_code();
            let message = err.display_message();
            error!(command = command_name, %invocation, exit_code, "command failed");
            eprintln!("error: {message}");
            exit_code
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let store = FileStore::new(cli.store);
    let ctx = AppContext::new(Arc::new(store), cli.output);

    match cli.command {
        Command::AppConfig(command) => match command {
            AppConfigCommand::Check(args) => print(handle_check(&ctx, args).await?),
            AppConfigCommand::Migrate(args) => print(handle_migrate(&ctx, args).await?),
            AppConfigCommand::Clean(args) => print(handle_clean(&ctx, args).await?),
            AppConfigCommand::Show(args) => print(handle_show(&ctx, args).await?),
            AppConfigCommand::Watch(args) => {
                handle_watch(&ctx, args, async {
                    if let Err(err) = tokio::signal::ctrl_c().await {
                        error!(error = %err, "failed to listen for interrupt");
                    }
                })
                .await
            }
        },
    }
}

#[allow(clippy::unnecessary_wraps)]
fn print(text: String) -> CliResult<()> {
    println!("{text}");
    Ok(())
}

#[derive(Parser)]
#[command(
    name = "remote-store",
    version,
    about = "Administrative CLI for remote app-config records"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "REMOTE_STORE_PATH",
        default_value = DEFAULT_STORE_PATH,
        help = "Path of the JSON document store"
    )]
    store: PathBuf,
    #[arg(
        long,
        global = true,
        env = "REMOTE_STORE_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    log_level: String,
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormatArg>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage app-config documents.
    #[command(subcommand)]
    AppConfig(AppConfigCommand),
}

#[derive(Subcommand)]
enum AppConfigCommand {
    /// Validate every document of an environment.
    Check(CheckArgs),
    /// Normalise an environment to one valid record per platform.
    Migrate(MigrateArgs),
    /// Delete every document of an environment.
    Clean(CleanArgs),
    /// Print the projection of one record for a client version.
    Show(ObserveArgs),
    /// Print each change of one record until interrupted.
    Watch(ObserveArgs),
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    #[arg(short, long, value_parser = parse_env)]
    pub(crate) env: Env,
}

#[derive(Args, Debug)]
pub(crate) struct MigrateArgs {
    #[arg(short, long, value_parser = parse_env)]
    pub(crate) env: Env,
    /// Delete every existing document before writing defaults.
    #[arg(short, long)]
    pub(crate) force: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CleanArgs {
    #[arg(short, long, value_parser = parse_env)]
    pub(crate) env: Env,
}

#[derive(Args, Debug)]
pub(crate) struct ObserveArgs {
    #[arg(short, long, value_parser = parse_env)]
    pub(crate) env: Env,
    #[arg(short, long, value_parser = parse_platform)]
    pub(crate) platform: Platform,
    /// Client version the record is evaluated for.
    #[arg(long = "client-version")]
    pub(crate) client_version: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::AppConfig(AppConfigCommand::Check(_)) => "app_config_check",
        Command::AppConfig(AppConfigCommand::Migrate(_)) => "app_config_migrate",
        Command::AppConfig(AppConfigCommand::Clean(_)) => "app_config_clean",
        Command::AppConfig(AppConfigCommand::Show(_)) => "app_config_show",
        Command::AppConfig(AppConfigCommand::Watch(_)) => "app_config_watch",
    }
}

fn parse_env(input: &str) -> Result<Env, String> {
    input
        .parse::<Env>()
        .map_err(|_| format!("invalid env '{input}' (expected dev, stg or prod)"))
}

fn parse_platform(input: &str) -> Result<Platform, String> {
    input
        .parse::<Platform>()
        .map_err(|_| format!("invalid platform '{input}' (expected web, ios or android)"))
}
