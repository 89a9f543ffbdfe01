use std::process::ExitCode;

use clap::Parser;

mod commands;
mod config;
mod error;
mod output;

#[derive(Parser, Debug)]
#[command(name = "issuedesk")]
#[command(about = "Manage issued cards, card groups and their spending rules")]
struct Cli {
    #[command(flatten)]
    global: config::GlobalArgs,

    /// Print raw JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match config::load(&cli.global) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", err.user_message());
            return ExitCode::from(err.exit_code());
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "issuedesk={level},client={level},engine={level}",
            level = settings.log_level
        ))
        .init();

    match run(cli, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("command failed: {err:?}");
            eprintln!("{}", err.user_message());
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli, settings: config::AppConfig) -> error::Result<()> {
    let client = client::ApiClient::new(&settings.base_url)?
        .with_token(settings.token.clone())
        .with_page_size(settings.page_size);
    tracing::debug!("using backend at {}", settings.base_url);

    let ctx = commands::Context {
        client,
        config: settings,
        json: cli.json,
    };
    commands::run(&ctx, cli.command).await
}
