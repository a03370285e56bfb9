use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use uploader::constants::messages;
use uploader::{ConfigManager, Credentials, ExchangeRunner, RunContext};

/// Upload files to an exchange endpoint and have the server import them
#[derive(Debug, Parser)]
#[command(name = "uploader", version)]
struct Args {
    /// Exchange endpoint, e.g. http://example.com/exchange.php
    endpoint: String,

    /// Exchange type tag selecting the server-side profile
    exchange_type: String,

    login: String,

    password: String,

    /// Files to upload and import, in order
    #[arg(required = true, num_args = 1..)]
    files: Vec<PathBuf>,

    /// Optional TOML file with client settings
    #[arg(long, env = "UPLOADER_CONFIG")]
    config: Option<PathBuf>,

    /// Only print warnings and errors
    #[arg(long, short)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_line(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = ConfigManager::load(args.config.as_deref()).await?.into_config();
    init_logging(args.quiet || config.quiet)?;

    let context = RunContext::new(
        args.endpoint,
        args.exchange_type,
        Credentials::new(args.login, args.password),
        &args.files,
    )?;

    let mut runner = ExchangeRunner::new(context, config);
    let report = runner.run().await?;

    info!(
        "Uploaded {} file(s) in {} chunk(s), imported {} file(s) with {} request(s)",
        report.transfer.files, report.transfer.chunks, report.import.files, report.import.polls
    );
    println!("{}", completion_banner());
    Ok(())
}

fn error_line(e: &anyhow::Error) -> String {
    format!("{}: {:#}", messages::ERROR_PREFIX, e)
}

fn completion_banner() -> String {
    let rule = "-".repeat(messages::BANNER_WIDTH);
    let title = format!(
        "{:-^width$}",
        format!(" {} ", messages::COMPLETION),
        width = messages::BANNER_WIDTH
    );
    format!("{}\n{}\n{}", rule, title, rule)
}

fn init_logging(quiet: bool) -> Result<()> {
    let level = if quiet { "warn" } else { "info" };
    let env_filter = EnvFilter::from_default_env()
        .add_directive(format!("uploader={}", level).parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();
    Ok(())
}
