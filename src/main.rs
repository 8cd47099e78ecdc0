use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use pgeasy::application::facade::PaymentFacade;
use pgeasy::domain::payment::PaymentRequest;
use pgeasy::infrastructure::http::HttpTransport;
use pgeasy::interfaces::config::PaymentConfig;
use pgeasy::logging::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML file with credentials and extra provider modules
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Provider secret key. Overrides the config file.
    #[arg(long, env = "PG_PAYMENT_SECRET_KEY", global = true, hide_env_values = true)]
    secret_key: Option<String>,

    /// Timeout for each provider call, in seconds. Overrides the config file.
    #[arg(long, env = "PG_PAYMENT_TIMEOUT", global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered provider keys
    Providers,
    /// Open a payment session and print the provider response
    Session {
        #[arg(long)]
        provider: String,
        /// JSON object sent as the request body
        #[arg(long)]
        payload: String,
    },
    /// Approve a payment
    Approve {
        #[arg(long)]
        provider: String,
        /// JSON object sent as the request body (defaults to `{}`)
        #[arg(long)]
        payload: Option<String>,
    },
}

fn parse_payload(raw: &str) -> Result<PaymentRequest> {
    let value: serde_json::Value = serde_json::from_str(raw).into_diagnostic()?;
    PaymentRequest::try_from(value).into_diagnostic()
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PaymentConfig::load(path).into_diagnostic()?,
        None => PaymentConfig::default(),
    };
    let registry = config.registry();

    if let Command::Providers = cli.command {
        for key in registry.keys() {
            println!("{key}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let credentials = config
        .credentials(cli.secret_key, cli.timeout)
        .into_diagnostic()?;
    let transport = HttpTransport::new(&credentials).into_diagnostic()?;
    let facade = PaymentFacade::with_registry(credentials, registry, Arc::new(transport));
    let secret_key = facade.credentials().secret_key().to_string();

    match cli.command {
        Command::Providers => Ok(ExitCode::SUCCESS),
        Command::Session { provider, payload } => {
            let payload = parse_payload(&payload)?;
            let response = facade
                .create_payment_session(&payload, &secret_key, &provider)
                .await
                .into_diagnostic()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&response).into_diagnostic()?
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Approve { provider, payload } => {
            let payload = match payload {
                Some(raw) => parse_payload(&raw)?,
                None => PaymentRequest::new(),
            };
            let result = facade
                .approve_payment_with(&payload, &secret_key, &provider)
                .await
                .into_diagnostic()?;

            Ok(result.handle(
                |payment_id| {
                    println!("Payment approved: {payment_id}");
                    ExitCode::SUCCESS
                },
                |error_code, error_message| {
                    eprintln!("Payment approval failed: {error_code} {error_message}");
                    ExitCode::from(2)
                },
            ))
        }
    }
}
