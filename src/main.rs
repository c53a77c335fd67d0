// src/main.rs
use clap::Parser;
use dotenv::dotenv;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

use registration_form::common::{apply_cli_override, AppConfig, CliOverrides};
use registration_form::console::FormConsole;
use registration_form::registration::RegistrationForm;
use registration_form::services::HttpSubmissionSink;

#[derive(Parser)]
#[command(name = "registration_form")]
#[command(version)]
#[command(about = "Registration form with confirmation and submission", long_about = None)]
struct Cli {
    /// Endpoint that receives confirmed registrations
    #[arg(long)]
    endpoint: Option<String>,

    /// Inclusive upper bound for age
    #[arg(long)]
    age_max: Option<i64>,

    /// Maximum combined length of last and first name
    #[arg(long)]
    name_max_chars: Option<usize>,
}

impl Cli {
    fn overrides(self) -> CliOverrides {
        CliOverrides {
            endpoint: self.endpoint,
            age_max: self.age_max,
            name_max_chars: self.name_max_chars,
        }
    }
}

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // stdout belongs to the form, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = apply_cli_override(AppConfig::from_env()?, cli.overrides())?;

    info!(
        endpoint = %config.endpoint,
        age_max = config.rules.age_max,
        name_max_chars = ?config.rules.name_max_chars,
        "Registration form starting"
    );

    let sink = HttpSubmissionSink::new(config.endpoint.clone())?;
    let form = RegistrationForm::new(config.rules);

    let stdin = io::stdin();
    let mut console = FormConsole::new(stdin.lock(), io::stdout(), form);
    console.run(&sink).await?;

    info!("Registration form closed");
    Ok(())
}
