// oche entry point.
//
// Startup sequence:
// 1. Parse the command line
// 2. Load config (copying defaults on first run)
// 3. Initialize tracing (log to file, stdout carries the report)
// 4. Load the template, and the season when one is given
// 5. Run the health check and/or the proposal
// 6. Print the report; exit non-zero when the outcome was unsuccessful

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use oche_app::config::{self, Config, LoggingConfig, OutputFormat};
use oche_app::{input, render, runner};
use oche_core::health::{check_template, describe_fixtures};
use oche_core::{CancelToken, ProposalResult};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "oche")]
#[command(about = "Propose a darts league season's fixtures from a template")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Propose fixtures for every division of a season.
    Propose {
        #[arg(long)]
        season: PathBuf,
        #[arg(long)]
        template: PathBuf,
        /// Overrides `output.format` from the config file.
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Check a template and list its fixtures, naming teams when a season
    /// is given.
    Health {
        #[arg(long)]
        template: PathBuf,
        #[arg(long)]
        season: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = config::load_config().context("failed to load configuration")?;
    init_tracing(&config.logging)?;
    info!("oche starting up");

    match cli.command {
        Command::Propose {
            season,
            template,
            format,
        } => propose(&config, &season, &template, format).await,
        Command::Health { template, season } => health(&template, season.as_deref()).await,
    }
}

async fn propose(
    config: &Config,
    season_path: &Path,
    template_path: &Path,
    format: Option<OutputFormat>,
) -> anyhow::Result<ExitCode> {
    let season = input::load_season(season_path).context("failed to load season")?;
    let template = input::load_template(template_path).context("failed to load template")?;

    if config.health_check.before_proposal {
        let health = check_template(&template);
        for warning in health.warnings() {
            warn!("Template health: {warning}");
        }
        if !health.success() {
            for error in health.errors() {
                warn!("Template health: {error}");
            }
            if config.health_check.fail_on_error {
                eprint!("{}", render::render_health(&health, &[]));
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    let result = runner::run_proposal(season, template, CancelToken::new())
        .await
        .context("proposal did not complete")?;

    let output = match format.unwrap_or(config.output.format) {
        OutputFormat::Text => render::render_text(&result, config.output.show_mapping),
        OutputFormat::Json => render::render_json(&result).context("failed to render JSON")?,
        OutputFormat::Csv => render::render_csv(&result).context("failed to render CSV")?,
    };
    print!("{output}");

    Ok(exit_code(&result))
}

async fn health(template_path: &Path, season_path: Option<&Path>) -> anyhow::Result<ExitCode> {
    let template = input::load_template(template_path).context("failed to load template")?;
    let health = check_template(&template);

    let mapping = match season_path {
        Some(path) => {
            let season = input::load_season(path).context("failed to load season")?;
            let result = runner::run_proposal(season, template.clone(), CancelToken::new())
                .await
                .context("proposal did not complete")?;
            if !result.success {
                warn!("Season does not fit the template; showing placeholders");
            }
            result.placeholder_mapping
        }
        None => BTreeMap::new(),
    };

    let fixtures = describe_fixtures(&template, &mapping);
    print!("{}", render::render_health(&health, &fixtures));

    Ok(if health.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn exit_code(result: &ProposalResult) -> ExitCode {
    if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Initialize tracing to log to a file (stdout is reserved for the report).
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join(&logging.directory);
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("oche.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
