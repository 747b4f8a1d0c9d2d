use anyhow::{Context, Result};
use clap::Parser;
use salien_autopilot::config::read_env_token;
use salien_autopilot::constants::{
    BACKOFF_SECS, BOSS_INTERVAL_SECS, DEFAULT_BASE_URL, DEFAULT_EXPLORE_THRESHOLD,
    DEFAULT_TIMEOUT_SECS, REPORT_INTERVAL_SECS,
};
use salien_autopilot::{Autopilot, BotConfig, SessionClient};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TOKEN_ENV: &str = "SALIEN_TOKEN";

#[derive(Parser, Debug)]
#[command(name = "salien-autopilot")]
#[command(about = "Automated zone grinder for the Saliens territory-control minigame")]
struct Cli {
    /// Access token; falls back to SALIEN_TOKEN
    /// (get one from https://steamcommunity.com/saliengame/gettoken)
    #[arg(long)]
    token: Option<String>,
    /// API host, overridable for harness runs
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Consecutive sub-hard reports before the round ends and re-selects
    #[arg(long, default_value_t = DEFAULT_EXPLORE_THRESHOLD)]
    explore_threshold: u32,
    /// Disable the random tie-break among equally ranked zones
    #[arg(long, default_value_t = false)]
    deterministic: bool,
    #[arg(long, default_value_t = REPORT_INTERVAL_SECS)]
    report_interval_secs: u64,
    #[arg(long, default_value_t = BOSS_INTERVAL_SECS)]
    boss_interval_secs: u64,
    #[arg(long, default_value_t = BACKOFF_SECS)]
    backoff_secs: u64,
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let token = cli
        .token
        .or_else(|| read_env_token(TOKEN_ENV))
        .with_context(|| format!("missing access token: pass --token or set {TOKEN_ENV}"))?;

    let config = BotConfig {
        token,
        base_url: cli.base_url,
        explore_threshold: cli.explore_threshold,
        randomize: !cli.deterministic,
        report_interval_secs: cli.report_interval_secs,
        boss_interval_secs: cli.boss_interval_secs,
        backoff_secs: cli.backoff_secs,
        timeout_secs: cli.timeout_secs,
    };

    let client = SessionClient::new(&config)?;
    let autopilot = Autopilot::new(client, config);

    tokio::select! {
        _ = autopilot.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("cancelled; leaving any active session before exit");
            if let Err(err) = autopilot.shutdown().await {
                warn!(error = %err, "cleanup pass failed");
            }
            std::process::exit(1);
        }
    }

    Ok(())
}
