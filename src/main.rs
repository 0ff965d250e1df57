use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use loginsentry::config::{LoggingConfig, SentryConfig, CONFIG_ENV};
use loginsentry::dashboard::DashboardSnapshot;
use loginsentry::generator::AlertFactory;

#[derive(Parser)]
#[command(
    name = "loginsentry",
    about = "Live dashboard for simulated login security alerts",
    version,
    long_about = None
)]
struct Cli {
    /// Config file (TOML). Defaults to $LOGINSENTRY_CONFIG, then
    /// /etc/loginsentry/loginsentry.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard and run the alert generator
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print the dashboard as it looks at session start
    Snapshot {
        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Apply generator ticks offline and print the resulting dashboard
    Simulate {
        /// Number of ticks to apply
        #[arg(long, default_value = "3")]
        ticks: u32,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_snapshot(snapshot: &DashboardSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    let metrics = &snapshot.metrics;
    println!("\n=== Cyberattack Detection System ===");
    println!(
        "Total logins: {}   Suspicious: {}   At risk: {}",
        loginsentry::alerts::metrics::group_thousands(metrics.total_logins),
        metrics.suspicious_count,
        metrics.accounts_at_risk
    );
    println!();
    println!("{:<16} | {:<18} | {:<28} | Risk", "ID", "IP", "Location");
    println!("{:-<16}-|-{:-<18}-|-{:-<28}-|-{:-<6}", "", "", "", "");
    let selected_id = snapshot.selected.as_ref().map(|a| &a.id);
    for alert in &snapshot.alerts {
        let marker = if selected_id == Some(&alert.id) { " *" } else { "" };
        println!(
            "{:<16} | {:<18} | {:<28} | {}{}",
            alert.id,
            alert.ip,
            alert.location(),
            alert.risk_level,
            marker
        );
    }

    println!();
    match &snapshot.selected {
        Some(alert) => {
            println!("Selected: {} ({})", alert.ip, alert.location());
            println!("  Device:  {} / {} / {}", alert.device, alert.os, alert.browser);
            println!("  RTT:     {} ms", alert.rtt);
            println!("  Time:    {}", alert.timestamp.to_rfc3339());
            println!("  Reason:  {}", alert.reason);
        }
        None => println!("Select an alert to view details"),
    }
    println!();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config lookup logs its fallbacks before the configured subscriber
    // exists, so route them through a stderr subscriber at the default level.
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    let mut config = tracing::subscriber::with_default(bootstrap, || {
        SentryConfig::resolve(cli.config.as_deref())
    })?;

    init_tracing(&config.logging);
    tracing::debug!(
        explicit = ?cli.config,
        env = CONFIG_ENV,
        "configuration resolved"
    );

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            tracing::info!(bind = %config.server.bind, "Starting loginsentry");
            loginsentry::serve(config).await?;
        }
        Commands::Snapshot { json } => {
            let dashboard = loginsentry::build_dashboard(&config);
            print_snapshot(&dashboard.snapshot(), json)?;
        }
        Commands::Simulate { ticks, json } => {
            tracing::info!(ticks, "Simulating generator ticks");
            let mut dashboard = loginsentry::build_dashboard(&config);
            let mut factory = AlertFactory::new();
            for _ in 0..ticks {
                dashboard.append(factory.synthesize(Utc::now()));
            }
            print_snapshot(&dashboard.snapshot(), json)?;
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
