//! tally-sim — replay a governance scenario against an in-memory engine.

use clap::Parser;
use std::path::PathBuf;
use tally_governance::GovernanceConfig;
use tally_sim::{format_period, Scenario, Simulation};
use tally_types::AccountId;
use tally_utils::LogFormat;

#[derive(Parser)]
#[command(name = "tally-sim", about = "Tally governance scenario simulator")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "TALLY_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "TALLY_LOG_FORMAT")]
    log_format: LogFormat,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run a scenario file.
    Run {
        /// Governance configuration (TOML).
        #[arg(long, env = "TALLY_CONFIG")]
        config: PathBuf,

        /// Scenario steps (TOML).
        #[arg(long)]
        scenario: PathBuf,

        /// Override the configured quorum percentage.
        #[arg(long, env = "TALLY_QUORUM_PERCENT")]
        quorum: Option<u8>,

        /// Override the configured debate period, in seconds.
        #[arg(long, env = "TALLY_DEBATING_PERIOD_SECS")]
        debating_period_secs: Option<u64>,
    },
    /// Print a default configuration for the given chairperson.
    DefaultConfig {
        #[arg(long)]
        chairperson: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tally_utils::init_logging(cli.log_format, &cli.log_level);

    match cli.command {
        Command::Run {
            config,
            scenario,
            quorum,
            debating_period_secs,
        } => {
            let mut file_config = GovernanceConfig::from_toml_file(&config)?;
            tracing::info!("Loaded config from {}", config.display());
            if let Some(q) = quorum {
                file_config.minimum_quorum_percent = q;
            }
            if let Some(secs) = debating_period_secs {
                file_config.debating_period_secs = secs;
            }
            let params = file_config.into_params()?;

            let scenario = Scenario::from_toml_file(&scenario)?;
            tracing::info!(
                "Replaying {} steps (quorum {}%, debate {})",
                scenario.steps.len(),
                params.minimum_quorum_percent,
                format_period(params.debating_period_secs),
            );

            let sim = Simulation::new(params, scenario.start_time);
            let report = sim.run(&scenario)?;

            println!(
                "{} steps, {} rejected, {} calls executed, {} deposited",
                report.outcomes.len(),
                report.rejected_steps(),
                report.executed_calls,
                report.total_deposited,
            );
            for p in &report.proposals {
                println!(
                    "proposal {:>3}  {:<8}  for {:>10}  against {:>10}  {}",
                    p.id, p.status, p.for_votes, p.against_votes, p.description
                );
            }
        }
        Command::DefaultConfig { chairperson } => {
            let config = GovernanceConfig::new(AccountId::new(chairperson));
            print!("{}", config.to_toml_string()?);
        }
    }
    Ok(())
}
