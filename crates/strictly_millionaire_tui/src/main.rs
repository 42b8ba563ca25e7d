//! Strictly Millionaire binary.

use anyhow::Result;
use clap::Parser;
use strictly_millionaire_tui::{AppConfig, Cli, CliCommand, tui};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        CliCommand::Play {
            config,
            questions,
            seed,
            bank,
        } => {
            let config = AppConfig::load_or_default(&config)?.with_overrides(questions, seed, bank);
            tui::run_tui(config).await?;
        }
        CliCommand::Check { config, bank } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
                )
                .with_writer(std::io::stderr)
                .init();

            let config = AppConfig::load_or_default(&config)?.with_overrides(None, None, bank);
            check(&config)?;
        }
    }

    Ok(())
}

fn check(config: &AppConfig) -> Result<()> {
    let bank = config.load_bank()?;
    let ladder = config.prize_ladder();
    // Building a session applies the same checks a real game does
    config.build_session()?;
    info!(questions = bank.len(), rungs = ladder.len(), "Check passed");

    println!("Question bank: {} questions", bank.len());
    let mut difficulties: Vec<u8> = bank.questions().iter().map(|q| *q.difficulty()).collect();
    difficulties.sort_unstable();
    difficulties.dedup();
    println!("Difficulties:  {:?}", difficulties);
    println!(
        "Prize ladder:  {} rungs, top prize {}",
        ladder.len(),
        tui::format_prize(ladder.top_prize())
    );
    println!(
        "Safe havens:   {}",
        ladder
            .safe_havens()
            .iter()
            .map(|p| tui::format_prize(*p))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "Per game:      {} questions, {}s each",
        config.rules().question_count(),
        config.rules().time_budget_secs()
    );
    if bank.len() < *config.rules().question_count() {
        anyhow::bail!(
            "bank has {} questions but a game needs {}",
            bank.len(),
            config.rules().question_count()
        );
    }
    Ok(())
}
