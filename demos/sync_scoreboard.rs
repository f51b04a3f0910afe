//! Today's NBA scoreboard with the blocking client.
//!
//! Usage:
//!   cargo run --example sync_scoreboard [YYYYMMDD]

use espnapi::{BlockingEspnClient, Error, ScoreboardQuery};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut query = ScoreboardQuery::new();
    if let Some(date) = std::env::args().nth(1) {
        query = query.date(date);
    }

    let client = BlockingEspnClient::from_env()?;
    match client.scoreboard_events("basketball", "nba", &query) {
        Ok(events) if events.is_empty() => println!("No games scheduled."),
        Ok(events) => {
            for event in events {
                let score = match (event.away(), event.home()) {
                    (Some(away), Some(home)) => format!(
                        "{} {} - {} {}",
                        away.team.abbreviation, away.score, home.score, home.team.abbreviation
                    ),
                    _ => String::new(),
                };
                println!("{:<40} {:<24} {}", event.to_string(), event.display_status(), score);
            }
        }
        Err(e @ Error::RateLimited { .. }) => eprintln!("Slow down: {e}"),
        Err(e) if e.is_client_error() => eprintln!("ESPN error: {e}"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
