//! Scoreboard -> first event -> game summary -> team pages, end to end.
//!
//! Usage:
//!   cargo run --example e2e_flow

use espnapi::{EspnClient, ScoreboardQuery};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = EspnClient::from_env()?;
    let events = client
        .scoreboard_events("basketball", "nba", &ScoreboardQuery::new().limit(1))
        .await?;
    let Some(first) = events.first() else {
        println!("No events found.");
        return Ok(());
    };
    println!("Scoreboard: {} [{}]", first, first.display_status());

    let summary = client.get_event("basketball", "nba", &first.espn_id).await?;
    println!(
        "Boxscore teams: {}",
        summary
            .get("boxscore.teams")
            .and_then(|t| t.as_array())
            .map_or(0, Vec::len)
    );

    let detail = summary.event_summary(&first.league)?;
    if let Some(venue) = &detail.venue {
        println!("Venue: {} ({})", venue, venue.full_address());
    }
    for competitor in &detail.competitors {
        println!("  {competitor}");
    }

    // Both teams' pages, fetched concurrently over the shared client.
    let lookups = detail
        .competitors
        .iter()
        .map(|c| client.team_details("basketball", "nba", &c.team.espn_id));
    for team in futures::future::try_join_all(lookups).await? {
        println!("Team: {} [{}]", team, team.primary_logo().unwrap_or("no logo"));
    }
    Ok(())
}
