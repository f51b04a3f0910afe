//! List a few NFL teams with the async client.
//!
//! Usage:
//!   cargo run --example async_teams
//!   RUST_LOG=espnapi=debug cargo run --example async_teams

use espnapi::{EspnClient, League};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = EspnClient::from_env()?;
    let response = client.get_teams("football", "nfl", Some(5)).await?;
    println!("GET {} -> {}", response.url, response.status_code);

    let nfl = League::resolve("football", "nfl");
    for team in response.teams(&nfl)? {
        println!(
            "{:<4} {:<28} {}",
            team.abbreviation,
            team.display_name,
            team.primary_logo().unwrap_or("-")
        );
    }

    client.close();
    Ok(())
}
