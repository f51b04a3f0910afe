//! espn-cli: query ESPN endpoints from the command line.
//!
//! Usage:
//!   espn-cli scoreboard <sport> <league> [--date YYYYMMDD] [--limit N]
//!   espn-cli teams <sport> <league> [--limit N]
//!   espn-cli team <sport> <league> <team-id>
//!   espn-cli event <sport> <league> <event-id>
//!   espn-cli news <sport> <league> [--limit N]
//!   espn-cli league <sport> <league>
//!   espn-cli athletes <sport> <league> [--team ID] [--limit N] [--page N]
//!   espn-cli leagues

use anyhow::{anyhow, bail, Context};
use espnapi::models::{leagues, League};
use espnapi::{AthletesQuery, EspnClient, EspnConfig, EspnResponse, ScoreboardQuery};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    if let Err(e) = run(&args).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

const USAGE: &str = r#"espn-cli: ESPN public API from the command line

USAGE:
    espn-cli <COMMAND> [ARGS] [OPTIONS]

COMMANDS:
    scoreboard <sport> <league>     Scoreboard [--date YYYYMMDD] [--limit N]
    teams <sport> <league>          Teams of a league [--limit N]
    team <sport> <league> <id>      One team
    event <sport> <league> <id>     Game summary
    news <sport> <league>           Latest news [--limit N]
    league <sport> <league>         League resource (core API)
    athletes <sport> <league>       Athletes [--team ID] [--limit N] [--page N]
    leagues                         Predefined sports and leagues
    version                         Show version information
    help                            Show this help message

OPTIONS:
    --config <file>                 YAML config file (defaults + ESPN_* otherwise)
    --summary                       Print typed one-line summaries instead of JSON

ENVIRONMENT:
    ESPN_SITE_API_BASE_URL, ESPN_CORE_API_BASE_URL, ESPN_TIMEOUT_SECS,
    ESPN_MAX_RETRIES, ESPN_RETRY_BACKOFF_MS, ESPN_MAX_BACKOFF_MS,
    ESPN_USER_AGENT, ESPN_RATE_LIMIT_REQUESTS, ESPN_RATE_LIMIT_PERIOD_SECS,
    RUST_LOG"#;

fn print_usage() {
    println!("{USAGE}");
}

/// Value following `--name`, if present.
fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn flag_u32(args: &[String], name: &str) -> anyhow::Result<Option<u32>> {
    flag(args, name)
        .map(|v| {
            v.parse::<u32>()
                .with_context(|| format!("{name} expects a number, got {v:?}"))
        })
        .transpose()
}

/// Positional arguments, skipping flags and their values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--summary" => {}
            a if a.starts_with("--") => {
                iter.next();
            }
            a => out.push(a),
        }
    }
    out
}

fn sport_league<'a>(pos: &[&'a str], cmd: &str) -> anyhow::Result<(&'a str, &'a str)> {
    match pos {
        [_, sport, league, ..] => Ok((*sport, *league)),
        _ => bail!("usage: espn-cli {cmd} <sport> <league>"),
    }
}

fn third<'a>(pos: &[&'a str], cmd: &str, what: &str) -> anyhow::Result<&'a str> {
    pos.get(3)
        .copied()
        .ok_or_else(|| anyhow!("usage: espn-cli {cmd} <sport> <league> <{what}>"))
}

fn load_config(args: &[String]) -> anyhow::Result<EspnConfig> {
    match flag(args, "--config") {
        Some(path) => EspnConfig::from_yaml_file(path)
            .with_context(|| format!("loading config from {path}")),
        None => EspnConfig::from_env().context("reading ESPN_* environment"),
    }
}

fn print_json(response: &EspnResponse) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&response.data)?);
    Ok(())
}

async fn run(args: &[String]) -> anyhow::Result<()> {
    let pos = positionals(args);
    let cmd = pos.first().copied().unwrap_or("help");
    let summary = args.iter().any(|a| a == "--summary");

    match cmd {
        "help" | "--help" | "-h" => {
            print_usage();
            return Ok(());
        }
        "version" | "--version" | "-V" => {
            println!("espn-cli {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        "leagues" => {
            for league in leagues() {
                println!("{:<12} {:<26} {}", league.sport_slug(), league.slug, league);
            }
            return Ok(());
        }
        "scoreboard" | "teams" | "team" | "event" | "news" | "league" | "athletes" => {}
        other => {
            print_usage();
            bail!("unknown command: {other}");
        }
    }

    let client = EspnClient::new(load_config(args)?)?;
    let (sport, league) = sport_league(&pos, cmd)?;
    let resolved = League::resolve(sport, league);

    match cmd {
        "scoreboard" => {
            let mut query = ScoreboardQuery::new();
            if let Some(date) = flag(args, "--date") {
                query = query.date(date);
            }
            if let Some(limit) = flag_u32(args, "--limit")? {
                query = query.limit(limit);
            }
            let response = client.get_scoreboard(sport, league, &query).await?;
            if summary {
                for event in response.events(&resolved)? {
                    println!(
                        "{:<12} {:<40} {}",
                        event.espn_id,
                        event.to_string(),
                        event.display_status()
                    );
                }
            } else {
                print_json(&response)?;
            }
        }
        "teams" => {
            let limit = flag_u32(args, "--limit")?;
            let response = client.get_teams(sport, league, limit).await?;
            if summary {
                for team in response.teams(&resolved)? {
                    println!("{:<6} {}", team.espn_id, team);
                }
            } else {
                print_json(&response)?;
            }
        }
        "team" => {
            let team_id = third(&pos, cmd, "team-id")?;
            let response = client.get_team(sport, league, team_id).await?;
            if summary {
                let team = response.team(&resolved)?;
                println!("{} [{}]", team, team.primary_logo().unwrap_or("no logo"));
            } else {
                print_json(&response)?;
            }
        }
        "event" => {
            let event_id = third(&pos, cmd, "event-id")?;
            let response = client.get_event(sport, league, event_id).await?;
            if summary {
                let event = response.event_summary(&resolved)?;
                println!("{} - {}", event, event.display_status());
                for competitor in &event.competitors {
                    println!("  {competitor}");
                }
            } else {
                print_json(&response)?;
            }
        }
        "news" => {
            let limit = flag_u32(args, "--limit")?;
            let response = client.get_news(sport, league, limit).await?;
            if summary {
                for headline in response.headlines() {
                    println!("- {headline}");
                }
            } else {
                print_json(&response)?;
            }
        }
        "league" => {
            let response = client.get_league_info(sport, league).await?;
            if summary {
                println!("{}", response.league(&resolved.sport)?);
            } else {
                print_json(&response)?;
            }
        }
        "athletes" => {
            let mut query = AthletesQuery::new();
            if let Some(team) = flag(args, "--team") {
                query = query.team(team);
            }
            if let Some(limit) = flag_u32(args, "--limit")? {
                query = query.limit(limit);
            }
            if let Some(page) = flag_u32(args, "--page")? {
                query = query.page(page);
            }
            let response = client.get_athletes(sport, league, &query).await?;
            if summary {
                println!("{} athletes", response.count().unwrap_or_default());
                for href in response.athlete_refs() {
                    println!("  {href}");
                }
            } else {
                print_json(&response)?;
            }
        }
        other => bail!("unknown command: {other}"),
    }
    Ok(())
}
