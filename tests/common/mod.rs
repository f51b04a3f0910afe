//! Shared fixtures for the mock-server tests.
//!
//! Payloads are trimmed copies of real ESPN responses: only the keys the
//! models read, plus a few unknown ones to prove they are tolerated.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const NBA_TEAMS_PATH: &str = "/apis/site/v2/sports/basketball/nba/teams";
pub const NBA_SCOREBOARD_PATH: &str = "/apis/site/v2/sports/basketball/nba/scoreboard";
pub const NBA_SUMMARY_PATH: &str = "/apis/site/v2/sports/basketball/nba/summary";
pub const NBA_NEWS_PATH: &str = "/apis/site/v2/sports/basketball/nba/news";
pub const NBA_LEAGUE_PATH: &str = "/v2/sports/basketball/leagues/nba";
pub const NBA_ATHLETES_PATH: &str = "/v2/sports/basketball/leagues/nba/athletes";

/// A server that accepts connections and never answers.
///
/// Returns its base URL and the number of connections accepted so far.
pub fn silent_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let url = format!("http://{}", listener.local_addr().expect("addr"));
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();
    std::thread::spawn(move || {
        let mut open = Vec::new();
        for stream in listener.incoming().flatten() {
            counter.fetch_add(1, Ordering::SeqCst);
            open.push(stream);
        }
    });
    (url, accepted)
}

pub fn team_path(team_id: &str) -> String {
    format!("{}/{}", NBA_TEAMS_PATH, team_id)
}

fn team(id: &str, abbreviation: &str, display_name: &str, name: &str) -> Value {
    json!({
        "id": id,
        "uid": format!("s:40~l:46~t:{}", id),
        "abbreviation": abbreviation,
        "displayName": display_name,
        "shortDisplayName": name,
        "name": name,
        "isActive": true,
        "logos": [
            {
                "href": format!("https://a.espncdn.com/i/teamlogos/nba/500/{}.png", abbreviation.to_lowercase()),
                "width": 500,
                "height": 500,
                "rel": ["full", "default"]
            }
        ]
    })
}

pub fn teams_payload() -> Value {
    json!({
        "sports": [{
            "id": "40",
            "slug": "basketball",
            "leagues": [{
                "id": "46",
                "slug": "nba",
                "teams": [
                    { "team": team("2", "BOS", "Boston Celtics", "Celtics") },
                    { "team": team("13", "LAL", "Los Angeles Lakers", "Lakers") }
                ]
            }]
        }]
    })
}

pub fn team_payload() -> Value {
    let mut celtics = team("2", "BOS", "Boston Celtics", "Celtics");
    celtics["location"] = json!("Boston");
    celtics["color"] = json!("008348");
    celtics["record"] = json!({ "items": [] });
    json!({ "team": celtics })
}

fn competitor(team: Value, home_away: &str, score: &str, winner: bool) -> Value {
    json!({
        "id": team["id"].clone(),
        "homeAway": home_away,
        "score": score,
        "winner": winner,
        "order": if home_away == "home" { 0 } else { 1 },
        "team": team,
        "records": [
            { "name": "overall", "type": "total", "summary": "64-18" }
        ]
    })
}

pub fn scoreboard_payload() -> Value {
    json!({
        "leagues": [{ "id": "46", "slug": "nba" }],
        "day": { "date": "2024-01-15" },
        "events": [{
            "id": "401585000",
            "uid": "s:40~l:46~e:401585000",
            "date": "2024-01-15T20:00Z",
            "name": "Los Angeles Lakers at Boston Celtics",
            "shortName": "LAL @ BOS",
            "season": { "year": 2024, "type": 2, "slug": "regular-season" },
            "status": {
                "clock": 0.0,
                "displayClock": "0.0",
                "period": 4,
                "type": {
                    "id": "3",
                    "name": "STATUS_FINAL",
                    "state": "post",
                    "completed": true,
                    "detail": "Final"
                }
            },
            "competitions": [{
                "id": "401585000",
                "attendance": 19156,
                "venue": {
                    "id": "1824",
                    "fullName": "TD Garden",
                    "address": { "city": "Boston", "state": "MA" },
                    "indoor": true
                },
                "competitors": [
                    competitor(team("2", "BOS", "Boston Celtics", "Celtics"), "home", "114", true),
                    competitor(team("13", "LAL", "Los Angeles Lakers", "Lakers"), "away", "105", false)
                ],
                "broadcasts": [{ "market": "national", "names": ["ESPN"] }]
            }]
        }]
    })
}

pub fn summary_payload() -> Value {
    json!({
        "header": {
            "id": "401585000",
            "uid": "s:40~l:46~e:401585000",
            "season": { "year": 2024, "type": 2 },
            "competitions": [{
                "id": "401585000",
                "date": "2024-01-15T20:00Z",
                "status": {
                    "displayClock": "0.0",
                    "period": 4,
                    "type": { "state": "post", "completed": true, "detail": "Final" }
                },
                "competitors": [
                    competitor(team("2", "BOS", "Boston Celtics", "Celtics"), "home", "114", true),
                    competitor(team("13", "LAL", "Los Angeles Lakers", "Lakers"), "away", "105", false)
                ]
            }]
        },
        "gameInfo": {
            "venue": {
                "id": "1824",
                "fullName": "TD Garden",
                "address": { "city": "Boston", "state": "MA" }
            },
            "attendance": 19156
        },
        "boxscore": {}
    })
}

pub fn news_payload() -> Value {
    json!({
        "header": "NBA News",
        "articles": [
            { "headline": "Celtics hold off Lakers", "type": "Recap" },
            { "headline": "Trade deadline primer", "type": "Story" }
        ]
    })
}

pub fn league_payload() -> Value {
    json!({
        "$ref": "http://sports.core.api.espn.com/v2/sports/basketball/leagues/nba",
        "id": "46",
        "name": "National Basketball Association",
        "displayName": "NBA",
        "abbreviation": "NBA",
        "slug": "nba",
        "isTournament": false
    })
}

pub fn athletes_payload() -> Value {
    json!({
        "count": 3,
        "pageIndex": 1,
        "pageSize": 2,
        "pageCount": 2,
        "items": [
            { "$ref": "http://sports.core.api.espn.com/v2/sports/basketball/leagues/nba/athletes/4065648" },
            {
                "$ref": "http://sports.core.api.espn.com/v2/sports/basketball/leagues/nba/athletes/3917376",
                "id": "3917376",
                "firstName": "Jaylen",
                "lastName": "Brown",
                "fullName": "Jaylen Brown",
                "displayName": "Jaylen Brown",
                "jersey": "7",
                "position": { "name": "Guard", "abbreviation": "G" },
                "weight": 223
            }
        ]
    })
}
