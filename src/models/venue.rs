use super::base::{opt_string, required_id, Address};
use crate::utils::convert::{opt_int, safe_bool};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

const DEFAULT_COUNTRY: &str = "USA";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub espn_id: String,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: String,
    pub is_indoor: bool,
    pub capacity: Option<i64>,
    pub address: Option<Address>,
    #[serde(skip)]
    pub raw_data: Option<Value>,
}

impl Venue {
    pub fn from_espn_data(data: &Value) -> Result<Self> {
        let address = match data.get("address") {
            Some(raw) if raw.as_object().is_some_and(|m| !m.is_empty()) => Some(
                Address::deserialize(raw).map_err(|e| {
                    Error::validation_with_context(
                        format!("invalid venue address: {}", e),
                        ErrorContext::new()
                            .with_field_path("address")
                            .with_source("venue_model"),
                    )
                })?,
            ),
            _ => None,
        };

        Ok(Self {
            espn_id: required_id(data, "id", "venue_model")?,
            name: opt_string(data, "fullName")
                .or_else(|| opt_string(data, "shortName"))
                .unwrap_or_default(),
            city: address.as_ref().and_then(|a| a.city.clone()),
            state: address.as_ref().and_then(|a| a.state.clone()),
            country: address
                .as_ref()
                .and_then(|a| a.country.clone())
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            is_indoor: safe_bool(&data["indoor"], true),
            capacity: opt_int(&data["capacity"]),
            address,
            raw_data: Some(data.clone()),
        })
    }

    /// `city, state, country`, skipping blanks.
    pub fn location(&self) -> String {
        join_present(&[
            self.city.as_deref(),
            self.state.as_deref(),
            Some(self.country.as_str()),
        ])
    }

    /// Full postal form when an address came with the payload.
    pub fn full_address(&self) -> String {
        match &self.address {
            Some(address) => address.to_string(),
            None => self.location(),
        }
    }
}

fn join_present(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = join_present(&[self.city.as_deref(), self.state.as_deref()]);
        if location.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} ({})", self.name, location)
        }
    }
}
