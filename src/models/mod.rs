//! Typed ESPN entities.
//!
//! Entity models are built with `from_espn_data`, which validates that the
//! identifying fields are present and applies ESPN's defaults for the rest.
//! The source object is kept in `raw_data` for fields the models do not name.

pub mod athlete;
pub mod base;
pub mod event;
pub mod sport;
pub mod team;
pub mod venue;

pub use athlete::Athlete;
pub use base::{Address, Link, Logo, Record, Statistic};
pub use event::{Competitor, Event, EventStatus};
pub use sport::{leagues, sports, League, Sport};
pub use team::Team;
pub use venue::Venue;
