//! A round-based public transit journey planner : Pareto-optimal
//! journeys between sets of stops over scheduled vehicle journeys and
//! foot transfers, with cross-midnight continuation onto the next
//! operating days and re-anchoring of past journeys on new dates.

pub mod calendar;
pub mod config;
mod engine;
pub mod filters;
pub mod logger;
pub mod model;
pub mod rematch;
pub mod response;
pub mod solver;
pub mod time;
pub mod transit_data;

pub use chrono;
pub use tracing;

pub use config::Config;
pub use engine::scan_result::{Connection, ScanResult};
pub use model::{Model, ModelError};
pub use rematch::{LegDescriptor, MatchedLeg, RematchError};
pub use response::{Journey, Leg};
pub use solver::{BadRequest, Solver};
pub use time::{PositiveDuration, SecondsSinceDayStart};
pub use transit_data::{Stop, TransitData};
