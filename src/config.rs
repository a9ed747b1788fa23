use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::time::PositiveDuration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// dwell required when switching trips at a stop that has
    /// no explicit interchange entry
    #[serde(default = "default_min_interchange")]
    pub min_interchange: PositiveDuration,

    /// maximum number of vehicle legs in a journey, which is
    /// also the round cap of the scanners
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u8,

    /// how many consecutive operating days a group-station query
    /// may stack before giving up
    #[serde(default = "default_max_search_days")]
    pub max_search_days: u8,

    /// shift applied between two consecutive operating days
    /// when stitching cross-midnight journeys
    #[serde(default = "default_day_rollover_offset")]
    pub day_rollover_offset: u32,
}

pub const DEFAULT_MIN_INTERCHANGE: &str = "00:02:00";
pub const DEFAULT_MAX_ROUNDS: u8 = 8;
pub const DEFAULT_MAX_SEARCH_DAYS: u8 = 3;
pub const DEFAULT_DAY_ROLLOVER_OFFSET: u32 = 24 * 60 * 60;

pub fn default_min_interchange() -> PositiveDuration {
    PositiveDuration::from_str(DEFAULT_MIN_INTERCHANGE).unwrap()
}

pub fn default_max_rounds() -> u8 {
    DEFAULT_MAX_ROUNDS
}

pub fn default_max_search_days() -> u8 {
    DEFAULT_MAX_SEARCH_DAYS
}

pub fn default_day_rollover_offset() -> u32 {
    DEFAULT_DAY_ROLLOVER_OFFSET
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_interchange: default_min_interchange(),
            max_rounds: default_max_rounds(),
            max_search_days: default_max_search_days(),
            day_rollover_offset: default_day_rollover_offset(),
        }
    }
}
