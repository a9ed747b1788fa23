// Copyright  (C) 2020, Kisio Digital and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Kisio Digital (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

//! The loader contract : what a feed reader must deliver for the
//! engine to start. The reader itself (csv/zip decoding, type
//! coercion, calendar flattening) lives outside this crate.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use crate::calendar::{CompactDate, Service};
use crate::time::{PositiveDuration, SecondsSinceDayStart};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    BoardAndDebark,
    BoardOnly,
    DebarkOnly,
    NoBoardDebark,
}

impl FlowDirection {
    /// Normalizes gtfs `pickup_type` / `drop_off_type` style flags.
    pub fn from_flags(can_board: bool, can_debark: bool) -> Self {
        match (can_board, can_debark) {
            (true, true) => FlowDirection::BoardAndDebark,
            (true, false) => FlowDirection::BoardOnly,
            (false, true) => FlowDirection::DebarkOnly,
            (false, false) => FlowDirection::NoBoardDebark,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StopTime {
    pub stop_id: String,
    /// arrival at the stop
    pub debark_time: SecondsSinceDayStart,
    /// departure from the stop
    pub board_time: SecondsSinceDayStart,
    pub flow: FlowDirection,
    pub headsign: Option<String>,
}

impl StopTime {
    pub fn new(
        stop_id: impl Into<String>,
        debark_time: SecondsSinceDayStart,
        board_time: SecondsSinceDayStart,
    ) -> Self {
        Self {
            stop_id: stop_id.into(),
            debark_time,
            board_time,
            flow: FlowDirection::BoardAndDebark,
            headsign: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VehicleJourney {
    pub id: String,
    pub route_id: String,
    pub direction_id: u8,
    pub service: Service,
    pub stop_times: Vec<StopTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Recommended,
    Timed,
    MinimumTime,
    NotPossible,
}

#[derive(Debug, Clone)]
pub struct Transfer {
    pub from_stop: String,
    pub to_stop: String,
    pub duration: PositiveDuration,
    /// validity window, carried for downstream consumers,
    /// not enforced by the scanners
    pub start_time: Option<SecondsSinceDayStart>,
    pub end_time: Option<SecondsSinceDayStart>,
    pub kind: TransferKind,
}

impl Transfer {
    pub fn new(
        from_stop: impl Into<String>,
        to_stop: impl Into<String>,
        duration: PositiveDuration,
    ) -> Self {
        Self {
            from_stop: from_stop.into(),
            to_stop: to_stop.into(),
            duration,
            start_time: None,
            end_time: None,
            kind: TransferKind::MinimumTime,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityPeriod {
    pub start_date: CompactDate,
    pub end_date: CompactDate,
}

/// Everything the engine needs, as delivered by a feed reader.
#[derive(Debug, Clone)]
pub struct Model {
    pub vehicle_journeys: Vec<VehicleJourney>,
    pub transfers: Vec<Transfer>,
    pub validity: ValidityPeriod,
}

impl Model {
    /// Checks the invariants the engine relies on.
    /// A model that fails here must not be used : the engine
    /// refuses to start on it.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen_ids = HashSet::new();
        for vehicle_journey in &self.vehicle_journeys {
            if !seen_ids.insert(vehicle_journey.id.as_str()) {
                return Err(ModelError::DuplicateVehicleJourney {
                    id: vehicle_journey.id.clone(),
                });
            }
            if vehicle_journey.stop_times.len() < 2 {
                return Err(ModelError::NotEnoughStopTimes {
                    id: vehicle_journey.id.clone(),
                });
            }
            for (position, stop_time) in vehicle_journey.stop_times.iter().enumerate() {
                if stop_time.board_time < stop_time.debark_time {
                    return Err(ModelError::DecreasingTimes {
                        id: vehicle_journey.id.clone(),
                        position,
                    });
                }
            }
            for (position, window) in vehicle_journey.stop_times.windows(2).enumerate() {
                if window[1].debark_time < window[0].board_time {
                    return Err(ModelError::DecreasingTimes {
                        id: vehicle_journey.id.clone(),
                        position: position + 1,
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    DuplicateVehicleJourney { id: String },
    NotEnoughStopTimes { id: String },
    DecreasingTimes { id: String, position: usize },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::DuplicateVehicleJourney { id } => {
                write!(f, "Vehicle journey `{}` appears twice in the feed", id)
            }
            ModelError::NotEnoughStopTimes { id } => {
                write!(
                    f,
                    "Vehicle journey `{}` has less than two stop times",
                    id
                )
            }
            ModelError::DecreasingTimes { id, position } => {
                write!(
                    f,
                    "Vehicle journey `{}` has decreasing times at stop time {}",
                    id, position
                )
            }
        }
    }
}

impl std::error::Error for ModelError {}
