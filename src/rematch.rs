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

//! Re-anchoring of a previously computed journey : given the per-leg
//! route, direction and stop sequence of an old journey, select concrete
//! vehicle journeys realising the same sequences around a new date and
//! time. The prior journey is never modified : on failure the caller
//! keeps it as it was.

use std::fmt::{Display, Formatter};

use tracing::debug;

use crate::calendar::{to_naive_date, weekday_of, CompactDate};
use crate::config::Config;
use crate::model::VehicleJourney;
use crate::time::SecondsSinceDayStart;
use crate::transit_data::TransitData;

/// What survives of a journey leg once the concrete vehicle is forgotten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegDescriptor {
    pub route_id: String,
    pub direction_id: u8,
    pub stop_ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MatchedLeg {
    pub vehicle_journey_id: String,
    pub route_id: String,
    pub direction_id: u8,
    pub board_position: usize,
    pub debark_position: usize,
    pub board_time: SecondsSinceDayStart,
    pub debark_time: SecondsSinceDayStart,
    pub stop_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RematchError {
    BadDate(CompactDate),
    /// no vehicle journey realises this leg at the anchor
    NoMatchingTrip { leg_index: usize },
    /// the leg's first stop comes after its last stop in trip order,
    /// which no well-formed descriptor can produce
    InvalidSlice {
        leg_index: usize,
        vehicle_journey: String,
    },
}

impl Display for RematchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RematchError::BadDate(date) => {
                write!(f, "`{}` is not a valid YYYYMMDD date", date)
            }
            RematchError::NoMatchingTrip { leg_index } => {
                write!(f, "No vehicle journey matches leg {}", leg_index)
            }
            RematchError::InvalidSlice {
                leg_index,
                vehicle_journey,
            } => {
                write!(
                    f,
                    "Leg {} is reversed on vehicle journey `{}`",
                    leg_index, vehicle_journey
                )
            }
        }
    }
}

impl std::error::Error for RematchError {}

pub(crate) fn rematch(
    data: &TransitData,
    config: &Config,
    legs: &[LegDescriptor],
    date: CompactDate,
    time: SecondsSinceDayStart,
    depart: bool,
) -> Result<Vec<MatchedLeg>, RematchError> {
    let naive_date = to_naive_date(date).ok_or(RematchError::BadDate(date))?;
    let weekday = weekday_of(naive_date);
    let interchange = config.min_interchange;

    let mut anchor = time;
    let mut matched: Vec<MatchedLeg> = Vec::with_capacity(legs.len());

    // legs are walked from the journey start when departing, from the
    // journey end when arriving
    let order: Vec<usize> = if depart {
        (0..legs.len()).collect()
    } else {
        (0..legs.len()).rev().collect()
    };

    for leg_index in order {
        let leg = &legs[leg_index];
        let mut best: Option<Candidate> = None;
        for (vehicle, vehicle_journey) in data.vehicle_journeys.iter().enumerate() {
            if vehicle_journey.route_id != leg.route_id
                || vehicle_journey.direction_id != leg.direction_id
                || !vehicle_journey.service.runs_on(date, weekday)
            {
                continue;
            }
            let (board_position, debark_position) =
                match extract_slice(vehicle_journey, &leg.stop_ids) {
                    Ok(Some(slice)) => slice,
                    Ok(None) => continue,
                    Err(ReversedSlice) => {
                        return Err(RematchError::InvalidSlice {
                            leg_index,
                            vehicle_journey: vehicle_journey.id.clone(),
                        })
                    }
                };
            let candidate = Candidate {
                vehicle,
                board_position,
                debark_position,
                slice_departure: vehicle_journey.stop_times[board_position].board_time,
                slice_arrival: vehicle_journey.stop_times[debark_position].debark_time,
            };
            let feasible = if depart {
                candidate.slice_departure >= anchor
            } else {
                candidate.slice_arrival <= anchor
            };
            if !feasible {
                continue;
            }
            let improves = match &best {
                None => true,
                Some(current) => {
                    if depart {
                        // earliest slice departure, vehicle journey id as
                        // tie-break
                        (
                            candidate.slice_departure,
                            &data.vehicle_journeys[candidate.vehicle].id,
                        ) < (
                            current.slice_departure,
                            &data.vehicle_journeys[current.vehicle].id,
                        )
                    } else {
                        (
                            candidate.slice_arrival,
                            std::cmp::Reverse(&data.vehicle_journeys[candidate.vehicle].id),
                        ) > (
                            current.slice_arrival,
                            std::cmp::Reverse(&data.vehicle_journeys[current.vehicle].id),
                        )
                    }
                }
            };
            if improves {
                best = Some(candidate);
            }
        }

        let chosen = best.ok_or(RematchError::NoMatchingTrip { leg_index })?;
        let vehicle_journey = data.vehicle_journey(chosen.vehicle);
        debug!(
            "leg {} re-anchored on vehicle journey {}",
            leg_index, vehicle_journey.id
        );
        if depart {
            anchor =
                vehicle_journey.stop_times[chosen.debark_position].board_time + interchange;
        } else {
            anchor =
                vehicle_journey.stop_times[chosen.board_position].debark_time - interchange;
        }
        matched.push(MatchedLeg {
            vehicle_journey_id: vehicle_journey.id.clone(),
            route_id: vehicle_journey.route_id.clone(),
            direction_id: vehicle_journey.direction_id,
            board_position: chosen.board_position,
            debark_position: chosen.debark_position,
            board_time: chosen.slice_departure,
            debark_time: chosen.slice_arrival,
            stop_ids: vehicle_journey.stop_times[chosen.board_position..=chosen.debark_position]
                .iter()
                .map(|stop_time| stop_time.stop_id.clone())
                .collect(),
        });
    }

    if !depart {
        matched.reverse();
    }
    Ok(matched)
}

struct Candidate {
    vehicle: usize,
    board_position: usize,
    debark_position: usize,
    slice_departure: SecondsSinceDayStart,
    slice_arrival: SecondsSinceDayStart,
}

struct ReversedSlice;

/// Locates `stop_ids` as an ordered subsequence of the vehicle journey's
/// stops. `Ok(None)` when the vehicle does not realise the sequence;
/// `Err` when the endpoints exist but in reverse order, which is a
/// programming error on the caller's side.
fn extract_slice(
    vehicle_journey: &VehicleJourney,
    stop_ids: &[String],
) -> Result<Option<(usize, usize)>, ReversedSlice> {
    let (first_id, last_id) = match (stop_ids.first(), stop_ids.last()) {
        (Some(first), Some(last)) if stop_ids.len() >= 2 => (first, last),
        _ => return Ok(None),
    };
    let stops = &vehicle_journey.stop_times;
    let first_position = stops.iter().position(|st| &st.stop_id == first_id);
    let last_position = stops.iter().position(|st| &st.stop_id == last_id);
    let (first_position, last_position) = match (first_position, last_position) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(None),
    };
    if last_position < first_position {
        return Err(ReversedSlice);
    }
    let mut cursor = first_position;
    for stop_id in stop_ids {
        match stops[cursor..=last_position]
            .iter()
            .position(|st| &st.stop_id == stop_id)
        {
            Some(offset) => cursor += offset + 1,
            None => return Ok(None),
        }
    }
    Ok(Some((first_position, last_position)))
}
