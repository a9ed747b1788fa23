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

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::calendar::{to_naive_date, CompactDate};
use crate::config::Config;
use crate::engine::raptor;
use crate::engine::scan_result::ScanResult;
use crate::filters;
use crate::model::{Model, ModelError};
use crate::rematch::{self, LegDescriptor, MatchedLeg, RematchError};
use crate::response::{self, Journey};
use crate::time::SecondsSinceDayStart;
use crate::transit_data::{ServiceDay, Stop, TransitData};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadRequest {
    /// none of the requested origin stop ids exists in the data
    NoValidOrigin,
    /// none of the requested destination stop ids exists in the data
    NoValidDestination,
    /// the compact date is not a calendar date
    BadDate(CompactDate),
}

impl Display for BadRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BadRequest::NoValidOrigin => write!(f, "No requested origin stop exists"),
            BadRequest::NoValidDestination => {
                write!(f, "No requested destination stop exists")
            }
            BadRequest::BadDate(date) => {
                write!(f, "`{}` is not a valid YYYYMMDD date", date)
            }
        }
    }
}

impl std::error::Error for BadRequest {}

/// The engine handle : owns the immutable prepared timetable and answers
/// queries against it. Queries allocate their own scratch state, so one
/// handle can serve any number of concurrent queries through a shared
/// reference.
pub struct Solver {
    data: TransitData,
    config: Config,
}

impl Solver {
    /// Prepares the timetable and returns the handle, or refuses to
    /// start on a malformed feed.
    pub fn new(model: Model, config: Config) -> Result<Self, ModelError> {
        let data = TransitData::new(model, &config)?;
        Ok(Self { data, config })
    }

    pub fn data(&self) -> &TransitData {
        &self.data
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Single-day earliest-arrival scan from each origin at its own
    /// earliest departure time. Unknown stop ids are ignored.
    pub fn scan_depart_after(
        &self,
        origins: &[(&str, SecondsSinceDayStart)],
        date: CompactDate,
    ) -> Result<ScanResult, BadRequest> {
        let day = self.service_day(date)?;
        let seeds = self.resolve_seeds(origins);
        if seeds.is_empty() {
            return Err(BadRequest::NoValidOrigin);
        }
        Ok(raptor::scan_depart_after(
            &self.data,
            &self.config,
            &seeds,
            day,
            &[],
        ))
    }

    /// Single-day latest-departure scan toward each destination at its
    /// own latest acceptable arrival time. Unknown stop ids are ignored.
    pub fn scan_arrive_by(
        &self,
        destinations: &[(&str, SecondsSinceDayStart)],
        date: CompactDate,
    ) -> Result<ScanResult, BadRequest> {
        let day = self.service_day(date)?;
        let seeds = self.resolve_seeds(destinations);
        if seeds.is_empty() {
            return Err(BadRequest::NoValidDestination);
        }
        Ok(raptor::scan_arrive_by(
            &self.data,
            &self.config,
            &seeds,
            day,
            &[],
        ))
    }

    /// Pareto-optimal journeys departing any origin at `time` or later on
    /// `date`. When the day yields nothing, the search rolls over to the
    /// next operating days (up to `max_search_days`), and journeys found
    /// there are stitched back across midnight; their times are expressed
    /// in seconds since midnight of `date` and may exceed 24h.
    pub fn plan_depart_after(
        &self,
        origins: &[&str],
        destinations: &[&str],
        date: CompactDate,
        time: SecondsSinceDayStart,
    ) -> Result<Vec<Journey>, BadRequest> {
        let origin_stops = self.resolve_stops(origins);
        if origin_stops.is_empty() {
            return Err(BadRequest::NoValidOrigin);
        }
        let destination_stops = self.resolve_stops(destinations);
        if destination_stops.is_empty() {
            return Err(BadRequest::NoValidDestination);
        }
        let mut day = to_naive_date(date).ok_or(BadRequest::BadDate(date))?;
        let rollover = self.config.day_rollover_offset as i32;
        let origin_set: HashSet<Stop> = origin_stops.iter().copied().collect();
        let mut seeds: Vec<(Stop, SecondsSinceDayStart)> =
            origin_stops.iter().map(|&stop| (stop, time)).collect();
        let mut day_stack: Vec<ScanResult> = Vec::new();

        for _ in 0..self.config.max_search_days {
            let service_day = ServiceDay::new(day);
            let scan = raptor::scan_depart_after(
                &self.data,
                &self.config,
                &seeds,
                service_day,
                &destination_stops,
            );

            let mut journeys = Vec::new();
            for &destination in &destination_stops {
                journeys.extend(response::forward_results(&self.data, &scan, destination));
            }
            if !journeys.is_empty() {
                debug!(
                    "{} raw journeys found on {}",
                    journeys.len(),
                    service_day.date
                );
                let mut stitched = Vec::new();
                for journey in journeys {
                    self.complete_forward(
                        journey,
                        day_stack.len(),
                        &day_stack,
                        &origin_set,
                        rollover,
                        &mut stitched,
                    );
                }
                let journeys = filters::depart_after(stitched);
                for journey in &journeys {
                    debug!("{}", journey);
                }
                return Ok(journeys);
            }

            // nothing this day : every stop the scan touched becomes a
            // departure point of the next operating day, one rollover
            // earlier in that day's frame
            let worst = SecondsSinceDayStart::max();
            let mut next_seeds = Vec::new();
            for idx in 0..self.data.nb_of_stops() {
                let reached = scan.best[idx].min(scan.round_times[0][idx]);
                if reached != worst {
                    next_seeds.push((Stop { idx }, reached.shifted(-rollover)));
                }
            }
            info!(
                "no journey on {}, rolling over {} stops to the next day",
                service_day.date,
                next_seeds.len()
            );
            day_stack.push(scan);
            seeds = next_seeds;
            day = day.succ_opt().ok_or(BadRequest::BadDate(date))?;
        }
        Ok(Vec::new())
    }

    /// Mirror of [`Self::plan_depart_after`] : Pareto-optimal journeys
    /// arriving at any destination at `time` or earlier on `date`,
    /// rolling over to previous operating days when needed.
    pub fn plan_arrive_by(
        &self,
        origins: &[&str],
        destinations: &[&str],
        date: CompactDate,
        time: SecondsSinceDayStart,
    ) -> Result<Vec<Journey>, BadRequest> {
        let origin_stops = self.resolve_stops(origins);
        if origin_stops.is_empty() {
            return Err(BadRequest::NoValidOrigin);
        }
        let destination_stops = self.resolve_stops(destinations);
        if destination_stops.is_empty() {
            return Err(BadRequest::NoValidDestination);
        }
        let mut day = to_naive_date(date).ok_or(BadRequest::BadDate(date))?;
        let rollover = self.config.day_rollover_offset as i32;
        let destination_set: HashSet<Stop> = destination_stops.iter().copied().collect();
        let mut seeds: Vec<(Stop, SecondsSinceDayStart)> =
            destination_stops.iter().map(|&stop| (stop, time)).collect();
        let mut day_stack: Vec<ScanResult> = Vec::new();

        for _ in 0..self.config.max_search_days {
            let service_day = ServiceDay::new(day);
            let scan = raptor::scan_arrive_by(
                &self.data,
                &self.config,
                &seeds,
                service_day,
                &origin_stops,
            );

            let mut journeys = Vec::new();
            for &origin in &origin_stops {
                journeys.extend(response::reverse_results(&self.data, &scan, origin));
            }
            if !journeys.is_empty() {
                debug!(
                    "{} raw journeys found on {}",
                    journeys.len(),
                    service_day.date
                );
                let mut stitched = Vec::new();
                for journey in journeys {
                    self.complete_reverse(
                        journey,
                        day_stack.len(),
                        &day_stack,
                        &destination_set,
                        rollover,
                        &mut stitched,
                    );
                }
                let journeys = filters::arrive_by(stitched);
                for journey in &journeys {
                    debug!("{}", journey);
                }
                return Ok(journeys);
            }

            let worst = SecondsSinceDayStart::min();
            let mut next_seeds = Vec::new();
            for idx in 0..self.data.nb_of_stops() {
                let reached = scan.best[idx].max(scan.round_times[0][idx]);
                if reached != worst {
                    next_seeds.push((Stop { idx }, reached.shifted(rollover)));
                }
            }
            info!(
                "no journey on {}, rolling over {} stops to the previous day",
                service_day.date,
                next_seeds.len()
            );
            day_stack.push(scan);
            seeds = next_seeds;
            day = day.pred_opt().ok_or(BadRequest::BadDate(date))?;
        }
        Ok(Vec::new())
    }

    /// Re-anchors a previously computed journey on a new date and time by
    /// selecting concrete vehicle journeys realising the same per-leg
    /// stop sequences.
    pub fn rematch(
        &self,
        legs: &[LegDescriptor],
        date: CompactDate,
        time: SecondsSinceDayStart,
        depart: bool,
    ) -> Result<Vec<MatchedLeg>, RematchError> {
        rematch::rematch(&self.data, &self.config, legs, date, time, depart)
    }

    /// The per-leg descriptors of a journey, suitable for re-anchoring it
    /// later with [`Self::rematch`].
    pub fn describe(&self, journey: &Journey) -> Vec<LegDescriptor> {
        journey
            .vehicle_legs()
            .map(|leg| {
                let vehicle_journey = self.data.vehicle_journey(leg.vehicle);
                LegDescriptor {
                    route_id: vehicle_journey.route_id.clone(),
                    direction_id: vehicle_journey.direction_id,
                    stop_ids: vehicle_journey.stop_times
                        [leg.board_position..=leg.debark_position]
                        .iter()
                        .map(|stop_time| stop_time.stop_id.clone())
                        .collect(),
                }
            })
            .collect()
    }

    // A journey scanned on day `depth` of the rollover stack is completed
    // by every chain of previous-day journeys reaching its first stop,
    // each portion shifted into the frame of the reference date.
    fn complete_forward(
        &self,
        journey: Journey,
        depth: usize,
        day_stack: &[ScanResult],
        origins: &HashSet<Stop>,
        rollover: i32,
        out: &mut Vec<Journey>,
    ) {
        let shifted = journey.shifted(depth as i32 * rollover);
        let first_stop = journey
            .legs
            .first()
            .and_then(|leg| self.data.stop_by_id(leg.from_stop()));
        let first_stop = match first_stop {
            Some(stop) => stop,
            None => return,
        };
        if origins.contains(&first_stop) {
            out.push(shifted.clone());
        }
        if depth == 0 {
            return;
        }
        let previous_scan = &day_stack[depth - 1];
        for prefix in response::forward_results(&self.data, previous_scan, first_stop) {
            let mut completed_prefixes = Vec::new();
            self.complete_forward(
                prefix,
                depth - 1,
                day_stack,
                origins,
                rollover,
                &mut completed_prefixes,
            );
            for completed in completed_prefixes {
                let mut legs = completed.legs;
                legs.extend(shifted.legs.iter().cloned());
                out.push(Journey::from_legs(legs));
            }
        }
    }

    // Mirror of `complete_forward` : the continuation chains are walked
    // from the journey's last stop through the saved reverse scans.
    fn complete_reverse(
        &self,
        journey: Journey,
        depth: usize,
        day_stack: &[ScanResult],
        destinations: &HashSet<Stop>,
        rollover: i32,
        out: &mut Vec<Journey>,
    ) {
        let shifted = journey.shifted(-(depth as i32) * rollover);
        let last_stop = journey
            .legs
            .last()
            .and_then(|leg| self.data.stop_by_id(leg.to_stop()));
        let last_stop = match last_stop {
            Some(stop) => stop,
            None => return,
        };
        if destinations.contains(&last_stop) {
            out.push(shifted.clone());
        }
        if depth == 0 {
            return;
        }
        let previous_scan = &day_stack[depth - 1];
        for suffix in response::reverse_results(&self.data, previous_scan, last_stop) {
            let mut completed_suffixes = Vec::new();
            self.complete_reverse(
                suffix,
                depth - 1,
                day_stack,
                destinations,
                rollover,
                &mut completed_suffixes,
            );
            for completed in completed_suffixes {
                let mut legs = shifted.legs.clone();
                legs.extend(completed.legs);
                let mut combined = Journey::from_legs(legs);
                // the reported arrival keeps the frame of the portion
                // scanned first, one rollover back
                combined.arrival_time = journey.arrival_time.shifted(-rollover);
                out.push(combined);
            }
        }
    }

    fn service_day(&self, date: CompactDate) -> Result<ServiceDay, BadRequest> {
        let naive: NaiveDate = to_naive_date(date).ok_or(BadRequest::BadDate(date))?;
        Ok(ServiceDay::new(naive))
    }

    fn resolve_stops(&self, ids: &[&str]) -> Vec<Stop> {
        ids.iter()
            .filter_map(|id| {
                let stop = self.data.stop_by_id(id);
                if stop.is_none() {
                    warn!("unknown stop id `{}` in request, ignoring it", id);
                }
                stop
            })
            .collect()
    }

    fn resolve_seeds(
        &self,
        seeds: &[(&str, SecondsSinceDayStart)],
    ) -> Vec<(Stop, SecondsSinceDayStart)> {
        seeds
            .iter()
            .filter_map(|(id, time)| {
                let stop = self.data.stop_by_id(id);
                if stop.is_none() {
                    warn!("unknown stop id `{}` in request, ignoring it", id);
                }
                stop.map(|stop| (stop, *time))
            })
            .collect()
    }
}
