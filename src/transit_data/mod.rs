//! Immutable, query-ready form of the timetable, built once at startup
//! and shared read-only by every query.
//!
//! Vehicle journeys are grouped into missions : a mission is the maximal
//! set of vehicle journeys sharing the exact same ordered stop sequence,
//! with its vehicles ordered by departure time at the first stop. This is
//! the "route" of the round-based routing literature, not the operator's
//! marketed route.

use std::collections::HashMap;

use crate::calendar::{weekday_of, CompactDate, Weekday};
use crate::model::{ValidityPeriod, VehicleJourney};
use crate::time::{PositiveDuration, SecondsSinceDayStart};

mod init;

/// Dense handle to a stop. The `StopId` string of the feed is translated
/// once at the query boundary; the scanners only ever see these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stop {
    pub(crate) idx: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mission {
    pub(crate) idx: usize,
}

#[derive(Debug)]
pub struct TransitData {
    pub(crate) stops_data: Vec<StopData>,
    pub(crate) missions_data: Vec<MissionData>,
    pub(crate) vehicle_journeys: Vec<VehicleJourney>,
    /// mission of each vehicle journey, parallel to `vehicle_journeys`
    pub(crate) vehicle_missions: Vec<Mission>,
    pub(crate) stops_by_id: HashMap<String, Stop>,
    pub(crate) validity: ValidityPeriod,
}

#[derive(Debug)]
pub(crate) struct StopData {
    pub(crate) id: String,
    /// every (mission, position) at which this stop occurs
    pub(crate) positions: Vec<(Mission, usize)>,
    pub(crate) outgoing_transfers: Vec<StopTransfer>,
    pub(crate) incoming_transfers: Vec<StopTransfer>,
    pub(crate) interchange: PositiveDuration,
}

/// One foot transfer, seen from one of its endpoints.
#[derive(Debug, Clone)]
pub(crate) struct StopTransfer {
    pub(crate) other_stop: Stop,
    pub(crate) duration: PositiveDuration,
    // validity window carried from the feed, consumed downstream
    #[allow(dead_code)]
    pub(crate) start_time: Option<SecondsSinceDayStart>,
    #[allow(dead_code)]
    pub(crate) end_time: Option<SecondsSinceDayStart>,
}

#[derive(Debug)]
pub(crate) struct MissionData {
    pub(crate) stops: Vec<Stop>,
    /// indices into `vehicle_journeys`, ordered by board time at the
    /// first stop, ties broken by vehicle journey id
    pub(crate) vehicles: Vec<usize>,
}

impl TransitData {
    pub fn nb_of_stops(&self) -> usize {
        self.stops_data.len()
    }

    pub fn nb_of_missions(&self) -> usize {
        self.missions_data.len()
    }

    pub fn stop_by_id(&self, id: &str) -> Option<Stop> {
        self.stops_by_id.get(id).copied()
    }

    pub fn stop_id(&self, stop: Stop) -> &str {
        &self.stops_data[stop.idx].id
    }

    pub fn validity(&self) -> ValidityPeriod {
        self.validity
    }

    pub fn interchange_at(&self, stop: Stop) -> PositiveDuration {
        self.stops_data[stop.idx].interchange
    }

    pub fn vehicle_journey(&self, vehicle: usize) -> &VehicleJourney {
        &self.vehicle_journeys[vehicle]
    }

    pub(crate) fn stop_data(&self, stop: Stop) -> &StopData {
        &self.stops_data[stop.idx]
    }

    pub(crate) fn mission_data(&self, mission: Mission) -> &MissionData {
        &self.missions_data[mission.idx]
    }

    pub(crate) fn missions_of(&self, stop: Stop) -> &[(Mission, usize)] {
        &self.stops_data[stop.idx].positions
    }

    pub(crate) fn mission_stops(&self, mission: Mission) -> &[Stop] {
        &self.missions_data[mission.idx].stops
    }

    pub(crate) fn mission_of_vehicle(&self, vehicle: usize) -> Mission {
        self.vehicle_missions[vehicle]
    }

    pub(crate) fn board_time(&self, vehicle: usize, position: usize) -> SecondsSinceDayStart {
        self.vehicle_journeys[vehicle].stop_times[position].board_time
    }

    pub(crate) fn debark_time(&self, vehicle: usize, position: usize) -> SecondsSinceDayStart {
        self.vehicle_journeys[vehicle].stop_times[position].debark_time
    }

    fn runs_on(&self, vehicle: usize, date: CompactDate, weekday: Weekday) -> bool {
        self.vehicle_journeys[vehicle]
            .service
            .runs_on(date, weekday)
    }

    /// Earliest vehicle of `mission` departing from `position` at `bound`
    /// or later on the given date. Vehicles of a mission do not overtake
    /// each other, so board times at a fixed position are sorted and a
    /// binary search applies.
    pub(crate) fn earliest_vehicle(
        &self,
        mission: Mission,
        position: usize,
        bound: SecondsSinceDayStart,
        date: CompactDate,
        weekday: Weekday,
    ) -> Option<usize> {
        let vehicles = &self.missions_data[mission.idx].vehicles;
        let start = vehicles.partition_point(|&vehicle| self.board_time(vehicle, position) < bound);
        vehicles[start..]
            .iter()
            .copied()
            .find(|&vehicle| self.runs_on(vehicle, date, weekday))
    }

    /// Mirror of [`Self::earliest_vehicle`] : latest vehicle arriving at
    /// `position` at `bound` or earlier on the given date.
    pub(crate) fn latest_vehicle(
        &self,
        mission: Mission,
        position: usize,
        bound: SecondsSinceDayStart,
        date: CompactDate,
        weekday: Weekday,
    ) -> Option<usize> {
        let vehicles = &self.missions_data[mission.idx].vehicles;
        let end = vehicles.partition_point(|&vehicle| self.debark_time(vehicle, position) <= bound);
        vehicles[..end]
            .iter()
            .rev()
            .copied()
            .find(|&vehicle| self.runs_on(vehicle, date, weekday))
    }
}

/// A scan date with its precomputed day of week.
#[derive(Debug, Clone, Copy)]
pub struct ServiceDay {
    pub date: CompactDate,
    pub weekday: Weekday,
}

impl ServiceDay {
    pub fn new(date: chrono::NaiveDate) -> Self {
        Self {
            date: crate::calendar::from_naive_date(date),
            weekday: weekday_of(date),
        }
    }
}
