use crate::time::{PositiveDuration, SecondsSinceDayStart};
use crate::transit_data::Stop;

/// The recorded best way to reach a stop at a given round : either a
/// vehicle ridden between two positions of its mission, or a foot
/// transfer out of a stop reached in the same round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Vehicle {
        vehicle: usize,
        /// position at which the vehicle was caught. Smaller than
        /// `debark_position` in a forward scan, greater in a reverse one.
        board_position: usize,
        debark_position: usize,
    },
    Walk {
        /// the stop whose time this transfer extended
        from: Stop,
        duration: PositiveDuration,
    },
}

/// Per-query scratch state of one scan : best times, per-round times and
/// the per-round connection index, all held in flat vectors indexed by
/// the dense stop index so that the inner loops never hash.
///
/// Owned exclusively by the query that allocated it.
#[derive(Debug)]
pub struct ScanResult {
    pub(crate) best: Vec<SecondsSinceDayStart>,
    /// `round_times[round][stop]`
    pub(crate) round_times: Vec<Vec<SecondsSinceDayStart>>,
    /// `connections[round][stop]`, `None` at round 0
    pub(crate) connections: Vec<Vec<Option<Connection>>>,
    /// the value meaning "not reached" : `max()` when smaller is better,
    /// `min()` when greater is better
    pub(crate) worst: SecondsSinceDayStart,
}

impl ScanResult {
    pub(crate) fn new(
        nb_of_stops: usize,
        nb_of_rounds: usize,
        worst: SecondsSinceDayStart,
    ) -> Self {
        Self {
            best: vec![worst; nb_of_stops],
            round_times: vec![vec![worst; nb_of_stops]; nb_of_rounds],
            connections: vec![vec![None; nb_of_stops]; nb_of_rounds],
            worst,
        }
    }

    pub fn nb_of_rounds(&self) -> usize {
        self.round_times.len()
    }

    /// Best time found at `stop` over all rounds, `None` if no vehicle
    /// or transfer ever reached it.
    pub fn best_time(&self, stop: Stop) -> Option<SecondsSinceDayStart> {
        let time = self.best[stop.idx];
        (time != self.worst).then_some(time)
    }

    pub fn time_at_round(&self, stop: Stop, round: usize) -> Option<SecondsSinceDayStart> {
        let time = self.round_times[round][stop.idx];
        (time != self.worst).then_some(time)
    }

    pub fn connection(&self, stop: Stop, round: usize) -> Option<&Connection> {
        self.connections[round][stop.idx].as_ref()
    }

    /// The time this stop was seeded with at round 0, if it was.
    pub fn seed_time(&self, stop: Stop) -> Option<SecondsSinceDayStart> {
        self.time_at_round(stop, 0)
    }

    pub fn is_reached(&self, stop: Stop) -> bool {
        self.best[stop.idx] != self.worst
    }
}
