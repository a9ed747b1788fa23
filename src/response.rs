use std::fmt::{Display, Formatter};

use crate::engine::scan_result::{Connection, ScanResult};
use crate::time::{PositiveDuration, SecondsSinceDayStart};
use crate::transit_data::{Stop, TransitData};

#[derive(Debug, Clone)]
pub struct VehicleLeg {
    pub(crate) vehicle: usize,
    pub vehicle_journey_id: String,
    pub route_id: String,
    pub direction_id: u8,
    /// positions within the vehicle's mission, board < debark
    pub board_position: usize,
    pub debark_position: usize,
    pub from_stop: String,
    pub to_stop: String,
    pub board_time: SecondsSinceDayStart,
    pub debark_time: SecondsSinceDayStart,
}

#[derive(Debug, Clone)]
pub struct WalkLeg {
    pub from_stop: String,
    pub to_stop: String,
    pub duration: PositiveDuration,
    pub start_time: SecondsSinceDayStart,
    pub end_time: SecondsSinceDayStart,
}

#[derive(Debug, Clone)]
pub enum Leg {
    Vehicle(VehicleLeg),
    Walk(WalkLeg),
}

impl Leg {
    pub fn from_stop(&self) -> &str {
        match self {
            Leg::Vehicle(leg) => &leg.from_stop,
            Leg::Walk(leg) => &leg.from_stop,
        }
    }

    pub fn to_stop(&self) -> &str {
        match self {
            Leg::Vehicle(leg) => &leg.to_stop,
            Leg::Walk(leg) => &leg.to_stop,
        }
    }

    pub fn start_time(&self) -> SecondsSinceDayStart {
        match self {
            Leg::Vehicle(leg) => leg.board_time,
            Leg::Walk(leg) => leg.start_time,
        }
    }

    pub fn end_time(&self) -> SecondsSinceDayStart {
        match self {
            Leg::Vehicle(leg) => leg.debark_time,
            Leg::Walk(leg) => leg.end_time,
        }
    }
}

/// An ordered sequence of legs, each ending where the next begins.
/// Times are seconds since midnight of the reference date of the query
/// that produced the journey; a cross-midnight journey simply carries
/// times beyond 24h.
#[derive(Debug, Clone)]
pub struct Journey {
    pub legs: Vec<Leg>,
    pub departure_time: SecondsSinceDayStart,
    pub arrival_time: SecondsSinceDayStart,
}

impl Journey {
    /// Departure is the first vehicle leg's board time pushed back by the
    /// walks before it; arrival is the last vehicle leg's debark time
    /// pushed forward by the walks after it. A journey without any
    /// vehicle leg has both times at zero.
    pub(crate) fn from_legs(legs: Vec<Leg>) -> Self {
        let first_vehicle = legs.iter().position(|leg| matches!(leg, Leg::Vehicle(_)));
        let last_vehicle = legs.iter().rposition(|leg| matches!(leg, Leg::Vehicle(_)));
        let (departure_time, arrival_time) = match (first_vehicle, last_vehicle) {
            (Some(first), Some(last)) => {
                let mut departure = legs[first].start_time();
                for leg in &legs[..first] {
                    if let Leg::Walk(walk) = leg {
                        departure = departure - walk.duration;
                    }
                }
                let mut arrival = legs[last].end_time();
                for leg in &legs[last + 1..] {
                    if let Leg::Walk(walk) = leg {
                        arrival = arrival + walk.duration;
                    }
                }
                (departure, arrival)
            }
            _ => (SecondsSinceDayStart::zero(), SecondsSinceDayStart::zero()),
        };
        Self {
            legs,
            departure_time,
            arrival_time,
        }
    }

    pub fn vehicle_legs(&self) -> impl Iterator<Item = &VehicleLeg> {
        self.legs.iter().filter_map(|leg| match leg {
            Leg::Vehicle(vehicle_leg) => Some(vehicle_leg),
            Leg::Walk(_) => None,
        })
    }

    pub fn first_vehicle_leg(&self) -> Option<&VehicleLeg> {
        self.vehicle_legs().next()
    }

    pub fn nb_of_transfers(&self) -> usize {
        self.vehicle_legs().count().saturating_sub(1)
    }

    /// Re-expresses every time of the journey `offset_seconds` later.
    pub(crate) fn shifted(&self, offset_seconds: i32) -> Journey {
        let legs = self
            .legs
            .iter()
            .map(|leg| match leg {
                Leg::Vehicle(vehicle_leg) => Leg::Vehicle(VehicleLeg {
                    board_time: vehicle_leg.board_time.shifted(offset_seconds),
                    debark_time: vehicle_leg.debark_time.shifted(offset_seconds),
                    ..vehicle_leg.clone()
                }),
                Leg::Walk(walk_leg) => Leg::Walk(WalkLeg {
                    start_time: walk_leg.start_time.shifted(offset_seconds),
                    end_time: walk_leg.end_time.shifted(offset_seconds),
                    ..walk_leg.clone()
                }),
            })
            .collect();
        Journey {
            legs,
            departure_time: self.departure_time.shifted(offset_seconds),
            arrival_time: self.arrival_time.shifted(offset_seconds),
        }
    }

    /// Consecutive legs chain on the same stop with non-decreasing times.
    pub(crate) fn is_coherent(&self) -> bool {
        self.legs.windows(2).all(|window| {
            window[0].to_stop() == window[1].from_stop()
                && window[0].end_time() <= window[1].start_time()
        })
    }
}

impl Display for Journey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "journey departing {} arriving {} with {} transfer(s)",
            self.departure_time,
            self.arrival_time,
            self.nb_of_transfers()
        )?;
        for leg in &self.legs {
            write!(f, "\n  {}", leg)?;
        }
        Ok(())
    }
}

impl Display for Leg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Leg::Vehicle(leg) => write!(
                f,
                "{} {} -> {} {} on {} (route {})",
                leg.board_time,
                leg.from_stop,
                leg.debark_time,
                leg.to_stop,
                leg.vehicle_journey_id,
                leg.route_id,
            ),
            Leg::Walk(leg) => write!(
                f,
                "{} {} -> {} {} on foot ({})",
                leg.start_time, leg.from_stop, leg.end_time, leg.to_stop, leg.duration,
            ),
        }
    }
}

/// Rebuilds the journeys that reach `anchor` in a forward scan, one per
/// round at which the anchor holds a connection : the connection chain is
/// walked backwards to the round-0 origins, then reversed.
pub(crate) fn forward_results(
    data: &TransitData,
    scan: &ScanResult,
    anchor: Stop,
) -> Vec<Journey> {
    (1..scan.nb_of_rounds())
        .filter(|&round| scan.connections[round][anchor.idx].is_some())
        .filter_map(|round| forward_journey(data, scan, anchor, round))
        .collect()
}

fn forward_journey(
    data: &TransitData,
    scan: &ScanResult,
    anchor: Stop,
    last_round: usize,
) -> Option<Journey> {
    let mut legs = Vec::new();
    let mut stop = anchor;
    let mut round = last_round;
    while round > 0 {
        match scan.connections[round][stop.idx].as_ref()? {
            Connection::Vehicle {
                vehicle,
                board_position,
                debark_position,
            } => {
                legs.push(Leg::Vehicle(vehicle_leg(
                    data,
                    *vehicle,
                    *board_position,
                    *debark_position,
                )));
                let mission = data.mission_of_vehicle(*vehicle);
                stop = data.mission_stops(mission)[*board_position];
                round -= 1;
            }
            Connection::Walk { from, duration } => {
                let end_time = scan.round_times[round][stop.idx];
                legs.push(Leg::Walk(WalkLeg {
                    from_stop: data.stop_id(*from).to_string(),
                    to_stop: data.stop_id(stop).to_string(),
                    duration: *duration,
                    start_time: end_time - *duration,
                    end_time,
                }));
                stop = *from;
            }
        }
    }
    legs.reverse();
    let journey = Journey::from_legs(legs);
    debug_assert!(journey.is_coherent());
    Some(journey)
}

/// Mirror of [`forward_results`] over a reverse scan : the chain is
/// anchored at an origin stop and already runs in journey order, so the
/// legs come out forward directly.
pub(crate) fn reverse_results(
    data: &TransitData,
    scan: &ScanResult,
    anchor: Stop,
) -> Vec<Journey> {
    (1..scan.nb_of_rounds())
        .filter(|&round| scan.connections[round][anchor.idx].is_some())
        .filter_map(|round| reverse_journey(data, scan, anchor, round))
        .collect()
}

fn reverse_journey(
    data: &TransitData,
    scan: &ScanResult,
    anchor: Stop,
    last_round: usize,
) -> Option<Journey> {
    let mut legs = Vec::new();
    let mut stop = anchor;
    let mut round = last_round;
    while round > 0 {
        match scan.connections[round][stop.idx].as_ref()? {
            // a reverse connection holds board > debark : the vehicle was
            // caught at the position the real journey debarks at
            Connection::Vehicle {
                vehicle,
                board_position,
                debark_position,
            } => {
                legs.push(Leg::Vehicle(vehicle_leg(
                    data,
                    *vehicle,
                    *debark_position,
                    *board_position,
                )));
                let mission = data.mission_of_vehicle(*vehicle);
                stop = data.mission_stops(mission)[*board_position];
                round -= 1;
            }
            Connection::Walk { from, duration } => {
                let start_time = scan.round_times[round][stop.idx];
                legs.push(Leg::Walk(WalkLeg {
                    from_stop: data.stop_id(stop).to_string(),
                    to_stop: data.stop_id(*from).to_string(),
                    duration: *duration,
                    start_time,
                    end_time: start_time + *duration,
                }));
                stop = *from;
            }
        }
    }
    let journey = Journey::from_legs(legs);
    debug_assert!(journey.is_coherent());
    Some(journey)
}

fn vehicle_leg(
    data: &TransitData,
    vehicle: usize,
    board_position: usize,
    debark_position: usize,
) -> VehicleLeg {
    debug_assert!(board_position < debark_position);
    let vehicle_journey = data.vehicle_journey(vehicle);
    let board_stop_time = &vehicle_journey.stop_times[board_position];
    let debark_stop_time = &vehicle_journey.stop_times[debark_position];
    VehicleLeg {
        vehicle,
        vehicle_journey_id: vehicle_journey.id.clone(),
        route_id: vehicle_journey.route_id.clone(),
        direction_id: vehicle_journey.direction_id,
        board_position,
        debark_position,
        from_stop: board_stop_time.stop_id.clone(),
        to_stop: debark_stop_time.stop_id.clone(),
        board_time: board_stop_time.board_time,
        debark_time: debark_stop_time.debark_time,
    }
}
