use std::collections::BTreeMap;

use tracing::trace;

use super::scan_result::{Connection, ScanResult};
use crate::config::Config;
use crate::time::{PositiveDuration, SecondsSinceDayStart};
use crate::transit_data::{Mission, ServiceDay, Stop, TransitData};

// Round-based scan : each round extends the candidate journeys by at
// most one vehicle, then by the foot transfers out of the stops that
// vehicle riding improved. The forward and reverse passes are exact
// structural mirrors of each other, with "smaller is better" flipped
// to "greater is better".

/// Earliest-arrival scan from `origins`, each seeded with the earliest
/// time at which the traveler can be there.
///
/// `targets` is used for pruning only : a candidate worse than the best
/// time already found on every target is not recorded. Pass an empty
/// slice to scan exhaustively.
pub(crate) fn scan_depart_after(
    data: &TransitData,
    config: &Config,
    origins: &[(Stop, SecondsSinceDayStart)],
    day: ServiceDay,
    targets: &[Stop],
) -> ScanResult {
    let worst = SecondsSinceDayStart::max();
    let nb_of_rounds = usize::from(config.max_rounds) + 1;
    let mut result = ScanResult::new(data.nb_of_stops(), nb_of_rounds, worst);

    let mut marked: Vec<Stop> = Vec::new();
    let mut is_marked = vec![false; data.nb_of_stops()];
    for &(stop, time) in origins {
        let seed = &mut result.round_times[0][stop.idx];
        *seed = (*seed).min(time);
        if !is_marked[stop.idx] {
            is_marked[stop.idx] = true;
            marked.push(stop);
        }
    }

    let mut best_at_targets = worst;
    let mut missions_to_ride: BTreeMap<Mission, usize> = BTreeMap::new();
    let mut improved_by_vehicle: Vec<(Stop, SecondsSinceDayStart)> = Vec::new();

    for round in 1..nb_of_rounds {
        missions_to_ride.clear();
        for &stop in &marked {
            for &(mission, position) in data.missions_of(stop) {
                missions_to_ride
                    .entry(mission)
                    .and_modify(|boardable| *boardable = (*boardable).min(position))
                    .or_insert(position);
            }
        }
        for &stop in &marked {
            is_marked[stop.idx] = false;
        }
        marked.clear();
        improved_by_vehicle.clear();

        for (&mission, &first_position) in &missions_to_ride {
            let stops = data.mission_stops(mission);
            let mut onboard: Option<(usize, usize)> = None;
            for position in first_position..stops.len() {
                let stop = stops[position];
                let interchange = data.interchange_at(stop);

                if let Some((vehicle, board_position)) = onboard {
                    let debark = data.debark_time(vehicle, position);
                    let bound = result.best[stop.idx].min(best_at_targets);
                    if debark + interchange < bound {
                        result.round_times[round][stop.idx] = debark;
                        result.best[stop.idx] = debark;
                        result.connections[round][stop.idx] = Some(Connection::Vehicle {
                            vehicle,
                            board_position,
                            debark_position: position,
                        });
                        if !is_marked[stop.idx] {
                            is_marked[stop.idx] = true;
                            marked.push(stop);
                        }
                        improved_by_vehicle.push((stop, debark));
                        if targets.contains(&stop) {
                            best_at_targets = best_at_targets.min(debark);
                        }
                    }
                }

                // can this stop's previous-round time board a vehicle
                // the current one does not cover ?
                let previous = result.round_times[round - 1][stop.idx];
                if previous == worst {
                    continue;
                }
                // switching out of a vehicle or a transfer requires the
                // dwell; a round-0 seed boards directly
                let dwell = if result.connections[round - 1][stop.idx].is_some() {
                    interchange
                } else {
                    PositiveDuration::zero()
                };
                let boardable = previous + dwell;
                let catchable = onboard
                    .map_or(false, |(vehicle, _)| {
                        boardable <= data.board_time(vehicle, position)
                    });
                if !catchable {
                    if let Some(vehicle) =
                        data.earliest_vehicle(mission, position, boardable, day.date, day.weekday)
                    {
                        onboard = Some((vehicle, position));
                    }
                }
            }
        }

        // foot transfers extend only stops improved by a vehicle in this
        // round, never another transfer
        for &(stop, at_stop) in &improved_by_vehicle {
            for transfer in &data.stop_data(stop).outgoing_transfers {
                let destination = transfer.other_stop;
                let candidate = at_stop + transfer.duration;
                if candidate < result.best[destination.idx] {
                    result.round_times[round][destination.idx] = candidate;
                    result.best[destination.idx] = candidate;
                    result.connections[round][destination.idx] = Some(Connection::Walk {
                        from: stop,
                        duration: transfer.duration,
                    });
                    if !is_marked[destination.idx] {
                        is_marked[destination.idx] = true;
                        marked.push(destination);
                    }
                    if targets.contains(&destination) {
                        best_at_targets = best_at_targets.min(candidate);
                    }
                }
            }
        }

        trace!(
            "forward round {} improved {} stops on {}",
            round,
            marked.len(),
            day.date
        );
        if marked.is_empty() {
            break;
        }
    }

    result
}

/// Latest-departure scan toward `destinations`, each seeded with the
/// latest acceptable arrival time. Mirror of [`scan_depart_after`] :
/// missions are traversed backwards, and the recorded time at a stop is
/// the latest departure from it that still reaches a destination.
pub(crate) fn scan_arrive_by(
    data: &TransitData,
    config: &Config,
    destinations: &[(Stop, SecondsSinceDayStart)],
    day: ServiceDay,
    targets: &[Stop],
) -> ScanResult {
    let worst = SecondsSinceDayStart::min();
    let nb_of_rounds = usize::from(config.max_rounds) + 1;
    let mut result = ScanResult::new(data.nb_of_stops(), nb_of_rounds, worst);

    let mut marked: Vec<Stop> = Vec::new();
    let mut is_marked = vec![false; data.nb_of_stops()];
    for &(stop, time) in destinations {
        let seed = &mut result.round_times[0][stop.idx];
        *seed = (*seed).max(time);
        if !is_marked[stop.idx] {
            is_marked[stop.idx] = true;
            marked.push(stop);
        }
    }

    let mut best_at_targets = worst;
    let mut missions_to_ride: BTreeMap<Mission, usize> = BTreeMap::new();
    let mut improved_by_vehicle: Vec<(Stop, SecondsSinceDayStart)> = Vec::new();

    for round in 1..nb_of_rounds {
        missions_to_ride.clear();
        for &stop in &marked {
            for &(mission, position) in data.missions_of(stop) {
                missions_to_ride
                    .entry(mission)
                    .and_modify(|debarkable| *debarkable = (*debarkable).max(position))
                    .or_insert(position);
            }
        }
        for &stop in &marked {
            is_marked[stop.idx] = false;
        }
        marked.clear();
        improved_by_vehicle.clear();

        for (&mission, &first_position) in &missions_to_ride {
            let stops = data.mission_stops(mission);
            let mut onboard: Option<(usize, usize)> = None;
            for position in (0..=first_position).rev() {
                let stop = stops[position];
                let interchange = data.interchange_at(stop);

                if let Some((vehicle, board_position)) = onboard {
                    let board = data.board_time(vehicle, position);
                    let bound = result.best[stop.idx].max(best_at_targets);
                    if board - interchange > bound {
                        result.round_times[round][stop.idx] = board;
                        result.best[stop.idx] = board;
                        result.connections[round][stop.idx] = Some(Connection::Vehicle {
                            vehicle,
                            board_position,
                            debark_position: position,
                        });
                        if !is_marked[stop.idx] {
                            is_marked[stop.idx] = true;
                            marked.push(stop);
                        }
                        improved_by_vehicle.push((stop, board));
                        if targets.contains(&stop) {
                            best_at_targets = best_at_targets.max(board);
                        }
                    }
                }

                let previous = result.round_times[round - 1][stop.idx];
                if previous == worst {
                    continue;
                }
                let dwell = if result.connections[round - 1][stop.idx].is_some() {
                    interchange
                } else {
                    PositiveDuration::zero()
                };
                let debarkable = previous - dwell;
                let catchable = onboard
                    .map_or(false, |(vehicle, _)| {
                        data.debark_time(vehicle, position) <= debarkable
                    });
                if !catchable {
                    if let Some(vehicle) =
                        data.latest_vehicle(mission, position, debarkable, day.date, day.weekday)
                    {
                        onboard = Some((vehicle, position));
                    }
                }
            }
        }

        for &(stop, at_stop) in &improved_by_vehicle {
            for transfer in &data.stop_data(stop).incoming_transfers {
                let origin = transfer.other_stop;
                let candidate = at_stop - transfer.duration;
                if candidate > result.best[origin.idx] {
                    result.round_times[round][origin.idx] = candidate;
                    result.best[origin.idx] = candidate;
                    result.connections[round][origin.idx] = Some(Connection::Walk {
                        from: stop,
                        duration: transfer.duration,
                    });
                    if !is_marked[origin.idx] {
                        is_marked[origin.idx] = true;
                        marked.push(origin);
                    }
                    if targets.contains(&origin) {
                        best_at_targets = best_at_targets.max(candidate);
                    }
                }
            }
        }

        trace!(
            "reverse round {} improved {} stops on {}",
            round,
            marked.len(),
            day.date
        );
        if marked.is_empty() {
            break;
        }
    }

    result
}
