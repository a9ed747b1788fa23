use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use super::{Mission, MissionData, Stop, StopData, StopTransfer, TransitData};
use crate::config::Config;
use crate::model::{Model, ModelError};
use crate::time::PositiveDuration;

impl TransitData {
    /// Builds the query-ready index from a loaded feed.
    /// Fails loudly on a malformed feed : the engine must not start
    /// on data that violates its invariants.
    pub fn new(model: Model, config: &Config) -> Result<Self, ModelError> {
        model.validate()?;

        let Model {
            vehicle_journeys,
            transfers,
            validity,
        } = model;

        let mut stops_by_id: HashMap<String, Stop> = HashMap::new();
        let mut stops_data: Vec<StopData> = Vec::new();

        // group vehicle journeys by their exact ordered stop sequence
        let mut sequence_to_vehicles: BTreeMap<Vec<Stop>, Vec<usize>> = BTreeMap::new();
        for (vehicle, vehicle_journey) in vehicle_journeys.iter().enumerate() {
            let sequence: Vec<Stop> = vehicle_journey
                .stop_times
                .iter()
                .map(|stop_time| {
                    intern_stop(
                        &stop_time.stop_id,
                        config.min_interchange,
                        &mut stops_by_id,
                        &mut stops_data,
                    )
                })
                .collect();
            sequence_to_vehicles
                .entry(sequence)
                .or_default()
                .push(vehicle);
        }

        let mut missions_data: Vec<MissionData> = Vec::new();
        let mut vehicle_missions: Vec<Mission> = vec![Mission { idx: 0 }; vehicle_journeys.len()];
        for (stops, mut vehicles) in sequence_to_vehicles {
            // departure order at the first stop, vehicle journey id as
            // tie-break, so that scans are reproducible across runs
            vehicles.sort_by(|&a, &b| {
                let time_a = vehicle_journeys[a].stop_times[0].board_time;
                let time_b = vehicle_journeys[b].stop_times[0].board_time;
                time_a
                    .cmp(&time_b)
                    .then_with(|| vehicle_journeys[a].id.cmp(&vehicle_journeys[b].id))
            });
            let mission = Mission {
                idx: missions_data.len(),
            };
            for (position, stop) in stops.iter().enumerate() {
                stops_data[stop.idx].positions.push((mission, position));
            }
            for &vehicle in &vehicles {
                vehicle_missions[vehicle] = mission;
            }
            missions_data.push(MissionData { stops, vehicles });
        }

        // a transfer from a stop to itself is a minimum dwell at that
        // stop, everything else is a foot path indexed both ways
        let mut explicit_interchanges: HashMap<usize, PositiveDuration> = HashMap::new();
        for transfer in &transfers {
            let from = intern_stop(
                &transfer.from_stop,
                config.min_interchange,
                &mut stops_by_id,
                &mut stops_data,
            );
            let to = intern_stop(
                &transfer.to_stop,
                config.min_interchange,
                &mut stops_by_id,
                &mut stops_data,
            );
            if from == to {
                explicit_interchanges
                    .entry(from.idx)
                    .and_modify(|dwell| *dwell = (*dwell).min(transfer.duration))
                    .or_insert(transfer.duration);
                continue;
            }
            stops_data[from.idx].outgoing_transfers.push(StopTransfer {
                other_stop: to,
                duration: transfer.duration,
                start_time: transfer.start_time,
                end_time: transfer.end_time,
            });
            stops_data[to.idx].incoming_transfers.push(StopTransfer {
                other_stop: from,
                duration: transfer.duration,
                start_time: transfer.start_time,
                end_time: transfer.end_time,
            });
        }
        for (stop_idx, dwell) in explicit_interchanges {
            stops_data[stop_idx].interchange = dwell;
        }

        info!(
            "prepared {} stops, {} missions, {} vehicle journeys",
            stops_data.len(),
            missions_data.len(),
            vehicle_journeys.len()
        );
        debug!("{} foot transfers", transfers.len());

        Ok(Self {
            stops_data,
            missions_data,
            vehicle_journeys,
            vehicle_missions,
            stops_by_id,
            validity,
        })
    }
}

fn intern_stop(
    id: &str,
    default_interchange: PositiveDuration,
    stops_by_id: &mut HashMap<String, Stop>,
    stops_data: &mut Vec<StopData>,
) -> Stop {
    if let Some(stop) = stops_by_id.get(id) {
        return *stop;
    }
    let stop = Stop {
        idx: stops_data.len(),
    };
    stops_data.push(StopData {
        id: id.to_string(),
        positions: Vec::new(),
        outgoing_transfers: Vec::new(),
        incoming_transfers: Vec::new(),
        interchange: default_interchange,
    });
    stops_by_id.insert(id.to_string(), stop);
    stop
}
