// Copyright (C) 2017 Kisio Digital and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! Provides an easy way to create a `Model`
//!
//! ```ignore
//!  let model = ModelBuilder::new(20250101, 20250102)
//!      .vj("toto", |vj| {
//!          vj.route("1")
//!            .st("A", "10:00:00", "10:01:00")
//!            .st("B", "11:00:00", "11:01:00");
//!      })
//!      .vj("tata", |vj| {
//!          vj.st("A", "10:00:00", "10:01:00")
//!            .st("D", "11:00:00", "11:01:00");
//!      })
//!      .build();
//! ```

use std::collections::HashMap;

use peregrine::calendar::{CompactDate, Service};
use peregrine::model::{Model, StopTime, Transfer, ValidityPeriod, VehicleJourney};
use peregrine::time::TimeParser;

pub const DEFAULT_CALENDAR_ID: &str = "default_service";
pub const DEFAULT_ROUTE_ID: &str = "default_route";

/// Builder used to easily create a `Model`.
/// Note: if not explicitly set, all the vehicle journeys
/// are attached to a default calendar covering the whole
/// validity period.
pub struct ModelBuilder {
    validity: ValidityPeriod,
    services: HashMap<String, Service>,
    vehicle_journeys: Vec<RawVehicleJourney>,
    transfers: Vec<Transfer>,
}

struct RawVehicleJourney {
    id: String,
    route_id: String,
    direction_id: u8,
    service_id: String,
    // (stop, arrival, departure), times as HH:MM:SS literals
    stop_times: Vec<(String, String, String)>,
}

/// Builder used to create and modify a new VehicleJourney.
pub struct VehicleJourneyBuilder {
    raw: RawVehicleJourney,
}

impl ModelBuilder {
    pub fn new(start_date: CompactDate, end_date: CompactDate) -> Self {
        let mut services = HashMap::new();
        services.insert(
            DEFAULT_CALENDAR_ID.to_string(),
            Service::weekly(start_date, end_date, [true; 7]),
        );
        Self {
            validity: ValidityPeriod {
                start_date,
                end_date,
            },
            services,
            vehicle_journeys: Vec::new(),
            transfers: Vec::new(),
        }
    }

    /// Add a new Calendar running exactly on the given dates,
    /// or replace an existing one
    pub fn calendar(mut self, id: &str, dates: &[CompactDate]) -> Self {
        self.services
            .insert(id.to_string(), Service::from_dates(dates));
        self
    }

    /// Add a new VehicleJourney to the model
    pub fn vj<F>(mut self, id: &str, mut vj_initer: F) -> Self
    where
        F: FnMut(&mut VehicleJourneyBuilder),
    {
        let mut vj_builder = VehicleJourneyBuilder {
            raw: RawVehicleJourney {
                id: id.to_string(),
                route_id: DEFAULT_ROUTE_ID.to_string(),
                direction_id: 0,
                service_id: DEFAULT_CALENDAR_ID.to_string(),
                stop_times: Vec::new(),
            },
        };
        vj_initer(&mut vj_builder);
        self.vehicle_journeys.push(vj_builder.raw);
        self
    }

    /// Add a foot transfer between two stops. A transfer from a stop
    /// to itself sets the minimum dwell at that stop.
    pub fn transfer(mut self, from_stop: &str, to_stop: &str, duration: &str) -> Self {
        let duration = duration
            .parse()
            .unwrap_or_else(|_| panic!("bad duration {}", duration));
        self.transfers
            .push(Transfer::new(from_stop, to_stop, duration));
        self
    }

    pub fn build(self) -> Model {
        let mut parser = TimeParser::new();
        let vehicle_journeys = self
            .vehicle_journeys
            .into_iter()
            .map(|raw| {
                let service = self
                    .services
                    .get(&raw.service_id)
                    .unwrap_or_else(|| panic!("unknown calendar {}", raw.service_id))
                    .clone();
                let stop_times = raw
                    .stop_times
                    .iter()
                    .map(|(stop, arrival, departure)| {
                        StopTime::new(
                            stop.as_str(),
                            parser
                                .parse(arrival)
                                .unwrap_or_else(|err| panic!("{}", err)),
                            parser
                                .parse(departure)
                                .unwrap_or_else(|err| panic!("{}", err)),
                        )
                    })
                    .collect();
                VehicleJourney {
                    id: raw.id,
                    route_id: raw.route_id,
                    direction_id: raw.direction_id,
                    service,
                    stop_times,
                }
            })
            .collect();
        Model {
            vehicle_journeys,
            transfers: self.transfers,
            validity: self.validity,
        }
    }
}

impl VehicleJourneyBuilder {
    pub fn route(&mut self, id: &str) -> &mut Self {
        self.raw.route_id = id.to_string();
        self
    }

    pub fn direction(&mut self, direction_id: u8) -> &mut Self {
        self.raw.direction_id = direction_id;
        self
    }

    pub fn calendar(&mut self, id: &str) -> &mut Self {
        self.raw.service_id = id.to_string();
        self
    }

    /// Add a StopTime to the vehicle journey, `arrival` then `departure`
    pub fn st(&mut self, stop: &str, arrival: &str, departure: &str) -> &mut Self {
        self.raw
            .stop_times
            .push((stop.to_string(), arrival.to_string(), departure.to_string()));
        self
    }
}
