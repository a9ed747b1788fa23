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

use crate::response::Journey;

/// Keeps the journeys that are Pareto-optimal on
/// (arrival time, number of transfers) : a journey survives only if no
/// other journey arrives no later with no more transfers. Journeys that
/// ride the same route twice are discarded first.
pub fn depart_after(mut journeys: Vec<Journey>) -> Vec<Journey> {
    journeys.retain(rides_each_route_once);
    journeys.sort_by(|a, b| {
        a.arrival_time
            .cmp(&b.arrival_time)
            .then_with(|| a.nb_of_transfers().cmp(&b.nb_of_transfers()))
    });
    let mut kept: Vec<Journey> = Vec::new();
    let mut fewest_transfers = usize::MAX;
    for journey in journeys {
        if journey.nb_of_transfers() < fewest_transfers {
            fewest_transfers = journey.nb_of_transfers();
            kept.push(journey);
        }
    }
    kept
}

/// Mirror of [`depart_after`] : Pareto-optimal on
/// (departure time, number of transfers), where departing later is better.
pub fn arrive_by(mut journeys: Vec<Journey>) -> Vec<Journey> {
    journeys.retain(rides_each_route_once);
    journeys.sort_by(|a, b| {
        b.departure_time
            .cmp(&a.departure_time)
            .then_with(|| a.nb_of_transfers().cmp(&b.nb_of_transfers()))
    });
    let mut kept: Vec<Journey> = Vec::new();
    let mut fewest_transfers = usize::MAX;
    for journey in journeys {
        if journey.nb_of_transfers() < fewest_transfers {
            fewest_transfers = journey.nb_of_transfers();
            kept.push(journey);
        }
    }
    kept
}

// Route ids only : two legs of the same route in opposite directions
// still count as a repeat.
fn rides_each_route_once(journey: &Journey) -> bool {
    let mut seen = HashSet::new();
    journey
        .vehicle_legs()
        .all(|leg| seen.insert(leg.route_id.as_str()))
}
