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

mod utils;

use anyhow::Error;
use peregrine::logger::init_test_logger;
use peregrine::Leg;
use utils::{build_solver, second, two_lines_model};

#[test]
fn arrive_by_mirrors_depart_after() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let solver = build_solver(two_lines_model());

    let journeys = solver.plan_arrive_by(&["S1"], &["S3"], 20250101, second(30_000))?;

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(journey.departure_time, second(28_800));
    assert_eq!(journey.arrival_time, second(30_000));
    assert_eq!(journey.nb_of_transfers(), 1);
    assert_eq!(journey.legs.len(), 2);
    match (&journey.legs[0], &journey.legs[1]) {
        (Leg::Vehicle(first), Leg::Vehicle(second)) => {
            assert_eq!(first.route_id, "L1");
            assert_eq!(second.route_id, "L2");
        }
        _ => panic!("expected two vehicle legs"),
    }
    Ok(())
}

#[test]
fn arrive_by_rejects_too_early_deadline() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let solver = build_solver(two_lines_model());

    // nothing can arrive at S3 by 08:00 on the first operating day
    let journeys = solver.plan_arrive_by(&["S1"], &["S3"], 20250101, second(28_800))?;
    assert!(journeys.is_empty());
    Ok(())
}

#[test]
fn forward_and_reverse_agree() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let solver = build_solver(two_lines_model());

    let arrive_by = solver.plan_arrive_by(&["S1"], &["S3"], 20250101, second(30_000))?;
    assert_eq!(arrive_by.len(), 1);
    let backward_journey = &arrive_by[0];

    // departing forward at the reverse journey's departure time reaches
    // the destination no later than the reverse journey does
    let depart_after = solver.plan_depart_after(
        &["S1"],
        &["S3"],
        20250101,
        backward_journey.departure_time,
    )?;
    assert_eq!(depart_after.len(), 1);
    assert!(depart_after[0].arrival_time <= backward_journey.arrival_time);
    Ok(())
}

#[test]
fn latest_departure_is_selected() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    // two departures reach S2 in time, the later one must win
    let model = utils::model_builder::ModelBuilder::new(20250101, 20250102)
        .vj("l1:1", |vj| {
            vj.route("L1")
                .st("S1", "08:00:00", "08:00:00")
                .st("S2", "08:05:00", "08:05:00");
        })
        .vj("l1:2", |vj| {
            vj.route("L1")
                .st("S1", "09:00:00", "09:00:00")
                .st("S2", "09:05:00", "09:05:00");
        })
        .build();
    let solver = build_solver(model);

    let journeys = solver.plan_arrive_by(&["S1"], &["S2"], 20250101, second(33_000))?;

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].departure_time, second(32_400));
    Ok(())
}
