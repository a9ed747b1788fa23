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
use peregrine::{BadRequest, Leg};
use utils::model_builder::ModelBuilder;
use utils::{build_solver, second, two_lines_model};

#[test]
fn direct_trip() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let model = ModelBuilder::new(20250101, 20250102)
        .vj("l1:1", |vj| {
            vj.route("L1")
                .st("S1", "08:00:00", "08:00:00")
                .st("S2", "08:05:00", "08:05:00")
                .st("S3", "08:10:00", "08:10:00");
        })
        .build();
    let solver = build_solver(model);

    let journeys = solver.plan_depart_after(&["S1"], &["S3"], 20250101, second(27_000))?;

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(journey.legs.len(), 1);
    assert_eq!(journey.departure_time, second(28_800));
    assert_eq!(journey.arrival_time, second(29_400));
    assert_eq!(journey.nb_of_transfers(), 0);
    let leg = journey.first_vehicle_leg().unwrap();
    assert_eq!(leg.from_stop, "S1");
    assert_eq!(leg.to_stop, "S3");
    assert_eq!(leg.vehicle_journey_id, "l1:1");
    Ok(())
}

#[test]
fn one_transfer() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let solver = build_solver(two_lines_model());

    let journeys = solver.plan_depart_after(&["S1"], &["S3"], 20250101, second(27_000))?;

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
            assert_eq!(first.to_stop, second.from_stop);
        }
        _ => panic!("expected two vehicle legs"),
    }
    Ok(())
}

#[test]
fn interchange_too_short_to_switch() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    // switching at S2 requires 10 minutes, more than L2 allows
    let model = ModelBuilder::new(20250101, 20250102)
        .vj("l1:1", |vj| {
            vj.route("L1")
                .st("S1", "08:00:00", "08:00:00")
                .st("S2", "08:05:00", "08:05:00");
        })
        .vj("l2:1", |vj| {
            vj.route("L2")
                .st("S2", "08:10:00", "08:10:00")
                .st("S3", "08:20:00", "08:20:00");
        })
        .vj("l2:2", |vj| {
            vj.route("L2")
                .st("S2", "08:30:00", "08:30:00")
                .st("S3", "08:40:00", "08:40:00");
        })
        .transfer("S2", "S2", "00:10:00")
        .build();
    let solver = build_solver(model);

    let journeys = solver.plan_depart_after(&["S1"], &["S3"], 20250101, second(27_000))?;

    // the 08:10 departure of L2 cannot be caught, the 08:30 one can
    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].arrival_time, second(31_200));
    Ok(())
}

#[test]
fn foot_transfer_between_stops() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    // S2 and S4 are distinct stops connected by a 3 minutes walk
    let model = ModelBuilder::new(20250101, 20250102)
        .vj("l1:1", |vj| {
            vj.route("L1")
                .st("S1", "08:00:00", "08:00:00")
                .st("S2", "08:05:00", "08:05:00");
        })
        .vj("l2:1", |vj| {
            vj.route("L2")
                .st("S4", "08:15:00", "08:15:00")
                .st("S3", "08:25:00", "08:25:00");
        })
        .transfer("S2", "S4", "00:03:00")
        .build();
    let solver = build_solver(model);

    let journeys = solver.plan_depart_after(&["S1"], &["S3"], 20250101, second(27_000))?;

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(journey.legs.len(), 3);
    assert!(matches!(journey.legs[1], Leg::Walk(_)));
    assert_eq!(journey.arrival_time, second(30_300));
    assert_eq!(journey.nb_of_transfers(), 1);
    Ok(())
}

#[test]
fn unknown_stops_are_ignored() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let solver = build_solver(two_lines_model());

    // an unknown origin among valid ones is dropped
    let journeys =
        solver.plan_depart_after(&["S1", "XX"], &["S3"], 20250101, second(27_000))?;
    assert_eq!(journeys.len(), 1);

    // a request with no valid origin at all is reported
    let error = solver
        .plan_depart_after(&["XX"], &["S3"], 20250101, second(27_000))
        .unwrap_err();
    assert_eq!(error, BadRequest::NoValidOrigin);

    let error = solver
        .plan_depart_after(&["S1"], &["YY"], 20250101, second(27_000))
        .unwrap_err();
    assert_eq!(error, BadRequest::NoValidDestination);
    Ok(())
}

#[test]
fn no_journey_is_not_an_error() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let solver = build_solver(two_lines_model());

    // S3 only ever receives vehicles, nothing leaves it
    let journeys = solver.plan_depart_after(&["S3"], &["S1"], 20250101, second(27_000))?;
    assert!(journeys.is_empty());
    Ok(())
}

#[test]
fn round_times_never_beat_best_times() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let solver = build_solver(two_lines_model());
    let scan = solver.scan_depart_after(&[("S1", second(27_000))], 20250101)?;

    for stop_id in ["S1", "S2", "S3"] {
        let stop = solver.data().stop_by_id(stop_id).unwrap();
        for round in 1..scan.nb_of_rounds() {
            if let Some(round_time) = scan.time_at_round(stop, round) {
                assert!(round_time >= scan.best_time(stop).unwrap());
            }
        }
    }
    Ok(())
}
