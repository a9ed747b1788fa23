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

pub mod model_builder;

use peregrine::time::SecondsSinceDayStart;
use peregrine::{Config, Model, Solver};

pub fn build_solver(model: Model) -> Solver {
    Solver::new(model, Config::default()).expect("the test feed should be well formed")
}

pub fn second(seconds: i32) -> SecondsSinceDayStart {
    SecondsSinceDayStart::from_seconds(seconds)
}

/// The two-line feed used across the routing tests :
/// L1 runs S1 08:00 -> S2 08:05, L2 runs S2 08:10 -> S3 08:20,
/// and switching trips at S2 requires 120s.
pub fn two_lines_model() -> Model {
    model_builder::ModelBuilder::new(20250101, 20250104)
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
        .transfer("S2", "S2", "00:02:00")
        .build()
}
