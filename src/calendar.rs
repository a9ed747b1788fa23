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

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

/// A calendar date in compact `YYYYMMDD` form.
/// Compact dates compare with plain integer ordering and
/// can serve as map keys without allocation.
pub type CompactDate = u32;

/// Day of week, Sunday = 0 .. Saturday = 6.
pub type Weekday = u8;

pub fn to_naive_date(date: CompactDate) -> Option<NaiveDate> {
    let year = (date / 10_000) as i32;
    let month = (date / 100) % 100;
    let day = date % 100;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn from_naive_date(date: NaiveDate) -> CompactDate {
    (date.year() as u32) * 10_000 + date.month() * 100 + date.day()
}

pub fn weekday_of(date: NaiveDate) -> Weekday {
    date.weekday().num_days_from_sunday() as Weekday
}

/// Describes on which calendar dates a vehicle journey operates.
///
/// The weekday pattern applies between `start_date` and `end_date`
/// (both included). Exception dates override the pattern :
/// an entry with value `true` adds service on that date,
/// an entry with value `false` removes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub start_date: CompactDate,
    pub end_date: CompactDate,
    pub week_pattern: [bool; 7],
    pub exceptions: HashMap<CompactDate, bool>,
}

impl Service {
    pub fn weekly(
        start_date: CompactDate,
        end_date: CompactDate,
        week_pattern: [bool; 7],
    ) -> Self {
        Self {
            start_date,
            end_date,
            week_pattern,
            exceptions: HashMap::new(),
        }
    }

    /// A service running exactly on the given dates, with no weekday rule.
    pub fn from_dates(dates: &[CompactDate]) -> Self {
        let start_date = dates.iter().min().copied().unwrap_or(0);
        let end_date = dates.iter().max().copied().unwrap_or(0);
        Self {
            start_date,
            end_date,
            week_pattern: [false; 7],
            exceptions: dates.iter().map(|date| (*date, true)).collect(),
        }
    }

    pub fn include(mut self, date: CompactDate) -> Self {
        self.exceptions.insert(date, true);
        self
    }

    pub fn exclude(mut self, date: CompactDate) -> Self {
        self.exceptions.insert(date, false);
        self
    }

    pub fn runs_on(&self, date: CompactDate, weekday: Weekday) -> bool {
        if let Some(included) = self.exceptions.get(&date) {
            return *included;
        }
        self.start_date <= date
            && date <= self.end_date
            && self.week_pattern[usize::from(weekday % 7)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-01-01 is a wednesday
    const WEDNESDAY: Weekday = 3;
    const THURSDAY: Weekday = 4;

    #[test]
    fn weekday_rule() {
        let mut week_pattern = [false; 7];
        week_pattern[usize::from(WEDNESDAY)] = true;
        let service = Service::weekly(20250101, 20250131, week_pattern);

        assert!(service.runs_on(20250101, WEDNESDAY));
        assert!(!service.runs_on(20250102, THURSDAY));
        // outside the validity period
        assert!(!service.runs_on(20250205, WEDNESDAY));
    }

    #[test]
    fn exceptions_override_weekday_rule() {
        let mut week_pattern = [false; 7];
        week_pattern[usize::from(WEDNESDAY)] = true;
        let service = Service::weekly(20250101, 20250131, week_pattern)
            .exclude(20250108)
            .include(20250102);

        assert!(!service.runs_on(20250108, WEDNESDAY));
        assert!(service.runs_on(20250102, THURSDAY));
    }

    #[test]
    fn date_list_service() {
        let service = Service::from_dates(&[20250101, 20250103]);
        assert!(service.runs_on(20250101, WEDNESDAY));
        assert!(!service.runs_on(20250102, THURSDAY));
    }

    #[test]
    fn compact_date_round_trip() {
        let date = to_naive_date(20250101).unwrap();
        assert_eq!(from_naive_date(date), 20250101);
        assert_eq!(weekday_of(date), WEDNESDAY);
        assert!(to_naive_date(20251301).is_none());
    }
}
