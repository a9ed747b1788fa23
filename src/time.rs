use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Duration since midnight on a service day.
/// This corresponds to the "Time" notion found in gtfs stop_times.txt :
/// it may exceed 24h for trips that run past midnight on their service day,
/// and it may become negative when a query is shifted to a later operating day.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct SecondsSinceDayStart {
    seconds: i32,
}

pub const SECONDS_IN_A_DAY: i32 = 24 * 60 * 60;

impl SecondsSinceDayStart {
    pub fn zero() -> Self {
        Self { seconds: 0 }
    }

    /// Worst possible value when smaller is better.
    pub fn max() -> Self {
        Self { seconds: i32::MAX }
    }

    /// Worst possible value when greater is better.
    pub fn min() -> Self {
        Self { seconds: i32::MIN }
    }

    pub const fn from_seconds(seconds: i32) -> Self {
        Self { seconds }
    }

    pub fn total_seconds(&self) -> i32 {
        self.seconds
    }

    pub fn shifted(&self, offset_seconds: i32) -> Self {
        Self {
            seconds: self.seconds + offset_seconds,
        }
    }
}

impl Add<PositiveDuration> for SecondsSinceDayStart {
    type Output = SecondsSinceDayStart;

    fn add(self, rhs: PositiveDuration) -> Self::Output {
        Self {
            seconds: self.seconds + rhs.seconds as i32,
        }
    }
}

impl Sub<PositiveDuration> for SecondsSinceDayStart {
    type Output = SecondsSinceDayStart;

    fn sub(self, rhs: PositiveDuration) -> Self::Output {
        Self {
            seconds: self.seconds - rhs.seconds as i32,
        }
    }
}

impl Display for SecondsSinceDayStart {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.seconds < 0 { "-" } else { "" };
        let abs = self.seconds.unsigned_abs();
        let hours = abs / (60 * 60);
        let minutes = (abs % (60 * 60)) / 60;
        let seconds = abs % 60;
        write!(f, "{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Copy, Ord, PartialOrd, Hash)]
pub struct PositiveDuration {
    pub(crate) seconds: u32,
}

impl PositiveDuration {
    pub fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> PositiveDuration {
        let total_seconds = seconds + 60 * minutes + 60 * 60 * hours;
        PositiveDuration {
            seconds: total_seconds,
        }
    }

    pub const fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    pub fn total_seconds(&self) -> u32 {
        self.seconds
    }
}

impl Display for PositiveDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hours = self.seconds / (60 * 60);
        let minutes_in_secs = self.seconds % (60 * 60);
        let minutes = minutes_in_secs / 60;
        let seconds = minutes_in_secs % 60;
        if hours != 0 {
            write!(f, "{}h{:02}m{:02}s", hours, minutes, seconds)
        } else if minutes != 0 {
            write!(f, "{}m{:02}s", minutes, seconds)
        } else {
            write!(f, "{}s", seconds)
        }
    }
}

impl FromStr for PositiveDuration {
    type Err = TimeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let time = parse_hms(text)?;
        Ok(PositiveDuration {
            seconds: time.seconds as u32,
        })
    }
}

impl serde::Serialize for PositiveDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for PositiveDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text: String = serde::Deserialize::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeError {
    literal: String,
}

impl Display for TimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unable to parse `{}` as a HH:MM:SS time",
            self.literal
        )
    }
}

impl std::error::Error for TimeError {}

fn parse_hms(text: &str) -> Result<SecondsSinceDayStart, TimeError> {
    let error = || TimeError {
        literal: text.to_string(),
    };
    let mut fields = text.split(':');
    let hours: i32 = fields
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(error)?;
    let minutes: i32 = fields
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(error)?;
    let seconds: i32 = fields
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(error)?;
    if fields.next().is_some() {
        return Err(error());
    }
    // hours above 23 are legal : they express post-midnight service
    // on the same operating day
    if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return Err(error());
    }
    Ok(SecondsSinceDayStart {
        seconds: hours * 60 * 60 + minutes * 60 + seconds,
    })
}

/// Parses `HH:MM:SS` literals into [`SecondsSinceDayStart`], memoizing
/// the result. Feeds repeat the same literals hundreds of thousands of
/// times across stop_times, so the cache pays for itself during loading.
#[derive(Debug, Default)]
pub struct TimeParser {
    cache: HashMap<String, SecondsSinceDayStart>,
}

impl TimeParser {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    pub fn parse(&mut self, text: &str) -> Result<SecondsSinceDayStart, TimeError> {
        if let Some(time) = self.cache.get(text) {
            return Ok(*time);
        }
        let time = parse_hms(text)?;
        self.cache.insert(text.to_string(), time);
        Ok(time)
    }
}
