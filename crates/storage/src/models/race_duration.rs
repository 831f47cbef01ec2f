use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A recorded finishing time, stored as `HH:MM:SS` text in the database.
///
/// Comparison is done on the total number of seconds, so `00:58:10` sorts
/// before `01:02:03` regardless of how the text was padded.
///
/// # Examples
///
/// ```
/// use storage::models::RaceDuration;
///
/// let duration: RaceDuration = "01:02:03".parse().unwrap();
/// assert_eq!(duration.total_seconds(), 3723);
/// assert_eq!(duration.to_string(), "01:02:03");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RaceDuration {
    seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("duration must have the form HH:MM:SS")]
    InvalidFormat,

    #[error("minutes and seconds must be below 60")]
    OutOfRange,
}

impl RaceDuration {
    pub fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    pub fn total_seconds(&self) -> u32 {
        self.seconds
    }

    pub fn hours(&self) -> u32 {
        self.seconds / 3600
    }

    pub fn minutes(&self) -> u32 {
        (self.seconds % 3600) / 60
    }

    pub fn secs(&self) -> u32 {
        self.seconds % 60
    }
}

impl FromStr for RaceDuration {
    type Err = DurationParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.trim().split(':').collect();
        let [hours, minutes, seconds] = parts.as_slice() else {
            return Err(DurationParseError::InvalidFormat);
        };

        let hours = parse_component(hours)?;
        let minutes = parse_component(minutes)?;
        let seconds = parse_component(seconds)?;

        if minutes >= 60 || seconds >= 60 {
            return Err(DurationParseError::OutOfRange);
        }

        hours
            .checked_mul(3600)
            .and_then(|total| total.checked_add(minutes * 60 + seconds))
            .map(Self::from_seconds)
            .ok_or(DurationParseError::OutOfRange)
    }
}

fn parse_component(part: &str) -> Result<u32, DurationParseError> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(DurationParseError::InvalidFormat);
    }

    part.parse().map_err(|_| DurationParseError::OutOfRange)
}

impl fmt::Display for RaceDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.secs()
        )
    }
}
