//! Update interval parsing.
//!
//! Accepts the duration strings users write in sensor configuration blocks:
//! `"25ms"`, `"0.5s"`, `"1 min"`, `"01:30:00"` and `"never"`.

use core::fmt;

use embassy_time::Duration;

/// Raw interval value meaning "never poll".
pub const NEVER_MILLIS: u32 = u32::MAX;

/// How often a polling component is updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateInterval {
    /// Poll every `n` milliseconds, `n > 0`.
    Millis(u32),
    /// Never poll on a timer.
    Never,
}

impl UpdateInterval {
    /// Interval in milliseconds, `None` for [`UpdateInterval::Never`].
    pub const fn as_millis(self) -> Option<u32> {
        match self {
            Self::Millis(ms) => Some(ms),
            Self::Never => None,
        }
    }

    /// Interval as milliseconds with `Never` mapped to [`NEVER_MILLIS`].
    pub const fn to_raw_millis(self) -> u32 {
        match self {
            Self::Millis(ms) => ms,
            Self::Never => NEVER_MILLIS,
        }
    }

    pub fn as_duration(self) -> Option<Duration> {
        self.as_millis().map(|ms| Duration::from_millis(u64::from(ms)))
    }
}

impl fmt::Display for UpdateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millis(ms) => write!(f, "{ms}ms"),
            Self::Never => f.write_str("never"),
        }
    }
}

/// Reasons a duration string is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DurationError {
    /// Nothing but whitespace.
    Empty,
    /// The numeric part could not be parsed.
    InvalidNumber,
    /// A non-zero number without a unit, e.g. `"25"`.
    MissingUnit,
    /// The unit suffix is not a known time unit.
    UnknownUnit,
    /// Not a whole number of milliseconds.
    SubMillisecond,
    /// The interval is zero.
    NotPositive,
    /// The interval does not fit in `u32` milliseconds.
    Overflow,
}

impl fmt::Display for DurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Empty => "empty duration",
            Self::InvalidNumber => "invalid number in duration",
            Self::MissingUnit => "duration has no time unit (did you mean e.g. \"25ms\"?)",
            Self::UnknownUnit => "unknown time unit",
            Self::SubMillisecond => "maximum precision is milliseconds",
            Self::NotPositive => "interval must be greater than zero",
            Self::Overflow => "interval is too long",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for DurationError {}

const US_PER_MS: u128 = 1_000;
const US_PER_S: u128 = 1_000_000;

// Long fraction strings would only add digits below microsecond resolution.
const MAX_FRACTION_DIGITS: usize = 9;

fn unit_micros(unit: &str) -> Option<u128> {
    let us = match unit {
        "us" | "microseconds" => 1,
        "ms" | "milliseconds" => US_PER_MS,
        "s" | "sec" | "seconds" => US_PER_S,
        "min" | "minutes" => 60 * US_PER_S,
        "h" | "hours" => 3_600 * US_PER_S,
        "d" | "days" => 86_400 * US_PER_S,
        _ => return None,
    };
    Some(us)
}

fn parse_digits(digits: &str) -> Result<u128, DurationError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DurationError::InvalidNumber);
    }
    digits
        .bytes()
        .try_fold(0u128, |acc, b| {
            acc.checked_mul(10)?.checked_add(u128::from(b - b'0'))
        })
        .ok_or(DurationError::Overflow)
}

/// `HH:MM` or `HH:MM:SS`.
fn parse_clock(text: &str) -> Result<u128, DurationError> {
    let mut fields = [0u128; 3];
    let mut count = 0;
    for part in text.split(':') {
        if count == fields.len() {
            return Err(DurationError::InvalidNumber);
        }
        fields[count] = parse_digits(part.trim())?;
        count += 1;
    }
    let [hours, minutes, seconds] = match count {
        2 => [fields[0], fields[1], 0],
        3 => fields,
        _ => return Err(DurationError::InvalidNumber),
    };
    Ok(hours
        .saturating_mul(3_600)
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds)
        .saturating_mul(US_PER_S))
}

/// `<number>[ ]<unit>`, number optionally with a decimal fraction.
fn parse_with_unit(text: &str) -> Result<u128, DurationError> {
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    let unit = unit.trim();

    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (number, ""),
    };
    if fraction.len() > MAX_FRACTION_DIGITS || (whole.is_empty() && fraction.is_empty()) {
        return Err(DurationError::InvalidNumber);
    }
    let whole = if whole.is_empty() { 0 } else { parse_digits(whole)? };
    let fraction_value = if fraction.is_empty() { 0 } else { parse_digits(fraction)? };

    if unit.is_empty() {
        return Err(if whole == 0 && fraction_value == 0 {
            DurationError::NotPositive
        } else {
            DurationError::MissingUnit
        });
    }
    let per_unit = unit_micros(unit).ok_or(DurationError::UnknownUnit)?;

    let scale = 10u128.pow(fraction.len() as u32);
    let fraction_us = fraction_value * per_unit;
    if fraction_us % scale != 0 {
        return Err(DurationError::SubMillisecond);
    }
    whole
        .checked_mul(per_unit)
        .and_then(|us| us.checked_add(fraction_us / scale))
        .ok_or(DurationError::Overflow)
}

/// Parse an `update_interval` value.
pub fn parse_update_interval(text: &str) -> Result<UpdateInterval, DurationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DurationError::Empty);
    }
    if text.eq_ignore_ascii_case("never") {
        return Ok(UpdateInterval::Never);
    }

    let micros = if text.contains(':') {
        parse_clock(text)?
    } else {
        parse_with_unit(text)?
    };

    if micros % US_PER_MS != 0 {
        return Err(DurationError::SubMillisecond);
    }
    let millis = micros / US_PER_MS;
    if millis == 0 {
        return Err(DurationError::NotPositive);
    }
    if millis >= u128::from(NEVER_MILLIS) {
        return Err(DurationError::Overflow);
    }
    Ok(UpdateInterval::Millis(millis as u32))
}
