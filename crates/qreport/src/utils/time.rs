use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Result, anyhow, bail};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

const EPOCH_SECONDS_CUTOFF: i128 = 100_000_000_000;
const EPOCH_MILLIS_CUTOFF: i128 = 100_000_000_000_000;
const EPOCH_MICROS_CUTOFF: i128 = 100_000_000_000_000_000;
const NANOS_PER_MILLI: i128 = 1_000_000;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

#[must_use]
pub fn unix_timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| {
            u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
        })
}

pub fn parse_timestamp_to_unix_ms(raw: &str) -> Result<u64> {
    let candidate = raw.trim();
    if candidate.is_empty() {
        bail!("timestamp input is empty");
    }

    if let Ok(epoch_raw) = candidate.parse::<i128>() {
        return epoch_to_unix_ms(epoch_raw);
    }

    if let Ok(parsed) = OffsetDateTime::parse(candidate, &Rfc3339) {
        return to_unix_ms(parsed);
    }

    bail!("unsupported timestamp format: {candidate}");
}

#[must_use]
pub fn format_unix_ms(timestamp_unix_ms: u64) -> String {
    let dt = utc_datetime(timestamp_unix_ms);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        dt.year(),
        u8::from(dt.month()),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.millisecond()
    )
}

// MM-dd-yy HH-mm-ss
#[must_use]
pub fn format_filename_stamp(timestamp_unix_ms: u64) -> String {
    let dt = utc_datetime(timestamp_unix_ms);
    format!(
        "{:02}-{:02}-{:02} {:02}-{:02}-{:02}",
        u8::from(dt.month()),
        dt.day(),
        dt.year().rem_euclid(100),
        dt.hour(),
        dt.minute(),
        dt.second()
    )
}

#[must_use]
pub fn humanize_duration_seconds(seconds: u64) -> String {
    if seconds < SECONDS_PER_MINUTE {
        return "less than a minute".to_string();
    }
    if seconds < SECONDS_PER_HOUR {
        let minutes = (seconds + SECONDS_PER_MINUTE / 2) / SECONDS_PER_MINUTE;
        return match minutes {
            1 => "1 minute".to_string(),
            60 => "about 1 hour".to_string(),
            _ => format!("{minutes} minutes"),
        };
    }
    if seconds < SECONDS_PER_DAY {
        let hours = (seconds + SECONDS_PER_HOUR / 2) / SECONDS_PER_HOUR;
        return match hours {
            1 => "about 1 hour".to_string(),
            24 => "1 day".to_string(),
            _ => format!("about {hours} hours"),
        };
    }

    let days = (seconds + SECONDS_PER_DAY / 2) / SECONDS_PER_DAY;
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

fn utc_datetime(timestamp_unix_ms: u64) -> OffsetDateTime {
    let nanos = i128::from(timestamp_unix_ms)
        .checked_mul(NANOS_PER_MILLI)
        .unwrap_or(i128::MAX);
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
        .to_offset(UtcOffset::UTC)
}

fn epoch_to_unix_ms(epoch_raw: i128) -> Result<u64> {
    if epoch_raw < 0 {
        bail!("negative epoch values are not supported");
    }

    let epoch_ms = if epoch_raw < EPOCH_SECONDS_CUTOFF {
        epoch_raw.checked_mul(1_000)
    } else if epoch_raw < EPOCH_MILLIS_CUTOFF {
        Some(epoch_raw)
    } else if epoch_raw < EPOCH_MICROS_CUTOFF {
        Some(epoch_raw / 1_000)
    } else {
        Some(epoch_raw / 1_000_000)
    }
    .ok_or_else(|| anyhow!("epoch conversion overflow"))?;

    u64::try_from(epoch_ms).map_err(|_| anyhow!("timestamp exceeds supported unix millisecond range"))
}

fn to_unix_ms(parsed: OffsetDateTime) -> Result<u64> {
    if parsed.unix_timestamp() < 0 {
        bail!("timestamps before 1970-01-01T00:00:00Z are not supported");
    }

    let unix_ms = parsed.unix_timestamp_nanos() / NANOS_PER_MILLI;
    u64::try_from(unix_ms).map_err(|_| anyhow!("timestamp exceeds supported unix millisecond range"))
}
