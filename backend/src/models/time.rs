//! SAST civil time conversion.
//!
//! Exam times are entered in South Africa Standard Time and stored in UTC.
//! Conversion goes through the IANA `Africa/Johannesburg` zone; the legacy
//! hour-shift arithmetic is still available for databases written by it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Exam local time zone.
pub const SAST: Tz = chrono_tz::Africa::Johannesburg;

/// Hours SAST is ahead of UTC.
pub const SAST_UTC_OFFSET_HOURS: i64 = 2;

/// Signed offset constant used by the legacy conversion.
pub const LEGACY_SAST_OFFSET_HOURS: i64 = -2;

/// How local SAST times are mapped onto stored UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OffsetConvention {
    /// Named-zone conversion: 09:00 SAST is stored as 07:00Z.
    #[default]
    Iana,
    /// Legacy arithmetic: `local - LEGACY_SAST_OFFSET_HOURS`, so 09:00 SAST is stored as 11:00Z.
    LegacyInverted,
}

impl FromStr for OffsetConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "iana" => Ok(Self::Iana),
            "legacy-inverted" | "legacy" => Ok(Self::LegacyInverted),
            _ => Err(format!("Unknown offset convention: {}", s)),
        }
    }
}

impl fmt::Display for OffsetConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iana => f.write_str("iana"),
            Self::LegacyInverted => f.write_str("legacy-inverted"),
        }
    }
}

/// Pure converter between SAST civil time and UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SastClock {
    convention: OffsetConvention,
}

impl SastClock {
    pub fn new(convention: OffsetConvention) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> OffsetConvention {
        self.convention
    }

    /// Convert a SAST civil time to a UTC instant.
    pub fn local_to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        match self.convention {
            OffsetConvention::Iana => match SAST.from_local_datetime(&local).earliest() {
                Some(zoned) => zoned.with_timezone(&Utc),
                // Only reachable for the 1940s DST gaps in the zone history.
                None => Utc.from_utc_datetime(&(local - TimeDelta::hours(SAST_UTC_OFFSET_HOURS))),
            },
            OffsetConvention::LegacyInverted => {
                Utc.from_utc_datetime(&(local - TimeDelta::hours(LEGACY_SAST_OFFSET_HOURS)))
            }
        }
    }

    /// Convert a stored UTC instant back to SAST civil time.
    pub fn utc_to_local(&self, utc: Option<DateTime<Utc>>) -> Option<NaiveDateTime> {
        let utc = utc?;
        Some(match self.convention {
            OffsetConvention::Iana => utc.with_timezone(&SAST).naive_local(),
            OffsetConvention::LegacyInverted => {
                utc.naive_utc() + TimeDelta::hours(LEGACY_SAST_OFFSET_HOURS)
            }
        })
    }

    /// Render a stored instant as SAST `HH:MM`.
    pub fn local_hhmm(&self, utc: DateTime<Utc>) -> String {
        self.utc_to_local(Some(utc))
            .map(|local| local.format("%H:%M").to_string())
            .unwrap_or_default()
    }
}

/// Midnight UTC of a calendar date, the stored form of `examDate`.
pub fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Midnight UTC `days` after the UTC calendar date of `now`.
pub fn utc_midnight_after(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    utc_midnight(now.date_naive()) + TimeDelta::days(days)
}
