/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::time::Duration;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Serializer, Deserializer, Deserialize};
use parse_duration::parse;

// simple Duration ctors that read better in configs and tests
#[inline] pub fn millis (n: u64)->Duration { Duration::from_millis(n) }
#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }
#[inline] pub fn minutes (n: u64)->Duration { Duration::from_secs(n * 60) }
#[inline] pub fn hours (n: u64)->Duration { Duration::from_secs(n * 3600) }

pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// this should be used wherever we might have to use a sim clock instead of wall clock
#[inline]
pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

/// fractional hours from `earlier` to `later` (negative if `later` is before `earlier`)
#[inline]
pub fn hours_between (later: &DateTime<Utc>, earlier: &DateTime<Utc>) -> f64 {
    (*later - *earlier).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// the inverse of [`hours_between`], at millisecond resolution
pub fn hours_before (dt: &DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    *dt - TimeDelta::milliseconds( (hours * MILLIS_PER_HOUR).round() as i64)
}

/// build a `DateTime<Utc>` from a "%Y-%m-%d" date and a "HHMM" time string. Leading zeros of the time string
/// can be omitted ("438" is 04:38). Returns `None` for invalid dates, hours or minutes
pub fn utc_from_date_hhmm (date: &str, hhmm: &str) -> Option<DateTime<Utc>> {
    let hhmm = hhmm.trim();
    if hhmm.is_empty() || hhmm.len() > 4 || !hhmm.bytes().all(|b| b.is_ascii_digit()) { return None }

    let t: u32 = hhmm.parse().ok()?;
    let time = NaiveTime::from_hms_opt( t / 100, t % 100, 0)?;
    let date = NaiveDate::parse_from_str( date.trim(), "%Y-%m-%d").ok()?;

    Some( date.and_time(time).and_utc())
}

/// format given UTC date as local time in a fixed offset zone (e.g. "2025-01-15 14:30").
/// Out of range offsets fall back to UTC
pub fn format_at_offset (dt: &DateTime<Utc>, utc_offset_hours: i32) -> String {
    match FixedOffset::east_opt( utc_offset_hours * 3600) {
        Some(offset) => format!("{}", dt.with_timezone(&offset).format("%Y-%m-%d %H:%M")),
        None => format!("{}", dt.format("%Y-%m-%d %H:%M"))
    }
}

pub fn short_utc_datetime_string (dt: &DateTime<Utc>) -> String {
    format!("{}", dt.format("%Y-%m-%dT%H:%M:%SZ"))
}

//--- support for serde

pub fn ser_short_rfc3339<S: Serializer> (dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>  {
    s.serialize_str( &short_utc_datetime_string(dt))
}

/// deserialize human readable durations such as "30s", "200ms" or "10min"
pub fn deserialize_duration <'a,D>(deserializer: D) -> Result<Duration,D::Error> where D: Deserializer<'a> {
    String::deserialize(deserializer).and_then( |string| {
        parse(string.as_str())
            .map_err( |e| serde::de::Error::custom(format!("{:?}",e)))
    })
}

/// the counterpart of [`deserialize_duration`]
pub fn serialize_duration<S: Serializer> (dur: &Duration, s: S) -> Result<S::Ok, S::Error>  {
    s.serialize_str( &format!("{}ms", dur.as_millis()))
}
