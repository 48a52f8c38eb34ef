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

//! the normalized hotspot (thermal anomaly detection) model and the raw FIRMS CSV record it is derived from.
//! Field descriptions of the raw format are on
//! https://www.earthdata.nasa.gov/data/instruments/viirs/viirs-i-band-375-m-active-fire-data (VIIRS) and
//! https://www.earthdata.nasa.gov/learn/find-data/near-real-time/firms/mcd14dl-nrt (MODIS)

use std::{io, ops::Deref};
use serde::{Serialize,Deserialize};
use chrono::{DateTime,Utc};
use tracing::debug;
use odin_common::{datetime::{hours_between, utc_from_date_hhmm}, geo::{is_valid_latitude, is_valid_longitude}};
use crate::errors::{malformed, op_failed, OdinFirewatchError, Result};

/* #region normalized hotspots ****************************************************************************/

/// ordered detection confidence. Sources either report this categorical (VIIRS: l,n,h) or as
/// a 0-100 percentage (MODIS)
#[derive(Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,Serialize,Deserialize)]
#[serde(rename_all="lowercase")]
pub enum HotspotConfidence {
    Low, Nominal, High
}

impl HotspotConfidence {
    pub const NOMINAL_PERCENT: u32 = 50;
    pub const HIGH_PERCENT: u32 = 80;

    pub fn parse (s: &str)->Option<HotspotConfidence> {
        let s = s.trim();
        if let Ok(pct) = s.parse::<u32>() {
            if pct > 100 { None }
            else if pct >= Self::HIGH_PERCENT { Some(HotspotConfidence::High) }
            else if pct >= Self::NOMINAL_PERCENT { Some(HotspotConfidence::Nominal) }
            else { Some(HotspotConfidence::Low) }
        } else {
            match s.to_ascii_lowercase().as_str() {
                "l" | "low" => Some(HotspotConfidence::Low),
                "n" | "nominal" => Some(HotspotConfidence::Nominal),
                "h" | "high" => Some(HotspotConfidence::High),
                _ => None
            }
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
#[serde(rename_all="lowercase")]
pub enum DayNight {
    Day, Night, Unknown
}

impl DayNight {
    pub fn parse (s: &str)->DayNight {
        match s.trim() {
            "D" | "d" => DayNight::Day,
            "N" | "n" => DayNight::Night,
            _ => DayNight::Unknown
        }
    }
}

/// a single normalized detection. Immutable once created.
/// `hours_ago` is not part of it since it depends on when we look at it
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Hotspot {
    pub latitude: f64,    // WGS84 degrees
    pub longitude: f64,
    pub acquired_at: DateTime<Utc>,
    pub frp: f64,         // fire radiative power in MW
    pub confidence: HotspotConfidence,
    pub satellite: String,
    pub instrument: String,
    pub daynight: DayNight,
}

impl Hotspot {
    /// fractional hours between acquisition and `now`
    #[inline]
    pub fn hours_ago (&self, now: &DateTime<Utc>)->f64 {
        hours_between( now, &self.acquired_at)
    }
}

/// the deduplicated hotspots of one merge cycle, in ascending order of acquisition time
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(transparent)]
pub struct HotspotSet {
    hotspots: Vec<Hotspot>
}

impl HotspotSet {
    /// note this uses a stable sort, i.e. hotspots with the same acquisition time keep their relative order
    pub fn from_unsorted (mut hotspots: Vec<Hotspot>)->Self {
        hotspots.sort_by_key( |h| h.acquired_at);
        HotspotSet { hotspots }
    }

    pub fn empty()->Self { HotspotSet { hotspots: Vec::new() } }

    pub fn as_slice (&self)->&[Hotspot] { &self.hotspots }

    /// acquisition time range covered by this set
    pub fn time_span (&self)->Option<(DateTime<Utc>,DateTime<Utc>)> {
        match (self.hotspots.first(), self.hotspots.last()) {
            (Some(first),Some(last)) => Some( (first.acquired_at, last.acquired_at) ),
            _ => None
        }
    }
}

impl Deref for HotspotSet {
    type Target = [Hotspot];
    fn deref(&self) -> &Self::Target { &self.hotspots }
}

/* #endregion normalized hotspots */

/* #region raw FIRMS records ******************************************************************************/

/// the raw CSV record as it is retrieved from the FIRMS area API. This is the union of VIIRS (bright_ti4/5)
/// and MODIS (brightness/bright_t31) columns
#[derive(Debug,Clone,Deserialize)]
pub struct RawHotspot {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, alias="bright_ti4")]
    pub brightness: Option<f64>,
    #[serde(default)]
    pub scan: Option<f64>,
    #[serde(default)]
    pub track: Option<f64>,
    pub acq_date: String,
    pub acq_time: String, // HHMM, leading zeros might be omitted
    #[serde(default)]
    pub satellite: String,
    #[serde(default)]
    pub instrument: String,
    pub confidence: String, // l|n|h or 0-100
    #[serde(default)]
    pub version: String,
    #[serde(default, alias="bright_ti5")]
    pub bright_t31: Option<f64>,
    pub frp: f64,
    #[serde(default)]
    pub daynight: String,
}

impl RawHotspot {
    /// map into a [`Hotspot`]. Records with out-of-range coordinates, negative or non-finite frp,
    /// unparsable acquisition time or unknown confidence encoding are malformed
    pub fn normalize (&self)->Result<Hotspot> {
        let (lat,lon) = (self.latitude, self.longitude);
        if !is_valid_latitude(lat) || !is_valid_longitude(lon) {
            return Err( malformed!("invalid position {},{}", lat, lon))
        }
        if !self.frp.is_finite() || self.frp < 0.0 {
            return Err( malformed!("invalid frp {}", self.frp))
        }

        let acquired_at = utc_from_date_hhmm( &self.acq_date, &self.acq_time)
            .ok_or_else( || malformed!("invalid acquisition time {} {}", self.acq_date, self.acq_time))?;
        let confidence = HotspotConfidence::parse( &self.confidence)
            .ok_or_else( || malformed!("invalid confidence '{}'", self.confidence))?;

        Ok( Hotspot {
            latitude: lat,
            longitude: lon,
            acquired_at,
            frp: self.frp,
            confidence,
            satellite: self.satellite.trim().to_string(),
            instrument: self.instrument.trim().to_string(),
            daynight: DayNight::parse( &self.daynight)
        })
    }
}

/// columns we cannot do without. A response that lacks any of these is not a hotspot CSV at all
/// (FIRMS replies with plain text messages for invalid keys or exceeded transaction limits)
pub const REQUIRED_COLUMNS: [&'static str; 6] = ["latitude", "longitude", "acq_date", "acq_time", "confidence", "frp"];

/// the readable records of one CSV response
#[derive(Debug,Default)]
pub struct RawBatch {
    pub records: Vec<RawHotspot>,
    pub n_malformed: usize, // rows that could not be deserialized
}

/// parse FIRMS CSV data from `reader`. Rows that fail to deserialize are counted and dropped, but a
/// missing or incomplete header row fails the whole batch
pub fn read_raw_hotspots (reader: impl io::Read)->Result<RawBatch> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS.iter().find( |c| !headers.iter().any( |h| h == **c)) {
        return Err( op_failed!("not a hotspot CSV (no '{}' column)", missing))
    }

    let mut batch = RawBatch::default();
    for res in csv_reader.deserialize::<RawHotspot>() {
        match res {
            Ok(raw) => batch.records.push(raw),
            Err(e) => {
                debug!("dropping malformed CSV row: {}", e);
                batch.n_malformed += 1;
            }
        }
    }

    Ok(batch)
}

/* #endregion raw FIRMS records */
