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

//! the outbound JSON payload for rendering clients

use std::sync::Arc;
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use odin_common::datetime::{format_at_offset, ser_short_rfc3339, utc_now};
use crate::{
    cache::CacheEntry,
    errors::Result,
    hotspot::{DayNight, Hotspot, HotspotConfidence, HotspotSet}
};

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct HotspotRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub frp: f64,
    pub acquired_at: DateTime<Utc>,
    pub acquired_local: String,  // "%Y-%m-%d %H:%M" at the display offset
    pub hours_ago: f64,          // relative to the payload timestamp
    pub confidence: HotspotConfidence,
    pub satellite: String,
    pub instrument: String,
    pub daynight: DayNight,
}

impl HotspotRecord {
    pub fn new (h: &Hotspot, now: &DateTime<Utc>, utc_offset_hours: i32)->Self {
        HotspotRecord {
            latitude: h.latitude,
            longitude: h.longitude,
            frp: h.frp,
            acquired_at: h.acquired_at,
            acquired_local: format_at_offset( &h.acquired_at, utc_offset_hours),
            hours_ago: round_hours( h.hours_ago(now)),
            confidence: h.confidence,
            satellite: h.satellite.clone(),
            instrument: h.instrument.clone(),
            daynight: h.daynight
        }
    }

    pub fn to_hotspot (&self)->Hotspot {
        Hotspot {
            latitude: self.latitude,
            longitude: self.longitude,
            acquired_at: self.acquired_at,
            frp: self.frp,
            confidence: self.confidence,
            satellite: self.satellite.clone(),
            instrument: self.instrument.clone(),
            daynight: self.daynight
        }
    }
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct HotspotPayload {
    pub count: usize,
    #[serde(serialize_with="ser_short_rfc3339")]
    pub timestamp: DateTime<Utc>,   // when this payload was generated, the reference for hours_ago
    #[serde(default)]
    pub stale: bool,
    #[serde(default, skip_serializing_if="odin_common::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hotspots: Vec<HotspotRecord>,
    #[serde(default, skip_serializing_if="odin_common::is_none")]
    pub warning: Option<String>,    // set if we serve stale data
    #[serde(default, skip_serializing_if="odin_common::is_none")]
    pub error: Option<String>,
}

impl HotspotPayload {
    pub fn from_entry (entry: &CacheEntry, now: DateTime<Utc>, utc_offset_hours: i32)->Self {
        let hotspots: Vec<HotspotRecord> = entry.hotspots.iter().map( |h| HotspotRecord::new( h, &now, utc_offset_hours)).collect();
        let warning = if entry.is_stale {
            Some( format!("hotspot sources unavailable, using cached data from {}", format_at_offset( &entry.fetched_at, utc_offset_hours)))
        } else {
            None
        };

        HotspotPayload {
            count: hotspots.len(),
            timestamp: now,
            stale: entry.is_stale,
            fetched_at: Some(entry.fetched_at),
            hotspots,
            warning,
            error: None
        }
    }

    /// the empty payload we send when there is nothing to serve
    pub fn error (msg: impl ToString)->Self {
        HotspotPayload { count: 0, timestamp: utc_now(), stale: false, fetched_at: None, hotspots: Vec::new(), warning: None, error: Some(msg.to_string()) }
    }

    /// reconstruct the hotspot set (e.g. for replaying a saved payload)
    pub fn to_hotspot_set (&self)->Arc<HotspotSet> {
        Arc::new( HotspotSet::from_unsorted( self.hotspots.iter().map( |r| r.to_hotspot()).collect()))
    }

    pub fn from_json (json: &str)->Result<Self> {
        Ok( serde_json::from_str(json)? )
    }
}

#[inline]
fn round_hours (h: f64)->f64 { (h * 100.0).round() / 100.0 }
