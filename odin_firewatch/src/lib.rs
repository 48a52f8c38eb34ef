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

//! ingestion, merging and temporal replay of satellite hotspots (thermal anomaly detections).
//!
//! The data flow is
//! ```text
//!   HotspotSource ──▶ HotspotFetcher ──▶ merge_sources ──▶ HotspotCache ──▶ HotspotPayload ──▶ clients
//!   (per source CSV)   (concurrent)       (dedup)           (stale tolerant)
//!                                                                   └──▶ filter_window ◀── Playback
//! ```
//! Everything right of the cache is a pure function of the committed [`hotspot::HotspotSet`], a reference time
//! and the [`window::ScrubState`].

use std::time::Duration;
use serde::{Serialize,Deserialize};
use odin_common::{datetime::{deserialize_duration, minutes, secs, serialize_duration}, define_load_config, geo::GeoRect};

pub mod errors;
pub mod hotspot;
pub mod firms;
pub mod merge;
pub mod cache;
pub mod window;
pub mod playback;
pub mod payload;
pub mod web;

use firms::FirmsConfig;
use merge::MergeConfig;
use web::ServerConfig;

define_load_config!{}

pub const FIREWATCH_CONFIG: &'static str = "firewatch.ron";
pub const PLAYBACK_CONFIG: &'static str = "playback.ron";

#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct FirewatchConfig {
    pub region: GeoRect,
    pub lookback_days: u32,   // FIRMS day range (1..10)
    pub firms: FirmsConfig,
    #[serde(serialize_with="serialize_duration", deserialize_with="deserialize_duration")]
    pub fetch_timeout: Duration,
    #[serde(serialize_with="serialize_duration", deserialize_with="deserialize_duration")]
    pub refresh_interval: Duration,
    pub merge: MergeConfig,
    pub display_utc_offset_hours: i32,
    pub server: ServerConfig,
}

impl Default for FirewatchConfig {
    fn default()->Self {
        FirewatchConfig {
            region: GeoRect::from_wsen( -73.5, -38.5, -71.0, -36.0), // Biobío
            lookback_days: 1,
            firms: FirmsConfig::default(),
            fetch_timeout: secs(30),
            refresh_interval: minutes(10),
            merge: MergeConfig::default(),
            display_utc_offset_hours: -3,
            server: ServerConfig::default()
        }
    }
}
