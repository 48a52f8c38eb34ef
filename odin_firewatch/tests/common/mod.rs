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

#![allow(unused)]

// test support shared by the odin_firewatch integration tests

use std::{fs, sync::{Arc, Mutex, atomic::{AtomicUsize, Ordering}}, time::Duration};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use odin_common::{datetime::hours_before, geo::GeoRect};
use odin_firewatch::{
    errors::{OdinFirewatchError, Result},
    firms::{HotspotSource, SourceOutcome, SourceResult},
    hotspot::{read_raw_hotspots, DayNight, Hotspot, HotspotConfidence}
};

pub const VIIRS_CSV: &str = "tests/data/viirs_biobio.csv";
pub const MODIS_CSV: &str = "tests/data/modis_biobio.csv";

pub const CSV_HEADER: &str = "latitude,longitude,bright_ti4,scan,track,acq_date,acq_time,satellite,instrument,confidence,version,bright_ti5,frp,daynight";

pub fn biobio()->GeoRect { GeoRect::from_wsen( -73.5, -38.5, -71.0, -36.0) }

pub fn fixture (path: &str)->String {
    fs::read_to_string(path).unwrap()
}

/// a single row CSV response
pub fn csv_record (lat: f64, lon: f64, frp: f64, confidence: &str, satellite: &str, instrument: &str)->String {
    format!("{CSV_HEADER}\n{lat},{lon},330.0,0.4,0.4,2025-01-15,1200,{satellite},{instrument},{confidence},2.0NRT,290.0,{frp},D\n")
}

pub fn fetched (source_idx: usize, source_name: &str, resolution_m: f64, csv: &str)->SourceResult {
    let batch = read_raw_hotspots( csv.as_bytes()).unwrap();
    SourceResult { source_idx, source_name: source_name.to_string(), resolution_m, outcome: SourceOutcome::Fetched(batch) }
}

pub fn failed (source_idx: usize, source_name: &str)->SourceResult {
    let err = OdinFirewatchError::source_unavailable( source_name, "connection refused");
    SourceResult { source_idx, source_name: source_name.to_string(), resolution_m: 375.0, outcome: SourceOutcome::Failed(err) }
}

pub fn reference_time()->DateTime<Utc> {
    Utc.with_ymd_and_hms( 2025, 1, 15, 18, 0, 0).unwrap()
}

/// a hotspot that was acquired `hours_ago` before `now`
pub fn hotspot_at (lat: f64, lon: f64, frp: f64, hours_ago: f64, now: &DateTime<Utc>)->Hotspot {
    Hotspot {
        latitude: lat,
        longitude: lon,
        acquired_at: hours_before( now, hours_ago),
        frp,
        confidence: HotspotConfidence::Nominal,
        satellite: "N20".to_string(),
        instrument: "VIIRS".to_string(),
        daynight: DayNight::Day
    }
}

#[derive(Debug,Clone)]
pub enum Response {
    Csv(String),
    DelayedCsv(Duration,String),
    Fail,
    Hang,
}

/// in-process stand-in for a FIRMS source. Its response can be switched between refreshes
pub struct FakeSource {
    name: String,
    resolution_m: f64,
    response: Mutex<Response>,
    n_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new (name: &str, resolution_m: f64, response: Response)->Arc<Self> {
        Arc::new( FakeSource { name: name.to_string(), resolution_m, response: Mutex::new(response), n_calls: AtomicUsize::new(0) })
    }

    pub fn set_response (&self, response: Response) {
        *self.response.lock().unwrap() = response;
    }

    pub fn n_calls (&self)->usize { self.n_calls.load( Ordering::SeqCst) }
}

#[async_trait]
impl HotspotSource for FakeSource {
    fn name (&self)->&str { &self.name }

    fn resolution_m (&self)->f64 { self.resolution_m }

    async fn fetch_csv (&self, _region: &GeoRect, _n_days: u32)->Result<String> {
        self.n_calls.fetch_add( 1, Ordering::SeqCst);
        let response = self.response.lock().unwrap().clone();

        match response {
            Response::Csv(text) => Ok(text),
            Response::DelayedCsv(delay,text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            Response::Fail => Err( OdinFirewatchError::OpFailedError( "503 Service Unavailable".to_string())),
            Response::Hang => std::future::pending().await
        }
    }
}
