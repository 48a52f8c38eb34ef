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

//! retrieval of near-realtime hotspots from NASA's Fire Information for Resource Management System (FIRMS).
//! see https://firms.modaps.eosdis.nasa.gov/api/area/ for available data sources and the area API

use std::{env, sync::Arc, time::Duration};
use serde::{Serialize,Deserialize};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use tracing::{debug, info, warn};
use odin_common::{geo::GeoRect, net::get_text};
use crate::{
    errors::{OdinFirewatchError, Result},
    hotspot::{read_raw_hotspots, RawBatch}
};

pub const MAP_KEY_ENV: &'static str = "FIRMS_MAP_KEY";

#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct FirmsConfig {
    pub base_url: String,
    pub map_key: String,  // keep this private - it is rate limited. If empty we fall back to $FIRMS_MAP_KEY
    pub sources: Vec<FirmsSourceConfig>,
}

impl Default for FirmsConfig {
    fn default()->Self {
        FirmsConfig {
            base_url: "https://firms.modaps.eosdis.nasa.gov".to_string(),
            map_key: String::new(),
            sources: vec![
                FirmsSourceConfig::new( "VIIRS_NOAA20_NRT", 375.0),
                FirmsSourceConfig::new( "VIIRS_SNPP_NRT", 375.0),
                FirmsSourceConfig::new( "MODIS_NRT", 1000.0),
            ]
        }
    }
}

impl FirmsConfig {
    pub fn resolve_map_key (&self)->Result<String> {
        if !self.map_key.trim().is_empty() {
            Ok( self.map_key.trim().to_string() )
        } else {
            match env::var(MAP_KEY_ENV) {
                Ok(key) if !key.trim().is_empty() => Ok( key.trim().to_string() ),
                _ => Err( OdinFirewatchError::MissingMapKey)
            }
        }
    }
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct FirmsSourceConfig {
    pub name: String,       // FIRMS source name, e.g. "VIIRS_SNPP_NRT"
    pub resolution_m: f64,  // nominal pixel size at nadir - smaller is better
}

impl FirmsSourceConfig {
    pub fn new (name: impl ToString, resolution_m: f64)->Self {
        FirmsSourceConfig { name: name.to_string(), resolution_m }
    }
}

/// abstraction of an upstream hotspot feed that returns FIRMS compatible CSV text
#[async_trait]
pub trait HotspotSource: Send + Sync {
    fn name (&self)->&str;

    /// nominal spatial resolution in meters, used to break dedup ties
    fn resolution_m (&self)->f64;

    async fn fetch_csv (&self, region: &GeoRect, n_days: u32)->Result<String>;
}

/* #region FIRMS area API source *****************************************************************************/

pub struct FirmsSource {
    client: Client,
    base_url: String,
    map_key: String,
    config: FirmsSourceConfig,
    timeout: Duration,
}

impl FirmsSource {
    pub fn new (client: Client, base_url: &str, map_key: &str, config: FirmsSourceConfig, timeout: Duration)->Self {
        FirmsSource { client, base_url: base_url.trim_end_matches('/').to_string(), map_key: map_key.to_string(), config, timeout }
    }

    /// according to https://firms.modaps.eosdis.nasa.gov/api/area/
    ///   [BASE_URL]/api/area/csv/[MAP_KEY]/[SOURCE]/[AREA_COORDINATES]/[DAY_RANGE]
    ///    e.g. /api/area/csv/0123456789abcdef/VIIRS_SNPP_NRT/-73.5,-38.5,-71,-36/1
    /// Only full day ranges (1-10) are supported, i.e. consecutive downloads within a day do overlap
    pub fn request_url (&self, region: &GeoRect, n_days: u32)->String {
        format!( "{}/api/area/csv/{}/{}/{}/{}", self.base_url, self.map_key, self.config.name, region.wsen_spec(), n_days.clamp(1,10))
    }
}

#[async_trait]
impl HotspotSource for FirmsSource {
    fn name (&self)->&str { self.config.name.as_str() }

    fn resolution_m (&self)->f64 { self.config.resolution_m }

    async fn fetch_csv (&self, region: &GeoRect, n_days: u32)->Result<String> {
        let url = self.request_url( region, n_days);
        debug!("requesting {} hotspots for {}", self.config.name, region);
        Ok( get_text( &self.client, &url, self.timeout).await? )
    }
}

/* #endregion FIRMS area API source */

/* #region fan-out retrieval ********************************************************************************/

#[derive(Debug)]
pub enum SourceOutcome {
    Fetched(RawBatch),
    Failed(OdinFirewatchError)
}

/// the tagged result of one source retrieval within a refresh cycle
#[derive(Debug)]
pub struct SourceResult {
    pub source_idx: usize,  // position in the configured source list
    pub source_name: String,
    pub resolution_m: f64,
    pub outcome: SourceOutcome,
}

impl SourceResult {
    pub fn is_ok (&self)->bool { matches!( self.outcome, SourceOutcome::Fetched(_)) }
}

/// retrieves raw hotspot batches from all configured sources concurrently. Each source call carries its own
/// timeout, failure of one source does not affect the others
pub struct HotspotFetcher {
    sources: Vec<Arc<dyn HotspotSource>>,
    timeout: Duration,
}

impl HotspotFetcher {
    pub fn new (sources: Vec<Arc<dyn HotspotSource>>, timeout: Duration)->Self {
        HotspotFetcher { sources, timeout }
    }

    /// create a fetcher with a [`FirmsSource`] for each configured FIRMS source (in config order)
    pub fn from_config (config: &FirmsConfig, timeout: Duration)->Result<Self> {
        let map_key = config.resolve_map_key()?;
        let client = Client::new();
        let sources = config.sources.iter().map( |sc| {
            Arc::new( FirmsSource::new( client.clone(), &config.base_url, &map_key, sc.clone(), timeout)) as Arc<dyn HotspotSource>
        }).collect();

        Ok( HotspotFetcher::new( sources, timeout) )
    }

    pub fn source_names (&self)->Vec<&str> {
        self.sources.iter().map( |s| s.name()).collect()
    }

    pub fn len (&self)->usize { self.sources.len() }

    /// results are in source list order, regardless of completion order
    pub async fn fetch_all (&self, region: &GeoRect, n_days: u32)->Vec<SourceResult> {
        let futs = self.sources.iter().enumerate().map( |(source_idx,source)| async move {
            let outcome = match tokio::time::timeout( self.timeout, source.fetch_csv( region, n_days)).await {
                Ok(Ok(text)) => match read_raw_hotspots( text.as_bytes()) {
                    Ok(batch) => {
                        if batch.n_malformed > 0 {
                            warn!("dropped {} malformed records from {}", batch.n_malformed, source.name());
                        }
                        info!("retrieved {} records from {}", batch.records.len(), source.name());
                        SourceOutcome::Fetched(batch)
                    }
                    Err(e) => SourceOutcome::Failed( OdinFirewatchError::source_unavailable( source.name(), e))
                }
                Ok(Err(e)) => SourceOutcome::Failed( OdinFirewatchError::source_unavailable( source.name(), e)),
                Err(_) => SourceOutcome::Failed( OdinFirewatchError::source_unavailable( source.name(), format!("timeout after {:?}", self.timeout)))
            };

            if let SourceOutcome::Failed(e) = &outcome {
                warn!("{}", e);
            }

            SourceResult { source_idx, source_name: source.name().to_string(), resolution_m: source.resolution_m(), outcome }
        });

        join_all(futs).await
    }
}

/* #endregion fan-out retrieval */
