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

//! the process wide hotspot cache. It holds at most one committed [`CacheEntry`], which is only ever replaced as a
//! whole: by a new entry after a successful refresh, or by a stale copy (sharing the same [`HotspotSet`]) after
//! a failed one. Readers get an `Arc` snapshot and never observe a partially merged set.

use std::{sync::{Arc, atomic::{AtomicU64, Ordering}}, time::Duration};
use arc_swap::ArcSwapOption;
use chrono::{DateTime,Utc};
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle, time::{interval_at, Instant, MissedTickBehavior}};
use tracing::{debug, error, info, warn};
use odin_common::{datetime::utc_now, geo::GeoRect};
use crate::{
    errors::{OdinFirewatchError, Result},
    firms::HotspotFetcher,
    hotspot::HotspotSet,
    merge::{merge_sources, MergeConfig}
};

#[derive(Debug,Clone,Serialize)]
pub struct CacheEntry {
    pub hotspots: Arc<HotspotSet>,
    pub fetched_at: DateTime<Utc>,
    pub is_stale: bool,    // set if the last refresh failed and we are re-using this set
    pub generation: u64,   // incremented with each committed set
}

pub struct HotspotCache {
    fetcher: HotspotFetcher,
    merge_config: MergeConfig,

    current: ArcSwapOption<CacheEntry>,
    refresh_lock: Mutex<()>,   // single flight - there is at most one upstream round trip in progress
    n_refreshes: AtomicU64,    // completed refresh attempts (successful or not)
    n_commits: AtomicU64,
}

impl HotspotCache {
    pub fn new (fetcher: HotspotFetcher, merge_config: MergeConfig)->Self {
        HotspotCache {
            fetcher,
            merge_config,
            current: ArcSwapOption::empty(),
            refresh_lock: Mutex::new(()),
            n_refreshes: AtomicU64::new(0),
            n_commits: AtomicU64::new(0),
        }
    }

    /// the current entry, or [`OdinFirewatchError::NoDataAvailable`] if no refresh has succeeded yet
    pub fn read (&self)->Result<Arc<CacheEntry>> {
        self.current.load_full().ok_or( OdinFirewatchError::NoDataAvailable)
    }

    pub fn n_refreshes (&self)->u64 { self.n_refreshes.load( Ordering::Acquire) }

    /// fetch and merge all sources, then commit the result.
    /// If all sources fail we fall back to the previous entry (marked as stale) or report `NoDataAvailable` if
    /// there is none. Callers that arrive while another refresh is in flight wait for it and get its result
    /// instead of starting another upstream round trip
    pub async fn refresh (&self, region: &GeoRect, n_days: u32)->Result<Arc<CacheEntry>> {
        let seen = self.n_refreshes.load( Ordering::Acquire);
        let _guard = self.refresh_lock.lock().await;

        if self.n_refreshes.load( Ordering::Acquire) != seen {
            debug!("coalescing refresh request with completed refresh");
            return self.read()
        }

        let results = self.fetcher.fetch_all( region, n_days).await;
        let res = match merge_sources( &results, region, &self.merge_config) {
            Ok(hotspots) => Ok( self.commit( hotspots)),
            Err(e) => self.fall_back( e)
        };

        self.n_refreshes.fetch_add( 1, Ordering::Release);
        res
    }

    fn commit (&self, hotspots: HotspotSet)->Arc<CacheEntry> {
        let generation = self.n_commits.fetch_add( 1, Ordering::AcqRel) + 1;
        let entry = Arc::new( CacheEntry { hotspots: Arc::new(hotspots), fetched_at: utc_now(), is_stale: false, generation });
        self.current.store( Some(entry.clone()));

        info!("committed {} hotspots (generation {})", entry.hotspots.len(), generation);
        entry
    }

    fn fall_back (&self, e: OdinFirewatchError)->Result<Arc<CacheEntry>> {
        match self.current.load_full() {
            Some(prev) => {
                warn!("{}, serving cached hotspots from {} (generation {})", e, prev.fetched_at, prev.generation);
                let stale = Arc::new( CacheEntry { is_stale: true, ..(*prev).clone() });
                self.current.store( Some(stale.clone()));
                Ok(stale)
            }
            None => {
                error!("{}, no cached hotspots available", e);
                Err( OdinFirewatchError::NoDataAvailable)
            }
        }
    }
}

/// spawn a task that refreshes `cache` every `interval`, starting one interval from now
pub fn spawn_refresh_task (cache: Arc<HotspotCache>, region: GeoRect, n_days: u32, interval: Duration)->JoinHandle<()> {
    tokio::spawn( async move {
        let mut timer = interval_at( Instant::now() + interval, interval);
        timer.set_missed_tick_behavior( MissedTickBehavior::Delay);

        loop {
            timer.tick().await;
            if let Err(e) = cache.refresh( &region, n_days).await {
                warn!("periodic refresh failed: {}", e);
            }
        }
    })
}
