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

mod common;
use common::*;

use std::sync::Arc;
use futures::future::join_all;
use odin_common::datetime::{minutes, secs};
use odin_firewatch::{
    cache::{spawn_refresh_task, HotspotCache},
    errors::OdinFirewatchError,
    firms::{HotspotFetcher, HotspotSource},
    merge::MergeConfig
};

fn cache_for (sources: &[Arc<FakeSource>])->HotspotCache {
    let sources: Vec<Arc<dyn HotspotSource>> = sources.iter().map( |s| s.clone() as Arc<dyn HotspotSource>).collect();
    HotspotCache::new( HotspotFetcher::new( sources, secs(10)), MergeConfig::default())
}

#[tokio::test]
async fn test_cold_start_failure() {
    let viirs = FakeSource::new( "VIIRS", 375.0, Response::Fail);
    let modis = FakeSource::new( "MODIS", 1000.0, Response::Fail);
    let cache = cache_for( &[viirs, modis]);

    assert!( matches!( cache.read(), Err(OdinFirewatchError::NoDataAvailable)));
    assert!( matches!( cache.refresh( &biobio(), 1).await, Err(OdinFirewatchError::NoDataAvailable)));
    assert!( matches!( cache.read(), Err(OdinFirewatchError::NoDataAvailable)));
    assert_eq!( cache.n_refreshes(), 1);
}

#[tokio::test]
async fn test_stale_fallback() {
    let viirs = FakeSource::new( "VIIRS", 375.0, Response::Csv( fixture(VIIRS_CSV)));
    let modis = FakeSource::new( "MODIS", 1000.0, Response::Csv( fixture(MODIS_CSV)));
    let cache = cache_for( &[viirs.clone(), modis.clone()]);

    let fresh = cache.refresh( &biobio(), 1).await.unwrap();
    assert!( !fresh.is_stale);
    assert_eq!( fresh.generation, 1);
    assert_eq!( fresh.hotspots.len(), 4);

    // partial failure still commits a new (smaller) set
    modis.set_response( Response::Fail);
    let partial = cache.refresh( &biobio(), 1).await.unwrap();
    assert!( !partial.is_stale);
    assert_eq!( partial.generation, 2);
    assert_eq!( partial.hotspots.len(), 3);

    // total failure re-uses the last set
    viirs.set_response( Response::Fail);
    let stale = cache.refresh( &biobio(), 1).await.unwrap();
    assert!( stale.is_stale);
    assert_eq!( stale.generation, 2);
    assert_eq!( stale.fetched_at, partial.fetched_at);
    assert!( Arc::ptr_eq( &stale.hotspots, &partial.hotspots));

    let read = cache.read().unwrap();
    assert!( read.is_stale);
    assert!( Arc::ptr_eq( &read.hotspots, &partial.hotspots));

    // recovery
    viirs.set_response( Response::Csv( fixture(VIIRS_CSV)));
    let recovered = cache.refresh( &biobio(), 1).await.unwrap();
    assert!( !recovered.is_stale);
    assert_eq!( recovered.generation, 3);
    assert!( !cache.read().unwrap().is_stale);
}

#[tokio::test(start_paused = true)]
async fn test_coalesced_refresh() {
    let viirs = FakeSource::new( "VIIRS", 375.0, Response::DelayedCsv( secs(1), fixture(VIIRS_CSV)));
    let cache = cache_for( &[viirs.clone()]);
    let region = biobio();

    let results = join_all( (0..5).map( |_| cache.refresh( &region, 1))).await;
    assert_eq!( viirs.n_calls(), 1);
    assert_eq!( cache.n_refreshes(), 1);

    for res in &results {
        let entry = res.as_ref().unwrap();
        assert_eq!( entry.generation, 1);
        assert_eq!( entry.hotspots.len(), 3);
    }

    // a refresh that starts after the previous one completed goes upstream again
    cache.refresh( &region, 1).await.unwrap();
    assert_eq!( viirs.n_calls(), 2);
    assert_eq!( cache.read().unwrap().generation, 2);
}

#[tokio::test(start_paused = true)]
async fn test_periodic_refresh() {
    let viirs = FakeSource::new( "VIIRS", 375.0, Response::Csv( fixture(VIIRS_CSV)));
    let cache = Arc::new( cache_for( &[viirs.clone()]));

    let task = spawn_refresh_task( cache.clone(), biobio(), 1, minutes(10));

    tokio::time::sleep( minutes(5)).await;
    assert_eq!( cache.n_refreshes(), 0); // first refresh is one interval out

    tokio::time::sleep( minutes(6)).await;
    assert_eq!( cache.n_refreshes(), 1);
    assert_eq!( cache.read().unwrap().hotspots.len(), 3);

    tokio::time::sleep( minutes(10)).await;
    assert_eq!( cache.n_refreshes(), 2);

    task.abort();
}
