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
use axum::{body::{to_bytes, Body}, http::{Request, StatusCode}, Router};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;
use odin_common::datetime::{format_at_offset, secs};
use odin_firewatch::{
    cache::HotspotCache,
    errors::OdinFirewatchError,
    firms::{HotspotFetcher, HotspotSource},
    merge::MergeConfig,
    payload::HotspotPayload,
    web::{build_router, FirewatchState}
};

fn router_for (sources: &[Arc<FakeSource>])->Router {
    let sources: Vec<Arc<dyn HotspotSource>> = sources.iter().map( |s| s.clone() as Arc<dyn HotspotSource>).collect();
    let cache = Arc::new( HotspotCache::new( HotspotFetcher::new( sources, secs(10)), MergeConfig::default()));
    build_router( Arc::new( FirewatchState::new( cache, biobio(), 1, -3)))
}

async fn get_json (router: &Router, uri: &str)->(StatusCode,Value) {
    let response = router.clone().oneshot( Request::builder().uri(uri).body( Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes( response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice( &bytes).unwrap())
}

#[tokio::test]
async fn test_fires() {
    let viirs = FakeSource::new( "VIIRS", 375.0, Response::Fail);
    let modis = FakeSource::new( "MODIS", 1000.0, Response::Csv( fixture(MODIS_CSV)));
    let router = router_for( &[viirs.clone(), modis.clone()]);

    // nothing cached yet
    let (status, json) = get_json( &router, "/api/fires/cached").await;
    assert_eq!( status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!( json["count"], 0);
    assert!( json["error"].is_string());

    viirs.set_response( Response::Csv( fixture(VIIRS_CSV)));
    let (status, json) = get_json( &router, "/api/fires").await;
    println!("{}", serde_json::to_string_pretty(&json).unwrap());
    assert_eq!( status, StatusCode::OK);
    assert_eq!( json["count"], 4);
    assert_eq!( json["stale"], false);
    assert!( json.get("error").is_none());
    assert!( json.get("warning").is_none());

    let first = &json["hotspots"][0];
    assert_eq!( first["latitude"], -37.5001);
    assert_eq!( first["longitude"], -72.1002);
    assert!( first.get("lat").is_none());
    assert!( first.get("lon").is_none());
    assert_eq!( first["acquired_at"], "2025-01-15T04:38:00Z");
    assert_eq!( first["acquired_local"], "2025-01-15 01:38");
    assert_eq!( first["confidence"], "high");
    assert_eq!( first["daynight"], "night");
    assert!( first["hours_ago"].as_f64().unwrap() > 0.0);

    // upstream goes down, we keep serving the last set
    viirs.set_response( Response::Fail);
    modis.set_response( Response::Fail);
    let (status, json) = get_json( &router, "/api/fires").await;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( json["count"], 4);
    assert_eq!( json["stale"], true);

    let fetched_at: DateTime<Utc> = serde_json::from_value( json["fetched_at"].clone()).unwrap();
    let warning = json["warning"].as_str().unwrap();
    println!("warning: {warning}");
    assert_eq!( warning, format!("hotspot sources unavailable, using cached data from {}", format_at_offset( &fetched_at, -3)));

    let (_, json) = get_json( &router, "/api/fires/cached").await;
    assert_eq!( json["stale"], true);
    assert!( json["warning"].is_string());

    // clients can read back what we served
    let payload: HotspotPayload = serde_json::from_value( json).unwrap();
    let hotspots = payload.to_hotspot_set();
    assert_eq!( hotspots.len(), 4);
    assert_eq!( hotspots[1].instrument, "MODIS");
}

#[tokio::test]
async fn test_window() {
    let viirs = FakeSource::new( "VIIRS", 375.0, Response::Csv( fixture(VIIRS_CSV)));
    let router = router_for( &[viirs]);

    let (status, _) = get_json( &router, "/api/fires/window").await;
    assert_eq!( status, StatusCode::SERVICE_UNAVAILABLE);

    get_json( &router, "/api/fires").await;

    // the fixture hotspots are older than any window ending now, but the trail goes back to all of them
    let (status, json) = get_json( &router, "/api/fires/window?span=48&slider=150&trail=true").await;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( json["scrub"]["slider_value"], 100.0);
    assert_eq!( json["scrub"]["time_window_hours"], 48.0);
    assert_eq!( json["count"], 3);
    assert_eq!( json["heat"].as_array().unwrap().len(), 3);
    assert_eq!( json["hotspots"].as_array().unwrap().len(), 3);

    let (_, json) = get_json( &router, "/api/fires/window?slider=100").await;
    assert_eq!( json["count"], 0);
}

#[tokio::test]
async fn test_unavailable() {
    let state = FirewatchState::unavailable( OdinFirewatchError::MissingMapKey, biobio(), -3);
    let router = build_router( Arc::new(state));

    for uri in ["/api/fires", "/api/fires/cached", "/api/fires/window"] {
        let (status, json) = get_json( &router, uri).await;
        assert_eq!( status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!( json["error"], "MAP_KEY not configured");
        assert_eq!( json["count"], 0);
        assert_eq!( json["hotspots"].as_array().unwrap().len(), 0);
    }
}
