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

//! the HTTP surface of the hotspot service:
//!   - `GET /api/fires` refreshes the cache (coalesced with concurrent refreshes) and serves the result
//!   - `GET /api/fires/cached` serves the current cache entry without touching the upstream sources
//!   - `GET /api/fires/window?span=<hours>&slider=<0-100>&trail=<bool>` serves the window view for a scrub state
//!
//! All responses are JSON. If there is nothing to serve the payload carries an `error` message and the
//! status is 503, or 500 if the service is not configured to retrieve hotspots at all

use std::{net::SocketAddr, sync::Arc};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router
};
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use odin_common::{datetime::{ser_short_rfc3339, utc_now}, geo::GeoRect};
use crate::{
    cache::{CacheEntry, HotspotCache},
    errors::{OdinFirewatchError, Result},
    payload::HotspotPayload,
    window::{clamp_slider, filter_window, PointLayer, ScrubState, WindowView, DEFAULT_TIME_WINDOW_HOURS, MAX_SLIDER}
};

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct ServerConfig {
    pub sock_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default()->Self {
        ServerConfig { sock_addr: SocketAddr::from( ([127,0,0,1], 5000)) }
    }
}

impl ServerConfig {
    pub fn url (&self)->String { format!("http://{}", self.sock_addr) }
}

/// shared state of all request handlers
pub struct FirewatchState {
    cache: std::result::Result<Arc<HotspotCache>,String>,  // Err if we could not set up the sources
    region: GeoRect,
    n_days: u32,
    utc_offset_hours: i32,
}

impl FirewatchState {
    pub fn new (cache: Arc<HotspotCache>, region: GeoRect, n_days: u32, utc_offset_hours: i32)->Self {
        FirewatchState { cache: Ok(cache), region, n_days, utc_offset_hours }
    }

    /// a state that answers every request with `msg` (e.g. if the FIRMS map key is missing)
    pub fn unavailable (msg: impl ToString, region: GeoRect, utc_offset_hours: i32)->Self {
        FirewatchState { cache: Err(msg.to_string()), region, n_days: 1, utc_offset_hours }
    }
}

pub fn build_router (state: Arc<FirewatchState>)->Router {
    Router::new()
        .route( "/api/fires", get( fires_handler))
        .route( "/api/fires/cached", get( cached_fires_handler))
        .route( "/api/fires/window", get( window_handler))
        .layer( TraceLayer::new_for_http())
        .with_state( state)
}

/// bind to the configured socket address and serve `router` until the server fails
pub async fn run_server (config: &ServerConfig, router: Router)->Result<()> {
    let listener = tokio::net::TcpListener::bind( config.sock_addr).await?;
    info!("serving hotspots on {}", config.url());
    axum::serve( listener, router).await?;
    Ok(())
}

async fn fires_handler (State(state): State<Arc<FirewatchState>>)->Response {
    match &state.cache {
        Ok(cache) => entry_response( cache.refresh( &state.region, state.n_days).await, state.utc_offset_hours),
        Err(msg) => error_response( StatusCode::INTERNAL_SERVER_ERROR, msg)
    }
}

async fn cached_fires_handler (State(state): State<Arc<FirewatchState>>)->Response {
    match &state.cache {
        Ok(cache) => entry_response( cache.read(), state.utc_offset_hours),
        Err(msg) => error_response( StatusCode::INTERNAL_SERVER_ERROR, msg)
    }
}

fn entry_response (res: Result<Arc<CacheEntry>>, utc_offset_hours: i32)->Response {
    match res {
        Ok(entry) => Json( HotspotPayload::from_entry( &entry, utc_now(), utc_offset_hours)).into_response(),
        Err(e) => {
            let status = match e {
                OdinFirewatchError::NoDataAvailable => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR
            };
            error_response( status, &e.to_string())
        }
    }
}

fn error_response (status: StatusCode, msg: &str)->Response {
    warn!("hotspot request failed: {}", msg);
    (status, Json( HotspotPayload::error( msg))).into_response()
}

/* #region window view **************************************************************************************/

#[derive(Debug,Deserialize,Default)]
pub struct WindowQuery {
    pub span: Option<f64>,   // scrubbable time window in hours
    pub slider: Option<f64>, // 0..100
    pub trail: Option<bool>,
}

impl WindowQuery {
    /// this is an input boundary, i.e. we sanitize slider and span values here
    pub fn scrub_state (&self)->ScrubState {
        let span = self.span.filter( |h| h.is_finite() && *h > 0.0).unwrap_or( DEFAULT_TIME_WINDOW_HOURS);
        let slider = clamp_slider( self.slider.unwrap_or( MAX_SLIDER));
        ScrubState::new( span, slider, self.trail.unwrap_or(false))
    }
}

#[derive(Debug,Serialize)]
pub struct WindowPayload<'a> {
    #[serde(serialize_with="ser_short_rfc3339")]
    pub timestamp: DateTime<Utc>,
    pub stale: bool,
    pub scrub: ScrubState,
    pub count: usize,
    pub n_markers: usize,
    pub n_trail: usize,
    pub heat: Vec<(f64,f64,f64)>,
    #[serde(flatten)]
    pub view: WindowView<'a>,
}

impl<'a> WindowPayload<'a> {
    pub fn new (entry: &'a CacheEntry, now: DateTime<Utc>, scrub: ScrubState)->Self {
        let view = filter_window( &entry.hotspots, &now, &scrub);
        WindowPayload {
            timestamp: now,
            stale: entry.is_stale,
            scrub,
            count: view.len(),
            n_markers: view.count_layer( PointLayer::Marker),
            n_trail: view.count_layer( PointLayer::Trail),
            heat: view.heat_points(),
            view
        }
    }
}

async fn window_handler (State(state): State<Arc<FirewatchState>>, Query(query): Query<WindowQuery>)->Response {
    let cache = match &state.cache {
        Ok(cache) => cache,
        Err(msg) => return error_response( StatusCode::INTERNAL_SERVER_ERROR, msg)
    };

    match cache.read() {
        Ok(entry) => Json( WindowPayload::new( &entry, utc_now(), query.scrub_state())).into_response(),
        Err(e) => error_response( StatusCode::SERVICE_UNAVAILABLE, &e.to_string())
    }
}

/* #endregion window view */
