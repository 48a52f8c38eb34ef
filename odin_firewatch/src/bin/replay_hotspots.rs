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

use std::{fs, sync::Arc};
use anyhow::{anyhow, Result};
use chrono::{DateTime,Utc};
use tracing_subscriber::EnvFilter;
use odin_common::{datetime::utc_now, define_cli};
use odin_firewatch::{
    load_config_or_default, FirewatchConfig, FIREWATCH_CONFIG, PLAYBACK_CONFIG,
    firms::HotspotFetcher,
    hotspot::HotspotSet,
    merge::merge_sources,
    payload::HotspotPayload,
    playback::{PlaybackConfig, PlaybackController},
    window::{PointLayer, ScrubState, WindowView}
};

define_cli! { ARGS [version, about="replay the hotspots of a time window in the terminal"] =
    payload: Option<String> [help="JSON file with a saved /api/fires response (default is to retrieve live data)", short, long],
    config: String [help="filename of firewatch config", short, long, default_value=FIREWATCH_CONFIG],
    span: f64 [help="scrubbable time window in hours", long, default_value="24"],
    trail: bool [help="show trail of older low intensity hotspots", short, long]
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).init();

    let playback_config: PlaybackConfig = load_config_or_default::<PlaybackConfig>( PLAYBACK_CONFIG)?.validate()?;
    let (hotspots, reference_time) = match &ARGS.payload {
        Some(path) => load_payload( path)?,
        None => retrieve_hotspots().await?
    };
    println!("replaying {} hotspots over {}h, step {}% every {:?}", hotspots.len(), ARGS.span, playback_config.step_pct, playback_config.cadence);

    let scrub = ScrubState::new( ARGS.span, 0.0, ARGS.trail);
    let controller = PlaybackController::new( &playback_config, scrub, hotspots, reference_time, print_frame);
    controller.play();
    controller.finished().await;

    Ok(())
}

fn load_payload (path: &str)->Result<(Arc<HotspotSet>,DateTime<Utc>)> {
    let payload = HotspotPayload::from_json( &fs::read_to_string(path)?)?;
    if let Some(e) = &payload.error {
        return Err( anyhow!("payload has no data: {}", e))
    }
    Ok( (payload.to_hotspot_set(), payload.timestamp) )
}

async fn retrieve_hotspots ()->Result<(Arc<HotspotSet>,DateTime<Utc>)> {
    let config: FirewatchConfig = load_config_or_default( &ARGS.config)?;
    let fetcher = HotspotFetcher::from_config( &config.firms, config.fetch_timeout)?;
    let results = fetcher.fetch_all( &config.region, config.lookback_days).await;
    let hotspots = merge_sources( &results, &config.region, &config.merge)?;

    Ok( (Arc::new(hotspots), utc_now()) )
}

fn print_frame (scrub: &ScrubState, view: &WindowView) {
    println!("{:5.1}%  t-{:5.1}h  visible: {:4}  markers: {:4}  trail: {:4}",
             scrub.slider_value, view.viewpoint_hours_ago, view.len(),
             view.count_layer( PointLayer::Marker), view.count_layer( PointLayer::Trail));
}
