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

use std::sync::Arc;
use anyhow::{anyhow, Result};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use odin_common::define_cli;
use odin_firewatch::{
    load_config_or_default, FirewatchConfig, FIREWATCH_CONFIG,
    cache::{spawn_refresh_task, HotspotCache},
    firms::HotspotFetcher,
    web::{build_router, run_server, FirewatchState}
};

define_cli! { ARGS [version, about="serve merged FIRMS hotspots of a configured region"] =
    config: String [help="filename of firewatch config", short, long, default_value=FIREWATCH_CONFIG],
    on_demand: bool [help="only refresh on request (no initial or periodic refresh)", long]
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).init();

    let config: FirewatchConfig = load_config_or_default( &ARGS.config)?;
    if !config.region.is_valid() {
        return Err( anyhow!("invalid region {}", config.region))
    }

    let region = config.region;
    let n_days = config.lookback_days;

    let state = match HotspotFetcher::from_config( &config.firms, config.fetch_timeout) {
        Ok(fetcher) => {
            let cache = Arc::new( HotspotCache::new( fetcher, config.merge.clone()));

            if !ARGS.on_demand {
                let initial = cache.clone();
                tokio::spawn( async move {
                    if let Err(e) = initial.refresh( &region, n_days).await {
                        warn!("initial refresh failed: {}", e);
                    }
                });
                spawn_refresh_task( cache.clone(), region, n_days, config.refresh_interval);
            }

            FirewatchState::new( cache, region, n_days, config.display_utc_offset_hours)
        }
        Err(e) => {
            // we still serve so that clients get a proper error response
            error!("cannot retrieve hotspots: {}", e);
            FirewatchState::unavailable( e, region, config.display_utc_offset_hours)
        }
    };

    let router = build_router( Arc::new(state));
    run_server( &config.server, router).await?;

    Ok(())
}
