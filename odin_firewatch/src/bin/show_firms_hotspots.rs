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

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;
use odin_common::{datetime::{format_at_offset, utc_now}, define_cli};
use odin_firewatch::{
    load_config_or_default, FirewatchConfig, FIREWATCH_CONFIG,
    firms::{HotspotFetcher, SourceOutcome},
    merge::merge_sources_with_stats
};

define_cli! { ARGS [version, about="retrieve FIRMS hotspots once and show per-source and merged results"] =
    config: String [help="filename of firewatch config", short, long, default_value=FIREWATCH_CONFIG],
    days: Option<u32> [help="number of days to retrieve (1-10), overrides config", short, long],
    verbose: bool [help="print all merged hotspots", short, long]
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).init();

    let config: FirewatchConfig = load_config_or_default( &ARGS.config)?;
    if !config.region.is_valid() {
        return Err( anyhow!("invalid region {}", config.region))
    }
    let n_days = ARGS.days.unwrap_or( config.lookback_days);

    let fetcher = HotspotFetcher::from_config( &config.firms, config.fetch_timeout)?;
    println!("retrieving {} day(s) of hotspots for {} from {:?}", n_days, config.region, fetcher.source_names());

    let results = fetcher.fetch_all( &config.region, n_days).await;
    for res in &results {
        match &res.outcome {
            SourceOutcome::Fetched(batch) => println!("  {:<20} {:6} records, {} malformed rows", res.source_name, batch.records.len(), batch.n_malformed),
            SourceOutcome::Failed(e) => println!("  {:<20} FAILED: {}", res.source_name, e)
        }
    }

    let (hotspots, stats) = merge_sources_with_stats( &results, &config.region, &config.merge)?;
    println!("merged {} hotspots ({} duplicates, {} rejected, {} malformed)",
             hotspots.len(), stats.n_duplicates, stats.n_rejected, stats.n_malformed);

    if let Some((first,last)) = hotspots.time_span() {
        let offset = config.display_utc_offset_hours;
        println!("acquired between {} and {} (UTC{:+})", format_at_offset( &first, offset), format_at_offset( &last, offset), offset);
    }

    if ARGS.verbose {
        let now = utc_now();
        for h in hotspots.iter() {
            println!("  {}  {:9.4} {:9.4}  frp {:7.1}  {:?} {} {} {:5.1}h ago",
                     format_at_offset( &h.acquired_at, config.display_utc_offset_hours),
                     h.latitude, h.longitude, h.frp, h.confidence, h.satellite, h.instrument, h.hours_ago(&now));
        }
    }

    Ok(())
}
