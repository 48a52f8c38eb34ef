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

//! merging of per-source raw hotspot batches into one deduplicated [`HotspotSet`]

use std::collections::HashMap;
use serde::{Serialize,Deserialize};
use tracing::{debug, info};
use odin_common::{geo::GeoRect, round_key};
use crate::{
    errors::{OdinFirewatchError, Result},
    firms::{SourceOutcome, SourceResult},
    hotspot::{Hotspot, HotspotConfidence, HotspotSet}
};

#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub accepted_confidence: Vec<HotspotConfidence>,
    pub dedup_precision: u32, // decimal places of lat/lon that identify the same detection
}

impl Default for MergeConfig {
    fn default()->Self {
        MergeConfig { accepted_confidence: vec![HotspotConfidence::Nominal, HotspotConfidence::High], dedup_precision: 4 }
    }
}

/// counters of one merge cycle
#[derive(Debug,Default,Clone,PartialEq)]
pub struct MergeStats {
    pub n_sources: usize,
    pub n_failed: usize,
    pub n_records: usize,
    pub n_malformed: usize,
    pub n_rejected: usize,   // low confidence or outside of region
    pub n_duplicates: usize,
}

struct Candidate {
    hotspot: Hotspot,
    resolution_m: f64,
}

impl Candidate {
    /// higher frp wins, ties go to the finer resolution. Otherwise the first one seen (source order) stays
    fn supersedes (&self, other: &Candidate)->bool {
        self.hotspot.frp > other.hotspot.frp ||
        (self.hotspot.frp == other.hotspot.frp && self.resolution_m < other.resolution_m)
    }
}

/// merge the results of one fetch cycle. Returns [`OdinFirewatchError::AllSourcesFailed`] if there was no successful
/// source, which is distinct from an empty set (no detections)
pub fn merge_sources (results: &[SourceResult], region: &GeoRect, config: &MergeConfig)->Result<HotspotSet> {
    merge_sources_with_stats( results, region, config).map( |(hs,_)| hs)
}

pub fn merge_sources_with_stats (results: &[SourceResult], region: &GeoRect, config: &MergeConfig)->Result<(HotspotSet,MergeStats)> {
    let mut stats = MergeStats { n_sources: results.len(), ..MergeStats::default() };

    let mut ordered: Vec<&SourceResult> = results.iter().collect();
    ordered.sort_by_key( |r| r.source_idx); // tie breaks depend on source list order

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut index: HashMap<(i64,i64),usize> = HashMap::new();

    for res in ordered {
        let batch = match &res.outcome {
            SourceOutcome::Fetched(batch) => batch,
            SourceOutcome::Failed(_) => { stats.n_failed += 1; continue }
        };
        stats.n_malformed += batch.n_malformed;

        for raw in &batch.records {
            stats.n_records += 1;

            let hotspot = match raw.normalize() {
                Ok(hs) => hs,
                Err(e) => {
                    debug!("{}: {}", res.source_name, e);
                    stats.n_malformed += 1;
                    continue
                }
            };

            if !config.accepted_confidence.contains( &hotspot.confidence) || !region.contains( hotspot.latitude, hotspot.longitude) {
                stats.n_rejected += 1;
                continue
            }

            let key = ( round_key( hotspot.latitude, config.dedup_precision), round_key( hotspot.longitude, config.dedup_precision) );
            let cand = Candidate { hotspot, resolution_m: res.resolution_m };

            match index.get( &key) {
                Some(&i) => {
                    stats.n_duplicates += 1;
                    if cand.supersedes( &candidates[i]) {
                        candidates[i] = cand;
                    }
                }
                None => {
                    index.insert( key, candidates.len());
                    candidates.push( cand);
                }
            }
        }
    }

    if stats.n_failed == stats.n_sources {
        return Err( OdinFirewatchError::AllSourcesFailed( stats.n_sources))
    }

    let hotspots = HotspotSet::from_unsorted( candidates.into_iter().map( |c| c.hotspot).collect());
    info!("merged {} hotspots from {}/{} sources ({} records, {} malformed, {} rejected, {} duplicates)",
          hotspots.len(), stats.n_sources - stats.n_failed, stats.n_sources,
          stats.n_records, stats.n_malformed, stats.n_rejected, stats.n_duplicates);

    Ok( (hotspots, stats) )
}
