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

//! the temporal window filter: maps a scrub position over a [`Hotspot`] list to the visible subset and the
//! age dependent rendering attributes of each visible hotspot.
//!
//! The viewpoint is `time_window_hours * (1 - slider_value/100)` hours before the reference time, i.e. the
//! slider at 100 looks at "now" and at 0 looks `time_window_hours` back. Visible hotspots are the ones
//! acquired at or before the viewpoint and, unless the trail is shown, at most [`WINDOW_HOURS`] before it.

use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use crate::hotspot::Hotspot;

/// size of the visible window ending at the viewpoint (independent of the scrubbable time window)
pub const WINDOW_HOURS: f64 = 24.0;
pub const DEFAULT_TIME_WINDOW_HOURS: f64 = 24.0;

pub const RECENT_HOURS: f64 = 6.0;
pub const MEDIUM_HOURS: f64 = 12.0;
pub const MARKER_FRP: f64 = 50.0;   // MW
pub const MIN_OPACITY: f64 = 0.4;
pub const MIN_HEAT: f64 = 0.2;
pub const FULL_HEAT_FRP: f64 = 100.0; // MW

pub const MIN_SLIDER: f64 = 0.0;
pub const MAX_SLIDER: f64 = 100.0;

/// the client side scrub state. Only mutated by user input or the playback controller
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct ScrubState {
    pub time_window_hours: f64,
    pub slider_value: f64,     // [0,100], 100 is now
    pub show_trail: bool,
    pub is_playing: bool,
}

impl Default for ScrubState {
    fn default()->Self {
        ScrubState { time_window_hours: DEFAULT_TIME_WINDOW_HOURS, slider_value: MAX_SLIDER, show_trail: false, is_playing: false }
    }
}

impl ScrubState {
    pub fn new (time_window_hours: f64, slider_value: f64, show_trail: bool)->Self {
        ScrubState { time_window_hours, slider_value: clamp_slider(slider_value), show_trail, is_playing: false }
    }

    #[inline]
    pub fn viewpoint_hours_ago (&self)->f64 {
        self.time_window_hours * (1.0 - self.slider_value / MAX_SLIDER)
    }
}

/// this is the input boundary check for slider values - [`filter_window`] itself does not clamp
pub fn clamp_slider (v: f64)->f64 {
    if v.is_nan() { MAX_SLIDER } else { v.clamp( MIN_SLIDER, MAX_SLIDER) }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize)]
#[serde(rename_all="lowercase")]
pub enum AgeTier {
    Recent, Medium, Old
}

/// where a visible hotspot is rendered. All visible hotspots contribute to the heat layer
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize)]
#[serde(rename_all="lowercase")]
pub enum PointLayer {
    Marker,    // solid point
    Trail,     // secondary point layer, only with show_trail
    HeatOnly,  // no point
}

pub fn age_tier (relative_age: f64)->AgeTier {
    if relative_age <= RECENT_HOURS { AgeTier::Recent }
    else if relative_age <= MEDIUM_HOURS { AgeTier::Medium }
    else { AgeTier::Old }
}

/// fades linearly from 1.0 at the viewpoint to [`MIN_OPACITY`] at [`WINDOW_HOURS`] before it
pub fn opacity (relative_age: f64)->f64 {
    (1.0 - (relative_age / WINDOW_HOURS).min(1.0) * (1.0 - MIN_OPACITY)).max( MIN_OPACITY)
}

/// frp normalized to [MIN_HEAT,1] so that weak detections remain visible on the heatmap
pub fn heat_intensity (frp: f64)->f64 {
    (frp / FULL_HEAT_FRP).min(1.0).max( MIN_HEAT)
}

pub fn point_layer (frp: f64, relative_age: f64, show_trail: bool)->PointLayer {
    if frp > MARKER_FRP || relative_age <= RECENT_HOURS { PointLayer::Marker }
    else if show_trail { PointLayer::Trail }
    else { PointLayer::HeatOnly }
}

#[derive(Debug,Clone,Serialize)]
pub struct VisibleHotspot<'a> {
    pub hotspot: &'a Hotspot,
    pub hours_ago: f64,
    pub relative_age: f64,  // hours before the viewpoint
    pub tier: AgeTier,
    pub opacity: f64,
    pub layer: PointLayer,
    pub heat: f64,
}

#[derive(Debug,Clone,Serialize)]
pub struct WindowView<'a> {
    pub viewpoint_hours_ago: f64,
    pub show_trail: bool,
    pub hotspots: Vec<VisibleHotspot<'a>>,
}

impl<'a> WindowView<'a> {
    pub fn len (&self)->usize { self.hotspots.len() }

    pub fn is_empty (&self)->bool { self.hotspots.is_empty() }

    pub fn layer (&self, layer: PointLayer)->impl Iterator<Item=&VisibleHotspot<'a>> {
        self.hotspots.iter().filter( move |v| v.layer == layer)
    }

    pub fn count_layer (&self, layer: PointLayer)->usize { self.layer(layer).count() }

    /// (latitude, longitude, intensity) triples for the heat layer
    pub fn heat_points (&self)->Vec<(f64,f64,f64)> {
        self.hotspots.iter().map( |v| (v.hotspot.latitude, v.hotspot.longitude, v.heat)).collect()
    }
}

/// compute the visible subset of `hotspots` for `scrub`, with `now` as the reference time for hours_ago.
/// This never mutates its input. `scrub.slider_value` has to be within [0,100]
pub fn filter_window<'a> (hotspots: &'a [Hotspot], now: &DateTime<Utc>, scrub: &ScrubState)->WindowView<'a> {
    let viewpoint = scrub.viewpoint_hours_ago();
    let oldest = viewpoint + WINDOW_HOURS;

    let visible = hotspots.iter().filter_map( |hotspot| {
        let hours_ago = hotspot.hours_ago(now);
        if hours_ago < viewpoint || (!scrub.show_trail && hours_ago > oldest) {
            return None
        }

        let relative_age = hours_ago - viewpoint;
        Some( VisibleHotspot {
            hotspot,
            hours_ago,
            relative_age,
            tier: age_tier( relative_age),
            opacity: opacity( relative_age),
            layer: point_layer( hotspot.frp, relative_age, scrub.show_trail),
            heat: heat_intensity( hotspot.frp),
        })
    }).collect();

    WindowView { viewpoint_hours_ago: viewpoint, show_trail: scrub.show_trail, hotspots: visible }
}
