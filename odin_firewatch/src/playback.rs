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

//! timed replay of a hotspot set.
//!
//! [`Playback`] is the synchronous state machine (stopped|playing) that owns the [`ScrubState`]. Every
//! transition that starts or stops playing opens a new session, and ticks only apply to the session they
//! were scheduled for. [`PlaybackController`] drives it from a tokio timer task, with one cancellation
//! token per play session.

use std::{sync::{Arc, Mutex, MutexGuard}, time::Duration};
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use tokio::{task::JoinHandle, time::{interval_at, Instant, MissedTickBehavior}};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use odin_common::{config::OdinConfigError, datetime::{deserialize_duration, millis, serialize_duration}};
use crate::{
    hotspot::HotspotSet,
    window::{clamp_slider, filter_window, ScrubState, WindowView, MAX_SLIDER, MIN_SLIDER}
};

#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub step_pct: f64,
    #[serde(serialize_with="serialize_duration", deserialize_with="deserialize_duration")]
    pub cadence: Duration,
}

impl Default for PlaybackConfig {
    fn default()->Self {
        PlaybackConfig { step_pct: 2.0, cadence: millis(200) }
    }
}

impl PlaybackConfig {
    /// a play session has to reach the end of the slider range in a finite number of ticks
    pub fn validate (self)->std::result::Result<Self,OdinConfigError> {
        if !self.step_pct.is_finite() || self.step_pct <= 0.0 || self.step_pct > MAX_SLIDER - MIN_SLIDER {
            return Err( OdinConfigError::InvalidConfig( format!("playback step_pct {} not in (0,{}]", self.step_pct, MAX_SLIDER - MIN_SLIDER)))
        }
        if self.cadence.is_zero() {
            return Err( OdinConfigError::InvalidConfig( "playback cadence must be > 0".to_string()))
        }
        Ok(self)
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize)]
pub enum PlaybackState {
    Stopped, Playing
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum TickOutcome {
    Advanced,   // still playing
    Finished,   // reached the end and stopped
    Superseded, // tick belongs to an invalidated session, nothing changed
}

/* #region state machine ************************************************************************************/

#[derive(Debug,Clone)]
pub struct Playback {
    scrub: ScrubState,
    step_pct: f64,
    session: u64,
}

impl Playback {
    pub fn new (scrub: ScrubState, step_pct: f64)->Self {
        Playback { scrub: ScrubState { is_playing: false, ..scrub }, step_pct, session: 0 }
    }

    pub fn scrub (&self)->&ScrubState { &self.scrub }

    pub fn session (&self)->u64 { self.session }

    pub fn state (&self)->PlaybackState {
        if self.scrub.is_playing { PlaybackState::Playing } else { PlaybackState::Stopped }
    }

    /// start playing. Returns the new session if we were stopped, `None` if we already play.
    /// Playing from the end starts over at 0
    pub fn play (&mut self)->Option<u64> {
        if self.scrub.is_playing { return None }

        if self.scrub.slider_value >= MAX_SLIDER {
            self.scrub.slider_value = MIN_SLIDER;
        }
        self.scrub.is_playing = true;
        Some( self.new_session())
    }

    /// stop playing at the current slider position. Returns true if we were playing
    pub fn pause (&mut self)->bool {
        if self.scrub.is_playing {
            self.scrub.is_playing = false;
            self.new_session();
            true
        } else {
            false
        }
    }

    pub fn reset (&mut self) {
        self.scrub.is_playing = false;
        self.scrub.slider_value = MIN_SLIDER;
        self.new_session();
    }

    /// manual scrub input. This always wins over playback, i.e. it pauses first
    pub fn set_slider (&mut self, value: f64) {
        self.pause();
        self.scrub.slider_value = clamp_slider(value);
    }

    pub fn set_show_trail (&mut self, show_trail: bool) {
        self.scrub.show_trail = show_trail;
    }

    pub fn set_time_window (&mut self, hours: f64) {
        if hours.is_finite() && hours > 0.0 {
            self.scrub.time_window_hours = hours;
        }
    }

    /// advance by one step if `session` is still the current play session
    pub fn tick (&mut self, session: u64)->TickOutcome {
        if session != self.session || !self.scrub.is_playing {
            return TickOutcome::Superseded
        }

        let v = self.scrub.slider_value + self.step_pct;
        if v >= MAX_SLIDER {
            self.scrub.slider_value = MAX_SLIDER;
            self.scrub.is_playing = false;
            self.new_session();
            TickOutcome::Finished
        } else {
            self.scrub.slider_value = v;
            TickOutcome::Advanced
        }
    }

    fn new_session (&mut self)->u64 {
        self.session += 1;
        self.session
    }
}

/* #endregion state machine */

/* #region timer driven controller **************************************************************************/

/// receiver of filtered frames
pub trait PlaybackRenderer: Send + 'static {
    fn render (&mut self, scrub: &ScrubState, view: &WindowView<'_>);
}

impl<F> PlaybackRenderer for F where F: FnMut(&ScrubState, &WindowView<'_>) + Send + 'static {
    fn render (&mut self, scrub: &ScrubState, view: &WindowView<'_>) { self(scrub, view) }
}

struct ControllerInner<R> {
    playback: Playback,
    hotspots: Arc<HotspotSet>,
    reference_time: DateTime<Utc>,  // 'now' of the hotspot set
    renderer: R,
    cancel_token: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

impl<R: PlaybackRenderer> ControllerInner<R> {
    fn render (&mut self) {
        let view = filter_window( &self.hotspots, &self.reference_time, self.playback.scrub());
        self.renderer.render( self.playback.scrub(), &view);
    }

    fn cancel_session (&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}

/// runs [`Playback`] on a fixed cadence. The renderer is called with the filtered view after each change of the
/// scrub state. All state changes and renders happen under one lock, hence ticks never overlap and a
/// cancelled session can't apply a tick after `pause`, `reset` or `set_slider` returned
pub struct PlaybackController<R: PlaybackRenderer> {
    inner: Arc<Mutex<ControllerInner<R>>>,
    cadence: Duration,
}

impl<R: PlaybackRenderer> PlaybackController<R> {
    pub fn new (config: &PlaybackConfig, scrub: ScrubState, hotspots: Arc<HotspotSet>, reference_time: DateTime<Utc>, renderer: R)->Self {
        let inner = ControllerInner {
            playback: Playback::new( scrub, config.step_pct),
            hotspots,
            reference_time,
            renderer,
            cancel_token: None,
            task: None
        };
        PlaybackController { inner: Arc::new( Mutex::new(inner)), cadence: config.cadence }
    }

    fn lock (&self)->MutexGuard<'_,ControllerInner<R>> {
        lock_inner( &self.inner)
    }

    pub fn scrub (&self)->ScrubState { *self.lock().playback.scrub() }

    pub fn state (&self)->PlaybackState { self.lock().playback.state() }

    pub fn play (&self) {
        let mut inner = self.lock();
        let was_at_end = inner.playback.scrub().slider_value >= MAX_SLIDER;

        if let Some(session) = inner.playback.play() {
            inner.cancel_session();
            if was_at_end { inner.render() } // we restarted at 0

            let token = CancellationToken::new();
            inner.cancel_token = Some( token.clone());
            inner.task = Some( spawn_play_session( self.inner.clone(), session, token, self.cadence));
            debug!("playback session {} started", session);
        }
    }

    pub fn pause (&self) {
        let mut inner = self.lock();
        inner.playback.pause();
        inner.cancel_session();
    }

    pub fn reset (&self) {
        let mut inner = self.lock();
        inner.playback.reset();
        inner.cancel_session();
        inner.render();
    }

    pub fn set_slider (&self, value: f64) {
        let mut inner = self.lock();
        inner.playback.set_slider( value);
        inner.cancel_session();
        inner.render();
    }

    pub fn set_show_trail (&self, show_trail: bool) {
        let mut inner = self.lock();
        inner.playback.set_show_trail( show_trail);
        inner.render();
    }

    pub fn set_time_window (&self, hours: f64) {
        let mut inner = self.lock();
        inner.playback.set_time_window( hours);
        inner.render();
    }

    /// wait until the current play session (if any) has terminated
    pub async fn finished (&self) {
        let task = self.lock().task.take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("playback task terminated abnormally: {e}");
            }
        }
    }
}

impl<R: PlaybackRenderer> Drop for PlaybackController<R> {
    fn drop (&mut self) {
        self.lock().cancel_session();
    }
}

fn lock_inner<R> (inner: &Mutex<ControllerInner<R>>)->MutexGuard<'_,ControllerInner<R>> {
    // a panicking renderer should not take the controller down with it
    inner.lock().unwrap_or_else( |poisoned| poisoned.into_inner())
}

/// apply one tick of `session`. Returns false if the session is over
fn play_step<R: PlaybackRenderer> (inner: &Mutex<ControllerInner<R>>, session: u64, token: &CancellationToken)->bool {
    let mut guard = lock_inner( inner);
    if token.is_cancelled() { return false } // cancelled while we were waiting for the lock

    match guard.playback.tick( session) {
        TickOutcome::Advanced => {
            guard.render();
            true
        }
        TickOutcome::Finished => {
            guard.render();
            guard.cancel_token = None;
            debug!("playback session {} finished", session);
            false
        }
        TickOutcome::Superseded => false
    }
}

fn spawn_play_session<R: PlaybackRenderer> (inner: Arc<Mutex<ControllerInner<R>>>, session: u64, token: CancellationToken, cadence: Duration)->JoinHandle<()> {
    tokio::spawn( async move {
        let mut timer = interval_at( Instant::now() + cadence, cadence);
        timer.set_missed_tick_behavior( MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = timer.tick() => {
                    if !play_step( &inner, session, &token) { break }
                }
            }
        }
    })
}

/* #endregion timer driven controller */
