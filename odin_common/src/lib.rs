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

//! common utilities shared by ODIN crates that are not specific to a single data domain

pub mod macros;
pub mod config;
pub mod datetime;
pub mod geo;
pub mod net;

/// round `x` to `precision` decimal places and return it as a scaled integer, which (unlike f64)
/// can be used as a hash or equality key. `round_key(-37.00004, 4) == round_key(-37.0, 4)`
#[inline]
pub fn round_key (x: f64, precision: u32) -> i64 {
    let scale = 10f64.powi(precision as i32);
    (x * scale).round() as i64
}

// a global fn that can be used with serde(skip_serializing_if="odin_common::is_none")
#[inline] pub fn is_none<T> (opt: &Option<T>)->bool { opt.is_none() }
