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

use std::fmt;
use serde::{Serialize,Deserialize};

#[inline] pub fn is_valid_latitude (lat_deg: f64)->bool { (-90.0..=90.0).contains(&lat_deg) }
#[inline] pub fn is_valid_longitude (lon_deg: f64)->bool { (-180.0..=180.0).contains(&lon_deg) }

/* #region GeoRect ***********************************************************************************************/

/// a simple WGS84 degree bounding box that does not cross the antimeridian.
/// Serialized as `( west: .., south: .., east: .., north: .. )`
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GeoRect {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoRect {
    pub fn from_wsen (west: f64, south: f64, east: f64, north: f64) -> Self {
        GeoRect { west, south, east, north }
    }

    /// boundaries are inclusive
    pub fn contains (&self, lat_deg: f64, lon_deg: f64) -> bool {
        lat_deg >= self.south && lat_deg <= self.north && lon_deg >= self.west && lon_deg <= self.east
    }

    pub fn is_valid (&self) -> bool {
        is_valid_longitude(self.west) && is_valid_longitude(self.east) &&
        is_valid_latitude(self.south) && is_valid_latitude(self.north) &&
        self.west <= self.east && self.south <= self.north
    }

    /// the "west,south,east,north" string used by area queries
    pub fn wsen_spec (&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

impl fmt::Display for GeoRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[W{:.3},S{:.3},E{:.3},N{:.3}]", self.west, self.south, self.east, self.north)
    }
}

/* #endregion GeoRect */
