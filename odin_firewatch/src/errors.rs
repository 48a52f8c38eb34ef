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

use thiserror::Error;
use odin_common::{config::OdinConfigError, net::OdinNetError};

pub type Result<T> = std::result::Result<T, OdinFirewatchError>;

#[derive(Error,Debug)]
pub enum OdinFirewatchError {

    /// a single upstream feed failed, timed out or returned something we could not read. Non-fatal
    #[error("source {source_name} unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    /// every upstream feed failed within one refresh cycle
    #[error("all {0} hotspot sources failed")]
    AllSourcesFailed(usize),

    /// a single record could not be parsed or normalized. Only this record is dropped
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// nothing was ever fetched successfully
    #[error("no hotspot data available")]
    NoDataAvailable,

    #[error("MAP_KEY not configured")]
    MissingMapKey,

    #[error("config error {0}")]
    ConfigError( #[from] OdinConfigError),

    #[error("net error {0}")]
    NetError( #[from] OdinNetError),

    #[error("CSV error {0}")]
    CsvError( #[from] csv::Error),

    #[error("JSON error {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("operation failed {0}")]
    OpFailedError(String),
}

impl OdinFirewatchError {
    pub fn source_unavailable (source_name: &str, reason: impl ToString)->Self {
        OdinFirewatchError::SourceUnavailable { source_name: source_name.to_string(), reason: reason.to_string() }
    }
}

macro_rules! malformed {
    ($fmt:literal $(, $arg:expr )* ) => {
        OdinFirewatchError::MalformedRecord( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use malformed;

macro_rules! op_failed {
    ($fmt:literal $(, $arg:expr )* ) => {
        OdinFirewatchError::OpFailedError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use op_failed;
