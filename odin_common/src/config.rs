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

//! RON based configuration lookup
//!
//! configs are looked up by filename, first in `$ODIN_ROOT/configs/<crate>/` and then in `./configs/`.
//! Crates that define configs expand `define_load_config!{}` at their top level, which provides a
//! crate-level `load_config(filename)` function.

use std::{env, fs, path::{Path,PathBuf}};
use serde::Deserialize;
use crate::define_error;

pub const CONFIGS: &'static str = "configs";

define_error!{ pub OdinConfigError =
    IOError( #[from] std::io::Error ) : "IO error {0}",
    RonError( #[from] ron::Error ) : "config RON error {0}",
    RonSerdeError( #[from] ron::error::SpannedError ) : "config deserialize RON error {0}",
    ConfigNotFound(String) : "config not found {0}",
    InvalidConfig(String) : "invalid config {0}"
}

pub type Result<T> = std::result::Result<T,OdinConfigError>;

/// the optional global root dir as set by `ODIN_ROOT`
pub fn root_dir ()->Option<PathBuf> {
    env::var("ODIN_ROOT").ok().filter(|s| !s.is_empty()).map( PathBuf::from)
}

pub fn find_config_file (resource_crate: &str, filename: &str)->Option<PathBuf> {
    if let Some(root) = root_dir() {
        let path = root.join(CONFIGS).join(resource_crate).join(filename);
        if path.is_file() { return Some(path) }
    }

    let path = Path::new(CONFIGS).join(filename);
    if path.is_file() { Some(path) } else { None }
}

/// load config from explicit path. This is mostly for tools that get config paths as command line args
pub fn load_config_path<C,P> (path: P) -> Result<C> where C: for <'a> Deserialize<'a>, P: AsRef<Path> {
    let data = fs::read( path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

pub fn load_crate_config<C> (resource_crate: &str, filename: &str) -> Result<C> where C: for <'a> Deserialize<'a> {
    match find_config_file( resource_crate, filename) {
        Some(path) => load_config_path( path),
        None => Err( OdinConfigError::ConfigNotFound( filename.to_string()))
    }
}

/// same as [`load_crate_config`] but falls back to `C::default()` if there is no such config file.
/// Note that an existing but malformed config is still an error
pub fn load_crate_config_or_default<C> (resource_crate: &str, filename: &str) -> Result<C> where C: for <'a> Deserialize<'a> + Default {
    match find_config_file( resource_crate, filename) {
        Some(path) => load_config_path( path),
        None => Ok( C::default() )
    }
}

/// this is the macro that needs to be expanded at the top of crates (lib.rs) that define configs.
/// Config users call the defined `load_config(..)` and `load_config_or_default(..)` functions
#[macro_export]
macro_rules! define_load_config {
    () => {
        /// load config using the `odin_common::config` lookup mechanism
        pub fn load_config<C> (filename: &str) -> $crate::config::Result<C> where C: for <'a> serde::Deserialize<'a> {
            $crate::config::load_crate_config( env!("CARGO_PKG_NAME"), filename)
        }

        pub fn load_config_or_default<C> (filename: &str) -> $crate::config::Result<C> where C: for <'a> serde::Deserialize<'a> + Default {
            $crate::config::load_crate_config_or_default( env!("CARGO_PKG_NAME"), filename)
        }
    }
}
pub use define_load_config;
