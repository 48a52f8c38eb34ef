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

/// syntactic sugar macro to define thiserror Error enums:
/// ```
/// use odin_common::define_error;
/// define_error!{ pub MyNetError =
///   IOError( #[from] std::io::Error ) : "IO error: {0}",
///   OpFailed(String) : "operation failed: {0}"
/// }
/// ```
/// expands into a `#[derive(thiserror::Error,Debug)]` enum with one `#[error(..)]` attribute per variant.
/// Crates using this macro need `thiserror` as a dependency
#[macro_export]
macro_rules! define_error {
    ($vis:vis $name:ident = $( $err_variant:ident ( $( $( #[$meta:meta] )? $field_type:ty),* ) : $msg_lit:literal ),* $(,)?) => {
        #[derive(thiserror::Error,Debug)]
        $vis enum $name {
            $(
                #[error($msg_lit)]
                $err_variant ( $( $(#[$meta])? $field_type ),*  )
            ),*
        }
    }
}
pub use define_error;

/// define a lazily parsed static for command line arguments. Each field is specified with its `clap` arg options
/// in brackets, command options go after the static name:
/// ```ignore
/// define_cli! { ARGS [about="show hotspots"] =
///     verbose: bool [help="print all records", short, long],
///     config: String [help="config filename", long, default_value="firewatch.ron"]
/// }
/// ```
/// Crates using this macro need `clap` (derive) and `lazy_static` as dependencies
#[macro_export]
macro_rules! define_cli {
    ($name:ident [ $( $sopt:ident $(= $sx:expr)? ),* ] = $( $( #[$meta:meta] )? $fname:ident : $ftype:ty [ $( $fopt:ident $(= $fx:expr)?),* ] ),* $(,)?) => {
        #[derive(clap::Parser,Debug)]
        #[command( $( $sopt $(= $sx)? ),* )]
        struct CliOpts {
            $(
                #[arg( $( $fopt $(= $fx)? ),* )]
                $(#[$meta])?
                $fname : $ftype,
            )*
        }
        lazy_static::lazy_static! { static ref $name: CliOpts = <CliOpts as clap::Parser>::parse(); }
    }
}
pub use define_cli;
