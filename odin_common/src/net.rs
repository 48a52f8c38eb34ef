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

//! common utility functions for network operations

use std::time::Duration;
use reqwest::{Client, StatusCode};
use crate::define_error;

define_error!{ pub OdinNetError =
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    NotFoundError(String) : "not found {0}",
    TimeoutError(Duration) : "no response within {0:?}",
    OpFailed(String) : "operation failed: {0}"
}

pub type Result<T> = std::result::Result<T, OdinNetError>;

/// retrieve the body of `url` as text, failing if the complete response is not received within `timeout`.
/// Since request URLs might contain access keys they are stripped from returned errors
pub async fn get_text (client: &Client, url: &str, timeout: Duration) -> Result<String> {
    match tokio::time::timeout( timeout, get_text_unbounded( client, url)).await {
        Ok(res) => res,
        Err(_) => Err( OdinNetError::TimeoutError(timeout))
    }
}

async fn get_text_unbounded (client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await.map_err(|e| e.without_url())?;

    match response.status() {
        StatusCode::OK => {
            Ok( response.text().await.map_err(|e| e.without_url())? )
        }
        StatusCode::NOT_FOUND => {
            Err( OdinNetError::NotFoundError( response.url().host_str().unwrap_or_default().to_string())) // path might contain keys
        }
        other => {
            Err( OdinNetError::OpFailed(format!("response status {other:?}")))
        }
    }
}
