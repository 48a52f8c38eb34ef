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

use chrono::{TimeZone, Timelike, Utc};
use serde::Deserialize;
use std::time::Duration;
use reqwest::Client;
use odin_common::{round_key, datetime::*, geo::GeoRect, config::load_config_path, net::{get_text, OdinNetError}};

// run with "cargo test -p odin_common -- --nocapture"

#[test]
fn test_round_key() {
    assert_eq!( round_key(-37.00004, 4), round_key(-37.0, 4));
    assert_ne!( round_key(-37.0001, 4), round_key(-37.0, 4));
    assert_eq!( round_key(-72.12345, 4), -721235);
}

#[test]
fn test_date_hhmm() {
    let dt = utc_from_date_hhmm( "2025-01-15", "438").unwrap();
    assert_eq!( dt, Utc.with_ymd_and_hms(2025, 1, 15, 4, 38, 0).unwrap());

    let dt = utc_from_date_hhmm( "2025-01-15", "0005").unwrap();
    assert_eq!( dt.hour(), 0);
    assert_eq!( dt.minute(), 5);

    assert!( utc_from_date_hhmm( "2025-01-15", "2460").is_none());
    assert!( utc_from_date_hhmm( "2025-01-15", "12:30").is_none());
    assert!( utc_from_date_hhmm( "2025-01-15", "").is_none());
    assert!( utc_from_date_hhmm( "15/01/2025", "1230").is_none());
}

#[test]
fn test_hours() {
    let t1 = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
    let t0 = Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap();
    assert_eq!( hours_between( &t1, &t0), 1.5);
    assert_eq!( hours_between( &t0, &t1), -1.5);
    assert_eq!( hours_before( &t1, 1.5), t0);

    assert_eq!( format_at_offset( &t1, -3), "2025-01-15 09:00");
}

#[derive(Deserialize,Debug)]
struct TestConfig {
    region: GeoRect,
    #[serde(deserialize_with="deserialize_duration")]
    interval: Duration
}

#[test]
fn test_ron_config() {
    let input = r#"( region: ( west: -73.5, south: -38.5, east: -71.0, north: -36.0 ), interval: "10min" )"#;
    let config: TestConfig = ron::from_str(input).unwrap();
    println!("config: {config:?}");

    assert!( config.region.is_valid());
    assert!( config.region.contains( -37.0, -72.0));
    assert!( !config.region.contains( -35.9, -72.0));
    assert_eq!( config.region.wsen_spec(), "-73.5,-38.5,-71,-36");
    assert_eq!( config.interval, minutes(10));

    assert!( load_config_path::<TestConfig,_>( "no/such/config.ron").is_err());
}

#[tokio::test]
async fn test_get_text_timeout() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn( async move {
        let (_socket,_) = listener.accept().await.unwrap();
        tokio::time::sleep( secs(10)).await; // accept but never answer
    });

    let url = format!("http://{addr}/api/area/csv/0123456789abcdef/VIIRS_SNPP_NRT/-73.5,-38.5,-71,-36/1");
    match get_text( &Client::new(), &url, millis(200)).await {
        Err(e @ OdinNetError::TimeoutError(_)) => assert!( !e.to_string().contains("0123456789abcdef")),
        other => panic!("expected timeout, got {other:?}")
    }
}
