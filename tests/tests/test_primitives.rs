// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use graft_core::error::Error;
use graft_core::{Graft, Serializer};
use std::fmt::Debug;
use std::time::Duration;

fn round_trip<T: Serializer + PartialEq + Debug>(graft: &Graft, value: T) {
    let bytes = graft.serialize(&value).unwrap();
    let back: T = graft.deserialize(&bytes).unwrap();
    assert_eq!(back, value);
}

fn header_len<T: Serializer>() -> usize {
    2 + 1 + 4 + T::graft_type_name().len() + 4
}

#[test]
fn test_numbers() {
    let graft = Graft::default();
    round_trip(&graft, true);
    round_trip(&graft, false);
    round_trip(&graft, -5i8);
    round_trip(&graft, 200u8);
    round_trip(&graft, i16::MIN);
    round_trip(&graft, u16::MAX);
    round_trip(&graft, -123_456i32);
    round_trip(&graft, u32::MAX);
    round_trip(&graft, i64::MIN);
    round_trip(&graft, u64::MAX);
    round_trip(&graft, i128::MAX);
    round_trip(&graft, u128::MAX);
    round_trip(&graft, -7isize);
    round_trip(&graft, 7usize);
    round_trip(&graft, 1.5f32);
    round_trip(&graft, -2.25f64);
    round_trip(&graft, f64::INFINITY);
    round_trip(&graft, 'λ');
    round_trip(&graft, ());
}

#[test]
fn test_fixed_widths() {
    let graft = Graft::default();
    let bytes = graft.serialize(&1u64).unwrap();
    assert_eq!(bytes.len(), header_len::<u64>() + 8);
    let bytes = graft.serialize(&1usize).unwrap();
    assert_eq!(bytes.len(), header_len::<usize>() + 8);
    let bytes = graft.serialize(&'a').unwrap();
    assert_eq!(bytes.len(), header_len::<char>() + 4);
    let bytes = graft.serialize(&()).unwrap();
    assert_eq!(bytes.len(), header_len::<()>());
}

#[test]
fn test_nan() {
    let graft = Graft::default();
    let bytes = graft.serialize(&f64::NAN).unwrap();
    assert!(graft.deserialize::<f64>(&bytes).unwrap().is_nan());
}

#[test]
fn test_invalid_char() {
    let graft = Graft::default();
    let mut bytes = graft.serialize(&'a').unwrap();
    let at = bytes.len() - 4;
    bytes[at..].copy_from_slice(&0xD800u32.to_le_bytes());
    assert!(matches!(
        graft.deserialize::<char>(&bytes),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_invalid_bool() {
    let graft = Graft::default();
    let mut bytes = graft.serialize(&true).unwrap();
    let last = bytes.len() - 1;
    bytes[last] = 2;
    assert!(matches!(
        graft.deserialize::<bool>(&bytes),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_nullable() {
    let graft = Graft::default();
    round_trip(&graft, Some(42i32));
    round_trip(&graft, None::<i32>);
    round_trip(&graft, Some(Some(1u8)));
    round_trip(&graft, Some(None::<u8>));
    round_trip(&graft, vec![Some(1i64), None, Some(3)]);

    let bytes = graft.serialize(&None::<i32>).unwrap();
    assert_eq!(bytes.len(), header_len::<Option<i32>>() + 1);
}

#[test]
fn test_strings() {
    let graft = Graft::default();
    round_trip(&graft, String::new());
    round_trip(&graft, "hello, 世界".to_string());
    round_trip(&graft, Some("x".to_string()));
    round_trip(&graft, None::<String>);
    round_trip(
        &graft,
        vec!["a".to_string(), String::new(), "a".to_string()],
    );
}

#[test]
fn test_equal_strings_written_once() {
    let graft = Graft::default();
    let same = graft
        .serialize(&vec!["ab".to_string(), "ab".to_string()])
        .unwrap();
    let distinct = graft
        .serialize(&vec!["ab".to_string(), "cd".to_string()])
        .unwrap();
    // the second "ab" is written as a back-reference index
    assert_eq!(distinct.len() - same.len(), 2);
    let back: Vec<String> = graft.deserialize(&same).unwrap();
    assert_eq!(back, vec!["ab", "ab"]);
}

#[test]
fn test_date_time() {
    let graft = Graft::default();
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let time = NaiveTime::from_hms_nano_opt(23, 59, 59, 123_456_789).unwrap();
    round_trip(&graft, date);
    round_trip(&graft, time);
    round_trip(&graft, NaiveDateTime::new(date, time));
    round_trip(&graft, NaiveDate::from_ymd_opt(-300, 1, 1).unwrap().and_time(time));
    round_trip(
        &graft,
        DateTime::<Utc>::from_timestamp(1_700_000_000, 5).unwrap(),
    );
    round_trip(&graft, TimeDelta::milliseconds(-1_500));
    round_trip(&graft, TimeDelta::nanoseconds(-1));
    round_trip(&graft, TimeDelta::days(3) + TimeDelta::nanoseconds(7));
    round_trip(&graft, Duration::new(5, 999_999_999));
    round_trip(&graft, Duration::ZERO);
}

#[test]
fn test_invalid_duration_nanos() {
    let graft = Graft::default();
    let mut bytes = graft.serialize(&Duration::new(1, 0)).unwrap();
    let at = bytes.len() - 4;
    bytes[at..].copy_from_slice(&1_000_000_000u32.to_le_bytes());
    assert!(matches!(
        graft.deserialize::<Duration>(&bytes),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_tuples() {
    let graft = Graft::default();
    round_trip(&graft, (1u8,));
    round_trip(&graft, (1i32, "two".to_string()));
    round_trip(&graft, (1i32, 2i64, 3.0f64, 'c', true, Some(6u16)));

    let descriptor = graft.registry().fields_of::<(i32, String)>().unwrap();
    let names: Vec<&str> = descriptor.field_names().collect();
    assert_eq!(names, vec!["0", "1"]);
}

#[test]
fn test_box() {
    let graft = Graft::default();
    round_trip(&graft, Box::new(17i32));
    round_trip(&graft, Some(Box::new("boxed".to_string())));
}
