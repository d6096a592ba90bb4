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

use graft_core::error::Error;
use graft_core::{DeserializeOptions, Graft, SerializeOptions};
use graft_derive::GraftObject;
use std::sync::mpsc::Sender;
use std::time::Instant;

#[derive(GraftObject, Debug, PartialEq)]
struct Wrapper<T> {
    inner: T,
}

#[derive(GraftObject)]
struct WithCallback {
    callback: fn(i32) -> i32,
}

#[derive(GraftObject)]
struct WithPointer {
    ptr: *const u8,
}

#[derive(GraftObject)]
struct WithInstant {
    started: Instant,
}

#[derive(GraftObject)]
struct WithChannel {
    tx: Option<Sender<u8>>,
}

#[derive(GraftObject)]
struct Outer {
    items: Vec<WithCallback>,
}

#[derive(GraftObject)]
struct WithLazy {
    items: Box<dyn Iterator<Item = i32>>,
}

#[derive(GraftObject, Debug, PartialEq)]
struct Reading {
    sensor: String,
    values: Vec<f32>,
}

fn unsupported_message<T>(result: Result<T, Error>) -> String {
    match result {
        Err(Error::Unsupported(msg)) => msg.into_owned(),
        Err(other) => panic!("expected unsupported, got {}", other),
        Ok(_) => panic!("expected unsupported, got a value"),
    }
}

#[test]
fn test_wrong_version() {
    let graft = Graft::default();
    let mut bytes = graft.serialize(&1i32).unwrap();
    bytes[..2].copy_from_slice(&2i16.to_le_bytes());
    assert!(matches!(
        graft.deserialize::<i32>(&bytes),
        Err(Error::InvalidVersion(2, 1))
    ));
}

#[test]
fn test_omit_root_type_name_mismatch() {
    let graft = Graft::default();
    let omitted = graft
        .serialize_with_options(&5u8, &SerializeOptions::default().omit_root_type_name(true))
        .unwrap();
    assert!(matches!(
        graft.deserialize::<u8>(&omitted),
        Err(Error::InvalidOmitRootType(true, false))
    ));
    let back: u8 = graft
        .deserialize_with_options(
            &omitted,
            &DeserializeOptions::default().omit_root_type_name(true),
        )
        .unwrap();
    assert_eq!(back, 5);

    let named = graft.serialize(&5u8).unwrap();
    assert!(matches!(
        graft.deserialize_with_options::<u8>(
            &named,
            &DeserializeOptions::default().omit_root_type_name(true)
        ),
        Err(Error::InvalidOmitRootType(false, true))
    ));
    assert!(matches!(
        graft.deserialize_any(&omitted),
        Err(Error::InvalidOmitRootType(true, false))
    ));
}

#[test]
fn test_engine_wide_omit() {
    let graft = Graft::default().omit_root_type_name(true);
    let bytes = graft.serialize(&"s".to_string()).unwrap();
    assert_eq!(graft.deserialize::<String>(&bytes).unwrap(), "s");
    assert!(matches!(
        Graft::default().deserialize::<String>(&bytes),
        Err(Error::InvalidOmitRootType(true, false))
    ));
}

#[test]
fn test_type_not_found() {
    let writer = Graft::default();
    let bytes = writer.serialize(&Wrapper { inner: 1i32 }).unwrap();

    let reader = Graft::default();
    assert!(matches!(
        reader.deserialize_any(&bytes),
        Err(Error::TypeNotFound(_))
    ));
    assert!(matches!(
        reader.deserialize::<Wrapper<i64>>(&bytes),
        Err(Error::TypeNotFound(_))
    ));
    assert_eq!(
        reader.deserialize::<Wrapper<i32>>(&bytes).unwrap(),
        Wrapper { inner: 1 }
    );
}

#[test]
fn test_type_mismatch() {
    let graft = Graft::default();
    let bytes = graft.serialize(&1i32).unwrap();
    assert!(matches!(
        graft.deserialize::<i64>(&bytes),
        Err(Error::TypeMismatch(_))
    ));
    let object = graft.deserialize_any(&bytes).unwrap();
    assert!(matches!(
        object.downcast::<String>(),
        Err(Error::TypeMismatch(_))
    ));
}

#[test]
fn test_unsupported_members() {
    let graft = Graft::default();
    let message = unsupported_message(graft.serialize(&WithCallback { callback: |x| x }));
    assert!(message.contains("callback"), "{}", message);

    let message = unsupported_message(graft.serialize(&WithPointer {
        ptr: std::ptr::null(),
    }));
    assert!(message.contains("ptr"), "{}", message);

    let message = unsupported_message(graft.serialize(&WithInstant {
        started: Instant::now(),
    }));
    assert!(message.contains("started"), "{}", message);

    let message = unsupported_message(graft.serialize(&WithChannel { tx: None }));
    assert!(message.contains("tx"), "{}", message);

    let message = unsupported_message(graft.serialize(&WithLazy {
        items: Box::new(0..3),
    }));
    assert!(message.contains("items"), "{}", message);
}

#[test]
fn test_unsupported_nested() {
    let graft = Graft::default();
    let message = unsupported_message(graft.serialize(&Outer { items: Vec::new() }));
    assert!(message.contains("items"), "{}", message);
    assert!(message.contains("callback"), "{}", message);
    unsupported_message(graft.deep_clone(&Outer { items: Vec::new() }));
}

#[test]
fn test_closure_rejected() {
    let graft = Graft::default();
    let boxed: Box<dyn Fn()> = Box::new(|| {});
    unsupported_message(graft.serialize(&boxed));
}

#[test]
fn test_truncated_stream() {
    let graft = Graft::default();
    let reading = Reading {
        sensor: "t1".to_string(),
        values: vec![1.0, 2.0],
    };
    let bytes = graft.serialize(&reading).unwrap();
    for cut in [bytes.len() - 1, bytes.len() - 5, 3] {
        assert!(matches!(
            graft.deserialize::<Reading>(&bytes[..cut]),
            Err(Error::BufferOutOfBound(..))
        ));
    }
}

#[test]
fn test_null_for_non_nullable() {
    let graft = Graft::default();
    let mut bytes = graft.serialize(&"x".to_string()).unwrap();
    let name_len = <String as graft_core::Serializer>::graft_type_name().len();
    let envelope_at = 2 + 1 + 4 + name_len + 4;
    assert_eq!(bytes[envelope_at], 1);
    bytes[envelope_at] = 0;
    bytes.truncate(envelope_at + 1);
    assert!(matches!(
        graft.deserialize::<String>(&bytes),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_dangling_reference() {
    let graft = Graft::default();
    let mut bytes = graft.serialize(&"x".to_string()).unwrap();
    let name_len = <String as graft_core::Serializer>::graft_type_name().len();
    let flag_at = 2 + 1 + 4 + name_len + 4 + 1;
    bytes.truncate(flag_at);
    bytes.push(0);
    bytes.extend_from_slice(&3i32.to_le_bytes());
    assert!(matches!(
        graft.deserialize::<String>(&bytes),
        Err(Error::InvalidRef(_))
    ));
}
