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
use graft_core::{Array, Graft, Serializer};
use std::collections::{BTreeSet, BinaryHeap, HashSet, LinkedList, VecDeque};

fn header_len<T: Serializer>() -> usize {
    2 + 1 + 4 + T::graft_type_name().len() + 4
}

#[test]
fn test_two_dimensional() {
    let graft = Graft::default();
    let grid = Array::new(vec![2, 3], vec![1i32, 2, 3, 4, 5, 6]).unwrap();
    let bytes = graft.serialize(&grid).unwrap();
    // envelope, rank, two dimensions, six elements
    assert_eq!(bytes.len(), header_len::<Array<i32>>() + 2 + 1 + 8 + 24);
    let back: Array<i32> = graft.deserialize(&bytes).unwrap();
    assert_eq!(back.shape(), &[2, 3]);
    assert_eq!(back.get(&[1, 2]), Some(&6));
    assert_eq!(back, grid);
    assert_eq!(back.into_vec(), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_three_dimensional_strings() {
    let graft = Graft::default();
    let cube = Array::filled(vec![2, 2, 2], "x".to_string()).unwrap();
    let bytes = graft.serialize(&cube).unwrap();
    let back: Array<String> = graft.deserialize(&bytes).unwrap();
    assert_eq!(back, cube);
    assert_eq!(back.indices().count(), 8);
}

#[test]
fn test_empty_dimension() {
    let graft = Graft::default();
    let empty = Array::<u8>::new(vec![3, 0], Vec::new()).unwrap();
    let bytes = graft.serialize(&empty).unwrap();
    let back: Array<u8> = graft.deserialize(&bytes).unwrap();
    assert_eq!(back.shape(), &[3, 0]);
    assert!(back.is_empty());
}

#[test]
fn test_max_rank() {
    let graft = Graft::default();
    let deep = Array::filled(vec![1; 254], 7u8).unwrap();
    let bytes = graft.serialize(&deep).unwrap();
    let back: Array<u8> = graft.deserialize(&bytes).unwrap();
    assert_eq!(back.rank(), 254);
    assert_eq!(back.as_slice(), &[7]);
}

#[test]
fn test_rank_out_of_range() {
    assert!(matches!(
        Array::new(vec![1; 255], vec![0u8]),
        Err(Error::Unsupported(_))
    ));
    assert!(matches!(
        Array::new(Vec::new(), Vec::<u8>::new()),
        Err(Error::Unsupported(_))
    ));

    let graft = Graft::default();
    let mut bytes = graft.serialize(&Array::from_vec(vec![1u8])).unwrap();
    let rank_at = header_len::<Array<u8>>() + 2;
    assert_eq!(bytes[rank_at], 1);
    bytes[rank_at] = 255;
    assert!(matches!(
        graft.deserialize::<Array<u8>>(&bytes),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_shape_mismatch() {
    assert!(matches!(
        Array::new(vec![2, 2], vec![1, 2, 3]),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_bytes_layout() {
    let graft = Graft::default();
    let data: Vec<u8> = (0..=255).collect();
    let bytes = graft.serialize(&data).unwrap();
    assert_eq!(bytes.len(), header_len::<Vec<u8>>() + 7 + 256);
    assert_eq!(&bytes[bytes.len() - 256..], data.as_slice());
    assert_eq!(graft.deserialize::<Vec<u8>>(&bytes).unwrap(), data);
}

#[test]
fn test_primitive_vectors() {
    let graft = Graft::default();
    let floats = vec![0.5f64, -1.0, f64::MAX];
    let bytes = graft.serialize(&floats).unwrap();
    assert_eq!(graft.deserialize::<Vec<f64>>(&bytes).unwrap(), floats);

    let flags = vec![true, false, true];
    let bytes = graft.serialize(&flags).unwrap();
    assert_eq!(graft.deserialize::<Vec<bool>>(&bytes).unwrap(), flags);

    let boxed: Box<[u16]> = vec![1u16, 2, 3].into_boxed_slice();
    let bytes = graft.serialize(&boxed).unwrap();
    assert_eq!(graft.deserialize::<Box<[u16]>>(&bytes).unwrap(), boxed);
}

#[test]
fn test_jagged() {
    let graft = Graft::default();
    let jagged = vec![vec![1i32, 2, 3], Vec::new(), vec![4]];
    let bytes = graft.serialize(&jagged).unwrap();
    assert_eq!(graft.deserialize::<Vec<Vec<i32>>>(&bytes).unwrap(), jagged);

    let nested = vec![Some(vec!["a".to_string()]), None];
    let bytes = graft.serialize(&nested).unwrap();
    assert_eq!(
        graft.deserialize::<Vec<Option<Vec<String>>>>(&bytes).unwrap(),
        nested
    );
}

#[test]
fn test_sequences() {
    let graft = Graft::default();

    let deque: VecDeque<i32> = VecDeque::from(vec![3, 1, 2]);
    let bytes = graft.serialize(&deque).unwrap();
    assert_eq!(graft.deserialize::<VecDeque<i32>>(&bytes).unwrap(), deque);

    let list: LinkedList<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
    let bytes = graft.serialize(&list).unwrap();
    assert_eq!(graft.deserialize::<LinkedList<String>>(&bytes).unwrap(), list);

    let ordered: BTreeSet<i64> = BTreeSet::from([5, -1, 3]);
    let bytes = graft.serialize(&ordered).unwrap();
    assert_eq!(graft.deserialize::<BTreeSet<i64>>(&bytes).unwrap(), ordered);

    let heap: BinaryHeap<u32> = BinaryHeap::from(vec![4, 9, 1]);
    let bytes = graft.serialize(&heap).unwrap();
    let back: BinaryHeap<u32> = graft.deserialize(&bytes).unwrap();
    assert_eq!(back.into_sorted_vec(), vec![1, 4, 9]);

    let set: HashSet<String> = HashSet::from(["x".to_string(), "y".to_string()]);
    let bytes = graft.serialize(&set).unwrap();
    assert_eq!(graft.deserialize::<HashSet<String>>(&bytes).unwrap(), set);
}

#[test]
fn test_sequence_matches_vector_payload() {
    let graft = Graft::default();
    let vec_bytes = graft.serialize(&vec![1i32, 2, 3]).unwrap();
    let deque_bytes = graft.serialize(&VecDeque::from(vec![1i32, 2, 3])).unwrap();
    let vec_payload = &vec_bytes[header_len::<Vec<i32>>()..];
    let deque_payload = &deque_bytes[header_len::<VecDeque<i32>>()..];
    assert_eq!(vec_payload, deque_payload);
}

#[test]
fn test_corrupt_length() {
    let graft = Graft::default();
    let mut bytes = graft.serialize(&vec![1u64, 2]).unwrap();
    let len_at = header_len::<Vec<u64>>() + 3;
    bytes[len_at..len_at + 4].copy_from_slice(&i32::MAX.to_le_bytes());
    assert!(matches!(
        graft.deserialize::<Vec<u64>>(&bytes),
        Err(Error::BufferOutOfBound(..))
    ));
}
