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

use graft_core::{Comparer, Graft, Shared};
use graft_derive::GraftObject;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::{BuildHasher, DefaultHasher, Hasher};

#[derive(GraftObject, Debug, Clone, Default)]
struct SeededState {
    seed: u64,
}

impl BuildHasher for SeededState {
    type Hasher = DefaultHasher;

    fn build_hasher(&self) -> DefaultHasher {
        let mut hasher = DefaultHasher::new();
        hasher.write_u64(self.seed);
        hasher
    }
}

impl Comparer for SeededState {}

#[derive(GraftObject)]
struct Inventory {
    counts: HashMap<String, u32>,
    tags: BTreeMap<i32, Vec<String>>,
    owners: HashMap<i64, Shared<String>>,
}

#[test]
fn test_hash_map() {
    let graft = Graft::default();
    let map: HashMap<String, Vec<i32>> = HashMap::from([
        ("a".to_string(), vec![1, 2]),
        ("b".to_string(), Vec::new()),
    ]);
    let bytes = graft.serialize(&map).unwrap();
    let back: HashMap<String, Vec<i32>> = graft.deserialize(&bytes).unwrap();
    assert_eq!(back, map);
}

#[test]
fn test_btree_map_keeps_order() {
    let graft = Graft::default();
    let map = BTreeMap::from([(3, "c".to_string()), (1, "a".to_string())]);
    let bytes = graft.serialize(&map).unwrap();
    let back: BTreeMap<i32, String> = graft.deserialize(&bytes).unwrap();
    assert_eq!(back.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(back, map);
}

#[test]
fn test_empty_map() {
    let graft = Graft::default();
    let map: HashMap<u8, u8> = HashMap::new();
    let bytes = graft.serialize(&map).unwrap();
    assert!(graft.deserialize::<HashMap<u8, u8>>(&bytes).unwrap().is_empty());
}

#[test]
fn test_maps_in_struct() {
    let graft = Graft::default();
    let owner = Shared::new("lin".to_string());
    let inventory = Inventory {
        counts: HashMap::from([("bolt".to_string(), 12)]),
        tags: BTreeMap::from([(1, vec!["steel".to_string()])]),
        owners: HashMap::from([(1, owner.clone()), (2, owner)]),
    };
    let bytes = graft.serialize(&inventory).unwrap();
    let back: Inventory = graft.deserialize(&bytes).unwrap();
    assert_eq!(back.counts, inventory.counts);
    assert_eq!(back.tags, inventory.tags);
    assert!(Shared::ptr_eq(&back.owners[&1], &back.owners[&2]));
    assert_eq!(*back.owners[&1].borrow(), "lin");
}

#[test]
fn test_custom_comparer() {
    let graft = Graft::default();
    let mut map = HashMap::with_hasher(SeededState { seed: 99 });
    map.insert("x".to_string(), 1i32);
    map.insert("y".to_string(), 2i32);

    let bytes = graft.serialize(&map).unwrap();
    let back: HashMap<String, i32, SeededState> = graft.deserialize(&bytes).unwrap();
    assert_eq!(back.hasher().seed, 99);
    assert_eq!(back.get("x"), Some(&1));
    assert_eq!(back.get("y"), Some(&2));

    let cloned = graft.deep_clone(&map).unwrap();
    assert_eq!(cloned.hasher().seed, 99);
    assert_eq!(cloned.len(), 2);
}

#[test]
fn test_custom_comparer_set() {
    let graft = Graft::default();
    let mut set = HashSet::with_hasher(SeededState { seed: 7 });
    set.insert(10u32);
    set.insert(20u32);

    let bytes = graft.serialize(&set).unwrap();
    let back: HashSet<u32, SeededState> = graft.deserialize(&bytes).unwrap();
    assert_eq!(back.hasher().seed, 7);
    assert!(back.contains(&10) && back.contains(&20));
}

#[test]
fn test_default_comparer_not_written() {
    let graft = Graft::default();
    let default_bytes = graft
        .serialize(&HashMap::from([(1u8, 1u8)]))
        .unwrap();
    let mut custom = HashMap::with_hasher(SeededState { seed: 0 });
    custom.insert(1u8, 1u8);
    let custom_bytes = graft.serialize(&custom).unwrap();
    let default_name = <HashMap<u8, u8> as graft_core::Serializer>::graft_type_name();
    let custom_name = <HashMap<u8, u8, SeededState> as graft_core::Serializer>::graft_type_name();
    // the custom comparer adds its u64 seed to the payload
    assert_eq!(
        custom_bytes.len() - custom_name.len(),
        default_bytes.len() - default_name.len() + 8
    );
}
