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
use graft_core::meta::{structural_hash, FieldDescriptor};
use graft_core::{Graft, Object, Serializer};
use graft_derive::GraftObject;
use std::collections::HashMap;

mod v1 {
    use graft_derive::GraftObject;

    #[derive(GraftObject, Debug, PartialEq)]
    #[graft(name = "tests.Sample")]
    pub struct Sample {
        pub value: i32,
        pub maybe: Option<String>,
    }
}

mod v2 {
    use graft_derive::GraftObject;

    #[derive(GraftObject, Debug, PartialEq)]
    #[graft(name = "tests.Sample")]
    pub struct Sample {
        pub value: i64,
        pub maybe: Option<String>,
    }
}

mod counter {
    use graft_derive::GraftObject;

    #[derive(GraftObject, Debug, PartialEq)]
    #[graft(name = "tests.Counter")]
    pub struct Base {
        pub value: i32,
        pub maybe: Option<i32>,
    }

    #[derive(GraftObject, Debug, PartialEq)]
    #[graft(name = "tests.Counter")]
    pub struct Added {
        pub value: i32,
        pub maybe: Option<i32>,
        pub extra: i32,
    }

    #[derive(GraftObject, Debug, PartialEq)]
    #[graft(name = "tests.Counter")]
    pub struct Removed {
        pub value: i32,
    }
}

#[derive(GraftObject, Debug, PartialEq)]
#[graft(name = "tests.Pet")]
struct PetV1<T> {
    name: String,
    tag: T,
}

#[derive(GraftObject, Debug, PartialEq)]
#[graft(name = "tests.Pet")]
struct PetV2<T> {
    name: String,
    tag: T,
    age: u8,
}

#[derive(GraftObject)]
struct Kennel {
    pet: Box<dyn Object>,
}

#[derive(GraftObject, Debug, PartialEq)]
struct Chain {
    value: i32,
    next: Option<Box<Chain>>,
}

#[derive(GraftObject, Debug, PartialEq)]
struct Tree {
    label: String,
    children: Vec<Tree>,
}

#[derive(GraftObject, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(GraftObject, Debug, PartialEq)]
struct Person {
    name: String,
    age: u8,
    nicknames: Vec<String>,
    home: Option<Point>,
    scores: HashMap<String, f64>,
}

#[derive(GraftObject, Debug, PartialEq)]
struct Ordered {
    zeta: i32,
    alpha: i32,
    _beta: i32,
}

#[derive(GraftObject, Debug, PartialEq)]
struct Cached {
    key: String,
    #[graft(skip)]
    lookups: usize,
}

#[derive(GraftObject, Debug, PartialEq)]
struct Meters(f64, String);

#[derive(GraftObject, Debug, PartialEq)]
struct Marker;

#[derive(GraftObject, Debug, PartialEq, Clone, Copy)]
enum Color {
    Red,
    Green,
    Blue,
}

#[derive(GraftObject, Debug, PartialEq)]
struct Palette {
    primary: Color,
    others: Vec<Color>,
}

#[derive(GraftObject, Debug, PartialEq)]
struct Entity {
    id: i64,
}

#[derive(GraftObject, Debug, PartialEq)]
struct User {
    #[graft(base)]
    entity: Entity,
    name: String,
}

#[derive(GraftObject, Debug, PartialEq)]
struct Conflicting {
    #[graft(base)]
    entity: Entity,
    id: i64,
}

#[derive(GraftObject, Debug, PartialEq)]
struct Pair<A, B> {
    first: A,
    second: B,
}

#[test]
fn test_simple_struct() {
    let graft = Graft::default();
    let sample = v1::Sample {
        value: 42,
        maybe: None,
    };
    let bytes = graft.serialize(&sample).unwrap();
    let back: v1::Sample = graft.deserialize(&bytes).unwrap();
    assert_eq!(back, sample);
}

#[test]
fn test_nested_struct() {
    let graft = Graft::default();
    let person = Person {
        name: "Ada".to_string(),
        age: 36,
        nicknames: vec!["countess".to_string()],
        home: Some(Point { x: 1, y: -1 }),
        scores: HashMap::from([("math".to_string(), 99.5)]),
    };
    let bytes = graft.serialize(&person).unwrap();
    let back: Person = graft.deserialize(&bytes).unwrap();
    assert_eq!(back, person);
}

#[test]
fn test_changed_field_type_rejected() {
    let graft = Graft::default();
    let bytes = graft
        .serialize(&v1::Sample {
            value: 1,
            maybe: Some("x".to_string()),
        })
        .unwrap();
    assert!(matches!(
        graft.deserialize::<v2::Sample>(&bytes),
        Err(Error::TypeModified(_))
    ));
}

#[test]
fn test_added_field_rejected() {
    let graft = Graft::default();
    let bytes = graft
        .serialize(&counter::Base {
            value: 42,
            maybe: None,
        })
        .unwrap();
    assert!(matches!(
        graft.deserialize::<counter::Added>(&bytes),
        Err(Error::TypeModified(_))
    ));
    assert_eq!(
        graft.deserialize::<counter::Base>(&bytes).unwrap(),
        counter::Base {
            value: 42,
            maybe: None
        }
    );
}

#[test]
fn test_removed_field_rejected() {
    let graft = Graft::default();
    let bytes = graft
        .serialize(&counter::Base {
            value: 7,
            maybe: Some(3),
        })
        .unwrap();
    assert!(matches!(
        graft.deserialize::<counter::Removed>(&bytes),
        Err(Error::TypeModified(_))
    ));

    let bytes = graft.serialize(&counter::Removed { value: 7 }).unwrap();
    assert!(matches!(
        graft.deserialize::<counter::Base>(&bytes),
        Err(Error::TypeModified(_))
    ));
}

#[test]
fn test_polymorphic_member_modified() {
    let writer = Graft::default();
    let kennel = Kennel {
        pet: Box::new(PetV1 {
            name: "rex".to_string(),
            tag: 4u8,
        }),
    };
    let bytes = writer.serialize(&kennel).unwrap();
    let back: Kennel = writer.deserialize(&bytes).unwrap();
    assert_eq!(
        back.pet.downcast_ref::<PetV1<u8>>(),
        Some(&PetV1 {
            name: "rex".to_string(),
            tag: 4
        })
    );

    let reader = Graft::default();
    reader.register::<PetV2<u8>>().unwrap();
    assert!(matches!(
        reader.deserialize::<Kennel>(&bytes),
        Err(Error::TypeModified(_))
    ));
}

#[test]
fn test_self_containing_struct() {
    let graft = Graft::default();
    let single = Chain {
        value: 1,
        next: None,
    };
    let bytes = graft.serialize(&single).unwrap();
    assert_eq!(graft.deserialize::<Chain>(&bytes).unwrap(), single);

    let chain = Chain {
        value: 1,
        next: Some(Box::new(Chain {
            value: 2,
            next: Some(Box::new(Chain {
                value: 3,
                next: None,
            })),
        })),
    };
    let bytes = graft.serialize(&chain).unwrap();
    assert_eq!(graft.deserialize::<Chain>(&bytes).unwrap(), chain);
    assert_eq!(graft.deep_clone(&chain).unwrap(), chain);

    let tree = Tree {
        label: "root".to_string(),
        children: vec![
            Tree {
                label: "a".to_string(),
                children: Vec::new(),
            },
            Tree {
                label: "b".to_string(),
                children: vec![Tree {
                    label: "c".to_string(),
                    children: Vec::new(),
                }],
            },
        ],
    };
    let bytes = graft.serialize(&tree).unwrap();
    assert_eq!(graft.deserialize::<Tree>(&bytes).unwrap(), tree);
    let trees = vec![tree];
    let bytes = graft.serialize(&trees).unwrap();
    assert_eq!(graft.deserialize::<Vec<Tree>>(&bytes).unwrap(), trees);
}

#[test]
fn test_field_order_is_ordinal() {
    let graft = Graft::default();
    let descriptor = graft.registry().fields_of::<Ordered>().unwrap();
    let names: Vec<&str> = descriptor.field_names().collect();
    assert_eq!(names, vec!["_beta", "alpha", "zeta"]);

    let value = Ordered {
        zeta: 3,
        alpha: 1,
        _beta: 2,
    };
    let bytes = graft.serialize(&value).unwrap();
    let payload = &bytes[bytes.len() - 12..];
    assert_eq!(&payload[..4], &2i32.to_le_bytes());
    assert_eq!(&payload[4..8], &1i32.to_le_bytes());
    assert_eq!(&payload[8..], &3i32.to_le_bytes());
}

#[test]
fn test_structural_hash() {
    let graft = Graft::default();
    let name = std::any::type_name::<Point>();
    assert_eq!(<Point as Serializer>::graft_type_name(), name);
    let expected = structural_hash(
        name,
        &[
            FieldDescriptor::new("x", "i32"),
            FieldDescriptor::new("y", "i32"),
        ],
    );
    assert_eq!(graft.registry().structural_hash::<Point>().unwrap(), expected);

    let bytes = graft.serialize(&Point { x: 0, y: 0 }).unwrap();
    let at = 2 + 1 + 4 + name.len();
    assert_eq!(&bytes[at..at + 4], &expected.to_le_bytes());
}

#[test]
fn test_renamed_type() {
    assert_eq!(
        <v1::Sample as Serializer>::graft_type_name(),
        "tests.Sample"
    );
}

#[test]
fn test_skipped_field() {
    let graft = Graft::default();
    let value = Cached {
        key: "k".to_string(),
        lookups: 9,
    };
    let bytes = graft.serialize(&value).unwrap();
    let back: Cached = graft.deserialize(&bytes).unwrap();
    assert_eq!(back.key, "k");
    assert_eq!(back.lookups, 0);

    let descriptor = graft.registry().fields_of::<Cached>().unwrap();
    assert_eq!(descriptor.field_names().collect::<Vec<_>>(), vec!["key"]);
}

#[test]
fn test_tuple_and_unit_struct() {
    let graft = Graft::default();
    let meters = Meters(2.5, "m".to_string());
    let bytes = graft.serialize(&meters).unwrap();
    assert_eq!(graft.deserialize::<Meters>(&bytes).unwrap(), meters);

    let bytes = graft.serialize(&Marker).unwrap();
    assert_eq!(graft.deserialize::<Marker>(&bytes).unwrap(), Marker);
}

#[test]
fn test_enum() {
    let graft = Graft::default();
    let palette = Palette {
        primary: Color::Blue,
        others: vec![Color::Red, Color::Green],
    };
    let bytes = graft.serialize(&palette).unwrap();
    assert_eq!(graft.deserialize::<Palette>(&bytes).unwrap(), palette);

    let mut bytes = graft.serialize(&Color::Green).unwrap();
    let at = bytes.len() - 4;
    assert_eq!(&bytes[at..], &1i32.to_le_bytes());
    bytes[at..].copy_from_slice(&7i32.to_le_bytes());
    assert!(matches!(
        graft.deserialize::<Color>(&bytes),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_base_fields_flattened() {
    let graft = Graft::default();
    let descriptor = graft.registry().fields_of::<User>().unwrap();
    assert_eq!(
        descriptor.field_names().collect::<Vec<_>>(),
        vec!["id", "name"]
    );

    let user = User {
        entity: Entity { id: 7 },
        name: "grace".to_string(),
    };
    let bytes = graft.serialize(&user).unwrap();
    assert_eq!(graft.deserialize::<User>(&bytes).unwrap(), user);
}

#[test]
fn test_duplicate_field_name() {
    let graft = Graft::default();
    let value = Conflicting {
        entity: Entity { id: 1 },
        id: 2,
    };
    match graft.serialize(&value) {
        Err(Error::Unsupported(msg)) => assert!(msg.contains("id")),
        other => panic!("expected unsupported, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_generic_struct() {
    let graft = Graft::default();
    let pair = Pair {
        first: 1u16,
        second: vec!["a".to_string()],
    };
    let bytes = graft.serialize(&pair).unwrap();
    let back: Pair<u16, Vec<String>> = graft.deserialize(&bytes).unwrap();
    assert_eq!(back, pair);
}
