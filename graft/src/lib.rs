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

//! # Graft
//!
//! Binary serializer and deep cloner for object graphs.
//!
//! Derive [`GraftObject`] on your types, then serialize with an engine of
//! your own or with the process-wide one behind the free functions of this
//! crate.
//!
//! ```rust, ignore
//! use graft::{GraftObject, Shared};
//!
//! #[derive(GraftObject)]
//! struct Node {
//!     value: i32,
//!     next: Option<Shared<Node>>,
//! }
//!
//! let node = Shared::new(Node { value: 1, next: None });
//! node.borrow_mut().next = Some(node.clone());
//!
//! let bytes = graft::serialize(&node)?;
//! let copy: Shared<Node> = graft::deserialize(&bytes)?;
//! let next = copy.borrow().next.clone().unwrap();
//! assert!(Shared::ptr_eq(&copy, &next));
//! ```
//!
//! The crate using the derive must also depend on `graft-core`.

use std::sync::OnceLock;

pub use graft_core::{
    buffer, config, error, meta, resolver, serializer, types, Array, Comparer, Config,
    DataConstructor, DeserializeOptions, Error, Graft, LifecycleHooks, Object, ObjectData,
    ObjectDataContract, PropertyBag, SerializeOptions, Serializer, Shared, StreamingContext,
    StreamingKind,
};
pub use graft_derive::GraftObject;

static ENGINE: OnceLock<Graft> = OnceLock::new();

/// The process-wide engine used by the free functions, created on first use.
pub fn engine() -> &'static Graft {
    ENGINE.get_or_init(Graft::default)
}

pub fn serialize<T: Serializer>(value: &T) -> Result<Vec<u8>, Error> {
    engine().serialize(value)
}

pub fn deserialize<T: Serializer>(bytes: &[u8]) -> Result<T, Error> {
    engine().deserialize(bytes)
}

pub fn deserialize_any(bytes: &[u8]) -> Result<Box<dyn Object>, Error> {
    engine().deserialize_any(bytes)
}

pub fn deep_clone<T: Serializer>(value: &T) -> Result<T, Error> {
    engine().deep_clone(value)
}
