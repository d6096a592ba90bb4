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

//! # Graft Core
//!
//! Runtime of the graft object-graph codec and deep cloner.
//!
//! ## Architecture
//!
//! - **`graft`**: the [`Graft`] engine and the stream header
//! - **`buffer`**: little-endian [`buffer::Writer`] and bounds-checked [`buffer::Reader`]
//! - **`meta`**: type descriptors, structural hashes and type validation
//! - **`resolver`**: the procedure cache ([`resolver::type_resolver::TypeRegistry`]),
//!   reference trackers and per-call contexts
//! - **`serializer`**: one encoder per shape
//! - **`types`**: wire constants and the [`types::Shape`] classification
//! - **`error`**: the [`Error`] type
//!
//! ## Graphs
//!
//! Values are trees unless they sit behind a [`Shared`], `Rc` or `Arc`
//! handle. Handles are tracked by identity: a handle met twice in the same
//! call is written once and referenced afterwards, so shared substructure and
//! cycles survive a round trip or a deep clone.
//!
//! ```rust
//! use graft_core::{Graft, Shared};
//!
//! let graft = Graft::default();
//! let a = Shared::new(vec![1i32, 2, 3]);
//! let pair = (a.clone(), a);
//! let bytes = graft.serialize(&pair).unwrap();
//! let (x, y): (Shared<Vec<i32>>, Shared<Vec<i32>>) = graft.deserialize(&bytes).unwrap();
//! assert!(Shared::ptr_eq(&x, &y));
//! ```
//!
//! ## Versioning
//!
//! Every stream carries the structural hash of its root type, and every
//! polymorphic slot the hash of its runtime type. A hash computed from a
//! different field list is rejected with [`Error::TypeModified`]; data is
//! never migrated.
//!
//! This crate is usually used through the `graft` crate, which adds the
//! `GraftObject` derive macro.

pub mod buffer;
pub mod config;
pub mod error;
pub mod graft;
pub mod meta;
pub mod resolver;
pub mod serializer;
pub mod types;

pub use config::{Config, DeserializeOptions, SerializeOptions, UserContext};
pub use error::Error;
pub use graft::Graft;
pub use resolver::context::{
    CloneContext, ReadContext, StreamingContext, StreamingKind, WriteContext,
};
pub use resolver::type_resolver::{FieldAccessor, Harness, TypeRegistry};
pub use serializer::{
    Array, Comparer, DataConstructor, GraftDefault, LifecycleHooks, Object, ObjectData,
    ObjectDataContract, PropertyBag, Serializer, Shared, StructSerializer,
};

#[doc(hidden)]
pub use inventory;

/// Submits the name registrations of a derived type and of the wrappers a
/// stream root or polymorphic slot commonly holds it in. Emitted by
/// `#[derive(GraftObject)]` for non-generic types.
#[cfg(feature = "auto_register")]
#[doc(hidden)]
#[macro_export]
macro_rules! submit_registration {
    (@one $ty:ty) => {
        $crate::inventory::submit! {
            $crate::resolver::type_resolver::Registration {
                type_name: <$ty as $crate::serializer::Serializer>::graft_type_name,
                type_id: ::std::any::TypeId::of::<$ty>,
                builder: $crate::resolver::type_resolver::TypeRegistry::get_or_build::<$ty>,
            }
        }
    };
    ($ty:ty) => {
        $crate::submit_registration!(@one $ty);
        $crate::submit_registration!(@one $crate::Shared<$ty>);
        $crate::submit_registration!(@one ::std::vec::Vec<$ty>);
        $crate::submit_registration!(@one ::std::option::Option<$ty>);
        $crate::submit_registration!(@one ::std::boxed::Box<$ty>);
    };
}

#[cfg(not(feature = "auto_register"))]
#[doc(hidden)]
#[macro_export]
macro_rules! submit_registration {
    ($($tt:tt)*) => {};
}
