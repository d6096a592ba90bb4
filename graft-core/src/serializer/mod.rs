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

//! Per-shape encoders.
//!
//! Every serializable type implements [`Serializer`]. Value-shaped types are
//! written as bare payload; reference-shaped types are wrapped in the
//! null/tracked envelope, and only handles with identity and strings are
//! ever written as back-references.

pub mod array;
mod bag;
mod box_;
pub mod contract;
mod core;
mod datetime;
mod dynamic;
mod list;
pub mod map;
mod number;
mod option;
mod refcell;
mod sequence;
pub mod shared;
mod string;
pub mod struct_;
mod tuple;
mod unsupported;

pub use self::core::{GraftDefault, LifecycleHooks, Object, Serializer, StructSerializer};
pub use array::{Array, Indices};
pub use bag::PropertyBag;
pub use contract::{DataConstructor, ObjectData, ObjectDataContract};
pub use map::Comparer;
pub use shared::Shared;
