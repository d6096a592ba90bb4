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

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// Version written at the head of every stream.
pub const ENGINE_VERSION: i16 = 1;

/// Highest array rank the wire format can carry.
pub const MAX_ARRAY_RANK: usize = 254;

pub const HASH_SEED: i32 = 23;
pub const HASH_MULTIPLIER: i32 = 31;

pub mod header_flags {
    /// The root type name is not written after the flags byte.
    pub const OMIT_ROOT_TYPE_NAME: u8 = 1;
}

/// First byte of the envelope around every reference-shaped value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum NullFlag {
    Null = 0,
    NotNull = 1,
}

/// Second byte of the envelope, present when the value is not null.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum RefFlag {
    // Already written in this stream; an i32 back-reference index follows.
    Tracked = 0,
    // First visit; the payload follows.
    FirstVisit = 1,
}

/// Marker written in front of a polymorphic slot payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum TypeMarker {
    Exact = 0,
    Derived = 1,
}

/// Leading byte of keyed containers and sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum ComparerFlag {
    Default = 0,
    Custom = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnsupportedKind {
    Function,
    Pointer,
    UntypedSequence,
    Anonymous,
    Opaque,
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnsupportedKind::Function => "function values cannot be serialized",
            UnsupportedKind::Pointer => "pointer types cannot be serialized",
            UnsupportedKind::UntypedSequence => "lazily evaluated sequences cannot be serialized",
            UnsupportedKind::Anonymous => "compiler generated types cannot be serialized",
            UnsupportedKind::Opaque => "opaque runtime types cannot be serialized",
        };
        f.write_str(text)
    }
}

/// Closed classification of a type, resolved once per type and used to pick
/// its encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Primitive,
    String,
    Nullable,
    Array,
    Sequence,
    Map,
    Tuple,
    Contract,
    Bag,
    Struct,
    Shared,
    Dynamic,
    Unsupported(UnsupportedKind),
}

impl Shape {
    /// Reference-shaped values are wrapped in the null/tracked envelope.
    #[inline(always)]
    pub const fn is_reference(self) -> bool {
        matches!(
            self,
            Shape::String
                | Shape::Array
                | Shape::Sequence
                | Shape::Map
                | Shape::Contract
                | Shape::Bag
                | Shape::Shared
        )
    }
}
