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

use super::FieldDescriptor;
use crate::types::{HASH_MULTIPLIER, HASH_SEED};
use std::cmp::Ordering;

/// Ordinal comparison over UTF-16 code units.
pub fn cmp_field_names(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

#[inline(always)]
fn mix(hash: i32, s: &str) -> i32 {
    s.encode_utf16().fold(hash, |h, unit| {
        h.wrapping_mul(HASH_MULTIPLIER).wrapping_add(unit as i32)
    })
}

/// Fingerprint of a type name and its ordered persisted fields.
///
/// Starts from 23 and folds `hash * 31 + unit` with wrapping `i32` arithmetic
/// over the UTF-16 units of the name followed by every field name and field
/// type name, in descriptor order.
pub fn structural_hash(name: &str, fields: &[FieldDescriptor]) -> i32 {
    let hash = mix(HASH_SEED, name);
    fields.iter().fold(hash, |h, field| {
        mix(mix(h, &field.name), &field.type_name)
    })
}
