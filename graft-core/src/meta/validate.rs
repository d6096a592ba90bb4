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

use crate::error::Error;
use crate::serializer::Serializer;
use crate::types::{Shape, UnsupportedKind};
use std::any::TypeId;
use std::collections::HashSet;

const ANONYMOUS_MARKERS: [&str; 3] = ["{{closure}}", "{{anon", "{{coroutine}}"];

/// Rejects compiler-synthesized type names.
pub fn check_type_name(name: &str) -> Result<(), Error> {
    if ANONYMOUS_MARKERS.iter().any(|m| name.contains(m)) {
        return Err(Error::unsupported(format!(
            "{}: {}",
            name,
            UnsupportedKind::Anonymous
        )));
    }
    Ok(())
}

/// Walks a type through its value-typed fields and container element types,
/// rejecting shapes the codec cannot encode.
///
/// Handle targets are walked too. Recursive types terminate through the
/// visiting set.
#[derive(Default)]
pub struct Validator {
    visiting: HashSet<TypeId>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check<T: Serializer>(&mut self) -> Result<(), Error> {
        let type_id = TypeId::of::<T>();
        if !self.visiting.insert(type_id) {
            return Ok(());
        }
        let result = T::graft_validate(self);
        self.visiting.remove(&type_id);
        result
    }

    /// Checks the type of a member (field, element, key, value) of `owner`.
    pub fn check_member<T: Serializer>(&mut self, owner: &str, member: &str) -> Result<(), Error> {
        self.check::<T>().map_err(|e| e.within(owner, member))
    }
}

/// Default validation of a single type: its name and its shape.
pub fn check_shape<T: Serializer>() -> Result<(), Error> {
    check_type_name(T::graft_type_name())?;
    match T::graft_shape() {
        Shape::Unsupported(kind) => Err(Error::unsupported(format!(
            "{}: {}",
            T::graft_type_name(),
            kind
        ))),
        _ => Ok(()),
    }
}
