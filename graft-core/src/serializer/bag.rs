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

//! Dynamic property bags.
//!
//! A bag and the value list of a contract type share one wire form: an `i32`
//! entry count, then for each entry the name as a tracked string and the value
//! as a nullable polymorphic object.

use crate::error::Error;
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::serializer::{GraftDefault, Object, Serializer};
use crate::types::Shape;
use std::any::Any;

pub(crate) type Entry = (String, Option<Box<dyn Object>>);

pub(crate) fn write_entries(entries: &[Entry], context: &mut WriteContext) -> Result<(), Error> {
    context.writer.write_len(entries.len())?;
    for (name, value) in entries {
        name.graft_write(context)?;
        value.graft_write(context)?;
    }
    Ok(())
}

pub(crate) fn read_entries(context: &mut ReadContext) -> Result<Vec<Entry>, Error> {
    let len = context.reader.read_len()?;
    let mut entries = Vec::with_capacity(len.min(context.reader.remaining()));
    for _ in 0..len {
        let name = String::graft_read(context)?;
        let value = Option::<Box<dyn Object>>::graft_read(context)?;
        entries.push((name, value));
    }
    Ok(entries)
}

pub(crate) fn clone_entries(entries: &[Entry], context: &mut CloneContext) -> Result<Vec<Entry>, Error> {
    entries
        .iter()
        .map(|(name, value)| Ok((name.clone(), value.graft_clone(context)?)))
        .collect()
}

pub(crate) fn upsert(entries: &mut Vec<Entry>, name: String, value: Option<Box<dyn Object>>) {
    match entries.iter_mut().find(|(key, _)| *key == name) {
        Some(entry) => entry.1 = value,
        None => entries.push((name, value)),
    }
}

pub(crate) fn lookup<'a, T: Any>(entries: &'a [Entry], name: &str) -> Option<&'a T> {
    entries
        .iter()
        .find(|(key, _)| key == name)
        .and_then(|(_, value)| value.as_deref())
        .and_then(|object| object.downcast_ref::<T>())
}

/// Ordered name to value map whose values are any registered type.
///
/// Keys keep their insertion order; inserting an existing key replaces its
/// value in place.
///
/// ```rust
/// use graft_core::PropertyBag;
///
/// let mut bag = PropertyBag::new();
/// bag.insert("id", 7i64);
/// bag.insert("name", "seven".to_string());
/// bag.insert_null("parent");
/// assert_eq!(bag.get::<i64>("id"), Some(&7));
/// assert_eq!(bag.len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct PropertyBag {
    entries: Vec<Entry>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Serializer>(&mut self, name: impl Into<String>, value: T) {
        upsert(&mut self.entries, name.into(), Some(Box::new(value)));
    }

    pub fn insert_object(&mut self, name: impl Into<String>, value: Option<Box<dyn Object>>) {
        upsert(&mut self.entries, name.into(), value);
    }

    pub fn insert_null(&mut self, name: impl Into<String>) {
        upsert(&mut self.entries, name.into(), None);
    }

    /// Value under `name` if present, not null and of type `T`.
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        lookup(&self.entries, name)
    }

    /// `Some(None)` for a key holding null.
    pub fn get_object(&self, name: &str) -> Option<Option<&dyn Object>> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_deref())
    }

    pub fn remove(&mut self, name: &str) -> Option<Option<Box<dyn Object>>> {
        let position = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(position).1)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&dyn Object>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }
}

impl Serializer for PropertyBag {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_entries(&self.entries, context)
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        Ok(PropertyBag {
            entries: read_entries(context)?,
        })
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        Ok(PropertyBag {
            entries: clone_entries(&self.entries, context)?,
        })
    }

    #[inline(always)]
    fn graft_shape() -> Shape {
        Shape::Bag
    }
}

impl GraftDefault for PropertyBag {
    fn graft_default() -> Self {
        PropertyBag::new()
    }
}
