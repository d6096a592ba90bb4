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

//! Custom serialization contract.
//!
//! A contract type decides itself which named values represent it, and is
//! rebuilt from those values by its data constructor. The derive macro wires
//! a type to the helpers below with `#[graft(contract)]`.

use crate::error::Error;
use crate::meta::check_shape;
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::serializer::bag::{clone_entries, lookup, read_entries, upsert, write_entries, Entry};
use crate::serializer::{Object, Serializer};
use std::any::Any;

pub type DataConstructor<T> = fn(ObjectData) -> Result<T, Error>;

/// Ordered named values produced and consumed by an [`ObjectDataContract`].
#[derive(Debug, Default)]
pub struct ObjectData {
    entries: Vec<Entry>,
}

impl ObjectData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value. Adding a name twice replaces the earlier value.
    pub fn add<T: Serializer>(&mut self, name: impl Into<String>, value: T) {
        upsert(&mut self.entries, name.into(), Some(Box::new(value)));
    }

    pub fn add_null(&mut self, name: impl Into<String>) {
        upsert(&mut self.entries, name.into(), None);
    }

    pub fn add_object(&mut self, name: impl Into<String>, value: Option<Box<dyn Object>>) {
        upsert(&mut self.entries, name.into(), value);
    }

    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        lookup(&self.entries, name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Moves the value under `name` out. Missing, null and wrongly typed
    /// values are errors.
    pub fn take<T: Any>(&mut self, name: &str) -> Result<T, Error> {
        self.take_opt(name)?
            .ok_or_else(|| Error::invalid_data(format!("value {} is null", name)))
    }

    /// Like [`ObjectData::take`], but a null value is `Ok(None)`.
    pub fn take_opt<T: Any>(&mut self, name: &str) -> Result<Option<T>, Error> {
        let entry = self
            .entries
            .iter_mut()
            .find(|(key, _)| key == name)
            .ok_or_else(|| Error::invalid_data(format!("missing value {}", name)))?;
        match entry.1.take() {
            None => Ok(None),
            Some(object) => <dyn Object>::downcast::<T>(object).map(|value| Some(*value)),
        }
    }
}

/// Custom serialization contract.
///
/// ```rust,ignore
/// #[derive(GraftObject)]
/// #[graft(contract)]
/// struct Temperature {
///     celsius: f64,
/// }
///
/// impl ObjectDataContract for Temperature {
///     fn get_object_data(&self, data: &mut ObjectData) -> Result<(), Error> {
///         data.add("kelvin", self.celsius + 273.15);
///         Ok(())
///     }
///
///     fn data_constructor() -> Option<DataConstructor<Self>> {
///         Some(|mut data| Ok(Temperature { celsius: data.take::<f64>("kelvin")? - 273.15 }))
///     }
/// }
/// ```
pub trait ObjectDataContract: Sized {
    fn get_object_data(&self, data: &mut ObjectData) -> Result<(), Error>;

    /// Rebuilds a value from the data written by
    /// [`ObjectDataContract::get_object_data`]. A type without one fails
    /// validation with [`Error::MissingConstructor`].
    fn data_constructor() -> Option<DataConstructor<Self>> {
        None
    }
}

fn constructor<T: ObjectDataContract + Serializer>() -> Result<DataConstructor<T>, Error> {
    T::data_constructor().ok_or_else(|| Error::missing_constructor(T::graft_type_name()))
}

pub fn write_data<T: ObjectDataContract>(this: &T, context: &mut WriteContext) -> Result<(), Error> {
    let mut data = ObjectData::new();
    this.get_object_data(&mut data)?;
    write_entries(&data.entries, context)
}

pub fn read_data<T: ObjectDataContract + Serializer>(context: &mut ReadContext) -> Result<T, Error> {
    let construct = constructor::<T>()?;
    let entries = read_entries(context)?;
    construct(ObjectData { entries })
}

pub fn clone_data<T: ObjectDataContract + Serializer>(
    this: &T,
    context: &mut CloneContext,
) -> Result<T, Error> {
    let construct = constructor::<T>()?;
    let mut data = ObjectData::new();
    this.get_object_data(&mut data)?;
    let entries = clone_entries(&data.entries, context)?;
    construct(ObjectData { entries })
}

pub fn validate<T: ObjectDataContract + Serializer>() -> Result<(), Error> {
    check_shape::<T>()?;
    constructor::<T>().map(|_| ())
}
