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

//! Keyed containers.
//!
//! Wire form: a comparer flag byte (`0` default, `1` custom followed by the
//! comparer's own encoding), an `i32` entry count, every key, then every
//! value. Each pass uses the element type's own encoding, so primitive keys
//! and values carry neither envelope nor tracking.

use crate::error::Error;
use crate::meta::{check_shape, FieldDescriptor, Validator};
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeRegistry;
use crate::serializer::{GraftDefault, Serializer};
use crate::types::{ComparerFlag, Shape};
use std::collections::hash_map::RandomState;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};

/// Equality comparer of a hashed container, i.e. its `BuildHasher`.
///
/// Default comparers carry no state and are not written. A custom comparer
/// is serialized and cloned with the container.
///
/// ```rust,ignore
/// #[derive(GraftObject, Default, Clone)]
/// struct SeededState {
///     seed: u64,
/// }
///
/// impl BuildHasher for SeededState {
///     type Hasher = DefaultHasher;
///     fn build_hasher(&self) -> DefaultHasher {
///         let mut hasher = DefaultHasher::new();
///         hasher.write_u64(self.seed);
///         hasher
///     }
/// }
///
/// impl Comparer for SeededState {}
/// ```
pub trait Comparer: BuildHasher + Serializer {
    fn is_default_comparer() -> bool {
        false
    }
}

impl Comparer for RandomState {
    fn is_default_comparer() -> bool {
        true
    }
}

impl Serializer for RandomState {
    fn graft_write_data(&self, _: &mut WriteContext) -> Result<(), Error> {
        Ok(())
    }

    fn graft_read_data(_: &mut ReadContext) -> Result<Self, Error> {
        Ok(RandomState::new())
    }

    fn graft_clone_data(&self, _: &mut CloneContext) -> Result<Self, Error> {
        Ok(RandomState::new())
    }

    fn graft_shape() -> Shape {
        Shape::Primitive
    }
}

impl GraftDefault for RandomState {
    fn graft_default() -> Self {
        RandomState::new()
    }
}

impl<H: Hasher + Default + 'static> Comparer for BuildHasherDefault<H> {
    fn is_default_comparer() -> bool {
        true
    }
}

impl<H: Hasher + Default + 'static> Serializer for BuildHasherDefault<H> {
    fn graft_write_data(&self, _: &mut WriteContext) -> Result<(), Error> {
        Ok(())
    }

    fn graft_read_data(_: &mut ReadContext) -> Result<Self, Error> {
        Ok(BuildHasherDefault::default())
    }

    fn graft_clone_data(&self, _: &mut CloneContext) -> Result<Self, Error> {
        Ok(BuildHasherDefault::default())
    }

    fn graft_shape() -> Shape {
        Shape::Primitive
    }
}

impl<H: Hasher + Default> GraftDefault for BuildHasherDefault<H> {
    fn graft_default() -> Self {
        BuildHasherDefault::default()
    }
}

pub(crate) fn write_comparer<S: Comparer>(hasher: &S, context: &mut WriteContext) -> Result<(), Error> {
    if S::is_default_comparer() {
        context.writer.write_u8(ComparerFlag::Default.into());
        Ok(())
    } else {
        context.writer.write_u8(ComparerFlag::Custom.into());
        hasher.graft_write(context)
    }
}

fn read_comparer_flag(context: &mut ReadContext) -> Result<ComparerFlag, Error> {
    let flag = context.reader.read_u8()?;
    ComparerFlag::try_from(flag).map_err(|_| Error::invalid_data(format!("invalid comparer flag {}", flag)))
}

pub(crate) fn read_comparer<S: Comparer>(context: &mut ReadContext) -> Result<S, Error> {
    match read_comparer_flag(context)? {
        ComparerFlag::Default => Ok(S::graft_default()),
        ComparerFlag::Custom => S::graft_read(context),
    }
}

pub(crate) fn clone_comparer<S: Comparer>(hasher: &S, context: &mut CloneContext) -> Result<S, Error> {
    if S::is_default_comparer() {
        Ok(S::graft_default())
    } else {
        hasher.graft_clone(context)
    }
}

fn write_entries<'a, K, V, I>(len: usize, entries: I, context: &mut WriteContext) -> Result<(), Error>
where
    K: Serializer + 'a,
    V: Serializer + 'a,
    I: Iterator<Item = (&'a K, &'a V)> + Clone,
{
    context.writer.write_len(len)?;
    for (key, _) in entries.clone() {
        key.graft_write(context)?;
    }
    for (_, value) in entries {
        value.graft_write(context)?;
    }
    Ok(())
}

fn read_entries<K: Serializer, V: Serializer>(context: &mut ReadContext) -> Result<(Vec<K>, Vec<V>), Error> {
    let len = context.reader.read_len()?;
    let keys = K::graft_read_vec(len, context)?;
    let values = V::graft_read_vec(len, context)?;
    Ok((keys, values))
}

impl<K, V, S> Serializer for HashMap<K, V, S>
where
    K: Serializer + Eq + Hash,
    V: Serializer,
    S: Comparer,
{
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_comparer(self.hasher(), context)?;
        write_entries(self.len(), self.iter(), context)
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let hasher = read_comparer::<S>(context)?;
        let (keys, values) = read_entries::<K, V>(context)?;
        let mut map = HashMap::with_capacity_and_hasher(keys.len(), hasher);
        map.extend(keys.into_iter().zip(values));
        Ok(map)
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        let hasher = clone_comparer(self.hasher(), context)?;
        let mut map = HashMap::with_capacity_and_hasher(self.len(), hasher);
        for (key, value) in self {
            map.insert(key.graft_clone(context)?, value.graft_clone(context)?);
        }
        Ok(map)
    }

    #[inline(always)]
    fn graft_shape() -> Shape {
        Shape::Map
    }

    fn graft_fields(_: &TypeRegistry) -> Result<Vec<FieldDescriptor>, Error> {
        Ok(vec![
            FieldDescriptor::component("comparer", S::graft_type_name()),
            FieldDescriptor::component("key", K::graft_type_name()),
            FieldDescriptor::component("value", V::graft_type_name()),
        ])
    }

    fn graft_validate(validator: &mut Validator) -> Result<(), Error> {
        check_shape::<Self>()?;
        let name = Self::graft_type_name();
        validator.check_member::<K>(name, "<key>")?;
        validator.check_member::<V>(name, "<value>")?;
        validator.check_member::<S>(name, "<comparer>")
    }
}

impl<K, V, S: Comparer> GraftDefault for HashMap<K, V, S> {
    fn graft_default() -> Self {
        HashMap::with_hasher(S::graft_default())
    }
}

/// Ordered by `K: Ord`; always uses the default comparer.
impl<K, V> Serializer for BTreeMap<K, V>
where
    K: Serializer + Ord,
    V: Serializer,
{
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_u8(ComparerFlag::Default.into());
        write_entries(self.len(), self.iter(), context)
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        if read_comparer_flag(context)? != ComparerFlag::Default {
            return Err(Error::invalid_data(format!(
                "{} does not take a custom comparer",
                Self::graft_type_name()
            )));
        }
        let (keys, values) = read_entries::<K, V>(context)?;
        Ok(keys.into_iter().zip(values).collect())
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        let mut map = BTreeMap::new();
        for (key, value) in self {
            map.insert(key.graft_clone(context)?, value.graft_clone(context)?);
        }
        Ok(map)
    }

    #[inline(always)]
    fn graft_shape() -> Shape {
        Shape::Map
    }

    fn graft_fields(_: &TypeRegistry) -> Result<Vec<FieldDescriptor>, Error> {
        Ok(vec![
            FieldDescriptor::component("key", K::graft_type_name()),
            FieldDescriptor::component("value", V::graft_type_name()),
        ])
    }

    fn graft_validate(validator: &mut Validator) -> Result<(), Error> {
        check_shape::<Self>()?;
        let name = Self::graft_type_name();
        validator.check_member::<K>(name, "<key>")?;
        validator.check_member::<V>(name, "<value>")
    }
}

impl<K: Ord, V> GraftDefault for BTreeMap<K, V> {
    fn graft_default() -> Self {
        BTreeMap::new()
    }
}
