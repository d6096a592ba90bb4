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

use super::context::{CloneContext, ReadContext, StreamingContext, WriteContext};
use crate::error::Error;
use crate::meta::{cmp_field_names, structural_hash, FieldDescriptor, TypeDescriptor, Validator};
use crate::serializer::shared::{clone_object_payload, read_shared_payload};
use crate::serializer::{Object, PropertyBag, Serializer, Shared, StructSerializer};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub type WriteFn = fn(&dyn Any, &mut WriteContext) -> Result<(), Error>;
pub type ReadFn = fn(&mut ReadContext) -> Result<Box<dyn Object>, Error>;
pub type ReadSharedFn = fn(&mut ReadContext, bool) -> Result<Shared<dyn Object>, Error>;
pub type CloneFn = fn(&dyn Any, &mut CloneContext) -> Result<Box<dyn Object>, Error>;
pub type CloneSharedFn =
    fn(&Shared<dyn Object>, &mut CloneContext) -> Result<Shared<dyn Object>, Error>;
pub type CompleteFn = fn(&mut dyn Any, &StreamingContext) -> Result<(), Error>;
pub type HarnessBuilder = fn(&TypeRegistry) -> Result<Arc<Harness>, Error>;

/// Type-erased procedures of one concrete type, built once and cached by
/// [`TypeRegistry`].
#[derive(Clone, Debug)]
pub struct Harness {
    descriptor: Arc<TypeDescriptor>,
    hash: i32,
    write_fn: WriteFn,
    write_data_fn: WriteDataFn,
    read_fn: ReadFn,
    read_shared_fn: ReadSharedFn,
    clone_fn: CloneFn,
    clone_shared_fn: CloneSharedFn,
    complete_fn: CompleteFn,
}

pub type WriteDataFn = WriteFn;

impl Harness {
    #[inline(always)]
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.descriptor.name()
    }

    #[inline(always)]
    pub fn hash(&self) -> i32 {
        self.hash
    }

    /// Full encoding, including the envelope of reference-shaped types.
    #[inline(always)]
    pub fn get_write_fn(&self) -> WriteFn {
        self.write_fn
    }

    /// Payload only, used after the envelope and type marker are written.
    #[inline(always)]
    pub fn get_write_data_fn(&self) -> WriteDataFn {
        self.write_data_fn
    }

    #[inline(always)]
    pub fn get_read_fn(&self) -> ReadFn {
        self.read_fn
    }

    /// Reads the payload into a new `Shared` handle, reserving a reference
    /// slot for it when `tracked` is set.
    #[inline(always)]
    pub fn get_read_shared_fn(&self) -> ReadSharedFn {
        self.read_shared_fn
    }

    #[inline(always)]
    pub fn get_clone_fn(&self) -> CloneFn {
        self.clone_fn
    }

    #[inline(always)]
    pub fn get_clone_shared_fn(&self) -> CloneSharedFn {
        self.clone_shared_fn
    }

    #[inline(always)]
    pub fn get_complete_fn(&self) -> CompleteFn {
        self.complete_fn
    }
}

#[cold]
fn harness_mismatch<T: Serializer>() -> Error {
    Error::type_mismatch(format!(
        "harness for {} received a value of another type",
        T::graft_type_name()
    ))
}

fn write_fn<T: Serializer>(value: &dyn Any, context: &mut WriteContext) -> Result<(), Error> {
    value
        .downcast_ref::<T>()
        .ok_or_else(harness_mismatch::<T>)?
        .graft_write(context)
}

fn write_data_fn<T: Serializer>(value: &dyn Any, context: &mut WriteContext) -> Result<(), Error> {
    value
        .downcast_ref::<T>()
        .ok_or_else(harness_mismatch::<T>)?
        .graft_write_data(context)
}

fn read_fn<T: Serializer>(context: &mut ReadContext) -> Result<Box<dyn Object>, Error> {
    Ok(Box::new(T::graft_read(context)?))
}

fn read_shared_fn<T: Serializer>(
    context: &mut ReadContext,
    tracked: bool,
) -> Result<Shared<dyn Object>, Error> {
    let shared = if tracked {
        read_shared_payload::<T>(context)?
    } else {
        Shared::new(T::graft_read_data(context)?)
    };
    Ok(shared.into_object())
}

fn clone_fn<T: Serializer>(value: &dyn Any, context: &mut CloneContext) -> Result<Box<dyn Object>, Error> {
    let value = value.downcast_ref::<T>().ok_or_else(harness_mismatch::<T>)?;
    Ok(Box::new(value.graft_clone(context)?))
}

fn clone_shared_fn<T: Serializer>(
    source: &Shared<dyn Object>,
    context: &mut CloneContext,
) -> Result<Shared<dyn Object>, Error> {
    Ok(clone_object_payload::<T>(source, context)?.into_object())
}

fn complete_fn<T: Serializer>(value: &mut dyn Any, streaming: &StreamingContext) -> Result<(), Error> {
    value
        .downcast_mut::<T>()
        .ok_or_else(harness_mismatch::<T>)?
        .graft_on_deserialization_complete(streaming);
    Ok(())
}

/// Validates `T`, collects its persisted fields and assembles its harness.
pub fn build_harness<T: Serializer>(registry: &TypeRegistry) -> Result<Arc<Harness>, Error> {
    let name = T::graft_type_name();
    Validator::new().check::<T>()?;
    let fields = T::graft_fields(registry)?;
    let descriptor = TypeDescriptor::new(TypeId::of::<T>(), name, T::graft_shape(), fields);
    let hash = structural_hash(name, descriptor.fields());
    Ok(Arc::new(Harness {
        descriptor: Arc::new(descriptor),
        hash,
        write_fn: write_fn::<T>,
        write_data_fn: write_data_fn::<T>,
        read_fn: read_fn::<T>,
        read_shared_fn: read_shared_fn::<T>,
        clone_fn: clone_fn::<T>,
        clone_shared_fn: clone_shared_fn::<T>,
        complete_fn: complete_fn::<T>,
    }))
}

type FieldWriteFn<T> = Arc<dyn Fn(&T, &mut WriteContext) -> Result<(), Error> + Send + Sync>;
type FieldReadFn<T> = Arc<dyn Fn(&mut T, &mut ReadContext) -> Result<(), Error> + Send + Sync>;
type FieldCloneFn<T> =
    Arc<dyn Fn(&T, &mut T, &mut CloneContext) -> Result<(), Error> + Send + Sync>;

/// Write, read and clone procedures of one persisted field of `T`.
pub struct FieldAccessor<T> {
    name: &'static str,
    type_name: &'static str,
    write: FieldWriteFn<T>,
    read: FieldReadFn<T>,
    clone: FieldCloneFn<T>,
}

impl<T> Clone for FieldAccessor<T> {
    fn clone(&self) -> Self {
        FieldAccessor {
            name: self.name,
            type_name: self.type_name,
            write: self.write.clone(),
            read: self.read.clone(),
            clone: self.clone.clone(),
        }
    }
}

impl<T: 'static> FieldAccessor<T> {
    pub fn new<W, R, C>(
        name: &'static str,
        type_name: &'static str,
        write: W,
        read: R,
        clone: C,
    ) -> Self
    where
        W: Fn(&T, &mut WriteContext) -> Result<(), Error> + Send + Sync + 'static,
        R: Fn(&mut T, &mut ReadContext) -> Result<(), Error> + Send + Sync + 'static,
        C: Fn(&T, &mut T, &mut CloneContext) -> Result<(), Error> + Send + Sync + 'static,
    {
        FieldAccessor {
            name,
            type_name,
            write: Arc::new(write),
            read: Arc::new(read),
            clone: Arc::new(clone),
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline(always)]
    pub fn write(&self, value: &T, context: &mut WriteContext) -> Result<(), Error> {
        (self.write)(value, context)
    }

    #[inline(always)]
    pub fn read(&self, target: &mut T, context: &mut ReadContext) -> Result<(), Error> {
        (self.read)(target, context)
    }

    #[inline(always)]
    pub fn clone_field(&self, source: &T, target: &mut T, context: &mut CloneContext) -> Result<(), Error> {
        (self.clone)(source, target, context)
    }

    /// Re-targets an accessor of a base type onto the type embedding it.
    pub fn lift<O: 'static>(self, get: fn(&O) -> &T, get_mut: fn(&mut O) -> &mut T) -> FieldAccessor<O> {
        let FieldAccessor {
            name,
            type_name,
            write,
            read,
            clone,
        } = self;
        FieldAccessor {
            name,
            type_name,
            write: Arc::new(move |o: &O, context: &mut WriteContext| write(get(o), context)),
            read: Arc::new(move |o: &mut O, context: &mut ReadContext| read(get_mut(o), context)),
            clone: Arc::new(move |source: &O, target: &mut O, context: &mut CloneContext| {
                clone(get(source), get_mut(target), context)
            }),
        }
    }
}

/// Persisted fields of a derived struct in wire order.
pub struct StructPlan<T> {
    fields: Vec<FieldAccessor<T>>,
}

impl<T> StructPlan<T> {
    pub fn fields(&self) -> &[FieldAccessor<T>] {
        &self.fields
    }
}

/// Registration submitted by `#[derive(GraftObject)]` for name resolution.
pub struct Registration {
    pub type_name: fn() -> &'static str,
    pub type_id: fn() -> TypeId,
    pub builder: HarnessBuilder,
}

#[cfg(feature = "auto_register")]
inventory::collect!(Registration);

#[derive(Clone, Copy)]
struct NameEntry {
    type_id: TypeId,
    builder: HarnessBuilder,
}

/// Procedure cache and name table of one [`crate::Graft`] engine.
///
/// All caches may be populated concurrently. Two threads building the same
/// type race harmlessly: the first inserted entry is kept and returned to both.
pub struct TypeRegistry {
    harnesses: DashMap<TypeId, Arc<Harness>>,
    plans: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    names: DashMap<String, NameEntry>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! register_builtins {
    ($registry:expr, $($ty:ty),+ $(,)?) => {
        $(
            $registry.register_name::<$ty>();
            $registry.register_name::<Vec<$ty>>();
            $registry.register_name::<Option<$ty>>();
            $registry.register_name::<HashMap<String, $ty>>();
            $registry.register_name::<BTreeMap<String, $ty>>();
        )+
    };
}

impl TypeRegistry {
    pub fn new() -> TypeRegistry {
        let registry = TypeRegistry {
            harnesses: DashMap::new(),
            plans: DashMap::new(),
            names: DashMap::new(),
        };
        register_builtins!(
            registry,
            bool,
            i8,
            i16,
            i32,
            i64,
            i128,
            isize,
            u8,
            u16,
            u32,
            u64,
            u128,
            usize,
            f32,
            f64,
            char,
            String,
            NaiveDate,
            NaiveTime,
            NaiveDateTime,
            DateTime<Utc>,
            chrono::Duration,
            std::time::Duration,
        );
        registry.register_name::<()>();
        registry.register_name::<PropertyBag>();
        #[cfg(feature = "auto_register")]
        for registration in inventory::iter::<Registration> {
            registry.insert_name(
                (registration.type_name)(),
                (registration.type_id)(),
                registration.builder,
            );
        }
        registry
    }

    fn insert_name(&self, name: &str, type_id: TypeId, builder: HarnessBuilder) {
        let entry = self.names.entry(name.to_owned()).or_insert(NameEntry { type_id, builder });
        if entry.type_id != type_id {
            log::warn!("type name {} is already registered for another type; keeping the first", name);
        }
    }

    /// Makes `T` resolvable by its type name without building it.
    pub fn register_name<T: Serializer>(&self) {
        self.insert_name(T::graft_type_name(), TypeId::of::<T>(), Self::get_or_build::<T>);
    }

    /// Registers `T` by name and builds its harness, surfacing validation
    /// errors immediately.
    pub fn register<T: Serializer>(&self) -> Result<(), Error> {
        self.register_name::<T>();
        self.get_or_build::<T>().map(|_| ())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Cached harness of `T`, built on first request.
    pub fn get_or_build<T: Serializer>(&self) -> Result<Arc<Harness>, Error> {
        let type_id = TypeId::of::<T>();
        if let Some(harness) = self.harnesses.get(&type_id) {
            return Ok(harness.value().clone());
        }
        let built = build_harness::<T>(self)?;
        let harness = self.harnesses.entry(type_id).or_insert(built).value().clone();
        self.register_name::<T>();
        log::debug!(
            "built harness for {} (hash {}, {} fields)",
            harness.name(),
            harness.hash(),
            harness.descriptor().fields().len()
        );
        Ok(harness)
    }

    /// Harness of the type registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<Arc<Harness>, Error> {
        let builder = self
            .names
            .get(name)
            .map(|entry| entry.builder)
            .ok_or_else(|| Error::type_not_found(name.to_owned()))?;
        builder(self)
    }

    pub fn fields_of<T: Serializer>(&self) -> Result<Arc<TypeDescriptor>, Error> {
        Ok(self.get_or_build::<T>()?.descriptor().clone())
    }

    pub fn structural_hash<T: Serializer>(&self) -> Result<i32, Error> {
        Ok(self.get_or_build::<T>()?.hash())
    }

    /// Hash of the type registered under `name`, `None` when the name does
    /// not resolve.
    pub fn structural_hash_of_name(&self, name: &str) -> Option<i32> {
        self.resolve(name).ok().map(|harness| harness.hash())
    }

    /// Builds and caches the field plan of `T` and returns its persisted
    /// fields in wire order.
    pub fn build_plan<T: StructSerializer>(&self) -> Result<Vec<FieldDescriptor>, Error> {
        let mut fields = T::graft_field_accessors(self)?;
        fields.sort_by(|a, b| cmp_field_names(a.name(), b.name()));
        if let Some(pair) = fields.windows(2).find(|pair| pair[0].name() == pair[1].name()) {
            return Err(Error::unsupported(format!(
                "{}: field {} is declared more than once",
                T::graft_type_name(),
                pair[0].name()
            )));
        }
        let descriptors = fields
            .iter()
            .map(|f| FieldDescriptor::new(f.name(), f.type_name()))
            .collect();
        log::debug!(
            "built field plan for {} ({} fields)",
            T::graft_type_name(),
            fields.len()
        );
        let plan: Arc<dyn Any + Send + Sync> = Arc::new(StructPlan { fields });
        self.plans.entry(TypeId::of::<T>()).or_insert(plan);
        Ok(descriptors)
    }

    fn cached_plan<T: StructSerializer>(&self) -> Option<Arc<StructPlan<T>>> {
        let plan = self.plans.get(&TypeId::of::<T>())?.value().clone();
        plan.downcast::<StructPlan<T>>().ok()
    }

    pub fn plan<T: StructSerializer>(&self) -> Result<Arc<StructPlan<T>>, Error> {
        if let Some(plan) = self.cached_plan::<T>() {
            return Ok(plan);
        }
        self.get_or_build::<T>()?;
        if let Some(plan) = self.cached_plan::<T>() {
            return Ok(plan);
        }
        // harness survived a concurrent clear
        self.build_plan::<T>()?;
        match self.cached_plan::<T>() {
            Some(plan) => Ok(plan),
            None => crate::bail!("no field plan for {}", T::graft_type_name()),
        }
    }

    /// Number of cached harnesses.
    pub fn cached_len(&self) -> usize {
        self.harnesses.len()
    }

    /// Drops every cached harness and plan. Name registrations are kept.
    pub fn clear(&self) {
        self.harnesses.clear();
        self.plans.clear();
    }
}
