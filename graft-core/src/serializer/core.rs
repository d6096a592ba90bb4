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
use crate::meta::{check_shape, FieldDescriptor, Validator};
use crate::resolver::context::{CloneContext, ReadContext, StreamingContext, WriteContext};
use crate::resolver::type_resolver::{FieldAccessor, Harness, TypeRegistry};
use crate::types::{NullFlag, RefFlag, Shape};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Raw construction path used for placeholders that are filled field by
/// field. Never runs user constructors.
pub trait GraftDefault: Sized {
    fn graft_default() -> Self;
}

// A blanket impl over `T: Default` would conflict with impls for foreign
// types such as `Box<dyn Object>`, so every serializable type implements
// `GraftDefault` itself.

pub trait Serializer: GraftDefault + 'static {
    /// Entry point for a value in a typed slot.
    ///
    /// Reference-shaped types are written inside the null/tracked envelope,
    /// value-shaped types as bare payload.
    fn graft_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        if Self::graft_is_reference() {
            context.writer.write_u8(NullFlag::NotNull.into());
            self.graft_write_present(context)
        } else {
            self.graft_write_data(context)
        }
    }

    /// Writes a known-present value: the ref flag for reference-shaped types,
    /// then the payload.
    ///
    /// `Shared`, `Rc`, `Arc` and `String` override this to write
    /// back-references.
    fn graft_write_present(&self, context: &mut WriteContext) -> Result<(), Error> {
        if Self::graft_is_reference() {
            context.writer.write_u8(RefFlag::FirstVisit.into());
        }
        self.graft_write_data(context)
    }

    /// Writes the payload only.
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error>;

    fn graft_read(context: &mut ReadContext) -> Result<Self, Error> {
        if Self::graft_is_reference() {
            match read_null_flag(context)? {
                NullFlag::NotNull => Self::graft_read_present(context),
                NullFlag::Null => Err(Error::invalid_data(format!(
                    "null found for non-nullable {}",
                    Self::graft_type_name()
                ))),
            }
        } else {
            Self::graft_read_data(context)
        }
    }

    fn graft_read_present(context: &mut ReadContext) -> Result<Self, Error> {
        if Self::graft_is_reference() {
            match context.ref_reader.read_ref_flag(&mut context.reader)? {
                RefFlag::FirstVisit => Self::graft_read_data(context),
                RefFlag::Tracked => Err(Error::invalid_ref(format!(
                    "{} is an owned value and cannot be back-referenced",
                    Self::graft_type_name()
                ))),
            }
        } else {
            Self::graft_read_data(context)
        }
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error>;

    /// Reads the payload into an existing placeholder.
    ///
    /// Derived structs override this so that a `Shared` placeholder is filled
    /// in place, which lets cycles resolve to it while it is being read.
    fn graft_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        *self = Self::graft_read_data(context)?;
        Ok(())
    }

    fn graft_clone(&self, context: &mut CloneContext) -> Result<Self, Error> {
        self.graft_clone_data(context)
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error>;

    fn graft_clone_into(&self, target: &mut Self, context: &mut CloneContext) -> Result<(), Error> {
        *target = self.graft_clone_data(context)?;
        Ok(())
    }

    fn graft_shape() -> Shape;

    #[inline(always)]
    fn graft_is_reference() -> bool {
        Self::graft_shape().is_reference()
    }

    /// Name written to streams and used for name resolution and hashing.
    fn graft_type_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Persisted fields, or component pseudo-fields for containers.
    #[allow(unused_variables)]
    fn graft_fields(registry: &TypeRegistry) -> Result<Vec<FieldDescriptor>, Error> {
        Ok(Vec::new())
    }

    /// Rejects unsupported shapes. Containers also check their components.
    #[allow(unused_variables)]
    fn graft_validate(validator: &mut Validator) -> Result<(), Error> {
        check_shape::<Self>()
    }

    /// Writes a run of elements. Primitives override this with bulk copies.
    fn graft_write_slice(items: &[Self], context: &mut WriteContext) -> Result<(), Error> {
        context
            .writer
            .reserve(items.len() * Self::graft_reserved_space());
        for item in items {
            item.graft_write(context)?;
        }
        Ok(())
    }

    fn graft_read_vec(len: usize, context: &mut ReadContext) -> Result<Vec<Self>, Error> {
        // a corrupt length must not trigger a huge allocation
        let mut items = Vec::with_capacity(len.min(context.reader.remaining()));
        for _ in 0..len {
            items.push(Self::graft_read(context)?);
        }
        Ok(items)
    }

    fn graft_clone_slice(items: &[Self], context: &mut CloneContext) -> Result<Vec<Self>, Error> {
        items.iter().map(|item| item.graft_clone(context)).collect()
    }

    /// Bytes typically needed by one encoded value.
    #[inline(always)]
    fn graft_reserved_space() -> usize {
        0
    }

    #[allow(unused_variables)]
    fn graft_on_serializing(&self, context: &StreamingContext) {}

    #[allow(unused_variables)]
    fn graft_on_serialized(&self, context: &StreamingContext) {}

    #[allow(unused_variables)]
    fn graft_on_deserializing(&mut self, context: &StreamingContext) {}

    #[allow(unused_variables)]
    fn graft_on_deserialized(&mut self, context: &StreamingContext) {}

    #[inline(always)]
    fn graft_has_completion_hook() -> bool {
        false
    }

    #[allow(unused_variables)]
    fn graft_on_deserialization_complete(&mut self, context: &StreamingContext) {}
}

#[inline(always)]
pub(crate) fn read_null_flag(context: &mut ReadContext) -> Result<NullFlag, Error> {
    let flag = context.reader.read_u8()?;
    NullFlag::try_from(flag).map_err(|_| Error::invalid_data(format!("invalid null flag {}", flag)))
}

/// Implemented by `#[derive(GraftObject)]` for structs.
pub trait StructSerializer: Serializer {
    /// Accessors of every persisted field, flattened bases included, in
    /// declaration order.
    fn graft_field_accessors(registry: &TypeRegistry) -> Result<Vec<FieldAccessor<Self>>, Error>;
}

/// Callbacks around serialization and deserialization of a struct.
///
/// Opt in with `#[graft(hooks)]` and implement the methods you need. Hooks of
/// a `#[graft(base)]` field run before the hooks of the type embedding it.
/// The cloner does not run hooks.
///
/// ```rust,ignore
/// #[derive(GraftObject, Default)]
/// #[graft(hooks)]
/// struct Session {
///     user: String,
///     #[graft(skip)]
///     cache_key: String,
/// }
///
/// impl LifecycleHooks for Session {
///     fn on_deserialized(&mut self, _: &StreamingContext) {
///         self.cache_key = format!("session:{}", self.user);
///     }
/// }
/// ```
pub trait LifecycleHooks {
    #[allow(unused_variables)]
    fn on_serializing(&self, context: &StreamingContext) {}

    #[allow(unused_variables)]
    fn on_serialized(&self, context: &StreamingContext) {}

    #[allow(unused_variables)]
    fn on_deserializing(&mut self, context: &StreamingContext) {}

    #[allow(unused_variables)]
    fn on_deserialized(&mut self, context: &StreamingContext) {}

    /// Runs once the whole graph has been read, for values held in a
    /// `Shared` handle and for the root value.
    #[allow(unused_variables)]
    fn on_deserialization_complete(&mut self, context: &StreamingContext) {}
}

/// Object-safe view of any serializable value, used by polymorphic slots.
pub trait Object: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn graft_object_type_name(&self) -> &'static str;

    fn graft_harness(&self, registry: &TypeRegistry) -> Result<Arc<Harness>, Error>;
}

impl<T: Serializer> Object for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn graft_object_type_name(&self) -> &'static str {
        T::graft_type_name()
    }

    fn graft_harness(&self, registry: &TypeRegistry) -> Result<Arc<Harness>, Error> {
        registry.get_or_build::<T>()
    }
}

impl dyn Object {
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn downcast<T: Any>(self: Box<Self>) -> Result<Box<T>, Error> {
        let name = (*self).graft_object_type_name();
        self.into_any().downcast::<T>().map_err(|_| {
            Error::type_mismatch(format!(
                "{} is not a {}",
                name,
                std::any::type_name::<T>()
            ))
        })
    }
}

impl fmt::Debug for dyn Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({})", self.graft_object_type_name())
    }
}
