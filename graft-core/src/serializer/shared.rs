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

//! Handles with identity: [`Shared`], `Rc` and `Arc`.
//!
//! A handle is tracked by the address of its allocation. The first visit
//! writes the payload, later visits in the same call write a back-reference,
//! so shared substructure stays shared and cycles terminate.

use crate::error::Error;
use crate::meta::{check_shape, FieldDescriptor, Validator};
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeRegistry;
use crate::serializer::{GraftDefault, Object, Serializer};
use crate::types::{RefFlag, Shape};
use std::any::Any;
use std::cell::{BorrowError, BorrowMutError, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Mutable shared handle with identity semantics.
///
/// Use `Shared<T>` for values referenced from several places or from
/// themselves. Two `Shared` values are the same object when they point at the
/// same allocation, which [`Shared::ptr_eq`] tests.
///
/// ```rust
/// use graft_core::Shared;
///
/// let a = Shared::new(vec![1, 2]);
/// let b = a.clone();
/// b.borrow_mut().push(3);
/// assert_eq!(*a.borrow(), vec![1, 2, 3]);
/// assert!(Shared::ptr_eq(&a, &b));
/// ```
pub struct Shared<T: ?Sized>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Shared<T> {
        Shared(Rc::new(RefCell::new(value)))
    }
}

impl<T: ?Sized> Shared<T> {
    /// Panics if the value is mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Panics if the value is borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    pub fn try_borrow(&self) -> Result<Ref<'_, T>, BorrowError> {
        self.0.try_borrow()
    }

    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, T>, BorrowMutError> {
        self.0.try_borrow_mut()
    }

    /// Address of the shared allocation, the identity used for tracking.
    #[inline(always)]
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        a.addr() == b.addr()
    }

    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl<T: Serializer> Shared<T> {
    /// Same allocation viewed as a polymorphic object.
    pub fn into_object(self) -> Shared<dyn Object> {
        let inner: Rc<RefCell<dyn Object>> = self.0;
        Shared(inner)
    }
}

impl Shared<dyn Object> {
    pub fn from_value<T: Serializer>(value: T) -> Shared<dyn Object> {
        Shared::new(value).into_object()
    }

    /// Borrows the object as `T`. `None` when it holds another type or is
    /// mutably borrowed.
    pub fn borrow_as<T: Any>(&self) -> Option<Ref<'_, T>> {
        let guard = self.0.try_borrow().ok()?;
        Ref::filter_map(guard, |object| object.as_any().downcast_ref::<T>()).ok()
    }

    pub fn borrow_mut_as<T: Any>(&self) -> Option<RefMut<'_, T>> {
        let guard = self.0.try_borrow_mut().ok()?;
        RefMut::filter_map(guard, |object| object.as_any_mut().downcast_mut::<T>()).ok()
    }

    /// Runtime type name of the held object.
    pub fn object_type_name(&self) -> Option<&'static str> {
        self.0
            .try_borrow()
            .ok()
            .map(|object| object.graft_object_type_name())
    }
}

impl<T: ?Sized> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(self.0.clone())
    }
}

impl<T: ?Sized> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({:#x})", self.addr())
    }
}

pub(crate) fn borrow_shared<T: ?Sized>(shared: &Shared<T>) -> Result<Ref<'_, T>, Error> {
    shared.try_borrow().map_err(|_| {
        Error::not_allowed(format!(
            "Shared<{}> is mutably borrowed",
            std::any::type_name::<T>()
        ))
    })
}

pub(crate) fn borrow_shared_mut<T: ?Sized>(shared: &Shared<T>) -> Result<RefMut<'_, T>, Error> {
    shared.try_borrow_mut().map_err(|_| {
        Error::not_allowed(format!(
            "Shared<{}> is already borrowed",
            std::any::type_name::<T>()
        ))
    })
}

/// Reads the payload of a first-visit `Shared<T>`.
///
/// The slot is reserved and filled with a placeholder before the payload is
/// read, so back-references inside the payload resolve to the placeholder.
pub(crate) fn read_shared_payload<T: Serializer>(context: &mut ReadContext) -> Result<Shared<T>, Error> {
    let index = context.ref_reader.reserve();
    let shared = Shared::new(T::graft_default());
    context.ref_reader.fill_shared(index, &shared)?;
    borrow_shared_mut(&shared)?.graft_read_into(context)?;
    if T::graft_has_completion_hook() {
        let handle = shared.clone();
        context.defer_completion(Box::new(move |streaming| {
            borrow_shared_mut(&handle)?.graft_on_deserialization_complete(streaming);
            Ok(())
        }));
    }
    Ok(shared)
}

/// Clones the object behind a polymorphic handle whose runtime type is `T`.
pub(crate) fn clone_object_payload<T: Serializer>(
    source: &Shared<dyn Object>,
    context: &mut CloneContext,
) -> Result<Shared<T>, Error> {
    let clone = Shared::new(T::graft_default());
    context
        .tracker
        .track_shared(source.addr(), Box::new(source.clone()), &clone);
    let guard = borrow_shared(source)?;
    let value = (*guard).as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::type_mismatch(format!(
            "{} is not a {}",
            (*guard).graft_object_type_name(),
            T::graft_type_name()
        ))
    })?;
    value.graft_clone_into(&mut *borrow_shared_mut(&clone)?, context)?;
    Ok(clone)
}

impl<T: Serializer> Serializer for Shared<T> {
    fn graft_write_present(&self, context: &mut WriteContext) -> Result<(), Error> {
        if context
            .ref_writer
            .try_write_ref(context.writer, self.addr(), Box::new(self.clone()))
        {
            return Ok(());
        }
        self.graft_write_data(context)
    }

    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        borrow_shared(self)?.graft_write_data(context)
    }

    fn graft_read_present(context: &mut ReadContext) -> Result<Self, Error> {
        match context.ref_reader.read_ref_flag(&mut context.reader)? {
            RefFlag::Tracked => {
                let index = context.ref_reader.read_ref_index(&mut context.reader)?;
                context.ref_reader.get_shared::<T>(index)
            }
            RefFlag::FirstVisit => read_shared_payload::<T>(context),
        }
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        Ok(Shared::new(T::graft_read_data(context)?))
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        let addr = self.addr();
        if let Some(clone) = context.tracker.get_clone_for::<Shared<T>>(addr)? {
            return Ok(clone);
        }
        let clone = Shared::new(T::graft_default());
        context
            .tracker
            .track_shared(addr, Box::new(self.clone()), &clone);
        let source = borrow_shared(self)?;
        source.graft_clone_into(&mut *borrow_shared_mut(&clone)?, context)?;
        Ok(clone)
    }

    #[inline(always)]
    fn graft_shape() -> Shape {
        Shape::Shared
    }

    fn graft_fields(_: &TypeRegistry) -> Result<Vec<FieldDescriptor>, Error> {
        Ok(vec![FieldDescriptor::component("target", T::graft_type_name())])
    }

    fn graft_validate(validator: &mut Validator) -> Result<(), Error> {
        check_shape::<Self>()?;
        validator.check_member::<T>(Self::graft_type_name(), "<target>")
    }
}

impl<T: GraftDefault> GraftDefault for Shared<T> {
    fn graft_default() -> Self {
        Shared::new(T::graft_default())
    }
}

macro_rules! impl_handle_serializer {
    ($handle:ident) => {
        /// Immutable shared handle. Tracked by allocation like [`Shared`], but
        /// a cycle through it cannot be rebuilt and is reported as
        /// [`Error::InvalidRef`].
        impl<T: Serializer> Serializer for $handle<T> {
            fn graft_write_present(&self, context: &mut WriteContext) -> Result<(), Error> {
                let addr = $handle::as_ptr(self) as *const () as usize;
                if context
                    .ref_writer
                    .try_write_ref(context.writer, addr, Box::new(self.clone()))
                {
                    return Ok(());
                }
                self.graft_write_data(context)
            }

            fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
                T::graft_write_data(self, context)
            }

            fn graft_read_present(context: &mut ReadContext) -> Result<Self, Error> {
                match context.ref_reader.read_ref_flag(&mut context.reader)? {
                    RefFlag::Tracked => {
                        let index = context.ref_reader.read_ref_index(&mut context.reader)?;
                        context.ref_reader.get_handle::<$handle<T>>(index)
                    }
                    RefFlag::FirstVisit => {
                        let index = context.ref_reader.reserve();
                        let handle = $handle::new(T::graft_read_data(context)?);
                        context.ref_reader.fill_handle(index, handle.clone())?;
                        Ok(handle)
                    }
                }
            }

            fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
                Ok($handle::new(T::graft_read_data(context)?))
            }

            fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
                let addr = $handle::as_ptr(self) as *const () as usize;
                if let Some(clone) = context.tracker.get_clone_for::<$handle<T>>(addr)? {
                    return Ok(clone);
                }
                context.tracker.enter(addr)?;
                let result = T::graft_clone_data(self, context);
                context.tracker.leave(addr);
                let clone = $handle::new(result?);
                context
                    .tracker
                    .track_handle(addr, Box::new(self.clone()), clone.clone());
                Ok(clone)
            }

            #[inline(always)]
            fn graft_shape() -> Shape {
                Shape::Shared
            }

            fn graft_fields(_: &TypeRegistry) -> Result<Vec<FieldDescriptor>, Error> {
                Ok(vec![FieldDescriptor::component("target", T::graft_type_name())])
            }

            fn graft_validate(validator: &mut Validator) -> Result<(), Error> {
                check_shape::<Self>()?;
                validator.check_member::<T>(Self::graft_type_name(), "<target>")
            }
        }

        impl<T: GraftDefault> GraftDefault for $handle<T> {
            fn graft_default() -> Self {
                $handle::new(T::graft_default())
            }
        }
    };
}

impl_handle_serializer!(Rc);
impl_handle_serializer!(Arc);
