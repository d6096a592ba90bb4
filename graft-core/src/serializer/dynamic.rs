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

//! Polymorphic slots: `Box<dyn Object>` and `Shared<dyn Object>`.
//!
//! The static type of such a slot says nothing about its content, so the
//! payload is preceded by a [`TypeMarker::Derived`] byte, the runtime type
//! name and its structural hash. The reader resolves the name through the
//! registry and refuses a hash that differs from the local type.

use crate::error::Error;
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::resolver::type_resolver::Harness;
use crate::serializer::shared::borrow_shared;
use crate::serializer::{GraftDefault, Object, Serializer, Shared};
use crate::types::{RefFlag, Shape, TypeMarker};
use std::sync::Arc;

fn write_type_marker(harness: &Harness, context: &mut WriteContext) -> Result<(), Error> {
    context.writer.write_u8(TypeMarker::Derived.into());
    context.writer.write_raw_string(harness.name())?;
    context.writer.write_i32(harness.hash());
    Ok(())
}

fn read_type_marker(context: &mut ReadContext) -> Result<Arc<Harness>, Error> {
    let marker = context.reader.read_u8()?;
    match TypeMarker::try_from(marker) {
        Ok(TypeMarker::Derived) => {}
        Ok(TypeMarker::Exact) => {
            return Err(Error::invalid_data(
                "exact type marker in a polymorphic slot",
            ))
        }
        Err(_) => return Err(Error::invalid_data(format!("invalid type marker {}", marker))),
    }
    let name = context.reader.read_raw_string()?;
    let hash = context.reader.read_i32()?;
    let harness = context.registry().resolve(&name)?;
    if harness.hash() != hash {
        return Err(Error::type_modified(format!(
            "{} (stream hash {}, local hash {})",
            name,
            hash,
            harness.hash()
        )));
    }
    Ok(harness)
}

/// Owned polymorphic value. Never null and never tracked itself; the value
/// inside is written with its full encoding.
impl Serializer for Box<dyn Object> {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        let object: &dyn Object = &**self;
        let harness = object.graft_harness(context.registry())?;
        write_type_marker(&harness, context)?;
        (harness.get_write_fn())(object.as_any(), context)
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let harness = read_type_marker(context)?;
        (harness.get_read_fn())(context)
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        let object: &dyn Object = &**self;
        let harness = object.graft_harness(context.registry())?;
        (harness.get_clone_fn())(object.as_any(), context)
    }

    #[inline(always)]
    fn graft_shape() -> Shape {
        Shape::Dynamic
    }
}

impl GraftDefault for Box<dyn Object> {
    fn graft_default() -> Self {
        Box::new(())
    }
}

impl Serializer for Shared<dyn Object> {
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
        let object = borrow_shared(self)?;
        let harness = (*object).graft_harness(context.registry())?;
        write_type_marker(&harness, context)?;
        (harness.get_write_data_fn())((*object).as_any(), context)
    }

    fn graft_read_present(context: &mut ReadContext) -> Result<Self, Error> {
        match context.ref_reader.read_ref_flag(&mut context.reader)? {
            RefFlag::Tracked => {
                let index = context.ref_reader.read_ref_index(&mut context.reader)?;
                context.ref_reader.get_object(index)
            }
            RefFlag::FirstVisit => {
                let harness = read_type_marker(context)?;
                (harness.get_read_shared_fn())(context, true)
            }
        }
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let harness = read_type_marker(context)?;
        (harness.get_read_shared_fn())(context, false)
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        if let Some(clone) = context.tracker.get_object_for(self.addr())? {
            return Ok(clone);
        }
        let harness = (*borrow_shared(self)?).graft_harness(context.registry())?;
        (harness.get_clone_shared_fn())(self, context)
    }

    #[inline(always)]
    fn graft_shape() -> Shape {
        Shape::Shared
    }
}

impl GraftDefault for Shared<dyn Object> {
    fn graft_default() -> Self {
        Shared::from_value(())
    }
}
