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

//! `RefCell<T>` is encoded as the value it holds. It carries no identity of
//! its own; wrap it in [`crate::Shared`] or `Rc` for that.

use crate::error::Error;
use crate::meta::{FieldDescriptor, Validator};
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeRegistry;
use crate::serializer::{GraftDefault, Serializer};
use crate::types::Shape;
use std::cell::{Ref, RefCell};

fn borrow_cell<T: Serializer>(cell: &RefCell<T>) -> Result<Ref<'_, T>, Error> {
    cell.try_borrow().map_err(|_| {
        Error::not_allowed(format!(
            "RefCell<{}> is mutably borrowed",
            T::graft_type_name()
        ))
    })
}

impl<T: Serializer> Serializer for RefCell<T> {
    fn graft_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        T::graft_write(&*borrow_cell(self)?, context)
    }

    fn graft_write_present(&self, context: &mut WriteContext) -> Result<(), Error> {
        T::graft_write_present(&*borrow_cell(self)?, context)
    }

    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        T::graft_write_data(&*borrow_cell(self)?, context)
    }

    fn graft_read(context: &mut ReadContext) -> Result<Self, Error> {
        Ok(RefCell::new(T::graft_read(context)?))
    }

    fn graft_read_present(context: &mut ReadContext) -> Result<Self, Error> {
        Ok(RefCell::new(T::graft_read_present(context)?))
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        Ok(RefCell::new(T::graft_read_data(context)?))
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        Ok(RefCell::new(T::graft_clone_data(&*borrow_cell(self)?, context)?))
    }

    fn graft_shape() -> Shape {
        T::graft_shape()
    }

    fn graft_fields(registry: &TypeRegistry) -> Result<Vec<FieldDescriptor>, Error> {
        T::graft_fields(registry)
    }

    fn graft_validate(validator: &mut Validator) -> Result<(), Error> {
        validator.check::<T>()
    }

    fn graft_reserved_space() -> usize {
        T::graft_reserved_space()
    }
}

impl<T: GraftDefault> GraftDefault for RefCell<T> {
    fn graft_default() -> Self {
        RefCell::new(T::graft_default())
    }
}
