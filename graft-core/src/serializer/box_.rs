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
use crate::meta::{FieldDescriptor, Validator};
use crate::resolver::context::{CloneContext, ReadContext, StreamingContext, WriteContext};
use crate::resolver::type_resolver::TypeRegistry;
use crate::serializer::{GraftDefault, Serializer};
use crate::types::Shape;

/// An owned box is encoded and validated as the value it holds.
impl<T: Serializer> Serializer for Box<T> {
    fn graft_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        T::graft_write(self.as_ref(), context)
    }

    fn graft_write_present(&self, context: &mut WriteContext) -> Result<(), Error> {
        T::graft_write_present(self.as_ref(), context)
    }

    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        T::graft_write_data(self.as_ref(), context)
    }

    fn graft_read(context: &mut ReadContext) -> Result<Self, Error> {
        Ok(Box::new(T::graft_read(context)?))
    }

    fn graft_read_present(context: &mut ReadContext) -> Result<Self, Error> {
        Ok(Box::new(T::graft_read_present(context)?))
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        Ok(Box::new(T::graft_read_data(context)?))
    }

    fn graft_read_into(&mut self, context: &mut ReadContext) -> Result<(), Error> {
        T::graft_read_into(self.as_mut(), context)
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        Ok(Box::new(T::graft_clone_data(self.as_ref(), context)?))
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

    // The boxed type may contain this box, so its estimate is not followed.
    fn graft_reserved_space() -> usize {
        std::mem::size_of::<T>()
    }

    fn graft_on_serializing(&self, context: &StreamingContext) {
        T::graft_on_serializing(self.as_ref(), context)
    }

    fn graft_on_serialized(&self, context: &StreamingContext) {
        T::graft_on_serialized(self.as_ref(), context)
    }

    fn graft_on_deserializing(&mut self, context: &StreamingContext) {
        T::graft_on_deserializing(self.as_mut(), context)
    }

    fn graft_on_deserialized(&mut self, context: &StreamingContext) {
        T::graft_on_deserialized(self.as_mut(), context)
    }

    fn graft_has_completion_hook() -> bool {
        T::graft_has_completion_hook()
    }

    fn graft_on_deserialization_complete(&mut self, context: &StreamingContext) {
        T::graft_on_deserialization_complete(self.as_mut(), context)
    }
}

impl<T: GraftDefault> GraftDefault for Box<T> {
    fn graft_default() -> Self {
        Box::new(T::graft_default())
    }
}
