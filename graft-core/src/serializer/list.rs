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
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeRegistry;
use crate::serializer::array::{read_vector_len, write_vector_header};
use crate::serializer::{GraftDefault, Serializer};
use crate::types::Shape;

/// Rank-1 array. Nested vectors form jagged arrays: every inner vector is
/// written inside its own envelope.
impl<T: Serializer> Serializer for Vec<T> {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_vector_header(self.len(), context)?;
        T::graft_write_slice(self, context)
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_vector_len(context)?;
        T::graft_read_vec(len, context)
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        T::graft_clone_slice(self, context)
    }

    #[inline(always)]
    fn graft_shape() -> Shape {
        Shape::Array
    }

    fn graft_fields(_: &TypeRegistry) -> Result<Vec<FieldDescriptor>, Error> {
        Ok(vec![FieldDescriptor::component("element", T::graft_type_name())])
    }

    fn graft_validate(validator: &mut Validator) -> Result<(), Error> {
        check_shape::<Self>()?;
        validator.check_member::<T>(Self::graft_type_name(), "<element>")
    }

    fn graft_reserved_space() -> usize {
        5
    }
}

impl<T> GraftDefault for Vec<T> {
    fn graft_default() -> Self {
        Vec::new()
    }
}

impl<T: Serializer> Serializer for Box<[T]> {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_vector_header(self.len(), context)?;
        T::graft_write_slice(self, context)
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_vector_len(context)?;
        Ok(T::graft_read_vec(len, context)?.into_boxed_slice())
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        Ok(T::graft_clone_slice(self, context)?.into_boxed_slice())
    }

    #[inline(always)]
    fn graft_shape() -> Shape {
        Shape::Array
    }

    fn graft_fields(_: &TypeRegistry) -> Result<Vec<FieldDescriptor>, Error> {
        Ok(vec![FieldDescriptor::component("element", T::graft_type_name())])
    }

    fn graft_validate(validator: &mut Validator) -> Result<(), Error> {
        check_shape::<Self>()?;
        validator.check_member::<T>(Self::graft_type_name(), "<element>")
    }
}

impl<T> GraftDefault for Box<[T]> {
    fn graft_default() -> Self {
        Vec::new().into_boxed_slice()
    }
}
