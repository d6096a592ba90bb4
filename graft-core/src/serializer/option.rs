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
use crate::serializer::core::read_null_flag;
use crate::serializer::{GraftDefault, Serializer};
use crate::types::{NullFlag, Shape};

/// A presence byte, then the value. For reference-shaped `T` the presence
/// byte doubles as the null flag of the envelope.
impl<T: Serializer> Serializer for Option<T> {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        match self {
            None => {
                context.writer.write_u8(NullFlag::Null.into());
                Ok(())
            }
            Some(value) => {
                context.writer.write_u8(NullFlag::NotNull.into());
                value.graft_write_present(context)
            }
        }
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        match read_null_flag(context)? {
            NullFlag::Null => Ok(None),
            NullFlag::NotNull => Ok(Some(T::graft_read_present(context)?)),
        }
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        match self {
            None => Ok(None),
            Some(value) => Ok(Some(value.graft_clone(context)?)),
        }
    }

    #[inline(always)]
    fn graft_shape() -> Shape {
        Shape::Nullable
    }

    fn graft_fields(_: &TypeRegistry) -> Result<Vec<FieldDescriptor>, Error> {
        Ok(vec![FieldDescriptor::component("value", T::graft_type_name())])
    }

    fn graft_validate(validator: &mut Validator) -> Result<(), Error> {
        check_shape::<Self>()?;
        validator.check_member::<T>(Self::graft_type_name(), "<value>")
    }

    #[inline(always)]
    fn graft_reserved_space() -> usize {
        1 + T::graft_reserved_space()
    }
}

impl<T> GraftDefault for Option<T> {
    #[inline(always)]
    fn graft_default() -> Self {
        None
    }
}
