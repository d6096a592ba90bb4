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
use crate::serializer::{GraftDefault, Serializer};
use crate::types::Shape;

/// Tuples are value-shaped; elements are written in order, each with its full
/// encoding. The descriptor names the elements `0`, `1`, ...
macro_rules! impl_tuple_serializer {
    ($($idx:tt $ty:ident),+) => {
        impl<$($ty: Serializer),+> Serializer for ($($ty,)+) {
            fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
                $(self.$idx.graft_write(context)?;)+
                Ok(())
            }

            fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
                Ok(($($ty::graft_read(context)?,)+))
            }

            fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
                Ok(($(self.$idx.graft_clone(context)?,)+))
            }

            #[inline(always)]
            fn graft_shape() -> Shape {
                Shape::Tuple
            }

            fn graft_fields(_: &TypeRegistry) -> Result<Vec<FieldDescriptor>, Error> {
                Ok(vec![$(FieldDescriptor::new(stringify!($idx), $ty::graft_type_name()),)+])
            }

            fn graft_validate(validator: &mut Validator) -> Result<(), Error> {
                check_shape::<Self>()?;
                $(validator.check_member::<$ty>(Self::graft_type_name(), stringify!($idx))?;)+
                Ok(())
            }

            fn graft_reserved_space() -> usize {
                0 $(+ $ty::graft_reserved_space())+
            }
        }

        impl<$($ty: GraftDefault),+> GraftDefault for ($($ty,)+) {
            fn graft_default() -> Self {
                ($($ty::graft_default(),)+)
            }
        }
    };
}

impl_tuple_serializer!(0 A);
impl_tuple_serializer!(0 A, 1 B);
impl_tuple_serializer!(0 A, 1 B, 2 C);
impl_tuple_serializer!(0 A, 1 B, 2 C, 3 D);
impl_tuple_serializer!(0 A, 1 B, 2 C, 3 D, 4 E);
impl_tuple_serializer!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
