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

//! Field loop shared by every `#[derive(GraftObject)]` struct.
//!
//! Fields are visited in the order of the cached [`crate::resolver::type_resolver::StructPlan`],
//! which is the order of their names. Hooks run around the loop.

use crate::error::Error;
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::serializer::StructSerializer;

#[inline]
pub fn write_data<T: StructSerializer>(this: &T, context: &mut WriteContext) -> Result<(), Error> {
    let plan = context.registry().plan::<T>()?;
    this.graft_on_serializing(context.streaming());
    for field in plan.fields() {
        field.write(this, context)?;
    }
    this.graft_on_serialized(context.streaming());
    Ok(())
}

#[inline]
pub fn read_data<T: StructSerializer>(context: &mut ReadContext) -> Result<T, Error> {
    let mut value = T::graft_default();
    read_into(&mut value, context)?;
    Ok(value)
}

pub fn read_into<T: StructSerializer>(this: &mut T, context: &mut ReadContext) -> Result<(), Error> {
    let plan = context.registry().plan::<T>()?;
    this.graft_on_deserializing(context.streaming());
    for field in plan.fields() {
        field.read(this, context)?;
    }
    this.graft_on_deserialized(context.streaming());
    Ok(())
}

#[inline]
pub fn clone_data<T: StructSerializer>(this: &T, context: &mut CloneContext) -> Result<T, Error> {
    let mut target = T::graft_default();
    clone_into(this, &mut target, context)?;
    Ok(target)
}

pub fn clone_into<T: StructSerializer>(
    this: &T,
    target: &mut T,
    context: &mut CloneContext,
) -> Result<(), Error> {
    let plan = context.registry().plan::<T>()?;
    for field in plan.fields() {
        field.clone_field(this, target, context)?;
    }
    Ok(())
}
