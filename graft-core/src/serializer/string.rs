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
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::serializer::{GraftDefault, Serializer};
use crate::types::{RefFlag, Shape};
use std::mem;

/// Strings are tracked by value: equal strings in one stream are written once
/// and back-referenced after that.
impl Serializer for String {
    fn graft_write_present(&self, context: &mut WriteContext) -> Result<(), Error> {
        if context.ref_writer.try_write_str_ref(context.writer, self) {
            return Ok(());
        }
        self.graft_write_data(context)
    }

    #[inline]
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_raw_string(self)
    }

    fn graft_read_present(context: &mut ReadContext) -> Result<Self, Error> {
        match context.ref_reader.read_ref_flag(&mut context.reader)? {
            RefFlag::Tracked => {
                let index = context.ref_reader.read_ref_index(&mut context.reader)?;
                context.ref_reader.get_str(index)
            }
            RefFlag::FirstVisit => {
                let s = Self::graft_read_data(context)?;
                context.ref_reader.store_str(&s);
                Ok(s)
            }
        }
    }

    #[inline]
    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        context.reader.read_raw_string()
    }

    #[inline]
    fn graft_clone_data(&self, _: &mut CloneContext) -> Result<Self, Error> {
        Ok(self.clone())
    }

    #[inline(always)]
    fn graft_shape() -> Shape {
        Shape::String
    }

    #[inline]
    fn graft_reserved_space() -> usize {
        mem::size_of::<i32>() + 2
    }
}

impl GraftDefault for String {
    #[inline(always)]
    fn graft_default() -> Self {
        String::new()
    }
}
