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

use crate::buffer::{Reader, Writer};
use crate::error::Error;
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::serializer::{GraftDefault, Serializer};
use crate::types::Shape;
use std::mem;

#[inline(always)]
fn check_run(reader: &Reader, len: usize, width: usize) -> Result<(), Error> {
    match len.checked_mul(width) {
        Some(bytes) if bytes <= reader.remaining() => Ok(()),
        _ => Err(Error::buffer_out_of_bound(
            reader.get_cursor(),
            len.saturating_mul(width),
            reader.get_cursor() + reader.remaining(),
        )),
    }
}

macro_rules! impl_num_serializer {
    ($ty:ty, $default:expr, $width:expr, $writer:expr, $reader:expr) => {
        impl Serializer for $ty {
            #[inline(always)]
            fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
                $writer(context.writer, *self);
                Ok(())
            }

            #[inline(always)]
            fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
                $reader(&mut context.reader)
            }

            #[inline(always)]
            fn graft_clone_data(&self, _: &mut CloneContext) -> Result<Self, Error> {
                Ok(*self)
            }

            #[inline(always)]
            fn graft_shape() -> Shape {
                Shape::Primitive
            }

            fn graft_write_slice(items: &[Self], context: &mut WriteContext) -> Result<(), Error> {
                context.writer.reserve(items.len() * $width);
                for &item in items {
                    $writer(context.writer, item);
                }
                Ok(())
            }

            fn graft_read_vec(len: usize, context: &mut ReadContext) -> Result<Vec<Self>, Error> {
                check_run(&context.reader, len, $width)?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push($reader(&mut context.reader)?);
                }
                Ok(items)
            }

            #[inline(always)]
            fn graft_clone_slice(items: &[Self], _: &mut CloneContext) -> Result<Vec<Self>, Error> {
                Ok(items.to_vec())
            }

            #[inline(always)]
            fn graft_reserved_space() -> usize {
                $width
            }
        }

        impl GraftDefault for $ty {
            #[inline(always)]
            fn graft_default() -> Self {
                $default
            }
        }
    };
}

fn write_isize(writer: &mut Writer, value: isize) {
    writer.write_i64(value as i64);
}

fn read_isize(reader: &mut Reader) -> Result<isize, Error> {
    let value = reader.read_i64()?;
    isize::try_from(value).map_err(|_| Error::invalid_data(format!("{} does not fit in isize", value)))
}

fn write_usize(writer: &mut Writer, value: usize) {
    writer.write_u64(value as u64);
}

fn read_usize(reader: &mut Reader) -> Result<usize, Error> {
    let value = reader.read_u64()?;
    usize::try_from(value).map_err(|_| Error::invalid_data(format!("{} does not fit in usize", value)))
}

fn write_char(writer: &mut Writer, value: char) {
    writer.write_u32(value as u32);
}

fn read_char(reader: &mut Reader) -> Result<char, Error> {
    let value = reader.read_u32()?;
    char::from_u32(value).ok_or_else(|| Error::invalid_data(format!("invalid char scalar {:#x}", value)))
}

impl_num_serializer!(bool, false, 1, Writer::write_bool, Reader::read_bool);
impl_num_serializer!(i16, 0, 2, Writer::write_i16, Reader::read_i16);
impl_num_serializer!(i32, 0, 4, Writer::write_i32, Reader::read_i32);
impl_num_serializer!(i64, 0, 8, Writer::write_i64, Reader::read_i64);
impl_num_serializer!(i128, 0, 16, Writer::write_i128, Reader::read_i128);
impl_num_serializer!(u16, 0, 2, Writer::write_u16, Reader::read_u16);
impl_num_serializer!(u32, 0, 4, Writer::write_u32, Reader::read_u32);
impl_num_serializer!(u64, 0, 8, Writer::write_u64, Reader::read_u64);
impl_num_serializer!(u128, 0, 16, Writer::write_u128, Reader::read_u128);
impl_num_serializer!(f32, 0.0, 4, Writer::write_f32, Reader::read_f32);
impl_num_serializer!(f64, 0.0, 8, Writer::write_f64, Reader::read_f64);
impl_num_serializer!(isize, 0, 8, write_isize, read_isize);
impl_num_serializer!(usize, 0, 8, write_usize, read_usize);
impl_num_serializer!(char, '\0', 4, write_char, read_char);

// Bytes are copied as one run.
macro_rules! impl_byte_serializer {
    ($ty:ty, $writer:expr, $reader:expr) => {
        impl Serializer for $ty {
            #[inline(always)]
            fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
                $writer(context.writer, *self);
                Ok(())
            }

            #[inline(always)]
            fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
                $reader(&mut context.reader)
            }

            #[inline(always)]
            fn graft_clone_data(&self, _: &mut CloneContext) -> Result<Self, Error> {
                Ok(*self)
            }

            #[inline(always)]
            fn graft_shape() -> Shape {
                Shape::Primitive
            }

            fn graft_write_slice(items: &[Self], context: &mut WriteContext) -> Result<(), Error> {
                let bytes: Vec<u8> = items.iter().map(|&b| b as u8).collect();
                context.writer.write_bytes(&bytes);
                Ok(())
            }

            fn graft_read_vec(len: usize, context: &mut ReadContext) -> Result<Vec<Self>, Error> {
                let bytes = context.reader.read_bytes(len)?;
                Ok(bytes.iter().map(|&b| b as $ty).collect())
            }

            #[inline(always)]
            fn graft_clone_slice(items: &[Self], _: &mut CloneContext) -> Result<Vec<Self>, Error> {
                Ok(items.to_vec())
            }

            #[inline(always)]
            fn graft_reserved_space() -> usize {
                mem::size_of::<$ty>()
            }
        }

        impl GraftDefault for $ty {
            #[inline(always)]
            fn graft_default() -> Self {
                0
            }
        }
    };
}

impl_byte_serializer!(u8, Writer::write_u8, Reader::read_u8);
impl_byte_serializer!(i8, Writer::write_i8, Reader::read_i8);

impl Serializer for () {
    #[inline(always)]
    fn graft_write_data(&self, _: &mut WriteContext) -> Result<(), Error> {
        Ok(())
    }

    #[inline(always)]
    fn graft_read_data(_: &mut ReadContext) -> Result<Self, Error> {
        Ok(())
    }

    #[inline(always)]
    fn graft_clone_data(&self, _: &mut CloneContext) -> Result<Self, Error> {
        Ok(())
    }

    #[inline(always)]
    fn graft_shape() -> Shape {
        Shape::Primitive
    }
}

impl GraftDefault for () {
    #[inline(always)]
    fn graft_default() -> Self {}
}
