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
use byteorder::{ByteOrder, LittleEndian};

macro_rules! impl_write_fixed {
    ($($ty:ty => $size:expr),* $(,)?) => {
        paste::paste! {
            $(
                #[inline(always)]
                pub fn [<write_ $ty>](&mut self, value: $ty) {
                    let mut bytes = [0u8; $size];
                    LittleEndian::[<write_ $ty>](&mut bytes, value);
                    self.bf.extend_from_slice(&bytes);
                }
            )*
        }
    };
}

macro_rules! impl_read_fixed {
    ($($ty:ty => $size:expr),* $(,)?) => {
        paste::paste! {
            $(
                #[inline(always)]
                pub fn [<read_ $ty>](&mut self) -> Result<$ty, Error> {
                    let bytes = self.take($size)?;
                    Ok(LittleEndian::[<read_ $ty>](bytes))
                }
            )*
        }
    };
}

/// Growable little-endian output buffer.
#[derive(Default)]
pub struct Writer {
    pub(crate) bf: Vec<u8>,
}

impl Writer {
    pub fn reset(&mut self) {
        // keep capacity and reset len to 0
        self.bf.clear();
    }

    pub fn dump(&self) -> Vec<u8> {
        self.bf.clone()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bf
    }

    pub fn len(&self) -> usize {
        self.bf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.bf.reserve(additional);
    }

    pub fn write_bytes(&mut self, v: &[u8]) -> usize {
        self.bf.extend_from_slice(v);
        v.len()
    }

    #[inline(always)]
    pub fn write_u8(&mut self, value: u8) {
        self.bf.push(value);
    }

    #[inline(always)]
    pub fn write_i8(&mut self, value: i8) {
        self.bf.push(value as u8);
    }

    #[inline(always)]
    pub fn write_bool(&mut self, value: bool) {
        self.bf.push(value as u8);
    }

    impl_write_fixed!(
        u16 => 2,
        i16 => 2,
        u32 => 4,
        i32 => 4,
        u64 => 8,
        i64 => 8,
        u128 => 16,
        i128 => 16,
        f32 => 4,
        f64 => 8,
    );

    /// Writes an `i32` byte count followed by the UTF-8 bytes of `s`.
    ///
    /// This is the raw form used for type names; string values go through the
    /// tracked envelope of the `String` serializer instead.
    pub fn write_raw_string(&mut self, s: &str) -> Result<(), Error> {
        let len = i32::try_from(s.len())
            .map_err(|_| Error::unsupported(format!("string of {} bytes is too long", s.len())))?;
        self.write_i32(len);
        self.write_bytes(s.as_bytes());
        Ok(())
    }

    /// Writes a collection length as `i32`.
    pub fn write_len(&mut self, len: usize) -> Result<(), Error> {
        let len = i32::try_from(len)
            .map_err(|_| Error::unsupported(format!("length {} exceeds i32::MAX", len)))?;
        self.write_i32(len);
        Ok(())
    }
}

/// Bounds-checked little-endian reader over a borrowed byte slice.
pub struct Reader<'a> {
    bf: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bf: &'a [u8]) -> Reader<'a> {
        Reader { bf, cursor: 0 }
    }

    #[inline(always)]
    pub fn get_cursor(&self) -> usize {
        self.cursor
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.bf.len() - self.cursor
    }

    #[inline(always)]
    fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let end = self
            .cursor
            .checked_add(len)
            .filter(|end| *end <= self.bf.len())
            .ok_or_else(|| Error::buffer_out_of_bound(self.cursor, len, self.bf.len()))?;
        let bytes = &self.bf[self.cursor..end];
        self.cursor = end;
        Ok(bytes)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        self.take(len)
    }

    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    #[inline(always)]
    pub fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(self.take(1)?[0] as i8)
    }

    #[inline(always)]
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::invalid_data(format!("invalid bool byte {}", other))),
        }
    }

    impl_read_fixed!(
        u16 => 2,
        i16 => 2,
        u32 => 4,
        i32 => 4,
        u64 => 8,
        i64 => 8,
        u128 => 16,
        i128 => 16,
        f32 => 4,
        f64 => 8,
    );

    /// Reads an `i32` collection length, rejecting negative values.
    pub fn read_len(&mut self) -> Result<usize, Error> {
        let len = self.read_i32()?;
        usize::try_from(len).map_err(|_| Error::invalid_data(format!("negative length {}", len)))
    }

    /// Reads a string written by [`Writer::write_raw_string`].
    pub fn read_raw_string(&mut self) -> Result<String, Error> {
        let len = self.read_len()?;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| Error::invalid_data(format!("invalid utf-8 string: {}", e)))
    }
}
