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

//! Arrays of any rank from 1 to 254.
//!
//! Wire form: `u8` rank, one `i32` length per dimension, then the elements in
//! row-major order through the element type's slice encoding.

use crate::error::Error;
use crate::meta::{check_shape, FieldDescriptor, Validator};
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeRegistry;
use crate::serializer::{GraftDefault, Serializer};
use crate::types::{Shape, MAX_ARRAY_RANK};

pub(crate) fn write_dims(shape: &[usize], context: &mut WriteContext) -> Result<(), Error> {
    if shape.is_empty() || shape.len() > MAX_ARRAY_RANK {
        return Err(Error::unsupported(format!(
            "array rank {} is outside 1..={}",
            shape.len(),
            MAX_ARRAY_RANK
        )));
    }
    context.writer.write_u8(shape.len() as u8);
    for &dim in shape {
        context.writer.write_len(dim)?;
    }
    Ok(())
}

pub(crate) fn read_dims(context: &mut ReadContext) -> Result<Vec<usize>, Error> {
    let rank = context.reader.read_u8()? as usize;
    crate::ensure!(rank != 0, Error::invalid_data("array rank 0"));
    crate::ensure!(
        rank <= MAX_ARRAY_RANK,
        Error::invalid_data(format!("array rank {} exceeds {}", rank, MAX_ARRAY_RANK))
    );
    let mut dims = Vec::with_capacity(rank);
    for _ in 0..rank {
        dims.push(context.reader.read_len()?);
    }
    Ok(dims)
}

/// Header of a rank-1 array.
#[inline]
pub(crate) fn write_vector_header(len: usize, context: &mut WriteContext) -> Result<(), Error> {
    context.writer.write_u8(1);
    context.writer.write_len(len)
}

/// Reads a rank-1 array header and returns its length.
pub(crate) fn read_vector_len(context: &mut ReadContext) -> Result<usize, Error> {
    let dims = read_dims(context)?;
    match dims.as_slice() {
        [len] => Ok(*len),
        _ => Err(Error::invalid_data(format!(
            "expected an array of rank 1, found rank {}",
            dims.len()
        ))),
    }
}

fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// Dense multi-dimensional array stored in row-major order.
///
/// ```rust
/// use graft_core::Array;
///
/// let grid = Array::new(vec![2, 3], (0..6).collect::<Vec<i32>>()).unwrap();
/// assert_eq!(grid.get(&[1, 0]), Some(&3));
/// assert_eq!(grid.indices().count(), 6);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Array<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T> Array<T> {
    /// Fails when the rank is outside `1..=254` or `data` does not hold
    /// exactly one element per index.
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Array<T>, Error> {
        if shape.is_empty() || shape.len() > MAX_ARRAY_RANK {
            return Err(Error::unsupported(format!(
                "array rank {} is outside 1..={}",
                shape.len(),
                MAX_ARRAY_RANK
            )));
        }
        match element_count(&shape) {
            Some(count) if count == data.len() => Ok(Array { shape, data }),
            _ => Err(Error::invalid_data(format!(
                "shape {:?} does not match {} elements",
                shape,
                data.len()
            ))),
        }
    }

    pub fn from_vec(data: Vec<T>) -> Array<T> {
        Array {
            shape: vec![data.len()],
            data,
        }
    }

    pub fn filled(shape: Vec<usize>, value: T) -> Result<Array<T>, Error>
    where
        T: Clone,
    {
        let count = element_count(&shape)
            .ok_or_else(|| Error::invalid_data(format!("shape {:?} overflows", shape)))?;
        Array::new(shape, vec![value; count])
    }

    #[inline(always)]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        index
            .iter()
            .zip(&self.shape)
            .try_fold(0usize, |acc, (&i, &dim)| (i < dim).then(|| acc * dim + i))
    }

    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.offset(index).and_then(|offset| self.data.get(offset))
    }

    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut T> {
        self.offset(index).and_then(move |offset| self.data.get_mut(offset))
    }

    /// Every index combination in row-major nested-loop order, the order in
    /// which elements are stored and encoded.
    pub fn indices(&self) -> Indices<'_> {
        let next = if self.data.is_empty() {
            None
        } else {
            Some(vec![0; self.shape.len()])
        };
        Indices {
            shape: &self.shape,
            next,
        }
    }
}

/// Odometer over the indices of an [`Array`]; the last dimension varies
/// fastest.
pub struct Indices<'a> {
    shape: &'a [usize],
    next: Option<Vec<usize>>,
}

impl Iterator for Indices<'_> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;
        let mut successor = current.clone();
        for axis in (0..successor.len()).rev() {
            successor[axis] += 1;
            if successor[axis] < self.shape[axis] {
                self.next = Some(successor);
                break;
            }
            successor[axis] = 0;
        }
        Some(current)
    }
}

impl<T: Serializer> Serializer for Array<T> {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_dims(&self.shape, context)?;
        T::graft_write_slice(&self.data, context)
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let shape = read_dims(context)?;
        let count = element_count(&shape).ok_or_else(|| {
            Error::invalid_data(format!("array shape {:?} overflows", shape))
        })?;
        let data = T::graft_read_vec(count, context)?;
        Ok(Array { shape, data })
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        Ok(Array {
            shape: self.shape.clone(),
            data: T::graft_clone_slice(&self.data, context)?,
        })
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

impl<T> GraftDefault for Array<T> {
    fn graft_default() -> Self {
        Array::from_vec(Vec::new())
    }
}
