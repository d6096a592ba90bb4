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

//! Sequence-like collections are written and cloned as rank-1 arrays and
//! re-collected into their own shape.

use crate::error::Error;
use crate::meta::{check_shape, FieldDescriptor, Validator};
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::resolver::type_resolver::TypeRegistry;
use crate::serializer::array::{read_vector_len, write_vector_header};
use crate::serializer::map::{clone_comparer, read_comparer, write_comparer, Comparer};
use crate::serializer::{GraftDefault, Serializer};
use crate::types::Shape;
use std::collections::{BTreeSet, BinaryHeap, HashSet, LinkedList, VecDeque};
use std::hash::Hash;

fn write_elements<'a, T, I>(len: usize, items: I, context: &mut WriteContext) -> Result<(), Error>
where
    T: Serializer,
    I: Iterator<Item = &'a T>,
{
    write_vector_header(len, context)?;
    for item in items {
        item.graft_write(context)?;
    }
    Ok(())
}

fn clone_elements<'a, T, I, C>(items: I, context: &mut CloneContext) -> Result<C, Error>
where
    T: Serializer,
    I: Iterator<Item = &'a T>,
    C: FromIterator<T>,
{
    items.map(|item| item.graft_clone(context)).collect()
}

macro_rules! impl_sequence_metadata {
    () => {
        #[inline(always)]
        fn graft_shape() -> Shape {
            Shape::Sequence
        }

        fn graft_fields(_: &TypeRegistry) -> Result<Vec<FieldDescriptor>, Error> {
            Ok(vec![FieldDescriptor::component("element", T::graft_type_name())])
        }

        fn graft_validate(validator: &mut Validator) -> Result<(), Error> {
            check_shape::<Self>()?;
            validator.check_member::<T>(Self::graft_type_name(), "<element>")
        }
    };
}

impl<T: Serializer> Serializer for VecDeque<T> {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_vector_header(self.len(), context)?;
        let (front, back) = self.as_slices();
        T::graft_write_slice(front, context)?;
        T::graft_write_slice(back, context)
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_vector_len(context)?;
        Ok(VecDeque::from(T::graft_read_vec(len, context)?))
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        let (front, back) = self.as_slices();
        let mut items = T::graft_clone_slice(front, context)?;
        items.extend(T::graft_clone_slice(back, context)?);
        Ok(VecDeque::from(items))
    }

    impl_sequence_metadata!();
}

impl<T> GraftDefault for VecDeque<T> {
    fn graft_default() -> Self {
        VecDeque::new()
    }
}

impl<T: Serializer> Serializer for LinkedList<T> {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_elements(self.len(), self.iter(), context)
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_vector_len(context)?;
        Ok(T::graft_read_vec(len, context)?.into_iter().collect())
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        clone_elements(self.iter(), context)
    }

    impl_sequence_metadata!();
}

impl<T> GraftDefault for LinkedList<T> {
    fn graft_default() -> Self {
        LinkedList::new()
    }
}

impl<T: Serializer + Ord> Serializer for BTreeSet<T> {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_elements(self.len(), self.iter(), context)
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_vector_len(context)?;
        Ok(T::graft_read_vec(len, context)?.into_iter().collect())
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        clone_elements(self.iter(), context)
    }

    impl_sequence_metadata!();
}

impl<T: Ord> GraftDefault for BTreeSet<T> {
    fn graft_default() -> Self {
        BTreeSet::new()
    }
}

impl<T: Serializer + Ord> Serializer for BinaryHeap<T> {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_vector_header(self.len(), context)?;
        T::graft_write_slice(self.as_slice(), context)
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let len = read_vector_len(context)?;
        Ok(BinaryHeap::from(T::graft_read_vec(len, context)?))
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        Ok(BinaryHeap::from(T::graft_clone_slice(self.as_slice(), context)?))
    }

    impl_sequence_metadata!();
}

impl<T: Ord> GraftDefault for BinaryHeap<T> {
    fn graft_default() -> Self {
        BinaryHeap::new()
    }
}

/// The comparer block precedes the elements, as for maps.
impl<T, S> Serializer for HashSet<T, S>
where
    T: Serializer + Eq + Hash,
    S: Comparer,
{
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_comparer(self.hasher(), context)?;
        write_elements(self.len(), self.iter(), context)
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let hasher = read_comparer::<S>(context)?;
        let len = read_vector_len(context)?;
        let items = T::graft_read_vec(len, context)?;
        let mut set = HashSet::with_capacity_and_hasher(items.len(), hasher);
        set.extend(items);
        Ok(set)
    }

    fn graft_clone_data(&self, context: &mut CloneContext) -> Result<Self, Error> {
        let hasher = clone_comparer(self.hasher(), context)?;
        let mut set = HashSet::with_capacity_and_hasher(self.len(), hasher);
        for item in self {
            set.insert(item.graft_clone(context)?);
        }
        Ok(set)
    }

    #[inline(always)]
    fn graft_shape() -> Shape {
        Shape::Sequence
    }

    fn graft_fields(_: &TypeRegistry) -> Result<Vec<FieldDescriptor>, Error> {
        Ok(vec![
            FieldDescriptor::component("comparer", S::graft_type_name()),
            FieldDescriptor::component("element", T::graft_type_name()),
        ])
    }

    fn graft_validate(validator: &mut Validator) -> Result<(), Error> {
        check_shape::<Self>()?;
        validator.check_member::<T>(Self::graft_type_name(), "<element>")?;
        validator.check_member::<S>(Self::graft_type_name(), "<comparer>")
    }
}

impl<T, S: Comparer> GraftDefault for HashSet<T, S> {
    fn graft_default() -> Self {
        HashSet::with_hasher(S::graft_default())
    }
}
