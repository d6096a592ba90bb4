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

//! Types that may appear in a graph but can never be encoded.
//!
//! They implement [`Serializer`] only so that validation can name them: the
//! harness of any type reaching one of them fails with
//! [`Error::Unsupported`] before anything is written.

use crate::error::Error;
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::serializer::{GraftDefault, Serializer};
use crate::types::{Shape, UnsupportedKind};
use std::ptr::{self, NonNull};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

#[cold]
fn rejected<T: Serializer>() -> Error {
    match T::graft_shape() {
        Shape::Unsupported(kind) => Error::unsupported(format!("{}: {}", T::graft_type_name(), kind)),
        _ => Error::unsupported(T::graft_type_name()),
    }
}

fn default_fn0<R: GraftDefault>() -> R {
    R::graft_default()
}

fn default_fn1<A, R: GraftDefault>(_: A) -> R {
    R::graft_default()
}

fn default_fn2<A, B, R: GraftDefault>(_: A, _: B) -> R {
    R::graft_default()
}

macro_rules! impl_unsupported {
    ($kind:expr, [$($generics:tt)*] $ty:ty => $default:expr) => {
        impl<$($generics)*> Serializer for $ty {
            fn graft_write_data(&self, _: &mut WriteContext) -> Result<(), Error> {
                Err(rejected::<Self>())
            }

            fn graft_read_data(_: &mut ReadContext) -> Result<Self, Error> {
                Err(rejected::<Self>())
            }

            fn graft_clone_data(&self, _: &mut CloneContext) -> Result<Self, Error> {
                Err(rejected::<Self>())
            }

            #[inline(always)]
            fn graft_shape() -> Shape {
                Shape::Unsupported($kind)
            }
        }

        impl<$($generics)*> GraftDefault for $ty {
            fn graft_default() -> Self {
                $default
            }
        }
    };
}

impl_unsupported!(UnsupportedKind::Pointer, [T: 'static] *const T => ptr::null());
impl_unsupported!(UnsupportedKind::Pointer, [T: 'static] *mut T => ptr::null_mut());
impl_unsupported!(UnsupportedKind::Pointer, [T: 'static] NonNull<T> => NonNull::dangling());

impl_unsupported!(UnsupportedKind::Function, [R: GraftDefault + 'static] fn() -> R => default_fn0::<R>);
impl_unsupported!(
    UnsupportedKind::Function,
    [A: 'static, R: GraftDefault + 'static] fn(A) -> R => default_fn1::<A, R>
);
impl_unsupported!(
    UnsupportedKind::Function,
    [A: 'static, B: 'static, R: GraftDefault + 'static] fn(A, B) -> R => default_fn2::<A, B, R>
);
impl_unsupported!(UnsupportedKind::Function, [] Box<dyn Fn()> => Box::new(|| {}));
impl_unsupported!(UnsupportedKind::Function, [] Box<dyn FnMut()> => Box::new(|| {}));

impl_unsupported!(
    UnsupportedKind::UntypedSequence,
    [T: 'static] Box<dyn Iterator<Item = T>> => Box::new(std::iter::empty())
);

impl_unsupported!(UnsupportedKind::Opaque, [] Instant => Instant::now());
impl_unsupported!(UnsupportedKind::Opaque, [T: 'static] Sender<T> => mpsc::channel().0);
impl_unsupported!(UnsupportedKind::Opaque, [T: 'static] Receiver<T> => mpsc::channel().1);
