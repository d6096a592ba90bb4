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

//! Derive macro generating graft serializers.
//!
//! `#[derive(GraftObject)]` works on structs with named fields, tuple
//! structs, unit structs and fieldless enums. Generated code refers to
//! `graft_core`, so the crate using the derive must depend on it.
//!
//! Container attributes:
//!
//! - `#[graft(name = "...")]`: type name written to streams, instead of the
//!   full Rust path
//! - `#[graft(hooks)]`: run the type's `LifecycleHooks` implementation
//! - `#[graft(contract)]`: serialize through the type's
//!   `ObjectDataContract` implementation instead of its fields
//!
//! Field attributes:
//!
//! - `#[graft(skip)]`: not persisted; rebuilt with `Default::default()`
//! - `#[graft(base)]`: the field is a derived struct whose persisted fields
//!   are flattened into this type, and whose hooks run before this type's

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod object;
mod util;

/// Derive macro for object graph serialization.
///
/// # Example
///
/// ```rust, ignore
/// use graft_derive::GraftObject;
///
/// #[derive(GraftObject, Debug, PartialEq)]
/// struct Person {
///     name: String,
///     age: i32,
///     address: Address,
/// }
///
/// #[derive(GraftObject, Debug, PartialEq)]
/// struct Address {
///     street: String,
///     city: String,
/// }
/// ```
#[proc_macro_derive(GraftObject, attributes(graft))]
pub fn proc_macro_derive_graft_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    object::derive_serializer(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
