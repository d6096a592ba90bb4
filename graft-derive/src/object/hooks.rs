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

use crate::util::{FieldRole, SourceField};
use proc_macro2::TokenStream;
use quote::quote;

/// Forwards the lifecycle hooks of `Serializer` to the base fields first,
/// then to the type's own `LifecycleHooks` when `#[graft(hooks)]` is set.
pub fn gen_hooks(fields: &[SourceField], hooks: bool) -> TokenStream {
    let bases: Vec<&SourceField> = fields.iter().filter(|f| f.role == FieldRole::Base).collect();
    if bases.is_empty() && !hooks {
        return quote! {};
    }
    let members: Vec<_> = bases.iter().map(|f| &f.member).collect();
    let tys: Vec<_> = bases.iter().map(|f| f.ty).collect();
    let own = |method: TokenStream| {
        if hooks {
            quote! { graft_core::LifecycleHooks::#method(self, context); }
        } else {
            quote! {}
        }
    };
    let on_serializing = own(quote!(on_serializing));
    let on_serialized = own(quote!(on_serialized));
    let on_deserializing = own(quote!(on_deserializing));
    let on_deserialized = own(quote!(on_deserialized));
    let on_complete = own(quote!(on_deserialization_complete));
    quote! {
        fn graft_on_serializing(&self, context: &graft_core::StreamingContext) {
            #(graft_core::Serializer::graft_on_serializing(&self.#members, context);)*
            #on_serializing
        }

        fn graft_on_serialized(&self, context: &graft_core::StreamingContext) {
            #(graft_core::Serializer::graft_on_serialized(&self.#members, context);)*
            #on_serialized
        }

        fn graft_on_deserializing(&mut self, context: &graft_core::StreamingContext) {
            #(graft_core::Serializer::graft_on_deserializing(&mut self.#members, context);)*
            #on_deserializing
        }

        fn graft_on_deserialized(&mut self, context: &graft_core::StreamingContext) {
            #(graft_core::Serializer::graft_on_deserialized(&mut self.#members, context);)*
            #on_deserialized
        }

        #[inline(always)]
        fn graft_has_completion_hook() -> bool {
            #hooks #(|| <#tys as graft_core::Serializer>::graft_has_completion_hook())*
        }

        fn graft_on_deserialization_complete(&mut self, context: &graft_core::StreamingContext) {
            #(graft_core::Serializer::graft_on_deserialization_complete(&mut self.#members, context);)*
            #on_complete
        }
    }
}
