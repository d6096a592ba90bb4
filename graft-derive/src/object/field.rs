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

/// `graft_field_accessors`: one accessor per persisted field, plus the lifted
/// accessors of every base field.
pub fn gen_field_accessors(fields: &[SourceField]) -> TokenStream {
    let pushes = fields.iter().filter_map(|field| {
        let SourceField { member, name, ty, .. } = field;
        match field.role {
            FieldRole::Persisted => Some(quote! {
                fields.push(graft_core::FieldAccessor::<Self>::new(
                    #name,
                    <#ty as graft_core::Serializer>::graft_type_name(),
                    |this, context| graft_core::Serializer::graft_write(&this.#member, context),
                    |this, context| {
                        this.#member = <#ty as graft_core::Serializer>::graft_read(context)?;
                        Ok(())
                    },
                    |source, target, context| {
                        target.#member = graft_core::Serializer::graft_clone(&source.#member, context)?;
                        Ok(())
                    },
                ));
            }),
            FieldRole::Base => Some(quote! {
                for field in <#ty as graft_core::StructSerializer>::graft_field_accessors(registry)? {
                    fields.push(field.lift::<Self>(|this| &this.#member, |this| &mut this.#member));
                }
            }),
            FieldRole::Skipped => None,
        }
    });
    quote! {
        #[allow(unused_mut, unused_variables)]
        fn graft_field_accessors(
            registry: &graft_core::TypeRegistry,
        ) -> Result<Vec<graft_core::FieldAccessor<Self>>, graft_core::Error> {
            let mut fields = Vec::new();
            #(#pushes)*
            Ok(fields)
        }
    }
}

/// `graft_validate`: the type itself, then every persisted and base field.
pub fn gen_validate(fields: &[SourceField]) -> TokenStream {
    let checks = fields
        .iter()
        .filter(|field| field.role != FieldRole::Skipped)
        .map(|SourceField { name, ty, .. }| {
            quote! {
                validator.check_member::<#ty>(<Self as graft_core::Serializer>::graft_type_name(), #name)?;
            }
        });
    quote! {
        #[allow(unused_variables)]
        fn graft_validate(validator: &mut graft_core::meta::Validator) -> Result<(), graft_core::Error> {
            graft_core::meta::check_shape::<Self>()?;
            #(#checks)*
            Ok(())
        }
    }
}

/// Field-wise raw construction. Skipped fields use `Default`.
pub fn gen_default_body(fields: &[SourceField]) -> TokenStream {
    let inits = fields.iter().map(|SourceField { member, ty, role, .. }| match role {
        FieldRole::Skipped => quote! { #member: ::core::default::Default::default() },
        _ => quote! { #member: <#ty as graft_core::GraftDefault>::graft_default() },
    });
    quote! { Self { #(#inits),* } }
}

pub fn gen_reserved_space(fields: &[SourceField]) -> TokenStream {
    let sizes = fields
        .iter()
        .filter(|field| field.role != FieldRole::Skipped)
        .map(|SourceField { ty, .. }| quote! { <#ty as graft_core::Serializer>::graft_reserved_space() });
    quote! { 0 #(+ #sizes)* }
}
