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

use crate::object::{derive_enum, field, hooks};
use crate::util::{parse_container_attrs, source_fields, GraftAttrs, SourceField};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, Data, DeriveInput, Generics};

fn add_trait_bounds(generics: &Generics) -> Generics {
    let mut generics = generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(graft_core::Serializer));
    }
    generics
}

fn gen_struct_methods(fields: &[SourceField], attrs: &GraftAttrs) -> TokenStream {
    let validate = field::gen_validate(fields);
    let hooks = hooks::gen_hooks(fields, attrs.hooks);
    let reserved_space = field::gen_reserved_space(fields);
    quote! {
        fn graft_write_data(&self, context: &mut graft_core::WriteContext) -> Result<(), graft_core::Error> {
            graft_core::serializer::struct_::write_data(self, context)
        }

        fn graft_read_data(context: &mut graft_core::ReadContext) -> Result<Self, graft_core::Error> {
            graft_core::serializer::struct_::read_data(context)
        }

        fn graft_read_into(&mut self, context: &mut graft_core::ReadContext) -> Result<(), graft_core::Error> {
            graft_core::serializer::struct_::read_into(self, context)
        }

        fn graft_clone_data(&self, context: &mut graft_core::CloneContext) -> Result<Self, graft_core::Error> {
            graft_core::serializer::struct_::clone_data(self, context)
        }

        fn graft_clone_into(
            &self,
            target: &mut Self,
            context: &mut graft_core::CloneContext,
        ) -> Result<(), graft_core::Error> {
            graft_core::serializer::struct_::clone_into(self, target, context)
        }

        #[inline(always)]
        fn graft_shape() -> graft_core::types::Shape {
            graft_core::types::Shape::Struct
        }

        fn graft_fields(
            registry: &graft_core::TypeRegistry,
        ) -> Result<Vec<graft_core::meta::FieldDescriptor>, graft_core::Error> {
            registry.build_plan::<Self>()
        }

        #validate

        #hooks

        #[inline(always)]
        fn graft_reserved_space() -> usize {
            #reserved_space
        }
    }
}

fn gen_contract_methods() -> TokenStream {
    quote! {
        fn graft_write_data(&self, context: &mut graft_core::WriteContext) -> Result<(), graft_core::Error> {
            graft_core::serializer::contract::write_data(self, context)
        }

        fn graft_read_data(context: &mut graft_core::ReadContext) -> Result<Self, graft_core::Error> {
            graft_core::serializer::contract::read_data::<Self>(context)
        }

        fn graft_clone_data(&self, context: &mut graft_core::CloneContext) -> Result<Self, graft_core::Error> {
            graft_core::serializer::contract::clone_data(self, context)
        }

        #[inline(always)]
        fn graft_shape() -> graft_core::types::Shape {
            graft_core::types::Shape::Contract
        }

        fn graft_validate(_: &mut graft_core::meta::Validator) -> Result<(), graft_core::Error> {
            graft_core::serializer::contract::validate::<Self>()
        }
    }
}

pub fn derive_serializer(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    let attrs = parse_container_attrs(&ast.attrs)?;
    let generics = add_trait_bounds(&ast.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let type_name = attrs.name.as_ref().map(|type_name| {
        quote! {
            #[inline(always)]
            fn graft_type_name() -> &'static str {
                #type_name
            }
        }
    });

    let (methods, default_body, struct_serializer) = match &ast.data {
        Data::Struct(data) => {
            let fields = source_fields(&data.fields)?;
            let default_body = field::gen_default_body(&fields);
            if attrs.contract {
                if attrs.hooks {
                    return Err(syn::Error::new_spanned(
                        name,
                        "`hooks` cannot be combined with `contract`",
                    ));
                }
                (gen_contract_methods(), default_body, quote! {})
            } else {
                let accessors = field::gen_field_accessors(&fields);
                let struct_serializer = quote! {
                    impl #impl_generics graft_core::StructSerializer for #name #ty_generics #where_clause {
                        #accessors
                    }
                };
                (
                    gen_struct_methods(&fields, &attrs),
                    default_body,
                    struct_serializer,
                )
            }
        }
        Data::Enum(data) => {
            if attrs.contract || attrs.hooks {
                return Err(syn::Error::new_spanned(
                    name,
                    "`hooks` and `contract` are not supported on enums",
                ));
            }
            let (methods, default_body) = derive_enum::gen_enum(data)?;
            (methods, default_body, quote! {})
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "GraftObject does not support unions",
            ))
        }
    };

    // generic types cannot be named without their parameters
    let registration = if ast.generics.params.is_empty() {
        quote! { graft_core::submit_registration!(#name); }
    } else {
        quote! {}
    };

    Ok(quote! {
        const _: () = {
            impl #impl_generics graft_core::GraftDefault for #name #ty_generics #where_clause {
                fn graft_default() -> Self {
                    #default_body
                }
            }

            impl #impl_generics graft_core::Serializer for #name #ty_generics #where_clause {
                #type_name

                #methods
            }

            #struct_serializer

            #registration
        };
    })
}
