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

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, Fields};

/// Fieldless enums are written as the `i32` declaration index of the variant.
pub fn gen_enum(data_enum: &DataEnum) -> syn::Result<(TokenStream, TokenStream)> {
    if let Some(variant) = data_enum
        .variants
        .iter()
        .find(|v| !matches!(v.fields, Fields::Unit))
    {
        return Err(syn::Error::new_spanned(
            variant,
            "GraftObject supports only fieldless enums",
        ));
    }
    let idents: Vec<_> = data_enum.variants.iter().map(|v| &v.ident).collect();
    let Some(first) = idents.first() else {
        return Err(syn::Error::new_spanned(
            &data_enum.variants,
            "GraftObject needs at least one enum variant",
        ));
    };
    let names: Vec<String> = idents.iter().map(|ident| ident.to_string()).collect();
    let ordinals: Vec<i32> = (0..idents.len() as i32).collect();
    let ordinal_names: Vec<String> = ordinals.iter().map(i32::to_string).collect();

    let serializer = quote! {
        fn graft_write_data(&self, context: &mut graft_core::WriteContext) -> Result<(), graft_core::Error> {
            let ordinal: i32 = match self {
                #(Self::#idents => #ordinals,)*
            };
            context.writer.write_i32(ordinal);
            Ok(())
        }

        fn graft_read_data(context: &mut graft_core::ReadContext) -> Result<Self, graft_core::Error> {
            let ordinal = context.reader.read_i32()?;
            match ordinal {
                #(#ordinals => Ok(Self::#idents),)*
                _ => Err(graft_core::Error::invalid_data(format!(
                    "unknown ordinal {} of {}",
                    ordinal,
                    <Self as graft_core::Serializer>::graft_type_name()
                ))),
            }
        }

        fn graft_clone_data(&self, _: &mut graft_core::CloneContext) -> Result<Self, graft_core::Error> {
            Ok(match self {
                #(Self::#idents => Self::#idents,)*
            })
        }

        #[inline(always)]
        fn graft_shape() -> graft_core::types::Shape {
            graft_core::types::Shape::Primitive
        }

        fn graft_fields(
            _: &graft_core::TypeRegistry,
        ) -> Result<Vec<graft_core::meta::FieldDescriptor>, graft_core::Error> {
            Ok(vec![#(graft_core::meta::FieldDescriptor::new(#names, #ordinal_names)),*])
        }

        #[inline(always)]
        fn graft_reserved_space() -> usize {
            4
        }
    };
    let default = quote! { Self::#first };
    Ok((serializer, default))
}
