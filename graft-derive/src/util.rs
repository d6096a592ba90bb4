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

use syn::ext::IdentExt;
use syn::{Attribute, Fields, Index, LitStr, Member, Type};

/// Container-level `#[graft(...)]` options.
#[derive(Default)]
pub struct GraftAttrs {
    pub name: Option<LitStr>,
    pub hooks: bool,
    pub contract: bool,
}

pub fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<GraftAttrs> {
    let mut parsed = GraftAttrs::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("graft")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                parsed.name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("hooks") {
                parsed.hooks = true;
            } else if meta.path.is_ident("contract") {
                parsed.contract = true;
            } else {
                return Err(meta.error("expected `name`, `hooks` or `contract`"));
            }
            Ok(())
        })?;
    }
    Ok(parsed)
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Persisted,
    Skipped,
    Base,
}

/// A field of the deriving struct, in declaration order.
pub struct SourceField<'a> {
    pub member: Member,
    /// Persisted name: the identifier, or the position for tuple structs.
    pub name: String,
    pub ty: &'a Type,
    pub role: FieldRole,
}

fn parse_field_role(attrs: &[Attribute]) -> syn::Result<FieldRole> {
    let mut role = FieldRole::Persisted;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("graft")) {
        attr.parse_nested_meta(|meta| {
            let next = if meta.path.is_ident("skip") {
                FieldRole::Skipped
            } else if meta.path.is_ident("base") {
                FieldRole::Base
            } else {
                return Err(meta.error("expected `skip` or `base`"));
            };
            if role != FieldRole::Persisted && role != next {
                return Err(meta.error("`skip` and `base` cannot be combined"));
            }
            role = next;
            Ok(())
        })?;
    }
    Ok(role)
}

pub fn source_fields(fields: &Fields) -> syn::Result<Vec<SourceField<'_>>> {
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let (member, name) = match &field.ident {
                Some(ident) => (Member::Named(ident.clone()), ident.unraw().to_string()),
                None => (Member::Unnamed(Index::from(index)), index.to_string()),
            };
            Ok(SourceField {
                member,
                name,
                ty: &field.ty,
                role: parse_field_role(&field.attrs)?,
            })
        })
        .collect()
}
