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

use crate::types::Shape;
use std::any::TypeId;

/// One persisted field: its name and the name of its declared type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_name: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Pseudo-field describing a component of a wrapper or container type,
    /// such as the element of a `Vec` or the key of a map.
    pub fn component(role: &str, type_name: &str) -> Self {
        FieldDescriptor {
            name: format!("<{}>", role),
            type_name: type_name.to_owned(),
        }
    }
}

/// Identity and ordered persisted field list of one concrete type.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    type_id: TypeId,
    name: &'static str,
    shape: Shape,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new(
        type_id: TypeId,
        name: &'static str,
        shape: Shape,
        mut fields: Vec<FieldDescriptor>,
    ) -> Self {
        fields.sort_by(|a, b| super::cmp_field_names(&a.name, &b.name));
        TypeDescriptor {
            type_id,
            name,
            shape,
            fields,
        }
    }

    #[inline(always)]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}
