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

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Engine-wide configuration held by [`crate::Graft`].
///
/// Per-call [`SerializeOptions`] and [`DeserializeOptions`] start from these
/// values.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Whether the root type name is left out of the stream header.
    pub omit_root_type_name: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn is_omit_root_type_name(&self) -> bool {
        self.omit_root_type_name
    }
}

/// Opaque caller state handed to lifecycle hooks through
/// [`crate::resolver::context::StreamingContext`].
pub type UserContext = Arc<dyn Any + Send + Sync>;

/// Options for a single serialize call.
#[derive(Clone, Default)]
pub struct SerializeOptions {
    pub omit_root_type_name: bool,
    pub context: Option<UserContext>,
}

impl SerializeOptions {
    pub fn omit_root_type_name(mut self, omit: bool) -> Self {
        self.omit_root_type_name = omit;
        self
    }

    pub fn context(mut self, context: UserContext) -> Self {
        self.context = Some(context);
        self
    }
}

impl From<&Config> for SerializeOptions {
    fn from(config: &Config) -> Self {
        SerializeOptions {
            omit_root_type_name: config.omit_root_type_name,
            context: None,
        }
    }
}

impl fmt::Debug for SerializeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializeOptions")
            .field("omit_root_type_name", &self.omit_root_type_name)
            .field("context", &self.context.is_some())
            .finish()
    }
}

/// Options for a single deserialize call.
///
/// `omit_root_type_name` must match the option the stream was written with.
#[derive(Clone, Default)]
pub struct DeserializeOptions {
    pub omit_root_type_name: bool,
    pub context: Option<UserContext>,
}

impl DeserializeOptions {
    pub fn omit_root_type_name(mut self, omit: bool) -> Self {
        self.omit_root_type_name = omit;
        self
    }

    pub fn context(mut self, context: UserContext) -> Self {
        self.context = Some(context);
        self
    }
}

impl From<&Config> for DeserializeOptions {
    fn from(config: &Config) -> Self {
        DeserializeOptions {
            omit_root_type_name: config.omit_root_type_name,
            context: None,
        }
    }
}

impl fmt::Debug for DeserializeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeserializeOptions")
            .field("omit_root_type_name", &self.omit_root_type_name)
            .field("context", &self.context.is_some())
            .finish()
    }
}
