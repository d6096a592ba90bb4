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

use crate::buffer::{Reader, Writer};
use crate::config::UserContext;
use crate::error::Error;
use crate::resolver::ref_resolver::{CloneTracker, RefReader, RefWriter};
use crate::resolver::type_resolver::TypeRegistry;
use std::any::Any;

/// Which operation a lifecycle hook is running under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamingKind {
    Serialize,
    Deserialize,
}

/// Lightweight value handed to every lifecycle hook.
#[derive(Clone)]
pub struct StreamingContext {
    kind: StreamingKind,
    context: Option<UserContext>,
}

impl StreamingContext {
    pub fn new(kind: StreamingKind, context: Option<UserContext>) -> Self {
        StreamingContext { kind, context }
    }

    #[inline(always)]
    pub fn kind(&self) -> StreamingKind {
        self.kind
    }

    pub fn context(&self) -> Option<&UserContext> {
        self.context.as_ref()
    }

    /// Caller state downcast to `T`, if present and of that type.
    pub fn context_as<T: Any>(&self) -> Option<&T> {
        self.context.as_deref().and_then(|c| c.downcast_ref::<T>())
    }
}

impl std::fmt::Debug for StreamingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingContext")
            .field("kind", &self.kind)
            .field("context", &self.context.is_some())
            .finish()
    }
}

pub struct WriteContext<'a> {
    pub writer: &'a mut Writer,
    registry: &'a TypeRegistry,
    pub ref_writer: RefWriter,
    streaming: StreamingContext,
}

impl<'a> WriteContext<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        writer: &'a mut Writer,
        context: Option<UserContext>,
    ) -> WriteContext<'a> {
        WriteContext {
            writer,
            registry,
            ref_writer: RefWriter::new(),
            streaming: StreamingContext::new(StreamingKind::Serialize, context),
        }
    }

    #[inline(always)]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    #[inline(always)]
    pub fn streaming(&self) -> &StreamingContext {
        &self.streaming
    }
}

type Completion = Box<dyn FnOnce(&StreamingContext) -> Result<(), Error>>;

pub struct ReadContext<'a> {
    pub reader: Reader<'a>,
    registry: &'a TypeRegistry,
    pub ref_reader: RefReader,
    streaming: StreamingContext,
    completions: Vec<Completion>,
}

impl<'a> ReadContext<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        reader: Reader<'a>,
        context: Option<UserContext>,
    ) -> ReadContext<'a> {
        ReadContext {
            reader,
            registry,
            ref_reader: RefReader::new(),
            streaming: StreamingContext::new(StreamingKind::Deserialize, context),
            completions: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    #[inline(always)]
    pub fn streaming(&self) -> &StreamingContext {
        &self.streaming
    }

    /// Queues a callback to run once the whole graph has been read.
    pub fn defer_completion(&mut self, completion: Completion) {
        self.completions.push(completion);
    }

    /// Runs queued completion callbacks in the order they were queued.
    pub fn run_completions(&mut self) -> Result<(), Error> {
        let completions = std::mem::take(&mut self.completions);
        for completion in completions {
            completion(&self.streaming)?;
        }
        Ok(())
    }
}

pub struct CloneContext<'a> {
    registry: &'a TypeRegistry,
    pub tracker: CloneTracker,
}

impl<'a> CloneContext<'a> {
    pub fn new(registry: &'a TypeRegistry) -> CloneContext<'a> {
        CloneContext {
            registry,
            tracker: CloneTracker::new(),
        }
    }

    #[inline(always)]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }
}
