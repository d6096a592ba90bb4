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
use crate::config::{Config, DeserializeOptions, SerializeOptions};
use crate::error::Error;
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::resolver::pool::Pool;
use crate::resolver::type_resolver::{Harness, TypeRegistry};
use crate::serializer::{Object, Serializer};
use crate::types::{header_flags, ENGINE_VERSION};
use std::sync::Arc;

/// Stream header: engine version, flags, optional root type name and the
/// root type's structural hash.
struct Header {
    name: Option<String>,
    hash: i32,
}

/// The graft engine: serializes, deserializes and deep-clones object graphs.
///
/// Each engine owns its procedure cache. Per-type procedures are built on
/// first use and shared by every later call, from any thread.
///
/// ```rust, ignore
/// use graft::{Graft, GraftObject};
///
/// #[derive(GraftObject, Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let graft = Graft::default();
/// let bytes = graft.serialize(&Point { x: 1, y: 2 })?;
/// let point: Point = graft.deserialize(&bytes)?;
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// Leaving the root type name out of the stream makes it shorter, but then
/// the reader must know the type:
///
/// ```rust
/// use graft_core::Graft;
///
/// let graft = Graft::default().omit_root_type_name(true);
/// let bytes = graft.serialize(&vec![1u8, 2, 3]).unwrap();
/// assert_eq!(graft.deserialize::<Vec<u8>>(&bytes).unwrap(), vec![1, 2, 3]);
/// assert!(graft.deserialize_any(&bytes).is_err());
/// ```
pub struct Graft {
    config: Config,
    registry: TypeRegistry,
    writer_pool: Pool<Writer>,
}

impl Default for Graft {
    fn default() -> Self {
        Graft::with_config(Config::default())
    }
}

impl Graft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Graft {
            config,
            registry: TypeRegistry::new(),
            writer_pool: Pool::new(Writer::default),
        }
    }

    /// Leaves the root type name out of every stream this engine writes, and
    /// expects it to be absent from every stream it reads.
    ///
    /// Readers must be configured the same way as the writer, otherwise
    /// deserialization fails with [`Error::InvalidOmitRootType`].
    pub fn omit_root_type_name(mut self, omit: bool) -> Self {
        self.config.omit_root_type_name = omit;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Makes `T` resolvable by name in polymorphic slots and by
    /// [`Graft::deserialize_any`], and builds its procedures.
    ///
    /// Types deriving `GraftObject` register themselves; explicit
    /// registration is needed for generic types and surfaces validation
    /// errors early.
    pub fn register<T: Serializer>(&self) -> Result<(), Error> {
        self.registry.register::<T>()
    }

    pub fn serialize<T: Serializer>(&self, value: &T) -> Result<Vec<u8>, Error> {
        self.serialize_with_options(value, &SerializeOptions::from(&self.config))
    }

    pub fn serialize_with_options<T: Serializer>(
        &self,
        value: &T,
        options: &SerializeOptions,
    ) -> Result<Vec<u8>, Error> {
        let harness = self.registry.get_or_build::<T>()?;
        self.writer_pool.borrow_mut(|writer| {
            writer.reset();
            self.serialize_into(value, &harness, options, writer)?;
            Ok(writer.dump())
        })
    }

    fn serialize_into<T: Serializer>(
        &self,
        value: &T,
        harness: &Harness,
        options: &SerializeOptions,
        writer: &mut Writer,
    ) -> Result<(), Error> {
        writer.reserve(T::graft_reserved_space() + 16);
        writer.write_i16(ENGINE_VERSION);
        if options.omit_root_type_name {
            writer.write_u8(header_flags::OMIT_ROOT_TYPE_NAME);
        } else {
            writer.write_u8(0);
            writer.write_raw_string(harness.name())?;
        }
        writer.write_i32(harness.hash());
        log::trace!(
            "writing {} (hash {}, root name omitted: {})",
            harness.name(),
            harness.hash(),
            options.omit_root_type_name
        );
        let mut context = WriteContext::new(&self.registry, writer, options.context.clone());
        value.graft_write(&mut context)
    }

    fn read_header(&self, reader: &mut Reader, omit_root_type_name: bool) -> Result<Header, Error> {
        let version = reader.read_i16()?;
        if version != ENGINE_VERSION {
            return Err(Error::invalid_version(version, ENGINE_VERSION));
        }
        let flags = reader.read_u8()?;
        if flags & !header_flags::OMIT_ROOT_TYPE_NAME != 0 {
            return Err(Error::invalid_data(format!("invalid header flags {:#04x}", flags)));
        }
        let omitted = flags & header_flags::OMIT_ROOT_TYPE_NAME != 0;
        if omitted != omit_root_type_name {
            return Err(Error::invalid_omit_root_type(omitted, omit_root_type_name));
        }
        let name = if omitted {
            None
        } else {
            Some(reader.read_raw_string()?)
        };
        let hash = reader.read_i32()?;
        log::trace!("read header: root {:?}, hash {}", name, hash);
        Ok(Header { name, hash })
    }

    pub fn deserialize<T: Serializer>(&self, bytes: &[u8]) -> Result<T, Error> {
        self.deserialize_with_options(bytes, &DeserializeOptions::from(&self.config))
    }

    pub fn deserialize_with_options<T: Serializer>(
        &self,
        bytes: &[u8],
        options: &DeserializeOptions,
    ) -> Result<T, Error> {
        let mut reader = Reader::new(bytes);
        let header = self.read_header(&mut reader, options.omit_root_type_name)?;
        if let Some(name) = &header.name {
            if name != T::graft_type_name() {
                return Err(if self.registry.is_registered(name) {
                    Error::type_mismatch(format!(
                        "stream holds {}, {} was requested",
                        name,
                        T::graft_type_name()
                    ))
                } else {
                    Error::type_not_found(name.clone())
                });
            }
        }
        let harness = self.registry.get_or_build::<T>()?;
        check_hash(&harness, header.hash)?;

        let mut context = ReadContext::new(&self.registry, reader, options.context.clone());
        let mut value = T::graft_read(&mut context)?;
        context.run_completions()?;
        value.graft_on_deserialization_complete(context.streaming());
        ensure_consumed(&context.reader)?;
        Ok(value)
    }

    /// Deserializes a stream without knowing its root type, resolving the
    /// root type name written in the header.
    pub fn deserialize_any(&self, bytes: &[u8]) -> Result<Box<dyn Object>, Error> {
        let mut reader = Reader::new(bytes);
        let header = self.read_header(&mut reader, false)?;
        let name = header
            .name
            .ok_or_else(|| Error::invalid_omit_root_type(true, false))?;
        let harness = self.registry.resolve(&name)?;
        check_hash(&harness, header.hash)?;

        let mut context = ReadContext::new(&self.registry, reader, None);
        let mut value = (harness.get_read_fn())(&mut context)?;
        context.run_completions()?;
        (harness.get_complete_fn())((*value).as_any_mut(), context.streaming())?;
        ensure_consumed(&context.reader)?;
        Ok(value)
    }

    /// Produces an independent duplicate of the graph rooted at `value`.
    ///
    /// Handles shared inside the source graph are shared the same way inside
    /// the duplicate, and cycles are reproduced. Lifecycle hooks do not run.
    pub fn deep_clone<T: Serializer>(&self, value: &T) -> Result<T, Error> {
        self.registry.get_or_build::<T>()?;
        let mut context = CloneContext::new(&self.registry);
        value.graft_clone(&mut context)
    }
}

fn check_hash(harness: &Arc<Harness>, hash: i32) -> Result<(), Error> {
    if harness.hash() != hash {
        return Err(Error::type_modified(format!(
            "{} (stream hash {}, local hash {})",
            harness.name(),
            hash,
            harness.hash()
        )));
    }
    Ok(())
}

fn ensure_consumed(reader: &Reader) -> Result<(), Error> {
    crate::ensure!(
        reader.remaining() == 0,
        Error::invalid_data(format!(
            "{} trailing bytes after the root value",
            reader.remaining()
        ))
    );
    Ok(())
}
