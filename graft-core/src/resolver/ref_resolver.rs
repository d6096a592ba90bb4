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
use crate::error::Error;
use crate::serializer::{Object, Serializer, Shared};
use crate::types::RefFlag;
use std::any::Any;
use std::collections::{HashMap, HashSet};

/// Reference writer for tracking shared handles and strings during serialization.
///
/// Every tracked value gets the next `i32` index of one shared index space, in
/// pre-order: the index is assigned when the value is first met, before its
/// payload is written. Visited handles are kept alive until the writer is
/// cleared so that an address cannot be reused by a temporary within one call.
///
/// ```rust
/// use graft_core::buffer::Writer;
/// use graft_core::resolver::ref_resolver::RefWriter;
/// use std::rc::Rc;
///
/// let mut ref_writer = RefWriter::new();
/// let mut writer = Writer::default();
/// let rc = Rc::new(42);
/// let addr = Rc::as_ptr(&rc) as usize;
///
/// // first encounter: the caller writes the payload
/// assert!(!ref_writer.try_write_ref(&mut writer, addr, Box::new(rc.clone())));
/// // second encounter: a back-reference was written
/// assert!(ref_writer.try_write_ref(&mut writer, addr, Box::new(rc.clone())));
/// ```
#[derive(Default)]
pub struct RefWriter {
    refs: HashMap<usize, i32>,
    strings: HashMap<String, i32>,
    keep_alive: Vec<Box<dyn Any>>,
    next_index: i32,
}

impl RefWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> i32 {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    /// Returns the back-reference index when `addr` was already tracked,
    /// otherwise tracks it and returns `None`.
    pub fn track_ptr(&mut self, addr: usize, keep_alive: Box<dyn Any>) -> Option<i32> {
        if let Some(&index) = self.refs.get(&addr) {
            return Some(index);
        }
        let index = self.next();
        self.refs.insert(addr, index);
        self.keep_alive.push(keep_alive);
        None
    }

    /// Same as [`RefWriter::track_ptr`] with value equality on strings.
    pub fn track_str(&mut self, s: &str) -> Option<i32> {
        if let Some(&index) = self.strings.get(s) {
            return Some(index);
        }
        let index = self.next();
        self.strings.insert(s.to_owned(), index);
        None
    }

    pub fn index_of_ptr(&self, addr: usize) -> Option<i32> {
        self.refs.get(&addr).copied()
    }

    pub fn index_of_str(&self, s: &str) -> Option<i32> {
        self.strings.get(s).copied()
    }

    /// Writes the ref flag for a handle at `addr`.
    ///
    /// Returns `true` when a back-reference was written, `false` when this is
    /// the first visit and the caller must write the payload.
    pub fn try_write_ref(&mut self, writer: &mut Writer, addr: usize, keep_alive: Box<dyn Any>) -> bool {
        match self.track_ptr(addr, keep_alive) {
            Some(index) => {
                writer.write_u8(RefFlag::Tracked.into());
                writer.write_i32(index);
                true
            }
            None => {
                writer.write_u8(RefFlag::FirstVisit.into());
                false
            }
        }
    }

    /// String counterpart of [`RefWriter::try_write_ref`].
    pub fn try_write_str_ref(&mut self, writer: &mut Writer, s: &str) -> bool {
        match self.track_str(s) {
            Some(index) => {
                writer.write_u8(RefFlag::Tracked.into());
                writer.write_i32(index);
                true
            }
            None => {
                writer.write_u8(RefFlag::FirstVisit.into());
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.refs.clear();
        self.strings.clear();
        self.keep_alive.clear();
        self.next_index = 0;
    }
}

enum RefSlot {
    Reserved,
    Shared {
        handle: Box<dyn Any>,
        object: Shared<dyn Object>,
    },
    Handle(Box<dyn Any>),
    Str(String),
}

/// Positional table of values reconstructed during deserialization.
///
/// Slots are reserved before a payload is read so that positions match the
/// writer's pre-order numbering even when the payload contains further
/// tracked values.
#[derive(Default)]
pub struct RefReader {
    slots: Vec<RefSlot>,
}

impl RefReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn reserve(&mut self) -> i32 {
        self.slots.push(RefSlot::Reserved);
        (self.slots.len() - 1) as i32
    }

    fn slot_mut(&mut self, index: i32) -> Result<&mut RefSlot, Error> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.slots.get_mut(i))
            .ok_or_else(|| Error::invalid_ref(format!("reference {} was never reserved", index)))
    }

    fn slot(&self, index: i32) -> Result<&RefSlot, Error> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.slots.get(i))
            .ok_or_else(|| Error::invalid_ref(format!("unknown reference {}", index)))
    }

    /// Stores a shared handle both as its concrete type and as a dynamic view.
    pub fn fill_shared<T: Serializer>(&mut self, index: i32, shared: &Shared<T>) -> Result<(), Error> {
        *self.slot_mut(index)? = RefSlot::Shared {
            handle: Box::new(shared.clone()),
            object: shared.clone().into_object(),
        };
        Ok(())
    }

    /// Stores an immutable handle such as `Rc<T>` or `Arc<T>`.
    pub fn fill_handle<H: Any>(&mut self, index: i32, handle: H) -> Result<(), Error> {
        *self.slot_mut(index)? = RefSlot::Handle(Box::new(handle));
        Ok(())
    }

    pub fn store_str(&mut self, s: &str) -> i32 {
        self.slots.push(RefSlot::Str(s.to_owned()));
        (self.slots.len() - 1) as i32
    }

    pub fn get_shared<T: Serializer>(&self, index: i32) -> Result<Shared<T>, Error> {
        match self.slot(index)? {
            RefSlot::Shared { handle, .. } => handle
                .downcast_ref::<Shared<T>>()
                .cloned()
                .ok_or_else(|| incompatible::<Shared<T>>(index)),
            _ => Err(incompatible::<Shared<T>>(index)),
        }
    }

    pub fn get_object(&self, index: i32) -> Result<Shared<dyn Object>, Error> {
        match self.slot(index)? {
            RefSlot::Shared { object, .. } => Ok(object.clone()),
            _ => Err(incompatible::<Shared<dyn Object>>(index)),
        }
    }

    pub fn get_handle<H: Any + Clone>(&self, index: i32) -> Result<H, Error> {
        match self.slot(index)? {
            RefSlot::Handle(handle) => handle
                .downcast_ref::<H>()
                .cloned()
                .ok_or_else(|| incompatible::<H>(index)),
            RefSlot::Reserved => Err(Error::invalid_ref(format!(
                "reference {} points to a {} that is still being read; immutable handles cannot form cycles",
                index,
                std::any::type_name::<H>()
            ))),
            _ => Err(incompatible::<H>(index)),
        }
    }

    pub fn get_str(&self, index: i32) -> Result<String, Error> {
        match self.slot(index)? {
            RefSlot::Str(s) => Ok(s.clone()),
            _ => Err(incompatible::<String>(index)),
        }
    }

    pub fn read_ref_flag(&self, reader: &mut Reader) -> Result<RefFlag, Error> {
        let flag = reader.read_u8()?;
        RefFlag::try_from(flag).map_err(|_| Error::invalid_data(format!("invalid ref flag {}", flag)))
    }

    pub fn read_ref_index(&self, reader: &mut Reader) -> Result<i32, Error> {
        reader.read_i32()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cold]
fn incompatible<T: ?Sized>(index: i32) -> Error {
    Error::invalid_ref(format!(
        "reference {} does not hold a {}",
        index,
        std::any::type_name::<T>()
    ))
}

struct ClonedHandle {
    // source handle, kept alive for the duration of the clone
    _source: Box<dyn Any>,
    clone: Box<dyn Any>,
    object: Option<Shared<dyn Object>>,
}

/// Maps source handle identity to its duplicate during a deep clone.
#[derive(Default)]
pub struct CloneTracker {
    clones: HashMap<usize, ClonedHandle>,
    // immutable handles whose target is still being cloned
    pending: HashSet<usize>,
}

impl CloneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracked(&self, addr: usize) -> bool {
        self.clones.contains_key(&addr)
    }

    /// Returns the duplicate already made for `addr`, if any.
    pub fn get_clone_for<H: Any + Clone>(&self, addr: usize) -> Result<Option<H>, Error> {
        match self.clones.get(&addr) {
            None => Ok(None),
            Some(entry) => entry
                .clone
                .downcast_ref::<H>()
                .cloned()
                .map(Some)
                .ok_or_else(|| {
                    Error::invalid_ref(format!(
                        "handle at {:#x} was cloned as a different type than {}",
                        addr,
                        std::any::type_name::<H>()
                    ))
                }),
        }
    }

    pub fn get_object_for(&self, addr: usize) -> Result<Option<Shared<dyn Object>>, Error> {
        match self.clones.get(&addr) {
            None => Ok(None),
            Some(ClonedHandle {
                object: Some(object),
                ..
            }) => Ok(Some(object.clone())),
            Some(_) => Err(Error::invalid_ref(format!(
                "handle at {:#x} is not a shared object",
                addr
            ))),
        }
    }

    pub fn track_shared<T: Serializer>(&mut self, addr: usize, source: Box<dyn Any>, clone: &Shared<T>) {
        self.clones.insert(
            addr,
            ClonedHandle {
                _source: source,
                clone: Box::new(clone.clone()),
                object: Some(clone.clone().into_object()),
            },
        );
    }

    pub fn track_handle<H: Any>(&mut self, addr: usize, source: Box<dyn Any>, clone: H) {
        self.clones.insert(
            addr,
            ClonedHandle {
                _source: source,
                clone: Box::new(clone),
                object: None,
            },
        );
    }

    /// Marks an immutable handle as being cloned. Meeting it again before
    /// [`CloneTracker::leave`] means the graph has a cycle through `Rc`/`Arc`.
    pub fn enter(&mut self, addr: usize) -> Result<(), Error> {
        if !self.pending.insert(addr) {
            return Err(Error::invalid_ref(format!(
                "cycle through immutable handle at {:#x}; use Shared for cyclic graphs",
                addr
            )));
        }
        Ok(())
    }

    pub fn leave(&mut self, addr: usize) {
        self.pending.remove(&addr);
    }

    pub fn clear(&mut self) {
        self.clones.clear();
        self.pending.clear();
    }
}
