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

//! Error type shared by every graft operation.
//!
//! Constructors are `#[cold]` and `#[track_caller]`: they sit on the error side of
//! every buffer read and type check, and keeping them out of line keeps the hot
//! paths small.

use std::borrow::Cow;

use thiserror::Error;

/// Set `GRAFT_PANIC_ON_ERROR` at compile time to panic where an error is created.
pub const PANIC_ON_ERROR: bool = option_env!("GRAFT_PANIC_ON_ERROR").is_some();

#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for graft serialization, deserialization and cloning.
///
/// Always build errors through the constructor functions ([`Error::unsupported`],
/// [`Error::type_modified`], ...) instead of the variants, so that
/// `GRAFT_PANIC_ON_ERROR` can stop at the creation site:
///
/// ```bash
/// RUST_BACKTRACE=1 GRAFT_PANIC_ON_ERROR=1 cargo test
/// ```
///
/// ```rust
/// use graft_core::error::Error;
///
/// let err = Error::invalid_data(format!("negative length {}", -3));
/// assert!(matches!(err, Error::InvalidData(_)));
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A type cannot be serialized: functions, pointers, untyped sequences,
    /// compiler-generated or opaque runtime types, arrays of rank 255 or more.
    #[error("unsupported: {0}")]
    Unsupported(Cow<'static, str>),

    /// A custom-serialization-contract type has no data constructor.
    #[error("missing data constructor: {0}")]
    MissingConstructor(Cow<'static, str>),

    /// A type name found in the stream does not resolve to a known type.
    #[error("type not found: {0}")]
    TypeNotFound(Cow<'static, str>),

    /// The structural hash in the stream differs from the local type.
    #[error("type modified: {0}")]
    TypeModified(Cow<'static, str>),

    /// The stream was written by an unsupported engine version.
    #[error("invalid engine version: found {0}, expected {1}")]
    InvalidVersion(i16, i16),

    /// The reader and the writer disagree on whether the root type name is present.
    #[error("root type name omitted by writer: {0}, expected by reader: {1}")]
    InvalidOmitRootType(bool, bool),

    /// The stream describes a different type than the one requested.
    #[error("type mismatch: {0}")]
    TypeMismatch(Cow<'static, str>),

    /// Read past the end of the stream.
    #[error("buffer out of bound: {0} + {1} > {2}")]
    BufferOutOfBound(usize, usize, usize),

    /// Malformed or corrupted stream content.
    #[error("invalid data: {0}")]
    InvalidData(Cow<'static, str>),

    /// A back-reference points to an unknown, incompatible or unfinished slot.
    #[error("invalid reference: {0}")]
    InvalidRef(Cow<'static, str>),

    /// The operation is not allowed in the current state.
    #[error("not allowed: {0}")]
    NotAllowed(Cow<'static, str>),

    /// Any other failure.
    #[error("{0}")]
    Unknown(Cow<'static, str>),
}

macro_rules! cow_constructor {
    ($(#[$doc:meta])* $fn_name:ident => $variant:ident) => {
        $(#[$doc])*
        #[inline(always)]
        #[cold]
        #[track_caller]
        pub fn $fn_name<S: Into<Cow<'static, str>>>(s: S) -> Self {
            let err = Error::$variant(s.into());
            if PANIC_ON_ERROR {
                panic!("GRAFT_PANIC_ON_ERROR: {}", err);
            }
            err
        }
    };
}

impl Error {
    cow_constructor!(
        /// Creates a new [`Error::Unsupported`].
        unsupported => Unsupported
    );
    cow_constructor!(
        /// Creates a new [`Error::MissingConstructor`].
        missing_constructor => MissingConstructor
    );
    cow_constructor!(
        /// Creates a new [`Error::TypeNotFound`].
        type_not_found => TypeNotFound
    );
    cow_constructor!(
        /// Creates a new [`Error::TypeModified`].
        type_modified => TypeModified
    );
    cow_constructor!(
        /// Creates a new [`Error::TypeMismatch`].
        type_mismatch => TypeMismatch
    );
    cow_constructor!(
        /// Creates a new [`Error::InvalidData`].
        invalid_data => InvalidData
    );
    cow_constructor!(
        /// Creates a new [`Error::InvalidRef`].
        invalid_ref => InvalidRef
    );
    cow_constructor!(
        /// Creates a new [`Error::NotAllowed`].
        not_allowed => NotAllowed
    );
    cow_constructor!(
        /// Creates a new [`Error::Unknown`].
        unknown => Unknown
    );

    /// Creates a new [`Error::InvalidVersion`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_version(found: i16, expected: i16) -> Self {
        let err = Error::InvalidVersion(found, expected);
        if PANIC_ON_ERROR {
            panic!("GRAFT_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::InvalidOmitRootType`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_omit_root_type(written: bool, expected: bool) -> Self {
        let err = Error::InvalidOmitRootType(written, expected);
        if PANIC_ON_ERROR {
            panic!("GRAFT_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::BufferOutOfBound`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn buffer_out_of_bound(offset: usize, length: usize, capacity: usize) -> Self {
        let err = Error::BufferOutOfBound(offset, length, capacity);
        if PANIC_ON_ERROR {
            panic!("GRAFT_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Prefixes an [`Error::Unsupported`] with the type and member that contain
    /// the offending type. Other errors are returned unchanged.
    #[inline(never)]
    pub fn within(self, owner: &str, member: &str) -> Error {
        match self {
            Error::Unsupported(msg) => {
                Error::Unsupported(format!("{}.{}: {}", owner, member, msg).into())
            }
            other => other,
        }
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// ```rust
/// use graft_core::ensure;
/// use graft_core::error::Error;
///
/// fn check_len(n: i32) -> Result<(), Error> {
///     ensure!(n >= 0, Error::invalid_data(format!("negative length {}", n)));
///     ensure!(n < 10, "length {} too large", n);
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::unknown($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::unknown(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`Error::Unknown`].
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::unknown($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::unknown(format!($fmt, $($arg)*)))
    };
}
