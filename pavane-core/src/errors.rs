// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type.

use std::fmt;
use std::io;

/// `Error` provides an enumeration of all possible errors reported by Pavane.
#[derive(Debug)]
pub enum Error {
    /// An IO error occurred while reading from the backing byte source.
    Io(io::Error),
    /// The stream contained malformed data and could not be decoded.
    Malformed(&'static str),
    /// The stream is structurally valid, but uses a feature the decoder refuses to handle.
    Unsupported(&'static str),
    /// The stream is structurally valid, but falls outside what the decoder has been validated
    /// against.
    Unvalidated(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Io(ref err) => write!(f, "io error: {}", err),
            Error::Malformed(msg) => write!(f, "malformed stream: {}", msg),
            Error::Unsupported(feature) => write!(f, "unsupported feature: {}", feature),
            Error::Unvalidated(feature) => write!(f, "unvalidated feature: {}", feature),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        match err.kind() {
            // A short read while indexing or decoding always indicates a truncated stream.
            io::ErrorKind::UnexpectedEof => Error::Malformed("unexpected end of stream"),
            _ => Error::Io(err),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err {
            Error::Io(err) => err,
            Error::Malformed(_) => io::Error::new(io::ErrorKind::InvalidData, err),
            Error::Unsupported(_) | Error::Unvalidated(_) => {
                io::Error::new(io::ErrorKind::Unsupported, err)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to create a malformed stream error.
pub fn malformed_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::Malformed(desc))
}

/// Convenience function to create an unsupported feature error.
pub fn unsupported_error<T>(feature: &'static str) -> Result<T> {
    Err(Error::Unsupported(feature))
}

/// Convenience function to create an unvalidated feature error.
pub fn unvalidated_error<T>(feature: &'static str) -> Result<T> {
    Err(Error::Unvalidated(feature))
}
