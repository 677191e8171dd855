// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! AAC-LC decoding to seekable PCM.
//!
//! The crate indexes a raw ADTS stream (`.aac`) or a non-fragmented MP4 file (`.m4a`, `.m4b`)
//! carrying one AAC-LC audio track, and exposes the decoded audio as a byte-addressable,
//! seekable, interleaved signed 16-bit little-endian PCM stream.
//!
//! Bit-level access unit parsing is delegated to an implementation of
//! [`syntax::SyntaxDecoder`]; the crate owns everything on either side of that interface:
//! container indexing, AudioSpecificConfig decoding, spectral reconstruction, the stereo tools,
//! temporal noise shaping, the inverse filterbank, and the seek logic.

pub use pavane_core::errors::{Error, Result};
pub use pavane_core::io::ByteSource;

mod adts;
mod asc;
mod common;
mod mp4;
mod reader;
mod source;

pub mod syntax;
pub mod synth;

pub use asc::AscConfig;
pub use reader::{Info, PcmReader};
pub use source::{AuRecord, ContainerKind, ContainerSource};

use pavane_core::errors::unsupported_error;

/// Opens a stream, selecting the container family by the file extension of `name`
/// (case-insensitive): `.aac` selects ADTS, `.m4a` and `.m4b` select MP4. Access unit payloads
/// are parsed by `syntax`.
pub fn open(
    source: impl ByteSource + 'static,
    name: &str,
    syntax: Box<dyn syntax::SyntaxDecoder>,
) -> Result<PcmReader> {
    let src: Box<dyn ByteSource> = Box::new(source);

    let len = src.byte_len().map_err(Error::Io)?;

    let extension = match name.rsplit_once('.') {
        Some((_, extension)) => extension.to_ascii_lowercase(),
        None => return unsupported_error("unrecognized file extension"),
    };

    let container = match extension.as_str() {
        "aac" => adts::index(&src, len)?,
        "m4a" | "m4b" => mp4::index(&src, len)?,
        _ => return unsupported_error("unrecognized file extension"),
    };

    PcmReader::new(src, container, syntax)
}
