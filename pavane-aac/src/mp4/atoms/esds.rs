// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::{malformed_error, Result};
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{read_full_header, Atom, AtomHeader};

const ES_DESCRIPTOR: u8 = 0x03;
const DECODER_CONFIG_DESCRIPTOR: u8 = 0x04;
const DECODER_SPECIFIC_INFO: u8 = 0x05;

/// Elementary stream descriptor atom, walked down to the decoder-specific configuration.
pub struct EsdsAtom {
    pub object_type_indication: u8,
    /// The AudioSpecificConfig bytes.
    pub dec_specific_info: Vec<u8>,
}

impl Atom for EsdsAtom {
    fn read(reader: &mut SourceReader<'_>, _header: AtomHeader) -> Result<Self> {
        let (_, _) = read_full_header(reader)?;

        let (tag, _) = read_descriptor_header(reader)?;
        if tag != ES_DESCRIPTOR {
            return malformed_error("mp4 (esds): missing es descriptor");
        }

        // ES_ID.
        reader.ignore_bytes(2)?;

        let flags = reader.read_u8()?;

        // Stream dependency, URL, and OCR stream fields precede the decoder configuration when
        // flagged.
        if flags & 0x80 != 0 {
            reader.ignore_bytes(2)?;
        }
        if flags & 0x40 != 0 {
            let url_len = reader.read_u8()?;
            reader.ignore_bytes(u64::from(url_len))?;
        }
        if flags & 0x20 != 0 {
            reader.ignore_bytes(2)?;
        }

        let (tag, _) = read_descriptor_header(reader)?;
        if tag != DECODER_CONFIG_DESCRIPTOR {
            return malformed_error("mp4 (esds): missing decoder config descriptor");
        }

        let object_type_indication = reader.read_u8()?;

        // Stream type, buffer size, max and average bitrate.
        reader.ignore_bytes(12)?;

        let (tag, len) = read_descriptor_header(reader)?;
        if tag != DECODER_SPECIFIC_INFO {
            return malformed_error("mp4 (esds): missing decoder specific info");
        }

        if len == 0 {
            return malformed_error("mp4 (esds): empty decoder specific info");
        }

        let mut dec_specific_info = vec![0u8; len as usize];
        reader.read_buf_exact(&mut dec_specific_info)?;

        Ok(EsdsAtom { object_type_indication, dec_specific_info })
    }
}

/// Reads an MPEG-4 descriptor tag and its expandable length field.
fn read_descriptor_header(reader: &mut SourceReader<'_>) -> Result<(u8, u32)> {
    let tag = reader.read_u8()?;

    let mut len = 0u32;

    for _ in 0..4 {
        let byte = reader.read_u8()?;
        len = (len << 7) | u32::from(byte & 0x7f);

        if byte & 0x80 == 0 {
            return Ok((tag, len));
        }
    }

    malformed_error("mp4 (esds): invalid descriptor length")
}
