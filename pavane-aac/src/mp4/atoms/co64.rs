// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::{malformed_error, Result};
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{read_full_header, Atom, AtomHeader};

/// 64-bit chunk offset atom.
pub struct Co64Atom {
    pub offsets: Vec<u64>,
}

impl Atom for Co64Atom {
    fn read(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Self> {
        let (_, _) = read_full_header(reader)?;

        let entry_count = reader.read_be_u32()?;

        if u64::from(entry_count) * 8 + 8 != header.data_len {
            return malformed_error("mp4 (co64): invalid entry count");
        }

        let mut offsets = Vec::with_capacity(entry_count as usize);

        for _ in 0..entry_count {
            let offset = reader.read_be_u64()?;

            // Offsets beyond the signed 63-bit range cannot address real files.
            if offset > i64::MAX as u64 {
                return malformed_error("mp4 (co64): chunk offset out of range");
            }

            offsets.push(offset);
        }

        Ok(Co64Atom { offsets })
    }
}
