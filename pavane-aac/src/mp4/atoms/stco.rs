// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::{malformed_error, Result};
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{read_full_header, Atom, AtomHeader};

/// 32-bit chunk offset atom.
pub struct StcoAtom {
    pub offsets: Vec<u64>,
}

impl Atom for StcoAtom {
    fn read(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Self> {
        let (_, _) = read_full_header(reader)?;

        let entry_count = reader.read_be_u32()?;

        if u64::from(entry_count) * 4 + 8 != header.data_len {
            return malformed_error("mp4 (stco): invalid entry count");
        }

        let mut offsets = Vec::with_capacity(entry_count as usize);

        for _ in 0..entry_count {
            offsets.push(u64::from(reader.read_be_u32()?));
        }

        Ok(StcoAtom { offsets })
    }
}
