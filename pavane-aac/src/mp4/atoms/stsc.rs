// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::{malformed_error, Result};
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{read_full_header, Atom, AtomHeader};

pub struct SampleToChunkEntry {
    /// 1-based index of the first chunk this entry applies to.
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
}

/// Sample-to-chunk atom.
pub struct StscAtom {
    pub entries: Vec<SampleToChunkEntry>,
}

impl Atom for StscAtom {
    fn read(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Self> {
        let (_, _) = read_full_header(reader)?;

        let entry_count = reader.read_be_u32()?;

        if u64::from(entry_count) * 12 + 8 != header.data_len {
            return malformed_error("mp4 (stsc): invalid entry count");
        }

        let mut entries = Vec::with_capacity(entry_count as usize);

        for _ in 0..entry_count {
            let first_chunk = reader.read_be_u32()?;
            let samples_per_chunk = reader.read_be_u32()?;
            // Sample description index; a single description is enforced elsewhere.
            let _ = reader.read_be_u32()?;

            entries.push(SampleToChunkEntry { first_chunk, samples_per_chunk });
        }

        // Entries must start at the first chunk and ascend.
        if let Some(first) = entries.first() {
            if first.first_chunk != 1 {
                return malformed_error("mp4 (stsc): first entry does not start at chunk 1");
            }
        }

        for pair in entries.windows(2) {
            if pair[1].first_chunk <= pair[0].first_chunk {
                return malformed_error("mp4 (stsc): entries not ascending");
            }
        }

        Ok(StscAtom { entries })
    }
}
