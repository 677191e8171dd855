// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::{malformed_error, Result};
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{read_full_header, Atom, AtomHeader};

pub struct SampleDurationEntry {
    pub sample_count: u32,
    pub sample_delta: u32,
}

/// Time-to-sample atom.
pub struct SttsAtom {
    pub entries: Vec<SampleDurationEntry>,
}

impl Atom for SttsAtom {
    fn read(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Self> {
        let (_, _) = read_full_header(reader)?;

        let entry_count = reader.read_be_u32()?;

        if u64::from(entry_count) * 8 + 8 != header.data_len {
            return malformed_error("mp4 (stts): invalid entry count");
        }

        let mut entries = Vec::with_capacity(entry_count as usize);

        for _ in 0..entry_count {
            let sample_count = reader.read_be_u32()?;
            let sample_delta = reader.read_be_u32()?;

            entries.push(SampleDurationEntry { sample_count, sample_delta });
        }

        Ok(SttsAtom { entries })
    }
}

impl SttsAtom {
    /// The total number of samples described.
    pub fn total_samples(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.sample_count)).sum()
    }
}
