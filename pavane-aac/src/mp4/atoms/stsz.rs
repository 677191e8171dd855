// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::{malformed_error, Result};
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{read_full_header, Atom, AtomHeader};

/// Sample size atom.
pub struct StszAtom {
    /// The size shared by every sample, or zero when sizes are per-sample.
    pub uniform_size: u32,
    pub sample_count: u32,
    /// Per-sample sizes; empty when `uniform_size` is non-zero.
    pub sizes: Vec<u32>,
}

impl Atom for StszAtom {
    fn read(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Self> {
        let (_, _) = read_full_header(reader)?;

        let uniform_size = reader.read_be_u32()?;
        let sample_count = reader.read_be_u32()?;

        let mut sizes = Vec::new();

        if uniform_size == 0 {
            if u64::from(sample_count) * 4 + 12 != header.data_len {
                return malformed_error("mp4 (stsz): invalid sample count");
            }

            sizes.reserve_exact(sample_count as usize);

            for _ in 0..sample_count {
                sizes.push(reader.read_be_u32()?);
            }
        }

        Ok(StszAtom { uniform_size, sample_count, sizes })
    }
}

impl StszAtom {
    /// The size of sample `index`.
    pub fn sample_size(&self, index: usize) -> u32 {
        if self.uniform_size != 0 {
            self.uniform_size
        }
        else {
            self.sizes[index]
        }
    }
}
