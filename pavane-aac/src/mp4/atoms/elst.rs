// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::{malformed_error, Result};
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{read_full_header, Atom, AtomHeader};

/// Edit list entry.
pub struct ElstEntry {
    pub segment_duration: u64,
    pub media_time: i64,
    pub media_rate_int: i16,
    pub media_rate_frac: i16,
}

/// Edit list atom.
pub struct ElstAtom {
    pub entries: Vec<ElstEntry>,
}

impl Atom for ElstAtom {
    fn read(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Self> {
        let (version, _) = read_full_header(reader)?;

        let entry_count = reader.read_be_u32()?;

        let entry_len = match version {
            0 => 12,
            1 => 20,
            _ => return malformed_error("mp4 (elst): invalid version"),
        };

        if u64::from(entry_count) * entry_len + 8 != header.data_len {
            return malformed_error("mp4 (elst): invalid entry count");
        }

        let mut entries = Vec::with_capacity(entry_count as usize);

        for _ in 0..entry_count {
            let (segment_duration, media_time) = match version {
                0 => (u64::from(reader.read_be_u32()?), i64::from(reader.read_be_u32()? as i32)),
                _ => (reader.read_be_u64()?, reader.read_be_u64()? as i64),
            };

            let media_rate_int = reader.read_be_u16()? as i16;
            let media_rate_frac = reader.read_be_u16()? as i16;

            entries.push(ElstEntry { segment_duration, media_time, media_rate_int, media_rate_frac });
        }

        Ok(ElstAtom { entries })
    }
}
