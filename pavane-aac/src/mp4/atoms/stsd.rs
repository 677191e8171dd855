// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::{malformed_error, unsupported_error, Result};
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{
    read_full_header, Atom, AtomHeader, AtomIterator, AtomType, EsdsAtom,
};

/// An `mp4a` audio sample entry.
pub struct Mp4aEntry {
    pub channels: u16,
    /// The 16.16 fixed-point sampling frequency declared by the entry.
    pub sample_rate: u32,
    pub esds: Option<EsdsAtom>,
}

/// Sample description atom.
pub struct StsdAtom {
    pub entry_count: u32,
    /// The parsed `mp4a` entry, present when the first description is plain MPEG-4 audio.
    pub mp4a: Option<Mp4aEntry>,
}

impl Atom for StsdAtom {
    fn read(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Self> {
        let (_, _) = read_full_header(reader)?;

        let entry_count = reader.read_be_u32()?;

        if entry_count == 0 {
            return malformed_error("mp4 (stsd): no sample descriptions");
        }

        // Only the first entry is examined; multiple descriptions are rejected by the indexer
        // for audio tracks, and other tracks are not decoded at all.
        let entry = AtomHeader::read(reader)?;

        let mp4a = match entry.atom_type {
            AtomType::AudioSampleEntryMp4a => Some(read_mp4a_entry(reader, entry)?),
            AtomType::AudioSampleEntryEnca => {
                return unsupported_error("mp4: encrypted audio track")
            }
            _ => None,
        };

        Ok(StsdAtom { entry_count, mp4a })
    }
}

fn read_mp4a_entry(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Mp4aEntry> {
    // SampleEntry: six reserved bytes and the data reference index.
    reader.ignore_bytes(8)?;

    // AudioSampleEntry.
    let version = reader.read_be_u16()?;

    // Revision and vendor.
    reader.ignore_bytes(6)?;

    let channels = reader.read_be_u16()?;

    // Sample size, compression id, packet size.
    reader.ignore_bytes(6)?;

    let sample_rate = reader.read_be_u32()?;

    // QuickTime version 1 entries append four 32-bit sound description fields.
    match version {
        0 => (),
        1 => reader.ignore_bytes(16)?,
        _ => return unsupported_error("mp4 (stsd): unknown audio sample entry version"),
    }

    let mut esds = None;

    let mut iter = AtomIterator::span(reader.pos(), header.data_end());

    while let Some(child) = iter.next(reader)? {
        if child.atom_type == AtomType::Esds {
            esds = Some(EsdsAtom::read(reader, child)?);
        }
    }

    Ok(Mp4aEntry { channels, sample_rate, esds })
}
