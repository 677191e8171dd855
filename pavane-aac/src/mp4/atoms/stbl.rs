// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::{malformed_error, Result};
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{
    Atom, AtomHeader, AtomIterator, AtomType, Co64Atom, StcoAtom, StscAtom, StsdAtom, StszAtom,
    SttsAtom,
};

/// Sample table atom.
pub struct StblAtom {
    pub stsd: StsdAtom,
    pub stts: SttsAtom,
    pub stsc: StscAtom,
    pub stsz: StszAtom,
    pub stco: Option<StcoAtom>,
    pub co64: Option<Co64Atom>,
}

impl Atom for StblAtom {
    fn read(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Self> {
        let mut stsd = None;
        let mut stts = None;
        let mut stsc = None;
        let mut stsz = None;
        let mut stco = None;
        let mut co64 = None;

        let mut iter = AtomIterator::new(header);

        while let Some(child) = iter.next(reader)? {
            match child.atom_type {
                AtomType::SampleDescription => {
                    stsd = Some(StsdAtom::read(reader, child)?);
                }
                AtomType::TimeToSample => {
                    stts = Some(SttsAtom::read(reader, child)?);
                }
                AtomType::SampleToChunk => {
                    stsc = Some(StscAtom::read(reader, child)?);
                }
                AtomType::SampleSize => {
                    stsz = Some(StszAtom::read(reader, child)?);
                }
                AtomType::ChunkOffset => {
                    stco = Some(StcoAtom::read(reader, child)?);
                }
                AtomType::ChunkOffset64 => {
                    co64 = Some(Co64Atom::read(reader, child)?);
                }
                _ => (),
            }
        }

        let stsd = match stsd {
            Some(stsd) => stsd,
            None => return malformed_error("mp4: missing stsd atom"),
        };
        let stts = match stts {
            Some(stts) => stts,
            None => return malformed_error("mp4: missing stts atom"),
        };
        let stsc = match stsc {
            Some(stsc) => stsc,
            None => return malformed_error("mp4: missing stsc atom"),
        };
        let stsz = match stsz {
            Some(stsz) => stsz,
            None => return malformed_error("mp4: missing stsz atom"),
        };

        Ok(StblAtom { stsd, stts, stsc, stsz, stco, co64 })
    }
}
