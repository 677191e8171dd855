// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::Result;
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{Atom, AtomHeader, AtomIterator, AtomType, StblAtom};

/// Media information atom.
pub struct MinfAtom {
    pub stbl: Option<StblAtom>,
}

impl Atom for MinfAtom {
    fn read(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Self> {
        let mut stbl = None;

        let mut iter = AtomIterator::new(header);

        while let Some(child) = iter.next(reader)? {
            if child.atom_type == AtomType::SampleTable {
                stbl = Some(StblAtom::read(reader, child)?);
            }
        }

        Ok(MinfAtom { stbl })
    }
}
