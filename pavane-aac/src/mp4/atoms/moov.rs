// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::{unsupported_error, Result};
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{Atom, AtomHeader, AtomIterator, AtomType, TrakAtom};

/// Movie atom.
pub struct MoovAtom {
    pub traks: Vec<TrakAtom>,
}

impl Atom for MoovAtom {
    fn read(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Self> {
        let mut traks = Vec::new();

        let mut iter = AtomIterator::new(header);

        while let Some(child) = iter.next(reader)? {
            match child.atom_type {
                AtomType::Track => {
                    traks.push(TrakAtom::read(reader, child)?);
                }
                AtomType::MovieExtends => {
                    // A movie-extends atom announces fragments.
                    return unsupported_error("mp4: fragmented stream");
                }
                _ => (),
            }
        }

        Ok(MoovAtom { traks })
    }
}
