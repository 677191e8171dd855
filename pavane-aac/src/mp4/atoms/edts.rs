// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::{unsupported_error, Result};
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{Atom, AtomHeader, AtomIterator, AtomType, ElstAtom};

/// Edit atom.
pub struct EdtsAtom {
    pub elst: Option<ElstAtom>,
}

impl Atom for EdtsAtom {
    fn read(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Self> {
        let mut elst: Option<ElstAtom> = None;

        let mut iter = AtomIterator::new(header);

        while let Some(child) = iter.next(reader)? {
            if child.atom_type == AtomType::EditList {
                if elst.is_some() {
                    return unsupported_error("mp4: multiple edit lists");
                }
                elst = Some(ElstAtom::read(reader, child)?);
            }
        }

        Ok(EdtsAtom { elst })
    }
}
