// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::{malformed_error, Result};
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{Atom, AtomHeader, AtomIterator, AtomType, EdtsAtom, MdiaAtom};

/// Track atom.
pub struct TrakAtom {
    pub edts: Option<EdtsAtom>,
    pub mdia: MdiaAtom,
}

impl Atom for TrakAtom {
    fn read(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Self> {
        let mut edts = None;
        let mut mdia = None;

        let mut iter = AtomIterator::new(header);

        while let Some(child) = iter.next(reader)? {
            match child.atom_type {
                AtomType::Edit => {
                    edts = Some(EdtsAtom::read(reader, child)?);
                }
                AtomType::Media => {
                    mdia = Some(MdiaAtom::read(reader, child)?);
                }
                _ => (),
            }
        }

        match mdia {
            Some(mdia) => Ok(TrakAtom { edts, mdia }),
            None => malformed_error("mp4: missing mdia atom"),
        }
    }
}
