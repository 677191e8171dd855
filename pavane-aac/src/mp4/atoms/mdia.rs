// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::{malformed_error, Result};
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{Atom, AtomHeader, AtomIterator, AtomType, HdlrAtom, MinfAtom};

/// Media atom.
pub struct MdiaAtom {
    pub hdlr: HdlrAtom,
    pub minf: Option<MinfAtom>,
}

impl Atom for MdiaAtom {
    fn read(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Self> {
        let mut hdlr = None;
        let mut minf = None;

        let mut iter = AtomIterator::new(header);

        while let Some(child) = iter.next(reader)? {
            match child.atom_type {
                AtomType::Handler => {
                    hdlr = Some(HdlrAtom::read(reader, child)?);
                }
                AtomType::MediaInfo => {
                    minf = Some(MinfAtom::read(reader, child)?);
                }
                _ => (),
            }
        }

        match hdlr {
            Some(hdlr) => Ok(MdiaAtom { hdlr, minf }),
            None => malformed_error("mp4: missing hdlr atom"),
        }
    }
}
