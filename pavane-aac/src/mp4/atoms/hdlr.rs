// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pavane_core::errors::Result;
use pavane_core::io::SourceReader;

use crate::mp4::atoms::{read_full_header, Atom, AtomHeader};

/// Handler atom.
pub struct HdlrAtom {
    pub handler_type: [u8; 4],
}

impl Atom for HdlrAtom {
    fn read(reader: &mut SourceReader<'_>, _header: AtomHeader) -> Result<Self> {
        let (_, _) = read_full_header(reader)?;

        // Pre-defined.
        reader.ignore_bytes(4)?;

        let handler_type = reader.read_quad()?;

        // Reserved fields and the handler name trail; neither is needed.

        Ok(HdlrAtom { handler_type })
    }
}

impl HdlrAtom {
    /// Whether this handler declares an audio track.
    pub fn is_sound(&self) -> bool {
        &self.handler_type == b"soun"
    }
}
