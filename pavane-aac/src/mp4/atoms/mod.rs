// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ISO Base Media File Format box ("atom") parsing, reduced to the subset the indexer consumes.

use pavane_core::errors::{malformed_error, Result};
use pavane_core::io::SourceReader;

pub(crate) mod co64;
pub(crate) mod edts;
pub(crate) mod elst;
pub(crate) mod esds;
pub(crate) mod hdlr;
pub(crate) mod mdia;
pub(crate) mod minf;
pub(crate) mod moov;
pub(crate) mod stbl;
pub(crate) mod stco;
pub(crate) mod stsc;
pub(crate) mod stsd;
pub(crate) mod stsz;
pub(crate) mod stts;
pub(crate) mod trak;

pub use co64::Co64Atom;
pub use edts::EdtsAtom;
pub use elst::ElstAtom;
pub use esds::EsdsAtom;
pub use hdlr::HdlrAtom;
pub use mdia::MdiaAtom;
pub use minf::MinfAtom;
pub use moov::MoovAtom;
pub use stbl::StblAtom;
pub use stco::StcoAtom;
pub use stsc::StscAtom;
pub use stsd::StsdAtom;
pub use stsz::StszAtom;
pub use stts::SttsAtom;
pub use trak::TrakAtom;

/// Atom types.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AtomType {
    AudioSampleEntryEnca,
    AudioSampleEntryMp4a,
    ChunkOffset,
    ChunkOffset64,
    Edit,
    EditList,
    Esds,
    Handler,
    Media,
    MediaData,
    MediaInfo,
    Movie,
    MovieExtends,
    MovieFragment,
    SampleDescription,
    SampleSize,
    SampleTable,
    SampleToChunk,
    TimeToSample,
    Track,
    Other([u8; 4]),
}

impl From<[u8; 4]> for AtomType {
    fn from(val: [u8; 4]) -> Self {
        match &val {
            b"enca" => AtomType::AudioSampleEntryEnca,
            b"mp4a" => AtomType::AudioSampleEntryMp4a,
            b"stco" => AtomType::ChunkOffset,
            b"co64" => AtomType::ChunkOffset64,
            b"edts" => AtomType::Edit,
            b"elst" => AtomType::EditList,
            b"esds" => AtomType::Esds,
            b"hdlr" => AtomType::Handler,
            b"mdia" => AtomType::Media,
            b"mdat" => AtomType::MediaData,
            b"minf" => AtomType::MediaInfo,
            b"moov" => AtomType::Movie,
            b"mvex" => AtomType::MovieExtends,
            b"moof" => AtomType::MovieFragment,
            b"stsd" => AtomType::SampleDescription,
            b"stsz" => AtomType::SampleSize,
            b"stbl" => AtomType::SampleTable,
            b"stsc" => AtomType::SampleToChunk,
            b"stts" => AtomType::TimeToSample,
            b"trak" => AtomType::Track,
            _ => AtomType::Other(val),
        }
    }
}

/// A parsed atom header: the type plus the absolute position and length of the payload.
#[derive(Copy, Clone, Debug)]
pub struct AtomHeader {
    pub atom_type: AtomType,
    pub data_pos: u64,
    pub data_len: u64,
}

impl AtomHeader {
    /// Reads one atom header at the reader's current position. The reader is left at the start
    /// of the atom payload.
    pub fn read(reader: &mut SourceReader<'_>) -> Result<AtomHeader> {
        let start = reader.pos();

        let compact_size = u64::from(reader.read_be_u32()?);
        let atom_type = AtomType::from(reader.read_quad()?);

        let total_len = match compact_size {
            // A size of zero extends the atom to the end of the stream.
            0 => reader.len() - start,
            // A size of one escapes to a 64-bit size field.
            1 => {
                let large = reader.read_be_u64()?;
                if large < 16 {
                    return malformed_error("mp4: invalid extended atom size");
                }
                large
            }
            size if size < 8 => return malformed_error("mp4: invalid atom size"),
            size => size,
        };

        let header_len = reader.pos() - start;
        let data_len = total_len - header_len;

        if reader.pos() + data_len > reader.len() {
            return malformed_error("mp4: atom overruns stream");
        }

        Ok(AtomHeader { atom_type, data_pos: reader.pos(), data_len })
    }

    /// The position one past the end of this atom's payload.
    pub fn data_end(&self) -> u64 {
        self.data_pos + self.data_len
    }
}

/// Reads the version and flags fields of a full atom.
pub fn read_full_header(reader: &mut SourceReader<'_>) -> Result<(u8, u32)> {
    let bits = reader.read_be_u32()?;
    Ok(((bits >> 24) as u8, bits & 0x00ff_ffff))
}

/// Common interface for reading atom payloads.
pub trait Atom: Sized {
    fn read(reader: &mut SourceReader<'_>, header: AtomHeader) -> Result<Self>;
}

/// Walks the child atoms within a byte range, skipping whatever the caller does not consume.
pub struct AtomIterator {
    next_pos: u64,
    end: u64,
}

impl AtomIterator {
    /// Iterates the children of a parent atom.
    pub fn new(parent: AtomHeader) -> AtomIterator {
        AtomIterator { next_pos: parent.data_pos, end: parent.data_end() }
    }

    /// Iterates the top-level atoms of a stream of `len` bytes.
    pub fn root(len: u64) -> AtomIterator {
        AtomIterator { next_pos: 0, end: len }
    }

    /// Iterates atoms within an explicit byte span.
    pub fn span(start: u64, end: u64) -> AtomIterator {
        AtomIterator { next_pos: start, end }
    }

    /// Advances to the next child atom, if any.
    pub fn next(&mut self, reader: &mut SourceReader<'_>) -> Result<Option<AtomHeader>> {
        if self.next_pos >= self.end {
            return Ok(None);
        }

        reader.seek_to(self.next_pos)?;

        let header = AtomHeader::read(reader)?;

        if header.data_end() > self.end {
            return malformed_error("mp4: child atom overruns parent");
        }

        self.next_pos = header.data_end();

        Ok(Some(header))
    }
}
