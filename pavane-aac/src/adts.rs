// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Audio Data Transport Stream (ADTS) indexing.
//!
//! An ADTS stream is a back-to-back sequence of self-describing frames, optionally preceded by an
//! ID3v2 tag. Every frame is visited up-front to build the access unit map, and every frame must
//! describe the same stream configuration as the first.

use pavane_core::errors::{malformed_error, unsupported_error, Result};
use pavane_core::io::ByteSource;

use log::debug;

use crate::asc::AscConfig;
use crate::common::FRAME_LEN;
use crate::source::{AuRecord, ContainerKind, ContainerSource};

/// The fixed portion of an ADTS frame header.
const HEADER_LEN: usize = 7;
/// Header length when the CRC words are present.
const HEADER_LEN_CRC: usize = 9;

struct AdtsHeader {
    profile: u8,
    sample_rate_index: u8,
    channel_config: u8,
    frame_len: usize,
    header_len: usize,
}

impl AdtsHeader {
    fn read(buf: &[u8; HEADER_LEN]) -> Result<AdtsHeader> {
        // Syncword, 12 set bits.
        if buf[0] != 0xff || (buf[1] >> 4) != 0xf {
            return malformed_error("adts: invalid syncword");
        }

        let protection_absent = buf[1] & 0x1 != 0;

        // Profile is coded minus one.
        let profile = (buf[2] >> 6) + 1;

        let sample_rate_index = (buf[2] >> 2) & 0xf;

        let channel_config = ((buf[2] & 0x1) << 2) | (buf[3] >> 6);

        // Frame length covers the header itself.
        let frame_len = (usize::from(buf[3] & 0x3) << 11)
            | (usize::from(buf[4]) << 3)
            | usize::from(buf[5] >> 5);

        let raw_data_blocks = (buf[6] & 0x3) + 1;

        if raw_data_blocks != 1 {
            return unsupported_error("adts: multiple raw data blocks per frame");
        }

        let header_len = if protection_absent { HEADER_LEN } else { HEADER_LEN_CRC };

        if frame_len < header_len {
            return malformed_error("adts: invalid frame length");
        }

        Ok(AdtsHeader { profile, sample_rate_index, channel_config, frame_len, header_len })
    }

    /// Derives the two AudioSpecificConfig bytes this header implies.
    fn derive_asc(&self) -> [u8; 2] {
        [
            (self.profile << 3) | (self.sample_rate_index >> 1),
            ((self.sample_rate_index & 0x1) << 7) | (self.channel_config << 3),
        ]
    }
}

/// Returns the number of bytes occupied by an ID3v2 tag at the start of the stream, or zero when
/// none is present.
fn id3v2_len(src: &dyn ByteSource, len: u64) -> Result<u64> {
    let mut header = [0u8; 10];

    if len < 10 {
        return Ok(0);
    }

    src.read_exact_at(0, &mut header)?;

    if &header[0..3] != b"ID3" {
        return Ok(0);
    }

    // The tag size is a 28-bit synchsafe integer, exclusive of the 10-byte header and the
    // optional 10-byte footer.
    let size = (u64::from(header[6] & 0x7f) << 21)
        | (u64::from(header[7] & 0x7f) << 14)
        | (u64::from(header[8] & 0x7f) << 7)
        | u64::from(header[9] & 0x7f);

    let footer = if header[5] & 0x10 != 0 { 10 } else { 0 };

    Ok((10 + size + footer).min(len))
}

/// Indexes a raw ADTS stream into a container source.
pub fn index(src: &dyn ByteSource, len: u64) -> Result<ContainerSource> {
    let mut offset = id3v2_len(src, len)?;

    if offset > 0 {
        debug!("adts: skipped {} bytes of id3v2 tag", offset);
    }

    let mut asc: Option<([u8; 2], AscConfig)> = None;
    let mut units = Vec::new();

    while offset < len {
        if len - offset < HEADER_LEN as u64 {
            return malformed_error("adts: truncated frame header");
        }

        let mut buf = [0u8; HEADER_LEN];
        src.read_exact_at(offset, &mut buf)?;

        let header = AdtsHeader::read(&buf)?;

        if offset + header.frame_len as u64 > len {
            return malformed_error("adts: truncated frame");
        }

        let frame_asc = header.derive_asc();

        match asc {
            None => {
                let config = AscConfig::parse(&frame_asc)?;
                asc = Some((frame_asc, config));
            }
            Some((first_asc, _)) => {
                if frame_asc != first_asc {
                    return malformed_error("adts: stream configuration changed mid-stream");
                }
            }
        }

        units.push(AuRecord {
            offset: offset + header.header_len as u64,
            size: (header.frame_len - header.header_len) as u32,
            pcm_start: 0,
            pcm_frames: FRAME_LEN as u32,
        });

        offset += header.frame_len as u64;
    }

    let (asc, config) = match asc {
        Some(asc) => asc,
        None => return malformed_error("adts: no frames"),
    };

    ContainerSource::new(ContainerKind::Adts, config, asc.to_vec(), units, 0)
}
