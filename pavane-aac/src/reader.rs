// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The seekable PCM reader façade.
//!
//! `PcmReader` presents the decoded stream as a byte-addressable signed 16-bit little-endian
//! interleaved PCM stream of a fixed length, implementing [`std::io::Read`] and
//! [`std::io::Seek`]. Positions always refer to visible PCM bytes: the edit-list trim at the
//! head of the stream is never observable.

use std::io;

use pavane_core::errors::Result;
use pavane_core::io::ByteSource;

use log::debug;

use crate::source::{ContainerKind, ContainerSource};
use crate::syntax::SyntaxDecoder;
use crate::synth::Decoder;

/// Stream parameters of an open reader.
#[derive(Clone, Copy, Debug)]
pub struct Info {
    pub sample_rate: u32,
    pub channels: usize,
    /// The total number of visible PCM bytes.
    pub pcm_byte_len: u64,
    pub container: ContainerKind,
}

/// A seekable PCM16 view of one AAC-LC stream.
pub struct PcmReader {
    src: Box<dyn ByteSource>,
    container: ContainerSource,
    syntax: Box<dyn SyntaxDecoder>,
    decoder: Decoder,
    /// Scratch buffer for one access unit payload.
    payload: Vec<u8>,
    /// Decoded PCM bytes not yet handed to the caller.
    carry: Vec<u8>,
    carry_pos: usize,
    /// PCM bytes still to swallow before output becomes visible.
    discard: u64,
    next_unit: usize,
    pos: u64,
    len: u64,
    closed: bool,
}

impl PcmReader {
    pub(crate) fn new(
        src: Box<dyn ByteSource>,
        container: ContainerSource,
        syntax: Box<dyn SyntaxDecoder>,
    ) -> Result<PcmReader> {
        let decoder = Decoder::try_new(&container.config)?;

        let frame_bytes = (container.config.channels() * 2) as u64;
        let len = container.total_visible * frame_bytes;

        Ok(PcmReader {
            src,
            syntax,
            decoder,
            payload: Vec::new(),
            carry: Vec::new(),
            carry_pos: 0,
            discard: container.leading * frame_bytes,
            next_unit: 0,
            pos: 0,
            len,
            container,
            closed: false,
        })
    }

    /// Stream parameters.
    pub fn info(&self) -> Info {
        Info {
            sample_rate: self.container.config.sample_rate,
            channels: self.container.config.channels(),
            pcm_byte_len: self.len,
            container: self.container.kind,
        }
    }

    /// The indexed container backing this reader.
    pub fn container(&self) -> &ContainerSource {
        &self.container
    }

    /// Releases decode state. Subsequent reads report end-of-stream; calling again is a no-op.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.payload = Vec::new();
        self.carry = Vec::new();
        self.carry_pos = 0;
    }

    /// The size of one interleaved PCM frame in bytes.
    fn frame_bytes(&self) -> u64 {
        (self.container.config.channels() * 2) as u64
    }

    /// Decodes the next access unit into the carry buffer, honoring the discard counter.
    fn decode_next_unit(&mut self) -> Result<()> {
        let unit = self.container.units[self.next_unit];

        self.payload.resize(unit.size as usize, 0);
        self.src.read_exact_at(unit.offset, &mut self.payload)?;

        let au = self.syntax.decode(&self.payload, &self.container.config)?;
        self.decoder.decode(&au)?;

        let channels = self.decoder.channels();

        self.carry.clear();
        self.carry_pos = 0;

        // The container may truncate the final access unit below the nominal frame count.
        for i in 0..unit.pcm_frames as usize {
            for ch in 0..channels {
                let sample = self.decoder.channel_pcm(ch)[i];
                let quantized = sample.clamp(-32768.0, 32767.0).round() as i16;
                self.carry.extend_from_slice(&quantized.to_le_bytes());
            }
        }

        if self.discard > 0 {
            let skip = self.discard.min(self.carry.len() as u64) as usize;
            self.carry_pos = skip;
            self.discard -= skip as u64;
        }

        self.next_unit += 1;

        Ok(())
    }

    fn read_inner(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.closed || buf.is_empty() {
            return Ok(0);
        }

        loop {
            let visible_left = self.len - self.pos;
            let carried = (self.carry.len() - self.carry_pos) as u64;
            let available = carried.min(visible_left);

            if available > 0 {
                let count = (buf.len() as u64).min(available) as usize;

                buf[..count]
                    .copy_from_slice(&self.carry[self.carry_pos..self.carry_pos + count]);

                self.carry_pos += count;
                self.pos += count as u64;

                return Ok(count);
            }

            if self.pos >= self.len || self.next_unit >= self.container.units.len() {
                return Ok(0);
            }

            self.decode_next_unit()?;
        }
    }

    fn seek_inner(&mut self, target: u64) -> Result<u64> {
        // Snap down to a whole interleaved frame.
        let frame_bytes = self.frame_bytes();
        let target = target.min(self.len);
        let target = target - target % frame_bytes;

        let target_frame = target / frame_bytes;
        let raw_target = target_frame + self.container.leading;

        self.decoder.reset();
        self.carry.clear();
        self.carry_pos = 0;

        match self.container.unit_containing(raw_target) {
            Some(unit_idx) => {
                let unit = self.container.units[unit_idx];
                let offset_in_unit = raw_target - unit.pcm_start;

                // Restart one access unit early so the overlap tail feeding the target unit is
                // rebuilt; only a fresh stream start decodes from its own unit.
                let start = unit_idx.saturating_sub(1);

                let mut discard_frames = offset_in_unit;
                if unit_idx > 0 {
                    discard_frames += u64::from(self.container.units[start].pcm_frames);
                }

                debug!(
                    "seek to byte {} (unit {}, rewound to {}, discarding {} frames)",
                    target, unit_idx, start, discard_frames
                );

                self.next_unit = start;
                self.discard = discard_frames * frame_bytes;
            }
            None => {
                // Seek to the end of the stream.
                self.next_unit = self.container.units.len();
                self.discard = 0;
            }
        }

        self.pos = target;

        Ok(target)
    }
}

impl io::Read for PcmReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_inner(buf).map_err(io::Error::from)
    }
}

impl io::Seek for PcmReader {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        if self.closed {
            return Ok(self.pos);
        }

        let target = match pos {
            io::SeekFrom::Start(offset) => i128::from(offset),
            io::SeekFrom::Current(delta) => i128::from(self.pos) + i128::from(delta),
            io::SeekFrom::End(delta) => i128::from(self.len) + i128::from(delta),
        };

        // Clamp to the stream bounds.
        let target = target.clamp(0, i128::from(self.len)) as u64;

        self.seek_inner(target).map_err(io::Error::from)
    }
}
