// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The random-access map between compressed access units and PCM frame positions.

use pavane_core::errors::{malformed_error, Result};

use log::debug;

use crate::asc::AscConfig;
use crate::common::validate;

/// The container family an input was indexed as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    /// A raw Audio Data Transport Stream.
    Adts,
    /// A non-fragmented ISO Base Media File Format file.
    Mp4,
}

/// One access unit located in the input.
#[derive(Clone, Copy, Debug)]
pub struct AuRecord {
    /// Absolute byte offset of the access unit payload.
    pub offset: u64,
    /// Byte length of the access unit payload.
    pub size: u32,
    /// The raw PCM frame position this access unit starts at.
    pub pcm_start: u64,
    /// The number of PCM frames this access unit decodes to, per channel.
    pub pcm_frames: u32,
}

/// An indexed input: the stream configuration plus the ordered access unit map.
///
/// Immutable once constructed.
#[derive(Debug)]
pub struct ContainerSource {
    pub kind: ContainerKind,
    pub config: AscConfig,
    /// The raw AudioSpecificConfig bytes the configuration was decoded from.
    pub asc: Vec<u8>,
    /// Access units in ascending byte order.
    pub units: Vec<AuRecord>,
    /// PCM frames to discard from the head of the stream.
    pub leading: u64,
    /// Total decoded PCM frames, including trimmed ones.
    pub total_raw: u64,
    /// PCM frames visible to the caller: `total_raw - leading`.
    pub total_visible: u64,
}

impl ContainerSource {
    /// Builds the index from located access units, assigning cumulative PCM positions and
    /// checking the structural invariants.
    pub(crate) fn new(
        kind: ContainerKind,
        config: AscConfig,
        asc: Vec<u8>,
        mut units: Vec<AuRecord>,
        leading: u64,
    ) -> Result<ContainerSource> {
        validate!(!units.is_empty());

        let mut pcm_start = 0u64;
        let mut prev_end = 0u64;

        for unit in units.iter_mut() {
            // Byte ranges must be ascending and non-overlapping.
            if unit.offset < prev_end {
                return malformed_error("aac: access units out of order");
            }
            prev_end = unit.offset + u64::from(unit.size);

            unit.pcm_start = pcm_start;
            pcm_start += u64::from(unit.pcm_frames);
        }

        let total_raw = pcm_start;

        if leading >= total_raw {
            return malformed_error("aac: stream trimmed to nothing");
        }

        let total_visible = total_raw - leading;

        debug!(
            "indexed {} access units, {} raw frames, {} visible frames, {} trimmed",
            units.len(),
            total_raw,
            total_visible,
            leading
        );

        Ok(ContainerSource { kind, config, asc, units, leading, total_raw, total_visible })
    }

    /// Finds the index of the access unit whose PCM frame range contains the raw frame position
    /// `raw_frame`.
    pub fn unit_containing(&self, raw_frame: u64) -> Option<usize> {
        if raw_frame >= self.total_raw {
            return None;
        }

        // Index of the first unit starting beyond the target; the unit before it contains it.
        let idx = self.units.partition_point(|unit| unit.pcm_start <= raw_frame);
        Some(idx - 1)
    }
}
