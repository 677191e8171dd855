// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! AudioSpecificConfig (ASC) decoding.
//!
//! The ASC is the compact binary descriptor of object type, sampling frequency, and channel
//! configuration carried in the MP4 `esds` box, or synthesized from an ADTS header. Only the
//! AAC-LC subset this decoder implements is accepted; everything else is reported as unsupported.

use pavane_core::errors::{unsupported_error, Result};
use pavane_core::io::BitReaderLtr;

use log::trace;

use crate::common::{validate, AAC_SAMPLE_RATES};

const AOT_AAC_LC: u8 = 2;
const AOT_SBR: u8 = 5;
const AOT_PS: u8 = 29;

/// Decoded AudioSpecificConfig.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AscConfig {
    /// Audio object type. Always 2 (AAC-LC).
    pub object_type: u8,
    /// Sampling frequency index in 0..=11.
    pub sample_rate_index: u8,
    /// Channel configuration. 1 or 2.
    pub channel_config: u8,
    /// The sampling frequency addressed by `sample_rate_index`.
    pub sample_rate: u32,
}

impl AscConfig {
    /// Decodes an AudioSpecificConfig from the given bytes.
    pub fn parse(buf: &[u8]) -> Result<AscConfig> {
        validate!(buf.len() >= 2);

        let mut bs = BitReaderLtr::new(buf);

        let object_type = read_object_type(&mut bs)?;

        if object_type != AOT_AAC_LC {
            return unsupported_error("asc: only aac-lc is supported");
        }

        let sample_rate_index = bs.read_bits_leq32(4)? as u8;

        if sample_rate_index == 15 {
            return unsupported_error("asc: explicit sample rate");
        }

        let sample_rate = AAC_SAMPLE_RATES[usize::from(sample_rate_index)];

        if sample_rate_index > 11 || sample_rate == 0 {
            return unsupported_error("asc: sample rate");
        }

        let channel_config = bs.read_bits_leq32(4)? as u8;

        // GASpecificConfig.
        let short_frame = bs.read_bool()?;

        if short_frame {
            return unsupported_error("asc: 960-sample frames");
        }

        if bs.read_bool()? {
            return unsupported_error("asc: core coder dependency");
        }

        if bs.read_bool()? {
            return unsupported_error("asc: ga extension");
        }

        if channel_config == 0 {
            return unsupported_error("asc: program config element");
        }

        if channel_config > 2 {
            return unsupported_error("asc: more than two channels");
        }

        // An extension descriptor may trail the GASpecificConfig, announcing SBR or PS data
        // inside otherwise plain AAC-LC frames.
        if bs.bits_left() >= 16 {
            let sync = bs.read_bits_leq32(11)?;

            if sync == 0x2b7 {
                let ext_object_type = read_object_type(&mut bs)?;

                if (ext_object_type == AOT_SBR || ext_object_type == AOT_PS)
                    && bs.bits_left() >= 1
                    && bs.read_bool()?
                {
                    return unsupported_error("asc: sbr/ps extension");
                }
            }
        }

        let config = AscConfig { object_type, sample_rate_index, channel_config, sample_rate };

        trace!(
            "asc: aot={}, {} Hz, {} channel(s)",
            config.object_type,
            config.sample_rate,
            config.channel_config
        );

        Ok(config)
    }

    /// The number of channels in the stream.
    pub fn channels(&self) -> usize {
        usize::from(self.channel_config)
    }
}

fn read_object_type(bs: &mut BitReaderLtr<'_>) -> Result<u8> {
    let object_type = match bs.read_bits_leq32(5)? {
        31 => (bs.read_bits_leq32(6)? + 32) as u8,
        aot => aot as u8,
    };
    Ok(object_type)
}
