// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The AAC-LC synthesis decoder: turns typed access units into PCM frames.

use pavane_core::errors::{unsupported_error, Result};

use crate::asc::AscConfig;
use crate::common::{Lcg, SubbandInfo, FRAME_LEN};
use crate::syntax::{AccessUnit, ChannelPairStream, ChannelStream, Element};

mod dsp;
mod ics;
mod stereo;
mod tns;
mod window;

/// Overlap state carried between consecutive access units of one channel.
struct ChannelState {
    overlap: [f64; FRAME_LEN],
    prev_window_shape: bool,
}

impl ChannelState {
    fn new() -> ChannelState {
        ChannelState { overlap: [0.0; FRAME_LEN], prev_window_shape: false }
    }

    fn reset(&mut self) {
        self.overlap = [0.0; FRAME_LEN];
        self.prev_window_shape = false;
    }
}

/// Decodes access units of one AAC-LC stream into 1024 floating-point PCM frames per channel.
///
/// The decoder owns all cross-frame state: per-channel overlap buffers, previous window shapes,
/// and the noise substitution generator. Resetting restores the exact post-construction state,
/// which seeking relies on to reproduce bit-identical PCM.
pub struct Decoder {
    config: AscConfig,
    sbinfo: SubbandInfo,
    lcg: Lcg,
    dsp: dsp::Dsp,
    state: Vec<ChannelState>,
    scratch: Vec<ics::IcsDecode>,
    pcm: Vec<[f64; FRAME_LEN]>,
}

impl Decoder {
    pub fn try_new(config: &AscConfig) -> Result<Decoder> {
        let sbinfo = match SubbandInfo::for_rate_index(usize::from(config.sample_rate_index)) {
            Some(sbinfo) => sbinfo,
            None => return unsupported_error("aac: sampling frequency"),
        };

        let channels = config.channels();

        if channels == 0 || channels > 2 {
            return unsupported_error("aac: channel configuration");
        }

        Ok(Decoder {
            config: *config,
            sbinfo,
            lcg: Lcg::new(1),
            dsp: dsp::Dsp::new(),
            state: (0..channels).map(|_| ChannelState::new()).collect(),
            scratch: (0..channels).map(|_| ics::IcsDecode::new()).collect(),
            pcm: vec![[0.0; FRAME_LEN]; channels],
        })
    }

    /// The number of channels this decoder produces.
    pub fn channels(&self) -> usize {
        self.state.len()
    }

    /// Returns the decoder to its initial state: zeroed overlap, sine previous window shapes,
    /// and a reseeded noise generator.
    pub fn reset(&mut self) {
        for state in self.state.iter_mut() {
            state.reset();
        }
        self.lcg = Lcg::new(1);
    }

    /// Decodes one access unit. On success the PCM for each channel is available through
    /// [`Decoder::channel_pcm`].
    pub fn decode(&mut self, au: &AccessUnit) -> Result<()> {
        match &au.element {
            Element::SingleChannel(stream) if self.channels() == 1 => {
                self.decode_sce(stream)
            }
            Element::ChannelPair(pair) if self.channels() == 2 => self.decode_cpe(pair),
            _ => unsupported_error("aac: channel element does not match stream layout"),
        }
    }

    /// The last decoded PCM for channel `ch`: exactly 1024 samples at full 16-bit scale.
    pub fn channel_pcm(&self, ch: usize) -> &[f64] {
        &self.pcm[ch]
    }

    fn decode_sce(&mut self, stream: &ChannelStream) -> Result<()> {
        let chan = &mut self.scratch[0];

        chan.decode(stream, &self.sbinfo)?;

        stereo::substitute_noise(chan, &self.sbinfo, &mut self.lcg);

        if let Some(tns) = &stream.tns {
            tns::apply(tns, chan, &self.sbinfo, usize::from(self.config.sample_rate_index))?;
        }

        let prev_window_shape = self.state[0].prev_window_shape;

        self.dsp.synth(
            &chan.coeffs,
            &mut self.state[0].overlap,
            chan.info.window_sequence,
            chan.info.window_shape,
            prev_window_shape,
            &mut self.pcm[0],
        );
        self.state[0].prev_window_shape = chan.info.window_shape;

        Ok(())
    }

    fn decode_cpe(&mut self, pair: &ChannelPairStream) -> Result<()> {
        let (left, right) = self.scratch.split_at_mut(1);
        let left = &mut left[0];
        let right = &mut right[0];

        left.decode(&pair.left, &self.sbinfo)?;
        right.decode(&pair.right, &self.sbinfo)?;

        // Stereo tools, in order: noise substitution, mid/side, intensity.
        stereo::substitute_noise_pair(
            left,
            right,
            &pair.ms_used,
            pair.common_window,
            &self.sbinfo,
            &mut self.lcg,
        );

        if pair.common_window {
            stereo::apply_mid_side(left, right, &pair.ms_used, &self.sbinfo);
            stereo::apply_intensity(left, right, &pair.ms_used, &self.sbinfo);
        }

        let rate_index = usize::from(self.config.sample_rate_index);

        if let Some(tns) = &pair.left.tns {
            tns::apply(tns, left, &self.sbinfo, rate_index)?;
        }
        if let Some(tns) = &pair.right.tns {
            tns::apply(tns, right, &self.sbinfo, rate_index)?;
        }

        for (ch, chan) in [&*left, &*right].into_iter().enumerate() {
            let prev_window_shape = self.state[ch].prev_window_shape;

            self.dsp.synth(
                &chan.coeffs,
                &mut self.state[ch].overlap,
                chan.info.window_sequence,
                chan.info.window_shape,
                prev_window_shape,
                &mut self.pcm[ch],
            );
            self.state[ch].prev_window_shape = chan.info.window_shape;
        }

        Ok(())
    }
}
