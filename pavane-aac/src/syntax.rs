// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The typed view of a parsed access unit.
//!
//! Bit-level parsing of the AAC syntax (section data, Huffman codewords, and the raw element
//! walk) is the concern of an upstream parser implementing [`SyntaxDecoder`]. The synthesis
//! decoder consumes the flat structures defined here and never touches the bitstream itself.
//! All fields hold values exactly as transmitted: scale factor codes are the raw DPCM codes,
//! spectral rows are the raw signed codeword values, and TNS coefficients are raw unsigned bit
//! patterns.

use pavane_core::errors::Result;

use crate::asc::AscConfig;

pub use crate::common::{MAX_SFBS, MAX_WINDOWS};

// Spectral codebook (Huffman codebook, HCB) selector values.
pub const ZERO_HCB: u8 = 0;
pub const FIRST_PAIR_HCB: u8 = 5;
pub const ESC_HCB: u8 = 11;
pub const RESERVED_HCB: u8 = 12;
pub const NOISE_HCB: u8 = 13;
pub const INTENSITY_HCB2: u8 = 14;
pub const INTENSITY_HCB: u8 = 15;

pub const TNS_MAX_ORDER: usize = 20;

/// Window and grouping metadata for one individual channel stream.
#[derive(Clone, Debug)]
pub struct IcsInfo {
    /// Window sequence, 0..=3.
    pub window_sequence: u8,
    /// Window shape: `false` selects the sine window, `true` the Kaiser-Bessel derived window.
    pub window_shape: bool,
    /// The number of scale factor bands in use.
    pub max_sfb: usize,
    /// 1 for long window sequences, 8 for the eight-short sequence.
    pub num_windows: usize,
    /// The number of window groups, 1..=8.
    pub window_groups: usize,
    /// The number of windows in each group. Entries at or beyond `window_groups` are unused.
    pub group_len: [usize; MAX_WINDOWS],
}

impl IcsInfo {
    /// Whether this stream uses a single long window.
    pub fn long_windows(&self) -> bool {
        self.window_sequence != crate::common::EIGHT_SHORT_SEQUENCE
    }
}

/// One decoded-syntax individual channel stream.
#[derive(Clone, Debug)]
pub struct ChannelStream {
    pub global_gain: u8,
    pub info: IcsInfo,
    /// The spectral codebook selected for each (group, scale factor band).
    pub sfb_cb: [[u8; MAX_SFBS]; MAX_WINDOWS],
    /// Raw DPCM scale factor codes per (group, scale factor band). The interpretation follows
    /// the band's codebook: scale factor, intensity position, or noise energy. The first noise
    /// band carries the 9-bit PCM start value instead of a DPCM code.
    pub sf_codes: [[i16; MAX_SFBS]; MAX_WINDOWS],
    /// Spectral codeword rows in transmission order.
    pub spectral: Vec<SpectralRow>,
    pub pulse: Option<PulseData>,
    pub tns: Option<TnsData>,
}

/// One spectral Huffman codeword: four values for the quad codebooks, two for the pair
/// codebooks. Escape values arrive fully resolved.
#[derive(Clone, Copy, Debug)]
pub enum SpectralRow {
    Quad([i16; 4]),
    Pair([i16; 2]),
}

/// Pulse data attached to a long-window channel stream.
#[derive(Clone, Copy, Debug)]
pub struct PulseData {
    /// The number of pulses, 1..=4.
    pub count: usize,
    /// The scale factor band the first pulse offset is relative to.
    pub start_sfb: usize,
    pub offsets: [u8; 4],
    pub amps: [u8; 4],
}

/// Temporal noise shaping data for one channel stream.
#[derive(Clone, Debug)]
pub struct TnsData {
    /// Per-window filter sets; one entry per window.
    pub windows: Vec<TnsWindow>,
}

#[derive(Clone, Debug, Default)]
pub struct TnsWindow {
    /// Coefficient resolution flag: 3-bit coefficients when `false`, 4-bit when `true`.
    pub coef_res: bool,
    pub filters: Vec<TnsFilter>,
}

#[derive(Clone, Debug)]
pub struct TnsFilter {
    /// The filter region length in scale factor bands.
    pub length: usize,
    /// The filter order. Zero-order filters carry no coefficients.
    pub order: usize,
    /// `true` filters the region downwards in frequency.
    pub direction: bool,
    /// Whether the transmitted coefficients dropped their most significant bit.
    pub coef_compress: bool,
    /// Raw coefficient bit patterns, not yet sign-extended.
    pub coef: [u8; TNS_MAX_ORDER],
}

/// The stereo and channel layout of an access unit.
#[derive(Clone, Debug)]
pub enum Element {
    /// A single channel element (SCE).
    SingleChannel(Box<ChannelStream>),
    /// A channel pair element (CPE).
    ChannelPair(Box<ChannelPairStream>),
}

/// A channel pair element: two channel streams plus the joint-stereo signalling.
#[derive(Clone, Debug)]
pub struct ChannelPairStream {
    /// Whether both channels share the window and grouping metadata of `left`.
    pub common_window: bool,
    /// The mid/side mask: `true` marks a (group, scale factor band) as jointly coded. All
    /// entries are `false` when no mask was transmitted.
    pub ms_used: [[bool; MAX_SFBS]; MAX_WINDOWS],
    pub left: ChannelStream,
    pub right: ChannelStream,
}

/// One parsed access unit: exactly one channel element.
#[derive(Clone, Debug)]
pub struct AccessUnit {
    pub element: Element,
}

/// The upstream bit-level syntax parser.
///
/// Implementations parse one access unit payload into the typed view. The synthesis decoder
/// validates the structural invariants it depends on, so implementations are free to be lenient.
pub trait SyntaxDecoder {
    fn decode(&mut self, payload: &[u8], config: &AscConfig) -> Result<AccessUnit>;
}
