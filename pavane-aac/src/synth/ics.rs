// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-channel spectral reconstruction: scale factor prediction, spectral row placement,
//! pulses, inverse quantization, and window reordering.

use pavane_core::errors::{malformed_error, Result};

use lazy_static::lazy_static;

use crate::common::*;
use crate::syntax::*;

lazy_static! {
    /// Pre-computed table of y = x^(4/3).
    static ref POW43_TABLE: [f64; 8192] = {
        let mut pow43 = [0f64; 8192];
        for (i, pow43) in pow43.iter_mut().enumerate() {
            *pow43 = f64::powf(i as f64, 4.0 / 3.0);
        }
        pow43
    };
}

const INTENSITY_SCALE_MIN: i16 = -155;
const NOISE_SCALE_MIN: i16 = -100;

/// The largest quantized coefficient magnitude: the spectral escape sequence codes 13 bits.
const MAX_QUANT: i16 = 8191;

/// One channel's reconstructed spectrum and the metadata the later synthesis stages need.
pub struct IcsDecode {
    pub info: IcsInfo,
    pub sfb_cb: [[u8; MAX_SFBS]; MAX_WINDOWS],
    /// Decoded scale factor predictor outputs. The meaning per band follows `sfb_cb`: scale
    /// factor, intensity position, or noise energy.
    pub sf: [[i16; MAX_SFBS]; MAX_WINDOWS],
    /// Spectral coefficients on the window-major 1024-line grid.
    pub coeffs: [f64; 1024],
}

impl IcsDecode {
    pub fn new() -> IcsDecode {
        IcsDecode {
            info: IcsInfo {
                window_sequence: ONLY_LONG_SEQUENCE,
                window_shape: false,
                max_sfb: 0,
                num_windows: 1,
                window_groups: 1,
                group_len: [1, 0, 0, 0, 0, 0, 0, 0],
            },
            sfb_cb: [[0; MAX_SFBS]; MAX_WINDOWS],
            sf: [[0; MAX_SFBS]; MAX_WINDOWS],
            coeffs: [0.0; 1024],
        }
    }

    /// Rebuilds this record from one channel stream of an access unit.
    pub fn decode(&mut self, ics: &ChannelStream, sbinfo: &SubbandInfo) -> Result<()> {
        validate_info(&ics.info, sbinfo)?;

        self.info = ics.info.clone();
        self.sfb_cb = ics.sfb_cb;

        decode_scale_factors(ics, &mut self.sf)?;

        let mut quant = [0i32; 1024];
        place_spectral_rows(ics, sbinfo, &mut quant)?;

        if let Some(pulse) = &ics.pulse {
            validate!(ics.info.long_windows());
            place_pulses(pulse, sbinfo.long_bands, &mut quant);
        }

        let mut grouped = [0f64; 1024];
        dequantize(ics, sbinfo, &self.sf, &quant, &mut grouped);

        reorder(&ics.info, sbinfo, &grouped, &mut self.coeffs);

        Ok(())
    }

    #[inline(always)]
    pub fn is_noise(&self, g: usize, sfb: usize) -> bool {
        self.sfb_cb[g][sfb] == NOISE_HCB
    }

    #[inline(always)]
    pub fn is_intensity(&self, g: usize, sfb: usize) -> bool {
        self.sfb_cb[g][sfb] == INTENSITY_HCB || self.sfb_cb[g][sfb] == INTENSITY_HCB2
    }

    /// Whether the band carries ordinary quantized spectral data.
    #[inline(always)]
    pub fn is_normal(&self, g: usize, sfb: usize) -> bool {
        self.sfb_cb[g][sfb] != ZERO_HCB && !self.is_noise(g, sfb) && !self.is_intensity(g, sfb)
    }

    /// The spectral line range of one scale factor band within one window of a group, on the
    /// window-major grid. `window_base` is the first window of the group.
    #[inline(always)]
    pub fn line_range(
        &self,
        bands: &[usize],
        window_base: usize,
        w: usize,
        sfb: usize,
    ) -> std::ops::Range<usize> {
        let base = (window_base + w) * 128;
        base + bands[sfb]..base + bands[sfb + 1]
    }
}

fn validate_info(info: &IcsInfo, sbinfo: &SubbandInfo) -> Result<()> {
    validate!(info.window_sequence <= LONG_STOP_SEQUENCE);

    if info.window_sequence == EIGHT_SHORT_SEQUENCE {
        validate!(info.num_windows == MAX_WINDOWS);
        validate!(info.window_groups >= 1 && info.window_groups <= MAX_WINDOWS);

        let mut windows = 0;
        for &len in &info.group_len[..info.window_groups] {
            validate!(len >= 1);
            windows += len;
        }
        validate!(windows == MAX_WINDOWS);
    }
    else {
        validate!(info.num_windows == 1);
        validate!(info.window_groups == 1);
        validate!(info.group_len[0] == 1);
    }

    let bands = sbinfo.bands(info.long_windows());
    validate!(info.max_sfb < bands.len());

    Ok(())
}

/// Runs the three scale factor DPCM predictors over group-major, band-major order.
fn decode_scale_factors(
    ics: &ChannelStream,
    sf: &mut [[i16; MAX_SFBS]; MAX_WINDOWS],
) -> Result<()> {
    let mut noise_pcm_flag = true;
    let mut scf_intensity = 0i16;
    let mut scf_noise = i16::from(ics.global_gain) - 90;
    let mut scf_normal = i16::from(ics.global_gain);

    for g in 0..ics.info.window_groups {
        for sfb in 0..ics.info.max_sfb {
            let cb = ics.sfb_cb[g][sfb];
            let code = ics.sf_codes[g][sfb];

            sf[g][sfb] = match cb {
                ZERO_HCB => 0,
                INTENSITY_HCB | INTENSITY_HCB2 => {
                    scf_intensity += code - 60;

                    validate!(
                        scf_intensity >= INTENSITY_SCALE_MIN
                            && scf_intensity < INTENSITY_SCALE_MIN + 256
                    );

                    scf_intensity
                }
                NOISE_HCB => {
                    if noise_pcm_flag {
                        noise_pcm_flag = false;
                        scf_noise += code - 256;
                    }
                    else {
                        scf_noise += code - 60;
                    }

                    validate!(scf_noise >= NOISE_SCALE_MIN && scf_noise < NOISE_SCALE_MIN + 256);

                    scf_noise
                }
                RESERVED_HCB => return malformed_error("aac: reserved spectral codebook"),
                _ => {
                    scf_normal += code - 60;

                    validate!(scf_normal >= 0 && scf_normal < 256);

                    scf_normal
                }
            };
        }
    }

    Ok(())
}

/// Places the spectral codeword rows onto the grouped coefficient grid.
fn place_spectral_rows(
    ics: &ChannelStream,
    sbinfo: &SubbandInfo,
    quant: &mut [i32; 1024],
) -> Result<()> {
    let bands = sbinfo.bands(ics.info.long_windows());

    let mut rows = ics.spectral.iter();
    let mut window_base = 0;

    for g in 0..ics.info.window_groups {
        let group_base = window_base * 128;
        let group_len = ics.info.group_len[g];

        for sfb in 0..ics.info.max_sfb {
            let cb = ics.sfb_cb[g][sfb];

            match cb {
                ZERO_HCB | NOISE_HCB | INTENSITY_HCB | INTENSITY_HCB2 => continue,
                RESERVED_HCB => return malformed_error("aac: reserved spectral codebook"),
                _ => (),
            }

            // Band bounds in the grouped layout: every window of the group stores the band
            // back to back.
            let start = bands[sfb] * group_len;
            let end = bands[sfb + 1] * group_len;

            if group_base + end > 1024 {
                return malformed_error("aac: spectral data overflows frame");
            }

            let step = if cb < FIRST_PAIR_HCB { 4 } else { 2 };
            validate!((end - start) % step == 0);

            let mut k = start;
            while k < end {
                let row = match rows.next() {
                    Some(row) => row,
                    None => return malformed_error("aac: spectral rows exhausted"),
                };

                let values: &[i16] = match (row, step) {
                    (SpectralRow::Quad(values), 4) => values,
                    (SpectralRow::Pair(values), 2) => values,
                    _ => return malformed_error("aac: spectral row arity mismatch"),
                };

                for (j, &value) in values.iter().enumerate() {
                    validate!(value.unsigned_abs() <= MAX_QUANT as u16);
                    quant[group_base + k + j] = i32::from(value);
                }

                k += step;
            }
        }

        window_base += group_len;
    }

    if rows.next().is_some() {
        return malformed_error("aac: excess spectral rows");
    }

    Ok(())
}

/// Adds pulse amplitudes to quantized coefficients, preserving each coefficient's sign. Only
/// legal for long window sequences.
fn place_pulses(pulse: &PulseData, bands: &[usize], quant: &mut [i32; 1024]) {
    if pulse.start_sfb >= bands.len() - 1 {
        return;
    }

    let mut k = bands[pulse.start_sfb];

    for p in 0..pulse.count.min(4) {
        k += usize::from(pulse.offsets[p]);

        if k >= 1024 {
            return;
        }

        let amp = i32::from(pulse.amps[p]);

        // The sign of zero is treated as positive.
        if quant[k] >= 0 {
            quant[k] += amp;
        }
        else {
            quant[k] -= amp;
        }
    }
}

/// Expands quantized values through x^(4/3) and applies each band's scale factor gain.
fn dequantize(
    ics: &ChannelStream,
    sbinfo: &SubbandInfo,
    sf: &[[i16; MAX_SFBS]; MAX_WINDOWS],
    quant: &[i32; 1024],
    out: &mut [f64; 1024],
) {
    let bands = sbinfo.bands(ics.info.long_windows());

    let mut window_base = 0;

    for g in 0..ics.info.window_groups {
        let group_base = window_base * 128;
        let group_len = ics.info.group_len[g];

        for sfb in 0..ics.info.max_sfb {
            let cb = ics.sfb_cb[g][sfb];

            if cb == ZERO_HCB
                || cb == NOISE_HCB
                || cb == INTENSITY_HCB
                || cb == INTENSITY_HCB2
            {
                continue;
            }

            let gain = 2.0f64.powf(0.25 * f64::from(sf[g][sfb] - 100));

            let start = group_base + bands[sfb] * group_len;
            let end = group_base + bands[sfb + 1] * group_len;

            for i in start..end {
                out[i] = iquant(quant[i]) * gain;
            }
        }

        window_base += group_len;
    }
}

#[inline(always)]
fn iquant(q: i32) -> f64 {
    let abs = q.unsigned_abs() as usize;

    // Pulses may push a coefficient just past the table.
    let mag = if abs < POW43_TABLE.len() {
        POW43_TABLE[abs]
    }
    else {
        (abs as f64).powf(4.0 / 3.0)
    };

    if q < 0 {
        -mag
    }
    else {
        mag
    }
}

/// Converts the grouped spectral layout into the window-major layout where window `w` occupies
/// lines `[w * 128, (w + 1) * 128)`. Long sequences are already window-major.
fn reorder(info: &IcsInfo, sbinfo: &SubbandInfo, grouped: &[f64; 1024], out: &mut [f64; 1024]) {
    if info.long_windows() {
        out.copy_from_slice(grouped);
        return;
    }

    out.fill(0.0);

    let bands = sbinfo.bands(false);
    let mut window_base = 0;

    for g in 0..info.window_groups {
        let group_len = info.group_len[g];
        let mut cursor = window_base * 128;

        for sfb in 0..info.max_sfb {
            let width = bands[sfb + 1] - bands[sfb];

            for w in 0..group_len {
                let dst = (window_base + w) * 128 + bands[sfb];
                out[dst..dst + width].copy_from_slice(&grouped[cursor..cursor + width]);
                cursor += width;
            }
        }

        window_base += group_len;
    }
}
