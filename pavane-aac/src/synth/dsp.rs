// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The inverse filterbank: IMDCT, window sequences, and overlap-add.

use pavane_core::dsp::imdct::Imdct;

use crate::common::*;

use super::window::{kbd_window, sine_window};

const LONG_N: usize = 2048;
const SHORT_N: usize = 256;

/// The start of the eight-short window region inside a 2048-sample block.
const SHORT_REGION: usize = 448;

pub struct Dsp {
    sine_long: [f64; 1024],
    sine_short: [f64; 128],
    kbd_long: [f64; 1024],
    kbd_short: [f64; 128],
    imdct_long: Imdct,
    imdct_short: Imdct,
    block: [f64; LONG_N],
    sblock: [f64; SHORT_N],
}

impl Dsp {
    pub fn new() -> Dsp {
        let mut sine_long = [0f64; 1024];
        let mut sine_short = [0f64; 128];
        sine_window(&mut sine_long);
        sine_window(&mut sine_short);

        let mut kbd_long = [0f64; 1024];
        let mut kbd_short = [0f64; 128];
        kbd_window(4.0, &mut kbd_long);
        kbd_window(6.0, &mut kbd_short);

        Dsp {
            sine_long,
            sine_short,
            kbd_long,
            kbd_short,
            imdct_long: Imdct::new_scaled(1024, 2.0 / LONG_N as f64),
            imdct_short: Imdct::new_scaled(128, 2.0 / SHORT_N as f64),
            block: [0.0; LONG_N],
            sblock: [0.0; SHORT_N],
        }
    }

    /// Runs the inverse filterbank for one channel: transforms `coeffs`, applies the window
    /// sequence `seq` using the current and previous window shapes, and overlap-adds against
    /// `overlap` to produce 1024 PCM samples in `dst`. On return `overlap` holds the tail of the
    /// windowed block.
    pub fn synth(
        &mut self,
        coeffs: &[f64; 1024],
        overlap: &mut [f64; 1024],
        seq: u8,
        window_shape: bool,
        prev_window_shape: bool,
        dst: &mut [f64],
    ) {
        let (curr_long, curr_short) = match window_shape {
            true => (&self.kbd_long, &self.kbd_short),
            false => (&self.sine_long, &self.sine_short),
        };

        let (prev_long, prev_short) = match prev_window_shape {
            true => (&self.kbd_long, &self.kbd_short),
            false => (&self.sine_long, &self.sine_short),
        };

        let block = &mut self.block;

        match seq {
            EIGHT_SHORT_SEQUENCE => {
                block.fill(0.0);

                for w in 0..8 {
                    self.imdct_short.imdct(&coeffs[w * 128..(w + 1) * 128], &mut self.sblock);

                    let left = if w == 0 { prev_short } else { curr_short };

                    for i in 0..128 {
                        self.sblock[i] *= left[i];
                        self.sblock[SHORT_N - 1 - i] *= curr_short[i];
                    }

                    let base = SHORT_REGION + w * 128;
                    for (b, &s) in block[base..base + SHORT_N].iter_mut().zip(self.sblock.iter())
                    {
                        *b += s;
                    }
                }
            }
            ONLY_LONG_SEQUENCE => {
                self.imdct_long.imdct(coeffs, block);

                for i in 0..1024 {
                    block[i] *= prev_long[i];
                    block[LONG_N - 1 - i] *= curr_long[i];
                }
            }
            LONG_START_SEQUENCE => {
                self.imdct_long.imdct(coeffs, block);

                for i in 0..1024 {
                    block[i] *= prev_long[i];
                }
                for i in 0..128 {
                    block[1024 + SHORT_REGION + i] *= curr_short[127 - i];
                }
                block[1024 + SHORT_REGION + 128..].fill(0.0);
            }
            LONG_STOP_SEQUENCE => {
                self.imdct_long.imdct(coeffs, block);

                block[..SHORT_REGION].fill(0.0);
                for i in 0..128 {
                    block[SHORT_REGION + i] *= prev_short[i];
                }
                for i in 0..1024 {
                    block[1024 + i] *= curr_long[1023 - i];
                }
            }
            _ => unreachable!(),
        }

        // Overlap-add with the previous block's tail, then save this block's tail.
        for i in 0..1024 {
            dst[i] = overlap[i] + block[i];
            overlap[i] = block[1024 + i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts;

    /// The analytical IMDCT of a unit impulse at spectral bin `k`: a pure windowless cosine.
    fn impulse_block(k: usize, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let arg =
                    consts::PI / (n as f64) * (i as f64 + 0.5 + (n / 4) as f64) * (2 * k + 1) as f64;
                (2.0 / n as f64) * arg.cos()
            })
            .collect()
    }

    #[test]
    fn verify_impulse_synthesis() {
        // Decode a unit impulse followed by an empty block, both only-long with sine windows.
        // The concatenated 2048 samples are exactly the windowed transform of the impulse.
        let mut dsp = Dsp::new();

        let mut coeffs = [0f64; 1024];
        coeffs[3] = 1.0;

        let mut overlap = [0f64; 1024];
        let mut first = [0f64; 1024];
        dsp.synth(&coeffs, &mut overlap, ONLY_LONG_SEQUENCE, false, false, &mut first);

        let zero = [0f64; 1024];
        let mut second = [0f64; 1024];
        dsp.synth(&zero, &mut overlap, ONLY_LONG_SEQUENCE, false, false, &mut second);

        let raw = impulse_block(3, 2048);
        let mut win = [0f64; 1024];
        sine_window(&mut win);

        for i in 0..1024 {
            assert!((first[i] - raw[i] * win[i]).abs() < 1e-12);
            assert!((second[i] - raw[1024 + i] * win[1023 - i]).abs() < 1e-12);
        }

        // Princen-Bradley windowing together with the transform's in-half symmetries splits the
        // raw block energy evenly across the two lapped frames.
        let energy: f64 = first.iter().chain(second.iter()).map(|x| x * x).sum();
        let raw_energy: f64 = raw.iter().map(|x| x * x).sum();
        assert!((energy - 0.5 * raw_energy).abs() < 1e-9);
    }

    #[test]
    fn verify_long_start_tail_is_zero() {
        let mut dsp = Dsp::new();

        let mut coeffs = [0f64; 1024];
        for (i, c) in coeffs.iter_mut().enumerate() {
            *c = ((i * 7 + 1) % 13) as f64 - 6.0;
        }

        let mut overlap = [0f64; 1024];
        let mut dst = [0f64; 1024];
        dsp.synth(&coeffs, &mut overlap, LONG_START_SEQUENCE, false, false, &mut dst);

        // The saved tail ends with the zeroed flat region of the start window.
        for &x in overlap[SHORT_REGION + 128..].iter() {
            assert_eq!(x, 0.0);
        }
        // The leading flat region of the tail passes the block through unwindowed.
        assert!(overlap[..SHORT_REGION].iter().any(|&x| x != 0.0));
    }

    #[test]
    fn verify_eight_short_region_bounds() {
        let mut dsp = Dsp::new();

        let mut coeffs = [0f64; 1024];
        for (i, c) in coeffs.iter_mut().enumerate() {
            *c = (i % 5) as f64 - 2.0;
        }

        let mut overlap = [0f64; 1024];
        let mut dst = [0f64; 1024];
        dsp.synth(&coeffs, &mut overlap, EIGHT_SHORT_SEQUENCE, false, false, &mut dst);

        // Output before the short window region is untouched overlap (zero here).
        for &x in dst[..SHORT_REGION].iter() {
            assert_eq!(x, 0.0);
        }
        // The tail beyond the last short window is silent.
        for &x in overlap[SHORT_REGION + 128..].iter() {
            assert_eq!(x, 0.0);
        }
    }

    #[test]
    fn verify_overlap_add_against_analytical() {
        // Two consecutive only-long blocks of the same tone: the first output is the windowed
        // left half, the second is the previous tail overlap-added with the next left half.
        let mut dsp = Dsp::new();

        let mut coeffs = [0f64; 1024];
        coeffs[5] = 100.0;

        let mut overlap = [0f64; 1024];
        let mut a = [0f64; 1024];
        let mut b = [0f64; 1024];
        dsp.synth(&coeffs, &mut overlap, ONLY_LONG_SEQUENCE, false, false, &mut a);
        dsp.synth(&coeffs, &mut overlap, ONLY_LONG_SEQUENCE, false, false, &mut b);

        let raw = impulse_block(5, 2048);
        let mut win = [0f64; 1024];
        sine_window(&mut win);

        for i in 0..1024 {
            let expect_a = 100.0 * raw[i] * win[i];
            let expect_b = 100.0 * (raw[1024 + i] * win[1023 - i] + raw[i] * win[i]);
            assert!((a[i] - expect_a).abs() < 1e-9);
            assert!((b[i] - expect_b).abs() < 1e-9);
        }
    }
}
