// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spectral-domain stereo tools: perceptual noise substitution, mid/side decoding, and
//! intensity stereo. For channel pairs the tools apply in that fixed order.

use crate::common::{Lcg, SubbandInfo, MAX_SFBS, MAX_WINDOWS};
use crate::syntax::{INTENSITY_HCB, INTENSITY_HCB2};

use super::ics::IcsDecode;

/// Substitutes noise bands of a lone channel with scaled pseudo-random noise.
pub fn substitute_noise(ics: &mut IcsDecode, sbinfo: &SubbandInfo, lcg: &mut Lcg) {
    let bands = sbinfo.bands(ics.info.long_windows());

    let mut window_base = 0;

    for g in 0..ics.info.window_groups {
        for sfb in 0..ics.info.max_sfb {
            if ics.is_noise(g, sfb) {
                for w in 0..ics.info.group_len[g] {
                    let range = ics.line_range(bands, window_base, w, sfb);
                    let energy = ics.sf[g][sfb];
                    fill_noise(lcg, energy, &mut ics.coeffs[range]);
                }
            }
        }
        window_base += ics.info.group_len[g];
    }
}

/// Substitutes noise bands of a channel pair.
///
/// When both channels mark a band as noise and the mid/side mask covers it, the right channel
/// reuses the noise drawn for the left channel, rescaled to its own energy, so the pair stays
/// correlated. All other noise bands draw independently.
pub fn substitute_noise_pair(
    left: &mut IcsDecode,
    right: &mut IcsDecode,
    ms_used: &[[bool; MAX_SFBS]; MAX_WINDOWS],
    common_window: bool,
    sbinfo: &SubbandInfo,
    lcg: &mut Lcg,
) {
    if !common_window {
        substitute_noise(left, sbinfo, lcg);
        substitute_noise(right, sbinfo, lcg);
        return;
    }

    let bands = sbinfo.bands(left.info.long_windows());

    let mut window_base = 0;

    for g in 0..left.info.window_groups {
        for sfb in 0..left.info.max_sfb {
            let left_noise = left.is_noise(g, sfb);
            let right_noise = right.is_noise(g, sfb);

            if !left_noise && !right_noise {
                continue;
            }

            for w in 0..left.info.group_len[g] {
                let range = left.line_range(bands, window_base, w, sfb);

                if left_noise {
                    fill_noise(lcg, left.sf[g][sfb], &mut left.coeffs[range.clone()]);
                }

                if right_noise {
                    if left_noise && ms_used[g][sfb] {
                        // Correlated: same noise vector, the right channel's energy.
                        let gain = scalef(f64::from(right.sf[g][sfb] - left.sf[g][sfb]));
                        for i in range {
                            right.coeffs[i] = left.coeffs[i] * gain;
                        }
                    }
                    else {
                        fill_noise(lcg, right.sf[g][sfb], &mut right.coeffs[range]);
                    }
                }
            }
        }
        window_base += left.info.group_len[g];
    }
}

/// Draws one noise vector, normalizes it to unit energy, and scales it to the decoded noise
/// energy.
fn fill_noise(lcg: &mut Lcg, energy: i16, dst: &mut [f64]) {
    let mut band_energy = 0.0;

    for spec in dst.iter_mut() {
        *spec = f64::from(lcg.next());
        band_energy += *spec * *spec;
    }

    let scale = scalef(f64::from(energy)) / band_energy.sqrt();

    for spec in dst.iter_mut() {
        *spec *= scale;
    }
}

#[inline(always)]
fn scalef(sf: f64) -> f64 {
    2.0f64.powf(0.25 * sf)
}

/// Mid/side decoding: reconstructs left/right from sum/difference on every masked band where
/// both channels carry ordinary spectral data.
pub fn apply_mid_side(
    left: &mut IcsDecode,
    right: &mut IcsDecode,
    ms_used: &[[bool; MAX_SFBS]; MAX_WINDOWS],
    sbinfo: &SubbandInfo,
) {
    let bands = sbinfo.bands(left.info.long_windows());

    let mut window_base = 0;

    for g in 0..left.info.window_groups {
        for sfb in 0..left.info.max_sfb {
            if !ms_used[g][sfb] || !left.is_normal(g, sfb) || !right.is_normal(g, sfb) {
                continue;
            }

            for w in 0..left.info.group_len[g] {
                let range = left.line_range(bands, window_base, w, sfb);

                for i in range {
                    let mid = left.coeffs[i];
                    let side = right.coeffs[i];
                    left.coeffs[i] = mid + side;
                    right.coeffs[i] = mid - side;
                }
            }
        }
        window_base += left.info.group_len[g];
    }
}

/// Intensity stereo: rebuilds right-channel bands from the left channel and the decoded
/// intensity position. A set mid/side mask bit inverts the intensity direction.
pub fn apply_intensity(
    left: &IcsDecode,
    right: &mut IcsDecode,
    ms_used: &[[bool; MAX_SFBS]; MAX_WINDOWS],
    sbinfo: &SubbandInfo,
) {
    let bands = sbinfo.bands(left.info.long_windows());

    let mut window_base = 0;

    for g in 0..right.info.window_groups {
        for sfb in 0..right.info.max_sfb {
            if !right.is_intensity(g, sfb) {
                continue;
            }

            let mut sign = match right.sfb_cb[g][sfb] {
                INTENSITY_HCB => 1.0,
                INTENSITY_HCB2 => -1.0,
                _ => unreachable!(),
            };

            if ms_used[g][sfb] {
                sign = -sign;
            }

            let scale = sign * 0.5f64.powf(0.25 * f64::from(right.sf[g][sfb]));

            for w in 0..right.info.group_len[g] {
                let range = right.line_range(bands, window_base, w, sfb);

                for i in range {
                    right.coeffs[i] = left.coeffs[i] * scale;
                }
            }
        }
        window_base += right.info.group_len[g];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ONLY_LONG_SEQUENCE;
    use crate::syntax::{IcsInfo, NOISE_HCB};

    fn decode_record(max_sfb: usize) -> IcsDecode {
        let mut ics = IcsDecode::new();
        ics.info = IcsInfo {
            window_sequence: ONLY_LONG_SEQUENCE,
            window_shape: false,
            max_sfb,
            num_windows: 1,
            window_groups: 1,
            group_len: [1, 0, 0, 0, 0, 0, 0, 0],
        };
        ics
    }

    fn sbinfo() -> SubbandInfo {
        SubbandInfo::for_rate_index(4).unwrap()
    }

    #[test]
    fn verify_noise_band_energy() {
        let mut ics = decode_record(2);
        ics.sfb_cb[0][0] = NOISE_HCB;
        ics.sf[0][0] = 8; // energy gain 2^2

        let mut lcg = Lcg::new(1);
        substitute_noise(&mut ics, &sbinfo(), &mut lcg);

        let energy: f64 = ics.coeffs[0..4].iter().map(|x| x * x).sum();
        let expected = 2.0f64.powf(0.25 * 8.0);

        assert!((energy.sqrt() - expected).abs() < 1e-9);
        // Untouched bands stay silent.
        assert!(ics.coeffs[4..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn verify_correlated_pair_noise() {
        let mut left = decode_record(1);
        let mut right = decode_record(1);
        left.sfb_cb[0][0] = NOISE_HCB;
        right.sfb_cb[0][0] = NOISE_HCB;
        left.sf[0][0] = 4;
        right.sf[0][0] = 12;

        let mut ms_used = [[false; MAX_SFBS]; MAX_WINDOWS];
        ms_used[0][0] = true;

        let mut lcg = Lcg::new(1);
        substitute_noise_pair(&mut left, &mut right, &ms_used, true, &sbinfo(), &mut lcg);

        // Same noise shape, scaled by the energy difference 2^((12-4)/4).
        for i in 0..4 {
            assert!((right.coeffs[i] - left.coeffs[i] * 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn verify_independent_pair_noise() {
        let mut left = decode_record(1);
        let mut right = decode_record(1);
        left.sfb_cb[0][0] = NOISE_HCB;
        right.sfb_cb[0][0] = NOISE_HCB;
        left.sf[0][0] = 8;
        right.sf[0][0] = 8;

        let ms_used = [[false; MAX_SFBS]; MAX_WINDOWS];

        let mut lcg = Lcg::new(1);
        substitute_noise_pair(&mut left, &mut right, &ms_used, true, &sbinfo(), &mut lcg);

        // Independent draws differ despite equal energies.
        let same = (0..4).all(|i| (left.coeffs[i] - right.coeffs[i]).abs() < 1e-12);
        assert!(!same);
    }

    #[test]
    fn verify_mid_side_masking() {
        let mut left = decode_record(2);
        let mut right = decode_record(2);
        left.sfb_cb[0][0] = 1;
        right.sfb_cb[0][0] = 1;
        left.sfb_cb[0][1] = 1;
        right.sfb_cb[0][1] = NOISE_HCB; // mixed codebooks: band skipped

        for i in 0..8 {
            left.coeffs[i] = 10.0;
            right.coeffs[i] = 4.0;
        }

        let mut ms_used = [[true; MAX_SFBS]; MAX_WINDOWS];
        ms_used[0][0] = true;

        apply_mid_side(&mut left, &mut right, &ms_used, &sbinfo());

        for i in 0..4 {
            assert_eq!(left.coeffs[i], 14.0);
            assert_eq!(right.coeffs[i], 6.0);
        }
        // Band 1 was skipped.
        for i in 4..8 {
            assert_eq!(left.coeffs[i], 10.0);
            assert_eq!(right.coeffs[i], 4.0);
        }
    }

    #[test]
    fn verify_intensity_scaling() {
        let mut left = decode_record(2);
        let mut right = decode_record(2);
        right.sfb_cb[0][0] = INTENSITY_HCB;
        right.sfb_cb[0][1] = INTENSITY_HCB2;
        right.sf[0][0] = 4; // scale 0.5
        right.sf[0][1] = -4; // scale 2, negated direction

        for i in 0..8 {
            left.coeffs[i] = 8.0;
        }

        let mut ms_used = [[false; MAX_SFBS]; MAX_WINDOWS];
        // Inverts the first band's direction.
        ms_used[0][0] = true;

        apply_intensity(&left, &mut right, &ms_used, &sbinfo());

        for i in 0..4 {
            assert_eq!(right.coeffs[i], -4.0);
        }
        for i in 4..8 {
            assert_eq!(right.coeffs[i], -16.0);
        }
    }
}
