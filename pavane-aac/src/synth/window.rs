// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::f64::consts;

/// Fills `dst` with the first half of a sine window of length `2 * dst.len()`.
pub fn sine_window(dst: &mut [f64]) {
    let step = consts::PI / ((2 * 2 * dst.len()) as f64);
    for (i, w) in dst.iter_mut().enumerate() {
        *w = (step * ((2 * i + 1) as f64)).sin();
    }
}

/// Fills `dst` with the first half of a Kaiser-Bessel derived window with shape parameter
/// `alpha`.
pub fn kbd_window(alpha: f64, dst: &mut [f64]) {
    let h = dst.len() as f64;

    let mut sum = 0.0;
    for (i, w) in dst.iter_mut().enumerate() {
        let x = (2 * i) as f64 / h - 1.0;
        sum += bessel_i0(consts::PI * alpha * (1.0 - x * x).sqrt());
        // Accumulate the running sum; normalized below once the total is known.
        *w = sum;
    }

    for w in dst.iter_mut() {
        *w = (*w / sum).sqrt();
    }
}

/// The zeroth-order modified Bessel function of the first kind, evaluated by its power series.
fn bessel_i0(x: f64) -> f64 {
    let t = x * x * 0.25;
    let mut val = 1.0;
    for n in (1..64).rev() {
        val *= t / f64::from(n * n);
        val += 1.0;
    }
    val
}
