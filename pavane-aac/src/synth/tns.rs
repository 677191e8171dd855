// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temporal noise shaping: inverse quantization of the transmitted reflection coefficients,
//! conversion to prediction coefficients, and the all-pole filter over spectral line ranges.

use std::f64::consts;

use pavane_core::errors::{malformed_error, unvalidated_error, Result};

use crate::common::{validate, SubbandInfo};
use crate::syntax::{TnsData, TnsFilter, TNS_MAX_ORDER};

use super::ics::IcsDecode;

/// The highest scale factor band TNS may operate on, per sampling frequency index, for long
/// windows.
const TNS_MAX_LONG_BANDS: [usize; 12] = [31, 31, 34, 40, 42, 51, 46, 46, 42, 42, 42, 39];

/// Applies every transmitted TNS filter to the channel's spectrum. TNS is not applied to
/// eight-short sequences.
pub fn apply(
    tns: &TnsData,
    ics: &mut IcsDecode,
    sbinfo: &SubbandInfo,
    rate_index: usize,
) -> Result<()> {
    if !ics.info.long_windows() {
        return Ok(());
    }

    if rate_index >= TNS_MAX_LONG_BANDS.len() {
        return unvalidated_error("aac: tns band limit for sampling frequency");
    }

    let max_bands = TNS_MAX_LONG_BANDS[rate_index];
    let bands = sbinfo.bands(true);

    validate!(tns.windows.len() == ics.info.num_windows);

    for (w, window) in tns.windows.iter().enumerate() {
        // Filters stack downward from the top of the spectrum; their ranges never overlap.
        let mut top = ics.info.max_sfb.min(max_bands);

        for filter in &window.filters {
            let bottom = top.saturating_sub(filter.length);

            let start_band = bottom.min(max_bands).min(ics.info.max_sfb);
            let end_band = top.min(max_bands).min(ics.info.max_sfb);

            top = bottom;

            if filter.order == 0 {
                continue;
            }

            validate!(filter.order <= TNS_MAX_ORDER);

            let lpc = prediction_coefficients(filter, window.coef_res)?;

            let start = w * 128 + bands[start_band];
            let end = w * 128 + bands[end_band];

            filter_region(&mut ics.coeffs[start..end], &lpc[..filter.order], filter.direction);
        }
    }

    Ok(())
}

/// Inverse-quantizes the raw reflection coefficients and converts them to prediction
/// coefficients with a Levinson recursion step per coefficient.
fn prediction_coefficients(
    filter: &TnsFilter,
    coef_res: bool,
) -> Result<[f64; TNS_MAX_ORDER]> {
    let base_bits = if coef_res { 4 } else { 3 };
    let width = base_bits - usize::from(filter.coef_compress);

    if width < 2 || width > 4 {
        return malformed_error("aac: tns coefficient width");
    }

    let sign_mask = 1u8 << (width - 1);
    let value_mask = (1u8 << width) - 1;

    // The inverse quantizer divisor is asymmetric around zero: half a step larger for negative
    // values.
    let half_range = (1usize << (base_bits - 1)) as f64;
    let iqfac = (half_range - 0.5) / consts::FRAC_PI_2;
    let iqfac_m = (half_range + 0.5) / consts::FRAC_PI_2;

    let mut reflection = [0f64; TNS_MAX_ORDER];

    for (k, &raw) in reflection.iter_mut().zip(&filter.coef[..filter.order]) {
        validate!(raw & !value_mask == 0);

        let v = if raw & sign_mask != 0 {
            i32::from(raw) - i32::from(value_mask) - 1
        }
        else {
            i32::from(raw)
        };

        let v = f64::from(v);
        *k = (if v >= 0.0 { v / iqfac } else { v / iqfac_m }).sin();
    }

    // Reflection to prediction coefficients.
    let mut p = [0f64; TNS_MAX_ORDER + 1];
    p[0] = 1.0;

    let mut work = [0f64; TNS_MAX_ORDER + 1];

    for m in 1..=filter.order {
        p[m] = reflection[m - 1];

        for i in 1..m {
            work[i] = p[i] + p[m] * p[m - i];
        }

        p[1..m].copy_from_slice(&work[1..m]);
    }

    let mut lpc = [0f64; TNS_MAX_ORDER];
    lpc[..filter.order].copy_from_slice(&p[1..=filter.order]);

    Ok(lpc)
}

/// Runs the all-pole filter across a spectral region, ascending or descending in frequency.
fn filter_region(region: &mut [f64], lpc: &[f64], descending: bool) {
    let mut state = [0f64; TNS_MAX_ORDER];
    let order = lpc.len();

    let mut step = |spec: &mut f64| {
        let mut y = *spec;

        for (l, s) in lpc.iter().zip(&state[..order]) {
            y -= l * s;
        }

        for j in (1..order).rev() {
            state[j] = state[j - 1];
        }
        state[0] = y;

        *spec = y;
    };

    if descending {
        for spec in region.iter_mut().rev() {
            step(spec);
        }
    }
    else {
        for spec in region.iter_mut() {
            step(spec);
        }
    }
}
