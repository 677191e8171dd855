// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `dct` module implements the Discrete Cosine Transform (DCT).
//!
//! The DCT algorithm in this module is not general purpose and is specialized for use in the
//! inverse MDCT. Therefore, some constraints may apply.

use std::f64;

use lazy_static::lazy_static;

macro_rules! dct_cos_table {
    ($bi:expr, $name:ident) => {
        lazy_static! {
            static ref $name: [f64; 1 << ($bi - 1)] = {
                const N: usize = 1 << $bi;
                const N2: usize = N >> 1;
                const FREQ: f64 = f64::consts::PI / (N as f64);

                let mut table = [0f64; N2];

                for (i, c) in table.iter_mut().enumerate() {
                    *c = (2.0 * ((i as f64 + 0.5) * FREQ).cos()).recip();
                }

                table
            };
        }
    };
}

dct_cos_table!(6, DCT_COS_TABLE_64);
dct_cos_table!(7, DCT_COS_TABLE_128);
dct_cos_table!(8, DCT_COS_TABLE_256);
dct_cos_table!(9, DCT_COS_TABLE_512);
dct_cos_table!(10, DCT_COS_TABLE_1024);

fn dct_cos_table(n: usize) -> &'static [f64] {
    match n {
        64 => DCT_COS_TABLE_64.as_ref(),
        128 => DCT_COS_TABLE_128.as_ref(),
        256 => DCT_COS_TABLE_256.as_ref(),
        512 => DCT_COS_TABLE_512.as_ref(),
        1024 => DCT_COS_TABLE_1024.as_ref(),
        _ => unimplemented!(),
    }
}

/// Discrete Cosine Transform (DCT).
///
/// Implements the DCT-II using the fast algorithm described in \[1\].
///
/// \[1\] B.G. Lee, "A new algorithm to compute the discrete cosine transform", IEEE Transactions
///       on Acoustics, Speech, and Signal Processing, vol. 32, no. 6, pp. 1243-1245, 1984.
///
/// <https://ieeexplore.ieee.org/document/1164443>
pub struct Dct {
    temp: Vec<f64>,
}

impl Dct {
    /// Instantiate a N-point DCT.
    ///
    /// The value of `n` must be a power-of-2, and less-than or equal to 1024.
    pub fn new(n: usize) -> Dct {
        // The algorithm implemented requires a power-of-two N.
        assert!(n.is_power_of_two(), "n must be a power-of-two");
        // The table set above bounds the transform size.
        assert!(n <= 1024, "maximum of 1024-point dct");

        Dct { temp: vec![0.0; n] }
    }

    /// Performs a N-point Discrete Cosine Transform in-place.
    ///
    /// The number of input samples in `src`, N, must equal the value `Dct` was instantiated with.
    pub fn dct_ii_inplace(&mut self, src: &mut [f64]) {
        assert_eq!(src.len(), self.temp.len());

        // Enter recursion.
        dct_ii_step(src, &mut self.temp);
    }
}

fn dct_ii_step(x: &mut [f64], t: &mut [f64]) {
    let n = x.len();

    // Recursion becomes costly for small values of N. Dispatch to a direct evaluation in these
    // cases.
    if n > 32 {
        let n_half = n >> 1;

        let (xl, xr) = x.split_at_mut(n_half);
        let (tl, tr) = t.split_at_mut(n_half);
        let table = dct_cos_table(n);

        for ((((tls, trs), &xls), &xrs), &c) in
            tl.iter_mut().zip(tr.iter_mut()).zip(xl.iter()).zip(xr.iter().rev()).zip(table.iter())
        {
            *tls = xls + xrs;
            *trs = (xls - xrs) * c;
        }

        dct_ii_step(tl, xl);
        dct_ii_step(tr, xr);

        for ((xsc, &tls), trsw) in x.chunks_exact_mut(2).zip(tl.iter()).zip(tr.windows(2)) {
            xsc[0] = tls;
            xsc[1] = trsw[0] + trsw[1];
        }

        x[n - 2] = t[n_half - 1];
        x[n - 1] = t[n - 1];
    }
    else {
        dct_ii_direct(x);
    }
}

/// Direct evaluation of the unscaled DCT-II for the recursion base case.
fn dct_ii_direct(x: &mut [f64]) {
    let n = x.len();
    debug_assert!(n <= 32);

    let freq = f64::consts::PI / (n as f64);

    let mut out = [0f64; 32];

    for (k, out) in out[..n].iter_mut().enumerate() {
        let mut accum = 0.0;
        for (i, &x) in x.iter().enumerate() {
            accum += x * (freq * (i as f64 + 0.5) * (k as f64)).cos();
        }
        *out = accum;
    }

    x.copy_from_slice(&out[..n]);
}
