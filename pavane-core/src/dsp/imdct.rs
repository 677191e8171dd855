// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `imdct` module implements the Inverse Modified Discrete Cosine Transform (IMDCT).

use std::f64;

use super::dct::Dct;

/// Inverse Modified Discrete Cosine Transform (IMDCT).
///
/// Implements the IMDCT in-terms of a DCT-IV as described in \[1\] and \[2\].
///
/// \[1\] Mu-Huo Cheng and Yu-Hsin Hsu, "Fast IMDCT and MDCT algorithms - a matrix approach,"
///       in IEEE Transactions on Signal Processing, vol. 51, no. 1, pp. 221-229, Jan. 2003,
///       doi: 10.1109/TSP.2002.806566.
///
/// \[2\] Tan Li, R. Zhang, R. Yang, Heyun Huang and Fuhuei Lin, "A unified computing kernel for
///       MDCT/IMDCT in modern audio coding standards," 2007 International Symposium on
///       Communications and Information Technologies, Sydney, NSW, 2007, pp. 546-550,
///       doi: 10.1109/ISCIT.2007.4392079.
pub struct Imdct {
    dct: Dct,
    table: Vec<f64>,
    scale: f64,
}

impl Imdct {
    /// Instantiate a N-point IMDCT, where `n` is the number of spectral coefficients and the
    /// transform produces `2n` time-domain samples, each multiplied by `scale`.
    ///
    /// The value of `n` must be a power-of-2, and less-than or equal to 1024.
    pub fn new_scaled(n: usize, scale: f64) -> Imdct {
        // The algorithm implemented requires a power-of-two N.
        assert!(n.is_power_of_two(), "n must be a power of two");
        assert!(n <= 1024, "maximum of 1024-point imdct");

        let c = f64::consts::PI / ((2 * 2 * n) as f64);

        let table: Vec<f64> = (0..n).map(|i| 2.0 * (c * ((2 * i + 1) as f64)).cos()).collect();

        Imdct { dct: Dct::new(n), table, scale }
    }

    /// Performs the Inverse Modified Discrete Cosine Transform.
    ///
    /// The number of input samples in `src` must equal the value `Imdct` was instantiated with,
    /// and the length of the output slice, `dst`, must be twice that. Failing to meet these
    /// requirements will throw an assertion.
    pub fn imdct(&mut self, src: &[f64], dst: &mut [f64]) {
        let n2 = src.len();
        let n = n2 << 1;
        let n4 = n2 >> 1;

        assert_eq!(dst.len(), n);
        assert_eq!(src.len(), self.table.len());

        // Pre-process the input and place it in the second-half of dst.
        for ((d, &s), &cos) in dst[n2..].iter_mut().zip(src).zip(&self.table) {
            *d = s * cos;
        }

        // Compute the DCT-II in-place using the pre-processed samples that reside in the second-
        // half of dst.
        self.dct.dct_ii_inplace(&mut dst[n2..]);

        // DCT-II to DCT-IV
        //
        // Split dst into 4 evenly sized N/4 vectors: [ vec0, vec1, vec2, vec3 ]. Vectors 2 & 3
        // contain the DCT-II transformed samples from the previous step. After this step,
        // regions vec1 & vec2 will contain the DCT-IV transformed samples.
        let (vec0, vec1) = dst.split_at_mut(n4);
        let (vec1, vec2) = vec1.split_at_mut(n4);
        let (vec2, vec3) = vec2.split_at_mut(n4);

        // Map vec2 to vec1.
        vec1[0] = -0.5 * vec2[0];

        for i in 1..n4 {
            vec1[i] = -1.0 * (vec2[i] + vec1[i - 1]);
        }

        // Map vec3 to vec2.
        vec2[0] = vec3[0] + vec1[n4 - 1];

        for i in 1..n4 {
            vec2[i] = vec3[i] - vec2[i - 1];
        }

        // DCT-IV to IMDCT
        //
        // Using symmetry, expand the DCT-IV to IMDCT. Multiply by the scale factor while this is
        // done.
        let scale = self.scale;

        for (s0, &s2) in vec0.iter_mut().zip(vec2.iter()) {
            // vec0 is a scaled copy of vec2.
            *s0 = scale * s2;
        }

        for ((s3, s2), &s1) in vec3.iter_mut().zip(vec2.iter_mut().rev()).zip(vec1.iter()) {
            // vec3 is a scaled copy of vec1.
            // vec2 is a reversed and scaled copy of vec1.
            let s = scale * s1;
            *s3 = s;
            *s2 = s;
        }

        for (s1, &s0) in vec1.iter_mut().zip(vec0.iter().rev()) {
            // vec1 is an inverted copy of vec2. vec2 was overwritten above, but vec0 is a copy of
            // the original vec2.
            *s1 = -1.0 * s0;
        }
    }
}
