// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared foundations for Project Pavane: the common error type, positioned
//! byte-level I/O, an MSB-first bit reader, and the cosine transforms used by
//! the synthesis filterbanks.

pub mod dsp;
pub mod errors;
pub mod io;
