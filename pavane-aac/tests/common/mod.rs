// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared fixtures: synthetic containers and a deterministic access unit parser.

// Each test binary uses its own slice of these fixtures.
#![allow(dead_code)]

use pavane_aac::syntax::{
    AccessUnit, ChannelPairStream, ChannelStream, Element, IcsInfo, SpectralRow, SyntaxDecoder,
    MAX_SFBS, MAX_WINDOWS,
};
use pavane_aac::{AscConfig, Result};

/// A stand-in for the bit-level syntax parser: the first payload byte selects a deterministic
/// tone, so every access unit decodes to distinct, reproducible PCM.
pub struct ToneSyntax;

fn tone_stream(seed: u8) -> ChannelStream {
    let mut sfb_cb = [[0u8; MAX_SFBS]; MAX_WINDOWS];
    sfb_cb[0][0] = 1;

    // A +40 scale factor delta lifts the tone well into the 16-bit range.
    let mut sf_codes = [[0i16; MAX_SFBS]; MAX_WINDOWS];
    sf_codes[0][0] = 100;

    let q = i16::from(seed % 40) + 1;

    ChannelStream {
        global_gain: 100,
        info: IcsInfo {
            window_sequence: 0,
            window_shape: false,
            max_sfb: 1,
            num_windows: 1,
            window_groups: 1,
            group_len: [1, 0, 0, 0, 0, 0, 0, 0],
        },
        sfb_cb,
        sf_codes,
        spectral: vec![SpectralRow::Quad([q, -q, 0, q])],
        pulse: None,
        tns: None,
    }
}

impl SyntaxDecoder for ToneSyntax {
    fn decode(&mut self, payload: &[u8], config: &AscConfig) -> Result<AccessUnit> {
        let seed = payload.first().copied().unwrap_or(0);

        let element = if config.channels() == 2 {
            Element::ChannelPair(Box::new(ChannelPairStream {
                common_window: true,
                ms_used: [[false; MAX_SFBS]; MAX_WINDOWS],
                left: tone_stream(seed),
                right: tone_stream(seed.wrapping_add(1)),
            }))
        }
        else {
            Element::SingleChannel(Box::new(tone_stream(seed)))
        };

        Ok(AccessUnit { element })
    }
}

/// Builds one ADTS frame (seven-byte header, no CRC) around the payload.
pub fn adts_frame(sample_rate_index: u8, channel_config: u8, payload: &[u8]) -> Vec<u8> {
    let frame_len = 7 + payload.len();

    let mut buf = vec![
        0xff,
        0xf1,
        (0x1 << 6) | (sample_rate_index << 2) | (channel_config >> 2),
        ((channel_config & 0x3) << 6) | ((frame_len >> 11) as u8 & 0x3),
        (frame_len >> 3) as u8,
        ((frame_len as u8 & 0x7) << 5) | 0x1f,
        0xfc,
    ];

    buf.extend_from_slice(payload);
    buf
}

/// Builds an ADTS stream of `count` frames whose payloads carry their own index.
pub fn adts_stream(sample_rate_index: u8, channel_config: u8, count: usize) -> Vec<u8> {
    let mut data = Vec::new();
    for i in 0..count {
        data.extend(adts_frame(sample_rate_index, channel_config, &[i as u8, 0xee]));
    }
    data
}

fn atom(fourcc: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + payload.len());
    buf.extend_from_slice(&((payload.len() as u32 + 8).to_be_bytes()));
    buf.extend_from_slice(fourcc);
    buf.extend_from_slice(payload);
    buf
}

fn full_atom(fourcc: &[u8; 4], version: u8, payload: &[u8]) -> Vec<u8> {
    let mut body = vec![version, 0, 0, 0];
    body.extend_from_slice(payload);
    atom(fourcc, &body)
}

fn esds(asc: &[u8]) -> Vec<u8> {
    let mut dec_specific = vec![0x05, asc.len() as u8];
    dec_specific.extend_from_slice(asc);

    let mut dec_config = vec![
        0x40, // object type indication: MPEG-4 audio
        0x15, // stream type: audio
        0x00, 0x00, 0x00, // buffer size
        0x00, 0x00, 0x00, 0x00, // max bitrate
        0x00, 0x00, 0x00, 0x00, // average bitrate
    ];
    dec_config.extend_from_slice(&dec_specific);

    let mut es = vec![0x00, 0x00, 0x00]; // ES_ID and flags
    es.push(0x04);
    es.push(dec_config.len() as u8);
    es.extend_from_slice(&dec_config);

    let mut descriptor = vec![0x03, es.len() as u8];
    descriptor.extend_from_slice(&es);

    full_atom(b"esds", 0, &descriptor)
}

fn mp4a_entry(channels: u16, sample_rate: u32, asc: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&[0u8; 6]); // reserved
    body.extend_from_slice(&1u16.to_be_bytes()); // data reference index
    body.extend_from_slice(&0u16.to_be_bytes()); // version
    body.extend_from_slice(&[0u8; 6]); // revision, vendor
    body.extend_from_slice(&channels.to_be_bytes());
    body.extend_from_slice(&16u16.to_be_bytes()); // sample size
    body.extend_from_slice(&[0u8; 4]); // compression id, packet size
    body.extend_from_slice(&(sample_rate << 16).to_be_bytes());
    body.extend_from_slice(&esds(asc));
    atom(b"mp4a", &body)
}

/// Describes a synthetic MP4 audio file for the fixtures to assemble.
pub struct Mp4Layout {
    pub asc: Vec<u8>,
    pub channels: u16,
    pub sample_rate: u32,
    /// Per-sample payload sizes.
    pub sizes: Vec<u32>,
    /// (sample_count, sample_delta) time-to-sample entries.
    pub stts: Vec<(u32, u32)>,
    /// Samples per chunk, one entry per chunk.
    pub chunks: Vec<u32>,
    /// Edit list media time, if any.
    pub media_time: Option<i64>,
}

impl Mp4Layout {
    pub fn stereo_44k(sizes: Vec<u32>, stts: Vec<(u32, u32)>, chunks: Vec<u32>) -> Mp4Layout {
        Mp4Layout {
            asc: vec![0x12, 0x10],
            channels: 2,
            sample_rate: 44100,
            sizes,
            stts,
            chunks,
            media_time: None,
        }
    }

    /// Assembles the file: `ftyp`, `mdat` carrying index-stamped payloads, then `moov`.
    pub fn build(&self) -> Vec<u8> {
        let ftyp = atom(b"ftyp", b"M4A \x00\x00\x02\x00isomiso2");

        let mut mdat_payload = Vec::new();
        let mut sample_offsets = Vec::new();

        for (i, &size) in self.sizes.iter().enumerate() {
            sample_offsets.push(mdat_payload.len() as u64);
            let mut sample = vec![i as u8; size as usize];
            if size > 1 {
                sample[1] = 0xee;
            }
            mdat_payload.extend_from_slice(&sample);
        }

        let mdat = atom(b"mdat", &mdat_payload);
        let mdat_data_start = ftyp.len() as u64 + 8;

        // Chunk offsets point at the first sample of each chunk.
        let mut stco_payload = Vec::new();
        stco_payload.extend_from_slice(&(self.chunks.len() as u32).to_be_bytes());
        let mut next_sample = 0usize;
        for &samples in &self.chunks {
            let offset = mdat_data_start + sample_offsets[next_sample];
            stco_payload.extend_from_slice(&(offset as u32).to_be_bytes());
            next_sample += samples as usize;
        }
        let stco = full_atom(b"stco", 0, &stco_payload);

        let mut stsc_payload = Vec::new();
        let mut stsc_entries: Vec<(u32, u32)> = Vec::new();
        for (i, &samples) in self.chunks.iter().enumerate() {
            match stsc_entries.last() {
                Some(&(_, prev)) if prev == samples => (),
                _ => stsc_entries.push((i as u32 + 1, samples)),
            }
        }
        stsc_payload.extend_from_slice(&(stsc_entries.len() as u32).to_be_bytes());
        for (first_chunk, samples) in stsc_entries {
            stsc_payload.extend_from_slice(&first_chunk.to_be_bytes());
            stsc_payload.extend_from_slice(&samples.to_be_bytes());
            stsc_payload.extend_from_slice(&1u32.to_be_bytes());
        }
        let stsc = full_atom(b"stsc", 0, &stsc_payload);

        let mut stsz_payload = Vec::new();
        stsz_payload.extend_from_slice(&0u32.to_be_bytes());
        stsz_payload.extend_from_slice(&(self.sizes.len() as u32).to_be_bytes());
        for &size in &self.sizes {
            stsz_payload.extend_from_slice(&size.to_be_bytes());
        }
        let stsz = full_atom(b"stsz", 0, &stsz_payload);

        let mut stts_payload = Vec::new();
        stts_payload.extend_from_slice(&(self.stts.len() as u32).to_be_bytes());
        for &(count, delta) in &self.stts {
            stts_payload.extend_from_slice(&count.to_be_bytes());
            stts_payload.extend_from_slice(&delta.to_be_bytes());
        }
        let stts = full_atom(b"stts", 0, &stts_payload);

        let stsd = {
            let mut payload = Vec::new();
            payload.extend_from_slice(&1u32.to_be_bytes());
            payload.extend_from_slice(&mp4a_entry(self.channels, self.sample_rate, &self.asc));
            full_atom(b"stsd", 0, &payload)
        };

        let mut stbl_payload = Vec::new();
        stbl_payload.extend_from_slice(&stsd);
        stbl_payload.extend_from_slice(&stts);
        stbl_payload.extend_from_slice(&stsc);
        stbl_payload.extend_from_slice(&stsz);
        stbl_payload.extend_from_slice(&stco);
        let stbl = atom(b"stbl", &stbl_payload);

        let minf = atom(b"minf", &stbl);

        let hdlr = {
            let mut payload = Vec::new();
            payload.extend_from_slice(&[0u8; 4]); // pre-defined
            payload.extend_from_slice(b"soun");
            payload.extend_from_slice(&[0u8; 12]); // reserved
            payload.push(0); // name
            full_atom(b"hdlr", 0, &payload)
        };

        let mut mdia_payload = Vec::new();
        mdia_payload.extend_from_slice(&hdlr);
        mdia_payload.extend_from_slice(&minf);
        let mdia = atom(b"mdia", &mdia_payload);

        let mut trak_payload = Vec::new();

        if let Some(media_time) = self.media_time {
            let mut elst_payload = Vec::new();
            elst_payload.extend_from_slice(&1u32.to_be_bytes());
            elst_payload.extend_from_slice(&0u32.to_be_bytes()); // segment duration
            elst_payload.extend_from_slice(&(media_time as i32).to_be_bytes());
            elst_payload.extend_from_slice(&1u16.to_be_bytes()); // media rate
            elst_payload.extend_from_slice(&0u16.to_be_bytes());
            let elst = full_atom(b"elst", 0, &elst_payload);
            trak_payload.extend_from_slice(&atom(b"edts", &elst));
        }

        trak_payload.extend_from_slice(&mdia);
        let trak = atom(b"trak", &trak_payload);

        let moov = atom(b"moov", &trak);

        let mut file = Vec::new();
        file.extend_from_slice(&ftyp);
        file.extend_from_slice(&mdat);
        file.extend_from_slice(&moov);
        file
    }
}
