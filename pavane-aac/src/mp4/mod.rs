// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Non-fragmented ISO Base Media File Format indexing.
//!
//! The movie atom is parsed into its sample tables, the single AAC audio track is selected, and
//! the sample tables are walked into the access unit map. Fragmented, encrypted, and multi-
//! description inputs are rejected.

use pavane_core::errors::{malformed_error, unsupported_error, Result};
use pavane_core::io::{ByteSource, SourceReader};

use log::debug;

use crate::asc::AscConfig;
use crate::common::FRAME_LEN;
use crate::source::{AuRecord, ContainerKind, ContainerSource};

pub(crate) mod atoms;

use atoms::{Atom, AtomIterator, AtomType, MoovAtom, TrakAtom};

// MPEG-4 audio and MPEG-2 AAC-LC object type indications.
const OTI_MPEG4_AUDIO: u8 = 0x40;
const OTI_MPEG2_AAC_LC: u8 = 0x67;

/// Indexes a non-fragmented MP4 file into a container source.
pub fn index(src: &dyn ByteSource, len: u64) -> Result<ContainerSource> {
    let mut reader = SourceReader::new(src, len);

    let mut moov: Option<MoovAtom> = None;

    let mut iter = AtomIterator::root(len);

    while let Some(header) = iter.next(&mut reader)? {
        match header.atom_type {
            AtomType::Movie => {
                if moov.is_some() {
                    return malformed_error("mp4: multiple moov atoms");
                }
                moov = Some(MoovAtom::read(&mut reader, header)?);
            }
            AtomType::MovieFragment => return unsupported_error("mp4: fragmented stream"),
            _ => (),
        }
    }

    let moov = match moov {
        Some(moov) => moov,
        None => return malformed_error("mp4: missing moov atom"),
    };

    let trak = select_audio_track(&moov)?;

    let stbl = match trak.mdia.minf.as_ref().and_then(|minf| minf.stbl.as_ref()) {
        Some(stbl) => stbl,
        None => return malformed_error("mp4: missing sample table"),
    };

    // Exactly one sample description, and it must be plain MPEG-4 audio.
    if stbl.stsd.entry_count != 1 {
        return unsupported_error("mp4: multiple sample descriptions");
    }

    let mp4a = match &stbl.stsd.mp4a {
        Some(mp4a) => mp4a,
        None => return unsupported_error("mp4: audio track is not mp4a"),
    };

    let esds = match &mp4a.esds {
        Some(esds) => esds,
        None => return malformed_error("mp4: missing esds atom"),
    };

    if esds.object_type_indication != OTI_MPEG4_AUDIO
        && esds.object_type_indication != OTI_MPEG2_AAC_LC
    {
        return unsupported_error("mp4: audio track is not aac");
    }

    let config = AscConfig::parse(&esds.dec_specific_info)?;

    debug!(
        "mp4: audio track, {} Hz, {} channel(s), sample entry {}x{}",
        config.sample_rate,
        config.channel_config,
        mp4a.channels,
        mp4a.sample_rate >> 16
    );

    // PCM frame counts per sample: a uniform 1024, except that the final sample alone may be
    // shorter.
    let sample_count = stbl.stts.total_samples() as usize;

    if sample_count == 0 {
        return malformed_error("mp4: empty sample table");
    }

    if u64::from(stbl.stsz.sample_count) != sample_count as u64 {
        return malformed_error("mp4: sample size and timing tables disagree");
    }

    let mut frames = Vec::with_capacity(sample_count);

    for (i, entry) in stbl.stts.entries.iter().enumerate() {
        let last = i + 1 == stbl.stts.entries.len();

        if entry.sample_delta == 0 || entry.sample_delta > FRAME_LEN as u32 {
            return unsupported_error("mp4: sample duration out of range");
        }

        if entry.sample_delta != FRAME_LEN as u32 && !(last && entry.sample_count == 1) {
            return unsupported_error("mp4: non-uniform sample durations");
        }

        for _ in 0..entry.sample_count {
            frames.push(entry.sample_delta);
        }
    }

    let units = walk_chunks(stbl, &frames, len)?;

    let total_raw: u64 = frames.iter().map(|&f| u64::from(f)).sum();

    let leading = leading_frames(trak, total_raw)?;

    ContainerSource::new(
        ContainerKind::Mp4,
        config,
        esds.dec_specific_info.clone(),
        units,
        leading,
    )
}

/// Selects the single audio track of the movie.
fn select_audio_track(moov: &MoovAtom) -> Result<&TrakAtom> {
    let mut audio = None;

    for trak in &moov.traks {
        if trak.mdia.hdlr.is_sound() {
            if audio.is_some() {
                return unsupported_error("mp4: multiple audio tracks");
            }
            audio = Some(trak);
        }
    }

    match audio {
        Some(trak) => Ok(trak),
        None => malformed_error("mp4: no audio track"),
    }
}

/// Walks chunk offsets through the sample-to-chunk map, emitting one record per sample.
fn walk_chunks(stbl: &atoms::StblAtom, frames: &[u32], len: u64) -> Result<Vec<AuRecord>> {
    let offsets: &[u64] = match (&stbl.stco, &stbl.co64) {
        (Some(stco), None) => &stco.offsets,
        (None, Some(co64)) => &co64.offsets,
        (Some(_), Some(_)) => return malformed_error("mp4: both stco and co64 present"),
        (None, None) => return malformed_error("mp4: missing chunk offset atom"),
    };

    if stbl.stsc.entries.is_empty() {
        return malformed_error("mp4: empty stsc atom");
    }

    let mut units = Vec::with_capacity(frames.len());

    let mut entry_idx = 0;
    let mut sample_idx = 0;

    for (chunk_idx, &chunk_offset) in offsets.iter().enumerate() {
        let chunk_number = chunk_idx as u32 + 1;

        // Advance to the sample-to-chunk entry covering this chunk.
        while entry_idx + 1 < stbl.stsc.entries.len()
            && stbl.stsc.entries[entry_idx + 1].first_chunk <= chunk_number
        {
            entry_idx += 1;
        }

        let samples_per_chunk = stbl.stsc.entries[entry_idx].samples_per_chunk;

        if samples_per_chunk == 0 {
            return malformed_error("mp4: zero samples per chunk");
        }

        let mut offset = chunk_offset;

        for _ in 0..samples_per_chunk {
            if sample_idx >= frames.len() {
                return malformed_error("mp4: chunk map describes more samples than exist");
            }

            let size = stbl.stsz.sample_size(sample_idx);

            if offset + u64::from(size) > len {
                return malformed_error("mp4: sample lies outside the file");
            }

            units.push(AuRecord {
                offset,
                size,
                pcm_start: 0,
                pcm_frames: frames[sample_idx],
            });

            offset += u64::from(size);
            sample_idx += 1;
        }
    }

    if sample_idx != frames.len() {
        return malformed_error("mp4: chunk map describes fewer samples than exist");
    }

    Ok(units)
}

/// Derives the leading PCM trim from the track's edit list, if any.
fn leading_frames(trak: &TrakAtom, total_raw: u64) -> Result<u64> {
    let elst = match trak.edts.as_ref().and_then(|edts| edts.elst.as_ref()) {
        Some(elst) => elst,
        None => return Ok(0),
    };

    if elst.entries.len() != 1 {
        return unsupported_error("mp4: complex edit list");
    }

    let entry = &elst.entries[0];

    if entry.media_rate_int != 1 || entry.media_rate_frac != 0 {
        return unsupported_error("mp4: edit with non-unit media rate");
    }

    if entry.media_time < 0 {
        return unsupported_error("mp4: negative edit media time");
    }

    let leading = entry.media_time as u64;

    if leading > total_raw {
        return malformed_error("mp4: edit media time beyond end of stream");
    }

    debug!("mp4: edit list trims {} leading frames", leading);

    Ok(leading)
}
