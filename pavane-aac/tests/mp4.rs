// Pavane
// Copyright (c) 2026 The Project Pavane Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::{Read, Seek, SeekFrom};

use pavane_aac::{open, ContainerKind, Error};

mod common;

use common::{Mp4Layout, ToneSyntax};

fn five_unit_layout() -> Mp4Layout {
    Mp4Layout::stereo_44k(
        vec![9, 10, 11, 12, 13],
        vec![(5, 1024)],
        vec![3, 2],
    )
}

fn read_all(reader: &mut pavane_aac::PcmReader) -> Vec<u8> {
    let mut all = Vec::new();
    reader.read_to_end(&mut all).unwrap();
    all
}

#[test]
fn indexes_chunked_samples() {
    let file = five_unit_layout().build();
    let reader = open(file, "test.m4a", Box::new(ToneSyntax)).unwrap();

    let info = reader.info();
    assert_eq!(info.container, ContainerKind::Mp4);
    assert_eq!(info.sample_rate, 44100);
    assert_eq!(info.channels, 2);
    assert_eq!(info.pcm_byte_len, 5 * 1024 * 4);

    let container = reader.container();
    assert_eq!(container.units.len(), 5);

    // Sizes follow the sample size table; offsets are contiguous within chunks.
    assert_eq!(container.units[0].size, 9);
    assert_eq!(container.units[1].offset, container.units[0].offset + 9);
    assert_eq!(container.units[2].offset, container.units[1].offset + 10);
    // The second chunk restarts at its own offset.
    assert_eq!(container.units[3].offset, container.units[2].offset + 11);
}

#[test]
fn tail_sample_may_run_short() {
    let mut layout = five_unit_layout();
    layout.stts = vec![(4, 1024), (1, 377)];

    let mut reader = open(layout.build(), "book.m4b", Box::new(ToneSyntax)).unwrap();

    let expected = (4 * 1024 + 377) * 4;
    assert_eq!(reader.info().pcm_byte_len, expected);

    let all = read_all(&mut reader);
    assert_eq!(all.len() as u64, expected);

    // Asking for more after the exact end returns a clean end of stream.
    let mut buf = [0u8; 1024];
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
}

#[test]
fn seek_into_short_tail_ends_at_length() {
    let mut layout = five_unit_layout();
    layout.stts = vec![(4, 1024), (1, 377)];

    let mut reader = open(layout.build(), "book.m4b", Box::new(ToneSyntax)).unwrap();
    let len = reader.info().pcm_byte_len;

    reader.seek(SeekFrom::Start(len - 40)).unwrap();

    let mut tail = Vec::new();
    reader.read_to_end(&mut tail).unwrap();
    assert_eq!(tail.len(), 40);
}

#[test]
fn edit_list_trims_leading_frames() {
    let trimmed = {
        let mut layout = five_unit_layout();
        layout.media_time = Some(1024);
        layout.build()
    };
    let untrimmed = five_unit_layout().build();

    let mut trimmed_reader = open(trimmed, "test.m4a", Box::new(ToneSyntax)).unwrap();
    let mut untrimmed_reader = open(untrimmed, "test.m4a", Box::new(ToneSyntax)).unwrap();

    let container = trimmed_reader.container();
    assert_eq!(container.leading, 1024);
    assert_eq!(container.total_visible, container.total_raw - 1024);

    let visible = read_all(&mut trimmed_reader);
    let raw = read_all(&mut untrimmed_reader);

    // The visible stream is the raw stream with the first 1024 frames cut off.
    assert_eq!(visible.len(), raw.len() - 1024 * 4);
    assert_eq!(&visible[..], &raw[1024 * 4..]);

    // Seeking back to zero reproduces the same bytes.
    trimmed_reader.seek(SeekFrom::Start(0)).unwrap();
    let mut replay = vec![0u8; 4096];
    trimmed_reader.read_exact(&mut replay).unwrap();
    assert_eq!(&replay[..], &visible[..4096]);
}

#[test]
fn seek_matches_continuous_decode() {
    let mut layout = five_unit_layout();
    layout.media_time = Some(500);

    let mut reader = open(layout.build(), "test.m4a", Box::new(ToneSyntax)).unwrap();
    let all = read_all(&mut reader);

    for &byte in &[0u64, 2048, 4096, 9000, 16_384] {
        let byte = byte - byte % 4;

        reader.seek(SeekFrom::Start(byte)).unwrap();

        let mut tail = Vec::new();
        reader.read_to_end(&mut tail).unwrap();

        assert_eq!(&tail[..], &all[byte as usize..], "mismatch after seek to {}", byte);
    }
}

#[test]
fn repeated_seek_cycle_is_stable() {
    let mut reader = open(five_unit_layout().build(), "book.m4b", Box::new(ToneSyntax)).unwrap();

    let mut reference = vec![0u8; 4096];
    reader.read_exact(&mut reference).unwrap();

    for _ in 0..5 {
        reader.seek(SeekFrom::Start(0)).unwrap();

        let mut buf = vec![0u8; 4096];
        reader.read_exact(&mut buf).unwrap();

        assert_eq!(buf, reference);
    }
}

#[test]
fn rejects_fragmented_stream() {
    let mut file = five_unit_layout().build();

    // A movie fragment at top level marks the file fragmented.
    file.extend_from_slice(&[0, 0, 0, 8]);
    file.extend_from_slice(b"moof");

    assert!(matches!(
        open(file, "test.m4a", Box::new(ToneSyntax)),
        Err(Error::Unsupported(_))
    ));
}

#[test]
fn rejects_encrypted_sample_entry() {
    let mut file = five_unit_layout().build();

    // Rewrite the sample entry fourcc to its encrypted variant.
    let pos = find(&file, b"mp4a").unwrap();
    file[pos..pos + 4].copy_from_slice(b"enca");

    assert!(matches!(
        open(file, "test.m4a", Box::new(ToneSyntax)),
        Err(Error::Unsupported(_))
    ));
}

#[test]
fn rejects_multiple_sample_descriptions() {
    let mut file = five_unit_layout().build();

    // Bump the stsd entry count; the single entry present is still parsed.
    let pos = find(&file, b"stsd").unwrap();
    file[pos + 8..pos + 12].copy_from_slice(&2u32.to_be_bytes());

    assert!(matches!(
        open(file, "test.m4a", Box::new(ToneSyntax)),
        Err(Error::Unsupported(_))
    ));
}

#[test]
fn rejects_bad_sample_durations() {
    // A non-tail entry with a short delta.
    let mut layout = five_unit_layout();
    layout.stts = vec![(1, 500), (4, 1024)];
    assert!(matches!(
        open(layout.build(), "test.m4a", Box::new(ToneSyntax)),
        Err(Error::Unsupported(_))
    ));

    // A short tail spanning more than one sample.
    let mut layout = five_unit_layout();
    layout.stts = vec![(3, 1024), (2, 500)];
    assert!(matches!(
        open(layout.build(), "test.m4a", Box::new(ToneSyntax)),
        Err(Error::Unsupported(_))
    ));

    // A delta above the frame length.
    let mut layout = five_unit_layout();
    layout.stts = vec![(4, 1024), (1, 2048)];
    assert!(matches!(
        open(layout.build(), "test.m4a", Box::new(ToneSyntax)),
        Err(Error::Unsupported(_))
    ));
}

#[test]
fn rejects_mismatched_sample_tables() {
    // Six durations for five sizes.
    let mut layout = five_unit_layout();
    layout.stts = vec![(6, 1024)];

    assert!(matches!(
        open(layout.build(), "test.m4a", Box::new(ToneSyntax)),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn rejects_non_unit_edit_rate() {
    let mut layout = five_unit_layout();
    layout.media_time = Some(0);
    let mut file = layout.build();

    // The integer media rate sits at the end of the single edit list entry.
    let pos = find(&file, b"elst").unwrap();
    file[pos + 20..pos + 22].copy_from_slice(&2u16.to_be_bytes());

    assert!(matches!(
        open(file, "test.m4a", Box::new(ToneSyntax)),
        Err(Error::Unsupported(_))
    ));
}

#[test]
fn rejects_edit_beyond_stream() {
    let mut layout = five_unit_layout();
    layout.media_time = Some(5 * 1024 + 1);

    assert!(matches!(
        open(layout.build(), "test.m4a", Box::new(ToneSyntax)),
        Err(Error::Malformed(_))
    ));
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
