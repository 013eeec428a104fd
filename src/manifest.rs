// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The files a run leaves for packaging: a frame list in the format of
//! ffmpeg's concat demuxer, and a caption.
//!
//! The frame list only ever refers to frames that were assembled.  The
//! ends of the sequence are held by repeating a frame.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::frame::OutputLayout;

/// Order in which the frames are played back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Playback {
    /// First to last.
    Forward,
    /// Last to first.
    Reverse,
    /// First to last and back again.
    Loop,
}

impl FromStr for Playback {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "forward" => Ok(Playback::Forward),
            "reverse" => Ok(Playback::Reverse),
            "loop" => Ok(Playback::Loop),
            _ => Err(Error::Config(format!("unknown playback order {}", s))),
        }
    }
}

/// How many times the end frames are repeated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pauses {
    /// Repeats of the frame the sequence starts (and, looping, ends) on.
    pub start: usize,
    /// Repeats of the frame at the far end.
    pub turn: usize,
}

impl Default for Pauses {
    fn default() -> Self {
        Pauses { start: 20, turn: 10 }
    }
}

/// Frame indices in playback order, pauses included.
pub fn playback_order(frames: &[usize], playback: Playback, pauses: Pauses) -> Vec<usize> {
    let (first, last) = match (frames.first(), frames.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return vec![],
    };

    let mut order = Vec::new();
    if playback != Playback::Reverse {
        order.extend(std::iter::repeat(first).take(pauses.start));
        order.extend(frames.iter().cloned());
        order.extend(std::iter::repeat(last).take(pauses.turn));
    }
    if playback != Playback::Forward {
        order.extend(std::iter::repeat(last).take(pauses.turn));
        order.extend(frames.iter().rev().cloned());
        order.extend(std::iter::repeat(first).take(pauses.start));
    }
    order
}

/// The manifest text for the given playback order.
pub fn render_manifest(layout: &OutputLayout, order: &[usize]) -> String {
    order
        .iter()
        .map(|frame| format!("file '{}'\n", layout.frame_reference(*frame)))
        .collect()
}

/// Writes the manifest for `frames` and returns its path.
pub fn write_manifest(
    layout: &OutputLayout,
    frames: &[usize],
    playback: Playback,
    pauses: Pauses,
) -> Result<PathBuf> {
    let path = layout.manifest_path();
    let order = playback_order(frames, playback, pauses);
    fs::write(&path, render_manifest(layout, &order))?;
    Ok(path)
}

/// Writes the caption and returns its path.
pub fn write_caption(layout: &OutputLayout, caption: &str) -> Result<PathBuf> {
    let path = layout.caption_path();
    fs::write(&path, caption)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SHORT: Pauses = Pauses { start: 2, turn: 1 };

    #[test]
    fn forward_pauses_at_both_ends() {
        let order = playback_order(&[0, 1, 3], Playback::Forward, SHORT);
        assert_eq!(order, vec![0, 0, 0, 1, 3, 3]);
    }

    #[test]
    fn reverse_runs_backwards() {
        let order = playback_order(&[0, 1, 3], Playback::Reverse, SHORT);
        assert_eq!(order, vec![3, 3, 1, 0, 0, 0]);
    }

    #[test]
    fn loop_goes_there_and_back() {
        let order = playback_order(&[0, 1, 2], Playback::Loop, SHORT);
        assert_eq!(order, vec![0, 0, 0, 1, 2, 2, 2, 2, 1, 0, 0, 0]);
    }

    #[test]
    fn default_pauses() {
        let order = playback_order(&[0, 1, 2], Playback::Loop, Pauses::default());
        assert_eq!(order.len(), 20 + 3 + 10 + 10 + 3 + 20);
        assert!(order[..20].iter().all(|f| *f == 0));
        assert!(order[23..43].iter().all(|f| *f == 2));
    }

    #[test]
    fn nothing_assembled_means_empty_manifest() {
        assert!(playback_order(&[], Playback::Loop, Pauses::default()).is_empty());
    }

    #[test]
    fn playback_parses() {
        assert_eq!("loop".parse::<Playback>().unwrap(), Playback::Loop);
        assert_eq!("reverse".parse::<Playback>().unwrap(), Playback::Reverse);
        assert!("sideways".parse::<Playback>().is_err());
    }

    #[test]
    fn files_are_written_at_the_root() {
        let dir = tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let manifest = write_manifest(&layout, &[4], Playback::Forward, SHORT).unwrap();
        assert_eq!(
            fs::read_to_string(manifest).unwrap(),
            "file 'images/frame4.png'\n".repeat(4)
        );
        let caption = write_caption(&layout, "hello").unwrap();
        assert_eq!(fs::read_to_string(caption).unwrap(), "hello");
    }
}
