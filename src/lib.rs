#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Julia set sequence renderer
//!
//! A Julia set is drawn by taking every point z of a window of the
//! complex plane and repeatedly replacing it with z^p + c for a fixed
//! constant c.  Points that stay small belong to the (filled) Julia
//! set; points that run off to infinity do not, and how quickly they
//! run off shades the picture around it.
//!
//! This crate renders animated sequences of such pictures.  A sequence
//! moves c along a line or an arc, zooms the window toward a point on
//! the edge of the set, or sweeps the exponent p.  Each frame is cut
//! into tiles rendered in parallel and stitched back together.  Before
//! rendering, a cheap low-resolution probe nudges the parameters until
//! the picture is neither empty nor a solid blot.
//!
//! The pieces, leaves first:
//!
//! * [`iterate`]: the escape-time iteration over a grid of points.
//! * [`colors`]: the grayscale probe and the full color law.
//! * [`tile`]: renders one tile and decides whether it is empty.
//! * [`pool`]: renders the tiles of a frame on worker threads.
//! * [`frame`]: stitches tiles into frames.
//! * [`search`]: finds parameters worth rendering.
//! * [`sequence`]: drives the four kinds of sequence.
//! * [`config`], [`manifest`], [`inputs`]: the files a run reads and
//!   writes.

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;

pub mod colors;
pub mod config;
pub mod error;
pub mod frame;
pub mod inputs;
pub mod iterate;
pub mod manifest;
pub mod planes;
pub mod pool;
pub mod search;
pub mod sequence;
pub mod tile;

pub use config::{load, InputFile, Job, Mode};
pub use error::{Error, Result};
pub use frame::OutputLayout;
pub use manifest::{Pauses, Playback};
pub use pool::TilePool;
pub use sequence::{SequenceReport, Sequencer};
