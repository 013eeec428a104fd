// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error type shared by every stage of the renderer.

use failure::Fail;
use std::io;

/// Everything that can stop a sequence from being produced.
#[derive(Debug, Fail)]
pub enum Error {
    /// The input file was readable but described an impossible job.
    /// Always reported before any rendering starts.
    #[fail(display = "invalid configuration: {}", _0)]
    Config(String),

    /// A search loop ran out of attempts without finding parameters
    /// whose preview was neither solid nor empty.
    #[fail(
        display = "no interesting parameters found by the {} search after {} attempts",
        search, attempts
    )]
    NoInterestingRegion {
        /// Which search gave up.
        search: &'static str,
        /// How many adjustments were tried.
        attempts: usize,
    },

    /// Filesystem failure while reading input or writing images.
    #[fail(display = "I/O error: {}", _0)]
    Io(#[fail(cause)] io::Error),

    /// Encoding or decoding a tile or frame image failed.
    #[fail(display = "image error: {}", _0)]
    Image(#[fail(cause)] image::ImageError),

    /// The input file was not valid JSON for a job description.
    #[fail(display = "could not parse input: {}", _0)]
    Json(#[fail(cause)] serde_json::Error),

    /// A tile worker thread panicked; the frame it belonged to is lost.
    #[fail(display = "a tile worker panicked")]
    WorkerPanic,
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
