// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a square of pixels with an origin at the top-left corner
//! and a rectangle on the complex plane, and the Viewport, which cuts
//! a square window of the complex plane into a grid of tiles.
//!
//! Pixel rows run downward while the imaginary axis runs upward, so
//! row 0 of every grid holds the most positive imaginary values.

use itertools::iproduct;
use num::Complex;

use crate::error::{Error, Result};

/// Describes the column, row of a pixel inside a tile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Describes the left-lower corner and right-upper corner of a region
/// of the complex plane, treating the real part of each value as the
/// x-component and the imaginary part as the y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

impl ComplexPlane {
    /// Smallest real value covered.
    pub fn left(&self) -> f64 {
        self.0.re
    }

    /// Largest real value covered.
    pub fn right(&self) -> f64 {
        self.1.re
    }

    /// Smallest imaginary value covered.
    pub fn bottom(&self) -> f64 {
        self.0.im
    }

    /// Largest imaginary value covered.
    pub fn top(&self) -> f64 {
        self.1.im
    }
}

/// Identifies one of the split x split tiles of a frame.  Row 0 is the
/// top of the frame, column 0 the left.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileCoord {
    /// Tile row, counted downward from the top of the frame.
    pub row: usize,
    /// Tile column, counted rightward from the left of the frame.
    pub col: usize,
}

impl TileCoord {
    /// Constructor.
    pub fn new(row: usize, col: usize) -> Self {
        TileCoord { row, col }
    }

    /// Pixel offset (x, y) of this tile's top-left corner inside a
    /// frame made of `pixels`-wide tiles.
    pub fn offset(&self, pixels: usize) -> (usize, usize) {
        (self.col * pixels, self.row * pixels)
    }
}

/// The square window [center - radius, center + radius] in both axes,
/// cut into split x split equal tiles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Middle of the window.
    pub center: Complex<f64>,
    /// Half the width of the window.
    pub radius: f64,
    /// Number of tiles along each side.
    pub split: usize,
}

impl Viewport {
    /// Constructor.
    pub fn new(center: Complex<f64>, radius: f64, split: usize) -> Self {
        Viewport {
            center,
            radius,
            split,
        }
    }

    /// Every tile of the window, row-major.
    pub fn tiles(&self) -> Vec<TileCoord> {
        iproduct!(0..self.split, 0..self.split)
            .map(|(row, col)| TileCoord::new(row, col))
            .collect()
    }

    // Edges are computed from the window corner rather than from the
    // neighbouring tile, so adjacent tiles agree exactly on the shared
    // boundary.
    fn edge(&self, index: usize) -> f64 {
        index as f64 * (2.0 * self.radius / self.split as f64)
    }

    /// The region of the complex plane covered by one tile.
    pub fn tile_plane(&self, coord: TileCoord) -> ComplexPlane {
        let left = self.center.re - self.radius;
        let top = self.center.im + self.radius;
        ComplexPlane(
            Complex::new(left + self.edge(coord.col), top - self.edge(coord.row + 1)),
            Complex::new(left + self.edge(coord.col + 1), top - self.edge(coord.row)),
        )
    }
}

/// Contains the definitions of two planes: a square integral plane of
/// pixels, and a region of the complex plane.  Maps pixels from one to
/// the other.
#[derive(Debug)]
pub struct PlaneMapper {
    /// Width and height, in pixels, of the integral plane.
    pub size: usize,
    /// The two corners defining the complex region, left-lower and
    /// right-upper.
    pub complex_plane: ComplexPlane,
    // Pixels per unit along the real and imaginary axes.
    grid_factors: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the side length of the pixel square and the
    /// two corners of the complex region it samples.
    pub fn new(size: usize, plane: ComplexPlane) -> Result<PlaneMapper> {
        let ComplexPlane(leftlower, rightupper) = plane;
        if !(rightupper.re > leftlower.re) {
            return Err(Error::Config(
                "The left lower corner is not to the left of the right upper corner.".to_string(),
            ));
        }

        if !(rightupper.im > leftlower.im) {
            return Err(Error::Config(
                "The left lower corner is not lower than the right upper corner".to_string(),
            ));
        }

        let grid_factors = (
            (size as f64) / (rightupper.re - leftlower.re),
            (size as f64) / (rightupper.im - leftlower.im),
        );

        Ok(PlaneMapper {
            size,
            complex_plane: plane,
            grid_factors,
        })
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.size * self.size
    }

    /// Describes that the integral plane has no pixels.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Given a pixel, map it to the point of the complex plane at its
    /// top-left corner.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.complex_plane.left() + (pixel.0 as f64) / self.grid_factors.0,
            self.complex_plane.top() - (pixel.1 as f64) / self.grid_factors.1,
        )
    }

    /// Every pixel's point, row-major from the top row.
    pub fn grid(&self) -> Vec<Complex<f64>> {
        iproduct!(0..self.size, 0..self.size)
            .map(|(row, column)| self.pixel_to_point(&Pixel(column, row)))
            .collect()
    }
}
