// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns an iterated grid into pixels.
//!
//! Two laws: a cheap grayscale probe, used only to decide whether a
//! tile has anything in it, and the full color law.  The color law
//! shades the exterior by escape time and the interior by the phase of
//! each point's final value, one phase offset per channel.

use image::{Rgb, RgbImage};
use num::Complex;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::iterate::{is_bounded, EscapeGrid};

/// Grayscale level of a single cell: 0 if it escaped or is not finite,
/// otherwise its magnitude scaled onto 0..=255.
#[inline]
pub fn grayscale(z: Complex<f64>) -> u8 {
    if !is_bounded(z) {
        return 0;
    }
    (z.norm() * 127.999).floor().min(255.0) as u8
}

/// Grayscale probe used for the emptiness test.  Like [`grayscale`],
/// but a bounded cell never reads as 0, even when its orbit has
/// collapsed onto the origin.
#[inline]
pub fn probe_level(z: Complex<f64>) -> u8 {
    if is_bounded(z) {
        grayscale(z).max(1)
    } else {
        0
    }
}

/// True if the probe reads zero everywhere on the grid.
pub fn is_dark(values: &[Complex<f64>]) -> bool {
    values.iter().all(|z| probe_level(*z) == 0)
}

/// The tunable constants of the color law.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Palette {
    /// Brightness given to a point that escaped on the very last
    /// iteration; earlier escapes are proportionally darker.
    pub escape_shade: f64,
    /// Phase offsets, in radians, of the red, green and blue channels.
    pub phase_offsets: [f64; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            escape_shade: 175.0,
            phase_offsets: [0.0, 0.666 * PI, 1.333 * PI],
        }
    }
}

impl Palette {
    /// Color of one cell given its final value, its escape time and
    /// the iteration budget.
    pub fn shade(&self, z: Complex<f64>, escape: u32, iterations: u32) -> Rgb<u8> {
        if escape > 0 || !is_bounded(z) {
            if escape == 0 {
                return Rgb([0, 0, 0]);
            }
            let level = (self.escape_shade * f64::from(escape) / f64::from(iterations.max(1)))
                .max(0.0)
                .min(255.0) as u8;
            return Rgb([level, level, level]);
        }

        let magnitude = z.norm();
        let argument = z.arg();
        let mut channels = [0u8; 3];
        for (channel, offset) in channels.iter_mut().zip(self.phase_offsets.iter()) {
            let weight = 0.5 - 0.25 * (1.0 + (argument - offset).cos());
            *channel = ((1.0 - magnitude * weight) * 255.999).max(0.0).min(255.0) as u8;
        }
        Rgb(channels)
    }

    /// Colors a `size` x `size` grid, row-major from the top row.
    pub fn colorize(&self, grid: &EscapeGrid, size: usize, iterations: u32) -> RgbImage {
        let values = grid.values();
        let escape = grid.escape_times();
        RgbImage::from_fn(size as u32, size as u32, |x, y| {
            let i = (y as usize) * size + (x as usize);
            self.shade(values[i], escape[i], iterations)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterate::ESCAPED;

    #[test]
    fn grayscale_of_non_finite_grid_is_black() {
        let grid = vec![
            Complex::new(std::f64::NAN, 0.0),
            Complex::new(std::f64::INFINITY, 1.0),
            Complex::new(0.0, std::f64::NEG_INFINITY),
            ESCAPED,
        ];
        assert!(grid.iter().all(|z| grayscale(*z) == 0));
        assert!(is_dark(&grid));
    }

    #[test]
    fn grayscale_scales_magnitude() {
        assert_eq!(grayscale(Complex::new(1.0, 0.0)), 127);
        assert_eq!(grayscale(Complex::new(0.0, -2.0)), 255);
        assert_eq!(grayscale(Complex::new(0.0, 0.0)), 0);
        assert_eq!(grayscale(Complex::new(2.1, 0.0)), 0);
    }

    #[test]
    fn probe_keeps_bounded_origin_lit() {
        assert_eq!(probe_level(Complex::new(0.0, 0.0)), 1);
        assert!(!is_dark(&[ESCAPED, Complex::new(0.0, 0.0)]));
    }

    #[test]
    fn exterior_is_shaded_by_escape_time() {
        let palette = Palette::default();
        assert_eq!(palette.shade(ESCAPED, 50, 100), Rgb([87, 87, 87]));
        assert_eq!(palette.shade(ESCAPED, 100, 100), Rgb([175, 175, 175]));
        assert_eq!(palette.shade(ESCAPED, 0, 100), Rgb([0, 0, 0]));
    }

    #[test]
    fn interior_is_shaded_by_phase() {
        let palette = Palette::default();
        assert_eq!(palette.shade(Complex::new(0.0, 0.0), 0, 100), Rgb([255, 255, 255]));

        // On the positive real axis the red channel is in phase, so it
        // keeps full brightness while green and blue dim.
        let Rgb([r, g, b]) = palette.shade(Complex::new(1.0, 0.0), 0, 100);
        assert_eq!(r, 255);
        assert!(g < r && b < r);
    }

    #[test]
    fn colorize_lays_out_rows_from_the_top() {
        let mut grid = EscapeGrid::new(vec![
            Complex::new(0.0, 0.0),
            Complex::new(5.0, 0.0),
            Complex::new(0.0, 0.0),
            Complex::new(0.0, 0.0),
        ]);
        grid.step(Complex::new(0.0, 0.0), 2.0);
        let image = Palette::default().colorize(&grid, 2, 10);
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(*image.get_pixel(1, 0), Rgb([17, 17, 17]));
        assert_eq!(*image.get_pixel(0, 1), Rgb([255, 255, 255]));
    }
}
