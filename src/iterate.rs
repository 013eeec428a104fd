// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time iteration z -> z^p + c over a grid of points.
//!
//! Every cell is independent.  Once a cell's magnitude passes the
//! escape radius it is pinned to [`ESCAPED`] and never updated again,
//! and the iteration at which that happened is recorded.  Values that
//! stop being finite (overflow, or zero raised to a negative power) are
//! counted as escaping at that iteration.

use num::Complex;

/// Magnitude past which a point is known to run off to infinity.
pub const ESCAPE_RADIUS: f64 = 2.0;

/// Sentinel stored in a cell once it has escaped.
pub const ESCAPED: Complex<f64> = Complex {
    re: std::f64::INFINITY,
    im: 0.0,
};

/// True if `z` is finite and no further from the origin than the
/// escape radius.
#[inline]
pub fn is_bounded(z: Complex<f64>) -> bool {
    z.re.is_finite() && z.im.is_finite() && z.norm() <= ESCAPE_RADIUS
}

/// Raise `z` to `power`, by repeated multiplication when the exponent
/// is a small positive integer.
#[inline]
pub fn raise(z: Complex<f64>, power: f64) -> Complex<f64> {
    if power == 2.0 {
        z * z
    } else if power >= 1.0 && power <= 16.0 && power.fract() == 0.0 {
        let mut acc = z;
        for _ in 1..(power as u32) {
            acc = acc * z;
        }
        acc
    } else {
        z.powf(power)
    }
}

/// A grid of points under iteration, with the escape time of each.
#[derive(Clone, Debug)]
pub struct EscapeGrid {
    values: Vec<Complex<f64>>,
    escape: Vec<u32>,
    iteration: u32,
    remaining: usize,
}

impl EscapeGrid {
    /// Starts the iteration from the given points.  No point has
    /// escaped yet, whatever its magnitude.
    pub fn new(values: Vec<Complex<f64>>) -> Self {
        let remaining = values.len();
        EscapeGrid {
            escape: vec![0; values.len()],
            values,
            iteration: 0,
            remaining,
        }
    }

    /// Applies one iteration to every cell that has not escaped.
    pub fn step(&mut self, c: Complex<f64>, power: f64) {
        self.iteration += 1;
        let iteration = self.iteration;
        let mut escaped = 0;
        for (z, escape) in self.values.iter_mut().zip(self.escape.iter_mut()) {
            if *escape != 0 {
                continue;
            }
            let next = raise(*z, power) + c;
            if is_bounded(next) {
                *z = next;
            } else {
                *z = ESCAPED;
                *escape = iteration;
                escaped += 1;
            }
        }
        self.remaining -= escaped;
    }

    /// Number of iterations applied so far.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Current value of every cell.  Escaped cells hold [`ESCAPED`].
    pub fn values(&self) -> &[Complex<f64>] {
        &self.values
    }

    /// Iteration at which each cell escaped, or 0 if it has not.
    pub fn escape_times(&self) -> &[u32] {
        &self.escape
    }

    /// True once no cell is left to iterate.
    pub fn all_escaped(&self) -> bool {
        self.remaining == 0
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for a grid with no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_time_is_first_crossing() {
        // 1.5 -> 2.25 escapes on the first step, 1.1 takes three:
        // 1.21, 1.4641, 2.1436...
        let mut grid = EscapeGrid::new(vec![Complex::new(1.5, 0.0), Complex::new(1.1, 0.0)]);
        let zero = Complex::new(0.0, 0.0);
        grid.step(zero, 2.0);
        assert_eq!(grid.escape_times(), &[1, 0]);
        grid.step(zero, 2.0);
        grid.step(zero, 2.0);
        assert_eq!(grid.escape_times(), &[1, 3]);
        for _ in 0..10 {
            grid.step(zero, 2.0);
        }
        assert_eq!(grid.escape_times(), &[1, 3]);
        assert!(grid.all_escaped());
        assert_eq!(grid.values()[0], ESCAPED);
    }

    #[test]
    fn origin_never_escapes_for_zero_constant() {
        let mut grid = EscapeGrid::new(vec![Complex::new(0.0, 0.0), Complex::new(0.5, 0.5)]);
        for _ in 0..200 {
            grid.step(Complex::new(0.0, 0.0), 2.0);
        }
        assert_eq!(grid.escape_times(), &[0, 0]);
        assert!(!grid.all_escaped());
        assert_eq!(grid.iteration(), 200);
    }

    #[test]
    fn non_finite_values_count_as_escaped() {
        let mut grid = EscapeGrid::new(vec![Complex::new(0.0, 0.0), Complex::new(0.5, 0.0)]);
        grid.step(Complex::new(0.0, 0.0), -1.0);
        assert_eq!(grid.escape_times()[0], 1);
        assert_eq!(grid.values()[0], ESCAPED);
        assert_eq!(grid.escape_times()[1], 0);
        assert!((grid.values()[1] - Complex::new(2.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn integer_powers_match_general_power() {
        let z = Complex::new(0.3, -0.7);
        for p in 1..6 {
            let fast = raise(z, p as f64);
            let slow = z.powf(p as f64);
            assert!((fast - slow).norm() < 1e-12);
        }
    }

    #[test]
    fn boundedness_uses_escape_radius() {
        assert!(is_bounded(Complex::new(2.0, 0.0)));
        assert!(!is_bounded(Complex::new(2.0, 0.1)));
        assert!(!is_bounded(Complex::new(std::f64::NAN, 0.0)));
        assert!(!is_bounded(ESCAPED));
    }
}
