// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Searches for parameters worth rendering.
//!
//! Every search follows the same shape: render a cheap low-resolution
//! probe of all tiles, judge it, adjust the candidate, repeat.  A
//! constant is degenerate when every tile of its probe is black; the
//! fix is to pull it toward the origin, where the Julia set is never
//! empty.  A zoom center is acceptable when its probe is partly black
//! and partly not, i.e. it sits on the edge of the set.
//!
//! Each loop gives up with [`Error::NoInterestingRegion`] after
//! `max_attempts` adjustments.

use num::Complex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::planes::Viewport;
use crate::pool::TilePool;
use crate::tile::RenderParams;

/// Knobs of the search loops.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchSettings {
    /// Side length, in pixels, of a probe tile.
    pub probe_pixels: usize,
    /// Factor applied to a degenerate constant (or arc radius) before
    /// the next probe.
    pub contraction: f64,
    /// Adjustments tried before a search gives up.
    pub max_attempts: usize,
    /// Initial proportion by which the zoom center is moved.
    pub center_step: f64,
    /// Probe radius for the zoom center, as a fraction of the starting
    /// zoom radius.
    pub center_probe_scale: f64,
    /// Iteration budget of the zoom-mode probes.
    pub zoom_probe_iterations: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            probe_pixels: 10,
            contraction: 0.975,
            max_attempts: 1000,
            center_step: 0.25,
            center_probe_scale: 0.25,
            zoom_probe_iterations: 50,
        }
    }
}

/// A value a search settled on, and how many adjustments it took.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Found<T> {
    /// The accepted value.
    pub value: T,
    /// Adjustments made before it was accepted; 0 if the starting value
    /// was accepted as is.
    pub attempts: usize,
}

/// Renders low-resolution previews for the search loops.
pub struct Probe<'a> {
    pool: &'a TilePool,
    template: RenderParams,
}

impl<'a> Probe<'a> {
    /// A probe that renders like `template`, but with tiles of
    /// `settings.probe_pixels` pixels.
    pub fn new(pool: &'a TilePool, template: RenderParams, settings: &SearchSettings) -> Self {
        Probe {
            pool,
            template: RenderParams {
                pixels: settings.probe_pixels,
                ..template
            },
        }
    }

    /// The same probe with another iteration budget.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.template.iterations = iterations;
        self
    }

    /// Black flag of every tile for the given constant and window.
    pub fn blacks(&self, constant: Complex<f64>, viewport: Viewport) -> Result<Vec<bool>> {
        let params = RenderParams {
            constant,
            viewport,
            ..self.template
        };
        self.pool.probe(&params, &viewport.tiles())
    }

    /// True if every tile of the window is black.
    pub fn is_degenerate(&self, constant: Complex<f64>, viewport: Viewport) -> Result<bool> {
        Ok(self.blacks(constant, viewport)?.iter().all(|black| *black))
    }

    /// The window the probe was built for.
    pub fn viewport(&self) -> Viewport {
        self.template.viewport
    }
}

// Shrinks `start` by `contraction` until `degenerate` says no.
fn contract<T, D, S>(
    settings: &SearchSettings,
    search: &'static str,
    start: T,
    mut degenerate: D,
    shrink: S,
) -> Result<Found<T>>
where
    T: Copy + std::fmt::Debug,
    D: FnMut(T) -> Result<bool>,
    S: Fn(T, f64) -> T,
{
    let mut value = start;
    for attempts in 0..=settings.max_attempts {
        if !degenerate(value)? {
            return Ok(Found { value, attempts });
        }
        debug!(search, attempts, ?value, "degenerate, contracting");
        value = shrink(value, settings.contraction);
    }
    Err(Error::NoInterestingRegion {
        search,
        attempts: settings.max_attempts,
    })
}

/// Pulls `constant` toward the origin until the probe window is not
/// entirely black.  A constant that is already fine comes back
/// unchanged.
pub fn find_constant(
    probe: &Probe,
    constant: Complex<f64>,
    settings: &SearchSettings,
) -> Result<Found<Complex<f64>>> {
    let viewport = probe.viewport();
    contract(
        settings,
        "constant",
        constant,
        |c| probe.is_degenerate(c, viewport),
        |c, k| c * k,
    )
}

/// Shrinks the radius of the constant `radius * e^(i angle)` until the
/// probe window is not entirely black.  The angle never changes.
pub fn find_arc_radius(
    probe: &Probe,
    radius: f64,
    angle: f64,
    settings: &SearchSettings,
) -> Result<Found<f64>> {
    let viewport = probe.viewport();
    contract(
        settings,
        "arc radius",
        radius,
        |r| probe.is_degenerate(Complex::from_polar(&r, &angle), viewport),
        |r, k| r * k,
    )
}

// Position and damping state of the zoom center search.
#[derive(Copy, Clone, Debug, PartialEq)]
struct CenterHunt {
    center: Complex<f64>,
    step: f64,
    pulled: bool,
    pushed: bool,
}

impl CenterHunt {
    fn new(center: Complex<f64>, step: f64) -> Self {
        CenterHunt {
            center,
            step,
            pulled: false,
            pushed: false,
        }
    }

    // Pushes the center out of a window with no black tile, pulls it in
    // from an all-black one.  Moving both ways halves the step.
    fn adjust(&mut self, inside: bool) {
        if inside {
            self.center = self.center * (1.0 + self.step);
            self.pushed = true;
        } else {
            self.center = self.center * (1.0 - self.step);
            self.pulled = true;
        }
        if self.pushed && self.pulled {
            self.step /= 2.0;
            self.pushed = false;
            self.pulled = false;
        }
    }
}

/// Moves `center` along the line through the origin until a window of
/// `radius` around it is partly black and partly not.
///
/// An all-black window is outside the set and the center is pulled in;
/// a window with no black tile is inside it and the center is pushed
/// out.  Once the center has moved both ways the step is halved.
pub fn find_center(
    probe: &Probe,
    constant: Complex<f64>,
    center: Complex<f64>,
    radius: f64,
    settings: &SearchSettings,
) -> Result<Found<Complex<f64>>> {
    let split = probe.viewport().split;
    let mut hunt = CenterHunt::new(center, settings.center_step);

    for attempts in 0..=settings.max_attempts {
        let blacks = probe.blacks(constant, Viewport::new(hunt.center, radius, split))?;
        let some_black = blacks.iter().any(|black| *black);
        let some_color = !blacks.iter().all(|black| *black);
        if some_black && some_color {
            return Ok(Found {
                value: hunt.center,
                attempts,
            });
        }

        hunt.adjust(some_color);
        debug!(attempts, center = ?hunt.center, step = hunt.step, "adjusting zoom center");
    }

    Err(Error::NoInterestingRegion {
        search: "zoom center",
        attempts: settings.max_attempts,
    })
}
