// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Drives a whole sequence: searches for good starting parameters,
//! lays out the per-frame path, then renders and assembles the frames
//! one after another.
//!
//! Frames are never pipelined.  All tiles of a frame are rendered and
//! stitched before the next frame starts, since a frame's tile files
//! share names with the next frame's.

use num::Complex;
use std::f64::consts::PI;
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::config::{Job, Mode};
use crate::error::Result;
use crate::frame::{assemble, OutputLayout};
use crate::planes::Viewport;
use crate::pool::TilePool;
use crate::search::{find_arc_radius, find_center, find_constant, Probe};
use crate::tile::RenderParams;

/// `n` evenly spaced values from `start` to `end` inclusive.  A single
/// value is just `start`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Constants on the straight line from `start` to `end`.
pub fn linear_path(start: Complex<f64>, end: Complex<f64>, frames: usize) -> Vec<Complex<f64>> {
    linspace(start.re, end.re, frames)
        .into_iter()
        .zip(linspace(start.im, end.im, frames))
        .map(|(re, im)| Complex::new(re, im))
        .collect()
}

/// Constants of modulus `radius` whose argument sweeps half a turn from
/// `angle`.
pub fn arc_path(radius: f64, angle: f64, frames: usize) -> Vec<Complex<f64>> {
    linspace(angle, angle + PI, frames)
        .into_iter()
        .map(|theta| Complex::from_polar(&radius, &theta))
        .collect()
}

/// Window half-widths that start at `start` and change by a constant
/// factor per frame, chosen so that `start * factor^frames == end`.
pub fn zoom_radii(start: f64, end: f64, frames: usize) -> Vec<f64> {
    let factor = (end / start).powf(1.0 / frames as f64);
    (0..frames)
        .map(|frame| start * factor.powi(frame as i32))
        .collect()
}

/// Exponents from `min` to `max`.
pub fn power_path(min: f64, max: f64, frames: usize) -> Vec<f64> {
    linspace(min, max, frames)
}

/// Formats a complex number as `re + |im|i` with two decimals.
pub fn format_complex(z: Complex<f64>) -> String {
    let sign = if z.im >= 0.0 { '+' } else { '-' };
    format!("{:.2} {} {:.2}i", z.re, sign, z.im.abs())
}

/// Parameters of one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FramePlan {
    /// The constant c.
    pub constant: Complex<f64>,
    /// The exponent p.
    pub power: f64,
    /// The window.
    pub viewport: Viewport,
}

/// What a finished run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceReport {
    /// Indices of the frames that were assembled, in order.
    pub frames: Vec<usize>,
    /// Path of every assembled frame, parallel to `frames`.
    pub frame_paths: Vec<PathBuf>,
    /// One-sentence description of the run.
    pub caption: String,
    /// The per-frame parameters actually used.
    pub plan: Vec<FramePlan>,
}

/// Runs one job against one output directory.
pub struct Sequencer<'a> {
    job: &'a Job,
    layout: &'a OutputLayout,
    pool: TilePool,
}

impl<'a> Sequencer<'a> {
    /// A sequencer rendering with `pool`.
    pub fn new(job: &'a Job, layout: &'a OutputLayout, pool: TilePool) -> Self {
        Sequencer { job, layout, pool }
    }

    /// Runs the job's mode to completion.
    pub fn run(&self) -> Result<SequenceReport> {
        self.layout.prepare()?;
        match self.job.mode {
            Mode::Linear { end } => self.linear(end),
            Mode::Radial { radius, angle } => self.radial(radius, angle),
            Mode::Zoom { center, start, end } => self.zoom(center, start, end),
            Mode::Power { min, max } => self.power(min, max),
        }
    }

    fn origin_view(&self, radius: f64) -> Viewport {
        Viewport::new(Complex::new(0.0, 0.0), radius, self.job.split)
    }

    fn params(&self, plan: &FramePlan) -> RenderParams {
        RenderParams {
            constant: plan.constant,
            power: plan.power,
            viewport: plan.viewport,
            iterations: self.job.iterations,
            pixels: self.job.pixels,
            palette: self.job.palette,
        }
    }

    fn probe(&self, viewport: Viewport, power: f64) -> Probe {
        let template = RenderParams {
            constant: self.job.constant,
            power,
            viewport,
            iterations: self.job.iterations,
            pixels: self.job.pixels,
            palette: self.job.palette,
        };
        Probe::new(&self.pool, template, &self.job.search)
    }

    /// Renders every frame of `plan` in order, returning the indices
    /// and paths of those that were assembled.
    pub fn render_frames(&self, plan: &[FramePlan]) -> Result<(Vec<usize>, Vec<PathBuf>)> {
        let images = self.layout.images_dir();
        let (mut frames, mut paths) = (Vec::new(), Vec::new());
        for (index, frame) in plan.iter().enumerate() {
            let params = self.params(frame);
            let tiles = params.viewport.tiles();
            let outcomes = self.pool.render(&params, &tiles, Some(images.as_path()))?;
            let all_black = outcomes.iter().all(|(_, outcome)| outcome.is_black());
            if all_black && !self.job.assemble_empty {
                info!(frame = index, "every tile empty, frame skipped");
                continue;
            }
            let path = assemble(self.layout, index, &outcomes, &params)?;
            info!(frame = index, total = plan.len(), "frame assembled");
            frames.push(index);
            paths.push(path);
        }
        Ok((frames, paths))
    }

    fn finish(&self, plan: Vec<FramePlan>, caption: String) -> Result<SequenceReport> {
        let (frames, frame_paths) = self.render_frames(&plan)?;
        Ok(SequenceReport {
            frames,
            frame_paths,
            caption,
            plan,
        })
    }

    #[instrument(skip_all, fields(frames = self.job.frames))]
    fn linear(&self, end: Complex<f64>) -> Result<SequenceReport> {
        let view = self.origin_view(self.job.radius);
        let probe = self.probe(view, self.job.power);
        let start = find_constant(&probe, self.job.constant, &self.job.search)?;
        let end = find_constant(&probe, end, &self.job.search)?;
        info!(
            start_attempts = start.attempts,
            end_attempts = end.attempts,
            "path endpoints found"
        );

        let plan = linear_path(start.value, end.value, self.job.frames)
            .into_iter()
            .map(|constant| FramePlan {
                constant,
                power: self.job.power,
                viewport: view,
            })
            .collect();
        let caption = format!(
            "Images generated using constants on a straight path from {} to {}.",
            format_complex(start.value),
            format_complex(end.value)
        );
        self.finish(plan, caption)
    }

    #[instrument(skip_all, fields(frames = self.job.frames))]
    fn radial(&self, radius: f64, angle: f64) -> Result<SequenceReport> {
        let view = self.origin_view(self.job.radius);
        let probe = self.probe(view, self.job.power);
        let radius = find_arc_radius(&probe, radius, angle, &self.job.search)?;
        info!(attempts = radius.attempts, radius = radius.value, "arc radius found");

        let plan = arc_path(radius.value, angle, self.job.frames)
            .into_iter()
            .map(|constant| FramePlan {
                constant,
                power: self.job.power,
                viewport: view,
            })
            .collect();
        let caption = format!(
            "Images generated using constants on a circular arc of radius {:.2}.",
            radius.value
        );
        self.finish(plan, caption)
    }

    #[instrument(skip_all, fields(frames = self.job.frames))]
    fn zoom(&self, center: Complex<f64>, start: f64, end: f64) -> Result<SequenceReport> {
        let settings = &self.job.search;
        let probe = self
            .probe(self.origin_view(start), self.job.power)
            .with_iterations(settings.zoom_probe_iterations);
        let constant = find_constant(&probe, self.job.constant, settings)?;
        info!(attempts = constant.attempts, "appropriate constant found");

        let center = find_center(
            &probe,
            constant.value,
            center,
            settings.center_probe_scale * start,
            settings,
        )?;
        info!(attempts = center.attempts, "center point found");

        let plan = zoom_radii(start, end, self.job.frames)
            .into_iter()
            .map(|radius| FramePlan {
                constant: constant.value,
                power: self.job.power,
                viewport: Viewport::new(center.value, radius, self.job.split),
            })
            .collect();
        let caption = format!(
            "Image generated using c = {} centered at the point {}.",
            format_complex(constant.value),
            format_complex(center.value)
        );
        self.finish(plan, caption)
    }

    #[instrument(skip_all, fields(frames = self.job.frames))]
    fn power(&self, min: f64, max: f64) -> Result<SequenceReport> {
        let view = self.origin_view(self.job.radius);
        let probe = self.probe(view, min);
        let constant = find_constant(&probe, self.job.constant, &self.job.search)?;
        info!(attempts = constant.attempts, "appropriate constant found");

        let plan = power_path(min, max, self.job.frames)
            .into_iter()
            .map(|power| FramePlan {
                constant: constant.value,
                power,
                viewport: view,
            })
            .collect();
        let caption = format!(
            "Images generated using c = {} with exponents from {:.2} to {:.2}.",
            format_complex(constant.value),
            min,
            max
        );
        self.finish(plan, caption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_hits_both_ends() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(2.0, 3.0, 0).is_empty());
    }

    #[test]
    fn linear_path_is_evenly_spaced() {
        let start = Complex::new(-0.5, 0.25);
        let end = Complex::new(0.3, -0.45);
        let path = linear_path(start, end, 9);
        assert_eq!(path.len(), 9);
        assert_eq!(path[0], start);
        assert_eq!(path[8], end);
        let step = path[1] - path[0];
        for pair in path.windows(2) {
            assert!((pair[1] - pair[0] - step).norm() < 1e-12);
        }
    }

    #[test]
    fn arc_path_turns_half_way_round() {
        let path = arc_path(0.7, 0.4, 5);
        assert_eq!(path.len(), 5);
        for c in &path {
            assert!((c.norm() - 0.7).abs() < 1e-12);
        }
        assert!((path[0].arg() - 0.4).abs() < 1e-12);
        assert!((path[4] + path[0]).norm() < 1e-12);
    }

    #[test]
    fn zoom_radii_are_geometric() {
        let radii = zoom_radii(1.5, 1e-3, 10);
        assert_eq!(radii.len(), 10);
        assert_eq!(radii[0], 1.5);
        let factor = radii[1] / radii[0];
        for pair in radii.windows(2) {
            assert!((pair[1] / pair[0] - factor).abs() < 1e-9);
        }
        assert!((radii[9] * factor - 1e-3).abs() < 1e-12);
    }

    #[test]
    fn power_path_sweeps_the_range() {
        assert_eq!(power_path(2.0, 3.0, 3), vec![2.0, 2.5, 3.0]);
    }

    #[test]
    fn complex_numbers_format_with_explicit_sign() {
        assert_eq!(format_complex(Complex::new(0.3, 0.3)), "0.30 + 0.30i");
        assert_eq!(format_complex(Complex::new(-0.126, -1.0)), "-0.13 - 1.00i");
        assert_eq!(format_complex(Complex::new(0.0, 0.0)), "0.00 + 0.00i");
    }
}
