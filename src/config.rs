// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The JSON input file, and its validation into a [`Job`].
//!
//! ```json
//! {
//!   "n": 256, "split": 4, "iters": 150, "frameCount": 300,
//!   "r": 1.5, "p": 2, "seqType": "linear", "c": [-0.2, 0.7],
//!   "linear": {"cEnd": [0.1, 0.4]}
//! }
//! ```
//!
//! Only the section of the selected `seqType` has to be present.

use num::Complex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::colors::Palette;
use crate::error::{Error, Result};
use crate::search::SearchSettings;

/// A complex number as it appears in the input file: `[re, im]`.
pub type Pair = (f64, f64);

fn complex(pair: Pair) -> Complex<f64> {
    Complex::new(pair.0, pair.1)
}

fn default_power() -> f64 {
    2.0
}

/// Which parameter the sequence varies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeqType {
    /// The constant moves along a straight line.
    Linear,
    /// The constant moves along a half-turn arc.
    Radial,
    /// The window zooms around a fixed center.
    Zoom,
    /// The exponent sweeps a range.
    Power,
}

/// `linear` section.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearInput {
    /// Constant of the last frame.
    pub c_end: Pair,
}

/// `radial` section.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadialInput {
    /// Modulus of the constants on the arc.
    pub rad: f64,
    /// Argument of the first frame's constant.
    pub angle: f64,
}

/// `zoom` section.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomInput {
    /// Candidate center of the window.
    pub center: Pair,
    /// Half-width of the first frame's window.
    pub r_start: f64,
    /// Half-width the window approaches on the last frame.
    pub r_end: f64,
}

/// `power` section.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerInput {
    /// Exponent of the first frame.
    pub p_min: f64,
    /// Exponent of the last frame.
    pub p_max: f64,
}

/// The input file, exactly as written on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputFile {
    /// Tile side length in pixels.
    pub n: usize,
    /// Tiles along each side of a frame.
    pub split: usize,
    /// Iteration budget.
    pub iters: u32,
    /// Number of frames.
    pub frame_count: usize,
    /// Half-width of the window.
    pub r: f64,
    /// Exponent.
    #[serde(default = "default_power")]
    pub p: f64,
    /// Kind of sequence.
    pub seq_type: SeqType,
    /// Starting constant.
    pub c: Pair,
    /// Linear-mode parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear: Option<LinearInput>,
    /// Radial-mode parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radial: Option<RadialInput>,
    /// Zoom-mode parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<ZoomInput>,
    /// Power-mode parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<PowerInput>,
    /// Search tuning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSettings>,
    /// Color tuning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<Palette>,
    /// Whether frames whose tiles are all black are still assembled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assemble_empty: Option<bool>,
}

/// The motion of a sequence, with its mode-specific parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Mode {
    /// Constant moves from the job's constant to `end`.
    Linear {
        /// Constant of the last frame.
        end: Complex<f64>,
    },
    /// Constant moves through half a turn at fixed modulus.
    Radial {
        /// Modulus of the constant.
        radius: f64,
        /// Starting argument.
        angle: f64,
    },
    /// Window shrinks or grows geometrically around a center.
    Zoom {
        /// Candidate center.
        center: Complex<f64>,
        /// Half-width of the first frame.
        start: f64,
        /// Half-width approached by the last frame.
        end: f64,
    },
    /// Exponent moves linearly.
    Power {
        /// First exponent.
        min: f64,
        /// Last exponent.
        max: f64,
    },
}

impl Mode {
    /// Name used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Linear { .. } => "linear",
            Mode::Radial { .. } => "radial",
            Mode::Zoom { .. } => "zoom",
            Mode::Power { .. } => "power",
        }
    }
}

/// A validated job.  Built once and handed to everything that needs it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Job {
    /// Tile side length in pixels.
    pub pixels: usize,
    /// Tiles along each side of a frame.
    pub split: usize,
    /// Iteration budget.
    pub iterations: u32,
    /// Number of frames.
    pub frames: usize,
    /// Half-width of the window.
    pub radius: f64,
    /// Exponent.
    pub power: f64,
    /// Starting constant.
    pub constant: Complex<f64>,
    /// What the sequence varies.
    pub mode: Mode,
    /// Whether all-black frames are still assembled.
    pub assemble_empty: bool,
    /// Search tuning.
    pub search: SearchSettings,
    /// Color tuning.
    pub palette: Palette,
}

fn positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::Config(format!("{} must be a positive number, got {}", name, value)))
    }
}

fn finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::Config(format!("{} must be finite", name)))
    }
}

fn finite_pair(name: &str, pair: Pair) -> Result<Complex<f64>> {
    finite(name, pair.0)?;
    finite(name, pair.1)?;
    Ok(complex(pair))
}

fn at_least_one(name: &str, value: usize) -> Result<usize> {
    if value >= 1 {
        Ok(value)
    } else {
        Err(Error::Config(format!("{} must be at least 1", name)))
    }
}

fn section<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| {
        Error::Config(format!(
            "seqType is {} but there is no \"{}\" section",
            name, name
        ))
    })
}

impl InputFile {
    /// Parses an input file from a JSON string.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Pretty JSON for writing back to disk.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every field the selected mode needs.
    pub fn validate(&self) -> Result<Job> {
        let search = self.search.unwrap_or_default();
        at_least_one("search.probePixels", search.probe_pixels)?;
        positive("search.contraction", search.contraction)?;
        if search.contraction >= 1.0 {
            return Err(Error::Config("search.contraction must be below 1".to_string()));
        }
        positive("search.centerStep", search.center_step)?;
        if search.center_step >= 1.0 {
            return Err(Error::Config("search.centerStep must be below 1".to_string()));
        }
        positive("search.centerProbeScale", search.center_probe_scale)?;
        if search.zoom_probe_iterations == 0 {
            return Err(Error::Config("search.zoomProbeIterations must be at least 1".to_string()));
        }

        let mode = match self.seq_type {
            SeqType::Linear => {
                let linear = section(self.linear, "linear")?;
                Mode::Linear {
                    end: finite_pair("linear.cEnd", linear.c_end)?,
                }
            }
            SeqType::Radial => {
                let radial = section(self.radial, "radial")?;
                Mode::Radial {
                    radius: finite("radial.rad", radial.rad)?,
                    angle: finite("radial.angle", radial.angle)?,
                }
            }
            SeqType::Zoom => {
                let zoom = section(self.zoom, "zoom")?;
                Mode::Zoom {
                    center: finite_pair("zoom.center", zoom.center)?,
                    start: positive("zoom.rStart", zoom.r_start)?,
                    end: positive("zoom.rEnd", zoom.r_end)?,
                }
            }
            SeqType::Power => {
                let power = section(self.power, "power")?;
                Mode::Power {
                    min: finite("power.pMin", power.p_min)?,
                    max: finite("power.pMax", power.p_max)?,
                }
            }
        };

        Ok(Job {
            pixels: at_least_one("n", self.n)?,
            split: at_least_one("split", self.split)?,
            iterations: at_least_one("iters", self.iters as usize)? as u32,
            frames: at_least_one("frameCount", self.frame_count)?,
            radius: positive("r", self.r)?,
            power: finite("p", self.p)?,
            constant: finite_pair("c", self.c)?,
            mode,
            assemble_empty: self
                .assemble_empty
                .unwrap_or(self.seq_type == SeqType::Zoom),
            search,
            palette: self.palette.unwrap_or_default(),
        })
    }
}

/// Reads and validates the input file at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Job> {
    let text = fs::read_to_string(path)?;
    InputFile::from_json(&text)?.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEAR: &str = r#"{
        "n": 8, "split": 2, "iters": 20, "frameCount": 3, "r": 1.5, "p": 2,
        "seqType": "linear", "c": [0, 0], "linear": {"cEnd": [0.3, 0.3]}
    }"#;

    #[test]
    fn reads_a_linear_job() {
        let job = InputFile::from_json(LINEAR).unwrap().validate().unwrap();
        assert_eq!(job.pixels, 8);
        assert_eq!(job.split, 2);
        assert_eq!(job.iterations, 20);
        assert_eq!(job.frames, 3);
        assert_eq!(job.constant, Complex::new(0.0, 0.0));
        assert_eq!(
            job.mode,
            Mode::Linear {
                end: Complex::new(0.3, 0.3)
            }
        );
        assert!(!job.assemble_empty);
        assert_eq!(job.search, SearchSettings::default());
    }

    #[test]
    fn exponent_defaults_to_two() {
        let text = LINEAR.replace(r#""p": 2,"#, "");
        let job = InputFile::from_json(&text).unwrap().validate().unwrap();
        assert_eq!(job.power, 2.0);
    }

    #[test]
    fn reads_every_section_of_a_generated_file() {
        let text = r#"{
            "n": 256, "split": 4, "iters": 150, "frameCount": 300, "r": 1.5, "p": 3,
            "seqType": "zoom", "c": [0.1, -0.2],
            "linear": {"cEnd": [0.4, 0.1]},
            "radial": {"rad": 0.5, "angle": 1.0},
            "zoom": {"center": [0.3, 0.2], "rStart": 1e-06, "rEnd": 1.5},
            "power": {"pMin": 2, "pMax": 3}
        }"#;
        let job = InputFile::from_json(text).unwrap().validate().unwrap();
        assert_eq!(
            job.mode,
            Mode::Zoom {
                center: Complex::new(0.3, 0.2),
                start: 1e-6,
                end: 1.5
            }
        );
        assert!(job.assemble_empty);
    }

    #[test]
    fn tuning_sections_override_defaults() {
        let text = LINEAR.replace(
            r#""seqType""#,
            r#""search": {"maxAttempts": 12}, "assembleEmpty": true, "seqType""#,
        );
        let job = InputFile::from_json(&text).unwrap().validate().unwrap();
        assert_eq!(job.search.max_attempts, 12);
        assert_eq!(job.search.contraction, 0.975);
        assert!(job.assemble_empty);
    }

    #[test]
    fn missing_mode_section_is_rejected() {
        let text = LINEAR.replace(r#""seqType": "linear""#, r#""seqType": "radial""#);
        match InputFile::from_json(&text).unwrap().validate() {
            Err(Error::Config(msg)) => assert!(msg.contains("radial")),
            other => panic!("expected a config error, got {:?}", other),
        }
    }

    #[test]
    fn bad_values_are_rejected() {
        let zero_tiles = LINEAR.replace(r#""split": 2"#, r#""split": 0"#);
        assert!(InputFile::from_json(&zero_tiles).unwrap().validate().is_err());

        let negative_radius = LINEAR.replace(r#""r": 1.5"#, r#""r": -1.5"#);
        assert!(InputFile::from_json(&negative_radius)
            .unwrap()
            .validate()
            .is_err());
    }

    #[test]
    fn center_step_must_stay_below_one() {
        let mut input = InputFile::from_json(LINEAR).unwrap();
        for step in [1.0, 1.5].iter() {
            input.search = Some(SearchSettings {
                center_step: *step,
                ..SearchSettings::default()
            });
            match input.validate() {
                Err(Error::Config(message)) => assert!(message.contains("centerStep")),
                other => panic!("unexpected result {:?}", other),
            }
        }

        input.search = Some(SearchSettings {
            center_step: 0.5,
            ..SearchSettings::default()
        });
        assert!(input.validate().is_ok());
    }

    #[test]
    fn unknown_sequence_type_does_not_parse() {
        let text = LINEAR.replace(r#""seqType": "linear""#, r#""seqType": "spiral""#);
        match InputFile::from_json(&text) {
            Err(Error::Json(_)) => {}
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        match load("/nonexistent/input.json") {
            Err(Error::Io(_)) => {}
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }
}
