// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Random input files.
//!
//! Every mode section is filled in, so the same file can be replayed
//! with any `seqType`.  Quadratic iteration and zoom sequences are
//! favoured.

use num::Complex;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::f64::consts::PI;

use crate::config::{InputFile, LinearInput, PowerInput, RadialInput, SeqType, ZoomInput};

const POWERS: [(f64, u32); 4] = [(2.0, 10), (3.0, 5), (4.0, 3), (5.0, 2)];
const SEQ_TYPES: [(SeqType, u32); 4] = [
    (SeqType::Linear, 3),
    (SeqType::Radial, 2),
    (SeqType::Zoom, 4),
    (SeqType::Power, 1),
];
const PATH_LENGTH: f64 = 0.5;

fn weighted<R: Rng, T: Copy>(rng: &mut R, table: &[(T, u32)]) -> T {
    // The weight tables are constant and non-empty.
    match WeightedIndex::new(table.iter().map(|(_, weight)| *weight)) {
        Ok(index) => table[index.sample(rng)].0,
        Err(_) => table[0].0,
    }
}

fn in_unit_disk<R: Rng>(rng: &mut R) -> Complex<f64> {
    loop {
        let c = Complex::new(rng.gen_range(-1.0, 1.0), rng.gen_range(-1.0, 1.0));
        if c.norm() <= 1.0 {
            return c;
        }
    }
}

fn pair(z: Complex<f64>) -> (f64, f64) {
    (z.re, z.im)
}

/// A random input file.
pub fn random_input<R: Rng>(rng: &mut R) -> InputFile {
    let power = weighted(rng, &POWERS);
    let seq_type = weighted(rng, &SEQ_TYPES);
    let c = in_unit_disk(rng);

    let c_end = loop {
        let angle = rng.gen_range(-PI, PI);
        let end = c + Complex::from_polar(&PATH_LENGTH, &angle);
        if end.norm() <= 1.0 {
            break end;
        }
    };

    let rad = rng.gen_range(0.25, 1.0);
    let angle = rng.gen_range(0.0, PI);
    let center = Complex::from_polar(&rng.gen_range(0.0, 1.0), &rng.gen_range(0.0, 2.0 * PI));

    InputFile {
        n: 256,
        split: 4,
        iters: 150,
        frame_count: 300,
        r: 1.5,
        p: power,
        seq_type,
        c: pair(c),
        linear: Some(LinearInput { c_end: pair(c_end) }),
        radial: Some(RadialInput { rad, angle }),
        zoom: Some(ZoomInput {
            center: pair(center),
            r_start: 0.000_001,
            r_end: 1.5,
        }),
        power: Some(PowerInput {
            p_min: 2.0,
            p_max: 3.0,
        }),
        search: None,
        palette: None,
        assemble_empty: None,
    }
}
