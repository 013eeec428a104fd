// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Renders one tile of one frame.
//!
//! A tile is iterated for the full budget, or until every cell has
//! escaped.  The grayscale probe is then taken over the whole tile; if
//! it reads zero everywhere the tile is empty, nothing is written, and
//! the caller leaves that slot of the frame black.
//!
//! A bounded cell never reads zero and an escaped cell stays escaped,
//! so once the probe goes dark it stays dark.  Reading it where the
//! iteration stopped gives the same verdict as sampling it at any set
//! of checkpoints along the way.

use num::Complex;
use std::path::{Path, PathBuf};

use crate::colors::{is_dark, Palette};
use crate::error::Result;
use crate::iterate::EscapeGrid;
use crate::planes::{PlaneMapper, TileCoord, Viewport};

/// Everything needed to render any tile of one frame.  Built fresh for
/// every frame and shared, read-only, by every worker.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderParams {
    /// The constant c of z -> z^p + c.
    pub constant: Complex<f64>,
    /// The exponent p of z -> z^p + c.
    pub power: f64,
    /// Window of the complex plane covered by the frame.
    pub viewport: Viewport,
    /// Iteration budget per tile.
    pub iterations: u32,
    /// Side length of a tile, in pixels.
    pub pixels: usize,
    /// Color law for saved tiles.
    pub palette: Palette,
}

impl RenderParams {
    /// Side length of the assembled frame, in pixels.
    pub fn frame_pixels(&self) -> usize {
        self.pixels * self.viewport.split
    }
}

/// What became of one tile.  A failed render is an `Err` instead.
#[derive(Clone, Debug, PartialEq)]
pub enum TileOutcome {
    /// The tile has structure and its image was written to this path.
    Rendered(PathBuf),
    /// The tile has structure; it was only probed, nothing was written.
    Visible,
    /// The probe read zero over the whole tile; nothing was written.
    Empty,
}

impl TileOutcome {
    /// True for a tile judged entirely black.
    pub fn is_black(&self) -> bool {
        *self == TileOutcome::Empty
    }
}

/// File name a tile is saved under inside the image directory.
pub fn tile_file_name(coord: TileCoord) -> String {
    format!("tile_{}_{}.png", coord.row, coord.col)
}

/// Renders one tile.  With `target` set, a tile that is not empty is
/// colored and saved into that directory; without it the tile is only
/// probed and no I/O happens.
pub fn render_tile(
    params: &RenderParams,
    coord: TileCoord,
    target: Option<&Path>,
) -> Result<TileOutcome> {
    let mapper = PlaneMapper::new(params.pixels, params.viewport.tile_plane(coord))?;
    let mut grid = EscapeGrid::new(mapper.grid());

    while grid.iteration() < params.iterations && !grid.all_escaped() {
        grid.step(params.constant, params.power);
    }
    if is_dark(grid.values()) {
        return Ok(TileOutcome::Empty);
    }

    match target {
        None => Ok(TileOutcome::Visible),
        Some(dir) => {
            let image = params
                .palette
                .colorize(&grid, params.pixels, params.iterations);
            let path = dir.join(tile_file_name(coord));
            image.save(&path)?;
            Ok(TileOutcome::Rendered(path))
        }
    }
}
