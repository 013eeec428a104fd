// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Stitches rendered tiles into frames, and knows where every file of
//! a run lives.

use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;
use crate::planes::TileCoord;
use crate::tile::{RenderParams, TileOutcome};

const IMAGES: &str = "images";

/// Where a run writes its files.  Tiles and frames go into an `images`
/// directory under the root; the manifest and caption sit at the root
/// and refer to frames relative to it.
#[derive(Clone, Debug)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Layout rooted at `root`.  Nothing is created until [`prepare`].
    ///
    /// [`prepare`]: OutputLayout::prepare
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        OutputLayout {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Creates the image directory if needed.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(self.images_dir())?;
        Ok(())
    }

    /// The output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding tile and frame images.
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES)
    }

    /// Path of frame `index` relative to the root, as the manifest
    /// spells it.
    pub fn frame_reference(&self, index: usize) -> String {
        format!("{}/frame{}.png", IMAGES, index)
    }

    /// Absolute location of frame `index`.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.root.join(self.frame_reference(index))
    }

    /// Location of the frame-order manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("framelist.txt")
    }

    /// Location of the caption.
    pub fn caption_path(&self) -> PathBuf {
        self.root.join("caption.txt")
    }
}

/// Builds frame `index` from its tiles.  Each rendered tile is pasted at
/// its offset and its file removed; empty tiles, and rendered tiles
/// whose file has gone missing, leave their slot black.  The frame is
/// sized from the tile geometry in `params`.
pub fn assemble(
    layout: &OutputLayout,
    index: usize,
    tiles: &[(TileCoord, TileOutcome)],
    params: &RenderParams,
) -> Result<PathBuf> {
    let pixels = params.pixels;
    let side = params.frame_pixels() as u32;
    let mut canvas = RgbImage::new(side, side);

    for (coord, outcome) in tiles {
        let path = match outcome {
            TileOutcome::Rendered(path) => path,
            _ => continue,
        };
        if !path.exists() {
            warn!(frame = index, row = coord.row, col = coord.col, "tile image missing");
            continue;
        }
        let tile = image::open(path)?.to_rgb8();
        let (x0, y0) = coord.offset(pixels);
        for (x, y, pixel) in tile.enumerate_pixels() {
            let (x, y) = (x0 as u32 + x, y0 as u32 + y);
            if x < side && y < side {
                canvas.put_pixel(x, y, *pixel);
            }
        }
        fs::remove_file(path)?;
    }

    let out = layout.frame_path(index);
    canvas.save(&out)?;
    Ok(out)
}
