// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A fixed number of scoped worker threads that render the tiles of a
//! single frame.
//!
//! Workers pull tile coordinates off a shared queue until it runs dry.
//! Every worker is joined before [`TilePool::render`] returns, on the
//! error path as well.  When one tile fails the others stop taking new
//! tiles, the images already written for the frame are removed, and the
//! first error is handed back.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::warn;

use crate::error::{Error, Result};
use crate::planes::TileCoord;
use crate::tile::{render_tile, RenderParams, TileOutcome};

/// Number of workers used when the caller does not ask for another.
pub const DEFAULT_WORKERS: usize = 4;

type Finished = Vec<(TileCoord, TileOutcome)>;

/// Renders tiles in parallel.
#[derive(Copy, Clone, Debug)]
pub struct TilePool {
    workers: usize,
}

impl Default for TilePool {
    fn default() -> Self {
        TilePool::new(DEFAULT_WORKERS)
    }
}

impl TilePool {
    /// A pool of `workers` threads; at least one.
    pub fn new(workers: usize) -> Self {
        TilePool {
            workers: workers.max(1),
        }
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Renders every tile in `tiles` with the same parameters.  The
    /// outcomes come back sorted by tile coordinate.
    pub fn render(
        &self,
        params: &RenderParams,
        tiles: &[TileCoord],
        target: Option<&Path>,
    ) -> Result<Finished> {
        let queue = Mutex::new(tiles.iter().cloned());
        let abort = AtomicBool::new(false);
        let workers = self.workers.min(tiles.len()).max(1);

        let joined = crossbeam::scope(|spawner| {
            let mut handles = Vec::with_capacity(workers);
            for _ in 0..workers {
                let queue = &queue;
                let abort = &abort;
                handles.push(spawner.spawn(move |_| -> (Finished, Result<()>) {
                    let mut finished = Vec::new();
                    while !abort.load(Ordering::SeqCst) {
                        let coord = match queue.lock() {
                            Ok(mut pending) => pending.next(),
                            Err(_) => return (finished, Err(Error::WorkerPanic)),
                        };
                        let coord = match coord {
                            Some(coord) => coord,
                            None => break,
                        };
                        match render_tile(params, coord, target) {
                            Ok(outcome) => finished.push((coord, outcome)),
                            Err(err) => {
                                abort.store(true, Ordering::SeqCst);
                                return (finished, Err(err));
                            }
                        }
                    }
                    (finished, Ok(()))
                }));
            }
            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        })
        .map_err(|_| Error::WorkerPanic)?;

        let mut outcomes = Vec::with_capacity(tiles.len());
        let mut first_error = None;
        for worker in joined {
            let (finished, status) = match worker {
                Ok(done) => done,
                Err(_) => (Vec::new(), Err(Error::WorkerPanic)),
            };
            outcomes.extend(finished);
            if let Err(err) = status {
                first_error.get_or_insert(err);
            }
        }

        if let Some(err) = first_error {
            discard(&outcomes);
            return Err(err);
        }
        outcomes.sort_by_key(|(coord, _)| *coord);
        Ok(outcomes)
    }

    /// Black flag of every tile, from a probe that writes nothing.
    pub fn probe(&self, params: &RenderParams, tiles: &[TileCoord]) -> Result<Vec<bool>> {
        Ok(self
            .render(params, tiles, None)?
            .iter()
            .map(|(_, outcome)| outcome.is_black())
            .collect())
    }
}

// Removes the tile images of a frame that will never be assembled.
fn discard(outcomes: &[(TileCoord, TileOutcome)]) {
    for (coord, outcome) in outcomes {
        if let TileOutcome::Rendered(path) = outcome {
            if let Err(err) = fs::remove_file(path) {
                warn!(row = coord.row, col = coord.col, %err, "could not remove tile image");
            }
        }
    }
}
