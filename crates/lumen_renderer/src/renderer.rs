//! Tiled multi-threaded renderer.
//!
//! The image is cut into tiles, every tile becomes a task in a shared FIFO
//! queue, and a fixed pool of workers drains the queue. Each task gets its
//! own integrator and sampler, seeded from the tile position, so the image
//! does not depend on the number of threads.

use crate::bucket::{debug_tile, generate_tiles, Tile, TileOrder, DEFAULT_TILE_SIZE};
use crate::{Film, Scene};
use crossbeam::channel::{self, RecvTimeoutError, Sender};
use crossbeam::queue::ArrayQueue;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Worker threads
    pub threads: usize,
    /// Tile edge in pixels
    pub tile_size: u32,
    /// Render only the neighbourhood of this pixel, on one thread
    pub debug_pixel: Option<(u32, u32)>,
    /// Half-width of the debug neighbourhood
    pub debug_window: u32,
    pub tile_order: TileOrder,
    /// How often the waiting thread reports progress
    pub progress_interval_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
            tile_size: DEFAULT_TILE_SIZE,
            debug_pixel: None,
            debug_window: 10,
            tile_order: TileOrder::RowMajor,
            progress_interval_ms: 1000,
        }
    }
}

impl RenderConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_debug_pixel(mut self, i: u32, j: u32) -> Self {
        self.debug_pixel = Some((i, j));
        self
    }

    pub fn with_debug_window(mut self, window: u32) -> Self {
        self.debug_window = window;
        self
    }

    pub fn with_tile_order(mut self, order: TileOrder) -> Self {
        self.tile_order = order;
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("tile size must be at least 1")]
    ZeroTileSize,

    #[error("at least one worker thread is required")]
    ZeroThreads,

    #[error("debug pixel ({i}, {j}) lies outside the {width}x{height} image")]
    DebugPixelOutOfBounds { i: u32, j: u32, width: u32, height: u32 },

    #[error("film is {film_width}x{film_height} but the scene is {width}x{height}")]
    FilmMismatch {
        film_width: u32,
        film_height: u32,
        width: u32,
        height: u32,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// One unit of work: a tile and the seed of its integrator and sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTask {
    pub tile: Tile,
    pub seed: u64,
}

impl RenderTask {
    pub fn new(tile: Tile, image_height: u32) -> Self {
        Self {
            tile,
            seed: tile.left as u64 * image_height as u64 + tile.bottom as u64,
        }
    }
}

/// Shared flag for stopping a render early. Workers check it between
/// tiles, so a tile that has started is always finished.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Summary of a finished render.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    pub tiles_rendered: usize,
    /// Tiles dropped because the render was cancelled
    pub tiles_skipped: usize,
    pub samples: u64,
    pub rays_traced: u64,
    /// Times the countdown reached zero; always 1 for a completed render
    pub completion_signals: u32,
    pub elapsed: Duration,
}

/// Counters shared by the workers.
#[derive(Default)]
struct Progress {
    tiles_rendered: AtomicUsize,
    tiles_skipped: AtomicUsize,
    samples: AtomicU64,
    rays_traced: AtomicU64,
    completion_signals: AtomicU32,
}

/// Everything a worker needs, borrowed for the duration of the render.
struct Worker<'a> {
    scene: &'a Scene,
    film: &'a dyn Film,
    queue: &'a ArrayQueue<RenderTask>,
    remaining: &'a AtomicUsize,
    progress: &'a Progress,
    cancel: &'a CancelToken,
}

impl Worker<'_> {
    /// Pop tasks until the queue is empty. The worker that finishes the
    /// last task sends the completion signal.
    fn run(&self, done: Sender<()>) {
        while let Some(task) = self.queue.pop() {
            if self.cancel.is_cancelled() {
                self.progress.tiles_skipped.fetch_add(1, Ordering::Relaxed);
            } else {
                self.render_task(&task);
                self.progress.tiles_rendered.fetch_add(1, Ordering::Relaxed);
            }

            if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                self.progress.completion_signals.fetch_add(1, Ordering::Relaxed);
                if done.send(()).is_err() {
                    log::warn!("Render finished but nobody is waiting for it");
                }
            }
        }
    }

    fn render_task(&self, task: &RenderTask) {
        let scene = self.scene;
        let spp = scene.spp as usize;
        let mut integrator = scene.make_integrator(task.seed);
        let mut sampler = scene.make_sampler(task.seed);

        for (i, j) in task.tile.serpentine() {
            let samples = integrator.make_pixel_samples(sampler.as_mut(), spp);
            for sample in &samples {
                let ray = scene.camera.make_world_space_ray(i, j, sample);
                let radiance = integrator.integrate(&ray);
                let (dx, dy) = match sample.as_slice() {
                    [dx, dy, ..] => (*dx, *dy),
                    _ => (0.5, 0.5),
                };
                self.film
                    .add_sample(pixel_coordinate(i, dx), pixel_coordinate(j, dy), radiance);
            }
            self.progress
                .samples
                .fetch_add(samples.len() as u64, Ordering::Relaxed);
        }

        self.progress
            .rays_traced
            .fetch_add(integrator.rays_traced(), Ordering::Relaxed);
        log::debug!(
            "Tile [{}, {}) x [{}, {}) done",
            task.tile.left,
            task.tile.right,
            task.tile.bottom,
            task.tile.top
        );
    }
}

/// `index + offset`, kept strictly below `index + 1` so rounding never moves
/// a sample into the neighbouring pixel.
fn pixel_coordinate(index: u32, offset: f32) -> f32 {
    let coordinate = index as f32 + offset.max(0.0);
    let next = index as f32 + 1.0;
    if coordinate < next {
        coordinate
    } else {
        f32::from_bits(next.to_bits() - 1)
    }
}

fn validate(scene: &Scene, film: &dyn Film, config: &RenderConfig) -> Result<(), RenderError> {
    let (width, height) = (scene.width, scene.height);
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage { width, height });
    }
    if scene.spp == 0 {
        return Err(RenderError::ZeroSamples);
    }
    if config.tile_size == 0 {
        return Err(RenderError::ZeroTileSize);
    }
    if config.threads == 0 {
        return Err(RenderError::ZeroThreads);
    }
    if let Some((i, j)) = config.debug_pixel {
        if i >= width || j >= height {
            return Err(RenderError::DebugPixelOutOfBounds {
                i,
                j,
                width,
                height,
            });
        }
    }
    if film.width() != width || film.height() != height {
        return Err(RenderError::FilmMismatch {
            film_width: film.width(),
            film_height: film.height(),
            width,
            height,
        });
    }
    Ok(())
}

/// Render `scene` into `film` and block until every tile is done or
/// skipped.
pub fn render(
    scene: &Scene,
    film: &dyn Film,
    config: &RenderConfig,
    cancel: &CancelToken,
) -> Result<RenderStats, RenderError> {
    validate(scene, film, config)?;
    let start = Instant::now();

    let (tiles, threads) = match config.debug_pixel {
        Some((i, j)) => {
            log::info!("Debug render around pixel ({i}, {j})");
            let tile = debug_tile(scene.width, scene.height, i, j, config.debug_window);
            (vec![tile], 1)
        }
        None => (
            generate_tiles(scene.width, scene.height, config.tile_size, config.tile_order),
            config.threads,
        ),
    };
    let task_count = tiles.len();

    // All tasks are queued before any worker starts.
    let queue = ArrayQueue::new(task_count);
    for tile in tiles {
        if let Err(task) = queue.push(RenderTask::new(tile, scene.height)) {
            log::error!("Task queue full, dropping tile {:?}", task.tile);
        }
    }

    log::info!(
        "Rendering {}x{} at {} spp: {} tiles on {} threads",
        scene.width,
        scene.height,
        scene.spp,
        task_count,
        threads
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("lumen-worker-{i}"))
        .build()?;

    let remaining = AtomicUsize::new(task_count);
    let progress = Progress::default();
    let (done_tx, done_rx) = channel::bounded(1);
    let worker = Worker {
        scene,
        film,
        queue: &queue,
        remaining: &remaining,
        progress: &progress,
        cancel,
    };
    let tick = Duration::from_millis(config.progress_interval_ms.max(1));

    pool.in_place_scope(|s| {
        for _ in 0..threads {
            let done = done_tx.clone();
            let worker = &worker;
            s.spawn(move |_| worker.run(done));
        }
        drop(done_tx);

        loop {
            match done_rx.recv_timeout(tick) {
                Ok(()) => break,
                Err(RecvTimeoutError::Timeout) => {
                    let left = remaining.load(Ordering::Acquire);
                    log::trace!("{} of {} tiles remaining", left, task_count);
                }
                // Every worker has exited, so nothing is left to wait for.
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    });

    let stats = RenderStats {
        tiles_rendered: progress.tiles_rendered.into_inner(),
        tiles_skipped: progress.tiles_skipped.into_inner(),
        samples: progress.samples.into_inner(),
        rays_traced: progress.rays_traced.into_inner(),
        completion_signals: progress.completion_signals.into_inner(),
        elapsed: start.elapsed(),
    };
    log::info!(
        "Render finished in {:.2?}: {} tiles, {} skipped, {} rays",
        stats.elapsed,
        stats.tiles_rendered,
        stats.tiles_skipped,
        stats.rays_traced
    );
    Ok(stats)
}
