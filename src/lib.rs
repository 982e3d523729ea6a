pub mod canvas;
pub mod config;
pub mod curve;
pub mod dungeon;
pub mod grid;
pub mod render;
pub mod rng;

use std::time::Instant;

use config::{DungeonParams, ScrollParams};
use curve::{ScrollPath, StitchError};
use dungeon::{Cell, Dungeon, WalkStats, random_walk};
use render::RasterCanvas;
use rng::Rng;

pub struct DungeonSketch {
    pub dungeon: Dungeon,
    pub walk: WalkStats,
    pub w: usize,
    pub h: usize,
    pub rgba: Vec<u8>,
}

pub struct ScrollSketch {
    pub path: ScrollPath,
    pub w: usize,
    pub h: usize,
    pub rgba: Vec<u8>,
}

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

fn elapsed_ms(t: Instant) -> f64 {
    t.elapsed().as_secs_f64() * 1000.0
}

pub fn generate_dungeon(seed: u64, params: &DungeonParams) -> (DungeonSketch, Vec<Timing>) {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    // 1. Carve
    let t = Instant::now();
    let mut dungeon = Dungeon::new(params.grid_w, params.grid_h);
    let start = params.start.unwrap_or_else(|| dungeon.center());
    if !dungeon.in_bounds(start) {
        log::warn!(
            "walk start {:?} is outside the {}x{} grid; nothing will be carved",
            start,
            params.grid_w,
            params.grid_h
        );
    }
    let mut rng = Rng::new(seed);
    let walk = random_walk(&mut dungeon, start, params.steps, &mut rng);
    timings.push(Timing {
        name: "random_walk",
        ms: elapsed_ms(t),
    });

    // 2. Render
    let t = Instant::now();
    let mut canvas = RasterCanvas::new(params.canvas_w, params.canvas_h);
    render::draw_dungeon(
        &dungeon,
        &mut canvas,
        params.canvas_w as f32,
        params.canvas_h as f32,
    );
    timings.push(Timing {
        name: "render",
        ms: elapsed_ms(t),
    });

    timings.push(Timing {
        name: "TOTAL",
        ms: elapsed_ms(total_start),
    });

    log::debug!(
        "dungeon seed={} carved {} of {} cells",
        seed,
        dungeon.count(Cell::Empty),
        params.grid_w * params.grid_h
    );

    let sketch = DungeonSketch {
        dungeon,
        walk,
        w: canvas.w,
        h: canvas.h,
        rgba: canvas.rgba,
    };

    (sketch, timings)
}

pub fn generate_scroll(params: &ScrollParams) -> Result<(ScrollSketch, Vec<Timing>), StitchError> {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    // 1. Stitch spiral + Bézier segments
    let t = Instant::now();
    let path = ScrollPath::stitch(params)?;
    timings.push(Timing {
        name: "stitch",
        ms: elapsed_ms(t),
    });

    // 2. Render
    let t = Instant::now();
    let mut canvas = RasterCanvas::new(params.canvas_w, params.canvas_h);
    render::draw_scroll(&path, &mut canvas, params);
    timings.push(Timing {
        name: "render",
        ms: elapsed_ms(t),
    });

    timings.push(Timing {
        name: "TOTAL",
        ms: elapsed_ms(total_start),
    });

    let sketch = ScrollSketch {
        path,
        w: canvas.w,
        h: canvas.h,
        rgba: canvas.rgba,
    };

    Ok((sketch, timings))
}
