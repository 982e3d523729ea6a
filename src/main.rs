use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use sketchbook::Timing;
use sketchbook::config::{DungeonParams, ScrollParams};

fn save(out_dir: &Path, name: &str, rgba: &[u8], w: usize, h: usize) -> Result<()> {
    let path = out_dir.join(name);
    image::save_buffer(&path, rgba, w as u32, h as u32, image::ColorType::Rgba8)
        .with_context(|| format!("failed to save {}", path.display()))?;
    log::info!("Saved {}", path.display());
    Ok(())
}

fn log_timings(timings: &[Timing]) {
    log::info!("Timings:");
    for t in timings {
        log::info!("  {:20} {:8.1} ms", t.name, t.ms);
    }
}

fn dungeon(seed: u64, out_dir: &Path) -> Result<()> {
    let params = DungeonParams::default();
    log::info!(
        "Carving {}x{} dungeon with seed={}, steps={}",
        params.grid_w,
        params.grid_h,
        seed,
        params.steps
    );

    let (sketch, timings) = sketchbook::generate_dungeon(seed, &params);
    log::info!(
        "Walk carved {} cells, ended at ({}, {})",
        sketch.walk.carved,
        sketch.walk.end.x,
        sketch.walk.end.y
    );
    log_timings(&timings);
    save(out_dir, "dungeon.png", &sketch.rgba, sketch.w, sketch.h)
}

fn scroll(out_dir: &Path) -> Result<()> {
    let params = ScrollParams::default();
    log::info!(
        "Stitching scroll: a={}, b={}, turns={}",
        params.a,
        params.b,
        params.turns
    );

    let (sketch, timings) =
        sketchbook::generate_scroll(&params).context("failed to stitch scroll path")?;
    let j = &sketch.path.junction;
    log::info!("Junction P0={} P1={} (L={:.3})", j.p0, j.p1, j.control_len);
    log_timings(&timings);
    save(out_dir, "scroll.png", &sketch.rgba, sketch.w, sketch.h)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().collect();

    let sketch = args.get(1).map(String::as_str).unwrap_or("all");
    let seed: u64 = match args.get(2) {
        Some(s) => s.parse().with_context(|| format!("invalid seed {s:?}"))?,
        None => 42,
    };
    let out_dir: PathBuf = args
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("artifacts"));

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    match sketch {
        "dungeon" => dungeon(seed, &out_dir)?,
        "scroll" => scroll(&out_dir)?,
        "all" => {
            dungeon(seed, &out_dir)?;
            scroll(&out_dir)?;
        }
        other => bail!("unknown sketch {other:?} (expected dungeon, scroll or all)"),
    }

    log::info!("Done.");
    Ok(())
}
