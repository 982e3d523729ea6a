use glam::Vec2;
use rayon::prelude::*;

use crate::canvas::{Canvas, Color, Rect, Stroke};
use crate::config::ScrollParams;
use crate::curve::ScrollPath;
use crate::dungeon::{Cell, Dungeon};

// Dungeon palette
pub const DUNGEON_BACKGROUND: Color = [66, 50, 50, 255]; // #423232
pub const WALL: Color = [139, 69, 19, 255]; // #8B4513
pub const EMPTY: Color = [255, 255, 255, 255];
pub const CELL_BOUNDARY: Stroke = Stroke::new([0, 0, 0, 255], 1.0);

// Scroll palette
pub const PAPER: Color = [255, 255, 255, 255];
pub const INK: Color = [0, 0, 0, 255];

/// RGBA8 raster surface, row-major, 4 bytes per pixel.
pub struct RasterCanvas {
    pub w: usize,
    pub h: usize,
    pub rgba: Vec<u8>,
    origin: Vec2,
}

impl RasterCanvas {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            rgba: vec![0u8; w * h * 4],
            origin: Vec2::ZERO,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.w || y >= self.h {
            return None;
        }
        let i = (y * self.w + x) * 4;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.rgba[i..i + 4]);
        Some(out)
    }

    #[inline]
    fn put(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 {
            return;
        }
        let i = (y as usize * self.w + x as usize) * 4;
        self.rgba[i..i + 4].copy_from_slice(&color);
    }

    /// Pixel span whose centres fall in `[lo, hi)`.
    #[inline]
    fn span(lo: f32, hi: f32) -> std::ops::Range<i64> {
        (lo - 0.5).ceil() as i64..(hi - 0.5).ceil() as i64
    }

    /// Fill in device space (origin already applied).
    fn fill_device(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        for py in Self::span(y, y + h) {
            for px in Self::span(x, x + w) {
                self.put(px, py, color);
            }
        }
    }

    fn stroke_segment(&mut self, a: Vec2, b: Vec2, stroke: Stroke) {
        let r = (stroke.weight * 0.5).max(0.5);
        let min = a.min(b) - Vec2::splat(r);
        let max = a.max(b) + Vec2::splat(r);
        let ab = b - a;
        let len2 = ab.length_squared();

        for py in min.y.floor() as i64..=max.y.ceil() as i64 {
            for px in min.x.floor() as i64..=max.x.ceil() as i64 {
                let c = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let t = if len2 > 0.0 {
                    ((c - a).dot(ab) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                if c.distance(a + ab * t) <= r {
                    self.put(px, py, stroke.color);
                }
            }
        }
    }
}

impl Canvas for RasterCanvas {
    fn background(&mut self, color: Color) {
        if self.w == 0 || self.h == 0 {
            return;
        }
        let w = self.w;
        self.rgba.par_chunks_mut(w * 4).for_each(|row| {
            for px in row.chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
        });
    }

    fn translate(&mut self, offset: Vec2) {
        self.origin += offset;
    }

    fn draw_rect(&mut self, rect: Rect, fill: Option<Color>, stroke: Option<Stroke>) {
        let x = rect.x + self.origin.x;
        let y = rect.y + self.origin.y;

        if let Some(color) = fill {
            self.fill_device(x, y, rect.w, rect.h, color);
        }

        if let Some(stroke) = stroke {
            // Outline centred on the rect edges.
            let wt = stroke.weight;
            let half = wt * 0.5;
            let inner_h = (rect.h - wt).max(0.0);
            self.fill_device(x - half, y - half, rect.w + wt, wt, stroke.color);
            self.fill_device(x - half, y + rect.h - half, rect.w + wt, wt, stroke.color);
            self.fill_device(x - half, y + half, wt, inner_h, stroke.color);
            self.fill_device(x + rect.w - half, y + half, wt, inner_h, stroke.color);
        }
    }

    fn draw_path(&mut self, points: &[Vec2], stroke: Stroke) {
        let origin = self.origin;
        match points {
            [] => {}
            [p] => self.stroke_segment(*p + origin, *p + origin, stroke),
            _ => {
                for pair in points.windows(2) {
                    self.stroke_segment(pair[0] + origin, pair[1] + origin, stroke);
                }
            }
        }
    }
}

/// Paint every dungeon cell as a bordered rect filling a `canvas_w × canvas_h` surface.
pub fn draw_dungeon(dungeon: &Dungeon, canvas: &mut impl Canvas, canvas_w: f32, canvas_h: f32) {
    canvas.background(DUNGEON_BACKGROUND);
    if dungeon.width() == 0 || dungeon.height() == 0 {
        return;
    }

    let cell_w = canvas_w / dungeon.width() as f32;
    let cell_h = canvas_h / dungeon.height() as f32;

    for (pos, cell) in dungeon.grid.iter() {
        let fill = match cell {
            Cell::Wall => WALL,
            Cell::Empty => EMPTY,
        };
        let rect = Rect::new(pos.x as f32 * cell_w, pos.y as f32 * cell_h, cell_w, cell_h);
        canvas.draw_rect(rect, Some(fill), Some(CELL_BOUNDARY));
    }
}

/// Ink the spiral and both Bézier segments, positioned at `params.origin`.
pub fn draw_scroll(path: &ScrollPath, canvas: &mut impl Canvas, params: &ScrollParams) {
    let ink = Stroke::new(INK, params.stroke_weight);

    canvas.background(PAPER);
    canvas.translate(params.origin);

    let spiral: Vec<Vec2> = path.spiral_points().collect();
    canvas.draw_path(&spiral, ink);
    canvas.draw_path(&path.first.sample(params.bezier_segments), ink);
    canvas.draw_path(&path.second.sample(params.bezier_segments), ink);
}
