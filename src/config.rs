use glam::Vec2;
use serde::Deserialize;

use crate::grid::Position;

/// Dungeon sketch parameters. Missing JSON fields fall back to the defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DungeonParams {
    pub grid_w: usize,
    pub grid_h: usize,
    pub steps: usize,
    /// Walk start; the grid centre when unset.
    pub start: Option<Position>,

    // Output surface
    pub canvas_w: usize,
    pub canvas_h: usize,
}

impl Default for DungeonParams {
    fn default() -> Self {
        Self {
            grid_w: 10,
            grid_h: 10,
            steps: 100,
            start: None,
            canvas_w: 400,
            canvas_h: 400,
        }
    }
}

/// Spiral + S-curve "scroll" parameters. Offsets are relative to the spiral junction P0.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScrollParams {
    // Spiral
    pub a: f32,
    pub b: f32,
    pub turns: f32,
    pub tangent_angle: f32,

    // Middle joint
    pub mid_offset: Vec2,
    pub mid_pull: Vec2,
    pub mid_tangent_len: f32,

    // End point
    pub end_offset: Vec2,
    pub end_pull: Vec2,

    // Output surface
    pub origin: Vec2,
    pub canvas_w: usize,
    pub canvas_h: usize,
    pub stroke_weight: f32,
    pub bezier_segments: usize,
}

impl Default for ScrollParams {
    fn default() -> Self {
        Self {
            a: 20.0,
            b: 0.3,
            turns: 1.2,
            tangent_angle: 0.0,
            mid_offset: Vec2::new(250.0, -40.0),
            mid_pull: Vec2::new(-50.0, -10.0),
            mid_tangent_len: 50.0,
            end_offset: Vec2::new(450.0, 20.0),
            end_pull: Vec2::new(-50.0, 10.0),
            origin: Vec2::new(100.0, 200.0),
            canvas_w: 600,
            canvas_h: 400,
            stroke_weight: 3.0,
            bezier_segments: 64,
        }
    }
}
