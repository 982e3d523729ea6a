use glam::Vec2;

/// RGBA8 color.
pub type Color = [u8; 4];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub weight: f32,
}

impl Stroke {
    pub const fn new(color: Color, weight: f32) -> Self {
        Self { color, weight }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Drawing surface the sketches emit geometry into.
/// All style is passed per call; there is no current fill or stroke.
pub trait Canvas {
    fn background(&mut self, color: Color);

    /// Shift the origin of all following draw calls by `offset`.
    fn translate(&mut self, offset: Vec2);

    fn draw_rect(&mut self, rect: Rect, fill: Option<Color>, stroke: Option<Stroke>);

    /// Open polyline through `points`.
    fn draw_path(&mut self, points: &[Vec2], stroke: Stroke);
}
