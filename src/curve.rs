//! Spiral-to-Bézier path stitching.
//!
//! A logarithmic spiral `r = a·e^(bθ)` is cut where its tangent points along
//! a target angle, then continued by two cubic Bézier segments. The first
//! control point sits on that tangent at a third of the spiral's radius of
//! curvature, and the control points around the middle joint are kept
//! collinear with it.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::Serialize;

use crate::config::ScrollParams;

/// Angular increment between sampled spiral points (radians).
pub const SPIRAL_STEP: f32 = 0.05;

/// Largest spiral sweep `stitch` accepts, in turns (about 12.6k samples).
pub const MAX_TURNS: f32 = 100.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StitchError {
    #[error("tangent at {joint} is undefined: control point coincides with the joint")]
    DegenerateTangent { joint: Vec2 },
    #[error("spiral parameter `{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
    #[error("spiral turns {turns} exceed the maximum of {max}")]
    TooManyTurns { turns: f32, max: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Spiral {
    pub a: f32,
    pub b: f32,
    pub theta_start: f32,
    pub theta_end: f32,
}

impl Spiral {
    #[inline]
    pub fn radius_at(&self, theta: f32) -> f32 {
        self.a * (self.b * theta).exp()
    }

    #[inline]
    pub fn point_at(&self, theta: f32) -> Vec2 {
        Vec2::from_angle(theta) * self.radius_at(theta)
    }

    /// Number of samples `points` yields. Zero for a negative, NaN or infinite sweep.
    pub fn sample_count(&self) -> usize {
        let span = self.theta_end - self.theta_start;
        if !span.is_finite() || span < 0.0 {
            return 0;
        }
        ((span / SPIRAL_STEP).floor() as usize).saturating_add(1)
    }

    /// Lazily sampled points from `theta_start` up to `theta_end`.
    /// Each call starts a fresh pass.
    pub fn points(&self) -> SpiralPoints {
        SpiralPoints {
            spiral: *self,
            i: 0,
            count: self.sample_count(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SpiralPoints {
    spiral: Spiral,
    i: usize,
    count: usize,
}

impl Iterator for SpiralPoints {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        if self.i >= self.count {
            return None;
        }
        let theta = self.spiral.theta_start + self.i as f32 * SPIRAL_STEP;
        self.i += 1;
        Some(self.spiral.point_at(theta))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.i;
        (left, Some(left))
    }
}

impl ExactSizeIterator for SpiralPoints {}

/// Spiral end point and the first Bézier control point leaving it.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SpiralJunction {
    pub spiral: Spiral,
    pub p0: Vec2,
    pub p1: Vec2,
    /// |P1 − P0|, a third of the radius of curvature at P0.
    pub control_len: f32,
}

/// Place the spiral so that its tangent at the end equals `target_angle`
/// and return the junction with a curvature-matched first control point.
pub fn spiral_junction(a: f32, b: f32, turns: f32, target_angle: f32) -> SpiralJunction {
    // Angle between the radius vector and the tangent of a log spiral.
    let alpha = (1.0 / b).atan();
    let theta_end = target_angle - alpha;
    let theta_start = theta_end - TAU * turns;
    let spiral = Spiral {
        a,
        b,
        theta_start,
        theta_end,
    };

    let r0 = spiral.radius_at(theta_end);
    let p0 = spiral.point_at(theta_end);

    let kappa = (1.0 + b * b).sqrt() / r0;
    let control_len = 1.0 / (3.0 * kappa);
    let p1 = p0 + Vec2::from_angle(target_angle) * control_len;

    log::debug!(
        "spiral junction: theta {:.3}..{:.3}, r0 {:.3}, L {:.3}",
        theta_start,
        theta_end,
        r0,
        control_len
    );

    SpiralJunction {
        spiral,
        p0,
        p1,
        control_len,
    }
}

/// B(t) = (1-t)³·P0 + 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³·P3
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let inv = 1.0 - t;
    let inv2 = inv * inv;
    let t2 = t * t;
    inv2 * inv * p0 + 3.0 * inv2 * t * p1 + 3.0 * inv * t2 * p2 + t2 * t * p3
}

/// Control point opposite `before` across `joint`, `len` away from it.
/// Keeps `before`, `joint` and the result collinear.
/// `None` when `before == joint` (no direction to continue).
pub fn continue_tangent(joint: Vec2, before: Vec2, len: f32) -> Option<Vec2> {
    (joint - before)
        .try_normalize()
        .map(|dir| joint + dir * len)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CubicSegment {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl CubicSegment {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    pub fn eval(&self, t: f32) -> Vec2 {
        cubic_bezier(self.p0, self.p1, self.p2, self.p3, t)
    }

    /// `segments + 1` evenly parameterised points, endpoints included.
    pub fn sample(&self, segments: usize) -> Vec<Vec2> {
        let n = segments.max(1);
        (0..=n).map(|i| self.eval(i as f32 / n as f32)).collect()
    }
}

/// Spiral followed by two tangent-continuous cubic segments.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ScrollPath {
    pub junction: SpiralJunction,
    pub first: CubicSegment,
    pub second: CubicSegment,
}

impl ScrollPath {
    pub fn stitch(params: &ScrollParams) -> Result<Self, StitchError> {
        for (name, value) in [
            ("a", params.a),
            ("b", params.b),
            ("turns", params.turns),
            ("tangent_angle", params.tangent_angle),
        ] {
            if !value.is_finite() {
                return Err(StitchError::NonFinite { name, value });
            }
        }
        if params.turns > MAX_TURNS {
            return Err(StitchError::TooManyTurns {
                turns: params.turns,
                max: MAX_TURNS,
            });
        }

        let junction = spiral_junction(params.a, params.b, params.turns, params.tangent_angle);
        let p0 = junction.p0;

        let mid = p0 + params.mid_offset;
        let mid_in = mid + params.mid_pull;
        let mid_out = continue_tangent(mid, mid_in, params.mid_tangent_len)
            .ok_or(StitchError::DegenerateTangent { joint: mid })?;

        let end = p0 + params.end_offset;
        let end_in = end + params.end_pull;

        Ok(Self {
            junction,
            first: CubicSegment::new(p0, junction.p1, mid_in, mid),
            second: CubicSegment::new(mid, mid_out, end_in, end),
        })
    }

    pub fn spiral_points(&self) -> SpiralPoints {
        self.junction.spiral.points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn cross(a: Vec2, b: Vec2) -> f32 {
        a.x * b.y - a.y * b.x
    }

    #[test]
    fn horizontal_launch_keeps_control_point_level() {
        let j = spiral_junction(20.0, 0.3, 1.2, 0.0);
        let d = j.p1 - j.p0;
        assert!(d.x > 0.0);
        assert_relative_eq!(d.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(d.length(), j.control_len, epsilon = 1e-4);
    }

    #[test]
    fn vertical_launch_points_up_the_y_axis() {
        let j = spiral_junction(10.0, 0.5, 2.0, FRAC_PI_2);
        let d = j.p1 - j.p0;
        assert_relative_eq!(d.x, 0.0, epsilon = 1e-4);
        assert!(d.y > 0.0);
    }

    #[test]
    fn spiral_tangent_matches_target_at_end() {
        let target = 0.7;
        let j = spiral_junction(15.0, 0.25, 1.0, target);
        let s = j.spiral;
        let h = 1e-3;
        let tangent = s.point_at(s.theta_end + h) - s.point_at(s.theta_end - h);
        assert_relative_eq!(cross(tangent.normalize(), Vec2::from_angle(target)), 0.0, epsilon = 1e-3);
        assert!(tangent.dot(Vec2::from_angle(target)) > 0.0);
    }

    #[test]
    fn control_length_is_third_of_curvature_radius() {
        let (a, b) = (20.0f32, 0.3f32);
        let j = spiral_junction(a, b, 1.2, 0.0);
        let r0 = j.p0.length();
        let radius_of_curvature = r0 / (1.0 + b * b).sqrt();
        assert_relative_eq!(j.control_len, radius_of_curvature / 3.0, epsilon = 1e-4);
    }

    #[test]
    fn spiral_sweep_spans_requested_turns() {
        let j = spiral_junction(20.0, 0.3, 1.2, 0.0);
        assert_relative_eq!(j.spiral.theta_end - j.spiral.theta_start, TAU * 1.2, epsilon = 1e-4);
        assert_relative_eq!(j.spiral.theta_end, -(1.0f32 / 0.3).atan(), epsilon = 1e-6);
    }

    #[test]
    fn spiral_points_are_finite_and_restartable() {
        let j = spiral_junction(20.0, 0.3, 1.2, 0.0);
        let first: Vec<Vec2> = j.spiral.points().collect();
        let second: Vec<Vec2> = j.spiral.points().collect();
        let expected = ((TAU * 1.2) / SPIRAL_STEP).floor() as usize + 1;
        assert!(first.len().abs_diff(expected) <= 1);
        assert_eq!(first, second);
        assert_eq!(first[0], j.spiral.point_at(j.spiral.theta_start));

        let iter = j.spiral.points();
        let cloned = iter.clone();
        assert_eq!(iter.count(), cloned.count());
    }

    #[test]
    fn spiral_points_stay_on_the_curve() {
        let s = spiral_junction(5.0, 0.2, 0.5, 1.0).spiral;
        for p in s.points() {
            let theta = p.y.atan2(p.x);
            let r = p.length();
            // r = a·e^(bθ) up to a whole number of turns
            let k = ((r / s.a).ln() / s.b - theta) / TAU;
            assert_relative_eq!(k, k.round(), epsilon = 1e-3);
        }
    }

    #[test]
    fn infinite_turns_yield_no_points() {
        let j = spiral_junction(20.0, 0.3, f32::INFINITY, 0.0);
        assert_eq!(j.spiral.sample_count(), 0);
        assert_eq!(j.spiral.points().count(), 0);
    }

    #[test]
    fn nan_angle_yields_no_points() {
        let j = spiral_junction(20.0, 0.3, 1.2, f32::NAN);
        assert_eq!(j.spiral.points().count(), 0);
    }

    #[test]
    fn point_count_matches_size_hint() {
        let s = spiral_junction(20.0, 0.3, 1.2, 0.0).spiral;
        let mut it = s.points();
        assert_eq!(it.len(), s.sample_count());
        it.next();
        assert_eq!(it.len(), s.sample_count() - 1);
    }

    #[test]
    fn huge_turns_are_counted_without_overflow() {
        // Past u32 sample indices; only the count is computed.
        let s = spiral_junction(20.0, 0.3, 1e8, 0.0).spiral;
        assert!(s.sample_count() > u32::MAX as usize);
    }

    #[test]
    fn stitch_rejects_non_finite_spiral_params() {
        let cases = [
            ScrollParams { turns: f32::INFINITY, ..ScrollParams::default() },
            ScrollParams { tangent_angle: f32::NAN, ..ScrollParams::default() },
            ScrollParams { a: f32::NEG_INFINITY, ..ScrollParams::default() },
            ScrollParams { b: f32::NAN, ..ScrollParams::default() },
        ];
        for params in cases {
            assert!(matches!(
                ScrollPath::stitch(&params),
                Err(StitchError::NonFinite { .. })
            ));
        }
    }

    #[test]
    fn stitch_rejects_overflowing_json_turns() {
        let params: ScrollParams = serde_json::from_str(r#"{"turns": 1e39}"#).unwrap();
        assert!(params.turns.is_infinite());
        assert_eq!(
            ScrollPath::stitch(&params).unwrap_err(),
            StitchError::NonFinite { name: "turns", value: f32::INFINITY }
        );
    }

    #[test]
    fn stitch_bounds_turns() {
        let at_max = ScrollParams { turns: MAX_TURNS, ..ScrollParams::default() };
        let path = ScrollPath::stitch(&at_max).unwrap();
        assert!(path.spiral_points().len() <= (TAU * MAX_TURNS / SPIRAL_STEP) as usize + 1);

        let over = ScrollParams { turns: 1e6, ..ScrollParams::default() };
        assert_eq!(
            ScrollPath::stitch(&over).unwrap_err(),
            StitchError::TooManyTurns { turns: 1e6, max: MAX_TURNS }
        );
    }

    #[test]
    fn negative_turns_yield_no_points() {
        let j = spiral_junction(20.0, 0.3, -1.0, 0.0);
        assert_eq!(j.spiral.points().count(), 0);
    }

    #[test]
    fn continued_tangent_is_collinear_at_exact_length() {
        let cases = [
            (Vec2::new(250.0, -40.0), Vec2::new(200.0, -50.0), 50.0),
            (Vec2::new(0.0, 0.0), Vec2::new(-3.0, 4.0), 12.5),
            (Vec2::new(10.0, 10.0), Vec2::new(10.0, 30.0), 1.0),
        ];
        for (mid, mid_in, len) in cases {
            let mid_out = continue_tangent(mid, mid_in, len).unwrap();
            let out = mid_out - mid;
            let inc = mid - mid_in;
            assert_relative_eq!(cross(out, inc), 0.0, epsilon = 1e-2);
            assert!(out.dot(inc) > 0.0);
            assert_relative_eq!(out.length(), len, epsilon = 1e-4);
        }
    }

    #[test]
    fn coincident_points_have_no_tangent() {
        let p = Vec2::new(3.0, 3.0);
        assert_eq!(continue_tangent(p, p, 10.0), None);
    }

    #[test]
    fn cubic_bezier_hits_endpoints_and_midpoint() {
        let seg = CubicSegment::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
        );
        assert!((seg.eval(0.0) - seg.p0).length() < 1e-4);
        assert!((seg.eval(1.0) - seg.p3).length() < 1e-4);
        assert!((seg.eval(0.5) - Vec2::new(5.0, 5.0)).length() < 1e-4);

        let pts = seg.sample(8);
        assert_eq!(pts.len(), 9);
        assert_eq!(pts[0], seg.p0);
        assert!((pts[8] - seg.p3).length() < 1e-4);
    }

    #[test]
    fn stitched_scroll_is_tangent_continuous() {
        let params = ScrollParams::default();
        let path = ScrollPath::stitch(&params).unwrap();

        assert_eq!(path.first.p0, path.junction.p0);
        assert_eq!(path.first.p3, path.second.p0);

        // Spiral → first segment: leaves along the target angle.
        let t0 = path.first.p1 - path.first.p0;
        assert_relative_eq!(cross(t0, Vec2::from_angle(params.tangent_angle)), 0.0, epsilon = 1e-3);

        // First → second: same direction at the joint.
        let a = (path.first.p3 - path.first.p2).normalize();
        let b = (path.second.p1 - path.second.p0).normalize();
        assert_relative_eq!(a.dot(b), 1.0, epsilon = 1e-5);
        assert_relative_eq!(
            (path.second.p1 - path.second.p0).length(),
            params.mid_tangent_len,
            epsilon = 1e-3
        );

        assert!((path.second.p3 - (path.junction.p0 + params.end_offset)).length() < 1e-4);
    }

    #[test]
    fn zero_mid_pull_is_rejected() {
        let params = ScrollParams {
            mid_pull: Vec2::ZERO,
            ..ScrollParams::default()
        };
        assert!(matches!(
            ScrollPath::stitch(&params),
            Err(StitchError::DegenerateTangent { .. })
        ));
    }
}
