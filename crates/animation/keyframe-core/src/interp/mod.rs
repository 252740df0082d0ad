//! Interpolation between two keyframe values of one parameter.
//!
//! Two linear endpoints blend linearly. If either endpoint is Bezier the
//! segment is a cubic Bezier in (frame, value) space through
//! `start`, `start.out`, `end.in`, `end`; handles missing on a linear
//! endpoint (or unset on a Bezier one) are synthesized a fraction of the way
//! toward the other endpoint.

pub mod functions;

use crate::value::{NumericValue, DEFAULT_CONTROL_PERCENT};
use functions::{cubic_bezier, cubic_bezier_casteljau, lerp};

/// Stateless evaluator for the segment between two keyframes.
/// Expects `start.frame() < end.frame()`.
#[derive(Copy, Clone, Debug)]
pub struct Interpolator<'a> {
    start: &'a NumericValue,
    end: &'a NumericValue,
}

impl<'a> Interpolator<'a> {
    pub fn new(start: &'a NumericValue, end: &'a NumericValue) -> Self {
        Self { start, end }
    }

    #[inline]
    fn is_linear(&self) -> bool {
        matches!(
            (self.start, self.end),
            (NumericValue::Linear(_), NumericValue::Linear(_))
        )
    }

    /// The four Bezier control points in (frame, value) space.
    pub fn control_points(&self) -> [[f64; 2]; 4] {
        let f0 = f64::from(self.start.frame());
        let f1 = f64::from(self.end.frame());
        let v0 = self.start.value();
        let v1 = self.end.value();
        let span = f1 - f0;

        let (out_percent, out_value) = match self.start {
            NumericValue::Bezier(b) => (b.out.percent, b.resolved_out(v1)),
            NumericValue::Linear(_) => (
                DEFAULT_CONTROL_PERCENT,
                lerp(v0, v1, DEFAULT_CONTROL_PERCENT),
            ),
        };
        let (in_percent, in_value) = match self.end {
            NumericValue::Bezier(b) => (b.r#in.percent, b.resolved_in(v0)),
            NumericValue::Linear(_) => (
                DEFAULT_CONTROL_PERCENT,
                lerp(v1, v0, DEFAULT_CONTROL_PERCENT),
            ),
        };

        let p1 = [f0 + out_percent * span, out_value];
        let p2 = [f1 - in_percent * span, in_value];
        [[f0, v0], p1, p2, [f1, v1]]
    }

    /// Interpolated value at normalized position `t` in [0, 1].
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if self.is_linear() {
            return lerp(self.start.value(), self.end.value(), t);
        }
        let [p0, p1, p2, p3] = self.control_points();
        cubic_bezier(p0[1], p1[1], p2[1], p3[1], t)
    }

    /// Curve point `(frame, value)` at parameter `t`, for drawing the segment.
    pub fn point_at(&self, t: f64) -> [f64; 2] {
        let t = t.clamp(0.0, 1.0);
        if self.is_linear() {
            let f0 = f64::from(self.start.frame());
            let f1 = f64::from(self.end.frame());
            return [lerp(f0, f1, t), self.evaluate(t)];
        }
        cubic_bezier_casteljau(self.control_points(), t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ParameterId;
    use crate::value::{BezierValue, ControlPoint};

    const OWNER: ParameterId = ParameterId(0);

    #[test]
    fn linear_midpoint_is_exact() {
        let a = NumericValue::linear(OWNER, 0, 0.0);
        let b = NumericValue::linear(OWNER, 10, 100.0);
        assert_eq!(Interpolator::new(&a, &b).evaluate(0.5), 50.0);
    }

    #[test]
    fn bezier_endpoints_hit_keyframes() {
        let mut a = BezierValue::new(OWNER, 0, 1.0);
        a.out = ControlPoint::new(5.0, 0.4);
        let a = NumericValue::Bezier(a);
        let b = NumericValue::linear(OWNER, 10, -3.0);
        let it = Interpolator::new(&a, &b);
        assert_eq!(it.evaluate(0.0), 1.0);
        assert_eq!(it.evaluate(1.0), -3.0);
    }

    #[test]
    fn linear_endpoint_handle_is_synthesized_toward_neighbour() {
        let a = NumericValue::linear(OWNER, 0, 0.0);
        let b = NumericValue::bezier(OWNER, 10, 10.0);
        let cps = Interpolator::new(&a, &b).control_points();
        assert!((cps[1][0] - 4.0).abs() < 1e-12);
        assert!((cps[1][1] - 4.0).abs() < 1e-12);
        assert!((cps[2][0] - 6.0).abs() < 1e-12);
        assert!((cps[2][1] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn flat_handles_ease_in_and_out() {
        let mut a = BezierValue::new(OWNER, 0, 0.0);
        a.out.value = Some(0.0);
        let mut b = BezierValue::new(OWNER, 10, 1.0);
        b.r#in.value = Some(1.0);
        let (a, b) = (NumericValue::Bezier(a), NumericValue::Bezier(b));
        let it = Interpolator::new(&a, &b);
        // 3ut^2 + t^3 at t=0.25 -> 0.15625, below the linear 0.25
        assert!((it.evaluate(0.25) - 0.15625).abs() < 1e-12);
        assert!((it.evaluate(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn point_at_follows_the_curve() {
        let a = NumericValue::bezier(OWNER, 0, 2.0);
        let b = NumericValue::bezier(OWNER, 20, 8.0);
        let it = Interpolator::new(&a, &b);
        let p = it.point_at(0.3);
        assert!((p[1] - it.evaluate(0.3)).abs() < 1e-12);
        assert_eq!(it.point_at(0.0), [0.0, 2.0]);
        let end = it.point_at(1.0);
        assert!((end[0] - 20.0).abs() < 1e-12 && (end[1] - 8.0).abs() < 1e-12);
    }
}
