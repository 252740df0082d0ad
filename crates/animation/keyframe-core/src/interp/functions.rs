//! Interpolation helpers:
//! - lerp (linear blend of scalars and 2D points)
//! - cubic_bezier (polynomial form)
//! - cubic_bezier_casteljau (repeated lerp; same curve)

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
pub fn lerp2(a: [f64; 2], b: [f64; 2], t: f64) -> [f64; 2] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t)]
}

/// Cubic Bezier basis function
#[inline]
pub fn cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// De Casteljau evaluation of a cubic curve in (frame, value) space.
pub fn cubic_bezier_casteljau(p: [[f64; 2]; 4], t: f64) -> [f64; 2] {
    let a = lerp2(p[0], p[1], t);
    let b = lerp2(p[1], p[2], t);
    let c = lerp2(p[2], p[3], t);
    let d = lerp2(a, b, t);
    let e = lerp2(b, c, t);
    lerp2(d, e, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polynomial_and_casteljau_agree() {
        let pts = [[0.0, 1.0], [3.0, 4.0], [7.0, -2.0], [10.0, 5.0]];
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            let c = cubic_bezier_casteljau(pts, t);
            let x = cubic_bezier(pts[0][0], pts[1][0], pts[2][0], pts[3][0], t);
            let y = cubic_bezier(pts[0][1], pts[1][1], pts[2][1], pts[3][1], t);
            assert!((c[0] - x).abs() < 1e-12, "x t={t}");
            assert!((c[1] - y).abs() < 1e-12, "y t={t}");
        }
    }

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(cubic_bezier(2.0, 9.0, -4.0, 6.0, 0.0), 2.0);
        assert_eq!(cubic_bezier(2.0, 9.0, -4.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(3.0, 7.0, 0.0), 3.0);
    }
}
