//! Closest-approach geometry for straight path segments.
//!
//! Points are fixed-size arrays so the same routine serves planar (`[f64; 2]`)
//! and altitude-aware (`[f64; 3]`) comparisons.

/// Tolerance for near-zero lengths and denominators.
pub const EPSILON: f64 = 1e-8;

/// Minimum separation between two segments and the points achieving it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentApproach<const N: usize> {
    pub distance: f64,
    /// Closest point on the first segment
    pub point_a: [f64; N],
    /// Closest point on the second segment
    pub point_b: [f64; N],
}

/// Minimum distance between segment `p1-p2` and segment `p3-p4`.
///
/// Both segment parameters are clamped to `[0, 1]`, so the reported points
/// always lie on the finite segments.
pub fn closest_approach<const N: usize>(
    p1: &[f64; N],
    p2: &[f64; N],
    p3: &[f64; N],
    p4: &[f64; N],
) -> SegmentApproach<N> {
    let v1 = sub(p2, p1);
    let v2 = sub(p4, p3);
    let w0 = sub(p1, p3);

    let a = dot(&v1, &v1);
    let b = dot(&v1, &v2);
    let c = dot(&v2, &v2);
    let d = dot(&v1, &w0);
    let e = dot(&v2, &w0);
    let denom = a * c - b * b;

    let (point_a, point_b) = if denom.abs() < EPSILON {
        // Parallel or degenerate: foot of p3 on the first segment, then back onto the second.
        let t0 = if a > EPSILON { clamp_unit(-d / a) } else { 0.0 };
        let pt1 = add_scaled(p1, &v1, t0);
        let t1 = if c > EPSILON {
            clamp_unit(dot(&sub(&pt1, p3), &v2) / c)
        } else {
            0.0
        };
        (pt1, add_scaled(p3, &v2, t1))
    } else {
        let s = clamp_unit((b * e - c * d) / denom);
        let t = clamp_unit((a * e - b * d) / denom);
        (add_scaled(p1, &v1, s), add_scaled(p3, &v2, t))
    };

    SegmentApproach {
        distance: distance(&point_a, &point_b),
        point_a,
        point_b,
    }
}

/// Parameter in `[0, 1]` of `point` projected onto segment `start-end`.
///
/// Zero when the segment is shorter than [`EPSILON`].
pub fn projection_ratio<const N: usize>(start: &[f64; N], end: &[f64; N], point: &[f64; N]) -> f64 {
    let direction = sub(end, start);
    let length = norm(&direction);
    if length < EPSILON {
        return 0.0;
    }
    clamp_unit(dot(&sub(point, start), &direction) / (length * length))
}

pub fn distance<const N: usize>(a: &[f64; N], b: &[f64; N]) -> f64 {
    norm(&sub(a, b))
}

/// Drop the altitude component.
pub fn planar(point: &[f64; 3]) -> [f64; 2] {
    [point[0], point[1]]
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn sub<const N: usize>(a: &[f64; N], b: &[f64; N]) -> [f64; N] {
    std::array::from_fn(|i| a[i] - b[i])
}

fn add_scaled<const N: usize>(origin: &[f64; N], direction: &[f64; N], scale: f64) -> [f64; N] {
    std::array::from_fn(|i| origin[i] + scale * direction[i])
}

fn dot<const N: usize>(a: &[f64; N], b: &[f64; N]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm<const N: usize>(v: &[f64; N]) -> f64 {
    dot(v, v).sqrt()
}
