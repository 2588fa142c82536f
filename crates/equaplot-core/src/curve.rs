//! Parametric curves `(x(t), y(t), z(t))`
//!
//! The parameter sweeps `[-range, range]`. Each sample is classified as
//! inside or outside the cube of half-extent `range`; where the path crosses
//! the cube boundary the exact crossing point is interpolated. The sweep
//! produces one or more runs of consecutive inside points and only the
//! longest run is kept.

use crate::bounds::Aabb;
use glam::Vec3;

/// Curve samples taken per unit of resolution
pub const SAMPLES_PER_RESOLUTION: u32 = 10;

/// Anything that maps a parameter to a point in space
pub trait ParametricPath {
    /// Point at parameter `t`.
    ///
    /// Implementations should substitute 0 for any coordinate they cannot
    /// compute; non-finite coordinates are also treated as 0.
    fn point(&self, t: f32) -> Vec3;
}

impl<F: Fn(f32) -> Vec3> ParametricPath for F {
    fn point(&self, t: f32) -> Vec3 {
        self(t)
    }
}

/// Parameters for one curve generation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    /// Ten samples are taken per unit of resolution
    pub resolution: u32,
    /// Half-extent of both the parameter interval and the clipping cube
    pub range: f32,
    /// Added to every evaluated parameter, the sampled interval stays fixed
    pub time_offset: f32,
    /// Width applied uniformly to the polyline
    pub line_width: f32,
}

impl CurveParams {
    /// Number of segments between consecutive samples
    pub fn segments(&self) -> u32 {
        self.resolution
            .max(1)
            .saturating_mul(SAMPLES_PER_RESOLUTION)
    }

    /// Parameter of sample `i`, exact at both ends of the interval
    pub fn sample_parameter(&self, i: u32) -> f32 {
        -self.range + (i as f32 / self.segments() as f32) * 2.0 * self.range
    }
}

/// An ordered point sequence rendered with a uniform width
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vec3>,
    pub width: f32,
}

impl Polyline {
    pub fn new(points: Vec<Vec3>, width: f32) -> Self {
        Self { points, width }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Vec3> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Vec3> {
        self.points.last().copied()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.points.iter().copied())
    }
}

fn is_inside(p: Vec3, range: f32) -> bool {
    Aabb::cube(range).contains(p)
}

fn sanitize(p: Vec3) -> Vec3 {
    let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
    Vec3::new(finite(p.x), finite(p.y), finite(p.z))
}

/// Point where the segment from `inside` to `outside` leaves the cube
///
/// For every axis plane the outside point has passed, the interpolation
/// fraction to that plane is computed and the smallest one wins. An axis
/// whose direction component is zero never crosses.
pub fn boundary_crossing(inside: Vec3, outside: Vec3, range: f32) -> Vec3 {
    let dir = outside - inside;
    let mut t_min = 1.0_f32;
    let mut hit: Option<(usize, f32)> = None;

    for axis in 0..3 {
        let (start, end, delta) = (inside[axis], outside[axis], dir[axis]);
        if delta == 0.0 {
            continue;
        }
        let plane = if end > range {
            range
        } else if end < -range {
            -range
        } else {
            continue;
        };
        let t = (plane - start) / delta;
        if hit.is_none() || t < t_min {
            t_min = t;
            hit = Some((axis, plane));
        }
    }

    let t = t_min.clamp(0.0, 1.0);
    let mut point = inside + dir * t;
    // The winning axis lands on its plane exactly
    if let Some((axis, plane)) = hit {
        point[axis] = plane;
    }
    point.clamp(Vec3::splat(-range), Vec3::splat(range))
}

/// Index of the longest run, earliest wins ties
pub fn dominant_run(runs: &[Vec<Vec3>]) -> Option<usize> {
    runs.iter()
        .enumerate()
        .filter(|(_, run)| !run.is_empty())
        .fold(None, |best: Option<(usize, usize)>, (i, run)| match best {
            Some((_, len)) if len >= run.len() => best,
            _ => Some((i, run.len())),
        })
        .map(|(i, _)| i)
}

/// Split sampled points into runs clipped to the cube
pub fn clip_runs<I: IntoIterator<Item = Vec3>>(samples: I, range: f32) -> Vec<Vec<Vec3>> {
    let mut runs = Vec::new();
    let mut current: Vec<Vec3> = Vec::new();
    let mut prev: Option<(Vec3, bool)> = None;

    for point in samples {
        let inside = is_inside(point, range);

        match prev {
            None => {
                if inside {
                    current.push(point);
                }
            }
            Some((_, true)) if inside => current.push(point),
            Some((last, true)) => {
                current.push(boundary_crossing(last, point, range));
                runs.push(std::mem::take(&mut current));
            }
            Some((last, false)) if inside => {
                current.push(boundary_crossing(point, last, range));
                current.push(point);
            }
            Some((_, false)) => {}
        }

        prev = Some((point, inside));
    }

    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Sample `path` and keep the dominant clipped run
///
/// Returns an empty polyline when no sample falls inside the cube.
pub fn generate_curve<P: ParametricPath + ?Sized>(path: &P, params: &CurveParams) -> Polyline {
    let segments = params.segments();
    let samples = (0..=segments).map(|i| {
        let t = params.sample_parameter(i) + params.time_offset;
        sanitize(path.point(t))
    });

    let mut runs = clip_runs(samples, params.range);
    let points = dominant_run(&runs)
        .map(|i| runs.swap_remove(i))
        .unwrap_or_default();

    tracing::debug!(
        "Generated curve: {} samples, {} runs, kept {} points",
        segments + 1,
        runs.len() + usize::from(!points.is_empty()),
        points.len()
    );

    Polyline::new(points, params.line_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(resolution: u32, range: f32) -> CurveParams {
        CurveParams {
            resolution,
            range,
            time_offset: 0.0,
            line_width: 0.1,
        }
    }

    fn assert_within(polyline: &Polyline, range: f32) {
        for p in &polyline.points {
            assert!(
                p.abs().max_element() <= range,
                "point {:?} outside the cube",
                p
            );
        }
    }

    #[test]
    fn test_straight_line_hits_both_faces_exactly() {
        let line = |t: f32| Vec3::new(t, 0.0, 0.0);
        let curve = generate_curve(&line, &params(100, 10.0));

        assert_eq!(curve.len(), 1001);
        assert_eq!(curve.first().map(|p| p.x), Some(-10.0));
        assert_eq!(curve.last().map(|p| p.x), Some(10.0));
        assert_within(&curve, 10.0);
        assert_eq!(curve.width, 0.1);
    }

    #[test]
    fn test_exit_is_clipped_to_boundary() {
        let line = |t: f32| Vec3::new(2.0 * t, 0.0, 0.0);
        let curve = generate_curve(&line, &params(10, 10.0));

        assert_eq!(curve.first().map(|p| p.x), Some(-10.0));
        assert_eq!(curve.last().map(|p| p.x), Some(10.0));
        assert_within(&curve, 10.0);
    }

    #[test]
    fn test_diagonal_crossing_uses_nearest_plane() {
        let inside = Vec3::new(0.0, 0.0, 0.0);
        let outside = Vec3::new(20.0, 40.0, 0.0);
        let p = boundary_crossing(inside, outside, 10.0);
        // y reaches its plane at a quarter of the way, x only at half
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 10.0, epsilon = 1e-5);
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn test_crossing_ignores_axes_without_motion() {
        // z is out of range on both ends but does not move, so it never crosses
        let inside = Vec3::new(0.0, 0.0, 12.0);
        let outside = Vec3::new(20.0, 0.0, 12.0);
        let p = boundary_crossing(inside, outside, 10.0);
        assert!(p.is_finite());
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-5);
        assert_eq!(p.z, 10.0);
    }

    #[test]
    fn test_entry_crossing_starts_new_run() {
        let samples = vec![
            Vec3::new(-20.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
        ];
        let runs = clip_runs(samples, 10.0);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 3);
        assert_relative_eq!(runs[0][0].x, -10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_only_longest_arc_is_kept() {
        // 101 samples at t = -10, -9.8, ..., 10. Sample indices 10..=12 are
        // inside (3 points + 2 crossings = 5), indices 40..=57 are inside
        // (18 points + 2 crossings = 20). Everything else is far outside.
        let path = |t: f32| {
            let i = ((t + 10.0) / 0.2).round() as i32;
            let inside = (10..=12).contains(&i) || (40..=57).contains(&i);
            if inside {
                Vec3::new(0.1 * t, 1.0, 0.0)
            } else {
                Vec3::new(50.0, 1.0, 0.0)
            }
        };

        let curve = generate_curve(&path, &params(10, 10.0));
        assert_eq!(curve.len(), 20);
        assert_relative_eq!(curve.points[0].x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(curve.points[19].x, 10.0, epsilon = 1e-4);
        assert_within(&curve, 10.0);
    }

    #[test]
    fn test_ties_keep_earliest_run() {
        let runs = vec![
            vec![Vec3::X, Vec3::Y],
            vec![Vec3::Z, Vec3::ONE],
            vec![Vec3::ZERO],
        ];
        assert_eq!(dominant_run(&runs), Some(0));
    }

    #[test]
    fn test_huge_resolution_saturates() {
        let p = params(u32::MAX, 10.0);
        assert_eq!(p.segments(), u32::MAX);
        assert_eq!(p.sample_parameter(0), -10.0);
    }

    #[test]
    fn test_negative_range_gives_empty_curve() {
        let line = |t: f32| Vec3::new(t, 0.0, 0.0);
        let curve = generate_curve(&line, &params(10, -10.0));
        assert!(curve.is_empty());
    }

    #[test]
    fn test_curve_entirely_outside_is_empty() {
        let far = |t: f32| Vec3::new(100.0 + t, 0.0, 0.0);
        let curve = generate_curve(&far, &params(10, 10.0));
        assert!(curve.is_empty());
        assert!(curve.bounds().is_none());
    }

    #[test]
    fn test_time_offset_shifts_evaluation_not_domain() {
        let line = |t: f32| Vec3::new(t, 0.0, 0.0);
        let mut p = params(10, 10.0);
        p.time_offset = 5.0;
        let curve = generate_curve(&line, &p);

        // Evaluated t runs -5..15 so the curve exits at x = 10
        assert_relative_eq!(curve.points[0].x, -5.0, epsilon = 1e-5);
        assert_eq!(curve.last().map(|p| p.x), Some(10.0));
        assert_within(&curve, 10.0);
    }

    #[test]
    fn test_non_finite_coordinates_become_zero() {
        let path = |t: f32| Vec3::new(t, f32::NAN, f32::INFINITY);
        let curve = generate_curve(&path, &params(10, 10.0));
        assert_eq!(curve.len(), 101);
        assert!(curve.points.iter().all(|p| p.y == 0.0 && p.z == 0.0));
    }
}
