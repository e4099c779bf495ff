use crate::math::profile::{ProfileCurve, ProfilePoint};

/// Radius returned outside the sketched height range.
pub const FALLBACK_RADIUS: f32 = 0.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum InterpolationMode {
    /// One piecewise-linear curve through all points, ordered by height.
    #[default]
    Piecewise,
    /// Every pair of consecutively placed points is its own segment.
    Segments,
}

impl InterpolationMode {
    pub fn label(self) -> &'static str {
        match self {
            InterpolationMode::Piecewise => "Piecewise",
            InterpolationMode::Segments => "Segments",
        }
    }
}

/// Maps a normalized parameter `t` in [0, 1] onto a point of the profile.
pub trait ProfileSampler {
    fn sample(&self, t: f32) -> ProfilePoint;
}

/// Piecewise-linear radius function over the curve's knots.
#[derive(Clone, Debug, Default)]
pub struct PiecewiseLinear {
    knots: Vec<ProfilePoint>,
}

impl PiecewiseLinear {
    pub fn new(curve: &ProfileCurve) -> Self {
        Self {
            knots: curve.knots(),
        }
    }

    pub fn knots(&self) -> &[ProfilePoint] {
        &self.knots
    }

    /// Height range covered by the knots.
    pub fn domain(&self) -> Option<(f32, f32)> {
        let first = self.knots.first()?;
        let last = self.knots.last()?;
        Some((first.height, last.height))
    }

    pub fn radius_at(&self, u: f32) -> f32 {
        let (min, max) = match self.domain() {
            Some(domain) => domain,
            None => return FALLBACK_RADIUS,
        };

        if u < min || u > max || u.is_nan() {
            return FALLBACK_RADIUS;
        }

        // first knot with height >= u; always in range since u <= max
        let upper = self.knots.partition_point(|k| k.height < u);
        let hi = self.knots[upper];
        if hi.height == u || upper == 0 {
            return hi.radius;
        }

        let lo = self.knots[upper - 1];
        let t = (u - lo.height) / (hi.height - lo.height);
        lo.radius + (hi.radius - lo.radius) * t
    }
}

impl ProfileSampler for PiecewiseLinear {
    fn sample(&self, t: f32) -> ProfilePoint {
        let Some((min, max)) = self.domain() else {
            return ProfilePoint::new(0.0, FALLBACK_RADIUS);
        };

        let height = (min + (max - min) * t).clamp(min, max);
        ProfilePoint::new(height, self.radius_at(height))
    }
}

/// Straight segment between two placed points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: ProfilePoint,
    pub end: ProfilePoint,
}

impl Segment {
    pub fn new(start: ProfilePoint, end: ProfilePoint) -> Self {
        Self { start, end }
    }

    /// Consecutive placement-order pairs of the curve.
    pub fn chain(curve: &ProfileCurve) -> Vec<Segment> {
        curve
            .points()
            .windows(2)
            .map(|pair| Segment::new(pair[0], pair[1]))
            .collect()
    }
}

impl ProfileSampler for Segment {
    fn sample(&self, t: f32) -> ProfilePoint {
        if t >= 1.0 {
            return self.end;
        }
        self.start.lerp(self.end, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(points: &[(f32, f32)]) -> PiecewiseLinear {
        PiecewiseLinear::new(&ProfileCurve::from_points(
            points.iter().map(|&(h, r)| ProfilePoint::new(h, r)),
        ))
    }

    #[test]
    fn two_point_profile_blends_linearly() {
        let p = curve(&[(0.0, 0.5), (1.0, 0.2)]);

        assert_eq!(p.radius_at(0.0), 0.5);
        assert_eq!(p.radius_at(1.0), 0.2);
        assert!((p.radius_at(0.5) - 0.35).abs() < 1e-6);
    }

    #[test]
    fn exact_at_every_knot() {
        let points = [(-0.8, 0.1), (-0.3, 0.6), (0.1, 0.25), (0.7, 0.9)];
        let p = curve(&points);

        for &(h, r) in &points {
            assert_eq!(p.radius_at(h), r);
        }
    }

    #[test]
    fn linear_between_adjacent_knots() {
        let points = [(-0.8, 0.1), (-0.3, 0.6), (0.1, 0.25), (0.7, 0.9)];
        let p = curve(&points);

        for pair in points.windows(2) {
            let (k1, v1) = pair[0];
            let (k2, v2) = pair[1];
            for step in 1..10 {
                let u = k1 + (k2 - k1) * step as f32 / 10.0;
                let expected = v1 + (v2 - v1) * (u - k1) / (k2 - k1);
                assert!((p.radius_at(u) - expected).abs() < 1e-5, "u = {u}");
            }
        }
    }

    #[test]
    fn outside_domain_returns_fallback() {
        let p = curve(&[(-0.5, 0.4), (0.5, 0.6)]);

        assert_eq!(p.radius_at(-0.51), FALLBACK_RADIUS);
        assert_eq!(p.radius_at(0.9), FALLBACK_RADIUS);
        assert_eq!(p.radius_at(f32::NAN), FALLBACK_RADIUS);
    }

    #[test]
    fn empty_and_single_point_profiles() {
        let empty = curve(&[]);
        assert_eq!(empty.radius_at(0.0), FALLBACK_RADIUS);
        assert_eq!(empty.domain(), None);

        let single = curve(&[(0.3, 0.7)]);
        assert_eq!(single.radius_at(0.3), 0.7);
        assert_eq!(single.radius_at(0.31), FALLBACK_RADIUS);
    }

    #[test]
    fn sampler_spans_domain_and_hits_last_knot() {
        let p = curve(&[(-0.3, 0.2), (0.7, 0.4)]);

        assert_eq!(p.sample(0.0), ProfilePoint::new(-0.3, 0.2));
        let last = p.sample(1.0);
        assert_eq!(last.height, 0.7);
        assert_eq!(last.radius, 0.4);
    }

    #[test]
    fn segments_follow_placement_order() {
        let c = ProfileCurve::from_points([
            ProfilePoint::new(0.0, 0.5),
            ProfilePoint::new(0.5, 0.1),
            ProfilePoint::new(0.2, 0.8),
        ]);
        let segments = Segment::chain(&c);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].sample(0.0), ProfilePoint::new(0.5, 0.1));
        assert_eq!(segments[1].sample(1.0), ProfilePoint::new(0.2, 0.8));

        let mid = segments[0].sample(0.5);
        assert!((mid.height - 0.25).abs() < 1e-6);
        assert!((mid.radius - 0.3).abs() < 1e-6);
    }
}
