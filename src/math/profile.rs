use glam::Vec2;

/// A point of the profile sketch: `height` runs along the revolution axis,
/// `radius` is the distance from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfilePoint {
    pub height: f32,
    pub radius: f32,
}

impl ProfilePoint {
    pub const fn new(height: f32, radius: f32) -> Self {
        Self { height, radius }
    }

    /// Editor canvas coordinates are NDC with x to the right and y up.
    pub fn from_ndc(ndc: Vec2) -> Self {
        Self {
            height: ndc.y,
            radius: ndc.x,
        }
    }

    pub fn to_ndc(self) -> Vec2 {
        Vec2::new(self.radius, self.height)
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            height: self.height + (other.height - self.height) * t,
            radius: self.radius + (other.radius - self.radius) * t,
        }
    }
}

/// The sketched profile, kept in the order the points were placed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileCurve {
    points: Vec<ProfilePoint>,
}

impl ProfileCurve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: impl IntoIterator<Item = ProfilePoint>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    pub fn push(&mut self, point: ProfilePoint) {
        self.points.push(point);
    }

    pub fn remove_last(&mut self) -> Option<ProfilePoint> {
        self.points.pop()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn replace_with(&mut self, points: impl IntoIterator<Item = ProfilePoint>) {
        self.points.clear();
        self.points.extend(points);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in placement order.
    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    /// Points sorted by height with one radius per height. When two points
    /// share a height, the one placed later wins. `-0.0` and `0.0` are the
    /// same height.
    pub fn knots(&self) -> Vec<ProfilePoint> {
        let mut knots: Vec<ProfilePoint> = Vec::with_capacity(self.points.len());

        for point in &self.points {
            // adding +0.0 turns -0.0 into 0.0 so total_cmp sees one key
            let point = ProfilePoint::new(point.height + 0.0, point.radius);
            match knots.binary_search_by(|k| k.height.total_cmp(&point.height)) {
                Ok(index) => knots[index].radius = point.radius,
                Err(index) => knots.insert(index, point),
            }
        }

        knots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knots_are_sorted_by_height() {
        let curve = ProfileCurve::from_points([
            ProfilePoint::new(0.5, 0.1),
            ProfilePoint::new(-0.5, 0.3),
            ProfilePoint::new(0.0, 0.2),
        ]);

        let heights: Vec<f32> = curve.knots().iter().map(|k| k.height).collect();
        assert_eq!(heights, vec![-0.5, 0.0, 0.5]);
    }

    #[test]
    fn later_point_overwrites_same_height() {
        let curve = ProfileCurve::from_points([
            ProfilePoint::new(0.25, 0.1),
            ProfilePoint::new(0.75, 0.4),
            ProfilePoint::new(0.25, 0.9),
        ]);

        let knots = curve.knots();
        assert_eq!(knots.len(), 2);
        assert_eq!(knots[0], ProfilePoint::new(0.25, 0.9));
        // placement order is untouched
        assert_eq!(curve.len(), 3);
    }

    #[test]
    fn signed_zero_heights_share_a_knot() {
        let curve = ProfileCurve::from_points([ProfilePoint::new(-0.0, 0.3), ProfilePoint::new(0.0, 0.7)]);

        let knots = curve.knots();
        assert_eq!(knots.len(), 1);
        assert_eq!(knots[0].radius, 0.7);
        assert!(knots[0].height.is_sign_positive());
    }

    #[test]
    fn remove_last_on_empty_curve_is_noop() {
        let mut curve = ProfileCurve::new();
        assert_eq!(curve.remove_last(), None);
        assert!(curve.is_empty());
    }

    #[test]
    fn remove_last_undoes_most_recent_point() {
        let mut curve = ProfileCurve::new();
        curve.push(ProfilePoint::new(0.0, 0.5));
        curve.push(ProfilePoint::new(1.0, 0.2));

        assert_eq!(curve.remove_last(), Some(ProfilePoint::new(1.0, 0.2)));
        assert_eq!(curve.points(), &[ProfilePoint::new(0.0, 0.5)]);
    }

    #[test]
    fn clear_empties_the_curve() {
        let mut curve = ProfileCurve::from_points(
            (0..5).map(|i| ProfilePoint::new(i as f32 * 0.1, 0.3)),
        );
        curve.clear();
        assert!(curve.is_empty());
        assert!(curve.knots().is_empty());
    }

    #[test]
    fn ndc_maps_x_to_radius_and_y_to_height() {
        let point = ProfilePoint::from_ndc(Vec2::new(0.4, -0.2));
        assert_eq!(point, ProfilePoint::new(-0.2, 0.4));
        assert_eq!(point.to_ndc(), Vec2::new(0.4, -0.2));
    }
}
