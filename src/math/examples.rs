use crate::math::profile::ProfilePoint;

pub struct ProfilePreset {
    pub name: &'static str,
    pub description: &'static str,
    /// `(height, radius)` pairs in placement order.
    pub points: &'static [(f32, f32)],
}

impl ProfilePreset {
    pub fn profile_points(&self) -> impl Iterator<Item = ProfilePoint> + '_ {
        self.points.iter().map(|&(h, r)| ProfilePoint::new(h, r))
    }
}

pub fn find_preset(name: &str) -> Option<usize> {
    PROFILE_PRESETS
        .iter()
        .position(|p| p.name.eq_ignore_ascii_case(name))
}

pub const PROFILE_PRESETS: &[ProfilePreset] = &[
    ProfilePreset {
        name: "Vase",
        description: "Narrow neck over a round belly",
        points: &[
            (-0.8, 0.25),
            (-0.6, 0.5),
            (-0.3, 0.6),
            (0.0, 0.45),
            (0.3, 0.2),
            (0.55, 0.18),
            (0.7, 0.3),
        ],
    },
    ProfilePreset {
        name: "Cone",
        description: "Radius shrinks to the apex",
        points: &[(-0.7, 0.6), (0.7, 0.0)],
    },
    ProfilePreset {
        name: "Cylinder",
        description: "Constant radius",
        points: &[(-0.6, 0.4), (0.6, 0.4)],
    },
    ProfilePreset {
        name: "Bowl",
        description: "Open dish",
        points: &[(-0.4, 0.0), (-0.35, 0.3), (-0.2, 0.55), (0.0, 0.7), (0.1, 0.75)],
    },
    ProfilePreset {
        name: "Hourglass",
        description: "Pinched waist",
        points: &[(-0.7, 0.5), (-0.3, 0.3), (0.0, 0.08), (0.3, 0.3), (0.7, 0.5)],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_tessellatable() {
        for preset in PROFILE_PRESETS {
            assert!(preset.points.len() >= 2, "{}", preset.name);
            for &(h, r) in preset.points {
                assert!((-1.0..=1.0).contains(&h) && (-1.0..=1.0).contains(&r), "{}", preset.name);
            }
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(find_preset("vase"), Some(0));
        assert_eq!(find_preset("HOURGLASS"), Some(4));
        assert_eq!(find_preset("teapot"), None);
    }
}
