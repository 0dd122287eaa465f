//! Facial landmark types

use serde::{Deserialize, Serialize};

/// Normalized landmark point (image coordinates in [0, 1])
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar distance to another landmark
    pub fn distance(&self, other: &Landmark) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Midpoint between two landmarks
    pub fn midpoint(&self, other: &Landmark) -> Landmark {
        Landmark {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            z: (self.z + other.z) / 2.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Ordered landmark mesh for a single face (468+ points for a full mesh)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceLandmarks {
    pub points: Vec<Landmark>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Landmark at a mesh index, if present and finite
    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied().filter(Landmark::is_finite)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_and_midpoint() {
        let a = Landmark::new(0.0, 0.0);
        let b = Landmark::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
        assert_eq!(a.midpoint(&b), Landmark::new(1.5, 2.0));
    }

    #[test]
    fn test_get_rejects_missing_and_nan() {
        let face = FaceLandmarks::new(vec![Landmark::new(0.1, 0.2), Landmark::new(f32::NAN, 0.5)]);
        assert!(face.get(0).is_some());
        assert!(face.get(1).is_none());
        assert!(face.get(400).is_none());
    }

    #[test]
    fn test_deserialize_without_z() {
        let face: FaceLandmarks = serde_json::from_str(r#"[{"x":0.5,"y":0.25}]"#).unwrap();
        assert_eq!(face.points[0], Landmark::new(0.5, 0.25));
    }
}
