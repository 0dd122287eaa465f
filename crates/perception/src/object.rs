//! Object detection (phones, books, other devices)

use serde::{Deserialize, Serialize};

/// Detector classes that matter to proctoring. Anything else the model
/// reports (people, chairs, cups, ...) is ignored.
pub const RELEVANT_CLASSES: [&str; 6] = ["cell phone", "book", "laptop", "keyboard", "mouse", "remote"];

/// Bounding box in frame pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<[f32; 4]> for BoundingBox {
    fn from(b: [f32; 4]) -> Self {
        Self {
            x: b[0],
            y: b[1],
            width: b[2],
            height: b[3],
        }
    }
}

/// Detected object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDetection {
    /// Detector label, e.g. "cell phone"
    pub class: String,

    /// Detection confidence (0-1)
    pub confidence: f32,

    /// Bounding box
    #[serde(default, alias = "bbox")]
    pub bounding_box: BoundingBox,
}

impl ObjectDetection {
    pub fn new(class: impl Into<String>, confidence: f32, bounding_box: BoundingBox) -> Self {
        Self {
            class: class.into(),
            confidence,
            bounding_box,
        }
    }

    /// Whether this detection belongs to a proctoring-relevant class
    pub fn is_relevant(&self) -> bool {
        is_relevant_class(&self.class)
    }
}

/// Case-insensitive substring match against [`RELEVANT_CLASSES`]
pub fn is_relevant_class(class: &str) -> bool {
    let class = class.to_lowercase();
    RELEVANT_CLASSES.iter().any(|c| class.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevant_classes() {
        assert!(is_relevant_class("cell phone"));
        assert!(is_relevant_class("Cell Phone"));
        assert!(is_relevant_class("book"));
        assert!(is_relevant_class("Laptop"));
        assert!(is_relevant_class("remote"));
        assert!(!is_relevant_class("person"));
        assert!(!is_relevant_class("cup"));
        // A bare "phone" label is not one of the detector's classes
        assert!(!is_relevant_class("phone"));
    }

    #[test]
    fn test_bbox_alias() {
        let det: ObjectDetection = serde_json::from_str(
            r#"{"class":"book","confidence":0.8,"bbox":{"x":1.0,"y":2.0,"width":3.0,"height":4.0}}"#,
        )
        .unwrap();
        assert_eq!(det.bounding_box, BoundingBox::from([1.0, 2.0, 3.0, 4.0]));
        assert!(det.is_relevant());
    }
}
