//! Face-mesh geometry: eye aspect ratio and head-pose offset

use perception::{FaceLandmarks, Landmark};

use crate::SignalError;

/// Nose tip
pub const NOSE_TIP: usize = 1;
/// Outer corner of the right eye (image left)
pub const RIGHT_EYE_OUTER: usize = 33;
/// Outer corner of the left eye (image right)
pub const LEFT_EYE_OUTER: usize = 263;

/// Left eye contour, ordered p1..p6 (p1/p4 horizontal corners)
pub const LEFT_EYE: [usize; 6] = [362, 385, 387, 263, 373, 380];
/// Right eye contour, ordered p1..p6 (p1/p4 horizontal corners)
pub const RIGHT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];

fn point(face: &FaceLandmarks, index: usize) -> Result<Landmark, SignalError> {
    face.get(index).ok_or(SignalError::LandmarkMissing(index))
}

/// Eye aspect ratio: (|p2-p6| + |p3-p5|) / (2 |p1-p4|)
pub fn eye_aspect_ratio(face: &FaceLandmarks, eye: &[usize; 6]) -> Result<f32, SignalError> {
    let p: Vec<Landmark> = eye
        .iter()
        .map(|&i| point(face, i))
        .collect::<Result<_, _>>()?;

    let horizontal = p[0].distance(&p[3]);
    if horizontal <= f32::EPSILON {
        return Err(SignalError::Degenerate("eye corners coincide"));
    }

    let vertical = p[1].distance(&p[5]) + p[2].distance(&p[4]);
    Ok(vertical / (2.0 * horizontal))
}

/// Mean eye aspect ratio over both eyes
pub fn average_ear(face: &FaceLandmarks) -> Result<f32, SignalError> {
    let left = eye_aspect_ratio(face, &LEFT_EYE)?;
    let right = eye_aspect_ratio(face, &RIGHT_EYE)?;
    Ok((left + right) / 2.0)
}

/// Horizontal nose offset from the eye-corner midpoint, normalized by the
/// eye-corner distance. 0 is perfectly frontal.
pub fn horizontal_offset_ratio(face: &FaceLandmarks) -> Result<f32, SignalError> {
    let nose = point(face, NOSE_TIP)?;
    let right = point(face, RIGHT_EYE_OUTER)?;
    let left = point(face, LEFT_EYE_OUTER)?;

    let span = right.distance(&left);
    if span <= f32::EPSILON {
        return Err(SignalError::Degenerate("eye corners coincide"));
    }

    let center = right.midpoint(&left);
    Ok((center.x - nose.x).abs() / span)
}
