//! Synthetic face meshes for replaying scripted ticks

use perception::{FaceLandmarks, Landmark};

use crate::geometry::{LEFT_EYE, NOSE_TIP, RIGHT_EYE};

/// Number of points in a refined face mesh
pub const MESH_SIZE: usize = 478;

const EYE_LINE_Y: f32 = 0.4;
const EYE_WIDTH: f32 = 0.06;

/// Build a 478-point mesh with the given head turn and eye aspect ratio.
///
/// `turn` is the horizontal nose offset as a fraction of the eye-corner
/// distance (0 = frontal). `ear` is the eye aspect ratio of both eyes.
pub fn face_mesh(turn: f32, ear: f32) -> FaceLandmarks {
    let mut points = vec![Landmark::new(0.5, 0.5); MESH_SIZE];

    // Outer corners 33 and 263 sit 0.2 apart around x = 0.5
    place_eye(&mut points, &RIGHT_EYE, 0.40, ear);
    place_eye(&mut points, &LEFT_EYE, 0.54, ear);

    points[NOSE_TIP] = Landmark::new(0.5 + turn * 0.2, 0.5);
    points[61] = Landmark::new(0.45, 0.6);
    points[291] = Landmark::new(0.55, 0.6);

    FaceLandmarks::new(points)
}

/// A frontal face with open eyes
pub fn attentive_face() -> FaceLandmarks {
    face_mesh(0.0, 0.3)
}

/// A face turned well away from the screen
pub fn turned_face() -> FaceLandmarks {
    face_mesh(0.4, 0.3)
}

/// A frontal face with closed eyes
pub fn eyes_closed_face() -> FaceLandmarks {
    face_mesh(0.0, 0.05)
}

fn place_eye(points: &mut [Landmark], eye: &[usize; 6], left_x: f32, ear: f32) {
    // EAR = 4h / (2 * width)  =>  h = ear * width / 2
    let h = ear * EYE_WIDTH / 2.0;
    let third = EYE_WIDTH / 3.0;
    points[eye[0]] = Landmark::new(left_x, EYE_LINE_Y);
    points[eye[3]] = Landmark::new(left_x + EYE_WIDTH, EYE_LINE_Y);
    points[eye[1]] = Landmark::new(left_x + third, EYE_LINE_Y - h);
    points[eye[5]] = Landmark::new(left_x + third, EYE_LINE_Y + h);
    points[eye[2]] = Landmark::new(left_x + 2.0 * third, EYE_LINE_Y - h);
    points[eye[4]] = Landmark::new(left_x + 2.0 * third, EYE_LINE_Y + h);
}
