//! Orbit camera and the mouse-driven controller state machine.
//!
//! The controller never talks to a window. A front end forwards button changes and
//! cursor deltas as [`CameraInput`] messages and reads the resulting
//! [`OrbitCamera::view_matrix`].

use std::f32::consts::PI;

use nalgebra::{Matrix4, Point3, Vector3};

/// Elevation limit, short of the poles.
const MAX_ELEVATION: f32 = PI / 2.2;

/// Orbit camera that rotates around a target point.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Target point to orbit around.
    pub target: Point3<f32>,
    /// Distance from target, never negative.
    pub distance: f32,
    /// Horizontal angle (radians).
    pub azimuth: f32,
    /// Vertical angle (radians), clamped to avoid flipping over the poles.
    pub elevation: f32,
    /// Field of view in radians.
    pub fov: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Point3::origin(),
            distance: 3.0,
            azimuth: 0.0,
            elevation: 0.3,
            fov: PI / 4.0,
            near: 0.01,
            far: 100.0,
        }
    }
}

impl OrbitCamera {
    /// Create a camera looking at `target` from `distance`.
    pub fn new(target: Point3<f32>, distance: f32) -> Self {
        Self {
            target,
            distance: distance.max(0.0),
            ..Default::default()
        }
    }

    /// Frame an axis-aligned bounding box.
    pub fn framing(min: Point3<f64>, max: Point3<f64>) -> Self {
        let center = nalgebra::center(&min, &max);
        let radius = (max - min).norm() * 0.5;
        Self::new(center.cast::<f32>(), (radius * 2.5).max(1e-3) as f32)
    }

    /// Unit vector from the target towards the eye.
    fn direction(&self) -> Vector3<f32> {
        let (sin_elev, cos_elev) = self.elevation.sin_cos();
        let (sin_azim, cos_azim) = self.azimuth.sin_cos();
        Vector3::new(cos_elev * sin_azim, sin_elev, cos_elev * cos_azim)
    }

    /// The camera's eye position in world space.
    pub fn eye_position(&self) -> Point3<f32> {
        self.target + self.direction() * self.distance
    }

    /// View matrix (world to camera transform).
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye_position(), &self.target, &Vector3::y())
    }

    /// Projection matrix.
    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        Matrix4::new_perspective(aspect, self.fov, self.near, self.far)
    }

    /// Rotate the camera by the given deltas (in radians).
    pub fn rotate(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.azimuth += delta_azimuth;
        self.elevation = (self.elevation + delta_elevation).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Move towards (negative) or away from (positive) the target.
    pub fn dolly(&mut self, delta: f32) {
        self.distance = (self.distance + delta).max(0.0);
    }

    /// Move the target within the view plane.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = -self.direction();
        let right = forward
            .cross(&Vector3::y())
            .try_normalize(1e-6)
            .unwrap_or_else(Vector3::x);
        let up = right.cross(&forward).normalize();

        self.target += -dx * right + dy * up;
    }
}

/// What a mouse drag currently does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraState {
    /// No button held; drags are ignored.
    #[default]
    Idle,
    /// Left button: orbit around the target.
    Rotating,
    /// Right button: move the target.
    Panning,
    /// Both buttons: move towards the target.
    Dollying,
}

impl CameraState {
    /// State for the given button combination.
    pub fn from_buttons(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, true) => CameraState::Dollying,
            (true, false) => CameraState::Rotating,
            (false, true) => CameraState::Panning,
            (false, false) => CameraState::Idle,
        }
    }
}

/// Input messages for the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraInput {
    /// Current button state after a press or release.
    Buttons {
        /// Left button held.
        left: bool,
        /// Right button held.
        right: bool,
    },
    /// Cursor movement in pixels since the last message.
    Drag {
        /// Horizontal delta.
        dx: f32,
        /// Vertical delta.
        dy: f32,
    },
}

/// Drives an [`OrbitCamera`] from input messages.
#[derive(Debug, Clone)]
pub struct CameraController {
    camera: OrbitCamera,
    state: CameraState,
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    /// World units per pixel for pan and dolly.
    pub move_speed: f32,
}

impl CameraController {
    /// Wrap a camera; the controller starts idle.
    pub fn new(camera: OrbitCamera) -> Self {
        Self {
            camera,
            state: CameraState::Idle,
            rotate_speed: 0.01,
            move_speed: 0.01,
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// The controlled camera.
    #[inline]
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Apply one input message.
    pub fn handle(&mut self, input: CameraInput) {
        match input {
            CameraInput::Buttons { left, right } => {
                self.state = CameraState::from_buttons(left, right);
            }
            CameraInput::Drag { dx, dy } => match self.state {
                CameraState::Idle => {}
                CameraState::Rotating => self
                    .camera
                    .rotate(-dx * self.rotate_speed, dy * self.rotate_speed),
                CameraState::Panning => {
                    // Pan is slower than dolly for the same drag
                    let speed = self.move_speed / 3.0;
                    self.camera.pan(dx * speed, dy * speed);
                }
                CameraState::Dollying => self.camera.dolly(dy * self.move_speed),
            },
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(OrbitCamera::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(controller: &mut CameraController, left: bool, right: bool) {
        controller.handle(CameraInput::Buttons { left, right });
    }

    #[test]
    fn test_button_transitions() {
        let mut controller = CameraController::default();
        assert_eq!(controller.state(), CameraState::Idle);

        press(&mut controller, true, false);
        assert_eq!(controller.state(), CameraState::Rotating);
        press(&mut controller, true, true);
        assert_eq!(controller.state(), CameraState::Dollying);
        press(&mut controller, false, true);
        assert_eq!(controller.state(), CameraState::Panning);
        press(&mut controller, false, false);
        assert_eq!(controller.state(), CameraState::Idle);
    }

    #[test]
    fn test_idle_drag_does_nothing() {
        let mut controller = CameraController::default();
        let before = controller.camera().clone();
        controller.handle(CameraInput::Drag { dx: 40.0, dy: -25.0 });
        assert_eq!(controller.camera(), &before);
    }

    #[test]
    fn test_rotate_drag() {
        let mut controller = CameraController::default();
        press(&mut controller, true, false);
        controller.handle(CameraInput::Drag { dx: 10.0, dy: 0.0 });

        let camera = controller.camera();
        assert!((camera.azimuth + 0.1).abs() < 1e-6);
        assert!((camera.distance - 3.0).abs() < 1e-6);
        assert_eq!(camera.target, Point3::origin());
    }

    #[test]
    fn test_elevation_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.rotate(0.0, 10.0);
        assert!((camera.elevation - MAX_ELEVATION).abs() < 1e-6);
        camera.rotate(0.0, -20.0);
        assert!((camera.elevation + MAX_ELEVATION).abs() < 1e-6);
    }

    #[test]
    fn test_dolly_never_goes_negative() {
        let mut controller = CameraController::default();
        press(&mut controller, true, true);
        controller.handle(CameraInput::Drag { dx: 0.0, dy: -1000.0 });
        assert_eq!(controller.camera().distance, 0.0);

        controller.handle(CameraInput::Drag { dx: 0.0, dy: 100.0 });
        assert!((controller.camera().distance - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pan_keeps_view_direction() {
        let mut camera = OrbitCamera::default();
        let offset = camera.eye_position() - camera.target;
        camera.pan(3.0, 2.0);

        assert!((camera.target - Point3::origin()).norm() > 1.0);
        let moved = camera.eye_position() - camera.target;
        assert!((moved - offset).norm() < 1e-5);
        assert!((camera.distance - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix_maps_target_in_front() {
        let camera = OrbitCamera::new(Point3::new(1.0, 2.0, 3.0), 5.0);
        let view = camera.view_matrix();
        let target = view.transform_point(&camera.target);

        assert!(target.x.abs() < 1e-5);
        assert!(target.y.abs() < 1e-5);
        assert!((target.z + 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_framing() {
        let camera = OrbitCamera::framing(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 0.0));
        assert!((camera.target - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-6);
        assert!(camera.distance > 2.0);
    }
}
