//! Orbit camera state for viewing the sculpture

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::core::types::{Mat4, Vec3};

/// Radians of rotation per pixel of mouse drag
pub const ROTATE_SENSITIVITY: f32 = 0.01;
/// Zoom change per wheel notch
pub const ZOOM_STEP: f32 = 0.1;
pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;
/// Pan distance per pixel at zoom 1.0
const PAN_SENSITIVITY: f32 = 0.5;

/// Orbit / pan / zoom camera around the sculpture center.
///
/// Independent of voxel state; the renderer consumes [`CameraState::transform`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    /// Rotation around X in radians, clamped to [-PI/2, PI/2]
    pub rot_x: f32,
    /// Rotation around Y in radians
    pub rot_y: f32,
    /// Uniform scale factor
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl CameraState {
    /// Camera at the default view
    pub fn new() -> Self {
        Self {
            rot_x: 0.0,
            rot_y: 0.0,
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }

    /// Rotate from a mouse drag delta in pixels
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.rot_y += dx * ROTATE_SENSITIVITY;
        self.rot_x += dy * ROTATE_SENSITIVITY;
        // Keep the view from flipping over the poles
        self.rot_x = self.rot_x.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Pan from a mouse drag delta in pixels. Slower when zoomed in.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let sensitivity = PAN_SENSITIVITY / self.zoom;
        self.pan_x += dx * sensitivity;
        self.pan_y += dy * sensitivity;
    }

    /// Step zoom from a wheel event. Positive `delta_y` zooms out.
    pub fn zoom_by_wheel(&mut self, delta_y: f32) {
        if delta_y > 0.0 {
            self.zoom = (self.zoom - ZOOM_STEP).max(MIN_ZOOM);
        } else {
            self.zoom = (self.zoom + ZOOM_STEP).min(MAX_ZOOM);
        }
    }

    /// Back to the default view
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Model transform: pan, then zoom, then rotate X, then rotate Y
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.pan_x, self.pan_y, 0.0))
            * Mat4::from_scale(Vec3::splat(self.zoom))
            * Mat4::from_rotation_x(self.rot_x)
            * Mat4::from_rotation_y(self.rot_y)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new()
    }
}
