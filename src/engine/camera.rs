// Side-view camera rig: a spring arm (camera boom) and an orthographic camera

use glam::{Mat4, Vec2};
use serde::Deserialize;

use crate::core::math::{lerp, smoothing_factor};

/// Tunables for the camera boom and the camera on its end
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraRigSettings {
    /// Distance from the character to the camera along the view axis
    pub target_arm_length: f32,
    /// Offset of the arm's end from the character, in world units
    pub socket_offset: Vec2,
    /// Positional lag speed; 0 snaps the camera to its target every update
    pub lag_speed: f32,
    /// Visible width of the orthographic view in world units
    pub ortho_width: f32,
}

impl Default for CameraRigSettings {
    fn default() -> Self {
        Self {
            target_arm_length: 5.0,
            socket_offset: Vec2::new(0.0, 0.75),
            lag_speed: 0.0,
            ortho_width: 20.48,
        }
    }
}

/// Camera boom keeping the camera beside the character
///
/// The arm's rotation is absolute: it never turns with the character, so the
/// view stays side-on while the sprite flips.
#[derive(Debug, Clone)]
pub struct SpringArm {
    target_arm_length: f32,
    socket_offset: Vec2,
    lag_speed: f32,
    /// World position of the arm's end, where the camera is attached
    socket_location: Vec2,
    /// Whether the arm shortens on collision. Always off for the side view.
    do_collision_test: bool,
    uses_absolute_rotation: bool,
}

impl SpringArm {
    /// Create a boom attached at `origin`
    pub fn new(settings: &CameraRigSettings, origin: Vec2) -> Self {
        Self {
            target_arm_length: settings.target_arm_length,
            socket_offset: settings.socket_offset,
            lag_speed: settings.lag_speed.max(0.0),
            socket_location: origin + settings.socket_offset,
            do_collision_test: false,
            uses_absolute_rotation: true,
        }
    }

    /// Follow the attach point, applying lag if enabled
    pub fn update(&mut self, origin: Vec2, dt: f32) -> Vec2 {
        let desired = origin + self.socket_offset;

        self.socket_location = if self.lag_speed > 0.0 {
            let t = smoothing_factor(self.lag_speed, dt);
            Vec2::new(
                lerp(self.socket_location.x, desired.x, t),
                lerp(self.socket_location.y, desired.y, t),
            )
        } else {
            desired
        };

        self.socket_location
    }

    /// Jump straight to the attach point, skipping lag (used after teleports)
    pub fn snap_to(&mut self, origin: Vec2) {
        self.socket_location = origin + self.socket_offset;
    }

    pub fn socket_location(&self) -> Vec2 {
        self.socket_location
    }

    pub fn target_arm_length(&self) -> f32 {
        self.target_arm_length
    }

    pub fn socket_offset(&self) -> Vec2 {
        self.socket_offset
    }

    pub fn does_collision_test(&self) -> bool {
        self.do_collision_test
    }

    pub fn uses_absolute_rotation(&self) -> bool {
        self.uses_absolute_rotation
    }
}

/// Orthographic 2D camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    position: Vec2,
    /// Visible width in world units
    ortho_width: f32,
    /// Viewport width in pixels
    viewport_width: f32,
    /// Viewport height in pixels
    viewport_height: f32,
    /// View-projection matrix
    view_proj: Mat4,
}

impl Camera {
    /// Smallest visible width accepted by [`Camera::set_ortho_width`]
    const MIN_ORTHO_WIDTH: f32 = 0.1;

    /// Create a new camera
    pub fn new(position: Vec2, ortho_width: f32, viewport_width: f32, viewport_height: f32) -> Self {
        let mut camera = Self {
            position,
            ortho_width: ortho_width.max(Self::MIN_ORTHO_WIDTH),
            viewport_width: viewport_width.max(1.0),
            viewport_height: viewport_height.max(1.0),
            view_proj: Mat4::IDENTITY,
        };
        camera.update_view_proj();
        camera
    }

    /// Half extents of the visible area in world units
    fn half_extents(&self) -> Vec2 {
        let half_width = self.ortho_width / 2.0;
        let aspect = self.viewport_height / self.viewport_width;
        Vec2::new(half_width, half_width * aspect)
    }

    fn update_view_proj(&mut self) {
        let half = self.half_extents();

        self.view_proj = Mat4::orthographic_rh(
            self.position.x - half.x,
            self.position.x + half.x,
            self.position.y - half.y,
            self.position.y + half.y,
            -100.0, // Near plane
            100.0,  // Far plane
        );
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Set camera position
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.update_view_proj();
    }

    pub fn ortho_width(&self) -> f32 {
        self.ortho_width
    }

    /// Set how many world units fit across the view
    pub fn set_ortho_width(&mut self, width: f32) {
        self.ortho_width = width.max(Self::MIN_ORTHO_WIDTH);
        self.update_view_proj();
    }

    /// Resize the viewport; zero sizes (minimised windows) are ignored
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport_width = width;
            self.viewport_height = height;
            self.update_view_proj();
        }
    }

    /// Get the view-projection matrix
    pub fn view_proj_matrix(&self) -> Mat4 {
        self.view_proj
    }

    /// Convert screen coordinates (pixels, y down) to world coordinates
    pub fn screen_to_world(&self, screen_pos: Vec2) -> Vec2 {
        let normalized_x = (screen_pos.x / self.viewport_width) * 2.0 - 1.0;
        let normalized_y = 1.0 - (screen_pos.y / self.viewport_height) * 2.0;
        let half = self.half_extents();

        Vec2::new(
            self.position.x + normalized_x * half.x,
            self.position.y + normalized_y * half.y,
        )
    }

    /// Convert world coordinates to screen coordinates
    pub fn world_to_screen(&self, world_pos: Vec2) -> Vec2 {
        let half = self.half_extents();
        let normalized_x = (world_pos.x - self.position.x) / half.x;
        let normalized_y = (world_pos.y - self.position.y) / half.y;

        Vec2::new(
            (normalized_x + 1.0) * self.viewport_width / 2.0,
            (1.0 - normalized_y) * self.viewport_height / 2.0,
        )
    }

    /// Get the viewport bounds in world coordinates
    pub fn viewport_bounds(&self) -> Viewport {
        let half = self.half_extents();
        Viewport {
            min: self.position - half,
            max: self.position + half,
        }
    }
}

/// Viewport bounds in world coordinates
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub min: Vec2,
    pub max: Vec2,
}

impl Viewport {
    /// Check if a point is inside the viewport
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_arm_without_lag_snaps_to_socket() {
        let settings = CameraRigSettings::default();
        let mut arm = SpringArm::new(&settings, Vec2::ZERO);

        let socket = arm.update(Vec2::new(10.0, 2.0), 1.0 / 60.0);
        assert_eq!(socket, Vec2::new(10.0, 2.0) + settings.socket_offset);
        assert!(!arm.does_collision_test());
        assert!(arm.uses_absolute_rotation());
    }

    #[test]
    fn test_arm_with_lag_trails_target() {
        let settings = CameraRigSettings {
            lag_speed: 6.0,
            socket_offset: Vec2::ZERO,
            ..CameraRigSettings::default()
        };
        let mut arm = SpringArm::new(&settings, Vec2::ZERO);

        let socket = arm.update(Vec2::new(10.0, 0.0), 0.1);
        assert_relative_eq!(socket.x, 6.0, epsilon = 1e-4);

        arm.snap_to(Vec2::new(-3.0, 1.0));
        assert_eq!(arm.socket_location(), Vec2::new(-3.0, 1.0));
    }

    #[test]
    fn test_viewport_follows_ortho_width_and_aspect() {
        let camera = Camera::new(Vec2::ZERO, 20.0, 1600.0, 900.0);
        let bounds = camera.viewport_bounds();

        assert_relative_eq!(bounds.max.x - bounds.min.x, 20.0);
        assert_relative_eq!(bounds.max.y - bounds.min.y, 11.25);
        assert!(bounds.contains(Vec2::new(9.0, 5.0)));
        assert!(!bounds.contains(Vec2::new(11.0, 0.0)));
    }

    #[test]
    fn test_screen_world_roundtrip() {
        let camera = Camera::new(Vec2::new(3.0, -2.0), 20.0, 1280.0, 720.0);
        let world = Vec2::new(5.5, 1.25);
        let back = camera.screen_to_world(camera.world_to_screen(world));

        assert_relative_eq!(back.x, world.x, epsilon = 1e-4);
        assert_relative_eq!(back.y, world.y, epsilon = 1e-4);
    }

    #[test]
    fn test_screen_centre_is_camera_position() {
        let camera = Camera::new(Vec2::new(4.0, 1.0), 20.0, 800.0, 600.0);
        assert_eq!(camera.screen_to_world(Vec2::new(400.0, 300.0)), Vec2::new(4.0, 1.0));
    }

    #[test]
    fn test_zero_resize_ignored() {
        let mut camera = Camera::new(Vec2::ZERO, 20.0, 800.0, 600.0);
        let before = camera.view_proj_matrix();
        camera.resize(0.0, 0.0);
        assert_eq!(camera.view_proj_matrix(), before);
    }
}
