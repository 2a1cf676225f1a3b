use serde::{Deserialize, Serialize};

use crate::CycleState;

const CIRCLE_DIST: f32 = 15.0;
const CIRCLE_Z: f32 = 8.0;
/// Orbit speed of the circle camera, radians per second.
const CIRCLE_SPEED: f32 = 2.0;
const FOLLOW_DIST: f32 = 12.0;
/// Follow camera travel per millisecond.
const FOLLOW_SPEED: f32 = 0.05;
const FOLLOW_LOOK_AHEAD: f32 = 5.0;
const COCKPIT_HEIGHT: f32 = 3.0;
const GROUND: f32 = 0.0;

/// Camera behaviour, selectable in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    /// Orbits the cycle.
    Circle,
    /// Trails behind the cycle, catching up at a fixed speed.
    Follow,
    /// First person, just above the cycle.
    Cockpit,
}

/// Per-player chase camera. Positions are in arena units with `z` up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaseCamera {
    pub mode: CameraMode,
    pub eye: [f32; 3],
    pub target: [f32; 3],
    /// Orbit angle of the circle camera.
    pub angle: f32,
}

impl ChaseCamera {
    /// A camera already settled on `cycle`.
    pub fn new(mode: CameraMode, cycle: &CycleState) -> Self {
        let mut camera = Self {
            mode,
            eye: [cycle.x, cycle.y, CIRCLE_Z],
            target: [cycle.x, cycle.y, GROUND],
            angle: 0.0,
        };
        camera.snap_to(cycle);
        camera
    }

    /// Place the follow camera directly at its resting spot.
    fn snap_to(&mut self, cycle: &CycleState) {
        if self.mode == CameraMode::Follow {
            let (dx, dy) = cycle.direction.unit();
            self.eye = [
                cycle.x - FOLLOW_DIST * dx,
                cycle.y - FOLLOW_DIST * dy,
                CIRCLE_Z,
            ];
        }
        self.update(cycle, 0.0);
    }

    /// Move the camera for a frame of `dt` milliseconds.
    pub fn update(&mut self, cycle: &CycleState, dt: f32) {
        let (dx, dy) = cycle.direction.unit();
        match self.mode {
            CameraMode::Circle => {
                self.angle = (self.angle + CIRCLE_SPEED * dt / 1000.0) % std::f32::consts::TAU;
                self.eye = [
                    cycle.x + CIRCLE_DIST * self.angle.cos(),
                    cycle.y + CIRCLE_DIST * self.angle.sin(),
                    CIRCLE_Z,
                ];
                self.target = [cycle.x, cycle.y, GROUND];
            },
            CameraMode::Follow => {
                self.target = [
                    cycle.x + dx * FOLLOW_LOOK_AHEAD,
                    cycle.y + dy * FOLLOW_LOOK_AHEAD,
                    GROUND,
                ];
                let dest = [cycle.x - FOLLOW_DIST * dx, cycle.y - FOLLOW_DIST * dy];
                let (ex, ey) = (dest[0] - self.eye[0], dest[1] - self.eye[1]);
                let dist = (ex * ex + ey * ey).sqrt();
                let step = dt * FOLLOW_SPEED;
                if dist <= step {
                    self.eye[0] = dest[0];
                    self.eye[1] = dest[1];
                } else {
                    self.eye[0] += step * ex / dist;
                    self.eye[1] += step * ey / dist;
                }
                self.eye[2] = CIRCLE_Z;
            },
            CameraMode::Cockpit => {
                self.target = [cycle.x + dx, cycle.y + dy, COCKPIT_HEIGHT];
                self.eye = [cycle.x, cycle.y, COCKPIT_HEIGHT + 0.5];
            },
        }
    }
}
