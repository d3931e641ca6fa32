//! Decorative hovering-drone scene.
//!
//! Purely cosmetic: the pose is a function of elapsed time only.

use serde::{Deserialize, Serialize};

/// Hover bob frequency in rad/s.
pub const HOVER_FREQUENCY: f64 = 0.5;
pub const HOVER_AMPLITUDE: f64 = 0.3;
/// Yaw added per rendered frame.
pub const YAW_PER_FRAME: f64 = 0.005;
pub const FRAMES_PER_SECOND: f64 = 60.0;
pub const GRID_BASE_OPACITY: f64 = 0.1;
pub const GRID_OPACITY_SWING: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vec3(pub f64, pub f64, pub f64);

#[derive(Debug, Clone, Serialize)]
pub struct DronePose {
    pub position: Vec3,
    pub rotation_y: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridState {
    pub size: f64,
    pub divisions: u32,
    pub rotation_x: f64,
    pub color: &'static str,
    pub opacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Light {
    pub kind: &'static str,
    pub position: Option<Vec3>,
    pub intensity: f64,
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Camera {
    pub position: Vec3,
    pub fov: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenePose {
    pub elapsed: f64,
    pub drone: DronePose,
    pub grid: GridState,
    pub camera: Camera,
    pub lights: Vec<Light>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneQuery {
    pub elapsed: Option<f64>,
}

pub fn hover_height(elapsed: f64) -> f64 {
    (elapsed * HOVER_FREQUENCY).sin() * HOVER_AMPLITUDE
}

pub fn yaw(elapsed: f64) -> f64 {
    YAW_PER_FRAME * FRAMES_PER_SECOND * elapsed
}

pub fn grid_opacity(elapsed: f64) -> f64 {
    GRID_BASE_OPACITY + (elapsed * HOVER_FREQUENCY).sin() * GRID_OPACITY_SWING
}

impl ScenePose {
    pub fn at(elapsed: f64) -> Self {
        Self {
            elapsed,
            drone: DronePose {
                position: Vec3(3.0, hover_height(elapsed), 0.0),
                rotation_y: yaw(elapsed),
                scale: 0.8,
            },
            grid: GridState {
                size: 20.0,
                divisions: 20,
                rotation_x: -std::f64::consts::FRAC_PI_2,
                color: "#0080ff",
                opacity: grid_opacity(elapsed),
            },
            camera: Camera {
                position: Vec3(0.0, 0.0, 10.0),
                fov: 60.0,
            },
            lights: vec![
                Light {
                    kind: "ambient",
                    position: None,
                    intensity: 0.3,
                    color: None,
                },
                Light {
                    kind: "directional",
                    position: Some(Vec3(10.0, 10.0, 5.0)),
                    intensity: 0.8,
                    color: Some("#0080ff"),
                },
                Light {
                    kind: "point",
                    position: Some(Vec3(-10.0, -10.0, -10.0)),
                    intensity: 0.4,
                    color: Some("#4080ff"),
                },
            ],
        }
    }
}
