//! Viewer configuration
//!
//! Read from a TOML file with every section optional:
//!
//! ```toml
//! roster_path = "personas.json"
//!
//! [window]
//! title = "Troupe"
//! width = 1200
//! height = 800
//!
//! [camera]
//! distance = 6.0
//! pitch = 0.3
//!
//! [layout]
//! kind = "circle"
//! radius = 3.0
//!
//! [panel]
//! position = [20.0, 20.0]
//! width = 320.0
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    gfx::camera::{CameraController, CameraManager, OrbitCamera},
    persona::{Layout, PersonaRoster},
    ui::panel::InfoPanel,
};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Logical pixels
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Troupe".to_string(),
            width: 1200,
            height: 800,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    /// Radians above the horizon
    pub pitch: f32,
    /// Radians around +Y, zero looks down -Z
    pub yaw: f32,
    pub target: [f32; 3],
    pub min_distance: Option<f32>,
    pub max_distance: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    /// Re-target the camera on the troupe once it is built
    pub frame_on_start: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            pitch: 0.3,
            yaw: 0.0,
            target: [0.0, 0.4, 0.0],
            min_distance: Some(1.1),
            max_distance: 64.0,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            frame_on_start: true,
        }
    }
}

impl CameraConfig {
    /// Orbit camera and controller set up from this section
    ///
    /// Distance bounds given the wrong way round are swapped.
    pub fn build_manager(&self, aspect: f32) -> CameraManager {
        let (min_distance, max_distance) = match self.min_distance {
            Some(min) if min > self.max_distance => {
                log::warn!(
                    "camera min_distance {min} exceeds max_distance {}; swapping them",
                    self.max_distance
                );
                (Some(self.max_distance), min)
            }
            min => (min, self.max_distance),
        };

        let mut camera = OrbitCamera::new(
            self.distance,
            self.pitch,
            self.yaw,
            Vector3::from(self.target),
            aspect,
        );
        camera.bounds.min_distance = min_distance;
        camera.bounds.max_distance = Some(max_distance);
        camera.set_distance(self.distance);

        CameraManager::new(camera, CameraController::new(self.rotate_speed, self.zoom_speed))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Top-left corner in logical pixels
    pub position: [f32; 2],
    pub width: f32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            position: [20.0, 20.0],
            width: 320.0,
        }
    }
}

impl PanelConfig {
    pub fn build_panel(&self) -> InfoPanel {
        InfoPanel::new(self.position, self.width)
    }
}

/// Everything the viewer reads at startup
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// JSON persona roster; the built-in sample troupe is used when unset
    pub roster_path: Option<PathBuf>,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub layout: Layout,
    pub panel: PanelConfig,
}

impl ViewerConfig {
    /// Parses a config, reporting any syntax or type error
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    /// Loads a config file, falling back to defaults when it is missing or invalid
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    log::info!("loaded viewer config from {}", path.display());
                    config
                }
                Err(err) => {
                    log::warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Failed to read {}: {err}. Using defaults", path.display());
                Self::default()
            }
        }
    }

    /// The configured roster, or the sample troupe when none is set
    ///
    /// A relative `roster_path` is resolved against `base_dir` when one is given.
    pub fn load_roster(&self, base_dir: Option<&Path>) -> Result<PersonaRoster> {
        let Some(path) = self.roster_path.as_deref() else {
            log::info!("no roster configured, using the sample troupe");
            return Ok(PersonaRoster::sample());
        };

        match base_dir {
            Some(base) if path.is_relative() => PersonaRoster::from_path(&base.join(path)),
            _ => PersonaRoster::from_path(path),
        }
    }
}
