//! Viewer configuration (window, shape, tessellation, light, camera). Loaded
//! from config.ron at startup.

use anyhow::{bail, Context, Result};
use engine_core::Pose;
use glam::{Vec3, Vec4};
use procgen::{checkerboard, PatchResolutions, Resolution, ShadowProjection, SurfaceProfile, TextureData};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Viewer settings. Loaded from `config.ron` in the current directory; every
/// field falls back to its default when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_true")]
    pub vsync: bool,

    /// Polar extent of the cap, radians.
    #[serde(default = "default_phi_max")]
    pub phi_max: f32,
    /// Dimple radius as a fraction of the rim radius.
    #[serde(default = "default_inner_radius_factor")]
    pub inner_radius_factor: f32,
    /// How far the dimple center sinks below the ring plane.
    #[serde(default = "default_concave_depth")]
    pub concave_depth: f32,

    /// (u_steps, v_steps) per patch.
    #[serde(default = "default_cap_resolution")]
    pub cap_resolution: (u32, u32),
    #[serde(default = "default_ring_resolution")]
    pub ring_resolution: (u32, u32),
    #[serde(default = "default_concave_resolution")]
    pub concave_resolution: (u32, u32),

    /// Homogeneous light position; w = 0 for a directional light.
    #[serde(default = "default_light")]
    pub light: [f32; 4],
    /// Shadow plane (a, b, c, d) with ax + by + cz + d = 0.
    #[serde(default = "default_shadow_plane")]
    pub shadow_plane: [f32; 4],
    /// Translation applied before the shadow projection.
    #[serde(default = "default_shadow_offset")]
    pub shadow_offset: [f32; 3],
    #[serde(default = "default_floor_z")]
    pub floor_z: f32,
    #[serde(default = "default_floor_half_extent")]
    pub floor_half_extent: f32,

    /// Camera start, degrees and world units.
    #[serde(default)]
    pub camera_yaw: f32,
    #[serde(default = "default_camera_pitch")]
    pub camera_pitch: f32,
    #[serde(default = "default_camera_distance")]
    pub camera_distance: f32,
    /// Degrees per arrow-key press.
    #[serde(default = "default_orbit_step")]
    pub orbit_step: f32,
    /// Auto-spin, degrees per second.
    #[serde(default = "default_spin_rate")]
    pub spin_rate: f32,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_texture_size")]
    pub texture_size: u32,
    #[serde(default = "default_checker_square")]
    pub checker_square: u32,
}

fn default_window_width() -> u32 {
    800
}
fn default_window_height() -> u32 {
    600
}
fn default_window_title() -> String {
    "Orator".to_string()
}
fn default_true() -> bool {
    true
}
fn default_phi_max() -> f32 {
    3.0 * std::f32::consts::FRAC_PI_4
}
fn default_inner_radius_factor() -> f32 {
    0.4
}
fn default_concave_depth() -> f32 {
    0.1
}
fn default_cap_resolution() -> (u32, u32) {
    (100, 50)
}
fn default_ring_resolution() -> (u32, u32) {
    (100, 1)
}
fn default_concave_resolution() -> (u32, u32) {
    (100, 20)
}
fn default_light() -> [f32; 4] {
    [5.0, 5.0, 5.0, 1.0]
}
fn default_shadow_plane() -> [f32; 4] {
    [0.0, 0.0, 1.0, 9.5]
}
fn default_shadow_offset() -> [f32; 3] {
    [-0.5, 2.0, 0.0]
}
fn default_floor_z() -> f32 {
    -9.51
}
fn default_floor_half_extent() -> f32 {
    20.0
}
fn default_camera_pitch() -> f32 {
    30.0
}
fn default_camera_distance() -> f32 {
    12.0
}
fn default_orbit_step() -> f32 {
    5.0
}
fn default_spin_rate() -> f32 {
    engine_core::DEFAULT_SPIN_RATE
}
fn default_tick_ms() -> u64 {
    16
}
fn default_texture_size() -> u32 {
    64
}
fn default_checker_square() -> u32 {
    8
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            window_title: default_window_title(),
            vsync: default_true(),
            phi_max: default_phi_max(),
            inner_radius_factor: default_inner_radius_factor(),
            concave_depth: default_concave_depth(),
            cap_resolution: default_cap_resolution(),
            ring_resolution: default_ring_resolution(),
            concave_resolution: default_concave_resolution(),
            light: default_light(),
            shadow_plane: default_shadow_plane(),
            shadow_offset: default_shadow_offset(),
            floor_z: default_floor_z(),
            floor_half_extent: default_floor_half_extent(),
            camera_yaw: 0.0,
            camera_pitch: default_camera_pitch(),
            camera_distance: default_camera_distance(),
            orbit_step: default_orbit_step(),
            spin_rate: default_spin_rate(),
            tick_ms: default_tick_ms(),
            texture_size: default_texture_size(),
            checker_square: default_checker_square(),
        }
    }
}

impl ViewerConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => match ron::from_str(&data) {
                Ok(c) => {
                    log::info!("Loaded config from {:?}", path);
                    return c;
                }
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(_) => log::info!("No config at {:?}, using defaults", path),
        }
        Self::default()
    }

    pub fn profile(&self) -> Result<SurfaceProfile> {
        SurfaceProfile::new(self.phi_max, self.inner_radius_factor, self.concave_depth)
            .context("invalid shape parameters in config")
    }

    pub fn resolutions(&self) -> Result<PatchResolutions> {
        let resolution = |(u, v): (u32, u32), patch: &str| {
            Resolution::new(u, v).with_context(|| format!("invalid {} resolution in config", patch))
        };
        Ok(PatchResolutions {
            cap: resolution(self.cap_resolution, "cap")?,
            ring: resolution(self.ring_resolution, "ring")?,
            concave_disk: resolution(self.concave_resolution, "concave disk")?,
        })
    }

    /// Checkerboard for the solid. A zero-sized texture cannot be uploaded.
    pub fn texture(&self) -> Result<TextureData> {
        if self.texture_size == 0 {
            bail!("invalid texture_size in config: must be at least 1");
        }
        if self.checker_square == 0 {
            bail!("invalid checker_square in config: must be at least 1");
        }
        Ok(checkerboard(self.texture_size, self.checker_square))
    }

    pub fn shadow(&self) -> ShadowProjection {
        let shadow = ShadowProjection::new(Vec4::from_array(self.light), Vec4::from_array(self.shadow_plane));
        if shadow.is_degenerate() {
            log::warn!("Light lies on the shadow plane; the shadow collapses");
        } else if shadow.is_directional() {
            log::info!("Directional light: parallel shadow projection");
        }
        shadow
    }

    pub fn shadow_offset(&self) -> Vec3 {
        Vec3::from_array(self.shadow_offset)
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.camera_yaw, self.camera_pitch, self.camera_distance).with_spin_rate(self.spin_rate)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
