//! Per-frame assembly: matrices and draw uniforms for floor, solid, and shadow.

use crate::state::Toggles;
use engine_core::Pose;
use glam::{Mat4, Vec3, Vec4};
use procgen::ShadowProjection;
use renderer::{Camera, DrawUniform, FrameDraws, SceneUniform};

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Everything one frame needs from the pose and the shadow setup.
#[derive(Debug, Clone, Copy)]
pub struct FramePlan {
    pub view_proj: Mat4,
    pub eye: Vec3,
    pub solid_model: Mat4,
    /// `shadow * translate(offset) * solid_model`
    pub shadow_model: Mat4,
}

impl FramePlan {
    pub fn new(camera: &Camera, pose: &Pose, shadow: &ShadowProjection, shadow_offset: Vec3) -> Self {
        let solid_model = pose.model_matrix();
        Self {
            view_proj: camera.view_projection(pose),
            eye: pose.eye(),
            solid_model,
            shadow_model: shadow.matrix() * Mat4::from_translation(shadow_offset) * solid_model,
        }
    }

    pub fn scene_uniform(&self, light: Vec4) -> SceneUniform {
        SceneUniform::new(self.view_proj, self.eye, light)
    }

    /// Floor is lit and white, the solid is lit and optionally textured, the
    /// shadow is unlit black.
    pub fn draws(&self, toggles: &Toggles) -> FrameDraws {
        FrameDraws {
            floor: DrawUniform::new(Mat4::IDENTITY, WHITE, true, false),
            solid: DrawUniform::new(self.solid_model, WHITE, true, toggles.texture),
            shadow: DrawUniform::new(self.shadow_model, BLACK, false, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::{PatchResolutions, Resolution, SpeakerMesh, SurfaceProfile};

    fn small_mesh() -> SpeakerMesh {
        let resolutions = PatchResolutions {
            cap: Resolution::new(12, 6).unwrap(),
            ring: Resolution::new(12, 1).unwrap(),
            concave_disk: Resolution::new(12, 3).unwrap(),
        };
        SpeakerMesh::build(&SurfaceProfile::default(), &resolutions, &Mat4::IDENTITY)
    }

    #[test]
    fn shadow_vertices_land_on_plane() {
        let shadow = ShadowProjection::default();
        let mut pose = Pose::default();
        pose.begin_drag();
        pose.apply_drag_delta(30.0, -14.0);
        pose.end_drag();
        pose.tick_auto_spin(0.4);

        let plan = FramePlan::new(&Camera::default(), &pose, &shadow, Vec3::new(-0.5, 2.0, 0.0));
        for strip in &small_mesh().strips {
            for v in &strip.vertices {
                let p = plan.shadow_model * v.position.extend(1.0);
                assert!(p.w.abs() > 1e-3);
                let d = shadow.plane_distance(p) / p.w;
                assert!(d.abs() < 1e-3, "vertex {:?} off plane by {}", v.position, d);
            }
        }
    }

    #[test]
    fn draw_uniforms_follow_toggles() {
        let plan = FramePlan::new(
            &Camera::default(),
            &Pose::default(),
            &ShadowProjection::default(),
            Vec3::ZERO,
        );
        let mut toggles = Toggles::default();
        let draws = plan.draws(&toggles);
        assert!(draws.solid.lighting() && draws.solid.textured());
        assert!(!draws.shadow.lighting() && !draws.shadow.textured());
        assert_eq!(draws.shadow.color, BLACK);
        assert!(draws.floor.lighting() && !draws.floor.textured());

        toggles.texture = false;
        assert!(!plan.draws(&toggles).solid.textured());
    }

    #[test]
    fn scene_uniform_carries_eye_and_light() {
        let pose = Pose::default();
        let plan = FramePlan::new(&Camera::default(), &pose, &ShadowProjection::default(), Vec3::ZERO);
        let scene = plan.scene_uniform(Vec4::new(5.0, 5.0, 5.0, 1.0));
        assert_eq!(scene.light, [5.0, 5.0, 5.0, 1.0]);
        assert!((Vec3::new(scene.eye[0], scene.eye[1], scene.eye[2]) - pose.eye()).length() < 1e-6);
    }
}
