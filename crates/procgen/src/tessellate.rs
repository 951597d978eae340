//! Strip tessellation of the speaker solid.
//!
//! Every patch is walked over its full (θ, v) domain and emitted as vertex
//! strips that alternate between two neighbouring parameter rings, so each
//! strip can be drawn directly as a triangle strip (or a quad strip).

use crate::error::GeometryError;
use crate::surface::{Azimuth, Latitude, SurfacePatch, SurfaceProfile, SurfaceVertex};
use glam::{Mat3, Mat4};
use std::f32::consts::TAU;

/// Validated sampling resolution: `u_steps` around the axis, `v_steps` across
/// the patch's radial or latitude extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    u_steps: u32,
    v_steps: u32,
}

impl Resolution {
    /// Fails on `u_steps < 3` or `v_steps < 1`, which would produce a
    /// non-manifold or zero-area mesh.
    pub fn new(u_steps: u32, v_steps: u32) -> Result<Self, GeometryError> {
        if u_steps < 3 || v_steps < 1 {
            return Err(GeometryError::InvalidResolution { u_steps, v_steps });
        }
        Ok(Self { u_steps, v_steps })
    }

    const fn from_steps(u_steps: u32, v_steps: u32) -> Self {
        Self { u_steps, v_steps }
    }

    pub fn u_steps(&self) -> u32 {
        self.u_steps
    }

    pub fn v_steps(&self) -> u32 {
        self.v_steps
    }
}

/// One renderable triangle strip belonging to a single patch.
#[derive(Debug, Clone, PartialEq)]
pub struct Strip {
    pub patch: SurfacePatch,
    pub vertices: Vec<SurfaceVertex>,
}

impl Strip {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Triangles this strip rasterizes to (including zero-area ones at a pole).
    pub fn triangle_count(&self) -> usize {
        self.vertices.len().saturating_sub(2)
    }
}

/// Per-patch resolutions for one build of the whole solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchResolutions {
    pub cap: Resolution,
    pub ring: Resolution,
    pub concave_disk: Resolution,
}

impl Default for PatchResolutions {
    fn default() -> Self {
        Self {
            cap: Resolution::from_steps(100, 50),
            ring: Resolution::from_steps(100, 1),
            concave_disk: Resolution::from_steps(100, 20),
        }
    }
}

impl PatchResolutions {
    pub fn get(&self, patch: SurfacePatch) -> Resolution {
        match patch {
            SurfacePatch::Cap => self.cap,
            SurfacePatch::Ring => self.ring,
            SurfacePatch::ConcaveDisk => self.concave_disk,
        }
    }
}

/// `(strip count, vertices per strip)` that `tessellate` will produce.
pub fn strip_layout(patch: SurfacePatch, profile: &SurfaceProfile, resolution: Resolution) -> (usize, usize) {
    let u = resolution.u_steps as usize;
    let v = resolution.v_steps as usize;
    match patch {
        SurfacePatch::Cap => (u, 2 * (v + 1)),
        SurfacePatch::Ring => (v, 2 * (u + 1)),
        SurfacePatch::ConcaveDisk if profile.has_dimple() => (v, 2 * (u + 1)),
        SurfacePatch::ConcaveDisk => (0, 0),
    }
}

/// Azimuth samples `0..=u_steps`. The last entry reuses the trig of the first
/// so the loop closes exactly; only its texture `u` differs (1.0 instead of 0.0).
fn azimuth_table(u_steps: u32) -> Vec<Azimuth> {
    let mut table: Vec<Azimuth> = (0..u_steps)
        .map(|i| {
            let u = i as f32 / u_steps as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            Azimuth { cos, sin, u }
        })
        .collect();
    let first = table[0];
    table.push(Azimuth { u: 1.0, ..first });
    table
}

/// Normalized radial samples `0..=steps`; the last is exactly 1.0.
fn radial_params(steps: u32) -> Vec<f32> {
    (0..=steps).map(|j| j as f32 / steps as f32).collect()
}

/// Tessellate one patch into strips, with `transform` applied to positions and
/// normals. Pass `Mat4::IDENTITY` for model-space output.
pub fn tessellate(
    patch: SurfacePatch,
    profile: &SurfaceProfile,
    resolution: Resolution,
    transform: &Mat4,
) -> Vec<Strip> {
    let azimuths = azimuth_table(resolution.u_steps);
    let radial = radial_params(resolution.v_steps);

    let mut strips = match patch {
        SurfacePatch::Cap => cap_strips(profile, &azimuths, &radial),
        SurfacePatch::Ring => layered_strips(patch, &azimuths, &radial, |az, t| profile.ring_at(az, t)),
        SurfacePatch::ConcaveDisk => {
            if !profile.has_dimple() {
                log::debug!("Dimple radius is zero, skipping concave disk patch");
                return Vec::new();
            }
            layered_strips(patch, &azimuths, &radial, |az, s| profile.concave_disk_at(az, s))
        }
    };

    if *transform != Mat4::IDENTITY {
        apply_transform(&mut strips, transform);
    }
    strips
}

/// One strip per azimuth slice, walking from the pole to the rim.
fn cap_strips(profile: &SurfaceProfile, azimuths: &[Azimuth], radial: &[f32]) -> Vec<Strip> {
    let latitudes: Vec<Latitude> = radial.iter().map(|&v| profile.latitude(v)).collect();

    azimuths
        .windows(2)
        .map(|pair| {
            let mut vertices = Vec::with_capacity(latitudes.len() * 2);
            for &lat in &latitudes {
                vertices.push(profile.cap_at(pair[0], lat));
                vertices.push(profile.cap_at(pair[1], lat));
            }
            Strip { patch: SurfacePatch::Cap, vertices }
        })
        .collect()
}

/// One strip per radial layer, each running once around the full azimuth.
fn layered_strips<F>(patch: SurfacePatch, azimuths: &[Azimuth], radial: &[f32], eval: F) -> Vec<Strip>
where
    F: Fn(Azimuth, f32) -> SurfaceVertex,
{
    radial
        .windows(2)
        .map(|pair| {
            let mut vertices = Vec::with_capacity(azimuths.len() * 2);
            for &az in azimuths {
                vertices.push(eval(az, pair[0]));
                vertices.push(eval(az, pair[1]));
            }
            Strip { patch, vertices }
        })
        .collect()
}

fn apply_transform(strips: &mut [Strip], transform: &Mat4) {
    let linear = Mat3::from_mat4(*transform);
    // A singular linear part (e.g. a flattening projection) has no normal
    // matrix; normals are then left in model space. Singularity is judged
    // against the column lengths so a small uniform scale still counts.
    let scale = linear.x_axis.length() * linear.y_axis.length() * linear.z_axis.length();
    let normal_matrix = if linear.determinant().abs() > f32::EPSILON * scale {
        Some(linear.inverse().transpose()).filter(|m| m.is_finite())
    } else {
        None
    };

    for vertex in strips.iter_mut().flat_map(|s| s.vertices.iter_mut()) {
        vertex.position = transform.project_point3(vertex.position);
        if let Some(m) = normal_matrix {
            vertex.normal = (m * vertex.normal).normalize_or_zero();
        }
    }
}

/// The whole solid for one frame: every patch tessellated at its resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerMesh {
    pub strips: Vec<Strip>,
}

impl SpeakerMesh {
    pub fn build(profile: &SurfaceProfile, resolutions: &PatchResolutions, transform: &Mat4) -> Self {
        let strips = SurfacePatch::ALL
            .iter()
            .flat_map(|&patch| tessellate(patch, profile, resolutions.get(patch), transform))
            .collect();
        Self { strips }
    }

    /// Vertex count a build would produce, without tessellating.
    pub fn vertex_count_for(profile: &SurfaceProfile, resolutions: &PatchResolutions) -> usize {
        SurfacePatch::ALL
            .iter()
            .map(|&patch| {
                let (strips, per_strip) = strip_layout(patch, profile, resolutions.get(patch));
                strips * per_strip
            })
            .sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.strips.iter().map(Strip::len).sum()
    }

    pub fn strips_for(&self, patch: SurfacePatch) -> impl Iterator<Item = &Strip> {
        self.strips.iter().filter(move |s| s.patch == patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::f32::consts::PI;

    fn profile() -> SurfaceProfile {
        SurfaceProfile::new(3.0 * PI / 4.0, 0.4, 0.1).unwrap()
    }

    #[test]
    fn resolution_rejects_degenerate_steps() {
        assert_eq!(
            Resolution::new(2, 4),
            Err(GeometryError::InvalidResolution { u_steps: 2, v_steps: 4 })
        );
        assert_eq!(
            Resolution::new(8, 0),
            Err(GeometryError::InvalidResolution { u_steps: 8, v_steps: 0 })
        );
        assert!(Resolution::new(3, 1).is_ok());
    }

    #[test]
    fn cap_8x4_has_8_strips_of_10_vertices() {
        let res = Resolution::new(8, 4).unwrap();
        let strips = tessellate(SurfacePatch::Cap, &profile(), res, &Mat4::IDENTITY);
        assert_eq!(strips.len(), 8);
        for strip in &strips {
            assert_eq!(strip.len(), 10);
            assert_eq!(strip.triangle_count(), 8);
        }

        // Strip 0 starts at theta = 0 on the pole.
        let first = strips[0].vertices[0];
        assert_eq!(first.tex_coords.x, 0.0);
        assert!(first.position.distance(Vec3::Z) < 1e-6);

        // The pole only appears on the phi = 0 row (the first two vertices).
        for strip in &strips {
            for (k, v) in strip.vertices.iter().enumerate() {
                let at_pole = v.position.distance(Vec3::Z) < 1e-6;
                assert_eq!(at_pole, k < 2, "vertex {} pole={}", k, at_pole);
            }
        }
    }

    #[test]
    fn layout_matches_tessellation() {
        let p = profile();
        let res = Resolution::new(12, 3).unwrap();
        for patch in SurfacePatch::ALL {
            let strips = tessellate(patch, &p, res, &Mat4::IDENTITY);
            let (count, per) = strip_layout(patch, &p, res);
            assert_eq!(strips.len(), count, "{}", patch.name());
            assert!(strips.iter().all(|s| s.len() == per));
        }
    }

    #[test]
    fn azimuth_loop_closes_exactly() {
        let p = profile();
        let res = Resolution::new(7, 2).unwrap();
        for patch in [SurfacePatch::Ring, SurfacePatch::ConcaveDisk] {
            for strip in tessellate(patch, &p, res, &Mat4::IDENTITY) {
                let n = strip.len();
                assert_eq!(strip.vertices[0].position, strip.vertices[n - 2].position);
                assert_eq!(strip.vertices[1].position, strip.vertices[n - 1].position);
                // Disk mapping is continuous across theta = 0.
                assert_eq!(strip.vertices[0].tex_coords, strip.vertices[n - 2].tex_coords);
                assert_eq!(strip.vertices[1].tex_coords, strip.vertices[n - 1].tex_coords);
            }
        }

        let cap = tessellate(SurfacePatch::Cap, &p, res, &Mat4::IDENTITY);
        let last = cap.last().unwrap();
        let first = &cap[0];
        for j in 0..=2 {
            assert_eq!(last.vertices[2 * j + 1].position, first.vertices[2 * j].position);
            assert_eq!(last.vertices[2 * j + 1].tex_coords.x, 1.0);
        }
    }

    #[test]
    fn patches_share_seams_in_tessellation() {
        let p = profile();
        let res = Resolution::new(16, 4).unwrap();
        let cap = tessellate(SurfacePatch::Cap, &p, res, &Mat4::IDENTITY);
        let ring = tessellate(SurfacePatch::Ring, &p, Resolution::new(16, 1).unwrap(), &Mat4::IDENTITY);
        let disk = tessellate(SurfacePatch::ConcaveDisk, &p, res, &Mat4::IDENTITY);

        // Cap rim vertices are the last pair of each slice strip.
        for (i, strip) in cap.iter().enumerate() {
            let rim = strip.vertices[strip.len() - 2].position;
            let outer = ring[0].vertices[2 * i].position;
            assert_eq!(rim, outer, "cap/ring seam at slice {}", i);
        }

        // Ring inner edge (odd vertices) against the dimple's first layer rim (even vertices).
        for (a, b) in ring[0].vertices.iter().skip(1).step_by(2).zip(disk[0].vertices.iter().step_by(2)) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn tessellated_normals_are_unit_length() {
        let mesh = SpeakerMesh::build(&profile(), &PatchResolutions::default(), &Mat4::IDENTITY);
        for v in mesh.strips.iter().flat_map(|s| &s.vertices) {
            assert!((v.normal.length() - 1.0).abs() < 1e-5, "{:?}", v.normal);
        }
    }

    #[test]
    fn tessellation_is_idempotent() {
        let p = profile();
        let res = PatchResolutions::default();
        let transform = Mat4::from_rotation_z(0.4) * Mat4::from_rotation_x(1.1);
        let a = SpeakerMesh::build(&p, &res, &transform);
        let b = SpeakerMesh::build(&p, &res, &transform);
        assert_eq!(a, b);
    }

    #[test]
    fn transform_moves_positions_and_keeps_normals_unit() {
        let p = profile();
        let res = Resolution::new(8, 4).unwrap();
        let transform = Mat4::from_translation(Vec3::new(0.0, 0.0, 3.0)) * Mat4::from_scale(Vec3::splat(2.0));
        let plain = tessellate(SurfacePatch::Cap, &p, res, &Mat4::IDENTITY);
        let moved = tessellate(SurfacePatch::Cap, &p, res, &transform);
        for (a, b) in plain[0].vertices.iter().zip(&moved[0].vertices) {
            assert!((b.position - (a.position * 2.0 + Vec3::new(0.0, 0.0, 3.0))).length() < 1e-5);
            assert!((b.normal - a.normal).length() < 1e-5);
        }
    }

    #[test]
    fn small_scale_still_rotates_normals() {
        let p = profile();
        let res = Resolution::new(8, 4).unwrap();
        let transform = Mat4::from_rotation_x(PI / 2.0) * Mat4::from_scale(Vec3::splat(0.004));
        let strips = tessellate(SurfacePatch::Cap, &p, res, &transform);
        let pole = strips[0].vertices[0];
        assert!((pole.normal - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-5, "{:?}", pole.normal);
        assert!((pole.position - Vec3::new(0.0, -0.004, 0.0)).length() < 1e-6);
    }

    #[test]
    fn flattening_transform_keeps_model_normals() {
        let p = profile();
        let res = Resolution::new(8, 4).unwrap();
        let flatten = Mat4::from_scale(Vec3::new(1.0, 1.0, 0.0));
        let plain = tessellate(SurfacePatch::Cap, &p, res, &Mat4::IDENTITY);
        let flat = tessellate(SurfacePatch::Cap, &p, res, &flatten);
        for (a, b) in plain[0].vertices.iter().zip(&flat[0].vertices) {
            assert_eq!(b.position.z, 0.0);
            assert_eq!(a.normal, b.normal);
        }
    }

    #[test]
    fn degenerate_dimple_is_skipped() {
        let p = SurfaceProfile::new(1.0, 0.0, 0.1).unwrap();
        let res = Resolution::new(8, 2).unwrap();
        assert!(tessellate(SurfacePatch::ConcaveDisk, &p, res, &Mat4::IDENTITY).is_empty());
        let mesh = SpeakerMesh::build(&p, &PatchResolutions::default(), &Mat4::IDENTITY);
        assert_eq!(mesh.strips_for(SurfacePatch::ConcaveDisk).count(), 0);
        assert!(mesh.strips.iter().flat_map(|s| &s.vertices).all(|v| v.normal.is_finite()));
    }

    #[test]
    fn reference_vertex_count() {
        let p = profile();
        let res = PatchResolutions::default();
        // cap 100 * 102, ring 1 * 202, dimple 20 * 202
        assert_eq!(SpeakerMesh::vertex_count_for(&p, &res), 100 * 102 + 202 + 20 * 202);
        assert_eq!(SpeakerMesh::build(&p, &res, &Mat4::IDENTITY).vertex_count(), 100 * 102 + 202 + 20 * 202);
    }
}
