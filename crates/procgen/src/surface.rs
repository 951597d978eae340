//! Closed-form parametrization of the speaker solid.
//!
//! The solid is three revolute patches around the +Z axis that share one unit
//! sphere and one cap half-angle:
//! - `Cap`: the sphere from the pole down to `phi_max`
//! - `Ring`: the flat annulus closing the cap's base
//! - `ConcaveDisk`: the tapered dimple filling the ring's hole
//!
//! Neighbouring patches evaluate their shared edge with the same arithmetic so
//! the seams match bit for bit, not just within a tolerance.

use crate::error::GeometryError;
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// One of the three analytic surfaces making up the solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfacePatch {
    Cap,
    Ring,
    ConcaveDisk,
}

impl SurfacePatch {
    pub const ALL: [SurfacePatch; 3] = [SurfacePatch::Cap, SurfacePatch::Ring, SurfacePatch::ConcaveDisk];

    pub fn name(self) -> &'static str {
        match self {
            SurfacePatch::Cap => "cap",
            SurfacePatch::Ring => "ring",
            SurfacePatch::ConcaveDisk => "concave disk",
        }
    }
}

/// A point on a patch: position, unit normal, texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

impl SurfaceVertex {
    pub fn new(position: Vec3, normal: Vec3, tex_coords: Vec2) -> Self {
        Self { position, normal, tex_coords }
    }
}

/// Precomputed trigonometry for one azimuth sample.
///
/// `u` is the texture coordinate along the azimuth. At the closing sample of a
/// loop `cos`/`sin` repeat the first sample exactly while `u` reads 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Azimuth {
    pub cos: f32,
    pub sin: f32,
    pub u: f32,
}

impl Azimuth {
    pub fn from_angle(theta: f32) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self { cos, sin, u: theta / TAU }
    }
}

/// Precomputed trigonometry for one cap latitude. `v` is φ / phi_max.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Latitude {
    pub sin: f32,
    pub cos: f32,
    pub v: f32,
}

/// Shape parameters shared by all three patches, plus the values derived from
/// them. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceProfile {
    phi_max: f32,
    inner_radius_factor: f32,
    concave_depth: f32,
    /// sin(phi_max): radius of the cap rim and of the ring's outer edge.
    rim_radius: f32,
    /// cos(phi_max): height of the ring plane.
    base_z: f32,
    /// Radius of the ring's inner edge, equal to the dimple's outer radius.
    inner_radius: f32,
}

impl Default for SurfaceProfile {
    /// The reference solid: a 135° cap, inner ring at 40%, 0.1 deep dimple.
    fn default() -> Self {
        Self::from_parts(3.0 * PI / 4.0, 0.4, 0.1)
    }
}

impl SurfaceProfile {
    /// Build a profile, rejecting parameters outside the patch domains.
    pub fn new(phi_max: f32, inner_radius_factor: f32, concave_depth: f32) -> Result<Self, GeometryError> {
        if !(phi_max > 0.0 && phi_max < PI) {
            return Err(GeometryError::InvalidCapAngle(phi_max));
        }
        if !(0.0..=1.0).contains(&inner_radius_factor) {
            return Err(GeometryError::InvalidInnerRadiusFactor(inner_radius_factor));
        }
        if !concave_depth.is_finite() {
            return Err(GeometryError::NonFiniteDepth(concave_depth));
        }
        Ok(Self::from_parts(phi_max, inner_radius_factor, concave_depth))
    }

    fn from_parts(phi_max: f32, inner_radius_factor: f32, concave_depth: f32) -> Self {
        let (rim_radius, base_z) = phi_max.sin_cos();
        Self {
            phi_max,
            inner_radius_factor,
            concave_depth,
            rim_radius,
            base_z,
            inner_radius: rim_radius * inner_radius_factor,
        }
    }

    pub fn phi_max(&self) -> f32 {
        self.phi_max
    }

    pub fn inner_radius_factor(&self) -> f32 {
        self.inner_radius_factor
    }

    pub fn concave_depth(&self) -> f32 {
        self.concave_depth
    }

    pub fn rim_radius(&self) -> f32 {
        self.rim_radius
    }

    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    pub fn base_z(&self) -> f32 {
        self.base_z
    }

    /// False when the dimple has collapsed to a point and its normal is undefined.
    pub fn has_dimple(&self) -> bool {
        self.inner_radius > 0.0
    }

    /// Latitude sample at `v` = φ / phi_max. `v = 1` lands exactly on the rim.
    pub fn latitude(&self, v: f32) -> Latitude {
        let (sin, cos) = (self.phi_max * v).sin_cos();
        Latitude { sin, cos, v }
    }

    /// Evaluate `patch` at azimuth `theta` and normalized radial parameter `v`
    /// in [0, 1]. For the cap `v` maps linearly onto φ ∈ [0, phi_max].
    pub fn evaluate(&self, patch: SurfacePatch, theta: f32, v: f32) -> SurfaceVertex {
        let az = Azimuth::from_angle(theta);
        match patch {
            SurfacePatch::Cap => self.cap_at(az, self.latitude(v)),
            SurfacePatch::Ring => self.ring_at(az, v),
            SurfacePatch::ConcaveDisk => self.concave_disk_at(az, v),
        }
    }

    /// Cap(θ, φ) with φ in radians.
    pub fn cap(&self, theta: f32, phi: f32) -> SurfaceVertex {
        self.cap_at(Azimuth::from_angle(theta), self.latitude(phi / self.phi_max))
    }

    /// Ring(θ, t), t = 0 on the outer edge and 1 on the inner edge.
    pub fn ring(&self, theta: f32, t: f32) -> SurfaceVertex {
        self.ring_at(Azimuth::from_angle(theta), t)
    }

    /// ConcaveDisk(θ, s), s = 0 on the dimple rim and 1 at its center.
    pub fn concave_disk(&self, theta: f32, s: f32) -> SurfaceVertex {
        self.concave_disk_at(Azimuth::from_angle(theta), s)
    }

    pub(crate) fn cap_at(&self, az: Azimuth, lat: Latitude) -> SurfaceVertex {
        let position = Vec3::new(lat.sin * az.cos, lat.sin * az.sin, lat.cos);
        // Unit sphere: the outward normal is the position itself.
        SurfaceVertex::new(position, position, Vec2::new(az.u, lat.v))
    }

    pub(crate) fn ring_at(&self, az: Azimuth, t: f32) -> SurfaceVertex {
        // Weighted form keeps both endpoints exact (t = 0 and t = 1).
        let radius = self.rim_radius * (1.0 - t) + self.inner_radius * t;
        let position = Vec3::new(radius * az.cos, radius * az.sin, self.base_z);
        let scale = radius / self.rim_radius;
        let tex_coords = Vec2::new(0.5 + 0.5 * scale * az.cos, 0.5 + 0.5 * scale * az.sin);
        SurfaceVertex::new(position, Vec3::NEG_Z, tex_coords)
    }

    pub(crate) fn concave_disk_at(&self, az: Azimuth, s: f32) -> SurfaceVertex {
        let radius = self.inner_radius * (1.0 - s);
        let z = self.base_z + self.concave_depth * s;
        let position = Vec3::new(radius * az.cos, radius * az.sin, z);

        if !self.has_dimple() {
            return SurfaceVertex::new(position, Vec3::NEG_Z, Vec2::splat(0.5));
        }

        let normal = Vec3::new(-az.cos, -az.sin, self.concave_depth / self.inner_radius).normalize();
        let scale = radius / self.inner_radius;
        let tex_coords = Vec2::new(0.5 + 0.5 * scale * az.cos, 0.5 + 0.5 * scale * az.sin);
        SurfaceVertex::new(position, normal, tex_coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-5;

    fn sample_thetas() -> impl Iterator<Item = f32> {
        (0..=64).map(|i| i as f32 / 64.0 * TAU)
    }

    #[test]
    fn cap_rim_meets_ring_outer_edge() {
        let profile = SurfaceProfile::default();
        for theta in sample_thetas() {
            let cap = profile.cap(theta, profile.phi_max());
            let ring = profile.ring(theta, 0.0);
            assert!(
                cap.position.distance(ring.position) < TOL,
                "seam gap at theta {}: {:?} vs {:?}",
                theta,
                cap.position,
                ring.position
            );
        }
    }

    #[test]
    fn ring_inner_edge_meets_dimple_rim() {
        let profile = SurfaceProfile::default();
        for theta in sample_thetas() {
            let ring = profile.ring(theta, 1.0);
            let disk = profile.concave_disk(theta, 0.0);
            assert_eq!(ring.position, disk.position, "seam gap at theta {}", theta);
        }
    }

    #[test]
    fn all_normals_are_unit_length() {
        let profile = SurfaceProfile::default();
        for patch in SurfacePatch::ALL {
            for theta in sample_thetas() {
                for j in 0..=10 {
                    let v = j as f32 / 10.0;
                    let n = profile.evaluate(patch, theta, v).normal;
                    assert!((n.length() - 1.0).abs() < TOL, "{} normal {:?} at v {}", patch.name(), n, v);
                }
            }
        }
    }

    #[test]
    fn cap_pole_is_the_north_pole() {
        let profile = SurfaceProfile::default();
        let pole = profile.cap(1.3, 0.0);
        assert!(pole.position.distance(Vec3::Z) < TOL);
        assert_eq!(pole.tex_coords.y, 0.0);
    }

    #[test]
    fn ring_is_flat_and_faces_down() {
        let profile = SurfaceProfile::default();
        for t in [0.0, 0.25, 0.5, 1.0] {
            let v = profile.ring(0.7, t);
            assert_eq!(v.position.z, profile.base_z());
            assert_eq!(v.normal, Vec3::NEG_Z);
        }
    }

    #[test]
    fn ring_tex_coords_span_centered_disk() {
        let profile = SurfaceProfile::default();
        let outer = profile.ring(0.0, 0.0);
        assert!((outer.tex_coords - Vec2::new(1.0, 0.5)).length() < TOL);
        let inner = profile.ring(0.0, 1.0);
        let expected = 0.5 + 0.5 * profile.inner_radius_factor();
        assert!((inner.tex_coords.x - expected).abs() < TOL);
    }

    #[test]
    fn dimple_center_sits_at_depth() {
        let profile = SurfaceProfile::default();
        let center = profile.concave_disk(2.0, 1.0);
        assert!(center.position.truncate().length() < TOL);
        assert!((center.position.z - (profile.base_z() + profile.concave_depth())).abs() < TOL);
        assert!((center.tex_coords - Vec2::splat(0.5)).length() < TOL);
    }

    #[test]
    fn dimple_normal_tilts_toward_axis() {
        let profile = SurfaceProfile::default();
        let v = profile.concave_disk(0.0, 0.5);
        assert!(v.normal.x < 0.0);
        assert!(v.normal.y.abs() < TOL);
        assert!(v.normal.z > 0.0);
    }

    #[test]
    fn degenerate_dimple_never_produces_nan() {
        let profile = SurfaceProfile::new(3.0 * PI / 4.0, 0.0, 0.1).unwrap();
        assert!(!profile.has_dimple());
        for s in [0.0, 0.5, 1.0] {
            let v = profile.concave_disk(1.0, s);
            assert!(v.normal.is_finite());
            assert!(v.tex_coords.is_finite());
            assert_eq!(v.normal, Vec3::NEG_Z);
        }
    }

    #[test]
    fn profile_rejects_out_of_domain_parameters() {
        assert_eq!(SurfaceProfile::new(0.0, 0.4, 0.1), Err(GeometryError::InvalidCapAngle(0.0)));
        assert_eq!(SurfaceProfile::new(PI, 0.4, 0.1), Err(GeometryError::InvalidCapAngle(PI)));
        assert_eq!(
            SurfaceProfile::new(1.0, 1.5, 0.1),
            Err(GeometryError::InvalidInnerRadiusFactor(1.5))
        );
        assert!(matches!(
            SurfaceProfile::new(1.0, 0.4, f32::NAN),
            Err(GeometryError::NonFiniteDepth(_))
        ));
        assert!(SurfaceProfile::new(1.0, 1.0, -0.2).is_ok());
    }
}
