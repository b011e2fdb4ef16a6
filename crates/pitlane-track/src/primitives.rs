//! Procedural track surfaces.

use glam::Vec3;
use std::f32::consts::TAU;

use crate::error::TrackError;
use crate::geometry::TriangleMesh;

/// Flat annulus lying in the XZ plane at height `y`, centered on the origin.
///
/// Vertices alternate inner/outer around the ring; angle zero points along
/// +X and increases toward -Z, matching a ring built in the XY plane and laid
/// flat by a -90 degree rotation about X.
///
/// # Errors
/// Returns [`TrackError::InvalidRing`] when the radii are not ordered or
/// fewer than three segments are requested.
pub fn ring(inner: f32, outer: f32, segments: u32, y: f32) -> Result<TriangleMesh, TrackError> {
    if !(inner >= 0.0 && inner < outer) || segments < 3 {
        return Err(TrackError::InvalidRing {
            inner,
            outer,
            segments,
        });
    }

    let mut positions = Vec::with_capacity(2 * (segments as usize + 1));
    for i in 0..=segments {
        let theta = TAU * i as f32 / segments as f32;
        let (sin, cos) = theta.sin_cos();
        positions.push(Vec3::new(inner * cos, y, -inner * sin));
        positions.push(Vec3::new(outer * cos, y, -outer * sin));
    }

    let mut triangles = Vec::with_capacity(2 * segments as usize);
    for i in 0..segments {
        let inner_a = 2 * i;
        let outer_a = inner_a + 1;
        let inner_b = inner_a + 2;
        let outer_b = inner_a + 3;
        triangles.push([inner_a, outer_a, outer_b]);
        triangles.push([inner_a, outer_b, inner_b]);
    }

    Ok(TriangleMesh::from_parts("ring".to_string(), positions, triangles))
}

/// Axis-aligned rectangle of `width` (X) by `depth` (Z) centered on the
/// origin at height `y`.
pub fn plane(width: f32, depth: f32, y: f32) -> TriangleMesh {
    let (hw, hd) = (width * 0.5, depth * 0.5);
    let positions = vec![
        Vec3::new(-hw, y, -hd),
        Vec3::new(hw, y, -hd),
        Vec3::new(hw, y, hd),
        Vec3::new(-hw, y, hd),
    ];
    let triangles = vec![[0, 2, 1], [0, 3, 2]];
    TriangleMesh::from_parts("plane".to_string(), positions, triangles)
}
