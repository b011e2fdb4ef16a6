//! Track definitions and loading.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::TrackError;
use crate::geometry::{Ray, RayHit, TriangleMesh};
use crate::primitives;

/// Which track representation is active.
///
/// The kind decides how high above the hit surface the vehicle rests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackKind {
    /// Loaded scene mesh.
    Detailed,
    /// Procedural ring.
    #[default]
    Simple,
}

impl TrackKind {
    /// Rest height added to ground hits for this kind.
    #[must_use]
    pub fn height_offset(self) -> f32 {
        match self {
            TrackKind::Detailed => 1.0,
            TrackKind::Simple => 0.5,
        }
    }
}

/// Track section of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSettings {
    pub kind: TrackKind,
    /// RON mesh file used by [`TrackKind::Detailed`].
    pub mesh_path: Option<PathBuf>,
    pub ring_inner_radius: f32,
    pub ring_outer_radius: f32,
    pub ring_segments: u32,
    /// Height above the vehicle from which ground rays start.
    pub probe_lift: f32,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            kind: TrackKind::Simple,
            mesh_path: None,
            ring_inner_radius: 15.0,
            ring_outer_radius: 25.0,
            ring_segments: 32,
            probe_lift: 5.0,
        }
    }
}

/// Anything that can be probed for ground.
pub trait TrackGeometry {
    /// All meshes that make up the surface.
    fn meshes(&self) -> &[TriangleMesh];

    /// Nearest hit across all meshes.
    fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for (index, mesh) in self.meshes().iter().enumerate() {
            if let Some(mut hit) = mesh.raycast(ray) {
                if best.is_some_and(|b| b.distance <= hit.distance) {
                    continue;
                }
                hit.mesh_index = index;
                best = Some(hit);
            }
        }
        best
    }
}

impl TrackGeometry for TriangleMesh {
    fn meshes(&self) -> &[TriangleMesh] {
        std::slice::from_ref(self)
    }
}

/// A drivable surface.
#[derive(Debug, Clone)]
pub struct Track {
    name: String,
    kind: TrackKind,
    meshes: Vec<TriangleMesh>,
}

impl Track {
    pub fn new(name: impl Into<String>, kind: TrackKind, meshes: Vec<TriangleMesh>) -> Self {
        Self {
            name: name.into(),
            kind,
            meshes,
        }
    }

    /// Procedural ring on the ground plane.
    pub fn simple_ring(inner: f32, outer: f32, segments: u32) -> Result<Self, TrackError> {
        let mesh = primitives::ring(inner, outer, segments, 0.0)?;
        Ok(Self::new("ring", TrackKind::Simple, vec![mesh]))
    }

    /// Parse a [`TrackMeshFile`] from RON text.
    pub fn from_ron_str(name: impl Into<String>, contents: &str) -> Result<Self, TrackError> {
        let file: TrackMeshFile = ron::from_str(contents).map_err(TrackError::Parse)?;
        let meshes = file
            .meshes
            .into_iter()
            .map(MeshData::into_mesh)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(name, TrackKind::Detailed, meshes))
    }

    /// Load a detailed track from a RON mesh file.
    pub fn load_ron(path: &Path) -> Result<Self, TrackError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TrackError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "track".to_string());
        let track = Self::from_ron_str(name, &contents)?;
        info!(
            "Loaded track '{}' from {} ({} meshes, {} triangles)",
            track.name,
            path.display(),
            track.meshes.len(),
            track.triangle_count()
        );
        Ok(track)
    }

    /// Build the track described by `settings`.
    pub fn from_settings(settings: &TrackSettings) -> Result<Self, TrackError> {
        match settings.kind {
            TrackKind::Detailed => {
                let path = settings
                    .mesh_path
                    .as_deref()
                    .ok_or(TrackError::MissingMeshPath)?;
                Self::load_ron(path)
            }
            TrackKind::Simple => Self::simple_ring(
                settings.ring_inner_radius,
                settings.ring_outer_radius,
                settings.ring_segments,
            ),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangles().len()).sum()
    }
}

impl TrackGeometry for Track {
    fn meshes(&self) -> &[TriangleMesh] {
        &self.meshes
    }
}

/// On-disk mesh format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackMeshFile {
    pub meshes: Vec<MeshData>,
}

/// One named mesh in a [`TrackMeshFile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

impl MeshData {
    fn into_mesh(self) -> Result<TriangleMesh, TrackError> {
        let positions = self.positions.into_iter().map(Vec3::from).collect();
        TriangleMesh::new(self.name, positions, self.triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TWO_LEVELS: &str = r#"(
        meshes: [
            (
                name: "ground",
                positions: [(-10.0, 0.0, -10.0), (10.0, 0.0, -10.0), (0.0, 0.0, 10.0)],
                triangles: [(0, 2, 1)],
            ),
            (
                name: "bridge",
                positions: [(-2.0, 3.0, -2.0), (2.0, 3.0, -2.0), (0.0, 3.0, 2.0)],
                triangles: [(0, 2, 1)],
            ),
        ],
    )"#;

    #[test]
    fn test_height_offsets() {
        assert_eq!(TrackKind::Detailed.height_offset(), 1.0);
        assert_eq!(TrackKind::Simple.height_offset(), 0.5);
    }

    #[test]
    fn test_nearest_hit_across_meshes() {
        let track = Track::from_ron_str("t", TWO_LEVELS).unwrap();
        let hit = track.raycast(&Ray::down(Vec3::new(0.0, 5.0, 0.0))).unwrap();
        assert_eq!(hit.mesh_index, 1);
        assert!((hit.point.y - 3.0).abs() < 1e-5);

        let hit = track.raycast(&Ray::down(Vec3::new(0.0, 2.0, 0.0))).unwrap();
        assert_eq!(hit.mesh_index, 0);
    }

    #[test]
    fn test_bad_index_rejected() {
        let src = r#"(meshes: [(name: "m", positions: [(0.0, 0.0, 0.0)], triangles: [(0, 1, 2)])])"#;
        let err = Track::from_ron_str("t", src).unwrap_err();
        assert!(matches!(err, TrackError::IndexOutOfRange { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_LEVELS.as_bytes()).unwrap();
        let track = Track::load_ron(file.path()).unwrap();
        assert_eq!(track.kind(), TrackKind::Detailed);
        assert_eq!(track.triangle_count(), 2);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Track::load_ron(Path::new("/nonexistent/track.ron")).unwrap_err();
        assert!(matches!(err, TrackError::Read { .. }));
    }

    #[test]
    fn test_settings_detailed_without_path() {
        let settings = TrackSettings {
            kind: TrackKind::Detailed,
            ..TrackSettings::default()
        };
        assert!(matches!(
            Track::from_settings(&settings),
            Err(TrackError::MissingMeshPath)
        ));
    }

    #[test]
    fn test_settings_default_is_ring() {
        let track = Track::from_settings(&TrackSettings::default()).unwrap();
        assert_eq!(track.kind(), TrackKind::Simple);
        assert_eq!(track.triangle_count(), 64);
    }
}
