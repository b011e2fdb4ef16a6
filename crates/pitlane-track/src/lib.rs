//! Track geometry and ground probing.
//!
//! A track is a set of triangle meshes. The [`GroundProbe`] casts one ray
//! straight down from above the vehicle each tick and reports the surface
//! height and whether the vehicle is over the track at all.

pub mod error;
pub mod geometry;
pub mod primitives;
pub mod probe;
pub mod track;

pub use error::TrackError;
pub use geometry::{Aabb, Ray, RayHit, TriangleMesh};
pub use probe::{DEFAULT_PROBE_LIFT, GroundProbe, GroundSample, sample_ground};
pub use track::{MeshData, Track, TrackGeometry, TrackKind, TrackMeshFile, TrackSettings};
