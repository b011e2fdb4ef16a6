//! Rays, bounding boxes, and triangle meshes for ground sampling.
//!
//! Meshes keep a cached [`Aabb`] so that a ray which cannot touch the mesh
//! is rejected with one slab test before any per-triangle work.

use glam::Vec3;

use crate::error::TrackError;

/// Below this magnitude a determinant or direction component counts as zero.
const EPSILON: f32 = 1e-7;

/// A half-line used for intersection queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Start point in world units.
    pub origin: Vec3,
    /// Normalized direction.
    pub direction: Vec3,
    /// Hits farther than this are ignored.
    pub max_distance: f32,
}

impl Ray {
    /// A ray with unlimited range.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            max_distance: f32::INFINITY,
        }
    }

    /// Straight down from `origin`.
    #[must_use]
    pub fn down(origin: Vec3) -> Self {
        Self::new(origin, Vec3::NEG_Y)
    }

    /// Point at parametric distance `t`.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a successful ray query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// Unit normal of the hit triangle, facing the ray origin.
    pub normal: Vec3,
    /// Index of the mesh within its track.
    pub mesh_index: usize,
    /// Index of the triangle within the mesh.
    pub triangle: usize,
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that contains nothing; growing it with any point
    /// yields a box around that point.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Smallest box around `points`.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        points.iter().fold(Self::EMPTY, |acc, p| Self {
            min: acc.min.min(*p),
            max: acc.max.max(*p),
        })
    }

    /// Whether the box contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Slab test. Returns the entry and exit distances along the ray when the
    /// ray overlaps the box within its range.
    #[must_use]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }
        let mut t_enter = 0.0_f32;
        let mut t_exit = ray.max_distance;
        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if dir.abs() < EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let t1 = (lo - origin) * inv;
            let t2 = (hi - origin) * inv;
            t_enter = t_enter.max(t1.min(t2));
            t_exit = t_exit.min(t1.max(t2));
            if t_enter > t_exit {
                return None;
            }
        }
        Some((t_enter, t_exit))
    }
}

/// Indexed triangle surface.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    name: String,
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    bounds: Aabb,
}

impl TriangleMesh {
    /// Build a mesh, validating that every index refers to a vertex.
    ///
    /// # Errors
    /// Returns [`TrackError::IndexOutOfRange`] for a dangling index.
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
    ) -> Result<Self, TrackError> {
        let name = name.into();
        for (triangle, indices) in triangles.iter().enumerate() {
            if let Some(&index) = indices
                .iter()
                .find(|&&i| i as usize >= positions.len())
            {
                return Err(TrackError::IndexOutOfRange {
                    mesh: name,
                    triangle,
                    index,
                    vertex_count: positions.len(),
                });
            }
        }
        Ok(Self::from_parts(name, positions, triangles))
    }

    /// Build a mesh whose indices are in range by construction.
    pub(crate) fn from_parts(name: String, positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        let bounds = Aabb::from_points(&positions);
        Self {
            name,
            positions,
            triangles,
            bounds,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Corner positions of triangle `index`.
    #[must_use]
    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[index];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    /// Nearest hit of `ray` against this mesh. Triangles are two-sided.
    ///
    /// The returned hit carries `mesh_index == 0`; collections fill in the
    /// real index.
    #[must_use]
    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        self.bounds.intersect_ray(ray)?;

        let mut best: Option<RayHit> = None;
        for index in 0..self.triangles.len() {
            let corners = self.triangle(index);
            let Some(t) = intersect_triangle(ray, corners) else {
                continue;
            };
            if best.is_some_and(|b| b.distance <= t) {
                continue;
            }
            let mut normal = (corners[1] - corners[0])
                .cross(corners[2] - corners[0])
                .normalize_or_zero();
            if normal.dot(ray.direction) > 0.0 {
                normal = -normal;
            }
            best = Some(RayHit {
                distance: t,
                point: ray.at(t),
                normal,
                mesh_index: 0,
                triangle: index,
            });
        }
        best
    }
}

/// Moller-Trumbore ray/triangle test. Returns the hit distance.
fn intersect_triangle(ray: &Ray, [a, b, c]: [Vec3; 3]) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        // Parallel to the plane, or degenerate.
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    (t >= 0.0 && t <= ray.max_distance).then_some(t)
}
