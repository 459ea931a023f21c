//! Triangle meshes: the built-in cube and OBJ loading.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::math::Vec3;

/// Indices of one triangle into the mesh's vertex array (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Face {
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }
}

pub const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
];

pub const CUBE_FACES: [Face; 12] = [
    // front
    Face::new(0, 1, 2),
    Face::new(0, 2, 3),
    // right
    Face::new(3, 2, 4),
    Face::new(3, 4, 5),
    // back
    Face::new(5, 4, 6),
    Face::new(5, 6, 7),
    // left
    Face::new(7, 6, 1),
    Face::new(7, 1, 0),
    // top
    Face::new(1, 6, 4),
    Face::new(1, 4, 2),
    // bottom
    Face::new(5, 7, 0),
    Face::new(5, 0, 3),
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("{0} contains no triangles")]
    Empty(PathBuf),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        debug_assert!(faces
            .iter()
            .all(|f| [f.a, f.b, f.c].iter().all(|&i| (i as usize) < vertices.len())));
        Self {
            name: name.into(),
            vertices,
            faces,
        }
    }

    /// The 2x2x2 cube centred on the origin.
    pub fn cube() -> Self {
        Self::new("cube", CUBE_VERTICES.to_vec(), CUBE_FACES.to_vec())
    }

    /// Load every object in an OBJ file into one triangulated mesh.
    pub fn from_obj(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };
        let (models, _materials) =
            tobj::load_obj(path, &options).map_err(|source| LoadError::Obj {
                path: path.to_path_buf(),
                source,
            })?;

        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for model in &models {
            let base = vertices.len() as u32;
            vertices.extend(
                model
                    .mesh
                    .positions
                    .chunks_exact(3)
                    .map(|p| Vec3::new(p[0], p[1], p[2])),
            );
            faces.extend(
                model
                    .mesh
                    .indices
                    .chunks_exact(3)
                    .map(|i| Face::new(base + i[0], base + i[1], base + i[2])),
            );
        }

        if faces.is_empty() {
            return Err(LoadError::Empty(path.to_path_buf()));
        }

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        log::info!(
            "loaded {} ({} vertices, {} triangles)",
            path.display(),
            vertices.len(),
            faces.len()
        );
        Ok(Self::new(name, vertices, faces))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Vertex positions of every face.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.faces.iter().map(|f| {
            [
                self.vertices[f.a as usize],
                self.vertices[f.b as usize],
                self.vertices[f.c as usize],
            ]
        })
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (
                Vec3::new(lo.x.min(v.x), lo.y.min(v.y), lo.z.min(v.z)),
                Vec3::new(hi.x.max(v.x), hi.y.max(v.y), hi.z.max(v.z)),
            )
        }))
    }
}
