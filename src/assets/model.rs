use std::io::BufRead;
use std::path::Path;

use cgmath::{InnerSpace, Vector3};

use super::AssetError;

/// Grey used for parts without an MTL material
pub const DEFAULT_PART_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    }
}

/// True for mesh names that mark a candle
pub fn is_candle_name(name: &str) -> bool {
    name.to_lowercase().contains("candle")
}

/// One named mesh of the cake model, in model space
#[derive(Debug, Clone)]
pub struct ModelPart {
    pub name: String,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    pub color: [f32; 4],
    pub roughness: f32,
    pub is_candle: bool,
}

impl ModelPart {
    /// Centre of the part's axis-aligned bounding box
    pub fn bounds_center(&self) -> Vector3<f32> {
        if self.positions.len() < 3 {
            return Vector3::new(0.0, 0.0, 0.0);
        }

        let mut min = Vector3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Vector3::new(f32::MIN, f32::MIN, f32::MIN);
        for p in self.positions.chunks_exact(3) {
            min = Vector3::new(min.x.min(p[0]), min.y.min(p[1]), min.z.min(p[2]));
            max = Vector3::new(max.x.max(p[0]), max.y.max(p[1]), max.z.max(p[2]));
        }
        (min + max) * 0.5
    }
}

/// Parsed cake model
#[derive(Debug, Clone, Default)]
pub struct CakeModel {
    pub parts: Vec<ModelPart>,
}

impl CakeModel {
    pub fn candles(&self) -> impl Iterator<Item = &ModelPart> {
        self.parts.iter().filter(|part| part.is_candle)
    }

    /// Name and model-space position of every candle
    pub fn candle_spots(&self) -> Vec<(String, Vector3<f32>)> {
        self.candles()
            .map(|part| (part.name.clone(), part.bounds_center()))
            .collect()
    }
}

/// Loads an OBJ file, and its MTL library if one can be found
pub fn load_model(path: &Path) -> Result<CakeModel, AssetError> {
    let (models, materials) =
        tobj::load_obj(path, &load_options()).map_err(|source| AssetError::Obj {
            path: path.to_path_buf(),
            source,
        })?;

    let materials = materials.unwrap_or_else(|err| {
        log::warn!("No usable MTL for {}: {err}, using default colours", path.display());
        Vec::new()
    });

    let model = build_model(models, &materials);
    if model.parts.is_empty() {
        return Err(AssetError::Empty(path.to_path_buf()));
    }
    Ok(model)
}

/// Parses OBJ text from a reader, without a material library
pub fn parse_model<R: BufRead>(reader: &mut R) -> Result<CakeModel, AssetError> {
    let (models, _) = tobj::load_obj_buf(reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })
    .map_err(|source| AssetError::Obj {
        path: "<memory>".into(),
        source,
    })?;

    let model = build_model(models, &[]);
    if model.parts.is_empty() {
        return Err(AssetError::Empty("<memory>".into()));
    }
    Ok(model)
}

fn build_model(models: Vec<tobj::Model>, materials: &[tobj::Material]) -> CakeModel {
    let parts = models
        .into_iter()
        .enumerate()
        .filter(|(_, model)| !model.mesh.indices.is_empty())
        .map(|(index, model)| {
            let name = if model.name.is_empty() {
                format!("part_{index}")
            } else {
                model.name
            };
            let mesh = model.mesh;

            let normals = if mesh.normals.len() == mesh.positions.len() {
                mesh.normals
            } else {
                log::debug!("Part '{name}' has no normals, computing from faces");
                face_normals(&mesh.positions, &mesh.indices)
            };

            let material = mesh.material_id.and_then(|id| materials.get(id));
            let color = material
                .and_then(|mtl| mtl.diffuse)
                .map(|[r, g, b]| [r, g, b, 1.0])
                .unwrap_or(DEFAULT_PART_COLOR);
            let roughness = material
                .and_then(|mtl| mtl.shininess)
                .map(|shininess| 1.0 - (shininess / 128.0).clamp(0.0, 1.0))
                .unwrap_or(0.6);

            let is_candle = is_candle_name(&name);
            ModelPart {
                name,
                positions: mesh.positions,
                normals,
                indices: mesh.indices,
                color,
                roughness,
                is_candle,
            }
        })
        .collect();

    CakeModel { parts }
}

/// Averaged per-vertex normals for meshes that ship without any
pub fn face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex = |i: u32| {
        let i = i as usize * 3;
        Vector3::new(positions[i], positions[i + 1], positions[i + 2])
    };

    let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); positions.len() / 3];
    for triangle in indices.chunks_exact(3) {
        let (a, b, c) = (vertex(triangle[0]), vertex(triangle[1]), vertex(triangle[2]));
        let normal = (b - a).cross(c - a);
        for &i in triangle {
            sums[i as usize] += normal;
        }
    }

    sums.into_iter()
        .flat_map(|sum| {
            let n = if sum.magnitude2() > 0.0 {
                sum.normalize()
            } else {
                sum
            };
            [n.x, n.y, n.z]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    const CAKE_OBJ: &str = "\
o Cake_Base
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
v 0 1 0
f 1 2 5
f 2 3 5
f 3 4 5
f 4 1 5
o Candle_Left
v -0.3 1 0
v -0.2 1 0
v -0.25 1.4 0
f 6 7 8
o CANDLE_right
v 0.2 1 0
v 0.3 1 0
v 0.25 1.4 0
f 9 10 11
";

    fn cake() -> CakeModel {
        parse_model(&mut Cursor::new(CAKE_OBJ)).unwrap()
    }

    #[test]
    fn detects_candles_case_insensitively() {
        let model = cake();
        assert_eq!(model.parts.len(), 3);
        let names: Vec<&str> = model.candles().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Candle_Left", "CANDLE_right"]);
        assert!(!is_candle_name("Frosting"));
        assert!(is_candle_name("birthday_candle.001"));
    }

    #[test]
    fn candle_spots_sit_at_bounds_center() {
        let spots = cake().candle_spots();
        assert_eq!(spots.len(), 2);
        let (_, left) = &spots[0];
        assert_relative_eq!(left.x, -0.25, epsilon = 1e-6);
        assert_relative_eq!(left.y, 1.2, epsilon = 1e-6);
        assert_relative_eq!(left.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn missing_normals_are_computed_and_unit_length() {
        let model = cake();
        for part in &model.parts {
            assert_eq!(part.normals.len(), part.positions.len());
            assert_eq!(part.color, DEFAULT_PART_COLOR);
            for n in part.normals.chunks_exact(3) {
                let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
                assert_relative_eq!(length, 1.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn flat_triangle_normal_points_up() {
        let positions = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0];
        let normals = face_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals.len(), 9);
        assert_relative_eq!(normals[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn text_without_faces_is_rejected() {
        let result = parse_model(&mut Cursor::new("v 0 0 0\n"));
        assert!(matches!(result, Err(AssetError::Empty(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_model(Path::new("does/not/exist.obj")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.obj"));
    }
}
