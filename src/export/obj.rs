//! Wavefront OBJ writer for tessellated meshes.
//!
//! Every triangle owns three `v` records (no welding of shared corners),
//! followed by one `f` record per triangle with 1-based indices.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::math::Triangle;

pub const DEFAULT_OBJ_PATH: &str = "geometry.obj";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot create {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },
    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("cannot move {} into place: {source}", .path.display())]
    Persist { path: PathBuf, source: io::Error },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjStats {
    pub vertices: usize,
    pub faces: usize,
}

pub fn encode_obj<W: Write>(w: &mut W, name: &str, triangles: &[Triangle]) -> io::Result<ObjStats> {
    writeln!(w, "# ruled3d surface of revolution")?;
    writeln!(w, "o {name}")?;

    for tri in triangles {
        for p in tri.corners() {
            writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
        }
    }

    for index in 0..triangles.len() {
        let a = index * 3 + 1;
        writeln!(w, "f {} {} {}", a, a + 1, a + 2)?;
    }

    Ok(ObjStats {
        vertices: triangles.len() * 3,
        faces: triangles.len(),
    })
}

/// Writes `triangles` to `path`. The data goes to a sibling temporary file
/// first and is renamed over `path` only once complete, so a failed export
/// never leaves a truncated file behind.
pub fn write_obj(path: &Path, triangles: &[Triangle]) -> Result<ObjStats, ExportError> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("surface");
    let tmp_path = temporary_path(path);

    let file = File::create(&tmp_path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let mut w = BufWriter::new(file);
    let written = encode_obj(&mut w, name, triangles).and_then(|stats| {
        w.flush()?;
        Ok(stats)
    });

    let stats = match written {
        Ok(stats) => stats,
        Err(source) => {
            drop(w);
            let _ = fs::remove_file(&tmp_path);
            return Err(ExportError::Write {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    drop(w);

    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        ExportError::Persist {
            path: path.to_path_buf(),
            source,
        }
    })?;

    Ok(stats)
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{InterpolationMode, ProfileCurve, ProfilePoint, Subdivision, tessellate};
    use glam::Vec3;

    fn sample_triangles() -> Vec<Triangle> {
        let curve = ProfileCurve::from_points([
            ProfilePoint::new(-0.5, 0.3),
            ProfilePoint::new(0.0, 0.6),
            ProfilePoint::new(0.5, 0.2),
        ]);
        tessellate(&curve, Subdivision::new(6), InterpolationMode::Piecewise).triangles
    }

    fn count_records(text: &str) -> (usize, usize) {
        let vertices = text.lines().filter(|l| l.starts_with("v ")).count();
        let faces = text.lines().filter(|l| l.starts_with("f ")).count();
        (vertices, faces)
    }

    #[test]
    fn single_triangle_layout() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 1.5, -2.0));
        let mut out = Vec::new();
        let stats = encode_obj(&mut out, "tri", &[tri]).expect("encode");

        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(lines, vec!["o tri", "v 0 0 0", "v 1 0 0", "v 0 1.5 -2", "f 1 2 3"]);
        assert_eq!(stats, ObjStats { vertices: 3, faces: 1 });
    }

    #[test]
    fn faces_index_consecutive_triples() {
        let triangles = sample_triangles();
        let mut out = Vec::new();
        encode_obj(&mut out, "surface", &triangles).expect("encode");
        let text = String::from_utf8(out).expect("utf8");

        let faces: Vec<Vec<usize>> = text
            .lines()
            .filter_map(|l| l.strip_prefix("f "))
            .map(|l| l.split_whitespace().map(|i| i.parse().expect("index")).collect())
            .collect();

        for (n, face) in faces.iter().enumerate() {
            assert_eq!(face, &vec![3 * n + 1, 3 * n + 2, 3 * n + 3]);
        }
    }

    #[test]
    fn file_round_trip_counts_match_mesh() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("geometry.obj");
        let triangles = sample_triangles();

        let stats = write_obj(&path, &triangles).expect("write");
        let text = fs::read_to_string(&path).expect("read back");

        assert_eq!(count_records(&text), (3 * triangles.len(), triangles.len()));
        assert_eq!(stats.faces, triangles.len());
        assert!(!temporary_path(&path).exists());
    }

    #[test]
    fn parsed_vertices_match_triangle_corners() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mesh.obj");
        let triangles = sample_triangles();
        write_obj(&path, &triangles).expect("write");

        let text = fs::read_to_string(&path).expect("read back");
        let parsed: Vec<Vec3> = text
            .lines()
            .filter_map(|l| l.strip_prefix("v "))
            .map(|l| {
                let c: Vec<f32> = l.split_whitespace().map(|x| x.parse().expect("float")).collect();
                Vec3::new(c[0], c[1], c[2])
            })
            .collect();

        let corners: Vec<Vec3> = triangles.iter().flat_map(|t| t.corners()).collect();
        assert_eq!(parsed, corners);
    }

    #[test]
    fn empty_mesh_writes_header_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.obj");

        let stats = write_obj(&path, &[]).expect("write");
        let text = fs::read_to_string(&path).expect("read back");

        assert_eq!(stats, ObjStats { vertices: 0, faces: 0 });
        assert_eq!(count_records(&text), (0, 0));
    }

    #[test]
    fn unwritable_destination_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("geometry.obj");

        let err = write_obj(&path, &sample_triangles()).expect_err("must fail");
        assert!(matches!(err, ExportError::Create { .. }));
        assert!(err.to_string().contains("geometry.obj"));
        assert!(!path.exists());
    }

    #[test]
    fn overwrites_existing_file_completely() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("geometry.obj");
        fs::write(&path, "stale contents\n".repeat(1000)).expect("seed file");

        let triangles = sample_triangles();
        write_obj(&path, &triangles[..2]).expect("write");

        let text = fs::read_to_string(&path).expect("read back");
        assert!(!text.contains("stale"));
        assert_eq!(count_records(&text), (6, 2));
    }
}
