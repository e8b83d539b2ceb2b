use crate::float_types::Real;
use crate::io::IoError;
use crate::mesh::Mesh;
use crate::solid::Solid;
use crate::triangulated::Triangulated3D;
use nalgebra::Point3;
use std::fmt::Debug;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// Export to ASCII STL
/// Convert a triangulated shape to an **ASCII STL** string with the given `name`.
///
/// ```rust
/// # use csgshell::mesh::Mesh;
/// let mesh  = Mesh::<()>::cube(1.0, None);
/// let text = mesh.to_stl_ascii("my_solid");
/// assert!(text.starts_with("solid my_solid"));
/// ```
pub fn to_stl_ascii<T: Triangulated3D>(shape: &T, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    shape.visit_triangles(|tri| {
        let n = tri[0].normal;
        out.push_str(&format!("  facet normal {:.6} {:.6} {:.6}\n", n.x, n.y, n.z));
        out.push_str("    outer loop\n");
        for v in &tri {
            let p = v.pos;
            out.push_str(&format!("      vertex {:.6} {:.6} {:.6}\n", p.x, p.y, p.z));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    });

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// The binary format has no room for a name, the header is left blank.
pub fn to_stl_binary<T: Triangulated3D>(shape: &T) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::new();

    shape.visit_triangles(|tri| {
        let n = tri[0].normal;
        #[allow(clippy::unnecessary_cast)]
        {
            triangles.push(Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri.map(|v| {
                    let p = v.pos;
                    Vertex::new([p.x as f32, p.y as f32, p.z as f32])
                }),
            });
        }
    });

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }
    pub fn to_stl_binary(&self) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self)
    }
}

impl Solid {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }
    pub fn to_stl_binary(&self) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self)
    }

    /// Read an ASCII or binary STL and validate it as a closed solid.
    ///
    /// Corners closer than the global tolerance are welded, so files that
    /// store every facet with its own copies of the corners load fine.
    pub fn from_stl_reader<R: Read + Seek>(reader: &mut R) -> Result<Solid, IoError> {
        let stl = stl_io::read_stl(reader)?;
        let mut triangles = Vec::with_capacity(stl.faces.len());
        for face in &stl.faces {
            let mut corners = [Point3::origin(); 3];
            for (corner, &idx) in corners.iter_mut().zip(face.vertices.iter()) {
                let v = stl.vertices.get(idx).ok_or_else(|| {
                    IoError::MalformedInput(format!("facet references missing vertex {idx}"))
                })?;
                *corner = Point3::new(v[0] as Real, v[1] as Real, v[2] as Real);
            }
            triangles.push(corners);
        }
        tracing::debug!(facets = triangles.len(), "read stl");
        Ok(Solid::from_triangles(&triangles)?)
    }
}

/// Load and validate a solid from an STL file.
pub fn read_stl_file(path: impl AsRef<Path>) -> Result<Solid, IoError> {
    let mut reader = BufReader::new(File::open(path)?);
    Solid::from_stl_reader(&mut reader)
}

/// Write a solid to `path` as binary STL, or ASCII STL named `name` when
/// `ascii` is set.
pub fn write_stl_file(solid: &Solid, path: impl AsRef<Path>, name: &str, ascii: bool) -> Result<(), IoError> {
    let bytes = if ascii {
        solid.to_stl_ascii(name).into_bytes()
    } else {
        solid.to_stl_binary()?
    };
    std::fs::write(path, bytes)?;
    Ok(())
}
