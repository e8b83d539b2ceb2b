#![cfg(feature = "stl-io")]

mod support;

use csgshell::{
    Solid, ValidationError,
    io::{
        IoError,
        stl::{read_stl_file, write_stl_file},
    },
};
use std::io::Cursor;
use support::{approx_eq, cube_at, sphere};

#[test]
fn solid_to_stl_ascii() {
    let stl_str = cube_at(0.0, 2.0).to_stl_ascii("test_cube");
    assert!(stl_str.starts_with("solid test_cube"));
    assert!(stl_str.trim_end().ends_with("endsolid test_cube"));
    assert_eq!(stl_str.matches("facet normal").count(), 12);
    assert_eq!(stl_str.matches("vertex").count(), 36);
}

#[test]
fn binary_stl_loads_back_as_the_same_solid() {
    let ball = sphere(3.0, 12, 6);
    let bytes = ball.to_stl_binary().unwrap();
    let loaded = Solid::from_stl_reader(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(loaded.num_triangles(), ball.num_triangles());
    // binary STL stores f32 coordinates
    assert!(loaded.approx_eq(&ball, 1e-5));
}

#[test]
fn ascii_stl_loads() {
    let cube = cube_at(-1.0, 2.0);
    let text = cube.to_stl_ascii("cube");
    let loaded = Solid::from_stl_reader(&mut Cursor::new(text.into_bytes())).unwrap();
    assert!(approx_eq(loaded.volume(), 8.0, 1e-9));
}

#[test]
fn open_surface_is_rejected_at_load_time() {
    let cube = cube_at(0.0, 1.0);
    let open = Solid::new_unchecked(cube.vertices().to_vec(), cube.triangles()[1..].to_vec());
    let bytes = open.to_stl_binary().unwrap();
    match Solid::from_stl_reader(&mut Cursor::new(bytes)) {
        Err(IoError::MalformedSolid(ValidationError::OpenEdges { .. })) => {},
        other => panic!("expected an open-edge error, got {other:?}"),
    }
}

#[test]
fn file_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::temp_dir().join(format!("csgshell_round_trip_{}.stl", std::process::id()));
    let cube = cube_at(0.0, 2.0);
    write_stl_file(&cube, &path, "cube", false)?;
    let loaded = read_stl_file(&path)?;
    let _ = std::fs::remove_file(&path);
    assert!(loaded.approx_eq(&cube, 1e-6));
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        read_stl_file("/definitely/not/here.stl"),
        Err(IoError::StdIo(_))
    ));
}
