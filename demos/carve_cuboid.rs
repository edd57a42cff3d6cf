//! Carves a small table (two pillars under a slab) and logs the layers.
//!
//! ```text
//! cargo run --example carve_cuboid
//! RUST_LOG=carve=debug cargo run --example carve_cuboid   # per-layer detail
//! ```

use carve::math::Point3;
use carve::{CarveParams, LayerStack, TriangleMesh};
use tracing::info;

fn table() -> Result<TriangleMesh, carve::error::MeshError> {
    let parts = [
        TriangleMesh::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(5.0, 5.0, 5.0)),
        TriangleMesh::cuboid(Point3::new(20.0, 0.0, 0.0), Point3::new(25.0, 5.0, 5.0)),
        TriangleMesh::cuboid(Point3::new(0.0, 0.0, 5.0), Point3::new(25.0, 5.0, 6.0)),
    ];
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    for part in &parts {
        let offset = vertices.len();
        vertices.extend_from_slice(part.vertices());
        triangles.extend(part.faces().iter().map(|face| {
            let [a, b, c] = face.vertex_indexes;
            [a + offset, b + offset, c + offset]
        }));
    }
    TriangleMesh::from_triangles(vertices, &triangles)
}

fn main() -> carve::Result<()> {
    // Default: WARN for everything, INFO for carve.
    // Override with RUST_LOG env var (e.g. RUST_LOG=carve=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("carve=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mesh = table()?;
    let params = CarveParams::default()
        .with_layer_thickness(1.0)
        .with_bridge_layer_thickness(0.5);
    let carved = LayerStack::new(&mesh, &params)?.execute();

    for layer in &carved.layers {
        let area: f64 = layer.loops.iter().map(carve::Loop::area).sum();
        info!(
            z = layer.z,
            loops = layer.loops.len(),
            area,
            bridge = ?layer.rotation.map(|rotation| rotation.angle().to_degrees()),
            "layer"
        );
    }
    info!(
        min = ?carved.corner_minimum,
        max = ?carved.corner_maximum,
        "bounds"
    );
    Ok(())
}
