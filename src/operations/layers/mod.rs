//! Slicing a whole mesh into a stack of layers.

mod bridge;
mod zone;

pub use bridge::{bridge_direction, bridge_loops, overhang_direction};
pub use zone::ZoneTable;

use tracing::{debug, info};

use crate::config::CarveParams;
use crate::error::{MeshError, Result};
use crate::geometry::RotatedLoopLayer;
use crate::math::{Complex, Point3};
use crate::mesh::TriangleMesh;
use crate::operations::slice::MeshSlicer;

/// The finished layer stack of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct CarvedLayers {
    /// Layers from bottom to top.
    pub layers: Vec<RotatedLoopLayer>,
    /// Component-wise minimum over the mesh and every layer loop.
    pub corner_minimum: Point3,
    /// Component-wise maximum over the mesh and every layer loop.
    pub corner_maximum: Point3,
}

/// Builds the layer stack of a mesh.
///
/// Layers start half a thickness above the bottom of the mesh and stop
/// once less than a quarter thickness remains below the top. Each height is
/// moved off any vertex before slicing, but the layer keeps its nominal Z.
///
/// When a bridge thickness is configured, every layer is compared with the
/// extrusions of the layer below; a layer overhanging them gets a bridging
/// rotation and the next layer follows after the bridge thickness instead.
///
/// # Example
///
/// ```
/// use carve::config::CarveParams;
/// use carve::math::Point3;
/// use carve::mesh::TriangleMesh;
/// use carve::operations::layers::LayerStack;
///
/// let mesh = TriangleMesh::cuboid(Point3::origin(), Point3::new(20.0, 20.0, 10.0));
/// let params = CarveParams::default().with_layer_thickness(1.0);
/// let carved = LayerStack::new(&mesh, &params)?.execute();
/// assert_eq!(carved.layers.len(), 10);
/// # Ok::<(), carve::CarveError>(())
/// ```
#[derive(Debug)]
pub struct LayerStack<'a> {
    slicer: MeshSlicer<'a>,
    zones: ZoneTable,
    corner_minimum: Point3,
    corner_maximum: Point3,
}

impl<'a> LayerStack<'a> {
    /// Prepares the stack for `mesh`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`](crate::error::ConfigError) if the parameters
    /// are invalid, or [`MeshError::Empty`] if the mesh has no vertices.
    pub fn new(mesh: &'a TriangleMesh, params: &CarveParams) -> Result<Self> {
        let slicer = MeshSlicer::new(mesh, params)?;
        let corner_minimum = mesh.corner_minimum().ok_or(MeshError::Empty)?;
        let corner_maximum = mesh.corner_maximum().ok_or(MeshError::Empty)?;
        let zones = ZoneTable::new(mesh.transformed_vertices(), params.layer_thickness);
        Ok(Self {
            slicer,
            zones,
            corner_minimum,
            corner_maximum,
        })
    }

    /// The parameters the stack is built with.
    #[must_use]
    pub fn params(&self) -> &CarveParams {
        self.slicer.params()
    }

    /// Slices every layer.
    #[must_use]
    pub fn execute(&self) -> CarvedLayers {
        let params = self.slicer.params();
        let thickness = params.layer_thickness;
        let bridge_thickness = params.bridge_layer_thickness;
        let z_min = self.corner_minimum.z;
        let z_max = self.corner_maximum.z;
        info!(
            layer_thickness = thickness,
            bridge_layer_thickness = ?bridge_thickness,
            z_min,
            z_max,
            "carving layers"
        );

        let mut corner_minimum = self.corner_minimum;
        let mut corner_maximum = self.corner_maximum;
        let mut layers = Vec::new();
        let mut below: Vec<Vec<Complex>> = Vec::new();
        let mut z = z_min + 0.5 * thickness;
        let z_top = z_max - 0.25 * thickness;
        while z < z_top {
            let slice = self.slicer.slice(self.zones.empty_z(z));
            let mut layer = RotatedLoopLayer::new(z, slice.loops);
            let mut step = thickness;
            if let Some(bridge_thickness) = bridge_thickness {
                let extrudates: Vec<Vec<Complex>> = layer
                    .loops
                    .iter()
                    .flat_map(|points| bridge_loops(thickness, points.points()))
                    .collect();
                layer.rotation = bridge_direction(&below, &extrudates, thickness);
                below = extrudates;
                if layer.is_bridge() {
                    step = bridge_thickness;
                }
            }
            debug!(
                index = layers.len(),
                z,
                loops = layer.loops.len(),
                path = ?slice.path,
                bridging = layer.is_bridge(),
                "layer carved"
            );
            if let Some((minimum, maximum)) = layer.corners() {
                corner_minimum.x = corner_minimum.x.min(minimum.re);
                corner_minimum.y = corner_minimum.y.min(minimum.im);
                corner_maximum.x = corner_maximum.x.max(maximum.re);
                corner_maximum.y = corner_maximum.y.max(maximum.im);
            }
            layers.push(layer);
            z += step;
        }

        info!(
            layers = layers.len(),
            bridges = layers.iter().filter(|layer| layer.is_bridge()).count(),
            "carving complete"
        );
        CarvedLayers {
            layers,
            corner_minimum,
            corner_maximum,
        }
    }
}
