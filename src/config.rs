//! Slicing parameters.

use crate::error::ConfigError;

/// Tuning constants for loop inference on unproven meshes and for the
/// small-loop filter of the offsetter.
///
/// The defaults are empirical. They change the output only on ambiguous
/// or damaged meshes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceTuning {
    /// A leftover corner is spliced into a loop only if doing so adds less
    /// than this many import radii of perimeter.
    pub corner_splice_ratio: f64,

    /// An inferred loop is rejected if more than this fraction of its points
    /// already belong to accepted loops.
    pub overlap_ratio_cutoff: f64,

    /// Offset loops whose span is not larger than this many radii are
    /// dropped as degenerate.
    pub large_loop_ratio: f64,
}

impl Default for InferenceTuning {
    fn default() -> Self {
        Self {
            corner_splice_ratio: 0.85,
            overlap_ratio_cutoff: 0.1,
            large_loop_ratio: 2.5,
        }
    }
}

impl InferenceTuning {
    /// Checks every constant is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-positive ratio or an overlap cutoff
    /// outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("corner_splice_ratio", self.corner_splice_ratio)?;
        positive("large_loop_ratio", self.large_loop_ratio)?;
        if !(self.overlap_ratio_cutoff > 0.0 && self.overlap_ratio_cutoff <= 1.0) {
            return Err(ConfigError::OutOfRange {
                parameter: "overlap_ratio_cutoff",
                value: self.overlap_ratio_cutoff,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }
}

/// Parameters for one slicing session.
///
/// Built once and handed to [`MeshSlicer`](crate::operations::slice::MeshSlicer)
/// and [`LayerStack`](crate::operations::layers::LayerStack); nothing reads
/// configuration from anywhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct CarveParams {
    /// Layer thickness in mm.
    pub layer_thickness: f64,

    /// Merge and offset tolerance in mm, typically a third to a half of the
    /// extrusion width.
    pub import_radius: f64,

    /// Try the exact edge walk before the loop-inference fallback.
    pub is_correct_mesh: bool,

    /// Thickness of bridging layers. `None` disables bridge detection.
    pub bridge_layer_thickness: Option<f64>,

    /// Loop inference constants.
    pub tuning: InferenceTuning,
}

impl Default for CarveParams {
    fn default() -> Self {
        Self {
            layer_thickness: 0.4,
            import_radius: 0.15,
            is_correct_mesh: true,
            bridge_layer_thickness: None,
            tuning: InferenceTuning::default(),
        }
    }
}

impl CarveParams {
    /// Set layer thickness.
    #[must_use]
    pub const fn with_layer_thickness(mut self, thickness: f64) -> Self {
        self.layer_thickness = thickness;
        self
    }

    /// Set import radius.
    #[must_use]
    pub const fn with_import_radius(mut self, radius: f64) -> Self {
        self.import_radius = radius;
        self
    }

    /// Set whether the mesh is trusted to be manifold.
    #[must_use]
    pub const fn with_correct_mesh(mut self, is_correct_mesh: bool) -> Self {
        self.is_correct_mesh = is_correct_mesh;
        self
    }

    /// Enable bridge detection with the given bridge layer thickness.
    #[must_use]
    pub const fn with_bridge_layer_thickness(mut self, thickness: f64) -> Self {
        self.bridge_layer_thickness = Some(thickness);
        self
    }

    /// Set the loop inference constants.
    #[must_use]
    pub const fn with_tuning(mut self, tuning: InferenceTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Checks every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPositive`] for a thickness or radius that is
    /// not a positive finite number, or any error from
    /// [`InferenceTuning::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("layer_thickness", self.layer_thickness)?;
        positive("import_radius", self.import_radius)?;
        if let Some(thickness) = self.bridge_layer_thickness {
            positive("bridge_layer_thickness", thickness)?;
        }
        self.tuning.validate()
    }
}

fn positive(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { parameter, value })
    }
}
