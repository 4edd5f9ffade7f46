//! Point transformation between two coordinate reference systems.

use std::fmt;

use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use tiler_common::{CrsId, TilerError, TilerResult};

use crate::CrsRegistry;

/// A bidirectional 2D coordinate transformation.
///
/// `forward` maps source CRS coordinates to target CRS coordinates and
/// `inverse` maps back. Geographic coordinates are (lon, lat) in degrees.
/// Implementations must be pure so rows can be resampled in parallel.
pub trait CoordinateTransform: Send + Sync {
    fn source(&self) -> &CrsId;

    fn target(&self) -> &CrsId;

    fn forward(&self, x: f64, y: f64) -> TilerResult<(f64, f64)>;

    fn inverse(&self, x: f64, y: f64) -> TilerResult<(f64, f64)>;
}

struct ProjPair {
    source: Proj,
    target: Proj,
    source_is_geographic: bool,
    target_is_geographic: bool,
}

/// Coordinate transformer using proj4rs (pure Rust).
pub struct Transformer {
    source_id: CrsId,
    target_id: CrsId,
    /// `None` when source and target are the same system.
    projections: Option<ProjPair>,
}

impl Transformer {
    /// Build a transformer from two PROJ.4 definition strings.
    pub fn from_definitions(
        source_id: CrsId,
        source_def: &str,
        source_is_geographic: bool,
        target_id: CrsId,
        target_def: &str,
        target_is_geographic: bool,
    ) -> TilerResult<Self> {
        if source_id == target_id {
            return Ok(Self {
                source_id,
                target_id,
                projections: None,
            });
        }

        let source = Proj::from_proj_string(source_def).map_err(|e| {
            TilerError::Projection(format!("Invalid source projection {}: {:?}", source_id, e))
        })?;
        let target = Proj::from_proj_string(target_def).map_err(|e| {
            TilerError::Projection(format!("Invalid target projection {}: {:?}", target_id, e))
        })?;

        tracing::debug!(source = %source_id, target = %target_id, "Built coordinate transformer");

        Ok(Self {
            source_id,
            target_id,
            projections: Some(ProjPair {
                source,
                target,
                source_is_geographic,
                target_is_geographic,
            }),
        })
    }

    pub fn is_identity(&self) -> bool {
        self.projections.is_none()
    }

    fn run(
        &self,
        from: &Proj,
        from_geographic: bool,
        to: &Proj,
        to_geographic: bool,
        x: f64,
        y: f64,
    ) -> TilerResult<(f64, f64)> {
        // proj4rs uses radians for geographic coordinates
        let mut point = if from_geographic {
            (x.to_radians(), y.to_radians(), 0.0)
        } else {
            (x, y, 0.0)
        };

        transform(from, to, &mut point).map_err(|e| {
            TilerError::Projection(format!(
                "Transform of ({}, {}) failed: {:?}",
                x, y, e
            ))
        })?;

        let (out_x, out_y) = if to_geographic {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            (point.0, point.1)
        };

        if !out_x.is_finite() || !out_y.is_finite() {
            return Err(TilerError::Projection(format!(
                "Transform of ({}, {}) produced non-finite coordinates",
                x, y
            )));
        }
        Ok((out_x, out_y))
    }
}

impl CoordinateTransform for Transformer {
    fn source(&self) -> &CrsId {
        &self.source_id
    }

    fn target(&self) -> &CrsId {
        &self.target_id
    }

    fn forward(&self, x: f64, y: f64) -> TilerResult<(f64, f64)> {
        match &self.projections {
            None => Ok((x, y)),
            Some(p) => self.run(
                &p.source,
                p.source_is_geographic,
                &p.target,
                p.target_is_geographic,
                x,
                y,
            ),
        }
    }

    fn inverse(&self, x: f64, y: f64) -> TilerResult<(f64, f64)> {
        match &self.projections {
            None => Ok((x, y)),
            Some(p) => self.run(
                &p.target,
                p.target_is_geographic,
                &p.source,
                p.source_is_geographic,
                x,
                y,
            ),
        }
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer")
            .field("source", &self.source_id)
            .field("target", &self.target_id)
            .field("identity", &self.is_identity())
            .finish()
    }
}

/// Project a single point from one CRS to another.
///
/// Builds a transformer per call; use [`CrsRegistry::transformer`] when
/// projecting many points.
pub fn project_point(
    registry: &CrsRegistry,
    source: &CrsId,
    target: &CrsId,
    x: f64,
    y: f64,
) -> TilerResult<(f64, f64)> {
    registry.transformer(source, target)?.forward(x, y)
}
