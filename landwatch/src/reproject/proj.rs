//! Reprojection de géométries avec PROJ
//!
//! Ce module est disponible uniquement avec le feature `reproject`.

use geo::{Coord, Geometry, MapCoords};
use proj::Proj;

use crate::MonitorError;

/// Reprojection de géométries entre deux systèmes de coordonnées
pub struct ProjReprojector {
    proj: Proj,
    source_epsg: u32,
    target_epsg: u32,
}

impl ProjReprojector {
    /// Crée un nouveau reprojector entre deux EPSG
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self, MonitorError> {
        let source = format!("EPSG:{}", source_epsg);
        let target = format!("EPSG:{}", target_epsg);

        let proj = Proj::new_known_crs(&source, &target, None).map_err(|e| {
            MonitorError::Projection(format!(
                "Failed to create projection from {} to {}: {}",
                source, target, e
            ))
        })?;

        Ok(Self {
            proj,
            source_epsg,
            target_epsg,
        })
    }

    /// Retourne le SRID source
    pub fn source_epsg(&self) -> u32 {
        self.source_epsg
    }

    /// Retourne le SRID cible
    pub fn target_epsg(&self) -> u32 {
        self.target_epsg
    }

    /// Transforme une géométrie
    pub fn transform_geometry(&self, geom: &Geometry) -> Result<Geometry, MonitorError> {
        geom.try_map_coords(|c| {
            let (x, y) = self
                .proj
                .convert((c.x, c.y))
                .map_err(|e| MonitorError::Projection(e.to_string()))?;
            Ok(Coord { x, y })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    #[test]
    fn test_wgs84_to_sirgas_23s() {
        let reprojector = ProjReprojector::new(4326, 31983).unwrap();

        let point = Geometry::Point(Point::new(-45.0, -5.0));
        let result = reprojector.transform_geometry(&point).unwrap();

        if let Geometry::Point(p) = result {
            assert!((p.x() - 500000.0).abs() < 0.01, "x={}", p.x());
            assert!((p.y() - 9447335.7).abs() < 1.0, "y={}", p.y());
        } else {
            panic!("Expected Point geometry");
        }
    }

    #[test]
    fn test_invalid_epsg() {
        let result = ProjReprojector::new(99999, 4326);
        assert!(result.is_err());
    }
}
