//! Réparation des géométries invalides
//!
//! Une géométrie invalide est remplacée par son buffer de distance nulle, qui
//! résout les auto-intersections mineures sans modifier la surface. Si le
//! buffer ne produit rien d'exploitable, l'union unaire sert de fallback.

pub mod fallback;

use geo::{Buffer, CoordsIter, Geometry, MultiPolygon, Validation};
use tracing::debug;

/// Résultat de la réparation d'une géométrie
#[derive(Debug, Clone, PartialEq)]
pub enum RepairOutcome {
    /// Géométrie déjà valide, inchangée
    Valid(Geometry),
    /// Géométrie réparée par buffer(0) ou union
    Repaired(Geometry),
    /// Géométrie inexploitable, à écarter
    Unusable(&'static str),
}

/// Vérifie la validité d'une géométrie surfacique et la répare si besoin
pub fn repair_geometry(geometry: Geometry, entity_id: &str) -> RepairOutcome {
    let multi = match &geometry {
        Geometry::Polygon(p) => MultiPolygon::new(vec![p.clone()]),
        Geometry::MultiPolygon(mp) => mp.clone(),
        _ => return RepairOutcome::Unusable("non-areal geometry"),
    };

    if multi.coords_iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return RepairOutcome::Unusable("non-finite coordinates");
    }

    if multi.0.is_empty() {
        return RepairOutcome::Unusable("empty geometry");
    }

    if geometry.is_valid() {
        return RepairOutcome::Valid(geometry);
    }

    debug!(entity_id = %entity_id, "Invalid geometry, applying zero-distance buffer");

    let buffered = multi.buffer(0.0);
    if let Some(repaired) = usable(buffered) {
        return RepairOutcome::Repaired(repaired);
    }

    debug!(entity_id = %entity_id, "Zero buffer failed, using unary union");

    match usable(fallback::union_fallback(&multi)) {
        Some(repaired) => RepairOutcome::Repaired(repaired),
        None => RepairOutcome::Unusable("still invalid after repair"),
    }
}

/// Réduit un MultiPolygon réparé à la géométrie la plus simple, si valide
fn usable(mut multi: MultiPolygon) -> Option<Geometry> {
    multi.0.retain(|p| p.exterior().0.len() >= 4);

    let geometry = match multi.0.len() {
        0 => return None,
        1 => Geometry::Polygon(multi.0.remove(0)),
        _ => Geometry::MultiPolygon(multi),
    };

    geometry.is_valid().then_some(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, LineString, Point, Polygon};

    fn square() -> Polygon {
        Polygon::new(
            LineString::from(vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)]),
            vec![],
        )
    }

    #[test]
    fn test_valid_polygon_untouched() {
        let geom = Geometry::Polygon(square());
        let outcome = repair_geometry(geom.clone(), "0");
        assert_eq!(outcome, RepairOutcome::Valid(geom));
    }

    #[test]
    fn test_bow_tie_repaired() {
        // Nœud papillon: les deux triangles se croisent en (1, 1)
        let bow_tie = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]),
            vec![],
        );
        let geom = Geometry::Polygon(bow_tie);
        assert!(!geom.is_valid());

        let outcome = repair_geometry(geom, "bow-tie");
        let RepairOutcome::Repaired(repaired) = outcome else {
            panic!("Expected repaired geometry, got {:?}", outcome);
        };
        assert!(repaired.is_valid());
        assert!(repaired.unsigned_area() > 0.0);
    }

    #[test]
    fn test_non_areal_dropped() {
        let outcome = repair_geometry(Geometry::Point(Point::new(1.0, 1.0)), "pt");
        assert_eq!(outcome, RepairOutcome::Unusable("non-areal geometry"));
    }

    #[test]
    fn test_non_finite_dropped() {
        let poly = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            vec![],
        );
        let outcome = repair_geometry(Geometry::Polygon(poly), "nan");
        assert_eq!(outcome, RepairOutcome::Unusable("non-finite coordinates"));
    }
}
