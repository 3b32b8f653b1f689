//! Fallback union unaire pour les géométries que buffer(0) ne répare pas

use geo::{unary_union, MultiPolygon};

/// Recompose les polygones par union unaire (résout les recouvrements internes)
pub fn union_fallback(multi: &MultiPolygon) -> MultiPolygon {
    unary_union(multi.0.iter())
}
