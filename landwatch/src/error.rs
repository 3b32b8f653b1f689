//! Types d'erreurs pour le crate landwatch

use thiserror::Error;

/// Erreurs pouvant survenir lors du chargement des jeux de données
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Source illisible, schéma incomplet ou aucune géométrie exploitable
    #[error("Data source error in {source_name}: {reason}")]
    DataSource { source_name: String, reason: String },

    /// Couple de projections non supporté
    #[error("Unsupported projection: EPSG:{source_epsg} -> EPSG:{target_epsg}")]
    UnsupportedProjection { source_epsg: u32, target_epsg: u32 },

    /// Échec de la transformation de coordonnées
    #[error("Projection error: {0}")]
    Projection(String),
}

impl MonitorError {
    /// Crée une erreur de source de données avec contexte
    pub fn data_source(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataSource {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Indique si l'erreur provient de la source de données
    pub fn is_data_source(&self) -> bool {
        matches!(self, Self::DataSource { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_source_class() {
        let err = MonitorError::data_source("cnuc.geojson", "no usable geometries");
        assert!(err.is_data_source());
        assert_eq!(
            err.to_string(),
            "Data source error in cnuc.geojson: no usable geometries"
        );

        let err = MonitorError::UnsupportedProjection {
            source_epsg: 3857,
            target_epsg: 31983,
        };
        assert!(!err.is_data_source());
    }
}
