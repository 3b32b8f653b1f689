//! Indicateurs agrégés affichés dans les cartes de synthèse

use serde::Serialize;

use crate::selection::Selection;
use crate::types::{percentage, PolygonRecord};

/// Indicateurs agrégés sur les unités (sélectionnées ou toutes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryMetrics {
    /// 100 × somme des alertes / somme des surfaces
    pub alert_percent_agg: f64,
    /// 100 × somme des emprises SIGEF / somme des surfaces
    pub overlay_percent_agg: f64,
    /// Nombre d'unités retenues
    pub total_units: usize,
    /// Somme des alertes
    pub alert_count: f64,
    /// Somme des emprises SIGEF
    pub overlay_count: f64,
}

impl SummaryMetrics {
    /// Titres et valeurs formatées des cinq cartes
    pub fn cards(&self) -> [(&'static str, String); 5] {
        [
            (
                "Percentual de Alerta",
                format!("{:.2}%", self.alert_percent_agg),
            ),
            (
                "Percentual SIGEF",
                format!("{:.2}%", self.overlay_percent_agg),
            ),
            ("Total de Unidades", self.total_units.to_string()),
            ("Contagem Alerta", format_count(self.alert_count)),
            ("Contagem SIGEF", format_count(self.overlay_count)),
        ]
    }
}

/// Affiche un comptage entier sans décimales
fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Calcule les indicateurs; une sélection absente ou vide retient toutes les unités.
///
/// Des identifiants inconnus donnent un ensemble vide et des indicateurs nuls.
pub fn summarize(polygons: &[PolygonRecord], selection: Option<&Selection>) -> SummaryMetrics {
    let selection = Selection::active(selection);
    let retained = polygons
        .iter()
        .filter(|p| selection.map_or(true, |s| s.contains(&p.id)));

    let mut total_units = 0;
    let mut alert_count = 0.0;
    let mut overlay_count = 0.0;
    let mut total_area = 0.0;

    for polygon in retained {
        total_units += 1;
        alert_count += polygon.alert_count.unwrap_or(0.0);
        overlay_count += polygon.overlay_count.unwrap_or(0.0);
        total_area += polygon.area_km2;
    }

    SummaryMetrics {
        alert_percent_agg: percentage(alert_count, total_area),
        overlay_percent_agg: percentage(overlay_count, total_area),
        total_units,
        alert_count,
        overlay_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DatasetKind;
    use geo::{Geometry, Point};

    fn unit(id: &str, area_km2: f64, alerts: Option<f64>, sigef: Option<f64>) -> PolygonRecord {
        PolygonRecord {
            id: id.to_string(),
            geometry: Geometry::Point(Point::new(0.0, 0.0)),
            name: None,
            municipality: None,
            area_km2,
            alert_area_km2: None,
            overlay_area_km2: None,
            alert_count: alerts,
            overlay_count: sigef,
            alert_percent: 0.0,
            overlay_percent: 0.0,
            category_label: None,
            dataset: DatasetKind::ProtectedAreas,
        }
    }

    fn units() -> Vec<PolygonRecord> {
        vec![
            unit("0", 100.0, Some(10.0), Some(5.0)),
            unit("1", 300.0, Some(30.0), None),
        ]
    }

    #[test]
    fn test_full_dataset() {
        let metrics = summarize(&units(), None);

        assert_eq!(metrics.total_units, 2);
        assert_eq!(metrics.alert_count, 40.0);
        assert_eq!(metrics.overlay_count, 5.0);
        assert!((metrics.alert_percent_agg - 10.0).abs() < 1e-9);
        assert!((metrics.overlay_percent_agg - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_empty_selection_means_all() {
        let empty = Selection::default();
        assert_eq!(summarize(&units(), Some(&empty)), summarize(&units(), None));
    }

    #[test]
    fn test_selection() {
        let selection = Selection::from_ids(["1"]);
        let metrics = summarize(&units(), Some(&selection));

        assert_eq!(metrics.total_units, 1);
        assert_eq!(metrics.alert_count, 30.0);
        assert!((metrics.alert_percent_agg - 10.0).abs() < 1e-9);
        assert_eq!(metrics.overlay_percent_agg, 0.0);
    }

    #[test]
    fn test_unknown_selection_is_zero() {
        let selection = Selection::from_ids(["99"]);
        let metrics = summarize(&units(), Some(&selection));

        assert_eq!(metrics, SummaryMetrics::default());
        assert_eq!(metrics.alert_percent_agg, 0.0);
        assert_eq!(metrics.overlay_percent_agg, 0.0);
    }

    #[test]
    fn test_cards() {
        let cards = summarize(&units(), None).cards();

        assert_eq!(cards[0], ("Percentual de Alerta", "10.00%".to_string()));
        assert_eq!(cards[1], ("Percentual SIGEF", "1.25%".to_string()));
        assert_eq!(cards[2], ("Total de Unidades", "2".to_string()));
        assert_eq!(cards[3], ("Contagem Alerta", "40".to_string()));
        assert_eq!(cards[4], ("Contagem SIGEF", "5".to_string()));
    }
}
