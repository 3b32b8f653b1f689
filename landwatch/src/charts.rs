//! Graphiques de synthèse construits directement sur les colonnes chargées

use serde::Serialize;

use crate::palette::{cycled, PASTEL};
use crate::types::{IncidentRecord, PolygonRecord, INCIDENT_COLUMNS};

/// Une série d'un histogramme groupé
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub color: String,
    /// Valeur absente de la source → `None`
    pub values: Vec<Option<f64>>,
}

/// Histogramme groupé par unité
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

/// Camembert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub colors: Vec<String>,
}

/// Surfaces par unité de conservation.
///
/// `None` si aucune unité n'a de nom (pas d'axe X exploitable).
pub fn area_bar_chart(polygons: &[PolygonRecord]) -> Option<BarChart> {
    if polygons.iter().all(|p| p.name.is_none()) {
        return None;
    }

    let categories = polygons
        .iter()
        .map(|p| p.name.clone().unwrap_or_else(|| p.id.clone()))
        .collect();

    let series = vec![
        BarSeries {
            name: "alerta_km2".to_string(),
            color: PASTEL[0].to_string(),
            values: polygons.iter().map(|p| p.alert_area_km2).collect(),
        },
        BarSeries {
            name: "sigef_km2".to_string(),
            color: PASTEL[1].to_string(),
            values: polygons.iter().map(|p| p.overlay_area_km2).collect(),
        },
        BarSeries {
            name: "area_km2".to_string(),
            color: PASTEL[2].to_string(),
            values: polygons.iter().map(|p| Some(p.area_km2)).collect(),
        },
    ];

    Some(BarChart {
        title: "Contagem das Áreas de Proteção".to_string(),
        x_label: "Nome UC".to_string(),
        y_label: "Contagens".to_string(),
        legend_title: "Métricas".to_string(),
        categories,
        series,
    })
}

/// Zones de conflit par municipalité, dans l'ordre de première apparition
pub fn conflict_pie_chart(incidents: &[IncidentRecord]) -> PieChart {
    let mut slices: Vec<(String, u64)> = Vec::new();

    for incident in incidents {
        let label = incident.category.as_deref().unwrap_or("Ocorrências");
        let value = u64::from(incident.incident_counts.conflict_areas);
        match slices.iter_mut().find(|(l, _)| l == label) {
            Some((_, total)) => *total += value,
            None => slices.push((label.to_string(), value)),
        }
    }

    let colors = (0..slices.len()).map(|i| cycled(i).to_string()).collect();
    let (labels, values) = slices.into_iter().unzip();

    PieChart {
        title: INCIDENT_COLUMNS[0].to_string(),
        labels,
        values,
        colors,
    }
}
