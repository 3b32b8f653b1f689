//! Instantané immuable des jeux de données chargés
//!
//! Chargé une fois au démarrage puis passé explicitement aux points d'entrée
//! de l'interface (`compose`, `summarize`).

use std::path::PathBuf;

use tracing::info;

use crate::charts::{area_bar_chart, conflict_pie_chart, BarChart, PieChart};
use crate::compose::{compose, ComposeInput, MapScene};
use crate::loader::{load_incidents, load_polygons, LoadOptions};
use crate::reproject::DEFAULT_AREA_EPSG;
use crate::selection::Selection;
use crate::summary::{summarize, SummaryMetrics};
use crate::types::{IncidentRecord, LoadStats, LoadedPolygons, PolygonRecord, PolygonSchema};
use crate::MonitorError;

/// Chemins et schémas des trois sources
#[derive(Debug, Clone)]
pub struct SnapshotSources {
    /// Unités de conservation (GeoJSON)
    pub base: PathBuf,
    /// Emprises SIGEF (GeoJSON), optionnelles
    pub overlay: Option<PathBuf>,
    /// Tableau d'ocorrências (CSV)
    pub incidents: PathBuf,
    /// CRS projeté pour le calcul des surfaces
    pub area_epsg: u32,
    pub base_schema: PolygonSchema,
    pub overlay_schema: PolygonSchema,
}

impl SnapshotSources {
    pub fn new(base: impl Into<PathBuf>, incidents: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            overlay: None,
            incidents: incidents.into(),
            area_epsg: DEFAULT_AREA_EPSG,
            base_schema: PolygonSchema::default(),
            overlay_schema: PolygonSchema::default(),
        }
    }

    pub fn with_overlay(mut self, overlay: impl Into<PathBuf>) -> Self {
        self.overlay = Some(overlay.into());
        self
    }
}

/// Données chargées, en lecture seule
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub protected_areas: LoadedPolygons,
    pub overlays: Option<LoadedPolygons>,
    pub incidents: Vec<IncidentRecord>,
}

impl Snapshot {
    /// Charge les trois sources.
    ///
    /// # Errors
    ///
    /// Toute erreur de source est fatale, sans chargement partiel.
    pub fn load(sources: &SnapshotSources) -> Result<Self, MonitorError> {
        let protected_areas = load_polygons(
            &sources.base,
            &LoadOptions::protected_areas()
                .with_schema(sources.base_schema.clone())
                .with_area_epsg(sources.area_epsg),
        )?;

        let overlays = sources
            .overlay
            .as_deref()
            .map(|path| {
                load_polygons(
                    path,
                    &LoadOptions::overlay()
                        .with_schema(sources.overlay_schema.clone())
                        .with_area_epsg(sources.area_epsg),
                )
            })
            .transpose()?;

        let incidents = load_incidents(&sources.incidents)?;

        info!(
            protected_areas = protected_areas.records.len(),
            overlays = overlays.as_ref().map_or(0, |o| o.records.len()),
            incidents = incidents.len(),
            "Snapshot ready"
        );

        Ok(Self {
            protected_areas,
            overlays,
            incidents,
        })
    }

    pub fn polygons(&self) -> &[PolygonRecord] {
        &self.protected_areas.records
    }

    pub fn overlay_polygons(&self) -> Option<&[PolygonRecord]> {
        self.overlays.as_ref().map(|o| o.records.as_slice())
    }

    /// Compteurs de chargement (base, SIGEF)
    pub fn load_stats(&self) -> (&LoadStats, Option<&LoadStats>) {
        (
            &self.protected_areas.stats,
            self.overlays.as_ref().map(|o| &o.stats),
        )
    }

    /// Scène cartographique pour une sélection et un filtre SIGEF
    pub fn compose(&self, selection: Option<&Selection>, filter: Option<&str>) -> MapScene {
        compose(&ComposeInput {
            polygons: self.polygons(),
            overlays: self.overlay_polygons(),
            selection,
            incidents: &self.incidents,
            filter,
        })
    }

    /// Indicateurs des cartes de synthèse
    pub fn summarize(&self, selection: Option<&Selection>) -> SummaryMetrics {
        summarize(self.polygons(), selection)
    }

    pub fn bar_chart(&self) -> Option<BarChart> {
        area_bar_chart(self.polygons())
    }

    pub fn pie_chart(&self) -> PieChart {
        conflict_pie_chart(&self.incidents)
    }

    /// Catégories SIGEF distinctes (valeurs proposées par le filtre)
    pub fn overlay_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .overlay_polygons()
            .unwrap_or_default()
            .iter()
            .filter_map(|p| p.category_label.as_deref())
            .map(|c| c.trim().to_string())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }
}
