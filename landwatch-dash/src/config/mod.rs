//! Configuration du tableau de bord
//!
//! Priorité croissante : valeurs par défaut, fichier JSON, variables
//! d'environnement (`LANDWATCH_*`, éventuellement issues de `.env`), options
//! de la ligne de commande.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use landwatch::reproject::DEFAULT_AREA_EPSG;
use landwatch::{PolygonSchema, SnapshotSources};

pub const ENV_BASE: &str = "LANDWATCH_BASE";
pub const ENV_OVERLAY: &str = "LANDWATCH_OVERLAY";
pub const ENV_INCIDENTS: &str = "LANDWATCH_INCIDENTS";
pub const ENV_AREA_EPSG: &str = "LANDWATCH_AREA_EPSG";

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Unités de conservation (GeoJSON)
    pub base: PathBuf,

    /// Emprises SIGEF (GeoJSON), `null` pour s'en passer
    pub overlay: Option<PathBuf>,

    /// Tableau d'ocorrências (CSV)
    pub incidents: PathBuf,

    /// CRS projeté pour le calcul des surfaces
    pub area_epsg: u32,

    /// Noms des propriétés de la couche de base
    pub base_schema: PolygonSchema,

    /// Noms des propriétés de la couche SIGEF
    pub overlay_schema: PolygonSchema,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base: PathBuf::from("cnuc.geojson"),
            overlay: Some(PathBuf::from("sigef.geojson")),
            incidents: PathBuf::from("CPT-PA-count.csv"),
            area_epsg: DEFAULT_AREA_EPSG,
            base_schema: PolygonSchema::default(),
            overlay_schema: PolygonSchema::default(),
        }
    }
}

/// Surcharges issues de la ligne de commande
#[derive(Debug, Clone, Default)]
pub struct SourceOverrides {
    pub base: Option<PathBuf>,
    pub overlay: Option<PathBuf>,
    pub no_overlay: bool,
    pub incidents: Option<PathBuf>,
    pub area_epsg: Option<u32>,
}

impl DashboardConfig {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Fichier optionnel puis variables d'environnement du processus
    pub fn resolve(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applique les variables `LANDWATCH_*` lues par `lookup`.
    ///
    /// `LANDWATCH_OVERLAY` vide désactive la couche SIGEF.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_BASE) {
            self.base = PathBuf::from(base);
        }
        if let Some(overlay) = lookup(ENV_OVERLAY) {
            self.overlay = (!overlay.trim().is_empty()).then(|| PathBuf::from(overlay));
        }
        if let Some(incidents) = lookup(ENV_INCIDENTS) {
            self.incidents = PathBuf::from(incidents);
        }
        if let Some(epsg) = lookup(ENV_AREA_EPSG) {
            self.area_epsg = epsg
                .trim()
                .parse()
                .context(format!("Invalid {}: {:?}", ENV_AREA_EPSG, epsg))?;
        }
        Ok(())
    }

    /// Applique les options de la ligne de commande
    pub fn apply_overrides(&mut self, overrides: SourceOverrides) {
        if let Some(base) = overrides.base {
            self.base = base;
        }
        if let Some(overlay) = overrides.overlay {
            self.overlay = Some(overlay);
        }
        if overrides.no_overlay {
            self.overlay = None;
        }
        if let Some(incidents) = overrides.incidents {
            self.incidents = incidents;
        }
        if let Some(epsg) = overrides.area_epsg {
            self.area_epsg = epsg;
        }
    }

    /// Sources à charger dans le snapshot
    pub fn to_sources(&self) -> SnapshotSources {
        let mut sources = SnapshotSources::new(&self.base, &self.incidents);
        sources.overlay = self.overlay.clone();
        sources.area_epsg = self.area_epsg;
        sources.base_schema = self.base_schema.clone();
        sources.overlay_schema = self.overlay_schema.clone();
        sources
    }
}
