//! Types de données pour le crate landwatch

use geo::{Geometry, Point};
use serde::Serialize;

/// Colonnes de comptage d'ocorrências, dans l'ordre du tableau source
pub const INCIDENT_COLUMNS: [&str; 6] = [
    "Áreas de conflitos",
    "Assassinatos",
    "Conflitos por Terra",
    "Ocupações Retomadas",
    "Tentativas de Assassinatos",
    "Trabalho Escravo",
];

/// Nom de la colonne catégorie (municipalité) des ocorrências
pub const CATEGORY_COLUMN: &str = "Município";

/// Libellé des catégories absentes (municipalité vide, emprise SIGEF sans libellé)
pub const UNKNOWN_CATEGORY: &str = "Desconhecido";

/// Pourcentage protégé contre la division par zéro.
///
/// Retourne 0 si `whole` n'est pas strictement positif ou si le résultat
/// n'est pas fini.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if !(whole > 0.0) {
        return 0.0;
    }
    let value = part / whole * 100.0;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Jeu de données d'origine d'un polygone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Unités de conservation (couche de base)
    ProtectedAreas,
    /// Couche de régularisation foncière (SIGEF)
    Overlay,
}

impl DatasetKind {
    /// Libellé court, tel qu'affiché dans la légende
    pub fn label(self) -> &'static str {
        match self {
            Self::ProtectedAreas => "cnuc",
            Self::Overlay => "sigef",
        }
    }
}

/// Un polygone normalisé (unité de conservation ou emprise SIGEF)
#[derive(Debug, Clone)]
pub struct PolygonRecord {
    /// Index positionnel dans la source, sous forme de chaîne
    pub id: String,

    /// Polygon ou MultiPolygon valide, en WGS84 (lon/lat)
    pub geometry: Geometry,

    /// Nom de l'unité
    pub name: Option<String>,

    /// Municipalité
    pub municipality: Option<String>,

    /// Surface en km², toujours > 0
    pub area_km2: f64,

    /// Surface sous alerte en km² (absente de la source → None)
    pub alert_area_km2: Option<f64>,

    /// Surface recouverte par la couche SIGEF en km²
    pub overlay_area_km2: Option<f64>,

    /// Nombre d'alertes
    pub alert_count: Option<f64>,

    /// Nombre d'emprises SIGEF
    pub overlay_count: Option<f64>,

    /// 100 × alert_area_km2 / area_km2, 0 si indéfini
    pub alert_percent: f64,

    /// 100 × overlay_area_km2 / area_km2, 0 si indéfini
    pub overlay_percent: f64,

    /// Classification libre utilisée par le filtre
    pub category_label: Option<String>,

    /// Jeu de données d'origine
    pub dataset: DatasetKind,
}

impl PolygonRecord {
    /// Catégorie normalisée pour la comparaison (trim + minuscules)
    pub fn normalized_category(&self) -> Option<String> {
        self.category_label
            .as_deref()
            .map(|label| label.trim().to_lowercase())
    }
}

/// Schéma des propriétés attendues dans une source de polygones.
///
/// Chaque champ est optionnel dans la source ; sa présence est résolue une
/// seule fois au chargement (voir [`FieldPresence`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PolygonSchema {
    pub name: String,
    pub municipality: String,
    pub area: String,
    pub alert_area: String,
    pub overlay_area: String,
    pub alert_count: String,
    pub overlay_count: String,
    pub category: String,
}

impl Default for PolygonSchema {
    fn default() -> Self {
        Self {
            name: "nome_uc".to_string(),
            municipality: "municipio".to_string(),
            area: "area_km2".to_string(),
            alert_area: "alerta_km2".to_string(),
            overlay_area: "sigef_km2".to_string(),
            alert_count: "c_alertas".to_string(),
            overlay_count: "c_sigef".to_string(),
            category: "municipio".to_string(),
        }
    }
}

/// Présence des champs optionnels dans une source, résolue au chargement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldPresence {
    pub area: bool,
    pub alert_area: bool,
    pub overlay_area: bool,
}

/// Compteurs du chargement d'une source de polygones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Features lues dans la source
    pub read: usize,
    /// Géométries invalides réparées par buffer(0)
    pub repaired: usize,
    /// Features écartées (géométrie nulle, non surfacique, irréparable)
    pub dropped: usize,
}

impl LoadStats {
    /// Nombre de features conservées
    pub fn kept(&self) -> usize {
        self.read.saturating_sub(self.dropped)
    }
}

/// Résultat du chargement d'une source de polygones
#[derive(Debug, Clone)]
pub struct LoadedPolygons {
    pub records: Vec<PolygonRecord>,
    pub stats: LoadStats,
}

/// Comptages des six types d'ocorrências
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IncidentCounts {
    pub conflict_areas: u32,
    pub murders: u32,
    pub land_conflicts: u32,
    pub reclaimed_occupations: u32,
    pub attempted_murders: u32,
    pub slave_labour: u32,
}

impl IncidentCounts {
    /// Construit depuis les valeurs dans l'ordre de [`INCIDENT_COLUMNS`]
    pub fn from_array(values: [u32; 6]) -> Self {
        let [conflict_areas, murders, land_conflicts, reclaimed_occupations, attempted_murders, slave_labour] =
            values;
        Self {
            conflict_areas,
            murders,
            land_conflicts,
            reclaimed_occupations,
            attempted_murders,
            slave_labour,
        }
    }

    /// Valeurs dans l'ordre de [`INCIDENT_COLUMNS`]
    pub fn as_array(&self) -> [u32; 6] {
        [
            self.conflict_areas,
            self.murders,
            self.land_conflicts,
            self.reclaimed_occupations,
            self.attempted_murders,
            self.slave_labour,
        ]
    }

    /// Couples (nom de colonne, valeur)
    pub fn labelled(&self) -> impl Iterator<Item = (&'static str, u32)> {
        INCIDENT_COLUMNS.into_iter().zip(self.as_array())
    }

    pub fn total(&self) -> u64 {
        self.as_array().iter().map(|&v| u64::from(v)).sum()
    }
}

/// Une ligne du tableau d'ocorrências (point géolocalisé)
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentRecord {
    /// Position (x = longitude, y = latitude)
    pub location: Point,

    /// Municipalité, absente si le tableau n'a pas de colonne catégorie
    pub category: Option<String>,

    pub incident_counts: IncidentCounts,
}

impl IncidentRecord {
    /// Total des ocorrências, toujours dérivé des comptages
    pub fn total_incidents(&self) -> u64 {
        self.incident_counts.total()
    }

    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }
}
