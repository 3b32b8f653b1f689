//! Chargement des polygones (unités de conservation, emprises SIGEF)
//!
//! Ordre de traitement fixe :
//! 1. lecture GeoJSON
//! 2. réparation des géométries invalides
//! 3. reprojection vers le CRS de calcul et surface en km²
//! 4. normalisation de `area_km2`
//! 5. pourcentages alerte / SIGEF
//! 6. identifiant positionnel
//! 7. reprojection vers WGS84 pour le rendu

use std::path::Path;

use geo::{Area, Geometry};
use geojson::{Feature, GeoJson, JsonObject, JsonValue};
use tracing::{debug, info, warn};

use crate::repair::{repair_geometry, RepairOutcome};
use crate::reproject::{Crs, SmartReprojector, DEFAULT_AREA_EPSG, WGS84_EPSG};
use crate::types::{
    percentage, DatasetKind, FieldPresence, LoadStats, LoadedPolygons, PolygonRecord,
    PolygonSchema, UNKNOWN_CATEGORY,
};
use crate::MonitorError;

/// m² → km²
const M2_PER_KM2: f64 = 1_000_000.0;

/// Options de chargement d'une source de polygones
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Calculer `alert_percent` / `overlay_percent`
    pub compute_percentages: bool,
    /// Noms des propriétés dans la source
    pub schema: PolygonSchema,
    /// Jeu de données d'origine
    pub dataset: DatasetKind,
    /// CRS projeté pour le calcul des surfaces
    pub area_epsg: u32,
}

impl LoadOptions {
    /// Unités de conservation : pourcentages calculés
    pub fn protected_areas() -> Self {
        Self {
            compute_percentages: true,
            schema: PolygonSchema::default(),
            dataset: DatasetKind::ProtectedAreas,
            area_epsg: DEFAULT_AREA_EPSG,
        }
    }

    /// Couche SIGEF : pourcentages forcés à 0
    pub fn overlay() -> Self {
        Self {
            compute_percentages: false,
            schema: PolygonSchema::default(),
            dataset: DatasetKind::Overlay,
            area_epsg: DEFAULT_AREA_EPSG,
        }
    }

    pub fn with_schema(mut self, schema: PolygonSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_area_epsg(mut self, area_epsg: u32) -> Self {
        self.area_epsg = area_epsg;
        self
    }
}

/// Charge un fichier GeoJSON de polygones.
///
/// # Errors
///
/// Retourne `MonitorError::DataSource` si le fichier est illisible, n'est pas
/// du GeoJSON, ou ne contient aucune géométrie exploitable après réparation.
pub fn load_polygons(path: &Path, options: &LoadOptions) -> Result<LoadedPolygons, MonitorError> {
    let source_name = path.display().to_string();
    let content = std::fs::read_to_string(path)
        .map_err(|e| MonitorError::data_source(&source_name, e.to_string()))?;

    read_polygons(&content, &source_name, options)
}

/// Charge des polygones depuis un contenu GeoJSON déjà lu
pub fn read_polygons(
    content: &str,
    source_name: &str,
    options: &LoadOptions,
) -> Result<LoadedPolygons, MonitorError> {
    if matches!(Crs::from_epsg(options.area_epsg), Some(Crs::Geographic)) {
        return Err(MonitorError::Projection(format!(
            "EPSG:{} is geographic, area measurement needs a projected CRS",
            options.area_epsg
        )));
    }

    // 1. Lecture
    let geojson: GeoJson = content
        .parse()
        .map_err(|e: geojson::Error| MonitorError::data_source(source_name, e.to_string()))?;
    let (features, source_epsg) = split_features(geojson);

    let presence = resolve_presence(&features, &options.schema);
    let to_area = SmartReprojector::new(source_epsg, options.area_epsg)
        .map_err(|e| MonitorError::data_source(source_name, e.to_string()))?;
    let to_render = SmartReprojector::new(source_epsg, WGS84_EPSG)
        .map_err(|e| MonitorError::data_source(source_name, e.to_string()))?;

    debug!(
        source = source_name,
        source_epsg,
        area_epsg = options.area_epsg,
        reprojector = to_area.description(),
        "Reading polygons"
    );

    let mut stats = LoadStats {
        read: features.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(features.len());

    for (index, feature) in features.into_iter().enumerate() {
        let id = index.to_string();

        // 2. Réparation
        let Some(geometry) = feature_geometry(&feature) else {
            debug!(source = source_name, id = %id, "Dropping feature without polygon geometry");
            stats.dropped += 1;
            continue;
        };
        let geometry = match repair_geometry(geometry, &id) {
            RepairOutcome::Valid(g) => g,
            RepairOutcome::Repaired(g) => {
                warn!(source = source_name, id = %id, "Invalid geometry repaired");
                stats.repaired += 1;
                g
            }
            RepairOutcome::Unusable(reason) => {
                debug!(source = source_name, id = %id, reason, "Dropping unusable geometry");
                stats.dropped += 1;
                continue;
            }
        };

        // 3. Surface calculée dans le CRS projeté
        let projected = to_area
            .transform_geometry(&geometry)
            .map_err(|e| MonitorError::data_source(source_name, format!("feature {}: {}", id, e)))?;
        let area_calc_km2 = projected.unsigned_area() / M2_PER_KM2;

        let properties = feature.properties.unwrap_or_default();
        let schema = &options.schema;

        // 4. Normalisation de la surface
        let area_km2 = normalize_area(
            presence.area,
            number_property(&properties, &schema.area),
            area_calc_km2,
        );
        if !(area_km2 > 0.0 && area_km2.is_finite()) {
            debug!(source = source_name, id = %id, area_km2, "Dropping zero-area geometry");
            stats.dropped += 1;
            continue;
        }

        // 5. Pourcentages
        let alert_area_km2 = number_property(&properties, &schema.alert_area);
        let overlay_area_km2 = number_property(&properties, &schema.overlay_area);
        let (alert_percent, overlay_percent) = if options.compute_percentages {
            (
                derived_percent(presence.alert_area, alert_area_km2, area_km2),
                derived_percent(presence.overlay_area, overlay_area_km2, area_km2),
            )
        } else {
            (0.0, 0.0)
        };

        // 7. Géométrie de rendu
        let geometry = to_render
            .transform_geometry(&geometry)
            .map_err(|e| MonitorError::data_source(source_name, format!("feature {}: {}", id, e)))?;

        records.push(PolygonRecord {
            id,
            geometry,
            name: text_property(&properties, &schema.name),
            municipality: text_property(&properties, &schema.municipality),
            area_km2,
            alert_area_km2,
            overlay_area_km2,
            alert_count: number_property(&properties, &schema.alert_count),
            overlay_count: number_property(&properties, &schema.overlay_count),
            alert_percent,
            overlay_percent,
            category_label: category_label(&properties, &schema.category, options.dataset),
            dataset: options.dataset,
        });
    }

    if records.is_empty() {
        return Err(MonitorError::data_source(
            source_name,
            format!("no usable geometries ({} features read)", stats.read),
        ));
    }

    info!(
        source = source_name,
        dataset = options.dataset.label(),
        read = stats.read,
        kept = records.len(),
        repaired = stats.repaired,
        dropped = stats.dropped,
        "Polygons loaded"
    );

    Ok(LoadedPolygons { records, stats })
}

/// Surface normalisée : la valeur source nulle, absente ou non positive est
/// remplacée par la surface calculée.
pub fn normalize_area(has_field: bool, source_value: Option<f64>, area_calc_km2: f64) -> f64 {
    if !has_field {
        return area_calc_km2;
    }
    match source_value {
        Some(v) if v > 0.0 && v.is_finite() => v,
        _ => area_calc_km2,
    }
}

/// Pourcentage dérivé d'une sous-surface, 0 si le champ est absent de la source
pub fn derived_percent(has_field: bool, sub_area: Option<f64>, area_km2: f64) -> f64 {
    if !has_field {
        return 0.0;
    }
    percentage(sub_area.unwrap_or(0.0), area_km2)
}

/// Catégorie du filtre; une emprise SIGEF sans libellé devient `Desconhecido`
fn category_label(properties: &JsonObject, key: &str, dataset: DatasetKind) -> Option<String> {
    match (text_property(properties, key), dataset) {
        (None, DatasetKind::Overlay) => Some(UNKNOWN_CATEGORY.to_string()),
        (label, _) => label,
    }
}

/// Sépare les features et le code EPSG source (membre `crs` historique)
fn split_features(geojson: GeoJson) -> (Vec<Feature>, u32) {
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            let epsg = fc
                .foreign_members
                .as_ref()
                .and_then(crs_epsg)
                .unwrap_or(WGS84_EPSG);
            (fc.features, epsg)
        }
        GeoJson::Feature(feature) => {
            let epsg = feature
                .foreign_members
                .as_ref()
                .and_then(crs_epsg)
                .unwrap_or(WGS84_EPSG);
            (vec![feature], epsg)
        }
        GeoJson::Geometry(geometry) => (vec![Feature::from(geometry)], WGS84_EPSG),
    }
}

/// Lit `{"crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::4674"}}}`
fn crs_epsg(members: &JsonObject) -> Option<u32> {
    let name = members
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()?;

    if name.ends_with("CRS84") {
        return Some(WGS84_EPSG);
    }

    let upper = name.to_ascii_uppercase();
    let pos = upper.find("EPSG")?;
    let digits: String = upper[pos + 4..]
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Présence de chaque champ optionnel dans au moins une feature
fn resolve_presence(features: &[Feature], schema: &PolygonSchema) -> FieldPresence {
    let has = |key: &str| {
        features
            .iter()
            .any(|f| f.properties.as_ref().is_some_and(|p| p.contains_key(key)))
    };

    FieldPresence {
        area: has(&schema.area),
        alert_area: has(&schema.alert_area),
        overlay_area: has(&schema.overlay_area),
    }
}

fn feature_geometry(feature: &Feature) -> Option<Geometry> {
    let geometry = feature.geometry.clone()?;
    Geometry::try_from(geometry).ok()
}

/// Valeur numérique d'une propriété (nombre ou chaîne numérique)
fn number_property(properties: &JsonObject, key: &str) -> Option<f64> {
    let value = match properties.get(key)? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    };
    value.filter(|v: &f64| v.is_finite())
}

/// Valeur texte d'une propriété, `None` si nulle ou vide
fn text_property(properties: &JsonObject, key: &str) -> Option<String> {
    let text = match properties.get(key)? {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
