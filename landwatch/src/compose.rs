//! Composition de la scène cartographique
//!
//! Ordre d'empilement fixe :
//! 1. polygones de base (unités de conservation)
//! 2. surbrillance de la sélection
//! 3. couche SIGEF filtrée
//! 4. paires contour/remplissage des ocorrências, par catégorie

use geo::BoundingRect;
use geojson::{feature::Id, Feature, FeatureCollection, JsonObject};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::palette::CategoryPalette;
use crate::selection::{FilterOption, Selection};
use crate::types::{IncidentRecord, PolygonRecord};

pub const MAP_TITLE: &str = "Porcentagem de Área Sobreposta por Alertas e SIGEF";
pub const LEGEND_TITLE: &str = "Legenda";
pub const DEFAULT_ZOOM: f64 = 4.0;
pub const MAP_HEIGHT: u32 = 700;

const BASE_COLOR: &str = "#DDDDDD";
const BASE_OPACITY: f64 = 0.7;
const SELECTION_COLOR: &str = "#0074D9";
const SELECTION_OPACITY: f64 = 0.6;
const SELECTION_ZOOM: f64 = 10.0;
const OVERLAY_COLOR: &str = "#FF851B";
const OVERLAY_OPACITY: f64 = 0.5;
const OVERLAY_NAME: &str = "SIGEF";

/// Couleur du groupe unique quand le tableau n'a pas de catégorie
const POOL_COLOR: &str = "red";
const POOL_NAME: &str = "Ocorrências";
const OUTLINE_COLOR: &str = "black";

/// Taille de marqueur par ocorrência (mode surface)
pub const SIZE_PER_INCIDENT: f64 = 3.0;
/// Marge du contour autour du marqueur
pub const OUTLINE_EXTRA_SIZE: f64 = 4.0;

/// Entrées de la composition (données déjà chargées + choix de l'interface)
#[derive(Debug, Clone, Copy)]
pub struct ComposeInput<'a> {
    pub polygons: &'a [PolygonRecord],
    pub overlays: Option<&'a [PolygonRecord]>,
    pub selection: Option<&'a Selection>,
    pub incidents: &'a [IncidentRecord],
    pub filter: Option<&'a str>,
}

/// Centre de la carte
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Rôle d'une couche de polygones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolygonRole {
    Base,
    Selection,
    Overlay,
}

/// Rôle d'une couche de points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointRole {
    Outline,
    Fill,
}

/// Couche de polygones à aplat de couleur
#[derive(Debug, Clone, Serialize)]
pub struct PolygonLayer {
    pub role: PolygonRole,
    pub name: String,
    pub color: String,
    pub opacity: f64,
    /// Zoom conseillé pour cadrer la couche
    pub focus_zoom: Option<f64>,
    pub show_legend: bool,
    /// Un texte de survol par feature, même ordre que `features`
    pub hover: Vec<String>,
    pub features: FeatureCollection,
}

impl PolygonLayer {
    /// Identifiants des polygones de la couche
    pub fn ids(&self) -> Vec<String> {
        self.features
            .features
            .iter()
            .filter_map(|f| match &f.id {
                Some(Id::String(id)) => Some(id.clone()),
                Some(Id::Number(n)) => Some(n.to_string()),
                None => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.features.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.features.is_empty()
    }
}

/// Couche de marqueurs ponctuels
#[derive(Debug, Clone, Serialize)]
pub struct PointLayer {
    pub role: PointRole,
    pub name: String,
    pub category: Option<String>,
    pub color: String,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub sizes: Vec<f64>,
    pub size_mode: &'static str,
    /// `None` = pas de survol
    pub hover: Option<Vec<String>>,
    pub show_legend: bool,
}

/// Une couche de la scène
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapLayer {
    Polygons(PolygonLayer),
    Points(PointLayer),
}

impl MapLayer {
    pub fn show_legend(&self) -> bool {
        match self {
            Self::Polygons(layer) => layer.show_legend,
            Self::Points(layer) => layer.show_legend,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Polygons(layer) => &layer.name,
            Self::Points(layer) => &layer.name,
        }
    }
}

/// Scène composée, prête à être rendue
#[derive(Debug, Clone, Serialize)]
pub struct MapScene {
    pub title: String,
    pub center: MapCenter,
    pub zoom: f64,
    pub height: u32,
    pub legend_title: String,
    pub layers: Vec<MapLayer>,
}

impl MapScene {
    /// Couche de polygones d'un rôle donné
    pub fn polygon_layer(&self, role: PolygonRole) -> Option<&PolygonLayer> {
        self.layers.iter().find_map(|layer| match layer {
            MapLayer::Polygons(p) if p.role == role => Some(p),
            _ => None,
        })
    }

    /// Couches de points, dans l'ordre d'empilement
    pub fn point_layers(&self) -> impl Iterator<Item = &PointLayer> {
        self.layers.iter().filter_map(|layer| match layer {
            MapLayer::Points(p) => Some(p),
            MapLayer::Polygons(_) => None,
        })
    }

    /// Noms affichés dans la légende
    pub fn legend_entries(&self) -> Vec<&str> {
        self.layers
            .iter()
            .filter(|layer| layer.show_legend())
            .map(MapLayer::name)
            .collect()
    }
}

/// Compose la scène complète
pub fn compose(input: &ComposeInput) -> MapScene {
    let mut layers = Vec::new();

    layers.push(MapLayer::Polygons(polygon_layer(
        PolygonRole::Base,
        "cnuc",
        BASE_COLOR,
        BASE_OPACITY,
        input.polygons.iter(),
    )));

    if let Some(selection) = Selection::active(input.selection) {
        let mut layer = polygon_layer(
            PolygonRole::Selection,
            "Seleção",
            SELECTION_COLOR,
            SELECTION_OPACITY,
            input.polygons.iter().filter(|p| selection.contains(&p.id)),
        );
        layer.focus_zoom = Some(SELECTION_ZOOM);
        debug!(selected = selection.len(), matched = layer.len(), "Selection layer");
        layers.push(MapLayer::Polygons(layer));
    }

    if let Some(overlays) = input.overlays {
        let filter = FilterOption::from_option(input.filter);
        let mut layer = polygon_layer(
            PolygonRole::Overlay,
            OVERLAY_NAME,
            OVERLAY_COLOR,
            OVERLAY_OPACITY,
            overlays
                .iter()
                .filter(|p| filter.matches(p.normalized_category().as_deref())),
        );
        layer.show_legend = true;
        debug!(filter = ?filter, matched = layer.len(), "Overlay layer");
        layers.push(MapLayer::Polygons(layer));
    }

    layers.extend(point_layers(input.incidents).into_iter().map(MapLayer::Points));

    apply_legend_policy(&mut layers);

    MapScene {
        title: MAP_TITLE.to_string(),
        center: map_center(input.polygons),
        zoom: DEFAULT_ZOOM,
        height: MAP_HEIGHT,
        legend_title: LEGEND_TITLE.to_string(),
        layers,
    }
}

/// Seules les couches de points apparaissent dans la légende
fn apply_legend_policy(layers: &mut [MapLayer]) {
    for layer in layers {
        if let MapLayer::Polygons(p) = layer {
            p.show_legend = false;
        }
    }
}

/// Milieu de l'emprise des polygones de base
pub fn map_center(polygons: &[PolygonRecord]) -> MapCenter {
    let bounds = polygons
        .iter()
        .filter_map(|p| p.geometry.bounding_rect())
        .map(|r| (r.min().x, r.min().y, r.max().x, r.max().y))
        .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)));

    match bounds {
        Some((min_x, min_y, max_x, max_y)) => MapCenter {
            lat: (min_y + max_y) / 2.0,
            lon: (min_x + max_x) / 2.0,
        },
        None => MapCenter { lat: 0.0, lon: 0.0 },
    }
}

fn polygon_layer<'a>(
    role: PolygonRole,
    name: &str,
    color: &str,
    opacity: f64,
    polygons: impl Iterator<Item = &'a PolygonRecord>,
) -> PolygonLayer {
    let (hover, features): (Vec<String>, Vec<Feature>) = polygons
        .map(|p| (polygon_hover(p), polygon_feature(p)))
        .unzip();

    PolygonLayer {
        role,
        name: name.to_string(),
        color: color.to_string(),
        opacity,
        focus_zoom: None,
        show_legend: false,
        hover,
        features: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
    }
}

fn polygon_feature(record: &PolygonRecord) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("nome_uc".to_string(), json!(record.name));
    properties.insert("municipio".to_string(), json!(record.municipality));
    properties.insert("perc_alerta".to_string(), json!(record.alert_percent));
    properties.insert("perc_sigef".to_string(), json!(record.overlay_percent));
    properties.insert("alerta_km2".to_string(), json!(record.alert_area_km2));
    properties.insert("sigef_km2".to_string(), json!(record.overlay_area_km2));
    properties.insert("area_km2".to_string(), json!(record.area_km2));
    properties.insert("base".to_string(), json!(record.dataset.label()));

    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(&record.geometry))),
        id: Some(Id::String(record.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}

fn polygon_hover(record: &PolygonRecord) -> String {
    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let number = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));

    [
        format!("Nome UC: {}", text(&record.name)),
        format!("Município: {}", text(&record.municipality)),
        format!("% Alerta: {:.2}", record.alert_percent),
        format!("% SIGEF: {:.2}", record.overlay_percent),
        format!("Alerta (km²): {}", number(record.alert_area_km2)),
        format!("SIGEF (km²): {}", number(record.overlay_area_km2)),
        format!("Área (km²): {:.2}", record.area_km2),
    ]
    .join("<br>")
}

/// Regroupe les ocorrências par catégorie, dans l'ordre de première apparition
fn group_incidents(incidents: &[IncidentRecord]) -> Vec<(Option<&str>, Vec<&IncidentRecord>)> {
    let mut groups: Vec<(Option<&str>, Vec<&IncidentRecord>)> = Vec::new();
    for incident in incidents {
        let key = incident.category.as_deref();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(incident),
            None => groups.push((key, vec![incident])),
        }
    }
    groups
}

/// Paires contour/remplissage, une par catégorie
fn point_layers(incidents: &[IncidentRecord]) -> Vec<PointLayer> {
    let groups = group_incidents(incidents);
    let palette =
        CategoryPalette::from_categories(groups.iter().filter_map(|(category, _)| *category));

    let mut layers = Vec::with_capacity(groups.len() * 2);

    for (category, members) in groups {
        let (name, color) = match category {
            Some(c) => (
                format!("{} - {}", POOL_NAME, c),
                palette.color_of(c).unwrap_or(POOL_COLOR),
            ),
            None => (POOL_NAME.to_string(), POOL_COLOR),
        };

        let lat: Vec<f64> = members.iter().map(|i| i.latitude()).collect();
        let lon: Vec<f64> = members.iter().map(|i| i.longitude()).collect();
        let base_sizes: Vec<f64> = members
            .iter()
            .map(|i| i.total_incidents() as f64 * SIZE_PER_INCIDENT)
            .collect();

        layers.push(PointLayer {
            role: PointRole::Outline,
            name: format!("{} (contorno)", name),
            category: category.map(str::to_string),
            color: OUTLINE_COLOR.to_string(),
            lat: lat.clone(),
            lon: lon.clone(),
            sizes: base_sizes.iter().map(|s| s + OUTLINE_EXTRA_SIZE).collect(),
            size_mode: "area",
            hover: None,
            show_legend: false,
        });

        layers.push(PointLayer {
            role: PointRole::Fill,
            name,
            category: category.map(str::to_string),
            color: color.to_string(),
            lat,
            lon,
            sizes: base_sizes,
            size_mode: "area",
            hover: Some(members.iter().map(|i| incident_hover(i)).collect()),
            show_legend: true,
        });
    }

    layers
}

fn incident_hover(incident: &IncidentRecord) -> String {
    let mut lines = Vec::with_capacity(7);
    if let Some(category) = &incident.category {
        lines.push(format!("Município: {}", category));
    }
    lines.extend(
        incident
            .incident_counts
            .labelled()
            .map(|(label, count)| format!("{}: {}", label, count)),
    );
    lines.join("<br>")
}
