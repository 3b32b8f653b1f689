//! Reprojection légère en Rust pur
//!
//! Supporte les systèmes utilisés pour le suivi des aires protégées :
//! - WGS84 (EPSG:4326) et SIRGAS 2000 géographique (EPSG:4674)
//! - SIRGAS 2000 / UTM 11N..22N (EPSG:31965..31976) et 17S..25S (EPSG:31977..31985)
//! - WGS84 / UTM (EPSG:32601..32660 et 32701..32760)
//!
//! Les autres couples passent par PROJ (feature `reproject`), voir [`SmartReprojector`].

mod ellipsoid;
#[cfg(feature = "reproject")]
mod proj;
mod smart;
mod utm;

pub use ellipsoid::Ellipsoid;
#[cfg(feature = "reproject")]
pub use proj::ProjReprojector;
pub use smart::SmartReprojector;
pub use utm::UtmZone;

use geo::{Coord, Geometry, MapCoords};

use crate::MonitorError;

/// WGS84 longitude/latitude, CRS de rendu
pub const WGS84_EPSG: u32 = 4326;

/// SIRGAS 2000 / UTM zone 23S, CRS de calcul des surfaces par défaut
pub const DEFAULT_AREA_EPSG: u32 = 31983;

/// Point en coordonnées géographiques (radians)
#[derive(Debug, Clone, Copy)]
pub struct Geographic {
    /// Longitude en radians
    pub lon: f64,
    /// Latitude en radians
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Convertit en degrés
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }

    /// Crée depuis des degrés
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }
}

/// Système de coordonnées connu de la reprojection légère
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crs {
    /// Longitude/latitude en degrés (WGS84 ou SIRGAS 2000)
    Geographic,
    /// Projection UTM
    Utm(UtmZone),
}

impl Crs {
    /// Résout un code EPSG, `None` s'il n'est pas supporté
    pub fn from_epsg(epsg: u32) -> Option<Self> {
        match epsg {
            4326 | 4674 => Some(Self::Geographic),
            31965..=31976 => Some(Self::Utm(UtmZone::new(
                epsg - 31965 + 11,
                false,
                Ellipsoid::GRS80,
            ))),
            31977..=31985 => Some(Self::Utm(UtmZone::new(
                epsg - 31977 + 17,
                true,
                Ellipsoid::GRS80,
            ))),
            32601..=32660 => Some(Self::Utm(UtmZone::new(
                epsg - 32600,
                false,
                Ellipsoid::WGS84,
            ))),
            32701..=32760 => Some(Self::Utm(UtmZone::new(
                epsg - 32700,
                true,
                Ellipsoid::WGS84,
            ))),
            _ => None,
        }
    }

    /// Indique si le CRS est projeté (coordonnées en mètres)
    pub fn is_projected(&self) -> bool {
        matches!(self, Self::Utm(_))
    }
}

/// Reprojection légère entre deux CRS supportés
#[derive(Debug, Clone, Copy)]
pub struct ReprojectorLite {
    source: Crs,
    target: Crs,
}

impl ReprojectorLite {
    /// Crée un nouveau reprojector
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self, MonitorError> {
        match (Crs::from_epsg(source_epsg), Crs::from_epsg(target_epsg)) {
            (Some(source), Some(target)) => Ok(Self { source, target }),
            _ => Err(MonitorError::UnsupportedProjection {
                source_epsg,
                target_epsg,
            }),
        }
    }

    /// Vérifie si la reprojection est supportée
    pub fn is_supported(source_epsg: u32, target_epsg: u32) -> bool {
        Crs::from_epsg(source_epsg).is_some() && Crs::from_epsg(target_epsg).is_some()
    }

    /// Transforme un point (x, y) de la source vers la cible
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        // Étape 1: Source → Géographique
        let geo = match self.source {
            Crs::Geographic => Geographic::from_degrees(x, y),
            Crs::Utm(zone) => zone.to_geographic(x, y),
        };

        // Étape 2: Géographique → Cible
        match self.target {
            Crs::Geographic => geo.to_degrees(),
            Crs::Utm(zone) => zone.from_geographic(geo),
        }
    }

    /// Transforme une géométrie
    pub fn transform_geometry(&self, geom: &Geometry) -> Geometry {
        geom.map_coords(|c| {
            let (x, y) = self.transform_point(c.x, c.y);
            Coord { x, y }
        })
    }
}
