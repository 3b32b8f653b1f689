//! Chargeurs des jeux de données (polygones GeoJSON, ocorrências CSV)

pub mod incidents;
pub mod polygons;

pub use incidents::{load_incidents, read_incidents};
pub use polygons::{load_polygons, read_polygons, LoadOptions};
