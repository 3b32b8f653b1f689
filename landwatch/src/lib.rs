//! # landwatch
//!
//! Chargement et composition des données de suivi des aires protégées :
//! unités de conservation, emprises SIGEF et ocorrências de conflits fonciers.
//!
//! ## Features
//!
//! - Lecture GeoJSON avec réparation des géométries invalides (buffer 0)
//! - Surfaces calculées en UTM SIRGAS 2000 (reprojection pure Rust, PROJ en option)
//! - Pourcentages alerte / SIGEF protégés contre la division par zéro
//! - Scène cartographique en couches, sérialisable en JSON
//!
//! ## Usage
//!
//! ```rust,ignore
//! use landwatch::{Selection, Snapshot, SnapshotSources};
//!
//! let sources = SnapshotSources::new("cnuc.geojson", "CPT-PA-count.csv")
//!     .with_overlay("sigef.geojson");
//! let snapshot = Snapshot::load(&sources)?;
//!
//! let selection = Selection::parse("0,4");
//! let scene = snapshot.compose(Some(&selection), Some("todos"));
//! let metrics = snapshot.summarize(Some(&selection));
//! println!("{} couches, {:.2}% sous alerte", scene.layers.len(), metrics.alert_percent_agg);
//! ```

pub mod charts;
pub mod compose;
pub mod error;
pub mod loader;
pub mod palette;
pub mod repair;
pub mod reproject;
pub mod selection;
pub mod snapshot;
pub mod summary;
pub mod types;

pub use charts::{BarChart, PieChart};
pub use compose::{compose, ComposeInput, MapLayer, MapScene};
pub use error::MonitorError;
pub use loader::{load_incidents, load_polygons, LoadOptions};
pub use selection::{FilterOption, Selection};
pub use snapshot::{Snapshot, SnapshotSources};
pub use summary::{summarize, SummaryMetrics};
pub use types::{
    DatasetKind, IncidentCounts, IncidentRecord, LoadStats, LoadedPolygons, PolygonRecord,
    PolygonSchema,
};
