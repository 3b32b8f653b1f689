//! # landwatch-dash
//!
//! Tableau de bord de suivi des aires protégées.
//!
//! ## Usage CLI
//!
//! ```bash
//! # Scène cartographique en JSON
//! landwatch-dash scene --output scene.json --select 0,4 --filter todos
//!
//! # Cartes de synthèse
//! landwatch-dash summary --select 0,4
//!
//! # Page HTML (Plotly)
//! landwatch-dash dashboard --output dashboard.html
//!
//! # Rapport de chargement
//! landwatch-dash report
//! ```

pub mod config;
pub mod export;
pub mod report;

pub use config::{DashboardConfig, SourceOverrides};
pub use report::{LoadReport, LoadStatus};
