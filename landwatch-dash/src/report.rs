//! Rapport de chargement des jeux de données
//!
//! Résume, par source, les features lues, réparées et écartées ainsi que le
//! nombre de lignes d'ocorrências.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use landwatch::{LoadStats, Snapshot, SnapshotSources};

/// Statut global du chargement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadStatus {
    /// Toutes les géométries étaient valides
    Clean,
    /// Des géométries ont été réparées ou écartées
    Degraded,
}

/// Compteurs d'une source de polygones
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    /// Libellé du jeu de données (cnuc, sigef)
    pub dataset: String,
    /// Chemin du fichier
    pub path: String,
    pub stats: LoadStats,
}

/// Rapport complet de chargement
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub duration_secs: f64,
    pub status: LoadStatus,
    pub sources: Vec<SourceReport>,
    /// Fichier d'ocorrências
    pub incidents_path: String,
    pub incidents: usize,
    /// CRS de calcul des surfaces
    pub area_epsg: u32,
}

impl LoadReport {
    /// Construit le rapport d'un snapshot chargé
    pub fn new(sources: &SnapshotSources, snapshot: &Snapshot, duration: Duration) -> Self {
        let (base_stats, overlay_stats) = snapshot.load_stats();

        let mut reports = vec![SourceReport {
            dataset: "cnuc".to_string(),
            path: sources.base.display().to_string(),
            stats: base_stats.clone(),
        }];
        if let (Some(path), Some(stats)) = (&sources.overlay, overlay_stats) {
            reports.push(SourceReport {
                dataset: "sigef".to_string(),
                path: path.display().to_string(),
                stats: stats.clone(),
            });
        }

        let degraded = reports
            .iter()
            .any(|r| r.stats.repaired > 0 || r.stats.dropped > 0);

        Self {
            duration_secs: duration.as_secs_f64(),
            status: if degraded {
                LoadStatus::Degraded
            } else {
                LoadStatus::Clean
            },
            sources: reports,
            incidents_path: sources.incidents.display().to_string(),
            incidents: snapshot.incidents.len(),
            area_epsg: sources.area_epsg,
        }
    }

    /// Total des features conservées, toutes sources confondues
    pub fn total_kept(&self) -> usize {
        self.sources.iter().map(|s| s.stats.kept()).sum()
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("LOAD REPORT - area CRS EPSG:{}", self.area_epsg);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- POLYGONS ---");
        for source in &self.sources {
            println!(
                "  {} ({}): {} read, {} kept, {} repaired, {} dropped",
                source.dataset,
                source.path,
                source.stats.read,
                source.stats.kept(),
                source.stats.repaired,
                source.stats.dropped
            );
        }

        println!("\n--- INCIDENTS ---");
        println!("  {}: {} rows", self.incidents_path, self.incidents);

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact
    pub fn summary(&self) -> String {
        format!(
            "{} polygons kept, {} incidents ({:?})",
            self.total_kept(),
            self.incidents,
            self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(stats: LoadStats) -> LoadReport {
        LoadReport {
            duration_secs: 0.5,
            status: LoadStatus::Clean,
            sources: vec![SourceReport {
                dataset: "cnuc".to_string(),
                path: "cnuc.geojson".to_string(),
                stats,
            }],
            incidents_path: "CPT-PA-count.csv".to_string(),
            incidents: 12,
            area_epsg: 31983,
        }
    }

    #[test]
    fn test_total_kept_and_summary() {
        let report = report(LoadStats {
            read: 10,
            repaired: 1,
            dropped: 2,
        });
        assert_eq!(report.total_kept(), 8);

        let summary = report.summary();
        assert!(summary.contains("8 polygons kept"));
        assert!(summary.contains("12 incidents"));
    }

    #[test]
    fn test_save_to_file() {
        let report = report(LoadStats::default());
        let path = std::env::temp_dir().join("landwatch_report_test.json");

        report.save_to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"area_epsg\": 31983"));
        assert!(content.contains("\"Clean\""));

        std::fs::remove_file(path).ok();
    }
}
