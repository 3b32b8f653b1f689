//! Définition et implémentation des commandes CLI
//!
//! - `scene`: scène cartographique → JSON
//! - `summary`: cartes de synthèse
//! - `dashboard`: page HTML complète
//! - `report`: rapport de chargement

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::info;

use landwatch::{Selection, Snapshot};
use landwatch_dash::export::{write_dashboard, write_scene, DashboardPage};
use landwatch_dash::{DashboardConfig, LoadReport, SourceOverrides};

/// Sources de données (surchargent le fichier de config et l'environnement)
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// JSON config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Protected-area polygons (GeoJSON) (défaut : env LANDWATCH_BASE / cnuc.geojson)
    #[arg(long, global = true)]
    pub base: Option<PathBuf>,

    /// SIGEF overlay polygons (GeoJSON) (défaut : env LANDWATCH_OVERLAY / sigef.geojson)
    #[arg(long, global = true)]
    pub overlay: Option<PathBuf>,

    /// Do not load the SIGEF overlay
    #[arg(long, global = true, conflicts_with = "overlay")]
    pub no_overlay: bool,

    /// Incident table (CSV) (défaut : env LANDWATCH_INCIDENTS / CPT-PA-count.csv)
    #[arg(long, global = true)]
    pub incidents: Option<PathBuf>,

    /// Projected CRS used for area measurement (défaut : env LANDWATCH_AREA_EPSG / 31983)
    #[arg(long, global = true)]
    pub area_epsg: Option<u32>,
}

impl SourceArgs {
    fn overrides(&self) -> SourceOverrides {
        SourceOverrides {
            base: self.base.clone(),
            overlay: self.overlay.clone(),
            no_overlay: self.no_overlay,
            incidents: self.incidents.clone(),
            area_epsg: self.area_epsg,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compose the map scene and write it as JSON
    Scene {
        /// Output JSON file
        #[arg(short, long, default_value = "scene.json")]
        output: PathBuf,

        /// Selected protected-area ids, comma separated (ex: 0,4,12)
        #[arg(long)]
        select: Option<String>,

        /// SIGEF category filter ("todos" = no filter)
        #[arg(long)]
        filter: Option<String>,
    },

    /// Print the summary cards
    Summary {
        /// Selected protected-area ids, comma separated
        #[arg(long)]
        select: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a standalone HTML dashboard (map, cards, charts)
    Dashboard {
        /// Output HTML file
        #[arg(short, long, default_value = "dashboard.html")]
        output: PathBuf,

        /// Selected protected-area ids, comma separated
        #[arg(long)]
        select: Option<String>,

        /// SIGEF category filter ("todos" = no filter)
        #[arg(long)]
        filter: Option<String>,
    },

    /// Print the load report (read / repaired / dropped per dataset)
    Report {
        /// Also save the report as JSON
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

/// Configuration résolue puis snapshot chargé
fn load_snapshot(sources: &SourceArgs) -> Result<(Snapshot, LoadReport)> {
    let mut config = DashboardConfig::resolve(sources.config.as_deref())?;
    config.apply_overrides(sources.overrides());

    info!(
        base = %config.base.display(),
        overlay = ?config.overlay,
        incidents = %config.incidents.display(),
        area_epsg = config.area_epsg,
        "Loading datasets"
    );

    let snapshot_sources = config.to_sources();
    let start = Instant::now();
    let snapshot = Snapshot::load(&snapshot_sources).context("Failed to load datasets")?;
    let report = LoadReport::new(&snapshot_sources, &snapshot, start.elapsed());

    info!("{}", report.summary());

    Ok((snapshot, report))
}

fn parse_selection(select: Option<&str>) -> Option<Selection> {
    select.map(Selection::parse)
}

/// Exécute la commande scene
pub fn cmd_scene(
    sources: &SourceArgs,
    output: &Path,
    select: Option<&str>,
    filter: Option<&str>,
) -> Result<()> {
    let (snapshot, _) = load_snapshot(sources)?;
    let selection = parse_selection(select);

    let scene = snapshot.compose(selection.as_ref(), filter);
    write_scene(&scene, output)?;

    println!(
        "Scene written to {} ({} layers, legend: {})",
        output.display(),
        scene.layers.len(),
        scene.legend_entries().join(", ")
    );

    Ok(())
}

/// Exécute la commande summary
pub fn cmd_summary(sources: &SourceArgs, select: Option<&str>, as_json: bool) -> Result<()> {
    let (snapshot, _) = load_snapshot(sources)?;
    let selection = parse_selection(select);

    let metrics = snapshot.summarize(selection.as_ref());

    if as_json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        for (title, value) in metrics.cards() {
            println!("{:<22} {}", title, value);
        }
    }

    Ok(())
}

/// Exécute la commande dashboard
pub fn cmd_dashboard(
    sources: &SourceArgs,
    output: &Path,
    select: Option<&str>,
    filter: Option<&str>,
) -> Result<()> {
    let (snapshot, report) = load_snapshot(sources)?;
    let selection = parse_selection(select);

    let page = DashboardPage {
        scene: snapshot.compose(selection.as_ref(), filter),
        metrics: snapshot.summarize(selection.as_ref()),
        bar_chart: snapshot.bar_chart(),
        pie_chart: snapshot.pie_chart(),
    };
    write_dashboard(&page, output)?;

    let categories = snapshot.overlay_categories();
    println!("Dashboard written to {}", output.display());
    println!("{}", report.summary());
    if !categories.is_empty() {
        println!("SIGEF filter values: todos, {}", categories.join(", "));
    }

    Ok(())
}

/// Exécute la commande report
pub fn cmd_report(sources: &SourceArgs, save: Option<&Path>) -> Result<()> {
    let (_, report) = load_snapshot(sources)?;

    report.display();

    if let Some(path) = save {
        report
            .save_to_file(path)
            .context(format!("Failed to save report: {}", path.display()))?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}
