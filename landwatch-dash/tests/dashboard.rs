//! Tests d'intégration : configuration → snapshot → exports

use std::path::PathBuf;
use std::time::Duration;

use landwatch::{Selection, Snapshot};
use landwatch_dash::export::{write_dashboard, write_scene, DashboardPage};
use landwatch_dash::{DashboardConfig, LoadReport, LoadStatus, SourceOverrides};

fn fixture(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("landwatch-dash-{}-{}", std::process::id(), name));
    std::fs::write(&path, content).unwrap();
    path
}

const BASE: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"nome_uc":"RESEX Riozinho","municipio":"Altamira","area_km2":100,"alerta_km2":5,"sigef_km2":20,"c_alertas":3,"c_sigef":2},
   "geometry":{"type":"Polygon","coordinates":[[[-52.3,-3.3],[-52.2,-3.3],[-52.2,-3.2],[-52.3,-3.2],[-52.3,-3.3]]]}},
  {"type":"Feature","properties":{"nome_uc":"FLONA Itacaiúnas","municipio":"Marabá","area_km2":300,"alerta_km2":0,"sigef_km2":0,"c_alertas":1,"c_sigef":0},
   "geometry":{"type":"Polygon","coordinates":[[[-49.2,-5.4],[-49.0,-5.4],[-49.0,-5.2],[-49.2,-5.2],[-49.2,-5.4]]]}}
]}"#;

const OVERLAY: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"municipio":"Fazenda X"},
   "geometry":{"type":"Polygon","coordinates":[[[-52.25,-3.25],[-52.22,-3.25],[-52.22,-3.22],[-52.25,-3.22],[-52.25,-3.25]]]}}
]}"#;

const INCIDENTS: &str = "\
,Áreas de conflitos,Assassinatos,Conflitos por Terra,Ocupações Retomadas,Tentativas de Assassinatos,Trabalho Escravo,Latitude,Longitude
Altamira,2,0,1,0,0,0,-3.2,-52.2
Marabá,1,1,0,0,0,0,-5.37,-49.12
";

fn config_for(base: &PathBuf, overlay: &PathBuf, incidents: &PathBuf) -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.apply_overrides(SourceOverrides {
        base: Some(base.clone()),
        overlay: Some(overlay.clone()),
        incidents: Some(incidents.clone()),
        ..Default::default()
    });
    config
}

#[test]
fn test_dashboard_flow() {
    let base = fixture("base.geojson", BASE);
    let overlay = fixture("sigef.geojson", OVERLAY);
    let incidents = fixture("cpt.csv", INCIDENTS);

    let sources = config_for(&base, &overlay, &incidents).to_sources();
    let snapshot = Snapshot::load(&sources).unwrap();

    let report = LoadReport::new(&sources, &snapshot, Duration::from_millis(5));
    assert_eq!(report.status, LoadStatus::Clean);
    assert_eq!(report.sources.len(), 2);
    assert_eq!(report.total_kept(), 3);
    assert_eq!(report.incidents, 2);

    let selection = Selection::parse("0");
    let page = DashboardPage {
        scene: snapshot.compose(Some(&selection), Some("fazenda x")),
        metrics: snapshot.summarize(Some(&selection)),
        bar_chart: snapshot.bar_chart(),
        pie_chart: snapshot.pie_chart(),
    };
    assert_eq!(page.metrics.total_units, 1);
    assert!((page.metrics.alert_percent_agg - 3.0).abs() < 1e-9);

    let html_path = std::env::temp_dir().join(format!("landwatch-dash-{}.html", std::process::id()));
    write_dashboard(&page, &html_path).unwrap();
    let html = std::fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("Porcentagem de Área Sobreposta por Alertas e SIGEF"));
    assert!(html.contains("choroplethmapbox"));
    assert!(html.contains("Ocorrências - Marabá"));
    assert!(html.contains("Plotly.newPlot('bar'"));
    assert!(html.contains("<h3>Contagem Alerta</h3><p>3</p>"));

    let scene_path = std::env::temp_dir().join(format!("landwatch-dash-{}.json", std::process::id()));
    write_scene(&page.scene, &scene_path).unwrap();
    let scene: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&scene_path).unwrap()).unwrap();
    let kinds: Vec<_> = scene["layers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds[..3], ["polygons", "polygons", "polygons"]);
    assert_eq!(kinds.len(), 7);

    for path in [base, overlay, incidents, html_path, scene_path] {
        std::fs::remove_file(path).ok();
    }
}

#[test]
fn test_missing_incidents_is_fatal() {
    let base = fixture("base-only.geojson", BASE);
    let overlay = fixture("sigef-only.geojson", OVERLAY);
    let incidents = std::env::temp_dir().join("landwatch-dash-missing.csv");

    let sources = config_for(&base, &overlay, &incidents).to_sources();
    let err = Snapshot::load(&sources).unwrap_err();
    assert!(err.is_data_source());

    for path in [base, overlay] {
        std::fs::remove_file(path).ok();
    }
}
