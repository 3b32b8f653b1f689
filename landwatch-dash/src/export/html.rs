//! Page HTML autonome : carte, cartes de synthèse et graphiques Plotly
//!
//! Les figures sont sérialisées en JSON et confiées à plotly.js côté
//! navigateur ; aucun calcul n'est refait dans la page.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use landwatch::compose::{PointLayer, PolygonLayer};
use landwatch::{BarChart, MapLayer, MapScene, PieChart, SummaryMetrics};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const MAP_STYLE: &str = "open-street-map";
const TITLE_FONT_SIZE: u32 = 22;

/// Contenu d'une page de tableau de bord
#[derive(Debug, Clone)]
pub struct DashboardPage {
    pub scene: MapScene,
    pub metrics: SummaryMetrics,
    pub bar_chart: Option<BarChart>,
    pub pie_chart: PieChart,
}

/// Écrit la page HTML
pub fn write_dashboard(page: &DashboardPage, output_path: &Path) -> Result<()> {
    let html = render_dashboard(page)?;

    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(html.as_bytes())?;
    writer.flush()?;

    Ok(())
}

/// Génère la page HTML complète
pub fn render_dashboard(page: &DashboardPage) -> Result<String> {
    let map = script_json(&map_figure(&page.scene))?;
    let pie = script_json(&pie_figure(&page.pie_chart))?;
    let bar = page
        .bar_chart
        .as_ref()
        .map(|chart| script_json(&bar_figure(chart)))
        .transpose()?;

    let mut html = String::with_capacity(map.len() + 4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&page.scene.title)));
    html.push_str(&format!("<script src=\"{}\"></script>\n", PLOTLY_CDN));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");

    html.push_str(&render_cards(&page.metrics));
    html.push_str("<div id=\"map\"></div>\n<div class=\"charts\">\n");
    if bar.is_some() {
        html.push_str("<div id=\"bar\"></div>\n");
    }
    html.push_str("<div id=\"pie\"></div>\n</div>\n<script>\n");

    html.push_str(&format!("const map = {};\n", map));
    html.push_str("Plotly.newPlot('map', map.data, map.layout);\n");
    if let Some(bar) = bar {
        html.push_str(&format!("const bar = {};\n", bar));
        html.push_str("Plotly.newPlot('bar', bar.data, bar.layout);\n");
    }
    html.push_str(&format!("const pie = {};\n", pie));
    html.push_str("Plotly.newPlot('pie', pie.data, pie.layout);\n");
    html.push_str("</script>\n</body>\n</html>\n");

    Ok(html)
}

/// Cinq cartes de synthèse
fn render_cards(metrics: &SummaryMetrics) -> String {
    let mut html = String::from("<div class=\"cards-container\">\n");
    for (title, value) in metrics.cards() {
        html.push_str(&format!(
            "<div class=\"card\"><h3>{}</h3><p>{}</p></div>\n",
            escape_html(title),
            escape_html(&value)
        ));
    }
    html.push_str("</div>\n");
    html
}

/// Figure de la carte : une trace par couche, dans l'ordre d'empilement
pub fn map_figure(scene: &MapScene) -> Value {
    let data: Vec<Value> = scene
        .layers
        .iter()
        .map(|layer| match layer {
            MapLayer::Polygons(p) => polygon_trace(p),
            MapLayer::Points(p) => point_trace(p),
        })
        .collect();

    json!({
        "data": data,
        "layout": {
            "title": {"text": scene.title, "font": {"size": TITLE_FONT_SIZE}},
            "mapbox": {
                "style": MAP_STYLE,
                "center": {"lat": scene.center.lat, "lon": scene.center.lon},
                "zoom": scene.zoom,
            },
            "legend": {"title": {"text": scene.legend_title}, "x": 0, "y": 1},
            "height": scene.height,
            "margin": {"r": 10, "t": 50, "l": 10, "b": 10},
        },
    })
}

fn polygon_trace(layer: &PolygonLayer) -> Value {
    json!({
        "type": "choroplethmapbox",
        "name": layer.name,
        "geojson": layer.features,
        "locations": layer.ids(),
        "z": vec![1; layer.len()],
        "colorscale": [[0, layer.color], [1, layer.color]],
        "showscale": false,
        "marker": {"opacity": layer.opacity},
        "hovertext": layer.hover,
        "hoverinfo": "text",
        "showlegend": layer.show_legend,
    })
}

fn point_trace(layer: &PointLayer) -> Value {
    let (text, hoverinfo) = match &layer.hover {
        Some(hover) => (json!(hover), "text"),
        None => (Value::Null, "none"),
    };

    json!({
        "type": "scattermapbox",
        "mode": "markers",
        "name": layer.name,
        "lat": layer.lat,
        "lon": layer.lon,
        "marker": {
            "size": layer.sizes,
            "color": layer.color,
            "sizemode": layer.size_mode,
        },
        "text": text,
        "hoverinfo": hoverinfo,
        "showlegend": layer.show_legend,
    })
}

/// Histogramme groupé
pub fn bar_figure(chart: &BarChart) -> Value {
    let data: Vec<Value> = chart
        .series
        .iter()
        .map(|series| {
            json!({
                "type": "bar",
                "name": series.name,
                "x": chart.categories,
                "y": series.values,
                "marker": {"color": series.color},
            })
        })
        .collect();

    json!({
        "data": data,
        "layout": {
            "title": {"text": chart.title},
            "barmode": "group",
            "xaxis": {"title": {"text": chart.x_label}},
            "yaxis": {"title": {"text": chart.y_label}},
            "legend": {"title": {"text": chart.legend_title}},
        },
    })
}

pub fn pie_figure(chart: &PieChart) -> Value {
    json!({
        "data": [{
            "type": "pie",
            "labels": chart.labels,
            "values": chart.values,
            "marker": {"colors": chart.colors},
        }],
        "layout": {"title": {"text": chart.title}},
    })
}

/// JSON sûr à insérer dans un élément `<script>`
fn script_json(value: &Value) -> Result<String> {
    let json = serde_json::to_string(value).context("Failed to serialize figure")?;
    Ok(json.replace("</", "<\\/"))
}

/// Échappe une chaîne pour un contenu HTML
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            c => result.push(c),
        }
    }
    result
}

const STYLE: &str = r#"<style>
body { font-family: sans-serif; margin: 16px; }
.cards-container { display: flex; justify-content: space-between; flex-wrap: nowrap; overflow-x: auto; gap: 10px; }
.card { padding: 15px; border-radius: 10px; background-color: #f0f2f6; text-align: center; box-shadow: 2px 2px 10px rgba(0, 0, 0, 0.1); flex: 1 1 auto; min-width: 150px; }
.card h3 { margin-bottom: 5px; font-size: 18px; }
.card p { font-size: 24px; font-weight: bold; }
.charts { display: flex; flex-wrap: wrap; gap: 10px; }
.charts > div { flex: 1 1 480px; }
</style>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use landwatch::compose::{MapCenter, PointRole, LEGEND_TITLE, MAP_TITLE};

    fn page(layers: Vec<MapLayer>) -> DashboardPage {
        DashboardPage {
            scene: MapScene {
                title: MAP_TITLE.to_string(),
                center: MapCenter { lat: -3.5, lon: -52.0 },
                zoom: 4.0,
                height: 700,
                legend_title: LEGEND_TITLE.to_string(),
                layers,
            },
            metrics: SummaryMetrics {
                alert_percent_agg: 12.5,
                overlay_percent_agg: 0.0,
                total_units: 3,
                alert_count: 10.0,
                overlay_count: 1.0,
            },
            bar_chart: None,
            pie_chart: PieChart {
                title: "Áreas de conflitos".to_string(),
                labels: vec!["Altamira".to_string()],
                values: vec![4],
                colors: vec!["rgb(102, 197, 204)".to_string()],
            },
        }
    }

    fn points(hover: Option<Vec<String>>) -> PointLayer {
        PointLayer {
            role: PointRole::Fill,
            name: "Ocorrências - Altamira".to_string(),
            category: Some("Altamira".to_string()),
            color: "rgb(102, 197, 204)".to_string(),
            lat: vec![-3.2],
            lon: vec![-52.2],
            sizes: vec![33.0],
            size_mode: "area",
            hover,
            show_legend: true,
        }
    }

    #[test]
    fn test_render_cards_and_charts() {
        let html = render_dashboard(&page(Vec::new())).unwrap();

        assert!(html.contains("<h3>Percentual de Alerta</h3><p>12.50%</p>"));
        assert!(html.contains("<h3>Total de Unidades</h3><p>3</p>"));
        assert!(html.contains("Plotly.newPlot('pie'"));
        assert!(!html.contains("Plotly.newPlot('bar'"));
        assert!(html.contains(PLOTLY_CDN));
    }

    #[test]
    fn test_point_trace() {
        let trace = point_trace(&points(Some(vec!["Município: Altamira".to_string()])));
        assert_eq!(trace["type"], "scattermapbox");
        assert_eq!(trace["marker"]["sizemode"], "area");
        assert_eq!(trace["hoverinfo"], "text");

        let outline = point_trace(&points(None));
        assert_eq!(outline["hoverinfo"], "none");
        assert!(outline["text"].is_null());
    }

    #[test]
    fn test_map_layout() {
        let figure = map_figure(&page(vec![MapLayer::Points(points(None))]).scene);
        assert_eq!(figure["layout"]["legend"]["title"]["text"], "Legenda");
        assert_eq!(figure["layout"]["height"], 700);
        assert_eq!(figure["layout"]["mapbox"]["zoom"], 4.0);
        assert_eq!(figure["data"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_script_escaping() {
        let value = json!({"name": "</script><script>alert(1)</script>"});
        let escaped = script_json(&value).unwrap();
        assert!(!escaped.contains("</script>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_html("\"x\""), "&quot;x&quot;");
    }
}
