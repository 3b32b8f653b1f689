//! Chargement du tableau d'ocorrências (CSV)
//!
//! Schéma attendu: une colonne d'index sans nom (municipalité), les six
//! colonnes de comptage de [`INCIDENT_COLUMNS`], `Latitude` et `Longitude`.

use std::io::Read;
use std::path::Path;

use geo::Point;
use tracing::{debug, info};

use crate::types::{
    IncidentCounts, IncidentRecord, CATEGORY_COLUMN, INCIDENT_COLUMNS, UNKNOWN_CATEGORY,
};
use crate::MonitorError;

/// En-tête donné par pandas à un index exporté sans nom
const PANDAS_INDEX_HEADER: &str = "Unnamed: 0";

/// Charge un fichier CSV d'ocorrências.
///
/// # Errors
///
/// Retourne `MonitorError::DataSource` si le fichier est illisible, si une
/// colonne obligatoire manque ou si une cellule n'est pas numérique.
pub fn load_incidents(path: &Path) -> Result<Vec<IncidentRecord>, MonitorError> {
    let source_name = path.display().to_string();
    let file = std::fs::File::open(path)
        .map_err(|e| MonitorError::data_source(&source_name, e.to_string()))?;

    read_incidents(file, &source_name)
}

/// Position des colonnes utiles dans l'en-tête
#[derive(Debug)]
struct ColumnIndex {
    category: Option<usize>,
    counts: [usize; 6],
    latitude: usize,
    longitude: usize,
}

/// Lit un tableau d'ocorrências depuis n'importe quelle source `Read`
pub fn read_incidents<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<Vec<IncidentRecord>, MonitorError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rename_index_column(
        csv_reader
            .headers()
            .map_err(|e| MonitorError::data_source(source_name, e.to_string()))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect(),
    );
    let columns = locate_columns(&headers, source_name)?;

    debug!(
        source = source_name,
        has_category = columns.category.is_some(),
        "Incident table header resolved"
    );

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (row, result) in csv_reader.records().enumerate() {
        // Ligne 1 = en-tête
        let line = row + 2;
        let record = result.map_err(|e| MonitorError::data_source(source_name, e.to_string()))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        // Position manquante: point non cartographiable
        if cell(columns.latitude).is_empty() || cell(columns.longitude).is_empty() {
            debug!(source = source_name, line, "Skipping row without coordinates");
            skipped += 1;
            continue;
        }

        let mut counts = [0u32; 6];
        for (slot, (&idx, column)) in counts
            .iter_mut()
            .zip(columns.counts.iter().zip(INCIDENT_COLUMNS))
        {
            *slot = parse_count(cell(idx)).ok_or_else(|| {
                MonitorError::data_source(
                    source_name,
                    format!("line {}: invalid count {:?} in column {:?}", line, cell(idx), column),
                )
            })?;
        }

        let latitude = parse_coordinate(cell(columns.latitude), line, "Latitude", source_name)?;
        let longitude = parse_coordinate(cell(columns.longitude), line, "Longitude", source_name)?;

        let category = columns.category.map(|idx| match cell(idx) {
            "" => UNKNOWN_CATEGORY.to_string(),
            value => value.to_string(),
        });

        records.push(IncidentRecord {
            location: Point::new(longitude, latitude),
            category,
            incident_counts: IncidentCounts::from_array(counts),
        });
    }

    info!(
        source = source_name,
        rows = records.len(),
        skipped,
        "Incidents loaded"
    );

    Ok(records)
}

/// Renomme la colonne d'index anonyme en `Município`, sauf si elle existe déjà
fn rename_index_column(mut headers: Vec<String>) -> Vec<String> {
    if headers.iter().any(|h| h == CATEGORY_COLUMN) {
        return headers;
    }
    if let Some(first) = headers.first_mut() {
        if first.is_empty() || first == PANDAS_INDEX_HEADER {
            *first = CATEGORY_COLUMN.to_string();
        }
    }
    headers
}

fn locate_columns(headers: &[String], source_name: &str) -> Result<ColumnIndex, MonitorError> {
    let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let mut missing = Vec::new();
    let mut counts = [0usize; 6];
    for (slot, column) in counts.iter_mut().zip(INCIDENT_COLUMNS) {
        match headers.iter().position(|h| h == column) {
            Some(idx) => *slot = idx,
            None => missing.push(column),
        }
    }
    let latitude = find("Latitude");
    let longitude = find("Longitude");
    if latitude.is_none() {
        missing.push("Latitude");
    }
    if longitude.is_none() {
        missing.push("Longitude");
    }

    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) if missing.is_empty() => Ok(ColumnIndex {
            category: headers.iter().position(|h| h == CATEGORY_COLUMN),
            counts,
            latitude,
            longitude,
        }),
        _ => Err(MonitorError::data_source(
            source_name,
            format!("missing required columns: {}", missing.join(", ")),
        )),
    }
}

/// Comptage: vide = 0, accepte "3.0" (colonnes exportées en flottant)
fn parse_count(value: &str) -> Option<u32> {
    if value.is_empty() {
        return Some(0);
    }
    if let Ok(n) = value.parse::<u32>() {
        return Some(n);
    }
    let f: f64 = value.parse().ok()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX)).then_some(f as u32)
}

fn parse_coordinate(
    value: &str,
    line: usize,
    column: &str,
    source_name: &str,
) -> Result<f64, MonitorError> {
    value
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            MonitorError::data_source(
                source_name,
                format!("line {}: invalid {} {:?}", line, column, value),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = ",Áreas de conflitos,Assassinatos,Conflitos por Terra,Ocupações Retomadas,Tentativas de Assassinatos,Trabalho Escravo,Latitude,Longitude";

    #[test]
    fn test_read_with_index_column() {
        let csv = format!(
            "{}\nAltamira,3,1,2,0,1,4,-3.2,-52.2\nMarabá,0,0,0,0,0,0,-5.37,-49.12\n",
            HEADER
        );
        let records = read_incidents(csv.as_bytes(), "cpt.csv").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category.as_deref(), Some("Altamira"));
        assert_eq!(records[0].total_incidents(), 11);
        assert_eq!(records[0].latitude(), -3.2);
        assert_eq!(records[0].longitude(), -52.2);
        assert_eq!(records[1].total_incidents(), 0);
    }

    #[test]
    fn test_pandas_unnamed_header() {
        let csv = HEADER.replacen(',', "Unnamed: 0,", 1) + "\nAltamira,1,0,0,0,0,0,-3.2,-52.2\n";
        let records = read_incidents(csv.as_bytes(), "cpt.csv").unwrap();
        assert_eq!(records[0].category.as_deref(), Some("Altamira"));
    }

    #[test]
    fn test_without_category_column() {
        let header = HEADER.trim_start_matches(',');
        let csv = format!("{}\n1,1,1,1,1,1,-3.2,-52.2\n", header);
        let records = read_incidents(csv.as_bytes(), "cpt.csv").unwrap();

        assert_eq!(records[0].category, None);
        assert_eq!(records[0].total_incidents(), 6);
    }

    #[test]
    fn test_empty_and_float_counts() {
        let csv = format!("{}\nAltamira,,2.0,,,,,-3.2,-52.2\n,1,0,0,0,0,0,-3.0,-52.0\n", HEADER);
        let records = read_incidents(csv.as_bytes(), "cpt.csv").unwrap();

        assert_eq!(records[0].incident_counts.murders, 2);
        assert_eq!(records[0].total_incidents(), 2);
        assert_eq!(records[1].category.as_deref(), Some(UNKNOWN_CATEGORY));
    }

    #[test]
    fn test_missing_columns() {
        let csv = ",Assassinatos,Latitude\nAltamira,1,-3.2\n";
        let err = read_incidents(csv.as_bytes(), "cpt.csv").unwrap_err();

        let message = err.to_string();
        assert!(message.contains("Áreas de conflitos"), "{}", message);
        assert!(message.contains("Longitude"), "{}", message);
    }

    #[test]
    fn test_invalid_count() {
        let csv = format!("{}\nAltamira,abc,0,0,0,0,0,-3.2,-52.2\n", HEADER);
        let err = read_incidents(csv.as_bytes(), "cpt.csv").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
    }

    #[test]
    fn test_row_without_coordinates_skipped() {
        let csv = format!(
            "{}\nAltamira,1,0,0,0,0,0,,-52.2\nMarabá,2,0,0,0,0,0,-5.37,\nAnapu,3,0,0,0,0,0,-3.5,-51.2\n",
            HEADER
        );
        let records = read_incidents(csv.as_bytes(), "cpt.csv").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category.as_deref(), Some("Anapu"));
    }

    #[test]
    fn test_invalid_coordinate_is_error() {
        let csv = format!("{}\nAltamira,1,0,0,0,0,0,norte,-52.2\n", HEADER);
        let err = read_incidents(csv.as_bytes(), "cpt.csv").unwrap_err();
        assert!(err.to_string().contains("invalid Latitude"), "{}", err);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(""), Some(0));
        assert_eq!(parse_count("7"), Some(7));
        assert_eq!(parse_count("7.0"), Some(7));
        assert_eq!(parse_count("7.5"), None);
        assert_eq!(parse_count("-1"), None);
    }
}
