//! Reading route descriptors from CSV files for bulk import

use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::route_batch::dedupe_routes;
use crate::routes::RouteDescriptor;

const REQUIRED_COLUMNS: [&str; 3] = ["airline_iata", "origin_iata", "destination_iata"];

/// Route descriptors read from one CSV file
#[derive(Debug, Default)]
pub struct RouteCsv {
    pub descriptors: Vec<RouteDescriptor>,
    /// Rows the CSV reader could not turn into a descriptor
    pub rejected_rows: usize,
}

/// What an import would do, computed without touching the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPreview {
    pub rows: usize,
    pub unique_routes: usize,
    pub skipped: usize,
}

impl RouteCsv {
    pub fn preview(&self) -> ImportPreview {
        let batch = dedupe_routes(&self.descriptors);
        ImportPreview {
            rows: self.descriptors.len() + self.rejected_rows,
            unique_routes: batch.len(),
            skipped: batch.skipped + self.rejected_rows,
        }
    }
}

/// Read descriptors from CSV with a header row.
///
/// The header must name `airline_iata`, `origin_iata`, `destination_iata` and
/// one of `flight_number` or `flight_num`. Other columns are ignored. Rows
/// with empty cells are kept so the engine can count them as skipped.
pub fn read_routes_csv<R: Read>(reader: R) -> Result<RouteCsv> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("Failed to read CSV header row")?
        .clone();
    let has_column = |name: &str| headers.iter().any(|header| header == name);

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|column| !has_column(*column))
        .collect();
    if !missing.is_empty() {
        bail!("CSV is missing required columns: {}", missing.join(", "));
    }
    if !has_column("flight_number") && !has_column("flight_num") {
        bail!("CSV is missing required column: flight_number");
    }

    let mut routes = RouteCsv::default();
    for (index, record) in csv_reader.deserialize::<RouteDescriptor>().enumerate() {
        match record {
            Ok(descriptor) => routes.descriptors.push(descriptor),
            Err(e) => {
                // Header is line 1
                warn!("Skipping CSV line {}: {}", index + 2, e);
                metrics::counter!("routes.import.rows_rejected_total").increment(1);
                routes.rejected_rows += 1;
            }
        }
    }

    Ok(routes)
}

pub fn read_routes_csv_file(path: &Path) -> Result<RouteCsv> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_routes_csv(file).with_context(|| format!("Failed to read routes from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_rows_and_alias_column() {
        let csv = "airline_iata,origin_iata,destination_iata,flight_num,notes\n\
                   DL,ATL,LAX,DL296,red-eye\n\
                   UA, SFO ,LAX,UA1,\n";

        let routes = read_routes_csv(csv.as_bytes()).unwrap();

        assert_eq!(routes.rejected_rows, 0);
        assert_eq!(routes.descriptors.len(), 2);
        let second = routes.descriptors[1].validate().unwrap();
        assert_eq!(second.origin_iata, "SFO");
        assert_eq!(second.flight_number, "UA1");
    }

    #[test]
    fn test_missing_columns_rejected() {
        let err = read_routes_csv("airline_iata,flight_number\nDL,DL1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("origin_iata"));

        let err = read_routes_csv("airline_iata,origin_iata,destination_iata\nDL,ATL,LAX\n".as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("flight_number"));
    }

    #[test]
    fn test_ragged_rows_are_rejected_not_fatal() {
        let csv = "airline_iata,origin_iata,destination_iata,flight_number\n\
                   DL,ATL,LAX,DL296\n\
                   DL,ATL\n";

        let routes = read_routes_csv(csv.as_bytes()).unwrap();
        assert_eq!(routes.descriptors.len(), 1);
        assert_eq!(routes.rejected_rows, 1);
    }

    #[test]
    fn test_preview_counts_duplicates_and_blanks() {
        let csv = "airline_iata,origin_iata,destination_iata,flight_number\n\
                   DL,ATL,LAX,DL296\n\
                   DL,ATL,LAX,DL296\n\
                   DL,,LAX,DL296\n\
                   DL,ATL\n";

        let preview = read_routes_csv(csv.as_bytes()).unwrap().preview();
        assert_eq!(
            preview,
            ImportPreview {
                rows: 4,
                unique_routes: 1,
                skipped: 3,
            }
        );
    }
}
