mod common;

use std::io::Write;

use airlog::RouteUpserter;
use airlog::route_import::{ImportPreview, read_routes_csv_file};
use common::reference_store;
use tempfile::NamedTempFile;

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write csv");
    file.flush().expect("flush csv");
    file
}

#[tokio::test]
async fn imports_csv_through_the_bulk_engine() {
    let file = csv_file(
        "airline_iata,origin_iata,destination_iata,flight_number\n\
         DL,ATL,LAX,DL296\n\
         DL,ATL,LAX,DL296\n\
         UA,SFO,JFK,UA15\n\
         ZZ,SFO,JFK,ZZ1\n",
    );

    let routes = read_routes_csv_file(file.path()).unwrap();
    let store = reference_store();
    let result = RouteUpserter::new(&store)
        .upsert_bulk(&routes.descriptors)
        .await;

    assert_eq!(result.upserted, 2);
    assert_eq!(result.skipped, 2);
    assert_eq!(result.errors, vec!["Unknown airline code: ZZ".to_string()]);
    assert_eq!(store.routes().unwrap().len(), 2);
}

#[test]
fn dry_run_preview_needs_no_store() {
    let file = csv_file(
        "airline_iata,origin_iata,destination_iata,flight_number\n\
         DL,ATL,LAX,DL296\n\
         DL,ATL,LAX,DL1170\n\
         DL,ATL,,DL9\n",
    );

    let preview = read_routes_csv_file(file.path()).unwrap().preview();

    assert_eq!(
        preview,
        ImportPreview {
            rows: 3,
            unique_routes: 2,
            skipped: 1,
        }
    );
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_routes_csv_file(&dir.path().join("routes.csv")).unwrap_err();
    assert!(err.to_string().contains("Failed to open"));
}
