//! CSV loader tests: column mapping, header offsets, and error reporting.

use std::io::Cursor;

use mtsp_planner::error::LoadError;
use mtsp_planner::loader::{load_cities, load_records, load_salesmen, CsvColumns};
use mtsp_planner::point::Point3;
use mtsp_planner::solver::MultiTsp;
use mtsp_planner::traits::{Metadata, Position};

const WGS84_A: f64 = 6_378_137.0;

#[test]
fn loads_cities_with_default_columns() {
    let data = "\
name,lat,lon,alt,time
depot,0.0,0.0,0.0,2024-06-01 08:00:00
site-a,0.0,90.0,0.0,2024-06-01 08:05:00
";
    let cities = load_cities(Cursor::new(data), &CsvColumns::default()).unwrap();

    assert_eq!(cities.len(), 2);
    assert_eq!(cities[0].name(), Some("depot"));
    assert!(!cities[0].visited());

    // (0, 0) sits on the x axis, (0, 90E) on the y axis, both at Earth radius.
    assert!((cities[0].position().x - WGS84_A).abs() < 1e-6);
    assert!((cities[1].position().y - WGS84_A).abs() < 1e-6);
}

#[test]
fn skips_rows_before_the_header() {
    let data = "\
exported by fleet-tool v2
name,lat,lon,alt,time
a,10.0,20.0,0.0,
";
    let columns = CsvColumns {
        header_row: 1,
        ..CsvColumns::default()
    };
    let cities = load_cities(Cursor::new(data), &columns).unwrap();
    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].name(), Some("a"));
}

#[test]
fn maps_renamed_columns() {
    let data = "\
Latitude,Longitude,Height,Label
1.5,2.5,100,tower
";
    let columns = CsvColumns {
        header_row: 0,
        lat: "Latitude".to_string(),
        lon: "Longitude".to_string(),
        alt: Some("Height".to_string()),
        name: Some("Label".to_string()),
        time: None,
        time_format: "%Y-%m-%d %H:%M:%S".to_string(),
    };
    let cities = load_cities(Cursor::new(data), &columns).unwrap();
    assert_eq!(cities[0].name(), Some("tower"));
}

#[test]
fn records_carry_parsed_utc_metadata() {
    let data = "\
name,lat,lon,alt,time
a,0.0,0.0,0.0,1970-01-01 00:00:01
b,0.0,0.0,0.0,
";
    let records = load_records(Cursor::new(data), &CsvColumns::default()).unwrap();

    assert_eq!(records[0].utc_ms(), Some(1_000));
    assert_eq!(records[1].utc_ms(), None);
    assert_eq!(records[0].duration_ms(), 0);
    assert_eq!(records[0].orientation(), Point3::ORIGIN);
}

#[test]
fn missing_column_is_reported_by_name() {
    let data = "\
name,lat,alt,time
a,1.0,0.0,
";
    let err = load_cities(Cursor::new(data), &CsvColumns::default()).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn(column) if column == "lon"));
}

#[test]
fn malformed_coordinate_is_reported_with_row() {
    let data = "\
name,lat,lon,alt,time
a,1.0,2.0,0.0,
b,not-a-number,2.0,0.0,
";
    let err = load_cities(Cursor::new(data), &CsvColumns::default()).unwrap_err();
    match err {
        LoadError::InvalidField { row, field, value } => {
            assert_eq!(row, 2);
            assert_eq!(field, "latitude");
            assert_eq!(value, "not-a-number");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn header_beyond_input_is_an_error() {
    let columns = CsvColumns {
        header_row: 5,
        ..CsvColumns::default()
    };
    let err = load_cities(Cursor::new("a,b\n1,2\n"), &columns).unwrap_err();
    assert!(matches!(err, LoadError::MissingHeader(5)));
}

#[test]
fn loaded_fleet_feeds_the_planner() {
    // Two close-together sites and one salesman starting near them; the
    // loaded data runs through the full pipeline.
    let city_data = "\
name,lat,lon,alt,time
near,0.0,0.001,0.0,
far,0.0,0.002,0.0,
";
    let salesman_data = "\
name,lat,lon,alt,time
unit-1,0.0,0.0,0.0,
";
    let cities = load_cities(Cursor::new(city_data), &CsvColumns::default()).unwrap();
    let salesmen = load_salesmen(Cursor::new(salesman_data), &CsvColumns::default(), 10.0).unwrap();

    // Sanity: the two sites are ~111 m apart per 0.001 degree of longitude.
    let gap = cities[0].position().distance(cities[1].position());
    assert!(gap > 100.0 && gap < 130.0, "unexpected site gap {gap}");

    let mut planner = MultiTsp::new(salesmen, cities);
    planner.compute();

    assert!(planner.all_cities_visited());
    let times = planner.visit_times();
    assert!(times[0] < times[1], "nearer site should be visited first");
}
