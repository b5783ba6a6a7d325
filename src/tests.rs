use std::collections::HashSet;
use std::io::{Cursor, Read, Write};

use crate::error::Error;
use crate::feed::{open_feed, FeedFileSet, FeedSource};
use crate::file_validator::validate_records;
use crate::presence::{self, FactExtractor};
use crate::results::{FileValidationResult, ValidationRun};
use crate::validator::FeedValidator;
use crate::{report, schema, FieldType};

const AGENCY: &str = "agency_name,agency_url,agency_timezone\nBIBUS,http://www.bibus.fr,Europe/Paris\n";
const ROUTES: &str = "route_id,route_type,route_short_name\n1,3,10\n";
const TRIPS: &str = "route_id,service_id,trip_id\n1,service1,trip1\n";
const STOP_TIMES: &str =
    "trip_id,stop_sequence,stop_id,arrival_time,departure_time\ntrip1,1,stop1,6:00:00,6:00:30\n";
const STOPS: &str = "stop_id,stop_name,stop_lat,stop_lon\nstop1,Center,48.796058,3.5\n";
const CALENDAR: &str = "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\nservice1,1,0,0,0,0,1,1,20240101,20241231\n";

fn check_records(file_name: &str, content: &str) -> FileValidationResult {
    validate_records(Cursor::new(content.as_bytes().to_vec()), file_name, true)
}

/// An in-memory feed; a name listed without content reproduces a file that
/// exists in the archive but cannot be read.
struct MemoryFeed {
    names: Vec<String>,
    files: Vec<(String, Vec<u8>)>,
}

impl MemoryFeed {
    fn new(files: &[(&str, &str)]) -> Self {
        MemoryFeed {
            names: files.iter().map(|(name, _)| name.to_string()).collect(),
            files: files
                .iter()
                .map(|(name, content)| (name.to_string(), content.as_bytes().to_vec()))
                .collect(),
        }
    }
}

impl FeedSource for MemoryFeed {
    fn file_names(&self) -> &[String] {
        &self.names
    }

    fn open(&mut self, base_name: &str) -> Result<Box<dyn Read + '_>, Error> {
        match self.files.iter().find(|(name, _)| name == base_name) {
            Some((_, content)) => Ok(Box::new(Cursor::new(content.clone()))),
            None => Err(Error::MissingFile(base_name.to_owned())),
        }
    }
}

/// A fact extractor for presence tests that have no row content to inspect.
struct NoFacts;

impl FactExtractor for NoFacts {
    fn any_populated(&mut self, _file_name: &str, _column: &str) -> Result<bool, Error> {
        Ok(false)
    }

    fn distinct_values(
        &mut self,
        _file_name: &str,
        _column: &str,
    ) -> Result<HashSet<String>, Error> {
        Ok(HashSet::new())
    }
}

fn file_set(names: &[&str]) -> FeedFileSet {
    let names: Vec<String> = names.iter().map(|name| name.to_string()).collect();
    FeedFileSet::new(&names)
}

#[test]
fn empty_required_values_are_line_addressed() {
    let content = "agency_name,agency_url,agency_timezone\n\
                   BIBUS,http://www.bibus.fr,Europe/Paris\n\
                   ,http://www.example.org,Europe/Paris\n";
    let result = check_records("agency.txt", content);
    assert!(!result.is_valid);
    assert_eq!(
        vec!["Line 3: Required field empty: agency_name".to_owned()],
        result.errors
    );
    assert_eq!(3, result.total_lines);
}

#[test]
fn blank_rows_are_not_content() {
    let content = "stop_id,stop_name\nstop1,Center\n,\nstop2,North\n\n\n";
    let result = check_records("stops.txt", content);
    assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
    assert_eq!(3, result.total_lines);
}

#[test]
fn record_validation_is_idempotent() {
    let content = "route_id,route_type\n1,99\n,3\n";
    let first = check_records("routes.txt", content);
    let second = check_records("routes.txt", content);
    assert_eq!(first, second);
}

#[test]
fn missing_header_column_is_reported_once_per_row_plus_header() {
    let content = "agency_name,agency_url\nBIBUS,http://www.bibus.fr\n";
    let result = check_records("agency.txt", content);
    assert_eq!(
        vec![
            "Line 1: Missing required field: agency_timezone".to_owned(),
            "Line 2: Required field empty: agency_timezone".to_owned(),
        ],
        result.errors
    );
}

#[test]
fn unrecognized_header_column_is_a_warning_only() {
    let content = "route_id,service_id,trip_id,foo\n1,service1,trip1,bar\n";
    let result = check_records("trips.txt", content);
    assert!(result.is_valid);
    assert_eq!(
        vec!["Line 1: Unrecognized field: foo".to_owned()],
        result.warnings
    );
}

#[test]
fn type_mismatch_names_field_type_and_value() {
    let content = "route_id,route_type,route_long_name\n1,99,Main line\n";
    let result = check_records("routes.txt", content);
    assert_eq!(
        vec!["Line 2: Invalid value for route_type: expected Enum, got '99'".to_owned()],
        result.errors
    );
}

#[test]
fn bom_is_skipped_before_the_header() {
    let content = "\u{feff}agency_name,agency_url,agency_timezone\n\
                   BIBUS,http://www.bibus.fr,Europe/Paris\n";
    let result = check_records("agency.txt", content);
    assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
    assert!(result.warnings.is_empty(), "BOM leaked into a header name");
}

#[test]
fn untrimmed_fields_fail_numeric_checks_when_trimming_is_off() {
    let content = "stop_id,stop_lat\nstop1, 48.8\n";
    let trimmed = validate_records(Cursor::new(content.as_bytes().to_vec()), "stops.txt", true);
    assert!(trimmed.is_valid);
    let raw = validate_records(Cursor::new(content.as_bytes().to_vec()), "stops.txt", false);
    assert_eq!(
        vec!["Line 2: Invalid value for stop_lat: expected Latitude, got ' 48.8'".to_owned()],
        raw.errors
    );
}

#[test]
fn enum_domains_accept_exactly_their_literals() {
    for file in schema::known_files() {
        let file_schema = schema::schema_for(file).unwrap();
        for (column, field_type) in &file_schema.types {
            if *field_type != FieldType::Enum {
                continue;
            }
            let domain = schema::enum_domain(file, column)
                .unwrap_or_else(|| panic!("{file} {column} has no domain"));
            for literal in domain {
                assert!(
                    FieldType::Enum.validate(literal, file, column),
                    "{file} {column} rejected its own literal {literal:?}"
                );
            }
            assert!(
                !FieldType::Enum.validate("not-a-legal-value", file, column),
                "{file} {column} accepted a value outside its domain"
            );
        }
    }
}

#[test]
fn station_rows_need_coordinates() {
    let content = "stop_id,stop_lat,stop_lon,location_type,parent_station\n\
                   stop1,,,1,\n\
                   stop2,48.8,2.3,1,\n";
    let result = check_records("stops.txt", content);
    assert_eq!(
        vec![
            "Line 2: Station (location_type=1) must have stop_lat and stop_lon coordinates"
                .to_owned()
        ],
        result.errors
    );
}

#[test]
fn parent_station_forces_location_type_zero() {
    let content = "stop_id,stop_lat,stop_lon,location_type,parent_station\n\
                   stop3,48.8,2.3,2,stop1\n\
                   stop4,48.8,2.3,0,stop1\n\
                   stop5,48.8,2.3,,stop1\n";
    let result = check_records("stops.txt", content);
    assert_eq!(
        vec!["Line 2: location_type must be 0 or empty when parent_station is set".to_owned()],
        result.errors
    );
}

#[test]
fn routes_need_a_short_or_long_name() {
    let content = "route_id,route_type,route_short_name,route_long_name\n1,3,,\n";
    let result = check_records("routes.txt", content);
    assert_eq!(
        vec!["Line 2: At least one of route_short_name or route_long_name must be set".to_owned()],
        result.errors
    );
}

#[test]
fn route_colors_are_checked_by_rule_and_by_type() {
    let content = "route_id,route_type,route_short_name,route_color\n1,3,10,red\n";
    let result = check_records("routes.txt", content);
    assert_eq!(
        vec![
            "Line 2: Invalid value for route_color: expected Color, got 'red'".to_owned(),
            "Line 2: route_color must be a 6-digit hexadecimal color: red".to_owned(),
        ],
        result.errors
    );
}

#[test]
fn stop_times_need_some_location_reference() {
    let content = "trip_id,stop_sequence,stop_id,location_group_id,location_id\ntrip1,1,,,\n";
    let result = check_records("stop_times.txt", content);
    assert_eq!(
        vec![
            "Line 2: At least one of stop_id, location_group_id or location_id must be set"
                .to_owned()
        ],
        result.errors
    );
}

#[test]
fn calendar_rules_fire_per_row() {
    let content = "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\n\
                   service1,0,0,0,0,0,0,0,20240201,20240101\n";
    let result = check_records("calendar.txt", content);
    assert_eq!(
        vec![
            "Line 2: start_date must be before or equal to end_date".to_owned(),
            "Line 2: At least one weekday must be active (value 1)".to_owned(),
        ],
        result.errors
    );
}

#[test]
fn exit_pathways_may_not_be_bidirectional() {
    let content = "pathway_id,from_stop_id,to_stop_id,pathway_mode,is_bidirectional\n\
                   p1,a,b,7,1\n\
                   p2,a,b,7,0\n";
    let result = check_records("pathways.txt", content);
    assert_eq!(
        vec!["Line 2: pathway_mode=7 (exit) cannot be bidirectional".to_owned()],
        result.errors
    );
}

#[test]
fn trip_to_trip_transfers_need_both_trip_ids() {
    let content = "transfer_type,from_trip_id,to_trip_id\n4,,trip2\n";
    let result = check_records("transfers.txt", content);
    assert_eq!(1, result.errors.len());
    assert_eq!(
        "Line 2: transfer_type 4 requires from_trip_id and to_trip_id",
        result.errors[0]
    );
}

#[test]
fn stop_level_transfers_need_both_stop_ids() {
    let content = "transfer_type,from_stop_id,to_stop_id\n2,stop1,\n0,,\n";
    let result = check_records("transfers.txt", content);
    assert_eq!(
        vec!["Line 2: transfer_type 2 requires from_stop_id and to_stop_id".to_owned()],
        result.errors
    );
}

#[test]
fn fare_transfers_outside_range_fail_rule_and_enum() {
    let content = "fare_id,price,currency_type,payment_method,transfers\nf1,2.50,EUR,0,3\n";
    let result = check_records("fare_attributes.txt", content);
    assert!(result
        .errors
        .contains(&"Line 2: transfers must be 0, 1, 2 or empty: 3".to_owned()));
    assert!(result
        .errors
        .contains(&"Line 2: Invalid value for transfers: expected Enum, got '3'".to_owned()));
}

#[test]
fn shape_distances_may_not_be_negative() {
    let content = "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence,shape_dist_traveled\n\
                   sh1,48.8,2.3,0,-1\n";
    let result = check_records("shapes.txt", content);
    assert!(result
        .errors
        .contains(&"Line 2: shape_dist_traveled must be a non-negative number: -1".to_owned()));
}

#[test]
fn missing_mandatory_files_each_get_a_result() {
    let results = presence::evaluate(&file_set(&[]), &mut NoFacts);
    let names: Vec<&str> = results.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(
        vec![
            "agency.txt",
            "routes.txt",
            "trips.txt",
            "stop_times.txt",
            "stops.txt",
            "calendar.txt",
            "calendar_dates.txt",
        ],
        names
    );
    assert!(results.iter().all(|r| !r.is_valid));
}

#[test]
fn stops_and_calendar_obligations_without_fallbacks() {
    let results = presence::evaluate(
        &file_set(&["agency.txt", "routes.txt", "trips.txt", "stop_times.txt"]),
        &mut NoFacts,
    );
    let names: Vec<&str> = results.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(vec!["stops.txt", "calendar.txt", "calendar_dates.txt"], names);
}

#[test]
fn locations_geojson_satisfies_the_stops_obligation() {
    let results = presence::evaluate(
        &file_set(&[
            "agency.txt",
            "routes.txt",
            "trips.txt",
            "stop_times.txt",
            "locations.geojson",
            "calendar.txt",
        ]),
        &mut NoFacts,
    );
    assert!(results.is_empty(), "unexpected results: {results:?}");
}

#[test]
fn translations_require_feed_info() {
    let results = presence::evaluate(
        &file_set(&[
            "agency.txt",
            "routes.txt",
            "trips.txt",
            "stop_times.txt",
            "stops.txt",
            "calendar.txt",
            "translations.txt",
        ]),
        &mut NoFacts,
    );
    assert_eq!(1, results.len());
    assert_eq!("feed_info.txt", results[0].file_name);
    assert!(!results[0].is_valid);
}

#[test]
fn networks_are_forbidden_only_when_routes_use_network_id() {
    let base = [
        ("agency.txt", AGENCY),
        ("trips.txt", TRIPS),
        ("stop_times.txt", STOP_TIMES),
        ("stops.txt", STOPS),
        ("calendar.txt", CALENDAR),
        ("networks.txt", "network_id,network_name\nn1,North\n"),
    ];

    let with_network_id = "route_id,route_type,route_short_name,network_id\n1,3,10,n1\n";
    let mut files = base.to_vec();
    files.push(("routes.txt", with_network_id));
    let run = FeedValidator::default().validate(&mut MemoryFeed::new(&files));
    let forbidden: Vec<&FileValidationResult> = run
        .results
        .iter()
        .filter(|r| r.errors.iter().any(|e| e.contains("Conditionally forbidden")))
        .collect();
    assert_eq!(1, forbidden.len());
    assert_eq!("networks.txt", forbidden[0].file_name);

    let mut files = base.to_vec();
    files.push(("routes.txt", ROUTES));
    let run = FeedValidator::default().validate(&mut MemoryFeed::new(&files));
    assert!(
        run.is_valid(),
        "networks.txt was flagged without network_id usage: {:?}",
        run.results
    );
}

#[test]
fn unreadable_routes_degrades_the_networks_rule_to_a_warning() {
    let mut feed = MemoryFeed::new(&[
        ("agency.txt", AGENCY),
        ("trips.txt", TRIPS),
        ("stop_times.txt", STOP_TIMES),
        ("stops.txt", STOPS),
        ("calendar.txt", CALENDAR),
        ("networks.txt", "network_id\nn1\n"),
    ]);
    // routes.txt is discovered but cannot be opened
    feed.names.push("routes.txt".to_owned());
    let run = FeedValidator::default().validate(&mut feed);
    let warning = run
        .results
        .iter()
        .find(|r| r.file_name == "networks.txt" && !r.warnings.is_empty())
        .expect("no degraded networks result");
    assert!(warning.is_valid);
    assert!(warning.warnings[0].contains("may be conditionally forbidden"));
}

#[test]
fn elevator_pathways_require_levels() {
    let pathways = "pathway_id,from_stop_id,to_stop_id,pathway_mode,is_bidirectional\np1,a,b,5,1\n";
    let base = [
        ("agency.txt", AGENCY),
        ("routes.txt", ROUTES),
        ("trips.txt", TRIPS),
        ("stop_times.txt", STOP_TIMES),
        ("stops.txt", STOPS),
        ("calendar.txt", CALENDAR),
        ("pathways.txt", pathways),
    ];

    let run = FeedValidator::default().validate(&mut MemoryFeed::new(&base));
    let levels = run
        .results
        .iter()
        .find(|r| r.file_name == "levels.txt")
        .expect("no levels.txt result");
    assert!(!levels.is_valid);
    assert!(levels.errors[0].contains("pathway_mode=5"));

    let mut files = base.to_vec();
    files.push(("levels.txt", "level_id,level_index\nL1,0\n"));
    let run = FeedValidator::default().validate(&mut MemoryFeed::new(&files));
    assert!(run.is_valid(), "levels present but still flagged: {:?}", run.results);
}

#[test]
fn non_elevator_pathways_do_not_require_levels() {
    let pathways = "pathway_id,from_stop_id,to_stop_id,pathway_mode,is_bidirectional\np1,a,b,1,1\n";
    let run = FeedValidator::default().validate(&mut MemoryFeed::new(&[
        ("agency.txt", AGENCY),
        ("routes.txt", ROUTES),
        ("trips.txt", TRIPS),
        ("stop_times.txt", STOP_TIMES),
        ("stops.txt", STOPS),
        ("calendar.txt", CALENDAR),
        ("pathways.txt", pathways),
    ]));
    assert!(run.results.iter().all(|r| r.file_name != "levels.txt"));
}

#[test]
fn unknown_files_are_advisory_at_most() {
    let run = FeedValidator::default().validate(&mut MemoryFeed::new(&[
        ("agency.txt", AGENCY),
        ("routes.txt", ROUTES),
        ("trips.txt", TRIPS),
        ("stop_times.txt", STOP_TIMES),
        ("stops.txt", STOPS),
        ("calendar.txt", CALENDAR),
        ("README.md", "hello"),
        ("notes.txt", "a,b\n1,2\n"),
        ("locations.geojson", "{}"),
    ]));
    assert!(run.is_valid());
    let readme = run
        .results
        .iter()
        .find(|r| r.file_name == "README.md")
        .expect("no README.md result");
    assert_eq!(
        vec!["File is not recognized by the GTFS standard".to_owned()],
        readme.warnings
    );
    // Unknown .txt and .geojson names produce no result at all
    assert!(run.results.iter().all(|r| r.file_name != "notes.txt"));
    assert!(run.results.iter().all(|r| r.file_name != "locations.geojson"));
}

#[test]
fn a_clean_feed_produces_only_valid_results() {
    let run = FeedValidator::default().validate(&mut MemoryFeed::new(&[
        ("agency.txt", AGENCY),
        ("routes.txt", ROUTES),
        ("trips.txt", TRIPS),
        ("stop_times.txt", STOP_TIMES),
        ("stops.txt", STOPS),
        ("calendar.txt", CALENDAR),
    ]));
    assert!(run.is_valid(), "unexpected findings: {:?}", run.results);
    assert_eq!(6, run.results.len());
    assert_eq!(0, run.total_errors());
    assert_eq!(0, run.total_warnings());
    assert!(run.results.iter().all(|r| r.total_lines == 2));
}

#[test]
fn zip_and_directory_feeds_validate_identically() {
    let files = [
        ("agency.txt", AGENCY),
        ("calendar.txt", CALENDAR),
        ("routes.txt", ROUTES),
        ("stop_times.txt", STOP_TIMES),
        ("stops.txt", STOPS),
        ("trips.txt", TRIPS),
    ];

    let feed_dir = tempfile::tempdir().expect("no temp dir");
    for (name, content) in &files {
        std::fs::write(feed_dir.path().join(name), content).expect("could not write feed file");
    }

    let zip_dir = tempfile::tempdir().expect("no temp dir");
    let zip_path = zip_dir.path().join("feed.zip");
    let mut zip = zip::ZipWriter::new(std::fs::File::create(&zip_path).expect("no zip file"));
    for (name, content) in &files {
        zip.start_file(*name, zip::write::FileOptions::default())
            .expect("could not start zip entry");
        zip.write_all(content.as_bytes()).expect("could not write zip entry");
    }
    zip.finish().expect("could not finish zip");

    let mut from_dir = open_feed(feed_dir.path()).expect("could not open directory feed");
    let mut from_zip = open_feed(&zip_path).expect("could not open zip feed");
    let dir_run = FeedValidator::default().validate(&mut *from_dir);
    let zip_run = FeedValidator::default().validate(&mut *from_zip);
    assert!(dir_run.is_valid());
    assert_eq!(dir_run, zip_run);
}

#[test]
fn opening_a_missing_path_is_the_only_whole_run_failure() {
    match open_feed("no/such/feed") {
        Err(Error::NotFileNorDirectory(path)) => assert_eq!("no/such/feed", path),
        other => panic!("expected NotFileNorDirectory, got {other:?}"),
    }
}

#[test]
fn report_orders_results_canonically() {
    let run = ValidationRun {
        results: vec![
            FileValidationResult::file_warning("zzz.bin", "odd file".to_owned()),
            FileValidationResult::file_error(
                "routes.txt",
                "Missing required file: routes.txt".to_owned(),
            ),
            FileValidationResult::file_error(
                "agency.txt",
                "Missing required file: agency.txt".to_owned(),
            ),
            FileValidationResult::file_warning("aaa.bin", "odd file".to_owned()),
        ],
    };
    let names: Vec<&str> = report::ordered_results(&run)
        .iter()
        .map(|r| r.file_name.as_str())
        .collect();
    assert_eq!(vec!["agency.txt", "routes.txt", "aaa.bin", "zzz.bin"], names);
}

#[test]
fn report_renders_every_result_once() {
    let run = ValidationRun {
        results: vec![
            FileValidationResult::file_error(
                "agency.txt",
                "Missing required file: agency.txt".to_owned(),
            ),
            FileValidationResult {
                file_name: "routes.txt".to_owned(),
                is_valid: true,
                total_lines: 2,
                errors: Vec::new(),
                warnings: vec!["Line 1: Unrecognized field: foo".to_owned()],
            },
        ],
    };
    let rendered = report::generate_report(&run, "demo.zip");
    assert!(rendered.contains("Feed: demo.zip"));
    assert!(rendered.contains("OVERALL STATUS: INVALID - critical errors were found"));
    assert!(rendered.contains("1. FILE: agency.txt"));
    assert!(rendered.contains("2. FILE: routes.txt"));
    assert!(rendered.contains("  1. Missing required file: agency.txt"));
    assert!(rendered.contains("  1. Line 1: Unrecognized field: foo"));
    assert_eq!(1, rendered.matches("FILE: agency.txt").count());
}

#[test]
fn report_is_saved_under_the_feed_stem() {
    let dir = tempfile::tempdir().expect("no temp dir");
    let path = report::save_report(
        "report body\n",
        std::path::Path::new("city_feed.zip"),
        Some(dir.path()),
    )
    .expect("could not save report");
    assert!(path.ends_with("city_feed_validation_report.txt"));
    let content = std::fs::read_to_string(path).expect("report not written");
    assert_eq!("report body\n", content);
}

#[test]
fn validation_runs_round_trip_through_json() {
    let run = FeedValidator::default().validate(&mut MemoryFeed::new(&[
        ("agency.txt", AGENCY),
        ("routes.txt", "route_id,route_type\n1,99\n"),
        ("trips.txt", TRIPS),
        ("stop_times.txt", STOP_TIMES),
        ("stops.txt", STOPS),
        ("calendar.txt", CALENDAR),
    ]));
    let json = serde_json::to_string(&run).expect("could not serialize run");
    let parsed: ValidationRun = serde_json::from_str(&json).expect("could not parse run");
    assert_eq!(run, parsed);
}
