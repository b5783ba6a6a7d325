//! Per-file record-level business rules.
//!
//! Each file name maps to a fixed list of rules; a rule inspects one row and
//! either passes or produces a message (the record validator prefixes the line
//! number). Adding a rule for a new file means adding a function and a table
//! entry, not another branch in the validator.

use std::collections::HashMap;

use crate::field_types::FieldType;

/// Read-only view over one CSV row, addressing cells by column name.
pub struct RowView<'a> {
    columns: &'a HashMap<&'a str, usize>,
    record: &'a csv::StringRecord,
}

impl<'a> RowView<'a> {
    pub fn new(columns: &'a HashMap<&'a str, usize>, record: &'a csv::StringRecord) -> Self {
        RowView { columns, record }
    }

    /// The raw value of `column`, the empty string when the column is absent
    /// from the header or the row is short.
    pub fn get(&self, column: &str) -> &'a str {
        self.columns
            .get(column)
            .and_then(|index| self.record.get(*index))
            .unwrap_or("")
    }

    /// Whether `column` carries a non-empty value on this row.
    pub fn has(&self, column: &str) -> bool {
        !self.get(column).is_empty()
    }
}

/// A record-level check: `None` when the row passes.
pub type BusinessRule = fn(&RowView) -> Option<String>;

/// The rules that apply to `file_name`'s rows.
pub fn rules_for(file_name: &str) -> &'static [BusinessRule] {
    match file_name {
        "stops.txt" => &[station_needs_coordinates, parent_station_location_type],
        "routes.txt" => &[short_or_long_name, route_color_format, route_text_color_format],
        "stop_times.txt" => &[stop_reference_present],
        "calendar.txt" => &[service_dates_ordered, at_least_one_weekday],
        "shapes.txt" => &[shape_dist_traveled_guard],
        "pathways.txt" => &[exit_not_bidirectional],
        "fare_attributes.txt" => &[transfers_in_range],
        "transfers.txt" => &[transfer_endpoints],
        _ => &[],
    }
}

fn station_needs_coordinates(row: &RowView) -> Option<String> {
    if row.get("location_type") == "1" && (!row.has("stop_lat") || !row.has("stop_lon")) {
        return Some(
            "Station (location_type=1) must have stop_lat and stop_lon coordinates".to_owned(),
        );
    }
    None
}

fn parent_station_location_type(row: &RowView) -> Option<String> {
    if row.has("parent_station") && row.has("location_type") && row.get("location_type") != "0" {
        return Some("location_type must be 0 or empty when parent_station is set".to_owned());
    }
    None
}

fn short_or_long_name(row: &RowView) -> Option<String> {
    if !row.has("route_short_name") && !row.has("route_long_name") {
        return Some(
            "At least one of route_short_name or route_long_name must be set".to_owned(),
        );
    }
    None
}

fn route_color_format(row: &RowView) -> Option<String> {
    let value = row.get("route_color");
    if !value.is_empty() && !FieldType::Color.validate(value, "routes.txt", "route_color") {
        return Some(format!("route_color must be a 6-digit hexadecimal color: {value}"));
    }
    None
}

fn route_text_color_format(row: &RowView) -> Option<String> {
    let value = row.get("route_text_color");
    if !value.is_empty() && !FieldType::Color.validate(value, "routes.txt", "route_text_color") {
        return Some(format!(
            "route_text_color must be a 6-digit hexadecimal color: {value}"
        ));
    }
    None
}

fn stop_reference_present(row: &RowView) -> Option<String> {
    if !row.has("stop_id") && !row.has("location_group_id") && !row.has("location_id") {
        return Some(
            "At least one of stop_id, location_group_id or location_id must be set".to_owned(),
        );
    }
    None
}

fn service_dates_ordered(row: &RowView) -> Option<String> {
    let (start, end) = (row.get("start_date"), row.get("end_date"));
    if let (Ok(start), Ok(end)) = (start.parse::<u32>(), end.parse::<u32>()) {
        if start > end {
            return Some("start_date must be before or equal to end_date".to_owned());
        }
    }
    None
}

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

fn at_least_one_weekday(row: &RowView) -> Option<String> {
    if WEEKDAYS.iter().any(|day| row.get(day) == "1") {
        return None;
    }
    Some("At least one weekday must be active (value 1)".to_owned())
}

// Redundant with the shape_dist_traveled type check, but kept as an explicit
// guard so a NaN can never slip through as "not a parse failure".
fn shape_dist_traveled_guard(row: &RowView) -> Option<String> {
    let value = row.get("shape_dist_traveled");
    if value.is_empty() {
        return None;
    }
    match value.parse::<f64>() {
        Ok(distance) if distance >= 0.0 => None,
        _ => Some(format!("shape_dist_traveled must be a non-negative number: {value}")),
    }
}

fn exit_not_bidirectional(row: &RowView) -> Option<String> {
    if row.get("pathway_mode") == "7" && row.get("is_bidirectional") == "1" {
        return Some("pathway_mode=7 (exit) cannot be bidirectional".to_owned());
    }
    None
}

fn transfers_in_range(row: &RowView) -> Option<String> {
    let value = row.get("transfers");
    if !value.is_empty() && !matches!(value, "0" | "1" | "2") {
        return Some(format!("transfers must be 0, 1, 2 or empty: {value}"));
    }
    None
}

fn transfer_endpoints(row: &RowView) -> Option<String> {
    let transfer_type = row.get("transfer_type");
    match transfer_type {
        "4" | "5" => {
            if !row.has("from_trip_id") || !row.has("to_trip_id") {
                return Some(format!(
                    "transfer_type {transfer_type} requires from_trip_id and to_trip_id"
                ));
            }
        }
        "1" | "2" | "3" => {
            if !row.has("from_stop_id") || !row.has("to_stop_id") {
                return Some(format!(
                    "transfer_type {transfer_type} requires from_stop_id and to_stop_id"
                ));
            }
        }
        _ => {}
    }
    None
}
