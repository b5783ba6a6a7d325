//! The compiled-in GTFS file schemas.
//!
//! One [FileSchema] per file name the standard knows, carrying its required
//! and optional columns and the [FieldType] of every column. Files without a
//! schema (such as `locations.geojson`) are exempt from record validation;
//! their presence may still matter to the presence rules.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::field_types::FieldType;

/// Files that every feed must contain.
pub const MANDATORY_FILES: [&str; 4] = ["agency.txt", "routes.txt", "trips.txt", "stop_times.txt"];

/// Files that are required only when a condition over the rest of the feed
/// holds. The conditions themselves live in the presence rule engine.
pub const CONDITIONALLY_MANDATORY_FILES: [&str; 5] = [
    "stops.txt",
    "calendar.txt",
    "calendar_dates.txt",
    "levels.txt",
    "feed_info.txt",
];

/// The column schema of one GTFS file.
#[derive(Debug)]
pub struct FileSchema {
    /// Columns that must appear in the header and be populated on every row
    pub required: &'static [&'static str],
    /// Columns the standard knows but does not require
    pub optional: &'static [&'static str],
    /// The semantic type of each known column
    pub types: HashMap<&'static str, FieldType>,
    /// Literal domains of the Enum-typed columns, keyed per file so the same
    /// field name can never pick up another file's domain
    enums: HashMap<&'static str, &'static [&'static str]>,
}

impl FileSchema {
    /// Whether `column` is known to this schema, required or optional.
    pub fn is_known_column(&self, column: &str) -> bool {
        self.required.contains(&column) || self.optional.contains(&column)
    }
}

/// Looks up the schema of a file by its base name.
pub fn schema_for(file_name: &str) -> Option<&'static FileSchema> {
    FILE_SCHEMAS.get(file_name)
}

/// The literal domain of an Enum-typed column, or `None` when the column has
/// no declared domain (it then passes unconstrained).
pub fn enum_domain(file_name: &str, field_name: &str) -> Option<&'static [&'static str]> {
    FILE_SCHEMAS
        .get(file_name)
        .and_then(|schema| schema.enums.get(field_name))
        .copied()
}

/// The literal values each Enum-typed field may take. The `transfers` domain
/// lists the empty string because the standard spells out that emptiness means
/// unlimited transfers; the record validator never reaches the domain for an
/// empty value anyway.
fn field_literals(field: &str) -> Option<&'static [&'static str]> {
    Some(match field {
        "route_type" => &["0", "1", "2", "3", "4", "5", "6", "7", "11", "12"],
        "direction_id" => &["0", "1"],
        "wheelchair_accessible" => &["0", "1", "2"],
        "bikes_allowed" => &["0", "1", "2"],
        "cars_allowed" => &["0", "1", "2"],
        "pickup_type" => &["0", "1", "2", "3"],
        "drop_off_type" => &["0", "1", "2", "3"],
        "timepoint" => &["0", "1"],
        "continuous_pickup" => &["0", "1", "2", "3"],
        "continuous_drop_off" => &["0", "1", "2", "3"],
        "payment_method" => &["0", "1"],
        "transfers" => &["0", "1", "2", ""],
        "pathway_mode" => &["1", "2", "3", "4", "5", "6", "7"],
        "is_bidirectional" => &["0", "1"],
        "location_type" => &["0", "1", "2", "3", "4"],
        "wheelchair_boarding" => &["0", "1", "2"],
        "is_producer" => &["0", "1"],
        "is_operator" => &["0", "1"],
        "is_authority" => &["0", "1"],
        "exact_times" => &["0", "1"],
        "transfer_type" => &["0", "1", "2", "3", "4", "5"],
        "booking_type" => &["0", "1", "2"],
        "is_default_fare_category" => &["0", "1"],
        "fare_media_type" => &["0", "1", "2", "3", "4"],
        "fare_transfer_type" => &["0", "1", "2"],
        "duration_limit_type" => &["0", "1", "2", "3"],
        "cemv_support" => &["0", "1", "2"],
        "table_name" => &[
            "agency",
            "stops",
            "routes",
            "trips",
            "stop_times",
            "pathways",
            "levels",
            "feed_info",
            "attributions",
        ],
        "stop_access" => &["0", "1"],
        "exception_type" => &["1", "2"],
        "monday" | "tuesday" | "wednesday" | "thursday" | "friday" | "saturday" | "sunday" => {
            &["0", "1"]
        }
        _ => return None,
    })
}

fn schema(
    required: &'static [&'static str],
    optional: &'static [&'static str],
    types: &[(&'static str, FieldType)],
) -> FileSchema {
    let enums = types
        .iter()
        .filter(|(_, field_type)| *field_type == FieldType::Enum)
        .filter_map(|(column, _)| field_literals(column).map(|literals| (*column, literals)))
        .collect();
    FileSchema {
        required,
        optional,
        types: types.iter().copied().collect(),
        enums,
    }
}

lazy_static! {
    static ref FILE_SCHEMAS: HashMap<&'static str, FileSchema> = {
        use FieldType::*;
        let mut schemas = HashMap::new();
        schemas.insert(
            "agency.txt",
            schema(
                &["agency_name", "agency_url", "agency_timezone"],
                &[
                    "agency_id",
                    "agency_lang",
                    "agency_phone",
                    "agency_fare_url",
                    "agency_email",
                    "cemv_support",
                ],
                &[
                    ("agency_id", Id),
                    ("agency_name", Text),
                    ("agency_url", Url),
                    ("agency_timezone", Timezone),
                    ("agency_lang", LanguageCode),
                    ("agency_phone", Phone),
                    ("agency_fare_url", Url),
                    ("agency_email", Email),
                    ("cemv_support", Enum),
                ],
            ),
        );
        schemas.insert(
            "stops.txt",
            schema(
                &["stop_id"],
                &[
                    "stop_code",
                    "stop_name",
                    "tts_stop_name",
                    "stop_desc",
                    "stop_lat",
                    "stop_lon",
                    "zone_id",
                    "stop_url",
                    "location_type",
                    "parent_station",
                    "stop_timezone",
                    "wheelchair_boarding",
                    "level_id",
                    "platform_code",
                    "stop_access",
                ],
                &[
                    ("stop_id", Id),
                    ("stop_code", Text),
                    ("stop_name", Text),
                    ("tts_stop_name", Text),
                    ("stop_desc", Text),
                    ("stop_lat", Latitude),
                    ("stop_lon", Longitude),
                    ("zone_id", Id),
                    ("stop_url", Url),
                    ("location_type", Enum),
                    ("parent_station", Id),
                    ("stop_timezone", Timezone),
                    ("wheelchair_boarding", Enum),
                    ("level_id", Id),
                    ("platform_code", Text),
                    ("stop_access", Enum),
                ],
            ),
        );
        schemas.insert(
            "routes.txt",
            schema(
                &["route_id", "route_type"],
                &[
                    "agency_id",
                    "route_short_name",
                    "route_long_name",
                    "route_desc",
                    "route_url",
                    "route_color",
                    "route_text_color",
                    "route_sort_order",
                    "continuous_pickup",
                    "continuous_drop_off",
                    "network_id",
                    "cemv_support",
                ],
                &[
                    ("route_id", Id),
                    ("agency_id", Id),
                    ("route_short_name", Text),
                    ("route_long_name", Text),
                    ("route_desc", Text),
                    ("route_type", Enum),
                    ("route_url", Url),
                    ("route_color", Color),
                    ("route_text_color", Color),
                    ("route_sort_order", NonNegativeInteger),
                    ("continuous_pickup", Enum),
                    ("continuous_drop_off", Enum),
                    ("network_id", Id),
                    ("cemv_support", Enum),
                ],
            ),
        );
        schemas.insert(
            "trips.txt",
            schema(
                &["route_id", "service_id", "trip_id"],
                &[
                    "trip_headsign",
                    "trip_short_name",
                    "direction_id",
                    "block_id",
                    "shape_id",
                    "wheelchair_accessible",
                    "bikes_allowed",
                    "cars_allowed",
                ],
                &[
                    ("route_id", Id),
                    ("service_id", Id),
                    ("trip_id", Id),
                    ("trip_headsign", Text),
                    ("trip_short_name", Text),
                    ("direction_id", Enum),
                    ("block_id", Id),
                    ("shape_id", Id),
                    ("wheelchair_accessible", Enum),
                    ("bikes_allowed", Enum),
                    ("cars_allowed", Enum),
                ],
            ),
        );
        schemas.insert(
            "stop_times.txt",
            schema(
                &["trip_id", "stop_sequence"],
                &[
                    "arrival_time",
                    "departure_time",
                    "stop_id",
                    "location_group_id",
                    "location_id",
                    "stop_headsign",
                    "start_pickup_drop_off_window",
                    "end_pickup_drop_off_window",
                    "pickup_type",
                    "drop_off_type",
                    "continuous_pickup",
                    "continuous_drop_off",
                    "shape_dist_traveled",
                    "timepoint",
                    "pickup_booking_rule_id",
                    "drop_off_booking_rule_id",
                ],
                &[
                    ("trip_id", Id),
                    ("arrival_time", Time),
                    ("departure_time", Time),
                    ("stop_id", Id),
                    ("stop_sequence", NonNegativeInteger),
                    ("location_group_id", Id),
                    ("location_id", Id),
                    ("stop_headsign", Text),
                    ("start_pickup_drop_off_window", Time),
                    ("end_pickup_drop_off_window", Time),
                    ("pickup_type", Enum),
                    ("drop_off_type", Enum),
                    ("continuous_pickup", Enum),
                    ("continuous_drop_off", Enum),
                    ("shape_dist_traveled", NonNegativeFloat),
                    ("timepoint", Enum),
                    ("pickup_booking_rule_id", Id),
                    ("drop_off_booking_rule_id", Id),
                ],
            ),
        );
        schemas.insert(
            "calendar.txt",
            schema(
                &[
                    "service_id",
                    "monday",
                    "tuesday",
                    "wednesday",
                    "thursday",
                    "friday",
                    "saturday",
                    "sunday",
                    "start_date",
                    "end_date",
                ],
                &[],
                &[
                    ("service_id", Id),
                    ("monday", Enum),
                    ("tuesday", Enum),
                    ("wednesday", Enum),
                    ("thursday", Enum),
                    ("friday", Enum),
                    ("saturday", Enum),
                    ("sunday", Enum),
                    ("start_date", Date),
                    ("end_date", Date),
                ],
            ),
        );
        schemas.insert(
            "calendar_dates.txt",
            schema(
                &["service_id", "date", "exception_type"],
                &[],
                &[
                    ("service_id", Id),
                    ("date", Date),
                    ("exception_type", Enum),
                ],
            ),
        );
        schemas.insert(
            "fare_attributes.txt",
            schema(
                &["fare_id", "price", "currency_type", "payment_method", "transfers"],
                &["agency_id", "transfer_duration"],
                &[
                    ("fare_id", Id),
                    ("price", Currency),
                    ("currency_type", CurrencyCode),
                    ("payment_method", Enum),
                    ("transfers", Enum),
                    ("agency_id", Id),
                    ("transfer_duration", NonNegativeInteger),
                ],
            ),
        );
        schemas.insert(
            "fare_rules.txt",
            schema(
                &["fare_id"],
                &["route_id", "origin_id", "destination_id", "contains_id"],
                &[
                    ("fare_id", Id),
                    ("route_id", Id),
                    ("origin_id", Id),
                    ("destination_id", Id),
                    ("contains_id", Id),
                ],
            ),
        );
        schemas.insert(
            "timeframes.txt",
            schema(
                &["timeframe_group_id", "service_id"],
                &["start_time", "end_time"],
                &[
                    ("timeframe_group_id", Id),
                    ("service_id", Id),
                    ("start_time", LocalTime),
                    ("end_time", LocalTime),
                ],
            ),
        );
        schemas.insert(
            "rider_categories.txt",
            schema(
                &[
                    "rider_category_id",
                    "rider_category_name",
                    "is_default_fare_category",
                ],
                &["eligibility_url"],
                &[
                    ("rider_category_id", Id),
                    ("rider_category_name", Text),
                    ("is_default_fare_category", Enum),
                    ("eligibility_url", Url),
                ],
            ),
        );
        schemas.insert(
            "fare_media.txt",
            schema(
                &["fare_media_id", "fare_media_type"],
                &["fare_media_name"],
                &[
                    ("fare_media_id", Id),
                    ("fare_media_type", Enum),
                    ("fare_media_name", Text),
                ],
            ),
        );
        schemas.insert(
            "fare_products.txt",
            schema(
                &["fare_product_id", "amount", "currency"],
                &["fare_product_name", "rider_category_id", "fare_media_id"],
                &[
                    ("fare_product_id", Id),
                    ("amount", Currency),
                    ("currency", CurrencyCode),
                    ("fare_product_name", Text),
                    ("rider_category_id", Id),
                    ("fare_media_id", Id),
                ],
            ),
        );
        schemas.insert(
            "fare_leg_rules.txt",
            schema(
                &["fare_product_id"],
                &[
                    "leg_group_id",
                    "network_id",
                    "from_area_id",
                    "to_area_id",
                    "from_timeframe_group_id",
                    "to_timeframe_group_id",
                    "rule_priority",
                ],
                &[
                    ("leg_group_id", Id),
                    ("network_id", Id),
                    ("from_area_id", Id),
                    ("to_area_id", Id),
                    ("from_timeframe_group_id", Id),
                    ("to_timeframe_group_id", Id),
                    ("fare_product_id", Id),
                    ("rule_priority", NonNegativeInteger),
                ],
            ),
        );
        schemas.insert(
            "fare_leg_join_rules.txt",
            schema(
                &["from_network_id", "to_network_id"],
                &["from_stop_id", "to_stop_id"],
                &[
                    ("from_network_id", Id),
                    ("to_network_id", Id),
                    ("from_stop_id", Id),
                    ("to_stop_id", Id),
                ],
            ),
        );
        schemas.insert(
            "fare_transfer_rules.txt",
            schema(
                &["fare_transfer_type"],
                &[
                    "from_leg_group_id",
                    "to_leg_group_id",
                    "fare_product_id",
                    "transfer_count",
                    "duration_limit",
                    "duration_limit_type",
                ],
                &[
                    ("from_leg_group_id", Id),
                    ("to_leg_group_id", Id),
                    ("fare_product_id", Id),
                    ("transfer_count", NonNegativeInteger),
                    ("duration_limit", NonNegativeInteger),
                    ("duration_limit_type", Enum),
                    ("fare_transfer_type", Enum),
                ],
            ),
        );
        schemas.insert(
            "areas.txt",
            schema(
                &["area_id"],
                &["area_name"],
                &[("area_id", Id), ("area_name", Text)],
            ),
        );
        schemas.insert(
            "stop_areas.txt",
            schema(
                &["area_id", "stop_id"],
                &[],
                &[("area_id", Id), ("stop_id", Id)],
            ),
        );
        schemas.insert(
            "networks.txt",
            schema(
                &["network_id"],
                &["network_name"],
                &[("network_id", Id), ("network_name", Text)],
            ),
        );
        schemas.insert(
            "route_networks.txt",
            schema(
                &["network_id", "route_id"],
                &[],
                &[("network_id", Id), ("route_id", Id)],
            ),
        );
        schemas.insert(
            "shapes.txt",
            schema(
                &["shape_id", "shape_pt_lat", "shape_pt_lon", "shape_pt_sequence"],
                &["shape_dist_traveled"],
                &[
                    ("shape_id", Id),
                    ("shape_pt_lat", Latitude),
                    ("shape_pt_lon", Longitude),
                    ("shape_pt_sequence", NonNegativeInteger),
                    ("shape_dist_traveled", NonNegativeFloat),
                ],
            ),
        );
        schemas.insert(
            "frequencies.txt",
            schema(
                &["trip_id", "start_time", "end_time", "headway_secs"],
                &["exact_times"],
                &[
                    ("trip_id", Id),
                    ("start_time", Time),
                    ("end_time", Time),
                    ("headway_secs", NonNegativeInteger),
                    ("exact_times", Enum),
                ],
            ),
        );
        schemas.insert(
            "transfers.txt",
            schema(
                &["transfer_type"],
                &[
                    "from_stop_id",
                    "to_stop_id",
                    "from_route_id",
                    "to_route_id",
                    "from_trip_id",
                    "to_trip_id",
                    "min_transfer_time",
                ],
                &[
                    ("from_stop_id", Id),
                    ("to_stop_id", Id),
                    ("from_route_id", Id),
                    ("to_route_id", Id),
                    ("from_trip_id", Id),
                    ("to_trip_id", Id),
                    ("transfer_type", Enum),
                    ("min_transfer_time", NonNegativeInteger),
                ],
            ),
        );
        schemas.insert(
            "pathways.txt",
            schema(
                &[
                    "pathway_id",
                    "from_stop_id",
                    "to_stop_id",
                    "pathway_mode",
                    "is_bidirectional",
                ],
                &[
                    "length",
                    "traversal_time",
                    "stair_count",
                    "max_slope",
                    "min_width",
                    "signposted_as",
                    "reversed_signposted_as",
                ],
                &[
                    ("pathway_id", Id),
                    ("from_stop_id", Id),
                    ("to_stop_id", Id),
                    ("pathway_mode", Enum),
                    ("is_bidirectional", Enum),
                    ("length", NonNegativeFloat),
                    ("traversal_time", NonNegativeInteger),
                    ("stair_count", NonZeroInteger),
                    ("max_slope", Float),
                    ("min_width", PositiveFloat),
                    ("signposted_as", Text),
                    ("reversed_signposted_as", Text),
                ],
            ),
        );
        schemas.insert(
            "levels.txt",
            schema(
                &["level_id", "level_index"],
                &["level_name"],
                &[
                    ("level_id", Id),
                    ("level_index", NonNegativeFloat),
                    ("level_name", Text),
                ],
            ),
        );
        schemas.insert(
            "location_groups.txt",
            schema(
                &["location_group_id"],
                &["location_group_name"],
                &[("location_group_id", Id), ("location_group_name", Text)],
            ),
        );
        schemas.insert(
            "location_group_stops.txt",
            schema(
                &["location_group_id", "stop_id"],
                &[],
                &[("location_group_id", Id), ("stop_id", Id)],
            ),
        );
        schemas.insert(
            "booking_rules.txt",
            schema(
                &["booking_rule_id", "booking_type"],
                &[
                    "prior_notice_duration_min",
                    "prior_notice_duration_max",
                    "prior_notice_last_day",
                    "prior_notice_last_time",
                    "prior_notice_start_day",
                    "prior_notice_start_time",
                    "prior_notice_service_id",
                    "message",
                    "pickup_message",
                    "drop_off_message",
                    "phone_number",
                    "info_url",
                    "booking_url",
                ],
                &[
                    ("booking_rule_id", Id),
                    ("booking_type", Enum),
                    ("prior_notice_duration_min", Integer),
                    ("prior_notice_duration_max", Integer),
                    ("prior_notice_last_day", Integer),
                    ("prior_notice_last_time", Time),
                    ("prior_notice_start_day", Integer),
                    ("prior_notice_start_time", Time),
                    ("prior_notice_service_id", Id),
                    ("message", Text),
                    ("pickup_message", Text),
                    ("drop_off_message", Text),
                    ("phone_number", Phone),
                    ("info_url", Url),
                    ("booking_url", Url),
                ],
            ),
        );
        schemas.insert(
            "feed_info.txt",
            schema(
                &["feed_publisher_name", "feed_publisher_url", "feed_lang"],
                &[
                    "default_lang",
                    "feed_start_date",
                    "feed_end_date",
                    "feed_version",
                    "feed_contact_email",
                    "feed_contact_url",
                ],
                &[
                    ("feed_publisher_name", Text),
                    ("feed_publisher_url", Url),
                    ("feed_lang", LanguageCode),
                    ("default_lang", LanguageCode),
                    ("feed_start_date", Date),
                    ("feed_end_date", Date),
                    ("feed_version", Text),
                    ("feed_contact_email", Email),
                    ("feed_contact_url", Url),
                ],
            ),
        );
        schemas.insert(
            "translations.txt",
            schema(
                &["table_name", "field_name", "language", "translation"],
                &["record_id", "record_sub_id", "field_value"],
                &[
                    ("table_name", Enum),
                    ("field_name", Text),
                    ("language", LanguageCode),
                    ("translation", Text),
                    ("record_id", Id),
                    ("record_sub_id", Id),
                    ("field_value", Text),
                ],
            ),
        );
        schemas.insert(
            "attributions.txt",
            schema(
                &["organization_name"],
                &[
                    "attribution_id",
                    "agency_id",
                    "route_id",
                    "trip_id",
                    "is_producer",
                    "is_operator",
                    "is_authority",
                    "attribution_url",
                    "attribution_email",
                    "attribution_phone",
                ],
                &[
                    ("attribution_id", Id),
                    ("agency_id", Id),
                    ("route_id", Id),
                    ("trip_id", Id),
                    ("organization_name", Text),
                    ("is_producer", Enum),
                    ("is_operator", Enum),
                    ("is_authority", Enum),
                    ("attribution_url", Url),
                    ("attribution_email", Email),
                    ("attribution_phone", Phone),
                ],
            ),
        );
        schemas
    };
}

/// Every file name carried by [FILE_SCHEMAS], for tests and the report order.
pub fn known_files() -> impl Iterator<Item = &'static str> {
    FILE_SCHEMAS.keys().copied()
}
