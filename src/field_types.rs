//! Semantic field types and their value checks.
//!
//! Every column of a GTFS file carries one [FieldType]. The checks are total
//! over all input strings and never panic; an empty value always passes, since
//! whether a field may be empty is decided by the per-file schema, not by the
//! type.

use crate::schema;

/// The semantic kind of a GTFS column, as named by the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// An opaque identifier referencing or referenced by other records
    Id,
    /// Free-form text
    Text,
    /// A fully qualified http or https URL
    Url,
    /// An email address
    Email,
    /// A phone number, any non-blank text
    Phone,
    /// A color as six hexadecimal digits without a leading `#`
    Color,
    /// An ISO 4217 currency code, three uppercase letters
    CurrencyCode,
    /// A non-negative monetary amount
    Currency,
    /// A date in YYYYMMDD form
    Date,
    /// A service time in H:MM:SS or HH:MM:SS form; hours may exceed 24 to
    /// express trips running past midnight
    Time,
    /// A wall-clock time in H:MM:SS or HH:MM:SS form, hours 0 to 23
    LocalTime,
    /// An ISO 639-1 language code, optionally with a region (`en` or `en-US`)
    LanguageCode,
    /// A TZ database timezone name
    Timezone,
    /// A WGS84 latitude in decimal degrees
    Latitude,
    /// A WGS84 longitude in decimal degrees
    Longitude,
    /// Any integer
    Integer,
    /// An integer that is zero or more
    NonNegativeInteger,
    /// An integer that is not zero
    NonZeroInteger,
    /// Any floating point number
    Float,
    /// A floating point number that is zero or more
    NonNegativeFloat,
    /// A floating point number strictly greater than zero
    PositiveFloat,
    /// One of a closed set of literal values declared by the file's schema
    Enum,
}

impl FieldType {
    /// The expected-type label used in validation messages, matching the
    /// wording of the GTFS reference.
    pub fn label(self) -> &'static str {
        match self {
            FieldType::Id => "ID",
            FieldType::Text => "Text",
            FieldType::Url => "URL",
            FieldType::Email => "Email",
            FieldType::Phone => "Phone",
            FieldType::Color => "Color",
            FieldType::CurrencyCode => "Currency Code",
            FieldType::Currency => "Currency",
            FieldType::Date => "Date",
            FieldType::Time => "Time",
            FieldType::LocalTime => "Local Time",
            FieldType::LanguageCode => "Language Code",
            FieldType::Timezone => "Timezone",
            FieldType::Latitude => "Latitude",
            FieldType::Longitude => "Longitude",
            FieldType::Integer => "Integer",
            FieldType::NonNegativeInteger => "Integer, non-negative",
            FieldType::NonZeroInteger => "Integer, non-zero",
            FieldType::Float => "Float",
            FieldType::NonNegativeFloat => "Float, non-negative",
            FieldType::PositiveFloat => "Float, positive",
            FieldType::Enum => "Enum",
        }
    }

    /// Checks one raw value against this type.
    ///
    /// An empty value always passes; emptiness of required fields is enforced
    /// by the record validator. `file_name` and `field_name` are only used by
    /// [FieldType::Enum] to find the field's literal domain.
    pub fn validate(self, value: &str, file_name: &str, field_name: &str) -> bool {
        if value.is_empty() {
            return true;
        }
        match self {
            FieldType::Id | FieldType::Phone => !value.trim().is_empty(),
            FieldType::Text => true,
            FieldType::Url => is_url(value),
            FieldType::Email => is_email(value),
            FieldType::Color => value.len() == 6 && value.bytes().all(|b| b.is_ascii_hexdigit()),
            FieldType::CurrencyCode => {
                value.len() == 3 && value.bytes().all(|b| b.is_ascii_uppercase())
            }
            FieldType::Currency => parse_float(value).map_or(false, |v| v >= 0.0),
            FieldType::Date => is_date(value),
            FieldType::Time => parse_service_time(value).is_some(),
            FieldType::LocalTime => parse_service_time(value).map_or(false, |(h, _, _)| h <= 23),
            FieldType::LanguageCode => is_language_code(value),
            FieldType::Timezone => KNOWN_TIMEZONES.contains(&value) || value.contains('/'),
            FieldType::Latitude => {
                parse_float(value).map_or(false, |v| (-90.0..=90.0).contains(&v))
            }
            FieldType::Longitude => {
                parse_float(value).map_or(false, |v| (-180.0..=180.0).contains(&v))
            }
            FieldType::Integer => value.parse::<i64>().is_ok(),
            FieldType::NonNegativeInteger => value.parse::<i64>().map_or(false, |v| v >= 0),
            FieldType::NonZeroInteger => value.parse::<i64>().map_or(false, |v| v != 0),
            FieldType::Float => parse_float(value).is_some(),
            FieldType::NonNegativeFloat => parse_float(value).map_or(false, |v| v >= 0.0),
            FieldType::PositiveFloat => parse_float(value).map_or(false, |v| v > 0.0),
            FieldType::Enum => match schema::enum_domain(file_name, field_name) {
                Some(domain) => domain.iter().any(|literal| *literal == value),
                // A declared Enum without a literal table passes unconstrained
                None => true,
            },
        }
    }
}

/// Timezones accepted without further shape checks. Anything else must at
/// least contain a `/`; this is not an exhaustive IANA lookup.
const KNOWN_TIMEZONES: [&str; 5] = [
    "America/New_York",
    "Europe/London",
    "Asia/Tokyo",
    "America/Los_Angeles",
    "America/Chicago",
];

fn parse_float(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// YYYYMMDD with year 1900..=2100, month 1..=12 and day 1..=31. The day is
/// not checked against the month length.
fn is_date(value: &str) -> bool {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let (year, month, day) = match (
        value[0..4].parse::<u32>(),
        value[4..6].parse::<u32>(),
        value[6..8].parse::<u32>(),
    ) {
        (Ok(y), Ok(m), Ok(d)) => (y, m, d),
        _ => return false,
    };
    (1900..=2100).contains(&year) && (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Parses `H:MM:SS` or `HH:MM:SS` into (hours, minutes, seconds). Hours are
/// unbounded above so service times past midnight stay representable.
fn parse_service_time(value: &str) -> Option<(u32, u32, u32)> {
    let len = value.len();
    if !(7..=8).contains(&len) {
        return None;
    }
    let bytes = value.as_bytes();
    if bytes[len - 6] != b':' || bytes[len - 3] != b':' {
        return None;
    }
    let hour = &value[..len - 6];
    let minute = &value[len - 5..len - 3];
    let second = &value[len - 2..];
    for part in [hour, minute, second] {
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    let h = hour.parse().ok()?;
    let m: u32 = minute.parse().ok()?;
    let s: u32 = second.parse().ok()?;
    if m > 59 || s > 59 {
        return None;
    }
    Some((h, m, s))
}

/// `aa` or `aa-AA`
fn is_language_code(value: &str) -> bool {
    let bytes = value.as_bytes();
    match bytes.len() {
        2 => bytes.iter().all(|b| b.is_ascii_lowercase()),
        5 => {
            bytes[0].is_ascii_lowercase()
                && bytes[1].is_ascii_lowercase()
                && bytes[2] == b'-'
                && bytes[3].is_ascii_uppercase()
                && bytes[4].is_ascii_uppercase()
        }
        _ => false,
    }
}

fn is_url(value: &str) -> bool {
    let rest = if let Some(rest) = value.strip_prefix("http://") {
        rest
    } else if let Some(rest) = value.strip_prefix("https://") {
        rest
    } else {
        return false;
    };
    let host = rest.split(&['/', '?', '#'][..]).next().unwrap_or("");
    !host.is_empty() && !host.contains(char::is_whitespace)
}

fn is_email(value: &str) -> bool {
    if value.contains(char::is_whitespace) {
        return false;
    }
    let (local, domain) = match value.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rfind('.') {
        Some(dot) => dot > 0 && dot < domain.len() - 1,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::FieldType;

    fn check(field_type: FieldType, value: &str) -> bool {
        field_type.validate(value, "agency.txt", "agency_name")
    }

    #[test]
    fn empty_values_always_pass() {
        for field_type in [
            FieldType::Id,
            FieldType::Url,
            FieldType::Date,
            FieldType::Latitude,
            FieldType::NonNegativeInteger,
        ] {
            assert!(check(field_type, ""));
        }
    }

    #[test]
    fn url_requires_http_scheme_and_host() {
        assert!(check(FieldType::Url, "http://www.bibus.fr"));
        assert!(check(FieldType::Url, "https://example.com/path?x=1"));
        assert!(!check(FieldType::Url, "ftp://example.com"));
        assert!(!check(FieldType::Url, "www.example.com"));
        assert!(!check(FieldType::Url, "http://"));
    }

    #[test]
    fn email_shape() {
        assert!(check(FieldType::Email, "contact@agency.example.org"));
        assert!(!check(FieldType::Email, "contact@agency"));
        assert!(!check(FieldType::Email, "@agency.org"));
        assert!(!check(FieldType::Email, "a b@agency.org"));
        assert!(!check(FieldType::Email, "contact@agency."));
    }

    #[test]
    fn color_is_six_hex_digits() {
        assert!(check(FieldType::Color, "FFD700"));
        assert!(check(FieldType::Color, "00ff00"));
        assert!(!check(FieldType::Color, "#FFD700"));
        assert!(!check(FieldType::Color, "FFD7"));
        assert!(!check(FieldType::Color, "GGGGGG"));
    }

    #[test]
    fn currency_code_is_three_uppercase_letters() {
        assert!(check(FieldType::CurrencyCode, "EUR"));
        assert!(check(FieldType::CurrencyCode, "USD"));
        assert!(!check(FieldType::CurrencyCode, "eur"));
        assert!(!check(FieldType::CurrencyCode, "EURO"));
    }

    #[test]
    fn currency_amount_is_non_negative() {
        assert!(check(FieldType::Currency, "2.50"));
        assert!(check(FieldType::Currency, "0"));
        assert!(!check(FieldType::Currency, "-1.20"));
        assert!(!check(FieldType::Currency, "2,50"));
    }

    #[test]
    fn language_codes() {
        assert!(check(FieldType::LanguageCode, "fr"));
        assert!(check(FieldType::LanguageCode, "en-US"));
        assert!(!check(FieldType::LanguageCode, "FR"));
        assert!(!check(FieldType::LanguageCode, "en-us"));
        assert!(!check(FieldType::LanguageCode, "eng"));
    }

    #[test]
    fn timezone_heuristic() {
        assert!(check(FieldType::Timezone, "Europe/Paris"));
        assert!(check(FieldType::Timezone, "America/New_York"));
        assert!(!check(FieldType::Timezone, "CET"));
    }

    #[test]
    fn coordinates_are_range_checked() {
        assert!(check(FieldType::Latitude, "48.796058"));
        assert!(check(FieldType::Latitude, "-90"));
        assert!(!check(FieldType::Latitude, "90.5"));
        assert!(check(FieldType::Longitude, "-180"));
        assert!(!check(FieldType::Longitude, "181"));
        assert!(!check(FieldType::Longitude, "east"));
    }

    #[test]
    fn integer_variants() {
        assert!(check(FieldType::Integer, "-3"));
        assert!(!check(FieldType::Integer, "3.5"));
        assert!(check(FieldType::NonNegativeInteger, "0"));
        assert!(!check(FieldType::NonNegativeInteger, "-1"));
        assert!(check(FieldType::NonZeroInteger, "-4"));
        assert!(!check(FieldType::NonZeroInteger, "0"));
    }

    #[test]
    fn float_variants() {
        assert!(check(FieldType::Float, "-0.5"));
        assert!(!check(FieldType::Float, "1.5abc"));
        assert!(!check(FieldType::Float, "NaN"));
        assert!(check(FieldType::NonNegativeFloat, "0.0"));
        assert!(!check(FieldType::NonNegativeFloat, "-0.1"));
        assert!(check(FieldType::PositiveFloat, "0.1"));
        assert!(!check(FieldType::PositiveFloat, "0"));
    }

    #[test]
    fn date_accepts_impossible_day_of_month() {
        // The day is only bounded to 1..=31, so February 30th passes. This is
        // the documented behavior, not an oversight to fix.
        assert!(check(FieldType::Date, "20240230"));
        assert!(check(FieldType::Date, "20240115"));
        assert!(!check(FieldType::Date, "20241301"));
        assert!(!check(FieldType::Date, "20240100"));
        assert!(!check(FieldType::Date, "18991231"));
        assert!(!check(FieldType::Date, "21010101"));
        assert!(!check(FieldType::Date, "2024-01-15"));
    }

    #[test]
    fn service_time_allows_hours_past_midnight() {
        assert!(check(FieldType::Time, "25:00:00"));
        assert!(check(FieldType::Time, "7:15:00"));
        assert!(check(FieldType::Time, "07:15:00"));
        assert!(!check(FieldType::Time, "24:60:00"));
        assert!(!check(FieldType::Time, "7:5:00"));
        assert!(!check(FieldType::Time, "1:+1:00"));
        assert!(!check(FieldType::Time, "071500"));
    }

    #[test]
    fn local_time_is_bounded_to_a_day() {
        assert!(check(FieldType::LocalTime, "23:59:59"));
        assert!(check(FieldType::LocalTime, "0:00:00"));
        assert!(!check(FieldType::LocalTime, "25:00:00"));
        assert!(!check(FieldType::LocalTime, "24:00:00"));
    }
}
