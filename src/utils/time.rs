use chrono::{DateTime, SecondsFormat, Utc};

/// This is the standard way of converting an instant to a string in reflectr. Matches the
/// `YYYY-MM-DDTHH:MM:SS.sssZ` shape browsers produce, so stored journals stay byte-stable.
pub fn format_timestamp(moment: DateTime<Utc>) -> String {
    moment.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts any RFC 3339 instant, normalizing the offset to UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|v| v.to_utc())
}

/// Serde adapter for timestamps stored as ISO-8601 strings.
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(moment: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(*moment))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_timestamp(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

    use super::{format_timestamp, parse_timestamp};

    const TEST_DATE_TIME: NaiveDateTime = NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
        NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
    );

    #[test]
    fn formats_with_millis_and_zulu() {
        let moment = Utc.from_utc_datetime(&TEST_DATE_TIME);
        assert_eq!(format_timestamp(moment), "2025-03-15T09:30:00.000Z");
    }

    #[test]
    fn parses_offsets_into_utc() {
        let parsed = parse_timestamp("2025-03-15T11:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.from_utc_datetime(&TEST_DATE_TIME));
        assert!(parse_timestamp("15/03/2025").is_err());
    }
}
