use alloc::format;
use alloc::string::String;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use mw_value::Value;

use crate::{SerializeError, WriterConfig};

/// Renders a date or time value the way `datetime`'s `repr` does.
///
/// Zone-aware datetimes are converted to UTC and get `tzinfo=utc` appended.
/// Seconds are written only when seconds or microseconds are nonzero,
/// microseconds only when nonzero.
///
/// Uses the default [`WriterConfig`]; inside a [`Serializer`](super::Serializer)
/// the configured UTC name is used instead.
///
/// # Examples
///
/// ```
/// # use chrono::{FixedOffset, NaiveDate, TimeZone};
/// # use mw_value::Value;
/// # use mw_writer::serialize_datetime;
/// let naive = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap().and_hms_opt(1, 1, 0).unwrap();
/// assert_eq!(
///     serialize_datetime(&Value::from(naive)).unwrap(),
///     "datetime.datetime(2014, 1, 1, 1, 1)",
/// );
///
/// let plus_three = FixedOffset::east_opt(180 * 60).unwrap();
/// let aware = plus_three.from_local_datetime(&naive).unwrap();
/// assert_eq!(
///     serialize_datetime(&Value::from(aware)).unwrap(),
///     "datetime.datetime(2013, 12, 31, 22, 1, tzinfo=utc)",
/// );
/// ```
pub fn serialize_datetime(value: &Value) -> Result<String, SerializeError> {
    let config = WriterConfig::default();
    match value {
        Value::Date(date) => date_repr(date),
        Value::Time(time) => time_repr(time),
        Value::DateTime(datetime) => naive_repr(datetime),
        Value::DateTimeTz(datetime) => aware_repr(datetime, &config.utc.name),
        other => Err(SerializeError::Unsupported {
            type_name: format!("{}", other.kind()),
            repr: format!("{other:?}"),
        }),
    }
}

pub(super) fn date_repr(date: &NaiveDate) -> Result<String, SerializeError> {
    check_year(date.year(), date)?;
    Ok(format!(
        "datetime.date({}, {}, {})",
        date.year(),
        date.month(),
        date.day()
    ))
}

pub(super) fn time_repr(time: &NaiveTime) -> Result<String, SerializeError> {
    Ok(format!("datetime.time({})", clock_fields(time)?))
}

pub(super) fn naive_repr(datetime: &NaiveDateTime) -> Result<String, SerializeError> {
    check_year(datetime.year(), datetime)?;
    Ok(format!(
        "datetime.datetime({}, {}, {}, {})",
        datetime.year(),
        datetime.month(),
        datetime.day(),
        clock_fields(&datetime.time())?
    ))
}

pub(super) fn aware_repr(datetime: &DateTime<FixedOffset>, utc: &str) -> Result<String, SerializeError> {
    let in_utc = datetime.with_timezone(&Utc).naive_utc();
    log::trace!("normalized {datetime} to {in_utc} UTC");
    let naive = naive_repr(&in_utc)?;
    // `naive` always ends with the closing parenthesis.
    let open = &naive[..naive.len() - 1];
    Ok(format!("{open}, tzinfo={utc})"))
}

/// `h, m[, s[, us]]`.
fn clock_fields(time: &NaiveTime) -> Result<String, SerializeError> {
    let nanos = time.nanosecond();
    if nanos >= 1_000_000_000 {
        return Err(SerializeError::Unsupported {
            type_name: String::from("time"),
            repr: format!("{time} (leap second)"),
        });
    }
    if nanos % 1_000 != 0 {
        return Err(SerializeError::SubMicrosecond {
            value: format!("{time}"),
        });
    }

    let micros = nanos / 1_000;
    let mut fields = format!("{}, {}", time.hour(), time.minute());
    if time.second() != 0 || micros != 0 {
        fields.push_str(&format!(", {}", time.second()));
    }
    if micros != 0 {
        fields.push_str(&format!(", {micros}"));
    }
    Ok(fields)
}

/// Python's `datetime` only covers years 1 through 9999.
fn check_year(year: i32, value: &impl core::fmt::Display) -> Result<(), SerializeError> {
    if (1..=9999).contains(&year) {
        Ok(())
    } else {
        Err(SerializeError::Unsupported {
            type_name: String::from("datetime"),
            repr: format!("{value}"),
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
    use mw_value::Value;

    use super::serialize_datetime;
    use crate::{ErrorKind, SerializeError};

    fn naive(h: u32, m: u32, s: u32, us: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2014, 1, 1)
            .unwrap()
            .and_hms_micro_opt(h, m, s, us)
            .unwrap()
    }

    #[test]
    fn naive_fields() {
        assert_eq!(
            serialize_datetime(&Value::from(naive(1, 1, 0, 0))).unwrap(),
            "datetime.datetime(2014, 1, 1, 1, 1)"
        );
        assert_eq!(
            serialize_datetime(&Value::from(naive(1, 1, 5, 0))).unwrap(),
            "datetime.datetime(2014, 1, 1, 1, 1, 5)"
        );
        assert_eq!(
            serialize_datetime(&Value::from(naive(1, 1, 0, 250))).unwrap(),
            "datetime.datetime(2014, 1, 1, 1, 1, 0, 250)"
        );
    }

    #[test]
    fn dates_and_times() {
        let date = NaiveDate::from_ymd_opt(2014, 3, 31).unwrap();
        assert_eq!(
            serialize_datetime(&Value::from(date)).unwrap(),
            "datetime.date(2014, 3, 31)"
        );

        let time = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        assert_eq!(
            serialize_datetime(&Value::from(time)).unwrap(),
            "datetime.time(23, 0)"
        );
    }

    #[test]
    fn aware_is_normalized_to_utc() {
        let plus_three = FixedOffset::east_opt(180 * 60).unwrap();
        let aware = plus_three.from_local_datetime(&naive(1, 1, 0, 0)).unwrap();
        assert_eq!(
            serialize_datetime(&Value::from(aware)).unwrap(),
            "datetime.datetime(2013, 12, 31, 22, 1, tzinfo=utc)"
        );

        let utc = Utc.from_utc_datetime(&naive(1, 1, 0, 0));
        assert_eq!(
            serialize_datetime(&Value::from(utc)).unwrap(),
            "datetime.datetime(2014, 1, 1, 1, 1, tzinfo=utc)"
        );
    }

    #[test]
    fn sub_microsecond_is_rejected() {
        let time = NaiveTime::from_hms_nano_opt(1, 1, 1, 1_500).unwrap();
        let err = serialize_datetime(&Value::from(time)).unwrap_err();
        assert!(matches!(err, SerializeError::SubMicrosecond { .. }));
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn out_of_range_year_is_rejected() {
        let date = NaiveDate::from_ymd_opt(10_000, 1, 1).unwrap();
        assert!(matches!(
            serialize_datetime(&Value::from(date)),
            Err(SerializeError::Unsupported { .. })
        ));
    }

    #[test]
    fn other_values_are_rejected() {
        assert!(serialize_datetime(&Value::Int(1)).is_err());
    }
}
