// crates/todo-rpc/src/convert.rs
//
// Conversion between wire messages and domain types.
//
// A wire timestamp is valid when it is present, its nanos lie in
// [0, 1e9), and its seconds fall within years 0001..=9999.

use chrono::{DateTime, Utc};
use prost_types::Timestamp;

use todo_core::error::TodoError;
use todo_core::item::{ToDoFields, ToDoItem};

use crate::proto::ToDo;

/// 0001-01-01T00:00:00Z
const MIN_VALID_SECONDS: i64 = -62_135_596_800;
/// 10000-01-01T00:00:00Z, exclusive.
const MAX_VALID_SECONDS: i64 = 253_402_300_800;

/// Validate a wire timestamp and convert it to a UTC datetime.
pub fn datetime_from_timestamp(
    field: &'static str,
    ts: Option<&Timestamp>,
) -> Result<DateTime<Utc>, TodoError> {
    let ts = ts.ok_or_else(|| TodoError::InvalidTimestamp(format!("{}: nil Timestamp", field)))?;

    if !(MIN_VALID_SECONDS..MAX_VALID_SECONDS).contains(&ts.seconds) {
        return Err(TodoError::InvalidTimestamp(format!(
            "{}: seconds {} out of range",
            field, ts.seconds
        )));
    }
    if !(0..1_000_000_000).contains(&ts.nanos) {
        return Err(TodoError::InvalidTimestamp(format!(
            "{}: nanos {} out of range",
            field, ts.nanos
        )));
    }

    DateTime::<Utc>::from_timestamp(ts.seconds, ts.nanos as u32).ok_or_else(|| {
        TodoError::InvalidTimestamp(format!("{}: {}.{:09} not representable", field, ts.seconds, ts.nanos))
    })
}

/// Convert a UTC datetime to a wire timestamp.
pub fn timestamp_from_datetime(dt: &DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

/// Extract the writable fields of a wire item. The wire `id` is ignored.
pub fn fields_from_to_do(to_do: &ToDo) -> Result<ToDoFields, TodoError> {
    Ok(ToDoFields {
        title: to_do.title.clone(),
        description: to_do.description.clone(),
        insert_at: datetime_from_timestamp("insert_at", to_do.insert_at.as_ref())?,
        update_at: datetime_from_timestamp("update_at", to_do.update_at.as_ref())?,
    })
}

/// Wire form of a stored item.
pub fn to_do_from_item(item: &ToDoItem) -> ToDo {
    ToDo {
        id: item.id.to_hex(),
        title: item.fields.title.clone(),
        description: item.fields.description.clone(),
        insert_at: Some(timestamp_from_datetime(&item.fields.insert_at)),
        update_at: Some(timestamp_from_datetime(&item.fields.update_at)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_missing_timestamp_is_invalid() {
        let err = datetime_from_timestamp("insert_at", None).unwrap_err();
        assert!(matches!(err, TodoError::InvalidTimestamp(_)));
        assert!(err.to_string().contains("insert_at"));
    }

    #[test]
    fn test_nanos_out_of_range() {
        for nanos in [-1, 1_000_000_000] {
            let ts = Timestamp { seconds: 0, nanos };
            assert!(matches!(
                datetime_from_timestamp("update_at", Some(&ts)),
                Err(TodoError::InvalidTimestamp(_))
            ));
        }
    }

    #[test]
    fn test_seconds_range_bounds() {
        let lowest = Timestamp { seconds: MIN_VALID_SECONDS, nanos: 0 };
        let dt = datetime_from_timestamp("insert_at", Some(&lowest)).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap());

        let highest = Timestamp { seconds: MAX_VALID_SECONDS - 1, nanos: 999_999_999 };
        assert!(datetime_from_timestamp("insert_at", Some(&highest)).is_ok());

        let too_low = Timestamp { seconds: MIN_VALID_SECONDS - 1, nanos: 0 };
        let too_high = Timestamp { seconds: MAX_VALID_SECONDS, nanos: 0 };
        assert!(datetime_from_timestamp("insert_at", Some(&too_low)).is_err());
        assert!(datetime_from_timestamp("insert_at", Some(&too_high)).is_err());
    }

    #[test]
    fn test_timestamp_keeps_nanos() {
        let ts = Timestamp { seconds: 1_700_000_000, nanos: 123_456_789 };
        let dt = datetime_from_timestamp("insert_at", Some(&ts)).unwrap();
        assert_eq!(timestamp_from_datetime(&dt), ts);
    }

    #[test]
    fn test_fields_ignore_wire_id() {
        let ts = Timestamp { seconds: 1_700_000_000, nanos: 0 };
        let to_do = ToDo {
            id: "not even hex".to_string(),
            title: "demo task".to_string(),
            description: "this is just a demo".to_string(),
            insert_at: Some(ts.clone()),
            update_at: Some(ts),
        };
        let fields = fields_from_to_do(&to_do).unwrap();
        assert_eq!(fields.title, "demo task");
        assert_eq!(fields.insert_at, fields.update_at);
    }
}
