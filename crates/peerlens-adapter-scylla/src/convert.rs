//! Driver value and type conversion.
//!
//! The only place that looks inside `CqlValue` and `ColumnType`; everything
//! downstream works with [`CellValue`] and plain type names.

use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::BigInt;
use chrono::{DateTime, NaiveDate, NaiveTime};
use peerlens_core::config::Consistency;
use peerlens_core::render::{CellValue, ColumnDescriptor, RowValues};
use scylla::frame::response::result::{ColumnSpec, ColumnType, CqlValue, Row};
use scylla::frame::value::{CqlDate, CqlDuration, CqlTime, CqlTimestamp};
use scylla::statement::Consistency as DriverConsistency;

/// `date` values count days from this offset, which stands for 1970-01-01.
const CQL_DATE_EPOCH: i64 = 1 << 31;
/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;
const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert one (possibly absent) driver value into its printable form.
pub fn cell_value(value: Option<&CqlValue>) -> CellValue {
    let Some(value) = value else {
        return CellValue::Null;
    };
    match value {
        CqlValue::Empty => CellValue::Null,
        CqlValue::Boolean(b) => CellValue::Bool(*b),
        CqlValue::TinyInt(i) => CellValue::Int((*i).into()),
        CqlValue::SmallInt(i) => CellValue::Int((*i).into()),
        CqlValue::Int(i) => CellValue::Int((*i).into()),
        CqlValue::BigInt(i) => CellValue::Int(*i),
        CqlValue::Counter(c) => CellValue::Int(c.0),
        // keep the f32 shortest form; f64 widening adds digits
        CqlValue::Float(f) => CellValue::Other(f.to_string()),
        CqlValue::Double(f) => CellValue::Float(*f),
        CqlValue::Ascii(s) | CqlValue::Text(s) => CellValue::Text(s.clone()),
        CqlValue::Inet(ip) => CellValue::Inet(*ip),
        CqlValue::Uuid(u) => CellValue::Text(u.to_string()),
        CqlValue::Timeuuid(u) => CellValue::Text(u.to_string()),
        CqlValue::Timestamp(ts) => {
            timestamp_text(*ts).map_or(CellValue::Int(ts.0), CellValue::Text)
        }
        CqlValue::Date(date) => date_text(*date).map_or_else(
            || CellValue::Int(i64::from(date.0) - CQL_DATE_EPOCH),
            CellValue::Text,
        ),
        CqlValue::Time(time) => {
            time_text(*time).map_or(CellValue::Int(time.0), CellValue::Text)
        }
        CqlValue::Duration(duration) => CellValue::Other(duration_text(duration)),
        CqlValue::Decimal(decimal) => {
            let (unscaled, scale) = decimal.as_signed_be_bytes_slice_and_exponent();
            let value = BigDecimal::new(BigInt::from_signed_bytes_be(unscaled), scale.into());
            CellValue::Other(value.to_string())
        }
        CqlValue::Varint(varint) => CellValue::Other(
            BigInt::from_signed_bytes_be(varint.as_signed_bytes_be_slice()).to_string(),
        ),
        CqlValue::Blob(bytes) => CellValue::Bytes(bytes.clone()),
        CqlValue::List(items) => CellValue::List(items.iter().map(nested).collect()),
        CqlValue::Set(items) => CellValue::Set(items.iter().map(nested).collect()),
        CqlValue::Map(entries) => CellValue::Map(
            entries.iter().map(|(k, v)| (nested(k), nested(v))).collect(),
        ),
        CqlValue::Tuple(items) => {
            CellValue::Tuple(items.iter().map(|v| cell_value(v.as_ref())).collect())
        }
        CqlValue::UserDefinedType { fields, .. } => CellValue::Udt(
            fields
                .iter()
                .map(|(name, v)| (name.clone(), cell_value(v.as_ref())))
                .collect(),
        ),
        #[allow(unreachable_patterns)]
        other => CellValue::Other(format!("{other:?}")),
    }
}

/// Milliseconds since the Unix epoch, printed in UTC.
fn timestamp_text(ts: CqlTimestamp) -> Option<String> {
    let at = DateTime::from_timestamp_millis(ts.0)?;
    Some(at.format("%Y-%m-%d %H:%M:%S%.3f%z").to_string())
}

fn date_text(date: CqlDate) -> Option<String> {
    let days = i64::from(date.0) - CQL_DATE_EPOCH + UNIX_EPOCH_DAYS_FROM_CE;
    let date = NaiveDate::from_num_days_from_ce_opt(i32::try_from(days).ok()?)?;
    Some(date.to_string())
}

/// Nanoseconds since midnight.
fn time_text(time: CqlTime) -> Option<String> {
    let secs = u32::try_from(time.0.div_euclid(NANOS_PER_SECOND)).ok()?;
    let nanos = u32::try_from(time.0.rem_euclid(NANOS_PER_SECOND)).ok()?;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)?;
    Some(time.to_string())
}

/// cqlsh-style duration, e.g. `1y2mo3d4h5m6s7ms`.
fn duration_text(duration: &CqlDuration) -> String {
    let negative = duration.months < 0 || duration.days < 0 || duration.nanoseconds < 0;
    let months = u64::from(duration.months.unsigned_abs());
    let nanos = duration.nanoseconds.unsigned_abs();
    let parts = [
        (months / 12, "y"),
        (months % 12, "mo"),
        (u64::from(duration.days.unsigned_abs()), "d"),
        (nanos / 3_600_000_000_000, "h"),
        (nanos / 60_000_000_000 % 60, "m"),
        (nanos / 1_000_000_000 % 60, "s"),
        (nanos / 1_000_000 % 1_000, "ms"),
        (nanos / 1_000 % 1_000, "us"),
        (nanos % 1_000, "ns"),
    ];

    let mut text: String = parts
        .iter()
        .filter(|(amount, _)| *amount > 0)
        .map(|(amount, unit)| format!("{amount}{unit}"))
        .collect();
    if text.is_empty() {
        return "0s".to_string();
    }
    if negative {
        text.insert(0, '-');
    }
    text
}

fn nested(value: &CqlValue) -> CellValue {
    cell_value(Some(value))
}

/// Convert a driver row into position-aligned values.
pub fn row_values(row: &Row) -> RowValues {
    row.columns.iter().map(|v| cell_value(v.as_ref())).collect()
}

/// CQL name of a column type, e.g. `map<text, int>`.
pub fn type_name(typ: &ColumnType) -> String {
    match typ {
        ColumnType::Ascii => "ascii".to_string(),
        ColumnType::Boolean => "boolean".to_string(),
        ColumnType::Blob => "blob".to_string(),
        ColumnType::Counter => "counter".to_string(),
        ColumnType::Date => "date".to_string(),
        ColumnType::Decimal => "decimal".to_string(),
        ColumnType::Double => "double".to_string(),
        ColumnType::Duration => "duration".to_string(),
        ColumnType::Float => "float".to_string(),
        ColumnType::Int => "int".to_string(),
        ColumnType::BigInt => "bigint".to_string(),
        ColumnType::Text => "text".to_string(),
        ColumnType::Timestamp => "timestamp".to_string(),
        ColumnType::Inet => "inet".to_string(),
        ColumnType::SmallInt => "smallint".to_string(),
        ColumnType::TinyInt => "tinyint".to_string(),
        ColumnType::Time => "time".to_string(),
        ColumnType::Timeuuid => "timeuuid".to_string(),
        ColumnType::Uuid => "uuid".to_string(),
        ColumnType::Varint => "varint".to_string(),
        ColumnType::List(inner) => format!("list<{}>", type_name(inner)),
        ColumnType::Set(inner) => format!("set<{}>", type_name(inner)),
        ColumnType::Map(key, value) => format!("map<{}, {}>", type_name(key), type_name(value)),
        ColumnType::Tuple(items) => {
            let inner: Vec<String> = items.iter().map(type_name).collect();
            format!("tuple<{}>", inner.join(", "))
        }
        ColumnType::UserDefinedType {
            type_name,
            keyspace,
            ..
        } => format!("{keyspace}.{type_name}"),
        ColumnType::Custom(class) => class.to_string(),
        #[allow(unreachable_patterns)]
        other => format!("{other:?}").to_lowercase(),
    }
}

pub fn column_descriptor(spec: &ColumnSpec) -> ColumnDescriptor {
    ColumnDescriptor::new(spec.name.clone(), type_name(&spec.typ))
}

pub fn driver_consistency(consistency: Consistency) -> DriverConsistency {
    match consistency {
        Consistency::Any => DriverConsistency::Any,
        Consistency::One => DriverConsistency::One,
        Consistency::Two => DriverConsistency::Two,
        Consistency::Three => DriverConsistency::Three,
        Consistency::Quorum => DriverConsistency::Quorum,
        Consistency::All => DriverConsistency::All,
        Consistency::LocalQuorum => DriverConsistency::LocalQuorum,
        Consistency::EachQuorum => DriverConsistency::EachQuorum,
        Consistency::LocalOne => DriverConsistency::LocalOne,
        Consistency::Serial => DriverConsistency::Serial,
        Consistency::LocalSerial => DriverConsistency::LocalSerial,
    }
}
