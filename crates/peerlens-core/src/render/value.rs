//! Column metadata and printable cell values.
//!
//! Drivers hand out their own value types. Adapters convert them into
//! [`CellValue`] once, so the renderer only ever deals with this enum and
//! its `Display` form.

use std::fmt;
use std::net::IpAddr;

/// Name and declared type of one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Type tag as reported by the database, e.g. `text`, `inet`, `int`.
    pub type_name: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Header label: `name (type)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.type_name)
    }
}

/// Values of one row, position-aligned with the column descriptors.
pub type RowValues = Vec<CellValue>;

/// A single printable value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Absent value. Prints as an empty field.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Inet(IpAddr),
    Bytes(Vec<u8>),
    List(Vec<CellValue>),
    Set(Vec<CellValue>),
    Map(Vec<(CellValue, CellValue)>),
    Tuple(Vec<CellValue>),
    /// User-defined type: field name and value pairs.
    Udt(Vec<(String, CellValue)>),
    /// Anything already formatted by the adapter (decimals, durations, ...).
    Other(String),
}

impl CellValue {
    // Inside collections a null has to stay visible.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("null"),
            other => fmt::Display::fmt(other, f),
        }
    }
}

fn write_seq(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: &[CellValue],
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.fmt_nested(f)?;
    }
    f.write_str(close)
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::Text(s) | CellValue::Other(s) => f.write_str(s),
            CellValue::Inet(ip) => write!(f, "{ip}"),
            CellValue::Bytes(bytes) => {
                f.write_str("0x")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            CellValue::List(items) => write_seq(f, "[", items, "]"),
            CellValue::Set(items) => write_seq(f, "{", items, "}"),
            CellValue::Tuple(items) => write_seq(f, "(", items, ")"),
            CellValue::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    k.fmt_nested(f)?;
                    f.write_str(": ")?;
                    v.fmt_nested(f)?;
                }
                f.write_str("}")
            }
            CellValue::Udt(fields) => {
                f.write_str("{")?;
                for (i, (name, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: ")?;
                    v.fmt_nested(f)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(v.into())
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<IpAddr> for CellValue {
    fn from(v: IpAddr) -> Self {
        CellValue::Inet(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CellValue::Null, Into::into)
    }
}
