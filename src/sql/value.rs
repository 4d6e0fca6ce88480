//! Typed scalar carried by SQL requests and results

use std::fmt;

/// A scalar cell value; the wire tag is [`SqlValue::type_tag`]
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    String(String),
    Int(i32),
    Long(i64),
    Double(f64),
    Bool(bool),
}

impl SqlValue {
    pub const TAG_NULL: i32 = 0;
    pub const TAG_STRING: i32 = 1;
    pub const TAG_INT: i32 = 2;
    pub const TAG_LONG: i32 = 3;
    pub const TAG_DOUBLE: i32 = 4;
    pub const TAG_BOOL: i32 = 5;

    /// 4-byte type discriminant used on the wire
    pub fn type_tag(&self) -> i32 {
        match self {
            SqlValue::Null => Self::TAG_NULL,
            SqlValue::String(_) => Self::TAG_STRING,
            SqlValue::Int(_) => Self::TAG_INT,
            SqlValue::Long(_) => Self::TAG_LONG,
            SqlValue::Double(_) => Self::TAG_DOUBLE,
            SqlValue::Bool(_) => Self::TAG_BOOL,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::String(s) => write!(f, "{}", s),
            SqlValue::Int(v) => write!(f, "{}", v),
            SqlValue::Long(v) => write!(f, "{}", v),
            SqlValue::Double(v) => write!(f, "{}", v),
            SqlValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::String(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::String(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Long(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Double(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}
