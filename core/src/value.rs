use serde::Serialize;
use std::fmt;

/// 参数值 / 列值
///
/// 作为参数时会根据类型推断出绑定标记（见 [`TypeTag`]）；
/// 作为查询结果时表示一列解码后的值。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    String(String),
    Int64(i64),
    Int32(i32),
    Int16(i16),
    Float64(f64),
    Float32(f32),
    Bool(bool),
    Null,
}

/// 绑定类型标记：整数按 `i` 绑定，其余（字符串、浮点、布尔、NULL）按 `s` 绑定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Integer,
    String,
}

impl TypeTag {
    pub fn as_char(self) -> char {
        match self {
            TypeTag::Integer => 'i',
            TypeTag::String => 's',
        }
    }
}

impl SqlValue {
    /// 推断绑定类型，只有原生整数得到 `i`
    pub fn type_tag(&self) -> TypeTag {
        match self {
            SqlValue::Int64(_) | SqlValue::Int32(_) | SqlValue::Int16(_) => TypeTag::Integer,
            _ => TypeTag::String,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// 假值：NULL、空字符串、"0"、数值 0、false
    pub fn is_falsy(&self) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::String(s) => s.is_empty() || s == "0",
            SqlValue::Int64(i) => *i == 0,
            SqlValue::Int32(i) => *i == 0,
            SqlValue::Int16(i) => *i == 0,
            SqlValue::Float64(f) => *f == 0.0,
            SqlValue::Float32(f) => *f == 0.0,
            SqlValue::Bool(b) => !b,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int64(i) => Some(*i),
            SqlValue::Int32(i) => Some(i64::from(*i)),
            SqlValue::Int16(i) => Some(i64::from(*i)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Float64(f) => Some(*f),
            SqlValue::Float32(f) => Some(f64::from(*f)),
            _ => None,
        }
    }

    /// 按 `s` 标记绑定时发送给驱动的文本
    ///
    /// NULL 和 false 变为空字符串，true 变为 "1"
    pub fn to_bind_string(&self) -> String {
        match self {
            SqlValue::String(s) => s.clone(),
            SqlValue::Int64(i) => i.to_string(),
            SqlValue::Int32(i) => i.to_string(),
            SqlValue::Int16(i) => i.to_string(),
            SqlValue::Float64(f) => f.to_string(),
            SqlValue::Float32(f) => f.to_string(),
            SqlValue::Bool(b) => String::from(if *b { "1" } else { "" }),
            SqlValue::Null => String::new(),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(b) => write!(f, "{}", b),
            other => f.write_str(&other.to_bind_string()),
        }
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::String(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::String(value.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::String(value.clone())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int64(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int32(value)
    }
}

impl From<i16> for SqlValue {
    fn from(value: i16) -> Self {
        SqlValue::Int16(value)
    }
}

impl From<i8> for SqlValue {
    fn from(value: i8) -> Self {
        SqlValue::Int16(i16::from(value))
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        SqlValue::Int64(i64::from(value))
    }
}

impl From<u16> for SqlValue {
    fn from(value: u16) -> Self {
        SqlValue::Int32(i32::from(value))
    }
}

impl From<u8> for SqlValue {
    fn from(value: u8) -> Self {
        SqlValue::Int16(i16::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float64(value)
    }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self {
        SqlValue::Float32(value)
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

impl From<SqlValue> for serde_json::Value {
    fn from(value: SqlValue) -> Self {
        match value {
            SqlValue::String(s) => serde_json::Value::String(s),
            SqlValue::Int64(i) => i.into(),
            SqlValue::Int32(i) => i.into(),
            SqlValue::Int16(i) => i.into(),
            SqlValue::Float64(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SqlValue::Float32(f) => serde_json::Number::from_f64(f64::from(f))
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SqlValue::Bool(b) => serde_json::Value::Bool(b),
            SqlValue::Null => serde_json::Value::Null,
        }
    }
}
