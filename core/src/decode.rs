//! 将驱动返回的行解码为 [`Row`]
//!
//! 按列类型名选择解码方式，识别不了的类型退回为文本（再不行按字节做有损转换）。

use crate::error::Result;
use crate::result_set::Row;
use crate::value::SqlValue;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

#[cfg(feature = "mysql")]
pub(crate) fn mysql_row(row: &sqlx::mysql::MySqlRow) -> Result<Row> {
    let mut out = Row::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        out.push(column.name(), mysql_value(row, idx)?);
    }
    Ok(out)
}

#[cfg(feature = "mysql")]
fn mysql_value(row: &sqlx::mysql::MySqlRow, idx: usize) -> Result<SqlValue> {
    let type_name = {
        let raw = row.try_get_raw(idx)?;
        if raw.is_null() {
            return Ok(SqlValue::Null);
        }
        raw.type_info().name().to_uppercase()
    };

    let typed = match type_name.as_str() {
        "BOOLEAN" => row.try_get::<bool, _>(idx).map(SqlValue::Bool),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            row.try_get::<i64, _>(idx).map(SqlValue::Int64)
        }
        name if name.ends_with("UNSIGNED") => row.try_get::<u64, _>(idx).map(unsigned_value),
        "FLOAT" => row.try_get::<f32, _>(idx).map(SqlValue::Float32),
        "DOUBLE" => row.try_get::<f64, _>(idx).map(SqlValue::Float64),
        "DECIMAL" => row
            .try_get::<bigdecimal::BigDecimal, _>(idx)
            .map(|d| SqlValue::String(d.to_string())),
        "DATE" => row
            .try_get::<chrono::NaiveDate, _>(idx)
            .map(|d| SqlValue::String(d.to_string())),
        "DATETIME" => row
            .try_get::<chrono::NaiveDateTime, _>(idx)
            .map(|d| SqlValue::String(d.to_string())),
        "TIMESTAMP" => row
            .try_get::<chrono::DateTime<chrono::Utc>, _>(idx)
            .map(|d| SqlValue::String(d.naive_utc().to_string())),
        "TIME" => row
            .try_get::<chrono::NaiveTime, _>(idx)
            .map(|t| SqlValue::String(t.to_string())),
        _ => return mysql_text(row, idx),
    };

    match typed {
        Ok(value) => Ok(value),
        Err(_) => mysql_text(row, idx),
    }
}

#[cfg(feature = "mysql")]
fn mysql_text(row: &sqlx::mysql::MySqlRow, idx: usize) -> Result<SqlValue> {
    if let Ok(text) = row.try_get_unchecked::<String, _>(idx) {
        return Ok(SqlValue::String(text));
    }
    let bytes = row.try_get_unchecked::<Vec<u8>, _>(idx)?;
    Ok(SqlValue::String(String::from_utf8_lossy(&bytes).into_owned()))
}

#[cfg(feature = "sqlite")]
pub(crate) fn sqlite_row(row: &sqlx::sqlite::SqliteRow) -> Result<Row> {
    let mut out = Row::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        out.push(column.name(), sqlite_value(row, idx)?);
    }
    Ok(out)
}

#[cfg(feature = "sqlite")]
fn sqlite_value(row: &sqlx::sqlite::SqliteRow, idx: usize) -> Result<SqlValue> {
    let type_name = {
        let raw = row.try_get_raw(idx)?;
        if raw.is_null() {
            return Ok(SqlValue::Null);
        }
        raw.type_info().name().to_uppercase()
    };

    let typed = match type_name.as_str() {
        "INTEGER" | "INT" | "BIGINT" => row.try_get::<i64, _>(idx).map(SqlValue::Int64),
        "BOOLEAN" => row.try_get::<bool, _>(idx).map(SqlValue::Bool),
        "REAL" | "FLOAT" | "DOUBLE" => row.try_get::<f64, _>(idx).map(SqlValue::Float64),
        _ => return sqlite_text(row, idx),
    };

    match typed {
        Ok(value) => Ok(value),
        Err(_) => sqlite_text(row, idx),
    }
}

#[cfg(feature = "sqlite")]
fn sqlite_text(row: &sqlx::sqlite::SqliteRow, idx: usize) -> Result<SqlValue> {
    if let Ok(text) = row.try_get_unchecked::<String, _>(idx) {
        return Ok(SqlValue::String(text));
    }
    let bytes = row.try_get_unchecked::<Vec<u8>, _>(idx)?;
    Ok(SqlValue::String(String::from_utf8_lossy(&bytes).into_owned()))
}

/// 超出 i64 范围的无符号整数以文本返回
#[cfg(feature = "mysql")]
fn unsigned_value(value: u64) -> SqlValue {
    match i64::try_from(value) {
        Ok(v) => SqlValue::Int64(v),
        Err(_) => SqlValue::String(value.to_string()),
    }
}
