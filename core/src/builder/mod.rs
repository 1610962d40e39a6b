//! Statement Builder 模块
//!
//! 由 列名 -> 值 的映射拼出 INSERT / UPDATE 语句和对应的命名参数，再交给映射器执行

pub mod insert_builder;
pub mod update_builder;

pub use insert_builder::InsertBuilder;
pub use update_builder::UpdateBuilder;

use crate::value::SqlValue;

/// 列名对应的命名参数标记
pub(crate) fn marker(column: &str) -> String {
    format!(":{}", column)
}

/// 写入或覆盖一列，保持首次出现的位置
pub(crate) fn set_column(columns: &mut Vec<(String, SqlValue)>, column: String, value: SqlValue) {
    match columns.iter_mut().find(|(c, _)| *c == column) {
        Some((_, existing)) => *existing = value,
        None => columns.push((column, value)),
    }
}

/// 假值（NULL、空串、"0"、0、false）统一写为空字符串
pub(crate) fn normalize_falsy(value: &SqlValue) -> SqlValue {
    if value.is_falsy() {
        SqlValue::String(String::new())
    } else {
        value.clone()
    }
}
