//! 工具函数模块

use crate::error::{Result, SqlxMapError};

/// 验证表名是否安全，允许 `schema.table` 形式
pub fn is_safe_table_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.ends_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// 验证字段名是否安全
pub fn is_safe_field_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub(crate) fn ensure_table_name(name: &str) -> Result<()> {
    if is_safe_table_name(name) {
        Ok(())
    } else {
        Err(SqlxMapError::InvalidField(format!(
            "Unsafe table name '{}'",
            name
        )))
    }
}

pub(crate) fn ensure_field_name(name: &str) -> Result<()> {
    if is_safe_field_name(name) {
        Ok(())
    } else {
        Err(SqlxMapError::InvalidField(format!(
            "Unsafe column name '{}'",
            name
        )))
    }
}
