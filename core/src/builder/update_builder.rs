//! Update Builder - 由列值映射和一个条件列生成 UPDATE 语句

use super::{marker, normalize_falsy, set_column};
use crate::error::{Result, SqlxMapError};
use crate::mapper::{QueryMapper, ReturnMode};
use crate::params::Params;
use crate::session::Session;
use crate::utils::{ensure_field_name, ensure_table_name};
use crate::value::SqlValue;

/// Update Builder
///
/// 生成 `UPDATE <table> SET <col> = :<col>, ... WHERE <check_column> = :<check_column>`，
/// 条件参数最后绑定。
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: String,
    check_column: String,
    check_value: SqlValue,
    columns: Vec<(String, SqlValue)>,
    keep_falsy: bool,
}

impl UpdateBuilder {
    /// 创建 UpdateBuilder
    pub fn new(
        table: impl Into<String>,
        check_column: impl Into<String>,
        check_value: impl Into<SqlValue>,
    ) -> Self {
        Self {
            table: table.into(),
            check_column: check_column.into(),
            check_value: check_value.into(),
            columns: Vec::new(),
            keep_falsy: false,
        }
    }

    /// 指定要更新的列（可链式调用多次）
    pub fn value(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        set_column(&mut self.columns, column.into(), value.into());
        self
    }

    /// 指定多个要更新的列
    pub fn values<I, K, V>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        for (column, value) in data {
            set_column(&mut self.columns, column.into(), value.into());
        }
        self
    }

    /// 原样绑定假值，不转为空字符串
    pub fn keep_falsy(mut self) -> Self {
        self.keep_falsy = true;
        self
    }

    /// 条件列的标记；条件列同时出现在 SET 中时换一个不冲突的名字
    fn condition_marker(&self) -> String {
        let mut name = self.check_column.clone();
        while self.columns.iter().any(|(c, _)| *c == name) {
            name.push_str("_where");
        }
        marker(&name)
    }

    /// 生成 SQL 和参数映射，没有要更新的列时返回 None
    pub fn build(&self) -> Result<Option<(String, Params)>> {
        ensure_table_name(&self.table)?;
        ensure_field_name(&self.check_column)?;

        if self.columns.is_empty() {
            return Ok(None);
        }

        let mut set_parts = Vec::with_capacity(self.columns.len());
        let mut params = Params::with_capacity(self.columns.len() + 1);

        for (column, value) in &self.columns {
            ensure_field_name(column)?;
            let m = marker(column);
            set_parts.push(format!("{} = {}", column, m));
            let value = if self.keep_falsy {
                value.clone()
            } else {
                normalize_falsy(value)
            };
            params.insert(m, value);
        }

        let condition = self.condition_marker();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = {}",
            self.table,
            set_parts.join(", "),
            self.check_column,
            condition
        );
        params.insert(condition, self.check_value.clone());

        Ok(Some((sql, params)))
    }

    /// 执行更新，返回影响行数；没有要更新的列时不访问数据库，直接返回 0
    pub async fn execute<S: Session + ?Sized>(self, session: &mut S) -> Result<u64> {
        let Some((sql, params)) = self.build()? else {
            return Ok(0);
        };
        let result = QueryMapper::new(session)
            .execute_mapped(&sql, &params, ReturnMode::AffectedRows)
            .await?;
        result
            .affected_rows()
            .ok_or_else(|| SqlxMapError::Other("update did not return a row count".to_string()))
    }
}
