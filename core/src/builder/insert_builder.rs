//! Insert Builder - 由列值映射生成 INSERT 语句

use super::{marker, normalize_falsy, set_column};
use crate::error::{Result, SqlxMapError};
use crate::mapper::{QueryMapper, ReturnMode};
use crate::params::Params;
use crate::session::Session;
use crate::utils::{ensure_field_name, ensure_table_name};
use crate::value::SqlValue;

/// Insert Builder
///
/// 生成 `INSERT INTO <table> (<col>, ...) VALUES (:<col>, ...)`，
/// 列的顺序就是添加的顺序。假值默认写为空字符串，可用 [`InsertBuilder::keep_falsy`] 关闭。
#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: String,
    columns: Vec<(String, SqlValue)>,
    ignore_columns: Vec<String>, // 忽略的列（如自增主键）
    keep_falsy: bool,
}

impl InsertBuilder {
    /// 创建 InsertBuilder
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            ignore_columns: Vec::new(),
            keep_falsy: false,
        }
    }

    /// 添加一列（可链式调用多次），同名列覆盖前值
    pub fn value(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        set_column(&mut self.columns, column.into(), value.into());
        self
    }

    /// 添加多列
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

    /// 忽略某些列（如主键、自动递增字段）
    pub fn ignore_column(mut self, column: &str) -> Self {
        self.ignore_columns.push(column.to_string());
        self
    }

    /// 原样绑定假值，不转为空字符串
    pub fn keep_falsy(mut self) -> Self {
        self.keep_falsy = true;
        self
    }

    /// 生成 SQL 和参数映射
    pub fn build(&self) -> Result<(String, Params)> {
        ensure_table_name(&self.table)?;

        let mut names = Vec::with_capacity(self.columns.len());
        let mut markers = Vec::with_capacity(self.columns.len());
        let mut params = Params::with_capacity(self.columns.len());

        for (column, value) in &self.columns {
            if self.ignore_columns.contains(column) {
                continue;
            }
            ensure_field_name(column)?;

            let m = marker(column);
            let value = if self.keep_falsy {
                value.clone()
            } else {
                normalize_falsy(value)
            };
            params.insert(m.clone(), value);
            names.push(column.as_str());
            markers.push(m);
        }

        if names.is_empty() {
            return Err(SqlxMapError::InvalidField(
                "No fields to insert".to_string(),
            ));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            names.join(", "),
            markers.join(", ")
        );
        Ok((sql, params))
    }

    /// 执行插入，返回自增 ID（字符串形式）
    pub async fn execute<S: Session + ?Sized>(self, session: &mut S) -> Result<String> {
        let (sql, params) = self.build()?;
        let result = QueryMapper::new(session)
            .execute_mapped(&sql, &params, ReturnMode::InsertId)
            .await?;
        result
            .insert_id()
            .map(str::to_string)
            .ok_or_else(|| SqlxMapError::Other("insert did not return an id".to_string()))
    }
}
