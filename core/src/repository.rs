//! 单表仓储
//!
//! 一个 [`Repository`] 固定一张表，借用会话执行该表上的常用操作。
//! 同一进程可以为不同的表各建一个仓储。
//!
//! ```rust,ignore
//! let mut session = SqlxSession::connect_with(&DbConfig::from_env()?).await?;
//! let mut users = Repository::new(TableConfig::new("users"), &mut session);
//!
//! let id = users.insert([("name", "Alice"), ("gender", "f")]).await?;
//! let user = users.get("id", id.as_str()).await?;
//! let women = users
//!     .get_multi("SELECT * FROM users WHERE gender = :gender", &params! { ":gender" => "f" })
//!     .await?;
//! ```

use serde::Deserialize;

use crate::error::Result;
use crate::mapper::{ExecutionResult, QueryMapper, ReturnMode};
use crate::params::Params;
use crate::result_set::Row;
use crate::session::Session;
use crate::utils::{ensure_field_name, ensure_table_name};
use crate::value::SqlValue;

/// 仓储对应的表
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableConfig {
    pub table_name: String,
}

impl TableConfig {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
        }
    }
}

pub struct Repository<'s, S: Session + ?Sized> {
    config: TableConfig,
    session: &'s mut S,
}

impl<'s, S: Session + ?Sized> Repository<'s, S> {
    pub fn new(config: TableConfig, session: &'s mut S) -> Self {
        Self { config, session }
    }

    /// 表名
    pub fn table(&self) -> &str {
        &self.config.table_name
    }

    fn mapper(&mut self) -> QueryMapper<'_, S> {
        QueryMapper::new(&mut *self.session)
    }

    /// 插入一行，返回自增 ID
    pub async fn insert<I, K, V>(&mut self, data: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        let table = self.config.table_name.clone();
        self.mapper().insert(&table, data).await
    }

    /// 按 `check_column = check_value` 更新，返回影响行数
    pub async fn update<I, K, V>(
        &mut self,
        check_column: &str,
        check_value: impl Into<SqlValue>,
        data: I,
    ) -> Result<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        let table = self.config.table_name.clone();
        self.mapper()
            .update(&table, check_column, check_value, data)
            .await
    }

    /// 按单列取一行：`SELECT * FROM <table> WHERE <col> = :<col> LIMIT 1`
    pub async fn get(
        &mut self,
        check_column: &str,
        check_value: impl Into<SqlValue>,
    ) -> Result<Option<Row>> {
        ensure_table_name(self.table())?;
        ensure_field_name(check_column)?;

        let sql = format!(
            "SELECT * FROM {} WHERE {} = :{} LIMIT 1",
            self.table(),
            check_column,
            check_column
        );
        let params = Params::new().with(format!(":{}", check_column), check_value);
        self.mapper().fetch_one(&sql, &params).await
    }

    /// 自定义查询，取第一行
    pub async fn get_single(&mut self, query: &str, params: &Params) -> Result<Option<Row>> {
        self.mapper().fetch_one(query, params).await
    }

    /// 自定义查询，取全部行
    pub async fn get_multi(&mut self, query: &str, params: &Params) -> Result<Vec<Row>> {
        self.mapper().fetch_all(query, params).await
    }

    /// 自定义查询的行数
    pub async fn get_rows(&mut self, query: &str, params: &Params) -> Result<u64> {
        self.mapper().row_count(query, params).await
    }

    /// 带命名参数执行任意语句
    pub async fn execute(
        &mut self,
        query: &str,
        params: &Params,
        mode: ReturnMode,
    ) -> Result<ExecutionResult> {
        self.mapper().execute_mapped(query, params, mode).await
    }

    /// 原样执行 SQL，不做参数处理
    pub async fn query_raw(&mut self, sql: &str, mode: ReturnMode) -> Result<ExecutionResult> {
        self.mapper().execute_raw(sql, mode).await
    }
}
