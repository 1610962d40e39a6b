//! 命名参数映射器
//!
//! 把 `:name` 形式的占位符改写为驱动的位置占位符，按参数类型生成绑定标记，
//! 执行后按调用方要求的返回方式整理结果。
//!
//! ```rust,ignore
//! let mut session = SqlxSession::connect("mysql://root@localhost/app").await?;
//! let mut mapper = QueryMapper::new(&mut session);
//! let user = mapper
//!     .fetch_one(
//!         "SELECT * FROM users WHERE id = :id AND name = :name",
//!         &params! { ":id" => 5, ":name" => "Alice" },
//!     )
//!     .await?;
//! ```

use crate::builder::{InsertBuilder, UpdateBuilder};
use crate::error::{Result, SqlxMapError};
use crate::params::Params;
use crate::result_set::{ResultSet, Row};
use crate::session::Session;
use crate::value::{SqlValue, TypeTag};

/// 返回方式，三者互斥
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnMode {
    /// 返回缓冲结果集
    #[default]
    Rows,
    /// 返回自增 ID（字符串形式）
    InsertId,
    /// 返回影响行数
    AffectedRows,
}

impl ReturnMode {
    /// 是否需要读取结果行
    pub fn wants_rows(self) -> bool {
        matches!(self, ReturnMode::Rows)
    }
}

/// 执行结果，只会有一种
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    Rows(ResultSet),
    InsertId(String),
    AffectedRows(u64),
}

impl ExecutionResult {
    pub fn into_result_set(self) -> Option<ResultSet> {
        match self {
            ExecutionResult::Rows(rs) => Some(rs),
            _ => None,
        }
    }

    pub fn insert_id(&self) -> Option<&str> {
        match self {
            ExecutionResult::InsertId(id) => Some(id),
            _ => None,
        }
    }

    pub fn affected_rows(&self) -> Option<u64> {
        match self {
            ExecutionResult::AffectedRows(n) => Some(*n),
            _ => None,
        }
    }
}

/// 改写完成、等待绑定的语句
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    sql: String,
    tags: Vec<TypeTag>,
    values: Vec<SqlValue>,
}

impl BoundStatement {
    /// 改写后的 SQL
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// 类型标记串，每个参数一个字符
    pub fn types(&self) -> String {
        self.tags.iter().map(|t| t.as_char()).collect()
    }

    /// 待绑定的值，按位置排列，NULL 已经替换为空字符串
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn bindings(&self) -> impl Iterator<Item = (TypeTag, &SqlValue)> {
        self.tags.iter().copied().zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 改写模板并收集绑定参数
///
/// 按 `params` 的顺序，把每个标记在当前 SQL 中的第一次出现替换为 `placeholder`；
/// 模板中找不到的标记直接忽略，不绑定任何值。同一标记出现多次时只替换第一次。
pub fn bind_parameters(template: &str, params: &Params, placeholder: &str) -> BoundStatement {
    let mut sql = template.to_string();
    let mut tags = Vec::with_capacity(params.len());
    let mut values = Vec::with_capacity(params.len());
    let mut previous: Option<usize> = None;

    for (marker, value) in params.iter() {
        let Some(position) = find_marker(&sql, marker) else {
            continue;
        };

        if previous.is_some_and(|p| position < p) {
            tracing::warn!(
                target: "sqlxmap::mapper",
                marker,
                "marker appears before the previously bound marker, positional binding follows parameter order"
            );
        }

        sql.replace_range(position..position + marker.len(), placeholder);
        previous = Some(position);

        // 先记录类型，再把 NULL 变为空字符串
        tags.push(value.type_tag());
        values.push(match value {
            SqlValue::Null => SqlValue::String(String::new()),
            other => other.clone(),
        });
    }

    BoundStatement { sql, tags, values }
}

/// 查找标记的第一次完整出现：`:id` 不会匹配 `:id2` 中的前缀
fn find_marker(sql: &str, marker: &str) -> Option<usize> {
    if marker.is_empty() {
        return None;
    }
    let needs_boundary = marker.chars().last().is_some_and(is_identifier_char);

    sql.match_indices(marker)
        .map(|(position, _)| position)
        .find(|&position| {
            !needs_boundary
                || !sql[position + marker.len()..]
                    .chars()
                    .next()
                    .is_some_and(is_identifier_char)
        })
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// 命名参数映射器，借用一个会话执行所有语句
pub struct QueryMapper<'s, S: Session + ?Sized> {
    session: &'s mut S,
}

impl<'s, S: Session + ?Sized> QueryMapper<'s, S> {
    pub fn new(session: &'s mut S) -> Self {
        Self { session }
    }

    pub fn session(&mut self) -> &mut S {
        &mut *self.session
    }

    /// 改写、绑定并执行命名参数查询
    pub async fn execute_mapped(
        &mut self,
        template: &str,
        params: &Params,
        mode: ReturnMode,
    ) -> Result<ExecutionResult> {
        let statement = bind_parameters(template, params, self.session.driver().placeholder());
        tracing::debug!(
            target: "sqlxmap::mapper",
            sql = statement.sql(),
            types = %statement.types(),
            binds = statement.len(),
            ?mode,
            "executing mapped query"
        );

        let result = match self.session.execute_bound(&statement, mode).await {
            Ok(result) => result,
            Err(err) => {
                if let SqlxMapError::Prepare { sql, code, message } = &err {
                    tracing::error!(
                        target: "sqlxmap::mapper",
                        sql = %sql,
                        code = %code,
                        message = %message,
                        "Bad SQL"
                    );
                }
                return Err(err);
            }
        };
        Ok(self.shape(result, mode))
    }

    /// 原样执行 SQL
    ///
    /// 不做任何参数替换，不要把外部输入拼接进 `sql`。
    pub async fn execute_raw(&mut self, sql: &str, mode: ReturnMode) -> Result<ExecutionResult> {
        tracing::debug!(target: "sqlxmap::mapper", sql, ?mode, "executing raw query");
        let result = self.session.query(sql, mode).await?;
        Ok(self.shape(result, mode))
    }

    fn shape(&self, result: ResultSet, mode: ReturnMode) -> ExecutionResult {
        match mode {
            ReturnMode::InsertId => {
                ExecutionResult::InsertId(self.session.last_insert_id().to_string())
            }
            ReturnMode::AffectedRows => ExecutionResult::AffectedRows(result.affected_rows()),
            ReturnMode::Rows => ExecutionResult::Rows(result),
        }
    }

    /// 参数非空走预编译路径，否则直接执行
    async fn result_set(&mut self, query: &str, params: &Params) -> Result<ResultSet> {
        let result = if params.is_empty() {
            self.execute_raw(query, ReturnMode::Rows).await?
        } else {
            self.execute_mapped(query, params, ReturnMode::Rows).await?
        };
        Ok(result.into_result_set().unwrap_or_default())
    }

    /// 查询单行，没有匹配时返回 None
    pub async fn fetch_one(&mut self, query: &str, params: &Params) -> Result<Option<Row>> {
        let mut rs = self.result_set(query, params).await?;
        Ok(rs.fetch_row())
    }

    /// 查询全部行，保持返回顺序
    pub async fn fetch_all(&mut self, query: &str, params: &Params) -> Result<Vec<Row>> {
        let mut rs = self.result_set(query, params).await?;
        Ok(rs.fetch_all())
    }

    /// 查询匹配的行数
    pub async fn row_count(&mut self, query: &str, params: &Params) -> Result<u64> {
        let rs = self.result_set(query, params).await?;
        Ok(rs.row_count())
    }

    /// 插入一行，返回自增 ID
    pub async fn insert<I, K, V>(&mut self, table: &str, data: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        InsertBuilder::new(table)
            .values(data)
            .execute(&mut *self.session)
            .await
    }

    /// 按条件列更新，返回影响行数
    pub async fn update<I, K, V>(
        &mut self,
        table: &str,
        check_column: &str,
        check_value: impl Into<SqlValue>,
        data: I,
    ) -> Result<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        UpdateBuilder::new(table, check_column, check_value)
            .values(data)
            .execute(&mut *self.session)
            .await
    }
}
