//! 单元测试用的内存会话

use crate::driver::DbDriver;
use crate::error::{Result, SqlxMapError};
use crate::mapper::{BoundStatement, ReturnMode};
use crate::result_set::{ResultSet, Row};
use crate::session::{DbErrorInfo, Session};
use crate::value::SqlValue;

/// 记录收到的语句，按预设返回结果
#[derive(Debug, Default)]
pub(crate) struct MockSession {
    rows: Vec<Row>,
    insert_id: u64,
    affected_rows: u64,
    failing_prepare: Option<String>,
    last_insert_id: u64,
    last_error: Option<DbErrorInfo>,
    executed: Vec<BoundStatement>,
    raw_queries: Vec<String>,
}

impl MockSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub(crate) fn with_insert_id(mut self, id: u64) -> Self {
        self.insert_id = id;
        self
    }

    pub(crate) fn with_affected_rows(mut self, affected: u64) -> Self {
        self.affected_rows = affected;
        self
    }

    /// SQL 包含 `fragment` 时预编译失败
    pub(crate) fn failing_prepare(mut self, fragment: &str) -> Self {
        self.failing_prepare = Some(fragment.to_string());
        self
    }

    pub(crate) fn row(columns: &[(&str, SqlValue)]) -> Row {
        columns
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    pub(crate) fn executed(&self) -> &[BoundStatement] {
        &self.executed
    }

    pub(crate) fn raw_queries(&self) -> &[String] {
        &self.raw_queries
    }

    fn respond(&mut self, mode: ReturnMode) -> ResultSet {
        if mode.wants_rows() {
            ResultSet::from_rows(self.rows.clone())
        } else {
            self.last_insert_id = self.insert_id;
            ResultSet::from_affected(self.affected_rows)
        }
    }
}

#[async_trait::async_trait]
impl Session for MockSession {
    fn driver(&self) -> DbDriver {
        DbDriver::MySql
    }

    async fn execute_bound(
        &mut self,
        statement: &BoundStatement,
        mode: ReturnMode,
    ) -> Result<ResultSet> {
        if let Some(fragment) = &self.failing_prepare {
            if statement.sql().contains(fragment.as_str()) {
                let info = DbErrorInfo {
                    code: "42000".to_string(),
                    message: "You have an error in your SQL syntax".to_string(),
                };
                let err = SqlxMapError::Prepare {
                    sql: statement.sql().to_string(),
                    code: info.code.clone(),
                    message: info.message.clone(),
                };
                self.last_error = Some(info);
                return Err(err);
            }
        }
        self.executed.push(statement.clone());
        Ok(self.respond(mode))
    }

    async fn query(&mut self, sql: &str, mode: ReturnMode) -> Result<ResultSet> {
        self.raw_queries.push(sql.to_string());
        Ok(self.respond(mode))
    }

    fn last_insert_id(&self) -> u64 {
        self.last_insert_id
    }

    fn last_error(&self) -> Option<&DbErrorInfo> {
        self.last_error.as_ref()
    }
}
