use crate::error::{Result, SqlxMapError};
use serde::Deserialize;

/// 数据库驱动类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbDriver {
    #[serde(alias = "mariadb")]
    MySql,
    Sqlite,
}

impl DbDriver {
    /// 从数据库 URL 推断驱动类型
    pub fn from_url(url: &str) -> Result<Self> {
        if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            Ok(DbDriver::MySql)
        } else if url.starts_with("sqlite://") || url.starts_with("sqlite:") {
            Ok(DbDriver::Sqlite)
        } else {
            Err(SqlxMapError::UnsupportedDatabase(url.to_string()))
        }
    }

    /// 位置占位符
    ///
    /// MySQL 和 SQLite 都使用 `?`，不依赖参数索引
    pub fn placeholder(&self) -> &'static str {
        match self {
            DbDriver::MySql | DbDriver::Sqlite => "?",
        }
    }
}
