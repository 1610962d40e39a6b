use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlxMapError {
    #[error("Unsupported database URL: {0}")]
    UnsupportedDatabase(String),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    /// 预编译失败：改写后的 SQL 被数据库拒绝，语句不会被执行
    #[error("Bad SQL: {sql} Error: {code} {message}")]
    Prepare {
        sql: String,
        code: String,
        message: String,
    },
    /// Invalid field error
    #[error("Invalid field: {0}")]
    InvalidField(String),
    /// 配置错误（缺少 DATABASE_URL 等）
    #[error("Configuration error: {0}")]
    Config(String),
    /// Generic error message for compatibility
    #[error("{0}")]
    Other(String),
}

impl SqlxMapError {
    /// 是否为预编译失败
    pub fn is_prepare_error(&self) -> bool {
        matches!(self, SqlxMapError::Prepare { .. })
    }
}

pub type Result<T> = std::result::Result<T, SqlxMapError>;
