//! 数据库会话
//!
//! [`Session`] 是映射器依赖的全部能力：预编译并按类型绑定执行、直接执行、
//! 最近插入 ID 和最近一次错误。[`SqlxSession`] 基于单个 sqlx 连接实现它。

use crate::config::DbConfig;
use crate::driver::DbDriver;
use crate::error::{Result, SqlxMapError};
use crate::mapper::{BoundStatement, ReturnMode};
use crate::result_set::ResultSet;
use crate::value::TypeTag;
use sqlx::Connection as _;

/// 数据库返回的错误码和错误信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbErrorInfo {
    pub code: String,
    pub message: String,
}

impl DbErrorInfo {
    fn from_sqlx(err: &sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => Self {
                code: db_err.code().map(|c| c.into_owned()).unwrap_or_default(),
                message: db_err.message().to_string(),
            },
            other => Self {
                code: String::new(),
                message: other.to_string(),
            },
        }
    }
}

/// 数据库会话能力
///
/// 会话只有一个所有者，所有方法都需要 `&mut self`，调用按顺序执行完成后才返回。
#[async_trait::async_trait]
pub trait Session: Send {
    /// 驱动类型，决定位置占位符
    fn driver(&self) -> DbDriver;

    /// 预编译改写后的语句，按类型标记绑定参数并执行
    ///
    /// 预编译失败返回 [`SqlxMapError::Prepare`]，语句不会被执行。
    /// `mode` 为 [`ReturnMode::Rows`] 时读出全部行，否则只记录影响行数和插入 ID。
    async fn execute_bound(
        &mut self,
        statement: &BoundStatement,
        mode: ReturnMode,
    ) -> Result<ResultSet>;

    /// 原样执行 SQL，不做任何参数处理
    async fn query(&mut self, sql: &str, mode: ReturnMode) -> Result<ResultSet>;

    /// 最近一次写操作产生的自增 ID
    fn last_insert_id(&self) -> u64;

    /// 最近一次数据库错误
    fn last_error(&self) -> Option<&DbErrorInfo>;
}

/// 按类型标记把参数绑定到 sqlx 查询上
///
/// `i` 绑定为 i64，`s` 绑定为文本（NULL 已经是空字符串）
macro_rules! bind_statement {
    ($query:expr, $statement:expr) => {{
        let mut query = $query;
        for (tag, value) in $statement.bindings() {
            query = match tag {
                TypeTag::Integer => query.bind(value.as_i64().unwrap_or_default()),
                TypeTag::String => query.bind(value.to_bind_string()),
            };
        }
        query
    }};
}

/// 在一个具体连接上执行预编译语句
macro_rules! execute_prepared {
    ($conn:expr, $statement:expr, $mode:expr, $state:expr, $insert_id:expr, $decode:path) => {{
        use sqlx::{Executor as _, Statement as _};

        let sql = $statement.sql();
        let prepared = match (&mut *$conn).prepare(sql).await {
            Ok(prepared) => prepared,
            Err(err) => return Err($state.prepare_failed(sql, &err)),
        };
        let query = bind_statement!(prepared.query(), $statement);

        if $mode.wants_rows() {
            let rows = query
                .fetch_all(&mut *$conn)
                .await
                .map_err(|err| $state.failed(err))?;
            let rows = rows.iter().map($decode).collect::<Result<Vec<_>>>()?;
            Ok(ResultSet::from_rows(rows))
        } else {
            let done = query
                .execute(&mut *$conn)
                .await
                .map_err(|err| $state.failed(err))?;
            $state.last_insert_id = ($insert_id)(&done);
            Ok(ResultSet::from_affected(done.rows_affected()))
        }
    }};
}

/// 原样执行 SQL
macro_rules! execute_raw {
    ($conn:expr, $sql:expr, $mode:expr, $state:expr, $insert_id:expr, $decode:path) => {{
        use sqlx::Executor as _;

        if $mode.wants_rows() {
            let rows = (&mut *$conn)
                .fetch_all(sqlx::raw_sql($sql))
                .await
                .map_err(|err| $state.failed(err))?;
            let rows = rows.iter().map($decode).collect::<Result<Vec<_>>>()?;
            Ok(ResultSet::from_rows(rows))
        } else {
            let done = (&mut *$conn)
                .execute(sqlx::raw_sql($sql))
                .await
                .map_err(|err| $state.failed(err))?;
            $state.last_insert_id = ($insert_id)(&done);
            Ok(ResultSet::from_affected(done.rows_affected()))
        }
    }};
}

#[derive(Debug)]
enum Conn {
    #[cfg(feature = "mysql")]
    MySql(sqlx::MySqlConnection),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlx::SqliteConnection),
}

/// SQLite 的 rowid 可以为负数，负数不作为插入 ID 返回
#[cfg(feature = "sqlite")]
fn sqlite_insert_id(rowid: i64) -> u64 {
    u64::try_from(rowid).unwrap_or_else(|_| {
        tracing::warn!(target: "sqlxmap::session", rowid, "negative rowid, insert id reported as 0");
        0
    })
}

/// 会话状态，和连接分开保存以便同时借用
#[derive(Debug, Default)]
struct SessionState {
    last_insert_id: u64,
    last_error: Option<DbErrorInfo>,
}

impl SessionState {
    fn failed(&mut self, err: sqlx::Error) -> SqlxMapError {
        self.last_error = Some(DbErrorInfo::from_sqlx(&err));
        SqlxMapError::DatabaseError(err)
    }

    fn prepare_failed(&mut self, sql: &str, err: &sqlx::Error) -> SqlxMapError {
        let info = DbErrorInfo::from_sqlx(err);
        let error = SqlxMapError::Prepare {
            sql: sql.to_string(),
            code: info.code.clone(),
            message: info.message.clone(),
        };
        self.last_error = Some(info);
        error
    }
}

/// 基于单个 sqlx 连接的会话
#[derive(Debug)]
pub struct SqlxSession {
    conn: Conn,
    state: SessionState,
}

impl SqlxSession {
    /// 通过连接串建立会话
    pub async fn connect(url: &str) -> Result<Self> {
        let driver = DbDriver::from_url(url)?;

        let conn = match driver {
            #[cfg(feature = "mysql")]
            DbDriver::MySql => Conn::MySql(sqlx::MySqlConnection::connect(url).await?),
            #[cfg(feature = "sqlite")]
            DbDriver::Sqlite => Conn::Sqlite(sqlx::SqliteConnection::connect(url).await?),
            #[allow(unreachable_patterns)]
            _ => {
                return Err(SqlxMapError::UnsupportedDatabase(format!(
                    "Driver {:?} is not enabled, got: {}",
                    driver, url
                )))
            }
        };
        Ok(Self::from_conn(conn))
    }

    /// 通过配置建立会话；配置了 `url` 时直接使用连接串
    pub async fn connect_with(config: &DbConfig) -> Result<Self> {
        if let Some(url) = &config.url {
            return Self::connect(url).await;
        }

        let conn = match config.driver {
            #[cfg(feature = "mysql")]
            DbDriver::MySql => {
                let mut options = sqlx::mysql::MySqlConnectOptions::new()
                    .host(&config.host)
                    .username(&config.username);
                if !config.password.is_empty() {
                    options = options.password(&config.password);
                }
                if !config.database.is_empty() {
                    options = options.database(&config.database);
                }
                if let Some(port) = config.port {
                    options = options.port(port);
                }
                Conn::MySql(sqlx::MySqlConnection::connect_with(&options).await?)
            }
            #[cfg(feature = "sqlite")]
            DbDriver::Sqlite => {
                if config.database.is_empty() {
                    return Err(SqlxMapError::Config(
                        "SQLite database path is empty".to_string(),
                    ));
                }
                let options = sqlx::sqlite::SqliteConnectOptions::new()
                    .filename(&config.database)
                    .create_if_missing(true);
                Conn::Sqlite(sqlx::SqliteConnection::connect_with(&options).await?)
            }
            #[allow(unreachable_patterns)]
            _ => {
                return Err(SqlxMapError::UnsupportedDatabase(format!(
                    "Driver {:?} is not enabled",
                    config.driver
                )))
            }
        };
        Ok(Self::from_conn(conn))
    }

    /// 从已有的 MySQL 连接创建会话
    #[cfg(feature = "mysql")]
    pub fn from_mysql(conn: sqlx::MySqlConnection) -> Self {
        Self::from_conn(Conn::MySql(conn))
    }

    /// 从已有的 SQLite 连接创建会话
    #[cfg(feature = "sqlite")]
    pub fn from_sqlite(conn: sqlx::SqliteConnection) -> Self {
        Self::from_conn(Conn::Sqlite(conn))
    }

    fn from_conn(conn: Conn) -> Self {
        Self {
            conn,
            state: SessionState::default(),
        }
    }

    /// 关闭连接
    pub async fn close(self) -> Result<()> {
        match self.conn {
            #[cfg(feature = "mysql")]
            Conn::MySql(conn) => conn.close().await?,
            #[cfg(feature = "sqlite")]
            Conn::Sqlite(conn) => conn.close().await?,
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Session for SqlxSession {
    fn driver(&self) -> DbDriver {
        match self.conn {
            #[cfg(feature = "mysql")]
            Conn::MySql(_) => DbDriver::MySql,
            #[cfg(feature = "sqlite")]
            Conn::Sqlite(_) => DbDriver::Sqlite,
        }
    }

    async fn execute_bound(
        &mut self,
        statement: &BoundStatement,
        mode: ReturnMode,
    ) -> Result<ResultSet> {
        let Self { conn, state } = self;
        match conn {
            #[cfg(feature = "mysql")]
            Conn::MySql(conn) => execute_prepared!(
                conn,
                statement,
                mode,
                state,
                |done: &sqlx::mysql::MySqlQueryResult| done.last_insert_id(),
                crate::decode::mysql_row
            ),
            #[cfg(feature = "sqlite")]
            Conn::Sqlite(conn) => execute_prepared!(
                conn,
                statement,
                mode,
                state,
                |done: &sqlx::sqlite::SqliteQueryResult| sqlite_insert_id(done.last_insert_rowid()),
                crate::decode::sqlite_row
            ),
        }
    }

    async fn query(&mut self, sql: &str, mode: ReturnMode) -> Result<ResultSet> {
        let Self { conn, state } = self;
        match conn {
            #[cfg(feature = "mysql")]
            Conn::MySql(conn) => execute_raw!(
                conn,
                sql,
                mode,
                state,
                |done: &sqlx::mysql::MySqlQueryResult| done.last_insert_id(),
                crate::decode::mysql_row
            ),
            #[cfg(feature = "sqlite")]
            Conn::Sqlite(conn) => execute_raw!(
                conn,
                sql,
                mode,
                state,
                |done: &sqlx::sqlite::SqliteQueryResult| sqlite_insert_id(done.last_insert_rowid()),
                crate::decode::sqlite_row
            ),
        }
    }

    fn last_insert_id(&self) -> u64 {
        self.state.last_insert_id
    }

    fn last_error(&self) -> Option<&DbErrorInfo> {
        self.state.last_error.as_ref()
    }
}
