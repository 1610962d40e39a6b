//! 数据库连接配置
//!
//! 可以直接给出 URL（`mysql://...` / `sqlite:...`），也可以按 host、username、
//! password、database 四项分别配置。

use crate::driver::DbDriver;
use crate::error::{Result, SqlxMapError};
use serde::Deserialize;

/// 读取连接串的环境变量名
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// 数据库连接配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub driver: DbDriver,
    /// 完整连接串，设置后忽略其余字段
    pub url: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    /// MySQL 为库名，SQLite 为数据库文件路径
    pub database: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            driver: DbDriver::MySql,
            url: None,
            host: "localhost".to_string(),
            port: None,
            username: String::new(),
            password: String::new(),
            database: String::new(),
        }
    }
}

impl DbConfig {
    /// MySQL 连接配置
    pub fn mysql(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            driver: DbDriver::MySql,
            host: host.into(),
            username: username.into(),
            password: password.into(),
            database: database.into(),
            ..Default::default()
        }
    }

    /// SQLite 连接配置，`path` 为数据库文件
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            driver: DbDriver::Sqlite,
            host: String::new(),
            database: path.into(),
            ..Default::default()
        }
    }

    /// 从连接串创建配置
    pub fn from_url(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let driver = DbDriver::from_url(&url)?;
        Ok(Self {
            driver,
            url: Some(url),
            ..Default::default()
        })
    }

    /// 从环境变量 `DATABASE_URL` 读取配置（会先加载 `.env`）
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let url = std::env::var(DATABASE_URL_ENV)
            .map_err(|_| SqlxMapError::Config(format!("{} is not set", DATABASE_URL_ENV)))?;
        Self::from_url(url)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}
