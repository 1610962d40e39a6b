#[cfg(not(any(feature = "mysql", feature = "sqlite")))]
compile_error!("enable at least one database feature: \"mysql\" or \"sqlite\"");

pub mod builder;
pub mod config;
mod decode;
pub mod driver;
pub mod error;
pub mod mapper;
pub mod params;
pub mod repository;
pub mod result_set;
pub mod session;
pub mod utils;
pub mod value;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{InsertBuilder, UpdateBuilder};
pub use config::DbConfig;
pub use driver::DbDriver;
pub use error::{Result, SqlxMapError};
pub use mapper::{bind_parameters, BoundStatement, ExecutionResult, QueryMapper, ReturnMode};
pub use params::Params;
pub use repository::{Repository, TableConfig};
pub use result_set::{ResultSet, Row};
pub use session::{DbErrorInfo, Session, SqlxSession};
pub use value::{SqlValue, TypeTag};
