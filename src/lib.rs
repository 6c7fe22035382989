// 公开导出的模块，供外部使用
pub mod models;
pub mod errors;
pub mod config;
pub mod fetchers;
pub mod services;
pub mod sink;
pub mod util;

// 重新导出常用类型，方便使用
pub use config::Config;
pub use errors::{EtlError, Result};
pub use models::joined::{JoinedRow, JoinedTable};
pub use services::pipeline::{EtlService, PipelineReport};
pub use util::DateRange;
