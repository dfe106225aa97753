use thiserror::Error;

use crate::store::StoreError;

/// 启动和运行期错误
///
/// 请求处理函数返回 [`shared::error::AppError`]，这里只覆盖服务器本身。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("存储错误: {0}")]
    Store(#[from] StoreError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("mitra 目录格式错误: {0}")]
    PartnerSeed(#[from] serde_json::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
