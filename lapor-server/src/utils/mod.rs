//! 工具模块
//!
//! - [`logger`] - 日志初始化与清理
//! - [`validation`] - 文本与附件校验

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
