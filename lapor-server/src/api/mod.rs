//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`tickets`] - 工单生命周期接口
//! - [`directory`] - 学生报告与 mitra 目录
//! - [`ApiJson`] - 统一错误格式的 JSON 请求体提取器

pub mod directory;
pub mod health;
mod json;
pub mod tickets;

pub use json::ApiJson;

pub use crate::utils::{AppError, AppResult};
