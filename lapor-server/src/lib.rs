//! Lapor Server - 学校餐食事件工单服务
//!
//! # 架构概述
//!
//! - **工单** (`tickets`): 命令 → 事件 → 快照，含能力矩阵、状态机、签名校验和建议生成
//! - **存储** (`store`): 协作方接口及 redb 实现，乐观并发
//! - **认证** (`auth`): Bearer JWT 验证
//! - **HTTP API** (`api`, `routes`): axum 路由和处理器
//!
//! # 模块结构
//!
//! ```text
//! lapor-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证
//! ├── tickets/       # 工单生命周期
//! ├── store/         # 存储接口与 redb
//! ├── api/           # HTTP 处理器
//! ├── routes/        # 路由与中间件
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod routes;
pub mod store;
pub mod tickets;
pub mod utils;

use std::path::PathBuf;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use store::RedbStore;
pub use tickets::{TicketError, TicketManager};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// 日志文件保留天数
const LOG_RETENTION_DAYS: u64 = 14;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境
///
/// 1. 加载 `.env`
/// 2. 初始化日志：`LOG_LEVEL` 控制级别；`LOG_JSON=true` 时输出 JSON 到
///    `{WORK_DIR}/logs` 并清理过期日志
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);

    if json {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let log_dir = PathBuf::from(work_dir).join("logs");
        init_logger_with_file(Some(&level), true, Some(&log_dir))?;
        let removed = cleanup_old_logs(&log_dir, LOG_RETENTION_DAYS)?;
        if removed > 0 {
            tracing::info!(removed, "Old log files cleaned up");
        }
    } else {
        init_logger_with_file(Some(&level), false, None)?;
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __
   / /   ____ _____  ____  _____
  / /   / __ `/ __ \/ __ \/ ___/
 / /___/ /_/ / /_/ / /_/ / /
/_____/\__,_/ .___/\____/_/
           /_/
    "#
    );
}
