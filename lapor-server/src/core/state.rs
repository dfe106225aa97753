use std::path::Path;
use std::sync::Arc;

use shared::models::Partner;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::store::RedbStore;
use crate::tickets::TicketManager;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆一次。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | manager | Arc<TicketManager> | 工单生命周期 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 工单管理器
    pub manager: Arc<TicketManager>,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 用现成的存储构造 (测试用内存库)
    pub fn with_store(config: Config, store: RedbStore) -> Self {
        let manager = TicketManager::with_store(store, config.store_timeout());
        let jwt_service = JwtService::with_config(config.jwt.clone());
        Self {
            config,
            manager: Arc::new(manager),
            jwt_service: Arc::new(jwt_service),
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录
    /// 2. 数据库 (work_dir/lapor.redb)
    /// 3. mitra 目录 (work_dir/partners.json，可选)
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let db_path = config.database_path();
        let store = RedbStore::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Ticket store opened");

        let seeded = seed_partners(&store, &config.partners_seed_path())?;
        if seeded > 0 {
            tracing::info!(count = seeded, "Partner directory seeded");
        }

        Ok(Self::with_store(config.clone(), store))
    }

    pub fn manager(&self) -> &TicketManager {
        &self.manager
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}

/// 从 JSON 文件导入 mitra 目录，文件不存在时跳过
fn seed_partners(store: &RedbStore, path: &Path) -> Result<usize> {
    if !path.exists() {
        return Ok(0);
    }
    let raw = std::fs::read_to_string(path)?;
    let partners: Vec<Partner> = serde_json::from_str(&raw)?;
    store.upsert_partners(&partners)?;
    Ok(partners.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PartnerDirectory;

    #[tokio::test]
    async fn test_initialize_seeds_partners() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("partners.json"),
            r#"[{"id":"p-1","full_name":"CV Mitra Sejahtera","district":"Bandung"}]"#,
        )
        .unwrap();

        let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
        let state = ServerState::initialize(&config).await.unwrap();

        let partners = state.manager().list_partners().await.unwrap();
        assert_eq!(partners.len(), 1);
        assert!(dir.path().join("lapor.redb").exists());
    }

    #[test]
    fn test_missing_seed_is_skipped() {
        let store = RedbStore::open_in_memory().unwrap();
        let seeded = seed_partners(&store, Path::new("/nonexistent/partners.json")).unwrap();
        assert_eq!(seeded, 0);
    }

    #[tokio::test]
    async fn test_malformed_seed_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partners.json");
        std::fs::write(&path, "not json").unwrap();

        let store = RedbStore::open_in_memory().unwrap();
        assert!(matches!(
            seed_partners(&store, &path),
            Err(crate::core::ServerError::PartnerSeed(_))
        ));
        assert!(PartnerDirectory::list(&store).await.unwrap().is_empty());
    }
}
