pub mod environment;
pub mod known_paths;
pub mod models;
pub mod pattern_scan;
pub mod registry;
pub mod services;
pub mod tasks;
pub mod volume_sweep;

use std::sync::Arc;

use crate::modules::backend::{native::NativeBackend, FileSystem, Registry, SystemInventory};
use crate::modules::catalog::Catalog;
use crate::modules::common::error::UninstallerError;
use crate::modules::matcher::PatternMatcher;
use models::CandidateSet;

/// 扫描所需的只读上下文
#[derive(Clone)]
pub struct ScanContext {
    pub fs: Arc<dyn FileSystem>,
    pub registry: Arc<dyn Registry>,
    pub inventory: Arc<dyn SystemInventory>,
    pub catalog: Arc<Catalog>,
    pub matcher: Arc<PatternMatcher>,
}

impl ScanContext {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        registry: Arc<dyn Registry>,
        inventory: Arc<dyn SystemInventory>,
        catalog: Catalog,
    ) -> Result<Self, UninstallerError> {
        let matcher = PatternMatcher::new(&catalog.patterns)?;

        Ok(Self {
            fs,
            registry,
            inventory,
            catalog: Arc::new(catalog),
            matcher: Arc::new(matcher),
        })
    }

    /// 使用本机实现
    pub fn native(catalog: Catalog) -> Result<Self, UninstallerError> {
        let backend = Arc::new(NativeBackend::new());
        Self::new(backend.clone(), backend.clone(), backend, catalog)
    }
}

/// 已知路径与固定目录扫描
pub fn collect_files(ctx: &ScanContext) -> Vec<CandidateSet> {
    let known = known_paths::collect_known_paths(ctx.fs.as_ref(), &ctx.catalog);
    tracing::info!("已知路径: {} 项", known.len());

    let scanned = pattern_scan::collect_pattern_matches(ctx.fs.as_ref(), &ctx.catalog, &ctx.matcher);
    tracing::info!("目录扫描: {} 项", scanned.len());

    vec![known, scanned]
}

/// 全盘扫描（耗时，需用户确认后调用）
pub async fn collect_volume_sweep(ctx: &ScanContext) -> CandidateSet {
    let volumes = ctx.fs.volumes();
    tracing::info!("开始全盘扫描 {} 个卷", volumes.len());

    let found = volume_sweep::sweep_volumes(
        ctx.fs.clone(),
        volumes,
        ctx.matcher.clone(),
        Arc::new(ctx.catalog.sweep_denylist.clone()),
    )
    .await;

    tracing::info!("全盘扫描: {} 项", found.len());
    found
}

/// 服务、计划任务、环境变量与注册表
pub fn collect_system(ctx: &ScanContext) -> Vec<CandidateSet> {
    let services = services::collect_services(ctx.inventory.as_ref(), &ctx.matcher);
    tracing::info!("服务: {} 项", services.len());

    let tasks = tasks::collect_scheduled_tasks(ctx.inventory.as_ref(), &ctx.matcher);
    tracing::info!("计划任务: {} 项", tasks.len());

    let env = environment::collect_environment(ctx.inventory.as_ref(), &ctx.matcher);
    tracing::info!("环境变量: {} 项", env.len());

    let registry = registry::collect_registry_keys(ctx.registry.as_ref(), &ctx.catalog, &ctx.matcher);
    tracing::info!("注册表: {} 项", registry.len());

    vec![services, tasks, env, registry]
}
