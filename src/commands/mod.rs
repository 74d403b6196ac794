pub mod clean;
pub mod scan;

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;

use crate::modules::common::prompt::Prompter;
use crate::modules::reconciler::{build_plan, CleanupPlan};
use crate::modules::reporter::{json, models::RunReport};
use crate::modules::scanner::{self, ScanContext};

/// 完成或无事可做
pub const EXIT_OK: i32 = 0;
/// 用户拒绝删除
pub const EXIT_DECLINED: i32 = 1;
/// 启动失败（权限不足、平台不支持）
pub const EXIT_FATAL: i32 = 2;
/// 执行完成但有删除失败的项目
pub const EXIT_PARTIAL: i32 = 3;

pub const PROMPT_SWEEP: &str = "是否扫描所有磁盘查找残留（可能耗时较长）？";
pub const PROMPT_DELETE: &str = "是否删除以上项目？";
pub const PROMPT_ENVIRONMENT: &str = "是否同时清理匹配的 PATH 片段和环境变量？";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 扫描并删除 TwinCAT 残留（默认）
    Clean(clean::CleanCommand),

    /// 仅扫描并列出残留，不做任何删除
    Scan(scan::ScanCommand),
}

/// 运行全部扫描器，全盘扫描需用户确认
pub async fn discover(ctx: &ScanContext, prompter: &mut dyn Prompter) -> CleanupPlan {
    println!("正在搜索 TwinCAT 残留...");

    let mut sets = scanner::collect_files(ctx);

    if prompter.confirm(PROMPT_SWEEP) {
        println!("正在扫描所有磁盘...");
        sets.push(scanner::collect_volume_sweep(ctx).await);
    }

    sets.extend(scanner::collect_system(ctx));

    build_plan(&sets, &ctx.catalog)
}

/// 指定了路径时写出报告
pub fn save_report(report: &RunReport, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        json::write_report(report, path)?;
        println!("\n报告已生成: {}", path.display());
    }
    Ok(())
}
