use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use super::{
    discover, save_report, EXIT_DECLINED, EXIT_OK, EXIT_PARTIAL, PROMPT_DELETE,
    PROMPT_ENVIRONMENT,
};
use crate::modules::backend::{default_backends, Remover};
use crate::modules::catalog::Catalog;
use crate::modules::cleaner::models::RunOutcome;
use crate::modules::cleaner::Cleaner;
use crate::modules::common::prompt::{Prompter, StdinPrompter};
use crate::modules::reporter::console;
use crate::modules::reporter::models::{RunMode, RunReport};
use crate::modules::scanner::ScanContext;

#[derive(Parser, Debug, Default)]
pub struct CleanCommand {
    /// 将结果写入 JSON 报告
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub async fn execute(cmd: CleanCommand) -> Result<i32> {
    let ctx = ScanContext::native(Catalog::beckhoff())?;
    let (primary, fallback) = default_backends();
    let mut prompter = StdinPrompter;
    run(&ctx, &primary, &fallback, &mut prompter, cmd.report.as_deref()).await
}

/// 扫描、确认、删除，返回退出码
pub async fn run(
    ctx: &ScanContext,
    primary: &dyn Remover,
    fallback: &dyn Remover,
    prompter: &mut dyn Prompter,
    report: Option<&Path>,
) -> Result<i32> {
    let plan = discover(ctx, prompter).await;
    let report_base = RunReport::new(RunMode::Clean).with_plan(&plan);

    if !plan.has_primary_work() && plan.environment.is_empty() {
        println!("\n未发现可删除的 TwinCAT 残留");
        console::print_warnings(&plan.warnings());
        save_report(&report_base, report)?;
        return Ok(EXIT_OK);
    }

    console::print_plan(&plan);

    if !prompter.confirm(PROMPT_DELETE) {
        println!("已取消，未删除任何内容");
        save_report(&report_base, report)?;
        return Ok(EXIT_DECLINED);
    }

    println!("\n=== 开始清理 ===\n");

    let cleaner = Cleaner::new(primary, fallback);
    let mut outcome = RunOutcome::default();
    outcome.warnings = plan.warnings();

    outcome.merge(cleaner.execute(&plan.files));
    outcome.merge(cleaner.execute(&plan.registry));

    if !plan.environment.is_empty() {
        if prompter.confirm(PROMPT_ENVIRONMENT) {
            outcome.merge(cleaner.execute(&plan.environment));
        } else {
            outcome
                .warnings
                .push(format!("已保留 {} 项环境变量", plan.environment.len()));
        }
    }

    console::print_summary(&outcome);

    let code = if outcome.failed > 0 { EXIT_PARTIAL } else { EXIT_OK };
    save_report(&report_base.with_outcome(outcome), report)?;

    Ok(code)
}
