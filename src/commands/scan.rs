use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use super::{discover, save_report, EXIT_OK};
use crate::modules::catalog::Catalog;
use crate::modules::common::prompt::{Prompter, StdinPrompter};
use crate::modules::reporter::console;
use crate::modules::reporter::models::{RunMode, RunReport};
use crate::modules::scanner::ScanContext;

#[derive(Parser, Debug, Default)]
pub struct ScanCommand {
    /// 将结果写入 JSON 报告
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub async fn execute(cmd: ScanCommand) -> Result<i32> {
    let ctx = ScanContext::native(Catalog::beckhoff())?;
    let mut prompter = StdinPrompter;
    run(&ctx, &mut prompter, cmd.report.as_deref()).await
}

pub async fn run(ctx: &ScanContext, prompter: &mut dyn Prompter, report: Option<&Path>) -> Result<i32> {
    let plan = discover(ctx, prompter).await;

    if plan.is_empty() && plan.withheld.is_empty() {
        println!("\n未发现 TwinCAT 残留");
    } else {
        console::print_plan(&plan);
    }

    save_report(&RunReport::new(RunMode::Scan).with_plan(&plan), report)?;
    Ok(EXIT_OK)
}
