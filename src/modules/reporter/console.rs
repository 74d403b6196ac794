//! 终端输出

use crate::modules::cleaner::models::RunOutcome;
use crate::modules::common::utils::format_size;
use crate::modules::reconciler::{CleanupPlan, DeletionSet};

fn print_set(title: &str, set: &DeletionSet) {
    if set.is_empty() {
        return;
    }

    println!("{} ({} 项)", title, set.len());
    for candidate in set {
        let size = candidate.size.map(|s| format!(" ({})", format_size(s))).unwrap_or_default();
        match &candidate.detail {
            Some(detail) => println!("  [{:13}] {}{}  {}", set.kind.to_string(), candidate.identifier, size, detail),
            None => println!("  [{:13}] {}{}", set.kind.to_string(), candidate.identifier, size),
        }
    }
    println!();
}

/// 打印扫描结果
pub fn print_plan(plan: &CleanupPlan) {
    println!("\n=== 扫描结果 ===\n");

    print_set("文件与目录", &plan.files);
    print_set("注册表项", &plan.registry);
    print_set("环境变量", &plan.environment);
    print_set("服务", &plan.services);
    print_set("计划任务", &plan.tasks);

    let total = plan.files.len() + plan.registry.len() + plan.environment.len();
    println!("共 {} 项待删除，预计释放 {}", total, format_size(plan.files.total_size()));

    print_warnings(&plan.warnings());
}

pub fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }

    println!("\n警告:");
    for warning in warnings {
        println!("  ! {}", warning);
    }
}

/// 打印执行汇总
pub fn print_summary(outcome: &RunOutcome) {
    println!("\n--- 清理完成 ---");
    println!("  成功: {}", outcome.deleted);
    println!("  失败: {}", outcome.failed);
    println!("  已不存在: {}", outcome.gone);
    println!("  释放空间: {}", format_size(outcome.bytes_freed));

    let failures: Vec<_> = outcome.failures().collect();
    if !failures.is_empty() {
        println!("\n失败项:");
        for (identifier, message) in failures {
            println!("  {}: {}", identifier, message);
        }
    }

    print_warnings(&outcome.warnings);
}
