//! # 批量执行器
//!
//! 并行执行批量渲染任务。
//!
//! ## 功能
//! - 基于 rayon 线程池的并行迭代
//! - 进度条显示（实时失败计数）
//! - 错误收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/render.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{EdiffError, Result};
use crate::utils::progress;

use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 单个文件处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// 处理成功
    Success,
    /// 跳过（如文件已存在）
    Skipped(String),
    /// 处理失败
    Failed(String, String), // (文件路径, 错误信息)
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
    /// 跳过原因
    pub skips: Vec<String>,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success => self.success += 1,
            ProcessResult::Skipped(reason) => {
                self.skipped += 1;
                self.skips.push(reason);
            }
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器，`jobs == 0` 时使用全部 CPU
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    /// 并行处理文件列表
    ///
    /// `processor` 收到文件在列表中的序号，便于派生每个文件的随机种子。
    pub fn run<F>(&self, files: Vec<PathBuf>, processor: F) -> Result<BatchResult>
    where
        F: Fn(usize, &PathBuf) -> ProcessResult + Sync + Send,
    {
        let pb = progress::create_progress_bar(files.len() as u64, "Rendering");
        let failed_count = AtomicUsize::new(0);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| EdiffError::Other(format!("Failed to build thread pool: {}", e)))?;

        let results: Vec<ProcessResult> = pool.install(|| {
            files
                .par_iter()
                .enumerate()
                .map(|(i, file)| {
                    let result = processor(i, file);

                    if let ProcessResult::Failed(_, _) = result {
                        let failed = failed_count.fetch_add(1, Ordering::Relaxed) + 1;
                        pb.set_message(format!("Rendering ({} failed)", failed));
                    }

                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();

        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }

        Ok(batch_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_collects_results_in_order() {
        let files: Vec<PathBuf> = (0..6).map(|i| PathBuf::from(format!("{}.csv", i))).collect();
        let runner = BatchRunner::new(2);

        let result = runner
            .run(files, |i, path| match i % 3 {
                0 => ProcessResult::Success,
                1 => ProcessResult::Skipped(path.display().to_string()),
                _ => ProcessResult::Failed(path.display().to_string(), "boom".to_string()),
            })
            .unwrap();

        assert_eq!(result.total(), 6);
        assert_eq!((result.success, result.skipped, result.failed), (2, 2, 2));
        assert_eq!(result.failures[0], ("2.csv".to_string(), "boom".to_string()));
        assert_eq!(result.failures[1].0, "5.csv");
        assert_eq!(result.skips, vec!["1.csv".to_string(), "4.csv".to_string()]);
    }
}
