//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `render`: 衍射点列表光栅化为图像（单文件或批量目录）
//! - `scatter`: 衍射点散点预览
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: render, scatter

pub mod render;
pub mod scatter;

use clap::{Parser, Subcommand};

/// ediff - 电子衍射图样工具箱
#[derive(Parser)]
#[command(name = "ediff")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Electron diffraction pattern rendering and analysis toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Rasterize simulated diffraction spots into a calibrated image
    Render(render::RenderArgs),

    /// Plot the simulated spots as a scatter preview
    Scatter(scatter::ScatterArgs),
}

/// 解析逗号分隔的浮点数列表（如 "0.01" 或 "0.01,0.02"）
pub fn parse_float_list(input: &str) -> Result<Vec<f64>, String> {
    input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| format!("Invalid number '{}' in '{}'", s, input))
        })
        .collect()
}

/// 解析二元组（如 "0.1,-0.2"）
pub fn parse_pair(input: &str) -> Result<[f64; 2], String> {
    match parse_float_list(input)?.as_slice() {
        [x, y] => Ok([*x, *y]),
        other => Err(format!(
            "Expected two comma-separated numbers, got {} in '{}'",
            other.len(),
            input
        )),
    }
}
