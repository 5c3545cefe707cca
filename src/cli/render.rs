//! # render 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/render.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 图像输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RenderOutputFormat {
    /// PNG heatmap
    Png,
    /// SVG heatmap
    Svg,
    /// Dense CSV matrix (one row per image row)
    Csv,
    /// Azimuthally averaged radial profile (CSV: k, intensity)
    Profile,
}

impl RenderOutputFormat {
    /// 输出文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            RenderOutputFormat::Png => "png",
            RenderOutputFormat::Svg => "svg",
            RenderOutputFormat::Csv | RenderOutputFormat::Profile => "csv",
        }
    }
}

/// render 子命令参数
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Input: spot list CSV (x,y,intensity[,h,k,l]) or directory of spot lists
    pub input: PathBuf,

    /// Output: file path (single mode) or directory (batch mode)
    #[arg(short, long, default_value = "pattern.png")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<RenderOutputFormat>,

    /// Side length of the rendered image in pixels
    #[arg(long, default_value_t = 256)]
    pub size: usize,

    /// Standard deviation of the point-spread Gaussian (Å⁻¹)
    #[arg(long, default_value_t = 0.02)]
    pub sigma: f64,

    /// Half side length of the image in reciprocal space (Å⁻¹)
    #[arg(long, default_value_t = 1.0)]
    pub max_r: f64,

    /// Rendering mode: legacy, qual or quant
    #[arg(short, long, default_value = "qual")]
    pub mode: String,

    /// Random seed for quant mode (reproducible output)
    #[arg(long, env = "EDIFF_SEED")]
    pub seed: Option<u64>,

    /// Keep the direct beam (spot at the origin)
    #[arg(long, default_value_t = false)]
    pub direct_beam: bool,

    /// Screen pixels per image pixel for PNG/SVG output
    #[arg(long, default_value_t = 2)]
    pub scale: u32,

    /// Title for the plot (default: input file name)
    #[arg(long)]
    pub title: Option<String>,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode, e.g., "*.csv,*.spots")
    #[arg(long, default_value = "*.csv")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
