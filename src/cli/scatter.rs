//! # scatter 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/scatter.rs`

use clap::Args;
use std::path::PathBuf;

/// scatter 子命令参数
#[derive(Args, Debug)]
pub struct ScatterArgs {
    /// Input spot list CSV (x,y,intensity[,h,k,l])
    pub input: PathBuf,

    /// Output image (PNG or SVG, by extension)
    #[arg(short, long, default_value = "spots.png")]
    pub output: PathBuf,

    /// Calibration in Å⁻¹ per pixel: a scalar or "cx,cy"
    #[arg(long, default_value = "1.0")]
    pub calibration: String,

    /// Offset in Å⁻¹ applied before calibration: "ox,oy"
    #[arg(long, default_value = "0,0", allow_hyphen_values = true)]
    pub offset: String,

    /// Keep the direct beam (spot at the origin)
    #[arg(long, default_value_t = false)]
    pub direct_beam: bool,

    /// Plot calibrated (pixel) coordinates instead of reciprocal coordinates
    #[arg(long, default_value_t = false)]
    pub calibrated: bool,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1000)]
    pub height: u32,

    /// Title for the plot (default: input file name)
    #[arg(long)]
    pub title: Option<String>,

    /// Number of brightest spots to list
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}
