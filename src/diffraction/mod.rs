//! # 衍射图样模块
//!
//! 提供电子衍射图样的光栅化、后处理和输出功能。
//!
//! ## 子模块
//! - `rasterizer`: 衍射点到稠密图像的光栅化（legacy / qual / quant）
//! - `filter`: 高斯点扩散模糊
//! - `profile`: 径向强度分布
//! - `plot`: 图表生成
//! - `export`: 数据导出
//!
//! ## 依赖关系
//! - 被 `commands/render.rs` 和 `commands/scatter.rs` 使用
//! - 使用 `models/` 的 DiffractionSimulation, DiffractionImage

pub mod export;
pub mod filter;
pub mod plot;
pub mod profile;
pub mod rasterizer;

pub use rasterizer::{PatternRasterizer, RenderMode};
