//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `diffraction/`, `utils/`
//! - 子模块: render, scatter

pub mod render;
pub mod scatter;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Render(args) => render::execute(args),
        Commands::Scatter(args) => scatter::execute(args),
    }
}
