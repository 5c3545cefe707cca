//! # ediff - 电子衍射图样工具箱
//!
//! 把外部模拟器给出的倒空间衍射点渲染为标定好的二维衍射图像。
//!
//! ## 子命令
//! - `render`  - 衍射点光栅化（legacy / qual / quant 三种模式）
//! - `scatter` - 衍射点散点预览
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/          (命令行参数定义)
//!   ├── commands/     (命令执行逻辑)
//!   │     ├── parsers/     (衍射点解析)
//!   │     ├── diffraction/ (光栅化、滤波、绘图、导出)
//!   │     ├── batch/       (批量并行处理)
//!   │     └── models/      (数据模型)
//!   ├── utils/        (工具函数)
//!   └── error.rs      (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod diffraction;
mod error;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
