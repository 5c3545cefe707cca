//! # 解析器模块
//!
//! 读取外部衍射模拟器输出的衍射点列表。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: spots

pub mod spots;

pub use spots::{parse_spot_file, SpotOptions};
