//! # 数据模型模块
//!
//! 定义衍射模拟结果和光栅化图像的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`diffraction/` 和 `commands/` 使用
//! - 子模块: simulation, image

pub mod image;
pub mod simulation;

pub use image::DiffractionImage;
pub use simulation::{Calibration, DiffractionSimulation, MillerIndex, Point};
