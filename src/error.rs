//! # 统一错误处理模块
//!
//! 定义 ediff 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// ediff 统一错误类型
#[derive(Error, Debug)]
pub enum EdiffError {
    // ─────────────────────────────────────────────────────────────
    // 衍射图样错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    #[error("Unsupported render mode '{0}' (expected one of: legacy, qual, quant)")]
    UnsupportedMode(String),

    #[error("Empty pattern: no intensity inside the rendered window, cannot normalise")]
    EmptyPattern,

    #[error("Invalid intensity {value} at spot #{index} (must be finite, non-negative and fit a sample count)")]
    InvalidIntensity { index: usize, value: f64 },

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 第三方库错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plot error: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, EdiffError>;
