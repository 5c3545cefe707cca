//! # render 子命令实现
//!
//! 从衍射点列表渲染衍射图像。
//!
//! ## 功能
//! - 支持单文件和批量目录处理
//! - 并行批量渲染（rayon），每个文件独立随机源
//! - 三种渲染模式（legacy / qual / quant）
//! - 输出热图 (PNG/SVG)、矩阵 CSV 或径向分布 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/render.rs` 定义的 RenderArgs
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `diffraction/` 模块进行光栅化和输出
//! - 使用 `parsers/` 读取衍射点

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::render::{RenderArgs, RenderOutputFormat};
use crate::diffraction::{self, PatternRasterizer, RenderMode};
use crate::error::{EdiffError, Result};
use crate::models::DiffractionImage;
use crate::parsers::{self, SpotOptions};
use crate::utils::output;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 渲染配置（单文件与批量共用）
#[derive(Clone)]
struct RenderConfig {
    rasterizer: PatternRasterizer,
    mode: RenderMode,
    seed: Option<u64>,
    with_direct_beam: bool,
    format: RenderOutputFormat,
    scale: u32,
    title: Option<String>,
}

/// 执行 render 命令
pub fn execute(args: RenderArgs) -> Result<()> {
    output::print_header("Electron Diffraction Pattern Rendering");

    // 参数先于文件 I/O 校验
    let mode: RenderMode = args.mode.parse()?;
    let rasterizer = PatternRasterizer::new(args.size, args.sigma, args.max_r)?;

    output::print_info(&format!(
        "Mode: {}, size: {} px, sigma: {} Å⁻¹, max_r: {} Å⁻¹",
        mode, args.size, args.sigma, args.max_r
    ));
    if !mode.is_deterministic() {
        match args.seed {
            Some(seed) => output::print_info(&format!("Random seed: {}", seed)),
            None => output::print_warning("No --seed given, quant output is not reproducible"),
        }
    }

    if args.input.is_file() {
        let format = args
            .format
            .unwrap_or_else(|| guess_format_from_extension(&args.output));
        let config = RenderConfig {
            rasterizer,
            mode,
            seed: args.seed,
            with_direct_beam: args.direct_beam,
            format,
            scale: args.scale,
            title: args.title.clone(),
        };
        execute_single_file(&args.input, &args.output, &config)
    } else if args.input.is_dir() {
        let config = RenderConfig {
            rasterizer,
            mode,
            seed: args.seed,
            with_direct_beam: args.direct_beam,
            format: args.format.unwrap_or(RenderOutputFormat::Png),
            scale: args.scale,
            title: None,
        };
        execute_batch(&args, config)
    } else {
        Err(EdiffError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件模式
fn execute_single_file(input: &Path, output_path: &Path, config: &RenderConfig) -> Result<()> {
    output::print_info(&format!("Single file mode: '{}'", input.display()));

    let image = render_file(input, output_path, config)?;

    print_image_summary(&image, config);
    output::print_success(&format!(
        "Pattern saved to '{}' ({:?})",
        output_path.display(),
        config.format
    ));
    Ok(())
}

/// 批量处理模式
fn execute_batch(args: &RenderArgs, config: RenderConfig) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} spot files", files.len()));

    fs::create_dir_all(&args.output).map_err(|e| EdiffError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    output::print_info(&format!("Output format: {:?}", config.format));

    let config = Arc::new(config);
    let output_dir = args.output.clone();
    let overwrite = args.overwrite;

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, |i, file| {
        process_batch_file(i, file, &output_dir, overwrite, &config)
    })?;

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} success, {} skipped, {} failed",
        result.success, result.skipped, result.failed
    ));

    if !result.skips.is_empty() {
        output::print_info("Skipped files (use --overwrite to re-render):");
        for reason in result.skips.iter().take(10) {
            output::print_info(&format!("  {}", reason));
        }
        if result.skips.len() > 10 {
            output::print_info(&format!("  ... and {} more", result.skips.len() - 10));
        }
    }

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 处理批量模式中的单个文件
fn process_batch_file(
    index: usize,
    input: &PathBuf,
    output_dir: &Path,
    overwrite: bool,
    config: &Arc<RenderConfig>,
) -> ProcessResult {
    let output_file = batch_output_path(input, output_dir, config.format);

    if output_file.exists() && !overwrite {
        return ProcessResult::Skipped(format!(
            "Output exists, skipping: {}",
            output_file.display()
        ));
    }

    // 每个文件一个派生种子，批量结果可复现
    let file_config = RenderConfig {
        seed: config.seed.map(|s| s.wrapping_add(index as u64)),
        title: None,
        ..RenderConfig::clone(config)
    };

    match render_file(input, &output_file, &file_config) {
        Ok(_) => ProcessResult::Success,
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

/// 读取、光栅化并写出一个文件
fn render_file(input: &Path, output_path: &Path, config: &RenderConfig) -> Result<DiffractionImage> {
    let options = SpotOptions {
        with_direct_beam: config.with_direct_beam,
        ..SpotOptions::default()
    };
    let simulation = parsers::parse_spot_file(input, &options)?;

    let mut rng = make_rng(config.seed);
    let image = config
        .rasterizer
        .rasterize(&simulation, &config.mode, &mut rng)?;

    let title = config
        .title
        .clone()
        .unwrap_or_else(|| file_stem(input).to_string());

    write_image(&image, output_path, config.format, &title, config.scale)?;
    Ok(image)
}

/// 按输出格式写出图像
fn write_image(
    image: &DiffractionImage,
    output_path: &Path,
    format: RenderOutputFormat,
    title: &str,
    scale: u32,
) -> Result<()> {
    match format {
        RenderOutputFormat::Png | RenderOutputFormat::Svg => diffraction::plot::render_heatmap(
            image,
            output_path,
            title,
            scale,
            format == RenderOutputFormat::Svg,
        ),
        RenderOutputFormat::Csv => diffraction::export::image_to_csv(image, output_path),
        RenderOutputFormat::Profile => {
            let profile = diffraction::profile::radial_profile(image);
            diffraction::export::profile_to_csv(&profile, output_path)
        }
    }
}

/// 有种子时可复现，否则取系统熵
fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

fn file_stem(path: &Path) -> &str {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pattern")
}

/// 批量模式下的输出文件名
fn batch_output_path(input: &Path, output_dir: &Path, format: RenderOutputFormat) -> PathBuf {
    let suffix = match format {
        RenderOutputFormat::Profile => "profile",
        _ => "pattern",
    };
    output_dir.join(format!(
        "{}_{}.{}",
        file_stem(input),
        suffix,
        format.extension()
    ))
}

/// 从文件扩展名推断输出格式
fn guess_format_from_extension(path: &Path) -> RenderOutputFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("svg") => RenderOutputFormat::Svg,
        Some("csv") | Some("txt") => RenderOutputFormat::Csv,
        _ => RenderOutputFormat::Png,
    }
}

/// 打印图像摘要表格
fn print_image_summary(image: &DiffractionImage, config: &RenderConfig) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct SummaryRow {
        #[tabled(rename = "Property")]
        property: String,
        #[tabled(rename = "Value")]
        value: String,
    }

    let mut rows = vec![
        SummaryRow {
            property: "Mode".to_string(),
            value: config.mode.to_string(),
        },
        SummaryRow {
            property: "Size (px)".to_string(),
            value: format!("{0} x {0}", image.size()),
        },
        SummaryRow {
            property: "Calibration (Å⁻¹/px)".to_string(),
            value: format!("{:.6}", image.calibration),
        },
    ];

    if let Some((row, col)) = image.argmax() {
        let (kx, ky) = image.pixel_to_reciprocal(row, col);
        rows.push(SummaryRow {
            property: "Brightest pixel (row, col)".to_string(),
            value: format!("({}, {})", row, col),
        });
        rows.push(SummaryRow {
            property: "Brightest at (kx, ky) Å⁻¹".to_string(),
            value: format!("({:.4}, {:.4})", kx, ky),
        });
    }

    let lit = image.data.iter().filter(|&&v| v > 0.0).count();
    rows.push(SummaryRow {
        property: "Non-zero pixels".to_string(),
        value: lit.to_string(),
    });

    output::print_header("Rendered Pattern");
    println!("{}", Table::new(&rows));
}
