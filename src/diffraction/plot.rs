//! # 衍射图样绘图
//!
//! 使用 `plotters` 库输出光栅化图像和衍射点散点预览。
//!
//! ## 功能
//! - 灰度热图（每个像素一个方块），坐标轴为倒空间 Å⁻¹
//! - 散点预览：点大小按 log2(强度) 缩放
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/render.rs` 和 `commands/scatter.rs` 调用
//! - 使用 `models/` 的 DiffractionImage, DiffractionSimulation
//! - 使用 `plotters` 渲染图表

use crate::error::{EdiffError, Result};
use crate::models::{DiffractionImage, DiffractionSimulation};

use plotters::prelude::*;
use std::path::Path;

/// 热图四周留给坐标轴的像素
const AXIS_AREA: u32 = 60;

/// 散点图坐标系
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScatterSpace {
    /// 原始倒空间坐标（Å⁻¹）
    Reciprocal,
    /// 标定后的像素坐标
    Calibrated,
}

/// 输出光栅化图像的灰度热图
///
/// 每个图像像素绘制为 `scale × scale` 的方块。
pub fn render_heatmap(
    image: &DiffractionImage,
    output_path: &Path,
    title: &str,
    scale: u32,
    use_svg: bool,
) -> Result<()> {
    let side = image.size() as u32 * scale.max(1);
    let dims = (side + 2 * AXIS_AREA, side + 2 * AXIS_AREA);

    if use_svg {
        let root = SVGBackend::new(output_path, dims).into_drawing_area();
        draw_heatmap(&root, image, title)?;
        root.present()
            .map_err(|e| EdiffError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, dims).into_drawing_area();
        draw_heatmap(&root, image, title)?;
        root.present()
            .map_err(|e| EdiffError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 绘制热图
fn draw_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    image: &DiffractionImage,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| EdiffError::PlotError(format!("{:?}", e)))?;

    let half = image.half_width();
    let pitch = image.pixel_pitch();
    let extent = half + pitch / 2.0;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 22).into_font())
        .margin(10)
        .x_label_area_size(AXIS_AREA - 10)
        .y_label_area_size(AXIS_AREA - 10)
        .build_cartesian_2d(-extent..extent, -extent..extent)
        .map_err(|e| EdiffError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("kx (Å⁻¹)")
        .y_desc("ky (Å⁻¹)")
        .x_label_style(("sans-serif", 14))
        .y_label_style(("sans-serif", 14))
        .draw()
        .map_err(|e| EdiffError::PlotError(format!("{:?}", e)))?;

    // 方块以网格节点为中心，行 0 在 -max_r，绘图时 y 轴向上
    chart
        .draw_series(image.data.indexed_iter().map(|((row, col), &v)| {
            let (x, y) = image.pixel_to_reciprocal(row, col);
            let x0 = x - pitch / 2.0;
            let y0 = y - pitch / 2.0;
            let level = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            Rectangle::new(
                [(x0, y0), (x0 + pitch, y0 + pitch)],
                RGBColor(level, level, level).filled(),
            )
        }))
        .map_err(|e| EdiffError::PlotError(format!("{:?}", e)))?;

    Ok(())
}

/// 输出衍射点散点预览
pub fn render_scatter(
    simulation: &DiffractionSimulation,
    space: ScatterSpace,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    let points: Vec<(f64, f64, f64)> = match space {
        ScatterSpace::Reciprocal => simulation
            .coordinates()
            .iter()
            .zip(simulation.intensities())
            .map(|([x, y], &i)| (*x, *y, i))
            .collect(),
        ScatterSpace::Calibrated => simulation
            .calibrated_coordinates()
            .into_iter()
            .zip(simulation.intensities())
            .map(|([x, y], &i)| (x, y, i))
            .collect(),
    };

    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_scatter(&root, &points, space, title)?;
        root.present()
            .map_err(|e| EdiffError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_scatter(&root, &points, space, title)?;
        root.present()
            .map_err(|e| EdiffError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 绘制散点图
fn draw_scatter<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    points: &[(f64, f64, f64)],
    space: ScatterSpace,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| EdiffError::PlotError(format!("{:?}", e)))?;

    // 对称范围，留 10% 边距
    let extent = points
        .iter()
        .map(|(x, y, _)| x.abs().max(y.abs()))
        .fold(0.0_f64, f64::max);
    let extent = if extent > 0.0 { extent * 1.1 } else { 1.0 };

    let unit = match space {
        ScatterSpace::Reciprocal => "Reciprocal Dimension (Å⁻¹)",
        ScatterSpace::Calibrated => "Pixel",
    };

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-extent..extent, -extent..extent)
        .map_err(|e| EdiffError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc(unit)
        .y_desc(unit)
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| EdiffError::PlotError(format!("{:?}", e)))?;

    let color = RGBColor(0, 102, 204);
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y, i)| Circle::new((x, y), marker_radius(i), color.filled())),
        )
        .map_err(|e| EdiffError::PlotError(format!("{:?}", e)))?;

    Ok(())
}

/// 点半径：log2(强度)，至少 1 像素
fn marker_radius(intensity: f64) -> u32 {
    let r = intensity.log2();
    if r.is_finite() && r > 1.0 {
        r.round() as u32
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_radius() {
        assert_eq!(marker_radius(0.0), 1);
        assert_eq!(marker_radius(0.5), 1);
        assert_eq!(marker_radius(2.0), 1);
        assert_eq!(marker_radius(8.0), 3);
        assert_eq!(marker_radius(1024.0), 10);
    }
}
