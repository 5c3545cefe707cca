//! # 衍射图样光栅化
//!
//! 将稀疏的倒空间衍射点（坐标 + 强度）渲染为稠密的二维强度图像。
//!
//! ## 渲染模式
//! - `legacy`: 每个点在每个像素上计算连续高斯并求和。最精确也最慢，
//!   不做范围裁剪，窗口外的点也会贡献尾部强度。
//! - `qual`: 裁剪到 `(-max_r, max_r)` 后把点吸附到最近像素（同一像素
//!   后写覆盖先写），再做一次 `sigma / delta` 像素的高斯模糊。默认模式。
//! - `quant`: 每个点按 `75 * round(I)` 抽取二维正态样本（"电子"），
//!   裁剪到窗口后逐样本计数。可以体现散粒噪声和重叠峰的叠加。
//!
//! 所有模式最后都归一化到最大值 1.0；全零图像返回 `EmptyPattern`。
//!
//! ## 依赖关系
//! - 被 `commands/render.rs` 调用
//! - 使用 `models/` 的 DiffractionSimulation, DiffractionImage
//! - 使用 `diffraction/filter.rs` 做点扩散模糊
//! - 使用 `rayon` 并行计算 legacy 模式的像素

use crate::diffraction::filter;
use crate::error::{EdiffError, Result};
use crate::models::{DiffractionImage, DiffractionSimulation, Point};

use ndarray::{Array2, Zip};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::fmt;
use std::str::FromStr;

/// quant 模式下每单位强度发射的电子数
pub const ELECTRONS_PER_COUNT: usize = 75;

/// 渲染模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// 逐像素连续高斯求和
    Legacy,
    /// 离散化后高斯模糊
    #[default]
    Qual,
    /// Monte-Carlo 电子计数
    Quant {
        /// 每单位（取整后）强度的采样数
        electrons_per_count: usize,
    },
}

impl RenderMode {
    /// 默认采样密度的 quant 模式
    pub fn quant() -> Self {
        RenderMode::Quant {
            electrons_per_count: ELECTRONS_PER_COUNT,
        }
    }

    /// 是否为确定性模式（不消耗随机数）
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, RenderMode::Quant { .. })
    }
}

impl FromStr for RenderMode {
    type Err = EdiffError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(RenderMode::Legacy),
            "qual" => Ok(RenderMode::Qual),
            "quant" => Ok(RenderMode::quant()),
            _ => Err(EdiffError::UnsupportedMode(s.to_string())),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Legacy => write!(f, "legacy"),
            RenderMode::Qual => write!(f, "qual"),
            RenderMode::Quant { .. } => write!(f, "quant"),
        }
    }
}

/// 衍射图样光栅化器
#[derive(Debug, Clone)]
pub struct PatternRasterizer {
    /// 图像边长（像素）
    size: usize,
    /// 点扩散标准差（Å⁻¹）
    sigma: f64,
    /// 窗口半宽（Å⁻¹）
    max_r: f64,
    /// 像素网格节点 linspace(-max_r, max_r, size)
    grid: Vec<f64>,
}

impl PatternRasterizer {
    /// 创建光栅化器
    pub fn new(size: usize, sigma: f64, max_r: f64) -> Result<Self> {
        if size < 2 {
            return Err(EdiffError::InvalidArgument(format!(
                "size must be at least 2 pixels, got {}",
                size
            )));
        }
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(EdiffError::InvalidArgument(format!(
                "sigma must be positive, got {}",
                sigma
            )));
        }
        if !(max_r > 0.0 && max_r.is_finite()) {
            return Err(EdiffError::InvalidArgument(format!(
                "max_r must be positive, got {}",
                max_r
            )));
        }

        Ok(Self {
            size,
            sigma,
            max_r,
            grid: linspace(-max_r, max_r, size),
        })
    }

    /// 相邻网格节点间距 2 * max_r / (size - 1)
    pub fn delta(&self) -> f64 {
        2.0 * self.max_r / (self.size - 1) as f64
    }

    /// 输出图像的标定 2 * max_r / size
    pub fn calibration(&self) -> f64 {
        2.0 * self.max_r / self.size as f64
    }

    /// 光栅化一张衍射图样
    ///
    /// `rng` 只在 quant 模式下使用。
    pub fn rasterize<R: Rng + ?Sized>(
        &self,
        simulation: &DiffractionSimulation,
        mode: &RenderMode,
        rng: &mut R,
    ) -> Result<DiffractionImage> {
        let coords = simulation.coordinates();
        let intensities = simulation.intensities();
        check_intensities(intensities)?;

        let raw = match *mode {
            RenderMode::Legacy => self.render_legacy(coords, intensities),
            RenderMode::Qual => self.render_qual(coords, intensities),
            RenderMode::Quant {
                electrons_per_count,
            } => self.render_quant(coords, intensities, electrons_per_count, rng)?,
        };

        let data = normalise(raw)?;
        Ok(DiffractionImage::new(data, self.calibration()))
    }

    /// legacy: 连续高斯逐像素求和，不裁剪
    fn render_legacy(&self, coords: &[Point], intensities: &[f64]) -> Array2<f64> {
        let mut image = Array2::<f64>::zeros((self.size, self.size));
        let two_var = 2.0 * self.sigma * self.sigma;
        let grid = &self.grid;

        Zip::indexed(&mut image).par_for_each(|(row, col), value| {
            let (x, y) = (grid[col], grid[row]);
            *value = coords
                .iter()
                .zip(intensities)
                .map(|([cx, cy], &i)| {
                    let dx = x - cx;
                    let dy = y - cy;
                    i * (-(dx * dx + dy * dy) / two_var).exp()
                })
                .sum();
        });

        image
    }

    /// qual: 裁剪、吸附到像素、后写覆盖，然后高斯模糊
    fn render_qual(&self, coords: &[Point], intensities: &[f64]) -> Array2<f64> {
        let mut image = Array2::<f64>::zeros((self.size, self.size));

        for (&[x, y], &i) in coords.iter().zip(intensities) {
            if !self.in_window(x, y) {
                continue;
            }
            let (row, col) = (self.digitize(y), self.digitize(x));
            image[[row, col]] = i;
        }

        filter::gaussian_filter(&image, self.sigma / self.delta())
    }

    /// quant: 抽样电子、裁剪、逐样本计数
    fn render_quant<R: Rng + ?Sized>(
        &self,
        coords: &[Point],
        intensities: &[f64],
        electrons_per_count: usize,
        rng: &mut R,
    ) -> Result<Array2<f64>> {
        // 先算出全部样本数，避免部分抽样后才失败
        let counts = sample_counts(intensities, electrons_per_count)?;

        let mut image = Array2::<f64>::zeros((self.size, self.size));

        for (&[cx, cy], n) in coords.iter().zip(counts) {
            if n == 0 {
                continue;
            }

            let dist_x = Normal::new(cx, self.sigma)
                .map_err(|e| EdiffError::Other(format!("Normal distribution: {}", e)))?;
            let dist_y = Normal::new(cy, self.sigma)
                .map_err(|e| EdiffError::Other(format!("Normal distribution: {}", e)))?;

            for _ in 0..n {
                let x = dist_x.sample(rng);
                let y = dist_y.sample(rng);
                if !self.in_window(x, y) {
                    continue;
                }
                image[[self.digitize(y), self.digitize(x)]] += 1.0;
            }
        }

        Ok(image)
    }

    /// 开区间窗口 (-max_r, max_r)
    fn in_window(&self, x: f64, y: f64) -> bool {
        x > -self.max_r && x < self.max_r && y > -self.max_r && y < self.max_r
    }

    /// 右闭区间离散化：返回 i 使 grid[i-1] < v <= grid[i]
    ///
    /// 窗口内的值落在 1..size-1。
    fn digitize(&self, v: f64) -> usize {
        self.grid
            .partition_point(|&edge| edge < v)
            .min(self.size - 1)
    }
}

/// 强度必须有限且非负
fn check_intensities(intensities: &[f64]) -> Result<()> {
    match intensities
        .iter()
        .enumerate()
        .find(|(_, v)| !(**v >= 0.0) || !v.is_finite())
    {
        Some((index, &value)) => Err(EdiffError::InvalidIntensity { index, value }),
        None => Ok(()),
    }
}

/// 每个点的电子数 `electrons_per_count * round(I)`，溢出 usize 时报错
fn sample_counts(intensities: &[f64], electrons_per_count: usize) -> Result<Vec<usize>> {
    intensities
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let rounded = value.round_ties_even();
            if !(rounded >= 0.0 && rounded <= usize::MAX as f64) {
                return Err(EdiffError::InvalidIntensity { index, value });
            }
            electrons_per_count
                .checked_mul(rounded as usize)
                .ok_or(EdiffError::InvalidIntensity { index, value })
        })
        .collect()
}

/// 等间距节点，端点精确
fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    let step = (stop - start) / (n - 1) as f64;
    let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
    if let Some(last) = values.last_mut() {
        *last = stop;
    }
    values
}

/// 归一化到最大值 1.0
fn normalise(mut image: Array2<f64>) -> Result<Array2<f64>> {
    let max = image.fold(0.0_f64, |m, &v| m.max(v));
    if !(max > 0.0) || !max.is_finite() {
        return Err(EdiffError::EmptyPattern);
    }
    image.mapv_inplace(|v| v / max);
    Ok(image)
}
