//! # 高斯点扩散滤波
//!
//! 可分离的二维高斯模糊，用于 `qual` 模式模拟探测器的点扩散函数。
//!
//! - 卷积核截断在 4σ 处，半径 `round(4σ)`
//! - 边界模式 "nearest"：越界采样取最近的边缘像素
//! - 先沿轴 0（行方向）再沿轴 1 卷积
//!
//! ## 依赖关系
//! - 被 `diffraction/rasterizer.rs` 调用
//! - 使用 `ndarray`

use ndarray::{Array2, Axis};

/// 卷积核截断倍数
const TRUNCATE: f64 = 4.0;

/// 对图像做各向同性高斯模糊，`sigma` 单位为像素
pub fn gaussian_filter(image: &Array2<f64>, sigma: f64) -> Array2<f64> {
    if sigma <= 0.0 || !sigma.is_finite() {
        return image.clone();
    }

    let kernel = gaussian_kernel(sigma);
    let pass = convolve_axis(image, &kernel, Axis(0));
    convolve_axis(&pass, &kernel, Axis(1))
}

/// 归一化的一维高斯核，长度 2r+1
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as i64;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x * x) as f64 / (sigma * sigma)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// 沿指定轴做一维卷积
fn convolve_axis(input: &Array2<f64>, kernel: &[f64], axis: Axis) -> Array2<f64> {
    let radius = (kernel.len() / 2) as isize;
    let mut output = Array2::<f64>::zeros(input.raw_dim());

    for (src, mut dst) in input.lanes(axis).into_iter().zip(output.lanes_mut(axis)) {
        let last = src.len() as isize - 1;
        for i in 0..src.len() {
            let mut acc = 0.0;
            for (k, w) in kernel.iter().enumerate() {
                let j = (i as isize + k as isize - radius).clamp(0, last);
                acc += w * src[j as usize];
            }
            dst[i] = acc;
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_normalised_and_symmetric() {
        for sigma in [0.3, 1.0, 3.175, 7.5] {
            let k = gaussian_kernel(sigma);
            assert_eq!(k.len() % 2, 1);
            let sum: f64 = k.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
            for i in 0..k.len() / 2 {
                assert_eq!(k[i], k[k.len() - 1 - i]);
            }
        }
        // r = int(4 * 1.0 + 0.5) = 4
        assert_eq!(gaussian_kernel(1.0).len(), 9);
    }

    #[test]
    fn test_filter_preserves_mass_away_from_edges() {
        let mut image = Array2::zeros((41, 41));
        image[[20, 20]] = 1.0;
        let blurred = gaussian_filter(&image, 2.0);
        let total: f64 = blurred.sum();
        assert!((total - 1.0).abs() < 1e-9);
        // 峰值仍在原处
        let peak = blurred[[20, 20]];
        assert!(blurred.iter().all(|&v| v <= peak));
        assert!(peak < 1.0);
    }

    #[test]
    fn test_filter_nearest_edge_keeps_constant() {
        let image = Array2::from_elem((8, 8), 0.5);
        let blurred = gaussian_filter(&image, 1.5);
        assert!(blurred.iter().all(|&v| (v - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let mut image = Array2::zeros((3, 3));
        image[[0, 1]] = 2.0;
        assert_eq!(gaussian_filter(&image, 0.0), image);
    }
}
