//! # 衍射图像数据模型
//!
//! 光栅化后的二维强度图像，附带像素标定。
//!
//! 行索引对应 y 方向的 bin，列索引对应 x 方向的 bin，
//! 第 0 行/列位于 `-max_r`。
//!
//! ## 依赖关系
//! - 由 `diffraction/rasterizer.rs` 生成
//! - 被 `diffraction/plot.rs`、`diffraction/export.rs`、`diffraction/profile.rs` 使用

use ndarray::Array2;

/// 归一化的衍射图像
#[derive(Debug, Clone)]
pub struct DiffractionImage {
    /// 像素强度 [row = y, col = x]
    pub data: Array2<f64>,
    /// 每像素倒空间长度（Å⁻¹），等于 2 * max_r / size
    pub calibration: f64,
}

impl DiffractionImage {
    pub fn new(data: Array2<f64>, calibration: f64) -> Self {
        Self { data, calibration }
    }

    /// 边长（像素）
    pub fn size(&self) -> usize {
        self.data.nrows()
    }

    /// 最大像素值
    pub fn max(&self) -> f64 {
        self.data.fold(f64::NEG_INFINITY, |m, &v| m.max(v))
    }

    /// 最大像素的位置 (row, col)，并列时取第一个
    pub fn argmax(&self) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), f64)> = None;
        for (pos, &v) in self.data.indexed_iter() {
            match best {
                Some((_, b)) if v <= b => {}
                _ => best = Some((pos, v)),
            }
        }
        best.map(|(pos, _)| pos)
    }

    /// 图像半宽 max_r（Å⁻¹）
    pub fn half_width(&self) -> f64 {
        self.calibration * self.size() as f64 / 2.0
    }

    /// 相邻网格节点的间距 2 * max_r / (size - 1)
    ///
    /// 像素 k 位于 `linspace(-max_r, max_r, size)[k]`，因此节点间距
    /// 与导出的 `calibration` 不同。
    pub fn pixel_pitch(&self) -> f64 {
        let size = self.size();
        if size < 2 {
            return self.calibration;
        }
        2.0 * self.half_width() / (size - 1) as f64
    }

    /// 像素对应的倒空间网格节点 (x, y)
    pub fn pixel_to_reciprocal(&self, row: usize, col: usize) -> (f64, f64) {
        let half = self.half_width();
        let pitch = self.pixel_pitch();
        (-half + col as f64 * pitch, -half + row as f64 * pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_first_of_ties() {
        let mut data = Array2::zeros((4, 4));
        data[[1, 2]] = 1.0;
        data[[3, 0]] = 1.0;
        let image = DiffractionImage::new(data, 0.5);
        assert_eq!(image.argmax(), Some((1, 2)));
        assert_eq!(image.max(), 1.0);
        assert_eq!(image.size(), 4);
        assert_eq!(image.half_width(), 1.0);
    }

    #[test]
    fn test_pixel_to_reciprocal_grid_nodes() {
        // size 5, max_r 1: calibration 0.4, 节点间距 0.5
        let image = DiffractionImage::new(Array2::zeros((5, 5)), 0.4);
        assert!((image.half_width() - 1.0).abs() < 1e-12);
        assert!((image.pixel_pitch() - 0.5).abs() < 1e-12);

        let (x, y) = image.pixel_to_reciprocal(2, 2);
        assert!(x.abs() < 1e-12 && y.abs() < 1e-12);
        let (x, y) = image.pixel_to_reciprocal(1, 3);
        assert!((x - 0.5).abs() < 1e-12);
        assert!((y + 0.5).abs() < 1e-12);
        let (x, y) = image.pixel_to_reciprocal(0, 4);
        assert!((x - 1.0).abs() < 1e-12);
        assert!((y + 1.0).abs() < 1e-12);
    }
}
