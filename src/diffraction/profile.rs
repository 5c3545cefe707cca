//! # 径向强度分布
//!
//! 以倒空间原点为中心，按整数像素半径分环做方位角平均。
//!
//! ## 依赖关系
//! - 被 `commands/render.rs` 调用
//! - 使用 `models/image.rs` 的 DiffractionImage

use crate::models::DiffractionImage;

/// 径向分布上的一个点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilePoint {
    /// 散射矢量长度（Å⁻¹）
    pub k: f64,
    /// 环内平均强度
    pub intensity: f64,
}

/// 计算方位角平均的径向分布，空环跳过
pub fn radial_profile(image: &DiffractionImage) -> Vec<ProfilePoint> {
    let size = image.size();
    if size == 0 {
        return Vec::new();
    }

    let center = (size as f64 - 1.0) / 2.0;
    let pitch = image.pixel_pitch();
    let n_rings = (std::f64::consts::SQRT_2 * center).floor() as usize + 1;

    let mut sums = vec![0.0; n_rings];
    let mut counts = vec![0usize; n_rings];

    for ((row, col), &v) in image.data.indexed_iter() {
        let dr = row as f64 - center;
        let dc = col as f64 - center;
        let ring = ((dr * dr + dc * dc).sqrt().round() as usize).min(n_rings - 1);
        sums[ring] += v;
        counts[ring] += 1;
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .filter(|(_, (_, n))| *n > 0)
        .map(|(r, (sum, n))| ProfilePoint {
            k: r as f64 * pitch,
            intensity: sum / n as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_uniform_image_flat_profile() {
        let image = DiffractionImage::new(Array2::from_elem((9, 9), 0.25), 0.1);
        let profile = radial_profile(&image);
        assert!(!profile.is_empty());
        assert_eq!(profile[0].k, 0.0);
        assert!(profile.iter().all(|p| (p.intensity - 0.25).abs() < 1e-12));
    }

    #[test]
    fn test_centre_spike() {
        let mut data = Array2::zeros((5, 5));
        data[[2, 2]] = 1.0;
        // size 5, max_r 1: 节点间距 0.5
        let image = DiffractionImage::new(data, 0.4);
        let profile = radial_profile(&image);
        assert_eq!(profile[0], ProfilePoint { k: 0.0, intensity: 1.0 });
        assert!(profile[1..].iter().all(|p| p.intensity == 0.0));
        assert!((profile[1].k - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ring_peak_location() {
        // 半径 4 像素的环
        let size = 17;
        let mut data = Array2::zeros((size, size));
        for ((r, c), v) in data.indexed_iter_mut() {
            let d = ((r as f64 - 8.0).powi(2) + (c as f64 - 8.0).powi(2)).sqrt();
            if (d - 4.0).abs() < 0.5 {
                *v = 1.0;
            }
        }
        // calibration 2 * 0.85 / 17 = 0.1，节点间距 0.85 / 8
        let image = DiffractionImage::new(data, 0.1);
        let profile = radial_profile(&image);
        let peak = profile
            .iter()
            .max_by(|a, b| a.intensity.partial_cmp(&b.intensity).unwrap())
            .unwrap();
        assert!((peak.k - 4.0 * 0.85 / 8.0).abs() < 1e-12);
    }
}
