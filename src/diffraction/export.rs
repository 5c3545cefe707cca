//! # 衍射数据导出
//!
//! 导出光栅化图像和径向分布到 CSV。
//!
//! ## 支持格式
//! - 图像矩阵：每行一条记录，无表头，行 0 对应 ky = -max_r
//! - 径向分布：`k,intensity` 两列
//!
//! ## 依赖关系
//! - 被 `commands/render.rs` 调用
//! - 使用 `csv` 库写入 CSV 文件

use crate::diffraction::profile::ProfilePoint;
use crate::error::{EdiffError, Result};
use crate::models::DiffractionImage;

use std::path::Path;

/// 导出图像矩阵为 CSV
pub fn image_to_csv(image: &DiffractionImage, output_path: &Path) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(output_path)?;

    for row in image.data.rows() {
        wtr.write_record(row.iter().map(|v| format!("{:.6e}", v)))?;
    }

    wtr.flush().map_err(|e| EdiffError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出径向分布为 CSV
pub fn profile_to_csv(profile: &[ProfilePoint], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["k", "intensity"])?;

    for point in profile {
        wtr.write_record(&[format!("{:.6}", point.k), format!("{:.6}", point.intensity)])?;
    }

    wtr.flush().map_err(|e| EdiffError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_image_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.csv");
        let image = DiffractionImage::new(array![[0.0, 1.0], [0.5, 0.25]], 1.0);

        image_to_csv(&image, &path).unwrap();

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        let rows: Vec<Vec<f64>> = rdr
            .records()
            .map(|r| r.unwrap().iter().map(|v| v.parse().unwrap()).collect())
            .collect();
        assert_eq!(rows, vec![vec![0.0, 1.0], vec![0.5, 0.25]]);
    }

    #[test]
    fn test_profile_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.csv");
        let profile = vec![
            ProfilePoint { k: 0.0, intensity: 1.0 },
            ProfilePoint { k: 0.05, intensity: 0.125 },
        ];

        profile_to_csv(&profile, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "k,intensity");
        assert_eq!(lines[1], "0.000000,1.000000");
        assert_eq!(lines[2], "0.050000,0.125000");
    }
}
