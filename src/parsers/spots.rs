//! # 衍射点列表解析器
//!
//! 读取外部模拟器导出的衍射点 CSV 文件。
//!
//! ## 格式
//! ```text
//! # 注释行以 '#' 开头
//! x,y,intensity,h,k,l
//! 0.0,0.0,100.0,0,0,0
//! 0.2452,0.0,12.5,2,0,0
//! ```
//! - `x`, `y`: 倒空间坐标（Å⁻¹）
//! - `intensity`: 强度
//! - `h`, `k`, `l`: 可选 Miller 指数，仅当所有行都给出时保留
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `models/simulation.rs` 的 DiffractionSimulation
//! - 使用 `csv` + `serde` 反序列化

use crate::error::{EdiffError, Result};
use crate::models::{Calibration, DiffractionSimulation, MillerIndex, Point};

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 单行衍射点记录
#[derive(Debug, Deserialize)]
struct SpotRecord {
    x: f64,
    y: f64,
    intensity: f64,
    #[serde(default)]
    h: Option<i32>,
    #[serde(default)]
    k: Option<i32>,
    #[serde(default)]
    l: Option<i32>,
}

impl SpotRecord {
    fn miller(&self) -> Option<MillerIndex> {
        Some([self.h?, self.k?, self.l?])
    }
}

/// 构造模拟结果时附加的选项
#[derive(Debug, Clone, Copy)]
pub struct SpotOptions {
    pub calibration: Calibration,
    pub offset: Point,
    pub with_direct_beam: bool,
}

impl Default for SpotOptions {
    fn default() -> Self {
        Self {
            calibration: Calibration::default(),
            offset: [0.0, 0.0],
            with_direct_beam: false,
        }
    }
}

/// 解析衍射点文件
pub fn parse_spot_file(path: &Path, options: &SpotOptions) -> Result<DiffractionSimulation> {
    let mut content = String::new();
    File::open(path)
        .and_then(|mut f| f.read_to_string(&mut content))
        .map_err(|e| EdiffError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

    parse_spot_str(&content, options).map_err(|e| match e {
        EdiffError::ParseError { format, reason, .. } => EdiffError::ParseError {
            format,
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

/// 解析衍射点文本
pub fn parse_spot_str(content: &str, options: &SpotOptions) -> Result<DiffractionSimulation> {
    let mut rdr = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut coordinates = Vec::new();
    let mut intensities = Vec::new();
    let mut indices = Vec::new();
    let mut all_indexed = true;

    for (line, record) in rdr.deserialize::<SpotRecord>().enumerate() {
        let record = record.map_err(|e| parse_error(format!("row {}: {}", line + 1, e)))?;

        if !record.x.is_finite() || !record.y.is_finite() || !record.intensity.is_finite() {
            return Err(parse_error(format!("row {}: non-finite value", line + 1)));
        }

        coordinates.push([record.x, record.y]);
        intensities.push(record.intensity);
        match record.miller() {
            Some(hkl) => indices.push(hkl),
            None => all_indexed = false,
        }
    }

    let mut simulation = DiffractionSimulation::new(coordinates, intensities)?
        .with_calibration(options.calibration)
        .with_offset(options.offset)
        .with_direct_beam(options.with_direct_beam);

    if all_indexed && !indices.is_empty() {
        simulation.set_indices(Some(indices))?;
    }

    Ok(simulation)
}

fn parse_error(reason: String) -> EdiffError {
    EdiffError::ParseError {
        format: "spot list".to_string(),
        path: "<memory>".to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# simulated [001] zone
x, y, intensity, h, k, l
0.0, 0.0, 100.0, 0, 0, 0
0.25, 0.0, 12.5, 2, 0, 0
0.0, -0.25, 6.0, 0, -2, 0
";

    #[test]
    fn test_parse_with_indices() {
        let sim = parse_spot_str(SAMPLE, &SpotOptions::default()).unwrap();
        // 直射束默认被屏蔽
        assert_eq!(sim.len(), 2);
        assert_eq!(sim.coordinates(), &[[0.25, 0.0], [0.0, -0.25]]);
        assert_eq!(sim.intensities(), &[12.5, 6.0]);
        assert_eq!(sim.indices().unwrap(), &[[2, 0, 0], [0, -2, 0]]);
    }

    #[test]
    fn test_parse_options_applied() {
        let options = SpotOptions {
            calibration: Calibration::new(0.01, 0.02).unwrap(),
            offset: [0.1, 0.0],
            with_direct_beam: true,
        };
        let sim = parse_spot_str(SAMPLE, &options).unwrap();
        assert_eq!(sim.len(), 3);
        assert_eq!(sim.calibration().as_tuple(), (0.01, 0.02));
        assert_eq!(sim.offset(), [0.1, 0.0]);
    }

    #[test]
    fn test_parse_without_indices() {
        let text = "x,y,intensity\n0.1,0.2,3.0\n-0.1,0.2,4.0\n";
        let sim = parse_spot_str(text, &SpotOptions::default()).unwrap();
        assert_eq!(sim.len(), 2);
        assert!(sim.indices().is_none());
    }

    #[test]
    fn test_parse_empty_file() {
        let sim = parse_spot_str("x,y,intensity\n", &SpotOptions::default()).unwrap();
        assert!(sim.is_empty());
    }

    #[test]
    fn test_parse_bad_row() {
        let text = "x,y,intensity\n0.1,abc,3.0\n";
        assert!(matches!(
            parse_spot_str(text, &SpotOptions::default()),
            Err(EdiffError::ParseError { .. })
        ));
    }

    #[test]
    fn test_parse_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "x,y,intensity\n1,2\n").unwrap();

        match parse_spot_file(&path, &SpotOptions::default()) {
            Err(EdiffError::ParseError { path: p, .. }) => assert!(p.ends_with("bad.csv")),
            other => panic!("unexpected result: {:?}", other),
        }

        let missing = dir.path().join("missing.csv");
        assert!(matches!(
            parse_spot_file(&missing, &SpotOptions::default()),
            Err(EdiffError::FileReadError { .. })
        ));
    }
}
