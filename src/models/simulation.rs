//! # 衍射模拟结果数据模型
//!
//! 保存一张模拟衍射图样的倒空间衍射点（坐标、强度、可选 Miller 指数）
//! 以及标定参数（calibration / offset）。
//!
//! ## 直射束屏蔽
//! 当 `with_direct_beam == false` 时，坐标恰为 (0, 0) 的点（直射束）
//! 不出现在对外暴露的 `coordinates` / `intensities` / `indices` 中。
//! 屏蔽结果在构造和每次 setter 调用时计算一次并缓存。
//!
//! ## 依赖关系
//! - 被 `parsers/spots.rs` 构造
//! - 被 `diffraction/rasterizer.rs` 和 `diffraction/plot.rs` 读取

use crate::error::{EdiffError, Result};

/// 倒空间坐标 (x, y)，单位 Å⁻¹
pub type Point = [f64; 2];

/// Miller 指数 (h, k, l)
pub type MillerIndex = [i32; 3];

/// 每像素对应的倒空间长度 (x, y)，单位 Å⁻¹/pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    x: f64,
    y: f64,
}

impl Calibration {
    /// 由 x / y 两个方向的标定值创建，任一为零则失败
    pub fn new(x: f64, y: f64) -> Result<Self> {
        if x == 0.0 || y == 0.0 {
            return Err(EdiffError::InvalidCalibration(format!(
                "({}, {}) - calibration cannot be zero",
                x, y
            )));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(EdiffError::InvalidCalibration(format!(
                "({}, {}) - calibration must be finite",
                x, y
            )));
        }
        Ok(Self { x, y })
    }

    /// 两个方向相同的标定值
    pub fn uniform(value: f64) -> Result<Self> {
        Self::new(value, value)
    }

    /// 从标量（长度 1）或二元组（长度 2）创建
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match values {
            [c] => Self::uniform(*c),
            [x, y] => Self::new(*x, *y),
            _ => Err(EdiffError::InvalidCalibration(format!(
                "expected a scalar or a length-2 pair, got {} values",
                values.len()
            ))),
        }
    }

    /// 返回 (x, y)
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

/// 直射束屏蔽后的视图
#[derive(Debug, Clone, Default)]
struct MaskedView {
    coordinates: Vec<Point>,
    intensities: Vec<f64>,
    indices: Option<Vec<MillerIndex>>,
}

/// 一张模拟衍射图样
#[derive(Debug, Clone)]
pub struct DiffractionSimulation {
    raw_coordinates: Vec<Point>,
    raw_intensities: Vec<f64>,
    raw_indices: Option<Vec<MillerIndex>>,
    calibration: Calibration,
    offset: Point,
    with_direct_beam: bool,
    masked: MaskedView,
}

impl DiffractionSimulation {
    /// 创建模拟结果（默认标定 1.0，无偏移，不含直射束）
    pub fn new(coordinates: Vec<Point>, intensities: Vec<f64>) -> Result<Self> {
        check_lengths(coordinates.len(), intensities.len(), "intensities")?;

        let mut sim = Self {
            raw_coordinates: coordinates,
            raw_intensities: intensities,
            raw_indices: None,
            calibration: Calibration::default(),
            offset: [0.0, 0.0],
            with_direct_beam: false,
            masked: MaskedView::default(),
        };
        sim.apply_mask();
        Ok(sim)
    }

    /// 附加 Miller 指数
    pub fn with_indices(mut self, indices: Vec<MillerIndex>) -> Result<Self> {
        self.set_indices(Some(indices))?;
        Ok(self)
    }

    /// 设置标定
    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    /// 设置偏移
    pub fn with_offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    /// 设置是否保留直射束
    pub fn with_direct_beam(mut self, with_direct_beam: bool) -> Self {
        self.set_with_direct_beam(with_direct_beam);
        self
    }

    // ─────────────────────────────────────────────────────────────
    // 屏蔽后的只读视图
    // ─────────────────────────────────────────────────────────────

    pub fn coordinates(&self) -> &[Point] {
        &self.masked.coordinates
    }

    pub fn intensities(&self) -> &[f64] {
        &self.masked.intensities
    }

    pub fn indices(&self) -> Option<&[MillerIndex]> {
        self.masked.indices.as_deref()
    }

    /// 屏蔽后的点数
    pub fn len(&self) -> usize {
        self.masked.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masked.coordinates.is_empty()
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn includes_direct_beam(&self) -> bool {
        self.with_direct_beam
    }

    /// 像素空间坐标：(坐标 + offset) / calibration
    pub fn calibrated_coordinates(&self) -> Vec<Point> {
        let (cx, cy) = self.calibration.as_tuple();
        self.masked
            .coordinates
            .iter()
            .map(|[x, y]| [(x + self.offset[0]) / cx, (y + self.offset[1]) / cy])
            .collect()
    }

    // ─────────────────────────────────────────────────────────────
    // Setters（每次调用后重新计算屏蔽视图）
    // ─────────────────────────────────────────────────────────────

    pub fn set_coordinates_and_intensities(
        &mut self,
        coordinates: Vec<Point>,
        intensities: Vec<f64>,
    ) -> Result<()> {
        check_lengths(coordinates.len(), intensities.len(), "intensities")?;
        if let Some(indices) = &self.raw_indices {
            if indices.len() != coordinates.len() {
                // 旧的指数与新点集不再对应
                self.raw_indices = None;
            }
        }
        self.raw_coordinates = coordinates;
        self.raw_intensities = intensities;
        self.apply_mask();
        Ok(())
    }

    pub fn set_indices(&mut self, indices: Option<Vec<MillerIndex>>) -> Result<()> {
        if let Some(ref idx) = indices {
            check_lengths(self.raw_coordinates.len(), idx.len(), "indices")?;
        }
        self.raw_indices = indices;
        self.apply_mask();
        Ok(())
    }

    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = calibration;
    }

    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    pub fn set_with_direct_beam(&mut self, with_direct_beam: bool) {
        self.with_direct_beam = with_direct_beam;
        self.apply_mask();
    }

    /// 计算屏蔽视图
    fn apply_mask(&mut self) {
        let keep: Vec<bool> = self
            .raw_coordinates
            .iter()
            .map(|p| self.with_direct_beam || !is_direct_beam(p))
            .collect();

        let select = |i: &usize| keep[*i];

        self.masked = MaskedView {
            coordinates: (0..keep.len())
                .filter(select)
                .map(|i| self.raw_coordinates[i])
                .collect(),
            intensities: (0..keep.len())
                .filter(select)
                .map(|i| self.raw_intensities[i])
                .collect(),
            indices: self
                .raw_indices
                .as_ref()
                .map(|idx| (0..keep.len()).filter(select).map(|i| idx[i]).collect()),
        };
    }
}

/// 直射束：坐标恰为原点
fn is_direct_beam(p: &Point) -> bool {
    p[0] == 0.0 && p[1] == 0.0
}

fn check_lengths(expected: usize, actual: usize, what: &str) -> Result<()> {
    if expected != actual {
        return Err(EdiffError::InvalidArgument(format!(
            "{} has {} entries but there are {} coordinates",
            what, actual, expected
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_spots() -> DiffractionSimulation {
        DiffractionSimulation::new(
            vec![[0.0, 0.0], [0.5, 0.0], [0.0, -0.25]],
            vec![100.0, 5.0, 2.0],
        )
        .unwrap()
    }

    #[test]
    fn test_calibration_roundtrip() {
        for (x, y) in [(1.0, 1.0), (0.01, 0.02), (-0.5, 3.0), (1e-6, 1e6)] {
            let cal = Calibration::new(x, y).unwrap();
            assert_eq!(cal.as_tuple(), (x, y));
        }
        assert_eq!(Calibration::uniform(0.3).unwrap().as_tuple(), (0.3, 0.3));
        assert_eq!(
            Calibration::from_slice(&[0.1, 0.2]).unwrap().as_tuple(),
            (0.1, 0.2)
        );
    }

    #[test]
    fn test_calibration_rejects_zero() {
        assert!(matches!(
            Calibration::new(0.0, 1.0),
            Err(EdiffError::InvalidCalibration(_))
        ));
        assert!(matches!(
            Calibration::new(1.0, 0.0),
            Err(EdiffError::InvalidCalibration(_))
        ));
        assert!(matches!(
            Calibration::uniform(0.0),
            Err(EdiffError::InvalidCalibration(_))
        ));
    }

    #[test]
    fn test_calibration_rejects_malformed() {
        assert!(matches!(
            Calibration::from_slice(&[]),
            Err(EdiffError::InvalidCalibration(_))
        ));
        assert!(matches!(
            Calibration::from_slice(&[1.0, 2.0, 3.0]),
            Err(EdiffError::InvalidCalibration(_))
        ));
    }

    #[test]
    fn test_direct_beam_masked() {
        let sim = three_spots();
        assert_eq!(sim.len(), 2);
        assert!(!sim.coordinates().contains(&[0.0, 0.0]));
        assert_eq!(sim.intensities(), &[5.0, 2.0]);
    }

    #[test]
    fn test_direct_beam_kept() {
        let sim = three_spots().with_direct_beam(true);
        assert_eq!(sim.len(), 3);
        assert_eq!(sim.coordinates()[0], [0.0, 0.0]);
        assert_eq!(sim.intensities(), &[100.0, 5.0, 2.0]);
    }

    #[test]
    fn test_mask_recomputed_by_setters() {
        let mut sim = three_spots();
        sim.set_with_direct_beam(true);
        assert_eq!(sim.len(), 3);

        sim.set_coordinates_and_intensities(vec![[0.0, 0.0]], vec![10.0])
            .unwrap();
        assert_eq!(sim.len(), 1);

        sim.set_with_direct_beam(false);
        assert!(sim.is_empty());
        assert!(sim.intensities().is_empty());
    }

    #[test]
    fn test_indices_follow_mask() {
        let sim = three_spots()
            .with_indices(vec![[0, 0, 0], [1, 0, 0], [0, -1, 0]])
            .unwrap();
        assert_eq!(sim.indices().unwrap(), &[[1, 0, 0], [0, -1, 0]]);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            DiffractionSimulation::new(vec![[1.0, 0.0]], vec![1.0, 2.0]),
            Err(EdiffError::InvalidArgument(_))
        ));
        assert!(three_spots().with_indices(vec![[1, 1, 1]]).is_err());
    }

    #[test]
    fn test_calibrated_coordinates() {
        let sim = DiffractionSimulation::new(vec![[0.5, -0.25]], vec![1.0])
            .unwrap()
            .with_calibration(Calibration::new(0.25, 0.5).unwrap())
            .with_offset([0.5, 0.25]);
        assert_eq!(sim.calibrated_coordinates(), vec![[4.0, 0.0]]);
        // 原始坐标不受影响
        assert_eq!(sim.coordinates(), &[[0.5, -0.25]]);
    }

    #[test]
    fn test_set_calibration_and_offset() {
        let mut sim = DiffractionSimulation::new(vec![[0.5, -0.25]], vec![1.0]).unwrap();
        assert_eq!(sim.calibrated_coordinates(), vec![[0.5, -0.25]]);

        sim.set_calibration(Calibration::new(0.25, 0.5).unwrap());
        assert_eq!(sim.calibration().as_tuple(), (0.25, 0.5));
        assert_eq!(sim.calibrated_coordinates(), vec![[2.0, -0.5]]);

        sim.set_offset([0.5, 0.25]);
        assert_eq!(sim.offset(), [0.5, 0.25]);
        assert_eq!(sim.calibrated_coordinates(), vec![[4.0, 0.0]]);

        // 零标定在构造时即失败，原标定保持不变
        let assigned = Calibration::new(0.0, 0.5).map(|cal| sim.set_calibration(cal));
        assert!(matches!(assigned, Err(EdiffError::InvalidCalibration(_))));
        assert_eq!(sim.calibration().as_tuple(), (0.25, 0.5));
    }

    #[test]
    fn test_includes_direct_beam_flag() {
        let mut sim = three_spots();
        assert!(!sim.includes_direct_beam());
        sim.set_with_direct_beam(true);
        assert!(sim.includes_direct_beam());
        assert!(three_spots().with_direct_beam(true).includes_direct_beam());
    }
}
