//! Drag coefficient curves fitted over reference drag tables.
use std::io;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::drag_tables::{G1_TABLE, G2_TABLE, G5_TABLE, G6_TABLE, G7_TABLE, G8_TABLE, GI_TABLE};
use crate::error::{BallisticsError, Result};
use crate::scenario::ConfigError;
use crate::DragModel;

/// Drag table data structure
///
/// Ordered `(mach, cd)` samples. Mach numbers are strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct DragTable {
    points: Vec<(f64, f64)>,
}

impl DragTable {
    /// Create a drag table from caller-supplied samples
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self> {
        if points.len() < 2 {
            return Err(BallisticsError::invalid(format!(
                "drag table needs at least 2 samples, got {}",
                points.len()
            )));
        }
        for (i, &(mach, cd)) in points.iter().enumerate() {
            if !mach.is_finite() || !cd.is_finite() {
                return Err(BallisticsError::invalid(format!(
                    "drag table sample {i} is not finite: ({mach}, {cd})"
                )));
            }
        }
        if let Some(i) = points.windows(2).position(|w| w[1].0 <= w[0].0) {
            return Err(BallisticsError::invalid(format!(
                "drag table mach values must be strictly increasing (sample {})",
                i + 1
            )));
        }
        Ok(Self { points })
    }

    // Built-in tables are checked by the test suite instead of at runtime
    fn builtin(points: &'static [(f64, f64)]) -> Self {
        Self { points: points.to_vec() }
    }

    /// Read a drag table from a two-column CSV file (`mach,cd`)
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::read_csv(file, path)
    }

    /// Read a drag table from CSV data. A header row is allowed on the first line.
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<Self> {
        Self::read_csv(reader, Path::new("<reader>"))
    }

    fn read_csv<R: io::Read>(reader: R, origin: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut points = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|source| ConfigError::Csv {
                path: origin.to_path_buf(),
                source,
            })?;
            if record.len() < 2 {
                return Err(BallisticsError::invalid(format!(
                    "drag table row {} needs two columns",
                    row + 1
                )));
            }
            match (record[0].parse::<f64>(), record[1].parse::<f64>()) {
                (Ok(mach), Ok(cd)) => points.push((mach, cd)),
                // Header
                _ if row == 0 => continue,
                _ => {
                    return Err(BallisticsError::invalid(format!(
                        "drag table row {} is not numeric",
                        row + 1
                    )))
                }
            }
        }
        Self::new(points)
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Local polynomial `constant + linear·M + quadratic·M²` around one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSegment {
    pub quadratic: f64,
    pub linear: f64,
    pub constant: f64,
}

impl CurveSegment {
    #[inline]
    pub fn evaluate(&self, mach: f64) -> f64 {
        self.constant + mach * (self.linear + self.quadratic * mach)
    }

    /// Straight line through `(x0, y0)` with the secant slope of the two samples
    fn secant(anchor: (f64, f64), other: (f64, f64)) -> Self {
        let rate = (other.1 - anchor.1) / (other.0 - anchor.0);
        Self {
            quadratic: 0.0,
            linear: rate,
            constant: anchor.1 - anchor.0 * rate,
        }
    }

    /// Exact quadratic through three samples
    fn through(p1: (f64, f64), p2: (f64, f64), p3: (f64, f64)) -> Self {
        let (x1, y1) = p1;
        let (x2, y2) = p2;
        let (x3, y3) = p3;
        let quadratic = ((y3 - y1) * (x2 - x1) - (y2 - y1) * (x3 - x1))
            / ((x3 * x3 - x1 * x1) * (x2 - x1) - (x2 * x2 - x1 * x1) * (x3 - x1));
        let linear = (y2 - y1 - quadratic * (x2 * x2 - x1 * x1)) / (x2 - x1);
        let constant = y1 - (quadratic * x1 * x1 + linear * x1);
        Self { quadratic, linear, constant }
    }
}

/// Piecewise-quadratic fit of a drag table, one segment per sample.
///
/// Interior segments pass exactly through their sample and both neighbours.
/// The first and last segments are secant lines, which keeps evaluation
/// outside the table range linear.
#[derive(Debug, Clone)]
pub struct DragCurve {
    mach: Vec<f64>,
    segments: Vec<CurveSegment>,
}

impl DragCurve {
    pub fn fit(table: &DragTable) -> Self {
        let points = table.points();
        let n = points.len();
        let mut segments = Vec::with_capacity(n);

        segments.push(CurveSegment::secant(points[0], points[1]));
        for i in 1..n.saturating_sub(1) {
            segments.push(CurveSegment::through(points[i - 1], points[i], points[i + 1]));
        }
        if n > 1 {
            segments.push(CurveSegment::secant(points[n - 1], points[n - 2]));
        }

        Self {
            mach: points.iter().map(|&(m, _)| m).collect(),
            segments,
        }
    }

    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }

    pub fn mach_values(&self) -> &[f64] {
        &self.mach
    }

    /// Index of the segment used for `mach`: the nearest sample, ties going up.
    ///
    /// Out-of-range Mach numbers saturate at the boundary segments.
    pub fn segment_index(&self, mach: f64) -> usize {
        let mut lo = 0;
        let mut hi = self.mach.len() - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.mach[mid] < mach {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        if self.mach[hi] - mach > mach - self.mach[lo] {
            lo
        } else {
            hi
        }
    }

    /// Drag coefficient at `mach`
    #[inline]
    pub fn coefficient(&self, mach: f64) -> f64 {
        self.segments[self.segment_index(mach)].evaluate(mach)
    }
}

static G1_CURVE: Lazy<DragCurve> = Lazy::new(|| DragCurve::fit(&DragTable::builtin(G1_TABLE)));
static G2_CURVE: Lazy<DragCurve> = Lazy::new(|| DragCurve::fit(&DragTable::builtin(G2_TABLE)));
static G5_CURVE: Lazy<DragCurve> = Lazy::new(|| DragCurve::fit(&DragTable::builtin(G5_TABLE)));
static G6_CURVE: Lazy<DragCurve> = Lazy::new(|| DragCurve::fit(&DragTable::builtin(G6_TABLE)));
static G7_CURVE: Lazy<DragCurve> = Lazy::new(|| DragCurve::fit(&DragTable::builtin(G7_TABLE)));
static G8_CURVE: Lazy<DragCurve> = Lazy::new(|| DragCurve::fit(&DragTable::builtin(G8_TABLE)));
static GI_CURVE: Lazy<DragCurve> = Lazy::new(|| DragCurve::fit(&DragTable::builtin(GI_TABLE)));

/// Reference samples for a standard family
pub fn standard_table(drag_model: DragModel) -> &'static [(f64, f64)] {
    match drag_model {
        DragModel::G1 => G1_TABLE,
        DragModel::G2 => G2_TABLE,
        DragModel::G5 => G5_TABLE,
        DragModel::G6 => G6_TABLE,
        DragModel::G7 => G7_TABLE,
        DragModel::G8 => G8_TABLE,
        DragModel::GI | DragModel::GS => GI_TABLE,
    }
}

/// Fitted curve for a standard family, built on first use
pub fn standard_curve(drag_model: DragModel) -> &'static DragCurve {
    match drag_model {
        DragModel::G1 => &G1_CURVE,
        DragModel::G2 => &G2_CURVE,
        DragModel::G5 => &G5_CURVE,
        DragModel::G6 => &G6_CURVE,
        DragModel::G7 => &G7_CURVE,
        DragModel::G8 => &G8_CURVE,
        DragModel::GI | DragModel::GS => &GI_CURVE,
    }
}

/// Get drag coefficient for given Mach number and drag model
pub fn get_drag_coefficient(mach: f64, drag_model: &DragModel) -> f64 {
    standard_curve(*drag_model).coefficient(mach)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_valid() {
        for model in DragModel::ALL {
            let table = DragTable::new(standard_table(model).to_vec());
            assert!(table.is_ok(), "{model} table rejected: {:?}", table.err());
        }
    }

    #[test]
    fn test_one_segment_per_sample() {
        for model in DragModel::ALL {
            let curve = standard_curve(model);
            assert_eq!(curve.segments().len(), standard_table(model).len(), "{model}");
        }
    }

    #[test]
    fn test_segments_reproduce_samples() {
        for model in DragModel::ALL {
            let curve = standard_curve(model);
            for (i, &(mach, cd)) in standard_table(model).iter().enumerate() {
                let value = curve.segments()[i].evaluate(mach);
                assert!((value - cd).abs() < 1e-9, "{model} sample {i}: {value} vs {cd}");
                // Lookup lands on the sample's own segment
                assert_eq!(curve.segment_index(mach), i);
                assert!((curve.coefficient(mach) - cd).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_adjacent_segments_agree_at_shared_samples() {
        for model in DragModel::ALL {
            let curve = standard_curve(model);
            let table = standard_table(model);
            let segments = curve.segments();
            for i in 1..table.len() - 1 {
                let (mach, cd) = table[i];
                let left = segments[i - 1].evaluate(mach);
                let right = segments[i + 1].evaluate(mach);
                assert!((left - cd).abs() < 1e-9, "{model} left of {i}: {left} vs {cd}");
                assert!((right - cd).abs() < 1e-9, "{model} right of {i}: {right} vs {cd}");
            }
        }
    }

    #[test]
    fn test_boundary_segments_are_linear() {
        for model in DragModel::ALL {
            let segments = standard_curve(model).segments();
            assert_eq!(segments[0].quadratic, 0.0);
            assert_eq!(segments[segments.len() - 1].quadratic, 0.0);
        }
    }

    #[test]
    fn test_extrapolation_uses_edge_segments() {
        let curve = standard_curve(DragModel::G1);
        let last = curve.segments().len() - 1;
        assert_eq!(curve.segment_index(-1.0), 0);
        assert_eq!(curve.segment_index(50.0), last);

        // Secant extension of the last two samples
        let (m0, c0) = G1_TABLE[G1_TABLE.len() - 2];
        let (m1, c1) = G1_TABLE[G1_TABLE.len() - 1];
        let expected = c1 + (6.0 - m1) * (c1 - c0) / (m1 - m0);
        assert!((curve.coefficient(6.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_sample_selection() {
        let table = DragTable::new(vec![(0.0, 1.0), (1.0, 2.0), (2.0, 1.0), (3.0, 0.0)]).unwrap();
        let curve = DragCurve::fit(&table);
        assert_eq!(curve.segment_index(0.4), 0);
        assert_eq!(curve.segment_index(0.6), 1);
        // Ties favour the upper sample
        assert_eq!(curve.segment_index(0.5), 1);
        assert_eq!(curve.segment_index(2.5), 3);
    }

    #[test]
    fn test_gi_and_gs_share_samples() {
        assert_eq!(standard_table(DragModel::GI), standard_table(DragModel::GS));
        assert_eq!(
            get_drag_coefficient(0.9, &DragModel::GI),
            get_drag_coefficient(0.9, &DragModel::GS)
        );
    }

    #[test]
    fn test_known_drag_values() {
        let g1_mach1 = get_drag_coefficient(1.0, &DragModel::G1);
        let g7_mach1 = get_drag_coefficient(1.0, &DragModel::G7);
        assert!(g1_mach1 > g7_mach1, "G1 should be > G7 at Mach 1.0");
        for &mach in &[0.1, 0.5, 0.8, 1.0, 1.2, 1.5, 2.0, 3.0, 5.0] {
            assert!(get_drag_coefficient(mach, &DragModel::G1) > 0.0, "G1 at Mach {mach}");
            assert!(get_drag_coefficient(mach, &DragModel::G7) > 0.0, "G7 at Mach {mach}");
        }
    }

    #[test]
    fn test_drag_table_validation() {
        assert!(DragTable::new(vec![(1.0, 0.4)]).is_err());
        assert!(DragTable::new(vec![(1.0, 0.4), (1.0, 0.5)]).is_err());
        assert!(DragTable::new(vec![(1.0, 0.4), (0.5, 0.5)]).is_err());
        assert!(DragTable::new(vec![(0.0, f64::NAN), (1.0, 0.5)]).is_err());
        assert!(DragTable::new(vec![(0.0, 0.4), (1.0, 0.5)]).is_ok());
    }

    #[test]
    fn test_two_sample_table_is_a_line() {
        let table = DragTable::new(vec![(1.0, 0.4), (2.0, 0.6)]).unwrap();
        let curve = DragCurve::fit(&table);
        assert_eq!(curve.segments().len(), 2);
        assert!((curve.coefficient(1.5) - 0.5).abs() < 1e-12);
        assert!((curve.coefficient(3.0) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_drag_table_from_csv() {
        let data = "mach,cd\n0.0, 0.119\n0.7,0.119\n# transonic\n0.85,0.120\n";
        let table = DragTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.points(), &[(0.0, 0.119), (0.7, 0.119), (0.85, 0.120)]);

        let bad = "0.0,0.1\nfast,0.2\n";
        assert!(DragTable::from_csv_reader(bad.as_bytes()).is_err());
    }
}
