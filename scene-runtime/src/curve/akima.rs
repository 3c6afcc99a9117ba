//! Akima 样条
//!
//! 分段三次 Hermite 插值，节点导数由相邻斜率的加权混合得到，
//! 对孤立的异常点比全局三次样条更不容易产生振荡。
//!
//! ## 构造步骤
//!
//! 1. 计算每段斜率 `m_i = Δy/Δx`
//! 2. 计算斜率差权重 `w_i = |m_i − m_{i−1}|`
//! 3. 内部节点（2..n−2）导数取 Akima 加权混合；两侧权重都接近 0 时退化为按区间宽度加权的割线平均
//! 4. 两端各两个节点用三点有限差分近似导数
//! 5. 由节点值和导数生成每段的三次 Hermite 系数

use super::Curve;
use crate::error::CurveError;

const CURVE_NAME: &str = "Akima";

/// 最少节点数
pub const MIN_AKIMA_POINTS: usize = 5;

/// Akima 样条
#[derive(Debug, Clone, PartialEq)]
pub struct AkimaSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    /// 每段多项式系数（低次在前，已去除末尾的 0）
    segments: Vec<Vec<f64>>,
}

impl AkimaSpline {
    /// 由节点坐标构造
    ///
    /// 要求 `xs.len() == ys.len() >= 5`，xs 严格递增且全部为有限值。
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self, CurveError> {
        if xs.len() != ys.len() {
            return Err(CurveError::LengthMismatch {
                curve: CURVE_NAME,
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        if xs.len() < MIN_AKIMA_POINTS {
            return Err(CurveError::TooFewPoints {
                curve: CURVE_NAME,
                required: MIN_AKIMA_POINTS,
                actual: xs.len(),
            });
        }
        for (index, (x, y)) in xs.iter().zip(ys).enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(CurveError::NonFinite {
                    curve: CURVE_NAME,
                    index,
                });
            }
            if index > 0 && *x <= xs[index - 1] {
                return Err(CurveError::NonIncreasingKnots {
                    curve: CURVE_NAME,
                    index,
                    value: *x,
                });
            }
        }

        let n = xs.len();

        let slopes: Vec<f64> = (0..n - 1)
            .map(|i| (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]))
            .collect();

        let mut weights = vec![0.0; n - 1];
        for i in 1..weights.len() {
            weights[i] = (slopes[i] - slopes[i - 1]).abs();
        }

        let mut derivatives = vec![0.0; n];
        for i in 2..n - 2 {
            let w_next = weights[i + 1];
            let w_prev = weights[i - 1];
            derivatives[i] = if w_next < f64::EPSILON && w_prev < f64::EPSILON {
                let x = xs[i];
                let x_next = xs[i + 1];
                let x_prev = xs[i - 1];
                ((x_next - x) * slopes[i - 1] + (x - x_prev) * slopes[i]) / (x_next - x_prev)
            } else {
                (w_next * slopes[i - 1] + w_prev * slopes[i]) / (w_next + w_prev)
            };
        }

        derivatives[0] = differentiate_three_point(xs, ys, 0, 0, 1, 2);
        derivatives[1] = differentiate_three_point(xs, ys, 1, 0, 1, 2);
        derivatives[n - 2] = differentiate_three_point(xs, ys, n - 2, n - 3, n - 2, n - 1);
        derivatives[n - 1] = differentiate_three_point(xs, ys, n - 1, n - 3, n - 2, n - 1);

        let segments = (0..n - 1)
            .map(|i| hermite_coefficients(xs, ys, &derivatives, i))
            .collect();

        Ok(Self {
            knots: xs.to_vec(),
            values: ys.to_vec(),
            segments,
        })
    }

    /// 节点 x 坐标
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// 第 `index` 段的多项式系数
    pub fn segment_coefficients(&self, index: usize) -> Option<&[f64]> {
        self.segments.get(index).map(Vec::as_slice)
    }

    /// 二分查找包含 `x` 的段；未命中时取下侧节点，并限制在有效段范围内
    fn segment_index(&self, x: f64) -> usize {
        let at_or_below = self.knots.partition_point(|&k| k <= x);
        at_or_below.saturating_sub(1).min(self.segments.len() - 1)
    }
}

impl Curve for AkimaSpline {
    fn evaluate(&self, x: f64) -> f64 {
        if let Some(&last) = self.knots.last() {
            if x == last {
                return self.values[self.values.len() - 1];
            }
        }
        let index = self.segment_index(x);
        let local = x - self.knots[index];
        self.segments[index]
            .iter()
            .rev()
            .fold(0.0, |acc, coefficient| acc * local + coefficient)
    }
}

/// 三点有限差分求 `xs[at]` 处的导数
///
/// 用过三个采样点的二次多项式近似，返回其在 `at` 处的斜率。
fn differentiate_three_point(
    xs: &[f64],
    ys: &[f64],
    at: usize,
    first: usize,
    second: usize,
    third: usize,
) -> f64 {
    let y0 = ys[first];
    let y1 = ys[second];
    let y2 = ys[third];

    let t = xs[at] - xs[first];
    let t1 = xs[second] - xs[first];
    let t2 = xs[third] - xs[first];

    let a = (y2 - y0 - (t2 / t1 * (y1 - y0))) / (t2 * t2 - t2 * t1);
    let b = (y1 - y0 - a * t1 * t1) / t1;

    2.0 * a * t + b
}

/// 第 `i` 段的三次 Hermite 系数
fn hermite_coefficients(xs: &[f64], ys: &[f64], derivatives: &[f64], i: usize) -> Vec<f64> {
    let w = xs[i + 1] - xs[i];
    let w2 = w * w;
    let y = ys[i];
    let y_next = ys[i + 1];
    let d = derivatives[i];
    let d_next = derivatives[i + 1];

    let mut coefficients = vec![
        y,
        d,
        (3.0 * (y_next - y) / w - 2.0 * d - d_next) / w,
        (2.0 * (y - y_next) / w + d + d_next) / w2,
    ];
    while coefficients.len() > 1 && coefficients.last() == Some(&0.0) {
        coefficients.pop();
    }
    coefficients
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolates_knots() {
        let xs = [0.0, 0.1, 0.35, 0.4, 0.72, 0.9, 1.0];
        let ys = [0.0, 0.3, -0.2, 0.8, 0.75, 1.4, 1.0];
        let spline = AkimaSpline::new(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(&ys) {
            assert_eq!(spline.evaluate(*x), *y, "x = {x}");
        }
    }

    #[test]
    fn test_alternating_scenario() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 1.0, 0.0, 1.0, 0.0];
        let spline = AkimaSpline::new(&xs, &ys).unwrap();

        assert_eq!(spline.evaluate(2.0), 0.0);

        let mid = spline.evaluate(2.5);
        assert!(mid > 0.0 && mid < 1.0);

        // 段内是三次 Hermite 曲线而不是直线
        let quarter = spline.evaluate(2.25);
        assert!((quarter - 0.15625).abs() < 1e-12);
        assert!((quarter - 0.25).abs() > 1e-3);
    }

    #[test]
    fn test_linear_data_is_reproduced() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let spline = AkimaSpline::new(&xs, &ys).unwrap();
        for x in [0.5, 1.25, 2.5, 3.75, 4.9] {
            assert!((spline.evaluate(x) - (2.0 * x + 1.0)).abs() < 1e-12);
        }
        // 线性数据的高次系数全部为 0，被裁剪掉
        assert_eq!(spline.segment_coefficients(2).map(<[f64]>::len), Some(2));
    }

    #[test]
    fn test_out_of_range_extrapolates_from_edge_segments() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 1.0, 2.0, 3.0, 4.0];
        let spline = AkimaSpline::new(&xs, &ys).unwrap();
        assert!((spline.evaluate(-1.0) + 1.0).abs() < 1e-12);
        assert!((spline.evaluate(5.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_too_few_points_rejected() {
        let err = AkimaSpline::new(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 0.0, 1.0]).unwrap_err();
        assert!(matches!(
            err,
            CurveError::TooFewPoints {
                required: 5,
                actual: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = AkimaSpline::new(&[0.0, 1.0, 2.0, 3.0, 4.0], &[0.0; 6]).unwrap_err();
        assert!(matches!(err, CurveError::LengthMismatch { xs: 5, ys: 6, .. }));
    }

    #[test]
    fn test_non_increasing_rejected() {
        let err =
            AkimaSpline::new(&[0.0, 1.0, 1.0, 3.0, 4.0], &[0.0, 1.0, 0.0, 1.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            CurveError::NonIncreasingKnots { index: 2, .. }
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = AkimaSpline::new(
            &[0.0, 1.0, f64::INFINITY, 3.0, 4.0],
            &[0.0, 1.0, 0.0, 1.0, 0.0],
        )
        .unwrap_err();
        assert!(matches!(err, CurveError::NonFinite { index: 2, .. }));
    }
}
