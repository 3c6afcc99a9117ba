//! 拉格朗日插值多项式

use super::Curve;
use crate::Point;
use crate::error::CurveError;

const CURVE_NAME: &str = "Lagrange";

/// 过全部控制点的全局多项式
///
/// `L(x) = Σ_i y_i · Π_{j≠i} (x − x_j)/(x_i − x_j)`
///
/// 控制点变化时整体重建，不做增量更新。
#[derive(Debug, Clone, PartialEq)]
pub struct LagrangePolynomial {
    points: Vec<Point>,
}

impl LagrangePolynomial {
    /// 由控制点构造
    ///
    /// 至少需要 1 个点；任意两点 x 相同会导致除零，直接报错。
    pub fn new(points: &[Point]) -> Result<Self, CurveError> {
        if points.is_empty() {
            return Err(CurveError::TooFewPoints {
                curve: CURVE_NAME,
                required: 1,
                actual: 0,
            });
        }

        for (index, point) in points.iter().enumerate() {
            if !point.is_finite() {
                return Err(CurveError::NonFinite {
                    curve: CURVE_NAME,
                    index,
                });
            }
            if points[..index].iter().any(|p| p.x == point.x) {
                return Err(CurveError::DuplicateX {
                    curve: CURVE_NAME,
                    x: point.x,
                });
            }
        }

        Ok(Self {
            points: points.to_vec(),
        })
    }

    /// 控制点
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl Curve for LagrangePolynomial {
    fn evaluate(&self, x: f64) -> f64 {
        self.points
            .iter()
            .enumerate()
            .map(|(i, pi)| {
                let basis: f64 = self
                    .points
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, pj)| (x - pj.x) / (pi.x - pj.x))
                    .product();
                pi.y * basis
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolates_control_points() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.2, 0.7),
            Point::new(0.55, 0.3),
            Point::new(0.8, 1.25),
            Point::new(1.0, 1.0),
        ];
        let curve = LagrangePolynomial::new(&points).unwrap();
        for p in &points {
            assert_eq!(curve.evaluate(p.x), p.y);
        }
    }

    #[test]
    fn test_single_point_is_constant() {
        let curve = LagrangePolynomial::new(&[Point::new(3.0, 7.5)]).unwrap();
        assert_eq!(curve.evaluate(-10.0), 7.5);
        assert_eq!(curve.evaluate(42.0), 7.5);
    }

    #[test]
    fn test_quadratic_reconstruction() {
        // y = x² 过三点即被精确重建
        let curve = LagrangePolynomial::new(&[
            Point::new(-1.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(2.0, 4.0),
        ])
        .unwrap();
        assert!((curve.evaluate(1.5) - 2.25).abs() < 1e-12);
        assert!((curve.evaluate(3.0) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_points_rejected() {
        let err = LagrangePolynomial::new(&[]).unwrap_err();
        assert!(matches!(err, CurveError::TooFewPoints { actual: 0, .. }));
    }

    #[test]
    fn test_duplicate_x_rejected() {
        let err = LagrangePolynomial::new(&[
            Point::new(0.0, 0.0),
            Point::new(0.5, 1.0),
            Point::new(0.5, 2.0),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CurveError::DuplicateX {
                curve: "Lagrange",
                x: 0.5
            }
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = LagrangePolynomial::new(&[Point::new(0.0, f64::NAN)]).unwrap_err();
        assert!(matches!(err, CurveError::NonFinite { index: 0, .. }));
    }
}
