//! # Curve 模块
//!
//! 纯函数曲线库：把实数参数（通常是时间百分比）映射为实数结果。
//!
//! ## 曲线族
//!
//! - [`BezierCubicSolver`]：三次贝塞尔，按 x 求根后返回 y（Newton–Raphson + 二分）
//! - [`SimpleBezier`]：三次贝塞尔闭式，直接以百分比为参数
//! - [`LagrangePolynomial`]：过全部控制点的拉格朗日多项式
//! - [`AkimaSpline`]：Akima 分段三次 Hermite 样条
//! - [`QuadraticInOut`]：二次缓入缓出
//!
//! 曲线不限制参数范围，构造后不可变；控制点变化时需要重新构造。

mod akima;
mod bezier;
mod easing;
mod lagrange;

pub use akima::AkimaSpline;
pub use bezier::{BezierCubicSolver, SimpleBezier};
pub use easing::QuadraticInOut;
pub use lagrange::LagrangePolynomial;

/// 曲线接口
pub trait Curve {
    /// 计算曲线在 `t` 处的值
    fn evaluate(&self, t: f64) -> f64;
}

/// 已构造的曲线
///
/// 补间持有的方程，统一各曲线族的求值入口。
#[derive(Debug, Clone, PartialEq)]
pub enum Equation {
    BezierCubicSolver(BezierCubicSolver),
    SimpleBezier(SimpleBezier),
    Lagrange(LagrangePolynomial),
    Akima(AkimaSpline),
    QuadraticInOut(QuadraticInOut),
}

impl Curve for Equation {
    fn evaluate(&self, t: f64) -> f64 {
        match self {
            Equation::BezierCubicSolver(c) => c.evaluate(t),
            Equation::SimpleBezier(c) => c.evaluate(t),
            Equation::Lagrange(c) => c.evaluate(t),
            Equation::Akima(c) => c.evaluate(t),
            Equation::QuadraticInOut(c) => c.evaluate(t),
        }
    }
}

impl From<BezierCubicSolver> for Equation {
    fn from(c: BezierCubicSolver) -> Self {
        Equation::BezierCubicSolver(c)
    }
}

impl From<SimpleBezier> for Equation {
    fn from(c: SimpleBezier) -> Self {
        Equation::SimpleBezier(c)
    }
}

impl From<LagrangePolynomial> for Equation {
    fn from(c: LagrangePolynomial) -> Self {
        Equation::Lagrange(c)
    }
}

impl From<AkimaSpline> for Equation {
    fn from(c: AkimaSpline) -> Self {
        Equation::Akima(c)
    }
}

impl From<QuadraticInOut> for Equation {
    fn from(c: QuadraticInOut) -> Self {
        Equation::QuadraticInOut(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    #[test]
    fn test_equation_dispatch() {
        let equations: Vec<Equation> = vec![
            BezierCubicSolver::new(Point::new(0.25, 0.1), Point::new(0.25, 1.0)).into(),
            SimpleBezier::new(Point::new(0.25, 0.1), Point::new(0.25, 1.0)).into(),
            LagrangePolynomial::new(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)])
                .unwrap()
                .into(),
            AkimaSpline::new(&[0.0, 0.25, 0.5, 0.75, 1.0], &[0.0, 0.25, 0.5, 0.75, 1.0])
                .unwrap()
                .into(),
            QuadraticInOut.into(),
        ];

        for equation in &equations {
            assert_eq!(equation.evaluate(0.0), 0.0, "{equation:?}");
            assert!((equation.evaluate(1.0) - 1.0).abs() < 1e-12, "{equation:?}");
        }
    }
}
