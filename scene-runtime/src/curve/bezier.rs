//! 三次贝塞尔曲线
//!
//! 两种互不等价的算法并存：
//! - [`BezierCubicSolver`]：隐含端点 (0,0)/(1,1)，先对 x 求根得到参数 u，再返回 y(u)
//! - [`SimpleBezier`]：直接把百分比当作参数代入 x 分量公式

use super::Curve;
use crate::Point;

/// Newton–Raphson 迭代次数
const NEWTON_ITERATIONS: usize = 8;
/// 二分法终止宽度
const BISECTION_PRECISION: f64 = 1e-7;

/// 按 x 求根的三次贝塞尔
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierCubicSolver {
    p1: Point,
    p2: Point,
    a: Point,
    b: Point,
    c: Point,
}

impl BezierCubicSolver {
    /// 由两个内部控制点构造
    pub fn new(p1: Point, p2: Point) -> Self {
        let c = p1.scale(3.0);
        let b = (p2 - p1).scale(3.0) - c;
        let a = Point::one() - c - b;
        Self { p1, p2, a, b, c }
    }

    /// 第一个控制点
    pub fn p1(&self) -> Point {
        self.p1
    }

    /// 第二个控制点
    pub fn p2(&self) -> Point {
        self.p2
    }

    /// 给定 x（时间百分比）求对应的 y
    pub fn solve(&self, t: f64) -> f64 {
        if t == 0.0 {
            return 0.0;
        }
        if t == 1.0 {
            return 1.0;
        }
        self.sample_y(self.solve_x(t))
    }

    fn sample_x(&self, u: f64) -> f64 {
        ((self.a.x * u + self.b.x) * u + self.c.x) * u
    }

    fn sample_y(&self, u: f64) -> f64 {
        ((self.a.y * u + self.b.y) * u + self.c.y) * u
    }

    fn sample_derivative_x(&self, u: f64) -> f64 {
        (3.0 * self.a.x * u + 2.0 * self.b.x) * u + self.c.x
    }

    /// 求满足 x(u) == t 的参数 u
    fn solve_x(&self, t: f64) -> f64 {
        let mut u = t;
        for _ in 0..NEWTON_ITERATIONS {
            let err = self.sample_x(u) - t;
            if err.abs() < f64::EPSILON {
                return u;
            }
            let slope = self.sample_derivative_x(u);
            if slope.abs() < f64::EPSILON {
                break;
            }
            u -= err / slope;
        }

        let mut lo = 0.0_f64;
        let mut hi = 1.0_f64;
        let mut u = t;
        if u < lo {
            return lo;
        }
        if u > hi {
            return hi;
        }

        while hi - lo >= BISECTION_PRECISION {
            let x = self.sample_x(u);
            if (x - t).abs() < f64::EPSILON {
                return u;
            }
            if t > x {
                lo = u;
            } else {
                hi = u;
            }
            u = (hi - lo) * 0.5 + lo;
        }
        u
    }
}

impl Curve for BezierCubicSolver {
    fn evaluate(&self, t: f64) -> f64 {
        self.solve(t)
    }
}

/// 直接按百分比求值的三次贝塞尔闭式
///
/// `f(t) = 3(1−t)²t·p1.x + 3(1−t)t²·p2.x + t³`
///
/// 与 [`BezierCubicSolver`] 不是互逆关系，只使用控制点的 x 分量。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleBezier {
    p1: Point,
    p2: Point,
}

impl SimpleBezier {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }
}

impl Curve for SimpleBezier {
    fn evaluate(&self, t: f64) -> f64 {
        let inv = 1.0 - t;
        3.0 * inv * inv * t * self.p1.x + 3.0 * inv * t * t * self.p2.x + t * t * t
    }
}
