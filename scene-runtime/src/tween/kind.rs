//! # Kind 模块
//!
//! 补间的曲线族与曲线工厂。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::curve::{AkimaSpline, BezierCubicSolver, Equation, LagrangePolynomial, SimpleBezier};
use crate::error::{ConfigError, CurveError};

/// 补间的曲线族
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenKind {
    /// 三次贝塞尔（按 x 求根）
    Bezier,
    /// 三次贝塞尔（闭式）
    BezierCubic,
    /// 拉格朗日多项式
    Lagrange,
    /// Akima 样条
    AkimaSpline,
}

impl TweenKind {
    pub const ALL: [TweenKind; 4] = [
        TweenKind::Bezier,
        TweenKind::BezierCubic,
        TweenKind::Lagrange,
        TweenKind::AkimaSpline,
    ];

    /// 配置中使用的名字
    pub fn as_str(&self) -> &'static str {
        match self {
            TweenKind::Bezier => "bezier",
            TweenKind::BezierCubic => "bezier_cubic",
            TweenKind::Lagrange => "lagrange",
            TweenKind::AkimaSpline => "akima_spline",
        }
    }
}

impl fmt::Display for TweenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TweenKind {
    type Err = ConfigError;

    /// 忽略大小写与下划线，`BezierCubic`、`bezier_cubic` 都能识别
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "bezier" => Ok(TweenKind::Bezier),
            "beziercubic" => Ok(TweenKind::BezierCubic),
            "lagrange" => Ok(TweenKind::Lagrange),
            "akimaspline" | "akima" => Ok(TweenKind::AkimaSpline),
            _ => Err(ConfigError::UnknownTweenKind(s.to_string())),
        }
    }
}

/// 曲线族与控制数据
///
/// 序列化为带 `type` 标签的对象，例如
/// `{"type": "bezier", "p1": {"x": 0.25, "y": 0.1}, "p2": {"x": 0.25, "y": 1.0}}`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TweenCurveConfig {
    /// 按 x 求根的三次贝塞尔，端点固定为 (0,0) 与 (1,1)
    Bezier { p1: Point, p2: Point },
    /// 闭式三次贝塞尔
    BezierCubic { p1: Point, p2: Point },
    /// 过全部控制点的拉格朗日多项式
    Lagrange { points: Vec<Point> },
    /// 以控制点的 x 为节点的 Akima 样条
    AkimaSpline { points: Vec<Point> },
}

impl TweenCurveConfig {
    /// 曲线族
    pub fn kind(&self) -> TweenKind {
        match self {
            TweenCurveConfig::Bezier { .. } => TweenKind::Bezier,
            TweenCurveConfig::BezierCubic { .. } => TweenKind::BezierCubic,
            TweenCurveConfig::Lagrange { .. } => TweenKind::Lagrange,
            TweenCurveConfig::AkimaSpline { .. } => TweenKind::AkimaSpline,
        }
    }

    /// 按控制数据构造曲线
    pub fn build_equation(&self) -> Result<Equation, CurveError> {
        let equation = match self {
            TweenCurveConfig::Bezier { p1, p2 } => BezierCubicSolver::new(*p1, *p2).into(),
            TweenCurveConfig::BezierCubic { p1, p2 } => SimpleBezier::new(*p1, *p2).into(),
            TweenCurveConfig::Lagrange { points } => LagrangePolynomial::new(points)?.into(),
            TweenCurveConfig::AkimaSpline { points } => {
                let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
                let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
                AkimaSpline::new(&xs, &ys)?.into()
            }
        };
        Ok(equation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("bezier".parse::<TweenKind>().unwrap(), TweenKind::Bezier);
        assert_eq!(
            "BezierCubic".parse::<TweenKind>().unwrap(),
            TweenKind::BezierCubic
        );
        assert_eq!(
            "akima_spline".parse::<TweenKind>().unwrap(),
            TweenKind::AkimaSpline
        );
        assert_eq!(
            "unknown".parse::<TweenKind>(),
            Err(ConfigError::UnknownTweenKind("unknown".to_string()))
        );
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in TweenKind::ALL {
            assert_eq!(kind.as_str().parse::<TweenKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_debug_snapshot() {
        insta::assert_debug_snapshot!(TweenKind::ALL, @r"
        [
            Bezier,
            BezierCubic,
            Lagrange,
            AkimaSpline,
        ]
        ");
    }

    #[test]
    fn test_curve_config_tagged_json() {
        let json = r#"{"type": "akima_spline", "points": [
            {"x": 0.0, "y": 0.0}, {"x": 1.0, "y": 1.0}, {"x": 2.0, "y": 0.0},
            {"x": 3.0, "y": 1.0}, {"x": 4.0, "y": 0.0}
        ]}"#;
        let config: TweenCurveConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.kind(), TweenKind::AkimaSpline);

        let equation = config.build_equation().unwrap();
        assert_eq!(equation.evaluate(2.0), 0.0);
    }

    #[test]
    fn test_build_equation_fails_fast() {
        let config = TweenCurveConfig::AkimaSpline {
            points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
        };
        assert!(matches!(
            config.build_equation(),
            Err(CurveError::TooFewPoints { .. })
        ));

        let config = TweenCurveConfig::Lagrange { points: Vec::new() };
        assert!(config.build_equation().is_err());
    }

    #[test]
    fn test_bezier_variants_build_distinct_curves() {
        let p1 = Point::new(0.25, 0.1);
        let p2 = Point::new(0.25, 1.0);
        let solver = TweenCurveConfig::Bezier { p1, p2 }.build_equation().unwrap();
        let simple = TweenCurveConfig::BezierCubic { p1, p2 }
            .build_equation()
            .unwrap();
        assert!(matches!(solver, Equation::BezierCubicSolver(_)));
        assert!(matches!(simple, Equation::SimpleBezier(_)));
        assert!((solver.evaluate(0.5) - simple.evaluate(0.5)).abs() > 1e-3);
    }
}
