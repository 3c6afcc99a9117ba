//! # Easing 模块
//!
//! 二次缓入缓出。

use super::Curve;

/// 二次缓入缓出（两头慢中间快）
///
/// 无构造参数，纯函数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuadraticInOut;

impl Curve for QuadraticInOut {
    fn evaluate(&self, t: f64) -> f64 {
        let t = t * 2.0;
        if t < 1.0 {
            0.5 * t * t
        } else {
            let t = t - 1.0;
            -0.5 * (t * (t - 2.0) - 1.0)
        }
    }
}
