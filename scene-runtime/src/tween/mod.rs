//! # Tween 模块
//!
//! 曲线驱动的补间状态机与编排器。
//!
//! ## 核心概念
//!
//! - [`Tween`]：一个补间。运行时向帧时钟订阅一次，每帧按曲线推进并写回目标
//! - [`TweenComponentManager`]：补间集合，并行或顺序执行
//! - [`TweenTarget`]：被补间驱动的外部对象，按名字延迟绑定
//! - [`TweenCurveConfig`]：曲线族与控制数据，决定补间构造哪条曲线
//!
//! ## 状态转换
//!
//! ```text
//! Unconfigured ──configure──► Configured ──start_or_reset──► Running ⇄ Paused
//!                                                               │
//!                                                    pct ≥ 1    ▼
//!                                                            Finished
//! ```
//!
//! `Finished` 与 `Paused` 都可以再次 `start_or_reset`，已用时间归零。

mod component;
mod kind;
mod manager;

pub use component::{FinishedCallback, Tween, UpdateCallback};
pub use kind::{TweenCurveConfig, TweenKind};
pub use manager::{FinishedFactory, TweenComponentManager, TweenFilter, UpdateFactory};

use serde::{Deserialize, Serialize};

/// 补间结果写回目标的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweenOption {
    /// 写入位置
    #[default]
    Move,
    /// 写入缩放
    Scale,
    /// 写入旋转（只取 x）
    Rotate,
    /// 写入透明度（只取 x）
    Opacity,
    /// 不修改目标，只调用更新回调
    Callback,
}

impl TweenOption {
    /// 是否需要绑定目标才能运行
    pub fn requires_target(&self) -> bool {
        !matches!(self, TweenOption::Callback)
    }
}

/// 目标名匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatch {
    /// 名字完全相同
    #[default]
    Exact,
    /// 目标名包含配置的名字（对象池中的同类对象）
    Contains,
}

impl NameMatch {
    /// 判断目标名是否匹配
    pub fn matches(&self, expected: &str, actual: &str) -> bool {
        match self {
            NameMatch::Exact => expected == actual,
            NameMatch::Contains => actual.contains(expected),
        }
    }
}

/// 补间状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenState {
    /// 尚未绑定目标
    #[default]
    Unconfigured,
    /// 已绑定目标，等待启动
    Configured,
    /// 正在推进
    Running,
    /// 已暂停，保留进度
    Paused,
    /// 已完成
    Finished,
}

impl TweenState {
    /// 是否在推进
    pub fn is_running(&self) -> bool {
        matches!(self, TweenState::Running)
    }
}

/// 可被补间驱动的目标
///
/// 方法均接收 `&self`，实现方自行使用内部可变性。
/// 补间只持有目标的弱引用，从不负责目标的生命周期。
pub trait TweenTarget: 'static {
    /// 用于延迟绑定的名字
    fn name(&self) -> &str;

    fn set_position(&self, x: f64, y: f64);

    fn set_scale(&self, x: f64, y: f64);

    fn set_rotation(&self, rotation: f64);

    fn set_opacity(&self, alpha: f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_match() {
        assert!(NameMatch::Exact.matches("hero", "hero"));
        assert!(!NameMatch::Exact.matches("hero", "hero_01"));
        assert!(NameMatch::Contains.matches("coin", "coin_07"));
        assert!(!NameMatch::Contains.matches("coin", "gem_07"));
    }

    #[test]
    fn test_option_requires_target() {
        assert!(TweenOption::Move.requires_target());
        assert!(TweenOption::Opacity.requires_target());
        assert!(!TweenOption::Callback.requires_target());
    }

    #[test]
    fn test_option_serde_names() {
        let json = serde_json::to_string(&TweenOption::Rotate).unwrap();
        assert_eq!(json, "\"rotate\"");
        let option: TweenOption = serde_json::from_str("\"callback\"").unwrap();
        assert_eq!(option, TweenOption::Callback);
    }
}
