//! # Error 模块
//!
//! 定义 scene-runtime 中使用的错误类型。

use thiserror::Error;

use crate::tween::TweenOption;

/// 曲线构造错误（退化输入）
///
/// 曲线在构造时校验控制数据，失败即返回错误，不会静默降级。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// 控制点数量不足
    #[error("{curve} 至少需要 {required} 个控制点，实际 {actual} 个")]
    TooFewPoints {
        curve: &'static str,
        required: usize,
        actual: usize,
    },

    /// xs 与 ys 长度不一致
    #[error("{curve} 的 xs 长度 {xs} 与 ys 长度 {ys} 不一致")]
    LengthMismatch {
        curve: &'static str,
        xs: usize,
        ys: usize,
    },

    /// 节点不是严格递增
    #[error("{curve} 的节点必须严格递增：第 {index} 个节点 {value} 不大于前一个节点")]
    NonIncreasingKnots {
        curve: &'static str,
        index: usize,
        value: f64,
    },

    /// 出现 NaN 或无穷值
    #[error("{curve} 的第 {index} 个控制数据不是有限值")]
    NonFinite { curve: &'static str, index: usize },

    /// 两个控制点的 x 坐标相同（除零）
    #[error("{curve} 存在重复的 x 坐标 {x}")]
    DuplicateX { curve: &'static str, x: f64 },
}

/// 补间错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TweenError {
    /// 补间尚未绑定目标就被推进
    #[error("补间 '{target_name}' 尚未绑定目标")]
    Misconfigured { target_name: String },

    /// 在 option 不匹配的补间上调用修改操作
    #[error("补间 '{target_name}' 的模式为 {option:?}，不支持 {operation}")]
    UnsupportedOperation {
        target_name: String,
        option: TweenOption,
        operation: &'static str,
    },

    /// 曲线构造失败
    #[error("曲线构造失败: {0}")]
    Curve(#[from] CurveError),

    /// 补间配置无效
    #[error("补间配置无效: {0}")]
    Config(#[from] ConfigError),
}

/// 场景配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 配置值无效
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),

    /// 无法识别的曲线类型名
    #[error("未知的补间类型 '{0}'")]
    UnknownTweenKind(String),
}

/// scene-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// 曲线错误
    #[error("曲线错误: {0}")]
    Curve(#[from] CurveError),

    /// 补间错误
    #[error("补间错误: {0}")]
    Tween(#[from] TweenError),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type SceneResult<T> = Result<T, SceneError>;
