//! # Config 模块
//!
//! 可序列化的场景配置：帧时钟参数与补间声明。
//!
//! 只描述数据与校验，不负责文件读写（由宿主决定配置来源）。

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::error::ConfigError;
use crate::tween::{NameMatch, TweenCurveConfig, TweenOption};

/// 帧时钟配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// 宿主界面隐藏时自动暂停、重新可见时自动恢复
    #[serde(default = "default_pause_on_hidden")]
    pub pause_on_hidden: bool,

    /// 宿主驱动模式下的最低帧率
    #[serde(default = "default_min_fps")]
    pub min_fps: u32,

    /// 宿主驱动模式下的最高帧率
    #[serde(default = "default_max_fps")]
    pub max_fps: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            pause_on_hidden: default_pause_on_hidden(),
            min_fps: default_min_fps(),
            max_fps: default_max_fps(),
        }
    }
}

impl ClockConfig {
    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_fps == 0 {
            return Err(ConfigError::ValidationFailed(
                "min_fps 必须大于 0".to_string(),
            ));
        }
        if self.min_fps > self.max_fps {
            return Err(ConfigError::ValidationFailed(format!(
                "min_fps ({}) 不能大于 max_fps ({})",
                self.min_fps, self.max_fps
            )));
        }
        Ok(())
    }
}

/// 单个补间的声明
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweenConfig {
    /// 曲线族与其控制数据
    pub curve: TweenCurveConfig,

    /// 写回目标的方式
    #[serde(default)]
    pub option: TweenOption,

    /// 起始状态
    #[serde(default)]
    pub initial: Point,

    /// 结束状态
    #[serde(default = "default_ending")]
    pub ending: Point,

    /// 总时长（秒）
    #[serde(default = "default_total_time")]
    pub total_time: f64,

    /// 目标名
    pub target_name: String,

    /// 目标名匹配方式
    #[serde(default)]
    pub name_match: NameMatch,
}

impl TweenConfig {
    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.total_time.is_finite() || self.total_time < 0.0 {
            return Err(ConfigError::ValidationFailed(format!(
                "补间 '{}' 的 total_time 必须是非负有限值",
                self.target_name
            )));
        }
        if !self.initial.is_finite() || !self.ending.is_finite() {
            return Err(ConfigError::ValidationFailed(format!(
                "补间 '{}' 的起止状态必须是有限值",
                self.target_name
            )));
        }
        Ok(())
    }
}

/// 场景配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// 帧时钟配置
    #[serde(default)]
    pub clock: ClockConfig,

    /// 并行执行全部补间；为 false 时按顺序逐个执行
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// 场景中的目标名
    #[serde(default)]
    pub targets: Vec<String>,

    /// 补间列表（顺序即顺序模式下的执行顺序）
    #[serde(default)]
    pub tweens: Vec<TweenConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            parallel: default_parallel(),
            targets: Vec::new(),
            tweens: Vec::new(),
        }
    }
}

impl SceneConfig {
    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clock.validate()?;
        for tween in &self.tweens {
            tween.validate()?;
        }
        Ok(())
    }
}

// 默认值函数
fn default_pause_on_hidden() -> bool {
    true
}

fn default_min_fps() -> u32 {
    10
}

fn default_max_fps() -> u32 {
    60
}

fn default_ending() -> Point {
    Point::one()
}

fn default_total_time() -> f64 {
    1.0
}

fn default_parallel() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SceneConfig::default();
        assert!(config.parallel);
        assert!(config.clock.pause_on_hidden);
        assert_eq!(config.clock.max_fps, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tween_config_defaults() {
        let json = r#"{
            "curve": { "type": "bezier", "p1": { "x": 0.25, "y": 0.1 }, "p2": { "x": 0.25, "y": 1.0 } },
            "target_name": "hero"
        }"#;
        let config: TweenConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.option, TweenOption::Move);
        assert_eq!(config.initial, Point::zero());
        assert_eq!(config.ending, Point::one());
        assert_eq!(config.total_time, 1.0);
        assert_eq!(config.name_match, NameMatch::Exact);
    }

    #[test]
    fn test_config_serialization() {
        let config = SceneConfig {
            parallel: false,
            targets: vec!["hero".to_string()],
            ..SceneConfig::default()
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        let loaded: SceneConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_clock_validation() {
        let mut config = ClockConfig::default();
        config.min_fps = 120;
        assert!(config.validate().is_err());

        config.min_fps = 0;
        assert!(config.validate().is_err());

        config.min_fps = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_total_time_rejected() {
        let json = r#"{
            "curve": { "type": "bezier_cubic", "p1": { "x": 0.3, "y": 0.0 }, "p2": { "x": 0.7, "y": 1.0 } },
            "total_time": -1.0,
            "target_name": "hero"
        }"#;
        let config: TweenConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }
}
