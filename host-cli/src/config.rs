//! # Config 模块
//!
//! 无窗口宿主的配置。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 场景文件 (`--scene scene.json`)
//! 3. 默认值（最低，内置演示场景）

use std::fs;
use std::path::Path;

use scene_runtime::{
    NameMatch, Point, SceneConfig, TweenConfig, TweenCurveConfig, TweenOption,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// 帧时钟的驱动方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveMode {
    /// 时钟自己请求动画帧
    #[default]
    SelfDriven,
    /// 时钟挂到宿主帧驱动器上
    HostTicker,
}

/// 宿主配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// 帧时钟驱动方式
    #[serde(default)]
    pub drive_mode: DriveMode,

    /// 模拟帧率
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// 模拟时长（秒）
    #[serde(default = "default_seconds")]
    pub seconds: f64,

    /// 场景
    #[serde(default = "demo_scene")]
    pub scene: SceneConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            drive_mode: DriveMode::default(),
            fps: default_fps(),
            seconds: default_seconds(),
            scene: demo_scene(),
        }
    }
}

impl HostConfig {
    /// 加载场景文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "场景文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "场景文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "场景文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "场景文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), HostConfigError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| HostConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// 格式化为 JSON
    pub fn to_json(&self) -> Result<String, HostConfigError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| HostConfigError::SerializationFailed(e.to_string()))
    }

    /// 需要推进的帧数
    ///
    /// 首帧只记录时间戳，因此为 `ceil(seconds × fps) + 1`。只对通过验证的配置有意义。
    pub fn frame_count(&self) -> u64 {
        (self.seconds * f64::from(self.fps)).ceil() as u64 + 1
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), HostConfigError> {
        if self.fps == 0 {
            return Err(HostConfigError::ValidationFailed(
                "fps 必须大于 0".to_string(),
            ));
        }
        if !self.seconds.is_finite() || self.seconds < 0.0 {
            return Err(HostConfigError::ValidationFailed(
                "seconds 必须是非负有限值".to_string(),
            ));
        }
        if (self.seconds * f64::from(self.fps)).ceil() > MAX_FRAMES as f64 {
            return Err(HostConfigError::ValidationFailed(format!(
                "seconds × fps 超过帧数上限 {MAX_FRAMES}"
            )));
        }
        self.scene
            .validate()
            .map_err(|e| HostConfigError::ValidationFailed(e.to_string()))
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

/// 单次播放允许的最大帧数（60fps 下约 46 小时）
pub const MAX_FRAMES: u64 = 10_000_000;

// 默认值函数
fn default_fps() -> u32 {
    60
}

fn default_seconds() -> f64 {
    2.0
}

/// 内置演示场景：主角沿贝塞尔曲线右移，金币按 Akima 样条闪烁
pub fn demo_scene() -> SceneConfig {
    SceneConfig {
        targets: vec!["hero".to_string(), "coin_01".to_string()],
        tweens: vec![
            TweenConfig {
                curve: TweenCurveConfig::Bezier {
                    p1: Point::new(0.25, 0.1),
                    p2: Point::new(0.25, 1.0),
                },
                option: TweenOption::Move,
                initial: Point::zero(),
                ending: Point::new(100.0, 0.0),
                total_time: 1.0,
                target_name: "hero".to_string(),
                name_match: NameMatch::Exact,
            },
            TweenConfig {
                curve: TweenCurveConfig::AkimaSpline {
                    points: vec![
                        Point::new(0.0, 0.0),
                        Point::new(0.25, 1.0),
                        Point::new(0.5, 0.0),
                        Point::new(0.75, 1.0),
                        Point::new(1.0, 0.0),
                    ],
                },
                option: TweenOption::Opacity,
                initial: Point::zero(),
                ending: Point::one(),
                total_time: 1.5,
                target_name: "coin".to_string(),
                name_match: NameMatch::Contains,
            },
        ],
        ..SceneConfig::default()
    }
}
