//! # Host CLI
//!
//! 无窗口宿主：用手动推进的调度器驱动 scene-runtime，输出场景播放结果。
//!
//! - [`HeadlessHost`]：不渲染任何东西的渲染宿主，只统计调用次数
//! - [`SpriteTarget`]：记录变换的补间目标
//! - [`run_scene`]：按配置播放场景

pub mod config;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Context;
use scene_runtime::{
    ClockDriver, FinishedCallback, FrameClock, ManualFrameScheduler, ManualTicker, Point,
    RenderHost, Tween, TweenComponentManager, TweenTarget, UpdateCallback,
};
use serde::Serialize;
use tracing::{debug, info};

pub use config::{DriveMode, HostConfig, HostConfigError, MAX_FRAMES};

/// 不渲染的渲染宿主
#[derive(Debug, Default)]
pub struct HeadlessHost {
    renders: Cell<u64>,
    texture_collections: Cell<u64>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_count(&self) -> u64 {
        self.renders.get()
    }

    pub fn texture_collection_count(&self) -> u64 {
        self.texture_collections.get()
    }
}

impl RenderHost for HeadlessHost {
    fn render(&self) {
        self.renders.set(self.renders.get() + 1);
    }

    fn collect_unused_textures(&self) {
        self.texture_collections
            .set(self.texture_collections.get() + 1);
    }
}

/// 精灵变换
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub position: Point,
    pub scale: Point,
    pub rotation: f64,
    pub opacity: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Point::zero(),
            scale: Point::one(),
            rotation: 0.0,
            opacity: 1.0,
        }
    }
}

/// 记录变换的补间目标
#[derive(Debug)]
pub struct SpriteTarget {
    name: String,
    transform: RefCell<Transform>,
}

impl SpriteTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: RefCell::new(Transform::default()),
        }
    }

    pub fn transform(&self) -> Transform {
        *self.transform.borrow()
    }
}

impl TweenTarget for SpriteTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_position(&self, x: f64, y: f64) {
        self.transform.borrow_mut().position = Point::new(x, y);
    }

    fn set_scale(&self, x: f64, y: f64) {
        self.transform.borrow_mut().scale = Point::new(x, y);
    }

    fn set_rotation(&self, rotation: f64) {
        self.transform.borrow_mut().rotation = rotation;
    }

    fn set_opacity(&self, alpha: f64) {
        self.transform.borrow_mut().opacity = alpha;
    }
}

/// 单个精灵的最终状态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteReport {
    pub name: String,
    pub transform: Transform,
}

/// 场景播放结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneReport {
    /// 推进的帧数（含首帧）
    pub frames: u64,
    /// 宿主 `render()` 调用次数（宿主驱动模式下为 0）
    pub renders: u64,
    /// 完成的补间数
    pub finished_tweens: usize,
    /// 结束时仍在运行的补间数
    pub running_tweens: usize,
    pub sprites: Vec<SpriteReport>,
}

/// 帧时钟的驱动源，和驱动方式一一对应
enum FrameSource {
    Scheduler(Rc<ManualFrameScheduler>),
    Ticker(Rc<ManualTicker>),
}

impl FrameSource {
    fn new(mode: DriveMode) -> (Self, ClockDriver) {
        match mode {
            DriveMode::SelfDriven => {
                let scheduler = Rc::new(ManualFrameScheduler::new());
                (
                    FrameSource::Scheduler(scheduler.clone()),
                    ClockDriver::SelfDriven(scheduler),
                )
            }
            DriveMode::HostTicker => {
                let ticker = Rc::new(ManualTicker::new());
                (
                    FrameSource::Ticker(ticker.clone()),
                    ClockDriver::HostTicker(ticker),
                )
            }
        }
    }

    fn advance(&self, frame_ms: f64) {
        match self {
            FrameSource::Scheduler(scheduler) => {
                scheduler.advance(frame_ms);
            }
            FrameSource::Ticker(ticker) => ticker.tick(frame_ms),
        }
    }
}

/// 按配置播放场景
///
/// 首帧只记录时间戳，因此实际推进 `ceil(seconds × fps) + 1` 帧。
/// 顺序模式下每帧结束时若没有补间在运行，就推进到下一个补间。
pub fn run_scene(config: &HostConfig) -> anyhow::Result<SceneReport> {
    config.validate().context("场景配置无效")?;

    let host = Rc::new(HeadlessHost::new());
    let (source, driver) = FrameSource::new(config.drive_mode);
    let clock = FrameClock::new(config.scene.clock.clone(), host.clone(), driver);

    let sprites: Vec<Rc<SpriteTarget>> = config
        .scene
        .targets
        .iter()
        .map(|name| Rc::new(SpriteTarget::new(name.as_str())))
        .collect();

    let mut manager = TweenComponentManager::from_config(&clock, &config.scene)
        .context("补间构造失败")?;
    for sprite in &sprites {
        let target: Rc<dyn TweenTarget> = sprite.clone();
        let bound = manager.configure_all(&target);
        debug!(sprite = sprite.name(), bound, "精灵绑定补间");
    }

    let finished = Rc::new(Cell::new(0usize));
    let finished_counter = finished.clone();
    let finished_factory = move |tween: &Tween| -> Option<FinishedCallback> {
        let counter = finished_counter.clone();
        let name = tween.target_name();
        Some(Rc::new(move || {
            counter.set(counter.get() + 1);
            debug!(target_name = %name, "补间播放完成");
        }))
    };
    let update_factory = |tween: &Tween| -> Option<UpdateCallback> {
        let name = tween.target_name();
        Some(Rc::new(move |value: Point| {
            debug!(target_name = %name, x = value.x, y = value.y, "补间回调");
        }))
    };

    manager
        .start_or_reset_all(None, Some(&update_factory), Some(&finished_factory))
        .context("补间启动失败")?;
    clock.start();

    let frame_ms = 1000.0 / f64::from(config.fps);
    let frames = config.frame_count();
    for _ in 0..frames {
        source.advance(frame_ms);
        if !manager.is_parallel() && !manager.has_running() {
            manager
                .start_or_reset_all(None, Some(&update_factory), Some(&finished_factory))
                .context("顺序补间推进失败")?;
        }
    }

    let report = SceneReport {
        frames,
        renders: host.render_count(),
        finished_tweens: finished.get(),
        running_tweens: manager.tweens().iter().filter(|t| t.is_running()).count(),
        sprites: sprites
            .iter()
            .map(|sprite| SpriteReport {
                name: sprite.name().to_string(),
                transform: sprite.transform(),
            })
            .collect(),
    };

    manager.destroy();
    clock.destroy();
    info!(
        frames = report.frames,
        finished = report.finished_tweens,
        "场景播放结束"
    );
    Ok(report)
}
