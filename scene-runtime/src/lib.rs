//! # Scene Runtime
//!
//! 2D 场景的帧调度核心与曲线驱动的补间引擎。
//!
//! ## 架构概述
//!
//! `scene-runtime` 不依赖任何渲染库。渲染、目标对象与调度上下文都以 trait 形式注入：
//!
//! ```text
//! Host                               Runtime
//!   │                                   │
//!   │── request_animation_frame / tick ─►│ FrameClock
//!   │                                   │   └─ 每帧分发 ─► Tween ─► Curve
//!   │◄──── render() / set_position() ───│
//!   │                                   │
//! ```
//!
//! ## 核心类型
//!
//! - [`FrameClock`]：帧时钟，维护时间戳与帧间隔并按顺序通知订阅者
//! - [`Tween`]：补间状态机，每帧按曲线推进并写回目标
//! - [`TweenComponentManager`]：补间编排器，并行或顺序执行
//! - [`Curve`]：纯函数曲线（贝塞尔、拉格朗日、Akima、二次缓动）
//!
//! ## 使用示例
//!
//! ```ignore
//! use scene_runtime::{ClockConfig, ClockDriver, FrameClock, ManualFrameScheduler};
//!
//! let scheduler = Rc::new(ManualFrameScheduler::new());
//! let clock = FrameClock::new(ClockConfig::default(), host, ClockDriver::SelfDriven(scheduler.clone()));
//!
//! let mut manager = TweenComponentManager::from_config(&clock, &scene)?;
//! manager.configure_all(&sprite);
//! manager.start_or_reset_all(None, None, None)?;
//!
//! clock.start();
//! scheduler.run_frames(60, 1000.0 / 60.0);
//! ```
//!
//! ## 模块结构
//!
//! - [`curve`]：曲线库
//! - [`clock`]：帧时钟与宿主接口
//! - [`tween`]：补间状态机与编排器
//! - [`config`]：可序列化的场景配置
//! - [`error`]：错误类型定义

pub mod clock;
pub mod config;
pub mod curve;
pub mod error;
pub mod point;
pub mod tween;

// 重导出核心类型
pub use clock::{
    ClockDriver, FrameCallback, FrameClock, FrameRequestId, HostTicker, ManualFrameScheduler,
    ManualTicker, RenderHost, SchedulingContext, SubscriptionId, TickListener, TickerListenerId,
};
pub use config::{ClockConfig, SceneConfig, TweenConfig};
pub use curve::{
    AkimaSpline, BezierCubicSolver, Curve, Equation, LagrangePolynomial, QuadraticInOut,
    SimpleBezier,
};
pub use error::{ConfigError, CurveError, SceneError, SceneResult, TweenError};
pub use point::Point;
pub use tween::{
    FinishedCallback, NameMatch, Tween, TweenComponentManager, TweenCurveConfig, TweenKind,
    TweenOption, TweenState, TweenTarget, UpdateCallback,
};
