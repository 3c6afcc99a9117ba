//! # Component 模块
//!
//! 单个补间的状态机。
//!
//! 每帧推进流程：
//! 1. `elapsed += delta_ms / 1000`，`pct = elapsed / total_time`
//! 2. `value = curve(pct)`，结果为起止状态按 `value` 线性混合（不截断，允许越界）
//! 3. 按 [`TweenOption`] 写回目标或调用更新回调
//! 4. `pct ≥ 1` 时进入 `Finished`：取消订阅并调用一次完成回调

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, error};

use super::{NameMatch, TweenCurveConfig, TweenKind, TweenOption, TweenState, TweenTarget};
use crate::Point;
use crate::clock::{FrameClock, SubscriptionId};
use crate::config::TweenConfig;
use crate::curve::{Curve, Equation};
use crate::error::TweenError;

/// 更新回调，参数为本帧的插值结果
pub type UpdateCallback = Rc<dyn Fn(Point)>;

/// 完成回调
pub type FinishedCallback = Rc<dyn Fn()>;

struct TweenInner {
    clock: FrameClock,
    curve: TweenCurveConfig,
    equation: Equation,
    option: TweenOption,
    initial: Point,
    ending: Point,
    total_time: f64,
    target_name: String,
    name_match: NameMatch,
    target: Option<Weak<dyn TweenTarget>>,
    state: TweenState,
    elapsed_seconds: f64,
    time_percentage: f64,
    current_value: Point,
    subscription: Option<SubscriptionId>,
    on_update: Option<UpdateCallback>,
    on_finished: Option<FinishedCallback>,
}

impl TweenInner {
    fn bound_target(&self) -> Option<Rc<dyn TweenTarget>> {
        self.target.as_ref().and_then(Weak::upgrade)
    }

    fn value_at(&self, pct: f64) -> Point {
        let value = self.equation.evaluate(pct);
        self.initial.lerp(self.ending, value)
    }
}

/// 本帧需要在借用之外执行的写回
struct TickOutput {
    value: Point,
    option: TweenOption,
    target: Option<Rc<dyn TweenTarget>>,
    on_update: Option<UpdateCallback>,
    finished: Option<(Option<SubscriptionId>, Option<FinishedCallback>)>,
}

/// 补间
///
/// 轻量句柄，`clone()` 得到指向同一补间的句柄。
/// 曲线在构造时生成（失败即返回错误），控制数据变化时重建。
#[derive(Clone)]
pub struct Tween {
    inner: Rc<RefCell<TweenInner>>,
}

impl std::fmt::Debug for Tween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Tween")
            .field("kind", &inner.curve.kind())
            .field("option", &inner.option)
            .field("target_name", &inner.target_name)
            .field("state", &inner.state)
            .field("time_percentage", &inner.time_percentage)
            .finish()
    }
}

impl Tween {
    /// 按配置创建补间
    ///
    /// 回调模式不需要目标，创建后即为 `Configured`；其它模式需要先 [`configure`](Self::configure)。
    /// `total_time` 或起止状态不是非负有限值时返回错误。
    pub fn new(clock: FrameClock, config: TweenConfig) -> Result<Self, TweenError> {
        config.validate()?;
        let equation = config.curve.build_equation()?;
        let state = if config.option.requires_target() {
            TweenState::Unconfigured
        } else {
            TweenState::Configured
        };

        Ok(Self {
            inner: Rc::new(RefCell::new(TweenInner {
                clock,
                curve: config.curve,
                equation,
                option: config.option,
                initial: config.initial,
                ending: config.ending,
                total_time: config.total_time,
                target_name: config.target_name,
                name_match: config.name_match,
                target: None,
                state,
                elapsed_seconds: 0.0,
                time_percentage: 0.0,
                current_value: config.initial,
                subscription: None,
                on_update: None,
                on_finished: None,
            })),
        })
    }

    // ========== 生命周期 ==========

    /// 按名字绑定目标
    ///
    /// 名字不匹配时不做任何事并返回 `false`。
    pub fn configure(&self, target: &Rc<dyn TweenTarget>) -> bool {
        let mut inner = self.inner.borrow_mut();
        if !inner.name_match.matches(&inner.target_name, target.name()) {
            return false;
        }
        inner.target = Some(Rc::downgrade(target));
        if inner.state == TweenState::Unconfigured {
            inner.state = TweenState::Configured;
        }
        debug!(target_name = target.name(), kind = %inner.curve.kind(), "补间绑定目标");
        true
    }

    /// 启动或重新开始
    ///
    /// 已用时间归零并进入 `Running`；尚未订阅时才向帧时钟订阅。
    /// 需要目标的模式在未绑定目标时返回 [`TweenError::Misconfigured`]。
    pub fn start_or_reset(
        &self,
        on_update: Option<UpdateCallback>,
        on_finished: Option<FinishedCallback>,
    ) -> Result<(), TweenError> {
        let clock = {
            let mut inner = self.inner.borrow_mut();
            if inner.option.requires_target() && inner.bound_target().is_none() {
                return Err(TweenError::Misconfigured {
                    target_name: inner.target_name.clone(),
                });
            }
            inner.elapsed_seconds = 0.0;
            inner.time_percentage = 0.0;
            inner.state = TweenState::Running;
            inner.on_update = on_update;
            inner.on_finished = on_finished;
            if inner.subscription.is_some() {
                None
            } else {
                Some(inner.clock.clone())
            }
        };

        if let Some(clock) = clock {
            let weak = Rc::downgrade(&self.inner);
            let id = clock.subscribe(move |_| {
                if let Some(inner) = weak.upgrade() {
                    Tween { inner }.advance();
                }
            });
            self.inner.borrow_mut().subscription = Some(id);
        }
        Ok(())
    }

    /// 暂停（只翻转状态，仍保留订阅，帧回调被忽略）
    pub fn pause(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.state == TweenState::Running {
            inner.state = TweenState::Paused;
        }
    }

    /// 从暂停处继续
    pub fn resume(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.state == TweenState::Paused {
            inner.state = TweenState::Running;
        }
    }

    /// 暂停并取消订阅
    pub fn destroy(&self) {
        let (clock, subscription) = {
            let mut inner = self.inner.borrow_mut();
            if inner.state == TweenState::Running {
                inner.state = TweenState::Paused;
            }
            inner.on_update = None;
            inner.on_finished = None;
            (inner.clock.clone(), inner.subscription.take())
        };
        if let Some(id) = subscription {
            clock.unsubscribe(id);
        }
    }

    // ========== 实时改写 ==========

    /// 运行中改写位置（仅 `Move` 模式）
    pub fn set_position(&self, position: Point) -> Result<(), TweenError> {
        self.retarget(TweenOption::Move, "set_position", position)
    }

    /// 运行中改写缩放（仅 `Scale` 模式）
    pub fn set_scale(&self, scale: Point) -> Result<(), TweenError> {
        self.retarget(TweenOption::Scale, "set_scale", scale)
    }

    /// 运行中改写旋转（仅 `Rotate` 模式）
    pub fn set_rotation(&self, rotation: f64) -> Result<(), TweenError> {
        self.retarget(TweenOption::Rotate, "set_rotation", Point::new(rotation, 0.0))
    }

    /// 把当前插值状态固定下来，再把起止状态平移到请求的位置
    ///
    /// 补间暂停，当前值写回目标；起止状态按"请求值 − 当前值"平移并重建曲线。
    /// 之后继续播放时，目标从请求值出发沿原曲线运动。
    fn retarget(
        &self,
        required: TweenOption,
        operation: &'static str,
        requested: Point,
    ) -> Result<(), TweenError> {
        let (current, target) = {
            let mut inner = self.inner.borrow_mut();
            if inner.option != required {
                return Err(TweenError::UnsupportedOperation {
                    target_name: inner.target_name.clone(),
                    option: inner.option,
                    operation,
                });
            }
            if inner.state == TweenState::Running {
                inner.state = TweenState::Paused;
            }

            let current = inner.value_at(inner.time_percentage);
            let delta = requested - current;
            inner.initial = inner.initial + delta;
            inner.ending = inner.ending + delta;
            inner.equation = inner.curve.build_equation()?;
            inner.current_value = current;
            (current, inner.bound_target())
        };

        debug!(operation, x = requested.x, y = requested.y, "补间改写控制点");
        if let Some(target) = target {
            apply_to_target(target.as_ref(), required, current);
        }
        Ok(())
    }

    // ========== 帧推进 ==========

    fn advance(&self) {
        let Some(output) = self.step() else {
            return;
        };

        match output.option {
            TweenOption::Callback => match &output.on_update {
                Some(callback) => callback(output.value),
                None => {
                    error!(
                        target_name = %self.target_name(),
                        "回调模式的补间没有设置更新回调"
                    );
                }
            },
            option => {
                if let Some(target) = &output.target {
                    apply_to_target(target.as_ref(), option, output.value);
                }
            }
        }

        if let Some((subscription, on_finished)) = output.finished {
            let clock = self.inner.borrow().clock.clone();
            if let Some(id) = subscription {
                clock.unsubscribe(id);
            }
            debug!(target_name = %self.target_name(), "补间完成");
            if let Some(callback) = on_finished {
                callback();
            }
        }
    }

    fn step(&self) -> Option<TickOutput> {
        let mut inner = self.inner.borrow_mut();
        if inner.state != TweenState::Running {
            return None;
        }

        let delta_ms = inner.clock.delta_time();
        inner.elapsed_seconds += delta_ms / 1000.0;
        let mut pct = if inner.total_time > 0.0 {
            inner.elapsed_seconds / inner.total_time
        } else {
            1.0
        };
        let finished = pct >= 1.0;
        if finished {
            pct = 1.0;
        }
        inner.time_percentage = pct;

        let value = inner.value_at(pct);
        inner.current_value = value;

        let finished = if finished {
            inner.state = TweenState::Finished;
            Some((inner.subscription.take(), inner.on_finished.clone()))
        } else {
            None
        };

        Some(TickOutput {
            value,
            option: inner.option,
            target: inner.bound_target(),
            on_update: inner.on_update.clone(),
            finished,
        })
    }

    // ========== 查询方法 ==========

    pub fn state(&self) -> TweenState {
        self.inner.borrow().state
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().state.is_running()
    }

    /// 是否已绑定仍然存活的目标
    pub fn has_target(&self) -> bool {
        self.inner.borrow().bound_target().is_some()
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner.borrow().subscription.is_some()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.inner.borrow().elapsed_seconds
    }

    /// 时间百分比，完成时恰好为 1
    pub fn time_percentage(&self) -> f64 {
        self.inner.borrow().time_percentage
    }

    /// 最近一次计算的插值结果
    pub fn current_value(&self) -> Point {
        self.inner.borrow().current_value
    }

    pub fn kind(&self) -> TweenKind {
        self.inner.borrow().curve.kind()
    }

    pub fn option(&self) -> TweenOption {
        self.inner.borrow().option
    }

    pub fn target_name(&self) -> String {
        self.inner.borrow().target_name.clone()
    }

    pub fn initial_state(&self) -> Point {
        self.inner.borrow().initial
    }

    pub fn ending_state(&self) -> Point {
        self.inner.borrow().ending
    }

    pub fn total_time(&self) -> f64 {
        self.inner.borrow().total_time
    }

    pub fn curve(&self) -> TweenCurveConfig {
        self.inner.borrow().curve.clone()
    }
}

fn apply_to_target(target: &dyn TweenTarget, option: TweenOption, value: Point) {
    match option {
        TweenOption::Move => target.set_position(value.x, value.y),
        TweenOption::Scale => target.set_scale(value.x, value.y),
        TweenOption::Rotate => target.set_rotation(value.x),
        TweenOption::Opacity => target.set_opacity(value.x),
        TweenOption::Callback => {}
    }
}
