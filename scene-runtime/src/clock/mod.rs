//! # Clock 模块
//!
//! 帧时钟：维护"当前时间"，计算帧间隔，每帧按注册顺序通知全部订阅者。
//!
//! ## 驱动方式
//!
//! 构造时二选一，之后不可更改：
//! - [`ClockDriver::SelfDriven`]：通过 [`SchedulingContext`] 逐帧请求动画帧，
//!   帧间隔由相邻时间戳相减得到，分发后调用宿主 `render()`
//! - [`ClockDriver::HostTicker`]：挂到宿主自带的 [`HostTicker`] 上，帧间隔直接读取宿主
//!
//! ## 首帧
//!
//! 启动（或暂停后恢复）时时间戳与帧间隔清零，下一帧只记录时间戳、不分发，
//! 因此恢复后的第一次分发不会带上暂停期间的时间。
//!
//! ## 分发期间的订阅变更
//!
//! 每帧开始分发前对订阅列表做快照：
//! - 分发中新增的订阅者从下一帧开始接收
//! - 分发中移除的订阅者若本帧尚未轮到，仍会在本帧收到最后一次回调
//!
//! 分发时不持有时钟内部借用，回调可以安全地调用 `subscribe`/`unsubscribe`/`pause`。
//! 回调 panic 会直接向上传播并中止本帧剩余的分发。

mod host;
mod manual;

pub use host::{
    FrameCallback, FrameRequestId, HostTicker, RenderHost, SchedulingContext, TickListener,
    TickerListenerId,
};
pub use manual::{ManualFrameScheduler, ManualTicker};

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

use tracing::{debug, warn};

use crate::config::ClockConfig;

/// 订阅 ID 的哨兵值，列表清空时计数器回到这里
const SUBSCRIPTION_INDEX_SENTINEL: u64 = 0;

/// 订阅 ID
///
/// 只在订阅列表非空期间唯一：列表清空后计数器重置，旧 ID 可能被重新分配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// 内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SubscriptionId({})", self.0)
    }
}

/// 订阅回调，参数为乘以倍率后的时间戳（毫秒）
pub type SubscriberCallback = Rc<RefCell<dyn FnMut(f64)>>;

/// 驱动方式
#[derive(Clone)]
pub enum ClockDriver {
    /// 通过调度上下文逐帧请求动画帧
    SelfDriven(Rc<dyn SchedulingContext>),
    /// 挂到宿主帧驱动器上
    HostTicker(Rc<dyn HostTicker>),
}

impl std::fmt::Debug for ClockDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockDriver::SelfDriven(_) => f.write_str("SelfDriven"),
            ClockDriver::HostTicker(_) => f.write_str("HostTicker"),
        }
    }
}

struct Subscriber {
    id: SubscriptionId,
    time_multiply: f64,
    callback: SubscriberCallback,
}

struct ClockState {
    config: ClockConfig,
    host: Option<Rc<dyn RenderHost>>,
    driver: Option<ClockDriver>,
    subscribers: Vec<Subscriber>,
    last_subscription_index: u64,
    is_running: bool,
    current_timestamp: f64,
    current_delta_time: f64,
    is_first_frame: bool,
    pending_frame: Option<FrameRequestId>,
    ticker_listener: Option<TickerListenerId>,
    pause_started_at: Option<Instant>,
    milliseconds_in_last_pause: f64,
    paused_by_visibility: bool,
    destroyed: bool,
}

/// 帧时钟
///
/// 轻量句柄，`clone()` 得到指向同一时钟的句柄。
/// 补间与宿主通过注入同一个句柄共享时钟，不存在全局实例。
#[derive(Clone)]
pub struct FrameClock {
    inner: Rc<RefCell<ClockState>>,
}

impl std::fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("FrameClock")
            .field("driver", &state.driver)
            .field("subscribers", &state.subscribers.len())
            .field("is_running", &state.is_running)
            .field("current_timestamp", &state.current_timestamp)
            .field("current_delta_time", &state.current_delta_time)
            .finish()
    }
}

impl FrameClock {
    /// 创建帧时钟（初始为暂停状态）
    pub fn new(config: ClockConfig, host: Rc<dyn RenderHost>, driver: ClockDriver) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ClockState {
                config,
                host: Some(host),
                driver: Some(driver),
                subscribers: Vec::new(),
                last_subscription_index: SUBSCRIPTION_INDEX_SENTINEL,
                is_running: false,
                current_timestamp: 0.0,
                current_delta_time: 0.0,
                is_first_frame: true,
                pending_frame: None,
                ticker_listener: None,
                pause_started_at: None,
                milliseconds_in_last_pause: 0.0,
                paused_by_visibility: false,
                destroyed: false,
            })),
        }
    }

    // ========== 订阅管理 ==========

    /// 订阅每帧回调（倍率为 1）
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: FnMut(f64) + 'static,
    {
        self.subscribe_with_multiplier(callback, 1.0)
    }

    /// 订阅每帧回调，回调收到的时间戳乘以 `time_multiply`
    ///
    /// 副作用：请求宿主回收未使用的纹理内存。
    pub fn subscribe_with_multiplier<F>(&self, callback: F, time_multiply: f64) -> SubscriptionId
    where
        F: FnMut(f64) + 'static,
    {
        let (id, host) = {
            let mut state = self.inner.borrow_mut();
            if state.destroyed {
                warn!("帧时钟已销毁，忽略订阅");
                return SubscriptionId(SUBSCRIPTION_INDEX_SENTINEL);
            }
            state.last_subscription_index += 1;
            let id = SubscriptionId(state.last_subscription_index);
            state.subscribers.push(Subscriber {
                id,
                time_multiply,
                callback: Rc::new(RefCell::new(callback)),
            });
            (id, state.host.clone())
        };

        debug!(id = %id, time_multiply = time_multiply, "新增帧订阅");
        if let Some(host) = host {
            host.collect_unused_textures();
        }
        id
    }

    /// 取消订阅
    ///
    /// ID 不存在时不做任何事。列表清空后 ID 计数器重置。
    /// 返回是否真的移除了订阅者。
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.inner.borrow_mut();
        let Some(position) = state.subscribers.iter().position(|s| s.id == id) else {
            return false;
        };
        state.subscribers.remove(position);
        if state.subscribers.is_empty() {
            state.last_subscription_index = SUBSCRIPTION_INDEX_SENTINEL;
        }
        debug!(id = %id, remaining = state.subscribers.len(), "移除帧订阅");
        true
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    // ========== 生命周期 ==========

    /// 启动（或恢复）时钟
    ///
    /// 已在运行时不做任何事。时间戳与帧间隔清零，下一帧按首帧处理。
    pub fn start(&self) {
        let (driver, config) = {
            let mut state = self.inner.borrow_mut();
            if state.destroyed {
                warn!("帧时钟已销毁，忽略启动");
                return;
            }
            if state.is_running {
                return;
            }
            state.is_running = true;
            state.paused_by_visibility = false;
            state.current_timestamp = 0.0;
            state.current_delta_time = 0.0;
            state.is_first_frame = true;
            if let Some(started) = state.pause_started_at.take() {
                state.milliseconds_in_last_pause = started.elapsed().as_secs_f64() * 1000.0;
            }
            (state.driver.clone(), state.config.clone())
        };

        debug!(driver = ?driver, "帧时钟启动");
        match driver {
            Some(ClockDriver::SelfDriven(context)) => {
                let weak = Rc::downgrade(&self.inner);
                let request_context = context.clone();
                context.run_outside_zone(Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        FrameClock { inner }.request_frame(&request_context);
                    }
                }));
            }
            Some(ClockDriver::HostTicker(ticker)) => {
                ticker.set_fps_bounds(config.min_fps, config.max_fps);
                let weak = Rc::downgrade(&self.inner);
                let listener_ticker = Rc::downgrade(&ticker);
                let id = ticker.add_listener(Rc::new(move |timestamp| {
                    if let (Some(inner), Some(ticker)) = (weak.upgrade(), listener_ticker.upgrade())
                    {
                        FrameClock { inner }.on_host_tick(timestamp, ticker.delta_ms());
                    }
                }));
                self.inner.borrow_mut().ticker_listener = Some(id);
            }
            None => {}
        }
    }

    /// 恢复时钟，等同于 [`start`](Self::start)
    pub fn resume(&self) {
        self.start();
    }

    /// 暂停时钟
    ///
    /// 已暂停时不做任何事。未启用可见性暂停时记录暂停开始的墙钟时间，
    /// 恢复时据此计算 [`milliseconds_in_last_pause`](Self::milliseconds_in_last_pause)。
    pub fn pause(&self) {
        let (driver, pending_frame, ticker_listener) = {
            let mut state = self.inner.borrow_mut();
            if !state.is_running {
                return;
            }
            state.is_running = false;
            state.current_timestamp = 0.0;
            state.current_delta_time = 0.0;
            if !state.config.pause_on_hidden {
                state.pause_started_at = Some(Instant::now());
            }
            (
                state.driver.clone(),
                state.pending_frame.take(),
                state.ticker_listener.take(),
            )
        };

        match driver {
            Some(ClockDriver::SelfDriven(context)) => {
                if let Some(id) = pending_frame {
                    context.cancel_animation_frame(id);
                }
            }
            Some(ClockDriver::HostTicker(ticker)) => {
                if let Some(id) = ticker_listener {
                    ticker.remove_listener(id);
                }
            }
            None => {}
        }
        debug!("帧时钟暂停");
    }

    /// 宿主界面可见性变化
    ///
    /// 仅在 `pause_on_hidden` 启用时生效。隐藏时自动暂停；
    /// 重新可见时只恢复由隐藏引起的暂停，调用方主动暂停的时钟保持暂停。
    pub fn set_visibility(&self, visible: bool) {
        let (enabled, running, paused_by_visibility) = {
            let state = self.inner.borrow();
            (
                state.config.pause_on_hidden,
                state.is_running,
                state.paused_by_visibility,
            )
        };
        if !enabled {
            return;
        }

        if !visible && running {
            debug!("宿主界面隐藏，自动暂停");
            self.pause();
            self.inner.borrow_mut().paused_by_visibility = true;
        } else if visible && paused_by_visibility {
            debug!("宿主界面可见，自动恢复");
            self.inner.borrow_mut().paused_by_visibility = false;
            self.start();
        }
    }

    /// 销毁时钟
    ///
    /// 暂停、清空订阅者并释放宿主与调度上下文。之后的调用都被忽略。
    pub fn destroy(&self) {
        self.pause();
        let mut state = self.inner.borrow_mut();
        state.subscribers.clear();
        state.last_subscription_index = SUBSCRIPTION_INDEX_SENTINEL;
        state.host = None;
        state.driver = None;
        state.destroyed = true;
        debug!("帧时钟销毁");
    }

    // ========== 查询方法 ==========

    /// 上一帧的间隔（毫秒）
    pub fn delta_time(&self) -> f64 {
        self.inner.borrow().current_delta_time
    }

    /// 上一帧的时间戳（毫秒），首帧前为 0
    pub fn current_timestamp(&self) -> f64 {
        self.inner.borrow().current_timestamp
    }

    /// 最近一帧是否为首帧
    pub fn is_first_frame(&self) -> bool {
        self.inner.borrow().is_first_frame
    }

    /// 是否处于暂停状态
    pub fn is_paused(&self) -> bool {
        !self.inner.borrow().is_running
    }

    /// 是否已销毁
    pub fn is_destroyed(&self) -> bool {
        self.inner.borrow().destroyed
    }

    /// 最近一次暂停持续的毫秒数（仅在未启用可见性暂停时记录）
    pub fn milliseconds_in_last_pause(&self) -> f64 {
        self.inner.borrow().milliseconds_in_last_pause
    }

    // ========== 帧处理 ==========

    fn request_frame(&self, context: &Rc<dyn SchedulingContext>) {
        let weak: Weak<RefCell<ClockState>> = Rc::downgrade(&self.inner);
        let id = context.request_animation_frame(Box::new(move |timestamp| {
            if let Some(inner) = weak.upgrade() {
                FrameClock { inner }.on_animation_frame(timestamp);
            }
        }));
        self.inner.borrow_mut().pending_frame = Some(id);
    }

    /// 自驱动模式的一帧
    fn on_animation_frame(&self, timestamp: f64) {
        let (snapshot, host, context) = {
            let mut state = self.inner.borrow_mut();
            state.pending_frame = None;
            if !state.is_running {
                return;
            }

            let is_first_frame = state.current_timestamp <= 0.0;
            state.is_first_frame = is_first_frame;
            let snapshot = if is_first_frame {
                state.current_delta_time = 0.0;
                None
            } else {
                state.current_delta_time = timestamp - state.current_timestamp;
                Some(snapshot_subscribers(&state.subscribers))
            };
            state.current_timestamp = timestamp;

            let context = match &state.driver {
                Some(ClockDriver::SelfDriven(context)) => Some(context.clone()),
                _ => None,
            };
            (snapshot, state.host.clone(), context)
        };

        if let Some(snapshot) = snapshot {
            dispatch(&snapshot, timestamp);
            if let Some(host) = host {
                host.render();
            }
        }

        let should_continue = {
            let state = self.inner.borrow();
            state.is_running && state.pending_frame.is_none()
        };
        if should_continue {
            if let Some(context) = context {
                self.request_frame(&context);
            }
        }
    }

    /// 宿主驱动模式的一帧
    fn on_host_tick(&self, timestamp: f64, host_delta_ms: f64) {
        let snapshot = {
            let mut state = self.inner.borrow_mut();
            if !state.is_running {
                return;
            }

            let is_first_frame = state.current_timestamp <= 0.0;
            state.is_first_frame = is_first_frame;
            state.current_timestamp = timestamp;
            if is_first_frame {
                state.current_delta_time = 0.0;
                return;
            }
            state.current_delta_time = host_delta_ms;
            snapshot_subscribers(&state.subscribers)
        };

        dispatch(&snapshot, timestamp);
    }
}

fn snapshot_subscribers(subscribers: &[Subscriber]) -> Vec<(f64, SubscriberCallback)> {
    subscribers
        .iter()
        .map(|s| (s.time_multiply, s.callback.clone()))
        .collect()
}

fn dispatch(snapshot: &[(f64, SubscriberCallback)], timestamp: f64) {
    for (time_multiply, callback) in snapshot {
        let mut callback = callback.borrow_mut();
        (*callback)(timestamp * time_multiply);
    }
}
