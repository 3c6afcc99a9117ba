//! # Manual 模块
//!
//! 手动推进的调度上下文与帧驱动器。
//!
//! 无窗口的宿主（命令行、测试）用它们模拟浏览器的动画帧与渲染库的 ticker：
//! 调用方决定每帧前进多少毫秒。

use std::cell::RefCell;

use super::host::{
    FrameCallback, FrameRequestId, HostTicker, SchedulingContext, TickListener, TickerListenerId,
};

#[derive(Default)]
struct ManualSchedulerState {
    now_ms: f64,
    next_request_id: u64,
    pending: Vec<(FrameRequestId, FrameCallback)>,
    zone_runs: usize,
}

/// 手动推进的调度上下文
#[derive(Default)]
pub struct ManualFrameScheduler {
    state: RefCell<ManualSchedulerState>,
}

impl std::fmt::Debug for ManualFrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualFrameScheduler")
            .field("now_ms", &state.now_ms)
            .field("pending", &state.pending.len())
            .finish()
    }
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前虚拟时间（毫秒）
    pub fn now_ms(&self) -> f64 {
        self.state.borrow().now_ms
    }

    /// 尚未触发的帧请求数
    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// `run_outside_zone` 被调用的次数
    pub fn outside_zone_runs(&self) -> usize {
        self.state.borrow().zone_runs
    }

    /// 推进虚拟时间并触发此前登记的全部帧请求
    ///
    /// 回调中新登记的请求留到下一次推进。返回触发的回调数。
    pub fn advance(&self, delta_ms: f64) -> usize {
        let (now, pending) = {
            let mut state = self.state.borrow_mut();
            state.now_ms += delta_ms;
            (state.now_ms, std::mem::take(&mut state.pending))
        };

        let fired = pending.len();
        for (_, callback) in pending {
            callback(now);
        }
        fired
    }

    /// 按固定帧间隔推进 `frames` 帧
    pub fn run_frames(&self, frames: usize, frame_ms: f64) {
        for _ in 0..frames {
            self.advance(frame_ms);
        }
    }
}

impl SchedulingContext for ManualFrameScheduler {
    fn run_outside_zone(&self, task: Box<dyn FnOnce()>) {
        self.state.borrow_mut().zone_runs += 1;
        task();
    }

    fn request_animation_frame(&self, callback: FrameCallback) -> FrameRequestId {
        let mut state = self.state.borrow_mut();
        state.next_request_id += 1;
        let id = FrameRequestId(state.next_request_id);
        state.pending.push((id, callback));
        id
    }

    fn cancel_animation_frame(&self, id: FrameRequestId) {
        self.state
            .borrow_mut()
            .pending
            .retain(|(pending_id, _)| *pending_id != id);
    }
}

#[derive(Default)]
struct ManualTickerState {
    now_ms: f64,
    delta_ms: f64,
    next_listener_id: u64,
    listeners: Vec<(TickerListenerId, TickListener)>,
    fps_bounds: Option<(u32, u32)>,
}

/// 手动推进的宿主帧驱动器
#[derive(Default)]
pub struct ManualTicker {
    state: RefCell<ManualTickerState>,
}

impl std::fmt::Debug for ManualTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualTicker")
            .field("now_ms", &state.now_ms)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已注册的监听器数
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// 最近一次设置的帧率上下限
    pub fn fps_bounds(&self) -> Option<(u32, u32)> {
        self.state.borrow().fps_bounds
    }

    /// 推进一帧并通知全部监听器
    pub fn tick(&self, delta_ms: f64) {
        let (now, listeners) = {
            let mut state = self.state.borrow_mut();
            state.now_ms += delta_ms;
            state.delta_ms = delta_ms;
            let listeners: Vec<TickListener> =
                state.listeners.iter().map(|(_, l)| l.clone()).collect();
            (state.now_ms, listeners)
        };

        for listener in listeners {
            listener(now);
        }
    }
}

impl HostTicker for ManualTicker {
    fn add_listener(&self, listener: TickListener) -> TickerListenerId {
        let mut state = self.state.borrow_mut();
        state.next_listener_id += 1;
        let id = TickerListenerId(state.next_listener_id);
        state.listeners.push((id, listener));
        id
    }

    fn remove_listener(&self, id: TickerListenerId) {
        self.state
            .borrow_mut()
            .listeners
            .retain(|(listener_id, _)| *listener_id != id);
    }

    fn delta_ms(&self) -> f64 {
        self.state.borrow().delta_ms
    }

    fn set_fps_bounds(&self, min_fps: u32, max_fps: u32) {
        self.state.borrow_mut().fps_bounds = Some((min_fps, max_fps));
    }
}
