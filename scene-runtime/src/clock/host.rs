//! # Host 模块
//!
//! 帧时钟依赖的外部协作者接口。
//!
//! - [`RenderHost`]：渲染宿主，每帧分发后调用 `render()`
//! - [`HostTicker`]：宿主自带的帧驱动器（宿主驱动模式）
//! - [`SchedulingContext`]：请求动画帧、在变更检测区域之外执行任务（自驱动模式）

use std::rc::Rc;

/// 动画帧回调，参数为时间戳（毫秒）
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// 宿主帧驱动器的监听器，参数为时间戳（毫秒）
pub type TickListener = Rc<dyn Fn(f64)>;

/// 动画帧请求 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub u64);

/// 宿主帧驱动器监听器 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickerListenerId(pub u64);

/// 渲染宿主
pub trait RenderHost {
    /// 渲染一帧
    fn render(&self);

    /// 回收未使用的纹理内存
    fn collect_unused_textures(&self) {}
}

/// 宿主帧驱动器
pub trait HostTicker {
    /// 注册监听器
    fn add_listener(&self, listener: TickListener) -> TickerListenerId;

    /// 移除监听器，ID 不存在时忽略
    fn remove_listener(&self, id: TickerListenerId);

    /// 上一帧的间隔（毫秒）
    fn delta_ms(&self) -> f64;

    /// 设置帧率上下限
    fn set_fps_bounds(&self, min_fps: u32, max_fps: u32);
}

/// 调度上下文
pub trait SchedulingContext {
    /// 在宿主的批处理/变更检测区域之外执行任务
    fn run_outside_zone(&self, task: Box<dyn FnOnce()>);

    /// 请求下一帧回调
    ///
    /// 回调必须在之后的某一帧异步触发，不能在本调用内同步执行。
    fn request_animation_frame(&self, callback: FrameCallback) -> FrameRequestId;

    /// 取消尚未触发的帧请求
    fn cancel_animation_frame(&self, id: FrameRequestId);
}
