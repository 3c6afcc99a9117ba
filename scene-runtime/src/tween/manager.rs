//! # Manager 模块
//!
//! 补间编排器：持有一组补间，按并行或顺序模式统一控制。
//!
//! ## 执行模式
//!
//! - 并行：成员各自独立，调用时可用过滤器选择子集，并通过工厂为每个成员生成回调
//! - 顺序：只有"当前"成员在运行。`start_or_reset_all` 推进游标：
//!   首次调用指向第一个成员；当前成员不再运行时指向下一个；越过末尾后不再有当前成员

use std::rc::Rc;

use tracing::debug;

use super::{FinishedCallback, Tween, TweenKind, TweenTarget, UpdateCallback};
use crate::Point;
use crate::clock::FrameClock;
use crate::config::SceneConfig;
use crate::error::{ConfigError, SceneResult, TweenError};

/// 成员过滤器
pub type TweenFilter<'a> = &'a dyn Fn(&Tween) -> bool;

/// 为成员生成更新回调
pub type UpdateFactory<'a> = &'a dyn Fn(&Tween) -> Option<UpdateCallback>;

/// 为成员生成完成回调
pub type FinishedFactory<'a> = &'a dyn Fn(&Tween) -> Option<FinishedCallback>;

/// 顺序模式的游标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    NotStarted,
    At(usize),
    Exhausted,
}

/// 补间编排器
#[derive(Debug)]
pub struct TweenComponentManager {
    tweens: Vec<Tween>,
    parallel: bool,
    cursor: Cursor,
}

impl TweenComponentManager {
    /// 创建空编排器，执行模式之后不可更改
    pub fn new(parallel: bool) -> Self {
        Self {
            tweens: Vec::new(),
            parallel,
            cursor: Cursor::NotStarted,
        }
    }

    /// 按场景配置创建编排器
    ///
    /// 先校验配置，再逐个构造补间；任何一条曲线构造失败都会返回错误。
    pub fn from_config(clock: &FrameClock, config: &SceneConfig) -> SceneResult<Self> {
        config.validate()?;
        let mut manager = Self::new(config.parallel);
        for tween_config in &config.tweens {
            manager.add(Tween::new(clock.clone(), tween_config.clone())?);
        }
        debug!(
            tweens = manager.len(),
            parallel = manager.parallel,
            "补间编排器创建完成"
        );
        Ok(manager)
    }

    /// 追加成员（顺序模式下即为执行顺序）
    pub fn add(&mut self, tween: Tween) {
        self.tweens.push(tween);
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    /// 顺序模式的当前成员（并行模式恒为 `None`）
    pub fn current(&self) -> Option<&Tween> {
        match self.cursor {
            Cursor::At(index) if !self.parallel => self.tweens.get(index),
            _ => None,
        }
    }

    /// 是否有成员在运行
    pub fn has_running(&self) -> bool {
        self.tweens.iter().any(Tween::is_running)
    }

    /// 用目标绑定全部名字匹配的成员，返回绑定数量
    pub fn configure_all(&self, target: &Rc<dyn TweenTarget>) -> usize {
        self.tweens
            .iter()
            .filter(|tween| tween.configure(target))
            .count()
    }

    // ========== 生命周期 ==========

    /// 启动或重新开始
    ///
    /// 并行模式启动所有通过过滤器的成员，有成员未绑定目标时返回错误且不启动任何成员；
    /// 顺序模式忽略过滤器，推进游标后启动当前成员。
    pub fn start_or_reset_all(
        &mut self,
        filter: Option<TweenFilter<'_>>,
        update_factory: Option<UpdateFactory<'_>>,
        finished_factory: Option<FinishedFactory<'_>>,
    ) -> Result<(), TweenError> {
        let start = |tween: &Tween| {
            let on_update = update_factory.and_then(|factory| factory(tween));
            let on_finished = finished_factory.and_then(|factory| factory(tween));
            tween.start_or_reset(on_update, on_finished)
        };

        if self.parallel {
            let selected: Vec<&Tween> =
                self.tweens.iter().filter(|t| passes(filter, t)).collect();
            // 先检查全部成员，任一未绑定目标就整体不启动
            if let Some(unbound) = selected
                .iter()
                .find(|t| t.option().requires_target() && !t.has_target())
            {
                return Err(TweenError::Misconfigured {
                    target_name: unbound.target_name(),
                });
            }
            for tween in selected {
                start(tween)?;
            }
            return Ok(());
        }

        self.cursor = match self.cursor {
            Cursor::NotStarted if self.tweens.is_empty() => Cursor::Exhausted,
            Cursor::NotStarted => Cursor::At(0),
            Cursor::At(index) if self.tweens.get(index).is_some_and(Tween::is_running) => {
                Cursor::At(index)
            }
            Cursor::At(index) if index + 1 < self.tweens.len() => Cursor::At(index + 1),
            Cursor::At(_) | Cursor::Exhausted => Cursor::Exhausted,
        };

        match self.cursor {
            Cursor::At(index) => {
                debug!(index, "顺序补间启动当前成员");
                start(&self.tweens[index])
            }
            _ => Ok(()),
        }
    }

    /// 暂停：并行模式按过滤器，顺序模式只影响当前成员
    pub fn pause_all(&self, filter: Option<TweenFilter<'_>>) {
        self.for_each_selected(filter, Tween::pause);
    }

    /// 继续：并行模式按过滤器，顺序模式只影响当前成员
    pub fn resume_all(&self, filter: Option<TweenFilter<'_>>) {
        self.for_each_selected(filter, Tween::resume);
    }

    /// 销毁全部成员并清空集合
    pub fn destroy(&mut self) {
        for tween in self.tweens.drain(..) {
            tween.destroy();
        }
        self.cursor = Cursor::Exhausted;
        debug!("补间编排器销毁");
    }

    fn for_each_selected(&self, filter: Option<TweenFilter<'_>>, action: impl Fn(&Tween)) {
        if self.parallel {
            self.tweens
                .iter()
                .filter(|t| passes(filter, t))
                .for_each(action);
        } else if let Some(tween) = self.current() {
            action(tween);
        }
    }

    // ========== 广播改写 ==========

    /// 向全部成员广播位置改写，模式不匹配的成员被忽略
    pub fn set_position(&self, position: Point) -> Result<(), TweenError> {
        self.broadcast(|tween| tween.set_position(position))
    }

    /// 向全部成员广播缩放改写，模式不匹配的成员被忽略
    pub fn set_scale(&self, scale: Point) -> Result<(), TweenError> {
        self.broadcast(|tween| tween.set_scale(scale))
    }

    /// 向全部成员广播旋转改写，模式不匹配的成员被忽略
    pub fn set_rotation(&self, rotation: f64) -> Result<(), TweenError> {
        self.broadcast(|tween| tween.set_rotation(rotation))
    }

    fn broadcast(
        &self,
        apply: impl Fn(&Tween) -> Result<(), TweenError>,
    ) -> Result<(), TweenError> {
        for tween in &self.tweens {
            match apply(tween) {
                Ok(()) => {}
                Err(TweenError::UnsupportedOperation {
                    target_name,
                    option,
                    operation,
                }) => {
                    debug!(target_name = %target_name, ?option, operation, "忽略模式不匹配的改写");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    // ========== 查询 ==========

    /// 第一个指定曲线族的成员
    pub fn get_component(&self, kind: TweenKind) -> Option<&Tween> {
        self.tweens.iter().find(|tween| tween.kind() == kind)
    }

    /// 按曲线族名字查找第一个成员
    pub fn get_component_by_string_type(
        &self,
        name: &str,
    ) -> Result<Option<&Tween>, ConfigError> {
        let kind: TweenKind = name.parse()?;
        Ok(self.get_component(kind))
    }

    /// 全部指定曲线族的成员
    pub fn get_all_components(&self, kind: TweenKind) -> Vec<&Tween> {
        self.tweens
            .iter()
            .filter(|tween| tween.kind() == kind)
            .collect()
    }
}

fn passes(filter: Option<TweenFilter<'_>>, tween: &Tween) -> bool {
    filter.is_none_or(|filter| filter(tween))
}
