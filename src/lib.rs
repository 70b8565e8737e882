#![no_std]

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)*);
    }};
}
pub(crate) use trace;

pub mod channel;
pub mod clock;
pub mod config;
pub mod error;
pub mod gpio;
pub mod registry;
pub mod sequence;

pub use config::*;
pub use error::Error;
pub use registry::{Action, Count, DispatchKey, EventHandler, GestureEvent};
pub use sequence::{GestureToken, NoSequences, SequenceMatcher, TokenSink};

use embassy_time::{Duration, Ticker};

use crate::{
    clock::{elapsed, Clock, Ticks},
    gpio::{Level, LevelInput},
    registry::CallbackRegistry,
};

/// 去抖后的逻辑按钮状态（不是引脚的原始电平）。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureState {
    Pressed,
    Released,
}

/// 轮询驱动的按钮手势状态机。
///
/// 每次调用 [`tick`](Self::tick) 读取一次输入电平，识别按下、释放、长按步进和连击，
/// 并通过回调表派发事件。`S` 是可选的序列匹配器，默认不启用。
/// `KEYS` 是按键回调表的容量。
///
/// 状态机不可重入，只能在单个执行上下文中使用。
pub struct Button<'a, I: LevelInput, C: Clock, S: TokenSink = NoSequences, const KEYS: usize = 16>
{
    input: I,
    clock: C,
    config: ButtonConfig,
    registry: CallbackRegistry<'a, KEYS>,
    sequences: S,

    state: GestureState,
    hold_count: u8,
    repeat_count: u8,

    press_started: Option<Ticks>,
    released_at: Option<Ticks>,
    last_dispatch: Option<Ticks>,
}

impl<'a, I: LevelInput, C: Clock> Button<'a, I, C> {
    /// 创建一个不带序列匹配的按钮。
    pub fn new(input: I, clock: C, config: ButtonConfig) -> Self {
        Self::with_sequences(input, clock, config, NoSequences)
    }
}

impl<'a, I: LevelInput, C: Clock, S: TokenSink, const KEYS: usize> Button<'a, I, C, S, KEYS> {
    /// 创建一个按钮，并挂接一个序列匹配器。
    pub fn with_sequences(input: I, clock: C, config: ButtonConfig, sequences: S) -> Self {
        Self {
            input,
            clock,
            config,
            registry: CallbackRegistry::new(),
            sequences,
            state: GestureState::Released,
            hold_count: 0,
            repeat_count: 0,
            press_started: None,
            released_at: None,
            last_dispatch: None,
        }
    }

    /// 推进状态机。需要在主循环中反复调用。
    pub fn tick(&mut self) {
        let now = self.clock.now();

        if let Some(last) = self.last_dispatch {
            if elapsed(last, now) < self.config.debounce {
                return;
            }
        }

        // 读取失败时跳过本次轮询
        let Some(level) = self.input.read() else {
            return;
        };

        match self.state {
            GestureState::Pressed => self.tick_pressed(level, now),
            GestureState::Released => self.tick_released(level, now),
        }
    }

    fn tick_pressed(&mut self, level: Level, now: Ticks) {
        if level == self.config.released_level {
            self.press_started = None;
            self.released_at = Some(now);
            self.state = GestureState::Released;
            self.dispatch(now);

            if self.hold_count > 0 {
                self.repeat_count = 0;
            } else {
                self.sequences.push(GestureToken::Short);
            }
            self.hold_count = 0;
            return;
        }

        if level != self.config.pressed_level {
            return;
        }
        let Some(started) = self.press_started else {
            return;
        };
        if elapsed(started, now) < self.config.hold_interval {
            return;
        }

        if self.hold_count == u8::MAX {
            // 保持计数已饱和，停止计时，不再派发长按事件
            self.press_started = None;
            return;
        }

        self.press_started = Some(now);
        self.hold_count += 1;
        if self.hold_count == 1 {
            self.sequences.push(GestureToken::Long);
        }
        self.dispatch(now);
    }

    fn tick_released(&mut self, level: Level, now: Ticks) {
        if level != self.config.pressed_level {
            if let (Some(last), Some(released_at)) = (self.sequences.last(), self.released_at) {
                if last != GestureToken::Pause
                    && elapsed(released_at, now) > self.config.hold_interval
                {
                    self.sequences.push(GestureToken::Pause);
                }
            }
            return;
        }

        self.press_started = Some(now);
        self.state = GestureState::Pressed;

        if let Some(released_at) = self.released_at.take() {
            if elapsed(released_at, now) <= self.config.repeat_window {
                self.repeat_count = self.repeat_count.saturating_add(1);
            } else {
                self.repeat_count = 0;
            }
        }
        self.dispatch(now);
    }

    fn dispatch(&mut self, now: Ticks) {
        self.last_dispatch = Some(now);
        let event = self.event();
        trace!(
            "button {} hold={} repeat={}",
            event.state,
            event.hold_count,
            event.repeat_count
        );
        self.registry.dispatch(event);
    }

    /// 以固定周期轮询按钮，永不返回。需要 spawn 到后台任务中运行。
    pub async fn run(&mut self, poll_interval: Duration) -> ! {
        let mut ticker = Ticker::every(poll_interval);
        loop {
            self.tick();
            ticker.next().await;
        }
    }

    /// 设置或清除接收完整事件信息的全局回调。
    pub fn set_event_handler(&mut self, handler: Option<&'a dyn EventHandler>) {
        self.registry.set_handler(handler);
    }

    /// 为 `(state, hold, repeat)` 设置动作；传入 `None` 等同于移除。
    ///
    /// `hold` 和 `repeat` 可以是具体计数 [`Count::Exact`]，也可以是通配的 [`Count::Any`]。
    pub fn set(
        &mut self,
        state: GestureState,
        hold: Count,
        repeat: Count,
        action: Option<&'a dyn Action>,
    ) -> Result<(), Error> {
        let key = DispatchKey::new(state, hold, repeat);
        self.registry.set(key, action)
    }

    /// 为 `(state, hold, repeat)` 注册动作，替换已有的动作。
    pub fn on(
        &mut self,
        state: GestureState,
        hold: Count,
        repeat: Count,
        action: &'a dyn Action,
    ) -> Result<(), Error> {
        self.set(state, hold, repeat, Some(action))
    }

    /// 注册 `(state, Any, Any)`：该状态下每个非长按事件都会触发。
    pub fn on_state(&mut self, state: GestureState, action: &'a dyn Action) -> Result<(), Error> {
        self.on(state, Count::Any, Count::Any, action)
    }

    /// 移除 `(state, hold, repeat)` 对应的动作。返回该键之前是否存在。
    pub fn off(&mut self, state: GestureState, hold: Count, repeat: Count) -> bool {
        self.registry.remove(DispatchKey::new(state, hold, repeat))
    }

    /// 去抖后的当前状态。
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// 当前按下已经历的长按步进数，释放后归零。
    pub fn hold_count(&self) -> u8 {
        self.hold_count
    }

    /// 连击计数，达到 `u8::MAX` 后不再增加。
    pub fn repeat_count(&self) -> u8 {
        self.repeat_count
    }

    /// 当前状态的事件快照。
    pub fn event(&self) -> GestureEvent {
        GestureEvent {
            state: self.state,
            hold_count: self.hold_count,
            repeat_count: self.repeat_count,
        }
    }

    /// 当前配置。
    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    /// 整体替换配置，计数和计时保持不变。
    pub fn set_config(&mut self, new_config: ButtonConfig) {
        self.config = new_config;
    }

    /// 消抖时间。
    pub fn debounce(&self) -> Ticks {
        self.config.debounce
    }

    /// 设置消抖时间。
    pub fn set_debounce(&mut self, debounce: Ticks) {
        self.config.debounce = debounce;
    }

    /// 被视为“按下”的输入电平。
    pub fn pressed_level(&self) -> Level {
        self.config.pressed_level
    }

    /// 设置被视为“按下”的输入电平。
    pub fn set_pressed_level(&mut self, level: Level) {
        self.config.pressed_level = level;
    }

    /// 被视为“释放”的输入电平。
    pub fn released_level(&self) -> Level {
        self.config.released_level
    }

    /// 设置被视为“释放”的输入电平。
    pub fn set_released_level(&mut self, level: Level) {
        self.config.released_level = level;
    }

    /// 获取序列匹配器的不可变引用
    pub fn sequences(&self) -> &S {
        &self.sequences
    }

    /// 获取序列匹配器的可变引用
    pub fn sequences_mut(&mut self) -> &mut S {
        &mut self.sequences
    }

    /// 获取底层输入的不可变引用
    pub fn input(&self) -> &I {
        &self.input
    }

    /// 获取底层输入的可变引用
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// 重置按钮状态到初始的释放状态，清空计数和计时。已注册的回调保持不变。
    pub fn reset(&mut self) {
        self.state = GestureState::Released;
        self.hold_count = 0;
        self.repeat_count = 0;
        self.press_started = None;
        self.released_at = None;
        self.last_dispatch = None;
    }
}

impl<'a, I, C, const P: usize, const L: usize, const KEYS: usize>
    Button<'a, I, C, SequenceMatcher<'a, P, L>, KEYS>
where
    I: LevelInput,
    C: Clock,
{
    /// 为手势序列设置动作；传入 `None` 等同于移除。空序列会被忽略。
    pub fn set_sequence(
        &mut self,
        pattern: &[GestureToken],
        action: Option<&'a dyn Action>,
    ) -> Result<(), Error> {
        self.sequences.set(pattern, action)
    }

    /// 为手势序列注册动作，替换已有的动作。
    pub fn on_sequence(
        &mut self,
        pattern: &[GestureToken],
        action: &'a dyn Action,
    ) -> Result<(), Error> {
        self.sequences.set(pattern, Some(action))
    }

    /// 移除一个手势序列。返回该序列之前是否存在。
    pub fn off_sequence(&mut self, pattern: &[GestureToken]) -> bool {
        self.sequences.remove(pattern)
    }
}
