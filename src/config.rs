use crate::{clock::Ticks, gpio::Level};

/// 默认的长按步进间隔。
pub const HOLD_INTERVAL: Ticks = 1000;
/// 默认的连击窗口。
pub const REPEAT_WINDOW: Ticks = 500;
/// 默认的消抖时间。
pub const DEBOUNCE_DELAY: Ticks = 30;

/// 定义按钮手势识别的通用配置参数。
///
/// 所有时间都以时钟计数为单位（使用 [`EmbassyClock`](crate::clock::EmbassyClock) 时即毫秒）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// 两次派发事件之间的最小间隔。
    ///
    /// 上一次事件派发后，此时间段内的 `tick()` 调用不做任何事情，
    /// 以防止物理按键的机械抖动产生误报。
    pub debounce: Ticks,

    /// 长按步进间隔。
    ///
    /// 按键保持按下，每经过一个间隔，保持计数加一并派发一次事件。
    /// 释放后超过这个时长没有新的按下，序列历史中会记录一次 `Pause`。
    pub hold_interval: Ticks,

    /// 连击窗口。
    ///
    /// 释放后在此时间内（含边界）再次按下，会被计为一次连击。
    pub repeat_window: Ticks,

    /// 被视为“按下”的输入电平。
    pub pressed_level: Level,

    /// 被视为“释放”的输入电平。
    pub released_level: Level,
}

impl Default for ButtonConfig {
    /// 提供一套与常见上拉接法匹配的默认配置。
    ///
    /// - 消抖: 30
    /// - 长按步进: 1000
    /// - 连击窗口: 500
    /// - 按下为低电平，释放为高电平
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE_DELAY,
            hold_interval: HOLD_INTERVAL,
            repeat_window: REPEAT_WINDOW,
            pressed_level: Level::Low,
            released_level: Level::High,
        }
    }
}
