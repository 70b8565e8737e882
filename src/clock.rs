use embassy_time::Instant;

/// 时钟计数值。固定宽度，到达最大值后回绕到 0。
pub type Ticks = u32;

/// 计算从 `start` 到 `now` 经过的时间，正确处理计数器回绕。
///
/// 当 `now >= start` 时结果为 `now - start`；
/// 否则说明计数器在两次读取之间已经越过最大值，结果为 `(MAX - start) + now + 1`。
#[inline]
pub const fn elapsed(start: Ticks, now: Ticks) -> Ticks {
    if now >= start {
        now - start
    } else {
        (Ticks::MAX - start) + now + 1
    }
}

/// 一个trait，抽象了单调递增（允许回绕）的时钟源。
///
/// 计数的分辨率决定了消抖、长按和连击阈值的粒度。
pub trait Clock {
    fn now(&self) -> Ticks;
}

impl<F: Fn() -> Ticks> Clock for F {
    fn now(&self) -> Ticks {
        self()
    }
}

/// 基于 `embassy_time::Instant` 的毫秒时钟。
///
/// 64 位的毫秒数被截断为 32 位，大约 49.7 天回绕一次，由 [`elapsed`] 处理。
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now(&self) -> Ticks {
        Instant::now().as_millis() as Ticks
    }
}
