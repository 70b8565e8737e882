use embedded_hal::digital::InputPin;

/// 数字输入的电平。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// 一个trait，抽象了所有可以被轮询读取电平的输入源。
pub trait LevelInput {
    /// 读取当前电平。读取失败时返回 `None`，本次轮询将被跳过。
    fn read(&mut self) -> Option<Level>;
}

/// 一个直接由GPIO输入引脚驱动的输入源。
///
/// 引脚模式（上拉、下拉等）需要在构造 `P` 时由调用者配置好。
pub struct GpioInput<P: InputPin> {
    pin: P,
}

impl<P: InputPin> GpioInput<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// 取回底层引脚。
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> LevelInput for GpioInput<P> {
    fn read(&mut self) -> Option<Level> {
        self.pin.is_high().ok().map(Level::from)
    }
}
