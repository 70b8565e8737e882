use heapless::Vec;

use crate::{error::Error, GestureState};

/// 无参数的回调动作。
///
/// 注册表只保存对动作的共享引用，动作本身由调用者持有，
/// 需要修改状态时请使用 `Cell` 之类的内部可变性。
pub trait Action {
    fn invoke(&self);
}

impl<F: Fn()> Action for F {
    fn invoke(&self) {
        self()
    }
}

/// 接收完整事件信息的全局回调。
pub trait EventHandler {
    fn handle(&self, event: GestureEvent);
}

impl<F: Fn(GestureEvent)> EventHandler for F {
    fn handle(&self, event: GestureEvent) {
        self(event)
    }
}

/// 一次派发时的完整按钮状态。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEvent {
    pub state: GestureState,
    pub hold_count: u8,
    pub repeat_count: u8,
}

/// 回调键中的计数匹配条件。
///
/// `Any` 是与任何具体计数都不相同的通配值。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Any,
    Exact(u8),
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchKey {
    pub state: GestureState,
    pub hold: Count,
    pub repeat: Count,
}

impl DispatchKey {
    pub const fn new(state: GestureState, hold: Count, repeat: Count) -> Self {
        Self {
            state,
            hold,
            repeat,
        }
    }
}

/// 回调注册表。
///
/// 最多保存 `N` 个按键回调，外加一个全局回调。
pub struct CallbackRegistry<'a, const N: usize> {
    handler: Option<&'a dyn EventHandler>,
    actions: Vec<(DispatchKey, &'a dyn Action), N>,
}

impl<'a, const N: usize> Default for CallbackRegistry<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> CallbackRegistry<'a, N> {
    pub const fn new() -> Self {
        Self {
            handler: None,
            actions: Vec::new(),
        }
    }

    /// 设置或清除全局回调。
    pub fn set_handler(&mut self, handler: Option<&'a dyn EventHandler>) {
        self.handler = handler;
    }

    /// 为 `key` 设置动作，替换已有的动作；传入 `None` 等同于移除。
    pub fn set(&mut self, key: DispatchKey, action: Option<&'a dyn Action>) -> Result<(), Error> {
        let Some(action) = action else {
            self.remove(key);
            return Ok(());
        };

        if let Some(slot) = self.actions.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = action;
            return Ok(());
        }
        self.actions
            .push((key, action))
            .map_err(|_| Error::RegistryFull)
    }

    /// 移除 `key` 对应的动作。返回该键之前是否存在。
    pub fn remove(&mut self, key: DispatchKey) -> bool {
        match self.actions.iter().position(|(k, _)| *k == key) {
            Some(index) => {
                self.actions.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: DispatchKey) -> bool {
        self.lookup(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn lookup(&self, key: DispatchKey) -> Option<&'a dyn Action> {
        self.actions
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, action)| *action)
    }

    fn fire(&self, state: GestureState, hold: Count, repeat: Count) {
        if let Some(action) = self.lookup(DispatchKey::new(state, hold, repeat)) {
            action.invoke();
        }
    }

    /// 按固定优先级派发一个事件，所有匹配的回调都会被调用：
    ///
    /// 1. 全局回调；
    /// 2. 精确匹配 `(state, hold, repeat)`；
    /// 3. 仅当 `hold == 0` 时：`(state, Any, Any)`，然后 `(state, Any, repeat)`；
    /// 4. `(state, hold, Any)`。
    ///
    /// 第 3 步只在非长按事件上生效，避免“任意保持计数”的回调在每个长按步进上重复触发。
    pub fn dispatch(&self, event: GestureEvent) {
        let GestureEvent {
            state,
            hold_count,
            repeat_count,
        } = event;

        if let Some(handler) = self.handler {
            handler.handle(event);
        }

        self.fire(state, Count::Exact(hold_count), Count::Exact(repeat_count));

        if hold_count == 0 {
            self.fire(state, Count::Any, Count::Any);
            self.fire(state, Count::Any, Count::Exact(repeat_count));
        }

        self.fire(state, Count::Exact(hold_count), Count::Any);
    }
}
