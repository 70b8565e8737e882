use core::cell::Cell;

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Sender};

use crate::registry::{EventHandler, GestureEvent};

/// 把每个派发的事件转发到一个 `embassy-sync` 通道中。
///
/// 作为全局回调挂接到按钮上，另一个任务从通道的接收端异步地消费事件。
/// 转发使用 `try_send`，通道已满时事件被丢弃并计数，从不阻塞轮询循环。
pub struct EventForwarder<'ch, M: RawMutex, const N: usize> {
    sender: Sender<'ch, M, GestureEvent, N>,
    dropped: Cell<u32>,
}

impl<'ch, M: RawMutex, const N: usize> EventForwarder<'ch, M, N> {
    pub fn new(sender: Sender<'ch, M, GestureEvent, N>) -> Self {
        Self {
            sender,
            dropped: Cell::new(0),
        }
    }

    /// 因通道已满而被丢弃的事件数量。
    pub fn dropped(&self) -> u32 {
        self.dropped.get()
    }
}

impl<M: RawMutex, const N: usize> EventHandler for EventForwarder<'_, M, N> {
    fn handle(&self, event: GestureEvent) {
        if self.sender.try_send(event).is_err() {
            crate::trace!("event channel full, dropping {}", event);
            self.dropped.set(self.dropped.get().saturating_add(1));
        }
    }
}
