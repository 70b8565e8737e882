use heapless::{Deque, Vec};

use crate::{error::Error, registry::Action};

/// 一个已完成的基本手势。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureToken {
    /// 没有任何长按步进的一次按下/释放。
    Short,
    /// 当前按下的第一个长按步进。
    Long,
    /// 释放后超过长按间隔仍未再次按下。
    Pause,
}

/// 一个trait，抽象了接收手势标记的组件。
///
/// 状态机只通过这个接口与序列匹配器交互，不需要序列功能时使用 [`NoSequences`]。
pub trait TokenSink {
    fn push(&mut self, token: GestureToken);

    /// 历史中最近的一个标记。
    fn last(&self) -> Option<GestureToken>;
}

/// 不记录任何标记的空实现。
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSequences;

impl TokenSink for NoSequences {
    fn push(&mut self, _token: GestureToken) {}

    fn last(&self) -> Option<GestureToken> {
        None
    }
}

/// 序列匹配器。
///
/// 最多保存 `P` 个序列，每个序列最长 `L` 个标记。
/// 历史是一个容量为 `L` 的环形缓冲区，实际长度始终不超过当前注册的最长序列。
pub struct SequenceMatcher<'a, const P: usize = 8, const L: usize = 8> {
    patterns: Vec<(Vec<GestureToken, L>, &'a dyn Action), P>,
    history: Deque<GestureToken, L>,
    max_len: usize,
}

impl<'a, const P: usize, const L: usize> Default for SequenceMatcher<'a, P, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const P: usize, const L: usize> SequenceMatcher<'a, P, L> {
    pub const fn new() -> Self {
        Self {
            patterns: Vec::new(),
            history: Deque::new(),
            max_len: 0,
        }
    }

    /// 为 `pattern` 设置动作；传入 `None` 等同于移除。空序列会被忽略。
    pub fn set(
        &mut self,
        pattern: &[GestureToken],
        action: Option<&'a dyn Action>,
    ) -> Result<(), Error> {
        if pattern.is_empty() {
            return Ok(());
        }
        let Some(action) = action else {
            self.remove(pattern);
            return Ok(());
        };

        if let Some(slot) = self
            .patterns
            .iter_mut()
            .find(|(p, _)| p.as_slice() == pattern)
        {
            slot.1 = action;
            return Ok(());
        }

        let tokens = Vec::from_slice(pattern).map_err(|_| Error::PatternTooLong)?;
        self.patterns
            .push((tokens, action))
            .map_err(|_| Error::SequencesFull)?;
        self.max_len = self.max_len.max(pattern.len());
        Ok(())
    }

    /// 移除一个序列，并把历史长度收缩到剩余序列中最长的那一个。
    pub fn remove(&mut self, pattern: &[GestureToken]) -> bool {
        let Some(index) = self.patterns.iter().position(|(p, _)| p.as_slice() == pattern) else {
            return false;
        };
        self.patterns.swap_remove(index);

        self.max_len = self.patterns.iter().map(|(p, _)| p.len()).max().unwrap_or(0);
        self.trim();
        true
    }

    /// 当前的历史长度上限，即注册的最长序列长度。
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// 已注册的序列数量。
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// 从旧到新遍历历史。
    pub fn history(&self) -> impl Iterator<Item = GestureToken> + '_ {
        self.history.iter().copied()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn trim(&mut self) {
        while self.history.len() > self.max_len {
            self.history.pop_front();
        }
    }

    fn ends_with(&self, pattern: &[GestureToken]) -> bool {
        let len = self.history.len();
        pattern.len() <= len && self.history.iter().skip(len - pattern.len()).eq(pattern.iter())
    }

    /// 找出与历史末尾相等的最长序列。
    fn longest_match(&self) -> Option<&'a dyn Action> {
        let mut best: Option<(usize, &'a dyn Action)> = None;
        for (pattern, action) in &self.patterns {
            if best.is_some_and(|(len, _)| pattern.len() <= len) {
                continue;
            }
            if self.ends_with(pattern) {
                best = Some((pattern.len(), *action));
            }
        }
        best.map(|(_, action)| action)
    }
}

impl<const P: usize, const L: usize> TokenSink for SequenceMatcher<'_, P, L> {
    fn push(&mut self, token: GestureToken) {
        if self.patterns.is_empty() {
            return;
        }

        if self.history.is_full() {
            self.history.pop_front();
        }
        // 容量刚刚腾出，不会失败
        let _ = self.history.push_back(token);
        self.trim();

        if let Some(action) = self.longest_match() {
            crate::trace!("sequence matched on {}", token);
            action.invoke();
        }
    }

    fn last(&self) -> Option<GestureToken> {
        self.history.back().copied()
    }
}
