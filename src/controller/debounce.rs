use std::time::{Duration, Instant};

/// 规范的防抖窗口
///
/// 旧版两个视图分别用了 3000ms 和 500ms，属于无意的漂移，
/// 统一取 500ms；需要别的窗口时通过构造参数指定。
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// 防抖状态机：Idle → Pending → Fired
///
/// 时钟由调用方注入（`Instant` 参数），不持有定时器，
/// 触发与丢弃规则可以脱离运行时单独测试。
#[derive(Debug, Clone, PartialEq, Eq)]
enum DebounceState {
    Idle,
    Pending { text: String, deadline: Instant },
    Fired,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    state: DebounceState,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_WINDOW)
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: DebounceState::Idle,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// 一次键入：覆盖待发文本并重置截止时间
    pub fn press(&mut self, text: impl Into<String>, now: Instant) {
        self.state = DebounceState::Pending {
            text: text.into(),
            deadline: now + self.window,
        };
    }

    /// 窗口到期则触发，返回窗口内最后一次键入的文本
    pub fn try_fire(&mut self, now: Instant) -> Option<String> {
        let due = matches!(&self.state, DebounceState::Pending { deadline, .. } if now >= *deadline);
        if !due {
            return None;
        }
        match std::mem::replace(&mut self.state, DebounceState::Fired) {
            DebounceState::Pending { text, .. } => Some(text),
            _ => None,
        }
    }

    /// 提交绕过：立即取出待发文本（表单回车/按钮）
    pub fn flush(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.state, DebounceState::Idle) {
            DebounceState::Pending { text, .. } => {
                self.state = DebounceState::Fired;
                Some(text)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// 取消待发查询（分类切换等操作会清掉在途防抖）
    pub fn cancel(&mut self) {
        self.state = DebounceState::Idle;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }

    /// 下一次触发时刻，驱动层据此安排唤醒
    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            DebounceState::Pending { deadline, .. } => Some(*deadline),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    #[test]
    fn test_burst_fires_once_with_final_text() {
        // 窗口内的连续键入只触发一次，且文本为最后一次键入
        let mut debouncer = Debouncer::new(WINDOW);
        let start = Instant::now();

        debouncer.press("a", start);
        debouncer.press("ac", start + Duration::from_millis(100));
        debouncer.press("act", start + Duration::from_millis(200));

        // 以最后一次键入起算，窗口未满不触发
        assert_eq!(debouncer.try_fire(start + Duration::from_millis(400)), None);
        assert_eq!(
            debouncer.try_fire(start + Duration::from_millis(700)),
            Some("act".to_string())
        );
        // 触发后不再重复
        assert_eq!(debouncer.try_fire(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn test_fire_exactly_at_deadline() {
        let mut debouncer = Debouncer::new(WINDOW);
        let start = Instant::now();
        debouncer.press("x", start);
        assert_eq!(debouncer.try_fire(start + WINDOW), Some("x".to_string()));
    }

    #[test]
    fn test_flush_bypasses_window() {
        let mut debouncer = Debouncer::new(WINDOW);
        let start = Instant::now();
        debouncer.press("zzz", start);
        assert_eq!(debouncer.flush(), Some("zzz".to_string()));
        // 提交后窗口内不会再触发
        assert_eq!(debouncer.try_fire(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn test_flush_without_pending_is_noop() {
        let mut debouncer = Debouncer::new(WINDOW);
        assert_eq!(debouncer.flush(), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_cancel_drops_pending_query() {
        let mut debouncer = Debouncer::new(WINDOW);
        let start = Instant::now();
        debouncer.press("abc", start);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.try_fire(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn test_press_after_fire_rearms() {
        let mut debouncer = Debouncer::new(WINDOW);
        let start = Instant::now();
        debouncer.press("first", start);
        assert!(debouncer.try_fire(start + WINDOW).is_some());

        debouncer.press("second", start + Duration::from_secs(1));
        assert_eq!(
            debouncer.try_fire(start + Duration::from_secs(1) + WINDOW),
            Some("second".to_string())
        );
    }

    #[test]
    fn test_deadline_tracks_last_press() {
        let mut debouncer = Debouncer::new(WINDOW);
        let start = Instant::now();
        assert_eq!(debouncer.deadline(), None);

        debouncer.press("a", start);
        assert_eq!(debouncer.deadline(), Some(start + WINDOW));

        let later = start + Duration::from_millis(300);
        debouncer.press("ab", later);
        assert_eq!(debouncer.deadline(), Some(later + WINDOW));
    }
}
