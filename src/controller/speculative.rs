/// 乐观变更的可回滚快照
///
/// 用法：应用本地变更后以当时的视图代号 capture 快照；
/// 远端操作失败时调用 `restore_if_current`，只有视图代号
/// 没有前进（用户没有切换到更新的状态）才交回快照。
#[derive(Debug)]
pub struct Speculation<T: Clone> {
    snapshot: T,
    generation: u64,
}

impl<T: Clone> Speculation<T> {
    pub fn capture(value: &T, generation: u64) -> Self {
        Self {
            snapshot: value.clone(),
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 视图代号未变时交回快照，否则说明已有更新的状态，放弃回滚
    pub fn restore_if_current(self, current_generation: u64) -> Option<T> {
        if current_generation == self.generation {
            Some(self.snapshot)
        } else {
            None
        }
    }

    /// 无条件取出快照
    pub fn into_snapshot(self) -> T {
        self.snapshot
    }
}
