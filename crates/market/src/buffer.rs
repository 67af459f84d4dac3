/// # Summary
/// 固定容量的滚动环形缓冲区。
///
/// # Invariants
/// - 内存空间在初始化时一次性分配，后续不再扩容。
/// - 始终保持最近 N 个元素，溢出时覆盖最旧的一个。
/// - 容量至少为 1。
#[derive(Debug, Clone)]
pub struct RollingBuffer<T> {
    // 内部存储容器
    data: Vec<T>,
    // 最大容量
    capacity: usize,
    // 已满时下一次写入的位置，同时也是最旧元素的位置
    cursor: usize,
}

impl<T: Clone> RollingBuffer<T> {
    /// # Summary
    /// 创建一个新的滚动缓冲区。
    ///
    /// # Arguments
    /// * `capacity`: 固定容量上限，传入 0 时按 1 处理。
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// # Summary
    /// 向缓冲区推送新元素。
    ///
    /// # Logic
    /// 1. 若未满，则直接 push。
    /// 2. 若已满，则覆盖 cursor 处最旧的数据，并递增（取模）cursor。
    ///
    /// # Returns
    /// 被淘汰的最旧元素 (未满时为 None)。
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.data.len() < self.capacity {
            self.data.push(item);
            None
        } else {
            let evicted = std::mem::replace(&mut self.data[self.cursor], item);
            self.cursor = (self.cursor + 1) % self.capacity;
            Some(evicted)
        }
    }

    /// # Summary
    /// 原地替换最新插入的元素。
    ///
    /// # Returns
    /// 缓冲区为空时不做任何修改并返回 false。
    pub fn replace_last(&mut self, item: T) -> bool {
        match self.last_index() {
            Some(idx) => {
                self.data[idx] = item;
                true
            }
            None => false,
        }
    }

    /// 获取最新插入元素的引用
    pub fn last(&self) -> Option<&T> {
        self.last_index().and_then(|idx| self.data.get(idx))
    }

    /// 当前元素个数
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// # Summary
    /// 按插入顺序（旧 -> 新）遍历元素。
    ///
    /// # Logic
    /// 已满时从 cursor 切开，先产出 `[cursor..]` 再产出 `[..cursor]`。
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (newer, older) = self.data.split_at(self.cursor);
        older.iter().chain(newer.iter())
    }

    /// 获取按插入顺序排序的完整数据列表
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    fn last_index(&self) -> Option<usize> {
        if self.data.is_empty() {
            None
        } else if self.data.len() < self.capacity {
            Some(self.data.len() - 1)
        } else if self.cursor == 0 {
            Some(self.capacity - 1)
        } else {
            Some(self.cursor - 1)
        }
    }
}
