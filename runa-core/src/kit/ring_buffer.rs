use std::fmt;
use thiserror::Error;

/// 环形缓冲区可能产生的错误类型
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RingBufferError {
    /// 缓冲区已满，拒绝写入
    #[error("Cannot push to full ring buffer (capacity {0})")]
    BufferFull(usize),

    /// 容量为零的缓冲区无法使用
    #[error("Ring buffer capacity must be non-zero")]
    ZeroCapacity,
}

/// 固定容量的单线程环形缓冲区
///
/// 机器内部的令牌队列：发射与取出是两个独立操作，
/// 但不需要跨线程，所以没有锁。
pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    head: usize, // 读取指针
    tail: usize, // 写入指针
    size: usize, // 当前数据量
}

impl<T> RingBuffer<T> {
    /// 创建新的环形缓冲区
    pub fn new(capacity: usize) -> Result<Self, RingBufferError> {
        if capacity == 0 {
            return Err(RingBufferError::ZeroCapacity);
        }
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Ok(Self {
            slots,
            head: 0,
            tail: 0,
            size: 0,
        })
    }

    /// 写入数据，满时返回错误（不覆盖旧数据）
    pub fn push(&mut self, item: T) -> Result<(), RingBufferError> {
        if self.is_full() {
            return Err(RingBufferError::BufferFull(self.capacity()));
        }
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.capacity();
        self.size += 1;
        Ok(())
    }

    /// 取出最早写入的数据，空时返回 None
    pub fn pop(&mut self) -> Option<T> {
        if self.size == 0 {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.size -= 1;
        item
    }

    /// 观察头部数据
    pub fn peek(&self) -> Option<&T> {
        self.peek_k(0)
    }

    /// 观察第 k 个数据（0 为头部）
    pub fn peek_k(&self, k: usize) -> Option<&T> {
        if k >= self.size {
            return None;
        }
        self.slots[(self.head + k) % self.capacity()].as_ref()
    }

    /// 丢弃全部数据
    pub fn clear(&mut self) {
        while self.pop().is_some() {}
        self.head = 0;
        self.tail = 0;
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_full(&self) -> bool {
        self.size == self.capacity()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<&T> = (0..self.size).filter_map(|k| self.peek_k(k)).collect();
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("items", &items)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut rb = RingBuffer::new(3).unwrap();

        assert_eq!(rb.capacity(), 3);
        assert_eq!(rb.len(), 0);
        assert!(rb.is_empty());
        assert!(!rb.is_full());

        assert!(rb.push(1).is_ok());
        assert!(rb.push(2).is_ok());
        assert!(rb.push(3).is_ok());
        assert!(rb.is_full());
        assert_eq!(rb.push(4), Err(RingBufferError::BufferFull(3)));

        assert_eq!(rb.peek(), Some(&1));
        assert_eq!(rb.peek_k(2), Some(&3));
        assert_eq!(rb.peek_k(3), None);

        assert_eq!(rb.pop(), Some(1));
        assert_eq!(rb.pop(), Some(2));
        assert_eq!(rb.pop(), Some(3));
        assert_eq!(rb.pop(), None);
        assert!(rb.is_empty());
    }

    #[test]
    fn test_wraparound() {
        let mut rb = RingBuffer::new(2).unwrap();

        rb.push("a").unwrap();
        assert_eq!(rb.pop(), Some("a"));
        rb.push("b").unwrap();
        rb.push("c").unwrap();
        assert_eq!(rb.pop(), Some("b"));
        rb.push("d").unwrap();
        assert_eq!(rb.pop(), Some("c"));
        assert_eq!(rb.pop(), Some("d"));
        assert!(rb.pop().is_none());
    }

    #[test]
    fn test_clear() {
        let mut rb = RingBuffer::new(2).unwrap();
        rb.push(String::from("x")).unwrap();
        rb.push(String::from("y")).unwrap();
        rb.clear();

        assert!(rb.is_empty());
        assert!(rb.push(String::from("z")).is_ok());
        assert_eq!(rb.pop().as_deref(), Some("z"));
    }

    #[test]
    fn test_zero_capacity() {
        assert_eq!(
            RingBuffer::<u8>::new(0).err(),
            Some(RingBufferError::ZeroCapacity)
        );
    }
}
