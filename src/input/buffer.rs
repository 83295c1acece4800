use std::collections::VecDeque;

/// Ёмкость очередей событий по умолчанию
pub const DEFAULT_CAPACITY: usize = 16;

/// Верхняя граница ёмкости, принимаемая конфигурацией
pub const MAX_QUEUE_CAPACITY: usize = 4096;

/// Ограниченная FIFO-очередь: при переполнении вытесняются самые старые записи
#[derive(Debug, Clone)]
pub struct EventBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> EventBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity.saturating_add(1).min(DEFAULT_CAPACITY + 1)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Добавить запись и обрезать очередь до ёмкости.
    /// Возвращает число вытесненных старых записей.
    pub fn push(&mut self, item: T) -> usize {
        self.items.push_back(item);
        self.trim()
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    fn trim(&mut self) -> usize {
        let mut evicted = 0;
        while self.items.len() > self.capacity {
            self.items.pop_front();
            evicted += 1;
        }
        evicted
    }
}

impl<T> Default for EventBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
