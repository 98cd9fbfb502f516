/// Bounded free list. Released items past `capacity` are dropped.
#[derive(Debug)]
pub(crate) struct NodePool<T> {
    free: Vec<T>,
    capacity: usize,
}

impl<T: Default> NodePool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::new(),
            capacity,
        }
    }

    /// Returns a recycled item, or a fresh default one. Recycled items keep
    /// their old contents; callers overwrite every field.
    pub fn acquire(&mut self) -> T {
        self.free.pop().unwrap_or_default()
    }

    pub fn release(&mut self, item: T) {
        if self.free.len() < self.capacity {
            self.free.push(item);
        }
    }

    pub fn release_all(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.release(item);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.free.len()
    }
}
