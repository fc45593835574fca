//! Growable circular FIFO queue.

const MIN_CAPACITY: usize = 2;

/// FIFO of pending work over a ring buffer.
///
/// The buffer doubles when a push would make the write cursor catch up with
/// the read cursor. Popped slots are emptied so the queue never keeps a
/// dequeued element alive.
#[derive(Debug, Clone)]
pub struct TraversalQueue<T> {
    buf: Vec<Option<T>>,
    read: usize,
    write: usize,
}

impl<T> TraversalQueue<T> {
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        let mut buf = Vec::with_capacity(capacity);
        buf.resize_with(capacity, || None);
        Self {
            buf,
            read: 0,
            write: 0,
        }
    }

    pub fn push(&mut self, item: T) {
        if (self.write + 1) % self.buf.len() == self.read {
            self.grow();
        }
        self.buf[self.write] = Some(item);
        self.write = (self.write + 1) % self.buf.len();
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.buf[self.read].take();
        self.read = (self.read + 1) % self.buf.len();
        item
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    pub fn len(&self) -> usize {
        if self.write >= self.read {
            self.write - self.read
        } else {
            self.buf.len() - self.read + self.write
        }
    }

    /// Drop every pending element, keeping the allocated buffer.
    pub fn clear(&mut self) {
        self.buf.iter_mut().for_each(|slot| *slot = None);
        self.read = 0;
        self.write = 0;
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Double the buffer, moving live elements to the front.
    fn grow(&mut self) {
        let old_len = self.len();
        let new_capacity = self.buf.len() * 2;
        let mut new_buf = Vec::with_capacity(new_capacity);
        while let Some(item) = self.pop() {
            new_buf.push(Some(item));
        }
        new_buf.resize_with(new_capacity, || None);
        self.buf = new_buf;
        self.read = 0;
        self.write = old_len;
    }
}

impl<T> Default for TraversalQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
