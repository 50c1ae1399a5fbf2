//! Fixed-capacity FIFO ring buffer used to stage readings.

use tracing::debug;

use crate::error::{Error, Result};

/// Bounded circular queue.
///
/// `front` is the slot of the oldest element and `rear` the slot the next
/// element is written to. Both wrap modulo the capacity; `len` tells a full
/// buffer from an empty one when the two indices coincide.
#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    slots: Vec<Option<T>>,
    front: usize,
    rear: usize,
    len: usize,
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` elements.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity {
                component: "queue",
                capacity,
            });
        }

        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        debug!(capacity, "queue initialized");

        Ok(Self {
            slots,
            front: 0,
            rear: 0,
            len: 0,
        })
    }

    /// Append an element at the rear.
    ///
    /// Fails with [`Error::Full`] and leaves the queue untouched when at capacity.
    pub fn enqueue(&mut self, item: T) -> Result<()> {
        if self.is_full() {
            return Err(Error::Full {
                capacity: self.capacity(),
            });
        }

        self.slots[self.rear] = Some(item);
        self.rear = (self.rear + 1) % self.capacity();
        self.len += 1;
        Ok(())
    }

    /// Remove the element at the front.
    pub fn dequeue(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::Empty);
        }

        let item = self.slots[self.front].take().ok_or(Error::Empty)?;
        self.front = (self.front + 1) % self.capacity();
        self.len -= 1;
        Ok(item)
    }

    /// Oldest element, if any.
    pub fn peek(&self) -> Option<&T> {
        self.slots[self.front].as_ref().filter(|_| !self.is_empty())
    }

    /// Iterate from front to rear.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |i| self.slots[(self.front + i) % self.capacity()].as_ref())
    }

    /// Drop all elements and rewind both indices.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.front = 0;
        self.rear = 0;
        self.len = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            BoundedQueue::<u32>::new(0).unwrap_err(),
            Error::InvalidCapacity {
                component: "queue",
                capacity: 0
            }
        );
    }

    #[test]
    fn test_enqueue_then_dequeue() {
        let mut queue = BoundedQueue::new(3).unwrap();
        assert!(queue.is_empty());
        queue.enqueue(7).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.dequeue(), Ok(7));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = BoundedQueue::new(4).unwrap();
        for i in 0..4 {
            queue.enqueue(i).unwrap();
        }
        let drained: Vec<_> = std::iter::from_fn(|| queue.dequeue().ok()).collect();
        assert_eq!(drained, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_full_leaves_state_unchanged() {
        let mut queue = BoundedQueue::new(2).unwrap();
        queue.enqueue('a').unwrap();
        queue.enqueue('b').unwrap();
        assert!(queue.is_full());

        assert_eq!(queue.enqueue('c'), Err(Error::Full { capacity: 2 }));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec!['a', 'b']);
    }

    #[test]
    fn test_empty_dequeue_fails() {
        let mut queue = BoundedQueue::<u8>::new(2).unwrap();
        assert_eq!(queue.dequeue(), Err(Error::Empty));
        assert_eq!(queue.len(), 0);
        assert!(queue.peek().is_none());
    }

    #[test]
    fn test_wraps_around() {
        let mut queue = BoundedQueue::new(3).unwrap();
        for round in 0..5 {
            queue.enqueue(round * 10).unwrap();
            queue.enqueue(round * 10 + 1).unwrap();
            assert_eq!(queue.peek(), Some(&(round * 10)));
            assert_eq!(queue.dequeue(), Ok(round * 10));
            assert_eq!(queue.dequeue(), Ok(round * 10 + 1));
        }

        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();
        queue.enqueue(3).unwrap();
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_size_stays_bounded() {
        let mut queue = BoundedQueue::new(3).unwrap();
        // Pseudo-random mix of enqueue and dequeue calls
        for step in 0u32..200 {
            if (step * 7) % 5 < 3 {
                let _ = queue.enqueue(step);
            } else {
                let _ = queue.dequeue();
            }
            assert!(queue.len() <= queue.capacity());
        }
    }

    #[test]
    fn test_fill_and_drain_returns_everything() {
        let mut queue = BoundedQueue::new(5).unwrap();
        for i in 0..5 {
            queue.enqueue(i).unwrap();
        }
        let mut drained: Vec<_> = std::iter::from_fn(|| queue.dequeue().ok()).collect();
        drained.sort();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_clear() {
        let mut queue = BoundedQueue::new(2).unwrap();
        queue.enqueue(1).unwrap();
        queue.clear();
        assert!(queue.is_empty());
        queue.enqueue(2).unwrap();
        queue.enqueue(3).unwrap();
        assert_eq!(queue.dequeue(), Ok(2));
    }
}
