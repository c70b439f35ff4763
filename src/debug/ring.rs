/// Fixed-capacity circular buffer. Allocated once, overwrites the oldest entry.
pub struct RingBuffer<T> {
    buf: Vec<T>,
    capacity: usize,
    head: usize,
    len: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// `capacity` is raised to 1 so `push` never divides by zero.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: vec![T::default(); capacity],
            capacity,
            head: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, value: T) {
        self.buf[self.head] = value;
        self.head = (self.head + 1) % self.capacity;
        self.len = (self.len + 1).min(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let start = if self.len < self.capacity { 0 } else { self.head };
        let cap = self.capacity;
        (0..self.len).map(move |i| &self.buf[(start + i) % cap])
    }
}

impl RingBuffer<f64> {
    /// (min, mean, max) over the stored samples.
    pub fn stats(&self) -> Option<(f64, f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let mut sum = 0.0;
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for &v in self.iter() {
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        Some((min, sum / self.len as f64, max))
    }
}
