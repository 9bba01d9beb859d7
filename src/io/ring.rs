//! Fixed-capacity circular byte store.
//!
//! A [`RingBuffer`] keeps a sliding window over the most recent bytes pushed
//! into it. Positions inside the window are virtual: `0` is the oldest
//! retained byte and [`RingBuffer::len`] is one past the newest. The cursor
//! always satisfies `0 <= cursor <= len <= capacity`.

#[derive(Debug, Clone)]
pub struct RingBuffer {
    data: Box<[u8]>,
    /// Physical index of the oldest retained byte.
    head: usize,
    len: usize,
    cursor: usize,
}

impl RingBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity].into_boxed_slice(),
            head: 0,
            len: 0,
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of bytes currently retained (the high-water mark of the window).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Bytes between the cursor and the end of the window.
    pub fn available(&self) -> usize {
        self.len - self.cursor
    }

    /// Moves the cursor by `offset`, clamped to `[0, len]`.
    pub fn seek(&mut self, offset: isize) {
        let target = if offset.is_negative() {
            self.cursor.saturating_sub(offset.unsigned_abs())
        } else {
            self.cursor.saturating_add(offset as usize)
        };
        self.cursor = target.min(self.len);
    }

    /// Copies bytes from the cursor into `dst` and advances the cursor.
    ///
    /// Returns how many bytes were copied, at most [`RingBuffer::available`].
    pub fn read_into(&mut self, dst: &mut [u8]) -> usize {
        let count = dst.len().min(self.available());
        if count == 0 {
            return 0;
        }

        let capacity = self.capacity();
        let start = (self.head + self.cursor) % capacity;
        let first = count.min(capacity - start);
        dst[..first].copy_from_slice(&self.data[start..start + first]);
        dst[first..count].copy_from_slice(&self.data[..count - first]);

        self.cursor += count;
        count
    }

    /// Appends `bytes` at the end of the window, evicting the oldest bytes
    /// once capacity is exceeded. The cursor moves to the new end.
    pub fn push(&mut self, bytes: &[u8]) {
        let capacity = self.capacity();
        if capacity == 0 {
            return;
        }
        if bytes.is_empty() {
            self.cursor = self.len;
            return;
        }

        if bytes.len() >= capacity {
            self.data.copy_from_slice(&bytes[bytes.len() - capacity..]);
            self.head = 0;
            self.len = capacity;
            self.cursor = capacity;
            return;
        }

        let overflow = (self.len + bytes.len()).saturating_sub(capacity);
        self.head = (self.head + overflow) % capacity;
        self.len -= overflow;

        let tail = (self.head + self.len) % capacity;
        let first = bytes.len().min(capacity - tail);
        self.data[tail..tail + first].copy_from_slice(&bytes[..first]);
        self.data[..bytes.len() - first].copy_from_slice(&bytes[first..]);

        self.len += bytes.len();
        self.cursor = self.len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_invariants(ring: &RingBuffer) {
        assert!(ring.cursor() <= ring.len());
        assert!(ring.len() <= ring.capacity());
    }

    #[test]
    fn push_then_rewind_replays_bytes() {
        let mut ring = RingBuffer::with_capacity(8);
        ring.push(b"abcde");
        ring.seek(-3);

        let mut out = [0u8; 3];
        assert_eq!(ring.read_into(&mut out), 3);
        assert_eq!(&out, b"cde");
        assert_eq!(ring.available(), 0);
    }

    #[test]
    fn evicts_oldest_bytes_first() {
        let mut ring = RingBuffer::with_capacity(4);
        ring.push(b"abc");
        ring.push(b"def");
        assert_eq!(ring.len(), 4);

        ring.seek(-100);
        assert_eq!(ring.cursor(), 0);

        let mut out = [0u8; 4];
        assert_eq!(ring.read_into(&mut out), 4);
        assert_eq!(&out, b"cdef");
    }

    #[test]
    fn oversized_push_keeps_tail() {
        let mut ring = RingBuffer::with_capacity(4);
        ring.push(b"x");
        ring.push(b"0123456789");
        ring.seek(-4);

        let mut out = [0u8; 8];
        assert_eq!(ring.read_into(&mut out), 4);
        assert_eq!(&out[..4], b"6789");
    }

    #[test]
    fn seek_clamps_to_window() {
        let mut ring = RingBuffer::with_capacity(4);
        ring.push(b"ab");
        ring.seek(10);
        assert_eq!(ring.cursor(), 2);
        ring.seek(-10);
        assert_eq!(ring.cursor(), 0);
        ring.seek(1);
        assert_eq!(ring.cursor(), 1);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut ring = RingBuffer::with_capacity(0);
        ring.push(b"abc");
        ring.seek(-3);
        assert!(ring.is_empty());
        assert_eq!(ring.read_into(&mut [0u8; 3]), 0);
    }

    #[test]
    fn randomized_operations_match_model() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for capacity in [1usize, 7, 16, 1024] {
            let mut ring = RingBuffer::with_capacity(capacity);
            // Model: every byte ever pushed plus a cursor into that history.
            let mut history: Vec<u8> = Vec::new();
            let mut position = 0usize;

            for _ in 0..2_000 {
                match rng.gen_range(0..3) {
                    0 => {
                        let count = rng.gen_range(0..capacity * 2 + 1);
                        let bytes: Vec<u8> = (0..count).map(|_| rng.r#gen()).collect();
                        ring.push(&bytes);
                        history.extend_from_slice(&bytes);
                        position = history.len();
                    }
                    1 => {
                        let offset = rng.gen_range(-(capacity as isize) * 2..=capacity as isize * 2);
                        ring.seek(offset);
                        let oldest = history.len() - ring.len();
                        let target = (position as isize + offset)
                            .clamp(oldest as isize, history.len() as isize);
                        position = target as usize;
                    }
                    _ => {
                        let mut out = vec![0u8; rng.gen_range(0..capacity + 2)];
                        let n = ring.read_into(&mut out);
                        let expected_len = out.len().min(history.len() - position);
                        assert_eq!(n, expected_len);
                        assert_eq!(&out[..n], &history[position..position + n]);
                        position += n;
                    }
                }

                assert_invariants(&ring);
                assert_eq!(history.len() - ring.len() + ring.cursor(), position);
            }
        }
    }
}
