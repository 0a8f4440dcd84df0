/// Linear probe sequence: every index of `0..len` exactly once, starting at
/// `start` and wrapping from `len - 1` back to `0`.
pub(crate) struct CircularRange {
    len: usize,
    next: usize,
    remaining: usize,
}

impl CircularRange {
    pub fn new(len: usize, start: usize) -> Self {
        debug_assert!(start < len || len == 0);

        Self {
            len,
            next: start,
            remaining: len,
        }
    }
}

impl Iterator for CircularRange {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let r = self.next;
        self.remaining -= 1;
        self.next += 1;
        if self.next == self.len {
            self.next = 0;
        }
        Some(r)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for CircularRange {}
