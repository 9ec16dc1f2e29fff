/// Monotonic handle sequence. Handles are never reused, so a stale handle can
/// never alias a newer grant or container.
#[derive(Debug, Clone)]
pub struct HandleSeq {
    next: u64,
}

impl HandleSeq {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate the next raw handle value.
    pub fn next_raw(&mut self) -> u64 {
        let raw = self.next;
        self.next += 1;
        raw
    }
}

impl Default for HandleSeq {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_monotonic_and_never_zero() {
        let mut seq = HandleSeq::new();
        let a = seq.next_raw();
        let b = seq.next_raw();
        assert_eq!(a, 1);
        assert!(b > a);
    }
}
