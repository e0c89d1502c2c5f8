/// Value that lives on the CPU until the GPU state behind it exists.
///
/// - `Pending`: reads and writes touch the buffered value only.
/// - `Live`: reads and writes go straight to GPU state through the accessors
///   supplied by the caller.
///
/// The switch happens once, in [`go_live`](Self::go_live), which flushes a
/// buffered write if there was one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CachedValue<T> {
    Pending {
        value: T,
        /// Set once a caller wrote the value; only written values are flushed.
        written: bool,
    },
    Live,
}

impl<T: Copy> CachedValue<T> {
    pub fn new(initial: T) -> Self {
        CachedValue::Pending { value: initial, written: false }
    }

    pub fn is_caching(&self) -> bool {
        matches!(self, CachedValue::Pending { .. })
    }

    pub fn get(&self, read_live: impl FnOnce() -> T) -> T {
        match *self {
            CachedValue::Pending { value, .. } => value,
            CachedValue::Live => read_live(),
        }
    }

    pub fn set(&mut self, new: T, write_live: impl FnOnce(T)) {
        match self {
            CachedValue::Pending { value, written } => {
                *value = new;
                *written = true;
            }
            CachedValue::Live => write_live(new),
        }
    }

    /// Switches to live mode; `flush` receives the buffered value if it was written.
    ///
    /// Does nothing when already live.
    pub fn go_live(&mut self, flush: impl FnOnce(T)) {
        if let CachedValue::Pending { value, written } = *self {
            if written {
                flush(value);
            }
            *self = CachedValue::Live;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_reads_and_writes_stay_local() {
        let mut v = CachedValue::new(1);
        v.set(5, |_| panic!("must not touch live state"));
        assert_eq!(v.get(|| panic!("must not touch live state")), 5);
        assert!(v.is_caching());
    }

    #[test]
    fn go_live_flushes_written_value_once() {
        let mut v = CachedValue::new(1);
        v.set(7, |_| unreachable!());

        let mut flushed = Vec::new();
        v.go_live(|x| flushed.push(x));
        v.go_live(|x| flushed.push(x));

        assert_eq!(flushed, vec![7]);
        assert!(!v.is_caching());
    }

    #[test]
    fn unwritten_value_is_not_flushed() {
        let mut v = CachedValue::new(1);
        let mut flushed = false;
        v.go_live(|_| flushed = true);
        assert!(!flushed);
    }

    #[test]
    fn live_mode_uses_accessors() {
        let mut v = CachedValue::new(0);
        v.go_live(|_| {});

        let mut gpu = 3;
        v.set(9, |x| gpu = x);
        assert_eq!(gpu, 9);
        assert_eq!(v.get(|| gpu), 9);
    }
}
