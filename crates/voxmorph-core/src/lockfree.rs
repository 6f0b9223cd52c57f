//! Lock-free primitives for real-time parameter exchange.

use atomic_float::AtomicF32;
use core::sync::atomic::Ordering;

/// Cache-line aligned atomic f32.
///
/// One writer thread (usually the UI) and one reader thread (the audio
/// callback) may touch the cell concurrently; both sides are wait-free.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFloat {
    value: AtomicF32,
}

impl AtomicFloat {
    pub fn new(value: f32) -> Self {
        Self {
            value: AtomicF32::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn get_relaxed(&self) -> f32 {
        self.value.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.value.store(value, Ordering::Release);
    }

    #[inline]
    pub fn swap(&self, value: f32) -> f32 {
        self.value.swap(value, Ordering::AcqRel)
    }
}

impl Clone for AtomicFloat {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl Default for AtomicFloat {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_float() {
        let val = AtomicFloat::new(440.0);
        assert_eq!(val.get(), 440.0);
        val.set(880.0);
        assert_eq!(val.get(), 880.0);
        assert_eq!(val.swap(220.0), 880.0);
        assert_eq!(val.get_relaxed(), 220.0);
    }
}
