use std::sync::atomic::{AtomicU8, AtomicU16, AtomicU32, AtomicU64, AtomicUsize, Ordering};

macro_rules! define_counter {
    ($counter_name:ident, $atomic_type:ident, $base_type:ty) => {
        #[derive(Debug)]
        pub struct $counter_name($atomic_type);

        impl $counter_name {
            pub const fn new() -> Self {
                Self::with_start(1)
            }

            /// Allocator whose first handed-out value is `start`.
            pub const fn with_start(start: $base_type) -> Self {
                $counter_name($atomic_type::new(start))
            }

            pub fn increment(&self) -> $base_type {
                self.0.fetch_add(1, Ordering::Relaxed) as $base_type
            }
        }
        impl Default for $counter_name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_counter!(CounterU8, AtomicU8, u8);
define_counter!(CounterU16, AtomicU16, u16);
define_counter!(CounterU32, AtomicU32, u32);
define_counter!(CounterU64, AtomicU64, u64);
define_counter!(CounterUsize, AtomicUsize, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_is_one_by_default() {
        let counter = CounterU32::new();
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
    }

    #[test]
    fn seeded_counter_starts_at_seed() {
        let counter = CounterU32::with_start(0x0001_0000);
        assert_eq!(counter.increment(), 0x0001_0000);
        assert_eq!(counter.increment(), 0x0001_0001);
    }
}
