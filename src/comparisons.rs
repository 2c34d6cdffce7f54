//! Cross-checks and latency comparisons against a linear-rescan registry.



#[cfg(test)]
mod latency {
    use hdrhistogram::Histogram;
    use std::time::Instant;

    use super::linear::LinearSet;
    use crate::{CappedSet, Registry};

    const WARMUP: u64 = 100_000;
    const ITERATIONS: u64 = 1_000_000;

    fn print_histogram(name: &str, hist: &Histogram<u64>) {
        println!("\n=== {} ===", name);
        println!("  count:  {}", hist.len());
        println!("  min:    {} ns", hist.min());
        println!("  max:    {} ns", hist.max());
        println!("  mean:   {:.1} ns", hist.mean());
        println!("  stddev: {:.1} ns", hist.stdev());
        println!("  p50:    {} ns", hist.value_at_quantile(0.50));
        println!("  p90:    {} ns", hist.value_at_quantile(0.90));
        println!("  p99:    {} ns", hist.value_at_quantile(0.99));
        println!("  p99.9:  {} ns", hist.value_at_quantile(0.999));
        println!("  p99.99: {} ns", hist.value_at_quantile(0.9999));
    }

    fn score_for(i: u64) -> u64 {
        i.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 40
    }

    /// Full registry, every insert evicts.
    fn evicting_insert<R: Registry<u64, u64>>(registry: &mut R, capacity: u64, hist: &mut Histogram<u64>) {
        for key in 0..capacity {
            registry.insert(key, score_for(key)).unwrap();
        }

        for key in capacity..capacity + WARMUP {
            registry.insert(key, score_for(key)).unwrap();
        }

        for key in capacity + WARMUP..capacity + WARMUP + ITERATIONS {
            let start = Instant::now();
            let evicted = registry.insert(key, score_for(key)).unwrap();
            let elapsed = start.elapsed().as_nanos() as u64;

            hist.record(elapsed).unwrap();
            assert!(evicted.is_some());
        }
    }

    /// Update whichever key is lowest, forcing the minimum to move.
    fn update_lowest<R: Registry<u64, u64>>(registry: &mut R, capacity: u64, hist: &mut Histogram<u64>) {
        for key in 0..capacity {
            registry.insert(key, score_for(key)).unwrap();
        }

        for i in 0..WARMUP + ITERATIONS {
            let key = *registry.lowest_key().unwrap();
            let score = registry.lowest_score() + score_for(i) % 1_000 + 1;

            let start = Instant::now();
            registry.update(&key, score).unwrap();
            let elapsed = start.elapsed().as_nanos() as u64;

            if i >= WARMUP {
                hist.record(elapsed).unwrap();
            }
        }
    }

    // ==================== Evicting Insert ====================

    #[test]
    #[ignore]
    fn hdr_evicting_insert_capped_set() {
        for capacity in [8u64, 64, 512] {
            let mut set: CappedSet<u64, u64> = CappedSet::with_capacity(capacity as usize);
            let mut hist = Histogram::<u64>::new(3).unwrap();
            evicting_insert(&mut set, capacity, &mut hist);
            print_histogram(&format!("CappedSet evicting insert (K={capacity})"), &hist);
        }
    }

    #[test]
    #[ignore]
    fn hdr_evicting_insert_linear() {
        for capacity in [8u64, 64, 512] {
            let mut set: LinearSet<u64, u64> = LinearSet::with_capacity(capacity as usize);
            let mut hist = Histogram::<u64>::new(3).unwrap();
            evicting_insert(&mut set, capacity, &mut hist);
            print_histogram(&format!("LinearSet evicting insert (K={capacity})"), &hist);
        }
    }

    // ==================== Update Lowest ====================

    #[test]
    #[ignore]
    fn hdr_update_lowest_capped_set() {
        for capacity in [8u64, 64, 512] {
            let mut set: CappedSet<u64, u64> = CappedSet::with_capacity(capacity as usize);
            let mut hist = Histogram::<u64>::new(3).unwrap();
            update_lowest(&mut set, capacity, &mut hist);
            print_histogram(&format!("CappedSet update lowest (K={capacity})"), &hist);
        }
    }

    #[test]
    #[ignore]
    fn hdr_update_lowest_linear() {
        for capacity in [8u64, 64, 512] {
            let mut set: LinearSet<u64, u64> = LinearSet::with_capacity(capacity as usize);
            let mut hist = Histogram::<u64>::new(3).unwrap();
            update_lowest(&mut set, capacity, &mut hist);
            print_histogram(&format!("LinearSet update lowest (K={capacity})"), &hist);
        }
    }
}
