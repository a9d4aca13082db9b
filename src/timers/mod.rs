//! Wall clock timing of the main solver phases.

use std::collections::HashMap;
use std::time::Duration;

/// Accumulated wall clock time per named solver phase.
#[derive(Default, Debug, Clone)]
pub struct Timers {
    totals: HashMap<&'static str, Duration>,
}

impl Timers {
    pub fn reset(&mut self) {
        self.totals.clear();
    }

    pub fn accumulate(&mut self, key: &'static str, elapsed: Duration) {
        *self.totals.entry(key).or_default() += elapsed;
    }

    /// Total time recorded under `key`, or zero if never timed.
    pub fn elapsed(&self, key: &'static str) -> Duration {
        self.totals.get(key).copied().unwrap_or_default()
    }
}

// time the enclosed block, adding the elapsed time
// to the named total
macro_rules! timeit {
    ($timer:ident => $key:literal; $($tt:tt)+) => {
        let __timeit_start = std::time::Instant::now();
        $(
            $tt
        )+
        $timer.accumulate($key, __timeit_start.elapsed());
    }
}
pub(crate) use timeit;

#[test]
fn test_timeit() {
    let mut timers = Timers::default();
    let mut x = 0;
    timeit! {timers => "loop"; {
        for i in 0..10 { x += i; }
    }}
    timeit! {timers => "loop"; {
        x += 1;
    }}
    assert_eq!(x, 46);
    assert!(timers.elapsed("loop") >= Duration::ZERO);
    assert_eq!(timers.elapsed("missing"), Duration::ZERO);
    timers.reset();
    assert_eq!(timers.elapsed("loop"), Duration::ZERO);
}
