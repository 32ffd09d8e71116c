use std::time::Duration;

/// Which register the `SHR`/`SHL` instructions shift.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShiftQuirk {
    /// Shift `Vx` in place, ignoring `Vy`.
    InPlace,
    /// COSMAC VIP behaviour: shift `Vy` and store the result in `Vx`.
    Vip,
}

/// How the delay and sound timers count down.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerMode {
    /// Both timers drop by one after every executed instruction.
    PerCycle,
    /// Both timers drop at 60 Hz of wall-clock time, independent of the
    /// instruction rate.
    Realtime,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Time between two consecutive cycles.
    pub cycle_interval: Duration,
    pub shift: ShiftQuirk,
    pub timers: TimerMode,
    /// Seed for `RND`. Seeded from the OS when absent.
    pub rng_seed: Option<u64>,
}

impl Config {
    pub fn with_cycles_per_second(cycles_per_second: u32) -> Config {
        Config {
            cycle_interval: Duration::from_secs(1) / cycles_per_second.max(1),
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            cycle_interval: Duration::from_millis(2),
            shift: ShiftQuirk::InPlace,
            timers: TimerMode::PerCycle,
            rng_seed: None,
        }
    }
}
