use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{Config, TimerMode};
use crate::snapshot::Snapshot;
use crate::vm::{Cycle, Vm};
use crate::{ErrorKind, Result, ResultExt};

/// Receives a snapshot at the end of every executed cycle, on the
/// interpreter thread.
pub type Observer = Box<dyn FnMut(&Snapshot) + Send>;

const TIMER_TICK_DURATION: f64 = 1.0 / 60.0;

struct Shared {
    vm: Mutex<Vm>,
    running: AtomicBool,
    last_snapshot: Mutex<Option<Snapshot>>,
}

/// Runs a `Vm` on its own thread at a fixed cadence.
///
/// Key events are applied to the machine as soon as they arrive. Dropping a
/// running interpreter stops it.
pub struct Interpreter {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<Result<()>>>,
}

impl Interpreter {
    /// Loads `program` and starts executing it. Loading errors are returned
    /// here; errors raised while running are returned by `stop` or `wait`.
    pub fn start(
        program: &[u8],
        config: Config,
        observer: Option<Observer>,
    ) -> Result<Interpreter> {
        let mut vm = Vm::with_config(&config);
        vm.load(program)?;

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let shared = Arc::new(Shared {
            vm: Mutex::new(vm),
            running: AtomicBool::new(true),
            last_snapshot: Mutex::new(None),
        });

        info!(
            "starting {} byte program, cycle every {:?}",
            program.len(),
            config.cycle_interval
        );

        let worker = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("chip8".to_string())
                .spawn(move || {
                    let result = run_loop(&shared, &config, rng, observer);
                    shared.running.store(false, Ordering::SeqCst);
                    if let Err(ref e) = result {
                        error!("interpreter halted: {}", e);
                    }
                    result
                })
                .chain_err(|| "failed to spawn interpreter thread")?
        };

        Ok(Interpreter {
            shared,
            worker: Some(worker),
        })
    }

    pub fn press(&self, key: u8) {
        if self.is_running() {
            lock(&self.shared.vm).press(key);
            self.wake();
        }
    }

    pub fn release(&self, key: u8) {
        if self.is_running() {
            lock(&self.shared.vm).release(key);
        }
    }

    /// False once `stop` was called or the program hit a fatal error.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// The snapshot published by the last executed cycle. Still available
    /// after the interpreter stopped.
    pub fn snapshot(&self) -> Option<Snapshot> {
        lock(&self.shared.last_snapshot).clone()
    }

    /// Halts the loop and waits for the interpreter thread to exit. Returns
    /// the error that stopped the program, if any.
    pub fn stop(&mut self) -> Result<()> {
        if self.worker.is_some() {
            info!("stopping interpreter");
        }
        self.shared.running.store(false, Ordering::SeqCst);
        self.wake();
        self.join()
    }

    /// Blocks until the program stops on its own, which only happens on a
    /// fatal error.
    pub fn wait(&mut self) -> Result<()> {
        self.join()
    }

    fn join(&mut self) -> Result<()> {
        match self.worker.take() {
            Some(worker) => match worker.join() {
                Ok(result) => result,
                Err(_) => bail!(ErrorKind::WorkerPanicked),
            },
            None => Ok(()),
        }
    }

    fn wake(&self) {
        if let Some(ref worker) = self.worker {
            worker.thread().unpark();
        }
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("interpreter stopped with error: {}", e);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn run_loop(
    shared: &Shared,
    config: &Config,
    mut rng: StdRng,
    mut observer: Option<Observer>,
) -> Result<()> {
    let mut last_timer_update = Instant::now();
    let mut passed_dt = 0f64;

    loop {
        let cycle_start = Instant::now();

        let snapshot = {
            let mut vm = lock(&shared.vm);
            // Checked under the lock so nothing changes after `stop`.
            if !shared.running.load(Ordering::SeqCst) {
                return Ok(());
            }

            if config.timers == TimerMode::Realtime {
                passed_dt += last_timer_update.elapsed().as_secs_f64();
                last_timer_update = Instant::now();

                let ticks_passed = (passed_dt / TIMER_TICK_DURATION) as u32;
                if ticks_passed > 0 {
                    passed_dt -= ticks_passed as f64 * TIMER_TICK_DURATION;
                    vm.update_timers(ticks_passed.min(u8::MAX as u32) as u8);
                }
            }

            match vm.cycle(&mut rng)? {
                Cycle::Executed => Some(vm.snapshot()),
                Cycle::Suspended => None,
            }
        };

        match snapshot {
            Some(snapshot) => {
                *lock(&shared.last_snapshot) = Some(snapshot.clone());
                if let Some(ref mut observer) = observer {
                    observer(&snapshot);
                }
            }
            None => {
                // Woken early by a key press or `stop`.
                thread::park_timeout(config.cycle_interval);
                continue;
            }
        }

        let deadline = cycle_start + config.cycle_interval;
        while shared.running.load(Ordering::SeqCst) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::park_timeout(deadline - now);
        }
    }
}
