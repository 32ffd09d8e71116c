use std::{thread, time};

use super::Result;

pub enum Step {
    Cont,
    Done,
}

/// Calls `f` roughly every 16 ms until it reports `Step::Done` or fails.
pub fn start_loop<F>(mut f: F) -> Result<()>
where
    F: FnMut() -> Result<Step>,
{
    let frame_interval = time::Duration::from_millis(16);
    loop {
        let frame_start = time::Instant::now();

        match f()? {
            Step::Cont => {
                if let Some(delay) = frame_interval.checked_sub(frame_start.elapsed()) {
                    thread::sleep(delay)
                }
            }
            Step::Done => return Ok(()),
        }
    }
}
