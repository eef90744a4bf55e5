use super::Result;

pub enum Step {
    Cont,
    Done,
}

/// Calls `f` once per frame until it reports `Done` or fails.
pub fn start_loop<F>(mut f: F) -> Result<u64>
where
    F: FnMut() -> Result<Step>,
{
    let mut frames = 0;
    loop {
        match f()? {
            Step::Cont => frames += 1,
            Step::Done => return Ok(frames),
        }
    }
}
