//! Polling acquisition of a cache entry lock

use super::{LockError, LockGuard};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// Delays between attempts: 10ms doubling up to 500ms
struct Backoff {
    next: Duration,
}

impl Backoff {
    const FIRST: Duration = Duration::from_millis(10);
    const CEILING: Duration = Duration::from_millis(500);

    fn new() -> Self {
        Self { next: Self::FIRST }
    }

    fn step(&mut self) -> Duration {
        let current = self.next;
        self.next = (current * 2).min(Self::CEILING);
        current
    }
}

/// How long a waiter stays quiet before logging who it is waiting for
const QUIET_WAIT: Duration = Duration::from_secs(2);

pub(crate) fn acquire(
    lock_path: &Path,
    timeout: Duration,
    description: &str,
) -> Result<LockGuard, LockError> {
    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent).map_err(LockError::io("create the directory of", lock_path))?;
    }

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .map_err(LockError::io("open", lock_path))?;

    let started = Instant::now();
    let mut announced = false;
    let mut backoff = Backoff::new();

    loop {
        match file.try_lock_exclusive() {
            Ok(()) => {
                record_holder(&mut file).map_err(LockError::io("write holder pid to", lock_path))?;
                tracing::debug!("acquired lock {} ({})", lock_path.display(), description);
                return Ok(LockGuard {
                    file,
                    path: lock_path.to_path_buf(),
                    since: Instant::now(),
                });
            }
            Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {}
            Err(e) => return Err(LockError::io("lock", lock_path)(e)),
        }

        let waited = started.elapsed();
        if waited >= timeout {
            return Err(LockError::Timeout {
                path: lock_path.to_path_buf(),
                description: description.to_string(),
                waited,
            });
        }
        if !announced && waited >= QUIET_WAIT {
            match read_holder(&mut file) {
                Some(pid) => tracing::info!(
                    "{} is being populated by process {}, waiting",
                    description,
                    pid
                ),
                None => tracing::info!("waiting for lock on {} ({})", lock_path.display(), description),
            }
            announced = true;
        }

        thread::sleep(backoff.step().min(timeout.saturating_sub(waited)));
    }
}

fn record_holder(file: &mut File) -> std::io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    write!(file, "{}", std::process::id())?;
    file.flush()
}

fn read_holder(file: &mut File) -> Option<u32> {
    let mut content = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut content).ok()?;
    content.trim().parse().ok()
}
