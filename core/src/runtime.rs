use rayon::ThreadPoolBuilder;
use std::env;
use std::sync::OnceLock;

/// Environment override for the worker thread count.
pub const THREADS_ENV: &str = "PANO_CPU_THREADS";

static POOL_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Configure the global rayon pool used by the pixel-parallel routines.
///
/// The count is taken from `num_threads` if given, else from the
/// `PANO_CPU_THREADS` environment variable, else left to rayon. Only the
/// first call builds the pool; every later call returns the stored outcome.
pub fn init_global_thread_pool(num_threads: Option<usize>) -> Result<(), String> {
    POOL_INIT.get_or_init(|| build_pool(num_threads)).clone()
}

/// Number of worker threads the pool currently runs.
pub fn current_thread_count() -> usize {
    rayon::current_num_threads()
}

fn build_pool(requested: Option<usize>) -> Result<(), String> {
    let count = match requested {
        Some(n) => Some(n),
        None => env_thread_count()?,
    };
    if count == Some(0) {
        return Err("thread count must be at least 1".to_string());
    }

    let mut builder = ThreadPoolBuilder::new();
    if let Some(n) = count {
        builder = builder.num_threads(n);
    }
    builder.build_global().map_err(|e| e.to_string())
}

fn env_thread_count() -> Result<Option<usize>, String> {
    match env::var(THREADS_ENV) {
        Ok(raw) => raw
            .parse::<usize>()
            .map(Some)
            .map_err(|_| format!("{THREADS_ENV} must be a positive integer, got '{raw}'")),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(format!("{THREADS_ENV} could not be read: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let first = init_global_thread_pool(None);
        let second = init_global_thread_pool(Some(2));
        assert_eq!(first, second);
        assert!(current_thread_count() >= 1);
    }
}
