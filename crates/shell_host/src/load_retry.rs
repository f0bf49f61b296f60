//! Bounded retry of the main window's initial navigation.
//!
//! The chain is fire-and-forget: it ends on the first successful navigation, after the retry
//! budget is spent, or when its [`CancelFlag`] is raised. Callers never see an error; every
//! failure is reported through the injected log function.

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

pub const DEFAULT_LOAD_RETRIES: u32 = 5;
pub const DEFAULT_LOAD_RETRY_DELAY: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_LOAD_RETRIES,
            delay: DEFAULT_LOAD_RETRY_DELAY,
        }
    }
}

pub trait Navigator {
    fn navigate(&self, url: &str) -> Result<(), String>;
}

impl<F> Navigator for F
where
    F: Fn(&str) -> Result<(), String>,
{
    fn navigate(&self, url: &str) -> Result<(), String> {
        self(url)
    }
}

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Pending { remaining: u32 },
    Loaded,
    Exhausted,
}

impl RetryState {
    pub fn new(max_retries: u32) -> Self {
        Self::Pending {
            remaining: max_retries,
        }
    }

    pub fn on_success(self) -> Self {
        match self {
            Self::Pending { .. } => Self::Loaded,
            terminal => terminal,
        }
    }

    pub fn on_failure(self) -> Self {
        match self {
            Self::Pending { remaining: 0 } => Self::Exhausted,
            Self::Pending { remaining } => Self::Pending {
                remaining: remaining - 1,
            },
            terminal => terminal,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { attempts: u32 },
    Exhausted { attempts: u32 },
    Cancelled { attempts: u32 },
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded { attempts } => write!(f, "loaded after {attempts} attempt(s)"),
            Self::Exhausted { attempts } => write!(f, "abandoned after {attempts} attempt(s)"),
            Self::Cancelled { attempts } => write!(f, "cancelled after {attempts} attempt(s)"),
        }
    }
}

pub struct LoadRetryController<N, S> {
    navigator: N,
    sleeper: S,
    policy: RetryPolicy,
    cancel: CancelFlag,
}

impl<N, S> LoadRetryController<N, S>
where
    N: Navigator,
    S: Sleeper,
{
    pub fn new(navigator: N, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            navigator,
            sleeper,
            policy,
            cancel: CancelFlag::default(),
        }
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn run<F>(&self, url: &str, log: F) -> LoadOutcome
    where
        F: Fn(&str),
    {
        let mut state = RetryState::new(self.policy.max_retries);
        let mut attempts = 0;

        loop {
            if self.cancel.is_cancelled() {
                log(&format!("load of {url} cancelled after {attempts} attempts"));
                return LoadOutcome::Cancelled { attempts };
            }

            attempts += 1;
            let error = match self.navigator.navigate(url) {
                Ok(()) => {
                    if attempts > 1 {
                        log(&format!("loaded {url} after {attempts} attempts"));
                    }
                    return LoadOutcome::Loaded { attempts };
                }
                Err(error) => error,
            };

            log(&format!("failed to load {url}: {error}"));
            let RetryState::Pending { remaining } = state else {
                return LoadOutcome::Exhausted { attempts };
            };
            state = state.on_failure();
            if state == RetryState::Exhausted {
                log(&format!("giving up on {url} after {attempts} attempts"));
                return LoadOutcome::Exhausted { attempts };
            }

            log(&format!(
                "retrying {url} in {}ms ({remaining} retries remaining)",
                self.policy.delay.as_millis()
            ));
            self.sleeper.sleep(self.policy.delay);
        }
    }
}

/// Runs the retry chain on a dedicated background thread and logs its outcome.
pub fn spawn_load_retry<N, S, F>(
    controller: LoadRetryController<N, S>,
    url: String,
    log: F,
) -> std::io::Result<thread::JoinHandle<LoadOutcome>>
where
    N: Navigator + Send + 'static,
    S: Sleeper + Send + 'static,
    F: Fn(&str) + Send + 'static,
{
    thread::Builder::new()
        .name("load-retry".to_string())
        .spawn(move || {
            let outcome = controller.run(&url, &log);
            log(&format!("initial load of {url} {outcome}"));
            outcome
        })
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        sync::{atomic::AtomicU32, Mutex},
    };

    use super::*;

    fn flaky(failures: u32, calls: &Cell<u32>) -> impl Fn(&str) -> Result<(), String> + '_ {
        move |_url: &str| {
            calls.set(calls.get() + 1);
            if calls.get() <= failures {
                Err("connection refused".to_string())
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        sleeps: RefCell<Vec<Duration>>,
    }

    impl Sleeper for &RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.sleeps.borrow_mut().push(duration);
        }
    }

    #[test]
    fn retry_state_counts_down_to_exhausted() {
        let mut state = RetryState::new(2);
        state = state.on_failure();
        assert_eq!(state, RetryState::Pending { remaining: 1 });
        state = state.on_failure();
        assert_eq!(state, RetryState::Pending { remaining: 0 });
        state = state.on_failure();
        assert_eq!(state, RetryState::Exhausted);
        assert!(state.is_terminal());
        assert_eq!(state.on_success(), RetryState::Exhausted);
    }

    #[test]
    fn succeeds_first_time_without_sleeping() {
        let calls = Cell::new(0);
        let sleeper = RecordingSleeper::default();
        let controller =
            LoadRetryController::new(flaky(0, &calls), &sleeper, RetryPolicy::default());

        assert_eq!(
            controller.run("app://index.html/#/", |_| {}),
            LoadOutcome::Loaded { attempts: 1 }
        );
        assert!(sleeper.sleeps.borrow().is_empty());
    }

    #[test]
    fn k_failures_then_success_takes_k_plus_one_attempts() {
        for k in 1..5 {
            let calls = Cell::new(0);
            let sleeper = RecordingSleeper::default();
            let controller =
                LoadRetryController::new(flaky(k, &calls), &sleeper, RetryPolicy::default());

            assert_eq!(
                controller.run("http://localhost:3000", |_| {}),
                LoadOutcome::Loaded { attempts: k + 1 }
            );
            assert_eq!(calls.get(), k + 1);
            assert_eq!(sleeper.sleeps.borrow().len() as u32, k);
        }
    }

    #[test]
    fn always_failing_target_stops_after_five_retries() {
        let calls = Cell::new(0);
        let sleeper = RecordingSleeper::default();
        let lines = RefCell::new(Vec::new());
        let controller =
            LoadRetryController::new(flaky(u32::MAX, &calls), &sleeper, RetryPolicy::default());

        let outcome = controller.run("http://localhost:3000", |line| {
            lines.borrow_mut().push(line.to_string())
        });

        assert_eq!(outcome, LoadOutcome::Exhausted { attempts: 6 });
        assert_eq!(calls.get(), 6);
        assert_eq!(
            *sleeper.sleeps.borrow(),
            vec![Duration::from_millis(5000); 5]
        );
        let lines = lines.into_inner();
        assert!(lines[1].contains("5 retries remaining"), "{lines:?}");
        assert_eq!(
            lines.last().map(String::as_str),
            Some("giving up on http://localhost:3000 after 6 attempts")
        );
    }

    #[test]
    fn zero_retry_policy_tries_once() {
        let calls = Cell::new(0);
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy {
            max_retries: 0,
            delay: Duration::from_millis(1),
        };
        let controller = LoadRetryController::new(flaky(u32::MAX, &calls), &sleeper, policy);

        assert_eq!(
            controller.run("app://index.html/#/", |_| {}),
            LoadOutcome::Exhausted { attempts: 1 }
        );
        assert!(sleeper.sleeps.borrow().is_empty());
    }

    #[test]
    fn cancel_flag_stops_chain_before_next_attempt() {
        let cancel = CancelFlag::default();
        let navigator = {
            let cancel = cancel.clone();
            move |_url: &str| -> Result<(), String> {
                cancel.cancel();
                Err("window closed".to_string())
            }
        };
        let sleeper = RecordingSleeper::default();
        let controller = LoadRetryController::new(navigator, &sleeper, RetryPolicy::default())
            .with_cancel_flag(cancel);

        assert_eq!(
            controller.run("http://localhost:3000", |_| {}),
            LoadOutcome::Cancelled { attempts: 1 }
        );
        assert_eq!(sleeper.sleeps.borrow().len(), 1);
    }

    #[test]
    fn spawned_chain_reports_outcome() {
        let calls = Arc::new(AtomicU32::new(0));
        let navigator = {
            let calls = Arc::clone(&calls);
            move |_url: &str| -> Result<(), String> {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("not ready".to_string())
                } else {
                    Ok(())
                }
            }
        };
        let policy = RetryPolicy {
            max_retries: 5,
            delay: Duration::from_millis(1),
        };
        let controller = LoadRetryController::new(navigator, ThreadSleeper, policy);

        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let handle = spawn_load_retry(controller, "http://localhost:3000".to_string(), move |line| {
            sink.lock().unwrap().push(line.to_string())
        })
        .expect("spawn retry thread");

        assert_eq!(handle.join().unwrap(), LoadOutcome::Loaded { attempts: 3 });
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            lines.lock().unwrap().last().map(String::as_str),
            Some("initial load of http://localhost:3000 loaded after 3 attempt(s)")
        );
    }
}
