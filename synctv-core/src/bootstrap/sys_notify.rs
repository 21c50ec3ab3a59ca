//! Process signal handling
//!
//! Maps OS signals to named task groups. Termination signals run the exit
//! group once and end the wait loop; user signals run the reload group each
//! time they arrive.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::config::LifecycleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyType {
    Exit,
    Reload,
}

impl std::fmt::Display for NotifyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exit => write!(f, "exit"),
            Self::Reload => write!(f, "reload"),
        }
    }
}

type TaskFn = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

#[derive(Clone)]
struct NamedTask {
    name: String,
    run: TaskFn,
}

/// Tasks for one notify type, run in registration order
#[derive(Clone, Default)]
pub struct TaskGroup {
    tasks: Vec<NamedTask>,
}

impl TaskGroup {
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name.as_str()).collect()
    }
}

/// Outcome of one dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub timed_out: usize,
}

pub struct SysNotify {
    groups: Mutex<HashMap<NotifyType, TaskGroup>>,
    task_timeout: Duration,
    exited: AtomicBool,
    waiting: AtomicBool,
}

impl std::fmt::Debug for SysNotify {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SysNotify")
            .field("task_timeout", &self.task_timeout)
            .field("exited", &self.exited.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl SysNotify {
    #[must_use]
    pub fn new(config: &LifecycleConfig) -> Self {
        Self::with_timeout(Duration::from_secs(config.task_timeout_seconds))
    }

    #[must_use]
    pub fn with_timeout(task_timeout: Duration) -> Self {
        Self {
            groups: Mutex::new(HashMap::new()),
            task_timeout,
            exited: AtomicBool::new(false),
            waiting: AtomicBool::new(false),
        }
    }

    /// Append a task to the group for `kind`.
    pub fn register<F, Fut>(&self, kind: NotifyType, name: impl Into<String>, task: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let run: TaskFn = Arc::new(move || -> BoxFuture<'static, anyhow::Result<()>> {
            Box::pin(task())
        });
        self.groups
            .lock()
            .entry(kind)
            .or_default()
            .tasks
            .push(NamedTask {
                name: name.into(),
                run,
            });
    }

    #[must_use]
    pub fn group(&self, kind: NotifyType) -> TaskGroup {
        self.groups.lock().get(&kind).cloned().unwrap_or_default()
    }

    /// Run the task group for `kind`.
    ///
    /// Returns `None` when an exit has already been dispatched.
    pub async fn notify(&self, kind: NotifyType) -> Option<DispatchReport> {
        if kind == NotifyType::Exit && self.exited.swap(true, Ordering::SeqCst) {
            info!(kind = %kind, "Exit already dispatched, ignoring");
            return None;
        }

        let group = self.group(kind);
        info!(kind = %kind, tasks = group.len(), "Dispatching notify tasks");

        let mut report = DispatchReport::default();
        for task in group.tasks {
            // Spawned so a panicking task is contained like a failing one
            let mut handle = tokio::spawn((task.run)());
            match tokio::time::timeout(self.task_timeout, &mut handle).await {
                Ok(Ok(Ok(()))) => {
                    report.succeeded += 1;
                }
                Ok(Ok(Err(e))) => {
                    error!(kind = %kind, task = %task.name, error = %e, "Notify task failed");
                    report.failed += 1;
                }
                Ok(Err(e)) => {
                    error!(kind = %kind, task = %task.name, error = %e, "Notify task panicked");
                    report.failed += 1;
                }
                Err(_) => {
                    handle.abort();
                    warn!(
                        kind = %kind,
                        task = %task.name,
                        timeout_secs = self.task_timeout.as_secs_f64(),
                        "Notify task timed out"
                    );
                    report.timed_out += 1;
                }
            }
        }

        info!(
            kind = %kind,
            succeeded = report.succeeded,
            failed = report.failed,
            timed_out = report.timed_out,
            "Notify tasks finished"
        );
        Some(report)
    }

    /// Dispatch OS signals until a termination signal has been handled.
    ///
    /// Only one caller may wait; later calls fail immediately.
    pub async fn wait(&self) -> anyhow::Result<()> {
        self.wait_on(Signals::new).await
    }

    async fn wait_on<S: NotifySource>(
        &self,
        open: impl FnOnce() -> std::io::Result<S>,
    ) -> anyhow::Result<()> {
        if self.waiting.swap(true, Ordering::SeqCst) {
            anyhow::bail!("signal loop is already running");
        }

        let mut source = match open() {
            Ok(source) => source,
            Err(e) => {
                // Nothing is listening, so a later call may try again
                self.waiting.store(false, Ordering::SeqCst);
                return Err(anyhow::anyhow!("failed to install signal handlers: {e}"));
            }
        };
        loop {
            let (signal, kind) = source.recv().await?;
            info!(signal, kind = %kind, "Received system notify");
            self.notify(kind).await;
            if kind == NotifyType::Exit {
                return Ok(());
            }
        }
    }
}

/// Where notifications come from: OS signals, or a script in tests.
trait NotifySource: Send {
    fn recv(&mut self) -> BoxFuture<'_, std::io::Result<(&'static str, NotifyType)>>;
}

#[cfg(unix)]
struct Signals {
    hup: tokio::signal::unix::Signal,
    int: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
    term: tokio::signal::unix::Signal,
    usr1: tokio::signal::unix::Signal,
    usr2: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    fn new() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            hup: signal(SignalKind::hangup())?,
            int: signal(SignalKind::interrupt())?,
            quit: signal(SignalKind::quit())?,
            term: signal(SignalKind::terminate())?,
            usr1: signal(SignalKind::user_defined1())?,
            usr2: signal(SignalKind::user_defined2())?,
        })
    }

}

#[cfg(unix)]
impl NotifySource for Signals {
    fn recv(&mut self) -> BoxFuture<'_, std::io::Result<(&'static str, NotifyType)>> {
        Box::pin(async move {
            Ok(tokio::select! {
                _ = self.hup.recv() => ("SIGHUP", NotifyType::Exit),
                _ = self.int.recv() => ("SIGINT", NotifyType::Exit),
                _ = self.quit.recv() => ("SIGQUIT", NotifyType::Exit),
                _ = self.term.recv() => ("SIGTERM", NotifyType::Exit),
                _ = self.usr1.recv() => ("SIGUSR1", NotifyType::Reload),
                _ = self.usr2.recv() => ("SIGUSR2", NotifyType::Reload),
            })
        })
    }
}

#[cfg(not(unix))]
struct Signals;

#[cfg(not(unix))]
impl Signals {
    #[allow(clippy::unnecessary_wraps)]
    fn new() -> std::io::Result<Self> {
        Ok(Self)
    }

}

#[cfg(not(unix))]
impl NotifySource for Signals {
    fn recv(&mut self) -> BoxFuture<'_, std::io::Result<(&'static str, NotifyType)>> {
        Box::pin(async {
            tokio::signal::ctrl_c().await?;
            Ok(("ctrl-c", NotifyType::Exit))
        })
    }
}
