//! Watch mode: regenerate the report on a timer or on request
//!
//! The scheduler knows nothing about terminals. Commands arrive on an mpsc
//! channel (the CLI feeds it from stdin) and shutdown is driven by a
//! [`CancellationToken`], so Ctrl-C and the `q` key end the loop the same way.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonCommand {
    Refresh,
    OpenBrowser,
    Quit,
}

impl DaemonCommand {
    /// `r`, `b` or `q` (first character of the line, case-insensitive)
    pub fn from_key(line: &str) -> Option<Self> {
        match line.trim().chars().next()?.to_ascii_lowercase() {
            'r' => Some(Self::Refresh),
            'b' => Some(Self::OpenBrowser),
            'q' => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Status line shown between refreshes
pub fn status_line(remaining: Duration) -> String {
    format!(
        "Refresh in {} seconds.  Commands: (q)uit (b)rowser (r)efresh",
        remaining.as_secs()
    )
}

pub struct RefreshScheduler {
    interval: Duration,
    cancel: CancellationToken,
}

impl RefreshScheduler {
    pub fn new(interval: Duration, cancel: CancellationToken) -> Self {
        Self { interval, cancel }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Refresh once immediately, then every `interval` or on command, until
    /// quit or cancellation. Returns the number of refreshes attempted.
    ///
    /// A closed command channel (stdin at EOF) is not a quit; the timer keeps going.
    ///
    /// `refresh` is blocking work (it shells out to the export tool) and runs
    /// on the blocking pool. A failed refresh is logged and the loop goes on.
    pub async fn run<R, E, B>(
        &self,
        mut commands: mpsc::Receiver<DaemonCommand>,
        refresh: R,
        open_browser: B,
    ) -> usize
    where
        R: Fn() -> Result<(), E> + Send + Sync + 'static,
        E: std::fmt::Display + Send + 'static,
        B: Fn(),
    {
        let refresh = Arc::new(refresh);
        let mut refreshes = 0usize;
        let mut next_refresh = Instant::now();
        let mut commands_open = true;

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("Watch loop cancelled");
                    break;
                }
                command = commands.recv(), if commands_open => match command {
                    Some(DaemonCommand::Refresh) => {
                        next_refresh = Instant::now();
                    }
                    Some(DaemonCommand::OpenBrowser) => {
                        info!("Opening check results in browser...");
                        open_browser();
                    }
                    Some(DaemonCommand::Quit) => {
                        info!("Quitting...");
                        self.cancel.cancel();
                        break;
                    }
                    None => {
                        debug!("Command channel closed, refreshing on the timer only");
                        commands_open = false;
                    }
                },
                _ = tokio::time::sleep_until(next_refresh) => {
                    info!("Refreshing...");
                    refreshes += 1;
                    let job = Arc::clone(&refresh);
                    match tokio::task::spawn_blocking(move || job()).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => error!("Refresh failed: {}", e),
                        Err(e) => error!("Refresh task panicked: {}", e),
                    }
                    next_refresh = Instant::now() + self.interval;
                    info!("{}", status_line(self.interval));
                }
            }
        }

        refreshes
    }
}

/// What to hand the browser: the report with auto-refresh turned on
///
/// Under WSL the Windows side needs `c:/...` instead of `/mnt/c/...`.
pub fn browser_target(report: &Path, wsl: bool) -> String {
    let path = format!("{}?refresh=1", report.display());
    if wsl {
        match path.strip_prefix("/mnt/c/") {
            Some(rest) => format!("c:/{}", rest),
            None => path,
        }
    } else {
        format!("file://{}", path)
    }
}

pub fn open_in_browser(report: &Path, wsl: bool) -> std::io::Result<()> {
    let target = browser_target(report, wsl);
    if wsl {
        let status = Command::new("cmd.exe")
            .args(["/C", "start", &target])
            .status()?;
        if !status.success() {
            warn!("cmd.exe start exited with {}", status);
        }
        Ok(())
    } else {
        open::that(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_keys() {
        assert_eq!(DaemonCommand::from_key("r\n"), Some(DaemonCommand::Refresh));
        assert_eq!(DaemonCommand::from_key("B"), Some(DaemonCommand::OpenBrowser));
        assert_eq!(DaemonCommand::from_key("quit"), Some(DaemonCommand::Quit));
        assert_eq!(DaemonCommand::from_key("x"), None);
        assert_eq!(DaemonCommand::from_key(""), None);
    }

    #[test]
    fn test_browser_target() {
        let report = Path::new("/mnt/c/meets/summer.html");
        assert_eq!(browser_target(report, true), "c:/meets/summer.html?refresh=1");
        assert_eq!(
            browser_target(report, false),
            "file:///mnt/c/meets/summer.html?refresh=1"
        );
        assert_eq!(
            browser_target(Path::new("/home/me/meet.html"), true),
            "/home/me/meet.html?refresh=1"
        );
    }

    #[tokio::test]
    async fn test_commands_drive_the_loop() {
        let scheduler = RefreshScheduler::new(Duration::from_secs(3600), CancellationToken::new());
        let (tx, rx) = mpsc::channel(8);
        let count = Arc::new(AtomicUsize::new(0));
        let browser_opens = AtomicUsize::new(0);

        let counter = Arc::clone(&count);
        let refresh = move || -> Result<(), String> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };

        let driver = async {
            // Let the initial refresh happen before asking for another
            tokio::time::sleep(Duration::from_millis(50)).await;
            tx.send(DaemonCommand::Refresh).await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
            tx.send(DaemonCommand::OpenBrowser).await.unwrap();
            tx.send(DaemonCommand::Quit).await.unwrap();
        };
        let (refreshes, ()) = tokio::join!(
            scheduler.run(rx, refresh, || {
                browser_opens.fetch_add(1, Ordering::SeqCst);
            }),
            driver
        );

        assert_eq!(refreshes, 2);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(browser_opens.load(Ordering::SeqCst), 1);
        assert!(scheduler.cancel_token().is_cancelled());
    }

    #[tokio::test]
    async fn test_timer_refreshes_until_cancelled() {
        let cancel = CancellationToken::new();
        let scheduler = RefreshScheduler::new(Duration::from_millis(20), cancel.clone());
        let (_tx, rx) = mpsc::channel(8);

        let stopper = async {
            tokio::time::sleep(Duration::from_millis(150)).await;
            cancel.cancel();
        };
        let failing = || -> Result<(), String> { Err("database locked".to_string()) };
        let (refreshes, ()) = tokio::join!(scheduler.run(rx, failing, || {}), stopper);

        // Failures do not stop the timer
        assert!(refreshes >= 2);
    }

    #[tokio::test]
    async fn test_closed_channel_keeps_timer_running() {
        let cancel = CancellationToken::new();
        let scheduler = RefreshScheduler::new(Duration::from_millis(20), cancel.clone());
        let (tx, rx) = mpsc::channel::<DaemonCommand>(1);
        drop(tx);

        let stopper = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        };
        let ok = || -> Result<(), String> { Ok(()) };
        let (refreshes, ()) = tokio::join!(scheduler.run(rx, ok, || {}), stopper);
        assert!(refreshes >= 2);
    }
}
