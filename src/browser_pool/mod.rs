//! Bounded pool of reusable Chromium sessions
//!
//! A semaphore caps how many sessions may be live at once; callers queue on
//! [`BrowserPool::acquire`] instead of racing to spawn Chromium processes.
//! Sessions are launched on demand, health-checked before reuse, and kept
//! warm between fetches. Guards return their session on drop, including when
//! the owning future is cancelled.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use chromiumoxide::browser::Browser;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::browser_setup;

/// One launched Chromium instance with its CDP handler and temp profile.
///
/// The browser is stored in an `Arc` so concurrent tasks can share it while
/// the session manages the lifecycle. Dropping aborts the handler task and
/// removes the profile directory.
#[derive(Debug)]
pub struct PooledSession {
    id: u64,
    browser: Arc<Browser>,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
    last_used: Instant,
}

impl PooledSession {
    fn new(id: u64, browser: Browser, handler: JoinHandle<()>, user_data_dir: PathBuf) -> Self {
        Self {
            id,
            browser: Arc::new(browser),
            handler,
            user_data_dir: Some(user_data_dir),
            last_used: Instant::now(),
        }
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Mutable access for graceful close; only works while no other Arc
    /// references exist.
    fn browser_mut(&mut self) -> Option<&mut Browser> {
        Arc::get_mut(&mut self.browser)
    }

    fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            debug!("Removing session profile directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!("Failed to remove profile directory {}: {e}", path.display());
            }
        }
    }
}

impl Drop for PooledSession {
    fn drop(&mut self) {
        self.handler.abort();
        if self.user_data_dir.is_some() {
            self.cleanup_temp_dir();
        }
    }
}

/// Bounded, lazily-populated pool of Chromium sessions.
#[derive(Debug)]
pub struct BrowserPool {
    headless: bool,
    chrome_executable: Option<PathBuf>,
    /// Warm sessions awaiting reuse
    idle: Mutex<VecDeque<PooledSession>>,
    /// Caps live sessions; a permit is held for a session's whole checkout
    slots: Arc<Semaphore>,
    next_id: AtomicU64,
}

impl BrowserPool {
    /// Create a pool allowing at most `max_sessions` live sessions. No
    /// Chromium is launched until the first acquire.
    pub fn new(
        max_sessions: usize,
        headless: bool,
        chrome_executable: Option<PathBuf>,
    ) -> Arc<Self> {
        Arc::new(Self {
            headless,
            chrome_executable,
            idle: Mutex::new(VecDeque::new()),
            slots: Arc::new(Semaphore::new(max_sessions.max(1))),
            next_id: AtomicU64::new(0),
        })
    }

    /// Check out a session, waiting for a slot when the pool is saturated.
    ///
    /// Warm sessions are health-checked with a `browser.version()` round trip
    /// before they are handed out; dead ones are discarded and replaced.
    pub async fn acquire(self: &Arc<Self>) -> Result<BrowserSessionGuard> {
        let permit = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .context("browser pool is shut down")?;

        loop {
            let candidate = self.idle.lock().await.pop_front();
            let Some(mut session) = candidate else { break };

            match session.browser().version().await {
                Ok(_) => {
                    debug!(
                        "Acquired warm browser session {} (idle {:?})",
                        session.id,
                        session.last_used.elapsed()
                    );
                    session.last_used = Instant::now();
                    return Ok(BrowserSessionGuard {
                        session: Some(session),
                        pool: Arc::clone(self),
                        permit: Some(permit),
                    });
                }
                Err(e) => {
                    warn!(
                        "Browser session {} failed health check, discarding: {e}",
                        session.id
                    );
                    // Dropping the session aborts its handler and cleans up.
                }
            }
        }

        let session = self.launch_session().await?;
        Ok(BrowserSessionGuard {
            session: Some(session),
            pool: Arc::clone(self),
            permit: Some(permit),
        })
    }

    /// Return a session to the idle queue. The slot is freed only after the
    /// session is actually reusable, so the live-session cap holds strictly.
    fn release(self: Arc<Self>, mut session: PooledSession, permit: OwnedSemaphorePermit) {
        session.last_used = Instant::now();
        let id = session.id;

        tokio::spawn(async move {
            self.idle.lock().await.push_back(session);
            drop(permit);
            debug!("Returned browser session {id} to pool");
        });
    }

    /// Close every idle session and refuse further acquires.
    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down browser pool");
        self.slots.close();

        let mut idle = self.idle.lock().await;
        while let Some(mut session) = idle.pop_front() {
            let session_id = session.id;
            if let Some(browser) = session.browser_mut() {
                if let Err(e) = browser.close().await {
                    warn!("Failed to close browser session {session_id} cleanly: {e}");
                }
                let _ = browser.wait().await;
            } else {
                warn!(
                    "Browser session {session_id} has outstanding references, relying on drop cleanup"
                );
            }
            session.cleanup_temp_dir();
        }

        info!("Browser pool shutdown complete");
        Ok(())
    }

    /// Number of warm sessions currently idle.
    pub async fn idle_sessions(&self) -> usize {
        self.idle.lock().await.len()
    }

    async fn launch_session(&self) -> Result<PooledSession> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let (browser, handler, user_data_dir) =
            browser_setup::launch_browser(self.headless, self.chrome_executable.as_deref())
                .await
                .context("Failed to launch browser for pool")?;

        info!("Launched browser session {id}");
        Ok(PooledSession::new(id, browser, handler, user_data_dir))
    }
}

/// RAII guard for a checked-out session.
///
/// Holds the pool slot for as long as the session is out; dropping the guard
/// returns the session and then frees the slot. Cancellation of the owning
/// future triggers the same path.
pub struct BrowserSessionGuard {
    session: Option<PooledSession>,
    pool: Arc<BrowserPool>,
    permit: Option<OwnedSemaphorePermit>,
}

impl BrowserSessionGuard {
    pub fn browser(&self) -> &Browser {
        self.session
            .as_ref()
            .expect("session present until drop")
            .browser()
    }

    pub fn id(&self) -> u64 {
        self.session.as_ref().expect("session present until drop").id
    }
}

impl Drop for BrowserSessionGuard {
    fn drop(&mut self) {
        if let (Some(session), Some(permit)) = (self.session.take(), self.permit.take()) {
            Arc::clone(&self.pool).release(session, permit);
        }
    }
}
