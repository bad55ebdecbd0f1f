//! Shared transform toolchain.
//!
//! The toolchain (compiler backend plus utility theme) is built once per
//! process. Callers that arrive while initialization is running all await
//! the same in-flight future. If initialization fails, the cached future is
//! cleared so the next caller starts a fresh attempt.

use crate::compiler::{CompilerBackend, SwcBackend, TranspileSpec};
use crate::css::Theme;
use crate::error::{Error, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{debug, info, warn};

/// Module compiled once during initialization to warm up the backend.
const WARMUP_FILENAME: &str = "__warmup__.tsx";
const WARMUP_SOURCE: &str =
    "export default function Warmup(props: { label: string }) { return <b>{props.label}</b>; }\n";

/// Everything a compile needs that is expensive to build.
pub struct Toolchain {
    backend: Arc<dyn CompilerBackend>,
    theme: Theme,
}

impl Toolchain {
    #[must_use]
    pub fn new(backend: Arc<dyn CompilerBackend>) -> Self {
        Self {
            backend,
            theme: Theme::new(),
        }
    }

    #[must_use]
    pub fn backend(&self) -> &dyn CompilerBackend {
        self.backend.as_ref()
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }
}

impl std::fmt::Debug for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolchain")
            .field("backend", &self.backend.name())
            .finish_non_exhaustive()
    }
}

/// Produces a toolchain; called once per initialization attempt.
pub type Initializer = Arc<dyn Fn() -> BoxFuture<'static, Result<Toolchain>> + Send + Sync>;

/// `Shared` needs a cloneable output, so failures are carried as text.
type InitFuture = Shared<BoxFuture<'static, std::result::Result<Arc<Toolchain>, String>>>;

/// Lazily initialized, retry-on-failure toolchain handle.
pub struct ToolchainCell {
    init: Initializer,
    state: Mutex<Option<InitFuture>>,
}

impl ToolchainCell {
    /// A cell that builds its toolchain with `init`.
    #[must_use]
    pub fn new(init: Initializer) -> Self {
        Self {
            init,
            state: Mutex::new(None),
        }
    }

    /// A cell backed by the SWC compiler.
    #[must_use]
    pub fn swc() -> Self {
        Self::new(Arc::new(|| init_swc().boxed()))
    }

    /// Get the toolchain, initializing it on first use.
    ///
    /// # Errors
    ///
    /// Returns `Error::ToolchainInit` if initialization fails. Every caller
    /// waiting on that attempt sees the same error; a later call retries.
    pub async fn get(&self) -> Result<Arc<Toolchain>> {
        let pending = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            match state.as_ref() {
                Some(pending) => pending.clone(),
                None => {
                    debug!("Starting toolchain initialization");
                    let pending = (self.init)()
                        .map(|result| result.map(Arc::new).map_err(|e| e.to_string()))
                        .boxed()
                        .shared();
                    *state = Some(pending.clone());
                    pending
                }
            }
        };

        match pending.clone().await {
            Ok(toolchain) => Ok(toolchain),
            Err(message) => {
                let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
                // Only clear the attempt we awaited; a retry may already be running.
                if state.as_ref().is_some_and(|current| current.ptr_eq(&pending)) {
                    *state = None;
                    warn!(error = %message, "Toolchain initialization failed; will retry on next call");
                }
                Err(Error::ToolchainInit(message))
            }
        }
    }

    /// Whether a successful initialization has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .as_ref()
            .and_then(Shared::peek)
            .is_some_and(std::result::Result::is_ok)
    }
}

impl std::fmt::Debug for ToolchainCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolchainCell")
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

/// The process-wide toolchain cell.
pub fn shared() -> Arc<ToolchainCell> {
    static CELL: OnceLock<Arc<ToolchainCell>> = OnceLock::new();
    CELL.get_or_init(|| Arc::new(ToolchainCell::swc())).clone()
}

/// Build the SWC toolchain off the async executor and compile one warm-up
/// module so a broken backend fails here rather than mid-compile.
async fn init_swc() -> Result<Toolchain> {
    let toolchain = tokio::task::spawn_blocking(|| {
        let backend = SwcBackend::new();
        backend
            .transpile(&TranspileSpec::new(WARMUP_FILENAME), WARMUP_SOURCE)
            .map_err(|e| Error::ToolchainInit(e.to_string()))?;
        Ok::<_, Error>(Toolchain::new(Arc::new(backend)))
    })
    .await
    .map_err(|e| Error::ToolchainInit(format!("initialization task failed: {e}")))??;

    info!(backend = toolchain.backend().name(), "Toolchain ready");
    Ok(toolchain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_cell(calls: Arc<AtomicUsize>, fail_first: usize) -> ToolchainCell {
        ToolchainCell::new(Arc::new(move || {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                if n < fail_first {
                    Err(Error::ToolchainInit(format!("attempt {n} failed")))
                } else {
                    Ok(Toolchain::new(Arc::new(SwcBackend::new())))
                }
            }
            .boxed()
        }))
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_initialization() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cell = counting_cell(calls.clone(), 0);

        let (a, b, c) = tokio::join!(cell.get(), cell.get(), cell.get());
        let a = a.unwrap();
        assert!(Arc::ptr_eq(&a, &b.unwrap()));
        assert!(Arc::ptr_eq(&a, &c.unwrap()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cell.is_ready());

        cell.get().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_shared_then_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cell = counting_cell(calls.clone(), 1);

        let (a, b) = tokio::join!(cell.get(), cell.get());
        let err = a.unwrap_err();
        assert_eq!(err.code(), crate::codes::TOOLCHAIN_INIT_FAILED);
        assert!(err.to_string().contains("attempt 0 failed"));
        assert!(b.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!cell.is_ready());

        cell.get().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cell.is_ready());
    }

    #[tokio::test]
    async fn test_swc_toolchain_initializes() {
        let cell = ToolchainCell::swc();
        let toolchain = cell.get().await.unwrap();
        assert_eq!(toolchain.backend().name(), "swc");
        assert!(toolchain.theme().color("red-500").is_some());
    }
}
