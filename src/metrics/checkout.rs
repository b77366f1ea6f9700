//! Local repository checkouts, cloned once and updated in place afterwards.

use log::{info, warn};
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

use crate::github::search_repositories::RepositoryDescriptor;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Repository name '{0}' does not map to a directory under the checkout root")]
    InvalidName(String),

    #[error("Clone of {url} failed: {message}")]
    Clone { url: String, message: String },

    #[error("Update of {} failed: {message}", dir.display())]
    Update { dir: PathBuf, message: String },

    #[error("{operation} timed out after {duration:?}")]
    Timeout {
        operation: &'static str,
        duration: Duration,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Version-control client used to materialize checkouts.
pub trait VersionControl: Send + Sync {
    /// Clone `url` into `dest`, which does not exist yet, giving up after
    /// `timeout`.
    ///
    /// Must not return before the clone has stopped writing to `dest`, so the
    /// caller can remove a partial checkout safely.
    fn clone_repo(
        &self,
        url: &str,
        dest: &Path,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), CheckoutError>> + Send;

    /// Bring an existing checkout up to date.
    fn update(&self, dir: &Path) -> impl Future<Output = Result<(), CheckoutError>> + Send;
}

/// Clones with gix and updates with `git pull`.
#[derive(Debug, Clone)]
pub struct GitCheckout {
    git_program: PathBuf,
}

impl GitCheckout {
    #[must_use]
    pub fn new(git_program: impl Into<PathBuf>) -> Self {
        Self {
            git_program: git_program.into(),
        }
    }
}

impl Default for GitCheckout {
    fn default() -> Self {
        Self::new("git")
    }
}

/// Raises the gix interrupt flag when the clone future is dropped early.
struct InterruptOnDrop(Arc<AtomicBool>);

impl Drop for InterruptOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

impl VersionControl for GitCheckout {
    async fn clone_repo(
        &self,
        url: &str,
        dest: &Path,
        timeout: Duration,
    ) -> Result<(), CheckoutError> {
        let interrupt = Arc::new(AtomicBool::new(false));
        let _guard = InterruptOnDrop(interrupt.clone());

        let url_owned = url.to_string();
        let dest_owned = dest.to_path_buf();
        let flag = interrupt.clone();

        let mut handle = tokio::task::spawn_blocking(move || {
            let interrupt = flag;
            let parsed_url = gix::url::parse(url_owned.as_str().into())
                .map_err(|e| Box::new(e) as BoxedError)?;

            let mut prep = gix::prepare_clone(parsed_url, &dest_owned)
                .map_err(|e| Box::new(e) as BoxedError)?;
            let (mut checkout, _) = prep
                .fetch_then_checkout(gix::progress::Discard, &interrupt)
                .map_err(|e| Box::new(e) as BoxedError)?;
            checkout
                .main_worktree(gix::progress::Discard, &interrupt)
                .map_err(|e| Box::new(e) as BoxedError)?;
            Ok::<_, BoxedError>(())
        });

        let result = match tokio::time::timeout(timeout, &mut handle).await {
            Ok(result) => result,
            Err(_) => {
                // gix polls the flag between steps; wait until it lets go of dest
                interrupt.store(true, Ordering::Relaxed);
                if let Err(e) = handle.await {
                    warn!("Interrupted clone of {url} did not shut down cleanly: {e}");
                }
                return Err(CheckoutError::Timeout {
                    operation: "git clone",
                    duration: timeout,
                });
            }
        };

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(CheckoutError::Clone {
                url: url.to_string(),
                message: e.to_string(),
            }),
            // spawn_blocking panicked or was cancelled
            Err(e) => Err(CheckoutError::Clone {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn update(&self, dir: &Path) -> Result<(), CheckoutError> {
        let output = Command::new(&self.git_program)
            .arg("-C")
            .arg(dir)
            .arg("pull")
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(CheckoutError::Update {
                dir: dir.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Checkout directory for `name` under `root`.
///
/// Only plain relative names (`owner/repo`) are accepted.
pub fn checkout_dir(root: &Path, name: &str) -> Result<PathBuf, CheckoutError> {
    let relative = Path::new(name);
    let plain = !name.is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if plain {
        Ok(root.join(relative))
    } else {
        Err(CheckoutError::InvalidName(name.to_string()))
    }
}

async fn bounded<F>(
    operation: &'static str,
    duration: Duration,
    work: F,
) -> Result<(), CheckoutError>
where
    F: Future<Output = Result<(), CheckoutError>>,
{
    tokio::time::timeout(duration, work)
        .await
        .map_err(|_| CheckoutError::Timeout {
            operation,
            duration,
        })?
}

/// Clone or update the checkout for `descriptor`, returning its directory.
///
/// A directory holding `.git` is updated in place; anything else at that
/// path is replaced by a fresh clone. A failed clone leaves nothing behind.
pub async fn materialize<V: VersionControl>(
    vcs: &V,
    root: &Path,
    descriptor: &RepositoryDescriptor,
    timeout: Duration,
) -> Result<PathBuf, CheckoutError> {
    let dir = checkout_dir(root, &descriptor.name)?;

    if dir.join(".git").exists() {
        info!("Updating {}", dir.display());
        bounded("git pull", timeout, vcs.update(&dir)).await?;
        return Ok(dir);
    }

    if dir.exists() {
        warn!("Removing stale directory {}", dir.display());
        tokio::fs::remove_dir_all(&dir).await?;
    }
    if let Some(parent) = dir.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    info!("Cloning {} into {}", descriptor.url, dir.display());
    if let Err(e) = vcs.clone_repo(&descriptor.url, &dir, timeout).await {
        if dir.exists()
            && let Err(cleanup) = tokio::fs::remove_dir_all(&dir).await
        {
            warn!("Could not remove partial clone {}: {cleanup}", dir.display());
        }
        return Err(e);
    }

    Ok(dir)
}
