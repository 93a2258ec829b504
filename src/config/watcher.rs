use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

use notify::event::EventKind;
use notify::Event;
use notify::RecommendedWatcher;
use notify::RecursiveMode;
use notify::Watcher;
use tokio::sync::mpsc;
use tracing::debug;
use tracing::trace;

use crate::Result;

/// Emits a unit signal whenever the configuration file is written, created,
/// renamed or removed.
///
/// The parent directory is watched rather than the file itself so that editors
/// which replace the file on save are still noticed. Signals are coalesced: a
/// burst of file system events produces at most one pending signal.
#[derive(Debug)]
pub struct ConfigWatcher {
    path: PathBuf,
    /// Dropping the watcher stops the notifications
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    pub fn new(path: impl AsRef<Path>) -> Result<(Self, mpsc::Receiver<()>)> {
        let path = path.as_ref().to_path_buf();
        let file_name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (change_tx, change_rx) = mpsc::channel(1);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let Ok(event) = res else {
                    return;
                };
                if !is_relevant(&event, &file_name) {
                    return;
                }
                trace!(kind = ?event.kind, "configuration file event");
                // Full means a signal is already pending
                let _ = change_tx.try_send(());
            },
            notify::Config::default(),
        )?;
        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        debug!(path = %path.display(), "watching configuration file");

        Ok((
            Self {
                path,
                _watcher: watcher,
            },
            change_rx,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_relevant(
    event: &Event,
    file_name: &OsString,
) -> bool {
    let kind_matches = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    kind_matches && event.paths.iter().any(|p| p.file_name() == Some(file_name.as_os_str()))
}
