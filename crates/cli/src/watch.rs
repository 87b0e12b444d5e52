use crate::context::ProjectContext;
use arkres_core::config::Settings;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const DEBOUNCE: Duration = Duration::from_millis(500);

struct FsWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl FsWatcher {
    fn new(root: &Path) -> notify::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;
        watcher.watch(root, RecursiveMode::Recursive)?;
        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Next event; `None` once the channel is closed.
    async fn next_event(&mut self) -> Option<Event> {
        loop {
            match self.rx.recv().await? {
                Ok(event) => return Some(event),
                Err(e) => error!("Watch error: {}", e),
            }
        }
    }
}

pub async fn run(path: PathBuf, settings: Settings) -> anyhow::Result<()> {
    let ctx = ProjectContext::open(&path, settings).await?;
    let mut watcher = FsWatcher::new(&ctx.root)?;

    let cancel_token = CancellationToken::new();
    let ctrl_c = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    info!("Watching {}. Press Ctrl+C to stop.", ctx.root.display());
    let mut pending: HashSet<PathBuf> = HashSet::new();

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => break,
            event = watcher.next_event() => {
                match event {
                    Some(e) if is_relevant(&e.kind) => pending.extend(e.paths),
                    Some(_) => {}
                    None => break,
                }
            }
            _ = tokio::time::sleep(DEBOUNCE), if !pending.is_empty() => {
                let changed: Vec<PathBuf> = pending.drain().collect();
                let invalidated = changed
                    .iter()
                    .filter(|path| !ctx.model.invalidate(path).is_empty())
                    .count();
                if invalidated == 0 {
                    continue;
                }
                info!("Detected {} changes ({} invalidated). Reindexing...", changed.len(), invalidated);
                let summary = ctx.resolver.build_index(false).await;
                info!(
                    "Reindexed in {:?}: {} app, {} sys",
                    summary.elapsed, summary.app, summary.sys
                );
            }
        }
    }

    info!("Watcher stopped.");
    Ok(())
}

fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
