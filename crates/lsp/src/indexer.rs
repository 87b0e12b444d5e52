use crate::diagnostics;
use crate::util::Document;
use crate::Session;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tower_lsp::lsp_types::{MessageType, Url};
use tower_lsp::Client;

/// Background index rebuilds.
///
/// Builds run one at a time; a queued build that has been superseded by a
/// newer request is skipped, so only the latest result is published. A full
/// rescan requested by a skipped build carries over to the build that runs.
#[derive(Clone)]
pub struct Indexer {
    client: Client,
    documents: Arc<DashMap<Url, Arc<Document>>>,
    generation: Arc<AtomicU64>,
    rescan: Arc<AtomicBool>,
    running: Arc<Mutex<()>>,
    cancel_token: CancellationToken,
}

impl Indexer {
    pub fn new(
        client: Client,
        documents: Arc<DashMap<Url, Arc<Document>>>,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            client,
            documents,
            generation: Arc::new(AtomicU64::new(0)),
            rescan: Arc::new(AtomicBool::new(false)),
            running: Arc::new(Mutex::new(())),
            cancel_token,
        }
    }

    /// With `force` the build rediscovers the project tree instead of reusing
    /// cached listings.
    pub fn spawn(&self, session: Session, reason: &'static str, force: bool) {
        if force {
            self.rescan.store(true, Ordering::SeqCst);
        }
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let this = self.clone();
        tokio::spawn(async move {
            let _running = this.running.lock().await;
            if this.cancel_token.is_cancelled() {
                return;
            }
            if this.generation.load(Ordering::SeqCst) != ticket {
                tracing::debug!("Skipping superseded index build #{} ({})", ticket, reason);
                return;
            }

            let force = this.rescan.swap(false, Ordering::SeqCst);

            this.client
                .log_message(
                    MessageType::INFO,
                    format!("Resource indexing started ({})", reason),
                )
                .await;

            let summary = session.resolver.build_index(force).await;
            this.client
                .log_message(
                    MessageType::INFO,
                    format!(
                        "Resource indexing complete in {:?}: {} app, {} sys",
                        summary.elapsed, summary.app, summary.sys
                    ),
                )
                .await;

            if session.resolver.sdk_path().is_none() {
                this.client
                    .log_message(
                        MessageType::WARNING,
                        "No SDK path configured, system resources are unavailable",
                    )
                    .await;
            }

            diagnostics::publish_all(&this.client, &session, &this.documents).await;
        });
    }
}
