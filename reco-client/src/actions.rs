//! Effectful per-item actions: clipboard copy with a self-clearing
//! acknowledgment, and opening share targets.
//!
//! Both effects sit behind traits so the OS integrations can live in the
//! application crate and tests can substitute recorders.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::error::RecoError;
use crate::present::citation::CitationStyle;
use crate::present::share::{build_share_text, share_url};
use crate::types::CitationResult;

/// Destination for copied text.
///
/// Implementations either replace the clipboard contents with the whole of
/// `text` or fail without touching it.
pub trait Clipboard: Send + Sync {
    fn write_text(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), RecoError>> + Send;
}

/// Opens a URL in a new browser context. Fire-and-forget: only a failure to
/// launch is reported.
pub trait ShareLauncher: Send + Sync {
    fn open(&self, url: &str) -> Result<(), RecoError>;
}

/// Which copy action is being acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CopyTarget {
    pub doc_id: String,
    pub style: CitationStyle,
}

#[derive(Debug, Default)]
struct AckState {
    current: Option<CopyTarget>,
    epoch: u64,
    timer: Option<JoinHandle<()>>,
}

/// Transient "copied" indicator.
///
/// Set after a successful copy and cleared automatically after the
/// configured delay. Starting another copy cancels the pending reset.
#[derive(Debug)]
pub struct CopyAcknowledgment {
    delay: Duration,
    inner: Arc<Mutex<AckState>>,
}

impl CopyAcknowledgment {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: Arc::new(Mutex::new(AckState::default())),
        }
    }

    /// The target currently acknowledged, if any.
    pub fn current(&self) -> Option<CopyTarget> {
        lock(&self.inner).current.clone()
    }

    pub fn is_shown(&self, target: &CopyTarget) -> bool {
        lock(&self.inner).current.as_ref() == Some(target)
    }

    /// Copy `text` and acknowledge `target` on success.
    ///
    /// Must be called inside a tokio runtime; the reset timer is a spawned
    /// task. On failure the acknowledgment stays hidden and the error is
    /// returned to the caller.
    pub async fn copy<C: Clipboard>(
        &self,
        clipboard: &C,
        target: CopyTarget,
        text: &str,
    ) -> Result<(), RecoError> {
        let epoch = self.begin();
        match clipboard.write_text(text).await {
            Ok(()) => {
                self.acknowledge(epoch, target);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "clipboard copy failed");
                Err(err)
            }
        }
    }

    /// Copy `item` formatted in `style`.
    pub async fn copy_citation<C: Clipboard>(
        &self,
        clipboard: &C,
        item: &CitationResult,
        style: CitationStyle,
    ) -> Result<String, RecoError> {
        let text = style.format(item);
        let target = CopyTarget {
            doc_id: item.doc_id.clone(),
            style,
        };
        self.copy(clipboard, target, &text).await?;
        Ok(text)
    }

    fn begin(&self) -> u64 {
        let mut state = lock(&self.inner);
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.current = None;
        state.epoch += 1;
        state.epoch
    }

    fn acknowledge(&self, epoch: u64, target: CopyTarget) {
        let mut state = lock(&self.inner);
        if state.epoch != epoch {
            // A newer copy started while this one was writing.
            return;
        }
        state.current = Some(target);

        let inner = Arc::clone(&self.inner);
        let delay = self.delay;
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = lock(&inner);
            if state.epoch == epoch {
                state.current = None;
                state.timer = None;
            }
        }));
    }
}

impl Drop for CopyAcknowledgment {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.inner).timer.take() {
            timer.abort();
        }
    }
}

/// Open the WhatsApp share link for `item`, returning the URL that was opened.
pub fn share_citation<L: ShareLauncher>(
    launcher: &L,
    item: &CitationResult,
) -> Result<String, RecoError> {
    let url = share_url(&build_share_text(item));
    launcher.open(&url)?;
    Ok(url)
}

fn lock(inner: &Mutex<AckState>) -> MutexGuard<'_, AckState> {
    inner.lock().unwrap_or_else(|p| p.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct RecordingClipboard {
        contents: Mutex<Option<String>>,
        fail: AtomicBool,
    }

    impl Clipboard for RecordingClipboard {
        async fn write_text(&self, text: &str) -> Result<(), RecoError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(RecoError::Clipboard("no clipboard tool".into()));
            }
            *self.contents.lock().unwrap_or_else(|p| p.into_inner()) = Some(text.to_owned());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingLauncher {
        opened: Mutex<Vec<String>>,
    }

    impl ShareLauncher for RecordingLauncher {
        fn open(&self, url: &str) -> Result<(), RecoError> {
            self.opened
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .push(url.to_owned());
            Ok(())
        }
    }

    fn item() -> CitationResult {
        let mut c = CitationResult::new("d7", 1.0);
        c.title = Some("Sistem Pakar".into());
        c.date = Some("2019-09-09".into());
        c
    }

    #[tokio::test(start_paused = true)]
    async fn acknowledgment_clears_after_delay() {
        let clipboard = RecordingClipboard::default();
        let ack = CopyAcknowledgment::new(Duration::from_millis(1500));

        let text = ack
            .copy_citation(&clipboard, &item(), CitationStyle::Apa)
            .await
            .expect("copy");
        assert_eq!(text, "Unknown author (2019). Sistem Pakar. UDINUS.");
        assert_eq!(
            clipboard.contents.lock().unwrap_or_else(|p| p.into_inner()).as_deref(),
            Some(text.as_str())
        );
        let target = CopyTarget {
            doc_id: "d7".into(),
            style: CitationStyle::Apa,
        };
        assert!(ack.is_shown(&target));

        tokio::time::sleep(Duration::from_millis(1400)).await;
        assert!(ack.is_shown(&target));

        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert!(ack.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn new_copy_restarts_timer() {
        let clipboard = RecordingClipboard::default();
        let ack = CopyAcknowledgment::new(Duration::from_millis(1000));

        ack.copy_citation(&clipboard, &item(), CitationStyle::Apa)
            .await
            .expect("first copy");
        tokio::time::sleep(Duration::from_millis(800)).await;
        ack.copy_citation(&clipboard, &item(), CitationStyle::Ieee)
            .await
            .expect("second copy");

        // The first timer would have fired here had it not been cancelled.
        tokio::time::sleep(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert_eq!(
            ack.current().map(|t| t.style),
            Some(CitationStyle::Ieee)
        );

        tokio::time::sleep(Duration::from_millis(600)).await;
        tokio::task::yield_now().await;
        assert!(ack.current().is_none());
    }

    #[tokio::test]
    async fn failed_copy_shows_no_acknowledgment() {
        let clipboard = RecordingClipboard::default();
        clipboard.fail.store(true, Ordering::SeqCst);
        let ack = CopyAcknowledgment::new(Duration::from_millis(1500));

        let result = ack
            .copy_citation(&clipboard, &item(), CitationStyle::Ieee)
            .await;
        assert!(matches!(result, Err(RecoError::Clipboard(_))));
        assert!(ack.current().is_none());
        assert!(clipboard
            .contents
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .is_none());
    }

    #[test]
    fn share_opens_whatsapp_link() {
        let launcher = RecordingLauncher::default();
        let url = share_citation(&launcher, &item()).expect("share");
        assert_eq!(url, "https://wa.me/?text=Sistem%20Pakar%20%282019%29");
        assert_eq!(
            *launcher.opened.lock().unwrap_or_else(|p| p.into_inner()),
            vec![url]
        );
    }
}
