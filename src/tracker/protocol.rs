use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use super::store::{ContentKind, QrRecord, RecordStore, ScanEvent};
use crate::error::{TrackError, TrackResult};

// Scan resolution protocol
//------------------------------------------------------------------------------

/// Fixed countdown shown before the automatic redirect fires.
pub const REDIRECT_COUNTDOWN: Duration = Duration::from_secs(3);

/// Maximum identifier length accepted before lookup.
const MAX_TOKEN_LEN: usize = 64;

/// Where a successful resolution points.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Destination {
    /// Navigable URL; the countdown redirect applies.
    Url(String),
    /// Plain-text QR content with no redirect target; shown to the user
    /// instead of navigating.
    Text(String),
}

/// Incoming scan context, as extracted from the HTTP request.
#[derive(Debug, Default, Clone)]
pub struct ScanRequest {
    pub identifier: String,
    /// Percent-decoded `redirect` query parameter, if present.
    pub redirect_param: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub ip_address: Option<String>,
}

/// Successful resolution: destination plus the countdown contract and, for
/// tracked codes, a handle to observe whether logging succeeded.
#[derive(Debug)]
pub struct Resolution {
    pub record: QrRecord,
    pub destination: Destination,
    pub countdown: Duration,
    pub logging: Option<LoggingOutcome>,
}

/// Receiver side of the fire-and-forget scan log. The write itself never
/// blocks or fails the redirect; this only surfaces the outcome for
/// observability.
#[derive(Debug)]
pub struct LoggingOutcome {
    rx: oneshot::Receiver<bool>,
}

impl LoggingOutcome {
    /// Resolves to `true` once both the event append and the counter bump
    /// succeeded. A dropped or failed logging task reads as `false`.
    pub async fn succeeded(self) -> bool {
        self.rx.await.unwrap_or(false)
    }
}

/// Resolves one scan: looks up the record, picks the destination, and for
/// tracked records dispatches the scan log in the background.
///
/// Must run inside a Tokio runtime (the logging write is spawned). Malformed
/// identifiers resolve to [`TrackError::NotFound`] so callers cannot
/// distinguish garbage input from a deleted code.
pub fn resolve(store: Arc<dyn RecordStore>, request: ScanRequest) -> TrackResult<Resolution> {
    if !plausible_token(&request.identifier) {
        return Err(TrackError::NotFound);
    }
    let record = store.get(&request.identifier).ok_or(TrackError::NotFound)?;
    let destination =
        pick_destination(request.redirect_param.as_deref(), &record).ok_or(TrackError::NoDestination)?;

    let logging = record.is_tracked.then(|| {
        let event = ScanEvent::new(
            record.id.clone(),
            request.user_agent.clone(),
            request.referrer.clone(),
            request.ip_address.clone(),
        );
        spawn_scan_log(store.clone(), event)
    });

    debug!(id = %record.id, tracked = record.is_tracked, "scan resolved");
    Ok(Resolution { record, destination, countdown: REDIRECT_COUNTDOWN, logging })
}

/// Accepts opaque tokens without leaking the validation outcome: anything
/// implausible is treated exactly like an unknown identifier.
fn plausible_token(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= MAX_TOKEN_LEN
        && token.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Prefers a well-formed `redirect` parameter, then the stored content. An
/// unparseable parameter is discarded rather than fatal; unparseable content
/// is legitimate plain-text payload.
fn pick_destination(redirect_param: Option<&str>, record: &QrRecord) -> Option<Destination> {
    if let Some(param) = redirect_param {
        if Url::parse(param).is_ok() {
            return Some(Destination::Url(param.to_string()));
        }
        debug!("discarding unparseable redirect parameter");
    }
    if record.content.is_empty() {
        return None;
    }
    // The stored kind is authoritative: payloads like wifi credentials
    // parse as scheme-prefixed URIs, so sniffing alone would navigate
    // instead of presenting them.
    if record.kind == ContentKind::Url && Url::parse(&record.content).is_ok() {
        Some(Destination::Url(record.content.clone()))
    } else {
        Some(Destination::Text(record.content.clone()))
    }
}

/// Dispatches the scan-event append and counter bump exactly once, off the
/// caller's path. Failures are logged and reported through the returned
/// handle, never propagated.
fn spawn_scan_log(store: Arc<dyn RecordStore>, event: ScanEvent) -> LoggingOutcome {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let id = event.qr_code_id.clone();
        let appended = match store.append_scan(event) {
            Ok(()) => true,
            Err(e) => {
                warn!(%id, error = %e, "scan event append failed");
                false
            }
        };
        let counted = match store.increment_counters(&id) {
            Ok(()) => true,
            Err(e) => {
                warn!(%id, error = %e, "scan counter bump failed");
                false
            }
        };
        let _ = tx.send(appended && counted);
    });
    LoggingOutcome { rx }
}

// Countdown redirect
//------------------------------------------------------------------------------

/// At-most-once latch shared by the countdown timer and the manual trigger.
#[derive(Debug, Default)]
pub struct RedirectGate {
    fired: AtomicBool,
}

impl RedirectGate {
    /// Returns `true` for the first caller only.
    pub fn try_fire(&self) -> bool {
        !self.fired.swap(true, Ordering::SeqCst)
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

/// Drives the countdown-then-redirect contract: `navigate` runs exactly once,
/// either when the countdown elapses or when [`go_now`](Self::go_now) is
/// called, whichever happens first.
pub struct RedirectController {
    gate: Arc<RedirectGate>,
    navigate: Arc<dyn Fn() + Send + Sync>,
    timer: JoinHandle<()>,
}

impl RedirectController {
    pub fn start(countdown: Duration, navigate: impl Fn() + Send + Sync + 'static) -> Self {
        let gate = Arc::new(RedirectGate::default());
        let navigate: Arc<dyn Fn() + Send + Sync> = Arc::new(navigate);
        let timer = tokio::spawn({
            let gate = Arc::clone(&gate);
            let navigate = Arc::clone(&navigate);
            async move {
                tokio::time::sleep(countdown).await;
                if gate.try_fire() {
                    navigate();
                }
            }
        });
        Self { gate, navigate, timer }
    }

    /// Manual escape hatch. Cancels the scheduled callback; a second call,
    /// or a call racing the expired timer, is a no-op.
    pub fn go_now(&self) -> bool {
        self.timer.abort();
        if self.gate.try_fire() {
            (self.navigate)();
            true
        } else {
            false
        }
    }

    pub fn has_redirected(&self) -> bool {
        self.gate.has_fired()
    }
}

impl Drop for RedirectController {
    fn drop(&mut self) {
        self.timer.abort();
    }
}
