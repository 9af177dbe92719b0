pub mod codec;
pub mod protocol;
pub mod store;

pub use codec::{decode_tracking_url, encode_tracking_url, DecodedTrackingUrl};
pub use protocol::{
    resolve, Destination, LoggingOutcome, RedirectController, RedirectGate, Resolution,
    ScanRequest, REDIRECT_COUNTDOWN,
};
pub use store::{
    ContentKind, MemoryStore, QrRecord, RecordStore, ScanAnalytics, ScanEvent, StoreError,
};
