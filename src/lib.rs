//! # qrnexus
//!
//! Styled QR code rendering and scan-tracking redirects.
//!
//! The crate has two halves. The styling engine turns content plus a style
//! descriptor into a bitmap: shaped modules (squares, circles, rounded
//! squares, dots, leaves, diamonds), linear or radial gradient fills for the
//! data region, solid-colored finder eyes, and an optional centered logo
//! with a safe-zone cut out of the module grid. The tracker half builds and
//! parses opaque tracking URLs, resolves scanned identifiers to their
//! destinations, records scan analytics without delaying the redirect, and
//! drives a cancellable countdown that navigates at most once.
//!
//! ## Rendering a styled QR code
//!
//! ```rust
//! use qrnexus::styling::{render, DataStyle, QrStyle};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let style = QrStyle { data_style: DataStyle::Rounded, ..QrStyle::default() };
//! let canvas = render::render("https://example.com", &style)?;
//! let data_url = render::to_data_url(&canvas)?;
//! assert!(data_url.starts_with("data:image/png;base64,"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Tracking URLs
//!
//! ```rust
//! use qrnexus::tracker::{decode_tracking_url, encode_tracking_url};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let url = encode_tracking_url("https://track.qrnexus.site", "abc123", "https://example.com")?;
//! let decoded = decode_tracking_url(&url)?;
//! assert_eq!(decoded.identifier, "abc123");
//! assert_eq!(decoded.destination.as_deref(), Some("https://example.com"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod matrix;
pub mod server;
pub mod styling;
pub mod tracker;

pub use error::{RenderError, RenderResult, TrackError, TrackResult};
pub use matrix::ModuleMatrix;
pub use styling::QrStyle;
