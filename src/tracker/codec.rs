use url::Url;

use crate::error::{TrackError, TrackResult};

// Tracking URL codec
//------------------------------------------------------------------------------

/// Parts recovered from a tracking URL.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DecodedTrackingUrl {
    pub identifier: String,
    /// Percent-decoded `redirect` query parameter. Absent when the caller
    /// should fall back to the record's stored content.
    pub destination: Option<String>,
}

/// Builds `{base}/track/{identifier}?redirect={encoded destination}`.
pub fn encode_tracking_url(base: &str, identifier: &str, destination: &str) -> TrackResult<String> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| TrackError::InvalidBase)?
        .pop_if_empty()
        .push("track")
        .push(identifier);
    url.query_pairs_mut().append_pair("redirect", destination);
    Ok(url.to_string())
}

/// Inverse of [`encode_tracking_url`]: the identifier is the last path
/// segment, the destination the decoded `redirect` parameter.
pub fn decode_tracking_url(raw: &str) -> TrackResult<DecodedTrackingUrl> {
    let url = Url::parse(raw)?;
    let identifier = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .ok_or(TrackError::MissingIdentifier)?;
    let destination = url
        .query_pairs()
        .find(|(key, _)| key == "redirect")
        .map(|(_, value)| value.into_owned());
    Ok(DecodedTrackingUrl { identifier, destination })
}
