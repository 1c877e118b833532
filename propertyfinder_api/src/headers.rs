//! Browser-like request headers.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use url::Url;

use crate::user_agent::{get_user_agent, SEC_CH_UA};
use crate::Error;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// Returns the site root used as referer, e.g. `https://www.propertyfinder.ae/`.
///
/// Only `http` and `https` URLs with a host have one.
pub fn referer_for(url: &Url) -> Option<String> {
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    Some(format!("{}/", url.origin().ascii_serialization()))
}

/// Builds the header set sent with every request to `url`.
///
/// Pure: the same URL always yields the same headers.
pub fn request_headers(url: &Url) -> Result<HeaderMap, Error> {
    let referer = referer_for(url).ok_or_else(|| Error::InvalidUrl {
        url: url.to_string(),
        reason: "expected an http(s) URL with a host".into(),
    })?;
    let referer = HeaderValue::from_str(&referer).map_err(|e| Error::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(REFERER, referer);
    headers.insert(
        HeaderName::from_static("sec-ch-ua"),
        HeaderValue::from_static(SEC_CH_UA),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static(get_user_agent()));
    Ok(headers)
}
