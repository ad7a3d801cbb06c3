//! Responses the worker synthesizes when neither network nor cache can
//! answer. Neither is ever written to a cache.

use super::http::Response;
use maud::{DOCTYPE, html};

pub const NETWORK_ERROR_STATUS: u16 = 408;

/// Minimal HTML page served to navigations when nothing else is available.
pub fn offline_document() -> Response {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Offline" }
            }
            body {
                h1 { "You are offline" }
                p { "Please check your internet connection." }
            }
        }
    };
    Response::new(200, markup.into_string())
        .with_header("Content-Type", "text/html; charset=utf-8")
}

/// Plain-text stand-in for a failed subresource fetch.
pub fn network_error() -> Response {
    Response::new(NETWORK_ERROR_STATUS, "Network error")
        .with_header("Content-Type", "text/plain; charset=utf-8")
}
