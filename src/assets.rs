//! Static files compiled into the binary and served under `/static/`

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::debug;

/// One embedded file
#[derive(Debug)]
pub struct Asset {
    pub name: &'static str,
    pub content_type: &'static str,
    pub body: &'static [u8],
}

static ASSETS: &[Asset] = &[
    Asset {
        name: "style.css",
        content_type: "text/css; charset=utf-8",
        body: include_bytes!("../static/style.css"),
    },
    Asset {
        name: "charts.js",
        content_type: "text/javascript; charset=utf-8",
        body: include_bytes!("../static/charts.js"),
    },
    Asset {
        name: "favicon.svg",
        content_type: "image/svg+xml",
        body: include_bytes!("../static/favicon.svg"),
    },
];

pub fn lookup(name: &str) -> Option<&'static Asset> {
    ASSETS.iter().find(|asset| asset.name == name)
}

pub async fn serve_asset(Path(name): Path<String>) -> Response {
    match lookup(&name) {
        Some(asset) => ([(header::CONTENT_TYPE, asset.content_type)], asset.body).into_response(),
        None => {
            debug!("Unknown static asset requested: {}", name);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_asset_is_non_empty() {
        for asset in ASSETS {
            assert!(!asset.body.is_empty(), "{} is empty", asset.name);
            assert!(std::ptr::eq(lookup(asset.name).unwrap(), asset));
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("style.css").unwrap().content_type, "text/css; charset=utf-8");
        assert!(lookup("charts.js").is_some());
        assert!(lookup("../Cargo.toml").is_none());
        assert!(lookup("missing.png").is_none());
    }
}
