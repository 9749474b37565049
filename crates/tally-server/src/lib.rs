//! HTTP shell for Tally: configuration and the top-level router.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use serde::Deserialize;
use tally_core::{
  directory::{Directory, DirectoryOptions},
  store::DirectoryStore,
};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TALLY_*` environment variables. Every field has a default.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub max_update_retries: u32,
  pub demo_fallback:      bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    let options = DirectoryOptions::default();
    Self {
      host:               "127.0.0.1".into(),
      port:               8080,
      store_path:         PathBuf::from("~/.local/share/tally/tally.db"),
      max_update_retries: options.max_update_retries,
      demo_fallback:      options.demo_fallback,
    }
  }
}

impl ServerConfig {
  pub fn directory_options(&self) -> DirectoryOptions {
    DirectoryOptions {
      max_update_retries: self.max_update_retries,
      demo_fallback:      self.demo_fallback,
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router: the JSON API under `/api`, with a
/// per-request tracing span.
pub fn router<S>(directory: Arc<Directory<S>>) -> Router
where
  S: DirectoryStore + 'static,
{
  Router::new()
    .nest("/api", tally_api::api_router(directory))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tally_core::directory::Directory;
  use tally_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  #[test]
  fn config_defaults_match_directory_defaults() {
    let cfg = ServerConfig::default();
    let opts = cfg.directory_options();
    assert_eq!(opts.max_update_retries, DirectoryOptions::default().max_update_retries);
    assert!(opts.demo_fallback);
    assert_eq!(cfg.address(), "127.0.0.1:8080");
  }

  #[test]
  fn partial_config_keeps_defaults() {
    let settings = config::Config::builder()
      .set_override("port", 9000)
      .unwrap()
      .set_override("demo_fallback", false)
      .unwrap()
      .build()
      .unwrap();
    let cfg: ServerConfig = settings.try_deserialize().unwrap();
    assert_eq!(cfg.port, 9000);
    assert!(!cfg.demo_fallback);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.max_update_retries, 5);
  }

  #[tokio::test]
  async fn api_is_nested_under_prefix() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let directory = Arc::new(Directory::new(store, DirectoryOptions::default()));

    let resp = router(directory.clone())
      .oneshot(Request::get("/api/courses").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body[0]["is_demo"], true);

    let resp = router(directory)
      .oneshot(Request::get("/courses").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
