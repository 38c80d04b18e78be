//! Source tests: a local axum server for GitHub, temp files for disk.

use std::path::PathBuf;

use axum::{
  Json, Router,
  extract::Path,
  http::StatusCode,
  response::IntoResponse,
  routing::get,
};
use casetrack_core::{FetchError, source::DataSource};
use chrono::{TimeZone, Utc};
use serde_json::json;
use tokio::net::TcpListener;

use crate::{
  AnySource, FilePaths, FileSource, GitHubSource, SourceConfig,
  config::{GLOBAL_CONFIRMED_FILE, GLOBAL_DEATHS_FILE, REGION_DEATHS_FILE},
};

// ─── GitHub ──────────────────────────────────────────────────────────────────

async fn csv_file(Path(file): Path<String>) -> impl IntoResponse {
  match file.as_str() {
    GLOBAL_CONFIRMED_FILE => (StatusCode::OK, "confirmed global".to_owned()),
    REGION_DEATHS_FILE => (StatusCode::OK, "deaths us".to_owned()),
    _ => (StatusCode::NOT_FOUND, String::new()),
  }
}

async fn serve(app: Router) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
  format!("http://{addr}")
}

/// Serve fake upstream endpoints and return the base URL.
async fn upstream() -> String {
  let app = Router::new()
    .route("/series/{file}", get(csv_file))
    .route(
      "/commits",
      get(|| async {
        Json(json!([
          { "sha": "abc", "commit": { "author": { "name": "x", "date": "2020-04-01T08:00:00Z" } } }
        ]))
      }),
    )
    .route("/commits/empty", get(|| async { Json(json!([])) }))
    .route("/commits/garbage", get(|| async { "not json" }));

  serve(app).await
}

fn github(base: &str, commits: &str) -> GitHubSource {
  GitHubSource::with_urls(format!("{base}/series/"), format!("{base}{commits}")).unwrap()
}

#[tokio::test]
async fn github_fetches_files_by_name() {
  let source = github(&upstream().await, "/commits");
  assert_eq!(source.global_confirmed().await.unwrap(), "confirmed global");
  assert_eq!(source.region_deaths().await.unwrap(), "deaths us");
}

#[tokio::test]
async fn github_status_error_carries_detail() {
  let source = github(&upstream().await, "/commits");
  match source.global_recovered().await {
    Err(FetchError::Status { url, status, reason }) => {
      assert!(url.ends_with("/series/time_series_covid19_recovered_global.csv"));
      assert_eq!(status, 404);
      assert_eq!(reason, "Not Found");
    }
    other => panic!("expected a status error, got {other:?}"),
  }
}

#[tokio::test]
async fn github_reads_latest_commit_date() {
  let source = github(&upstream().await, "/commits");
  let at = source.source_updated_at().await.unwrap();
  assert_eq!(at, Some(Utc.with_ymd_and_hms(2020, 4, 1, 8, 0, 0).unwrap()));
}

#[tokio::test]
async fn github_commit_listing_edge_cases() {
  let base = upstream().await;

  let empty = github(&base, "/commits/empty");
  assert_eq!(empty.source_updated_at().await.unwrap(), None);

  let garbage = github(&base, "/commits/garbage");
  assert!(matches!(
    garbage.source_updated_at().await,
    Err(FetchError::Decode { .. })
  ));
}

#[tokio::test]
async fn github_unreachable_host_is_a_transport_error() {
  // Bind then drop to get a port nothing listens on.
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let source =
    GitHubSource::with_urls(format!("http://{addr}/"), format!("http://{addr}/c")).unwrap();
  let err = source.global_deaths().await.unwrap_err();
  assert!(matches!(err, FetchError::Transport { .. }));
}

// ─── Files ───────────────────────────────────────────────────────────────────

fn temp_dir() -> PathBuf {
  let dir = std::env::temp_dir().join(format!("casetrack-source-{}", uuid::Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  dir
}

#[tokio::test]
async fn files_read_each_path() {
  let dir = temp_dir();
  let paths = FilePaths::in_dir(&dir);
  std::fs::write(&paths.global_confirmed, "gc").unwrap();
  std::fs::write(&paths.region_confirmed, "rc").unwrap();

  let source = FileSource::new(paths);
  assert_eq!(source.global_confirmed().await.unwrap(), "gc");
  assert_eq!(source.region_confirmed().await.unwrap(), "rc");
  assert_eq!(source.source_updated_at().await.unwrap(), None);

  std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
  let dir = temp_dir();
  let source = FileSource::new(FilePaths::in_dir(&dir));

  match source.global_deaths().await {
    Err(FetchError::Io { path, source }) => {
      assert_eq!(path, dir.join(GLOBAL_DEATHS_FILE));
      assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
    }
    other => panic!("expected an io error, got {other:?}"),
  }

  std::fs::remove_dir_all(dir).unwrap();
}

// ─── AnySource ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn any_source_dispatches_on_config() {
  let dir = temp_dir();
  let paths = FilePaths::in_dir(&dir);
  std::fs::write(&paths.global_recovered, "gr").unwrap();

  let source = AnySource::from_config(&SourceConfig::Files(paths)).unwrap();
  assert!(matches!(source, AnySource::Files(_)));
  assert_eq!(source.global_recovered().await.unwrap(), "gr");

  let github = AnySource::from_config(&SourceConfig::default()).unwrap();
  assert!(matches!(github, AnySource::GitHub(_)));

  std::fs::remove_dir_all(dir).unwrap();
}
