use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use invite_engine::config::PreloaderConfig;
use invite_engine::detect::asset::{descriptors, AssetDescriptor};
use invite_engine::engine::preloader::{PreloadState, Preloader};
use invite_engine::engine::sink::RecordingSink;
use invite_engine::source::http_probe::HttpProbe;
use invite_engine::source::traits::{AssetProbe, ProbeOutcome};

const PROBE_BYTES: u64 = 1024;

fn png_body() -> Vec<u8> {
    let mut body = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    body.extend_from_slice(&[0u8; 512]);
    body
}

fn mp4_body() -> Vec<u8> {
    let mut body = vec![0u8; 8 * 1024];
    body[0..4].copy_from_slice(&24u32.to_be_bytes());
    body[4..8].copy_from_slice(b"ftyp");
    body[24..28].copy_from_slice(&512u32.to_be_bytes());
    body[28..32].copy_from_slice(b"moov");
    body
}

async fn serve_png() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], png_body())
}

async fn serve_empty_png() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], Vec::<u8>::new())
}

/// Only answers ranged requests.
async fn serve_mp4(req: Request) -> impl IntoResponse {
    let body = mp4_body();
    let total = body.len() as u64;

    let range = req
        .headers()
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("bytes="))
        .and_then(|v| v.split_once('-'))
        .and_then(|(s, e)| Some((s.parse::<u64>().ok()?, e.parse::<u64>().ok()?)));

    match range {
        Some((start, end)) => {
            let end = end.min(total - 1);
            let slice = body[start as usize..=end as usize].to_vec();
            (
                StatusCode::PARTIAL_CONTENT,
                [
                    (header::CONTENT_TYPE, "video/mp4".to_string()),
                    (header::CONTENT_RANGE, format!("bytes {}-{}/{}", start, end, total)),
                ],
                slice,
            )
                .into_response()
        }
        None => (StatusCode::BAD_REQUEST, "range required").into_response(),
    }
}

/// Ignores Range and sends the whole file.
async fn serve_webm() -> impl IntoResponse {
    let mut body = vec![0u8; 1024 * 1024];
    body[0..4].copy_from_slice(&[0x1A, 0x45, 0xDF, 0xA3]);
    ([(header::CONTENT_TYPE, "video/webm")], body)
}

async fn serve_html_as_video() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html")], "<html>not a video</html>")
}

async fn start_server() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route("/media/photo.png", get(serve_png))
        .route("/media/empty.png", get(serve_empty_png))
        .route("/media/clip.mp4", get(serve_mp4))
        .route("/media/big.webm", get(serve_webm))
        .route("/media/fake.mp4", get(serve_html_as_video));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}

fn probe_for(addr: SocketAddr) -> HttpProbe {
    HttpProbe::new(&format!("http://{}", addr), PROBE_BYTES).unwrap()
}

#[tokio::test]
async fn test_image_ready() {
    let (addr, _handle) = start_server().await;
    let probe = probe_for(addr);

    let outcome = probe.probe(&AssetDescriptor::new("/media/photo.png")).await;
    assert_eq!(outcome, ProbeOutcome::Ready);
}

#[tokio::test]
async fn test_missing_and_empty_images_fail_without_error() {
    let (addr, _handle) = start_server().await;
    let probe = probe_for(addr);

    let missing = probe.probe(&AssetDescriptor::new("/media/missing.png")).await;
    assert!(matches!(missing, ProbeOutcome::Failed(ref reason) if reason.contains("404")));

    let empty = probe.probe(&AssetDescriptor::new("/media/empty.png")).await;
    assert!(!empty.ok());
}

#[tokio::test]
async fn test_video_metadata_uses_range() {
    let (addr, _handle) = start_server().await;
    let probe = probe_for(addr);

    let outcome = probe.probe(&AssetDescriptor::new("/media/clip.mp4")).await;
    assert_eq!(outcome, ProbeOutcome::Ready);
}

#[tokio::test]
async fn test_video_without_range_support_stops_at_limit() {
    let (addr, _handle) = start_server().await;
    let probe = probe_for(addr);

    let outcome = probe.probe(&AssetDescriptor::new("/media/big.webm")).await;
    assert_eq!(outcome, ProbeOutcome::Ready);
}

#[tokio::test]
async fn test_unrecognized_video_fails() {
    let (addr, _handle) = start_server().await;
    let probe = probe_for(addr);

    let outcome = probe.probe(&AssetDescriptor::new("/media/fake.mp4")).await;
    assert!(!outcome.ok());
}

#[tokio::test]
async fn test_absolute_urls_bypass_base() {
    let (addr, _handle) = start_server().await;
    let probe = HttpProbe::new("http://127.0.0.1:1", PROBE_BYTES).unwrap();

    let url = format!("http://{}/media/photo.png", addr);
    assert_eq!(probe.probe(&AssetDescriptor::new(url)).await, ProbeOutcome::Ready);
}

#[tokio::test]
async fn test_preload_over_http_completes_despite_failures() {
    let (addr, _handle) = start_server().await;
    let probe = Arc::new(probe_for(addr));
    let config = PreloaderConfig {
        settle_delay_ms: 10,
        finish_delay_ms: 10,
        ..PreloaderConfig::default()
    };
    let preloader = Preloader::new(probe, config);
    let sink = Arc::new(RecordingSink::new());

    let list = descriptors([
        "/media/clip.mp4",
        "/media/missing.mp4",
        "/media/photo.png",
        "/media/missing.png",
    ]);
    let state = preloader.run(list, sink.clone()).await.unwrap();

    assert_eq!(state, PreloadState::Completed);
    assert_eq!(sink.progress_values(), vec![25, 50, 75, 100]);
    assert_eq!(sink.completions(), 1);
}
