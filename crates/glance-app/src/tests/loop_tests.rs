//! Loop controller behavior: single-flight guard, timer teardown, stale
//! result discard, session/region lifecycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use glance_capture::{
    CaptureBackend, CaptureError, CaptureSession, CaptureStream, RawFrame, SourceId,
};
use glance_config::Config;
use glance_inference::{InferenceClient, InferenceError, InlineImage};
use glance_types::{AppEvent, CommittedRegion, CropRegion};
use kanal::AsyncReceiver;

use crate::ctx::EventContext;
use crate::events::auto_loop::handle_toggle_auto;
use crate::events::start_capture::handle_start_capture;
use crate::events::stop_capture::handle_stop_capture;
use crate::events::translate_frame::handle_frame_translate;
use crate::state::AppState;

struct FakeStream {
    width: u32,
    height: u32,
    ended: Arc<AtomicBool>,
}

impl FakeStream {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ended: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl CaptureStream for FakeStream {
    fn intrinsic_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn grab(&self) -> Result<RawFrame, CaptureError> {
        if self.ended.load(Ordering::SeqCst) {
            return Err(CaptureError::SourceEnded);
        }
        Ok(RawFrame {
            width: self.width,
            height: self.height,
            data: vec![0u8; (self.width * self.height * 4) as usize],
        })
    }
}

struct FakeBackend;

impl CaptureBackend for FakeBackend {
    fn sources(&self) -> Result<Vec<glance_capture::SourceInfo>, CaptureError> {
        Ok(vec![])
    }

    fn open(&self, _source: Option<SourceId>) -> Result<Box<dyn CaptureStream>, CaptureError> {
        Ok(Box::new(FakeStream::new(64, 48)))
    }
}

struct FakeClient {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay_ms: u64,
    reply: String,
}

impl FakeClient {
    fn new(delay_ms: u64, reply: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay_ms,
            reply: reply.to_string(),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl InferenceClient for FakeClient {
    async fn translate_text(
        &self,
        text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> Result<String, InferenceError> {
        Ok(text.to_string())
    }

    async fn edit_image(
        &self,
        _image: &InlineImage,
        _instruction: &str,
    ) -> Result<InlineImage, InferenceError> {
        Err(InferenceError::MissingImagePart)
    }

    async fn analyze_image(
        &self,
        _image: &InlineImage,
        _question: Option<&str>,
    ) -> Result<String, InferenceError> {
        Ok("a description".to_string())
    }

    async fn translate_screen_frame(&self, _image: &InlineImage, _target_lang: &str) -> String {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

fn test_ctx(client: Arc<FakeClient>) -> (EventContext, AsyncReceiver<AppEvent>) {
    let (tx, rx) = kanal::bounded_async(256);
    let state = Arc::new(AppState::new(Config::default()));
    let backend: Arc<dyn CaptureBackend> = Arc::new(FakeBackend);
    let client: Arc<dyn InferenceClient> = client;
    (EventContext::new(state, tx, backend, Some(client)), rx)
}

async fn install_session(ctx: &EventContext) -> (Arc<CaptureSession>, Arc<AtomicBool>) {
    let generation = ctx.state.session_seq.fetch_add(1, Ordering::SeqCst) + 1;
    let stream = FakeStream::new(64, 48);
    let ended = stream.ended.clone();
    let session = Arc::new(CaptureSession::from_stream(Box::new(stream), generation));
    *ctx.state.session.write().await = Some(session.clone());
    (session, ended)
}

#[tokio::test]
async fn busy_guard_allows_only_one_in_flight_request() {
    let client = FakeClient::new(150, "hello");
    let (ctx, _rx) = test_ctx(client.clone());
    install_session(&ctx).await;

    let ctx2 = ctx.clone();
    let (a, b) = tokio::join!(
        handle_frame_translate(&ctx, true),
        handle_frame_translate(&ctx2, true),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(client.calls(), 1);
    assert_eq!(client.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn trigger_while_busy_is_dropped_not_queued() {
    let client = FakeClient::new(0, "hi");
    let (ctx, _rx) = test_ctx(client.clone());
    install_session(&ctx).await;

    ctx.state.busy.store(true, Ordering::SeqCst);
    handle_frame_translate(&ctx, true).await.unwrap();

    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn manual_trigger_rejected_while_auto_running() {
    let client = FakeClient::new(0, "hi");
    let (ctx, _rx) = test_ctx(client.clone());
    install_session(&ctx).await;

    ctx.state.auto_running.store(true, Ordering::SeqCst);
    handle_frame_translate(&ctx, true).await.unwrap();

    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn stopping_capture_cancels_timer() {
    let client = FakeClient::new(0, "tick");
    let (ctx, _rx) = test_ctx(client.clone());
    install_session(&ctx).await;
    ctx.state.config.write().await.capture.auto_interval_ms = 40;

    handle_toggle_auto(&ctx).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(client.calls() >= 1, "timer should have fired");

    handle_stop_capture(&ctx, "stopped").await.unwrap();
    // let any in-flight tick drain
    tokio::time::sleep(Duration::from_millis(60)).await;
    let after_stop = client.calls();

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(client.calls(), after_stop, "no ticks may fire after stop");
    assert!(!ctx.state.auto_running.load(Ordering::SeqCst));
    assert!(ctx.state.session.read().await.is_none());
}

#[tokio::test]
async fn auto_restart_uses_a_clean_timer() {
    let client = FakeClient::new(0, "tick");
    let (ctx, _rx) = test_ctx(client.clone());
    install_session(&ctx).await;
    ctx.state.config.write().await.capture.auto_interval_ms = 40;

    handle_toggle_auto(&ctx).await.unwrap();
    tokio::time::sleep(Duration::from_millis(90)).await;

    // off
    handle_toggle_auto(&ctx).await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    let idle = client.calls();
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(client.calls(), idle, "no residual firing while off");

    // on again: exactly one timer, no double-firing from the old instance
    handle_toggle_auto(&ctx).await.unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(client.calls() > idle);
    assert_eq!(client.max_in_flight.load(Ordering::SeqCst), 1);

    handle_stop_capture(&ctx, "done").await.unwrap();
}

#[tokio::test]
async fn late_result_for_replaced_session_is_discarded() {
    let client = FakeClient::new(120, "stale");
    let (ctx, rx) = test_ctx(client.clone());
    install_session(&ctx).await;

    let task_ctx = ctx.clone();
    let task = tokio::spawn(async move { handle_frame_translate(&task_ctx, true).await });

    // while the request is in flight, a newer session replaces the old one
    tokio::time::sleep(Duration::from_millis(30)).await;
    let generation = ctx.state.session_seq.fetch_add(1, Ordering::SeqCst) + 1;
    let replacement = Arc::new(CaptureSession::from_stream(
        Box::new(FakeStream::new(64, 48)),
        generation,
    ));
    *ctx.state.session.write().await = Some(replacement);

    task.await.unwrap().unwrap();

    assert_eq!(client.calls(), 1);
    assert!(
        ctx.state.latest.read().await.is_none(),
        "stale result must not be committed"
    );
    while let Ok(Some(event)) = rx.try_recv() {
        assert!(
            !matches!(event, AppEvent::ShowTranslation(_)),
            "stale result must not be published"
        );
    }
}

#[tokio::test]
async fn result_commits_for_live_session() {
    let client = FakeClient::new(10, "fresh");
    let (ctx, rx) = test_ctx(client.clone());
    install_session(&ctx).await;

    handle_frame_translate(&ctx, true).await.unwrap();

    let latest = ctx.state.latest.read().await.clone();
    assert_eq!(latest.expect("result committed").text, "fresh");

    let mut published = false;
    while let Ok(Some(event)) = rx.try_recv() {
        if let AppEvent::ShowTranslation(result) = event {
            assert_eq!(result.text, "fresh");
            published = true;
        }
    }
    assert!(published);
}

#[tokio::test]
async fn starting_new_session_resets_crop_region() {
    let client = FakeClient::new(0, "x");
    let (ctx, rx) = test_ctx(client);

    *ctx.state.crop_region.write().await = Some(CommittedRegion {
        region: CropRegion {
            x: 10.0,
            y: 10.0,
            width: 100.0,
            height: 100.0,
        },
        viewport_width: 800.0,
        viewport_height: 600.0,
    });

    handle_start_capture(&ctx).await.unwrap();

    assert!(ctx.state.crop_region.read().await.is_none());
    assert!(ctx.state.session.read().await.is_some());

    let mut started = false;
    while let Ok(Some(event)) = rx.try_recv() {
        if let AppEvent::CaptureStarted { width, height } = event {
            assert_eq!((width, height), (64, 48));
            started = true;
        }
    }
    assert!(started);
}

#[tokio::test]
async fn platform_ending_the_stream_tears_the_session_down() {
    let client = FakeClient::new(0, "x");
    let (ctx, rx) = test_ctx(client.clone());
    let (_session, ended) = install_session(&ctx).await;

    ended.store(true, Ordering::SeqCst);
    handle_frame_translate(&ctx, true).await.unwrap();

    assert_eq!(client.calls(), 0);
    assert!(ctx.state.session.read().await.is_none());
    assert!(!ctx.state.auto_running.load(Ordering::SeqCst));

    let mut notified = false;
    while let Ok(Some(event)) = rx.try_recv() {
        if let AppEvent::StatusUpdate { capturing, .. } = event {
            assert!(!capturing);
            notified = true;
        }
    }
    assert!(notified);
}
