//! Fakes standing in for the screen, the model API, the GUI thread and the
//! notification service

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use glimpse_capture::{Capture, ScreenSource};
use glimpse_config::Config;
use glimpse_config::hotkeys::HotkeyProfile;
use glimpse_types::{Point, StreamUpdate};
use glimpse_ui::{Notifier, SelectionReply, Toaster, UiRequest, ui_channel};
use glimpse_vision::{VisionClient, VisionError, VisionRequest};
use image::{Rgba, RgbaImage};
use kanal::AsyncReceiver;

use crate::context::ActivationContext;
use crate::state::AppState;

pub const BACKGROUND: Rgba<u8> = Rgba([30, 60, 90, 255]);

pub struct FakeScreen {
    pub fail: bool,
}

impl ScreenSource for FakeScreen {
    fn capture(&self) -> anyhow::Result<Capture> {
        anyhow::ensure!(!self.fail, "no display attached");
        Ok(Capture {
            image: RgbaImage::from_pixel(200, 200, BACKGROUND),
            origin: Point::new(-1280, 0),
        })
    }
}

pub struct FakeVision {
    reply: Result<String, String>,
    chunks: Vec<String>,
    pub requests: Mutex<Vec<VisionRequest>>,
    calls: AtomicUsize,
}

impl FakeVision {
    fn build(reply: Result<String, String>, chunks: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            reply,
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn answering(text: &str) -> Arc<Self> {
        Self::build(Ok(text.to_string()), &[])
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::build(Err(message.to_string()), &[])
    }

    /// Streams `chunks`, then ends with `Done` or, given an error, `Failed`
    pub fn streaming(chunks: &[&str], error: Option<&str>) -> Arc<Self> {
        let reply = match error {
            Some(message) => Err(message.to_string()),
            None => Ok(chunks.concat()),
        };
        Self::build(reply, chunks)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, request: &VisionRequest) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
    }

    fn error(message: &str) -> VisionError {
        VisionError::ApiError {
            status: 500,
            body: message.to_string(),
        }
    }
}

#[async_trait]
impl VisionClient for FakeVision {
    async fn ask(&self, request: &VisionRequest) -> Result<String, VisionError> {
        self.record(request);
        self.reply.clone().map_err(|m| Self::error(&m))
    }

    async fn ask_streaming(
        &self,
        request: &VisionRequest,
        updates: kanal::AsyncSender<StreamUpdate>,
    ) -> Result<String, VisionError> {
        self.record(request);

        let mut text = String::new();
        for chunk in &self.chunks {
            text.push_str(chunk);
            let _ = updates.send(StreamUpdate::Text(text.clone())).await;
        }

        match &self.reply {
            Ok(_) => {
                let _ = updates.send(StreamUpdate::Done).await;
                Ok(text)
            }
            Err(message) => {
                let error = Self::error(message);
                let _ = updates.send(StreamUpdate::Failed(error.to_string())).await;
                Err(error)
            }
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

#[derive(Default)]
pub struct RecordingToaster {
    pub shown: Mutex<Vec<(String, String)>>,
}

impl RecordingToaster {
    pub fn titles(&self) -> Vec<String> {
        self.shown.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }
}

impl Toaster for RecordingToaster {
    fn toast(&self, title: &str, body: &str) -> anyhow::Result<()> {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }
}

/// What the fake GUI thread was asked to do
#[derive(Clone, Default)]
pub struct UiLog {
    pub selections: Arc<Mutex<Vec<(String, bool)>>>,
    pub popups: Arc<Mutex<Vec<(String, String)>>>,
    /// Where each overlay was asked to open
    pub origins: Arc<Mutex<Vec<Point>>>,
}

/// Answer every selection with `answer`, record popups and hand finished
/// streams to the returned receiver
fn spawn_fake_ui(
    rx: AsyncReceiver<UiRequest>,
    answer: SelectionReply,
) -> (UiLog, AsyncReceiver<(String, Vec<StreamUpdate>)>) {
    let log = UiLog::default();
    let (streams_tx, streams_rx) = kanal::unbounded_async();

    let task_log = log.clone();
    tokio::spawn(async move {
        while let Ok(request) = rx.recv().await {
            match request {
                UiRequest::SelectRegion {
                    origin,
                    label,
                    annotate,
                    reply,
                    ..
                } => {
                    task_log.selections.lock().unwrap().push((label, annotate));
                    task_log.origins.lock().unwrap().push(origin);
                    let _ = reply.send(answer.clone()).await;
                }
                UiRequest::ShowPopup { title, text } => {
                    task_log.popups.lock().unwrap().push((title, text));
                }
                UiRequest::OpenStream { title, updates } => {
                    let streams_tx = streams_tx.clone();
                    tokio::spawn(async move {
                        let mut seen = Vec::new();
                        while let Ok(update) = updates.recv().await {
                            let terminal = update.is_terminal();
                            seen.push(update);
                            if terminal {
                                break;
                            }
                        }
                        let _ = streams_tx.send((title, seen)).await;
                    });
                }
                UiRequest::Shutdown => break,
            }
        }
    });

    (log, streams_rx)
}

pub struct Harness {
    pub context: ActivationContext,
    pub vision: Arc<FakeVision>,
    pub toaster: Arc<RecordingToaster>,
    pub ui: UiLog,
    pub streams: AsyncReceiver<(String, Vec<StreamUpdate>)>,
}

pub fn harness(vision: Arc<FakeVision>, selection: SelectionReply, screen_fails: bool) -> Harness {
    let mut config = Config::default();
    config.notification.retry_delay_ms = 1;

    let mut clients: HashMap<String, Arc<dyn VisionClient>> = HashMap::new();
    clients.insert(config.api.default_provider.clone(), vision.clone());

    let toaster = Arc::new(RecordingToaster::default());
    let (ui, ui_rx) = ui_channel();
    let notifier = Notifier::new(ui.clone(), toaster.clone(), config.notification.clone());
    let state = Arc::new(AppState::new(
        config,
        Arc::new(FakeScreen { fail: screen_fails }),
        clients,
    ));
    let (log, streams) = spawn_fake_ui(ui_rx, selection);

    Harness {
        context: ActivationContext::new(state, ui, notifier),
        vision,
        toaster,
        ui: log,
        streams,
    }
}

pub fn profile(stream: bool, draw_box: bool) -> HotkeyProfile {
    HotkeyProfile {
        hotkey: "ctrl+shift+9".to_string(),
        name: "Answer".to_string(),
        prompt: "Answer the question in the image.".to_string(),
        model: "test/vision-model".to_string(),
        provider: None,
        draw_box,
        stream,
    }
}

/// Poll `condition` until it holds or two seconds pass
pub async fn wait_for(condition: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
