//! Text-input path flow: validate, request, render, optionally revert.

use crate::{
    ControllerSettings, CoreResult, ImageRole, NavError, NoticeStyle, PathRequest, PathService,
    PathView, Rendered, controller::render::ResponseRenderer,
};

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Pending revert-to-placeholder for one submission.
struct AutoClearTimer {
    submission: u64,
    handle: JoinHandle<()>,
}

/// Coordinates path submissions between the path service and the view.
///
/// Overlapping submissions are not serialized: whichever response resolves
/// last owns the view.
pub struct PathRequestController<S, V> {
    service: Arc<S>,
    view: Arc<V>,
    renderer: ResponseRenderer<S, V>,
    settings: ControllerSettings,
    submissions: AtomicU64,
    auto_clear: Mutex<Option<AutoClearTimer>>,
}

impl<S: PathService, V: PathView> PathRequestController<S, V> {
    /// Build a controller over a shared service and view.
    pub fn new(service: Arc<S>, view: Arc<V>, settings: ControllerSettings) -> Self {
        let renderer = ResponseRenderer::new(
            Arc::clone(&service),
            Arc::clone(&view),
            settings.show_graph_after_route,
        );

        Self {
            service,
            view,
            renderer,
            settings,
            submissions: AtomicU64::new(0),
            auto_clear: Mutex::new(None),
        }
    }

    /// Display text and timing in effect.
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Validate the raw fields and submit them.
    ///
    /// Blank input is reported through the view and never reaches the
    /// network. Request failures are rendered as a status message and also
    /// returned so the caller can log them.
    #[instrument(skip(self))]
    pub async fn submit_path(&self, start: &str, end: &str) -> CoreResult<Rendered> {
        let request = match PathRequest::new(start, end) {
            Ok(request) => request,
            Err(e) => {
                self.notify_invalid(&e);
                return Err(e);
            }
        };

        self.submit(request).await
    }

    /// Submit an already validated request.
    #[instrument(skip(self, request), fields(start = %request.start(), end = %request.end()))]
    pub async fn submit(&self, request: PathRequest) -> CoreResult<Rendered> {
        let submission = self.submissions.fetch_add(1, Ordering::AcqRel) + 1;
        self.cancel_auto_clear();

        self.view.show_status(&self.settings.processing_text);

        let result = match self.service.request_path(&request).await {
            Ok(response) => self.renderer.render(response).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(rendered) => info!(submission, rendered = ?rendered, "Submission rendered"),
            Err(e) => {
                warn!(submission, error = %e, "Submission failed");
                self.view.show_status(&e.user_message());
            }
        }

        self.arm_auto_clear(submission);

        result
    }

    /// Fetch and show the static map (initial display).
    #[instrument(skip(self))]
    pub async fn load_graph_image(&self) -> CoreResult<()> {
        self.supersede_auto_clear();

        match self.service.graph_image().await {
            Ok(image) => {
                self.view.show_image(&image, ImageRole::GraphMap);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Graph image load failed");
                self.view.show_status(&e.user_message());
                Err(e)
            }
        }
    }

    /// Fetch and show the map of one floor.
    #[instrument(skip(self))]
    pub async fn load_level_map(&self, level: &str) -> CoreResult<()> {
        self.supersede_auto_clear();

        match self.service.level_image(level).await {
            Ok(image) => {
                self.view.show_image(&image, ImageRole::GraphMap);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Level map load failed");
                self.view.show_status(&e.user_message());
                Err(e)
            }
        }
    }

    /// Drop any pending revert so it cannot clobber a newer render.
    pub fn cancel_auto_clear(&self) {
        let pending = self
            .auto_clear
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        if let Some(timer) = pending {
            timer.handle.abort();
            debug!(submission = timer.submission, "Auto-clear cancelled");
        }
    }

    /// A user-requested map replaces the last submission's output, so its
    /// timer must not fire and an in-flight submission must not arm one.
    fn supersede_auto_clear(&self) {
        self.submissions.fetch_add(1, Ordering::AcqRel);
        self.cancel_auto_clear();
    }

    fn notify_invalid(&self, error: &NavError) {
        let message = error.user_message();
        match self.settings.validation_notice {
            NoticeStyle::Alert => self.view.alert(&message),
            NoticeStyle::Inline => self.view.show_status(&message),
        }
    }

    fn arm_auto_clear(&self, submission: u64) {
        let Some(delay) = self.settings.auto_clear else {
            return;
        };

        let mut slot = self.auto_clear.lock().unwrap_or_else(|e| e.into_inner());

        // A newer submission already started; it will arm its own timer.
        if self.submissions.load(Ordering::Acquire) != submission {
            return;
        }

        if let Some(previous) = slot.take() {
            previous.handle.abort();
        }

        let view = Arc::clone(&self.view);
        let placeholder = self.settings.placeholder_text.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            view.show_placeholder(&placeholder);
            debug!(submission, "Auto-clear fired");
        });

        *slot = Some(AutoClearTimer { submission, handle });
    }
}
