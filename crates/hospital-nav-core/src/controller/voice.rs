//! Voice command flow: record, upload, render.

use crate::{
    ControllerSettings, CoreResult, Microphone, NavError, PathService, PathView,
    RecordingSession, Rendered, VoiceStage, VoiceState,
    controller::{
        render::ResponseRenderer,
        settings::{PROCESSING_VOICE_TEXT, RECORDING_TEXT},
    },
};

use std::{panic::Location, sync::Arc, time::Instant};

use error_location::ErrorLocation;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Owns the microphone and the `Idle -> Recording -> Processing -> Idle`
/// state machine.
///
/// Transitions happen under the state lock, so two toggles never observe
/// the same state.
pub struct VoiceCommandController<S, M, V> {
    service: Arc<S>,
    view: Arc<V>,
    renderer: ResponseRenderer<S, V>,
    microphone: Mutex<M>,
    state: Mutex<VoiceState>,
}

impl<S: PathService, M: Microphone, V: PathView> VoiceCommandController<S, M, V> {
    /// Build an idle controller that owns the microphone.
    pub fn new(service: Arc<S>, microphone: M, view: Arc<V>, settings: &ControllerSettings) -> Self {
        let renderer = ResponseRenderer::new(
            Arc::clone(&service),
            Arc::clone(&view),
            settings.show_graph_after_route,
        );

        Self {
            service,
            view,
            renderer,
            microphone: Mutex::new(microphone),
            state: Mutex::new(VoiceState::Idle),
        }
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> VoiceState {
        *self.state.lock().await
    }

    /// Advance the state machine one step.
    ///
    /// From `Idle` this starts recording; from `Recording` it stops, uploads,
    /// renders, and returns once the controller is back in `Idle`. While
    /// `Processing` the toggle is rejected with [`NavError::Busy`].
    #[instrument(skip(self))]
    pub async fn toggle(&self) -> CoreResult<VoiceStage> {
        let mut state = self.state.lock().await;
        let current = *state;

        match current {
            VoiceState::Idle => {
                let session_id = Uuid::new_v4();

                if let Err(e) = self.microphone.lock().await.start(session_id) {
                    warn!(session_id = %session_id, error = %e, "Failed to start recording");
                    self.view.show_status(&e.user_message());
                    return Err(e);
                }

                *state = VoiceState::Recording {
                    started_at: Instant::now(),
                    session_id,
                };
                self.view.show_voice_stage(VoiceStage::Recording);
                self.view.show_status(RECORDING_TEXT);

                info!(session_id = %session_id, "Recording started");

                Ok(VoiceStage::Recording)
            }
            VoiceState::Recording { .. } => self.finish(state).await,
            VoiceState::Processing { session_id } => {
                let e = NavError::Busy {
                    location: ErrorLocation::from(Location::caller()),
                };
                warn!(session_id = %session_id, "Toggle ignored while processing");
                self.view.show_status(&e.user_message());
                Err(e)
            }
        }
    }

    /// Stop an active recording and submit it. Does nothing otherwise.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> CoreResult<VoiceStage> {
        let state = self.state.lock().await;
        let current = *state;
        match current {
            VoiceState::Recording { .. } => self.finish(state).await,
            other => Ok(other.stage()),
        }
    }

    /// Recording -> Processing -> Idle. Releases the state lock once the
    /// microphone is stopped so toggles during upload see `Processing`.
    async fn finish(&self, mut state: MutexGuard<'_, VoiceState>) -> CoreResult<VoiceStage> {
        let current = *state;
        let VoiceState::Recording {
            started_at,
            session_id,
        } = current
        else {
            return Ok(state.stage());
        };

        let session = self.microphone.lock().await.stop();

        *state = VoiceState::Processing { session_id };
        drop(state);

        info!(
            session_id = %session_id,
            duration_ms = started_at.elapsed().as_millis(),
            "Recording stopped"
        );

        self.process(session_id, session).await
    }

    async fn process(
        &self,
        session_id: Uuid,
        session: CoreResult<RecordingSession>,
    ) -> CoreResult<VoiceStage> {
        self.view.show_voice_stage(VoiceStage::Processing);
        self.view.show_status(PROCESSING_VOICE_TEXT);

        let result = self.upload_and_render(session).await;

        *self.state.lock().await = VoiceState::Idle;
        self.view.show_voice_stage(VoiceStage::Idle);

        match result {
            Ok(rendered) => {
                info!(session_id = %session_id, rendered = ?rendered, "Voice command complete");
                Ok(VoiceStage::Idle)
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Voice command failed");
                self.view.show_status(&e.user_message());
                Err(e)
            }
        }
    }

    async fn upload_and_render(&self, session: CoreResult<RecordingSession>) -> CoreResult<Rendered> {
        let clip = session?.finalize()?;
        let response = self.service.submit_voice(clip).await?;
        self.renderer.render(response).await
    }
}
