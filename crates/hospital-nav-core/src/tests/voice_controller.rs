use crate::{
    ControllerSettings, ImageRole, NavError, PROCESSING_VOICE_TEXT, RECORDING_TEXT,
    VoiceCommandController, VoiceStage, VoiceState,
    tests::support::{FakePathService, MockMicrophone, RecordingView, Reply, ViewEvent, tiny_png},
};

use std::{
    sync::{Arc, atomic::Ordering},
    time::Duration,
};

type Controller = VoiceCommandController<FakePathService, MockMicrophone, RecordingView>;

fn controller(
    service: FakePathService,
    microphone: MockMicrophone,
) -> (Arc<Controller>, Arc<FakePathService>, Arc<RecordingView>) {
    let service = Arc::new(service);
    let view = Arc::new(RecordingView::default());
    let settings = ControllerSettings {
        show_graph_after_route: false,
        ..ControllerSettings::default()
    };
    let controller = VoiceCommandController::new(
        Arc::clone(&service),
        microphone,
        Arc::clone(&view),
        &settings,
    );
    (Arc::new(controller), service, view)
}

fn stages(view: &RecordingView) -> Vec<VoiceStage> {
    view.events()
        .into_iter()
        .filter_map(|e| match e {
            ViewEvent::Stage(stage) => Some(stage),
            _ => None,
        })
        .collect()
}

/// WHAT: Full cycle records, uploads once, renders, and returns to idle
/// WHY: Each toggle pair is exactly one voice command
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_idle_when_toggling_twice_then_full_cycle_with_one_upload() {
    // Given: A microphone with audio and an image-answering backend
    let microphone = MockMicrophone::with_chunks(vec![vec![0.1, 0.2], vec![0.3]]);
    let starts = Arc::clone(&microphone.starts);
    let stops = Arc::clone(&microphone.stops);
    let (controller, service, view) =
        controller(FakePathService::new(Reply::Image(tiny_png(3, 3))), microphone);

    // When: Toggling on, then off
    let first = controller.toggle().await.unwrap();
    let recording = controller.state().await;
    let second = controller.toggle().await.unwrap();

    // Then: Recording, then back to idle after one upload
    assert_eq!(first, VoiceStage::Recording);
    assert!(matches!(recording, VoiceState::Recording { .. }));
    assert_eq!(second, VoiceStage::Idle);
    assert_eq!(controller.state().await, VoiceState::Idle);
    assert_eq!(starts.load(Ordering::SeqCst), 1);
    assert_eq!(stops.load(Ordering::SeqCst), 1);

    let uploads = service.voice_uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(&uploads[0].bytes()[0..4], b"RIFF");
    drop(uploads);

    assert_eq!(
        stages(&view),
        vec![VoiceStage::Recording, VoiceStage::Processing, VoiceStage::Idle]
    );
    let events = view.events();
    assert!(events.contains(&ViewEvent::Status(RECORDING_TEXT.to_string())));
    assert!(events.contains(&ViewEvent::Status(PROCESSING_VOICE_TEXT.to_string())));
    assert!(events.contains(&ViewEvent::Image {
        role: ImageRole::PathOverlay,
        byte_len: tiny_png(3, 3).len(),
    }));
}

/// WHAT: Voice route reply renders the path list
/// WHY: Voice and text queries share one renderer
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_route_reply_when_voice_command_completes_then_list_shown() {
    // Given: A backend answering with a route
    let (controller, _service, view) = controller(
        FakePathService::new(Reply::Route(vec!["Lobby", "ICU"])),
        MockMicrophone::with_chunks(vec![vec![0.5]]),
    );

    // When: Running one command
    controller.toggle().await.unwrap();
    controller.toggle().await.unwrap();

    // Then: The list was rendered
    assert!(view
        .events()
        .contains(&ViewEvent::Path(vec!["Lobby".to_string(), "ICU".to_string()])));
}

/// WHAT: Denied microphone leaves the controller idle
/// WHY: A refused permission must not wedge the state machine
#[tokio::test]
async fn given_permission_denied_when_toggling_then_error_and_still_idle() {
    // Given: A microphone that refuses to start
    let microphone = MockMicrophone::denied();
    let stops = Arc::clone(&microphone.stops);
    let (controller, service, view) =
        controller(FakePathService::new(Reply::Route(vec!["A"])), microphone);

    // When: Toggling
    let result = controller.toggle().await;

    // Then: Error surfaced, idle, nothing uploaded
    assert!(matches!(result, Err(NavError::PermissionDenied { .. })));
    assert_eq!(controller.state().await, VoiceState::Idle);
    assert_eq!(stops.load(Ordering::SeqCst), 0);
    assert!(stages(&view).is_empty());
    assert!(matches!(view.last(), Some(ViewEvent::Status(_))));
    assert!(service.voice_uploads.lock().map(|u| u.is_empty()).unwrap_or(false));
}

/// WHAT: Toggle during processing is rejected without touching the microphone
/// WHY: Only one voice command may be in flight
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_processing_when_toggling_then_busy_and_microphone_untouched() {
    // Given: A slow backend and a recording in progress
    let microphone = MockMicrophone::with_chunks(vec![vec![0.2]]);
    let starts = Arc::clone(&microphone.starts);
    let stops = Arc::clone(&microphone.stops);
    let service = FakePathService::new(Reply::Route(vec!["A", "B"]))
        .with_delay(Duration::from_secs(5));
    let (controller, service, _view) = controller(service, microphone);
    controller.toggle().await.unwrap();

    // When: Stopping in the background and toggling again mid-upload
    let background = Arc::clone(&controller);
    let finishing = tokio::spawn(async move { background.toggle().await });
    while !matches!(controller.state().await, VoiceState::Processing { .. }) {
        tokio::task::yield_now().await;
    }
    let busy = controller.toggle().await;

    // Then: Busy, microphone started and stopped once each
    assert!(matches!(busy, Err(NavError::Busy { .. })));
    assert_eq!(starts.load(Ordering::SeqCst), 1);
    assert_eq!(stops.load(Ordering::SeqCst), 1);

    let finished = finishing.await.unwrap().unwrap();
    assert_eq!(finished, VoiceStage::Idle);
    assert_eq!(controller.state().await, VoiceState::Idle);
    assert_eq!(service.voice_uploads.lock().unwrap().len(), 1);
}

/// WHAT: Empty recording fails without an upload
/// WHY: Silence is not a voice command
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_no_audio_when_stopping_then_no_audio_captured_and_idle() {
    // Given: A microphone that delivers nothing
    let (controller, service, view) = controller(
        FakePathService::new(Reply::Route(vec!["A"])),
        MockMicrophone::with_chunks(Vec::new()),
    );
    controller.toggle().await.unwrap();

    // When: Stopping
    let result = controller.toggle().await;

    // Then: NoAudioCaptured, idle, no upload
    assert!(matches!(result, Err(NavError::NoAudioCaptured { .. })));
    assert_eq!(controller.state().await, VoiceState::Idle);
    assert!(service.voice_uploads.lock().unwrap().is_empty());
    assert_eq!(stages(&view).last(), Some(&VoiceStage::Idle));
}

/// WHAT: Backend failure during upload still returns to idle
/// WHY: The next toggle must be able to start a new recording
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_backend_error_when_voice_upload_fails_then_idle_with_message() {
    // Given: A backend that rejects the transcription
    let (controller, _service, view) = controller(
        FakePathService::new(Reply::BackendError("Could not understand audio")),
        MockMicrophone::with_chunks(vec![vec![0.4]]),
    );
    controller.toggle().await.unwrap();

    // When: Stopping
    let result = controller.toggle().await;

    // Then: Error text shown, ready for the next command
    assert!(result.is_err());
    assert_eq!(controller.state().await, VoiceState::Idle);
    assert_eq!(
        view.last(),
        Some(ViewEvent::Status("Error: Could not understand audio".to_string()))
    );
    assert_eq!(controller.toggle().await.unwrap(), VoiceStage::Recording);
}

/// WHAT: Stop outside of recording is a no-op
/// WHY: The `stop` prompt command may arrive in any state
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_idle_when_stopping_then_nothing_happens() {
    // Given: An idle controller
    let microphone = MockMicrophone::with_chunks(vec![vec![0.1]]);
    let stops = Arc::clone(&microphone.stops);
    let (controller, _service, view) =
        controller(FakePathService::new(Reply::Route(vec!["A"])), microphone);

    // When: Stopping
    let stage = controller.stop().await.unwrap();

    // Then: Still idle, microphone untouched
    assert_eq!(stage, VoiceStage::Idle);
    assert_eq!(stops.load(Ordering::SeqCst), 0);
    assert!(view.events().is_empty());
}
