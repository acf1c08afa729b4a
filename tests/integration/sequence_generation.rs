//! Base, action and sequence generation through a scripted backend.

use spriteforge::generation::BackendReply;
use spriteforge::{AnimationState, BaseOutcome, EncodedImage, ForgeError, ForgeEvent};

use crate::helpers::{ScriptedBackend, Step, forge_with, knight, recording_callback};

#[tokio::test]
async fn knight_end_to_end() {
    let backend = ScriptedBackend::new();
    let forge = forge_with(backend.clone()).with_sprite_config(knight());

    let outcome = forge.generate_base(|| true).await.unwrap();
    assert!(matches!(outcome, BaseOutcome::Created(_)));
    assert_eq!(forge.frames_for_state(AnimationState::Idle).len(), 1);

    let walk = forge
        .generate_sequence(AnimationState::Walk, 3)
        .await
        .unwrap();
    assert_eq!(walk.len(), 3);

    let frames = forge.frames();
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[0].state, AnimationState::Idle);
    assert!(frames[1..].iter().all(|f| f.state == AnimationState::Walk));

    let stored_walk = forge.frames_for_state(AnimationState::Walk);
    assert_eq!(stored_walk, walk);
    assert!(
        stored_walk
            .windows(2)
            .all(|w| w[0].created_at < w[1].created_at)
    );

    let requests = backend.requests();
    assert_eq!(requests.len(), 4);
    assert!(requests[0].prompt.contains("Pixel Art (16-bit)"));
    assert!(requests[0].prompt.contains("wielding a Sword"));

    // Every walk request is anchored on the stored base frame.
    let base = forge.base_frame().unwrap();
    for req in &requests[1..] {
        assert_eq!(req.references[0], base.image);
    }
    // The second walk request continues from the first walk frame's cleaned output.
    assert_eq!(requests[2].references.len(), 2);
    assert_eq!(requests[2].references[1], walk[0].image);
    assert_eq!(requests[3].references[1], walk[1].image);
}

#[tokio::test]
async fn sequence_on_empty_state_numbers_one_to_n() {
    let backend = ScriptedBackend::new();
    let forge = forge_with(backend.clone());
    forge.generate_base(|| true).await.unwrap();
    forge
        .generate_sequence(AnimationState::Run, 4)
        .await
        .unwrap();

    let requests = backend.requests();
    for (k, req) in requests[1..].iter().enumerate() {
        let expected = format!("Frame {} of 4 for a Run animation", k + 1);
        assert!(req.prompt.contains(&expected), "missing '{expected}'");
    }
    assert_eq!(requests[1].references.len(), 1);
    assert!(requests[1].prompt.contains("STRICT CONSISTENCY RULES"));
    assert!(requests[2..].iter().all(|r| r.references.len() == 2));
}

#[tokio::test]
async fn sequence_continues_existing_numbering() {
    let backend = ScriptedBackend::new();
    let forge = forge_with(backend.clone());
    forge.generate_base(|| true).await.unwrap();
    forge
        .generate_sequence(AnimationState::Walk, 2)
        .await
        .unwrap();
    let last_existing = forge.frames_for_state(AnimationState::Walk)[1].clone();

    forge
        .generate_sequence(AnimationState::Walk, 3)
        .await
        .unwrap();

    let requests = backend.requests();
    let batch = &requests[3..];
    assert_eq!(batch.len(), 3);
    for (k, req) in batch.iter().enumerate() {
        assert!(req.prompt.contains(&format!("Frame {} of 5", k + 3)));
    }
    assert_eq!(batch[0].references[1], last_existing.image);
    assert_eq!(forge.frames_for_state(AnimationState::Walk).len(), 5);
}

#[tokio::test]
async fn single_action_frames_count_up() {
    let backend = ScriptedBackend::new();
    let forge = forge_with(backend.clone());
    forge.generate_base(|| true).await.unwrap();

    let first = forge.generate_action(AnimationState::Attack).await.unwrap();
    forge.generate_action(AnimationState::Attack).await.unwrap();

    let requests = backend.requests();
    assert!(requests[1].prompt.contains("Frame 1 of 1 for a Attack animation"));
    assert_eq!(requests[1].references.len(), 1);
    assert!(requests[2].prompt.contains("Frame 2 of 2 for a Attack animation"));
    assert_eq!(requests[2].references[1], first.image);
}

#[tokio::test]
async fn missing_base_is_rejected_without_requests() {
    let backend = ScriptedBackend::new();
    let forge = forge_with(backend.clone());

    let err = forge
        .generate_action(AnimationState::Walk)
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::MissingBase(_)));
    let err = forge
        .generate_sequence(AnimationState::Jump, 3)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BASE_FRAME_MISSING");

    assert_eq!(backend.request_count(), 0);
    assert_eq!(forge.frame_count(), 0);
}

#[tokio::test]
async fn failure_mid_sequence_keeps_completed_frames() {
    let backend = ScriptedBackend::with_script(vec![
        Step::Reply(BackendReply::Image(crate::helpers::sprite(1))),
        Step::Reply(BackendReply::Image(crate::helpers::sprite(2))),
        Step::Fail("upstream unavailable".into()),
    ]);
    let (callback, events) = recording_callback();
    let forge = forge_with(backend.clone()).with_event_callback(callback);

    forge.generate_base(|| true).await.unwrap();
    let err = forge
        .generate_sequence(AnimationState::Death, 4)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "GENERATION_FAILED");
    assert_eq!(backend.request_count(), 3);
    assert_eq!(forge.frames_for_state(AnimationState::Death).len(), 1);
    assert_eq!(forge.frame_count(), 2);
    assert!(!forge.is_busy());

    let events = events.lock().unwrap();
    assert!(matches!(
        events.last(),
        Some(ForgeEvent::ActionFailed { message }) if message.contains("upstream unavailable")
    ));
}

#[tokio::test]
async fn empty_backend_replies_surface_as_errors() {
    let backend = ScriptedBackend::with_script(vec![
        Step::Reply(BackendReply::NoContent),
        Step::Reply(BackendReply::NoImage),
    ]);
    let forge = forge_with(backend);

    let err = forge.generate_base(|| true).await.unwrap_err();
    assert_eq!(err.user_message(), "Generation failed: No content generated");
    let err = forge.generate_base(|| true).await.unwrap_err();
    assert_eq!(err.message(), "No image data found in response");
    assert_eq!(forge.frame_count(), 0);
}

#[tokio::test]
async fn undecodable_backend_image_is_decode_error() {
    let backend = ScriptedBackend::with_script(vec![Step::Reply(BackendReply::Image(
        EncodedImage::png(b"not an image".to_vec()),
    ))]);
    let forge = forge_with(backend);

    let err = forge.generate_base(|| true).await.unwrap_err();
    assert_eq!(err.code(), "IMAGE_DECODE_FAILED");
    assert_eq!(forge.frame_count(), 0);
    assert!(!forge.is_busy());
}

#[tokio::test]
async fn events_follow_each_frame() {
    let (callback, events) = recording_callback();
    let forge = forge_with(ScriptedBackend::new()).with_event_callback(callback);
    forge.generate_base(|| true).await.unwrap();
    let walk = forge
        .generate_sequence(AnimationState::Walk, 2)
        .await
        .unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 6);
    assert_eq!(
        events[2],
        ForgeEvent::RequestStarted {
            state: AnimationState::Walk,
            index: 1,
            total: 2,
        }
    );
    assert_eq!(
        events[5],
        ForgeEvent::FrameAdded {
            frame_id: walk[1].id,
            state: AnimationState::Walk,
        }
    );
}

#[tokio::test]
async fn stored_frames_are_matted_and_centered() {
    let forge = forge_with(ScriptedBackend::new());
    let BaseOutcome::Created(frame) = forge.generate_base(|| true).await.unwrap() else {
        panic!("expected base frame");
    };
    assert_eq!(frame.image.mime_type(), "image/png");
    let img = frame.image.decode().unwrap();
    assert_eq!(img.get_pixel(0, 0)[3], 0);
    let bounds = spriteforge_raster::content_bounds(&img).unwrap();
    // 3x4 block on 16x16 -> origin (6, 6)
    assert_eq!((bounds.min_x, bounds.min_y), (6, 6));
}
