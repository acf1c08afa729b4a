//! Deletion, re-basing and export over a whole session.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use spriteforge::{AnimationState, BaseOutcome, ForgeError};

use crate::helpers::{SPRITE_SIDE, ScriptedBackend, forge_with};

#[tokio::test]
async fn delete_removes_exactly_that_frame() {
    let forge = forge_with(ScriptedBackend::new());
    forge.generate_base(|| true).await.unwrap();
    let walk = forge
        .generate_sequence(AnimationState::Walk, 3)
        .await
        .unwrap();

    let before: Vec<_> = forge.frames().into_iter().map(|f| f.id).collect();
    assert!(forge.delete_frame(walk[1].id));
    let after: Vec<_> = forge.frames().into_iter().map(|f| f.id).collect();

    let expected: Vec<_> = before.into_iter().filter(|id| *id != walk[1].id).collect();
    assert_eq!(after, expected);
    assert!(forge.frame(walk[1].id).is_none());
    assert!(!forge.delete_frame(walk[1].id));
}

#[tokio::test]
async fn deleting_base_keeps_action_frames() {
    let backend = ScriptedBackend::new();
    let forge = forge_with(backend.clone());
    let BaseOutcome::Created(base) = forge.generate_base(|| true).await.unwrap() else {
        panic!("expected base");
    };
    let walk = forge.generate_action(AnimationState::Walk).await.unwrap();

    assert!(forge.delete_frame(base.id));
    assert!(forge.base_frame().is_none());
    assert_eq!(forge.frame(walk.id), Some(walk));

    let requests_before = backend.request_count();
    let err = forge.generate_action(AnimationState::Walk).await.unwrap_err();
    assert!(matches!(err, ForgeError::MissingBase(_)));
    assert_eq!(backend.request_count(), requests_before);
}

#[tokio::test]
async fn confirmation_only_asked_when_a_base_exists() {
    let asked = Arc::new(AtomicUsize::new(0));
    let forge = forge_with(ScriptedBackend::new());

    let counter = Arc::clone(&asked);
    forge
        .generate_base(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        })
        .await
        .unwrap();
    assert_eq!(asked.load(Ordering::SeqCst), 0);

    let counter = Arc::clone(&asked);
    let outcome = forge
        .generate_base(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        })
        .await
        .unwrap();
    assert_eq!(outcome, BaseOutcome::Declined);
    assert_eq!(asked.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn new_base_anchors_later_actions() {
    let backend = ScriptedBackend::new();
    let forge = forge_with(backend.clone());
    let BaseOutcome::Created(first) = forge.generate_base(|| true).await.unwrap() else {
        panic!("expected base");
    };
    let BaseOutcome::Created(second) = forge.generate_base(|| true).await.unwrap() else {
        panic!("expected base");
    };
    forge.delete_frame(first.id);

    forge.generate_action(AnimationState::Jump).await.unwrap();
    let last = backend.requests().pop().unwrap();
    assert_eq!(last.references[0], second.image);
}

#[tokio::test]
async fn sheet_and_strips_cover_the_session() {
    let forge = forge_with(ScriptedBackend::new());
    assert!(forge.sprite_sheet(6).await.unwrap().is_none());

    forge.generate_base(|| true).await.unwrap();
    forge
        .generate_sequence(AnimationState::Walk, 3)
        .await
        .unwrap();

    let sheet = forge.sprite_sheet(3).await.unwrap().unwrap();
    let sheet = sheet.decode().unwrap();
    // 4 frames in 3 columns -> 2 rows
    assert_eq!(sheet.dimensions(), (3 * SPRITE_SIDE, 2 * SPRITE_SIDE));
    // Row 2 holds only the fourth frame.
    assert!(sheet.get_pixel(SPRITE_SIDE / 2 - 1, SPRITE_SIDE + 7)[3] > 0);
    assert_eq!(sheet.get_pixel(SPRITE_SIDE + 7, SPRITE_SIDE + 7)[3], 0);

    let strip = forge
        .state_strip(AnimationState::Walk)
        .await
        .unwrap()
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!(strip.dimensions(), (3 * SPRITE_SIDE, SPRITE_SIDE));
    assert!(forge.state_strip(AnimationState::Hit).await.unwrap().is_none());
}
