use chrono::{DateTime, Duration, Utc};
use spriteforge_raster::EncodedImage;

use super::{FrameId, GeneratedFrame, ReferenceSet};
use crate::types::AnimationState;

/// Ordered frame collection for one session.
///
/// Frames are kept in insertion order and only ever removed by id. Creation
/// timestamps strictly increase across appends, so insertion order and
/// timestamp order agree even when the clock does not advance between two
/// appends.
#[derive(Debug, Clone, Default)]
pub struct FrameStore {
    frames: Vec<GeneratedFrame>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame stamped with the current time.
    pub fn push(&mut self, state: AnimationState, image: EncodedImage) -> GeneratedFrame {
        self.push_at(state, image, Utc::now())
    }

    /// Append a frame stamped no earlier than `now`.
    ///
    /// If `now` is not after the previous append, the timestamp is moved to
    /// one microsecond past it.
    pub fn push_at(
        &mut self,
        state: AnimationState,
        image: EncodedImage,
        now: DateTime<Utc>,
    ) -> GeneratedFrame {
        let created_at = match self.last_timestamp {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(created_at);

        let frame = GeneratedFrame {
            id: FrameId::new(),
            state,
            image,
            created_at,
        };
        self.frames.push(frame.clone());
        frame
    }

    /// Remove the frame with `id`. Nothing else is touched.
    pub fn remove(&mut self, id: FrameId) -> Option<GeneratedFrame> {
        let pos = self.frames.iter().position(|f| f.id == id)?;
        Some(self.frames.remove(pos))
    }

    pub fn get(&self, id: FrameId) -> Option<&GeneratedFrame> {
        self.frames.iter().find(|f| f.id == id)
    }

    /// Earliest Idle frame still present.
    pub fn base_frame(&self) -> Option<&GeneratedFrame> {
        self.frames.iter().find(|f| f.state.is_base())
    }

    /// Frames of `state`, oldest first.
    pub fn frames_for_state(
        &self,
        state: AnimationState,
    ) -> impl Iterator<Item = &GeneratedFrame> + '_ {
        self.frames.iter().filter(move |f| f.state == state)
    }

    pub fn last_frame_for_state(&self, state: AnimationState) -> Option<&GeneratedFrame> {
        self.frames.iter().rev().find(|f| f.state == state)
    }

    pub fn count_for_state(&self, state: AnimationState) -> usize {
        self.frames_for_state(state).count()
    }

    /// Identity and motion anchors for the next frame of `state`.
    ///
    /// `None` without a base frame.
    pub fn reference_set(&self, state: AnimationState) -> Option<ReferenceSet> {
        let base = self.base_frame()?;
        Some(ReferenceSet {
            identity: base.image.clone(),
            motion: self
                .last_frame_for_state(state)
                .map(|f| f.image.clone()),
            existing: self.count_for_state(state),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneratedFrame> {
        self.frames.iter()
    }

    /// All payloads in insertion order.
    pub fn images(&self) -> Vec<EncodedImage> {
        self.frames.iter().map(|f| f.image.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl<'a> IntoIterator for &'a FrameStore {
    type Item = &'a GeneratedFrame;
    type IntoIter = std::slice::Iter<'a, GeneratedFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn img(tag: u8) -> EncodedImage {
        EncodedImage::png(vec![tag])
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("valid time")
    }

    #[test]
    fn empty_store() {
        let store = FrameStore::new();
        assert!(store.is_empty());
        assert!(store.base_frame().is_none());
        assert!(store.reference_set(AnimationState::Walk).is_none());
    }

    #[test]
    fn base_is_earliest_idle() {
        let mut store = FrameStore::new();
        store.push(AnimationState::Walk, img(0));
        let first = store.push(AnimationState::Idle, img(1));
        store.push(AnimationState::Idle, img(2));
        assert_eq!(store.base_frame().map(|f| f.id), Some(first.id));
    }

    #[test]
    fn deleting_base_promotes_next_idle() {
        let mut store = FrameStore::new();
        let first = store.push(AnimationState::Idle, img(1));
        let second = store.push(AnimationState::Idle, img(2));
        let walk = store.push(AnimationState::Walk, img(3));
        assert!(store.remove(first.id).is_some());
        assert_eq!(store.base_frame().map(|f| f.id), Some(second.id));
        assert!(store.get(walk.id).is_some());
    }

    #[test]
    fn remove_only_that_frame() {
        let mut store = FrameStore::new();
        let a = store.push(AnimationState::Idle, img(1));
        let b = store.push(AnimationState::Walk, img(2));
        let c = store.push(AnimationState::Walk, img(3));
        let removed = store.remove(b.id).expect("removed");
        assert_eq!(removed.id, b.id);
        let ids: Vec<FrameId> = store.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
        assert!(store.remove(b.id).is_none());
    }

    #[test]
    fn timestamps_strictly_increase_on_frozen_clock() {
        let mut store = FrameStore::new();
        let a = store.push_at(AnimationState::Idle, img(1), t0());
        let b = store.push_at(AnimationState::Walk, img(2), t0());
        let c = store.push_at(AnimationState::Walk, img(3), t0() - Duration::seconds(5));
        assert!(a.created_at < b.created_at);
        assert!(b.created_at < c.created_at);
        assert_eq!(b.created_at - a.created_at, Duration::microseconds(1));
    }

    #[test]
    fn timestamps_follow_clock_when_it_advances() {
        let mut store = FrameStore::new();
        store.push_at(AnimationState::Idle, img(1), t0());
        let later = t0() + Duration::seconds(3);
        let b = store.push_at(AnimationState::Walk, img(2), later);
        assert_eq!(b.created_at, later);
    }

    #[test]
    fn timestamps_stay_monotonic_after_deletion() {
        let mut store = FrameStore::new();
        let a = store.push_at(AnimationState::Idle, img(1), t0());
        store.remove(a.id);
        let b = store.push_at(AnimationState::Idle, img(2), t0());
        assert!(b.created_at > a.created_at);
    }

    #[test]
    fn state_queries_are_chronological() {
        let mut store = FrameStore::new();
        store.push(AnimationState::Idle, img(0));
        let w1 = store.push(AnimationState::Walk, img(1));
        store.push(AnimationState::Run, img(9));
        let w2 = store.push(AnimationState::Walk, img(2));

        let walk: Vec<FrameId> = store
            .frames_for_state(AnimationState::Walk)
            .map(|f| f.id)
            .collect();
        assert_eq!(walk, vec![w1.id, w2.id]);
        assert_eq!(store.count_for_state(AnimationState::Walk), 2);
        assert_eq!(
            store.last_frame_for_state(AnimationState::Walk).map(|f| f.id),
            Some(w2.id)
        );
        assert!(store.last_frame_for_state(AnimationState::Death).is_none());
    }

    #[test]
    fn reference_set_anchors() {
        let mut store = FrameStore::new();
        store.push(AnimationState::Idle, img(0));
        let first = store.reference_set(AnimationState::Walk).expect("refs");
        assert_eq!(first.identity, img(0));
        assert!(first.motion.is_none());
        assert_eq!(first.existing, 0);

        store.push(AnimationState::Walk, img(1));
        store.push(AnimationState::Walk, img(2));
        let next = store.reference_set(AnimationState::Walk).expect("refs");
        assert_eq!(next.motion, Some(img(2)));
        assert_eq!(next.existing, 2);
    }

    #[test]
    fn images_in_insertion_order() {
        let mut store = FrameStore::new();
        store.push(AnimationState::Walk, img(3));
        store.push(AnimationState::Idle, img(1));
        assert_eq!(store.images(), vec![img(3), img(1)]);
        assert_eq!((&store).into_iter().count(), 2);
    }

    #[test]
    fn order_comes_from_insertion_not_ids() {
        let mut store = FrameStore::new();
        let pushed: Vec<FrameId> = (0..16u8)
            .map(|i| store.push(AnimationState::Run, img(i)).id)
            .collect();
        let walked: Vec<FrameId> = store.iter().map(|f| f.id).collect();
        assert_eq!(walked, pushed);
        let run: Vec<FrameId> = store
            .frames_for_state(AnimationState::Run)
            .map(|f| f.id)
            .collect();
        assert_eq!(run, pushed);
    }

    #[test]
    fn frame_ids_parse_back() {
        let id = FrameId::new();
        let parsed: FrameId = id.to_string().parse().expect("parse");
        assert_eq!(parsed, id);
    }
}
