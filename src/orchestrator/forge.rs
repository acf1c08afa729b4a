//! The sprite session orchestrator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use spriteforge_raster::{EncodedImage, clean_sprite, generate_sprite_sheet};

use super::events::{EventCallback, ForgeEvent};
use crate::config::{ForgeConfig, MAX_SEQUENCE_FRAMES, MAX_SHEET_COLUMNS};
use crate::error::{ForgeError, Result};
use crate::frames::{FrameId, FrameStore, GeneratedFrame, ReferenceSet};
use crate::generation::{ActionFrame, GenerationClient, ImageBackend};
use crate::types::{AnimationState, SpriteConfig};

/// Result of [`SpriteForge::generate_base`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseOutcome {
    /// A new Idle frame was generated and stored.
    Created(GeneratedFrame),
    /// A base already existed and the confirmation was declined. Nothing was sent.
    Declined,
}

/// Holds the in-flight flag for the duration of one action.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self { flag })
            .map_err(|_| ForgeError::Busy("a generation is already in flight".into()))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// One sprite-building session.
///
/// Owns the frame store, the current [`SpriteConfig`] and the generation
/// client. Base, action and sequence generation are mutually exclusive: while
/// one runs, the others fail fast with [`ForgeError::Busy`]. Every cleaned
/// frame is appended only after post-processing completes, and within a
/// sequence each frame becomes the motion anchor of the next request.
///
/// All methods take `&self`, so a session can be shared as `Arc<SpriteForge>`.
pub struct SpriteForge {
    client: GenerationClient,
    sprite: Mutex<SpriteConfig>,
    store: Mutex<FrameStore>,
    in_flight: AtomicBool,
    tolerance: f64,
    max_sequence_frames: usize,
    on_event: Option<EventCallback>,
}

impl std::fmt::Debug for SpriteForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteForge")
            .field("client", &self.client)
            .field("frames", &self.lock_store().len())
            .field("busy", &self.is_busy())
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

impl SpriteForge {
    pub fn new(client: GenerationClient) -> Self {
        Self {
            client,
            sprite: Mutex::new(SpriteConfig::default()),
            store: Mutex::new(FrameStore::new()),
            in_flight: AtomicBool::new(false),
            tolerance: spriteforge_raster::DEFAULT_TOLERANCE,
            max_sequence_frames: MAX_SEQUENCE_FRAMES,
            on_event: None,
        }
    }

    /// Build a session from validated configuration and a backend.
    ///
    /// # Errors
    ///
    /// [`ForgeError::Config`] if the configuration is out of range.
    pub fn from_config(config: &ForgeConfig, backend: Arc<dyn ImageBackend>) -> Result<Self> {
        config.validate()?;
        let client = GenerationClient::new(backend).with_model(&config.backend.model);
        Ok(Self::new(client)
            .with_sprite_config(config.sprite.clone())
            .with_tolerance(config.postprocess.tolerance)
            .with_max_sequence_frames(config.sequence.max_frames))
    }

    pub fn with_sprite_config(self, config: SpriteConfig) -> Self {
        self.set_config(config);
        self
    }

    /// Background matting tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Largest accepted sequence length, capped at [`MAX_SEQUENCE_FRAMES`].
    pub fn with_max_sequence_frames(mut self, max: usize) -> Self {
        self.max_sequence_frames = max.clamp(1, MAX_SEQUENCE_FRAMES);
        self
    }

    pub fn with_event_callback(mut self, callback: EventCallback) -> Self {
        self.on_event = Some(callback);
        self
    }

    // ── Session state ─────────────────────────────────────────

    /// Current sprite configuration.
    pub fn config(&self) -> SpriteConfig {
        self.sprite
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the sprite configuration. Existing frames are not touched.
    pub fn set_config(&self, config: SpriteConfig) {
        *self.sprite.lock().unwrap_or_else(|e| e.into_inner()) = config;
    }

    /// Whether a generation action is running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Snapshot of every frame in insertion order.
    pub fn frames(&self) -> Vec<GeneratedFrame> {
        self.lock_store().iter().cloned().collect()
    }

    pub fn frame(&self, id: FrameId) -> Option<GeneratedFrame> {
        self.lock_store().get(id).cloned()
    }

    pub fn frame_count(&self) -> usize {
        self.lock_store().len()
    }

    pub fn base_frame(&self) -> Option<GeneratedFrame> {
        self.lock_store().base_frame().cloned()
    }

    /// Frames of `state`, oldest first.
    pub fn frames_for_state(&self, state: AnimationState) -> Vec<GeneratedFrame> {
        self.lock_store()
            .frames_for_state(state)
            .cloned()
            .collect()
    }

    /// Remove a frame by id. Returns whether it existed.
    ///
    /// Not gated by the in-flight flag; a running sequence simply sees the
    /// store without that frame on its next step.
    pub fn delete_frame(&self, id: FrameId) -> bool {
        let removed = self.lock_store().remove(id);
        match &removed {
            Some(frame) => tracing::info!(frame_id = %id, state = %frame.state, "frame deleted"),
            None => tracing::debug!(frame_id = %id, "delete of unknown frame ignored"),
        }
        removed.is_some()
    }

    // ── Generation ────────────────────────────────────────────

    /// Generate a new base (Idle) frame.
    ///
    /// When an Idle frame already exists, `confirm` is asked first; declining
    /// returns [`BaseOutcome::Declined`] without contacting the backend.
    /// Existing frames of every state are kept either way.
    ///
    /// # Errors
    ///
    /// [`ForgeError::Busy`] if another action runs, otherwise any generation
    /// or post-processing failure.
    pub async fn generate_base<F>(&self, confirm: F) -> Result<BaseOutcome>
    where
        F: FnOnce() -> bool,
    {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let has_base = self.lock_store().base_frame().is_some();
        if has_base && !confirm() {
            tracing::info!("new base declined; existing frames kept");
            return Ok(BaseOutcome::Declined);
        }

        let config = self.config();
        let result = self.base_step(&config).await;
        self.report(result).map(BaseOutcome::Created)
    }

    /// Generate the next single frame of `state`.
    ///
    /// The frame is numbered `n + 1` of `n + 1`, where `n` is the number of
    /// frames `state` already has.
    ///
    /// # Errors
    ///
    /// [`ForgeError::MissingBase`] without an Idle frame (no request is sent),
    /// [`ForgeError::Busy`] if another action runs, otherwise any generation
    /// or post-processing failure.
    pub async fn generate_action(&self, state: AnimationState) -> Result<GeneratedFrame> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        let config = self.config();
        let result = async {
            let refs = self.references(state)?;
            let index = refs.existing + 1;
            self.action_step(&config, state, refs, index, index).await
        }
        .await;
        self.report(result)
    }

    /// Generate `count` consecutive frames of `state`, one request at a time.
    ///
    /// Frame `k` of the batch is numbered `n + k` of `n + count`. Each cleaned
    /// frame is stored before the next request, which uses it as motion
    /// anchor. A failure stops the batch; frames already stored remain.
    ///
    /// # Errors
    ///
    /// [`ForgeError::Config`] if `count` is out of range, plus everything
    /// [`SpriteForge::generate_action`] can return.
    pub async fn generate_sequence(
        &self,
        state: AnimationState,
        count: usize,
    ) -> Result<Vec<GeneratedFrame>> {
        if !(1..=self.max_sequence_frames).contains(&count) {
            return self.report(Err(ForgeError::Config(format!(
                "sequence length must be in 1..={}, got {count}",
                self.max_sequence_frames
            ))));
        }

        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        let config = self.config();
        let result = async {
            let start = self.references(state)?.existing;
            let total = start + count;
            let mut added = Vec::with_capacity(count);
            for index in start + 1..=total {
                let refs = self.references(state)?;
                added.push(self.action_step(&config, state, refs, index, total).await?);
            }
            Ok::<_, ForgeError>(added)
        }
        .await;

        if let Ok(frames) = &result {
            tracing::info!(state = %state, frames = frames.len(), "sequence complete");
        }
        self.report(result)
    }

    // ── Export ────────────────────────────────────────────────

    /// Composite every frame, in insertion order, into a PNG sprite sheet.
    ///
    /// `None` when the store is empty.
    ///
    /// # Errors
    ///
    /// [`ForgeError::Config`] if `columns` is outside `1..=20`, or any
    /// decode/surface failure.
    pub async fn sprite_sheet(&self, columns: u32) -> Result<Option<EncodedImage>> {
        if !(1..=MAX_SHEET_COLUMNS).contains(&columns) {
            return Err(ForgeError::Config(format!(
                "sheet columns must be in 1..={MAX_SHEET_COLUMNS}, got {columns}"
            )));
        }
        let images = self.lock_store().images();
        compose(images, columns).await
    }

    /// Sheet of the frames of `state`, oldest first.
    ///
    /// One row for up to [`MAX_SHEET_COLUMNS`] frames; longer states wrap onto
    /// further rows of that width. `None` when the state has no frames.
    ///
    /// # Errors
    ///
    /// Any decode/surface failure.
    pub async fn state_strip(&self, state: AnimationState) -> Result<Option<EncodedImage>> {
        let images: Vec<EncodedImage> = self
            .lock_store()
            .frames_for_state(state)
            .map(|f| f.image.clone())
            .collect();
        if images.is_empty() {
            return Ok(None);
        }
        let columns = u32::try_from(images.len())
            .map_or(MAX_SHEET_COLUMNS, |n| n.min(MAX_SHEET_COLUMNS));
        compose(images, columns).await
    }

    // ── Internals ─────────────────────────────────────────────

    fn lock_store(&self) -> MutexGuard<'_, FrameStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: ForgeEvent) {
        if let Some(callback) = &self.on_event {
            callback(event);
        }
    }

    fn references(&self, state: AnimationState) -> Result<ReferenceSet> {
        self.lock_store().reference_set(state).ok_or_else(|| {
            ForgeError::MissingBase(format!(
                "cannot generate {state} frames without a base (Idle) frame"
            ))
        })
    }

    async fn base_step(&self, config: &SpriteConfig) -> Result<GeneratedFrame> {
        let index = self.lock_store().count_for_state(AnimationState::Idle) + 1;
        self.emit(ForgeEvent::RequestStarted {
            state: AnimationState::Idle,
            index,
            total: index,
        });
        let raw = self.client.generate_base(config).await?;
        let cleaned = self.clean(raw).await?;
        Ok(self.commit(AnimationState::Idle, cleaned))
    }

    async fn action_step(
        &self,
        config: &SpriteConfig,
        state: AnimationState,
        refs: ReferenceSet,
        index: usize,
        total: usize,
    ) -> Result<GeneratedFrame> {
        self.emit(ForgeEvent::RequestStarted {
            state,
            index,
            total,
        });
        let raw = self
            .client
            .generate_action(ActionFrame {
                base_image: &refs.identity,
                config,
                state,
                index,
                total,
                previous_image: refs.motion.as_ref(),
            })
            .await?;
        let cleaned = self.clean(raw).await?;
        Ok(self.commit(state, cleaned))
    }

    /// Matte and center a raw image off the async runtime.
    async fn clean(&self, raw: EncodedImage) -> Result<EncodedImage> {
        let tolerance = self.tolerance;
        tokio::task::spawn_blocking(move || clean_sprite(&raw, tolerance))
            .await
            .map_err(|e| ForgeError::Pipeline(format!("post-processing task failed: {e}")))?
            .map_err(ForgeError::from)
    }

    fn commit(&self, state: AnimationState, image: EncodedImage) -> GeneratedFrame {
        let frame = self.lock_store().push(state, image);
        tracing::info!(frame_id = %frame.id, state = %state, "frame added");
        self.emit(ForgeEvent::FrameAdded {
            frame_id: frame.id,
            state,
        });
        frame
    }

    fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            tracing::warn!(code = e.code(), error = %e, "generation action failed");
            self.emit(ForgeEvent::ActionFailed {
                message: e.user_message(),
            });
        }
        result
    }
}

async fn compose(images: Vec<EncodedImage>, columns: u32) -> Result<Option<EncodedImage>> {
    tokio::task::spawn_blocking(move || generate_sprite_sheet(&images, columns))
        .await
        .map_err(|e| ForgeError::Pipeline(format!("sheet task failed: {e}")))?
        .map_err(ForgeError::from)
}
