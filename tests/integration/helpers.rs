//! Shared helpers for integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use spriteforge::generation::{BackendReply, GenerationClient, ImageBackend, ImageRequest};
use spriteforge::{
    EncodedImage, EventCallback, ForgeError, ForgeEvent, SpriteCategory, SpriteConfig,
    SpriteForge, SpriteStyle, SpriteWeapon,
};

/// Side length of generated test sprites.
pub(crate) const SPRITE_SIDE: u32 = 16;

/// A "generated" image: white background with a colored block that moves
/// with `seed`, so every call yields a distinguishable sprite.
pub(crate) fn sprite(seed: u8) -> EncodedImage {
    let mut img = RgbaImage::from_pixel(SPRITE_SIDE, SPRITE_SIDE, Rgba([255, 255, 255, 255]));
    let x0 = u32::from(seed % 8);
    let color = Rgba([seed.wrapping_mul(20), 40, 200, 255]);
    for y in 2..6 {
        for x in x0..x0 + 3 {
            img.put_pixel(x, y, color);
        }
    }
    spriteforge_raster::encode_png(&img).expect("encode sprite")
}

/// One scripted backend answer.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    Reply(BackendReply),
    Fail(String),
}

/// In-memory backend that records every request.
///
/// Answers from its script first; once the script runs out it returns
/// [`sprite`] seeded with the call number.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    script: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<ImageRequest>>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn with_script(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().expect("lock").clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().expect("lock").len()
    }
}

#[async_trait]
impl ImageBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &ImageRequest) -> Result<BackendReply, ForgeError> {
        let call = {
            let mut requests = self.requests.lock().expect("lock");
            requests.push(request.clone());
            requests.len()
        };
        let step = self.script.lock().expect("lock").pop_front();
        match step {
            Some(Step::Reply(reply)) => Ok(reply),
            Some(Step::Fail(message)) => Err(ForgeError::Generation(message)),
            None => Ok(BackendReply::Image(sprite(call as u8))),
        }
    }
}

pub(crate) fn forge_with(backend: Arc<ScriptedBackend>) -> SpriteForge {
    SpriteForge::new(GenerationClient::new(backend))
}

pub(crate) fn knight() -> SpriteConfig {
    SpriteConfig::new(
        SpriteCategory::Human,
        SpriteStyle::PixelArt16Bit,
        SpriteWeapon::Sword,
        "knight",
    )
}

/// Callback that stores every event, plus the shared log it writes to.
pub(crate) fn recording_callback() -> (EventCallback, Arc<Mutex<Vec<ForgeEvent>>>) {
    let events: Arc<Mutex<Vec<ForgeEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let events_clone = Arc::clone(&events);
    let callback: EventCallback = Box::new(move |e| {
        events_clone.lock().expect("lock").push(e);
    });
    (callback, events)
}
