//! Prompt construction.
//!
//! The base prompt describes the character and pins down the framing. Action
//! prompts come in two variants depending on whether a previous frame of the
//! same animation is attached as a motion reference.

use crate::types::{AnimationState, SpriteConfig, SpriteWeapon};

/// Posture guidance for each animation state.
pub fn posture_guidance(state: AnimationState) -> &'static str {
    match state {
        AnimationState::Idle => {
            "Relaxed standing pose with subtle breathing motion. Weight slightly shifting."
        }
        AnimationState::Walk => {
            "Create a walking frame. Legs apart, arms swinging. Maintain steady head height."
        }
        AnimationState::Run => "Dynamic running pose. Body leaning forward, legs extended.",
        AnimationState::Attack => "Action pose swinging weapon or casting spell. Extended limbs.",
        AnimationState::Jump => {
            "Mid-air pose. Knees tucked or legs stretched down. dynamic cloth movement."
        }
        AnimationState::Death => "Collapsing or lying on the ground.",
        AnimationState::Hit => {
            "Recoiling from damage. Flashing white or red tint optional but posture should show impact."
        }
    }
}

/// Which action template to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptVariant {
    /// Base image plus previous frame: keep identity, continue motion.
    Continuity,
    /// Base image only: strict design invariance.
    IdentityOnly,
}

impl PromptVariant {
    pub fn for_motion_anchor(has_previous: bool) -> Self {
        if has_previous {
            Self::Continuity
        } else {
            Self::IdentityOnly
        }
    }
}

fn weapon_sentence(weapon: SpriteWeapon) -> String {
    match weapon {
        SpriteWeapon::None => "The character is unarmed.".to_owned(),
        w => format!("The character is wielding a {}.", w.label()),
    }
}

/// Prompt for the base (Idle) sprite.
pub fn base_prompt(config: &SpriteConfig) -> String {
    [
        format!(
            "Generate a single {} 2D game sprite of a {}.",
            config.style.label(),
            config.category.label()
        ),
        format!("Description: {}.", config.description.trim()),
        weapon_sentence(config.weapon),
        "The character must be in an IDLE pose, facing slightly right (3/4 view).".to_owned(),
        "The background MUST be a solid, pure white color.".to_owned(),
        "Full body must be visible within the frame with some padding.".to_owned(),
        "High contrast, clean outlines, suitable for game assets.".to_owned(),
        "Do not include any text, grids, or interface elements. Just the character.".to_owned(),
        "Ensure the character proportions are standard for a 2D platformer or RPG.".to_owned(),
    ]
    .join("\n")
}

/// Prompt for frame `index` of `total` of a `state` animation.
///
/// `index` and `total` are advisory; nothing checks `index <= total`.
pub fn action_prompt(
    state: AnimationState,
    index: usize,
    total: usize,
    variant: PromptVariant,
) -> String {
    let task = format!(
        "TASK: Generate Frame {index} of {total} for a {} animation.",
        state.label()
    );
    let guidance = posture_guidance(state);

    let body = match variant {
        PromptVariant::Continuity => vec![
            "INPUTS:".to_owned(),
            "1. First Image: CHARACTER DESIGN (Identity Source).".to_owned(),
            "2. Second Image: PREVIOUS FRAME (Motion Source).".to_owned(),
            String::new(),
            "INSTRUCTIONS:".to_owned(),
            "1. Maintain the identity from Image 1 (Colors, Equipment, Volume).".to_owned(),
            "2. Continue the motion from Image 2. This is the NEXT frame in the sequence."
                .to_owned(),
            format!("3. {guidance}"),
            "4. Ensure smooth transition from the previous frame.".to_owned(),
            "5. Keep the same 3/4 side view.".to_owned(),
            "6. Output on solid white background.".to_owned(),
        ],
        PromptVariant::IdentityOnly => vec![
            "STRICT CONSISTENCY RULES:".to_owned(),
            "1. REFERENCE: Use the attached image as the source of truth for the character's design."
                .to_owned(),
            "2. DO NOT CHANGE: Head size, limb thickness, clothing details, or colors. The character VOLUME must remain identical."
                .to_owned(),
            format!("3. ACTION: {guidance}"),
            "4. VIEW ANGLE: Keep the same 3/4 side view.".to_owned(),
            "5. OUTPUT: Single character on solid white background.".to_owned(),
            "6. Ensure the silhouette is distinct and readable.".to_owned(),
        ],
    };

    let mut lines = vec![task, String::new()];
    lines.extend(body);
    lines.join("\n")
}
