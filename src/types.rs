//! Sprite configuration and the closed taxonomies it is built from.
//!
//! Every variant carries a human-readable label that is embedded verbatim in
//! generation prompts. Serialized names (TOML, CLI values) are kebab-case.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Character archetype.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SpriteCategory {
    #[default]
    Human,
    Soldier,
    Alien,
    Monster,
    Robot,
    Animal,
    Npc,
    Boss,
}

impl SpriteCategory {
    pub const ALL: [Self; 8] = [
        Self::Human,
        Self::Soldier,
        Self::Alien,
        Self::Monster,
        Self::Robot,
        Self::Animal,
        Self::Npc,
        Self::Boss,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Human => "Human",
            Self::Soldier => "Soldier",
            Self::Alien => "Alien",
            Self::Monster => "Monster",
            Self::Robot => "Robot",
            Self::Animal => "Animal",
            Self::Npc => "NPC",
            Self::Boss => "Boss Character",
        }
    }
}

/// Art style the whole sprite set is rendered in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SpriteStyle {
    #[value(name = "pixel-art-8bit")]
    #[serde(rename = "pixel-art-8bit")]
    PixelArt8Bit,
    #[default]
    #[value(name = "pixel-art-16bit")]
    #[serde(rename = "pixel-art-16bit")]
    PixelArt16Bit,
    #[value(name = "pixel-art-32bit")]
    #[serde(rename = "pixel-art-32bit")]
    PixelArt32Bit,
    #[value(name = "pixel-art-64bit")]
    #[serde(rename = "pixel-art-64bit")]
    PixelArt64Bit,
    #[value(name = "pixel-art-128bit")]
    #[serde(rename = "pixel-art-128bit")]
    PixelArt128Bit,
    Cartoon,
    DarkFantasy,
    SciFi,
    Chibi,
    Realistic,
}

impl SpriteStyle {
    pub const ALL: [Self; 10] = [
        Self::PixelArt8Bit,
        Self::PixelArt16Bit,
        Self::PixelArt32Bit,
        Self::PixelArt64Bit,
        Self::PixelArt128Bit,
        Self::Cartoon,
        Self::DarkFantasy,
        Self::SciFi,
        Self::Chibi,
        Self::Realistic,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::PixelArt8Bit => "Pixel Art (8-bit)",
            Self::PixelArt16Bit => "Pixel Art (16-bit)",
            Self::PixelArt32Bit => "Pixel Art (32-bit)",
            Self::PixelArt64Bit => "Pixel Art (64-bit)",
            Self::PixelArt128Bit => "High Def 2D (128-bit)",
            Self::Cartoon => "Cartoon",
            Self::DarkFantasy => "Dark Fantasy",
            Self::SciFi => "Sci-Fi",
            Self::Chibi => "Cute / Chibi",
            Self::Realistic => "Realistic 2D",
        }
    }
}

/// Weapon the character holds. [`SpriteWeapon::None`] means unarmed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SpriteWeapon {
    #[default]
    None,
    Sword,
    Dagger,
    Axe,
    Spear,
    Bow,
    Staff,
    Wand,
    Pistol,
    Rifle,
    LaserGun,
    PlasmaCannon,
    Shield,
    Claws,
}

impl SpriteWeapon {
    pub const ALL: [Self; 14] = [
        Self::None,
        Self::Sword,
        Self::Dagger,
        Self::Axe,
        Self::Spear,
        Self::Bow,
        Self::Staff,
        Self::Wand,
        Self::Pistol,
        Self::Rifle,
        Self::LaserGun,
        Self::PlasmaCannon,
        Self::Shield,
        Self::Claws,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Sword => "Sword",
            Self::Dagger => "Dagger",
            Self::Axe => "Axe",
            Self::Spear => "Spear",
            Self::Bow => "Bow & Arrow",
            Self::Staff => "Magic Staff",
            Self::Wand => "Wand",
            Self::Pistol => "Pistol",
            Self::Rifle => "Assault Rifle",
            Self::LaserGun => "Laser Gun",
            Self::PlasmaCannon => "Plasma Cannon",
            Self::Shield => "Shield & Weapon",
            Self::Claws => "Natural Claws",
        }
    }
}

/// Animation a frame belongs to.
///
/// [`AnimationState::Idle`] is the base state: every other state needs an
/// Idle frame to anchor the character's identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationState {
    #[default]
    Idle,
    Walk,
    Run,
    Jump,
    Attack,
    Hit,
    Death,
}

impl AnimationState {
    pub const ALL: [Self; 7] = [
        Self::Idle,
        Self::Walk,
        Self::Run,
        Self::Jump,
        Self::Attack,
        Self::Hit,
        Self::Death,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Walk => "Walk",
            Self::Run => "Run",
            Self::Jump => "Jump",
            Self::Attack => "Attack",
            Self::Hit => "Hit / Damage",
            Self::Death => "Death",
        }
    }

    /// Lowercase identifier used in file names (`walk_01.png`).
    pub fn slug(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Attack => "attack",
            Self::Hit => "hit",
            Self::Death => "death",
        }
    }

    pub fn is_base(self) -> bool {
        self == Self::Idle
    }

    /// Parse a slug or label, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|st| st.slug().eq_ignore_ascii_case(s) || st.label().eq_ignore_ascii_case(s))
    }
}

macro_rules! display_via_label {
    ($($ty:ty),+) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        })+
    };
}

display_via_label!(SpriteCategory, SpriteStyle, SpriteWeapon, AnimationState);

/// Default character description.
pub const DEFAULT_DESCRIPTION: &str = "A brave knight with silver armor and a red cape.";

/// Everything that determines a character's identity prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    pub category: SpriteCategory,
    pub style: SpriteStyle,
    pub weapon: SpriteWeapon,
    pub description: String,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            category: SpriteCategory::default(),
            style: SpriteStyle::default(),
            weapon: SpriteWeapon::default(),
            description: DEFAULT_DESCRIPTION.to_owned(),
        }
    }
}

/// Adjectives drawn by [`SpriteConfig::random`].
pub const RANDOM_ADJECTIVES: [&str; 9] = [
    "cybernetic",
    "cursed",
    "divine",
    "rusty",
    "glowing",
    "shadowy",
    "armored",
    "tiny",
    "giant",
];

impl SpriteConfig {
    pub fn new(
        category: SpriteCategory,
        style: SpriteStyle,
        weapon: SpriteWeapon,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category,
            style,
            weapon,
            description: description.into(),
        }
    }

    /// A random character: uniform picks over every category, style and
    /// weapon, described as "A {adjective} {category} wearing distinctive gear."
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let category = pick(rng, &SpriteCategory::ALL);
        let adjective = pick(rng, &RANDOM_ADJECTIVES);
        Self {
            category,
            style: pick(rng, &SpriteStyle::ALL),
            weapon: pick(rng, &SpriteWeapon::ALL),
            description: format!(
                "A {adjective} {} wearing distinctive gear.",
                category.label().to_lowercase()
            ),
        }
    }
}

fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}
