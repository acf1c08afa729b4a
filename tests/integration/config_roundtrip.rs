//! Configuration files driving a session.

use spriteforge::config::SecretRef;
use spriteforge::{AnimationState, ForgeConfig, SpriteForge, SpriteStyle, SpriteWeapon};

use crate::helpers::ScriptedBackend;

const CONFIG: &str = r#"
[backend]
model = "image-model-test"
api_key = { type = "literal", value = "k" }

[sprite]
category = "robot"
style = "sci-fi"
weapon = "laser-gun"
description = "a chrome sentry"

[postprocess]
tolerance = 30.0

[sequence]
max_frames = 4
"#;

#[tokio::test]
async fn file_config_shapes_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, CONFIG).unwrap();

    let config = ForgeConfig::from_file(&path).unwrap();
    assert_eq!(config.sprite.style, SpriteStyle::SciFi);
    assert_eq!(config.sprite.weapon, SpriteWeapon::LaserGun);
    assert_eq!(
        config.backend.api_key,
        SecretRef::Literal { value: "k".into() }
    );

    let backend = ScriptedBackend::new();
    let forge = SpriteForge::from_config(&config, backend.clone()).unwrap();
    forge.generate_base(|| true).await.unwrap();

    let request = &backend.requests()[0];
    assert_eq!(request.model, "image-model-test");
    assert!(request.prompt.contains("Sci-Fi 2D game sprite of a Robot"));
    assert!(request.prompt.contains("Description: a chrome sentry."));
    assert!(request.prompt.contains("wielding a Laser Gun"));

    let err = forge
        .generate_sequence(AnimationState::Walk, 5)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFIG_INVALID");
    assert_eq!(backend.request_count(), 1);
}

#[test]
fn saved_config_reloads_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spriteforge").join("config.toml");
    let config: ForgeConfig = toml::from_str(CONFIG).unwrap();
    config.save_to_file(&path).unwrap();
    assert_eq!(ForgeConfig::from_file(&path).unwrap(), config);
}
