use amdetect::presentation::{Environment, Settings};

#[test]
fn given_no_overrides_when_loading_settings_then_uses_production_defaults() {
    let settings = Settings::from_env();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 8001);
    assert_eq!(settings.model.primary_model, "jakeBland/wav2vec-vm-finetune");
    assert_eq!(settings.model.fallback_model, "facebook/wav2vec2-base-960h");
    assert_eq!(settings.environment, Environment::Local);
}

#[test]
fn given_known_names_when_parsing_environment_then_resolves_variant() {
    assert_eq!("local".parse::<Environment>().unwrap(), Environment::Local);
    assert_eq!("test".parse::<Environment>().unwrap(), Environment::Test);
    assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Prod);
    assert_eq!(
        "PRODUCTION".parse::<Environment>().unwrap(),
        Environment::Prod
    );
}

#[test]
fn given_unknown_name_when_parsing_environment_then_returns_error() {
    assert!("staging".parse::<Environment>().is_err());
}

#[test]
fn given_environment_when_displaying_then_renders_lowercase_name() {
    assert_eq!(Environment::Prod.to_string(), "prod");
}
