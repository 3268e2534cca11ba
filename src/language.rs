use std::env;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Stored app ui language, used to pick labels and descriptions.
pub trait LanguagePreferenceProvider: Send + Sync {
    fn current_app_language(&self) -> Option<String>;
}

/// Language of the system locale, used for search requests.
pub trait SystemLocale: Send + Sync {
    fn language(&self) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct StaticLanguagePreference(pub Option<String>);

impl LanguagePreferenceProvider for StaticLanguagePreference {
    fn current_app_language(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Reads the posix locale variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvLocale;

const LOCALE_VARIABLES: &[&str] = &["LC_ALL", "LC_MESSAGES", "LANG"];

impl SystemLocale for EnvLocale {
    fn language(&self) -> String {
        let locale = LOCALE_VARIABLES
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|value| !value.is_empty());

        locale
            .as_deref()
            .and_then(language_of_locale)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }
}

/// `fr_FR.UTF-8` -> `fr`
fn language_of_locale(locale: &str) -> Option<String> {
    let language = locale
        .split(|c| c == '_' || c == '.' || c == '@' || c == '-')
        .next()?
        .to_ascii_lowercase();

    match language.as_str() {
        "" | "c" | "posix" => None,
        _ => Some(language),
    }
}
