//! Localized message tables and template substitution.
//!
//! Some descriptor strings contain placeholder tokens (`#YOU`,
//! `#BACKGROUNDSELECT`, ...) that are substituted at compile time, which is
//! what makes background and playlist compilation locale-dependent.
//! Lookups normalize a few legacy aliases and fall back to the configured
//! default locale when a code has no table.

/// The message table for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    /// Normalized locale code this table belongs to.
    pub locale: &'static str,
    pub server_description: &'static str,
    pub you: &'static str,
    pub uploaded: &'static str,
    pub uploaded_subtitle: &'static str,
    pub background_select: &'static str,
    pub background_select_subtitle: &'static str,
}

impl Messages {
    /// Substitute playlist placeholder tokens.
    ///
    /// Longer tokens are replaced first: `#UPLOADEDSUB` contains
    /// `#UPLOADED` as a prefix, so the order is load-bearing.
    pub fn fill_playlist(&self, value: &str) -> String {
        value
            .replace("#UPLOADEDSUB", self.uploaded_subtitle)
            .replace("#UPLOADED", self.uploaded)
            .replace("#YOU", self.you)
    }

    /// Substitute background placeholder tokens. Same ordering constraint
    /// as [`fill_playlist`](Self::fill_playlist).
    pub fn fill_background(&self, value: &str) -> String {
        value
            .replace("#BACKGROUNDSELECTSUB", self.background_select_subtitle)
            .replace("#BACKGROUNDSELECT", self.background_select)
    }

    pub fn item_not_found(&self, item: &str, name: &str) -> String {
        format!("{item} item \"{name}\" not found.")
    }

    pub fn item_type_not_found(&self, item: &str) -> String {
        format!("Item \"{item}\" not found.")
    }

    pub fn items_not_found(&self, item: &str) -> String {
        format!("Could not find any {item}.")
    }

    pub fn items_not_found_search(&self, item: &str) -> String {
        format!("Could not find any {item} matching your search.")
    }
}

static EN: Messages = Messages {
    locale: "en",
    server_description: "The official Fermata custom server!",
    you: "You",
    uploaded: "Uploaded Levels",
    uploaded_subtitle: "Levels you uploaded",
    background_select: "Background Select",
    background_select_subtitle: "Pick the stage background",
};

static TABLES: &[&Messages] = &[&EN];

/// Locale lookup with alias normalization and default fallback.
#[derive(Debug, Clone)]
pub struct LocaleManager {
    default_locale: String,
}

impl LocaleManager {
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self { default_locale: default_locale.into() }
    }

    /// Normalize a requested locale code to the form tables are keyed by.
    pub fn normalize(code: &str) -> String {
        let code = code.to_ascii_lowercase();
        match code.as_str() {
            "zhs" => "zh-cn".to_string(),
            "zht" => "zh-tw".to_string(),
            _ => code,
        }
    }

    /// Resolve a locale code to its message table.
    ///
    /// Returns the table and the locale code compilation output should be
    /// cached under; a code with no table resolves to the default locale so
    /// every unknown code shares the default's cache entry.
    pub fn get(&self, code: &str) -> (&'static Messages, &'static str) {
        let normalized = Self::normalize(code);
        if let Some(table) = Self::lookup(&normalized) {
            return (table, table.locale);
        }
        match Self::lookup(&self.default_locale) {
            Some(table) => (table, table.locale),
            // The configured default has no table either; english always exists.
            None => (&EN, EN.locale),
        }
    }

    fn lookup(code: &str) -> Option<&'static Messages> {
        TABLES.iter().copied().find(|table| table.locale == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en", "en")]
    #[case("EN", "en")]
    #[case("zhs", "zh-cn")]
    #[case("zht", "zh-tw")]
    fn aliases_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(LocaleManager::normalize(input), expected);
    }

    #[test]
    fn unknown_locale_falls_back_to_default() {
        let manager = LocaleManager::new("en");
        let (messages, resolved) = manager.get("xx");
        assert_eq!(resolved, "en");
        assert_eq!(messages.locale, "en");
    }

    #[test]
    fn playlist_tokens_substitute_longest_first() {
        let manager = LocaleManager::new("en");
        let (messages, _) = manager.get("en");
        let filled = messages.fill_playlist("#UPLOADEDSUB / #UPLOADED / #YOU");
        assert_eq!(filled, "Levels you uploaded / Uploaded Levels / You");
        assert!(!filled.contains("#UPLOADEDSUB"));
    }

    #[test]
    fn background_tokens_substitute() {
        let (messages, _) = LocaleManager::new("en").get("en");
        assert_eq!(messages.fill_background("#BACKGROUNDSELECT"), "Background Select");
        assert_eq!(messages.fill_background("#BACKGROUNDSELECTSUB"), "Pick the stage background");
    }
}
