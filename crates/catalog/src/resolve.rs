//! Cross-reference resolution for skins.
//!
//! Requests select a skin by theme, on behalf of a specific engine and
//! locale. The precedence here is a contract the tests pin down exactly.

use crate::error::{ErrorKind, Result};
use crate::models::{SkinItem, SkinRecord};

/// Pick the skin for a theme/engine/locale combination.
///
/// 1. Narrow to candidates matching the theme that the engine may use.
/// 2. Nothing left is an error naming the theme and engine.
/// 3. Prefer an exact locale match.
/// 4. Then a global (localeless) skin.
/// 5. Otherwise the first candidate.
pub fn select_skin<'a>(
    theme: &str,
    engine: &str,
    locale: &str,
    candidates: &'a [SkinRecord],
) -> Result<&'a SkinItem> {
    let matching: Vec<&SkinRecord> = candidates
        .iter()
        .filter(|record| record.theme == theme && record.supports_engine(engine))
        .collect();
    if matching.is_empty() {
        exn::bail!(ErrorKind::NoMatchingSkin {
            theme: theme.to_string(),
            engine: engine.to_string(),
        });
    }
    let chosen = matching
        .iter()
        .find(|record| record.locale.as_deref() == Some(locale))
        .or_else(|| matching.iter().find(|record| record.locale.is_none()))
        .unwrap_or(&matching[0]);
    tracing::debug!(theme, engine, locale, skin = chosen.item.name, "resolved skin");
    Ok(&chosen.item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fermata_repository::{AssetReference, ContentDigest};

    fn asset(tag: &str) -> AssetReference {
        AssetReference {
            hash: ContentDigest::from(tag),
            url: format!("/sonolus/repository/{tag}"),
        }
    }

    fn record(name: &str, theme: &str, engines: Option<&[&str]>, locale: Option<&str>) -> SkinRecord {
        SkinRecord {
            item: SkinItem {
                name: name.to_string(),
                source: None,
                version: SkinItem::VERSION,
                title: name.to_string(),
                subtitle: String::new(),
                author: String::new(),
                tags: Vec::new(),
                thumbnail: asset("t"),
                data: asset("d"),
                texture: asset("x"),
            },
            engines: engines.map(|list| list.iter().map(|s| s.to_string()).collect()),
            theme: theme.to_string(),
            locale: locale.map(str::to_string),
        }
    }

    #[test]
    fn exact_locale_wins_over_global() {
        let candidates = vec![
            record("global", "dark", None, None),
            record("japanese", "dark", None, Some("ja")),
        ];
        let chosen = select_skin("dark", "taiko", "ja", &candidates).unwrap();
        assert_eq!(chosen.name, "japanese");
    }

    #[test]
    fn global_wins_over_mismatched_locale() {
        let candidates = vec![
            record("korean", "dark", None, Some("ko")),
            record("global", "dark", None, None),
        ];
        let chosen = select_skin("dark", "taiko", "ja", &candidates).unwrap();
        assert_eq!(chosen.name, "global");
    }

    #[test]
    fn first_candidate_when_no_locale_fits() {
        let candidates = vec![
            record("korean", "dark", None, Some("ko")),
            record("chinese", "dark", None, Some("zh-cn")),
        ];
        let chosen = select_skin("dark", "taiko", "ja", &candidates).unwrap();
        assert_eq!(chosen.name, "korean");
    }

    #[test]
    fn engine_incompatible_skins_never_match() {
        let candidates = vec![
            record("mania-only", "dark", Some(&["mania"]), None),
            record("anywhere", "dark", None, None),
        ];
        let chosen = select_skin("dark", "taiko", "en", &candidates).unwrap();
        assert_eq!(chosen.name, "anywhere");
    }

    #[test]
    fn no_match_names_the_theme_and_engine() {
        let candidates = vec![record("light-only", "light", None, None)];
        let err = select_skin("dark", "taiko", "en", &candidates).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NoMatchingSkin { .. }));
        let message = err.to_string();
        assert!(message.contains("dark"));
        assert!(message.contains("taiko"));
    }
}
