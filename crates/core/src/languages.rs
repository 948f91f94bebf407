//! Target languages offered for narration translation.
//!
//! At least one per inhabited continent. `code` goes to the backend,
//! `label` is shown to the user.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub label: &'static str,
    pub continent: &'static str,
}

pub const TRANSLATION_LANGUAGES: &[Language] = &[
    Language { code: "en", label: "English", continent: "North America" },
    Language { code: "es", label: "Spanish", continent: "Europe / South America" },
    Language { code: "fr", label: "French", continent: "Europe" },
    Language { code: "de", label: "German", continent: "Europe" },
    Language { code: "pt", label: "Portuguese", continent: "South America" },
    Language { code: "ar", label: "Arabic (Egypt)", continent: "Africa" },
    Language { code: "sw", label: "Swahili", continent: "Africa" },
    Language { code: "hi", label: "Hindi", continent: "Asia" },
    Language { code: "zh", label: "Chinese (Mandarin)", continent: "Asia" },
    Language { code: "ja", label: "Japanese", continent: "Asia" },
    Language { code: "ko", label: "Korean", continent: "Asia" },
    Language { code: "mi", label: "Māori", continent: "Oceania" },
];

/// Find a language by code or label, case-insensitively.
pub fn find_language(query: &str) -> Option<&'static Language> {
    let query = query.trim();
    TRANSLATION_LANGUAGES
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case(query) || l.label.eq_ignore_ascii_case(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_code_and_label() {
        assert_eq!(find_language("ES").unwrap().label, "Spanish");
        assert_eq!(find_language("japanese").unwrap().code, "ja");
        assert!(find_language("klingon").is_none());
    }

    #[test]
    fn codes_are_unique() {
        for (i, a) in TRANSLATION_LANGUAGES.iter().enumerate() {
            assert!(TRANSLATION_LANGUAGES[i + 1..].iter().all(|b| b.code != a.code));
        }
    }
}
