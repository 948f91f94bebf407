//! `reelsmith languages` — List translation languages.

use reelsmith_core::TRANSLATION_LANGUAGES;

pub fn run() {
    println!("  {:<6} {:<20} Continent", "Code", "Language");
    for language in TRANSLATION_LANGUAGES {
        println!(
            "  {:<6} {:<20} {}",
            language.code, language.label, language.continent
        );
    }
}
