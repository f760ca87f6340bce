//! Phrase dictionary for the translation tool.

use std::collections::HashMap;

use super::PhraseBook;

/// Phrase → language code → translation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPhraseBook {
    phrases: HashMap<String, HashMap<String, String>>,
    placeholders: HashMap<String, String>,
}

impl InMemoryPhraseBook {
    /// Dictionary with the demo English/Arabic/French phrases.
    pub fn seeded() -> Self {
        let entries: &[(&str, &str, &str, &str)] = &[
            ("Hello", "Hello", "مرحبا", "Bonjour"),
            (
                "Welcome to our real estate platform",
                "Welcome to our real estate platform",
                "مرحبًا بكم في منصة العقارات لدينا",
                "Bienvenue sur notre plateforme immobilière",
            ),
            ("Property", "Property", "عقار", "Propriété"),
            ("Location", "Location", "موقع", "Emplacement"),
            ("Price", "Price", "سعر", "Prix"),
            ("Bedrooms", "Bedrooms", "غرف نوم", "Chambres"),
            ("Bathrooms", "Bathrooms", "حمامات", "Salles de bain"),
            ("Area", "Area", "منطقة", "Surface"),
        ];

        let phrases = entries
            .iter()
            .map(|(phrase, en, ar, fr)| {
                let translations: HashMap<String, String> = [("en", *en), ("ar", *ar), ("fr", *fr)]
                    .into_iter()
                    .map(|(lang, text)| (lang.to_string(), text.to_string()))
                    .collect();
                (phrase.to_string(), translations)
            })
            .collect();

        let placeholders = [
            ("ar", "ترجمة النص (هذه ترجمة توضيحية)"),
            ("en", "Translated text (this is a placeholder translation)"),
            ("fr", "Texte traduit (ceci est une traduction indicative)"),
        ]
        .into_iter()
        .map(|(lang, text)| (lang.to_string(), text.to_string()))
        .collect();

        Self {
            phrases,
            placeholders,
        }
    }
}

impl PhraseBook for InMemoryPhraseBook {
    fn translate(&self, text: &str, target: &str) -> Option<String> {
        self.phrases.get(text)?.get(target).cloned()
    }

    fn placeholder(&self, target: &str) -> Option<String> {
        self.placeholders.get(target).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        let book = InMemoryPhraseBook::seeded();
        assert_eq!(book.translate("Hello", "ar").as_deref(), Some("مرحبا"));
        assert!(book.translate("hello", "ar").is_none());
        assert!(book.translate("Hello ", "ar").is_none());
        assert!(book.translate("Hello", "de").is_none());
    }

    #[test]
    fn test_placeholders() {
        let book = InMemoryPhraseBook::seeded();
        assert_eq!(
            book.placeholder("en").as_deref(),
            Some("Translated text (this is a placeholder translation)")
        );
        assert!(book.placeholder("es").is_none());
    }
}
