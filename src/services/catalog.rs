// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Built-in crystal reference data and canned guidance/horoscope text.
//!
//! This is the whole data source in demo mode and the static database plus
//! fallback text in unified mode. The entries are deliberately small; the
//! full mineral encyclopedia lives client-side.

use crate::models::{CrystalFact, ZodiacSign};
use rand::seq::SliceRandom;
use serde::Serialize;

const GUIDANCE_PARAGRAPHS: [&str; 4] = [
    "Based on your spiritual profile, I sense you're entering a period of deep transformation. The crystals in your collection, particularly amethyst, are perfectly aligned with your current energy. Consider placing amethyst under your pillow tonight to enhance dream clarity.",
    "Your birth chart shows strong water element influence, which resonates beautifully with rose quartz energy. This is an excellent time for heart chakra healing work. Try holding rose quartz during meditation and focus on self-love affirmations.",
    "The current lunar phase supports releasing old patterns. Clear quartz would be perfect for this work - it will amplify your intentions while cleansing stagnant energy. Create a simple crystal grid with your clear quartz at the center.",
    "I notice Scorpio influence in your chart, suggesting you're naturally drawn to transformation work. Black tourmaline would be a powerful addition to your collection for protection during this deep spiritual work.",
];

/// Category lists surfaced by the database endpoint.
#[derive(Debug, Serialize)]
pub struct CatalogCategories {
    pub chakras: Vec<&'static str>,
    pub colors: Vec<&'static str>,
    pub purposes: Vec<&'static str>,
}

/// Static crystal reference data with keyword-driven canned responses.
#[derive(Clone)]
pub struct CrystalCatalog {
    facts: Vec<CrystalFact>,
}

impl Default for CrystalCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CrystalCatalog {
    pub fn new() -> Self {
        let facts = vec![
            fact(
                "Amethyst",
                "Quartz",
                "Purple",
                "Crown",
                &["Spiritual protection", "Enhanced intuition", "Stress relief"],
                &["Pisces", "Virgo", "Aquarius"],
                "A powerful protective stone that transforms negative energy into love.",
            ),
            fact(
                "Rose Quartz",
                "Quartz",
                "Pink",
                "Heart",
                &["Unconditional love", "Emotional healing", "Self-compassion"],
                &["Taurus", "Libra"],
                "The stone of unconditional love, promoting deep inner healing.",
            ),
            fact(
                "Clear Quartz",
                "Quartz",
                "Clear",
                "Crown",
                &["Amplification", "Clarity", "Energy cleansing"],
                &["All signs"],
                "The master healer that amplifies energy and brings clarity.",
            ),
        ];

        Self { facts }
    }

    /// All reference entries, in catalog order.
    pub fn facts(&self) -> &[CrystalFact] {
        &self.facts
    }

    /// Match a free-text description to a catalog entry.
    ///
    /// Picks the first entry whose name or color appears as a substring of
    /// the description (case-insensitive). Falls back to the first entry so
    /// every description produces an identification.
    pub fn match_description(&self, description: &str) -> &CrystalFact {
        let description = description.to_lowercase();

        self.facts
            .iter()
            .find(|fact| {
                description.contains(&fact.name.to_lowercase())
                    || description.contains(&fact.color.to_lowercase())
            })
            .unwrap_or(&self.facts[0])
    }

    /// Names of entries compatible with a sign, including "All signs" entries.
    pub fn compatible_with(&self, sign: ZodiacSign) -> Vec<String> {
        self.facts
            .iter()
            .filter(|fact| fact.is_compatible_with(sign.title()))
            .map(|fact| fact.name.clone())
            .collect()
    }

    /// Canned daily horoscope line for a sign.
    pub fn daily_horoscope(&self, sign: ZodiacSign) -> &'static str {
        match sign {
            ZodiacSign::Aries => "Today brings fiery energy perfect for new beginnings. Your ruling planet Mars encourages bold action.",
            ZodiacSign::Taurus => "Venus blesses you with harmony and beauty today. Focus on material stability and sensual pleasures.",
            ZodiacSign::Gemini => "Mercury enhances your communication skills. It's a perfect day for learning and social connections.",
            ZodiacSign::Cancer => "The Moon illuminates your emotional depths. Trust your intuition and nurture those you love.",
            ZodiacSign::Leo => "The Sun radiates through you today. Step into your power and let your creativity shine brightly.",
            ZodiacSign::Virgo => "Earth energy grounds you in practical matters. Pay attention to details and health routines.",
            ZodiacSign::Libra => "Venus brings balance to relationships. Seek harmony and beauty in all your interactions.",
            ZodiacSign::Scorpio => "Pluto stirs transformative energies. Embrace change and dive deep into mysteries.",
            ZodiacSign::Sagittarius => "Jupiter expands your horizons. Adventure and higher learning call to your spirit.",
            ZodiacSign::Capricorn => "Saturn supports your ambitions. Structure and discipline lead to lasting achievements.",
            ZodiacSign::Aquarius => "Uranus sparks innovation. Think outside the box and embrace your unique perspective.",
            ZodiacSign::Pisces => "Neptune enhances your psychic abilities. Dreams and intuition guide your way forward.",
        }
    }

    /// Canned guidance keyed off query keywords.
    ///
    /// Keyword buckets get a fixed paragraph plus a crystal tip; anything
    /// else gets one of the four paragraphs at random.
    pub fn guidance_reply(&self, query: &str) -> String {
        let query = query.to_lowercase();

        if query.contains("anxious") || query.contains("stress") {
            format!(
                "{} For anxiety relief, try amethyst or rose quartz in a calming meditation.",
                GUIDANCE_PARAGRAPHS[0]
            )
        } else if query.contains("love") || query.contains("relationship") {
            format!(
                "{} Rose quartz is your ally in matters of the heart.",
                GUIDANCE_PARAGRAPHS[1]
            )
        } else if query.contains("transformation") || query.contains("change") {
            format!(
                "{} Clear quartz will amplify your transformational work.",
                GUIDANCE_PARAGRAPHS[2]
            )
        } else {
            let mut rng = rand::thread_rng();
            GUIDANCE_PARAGRAPHS
                .choose(&mut rng)
                .copied()
                .unwrap_or(GUIDANCE_PARAGRAPHS[0])
                .to_string()
        }
    }

    /// The four base guidance paragraphs, for membership checks.
    pub fn guidance_paragraphs(&self) -> &'static [&'static str] {
        &GUIDANCE_PARAGRAPHS
    }

    pub fn categories(&self) -> CatalogCategories {
        CatalogCategories {
            chakras: vec!["Crown", "Heart", "Throat", "Solar Plexus", "Sacral", "Root"],
            colors: vec!["Purple", "Pink", "Clear", "Blue", "Yellow", "Orange", "Red"],
            purposes: vec!["Protection", "Love", "Healing", "Manifestation", "Clarity"],
        }
    }
}

fn fact(
    name: &str,
    mineral_type: &str,
    color: &str,
    chakra: &str,
    properties: &[&str],
    zodiac: &[&str],
    description: &str,
) -> CrystalFact {
    CrystalFact {
        name: name.to_string(),
        mineral_type: mineral_type.to_string(),
        color: color.to_string(),
        chakra: chakra.to_string(),
        properties: properties.iter().map(|s| s.to_string()).collect(),
        zodiac_compatibility: zodiac.iter().map(|s| s.to_string()).collect(),
        description: description.to_string(),
    }
}
