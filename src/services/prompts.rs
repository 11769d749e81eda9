// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Prompt builders for the AI vendors.
//!
//! Prompts fold in the caller's profile so replies read as personal advice
//! rather than encyclopedia entries. Image bytes never go upstream; an
//! attached photo is only flagged in the prompt text.

use crate::models::{UserProfile, ZodiacSign};

/// Prompt for identifying a crystal from a description.
pub fn identify_prompt(profile: &UserProfile, description: &str, has_image: bool) -> String {
    let zodiac = profile.zodiac_preference().unwrap_or("Unknown");

    let mut prompt = format!(
        "User Context:\n\
         - Name: {}\n\
         - Zodiac Sign: {}\n\
         - Subscription: {}\n\
         \n\
         Crystal Identification Request:\n\
         Description: {}\n\
         \n\
         Please identify this crystal and provide:\n\
         1. Crystal name and type\n\
         2. Metaphysical properties\n\
         3. Chakra associations\n\
         4. How it aligns with the user's zodiac sign\n\
         5. Suggested uses based on their profile",
        profile.name,
        zodiac,
        profile.subscription_tier.as_str(),
        description
    );

    if has_image {
        prompt.push_str("\n[Image data provided]");
    }

    prompt
}

/// Prompt for a personalized guidance reply.
pub fn guidance_prompt(profile: &UserProfile, query: &str, guidance_type: &str) -> String {
    let zodiac_info = profile
        .spiritual_preferences
        .get("zodiac_info")
        .map(|v| v.to_string())
        .unwrap_or_else(|| "{}".to_string());

    format!(
        "PERSONALIZED GUIDANCE REQUEST\n\
         \n\
         User Profile:\n\
         - Name: {}\n\
         - Astrological Info: {}\n\
         - Subscription Level: {}\n\
         \n\
         Query: {}\n\
         Guidance Type: {}\n\
         \n\
         Please provide deeply personalized guidance that:\n\
         1. Addresses their specific question\n\
         2. Incorporates their astrological profile\n\
         3. Suggests crystals they might benefit from\n\
         4. Offers actionable spiritual practices\n\
         5. Feels like advice from a trusted spiritual mentor",
        profile.name,
        zodiac_info,
        profile.subscription_tier.as_str(),
        query,
        guidance_type
    )
}

/// Prompt for an AI-generated daily horoscope, requesting JSON output.
pub fn horoscope_prompt(sign: ZodiacSign) -> String {
    format!(
        "Generate a personalized daily horoscope for {}.\n\
         Include:\n\
         - General outlook\n\
         - Love and relationships\n\
         - Career and money\n\
         - Health and wellness\n\
         - Lucky crystal for today\n\
         - Lucky numbers\n\
         Format as JSON with these keys.",
        sign.name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile() -> UserProfile {
        let mut profile = UserProfile::new_default(
            "uid-1".to_string(),
            Some("seeker@example.com".to_string()),
            Some("Luna".to_string()),
        );
        profile
            .spiritual_preferences
            .insert("zodiac_sign".to_string(), json!("pisces"));
        profile
    }

    #[test]
    fn test_identify_prompt_includes_context() {
        let prompt = identify_prompt(&profile(), "a purple cluster", false);
        assert!(prompt.contains("- Name: Luna"));
        assert!(prompt.contains("- Zodiac Sign: pisces"));
        assert!(prompt.contains("- Subscription: free"));
        assert!(prompt.contains("Description: a purple cluster"));
        assert!(prompt.contains("5. Suggested uses based on their profile"));
        assert!(!prompt.contains("[Image data provided]"));
    }

    #[test]
    fn test_identify_prompt_flags_image() {
        let prompt = identify_prompt(&profile(), "shiny stone", true);
        assert!(prompt.ends_with("[Image data provided]"));
    }

    #[test]
    fn test_identify_prompt_unknown_zodiac() {
        let plain = UserProfile::new_default("uid-2".to_string(), None, None);
        let prompt = identify_prompt(&plain, "stone", false);
        assert!(prompt.contains("- Zodiac Sign: Unknown"));
    }

    #[test]
    fn test_guidance_prompt_includes_query() {
        let prompt = guidance_prompt(&profile(), "how do I find calm?", "healing");
        assert!(prompt.starts_with("PERSONALIZED GUIDANCE REQUEST"));
        assert!(prompt.contains("Query: how do I find calm?"));
        assert!(prompt.contains("Guidance Type: healing"));
        assert!(prompt.contains("- Astrological Info: {}"));
    }

    #[test]
    fn test_horoscope_prompt_requests_json() {
        let prompt = horoscope_prompt(ZodiacSign::Scorpio);
        assert!(prompt.contains("daily horoscope for scorpio"));
        assert!(prompt.ends_with("Format as JSON with these keys."));
    }
}
