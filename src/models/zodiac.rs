// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Zodiac sign enumeration used by horoscope and compatibility lookups.

use serde::{Deserialize, Serialize};

/// The twelve zodiac signs. Any other value is a validation error, never a
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// All signs, in traditional order.
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Parse a sign name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "aries" => Some(Self::Aries),
            "taurus" => Some(Self::Taurus),
            "gemini" => Some(Self::Gemini),
            "cancer" => Some(Self::Cancer),
            "leo" => Some(Self::Leo),
            "virgo" => Some(Self::Virgo),
            "libra" => Some(Self::Libra),
            "scorpio" => Some(Self::Scorpio),
            "sagittarius" => Some(Self::Sagittarius),
            "capricorn" => Some(Self::Capricorn),
            "aquarius" => Some(Self::Aquarius),
            "pisces" => Some(Self::Pisces),
            _ => None,
        }
    }

    /// Lower-case name, matching the horoscope table keys.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Aries => "aries",
            Self::Taurus => "taurus",
            Self::Gemini => "gemini",
            Self::Cancer => "cancer",
            Self::Leo => "leo",
            Self::Virgo => "virgo",
            Self::Libra => "libra",
            Self::Scorpio => "scorpio",
            Self::Sagittarius => "sagittarius",
            Self::Capricorn => "capricorn",
            Self::Aquarius => "aquarius",
            Self::Pisces => "pisces",
        }
    }

    /// Title-case name, matching the compatibility lists.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_signs() {
        for sign in ZodiacSign::ALL {
            assert_eq!(ZodiacSign::from_name(sign.name()), Some(sign));
            assert_eq!(ZodiacSign::from_name(sign.title()), Some(sign));
            assert_eq!(
                ZodiacSign::from_name(&sign.name().to_uppercase()),
                Some(sign)
            );
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(ZodiacSign::from_name("ophiuchus"), None);
        assert_eq!(ZodiacSign::from_name(""), None);
        assert_eq!(ZodiacSign::from_name("aries "), Some(ZodiacSign::Aries));
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&ZodiacSign::Sagittarius).unwrap();
        assert_eq!(json, "\"sagittarius\"");
        let back: ZodiacSign = serde_json::from_str("\"pisces\"").unwrap();
        assert_eq!(back, ZodiacSign::Pisces);
    }
}
