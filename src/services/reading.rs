// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Best-effort decoding of AI identification replies.
//!
//! Vendors answer in loosely structured prose: keyed lines ("Name: Amethyst"),
//! numbered asks, bullet lists, markdown bold. The decoder pulls out what it
//! can recognize and leaves the rest alone; callers always keep the raw text,
//! so a miss here loses nothing.

use crate::models::CrystalDetails;

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Properties,
    Uses,
}

/// Decode structured crystal details from a free-text reply.
///
/// Returns `None` when nothing recognizable was found; the caller responds
/// with the raw text either way.
pub fn decode_reading(raw: &str) -> Option<CrystalDetails> {
    let mut details = CrystalDetails::default();
    let mut section: Option<Section> = None;
    let mut first_line: Option<String> = None;

    for line in raw.lines() {
        let cleaned = clean_line(line);
        if cleaned.is_empty() {
            continue;
        }

        if first_line.is_none() {
            first_line = Some(cleaned.clone());
        }

        if let Some((key, value)) = cleaned.split_once(':') {
            let key = key.trim().to_lowercase();
            let value = value.trim();

            if !value.is_empty() {
                if has_word(&key, &["name"]) {
                    if details.name.is_empty() {
                        details.name = value.to_string();
                    }
                    section = None;
                } else if has_word(&key, &["color", "colour"]) {
                    details.color.get_or_insert_with(|| value.to_string());
                    section = None;
                } else if has_word(&key, &["chakra", "chakras"]) {
                    details.chakra.get_or_insert_with(|| value.to_string());
                    section = None;
                } else if has_word(&key, &["type", "variant", "variety", "family"]) {
                    details.variant.get_or_insert_with(|| value.to_string());
                    section = None;
                } else if has_word(&key, &["description"]) {
                    details.description.get_or_insert_with(|| value.to_string());
                    section = None;
                } else if is_properties_key(&key) {
                    details.properties.extend(split_list(value));
                    section = Some(Section::Properties);
                } else if is_uses_key(&key) {
                    details.suggested_uses.extend(split_list(value));
                    section = Some(Section::Uses);
                } else {
                    section = None;
                }
                continue;
            }

            // Bare heading, bullets follow
            section = if is_properties_key(&key) {
                Some(Section::Properties)
            } else if is_uses_key(&key) {
                Some(Section::Uses)
            } else {
                None
            };
            continue;
        }

        if is_list_item(line) {
            match section {
                Some(Section::Properties) => details.properties.push(cleaned),
                Some(Section::Uses) => details.suggested_uses.push(cleaned),
                None => {}
            }
        }
    }

    // A terse reply may open with just the crystal name.
    if details.name.is_empty() {
        if let Some(first) = first_line {
            if !first.contains(':') && first.split_whitespace().count() <= 4 {
                details.name = first;
            }
        }
    }

    if details == CrystalDetails::default() {
        None
    } else {
        Some(details)
    }
}

/// Strip list markers, numbering, and bold markup from a line.
fn clean_line(line: &str) -> String {
    let mut s = line.trim().trim_start_matches(['-', '*', '•']).trim_start();

    let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = s[digits..].strip_prefix(['.', ')']) {
            s = rest.trim_start();
        }
    }

    s.replace("**", "").trim().to_string()
}

fn is_list_item(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with(['-', '*', '•']) || t.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Whole-word key match; substring tests misfire ("user's" contains "use").
fn has_word(key: &str, targets: &[&str]) -> bool {
    key.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| targets.contains(&word))
}

fn is_properties_key(key: &str) -> bool {
    key.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| word.starts_with("propert"))
}

fn is_uses_key(key: &str) -> bool {
    has_word(key, &["use", "uses", "usage"])
        || key
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|word| word.starts_with("suggest"))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|part| part.trim().trim_start_matches("and ").trim())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}
