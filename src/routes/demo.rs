// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Demo surface: every endpoint answered from canned tables, no auth, no
//! outbound calls.
//!
//! Randomized fields (confidence, lucky numbers, prices) are presentation
//! flavor with no semantic contract.

use crate::error::{AppError, Result};
use crate::models::{CrystalFact, SubscriptionTier, ZodiacSign};
use crate::routes::billing::CheckoutRequest;
use crate::routes::crystal::{self, IdentifyRequest};
use crate::routes::guidance::GuidanceRequest;
use crate::time_utils;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

/// All demo routes; none require authentication.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/crystal/identify", post(identify_crystal))
        .route("/api/guidance/personalized", post(personalized_guidance))
        .route("/api/horoscope/{sign}", get(daily_horoscope))
        .route("/api/crystals/database", get(crystal::crystal_database))
        .route("/api/subscription/checkout", post(create_checkout))
        .route("/api/user/profile", get(user_profile))
        .route("/api/marketplace/listings", get(marketplace_listings))
        .route("/api/moon/current-phase", get(current_moon_phase))
}

// ─── Identification ──────────────────────────────────────────

#[derive(Serialize)]
struct PersonalizedInsights {
    zodiac_compatibility: bool,
    chakra_alignment: String,
    recommendation: String,
    usage_suggestion: String,
}

#[derive(Serialize)]
struct TierBenefits {
    current: &'static str,
    upgrade_message: &'static str,
}

#[derive(Serialize)]
struct DemoIdentifyResponse {
    success: bool,
    crystal: CrystalFact,
    confidence: f64,
    personalized_insights: PersonalizedInsights,
    usage_remaining: u32,
    tier_benefits: TierBenefits,
}

/// Canned identification: first reference entry whose name or color appears
/// in the description, personalized from the request's context map.
async fn identify_crystal(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<IdentifyRequest>,
) -> Result<Json<DemoIdentifyResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let fact = state.catalog.match_description(&payload.description).clone();

    let user_zodiac = payload
        .user_context
        .get("zodiac_sign")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    // Strict membership, so the "All signs" wildcard does not flip this flag.
    let zodiac_match = fact
        .zodiac_compatibility
        .iter()
        .any(|sign| *sign == title_words(user_zodiac));

    let recommendation = if zodiac_match {
        format!("Perfect for {user_zodiac} energy!")
    } else {
        format!("A wonderful complement to {user_zodiac} energy")
    };

    let insights = PersonalizedInsights {
        zodiac_compatibility: zodiac_match,
        chakra_alignment: format!("This crystal resonates with your {} chakra", fact.chakra),
        recommendation,
        usage_suggestion: format!(
            "Try placing {} on your {} chakra during meditation",
            fact.name,
            fact.chakra.to_lowercase()
        ),
    };

    Ok(Json(DemoIdentifyResponse {
        success: true,
        crystal: fact,
        confidence: rand::thread_rng().gen_range(0.85..0.98),
        personalized_insights: insights,
        usage_remaining: 4,
        tier_benefits: TierBenefits {
            current: "free",
            upgrade_message:
                "Upgrade to Premium for unlimited identifications and detailed crystal histories!",
        },
    }))
}

/// Title-case each whitespace-separated word, the way the context map's
/// zodiac values are matched against compatibility lists.
fn title_words(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ─── Guidance ────────────────────────────────────────────────

#[derive(Serialize)]
struct DemoGuidanceContext {
    zodiac_sign: Value,
    owned_crystals: Value,
    moon_phase: &'static str,
    guidance_type: String,
}

#[derive(Serialize)]
struct TierInfo {
    current: &'static str,
    available_features: [&'static str; 2],
    premium_features: [&'static str; 3],
}

#[derive(Serialize)]
struct DemoGuidanceResponse {
    success: bool,
    guidance: String,
    context_used: DemoGuidanceContext,
    follow_up_suggestions: [&'static str; 3],
    tier_info: TierInfo,
}

/// Canned guidance selected by keyword bucket.
async fn personalized_guidance(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GuidanceRequest>,
) -> Result<Json<DemoGuidanceResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let guidance = state.catalog.guidance_reply(&payload.query);

    let context = DemoGuidanceContext {
        zodiac_sign: payload
            .user_context
            .get("zodiac_sign")
            .cloned()
            .unwrap_or_else(|| Value::String("Unknown".to_string())),
        owned_crystals: payload
            .user_context
            .get("owned_crystals")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new())),
        moon_phase: "Waxing Crescent",
        guidance_type: payload.guidance_type,
    };

    Ok(Json(DemoGuidanceResponse {
        success: true,
        guidance,
        context_used: context,
        follow_up_suggestions: [
            "Journal about any insights that come up",
            "Create a crystal grid with your guidance crystals",
            "Set intentions during tonight's moon phase",
        ],
        tier_info: TierInfo {
            current: "demo",
            available_features: ["Basic guidance", "Crystal recommendations"],
            premium_features: [
                "Deep astrological analysis",
                "Personalized rituals",
                "Dream interpretation",
            ],
        },
    }))
}

// ─── Horoscope ───────────────────────────────────────────────

#[derive(Serialize)]
struct PlanetaryInfluences {
    dominant: &'static str,
    supporting: &'static str,
    aspect: &'static str,
}

#[derive(Serialize)]
struct DemoHoroscopeResponse {
    success: bool,
    zodiac_sign: &'static str,
    date: String,
    horoscope: &'static str,
    daily_crystal: String,
    lucky_numbers: Vec<u32>,
    moon_phase: &'static str,
    planetary_influences: PlanetaryInfluences,
    compatible_crystals: Vec<String>,
    spiritual_advice: String,
}

/// Canned daily horoscope with crystal recommendations.
async fn daily_horoscope(
    State(state): State<Arc<AppState>>,
    Path(sign): Path<String>,
) -> Result<Json<DemoHoroscopeResponse>> {
    let sign = ZodiacSign::from_name(&sign)
        .ok_or_else(|| AppError::BadRequest("Invalid zodiac sign".to_string()))?;

    let compatible_crystals = state.catalog.compatible_with(sign);

    let mut rng = rand::thread_rng();
    let daily_crystal = compatible_crystals
        .choose(&mut rng)
        .cloned()
        .unwrap_or_else(|| "Clear Quartz".to_string());
    let lucky_numbers: Vec<u32> = (0..3).map(|_| rng.gen_range(1..=50)).collect();

    Ok(Json(DemoHoroscopeResponse {
        success: true,
        zodiac_sign: sign.title(),
        date: time_utils::today_key(),
        horoscope: state.catalog.daily_horoscope(sign),
        daily_crystal,
        lucky_numbers,
        moon_phase: "Waxing Crescent",
        planetary_influences: PlanetaryInfluences {
            dominant: "Venus",
            supporting: "Moon",
            aspect: "Harmonious",
        },
        compatible_crystals,
        spiritual_advice: format!(
            "Today's energy supports {} in manifestation work. Focus on your heart's desires.",
            sign.name()
        ),
    }))
}

// ─── Checkout ────────────────────────────────────────────────

#[derive(Serialize)]
struct DemoCheckoutResponse {
    success: bool,
    checkout_url: String,
    session_id: String,
    tier: &'static str,
    price: &'static str,
    features: [&'static str; 3],
    demo_mode: bool,
}

/// Canned checkout session; no payment provider involved.
async fn create_checkout(Json(payload): Json<CheckoutRequest>) -> Result<Json<DemoCheckoutResponse>> {
    let tier = SubscriptionTier::from_name(&payload.tier)
        .ok_or_else(|| AppError::BadRequest("Invalid subscription tier".to_string()))?;

    let (price, features) = match tier {
        SubscriptionTier::Premium => (
            "$9.99/month",
            ["30 daily IDs", "Unlimited crystals", "Marketplace access"],
        ),
        SubscriptionTier::Pro => (
            "$19.99/month",
            ["Unlimited IDs", "Advanced AI", "Priority support"],
        ),
        SubscriptionTier::Founders => (
            "$199 lifetime",
            ["All features", "Lifetime access", "Exclusive content"],
        ),
        SubscriptionTier::Free => {
            return Err(AppError::BadRequest("Invalid subscription tier".to_string()))
        }
    };

    let session_suffix: String = uuid::Uuid::new_v4().simple().to_string()[..16].to_string();

    Ok(Json(DemoCheckoutResponse {
        success: true,
        checkout_url: format!("https://demo-stripe-checkout.com/subscribe/{}", tier.as_str()),
        session_id: format!("cs_demo_{session_suffix}"),
        tier: tier.as_str(),
        price,
        features,
        demo_mode: true,
    }))
}

// ─── Profile ─────────────────────────────────────────────────

#[derive(Serialize)]
struct DemoDailyUsage {
    identifications: u32,
    guidance_queries: u32,
    limit: u32,
}

#[derive(Serialize)]
struct DemoPreferences {
    favorite_chakra: &'static str,
    meditation_style: &'static str,
    astrology_interest: &'static str,
}

#[derive(Serialize)]
struct DemoProfile {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    zodiac_sign: &'static str,
    birth_date: &'static str,
    subscription_tier: &'static str,
    owned_crystals: [&'static str; 2],
    daily_usage: DemoDailyUsage,
    spiritual_preferences: DemoPreferences,
}

#[derive(Serialize)]
struct DemoProfileResponse {
    success: bool,
    profile: DemoProfile,
}

/// The fixed demo user.
async fn user_profile() -> Json<DemoProfileResponse> {
    Json(DemoProfileResponse {
        success: true,
        profile: DemoProfile {
            id: "demo_user_123",
            name: "Crystal Seeker",
            email: "demo@crystalgrimoire.com",
            zodiac_sign: "Pisces",
            birth_date: "1990-03-15",
            subscription_tier: "free",
            owned_crystals: ["Amethyst", "Rose Quartz"],
            daily_usage: DemoDailyUsage {
                identifications: 2,
                guidance_queries: 1,
                limit: 5,
            },
            spiritual_preferences: DemoPreferences {
                favorite_chakra: "Heart",
                meditation_style: "Crystal grids",
                astrology_interest: "Daily horoscopes",
            },
        },
    })
}

// ─── Marketplace ─────────────────────────────────────────────

#[derive(Serialize)]
struct Listing {
    id: String,
    crystal_name: &'static str,
    price: f64,
    seller: String,
    seller_rating: f64,
    image_url: String,
    description: String,
    shipping: &'static str,
    in_stock: bool,
}

#[derive(Serialize)]
struct MarketplaceFilters {
    price_range: [f64; 2],
    categories: [&'static str; 4],
    crystals: [&'static str; 4],
}

#[derive(Serialize)]
struct MarketplaceResponse {
    success: bool,
    listings: Vec<Listing>,
    total_count: usize,
    filters: MarketplaceFilters,
}

const LISTING_NAMES: [&str; 4] = [
    "Amethyst Cluster",
    "Rose Quartz Tower",
    "Clear Quartz Sphere",
    "Labradorite Palm Stone",
];

/// Canned marketplace listings with randomized price and stock flavor.
async fn marketplace_listings() -> Json<MarketplaceResponse> {
    let mut rng = rand::thread_rng();

    let listings: Vec<Listing> = LISTING_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| Listing {
            id: format!("listing_{}", i + 1),
            crystal_name: name,
            price: (rng.gen_range(15.99f64..299.99) * 100.0).round() / 100.0,
            seller: format!("CrystalVendor{}", i + 1),
            seller_rating: (rng.gen_range(4.2f64..5.0) * 10.0).round() / 10.0,
            image_url: format!("/api/images/crystal_{}.jpg", i + 1),
            description: format!(
                "Beautiful {} perfect for meditation and healing work.",
                name.to_lowercase()
            ),
            shipping: "Free shipping over $50",
            in_stock: rng.gen_range(0..4) < 3,
        })
        .collect();

    Json(MarketplaceResponse {
        success: true,
        total_count: listings.len(),
        listings,
        filters: MarketplaceFilters {
            price_range: [15.99, 299.99],
            categories: ["Towers", "Clusters", "Spheres", "Palm Stones"],
            crystals: ["Amethyst", "Rose Quartz", "Clear Quartz", "Labradorite"],
        },
    })
}

// ─── Moon Phase ──────────────────────────────────────────────

#[derive(Serialize)]
struct MoonPhaseResponse {
    success: bool,
    current_phase: &'static str,
    phase_percentage: f64,
    next_full_moon: &'static str,
    next_new_moon: &'static str,
    recommended_crystals: [&'static str; 3],
    ritual_suggestions: [&'static str; 3],
    energy_description: &'static str,
}

/// Canned moon phase bundle.
async fn current_moon_phase() -> Json<MoonPhaseResponse> {
    Json(MoonPhaseResponse {
        success: true,
        current_phase: "Waxing Crescent",
        phase_percentage: 23.5,
        next_full_moon: "2024-02-24T12:30:00Z",
        next_new_moon: "2024-03-10T09:00:00Z",
        recommended_crystals: ["Moonstone", "Selenite", "Clear Quartz"],
        ritual_suggestions: [
            "Set new intentions for manifestation",
            "Charge crystals under moonlight",
            "Practice gratitude meditation",
        ],
        energy_description: "Growing energy perfect for building and creating new projects",
    })
}
