use std::collections::HashSet;

use crate::core::{career::career_stage, tables::MatchTables};
use crate::models::{Profile, ScoreBreakdown, ScoringWeights};

/// Share of the specialty weight for related specialties
const RELATED_SPECIALTY_FACTOR: f64 = 0.72;
/// Share of the specialty weight for unrelated specialties
const OTHER_SPECIALTY_FACTOR: f64 = 0.32;

/// Points per exact `(kind, value)` interest match
const EXACT_INTEREST_POINTS: f64 = 10.0;
/// Points per interest kind present on both sides
const SHARED_KIND_POINTS: f64 = 3.0;

/// Age difference tiers: (max difference, share of weight)
const AGE_TIERS: &[(u8, f64)] = &[(3, 1.0), (7, 0.80), (12, 0.53), (18, 0.33)];
const AGE_FLOOR_FACTOR: f64 = 0.13;

/// Career stage shares indexed by stage distance; further apart uses the last
const CAREER_FACTORS: &[f64] = &[1.0, 0.67, 0.33];

/// Calculate the compatibility score (0-100) between two profiles
///
/// Scoring formula:
/// score = round(earned / available * 100)
///
/// where `available` only sums the weights of dimensions that could be
/// evaluated. Specialty, location and age drop out when either side lacks the
/// data; interests and career stage always count.
pub fn compatibility_score(
    a: &Profile,
    b: &Profile,
    weights: &ScoringWeights,
    tables: &MatchTables,
) -> u8 {
    score_breakdown(a, b, weights, tables).score
}

/// Same as [`compatibility_score`] but keeps the per-dimension points
pub fn score_breakdown(
    a: &Profile,
    b: &Profile,
    weights: &ScoringWeights,
    tables: &MatchTables,
) -> ScoreBreakdown {
    let specialty = specialty_points(a, b, weights.specialty, tables);
    let location = location_points(a, b, weights.location);
    let age = age_points(a, b, weights.age);
    let interests = interest_points(a, b, weights.interests);
    let career_stage = career_points(a, b, weights.career);

    let mut earned = interests + career_stage;
    let mut available = weights.interests + weights.career;

    for (points, weight) in [
        (specialty, weights.specialty),
        (location, weights.location),
        (age, weights.age),
    ] {
        if let Some(points) = points {
            earned += points;
            available += weight;
        }
    }

    let score = if available > 0.0 {
        (earned / available * 100.0).round().clamp(0.0, 100.0) as u8
    } else {
        0
    };

    ScoreBreakdown {
        specialty,
        location,
        age,
        interests,
        career_stage,
        earned,
        available,
        score,
    }
}

/// Specialty points, or `None` if either profile has no specialty
#[inline]
fn specialty_points(a: &Profile, b: &Profile, weight: f64, tables: &MatchTables) -> Option<f64> {
    let (sa, sb) = (a.specialty_key()?, b.specialty_key()?);

    let factor = if sa == sb {
        1.0
    } else if tables.are_related(&sa, &sb) {
        RELATED_SPECIALTY_FACTOR
    } else {
        OTHER_SPECIALTY_FACTOR
    };

    Some(weight * factor)
}

/// Location points, or `None` if either profile has no location data
///
/// A tier only matches when both sides carry that field.
#[inline]
fn location_points(a: &Profile, b: &Profile, weight: f64) -> Option<f64> {
    if !a.has_location() || !b.has_location() {
        return None;
    }

    let same = |x: Option<String>, y: Option<String>| matches!((x, y), (Some(x), Some(y)) if x == y);

    let factor = if same(a.city_key(), b.city_key()) {
        1.0
    } else if same(a.state_key(), b.state_key()) {
        0.75
    } else if same(a.country_key(), b.country_key()) {
        0.50
    } else {
        0.25
    };

    Some(weight * factor)
}

/// Age points, or `None` if either age is missing
#[inline]
fn age_points(a: &Profile, b: &Profile, weight: f64) -> Option<f64> {
    let diff = a.age?.abs_diff(b.age?);

    let factor = AGE_TIERS
        .iter()
        .find(|(max_diff, _)| diff <= *max_diff)
        .map_or(AGE_FLOOR_FACTOR, |(_, factor)| *factor);

    Some(weight * factor)
}

/// Interest points: exact pairs plus shared kinds, capped at the weight
#[inline]
fn interest_points(a: &Profile, b: &Profile, weight: f64) -> f64 {
    let pairs_a: HashSet<(String, String)> = a.interests.iter().map(|i| i.key()).collect();
    let pairs_b: HashSet<(String, String)> = b.interests.iter().map(|i| i.key()).collect();

    let kinds_a: HashSet<&str> = pairs_a.iter().map(|(kind, _)| kind.as_str()).collect();
    let kinds_b: HashSet<&str> = pairs_b.iter().map(|(kind, _)| kind.as_str()).collect();

    let exact = pairs_a.intersection(&pairs_b).count() as f64;
    let shared_kinds = kinds_a.intersection(&kinds_b).count() as f64;

    (exact * EXACT_INTEREST_POINTS + shared_kinds * SHARED_KIND_POINTS).min(weight)
}

/// Career stage points from the distance between derived stages
#[inline]
fn career_points(a: &Profile, b: &Profile, weight: f64) -> f64 {
    let distance = career_stage(a).distance(career_stage(b)) as usize;
    let factor = CAREER_FACTORS[distance.min(CAREER_FACTORS.len() - 1)];

    weight * factor
}
