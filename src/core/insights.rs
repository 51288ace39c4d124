//! Descriptive metadata derived for an assembled group.
//!
//! Every function takes all members of the group, requester included, so the
//! figures describe the group as it would actually meet.

use std::collections::HashMap;

use crate::core::tables::MatchTables;
use crate::models::domain::normalize;
use crate::models::{AgeRange, LocationSpread, MeetingMode, Profile, SpecialtyShare};

/// Maximum number of common interests reported per group
pub const MAX_COMMON_INTERESTS: usize = 6;

/// Specialty used in names when no member states one
const FALLBACK_SPECIALTY: &str = "Medical";

/// Count values in first-seen order, returning `(value, count)` sorted by
/// count descending with ties kept in first-seen order
fn ranked_counts<I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for value in values {
        match index.get(&value) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(value.clone(), order.len());
                order.push((value, 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
}

/// Interests (`kind:value`) held by at least two members, most frequent first
pub fn common_interests(members: &[&Profile]) -> Vec<String> {
    let labels = members.iter().flat_map(|member| {
        let mut seen: Vec<String> = member.interests.iter().map(|i| i.label()).collect();
        // A member counts once per interest
        dedup_in_order(&mut seen);
        seen
    });

    ranked_counts(labels)
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .take(MAX_COMMON_INTERESTS)
        .map(|(label, _)| label)
        .collect()
}

fn dedup_in_order(values: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    values.retain(|v| seen.insert(v.clone()));
}

/// Distinct normalized cities in first-seen order
fn distinct_cities(members: &[&Profile]) -> Vec<String> {
    let mut cities: Vec<String> = members.iter().filter_map(|m| m.city_key()).collect();
    dedup_in_order(&mut cities);
    cities
}

/// Distinct normalized specialties in first-seen order
fn distinct_specialties(members: &[&Profile]) -> Vec<String> {
    let mut specialties: Vec<String> = members.iter().filter_map(|m| m.specialty_key()).collect();
    dedup_in_order(&mut specialties);
    specialties
}

/// Youngest and oldest stated ages, if any member states one
pub fn age_range(members: &[&Profile]) -> Option<AgeRange> {
    let ages = members.iter().filter_map(|m| m.age);
    let min = ages.clone().min()?;
    let max = ages.max()?;
    Some(AgeRange { min, max })
}

/// 10 per distinct specialty, 5 per distinct city, plus twice the age span
/// (at most 20), capped at 100
pub fn diversity_score(members: &[&Profile]) -> u8 {
    let specialties = distinct_specialties(members).len();
    let cities = distinct_cities(members).len();
    let age_points = age_range(members)
        .map_or(0, |range| (range.span() as usize * 2).min(20));

    (specialties * 10 + cities * 5 + age_points).min(100) as u8
}

/// One shared city meets in person; a few cities go hybrid; otherwise virtual
pub fn meeting_mode(members: &[&Profile]) -> MeetingMode {
    match distinct_cities(members).len() {
        1 => MeetingMode::InPerson,
        0..=3 => MeetingMode::Hybrid,
        _ => MeetingMode::Virtual,
    }
}

/// Most common city as written by the first member who lives there
pub fn dominant_location(members: &[&Profile]) -> Option<String> {
    let (city, _) = ranked_counts(members.iter().filter_map(|m| m.city_key()))
        .into_iter()
        .next()?;

    Some(display_form(members, &city, |m| m.city.as_ref()))
}

/// Specialty counts, most common first, using the first member's spelling
pub fn specialty_mix(members: &[&Profile]) -> Vec<SpecialtyShare> {
    ranked_counts(members.iter().filter_map(|m| m.specialty_key()))
        .into_iter()
        .map(|(key, count)| SpecialtyShare {
            specialty: display_form(members, &key, |m| m.specialty.as_ref()),
            count,
        })
        .collect()
}

/// Distinct cities and countries, as first written
pub fn location_spread(members: &[&Profile]) -> LocationSpread {
    let cities = distinct_cities(members)
        .iter()
        .map(|key| display_form(members, key, |m| m.city.as_ref()))
        .collect();

    let mut country_keys: Vec<String> = members.iter().filter_map(|m| m.country_key()).collect();
    dedup_in_order(&mut country_keys);
    let countries = country_keys
        .iter()
        .map(|key| display_form(members, key, |m| m.country.as_ref()))
        .collect();

    LocationSpread { cities, countries }
}

/// Original spelling of a normalized key
fn display_form(
    members: &[&Profile],
    key: &str,
    field: impl Fn(&Profile) -> Option<&String>,
) -> String {
    members
        .iter()
        .copied()
        .filter_map(|m| field(m))
        .find(|raw| normalize(raw) == key)
        .map(|raw| raw.trim().to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Group name keyed off the top common interest
///
/// Falls back to "<specialty> <Interest> Enthusiasts" for interests the table
/// does not know, and "<specialty> Professionals" without common interests.
pub fn group_name(members: &[&Profile], common: &[String], tables: &MatchTables) -> String {
    let specialty = specialty_mix(members)
        .into_iter()
        .next()
        .map(|share| share.specialty)
        .unwrap_or_else(|| FALLBACK_SPECIALTY.to_string());

    match common.first() {
        Some(label) => {
            let value = interest_value(label);
            match tables.group_name(value) {
                Some(name) => name.to_string(),
                None => format!("{} {} Enthusiasts", specialty, title_case(value)),
            }
        }
        None => format!("{} Professionals", specialty),
    }
}

/// Value part of a `kind:value` label
fn interest_value(label: &str) -> &str {
    label.split_once(':').map_or(label, |(_, value)| value)
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-sentence description of who is in the group
pub fn group_description(members: &[&Profile], common: &[String], mode: MeetingMode) -> String {
    let mix = specialty_mix(members);
    let who = match mix.as_slice() {
        [] => format!("{} medical professionals", members.len()),
        [only] => format!("{} {} professionals", members.len(), only.specialty),
        _ => format!(
            "{} professionals across {} specialties",
            members.len(),
            mix.len()
        ),
    };

    let place = match dominant_location(members) {
        Some(city) => format!(" around {}", city),
        None => String::new(),
    };

    let shared = match common {
        [] => String::new(),
        _ => format!(
            " who share {}",
            common
                .iter()
                .take(3)
                .map(|label| interest_value(label))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };

    format!("{}{}{}. Suggested format: {}.", who, place, shared, mode)
}

/// Human-readable reason built from compatibility, interests, specialty and location
pub fn match_reason(members: &[&Profile], average_compatibility: u8, common: &[String]) -> String {
    let tier = match average_compatibility {
        85..=u8::MAX => "Exceptional compatibility",
        70..=84 => "Strong compatibility",
        55..=69 => "Good compatibility",
        _ => "Moderate compatibility",
    };

    let mut parts = vec![format!("{} ({}%)", tier, average_compatibility)];

    match common.len() {
        0 => {}
        1 => parts.push("1 shared interest".to_string()),
        n => parts.push(format!("{} shared interests", n)),
    }

    match distinct_specialties(members).len() {
        0 => {}
        1 => parts.push("same specialty".to_string()),
        n => parts.push(format!("{} complementary specialties", n)),
    }

    let cities = distinct_cities(members);
    match cities.len() {
        0 => {}
        1 => {
            if let Some(city) = dominant_location(members) {
                parts.push(format!("all based in {}", city));
            }
        }
        n => parts.push(format!("spread across {} cities", n)),
    }

    parts.join(" · ")
}
