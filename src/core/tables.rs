use std::collections::HashMap;

use crate::models::domain::normalize;

/// Specialties considered close enough to score above unrelated ones.
/// Lists are one-directional as authored; lookups check both directions.
const RELATED_SPECIALTIES: &[(&str, &[&str])] = &[
    ("cardiology", &["internal medicine", "cardiac surgery", "emergency medicine"]),
    ("cardiac surgery", &["cardiology", "general surgery", "anesthesiology"]),
    ("internal medicine", &["family medicine", "endocrinology", "gastroenterology"]),
    ("family medicine", &["internal medicine", "pediatrics", "emergency medicine"]),
    ("emergency medicine", &["critical care", "anesthesiology", "family medicine"]),
    ("critical care", &["anesthesiology", "emergency medicine", "pulmonology"]),
    ("anesthesiology", &["critical care", "general surgery"]),
    ("general surgery", &["orthopedics", "cardiac surgery", "plastic surgery"]),
    ("orthopedics", &["sports medicine", "physical medicine", "general surgery"]),
    ("pediatrics", &["neonatology", "family medicine"]),
    ("neurology", &["neurosurgery", "psychiatry"]),
    ("neurosurgery", &["neurology", "orthopedics"]),
    ("psychiatry", &["psychology", "neurology"]),
    ("obstetrics and gynecology", &["family medicine", "neonatology"]),
    ("radiology", &["nuclear medicine", "oncology"]),
    ("oncology", &["hematology", "radiology", "internal medicine"]),
    ("dermatology", &["plastic surgery"]),
    ("pulmonology", &["critical care", "internal medicine"]),
    ("dentistry", &["oral surgery", "orthodontics"]),
];

/// Group names keyed by the value of the top common interest
const INTEREST_GROUP_NAMES: &[(&str, &str)] = &[
    ("padel", "Padel Partners"),
    ("tennis", "Tennis Circle"),
    ("football", "Football Fans"),
    ("running", "Running Club"),
    ("cycling", "Cycling Crew"),
    ("hiking", "Trail Blazers"),
    ("swimming", "Swim Squad"),
    ("fitness", "Fitness Crew"),
    ("gym", "Fitness Crew"),
    ("coffee", "Coffee Connoisseurs"),
    ("cooking", "Culinary Circle"),
    ("reading", "Book Club"),
    ("books", "Book Club"),
    ("travel", "Wanderlust Docs"),
    ("photography", "Shutterbugs"),
    ("music", "Music Lovers"),
    ("art", "Art Collective"),
    ("movies", "Movie Night Crew"),
    ("gaming", "Gamers Guild"),
    ("volunteering", "Giving Back Club"),
    ("research", "Research Roundtable"),
    ("camping", "Desert Campers"),
];

/// Lookup tables used by scoring and group naming
#[derive(Debug, Clone)]
pub struct MatchTables {
    related_specialties: HashMap<String, Vec<String>>,
    group_names: HashMap<String, String>,
}

impl MatchTables {
    /// Tables with no entries; every lookup falls back
    pub fn empty() -> Self {
        Self {
            related_specialties: HashMap::new(),
            group_names: HashMap::new(),
        }
    }

    /// Add related specialties for `specialty`, merging with existing entries
    pub fn with_related<I, S>(mut self, specialty: &str, related: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self
            .related_specialties
            .entry(normalize(specialty))
            .or_default();
        for name in related {
            let name = normalize(name.as_ref());
            if !name.is_empty() && !entry.contains(&name) {
                entry.push(name);
            }
        }
        self
    }

    /// Map an interest value to a group name, replacing any existing entry
    pub fn with_group_name(mut self, interest: &str, name: &str) -> Self {
        self.group_names
            .insert(normalize(interest), name.trim().to_string());
        self
    }

    /// True if either specialty lists the other as related.
    /// Both arguments must already be normalized.
    pub fn are_related(&self, a: &str, b: &str) -> bool {
        let lists = |from: &str, to: &str| {
            self.related_specialties
                .get(from)
                .map_or(false, |related| related.iter().any(|r| r == to))
        };
        lists(a, b) || lists(b, a)
    }

    /// Group name for an interest value, if the table knows it
    pub fn group_name(&self, interest_value: &str) -> Option<&str> {
        self.group_names
            .get(&normalize(interest_value))
            .map(String::as_str)
    }
}

impl Default for MatchTables {
    fn default() -> Self {
        let tables = RELATED_SPECIALTIES
            .iter()
            .fold(Self::empty(), |tables, (specialty, related)| {
                tables.with_related(specialty, related.iter())
            });

        INTEREST_GROUP_NAMES
            .iter()
            .fold(tables, |tables, (interest, name)| {
                tables.with_group_name(interest, name)
            })
    }
}
