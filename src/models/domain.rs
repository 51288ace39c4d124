use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single typed interest, e.g. `{ kind: "sport", value: "padel" }`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interest {
    #[serde(alias = "type", alias = "interest_type")]
    pub kind: String,
    pub value: String,
}

impl Interest {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Normalized `(kind, value)` pair used for comparisons
    pub fn key(&self) -> (String, String) {
        (normalize(&self.kind), normalize(&self.value))
    }

    /// `kind:value` label as exposed in API responses
    pub fn label(&self) -> String {
        let (kind, value) = self.key();
        format!("{}:{}", kind, value)
    }
}

/// Matching preferences stored alongside the requester's profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchPreferences {
    #[serde(default)]
    pub preferred_group_size: Option<u8>,
    #[serde(default)]
    pub min_compatibility: Option<u8>,
}

/// Profile record as served by the hosted profile store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, alias = "region")]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_u8")]
    pub age: Option<u8>,
    #[serde(default, alias = "experience_years", deserialize_with = "lenient_u8")]
    pub years_experience: Option<u8>,
    #[serde(default)]
    pub interests: Vec<Interest>,
    #[serde(default, deserialize_with = "embedded_preferences")]
    pub preferences: Option<MatchPreferences>,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub is_banned: Option<bool>,
    #[serde(default)]
    pub onboarding_completed: Option<bool>,
}

impl Profile {
    /// Display name built from the name parts
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Uppercase initials, e.g. "SA" for "Sara Al-Harbi"
    pub fn initials(&self) -> String {
        [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn specialty_key(&self) -> Option<String> {
        non_blank(&self.specialty)
    }

    pub fn city_key(&self) -> Option<String> {
        non_blank(&self.city)
    }

    pub fn state_key(&self) -> Option<String> {
        non_blank(&self.state)
    }

    pub fn country_key(&self) -> Option<String> {
        non_blank(&self.country)
    }

    /// True when at least one location field carries data
    pub fn has_location(&self) -> bool {
        self.city_key().is_some() || self.state_key().is_some() || self.country_key().is_some()
    }
}

/// Small counts such as age; negative, oversized or unparsable values read as missing
fn lenient_u8<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value.and_then(|value| match value {
        Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

/// Preferences arrive as an object for one-to-one embeds and as an array
/// otherwise; the first row wins
fn embedded_preferences<'de, D>(deserializer: D) -> Result<Option<MatchPreferences>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Embedded {
        Rows(Vec<MatchPreferences>),
        Row(MatchPreferences),
    }

    Ok(match Option::<Embedded>::deserialize(deserializer)? {
        Some(Embedded::Rows(rows)) => rows.into_iter().next(),
        Some(Embedded::Row(row)) => Some(row),
        None => None,
    })
}

/// Lowercased, trimmed form used for every string comparison
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(normalize)
        .filter(|v| !v.is_empty())
}

/// Coarse career bucket derived from age and years of experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareerStage {
    Early,
    Mid,
    Senior,
    Expert,
}

/// Score of one candidate against the requester
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateScore {
    /// Position of the candidate in the pool handed to the assembler
    pub index: usize,
    pub score: u8,
}

/// Points earned per dimension; `None` means the dimension was excluded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub specialty: Option<f64>,
    pub location: Option<f64>,
    pub age: Option<f64>,
    pub interests: f64,
    pub career_stage: f64,
    pub earned: f64,
    pub available: f64,
    pub score: u8,
}

/// Per-dimension weights; each is the maximum number of points a dimension can earn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub specialty: f64,
    pub location: f64,
    pub age: f64,
    pub interests: f64,
    pub career: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            specialty: 25.0,
            location: 20.0,
            age: 15.0,
            interests: 25.0,
            career: 15.0,
        }
    }
}

/// Caller-supplied group policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingPolicy {
    /// Target group size including the requester
    pub group_size: u8,
    pub min_compatibility: u8,
}

impl Default for MatchingPolicy {
    fn default() -> Self {
        Self {
            group_size: 3,
            min_compatibility: 50,
        }
    }
}

impl MatchingPolicy {
    /// Effective policy for a request
    ///
    /// Explicit request values win, then the requester's stored preferences,
    /// then `defaults`. Group size is clamped to `[2, max_group_size]` and the
    /// threshold to `[0, 100]`.
    pub fn resolve(
        group_size: Option<u8>,
        min_compatibility: Option<u8>,
        preferences: Option<&MatchPreferences>,
        defaults: MatchingPolicy,
        max_group_size: u8,
    ) -> Self {
        let group_size = group_size
            .or_else(|| preferences.and_then(|p| p.preferred_group_size))
            .unwrap_or(defaults.group_size)
            .clamp(2, max_group_size.max(2));

        let min_compatibility = min_compatibility
            .or_else(|| preferences.and_then(|p| p.min_compatibility))
            .unwrap_or(defaults.min_compatibility)
            .min(100);

        Self {
            group_size,
            min_compatibility,
        }
    }
}

/// Fixed limits of the greedy assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyLimits {
    /// Minimum average pairwise score to join a group
    pub admit_average: u8,
    /// Minimum single pairwise score to join a group
    pub admit_minimum: u8,
    pub max_groups_built: usize,
    pub max_groups_returned: usize,
}

impl Default for AssemblyLimits {
    fn default() -> Self {
        Self {
            admit_average: 60,
            admit_minimum: 50,
            max_groups_built: 8,
            max_groups_returned: 6,
        }
    }
}

/// Candidate member of an assembled group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub profile_id: String,
    pub name: String,
    pub specialty: Option<String>,
    pub city: Option<String>,
    pub age: Option<u8>,
    /// Compatibility with the requester
    pub compatibility: u8,
    pub initials: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeetingMode {
    #[serde(rename = "In-person")]
    InPerson,
    Hybrid,
    Virtual,
}

impl std::fmt::Display for MeetingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MeetingMode::InPerson => "In-person",
            MeetingMode::Hybrid => "Hybrid",
            MeetingMode::Virtual => "Virtual",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialtyShare {
    pub specialty: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u8,
    pub max: u8,
}

impl AgeRange {
    pub fn span(&self) -> u8 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSpread {
    pub cities: Vec<String>,
    pub countries: Vec<String>,
}

/// Assembled group suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMatch {
    pub name: String,
    pub description: String,
    pub members: Vec<GroupMember>,
    /// Total members including the requester
    pub size: usize,
    pub average_compatibility: u8,
    pub common_interests: Vec<String>,
    pub diversity_score: u8,
    pub meeting_mode: MeetingMode,
    pub dominant_location: Option<String>,
    pub specialty_mix: Vec<SpecialtyShare>,
    pub age_range: Option<AgeRange>,
    pub location_spread: LocationSpread,
    pub match_reason: String,
}
