use std::collections::HashSet;

use crate::core::{
    insights::{
        age_range, common_interests, diversity_score, dominant_location, group_description,
        group_name, location_spread, match_reason, meeting_mode, specialty_mix,
    },
    scoring::{compatibility_score, score_breakdown},
    tables::MatchTables,
};
use crate::models::{
    AssemblyLimits, CandidateScore, GroupMatch, GroupMember, MatchingPolicy, Profile,
    ScoreBreakdown, ScoringWeights,
};

/// Result of the assembly process
#[derive(Debug, Clone)]
pub struct AssemblyResult {
    pub groups: Vec<GroupMatch>,
    pub total_candidates: usize,
    /// Candidates scoring at or above the policy threshold
    pub eligible_candidates: usize,
}

/// Main group orchestrator - scores the pool and greedily grows groups
///
/// # Pipeline Stages
/// 1. Score every candidate against the requester and apply the threshold
/// 2. Sort by score descending
/// 3. Grow groups greedily from the best remaining candidate
/// 4. Derive group metadata, rank and truncate
#[derive(Debug, Clone)]
pub struct GroupAssembler {
    weights: ScoringWeights,
    limits: AssemblyLimits,
    tables: MatchTables,
}

impl GroupAssembler {
    pub fn new(weights: ScoringWeights, limits: AssemblyLimits, tables: MatchTables) -> Self {
        Self {
            weights,
            limits,
            tables,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            ScoringWeights::default(),
            AssemblyLimits::default(),
            MatchTables::default(),
        )
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn limits(&self) -> &AssemblyLimits {
        &self.limits
    }

    /// Pairwise compatibility under this assembler's weights and tables
    pub fn score(&self, a: &Profile, b: &Profile) -> u8 {
        compatibility_score(a, b, &self.weights, &self.tables)
    }

    /// Pairwise compatibility with per-dimension detail
    pub fn breakdown(&self, a: &Profile, b: &Profile) -> ScoreBreakdown {
        score_breakdown(a, b, &self.weights, &self.tables)
    }

    /// Score candidates against the requester, keep those at or above the
    /// threshold and sort them best first. Ties keep pool order.
    pub fn rank_candidates(
        &self,
        requester: &Profile,
        candidates: &[Profile],
        min_compatibility: u8,
    ) -> Vec<CandidateScore> {
        let mut ranked: Vec<CandidateScore> = candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| candidate.id != requester.id)
            .map(|(index, profile)| CandidateScore {
                index,
                score: self.score(requester, profile),
            })
            .filter(|scored| scored.score >= min_compatibility)
            .collect();

        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    /// Assemble up to `max_groups_returned` groups for the requester
    ///
    /// # Arguments
    /// * `requester` - Profile asking for groups
    /// * `candidates` - Pool already filtered by the profile store
    /// * `policy` - Group size (requester included) and minimum compatibility
    ///
    /// # Returns
    /// AssemblyResult with groups ranked by average compatibility
    pub fn assemble(
        &self,
        requester: &Profile,
        candidates: &[Profile],
        policy: &MatchingPolicy,
    ) -> AssemblyResult {
        let total_candidates = candidates.len();
        let ranked = self.rank_candidates(requester, candidates, policy.min_compatibility);
        let eligible_candidates = ranked.len();

        // Candidate slots per group; the requester takes one
        let capacity = (policy.group_size.max(2) - 1) as usize;

        let mut used: HashSet<usize> = HashSet::new();
        let mut groups: Vec<Vec<CandidateScore>> = Vec::new();

        for (position, seed) in ranked.iter().enumerate() {
            if groups.len() >= self.limits.max_groups_built {
                break;
            }
            if used.contains(&seed.index) {
                continue;
            }

            used.insert(seed.index);
            let mut group = vec![*seed];

            for next in &ranked[position + 1..] {
                if group.len() >= capacity {
                    break;
                }
                if used.contains(&next.index) {
                    continue;
                }

                if self.admits(&group, next, candidates) {
                    used.insert(next.index);
                    group.push(*next);
                }
            }

            // The seed alone already makes a pair with the requester
            groups.push(group);
        }

        let mut matches: Vec<GroupMatch> = groups
            .iter()
            .map(|group| self.describe(requester, candidates, group))
            .collect();

        matches.sort_by(|a, b| b.average_compatibility.cmp(&a.average_compatibility));
        matches.truncate(self.limits.max_groups_returned);

        tracing::debug!(
            requester = %requester.id,
            total_candidates,
            eligible_candidates,
            groups = matches.len(),
            "Assembled groups"
        );

        AssemblyResult {
            groups: matches,
            total_candidates,
            eligible_candidates,
        }
    }

    /// A candidate joins when its scores against every current member
    /// average at least `admit_average` with none below `admit_minimum`
    fn admits(&self, group: &[CandidateScore], next: &CandidateScore, candidates: &[Profile]) -> bool {
        let newcomer = &candidates[next.index];
        let scores: Vec<u8> = group
            .iter()
            .map(|member| self.score(&candidates[member.index], newcomer))
            .collect();

        let Some(&minimum) = scores.iter().min() else {
            return true;
        };
        let average = scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64;

        average >= self.limits.admit_average as f64 && minimum >= self.limits.admit_minimum
    }

    /// Build the output value for one group
    fn describe(&self, requester: &Profile, candidates: &[Profile], group: &[CandidateScore]) -> GroupMatch {
        let everyone: Vec<&Profile> = std::iter::once(requester)
            .chain(group.iter().map(|member| &candidates[member.index]))
            .collect();

        let members: Vec<GroupMember> = group
            .iter()
            .map(|member| {
                let profile = &candidates[member.index];
                GroupMember {
                    profile_id: profile.id.clone(),
                    name: profile.display_name(),
                    specialty: profile.specialty.clone(),
                    city: profile.city.clone(),
                    age: profile.age,
                    compatibility: member.score,
                    initials: profile.initials(),
                }
            })
            .collect();

        let total: u32 = group.iter().map(|member| member.score as u32).sum();
        let average_compatibility = (total as f64 / group.len() as f64).round() as u8;

        let common = common_interests(&everyone);
        let mode = meeting_mode(&everyone);

        GroupMatch {
            name: group_name(&everyone, &common, &self.tables),
            description: group_description(&everyone, &common, mode),
            size: everyone.len(),
            average_compatibility,
            diversity_score: diversity_score(&everyone),
            meeting_mode: mode,
            dominant_location: dominant_location(&everyone),
            specialty_mix: specialty_mix(&everyone),
            age_range: age_range(&everyone),
            location_spread: location_spread(&everyone),
            match_reason: match_reason(&everyone, average_compatibility, &common),
            common_interests: common,
            members,
        }
    }
}

impl Default for GroupAssembler {
    fn default() -> Self {
        Self::with_defaults()
    }
}
