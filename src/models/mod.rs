// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AgeRange, AssemblyLimits, CandidateScore, CareerStage, GroupMatch, GroupMember, Interest,
    LocationSpread, MatchPreferences, MatchingPolicy, MeetingMode, Profile, ScoreBreakdown,
    ScoringWeights, SpecialtyShare,
};
pub use requests::{CompatibilityRequest, FindGroupsRequest, LatestGroupsQuery};
pub use responses::{ApiResponse, CompatibilityResponse, ErrorBody, FindGroupsResponse, HealthResponse, LatestGroupsResponse};
