// Integration tests for group assembly

use std::collections::HashSet;

use medmatch_groups::core::GroupAssembler;
use medmatch_groups::models::{Interest, MatchingPolicy, MeetingMode, Profile};

fn doctor(id: usize, specialty: &str, city: &str, age: u8, interests: &[(&str, &str)]) -> Profile {
    Profile {
        id: format!("doctor-{}", id),
        first_name: format!("Doctor{}", id),
        last_name: "Test".to_string(),
        specialty: Some(specialty.to_string()),
        city: Some(city.to_string()),
        country: Some("Saudi Arabia".to_string()),
        age: Some(age),
        years_experience: Some(age.saturating_sub(26)),
        interests: interests.iter().map(|(k, v)| Interest::new(*k, *v)).collect(),
        ..Default::default()
    }
}

fn requester() -> Profile {
    Profile {
        id: "requester".to_string(),
        ..doctor(0, "Cardiology", "Riyadh", 38, &[("sport", "padel"), ("food", "coffee")])
    }
}

fn pool() -> Vec<Profile> {
    vec![
        doctor(1, "Cardiology", "Riyadh", 37, &[("sport", "padel")]),
        doctor(2, "Cardiology", "Riyadh", 40, &[("sport", "padel"), ("food", "coffee")]),
        doctor(3, "Internal Medicine", "Riyadh", 35, &[("food", "coffee")]),
        doctor(4, "Emergency Medicine", "Jeddah", 42, &[("sport", "running")]),
        doctor(5, "Cardiology", "Dammam", 36, &[("sport", "padel")]),
        doctor(6, "Pediatrics", "Riyadh", 29, &[("music", "oud")]),
        doctor(7, "Dermatology", "Jeddah", 61, &[("art", "painting")]),
        doctor(8, "Cardiac Surgery", "Riyadh", 45, &[("sport", "tennis")]),
        doctor(9, "Family Medicine", "Riyadh", 33, &[("food", "coffee"), ("sport", "padel")]),
        doctor(10, "Radiology", "Abha", 58, &[("book", "history")]),
    ]
}

fn policy() -> MatchingPolicy {
    MatchingPolicy {
        group_size: 3,
        min_compatibility: 50,
    }
}

#[test]
fn test_groups_respect_size_and_count() {
    let assembler = GroupAssembler::with_defaults();
    let result = assembler.assemble(&requester(), &pool(), &policy());

    assert_eq!(result.total_candidates, 10);
    assert!(!result.groups.is_empty());
    assert!(result.groups.len() <= assembler.limits().max_groups_returned);

    for group in &result.groups {
        assert!(group.size >= 2 && group.size <= 3, "Bad group size {}", group.size);
        assert_eq!(group.size, group.members.len() + 1);
    }
}

#[test]
fn test_members_meet_threshold_and_each_other() {
    let assembler = GroupAssembler::with_defaults();
    let candidates = pool();
    let by_id = |id: &str| candidates.iter().find(|p| p.id == id).unwrap();

    let result = assembler.assemble(&requester(), &candidates, &policy());

    for group in &result.groups {
        for member in &group.members {
            assert!(member.compatibility >= 50);
            assert_eq!(member.compatibility, assembler.score(&requester(), by_id(&member.profile_id)));
        }

        for (i, a) in group.members.iter().enumerate() {
            for b in &group.members[i + 1..] {
                let pair = assembler.score(by_id(&a.profile_id), by_id(&b.profile_id));
                assert!(pair >= 50, "{} and {} only score {}", a.profile_id, b.profile_id, pair);
            }
        }
    }
}

#[test]
fn test_no_candidate_in_two_groups() {
    let assembler = GroupAssembler::with_defaults();
    let result = assembler.assemble(&requester(), &pool(), &policy());

    let mut seen = HashSet::new();
    for member in result.groups.iter().flat_map(|g| &g.members) {
        assert!(seen.insert(member.profile_id.clone()), "{} appears twice", member.profile_id);
        assert_ne!(member.profile_id, "requester");
    }
}

#[test]
fn test_groups_ranked_by_average() {
    let assembler = GroupAssembler::with_defaults();
    let result = assembler.assemble(&requester(), &pool(), &policy());

    for window in result.groups.windows(2) {
        assert!(window[0].average_compatibility >= window[1].average_compatibility);
    }
}

#[test]
fn test_assembly_is_repeatable() {
    let assembler = GroupAssembler::with_defaults();

    let first = assembler.assemble(&requester(), &pool(), &policy());
    let second = assembler.assemble(&requester(), &pool(), &policy());

    let ids = |groups: &[medmatch_groups::models::GroupMatch]| -> Vec<Vec<String>> {
        groups
            .iter()
            .map(|g| g.members.iter().map(|m| m.profile_id.clone()).collect())
            .collect()
    };

    assert_eq!(ids(&first.groups), ids(&second.groups));
    assert_eq!(
        first.groups.iter().map(|g| g.name.clone()).collect::<Vec<_>>(),
        second.groups.iter().map(|g| g.name.clone()).collect::<Vec<_>>()
    );
}

#[test]
fn test_group_metadata_includes_requester() {
    let assembler = GroupAssembler::with_defaults();
    let candidates = vec![
        doctor(1, "Cardiology", "Riyadh", 39, &[("sport", "padel")]),
        doctor(2, "Cardiology", "Riyadh", 41, &[("sport", "padel")]),
    ];

    let result = assembler.assemble(&requester(), &candidates, &policy());

    assert_eq!(result.groups.len(), 1);
    let group = &result.groups[0];
    assert_eq!(group.meeting_mode, MeetingMode::InPerson);
    assert_eq!(group.name, "Padel Partners");
    assert!(group.common_interests.iter().any(|i| i.contains("padel")));

    let range = group.age_range.as_ref().unwrap();
    assert_eq!((range.min, range.max), (38, 41));
    assert_eq!(group.location_spread.cities.len(), 1);
}

#[test]
fn test_empty_pool_yields_no_groups() {
    let assembler = GroupAssembler::with_defaults();
    let result = assembler.assemble(&requester(), &[], &policy());

    assert!(result.groups.is_empty());
    assert_eq!(result.total_candidates, 0);
    assert_eq!(result.eligible_candidates, 0);
}

#[test]
fn test_larger_groups_allowed_up_to_four() {
    let assembler = GroupAssembler::with_defaults();
    let candidates: Vec<Profile> = (1..=8)
        .map(|i| doctor(i, "Cardiology", "Riyadh", 36 + i as u8, &[("sport", "padel")]))
        .collect();
    let policy = MatchingPolicy {
        group_size: 4,
        min_compatibility: 50,
    };

    let result = assembler.assemble(&requester(), &candidates, &policy);

    assert_eq!(result.groups[0].size, 4);
    assert!(result.groups.iter().all(|g| g.size <= 4));
}

fn ageless(id: &str, specialty: &str, city: &str, country: &str, interests: &[(&str, &str)]) -> Profile {
    Profile {
        id: id.to_string(),
        first_name: id.to_string(),
        last_name: "Test".to_string(),
        specialty: Some(specialty.to_string()),
        city: Some(city.to_string()),
        country: Some(country.to_string()),
        interests: interests.iter().map(|(k, v)| Interest::new(*k, *v)).collect(),
        ..Default::default()
    }
}

#[test]
fn test_newcomer_below_minimum_starts_own_group() {
    let assembler = GroupAssembler::with_defaults();
    let requester = ageless(
        "requester",
        "Dermatology",
        "Riyadh",
        "Saudi Arabia",
        &[("music", "oud"), ("book", "fiction"), ("sport", "padel")],
    );
    let y = ageless("y", "Dermatology", "Dubai", "UAE", &[("music", "oud"), ("book", "fiction")]);
    let x = ageless(
        "x",
        "Cardiology",
        "Riyadh",
        "Saudi Arabia",
        &[("sport", "padel"), ("food", "coffee"), ("music", "oud"), ("book", "fiction")],
    );
    let z = ageless("z", "Cardiology", "Riyadh", "Saudi Arabia", &[("sport", "padel"), ("food", "coffee")]);

    // z clears the average against {y, x} but not the minimum against y
    let (zy, zx) = (assembler.score(&z, &y), assembler.score(&z, &x));
    assert!(zy < 50, "z-y scored {}", zy);
    assert!((zy as f64 + zx as f64) / 2.0 >= 60.0, "z averages {}", (zy as f64 + zx as f64) / 2.0);
    assert!(assembler.score(&y, &x) >= 60);

    let policy = MatchingPolicy {
        group_size: 4,
        min_compatibility: 50,
    };
    let result = assembler.assemble(&requester, &[x, y, z], &policy);

    let groups: Vec<Vec<String>> = result
        .groups
        .iter()
        .map(|g| g.members.iter().map(|m| m.profile_id.clone()).collect())
        .collect();
    assert_eq!(result.eligible_candidates, 3);
    assert_eq!(groups, vec![vec!["y".to_string(), "x".to_string()], vec!["z".to_string()]]);
}

#[test]
fn test_group_count_capped_and_truncated() {
    let assembler = GroupAssembler::with_defaults();
    let candidates: Vec<Profile> = (1..=12)
        .map(|i| doctor(i, "Cardiology", "Riyadh", 37 + i as u8, &[("sport", "padel")]))
        .collect();
    let policy = MatchingPolicy {
        group_size: 2,
        min_compatibility: 50,
    };

    let ranked = assembler.rank_candidates(&requester(), &candidates, policy.min_compatibility);
    assert!(ranked.len() >= 9, "only {} eligible", ranked.len());

    let result = assembler.assemble(&requester(), &candidates, &policy);

    assert_eq!(result.groups.len(), 6);
    for window in result.groups.windows(2) {
        assert!(window[0].average_compatibility >= window[1].average_compatibility);
    }

    // Pairs only, so the six best-ranked candidates each lead a group
    let expected: Vec<String> = ranked[..6].iter().map(|c| candidates[c.index].id.clone()).collect();
    let returned: Vec<String> = result.groups.iter().map(|g| g.members[0].profile_id.clone()).collect();
    assert_eq!(returned, expected);
}
