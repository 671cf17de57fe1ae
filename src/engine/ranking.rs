//! Orders candidates by how often they were suggested in a survey.
//! Ranking is advisory: it only changes display order.

use std::collections::HashMap;

use crate::model::{
    api::{results::MemberCount, voting::Candidate},
    common::name,
    db::{Member, SurveyVote},
    storage::Id,
};

use super::tally::{by_count_then_name, UNKNOWN_MEMBER};

/// Suggestions per member for the role named exactly `role_name`.
pub fn suggestion_counts(role_name: &str, survey_votes: &[SurveyVote]) -> HashMap<Id, u32> {
    let mut counts = HashMap::new();
    for (member, count) in survey_votes
        .iter()
        .filter(|vote| vote.role_name == role_name)
        .flat_map(SurveyVote::counts)
    {
        *counts.entry(member).or_default() += count;
    }
    counts
}

/// Order members by suggestion count, then alphabetically. With no
/// suggestions this is plain alphabetical order.
pub fn rank_candidates(members: Vec<Member>, counts: &HashMap<Id, u32>) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = members
        .into_iter()
        .map(|member| Candidate {
            suggestions: counts.get(&member.id).copied().unwrap_or(0),
            id: member.id.into(),
            full_name: member.full_name,
        })
        .collect();
    candidates.sort_by(|a, b| {
        b.suggestions
            .cmp(&a.suggestions)
            .then_with(|| name::compare(&a.full_name, &b.full_name))
            .then_with(|| a.id.cmp(&b.id))
    });
    candidates
}

/// Every suggested member with their count, most suggested first.
pub fn ranked_suggestions(counts: HashMap<Id, u32>, members: &[Member]) -> Vec<MemberCount> {
    let names: HashMap<Id, &str> = members
        .iter()
        .map(|m| (m.id, m.full_name.as_str()))
        .collect();
    let mut ranked: Vec<MemberCount> = counts
        .into_iter()
        .filter(|&(_, count)| count > 0)
        .map(|(member_id, count)| MemberCount {
            member_id: member_id.into(),
            name: names.get(&member_id).unwrap_or(&UNKNOWN_MEMBER).to_string(),
            count,
        })
        .collect();
    ranked.sort_by(by_count_then_name);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(names: &[&str]) -> Vec<Member> {
        let tenant = Id::new();
        names.iter().map(|n| Member::example(tenant, n)).collect()
    }

    fn names(candidates: &[Candidate]) -> Vec<(&str, u32)> {
        candidates
            .iter()
            .map(|c| (c.full_name.as_str(), c.suggestions))
            .collect()
    }

    #[test]
    fn sums_both_survey_vote_shapes() {
        let pool = members(&["Ana", "Bruno", "Carla"]);
        let survey = Id::new();
        let votes = vec![
            SurveyVote {
                vote_count: 2,
                ..SurveyVote::new(survey, "Elders".to_string(), pool[1].id)
            },
            SurveyVote::example_legacy(survey, "Elders", vec![pool[1].id, pool[2].id]),
            SurveyVote::new(survey, "Deacons".to_string(), pool[0].id),
        ];

        let counts = suggestion_counts("Elders", &votes);
        assert_eq!(counts.get(&pool[1].id), Some(&3));
        assert_eq!(counts.get(&pool[2].id), Some(&1));
        assert_eq!(counts.get(&pool[0].id), None);

        let ranked = rank_candidates(pool, &counts);
        assert_eq!(names(&ranked), vec![("Bruno", 3), ("Carla", 1), ("Ana", 0)]);
    }

    #[test]
    fn role_names_match_exactly() {
        let pool = members(&["Ana"]);
        let votes = vec![SurveyVote::new(Id::new(), "Elders".to_string(), pool[0].id)];
        assert!(suggestion_counts("elders", &votes).is_empty());
        assert!(suggestion_counts("Elders ", &votes).is_empty());
    }

    #[test]
    fn no_suggestions_is_alphabetical() {
        let ranked = rank_candidates(members(&["Carla", "ana", "Bruno"]), &HashMap::new());
        assert_eq!(
            names(&ranked),
            vec![("ana", 0), ("Bruno", 0), ("Carla", 0)]
        );
    }

    #[test]
    fn suggestion_results_skip_nobody_and_label_missing() {
        let pool = members(&["Ana", "Bruno"]);
        let gone = Id::new();
        let counts = HashMap::from([(pool[0].id, 1), (pool[1].id, 4), (gone, 1)]);

        let ranked = ranked_suggestions(counts, &pool);
        let shown: Vec<_> = ranked.iter().map(|m| (m.name.as_str(), m.count)).collect();
        assert_eq!(shown, vec![("Bruno", 4), ("Ana", 1), (UNKNOWN_MEMBER, 1)]);
    }
}
