use std::collections::BTreeSet;

use serde::Serialize;

use crate::nlp::keywords::{extract_keywords, flatten, KeywordMap};
use crate::nlp::ontology::implied_skills;

/// Skills one claim states outright versus what those skills imply.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimSkillGap {
    pub claim: String,
    pub keywords: KeywordMap,
    pub explicit_skills: BTreeSet<String>,
    pub implied_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
}

/// Resume-wide skill gap: implied by the stated skills but never stated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SkillGapReport {
    pub explicit_skills: BTreeSet<String>,
    pub implied_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub per_claim: Vec<ClaimSkillGap>,
}

pub fn cross_reference<'a, I>(claims: I) -> SkillGapReport
where
    I: IntoIterator<Item = &'a str>,
{
    let mut report = SkillGapReport::default();

    for claim in claims {
        let keywords = extract_keywords(claim);
        let explicit = flatten(&keywords);
        let implied = implied_skills(&explicit);
        let missing = implied.difference(&explicit).cloned().collect();

        report.explicit_skills.extend(explicit.iter().cloned());
        report.per_claim.push(ClaimSkillGap {
            claim: claim.to_string(),
            keywords,
            explicit_skills: explicit,
            implied_skills: implied,
            missing_skills: missing,
        });
    }

    report.implied_skills = implied_skills(&report.explicit_skills);
    report.missing_skills = report
        .implied_skills
        .difference(&report.explicit_skills)
        .cloned()
        .collect();

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_gaps_exclude_stated_skills() {
        let report = cross_reference([
            "Built REST APIs with Django",
            "Wrote Python scripts for reporting",
        ]);
        assert!(report.explicit_skills.contains("python"));
        assert!(report.explicit_skills.contains("django"));
        assert!(!report.missing_skills.contains("python"), "python was stated explicitly");
        assert!(report.missing_skills.contains("backend"));
        assert_eq!(report.per_claim.len(), 2);
    }

    #[test]
    fn test_per_claim_gap_is_local() {
        let report = cross_reference(["Built REST APIs with Django", "Wrote Python scripts"]);
        let first = &report.per_claim[0];
        assert!(first.missing_skills.contains("python"), "python is missing from claim one");
    }

    #[test]
    fn test_no_claims_yields_empty_report() {
        let report = cross_reference(std::iter::empty::<&str>());
        assert!(report.explicit_skills.is_empty());
        assert!(report.missing_skills.is_empty());
        assert!(report.per_claim.is_empty());
    }
}
