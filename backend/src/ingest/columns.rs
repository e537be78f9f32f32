use common::model::solution::SolutionField;

/// Header of the natural-key column.
pub const SOLUTION_ID_HEADER: &str = "Solution ID";

/// External CSV header → solution field. Several export formats name the
/// same question differently, so a field may appear more than once.
const COLUMN_MAP: &[(&str, SolutionField)] = &[
    ("Challenge Name", SolutionField::ChallengeName),
    ("Challenge", SolutionField::ChallengeName),
    ("Provide a one-line summary of your solution.", SolutionField::Summary),
    ("Solution Summary", SolutionField::Summary),
    ("Summary", SolutionField::Summary),
    ("Headquarters", SolutionField::Headquarters),
    ("Where is your organization headquartered?", SolutionField::Headquarters),
    ("Organization Type", SolutionField::OrganizationType),
    ("What type of organization is your solution team?", SolutionField::OrganizationType),
    ("Problem Statement", SolutionField::ProblemStatement),
    ("What specific problem are you solving?", SolutionField::ProblemStatement),
    ("Solution Description", SolutionField::SolutionDescription),
    ("What is your solution?", SolutionField::SolutionDescription),
    ("Target Beneficiaries", SolutionField::TargetBeneficiaries),
    (
        "Who does your solution serve, and in what ways will the solution impact their lives?",
        SolutionField::TargetBeneficiaries,
    ),
    ("Technologies Used", SolutionField::TechnologiesUsed),
    ("Describe the core technology that powers your solution.", SolutionField::TechnologiesUsed),
    ("Website Links", SolutionField::WebsiteLinks),
    ("Website", SolutionField::WebsiteLinks),
    ("Operating Countries", SolutionField::OperatingCountries),
    ("In which countries do you currently operate?", SolutionField::OperatingCountries),
    ("Team Size", SolutionField::TeamSize),
    ("How many people work on your solution team?", SolutionField::TeamSize),
    ("Duration", SolutionField::Duration),
    ("How long have you been working on your solution?", SolutionField::Duration),
    ("Diversity Approaches", SolutionField::DiversityApproaches),
    (
        "What is your approach to incorporating diversity, equity, and inclusivity into your work?",
        SolutionField::DiversityApproaches,
    ),
    ("Business Model", SolutionField::BusinessModel),
    ("What is your business model?", SolutionField::BusinessModel),
    ("Service Delivery Model", SolutionField::ServiceDeliveryModel),
    (
        "Do you primarily provide products or services directly to individuals, to other organizations, or to the government?",
        SolutionField::ServiceDeliveryModel,
    ),
    ("Financial Sustainability", SolutionField::FinancialSustainability),
    (
        "What is your plan for becoming financially sustainable?",
        SolutionField::FinancialSustainability,
    ),
];

fn normalize(header: &str) -> String {
    header.trim().to_ascii_lowercase()
}

pub fn is_solution_id(header: &str) -> bool {
    normalize(header) == normalize(SOLUTION_ID_HEADER)
}

/// Looks up the field for a header, ignoring surrounding whitespace and ASCII case.
pub fn field_for_header(header: &str) -> Option<SolutionField> {
    let wanted = normalize(header);
    COLUMN_MAP
        .iter()
        .find(|(name, _)| normalize(name) == wanted)
        .map(|(_, field)| *field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_match_case_and_whitespace_insensitively() {
        assert_eq!(
            field_for_header("  team size "),
            Some(SolutionField::TeamSize)
        );
        assert_eq!(
            field_for_header("What is your solution?"),
            Some(SolutionField::SolutionDescription)
        );
        assert!(is_solution_id("solution id"));
        assert_eq!(field_for_header("Favourite colour"), None);
    }

    #[test]
    fn every_field_has_a_column() {
        for field in SolutionField::ALL {
            assert!(
                COLUMN_MAP.iter().any(|(_, f)| *f == field),
                "no column maps to {field:?}"
            );
        }
    }
}
