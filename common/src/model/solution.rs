use serde::{Deserialize, Serialize};

/// One of the descriptive fields of a submitted solution.
///
/// The enum is the single list of fields: the CSV column map, the prompt
/// builder and the frontend table all iterate [`SolutionField::ALL`] instead of
/// naming struct fields by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolutionField {
    ChallengeName,
    Summary,
    Headquarters,
    OrganizationType,
    ProblemStatement,
    SolutionDescription,
    TargetBeneficiaries,
    TechnologiesUsed,
    WebsiteLinks,
    OperatingCountries,
    TeamSize,
    Duration,
    DiversityApproaches,
    BusinessModel,
    ServiceDeliveryModel,
    FinancialSustainability,
}

impl SolutionField {
    pub const ALL: [SolutionField; 16] = [
        SolutionField::ChallengeName,
        SolutionField::Summary,
        SolutionField::Headquarters,
        SolutionField::OrganizationType,
        SolutionField::ProblemStatement,
        SolutionField::SolutionDescription,
        SolutionField::TargetBeneficiaries,
        SolutionField::TechnologiesUsed,
        SolutionField::WebsiteLinks,
        SolutionField::OperatingCountries,
        SolutionField::TeamSize,
        SolutionField::Duration,
        SolutionField::DiversityApproaches,
        SolutionField::BusinessModel,
        SolutionField::ServiceDeliveryModel,
        SolutionField::FinancialSustainability,
    ];

    /// Human readable label, used in prompts and table headers.
    pub fn label(self) -> &'static str {
        match self {
            SolutionField::ChallengeName => "Challenge Name",
            SolutionField::Summary => "Summary",
            SolutionField::Headquarters => "Headquarters",
            SolutionField::OrganizationType => "Organization Type",
            SolutionField::ProblemStatement => "Problem Statement",
            SolutionField::SolutionDescription => "Solution Description",
            SolutionField::TargetBeneficiaries => "Target Beneficiaries",
            SolutionField::TechnologiesUsed => "Technologies Used",
            SolutionField::WebsiteLinks => "Website Links",
            SolutionField::OperatingCountries => "Operating Countries",
            SolutionField::TeamSize => "Team Size",
            SolutionField::Duration => "Duration",
            SolutionField::DiversityApproaches => "Diversity Approaches",
            SolutionField::BusinessModel => "Business Model",
            SolutionField::ServiceDeliveryModel => "Service Delivery Model",
            SolutionField::FinancialSustainability => "Financial Sustainability",
        }
    }
}

/// Descriptive text of a solution. Every field is optional; blank values are
/// stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionFields {
    pub challenge_name: Option<String>,
    pub summary: Option<String>,
    pub headquarters: Option<String>,
    pub organization_type: Option<String>,
    pub problem_statement: Option<String>,
    pub solution_description: Option<String>,
    pub target_beneficiaries: Option<String>,
    pub technologies_used: Option<String>,
    pub website_links: Option<String>,
    pub operating_countries: Option<String>,
    pub team_size: Option<String>,
    pub duration: Option<String>,
    pub diversity_approaches: Option<String>,
    pub business_model: Option<String>,
    pub service_delivery_model: Option<String>,
    pub financial_sustainability: Option<String>,
}

impl SolutionFields {
    pub fn get(&self, field: SolutionField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Sets `field`, storing `None` for blank values.
    pub fn set(&mut self, field: SolutionField, value: Option<String>) {
        *self.slot_mut(field) = value.filter(|v| !v.trim().is_empty());
    }

    /// Returns a copy where every blank string has become `None`.
    pub fn normalized(mut self) -> Self {
        for field in SolutionField::ALL {
            let value = self.slot_mut(field).take();
            self.set(field, value);
        }
        self
    }

    fn slot(&self, field: SolutionField) -> &Option<String> {
        match field {
            SolutionField::ChallengeName => &self.challenge_name,
            SolutionField::Summary => &self.summary,
            SolutionField::Headquarters => &self.headquarters,
            SolutionField::OrganizationType => &self.organization_type,
            SolutionField::ProblemStatement => &self.problem_statement,
            SolutionField::SolutionDescription => &self.solution_description,
            SolutionField::TargetBeneficiaries => &self.target_beneficiaries,
            SolutionField::TechnologiesUsed => &self.technologies_used,
            SolutionField::WebsiteLinks => &self.website_links,
            SolutionField::OperatingCountries => &self.operating_countries,
            SolutionField::TeamSize => &self.team_size,
            SolutionField::Duration => &self.duration,
            SolutionField::DiversityApproaches => &self.diversity_approaches,
            SolutionField::BusinessModel => &self.business_model,
            SolutionField::ServiceDeliveryModel => &self.service_delivery_model,
            SolutionField::FinancialSustainability => &self.financial_sustainability,
        }
    }

    fn slot_mut(&mut self, field: SolutionField) -> &mut Option<String> {
        match field {
            SolutionField::ChallengeName => &mut self.challenge_name,
            SolutionField::Summary => &mut self.summary,
            SolutionField::Headquarters => &mut self.headquarters,
            SolutionField::OrganizationType => &mut self.organization_type,
            SolutionField::ProblemStatement => &mut self.problem_statement,
            SolutionField::SolutionDescription => &mut self.solution_description,
            SolutionField::TargetBeneficiaries => &mut self.target_beneficiaries,
            SolutionField::TechnologiesUsed => &mut self.technologies_used,
            SolutionField::WebsiteLinks => &mut self.website_links,
            SolutionField::OperatingCountries => &mut self.operating_countries,
            SolutionField::TeamSize => &mut self.team_size,
            SolutionField::Duration => &mut self.duration,
            SolutionField::DiversityApproaches => &mut self.diversity_approaches,
            SolutionField::BusinessModel => &mut self.business_model,
            SolutionField::ServiceDeliveryModel => &mut self.service_delivery_model,
            SolutionField::FinancialSustainability => &mut self.financial_sustainability,
        }
    }
}

/// A stored solution.
///
/// `id` is assigned by the store on first insert and survives later upserts;
/// `solution_id` is the external "Solution ID" and is unique across records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionRecord {
    pub id: u64,
    pub solution_id: String,
    #[serde(flatten)]
    pub fields: SolutionFields,
}

/// A solution as produced by ingestion, before the store assigns an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolutionInput {
    pub solution_id: String,
    pub fields: SolutionFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_turns_blank_values_into_none() {
        let mut fields = SolutionFields::default();
        fields.set(SolutionField::Summary, Some("   ".to_string()));
        fields.set(SolutionField::TeamSize, Some("12".to_string()));

        assert_eq!(fields.get(SolutionField::Summary), None);
        assert_eq!(fields.get(SolutionField::TeamSize), Some("12"));
    }

    #[test]
    fn record_serializes_flat_camel_case() {
        let mut fields = SolutionFields::default();
        fields.set(SolutionField::ChallengeName, Some("Health".to_string()));
        let record = SolutionRecord {
            id: 3,
            solution_id: "S-9".to_string(),
            fields,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["solutionId"], "S-9");
        assert_eq!(json["challengeName"], "Health");
        assert!(json["summary"].is_null());
    }
}
