//! Prior-Knowledge Seeding
//!
//! Maps a research profile onto fixed point values so a quiz can start
//! partially confident without asking anything.

use elicit_core::ConfidenceCategory;
use tracing::debug;

use super::tracker::{ConfidenceState, ExtractedFact, FactConfidence, FactSource, MAX_ANSWER_BOOST};
use crate::models::PriorKnowledge;

pub const COMPANY_NAME_POINTS: u32 = 20;
pub const EMPLOYEE_COUNT_POINTS: u32 = 15;
pub const WEBSITE_POINTS: u32 = 5;
pub const DESCRIPTION_POINTS: u32 = 10;
pub const INDUSTRY_POINTS: u32 = 25;
pub const TECHNOLOGY_POINTS: u32 = 10;

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ConfidenceState<ConfidenceCategory> {
    /// Seed scores and facts from prior research. Returns the number of facts
    /// seeded. Does not count as a question.
    pub fn initialize_from_prior_knowledge(&mut self, prior: &PriorKnowledge) -> usize {
        let mut seeded = 0;
        let mut seed = |state: &mut Self, category, label: &str, value: String, points| {
            state.apply_boost(category, points);
            state.add_fact(
                category,
                ExtractedFact::new(label, value, FactConfidence::Medium, FactSource::PriorResearch),
            );
            seeded += 1;
        };

        if let Some(company) = &prior.company {
            if let Some(name) = present(&company.name) {
                seed(
                    self,
                    ConfidenceCategory::CompanyBasics,
                    "Company name",
                    name.to_string(),
                    COMPANY_NAME_POINTS,
                );
            }
            if let Some(count) = company.employee_count {
                seed(
                    self,
                    ConfidenceCategory::CompanyBasics,
                    "Company size",
                    format!("{} employees", count),
                    EMPLOYEE_COUNT_POINTS,
                );
            }
            if let Some(website) = present(&company.website) {
                seed(
                    self,
                    ConfidenceCategory::CompanyBasics,
                    "Website",
                    website.to_string(),
                    WEBSITE_POINTS,
                );
            }
            if let Some(description) = present(&company.description) {
                seed(
                    self,
                    ConfidenceCategory::CompanyBasics,
                    "Description",
                    description.to_string(),
                    DESCRIPTION_POINTS,
                );
            }
            if let Some(industry) = present(&company.industry) {
                seed(
                    self,
                    ConfidenceCategory::IndustryContext,
                    "Industry",
                    industry.to_string(),
                    INDUSTRY_POINTS,
                );
            }
        }

        let technologies: Vec<&str> = prior
            .technologies
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if !technologies.is_empty() {
            let points = (TECHNOLOGY_POINTS * technologies.len() as u32).min(MAX_ANSWER_BOOST);
            self.apply_boost(ConfidenceCategory::TechStack, points);
            for tech in technologies {
                self.add_fact(
                    ConfidenceCategory::TechStack,
                    ExtractedFact::new(
                        "Detected technology",
                        tech,
                        FactConfidence::Medium,
                        FactSource::PriorResearch,
                    ),
                );
                seeded += 1;
            }
        }

        debug!(facts_seeded = seeded, "Seeded confidence from prior knowledge");
        seeded
    }
}
