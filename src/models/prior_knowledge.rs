//! Prior Knowledge
//!
//! Research profile gathered about a business before the quiz starts.

use serde::{Deserialize, Serialize};

/// What is already known about the company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorKnowledge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyProfile>,
    /// Technologies detected on the company's site or listings
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// Company profile fields. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PriorKnowledge {
    pub fn is_empty(&self) -> bool {
        self.company.is_none() && self.technologies.iter().all(|t| t.trim().is_empty())
    }
}
