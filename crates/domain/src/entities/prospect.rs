//! Prospect profile entity

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::DomainError;

/// Role used when the prospect's role is unknown
pub const DEFAULT_ROLE: &str = "Unknown";

/// A scored sales prospect, as produced by the upstream analysis step
///
/// Every field is optional on input. Use [`ProspectProfile::sanitized`] before
/// feeding a profile into prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProspectProfile {
    /// Prospect's name
    #[validate(length(max = 200))]
    pub author: String,
    /// Job title
    #[validate(length(max = 200))]
    pub role: String,
    /// Employer
    #[validate(length(max = 200))]
    pub company: String,
    /// How well the prospect matches the offering (0.0 - 1.0)
    #[serde(alias = "alignmentScore")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub alignment_score: f64,
    /// Industry or sector
    #[validate(length(max = 200))]
    pub industry: String,
    /// Problems the prospect talks about, most relevant first
    #[serde(alias = "painPoints")]
    #[validate(length(max = 50))]
    pub pain_points: Vec<String>,
    /// Why the offering fits
    #[serde(alias = "solutionFit")]
    #[validate(length(max = 2000))]
    pub solution_fit: String,
    /// Free-form analyst notes
    #[validate(length(max = 5000))]
    pub insights: String,
}

impl Default for ProspectProfile {
    fn default() -> Self {
        Self {
            author: String::new(),
            role: DEFAULT_ROLE.to_string(),
            company: String::new(),
            alignment_score: 0.0,
            industry: String::new(),
            pain_points: Vec::new(),
            solution_fit: String::new(),
            insights: String::new(),
        }
    }
}

impl ProspectProfile {
    /// Create a profile with a name and company; everything else defaulted
    pub fn new(author: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            company: company.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    #[must_use]
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = industry.into();
        self
    }

    #[must_use]
    pub fn with_pain_points<I, S>(mut self, pain_points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pain_points = pain_points.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_solution_fit(mut self, solution_fit: impl Into<String>) -> Self {
        self.solution_fit = solution_fit.into();
        self
    }

    #[must_use]
    pub fn with_insights(mut self, insights: impl Into<String>) -> Self {
        self.insights = insights.into();
        self
    }

    #[must_use]
    pub const fn with_alignment_score(mut self, score: f64) -> Self {
        self.alignment_score = score;
        self
    }

    /// Normalize the profile so every field is usable in a prompt
    ///
    /// Trims strings, substitutes [`DEFAULT_ROLE`] for an empty role, drops
    /// blank pain points and clamps the score into `[0, 1]` (NaN becomes 0).
    /// Never fails.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let role = self.role.trim();
        let alignment_score = if self.alignment_score.is_nan() {
            0.0
        } else {
            self.alignment_score.clamp(0.0, 1.0)
        };

        Self {
            author: self.author.trim().to_string(),
            role: if role.is_empty() {
                DEFAULT_ROLE.to_string()
            } else {
                role.to_string()
            },
            company: self.company.trim().to_string(),
            alignment_score,
            industry: self.industry.trim().to_string(),
            pain_points: self
                .pain_points
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            solution_fit: self.solution_fit.trim().to_string(),
            insights: self.insights.trim().to_string(),
        }
    }

    /// Check field ranges and lengths
    pub fn validated(self) -> Result<Self, DomainError> {
        self.validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        Ok(self)
    }

    /// Pain points as a comma separated list
    pub fn pain_points_joined(&self) -> String {
        self.pain_points.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> ProspectProfile {
        ProspectProfile::new("Jane Doe", "Acme")
            .with_role("Data Lead")
            .with_industry("retail")
            .with_pain_points(["lineage tracking"])
            .with_solution_fit("catalog")
            .with_insights("growing team")
    }

    #[test]
    fn default_role_is_unknown() {
        let prospect = ProspectProfile::default();
        assert_eq!(prospect.role, DEFAULT_ROLE);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let prospect: ProspectProfile = serde_json::from_str(r#"{"author":"Jane"}"#).unwrap();
        assert_eq!(prospect.author, "Jane");
        assert_eq!(prospect.role, "Unknown");
        assert!(prospect.pain_points.is_empty());
        assert!(prospect.company.is_empty());
    }

    #[test]
    fn camel_case_aliases_are_accepted() {
        let json = r#"{"author":"Jane","painPoints":["a","b"],"solutionFit":"x","alignmentScore":0.5}"#;
        let prospect: ProspectProfile = serde_json::from_str(json).unwrap();
        assert_eq!(prospect.pain_points, vec!["a", "b"]);
        assert_eq!(prospect.solution_fit, "x");
        assert!((prospect.alignment_score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&jane()).unwrap();
        assert!(json.contains("pain_points"));
        assert!(json.contains("solution_fit"));
        assert!(json.contains("alignment_score"));
    }

    #[test]
    fn sanitized_replaces_blank_role() {
        let prospect = jane().with_role("   ").sanitized();
        assert_eq!(prospect.role, "Unknown");
    }

    #[test]
    fn sanitized_trims_and_drops_blank_pain_points() {
        let prospect = jane()
            .with_pain_points(["  lineage  ", "", "   ", "quality"])
            .sanitized();
        assert_eq!(prospect.pain_points, vec!["lineage", "quality"]);
    }

    #[test]
    fn sanitized_clamps_score() {
        assert!((jane().with_alignment_score(1.7).sanitized().alignment_score - 1.0).abs() < f64::EPSILON);
        assert!(jane().with_alignment_score(-3.0).sanitized().alignment_score.abs() < f64::EPSILON);
        assert!(jane().with_alignment_score(f64::NAN).sanitized().alignment_score.abs() < f64::EPSILON);
    }

    #[test]
    fn sanitized_keeps_valid_profile() {
        let prospect = jane().with_alignment_score(0.8);
        assert_eq!(prospect.clone().sanitized(), prospect);
    }

    #[test]
    fn validated_rejects_out_of_range_score() {
        let result = jane().with_alignment_score(1.5).validated();
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn validated_accepts_valid_profile() {
        assert!(jane().with_alignment_score(0.9).validated().is_ok());
    }

    #[test]
    fn pain_points_joined_uses_commas() {
        let prospect = jane().with_pain_points(["a", "b", "c"]);
        assert_eq!(prospect.pain_points_joined(), "a, b, c");
    }
}
