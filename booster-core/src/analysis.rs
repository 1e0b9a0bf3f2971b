//! Performance analysis payloads

use serde::{Deserialize, Serialize};

/// Structured analysis of a student's records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Technical performance overview
    pub summary: String,
    /// Actionable improvements, most important first
    pub recommendations: Vec<String>,
    /// Likely specialization
    pub career_path: String,
}

impl AnalysisResult {
    pub fn new(
        summary: impl Into<String>,
        recommendations: Vec<String>,
        career_path: impl Into<String>,
    ) -> Self {
        Self {
            summary: summary.into(),
            recommendations,
            career_path: career_path.into(),
        }
    }

    /// Payload served when the provider fails; never cached
    pub fn fallback() -> Self {
        Self::new(
            "AI analysis unavailable at this moment. Your performance shows solid progress \
             across subjects. Continue focusing on practical lab applications to strengthen \
             fundamental skills.",
            vec![
                "Master core concepts through hands-on practice".to_string(),
                "Participate actively in lab sessions".to_string(),
                "Review theory before lab experiments".to_string(),
                "Seek clarification on difficult topics".to_string(),
            ],
            "Software Engineering / Systems Design",
        )
    }

    /// Payload served when no provider credentials are configured; never cached
    pub fn unconfigured() -> Self {
        Self::new(
            "Technical evaluation pending API configuration.",
            vec![
                "Set the GEMINI_API_KEY environment variable".to_string(),
                "Configure Gemini API access".to_string(),
            ],
            "General Engineering Practice",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_has_four_recommendations() {
        let fallback = AnalysisResult::fallback();
        assert_eq!(fallback.recommendations.len(), 4);
        assert_eq!(fallback.career_path, "Software Engineering / Systems Design");
    }

    #[test]
    fn test_wire_format_uses_career_path() {
        let json = r#"{"summary":"s","recommendations":["a","b"],"careerPath":"R&D"}"#;
        let parsed: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.career_path, "R&D");
        assert_eq!(parsed.recommendations, vec!["a", "b"]);
    }
}
