use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MathQuestion {
    pub expression: String,
    #[serde(default)]
    pub answer: Option<f64>,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub knowledge_point: Option<String>,
    #[serde(default)]
    pub difficulty: Option<i64>,
}

impl MathQuestion {
    pub fn new(expression: &str) -> Self {
        Self {
            expression: expression.to_string(),
            answer: None,
            operation: None,
            knowledge_point: None,
            difficulty: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Simple,
    #[default]
    Standard,
    Detailed,
}

impl DetailLevel {
    /// Unknown labels fall back to the standard level.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "simple" => DetailLevel::Simple,
            "detailed" => DetailLevel::Detailed,
            _ => DetailLevel::Standard,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SolutionStep {
    pub step_number: u32,
    pub description: String,
    pub explanation: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StructuredAnalysis {
    pub problem_understanding: String,
    pub solution_approach: String,
    pub solution_steps: Vec<SolutionStep>,
    pub key_concepts: Vec<String>,
    pub common_mistakes: Vec<String>,
    pub tips: Vec<String>,
    pub difficulty_analysis: String,
    pub alternative_methods: Vec<String>,
}
