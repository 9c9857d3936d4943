//! Question and test case models

use serde::{Deserialize, Serialize};

/// Question record, owned by exactly one contest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub contest_id: String,
    /// Reference to the statement content (stored outside the engine)
    pub statement_ref: String,
    /// Ordered test cases the submission is judged against
    pub test_cases: Vec<TestCase>,
}

impl Question {
    /// Sum of all test case weights, the upper bound of any raw score
    pub fn total_weight(&self) -> u32 {
        self.test_cases.iter().map(|tc| tc.weight).sum()
    }
}

/// A single judging test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    pub weight: u32,
}
