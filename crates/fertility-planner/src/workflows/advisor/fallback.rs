//! Fixed payloads returned whenever the model cannot be used.

use super::domain::{Recommendation, RecommendationSet, ReportAnalysis};

pub fn recommendations() -> RecommendationSet {
    RecommendationSet {
        summary: "Personalised suggestions are unavailable right now, so here are the steps most \
                  patients at this stage find useful."
            .to_string(),
        recommendations: vec![
            Recommendation {
                title: "Book a consultation with a fertility specialist".to_string(),
                detail: "A reproductive endocrinologist can confirm which of your treatment \
                         options fit your history and order any missing tests."
                    .to_string(),
                category: "medical".to_string(),
            },
            Recommendation {
                title: "Gather your previous results".to_string(),
                detail: "Collect hormone panels, ultrasound reports and any earlier treatment \
                         records so your first appointment starts from complete information."
                    .to_string(),
                category: "preparation".to_string(),
            },
            Recommendation {
                title: "Plan for the emotional load".to_string(),
                detail: "Treatment cycles are demanding. Counselling or a peer support group \
                         helps many patients through the waiting periods."
                    .to_string(),
                category: "wellbeing".to_string(),
            },
            Recommendation {
                title: "Check your coverage".to_string(),
                detail: "Ask your insurer which diagnostics, medications and procedures are \
                         covered before committing to a plan."
                    .to_string(),
                category: "financial".to_string(),
            },
        ],
        next_steps: vec![
            "Review your treatment pathway results".to_string(),
            "Shortlist two or three matched doctors".to_string(),
            "Start logging cycle data in your journal".to_string(),
        ],
    }
}

pub fn report_analysis() -> ReportAnalysis {
    ReportAnalysis {
        extracted_fields: Vec::new(),
        insights: vec![
            "The report could not be analysed automatically.".to_string(),
            "Your clinic can walk you through each value and its reference range.".to_string(),
        ],
        follow_up_questions: vec![
            "Which of these results affect my treatment options?".to_string(),
            "Are any values outside the expected range for my age?".to_string(),
            "Should any test be repeated before we start treatment?".to_string(),
        ],
    }
}
