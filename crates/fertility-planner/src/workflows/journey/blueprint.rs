use super::domain::StepTemplate;

#[derive(Debug)]
pub struct JourneyBlueprint {
    steps: Vec<StepTemplate>,
}

impl JourneyBlueprint {
    pub fn standard() -> Self {
        Self {
            steps: standard_steps(),
        }
    }

    pub fn steps(&self) -> &[StepTemplate] {
        &self.steps
    }

    pub fn step(&self, key: &str) -> Option<&StepTemplate> {
        self.steps.iter().find(|step| step.key == key)
    }
}

fn standard_steps() -> Vec<StepTemplate> {
    vec![
        StepTemplate {
            key: "initial_consultation",
            label: "Initial consultation",
            typical_days: 7,
            guidance: vec![
                "Bring any previous test results and a cycle history.",
                "Write down questions about success rates and costs beforehand.",
            ],
        },
        StepTemplate {
            key: "diagnostic_tests",
            label: "Diagnostic testing",
            typical_days: 30,
            guidance: vec![
                "Hormone panels are usually drawn on cycle day 2 to 4.",
                "Partner semen analysis is typically scheduled in the same window.",
            ],
        },
        StepTemplate {
            key: "treatment_plan",
            label: "Treatment plan review",
            typical_days: 7,
            guidance: vec!["Confirm the chosen pathway, expected timeline, and budget with the clinic."],
        },
        StepTemplate {
            key: "medication_protocol",
            label: "Medication protocol",
            typical_days: 14,
            guidance: vec![
                "Log every dose and time in the journal.",
                "Monitoring scans are usually every two to three days.",
            ],
        },
        StepTemplate {
            key: "procedure",
            label: "Procedure",
            typical_days: 1,
            guidance: vec!["Arrange transport and a rest day after retrieval or transfer."],
        },
        StepTemplate {
            key: "two_week_wait",
            label: "Two-week wait",
            typical_days: 14,
            guidance: vec!["Continue prescribed support medication until the clinic says otherwise."],
        },
        StepTemplate {
            key: "outcome_review",
            label: "Outcome review",
            typical_days: 7,
            guidance: vec!["Review results and next steps with the care team."],
        },
    ]
}
