//! Hand-tuned point deltas per modality.
//!
//! The constants are placeholder business rules, not clinical evidence.

use super::catalogue;
use super::domain::{
    priority_tier, recommendation_for, PathwayKey, ScoreAdjustment, ScoreMetric,
    TreatmentPathwayOption,
};
use crate::workflows::intake::PatientProfile;

pub(crate) const DEFAULT_AGE: u32 = 30;

/// Profile facts the rules key on, resolved once with neutral defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProfileSignals {
    pub age: u32,
    pub years_trying: u32,
    pub previous_ivf: bool,
    pub low_financial_comfort: bool,
    conditions: Vec<&'static str>,
}

const KNOWN_CONDITIONS: &[&str] = &[
    "pcos",
    "endometriosis",
    "blockedTubes",
    "lowOvarianReserve",
    "fibroids",
    "maleFactor",
];

impl ProfileSignals {
    pub fn from_profile(profile: &PatientProfile) -> Self {
        let age = profile
            .age_range
            .as_deref()
            .and_then(parse_lower_bound)
            .unwrap_or(DEFAULT_AGE);
        let years_trying = profile
            .time_trying
            .as_deref()
            .and_then(parse_lower_bound)
            .unwrap_or(0);
        let conditions = KNOWN_CONDITIONS
            .iter()
            .copied()
            .filter(|tag| profile.has_condition(tag))
            .collect();

        Self {
            age,
            years_trying,
            previous_ivf: profile.had_previous_ivf(),
            low_financial_comfort: profile.has_low_financial_comfort(),
            conditions,
        }
    }

    fn has(&self, tag: &str) -> bool {
        self.conditions.contains(&tag)
    }
}

/// First run of digits in a bracket string: `"35-37"` is 35, `"> 42"` is 42.
pub fn parse_lower_bound(raw: &str) -> Option<u32> {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[derive(Debug, Clone, Copy)]
enum Factor {
    AgeOver(u32),
    Condition(&'static str),
    YearsTryingOver(u32),
    LowFinancialComfort,
    PreviousIvf,
}

impl Factor {
    fn applies(self, signals: &ProfileSignals) -> bool {
        match self {
            Factor::AgeOver(threshold) => signals.age > threshold,
            Factor::Condition(tag) => signals.has(tag),
            Factor::YearsTryingOver(years) => signals.years_trying > years,
            Factor::LowFinancialComfort => signals.low_financial_comfort,
            Factor::PreviousIvf => signals.previous_ivf,
        }
    }

    fn label(self) -> String {
        match self {
            Factor::AgeOver(threshold) => format!("age>{threshold}"),
            Factor::Condition(tag) => tag.to_string(),
            Factor::YearsTryingOver(years) => format!("timeTrying>{years}y"),
            Factor::LowFinancialComfort => "financialComfort=low".to_string(),
            Factor::PreviousIvf => "previousTreatments=ivf".to_string(),
        }
    }

    fn describe(self, signals: &ProfileSignals) -> String {
        match self {
            Factor::AgeOver(threshold) => format!("age {} is over {threshold}", signals.age),
            Factor::Condition(tag) => format!("{tag} reported"),
            Factor::YearsTryingOver(years) => {
                format!("trying for more than {years} years")
            }
            Factor::LowFinancialComfort => "budget is a concern".to_string(),
            Factor::PreviousIvf => "previous IVF cycle".to_string(),
        }
    }
}

struct Rule {
    factor: Factor,
    delta: i16,
}

const fn rule(factor: Factor, delta: i16) -> Rule {
    Rule { factor, delta }
}

struct ModalityRules {
    key: PathwayKey,
    success_base: i16,
    success_floor: i16,
    success: &'static [Rule],
    suitability_base: i16,
    suitability: &'static [Rule],
}

const IUI: ModalityRules = ModalityRules {
    key: PathwayKey::Iui,
    success_base: 15,
    success_floor: 5,
    success: &[
        rule(Factor::AgeOver(35), -3),
        rule(Factor::AgeOver(40), -4),
        rule(Factor::AgeOver(42), -3),
        rule(Factor::Condition("blockedTubes"), -10),
        rule(Factor::Condition("endometriosis"), -4),
        rule(Factor::Condition("lowOvarianReserve"), -4),
        rule(Factor::Condition("maleFactor"), -5),
    ],
    suitability_base: 70,
    suitability: &[
        rule(Factor::AgeOver(35), -15),
        rule(Factor::AgeOver(40), -20),
        rule(Factor::Condition("blockedTubes"), -50),
        rule(Factor::Condition("endometriosis"), -15),
        rule(Factor::Condition("lowOvarianReserve"), -15),
        rule(Factor::Condition("maleFactor"), -20),
        rule(Factor::Condition("pcos"), 5),
        rule(Factor::YearsTryingOver(2), -10),
        rule(Factor::LowFinancialComfort, 10),
    ],
};

const FET: ModalityRules = ModalityRules {
    key: PathwayKey::Fet,
    success_base: 45,
    success_floor: 20,
    success: &[
        rule(Factor::AgeOver(35), -5),
        rule(Factor::AgeOver(40), -10),
        rule(Factor::AgeOver(42), -5),
        rule(Factor::Condition("fibroids"), -5),
        rule(Factor::Condition("endometriosis"), -3),
    ],
    suitability_base: 85,
    suitability: &[
        rule(Factor::AgeOver(40), -10),
        rule(Factor::Condition("fibroids"), -10),
    ],
};

const IVF_ICSI: ModalityRules = ModalityRules {
    key: PathwayKey::IvfIcsi,
    success_base: 50,
    success_floor: 20,
    success: &[
        rule(Factor::AgeOver(35), -10),
        rule(Factor::AgeOver(40), -15),
        rule(Factor::AgeOver(42), -5),
        rule(Factor::Condition("lowOvarianReserve"), -10),
        rule(Factor::Condition("endometriosis"), -5),
        rule(Factor::Condition("fibroids"), -5),
    ],
    suitability_base: 75,
    suitability: &[
        rule(Factor::AgeOver(35), 5),
        rule(Factor::Condition("blockedTubes"), 15),
        rule(Factor::Condition("maleFactor"), 15),
        rule(Factor::Condition("endometriosis"), 5),
        rule(Factor::Condition("lowOvarianReserve"), -5),
        rule(Factor::YearsTryingOver(2), 10),
        rule(Factor::LowFinancialComfort, -15),
    ],
};

const IVF_PGT_A: ModalityRules = ModalityRules {
    key: PathwayKey::IvfPgtA,
    success_base: 55,
    success_floor: 25,
    success: &[
        rule(Factor::AgeOver(35), -5),
        rule(Factor::AgeOver(40), -10),
        rule(Factor::AgeOver(42), -5),
        rule(Factor::Condition("lowOvarianReserve"), -15),
    ],
    suitability_base: 60,
    suitability: &[
        rule(Factor::AgeOver(35), 15),
        rule(Factor::AgeOver(40), 10),
        rule(Factor::Condition("lowOvarianReserve"), -10),
        rule(Factor::LowFinancialComfort, -20),
        rule(Factor::PreviousIvf, 10),
    ],
};

const CATALOGUE: [&ModalityRules; 4] = [&IUI, &FET, &IVF_ICSI, &IVF_PGT_A];

/// Whether a modality is offered at all for this profile.
fn offered(key: PathwayKey, signals: &ProfileSignals) -> bool {
    match key {
        PathwayKey::Fet => signals.previous_ivf,
        _ => true,
    }
}

fn apply(
    metric: ScoreMetric,
    base: i16,
    rules: &[Rule],
    signals: &ProfileSignals,
    adjustments: &mut Vec<ScoreAdjustment>,
) -> i16 {
    let mut total = base;
    for rule in rules.iter().filter(|rule| rule.factor.applies(signals)) {
        total += rule.delta;
        adjustments.push(ScoreAdjustment {
            metric,
            factor: rule.factor.label(),
            delta: rule.delta,
            note: rule.factor.describe(signals),
        });
    }
    total
}

fn clamp_score(value: i16) -> u8 {
    value.clamp(0, 100) as u8
}

fn score_modality(rules: &ModalityRules, signals: &ProfileSignals) -> TreatmentPathwayOption {
    let mut adjustments = Vec::new();

    let success = apply(
        ScoreMetric::SuccessRate,
        rules.success_base,
        rules.success,
        signals,
        &mut adjustments,
    );
    let success_rate = clamp_score(success.max(rules.success_floor));

    let suitability = clamp_score(apply(
        ScoreMetric::Suitability,
        rules.suitability_base,
        rules.suitability,
        signals,
        &mut adjustments,
    ));

    let priority = priority_tier(suitability);
    let entry = catalogue::entry(rules.key);

    TreatmentPathwayOption {
        key: rules.key,
        name: entry.name.to_string(),
        success_rate,
        timeline: entry.timeline.to_string(),
        cost_min: entry.cost_min,
        cost_max: entry.cost_max,
        suitability,
        pros: entry.pros.iter().map(|s| s.to_string()).collect(),
        cons: entry.cons.iter().map(|s| s.to_string()).collect(),
        priority,
        recommendation: recommendation_for(priority).to_string(),
        adjustments,
    }
}

/// Score every offered modality and rank the result.
pub fn score_pathways(profile: &PatientProfile) -> Vec<TreatmentPathwayOption> {
    let signals = ProfileSignals::from_profile(profile);
    let options = CATALOGUE
        .iter()
        .filter(|rules| offered(rules.key, &signals))
        .map(|rules| score_modality(rules, &signals))
        .collect();
    rank_pathways(options)
}

/// Lower tier first, then higher suitability. Stable for equal keys.
pub fn rank_pathways(mut options: Vec<TreatmentPathwayOption>) -> Vec<TreatmentPathwayOption> {
    options.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| b.suitability.cmp(&a.suitability))
    });
    options
}
