use clap::{Args, ValueEnum};
use fertility_planner::error::AppError;
use fertility_planner::workflows::doctors::{
    rank_doctors, standard_roster, DoctorMatch, DoctorPreferences, ExperienceLevel,
    GenderPreference, PostalDistanceEstimator,
};
use fertility_planner::workflows::intake::PatientProfile;
use fertility_planner::workflows::pathways::{score_pathways, TreatmentPathwayOption};

#[derive(Args, Debug, Default)]
pub(crate) struct PathwayReportArgs {
    /// Age bracket as collected by intake, e.g. "35-37" or "> 42"
    #[arg(long)]
    pub(crate) age_range: Option<String>,
    /// Comma-separated condition tags, e.g. "pcos,blockedTubes"
    #[arg(long, value_delimiter = ',')]
    pub(crate) conditions: Vec<String>,
    /// Time spent trying to conceive, e.g. "1-2 years"
    #[arg(long)]
    pub(crate) time_trying: Option<String>,
    /// Previous treatment, e.g. "ivf" or "none"
    #[arg(long)]
    pub(crate) previous_treatments: Option<String>,
    /// Financial comfort: low, moderate or high
    #[arg(long)]
    pub(crate) financial_comfort: Option<String>,
    /// Print each factor adjustment under its pathway
    #[arg(long)]
    pub(crate) explain: bool,
    /// Emit the scored pathways as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DoctorMatchArgs {
    /// Patient postal code to measure distance from
    #[arg(long)]
    pub(crate) postal_code: String,
    #[arg(long, value_enum)]
    pub(crate) gender: Option<GenderArg>,
    #[arg(long, value_enum)]
    pub(crate) experience: Option<ExperienceArg>,
    #[arg(long)]
    pub(crate) specialization: Option<String>,
    /// Preferred maximum distance in kilometres
    #[arg(long)]
    pub(crate) max_distance: Option<f64>,
    /// Prefer doctors who accept insurance
    #[arg(long)]
    pub(crate) insurance: bool,
    /// Prefer doctors offering telemedicine
    #[arg(long)]
    pub(crate) telemedicine: bool,
    /// Number of matches to print
    #[arg(long, default_value_t = 5)]
    pub(crate) limit: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum GenderArg {
    Female,
    Male,
    Any,
}

impl From<GenderArg> for GenderPreference {
    fn from(value: GenderArg) -> Self {
        match value {
            GenderArg::Female => GenderPreference::Female,
            GenderArg::Male => GenderPreference::Male,
            GenderArg::Any => GenderPreference::Any,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum ExperienceArg {
    Early,
    Experienced,
    Senior,
}

impl From<ExperienceArg> for ExperienceLevel {
    fn from(value: ExperienceArg) -> Self {
        match value {
            ExperienceArg::Early => ExperienceLevel::Early,
            ExperienceArg::Experienced => ExperienceLevel::Experienced,
            ExperienceArg::Senior => ExperienceLevel::Senior,
        }
    }
}

pub(crate) fn run_pathway_report(args: PathwayReportArgs) -> Result<(), AppError> {
    let explain = args.explain;
    let json = args.json;
    let profile = profile_from_args(args);
    let pathways = score_pathways(&profile);

    if json {
        match serde_json::to_string_pretty(&pathways) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Pathway payload unavailable: {err}"),
        }
        return Ok(());
    }

    render_pathways(&profile, &pathways, explain);
    Ok(())
}

pub(crate) fn run_doctor_matches(args: DoctorMatchArgs) -> Result<(), AppError> {
    let limit = args.limit;
    let postal_code = args.postal_code.clone();
    let preferences = preferences_from_args(&args);

    let roster = standard_roster();
    let matches = rank_doctors(&roster, &postal_code, &preferences, &PostalDistanceEstimator);

    render_matches(&postal_code, &matches, limit);
    Ok(())
}

fn profile_from_args(args: PathwayReportArgs) -> PatientProfile {
    let PathwayReportArgs {
        age_range,
        conditions,
        time_trying,
        previous_treatments,
        financial_comfort,
        ..
    } = args;

    PatientProfile {
        age_range,
        conditions: if conditions.is_empty() {
            None
        } else {
            Some(conditions)
        },
        time_trying,
        previous_treatments,
        financial_comfort,
        ..PatientProfile::default()
    }
}

fn preferences_from_args(args: &DoctorMatchArgs) -> DoctorPreferences {
    DoctorPreferences {
        preferred_gender: args.gender.map(GenderPreference::from),
        experience_level: args.experience.map(ExperienceLevel::from),
        specialization: args.specialization.clone(),
        max_distance: args.max_distance,
        accepts_insurance: args.insurance.then_some(true),
        offers_telemedicine: args.telemedicine.then_some(true),
    }
}

fn render_pathways(profile: &PatientProfile, pathways: &[TreatmentPathwayOption], explain: bool) {
    println!("Treatment pathway preview");
    println!(
        "Profile: age {} | conditions {} | previous treatment {} | budget {}",
        profile.age_range.as_deref().unwrap_or("not given"),
        profile
            .conditions
            .as_deref()
            .map(|tags| tags.join(", "))
            .unwrap_or_else(|| "none".to_string()),
        profile.previous_treatments.as_deref().unwrap_or("none"),
        profile.financial_comfort.as_deref().unwrap_or("not given"),
    );

    for (rank, option) in pathways.iter().enumerate() {
        println!(
            "\n{}. {} [tier {}]",
            rank + 1,
            option.name,
            option.priority
        );
        println!(
            "   success {}% | suitability {} | {} | ${}-${}",
            option.success_rate, option.suitability, option.timeline, option.cost_min, option.cost_max
        );
        println!("   {}", option.recommendation);
        if explain {
            for adjustment in &option.adjustments {
                println!(
                    "   {:+} {:?} ({})",
                    adjustment.delta, adjustment.metric, adjustment.note
                );
            }
        }
    }
}

fn render_matches(postal_code: &str, matches: &[DoctorMatch], limit: usize) {
    println!("Doctor matches from {postal_code}");
    if matches.is_empty() {
        println!("- roster is empty");
        return;
    }

    for (rank, entry) in matches.iter().take(limit).enumerate() {
        let doctor = &entry.doctor;
        println!(
            "\n{}. {} ({}) score {}",
            rank + 1,
            doctor.name,
            doctor.specialization,
            entry.match_score
        );
        println!(
            "   {}, {} {} | {:.1} km ({:?}) | fee ${}",
            doctor.clinic,
            doctor.city,
            doctor.postal_code,
            entry.distance_km,
            entry.distance_source,
            doctor.consultation_fee
        );
        for reason in &entry.reasons {
            println!("   - {reason}");
        }
    }
}
