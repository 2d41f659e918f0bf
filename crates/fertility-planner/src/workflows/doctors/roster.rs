use super::domain::{DoctorRecord, ExperienceLevel, Gender};

struct RosterEntry {
    id: &'static str,
    name: &'static str,
    specialization: &'static str,
    gender: Gender,
    experience: ExperienceLevel,
    clinic: &'static str,
    city: &'static str,
    postal_code: &'static str,
    consultation_fee: u32,
    accepts_insurance: bool,
    offers_telemedicine: bool,
    languages: &'static [&'static str],
}

const ROSTER: &[RosterEntry] = &[
    RosterEntry {
        id: "dr-001",
        name: "Dr. Maya Chen",
        specialization: "Reproductive Endocrinology",
        gender: Gender::Female,
        experience: ExperienceLevel::Senior,
        clinic: "Hudson Fertility Center",
        city: "New York",
        postal_code: "10016",
        consultation_fee: 350,
        accepts_insurance: true,
        offers_telemedicine: true,
        languages: &["English", "Mandarin"],
    },
    RosterEntry {
        id: "dr-002",
        name: "Dr. Daniel Okafor",
        specialization: "IVF Specialist",
        gender: Gender::Male,
        experience: ExperienceLevel::Experienced,
        clinic: "Brooklyn Reproductive Health",
        city: "Brooklyn",
        postal_code: "11201",
        consultation_fee: 275,
        accepts_insurance: true,
        offers_telemedicine: false,
        languages: &["English"],
    },
    RosterEntry {
        id: "dr-003",
        name: "Dr. Sofia Alvarez",
        specialization: "Gynecology",
        gender: Gender::Female,
        experience: ExperienceLevel::Early,
        clinic: "Garden State Women's Care",
        city: "Newark",
        postal_code: "07102",
        consultation_fee: 180,
        accepts_insurance: true,
        offers_telemedicine: true,
        languages: &["English", "Spanish"],
    },
    RosterEntry {
        id: "dr-004",
        name: "Dr. Priya Raman",
        specialization: "Fertility Specialist",
        gender: Gender::Female,
        experience: ExperienceLevel::Experienced,
        clinic: "Back Bay Fertility",
        city: "Boston",
        postal_code: "02116",
        consultation_fee: 300,
        accepts_insurance: false,
        offers_telemedicine: true,
        languages: &["English", "Tamil"],
    },
    RosterEntry {
        id: "dr-005",
        name: "Dr. Samuel Brooks",
        specialization: "Andrology",
        gender: Gender::Male,
        experience: ExperienceLevel::Senior,
        clinic: "Liberty Men's Health",
        city: "Philadelphia",
        postal_code: "19103",
        consultation_fee: 250,
        accepts_insurance: true,
        offers_telemedicine: true,
        languages: &["English"],
    },
    RosterEntry {
        id: "dr-006",
        name: "Dr. Hannah Weiss",
        specialization: "Reproductive Endocrinology",
        gender: Gender::Female,
        experience: ExperienceLevel::Experienced,
        clinic: "Lakeshore Fertility Institute",
        city: "Chicago",
        postal_code: "60611",
        consultation_fee: 320,
        accepts_insurance: true,
        offers_telemedicine: false,
        languages: &["English", "German"],
    },
    RosterEntry {
        id: "dr-007",
        name: "Dr. Marcus Lee",
        specialization: "IVF Specialist",
        gender: Gender::Male,
        experience: ExperienceLevel::Senior,
        clinic: "Pacific IVF Partners",
        city: "San Francisco",
        postal_code: "94115",
        consultation_fee: 400,
        accepts_insurance: false,
        offers_telemedicine: true,
        languages: &["English", "Korean"],
    },
    RosterEntry {
        id: "dr-008",
        name: "Dr. Aisha Rahman",
        specialization: "Reproductive Immunology",
        gender: Gender::Female,
        experience: ExperienceLevel::Senior,
        clinic: "Capitol Reproductive Medicine",
        city: "Washington",
        postal_code: "20037",
        consultation_fee: 380,
        accepts_insurance: true,
        offers_telemedicine: true,
        languages: &["English", "Arabic"],
    },
];

/// The static roster every search is scored against.
pub fn standard_roster() -> Vec<DoctorRecord> {
    ROSTER
        .iter()
        .map(|entry| DoctorRecord {
            id: entry.id.to_string(),
            name: entry.name.to_string(),
            specialization: entry.specialization.to_string(),
            gender: entry.gender,
            experience: entry.experience,
            clinic: entry.clinic.to_string(),
            city: entry.city.to_string(),
            postal_code: entry.postal_code.to_string(),
            consultation_fee: entry.consultation_fee,
            accepts_insurance: entry.accepts_insurance,
            offers_telemedicine: entry.offers_telemedicine,
            languages: entry.languages.iter().map(|l| l.to_string()).collect(),
        })
        .collect()
}
