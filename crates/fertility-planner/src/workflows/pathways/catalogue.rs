use super::domain::PathwayKey;

/// Static descriptive data for a modality.
pub(crate) struct CatalogueEntry {
    pub name: &'static str,
    pub timeline: &'static str,
    pub cost_min: u32,
    pub cost_max: u32,
    pub pros: &'static [&'static str],
    pub cons: &'static [&'static str],
}

pub(crate) fn entry(key: PathwayKey) -> CatalogueEntry {
    match key {
        PathwayKey::Iui => CatalogueEntry {
            name: "IUI (Intrauterine Insemination)",
            timeline: "1-3 months per cycle",
            cost_min: 500,
            cost_max: 4_000,
            pros: &[
                "Least invasive assisted option",
                "Lowest cost per cycle",
                "Minimal recovery time",
            ],
            cons: &[
                "Lower success rate per cycle",
                "Usually requires open fallopian tubes",
            ],
        },
        PathwayKey::Fet => CatalogueEntry {
            name: "FET (Frozen Embryo Transfer)",
            timeline: "1-2 months",
            cost_min: 3_000,
            cost_max: 6_000,
            pros: &[
                "Uses embryos from a previous IVF cycle",
                "No further egg retrieval needed",
                "Uterine lining can be prepared on your schedule",
            ],
            cons: &["Only possible with stored embryos"],
        },
        PathwayKey::IvfIcsi => CatalogueEntry {
            name: "IVF/ICSI",
            timeline: "2-3 months per cycle",
            cost_min: 12_000,
            cost_max: 20_000,
            pros: &[
                "Highest per-cycle success for most profiles",
                "Bypasses tubal and sperm factors",
                "Surplus embryos can be frozen",
            ],
            cons: &[
                "Daily injections and monitoring",
                "Higher cost",
                "Egg retrieval procedure",
            ],
        },
        PathwayKey::IvfPgtA => CatalogueEntry {
            name: "IVF with PGT-A",
            timeline: "3-4 months",
            cost_min: 15_000,
            cost_max: 25_000,
            pros: &[
                "Screens embryos for chromosomal abnormalities",
                "Can lower miscarriage risk",
                "Helps select a single embryo to transfer",
            ],
            cons: &[
                "Highest cost option",
                "Fewer embryos may be available to transfer",
                "Adds time for testing",
            ],
        },
    }
}
