use crate::infra::build_service;
use clap::Args;
use purchase_sim::config::AppConfig;
use purchase_sim::error::AppError;
use purchase_sim::simulation::{
    DistanceMetric, PersonaSet, ReferenceScale, SimulationReport, SimulationRequest,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Risk-seeking score of the reference customer (0-100, or 0-1 with --fractions)
    #[arg(long)]
    pub(crate) risk_seeking: f64,
    /// Market susceptibility of the reference customer (0-100, or 0-1 with --fractions)
    #[arg(long)]
    pub(crate) market_susceptibility: f64,
    /// Annual income of the reference customer
    #[arg(long)]
    pub(crate) income: f64,
    /// Original price of the item
    #[arg(long)]
    pub(crate) original_price: f64,
    /// Price change in percent; negative values are discounts
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) price_change: f64,
    /// Number of synthetic profiles to generate (defaults to APP_SAMPLE_COUNT)
    #[arg(long)]
    pub(crate) count: Option<usize>,
    /// Maximum normalized distance for a persona to match
    #[arg(long)]
    pub(crate) threshold: Option<f64>,
    /// Standard deviation of the Gaussian noise added to each profile
    #[arg(long)]
    pub(crate) stdev: Option<f64>,
    /// Distance metric used for matching (euclidean or manhattan)
    #[arg(long)]
    pub(crate) metric: Option<DistanceMetric>,
    /// Seed for reproducible noise
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Treat risk-seeking and market susceptibility as 0-1 slider fractions
    #[arg(long)]
    pub(crate) fractions: bool,
    /// Persona catalog CSV (defaults to APP_PERSONAS_CSV or the bundled catalog)
    #[arg(long)]
    pub(crate) personas_csv: Option<PathBuf>,
    /// Print every synthetic profile with the path it took through the tree
    #[arg(long)]
    pub(crate) list_profiles: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PersonasArgs {
    /// Persona catalog CSV (defaults to APP_PERSONAS_CSV or the bundled catalog)
    #[arg(long)]
    pub(crate) personas_csv: Option<PathBuf>,
}

impl SimulateArgs {
    fn request(&self) -> SimulationRequest {
        let mut request = SimulationRequest::new(
            vec![self.risk_seeking, self.market_susceptibility, self.income],
            vec![self.original_price, self.price_change],
        );
        request.scale = if self.fractions {
            ReferenceScale::Fraction
        } else {
            ReferenceScale::Percent
        };
        request.count = self.count;
        request.threshold = self.threshold;
        request.stdev = self.stdev;
        request.metric = self.metric;
        request.seed = self.seed;
        request.include_profiles = self.list_profiles;
        request
    }
}

pub(crate) fn run_simulation(args: SimulateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config, args.personas_csv.as_deref())?;

    let report = service.simulate(&args.request())?;
    print!("{}", render_report(&report));
    Ok(())
}

pub(crate) fn run_personas(args: PersonasArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config, args.personas_csv.as_deref())?;

    print!("{}", render_personas(service.personas()));
    Ok(())
}

fn render_report(report: &SimulationReport) -> String {
    let mut out = String::new();
    out.push_str("Purchase simulation\n");
    out.push_str(&format!(
        "Evaluated at {}\n",
        report.evaluated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "Reference: risk seeking {:.2} | market susceptibility {:.2} | income {:.0}\n",
        report.reference.risk_seeking,
        report.reference.market_susceptibility,
        report.reference.income
    ));
    out.push_str(&format!(
        "Environment: original price {:.2} | price change {:+.2}%\n",
        report.environment.original_price, report.environment.price_change_percent
    ));
    let seed = report
        .seed
        .map(|seed| seed.to_string())
        .unwrap_or_else(|| "entropy".to_string());
    out.push_str(&format!(
        "Matching: {} metric | threshold {} | noise stdev {} | seed {}\n",
        report.metric, report.threshold, report.stdev, seed
    ));

    out.push_str("\nMatched personas\n");
    for persona in &report.matched_personas {
        out.push_str(&format!(
            "  - {} (distance {:.4}): {} samples, {} bought\n",
            persona.name, persona.distance, persona.samples, persona.bought
        ));
    }

    out.push_str(&format!(
        "\nResult: {} of {} profiles bought | confidence {}% | verdict {}\n",
        report.bought,
        report.total,
        report.confidence_percent(),
        report.verdict
    ));

    if let Some(profiles) = &report.profiles {
        out.push_str("\nProfiles\n");
        for (index, profile) in profiles.iter().enumerate() {
            out.push_str(&format!(
                "  {:>3}. [{}] {:.2}, {:.2}, {:.0} -> {}\n",
                index + 1,
                profile.persona,
                profile.vector.risk_seeking,
                profile.vector.market_susceptibility,
                profile.vector.income,
                profile.reasoning
            ));
        }
    }

    out
}

fn render_personas(personas: &PersonaSet) -> String {
    let mut out = format!("Persona catalog ({} personas)\n", personas.len());
    for persona in personas {
        out.push_str(&format!(
            "  - {:<20} risk seeking {:>6.2} | market susceptibility {:>6.2} | income {:>9.0}\n",
            persona.name,
            persona.vector.risk_seeking,
            persona.vector.market_susceptibility,
            persona.vector.income
        ));
    }
    out
}
