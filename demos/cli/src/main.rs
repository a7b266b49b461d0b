use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::{debug, LevelFilter};
use pulse_assets::load_assets;
use pulse_core::{Assessment, PatientObservation, Profile, PulseConfig};

#[derive(Parser, Debug)]
#[command(
    name = "lifepulse",
    about = "Run a cardiac risk scan for one patient observation."
)]
struct Args {
    /// Start from a quick-load profile before applying field overrides.
    #[arg(short, long, value_enum, default_value_t = ProfileArg::Default)]
    profile: ProfileArg,

    /// Directory holding the model and scaler exports.
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// JSON config file (assets_dir, model_file, scaler_file, risk_threshold).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the assessment as JSON.
    #[arg(long)]
    json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(flatten)]
    fields: FieldArgs,
}

#[derive(clap::Args, Debug)]
struct FieldArgs {
    /// Age in years (1-120).
    #[arg(long)]
    age: Option<u32>,
    /// Biological sex: 0 female, 1 male.
    #[arg(long)]
    sex: Option<u8>,
    /// Chest pain type (0-3).
    #[arg(long)]
    cp: Option<u8>,
    /// Resting blood pressure in mm Hg (80-200).
    #[arg(long)]
    trestbps: Option<u32>,
    /// Cholesterol in mg/dl (100-600).
    #[arg(long)]
    chol: Option<u32>,
    /// Fasting blood sugar above 120 mg/dl.
    #[arg(long, value_enum)]
    fbs: Option<YesNo>,
    /// Resting ECG (0-2).
    #[arg(long)]
    restecg: Option<u8>,
    /// Max heart rate (60-220).
    #[arg(long)]
    thalach: Option<u32>,
    /// Chest pain during exercise.
    #[arg(long, value_enum)]
    exang: Option<YesNo>,
    /// ST depression (0.0-6.2).
    #[arg(long)]
    oldpeak: Option<f64>,
    /// ST slope (0-2).
    #[arg(long)]
    slope: Option<u8>,
    /// Major vessels colored by fluoroscopy (0-4).
    #[arg(long)]
    ca: Option<u8>,
    /// Thalassemia (0-3).
    #[arg(long)]
    thal: Option<u8>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ProfileArg {
    Default,
    Healthy,
    HighRisk,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Default => Profile::Default,
            ProfileArg::Healthy => Profile::Healthy,
            ProfileArg::HighRisk => Profile::HighRisk,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum YesNo {
    No,
    Yes,
}

impl FieldArgs {
    fn apply(&self, mut observation: PatientObservation) -> PatientObservation {
        macro_rules! override_fields {
            ($($field:ident),*) => {
                $(if let Some(value) = self.$field {
                    observation.$field = value;
                })*
            };
        }
        override_fields!(age, sex, cp, trestbps, chol, restecg, thalach, oldpeak, slope, ca, thal);

        if let Some(fbs) = self.fbs {
            observation.fbs = fbs == YesNo::Yes;
        }
        if let Some(exang) = self.exang {
            observation.exang = exang == YesNo::Yes;
        }
        observation
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = load_config(&args)?;
    let predictor =
        load_assets(&config).context("Critical error: models not found or unreadable")?;

    let observation = args
        .fields
        .apply(PatientObservation::profile(args.profile.into()));
    debug!("observation {observation:?}");

    let assessment = predictor
        .assess(&observation)
        .context("Cannot run diagnostic scan")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        println!("{}", render_report(&assessment));
    }

    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<PulseConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read config {:?}", path))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Invalid config {:?}", path))?
        }
        None => PulseConfig::default(),
    };
    if let Some(dir) = &args.assets_dir {
        config.assets_dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

fn render_report(assessment: &Assessment) -> String {
    let marker = if assessment.is_risk() { "!!" } else { "OK" };
    format!(
        "[{marker}] {}\nConfidence Score: {}\n{}\n  * Recommendation: {}\n  * Next Step: {}\nRisk Gauge: {}",
        assessment.headline,
        assessment.confidence_label(),
        assessment.summary,
        assessment.recommendation,
        assessment.next_step,
        render_gauge(assessment.gauge),
    )
}

fn render_gauge(gauge: f64) -> String {
    const WIDTH: usize = 20;
    let filled = (gauge.clamp(0.0, 1.0) * WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:.1}%",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        gauge * 100.0
    )
}
