use crate::infra::{build_service, override_weights_dir, ApiService};
use clap::{Args, Subcommand};
use lead_qualifier::config::AppConfig;
use lead_qualifier::error::AppError;
use lead_qualifier::qualification::{
    LeadScore, QualificationStatus, QuestionView, ScoreResponse, Subcategory, WeightConfig,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct StorageArgs {
    /// Directory holding the persisted weight table (overrides LEAD_WEIGHTS_DIR)
    #[arg(long)]
    pub(crate) weights_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Budget range answer, e.g. "More than $100,000"
    #[arg(long)]
    pub(crate) budget: Option<String>,
    /// Industry experience answer
    #[arg(long)]
    pub(crate) industry_experience: Option<String>,
    /// Specialization answer
    #[arg(long)]
    pub(crate) specialization: Option<String>,
    /// Business entity answer
    #[arg(long)]
    pub(crate) entity_type: Option<String>,
    /// Purchase timeline answer
    #[arg(long)]
    pub(crate) timeline: Option<String>,
    /// Decision-making authority answer
    #[arg(long)]
    pub(crate) authority: Option<String>,
    /// Print the score as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) storage: StorageArgs,
}

impl ScoreArgs {
    fn answers(&self) -> Vec<(&'static str, &str)> {
        [
            (Subcategory::Budget, &self.budget),
            (Subcategory::IndustryExperience, &self.industry_experience),
            (Subcategory::Specialization, &self.specialization),
            (Subcategory::EntityType, &self.entity_type),
            (Subcategory::Timeline, &self.timeline),
            (Subcategory::Authority, &self.authority),
        ]
        .into_iter()
        .filter_map(|(subcategory, answer)| {
            answer
                .as_deref()
                .map(|label| (subcategory.key(), label))
        })
        .collect()
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum WeightsCommand {
    /// Print the current weight table
    Show(ShowWeightsArgs),
    /// Restore the built-in weight table
    Reset(StorageArgs),
    /// Change the points awarded for one answer option
    Set(SetWeightArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ShowWeightsArgs {
    /// Print the raw table as JSON
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) storage: StorageArgs,
}

#[derive(Args, Debug)]
pub(crate) struct SetWeightArgs {
    /// Question key, e.g. budget, industryExperience, timeline
    #[arg(value_parser = parse_subcategory)]
    pub(crate) subcategory: Subcategory,
    /// Option label exactly as shown by `weights show`
    pub(crate) option: String,
    /// Points awarded for the option
    pub(crate) points: u32,
    #[command(flatten)]
    pub(crate) storage: StorageArgs,
}

pub(crate) fn parse_subcategory(raw: &str) -> Result<Subcategory, String> {
    Subcategory::from_key(raw).ok_or_else(|| {
        let known: Vec<&str> = Subcategory::ALL.iter().map(|sub| sub.key()).collect();
        format!("unknown question '{raw}' (expected one of {})", known.join(", "))
    })
}

fn load_service(storage: StorageArgs) -> Result<Arc<ApiService>, AppError> {
    let mut config = AppConfig::load()?;
    override_weights_dir(&mut config, storage.weights_dir);
    Ok(build_service(&config))
}

pub(crate) fn run_score(mut args: ScoreArgs) -> Result<(), AppError> {
    let service = load_service(std::mem::take(&mut args.storage))?;
    let answers = service.parse_positional(args.answers())?;
    let score = service.score(&answers);

    if args.json {
        let body = ScoreResponse {
            status: score.status(),
            score,
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{}", render_score(&score, answers.answered()));
    }
    Ok(())
}

pub(crate) fn run_weights(command: WeightsCommand) -> Result<(), AppError> {
    match command {
        WeightsCommand::Show(args) => {
            let service = load_service(args.storage)?;
            let weights = service.weights();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&weights)?);
            } else {
                println!("{}", render_weights(&service.questionnaire(), &weights));
            }
        }
        WeightsCommand::Reset(storage) => {
            let service = load_service(storage)?;
            let weights = service.reset_weights()?;
            println!("Weight table reset to defaults");
            println!("{}", render_weights(&service.questionnaire(), &weights));
        }
        WeightsCommand::Set(args) => {
            let service = load_service(args.storage)?;
            let weights = service.set_weight(args.subcategory, &args.option, args.points)?;
            println!(
                "Set {} / {} to {} points",
                args.subcategory.key(),
                args.option,
                args.points
            );
            println!("{}", render_weights(&service.questionnaire(), &weights));
        }
    }
    Ok(())
}

fn render_score(score: &LeadScore, answered: usize) -> String {
    let status = score.status();
    let mut lines = vec![
        format!("Lead score ({answered}/6 questions answered)"),
        format!("- Business fit: {}", score.business_fit),
        format!("- Capability: {}", score.capability),
        format!("- Engagement: {}", score.engagement),
        format!("- Engagement multiplier: x{:.1}", score.multiplier),
        format!("- Total: {} -> {}", score.total, status.label()),
    ];
    if status == QualificationStatus::Qualified {
        lines.push(format!("  Worth {} points on submission", status.points_awarded()));
    }
    lines.join("\n")
}

fn render_weights(questions: &[QuestionView], weights: &WeightConfig) -> String {
    let mut lines = Vec::new();
    for question in questions {
        lines.push(format!(
            "{}. {} / {} ({})",
            question.index + 1,
            question.category.label(),
            question.title,
            question.subcategory.key()
        ));
        for option in &question.options {
            lines.push(format!("  - {}: {}", option.label, option.points));
        }
    }

    let missing = weights.missing_entries();
    if !missing.is_empty() {
        lines.push(format!(
            "{} option(s) have no entry and score 0",
            missing.len()
        ));
    }
    lines.join("\n")
}
