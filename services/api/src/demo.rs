use crate::infra::{load_config, load_evaluator};
use clap::Args;
use loan_risk::assessment::policy::APPROVAL_THRESHOLD_PCT;
use loan_risk::assessment::{Assessment, LayoutKind, LoanApplication, ModelSummary, RecordImporter};
use loan_risk::error::AppError;
use loan_risk::telemetry;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Applicant record to score (.json object or .csv with one data row)
    #[arg(long)]
    pub(crate) record: PathBuf,
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Print the assessment as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Print the assessment as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ModelArgs {
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = load_config(args.model)?;
    telemetry::init(&config.telemetry)?;
    let evaluator = load_evaluator(&config.model)?;

    let record = RecordImporter::from_path(&args.record)?;
    let assessment = evaluator.evaluate(&record)?;

    print_assessment(&assessment, args.json)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = load_config(args.model)?;
    telemetry::init(&config.telemetry)?;
    let evaluator = load_evaluator(&config.model)?;

    let applicant = LoanApplication::form_defaults();
    let assessment = evaluator.evaluate(&applicant.to_raw_record())?;

    if !args.json {
        println!("Loan assessment demo (intake form defaults)");
        println!(
            "Applicant #{}: income {:.0}, credit score {}, loan {:.0} over {} months",
            applicant.applicant_id,
            applicant.applicant_income,
            applicant.credit_score,
            applicant.loan_amount,
            applicant.loan_term
        );
    }
    print_assessment(&assessment, args.json)
}

pub(crate) fn run_model_inspect(args: ModelArgs) -> Result<(), AppError> {
    let config = load_config(args.model)?;
    telemetry::init(&config.telemetry)?;
    let evaluator = load_evaluator(&config.model)?;

    println!("Model artifact: {}", config.model.artifact_path.display());
    print!("{}", render_model_summary(&evaluator.summary()));
    Ok(())
}

fn print_assessment(assessment: &Assessment, as_json: bool) -> Result<(), AppError> {
    if as_json {
        let json = serde_json::to_string_pretty(assessment).map_err(std::io::Error::other)?;
        println!("{json}");
    } else {
        print!("{}", render_assessment(assessment));
    }
    Ok(())
}

fn layout_label(layout: LayoutKind) -> &'static str {
    match layout {
        LayoutKind::Aligned => "aligned to model schema",
        LayoutKind::Raw => "raw fields (model records no schema)",
    }
}

pub(crate) fn render_assessment(assessment: &Assessment) -> String {
    let mut out = String::new();
    out.push_str(&format!("Applicant: #{}\n", assessment.applicant_id));
    out.push_str(&format!("Decision: {}\n", assessment.decision.label()));
    out.push_str(&format!(
        "Approval probability: {}\n",
        assessment.probability_display
    ));
    out.push_str(&format!("Risk level: {}\n", assessment.risk.label()));
    out.push_str(&format!(
        "Approval threshold: {:.0}%\n",
        APPROVAL_THRESHOLD_PCT
    ));
    out.push_str(&format!("Predicted class: {}\n", assessment.label));
    out.push_str(&format!("Feature layout: {}\n", layout_label(assessment.layout)));
    out
}

pub(crate) fn render_model_summary(summary: &ModelSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Input width: {}\n", summary.input_width));
    out.push_str(&format!("Feature layout: {}\n", layout_label(summary.layout)));
    let classes: Vec<String> = summary.classes.iter().map(ToString::to_string).collect();
    out.push_str(&format!("Classes: {}\n", classes.join(", ")));
    match &summary.feature_names {
        Some(names) => {
            out.push_str("Expected columns:\n");
            for (index, name) in names.iter().enumerate() {
                out.push_str(&format!("  {:>3}. {}\n", index + 1, name));
            }
        }
        None => out.push_str("Expected columns: not recorded\n"),
    }
    out
}
