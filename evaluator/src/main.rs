use anyhow::Result;
use clap::{Parser, ValueEnum};
use engine::{Engine, Strategy};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NormalizerArg {
    Lemma,
    Stem,
}

impl From<NormalizerArg> for Strategy {
    fn from(arg: NormalizerArg) -> Self {
        match arg {
            NormalizerArg::Lemma => Strategy::Lemma,
            NormalizerArg::Stem => Strategy::Stem,
        }
    }
}

#[derive(Parser)]
#[command(name = "evaluator")]
#[command(about = "Answer trivia questions against a text corpus and score the predictions", long_about = None)]
struct Cli {
    /// Directory of corpus text files
    #[arg(long)]
    corpus: PathBuf,
    /// Question file: repeating category, clue, answer lines
    #[arg(long)]
    questions: PathBuf,
    /// Token normalization strategy, shared by documents and queries
    #[arg(long, value_enum, default_value = "lemma")]
    normalizer: NormalizerArg,
    /// Write the per-question records as a JSON report
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let mut engine = Engine::new(cli.corpus, cli.normalizer.into());
    let summary = engine.evaluate(&cli.questions)?;

    for record in &summary.records {
        println!(
            "predicted: {}",
            record.predicted.as_deref().unwrap_or("<no answer>")
        );
        println!("actual:    {}", record.answer);
        println!();
    }
    println!("{}/{}", summary.correct, summary.total);
    tracing::info!(accuracy = summary.accuracy(), "evaluation complete");

    if let Some(path) = cli.report {
        fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
        tracing::info!(report = %path.display(), "wrote evaluation report");
    }
    Ok(())
}
