use clap::Parser;
use skillaudit_report::ReportKind;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "skillaudit")]
#[command(about = "Audit a corpus of agent skill documents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Run every analysis
    #[arg(long)]
    pub all: bool,

    /// Execution-context suitability report
    #[arg(long)]
    pub suitability: bool,

    /// Duplicity matrix report
    #[arg(long)]
    pub duplicity: bool,

    /// Token optimization report
    #[arg(long)]
    pub tokens: bool,

    /// Directory containing the skill documents
    #[arg(long, value_name = "DIR")]
    pub skills_dir: Option<PathBuf>,

    /// Directory receiving the reports (created if absent)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory holding the report templates
    #[arg(long, value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Threads for duplicity scoring
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Configuration file used instead of ./skillaudit.toml
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Reports selected by the flags, in generation order
    pub fn requested(&self) -> Vec<ReportKind> {
        ReportKind::ALL
            .into_iter()
            .filter(|kind| {
                self.all
                    || match kind {
                        ReportKind::Suitability => self.suitability,
                        ReportKind::Duplicity => self.duplicity,
                        ReportKind::Tokens => self.tokens,
                    }
            })
            .collect()
    }
}
