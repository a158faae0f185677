use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use plotweave::config::Config;
use plotweave::corpus::loader::load_csv;
use plotweave::corpus::stats::CorpusStats;
use plotweave::lda::LdaBackend;
use plotweave::output::{export, terminal};
use plotweave::pipeline::fit::SummaryOptions;
use plotweave::pipeline::tune::TuneOptions;
use plotweave::selection::{Metric, TopicCountRange};
use plotweave::text::dtm::DocumentTermMatrix;

/// Plotweave: topic modeling for movie plots.
///
/// Loads a CSV of plot summaries, builds a document-term matrix, and fits
/// Latent Dirichlet Allocation models to find recurring themes.
#[derive(Parser)]
#[command(name = "plotweave", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the corpus comes from.
#[derive(Args)]
struct InputArgs {
    /// CSV file with one row per document
    #[arg(long, short)]
    input: PathBuf,

    /// Column holding the document name
    #[arg(long, default_value = "title")]
    id_column: String,

    /// Column holding the plot text
    #[arg(long, default_value = "plot")]
    text_column: String,

    /// Seed for every fit (overrides PLOTWEAVE_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Gibbs sweeps per fit (overrides PLOTWEAVE_ITERATIONS)
    #[arg(long)]
    iterations: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show corpus statistics after normalization
    Stats {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Fit a range of topic counts and tabulate model-selection metrics
    Tune {
        #[command(flatten)]
        input: InputArgs,

        /// Smallest candidate k (default: 2)
        #[arg(long, default_value = "2")]
        from: usize,

        /// Largest candidate k (default: 15)
        #[arg(long, default_value = "15")]
        to: usize,

        /// Step between candidates (default: 1)
        #[arg(long, default_value = "1")]
        step: usize,

        /// Number of fits to run in parallel (default: 4)
        #[arg(long, default_value = "4")]
        concurrency: usize,

        /// Metrics to compute (default: all four)
        #[arg(long, value_delimiter = ',')]
        metrics: Vec<Metric>,

        /// Skip writing selection.json
        #[arg(long)]
        no_export: bool,
    },

    /// Fit one model with a chosen k and summarize its topics
    Fit {
        #[command(flatten)]
        input: InputArgs,

        /// Number of topics
        #[arg(long, short)]
        k: usize,

        /// Terms shown per topic (overrides PLOTWEAVE_TOP_N)
        #[arg(long)]
        top_n: Option<usize>,

        /// Minimum aggregate weight for word-cloud terms
        #[arg(long, default_value = "0.0")]
        min_weight: f64,

        /// Maximum word-cloud terms
        #[arg(long, default_value = "100")]
        max_words: usize,

        /// Skip writing fit.json
        #[arg(long)]
        no_export: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("plotweave=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { input } => {
            let config = load_config(&input)?;
            let dtm = load_dtm(&config, &input)?;
            let stats = CorpusStats::from_dtm(&dtm).with_input_file(&input.input);
            terminal::display_stats(&stats, &input.input.display().to_string());
        }

        Commands::Tune {
            input,
            from,
            to,
            step,
            concurrency,
            metrics,
            no_export,
        } => {
            let config = load_config(&input)?;
            let range = TopicCountRange::new(from, to, step)?;
            let dtm = load_dtm(&config, &input)?;

            println!(
                "Sweeping k = {}..={} (step {}) over {} documents, {} terms...",
                range.from,
                range.to,
                range.step,
                dtm.n_docs(),
                dtm.n_terms()
            );

            let options = TuneOptions {
                range,
                metrics: if metrics.is_empty() {
                    Metric::ALL.to_vec()
                } else {
                    metrics
                },
                seed: config.seed,
                concurrency,
                show_progress: true,
            };
            let backend: Arc<dyn LdaBackend> = Arc::new(config.sampler());
            let table = plotweave::pipeline::tune::run(Arc::new(dtm), backend, &options).await;

            terminal::display_selection(&table);

            if !no_export {
                let path = export::write_selection(&config.output_dir, &table)?;
                println!("\n{}", format!("Metrics saved to: {}", path.display()).bold());
            }
        }

        Commands::Fit {
            input,
            k,
            top_n,
            min_weight,
            max_words,
            no_export,
        } => {
            let config = load_config(&input)?;
            let dtm = load_dtm(&config, &input)?;

            println!(
                "Fitting {k} topics over {} documents ({} sweeps)...",
                dtm.n_docs(),
                config.iterations
            );

            let options = SummaryOptions {
                top_n: top_n.unwrap_or(config.top_n),
                min_weight,
                max_words,
                ..Default::default()
            };
            let sampler = config.sampler();
            let report = plotweave::pipeline::fit::run(&dtm, &sampler, k, config.seed, &options)?;

            terminal::display_topics(&report);
            terminal::display_word_cloud(&report, 15);
            println!("\n{}", "Most representative documents:".bold());
            terminal::display_documents(&report, 3);

            if !no_export {
                let path = export::write_report(&config.output_dir, &report)?;
                println!("\n{}", format!("Report saved to: {}", path.display()).bold());
            }
        }
    }

    Ok(())
}

/// Environment configuration with per-run CLI overrides applied.
fn load_config(input: &InputArgs) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(seed) = input.seed {
        config.seed = seed;
    }
    if let Some(iterations) = input.iterations {
        config.iterations = iterations;
    }
    Ok(config)
}

/// Load the CSV and build the document-term matrix.
fn load_dtm(config: &Config, input: &InputArgs) -> Result<DocumentTermMatrix> {
    let documents = load_csv(&input.input, &input.id_column, &input.text_column)?;
    let tokenizer = config.tokenizer()?;
    let dtm = DocumentTermMatrix::build(&documents, &tokenizer)
        .with_context(|| format!("building document-term matrix from {}", input.input.display()))?;
    info!(
        documents = dtm.n_docs(),
        terms = dtm.n_terms(),
        tokens = dtm.total_tokens(),
        "Corpus ready"
    );
    Ok(dtm)
}
