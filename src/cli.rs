use clap::{Args, Parser, Subcommand};
use nearsim::algo::normalize;
use nearsim::ops::RequestDocument;
use nearsim::{Document, Options, Pipeline, Result, ShingleType};
use serde_json::Value;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "nearsim",
    version,
    about = "Near-duplicate detection with shingling, MinHash and LSH banding"
)]
struct Cli {
    /// Log pipeline stages to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two text files exactly
    Check {
        /// First document
        a: PathBuf,
        /// Second document
        b: PathBuf,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Find similar pairs in a JSON array of {name, content} read from stdin
    Analyze {
        #[command(flatten)]
        options: OptionArgs,
        /// Only report pairs at or above this similarity percentage
        #[arg(long)]
        min_similarity: Option<f64>,
    },
}

#[derive(Args)]
struct OptionArgs {
    /// JSON file with base options; flags below override it
    #[arg(long = "options")]
    options_file: Option<PathBuf>,
    /// Shingle type: char, word
    #[arg(short = 't', long)]
    shingle_type: Option<String>,
    /// Shingle size k
    #[arg(short = 'k', long)]
    shingle_size: Option<usize>,
    /// Number of MinHash functions (must equal bands * rows)
    #[arg(long)]
    num_hashes: Option<usize>,
    /// Number of LSH bands
    #[arg(short = 'b', long)]
    num_bands: Option<usize>,
    /// Rows per LSH band
    #[arg(short = 'r', long)]
    num_rows: Option<usize>,
    /// Seed for the MinHash coefficient family
    #[arg(long)]
    seed: Option<u64>,
    /// Collections up to this size are scored with exact Jaccard
    #[arg(long)]
    exact_limit: Option<usize>,
    /// Lowercase and strip punctuation before shingling
    #[arg(long)]
    clean: bool,
}

impl OptionArgs {
    fn resolve(&self) -> Result<Options> {
        let mut opts = match &self.options_file {
            Some(path) => Options::from_json_file(path)?,
            None => Options::default(),
        };
        if let Some(kind) = &self.shingle_type {
            opts.shingle_type = ShingleType::from_str(kind).ok_or_else(|| {
                nearsim::Error::InvalidOptions(format!(
                    "unknown shingle type '{kind}'. Use: char, word"
                ))
            })?;
        }
        if let Some(k) = self.shingle_size {
            opts.shingle_size = k;
        }
        if let Some(n) = self.num_hashes {
            opts.num_hashes = n;
        }
        if let Some(b) = self.num_bands {
            opts.num_bands = b;
        }
        if let Some(r) = self.num_rows {
            opts.num_rows = r;
        }
        if let Some(seed) = self.seed {
            opts.seed = seed;
        }
        if let Some(limit) = self.exact_limit {
            opts.exact_limit = limit;
        }
        opts.validate()?;
        Ok(opts)
    }

    fn prepare_text(&self, text: String) -> String {
        if self.clean {
            normalize::clean_text(&text)
        } else {
            text
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check { a, b, options } => cmd_check(&a, &b, &options),
        Commands::Analyze {
            options,
            min_similarity,
        } => cmd_analyze(&options, min_similarity),
    };

    match result {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("failed to render output: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "nearsim=debug" } else { "nearsim=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn cmd_check(a: &Path, b: &Path, args: &OptionArgs) -> Result<Value> {
    let opts = args.resolve()?;
    let text_a = args.prepare_text(std::fs::read_to_string(a)?);
    let text_b = args.prepare_text(std::fs::read_to_string(b)?);

    let mut docs = Document::admit([(file_name(a), text_a), (file_name(b), text_b)]).into_iter();
    let (Some(doc_a), Some(doc_b)) = (docs.next(), docs.next()) else {
        return Err(nearsim::Error::EmptyCollection { found: 0 });
    };

    let report = Pipeline::new(opts).compare(doc_a, doc_b)?;
    Ok(serde_json::to_value(report)?)
}

fn cmd_analyze(args: &OptionArgs, min_similarity: Option<f64>) -> Result<Value> {
    let opts = args.resolve()?;
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    let parsed: Vec<RequestDocument> = serde_json::from_str(&buf)?;

    let docs = Document::admit(
        parsed
            .into_iter()
            .map(|d| (d.name, args.prepare_text(d.content))),
    );

    let mut report = Pipeline::new(opts).analyze(docs)?;
    if let Some(min) = min_similarity {
        report.retain_at_least(min);
    }
    Ok(serde_json::to_value(report)?)
}
