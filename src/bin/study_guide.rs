//! Command line front end for generating study guides without the HTTP server.
//!
//! `generate` turns a single PDF or text file into a guide; `batch` walks a directory and writes
//! one rendered guide per PDF it finds.
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use studyguide::{
    config::Config,
    extract::extract_pdf_text,
    logging,
    processing::{GuideRequest, QuestionType, StudyGuide, StudyGuideService},
    render::render_text,
};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(
    name = "study-guide",
    about = "Generate study guides (summary plus practice questions) from PDF or text files"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a guide for one document.
    Generate {
        /// PDF or plain-text document.
        #[arg(long)]
        input: PathBuf,
        /// Question types to generate (defaults to all six).
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        /// Write the guide here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Fixed RNG seed for reproducible questions.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate a guide for every PDF under a directory.
    Batch {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        output_dir: PathBuf,
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_cli_tracing();
    let cli = Cli::parse();
    let mut config = Config::from_env().context("failed to load configuration")?;

    match cli.command {
        Command::Generate {
            input,
            types,
            output,
            format,
            seed,
        } => {
            config.generation_seed = seed.or(config.generation_seed);
            let service = StudyGuideService::new(&config);
            let guide = generate_one(&service, &input, &types).await?;
            let rendered = match format {
                OutputFormat::Text => render_text(&guide),
                OutputFormat::Json => serde_json::to_string_pretty(&guide)
                    .context("failed to serialize study guide")?,
            };
            match output {
                Some(path) => write_string(&path, &rendered)?,
                None => std::io::stdout()
                    .write_all(rendered.as_bytes())
                    .context("failed to write study guide to stdout")?,
            }
        }
        Command::Batch {
            dir,
            output_dir,
            types,
            seed,
        } => {
            config.generation_seed = seed.or(config.generation_seed);
            let service = StudyGuideService::new(&config);
            process_batch(&service, &dir, &output_dir, &types).await?;
        }
    }
    Ok(())
}

async fn generate_one(
    service: &StudyGuideService,
    input: &Path,
    types: &[String],
) -> Result<StudyGuide> {
    let text = read_document(input).await?;
    let filename = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".into());
    let selected_types = if types.is_empty() {
        QuestionType::ALL
            .iter()
            .map(|kind| kind.as_str().to_string())
            .collect()
    } else {
        types.to_vec()
    };

    service
        .generate(GuideRequest {
            filename,
            text,
            selected_types,
        })
        .await
        .with_context(|| format!("failed to generate study guide for {}", input.display()))
}

async fn read_document(path: &Path) -> Result<String> {
    if is_pdf(path) {
        let bytes =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        extract_pdf_text(bytes)
            .await
            .with_context(|| format!("failed to extract text from {}", path.display()))
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

async fn process_batch(
    service: &StudyGuideService,
    dir: &Path,
    output_dir: &Path,
    types: &[String],
) -> Result<()> {
    let mut generated = 0usize;
    let mut failed = 0usize;
    for entry in WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && is_pdf(e.path()))
    {
        let path = entry.path();
        match generate_one(service, path, types).await {
            Ok(guide) => {
                let stem = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| format!("guide-{}", guide.id));
                let target = output_dir.join(format!("{stem}.txt"));
                write_string(&target, &render_text(&guide))?;
                tracing::info!(input = %path.display(), output = %target.display(), "Wrote study guide");
                generated += 1;
            }
            Err(err) => {
                eprintln!("skipping {}: {err:#}", path.display());
                failed += 1;
            }
        }
    }

    eprintln!("Generated {generated} study guides ({failed} failed)");
    if generated == 0 && failed > 0 {
        bail!("no study guides could be generated from {}", dir.display());
    }
    Ok(())
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create parent directories for {}",
                parent.display()
            )
        })?;
    }
    let mut file = fs::File::create(path)
        .with_context(|| format!("failed to create file at {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write data to {}", path.display()))?;
    Ok(())
}
