use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use iiif::builder::Presentation3Builder;
use iiif::image_service::{CachedImageInfo, DerivedImageInfo};
use iiif::publish::publish_iiif;
use protest_core::config::PipelineConfig;
use protest_core::db;
use protest_core::loader::Dataset;
use protest_core::thesaurus::{ThesaurusFiles, publish_thesaurus};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "aim750")]
#[command(about = "Amsterdam in Motion 750 protest IIIF publisher", long_about = None)]
struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(short = 'v', long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one IIIF manifest per protest plus the collection
    Manifests(ManifestsArgs),
    /// Compact and enrich the protest thesaurus
    Thesaurus(ThesaurusArgs),
    /// Load protest, photo and concept rows into a SQLite database
    Import(ImportArgs),
    /// Export JSON Schemas of the input row formats
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
}

#[derive(Args)]
struct ManifestsArgs {
    /// Directory with protests, photos and concepts row files
    #[arg(long, default_value = "data", conflicts_with = "db")]
    data: PathBuf,

    /// Read rows from a database created by `import` instead
    #[arg(long)]
    db: Option<PathBuf>,

    /// Output directory (default: ./iiif)
    #[arg(long, default_value = "iiif")]
    out_dir: PathBuf,

    /// Pipeline configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON object mapping info.json URLs to downloaded info.json documents
    #[arg(long)]
    image_info: Option<PathBuf>,
}

#[derive(Args)]
struct ThesaurusArgs {
    #[arg(long, default_value = "data/pp_scheme_protestthesaurus.jsonld")]
    thesaurus: PathBuf,

    #[arg(long, default_value = "data/TD_thesaurus.json")]
    mapping: PathBuf,

    #[arg(long, default_value = "data/thesaurus_context.json")]
    context: PathBuf,

    #[arg(long, default_value = "thesaurus/thesaurus.json")]
    output: PathBuf,

    /// Pipeline configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct ImportArgs {
    /// Directory with protests, photos and concepts row files
    #[arg(long, default_value = "data")]
    data: PathBuf,

    #[arg(long, default_value = "data/protests.sqlite")]
    db: PathBuf,
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Export JSON Schema files for the row types
    Export {
        /// Output directory (default: ./schemas)
        #[arg(long, default_value = "schemas")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(&cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Manifests(args) => manifests(args),
        Commands::Thesaurus(args) => thesaurus(args),
        Commands::Import(args) => import(args),
        Commands::Schema { command } => match command {
            SchemaCommands::Export { out_dir } => schema_export(out_dir),
        },
    }
}

fn default_filter(level: &str) -> String {
    format!("aim750={level},iiif={level},protest_core={level}")
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            let config = PipelineConfig::load(path)?;
            info!("Configuration loaded from: {}", path.display());
            Ok(config)
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn manifests(args: ManifestsArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let dataset = match &args.db {
        Some(db_path) => {
            let conn = db::open(&path_str(db_path)?)?;
            db::load_dataset(&conn)?
        }
        None => Dataset::from_dir(&args.data)?,
    };
    info!(
        protests = dataset.protests.len(),
        photos = dataset.photos.len(),
        concepts = dataset.concepts.len(),
        "dataset loaded"
    );

    let summary = match &args.image_info {
        Some(cache) => {
            let images = CachedImageInfo::load(cache)?;
            info!(descriptors = images.len(), "image info cache loaded");
            let builder = Presentation3Builder::new(&config.language, images);
            publish_iiif(&dataset, &config, &builder, &args.out_dir)?
        }
        None => {
            let builder = Presentation3Builder::new(&config.language, DerivedImageInfo);
            publish_iiif(&dataset, &config, &builder, &args.out_dir)?
        }
    };

    println!(
        "Wrote {} manifests ({} canvases) and {} to {}",
        summary.manifests,
        summary.canvases,
        config.collection.file_name,
        args.out_dir.display()
    );
    Ok(())
}

fn thesaurus(args: ThesaurusArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let files = ThesaurusFiles {
        thesaurus: &args.thesaurus,
        mapping: &args.mapping,
        context: &args.context,
        output: &args.output,
    };
    let annotated = publish_thesaurus(&files, &config.thesaurus.annotation_key)?;
    println!(
        "Wrote {} ({} concepts annotated)",
        args.output.display(),
        annotated
    );
    Ok(())
}

fn import(args: ImportArgs) -> Result<()> {
    let dataset = Dataset::from_dir(&args.data)?;
    if let Some(parent) = args.db.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut conn = db::open(&path_str(&args.db)?)?;
    db::replace_dataset(&mut conn, &dataset)?;
    println!(
        "Imported {} protests, {} photos and {} concepts into {}",
        dataset.protests.len(),
        dataset.photos.len(),
        dataset.concepts.len(),
        args.db.display()
    );
    Ok(())
}

fn path_str(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_string)
        .with_context(|| format!("database path is not valid UTF-8: {}", path.display()))
}

fn schema_export(out_dir: PathBuf) -> Result<()> {
    fs::create_dir_all(&out_dir)?;

    let protest_schema = schema_for!(protest_core::schema::ProtestRecord);
    let protest_json = serde_json::to_string_pretty(&protest_schema)?;
    fs::write(out_dir.join("ProtestRecord.schema.json"), protest_json)?;

    let photo_schema = schema_for!(protest_core::schema::PhotoRecord);
    let photo_json = serde_json::to_string_pretty(&photo_schema)?;
    fs::write(out_dir.join("PhotoRecord.schema.json"), photo_json)?;

    let concept_schema = schema_for!(protest_core::schema::ConceptRow);
    let concept_json = serde_json::to_string_pretty(&concept_schema)?;
    fs::write(out_dir.join("ConceptRow.schema.json"), concept_json)?;

    println!("Exported schemas to {}", out_dir.display());
    Ok(())
}
