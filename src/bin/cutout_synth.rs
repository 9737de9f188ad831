use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cutout_synth::{
    AssetPool, CorpusBuilder, CorpusConfig, CorpusLayout, SamplingMode, SeededRandom,
    SplitStrategy, prep,
};

#[derive(Parser, Debug)]
#[command(name = "cutout-synth", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite sprites onto backgrounds and write a labeled train/val corpus.
    Generate(GenerateArgs),
    /// Move a random share of an existing corpus from train/ to val/.
    Split(SplitArgs),
    /// Make near-white pixels of every PNG transparent.
    StripBg(StripBgArgs),
    /// Resize every image in a directory to a square.
    Resize(ResizeArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Corpus config JSON. Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    backgrounds: Option<PathBuf>,

    #[arg(long)]
    sprites: Option<PathBuf>,

    /// Corpus root (receives images/, labels/ and the used-asset manifest).
    #[arg(long)]
    dest: Option<PathBuf>,

    /// Variants written per background.
    #[arg(long)]
    variants: Option<u32>,

    /// Sprites requested per variant.
    #[arg(long)]
    sprites_per_variant: Option<usize>,

    /// Cap on a pasted sprite's width/height as a fraction of the canvas.
    #[arg(long)]
    max_dimension_ratio: Option<f64>,

    /// Share of outputs moved to val.
    #[arg(long)]
    val_ratio: Option<f64>,

    /// Fail instead of placing fewer sprites when the pool runs dry.
    #[arg(long)]
    strict: bool,

    #[arg(long, value_enum)]
    split_strategy: Option<SplitChoice>,

    #[arg(long)]
    seed: Option<u64>,

    /// Write the run report as JSON to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SplitArgs {
    /// Corpus root.
    #[arg(long)]
    dest: PathBuf,

    #[arg(long, default_value_t = 0.25)]
    ratio: f64,

    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct StripBgArgs {
    #[arg(long = "in")]
    in_dir: PathBuf,

    #[arg(long)]
    out: PathBuf,

    /// Channel value at or above which a pixel counts as background.
    #[arg(long, default_value_t = prep::DEFAULT_KEY_THRESHOLD)]
    threshold: u8,
}

#[derive(Parser, Debug)]
struct ResizeArgs {
    #[arg(long = "in")]
    in_dir: PathBuf,

    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = prep::DEFAULT_SQUARE_SIDE)]
    side: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SplitChoice {
    Outputs,
    Backgrounds,
}

impl From<SplitChoice> for SplitStrategy {
    fn from(choice: SplitChoice) -> Self {
        match choice {
            SplitChoice::Outputs => SplitStrategy::Outputs,
            SplitChoice::Backgrounds => SplitStrategy::Backgrounds,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cutout_synth=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Split(args) => cmd_split(args),
        Command::StripBg(args) => cmd_strip_bg(args),
        Command::Resize(args) => cmd_resize(args),
    }
}

fn seeded(seed: Option<u64>) -> SeededRandom {
    let rng = match seed {
        Some(seed) => SeededRandom::new(seed),
        None => SeededRandom::from_entropy(),
    };
    tracing::info!(seed = rng.seed(), "random seed");
    rng
}

fn build_config(args: &GenerateArgs) -> anyhow::Result<CorpusConfig> {
    let mut cfg = match &args.config {
        Some(path) => CorpusConfig::from_file(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => CorpusConfig::default(),
    };
    if let Some(dir) = &args.backgrounds {
        cfg.background_dir = dir.clone();
    }
    if let Some(dir) = &args.sprites {
        cfg.sprite_dir = dir.clone();
    }
    if let Some(dir) = &args.dest {
        cfg.destination_dir = dir.clone();
    }
    if let Some(n) = args.variants {
        cfg.variants_per_background = n;
    }
    if let Some(k) = args.sprites_per_variant {
        cfg.sprites_per_variant = k;
    }
    if let Some(r) = args.max_dimension_ratio {
        cfg.max_dimension_ratio = r;
    }
    if let Some(r) = args.val_ratio {
        cfg.val_split_ratio = r;
    }
    if args.strict {
        cfg.sampling = SamplingMode::Strict;
    }
    if let Some(choice) = args.split_strategy {
        cfg.split_strategy = choice.into();
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    Ok(cfg)
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args)?;
    let builder = CorpusBuilder::new(cfg)?;
    let mut rng = builder.rng();
    tracing::info!(seed = rng.seed(), "random seed");
    let pool = AssetPool::load(builder.config().manifest_path())?;

    let mut run = builder.run(pool, &mut rng)?;
    run.report.seed = Some(rng.seed());

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&run.report)?;
        std::fs::write(path, json).with_context(|| format!("write report '{}'", path.display()))?;
    }
    eprintln!(
        "wrote {} images ({} train, {} val) to {}",
        run.report.images_written,
        run.report.train_count,
        run.report.val_count,
        builder.config().destination_dir.display()
    );
    Ok(())
}

fn cmd_split(args: SplitArgs) -> anyhow::Result<()> {
    let layout = CorpusLayout::new(&args.dest);
    let mut rng = seeded(args.seed);
    let summary = cutout_synth::split_existing(&layout, args.ratio, &mut rng)?;
    eprintln!("train {} / val {}", summary.train, summary.val);
    Ok(())
}

fn cmd_strip_bg(args: StripBgArgs) -> anyhow::Result<()> {
    let summary = prep::strip_light_background(&args.in_dir, &args.out, args.threshold)?;
    eprintln!(
        "keyed {} images into {} ({} skipped)",
        summary.processed,
        args.out.display(),
        summary.skipped
    );
    Ok(())
}

fn cmd_resize(args: ResizeArgs) -> anyhow::Result<()> {
    let summary = prep::resize_to_square(&args.in_dir, &args.out, args.side)?;
    eprintln!(
        "resized {} images into {} ({} skipped)",
        summary.processed,
        args.out.display(),
        summary.skipped
    );
    Ok(())
}
