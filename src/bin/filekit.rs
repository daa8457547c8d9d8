use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "filekit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store files in a kit and print the upload envelope.
    Upload(UploadArgs),
    /// Print the field -> URL map of a stored file, generating missing derivatives.
    Info(InfoArgs),
    /// Regenerate the derivatives of a stored file.
    Process(ProcessArgs),
}

#[derive(Args, Debug)]
struct KitArgs {
    /// Kit manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    /// Kit name.
    #[arg(long)]
    kit: String,

    /// Override `uploads.default_dest` from the manifest.
    #[arg(long)]
    dest: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct UploadArgs {
    #[command(flatten)]
    kit: KitArgs,

    /// Files to store.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    #[command(flatten)]
    kit: KitArgs,

    /// Stored file name.
    name: String,
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    #[command(flatten)]
    kit: KitArgs,

    /// Only generate `pre_cache` fields.
    #[arg(long, default_value_t = false)]
    lazy: bool,

    /// Stored file name.
    name: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Upload(args) => cmd_upload(args),
        Command::Info(args) => cmd_info(args),
        Command::Process(args) => cmd_process(args),
    }
}

fn load_registry(args: &KitArgs) -> anyhow::Result<filekit::KitRegistry> {
    let mut manifest = filekit::KitManifest::from_path(&args.manifest)?;
    if let Some(dest) = &args.dest {
        manifest.uploads.default_dest = Some(dest.clone());
    }
    let registry = filekit::KitRegistry::from_manifest(&manifest)
        .with_context(|| format!("load kits from '{}'", args.manifest.display()))?;
    Ok(registry)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output JSON")?;
    println!("{json}");
    Ok(())
}

fn cmd_upload(args: UploadArgs) -> anyhow::Result<()> {
    let registry = load_registry(&args.kit)?;

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("'{}' has no usable file name", path.display()))?;
        let f = File::open(path).with_context(|| format!("open '{}'", path.display()))?;
        files.push((name, BufReader::new(f)));
    }

    let response = filekit::upload(&registry, &args.kit.kit, files)?;
    print_json(&response)
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let registry = load_registry(&args.kit)?;
    let info = filekit::file_info(&registry, &args.kit.kit, &args.name)?;
    print_json(&info)
}

fn cmd_process(args: ProcessArgs) -> anyhow::Result<()> {
    let registry = load_registry(&args.kit)?;
    let instance = registry.kit(&args.kit.kit)?.open(&args.name)?;
    instance.process(!args.lazy)?;

    eprintln!(
        "processed {} ({} fields)",
        instance.filename(),
        instance.fields().count()
    );
    Ok(())
}
