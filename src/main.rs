//! scormkit - SCORM package exporter

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use scormkit::clock::SystemClock;
use scormkit::config::{ScormConfig, load_config};
use scormkit::export::{Locale, ScormExporter};
use scormkit::logging::init_logging;
use scormkit::model::{ExportOptions, FormationRecord, MasteryScore, ScormVersion};
use scormkit::service::{ExportService, JsonFormationSource, LocalStorage};
use scormkit::{ManifestSummary, inspect_package, normalize_formation, parse_manifest};

#[derive(Parser)]
#[command(name = "scormkit")]
#[command(version, about = "SCORM 1.2 / 2004 package exporter", long_about = None)]
#[command(after_help = "EXAMPLES:
    scormkit build formation.json -o out/              Build a SCORM 1.2 package
    scormkit build formation.json --scorm 2004         Build a SCORM 2004 package
    scormkit export --data-dir data --org o1 --formation f1
    scormkit inspect package.zip                       Show package structure")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Suppress output messages
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a package from a formation JSON file
    Build {
        /// Formation record (JSON)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        export: ExportArgs,

        /// Page language
        #[arg(long, value_enum)]
        locale: Option<LocaleArg>,
    },
    /// Export through the service: JSON directory source, local storage
    Export {
        /// Directory of `<formation id>.json` files
        #[arg(long, value_name = "DIR")]
        data_dir: PathBuf,

        /// Organization owning the formation
        #[arg(long, value_name = "ID")]
        org: String,

        /// Formation to export
        #[arg(long, value_name = "ID")]
        formation: String,

        #[command(flatten)]
        export: ExportArgs,
    },
    /// Summarize a package (.zip) or a manifest (.xml)
    Inspect {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Target SCORM edition
    #[arg(short, long, value_enum, default_value = "1.2")]
    scorm: VersionArg,

    /// Percentage required to pass the quiz (0-100)
    #[arg(short, long, value_name = "PERCENT")]
    mastery: Option<u8>,

    /// Leave the quiz page out
    #[arg(long)]
    no_evaluations: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum VersionArg {
    #[value(name = "1.2")]
    V1_2,
    #[value(name = "2004")]
    V2004,
}

impl From<VersionArg> for ScormVersion {
    fn from(arg: VersionArg) -> Self {
        match arg {
            VersionArg::V1_2 => ScormVersion::V1_2,
            VersionArg::V2004 => ScormVersion::V2004,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LocaleArg {
    Fr,
    En,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::Fr => Locale::Fr,
            LocaleArg::En => Locale::En,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(load_config).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("warning: {e}");
    }

    let result = match cli.command {
        Command::Build {
            input,
            output,
            export,
            locale,
        } => build(&config, &input, &output, &export, locale, cli.quiet),
        Command::Export {
            data_dir,
            org,
            formation,
            export,
        } => export_via_service(&config, data_dir, &org, &formation, &export, cli.quiet).await,
        Command::Inspect { input } => inspect(&input),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build(
    config: &ScormConfig,
    input: &Path,
    output: &Path,
    args: &ExportArgs,
    locale: Option<LocaleArg>,
    quiet: bool,
) -> Result<(), String> {
    let contents = std::fs::read_to_string(input)
        .map_err(|e| format!("cannot read {}: {e}", input.display()))?;
    let mut record: FormationRecord =
        serde_json::from_str(&contents).map_err(|e| format!("invalid formation JSON: {e}"))?;
    record.sort_modules_by_order();

    let formation = normalize_formation(&record).map_err(|e| e.to_string())?;
    let version = ScormVersion::from(args.scorm);
    let options = ExportOptions {
        mastery_score: args
            .mastery
            .map_or(config.export.mastery_score(), |m| MasteryScore::new(i64::from(m))),
        include_evaluations: !args.no_evaluations,
    };

    let mut exporter_config = config.export.exporter_config();
    if let Some(locale) = locale {
        exporter_config.locale = locale.into();
    }
    let package = ScormExporter::new()
        .with_config(exporter_config)
        .export(&formation, version, &options)
        .map_err(|e| e.to_string())?;

    std::fs::create_dir_all(output)
        .map_err(|e| format!("cannot create {}: {e}", output.display()))?;
    let path = output.join(&package.file_name);
    std::fs::write(&path, &package.bytes)
        .map_err(|e| format!("cannot write {}: {e}", path.display()))?;

    if !quiet {
        println!(
            "{} ({version}, {} modules, {} bytes)",
            path.display(),
            formation.module_count(),
            package.len()
        );
    }
    Ok(())
}

async fn export_via_service(
    config: &ScormConfig,
    data_dir: PathBuf,
    org: &str,
    formation_id: &str,
    args: &ExportArgs,
    quiet: bool,
) -> Result<(), String> {
    let service = ExportService::from_config(
        JsonFormationSource::new(data_dir),
        LocalStorage::new(&config.storage.root),
        SystemClock,
        config,
    );

    let mut body = serde_json::json!({
        "formationId": formation_id,
        "version": ScormVersion::from(args.scorm).as_str(),
        "options": { "includeEvaluations": !args.no_evaluations },
    });
    if let Some(mastery) = args.mastery {
        body["options"]["masteryScore"] = mastery.into();
    }

    let response = service.handle(org, &body.to_string()).await;
    if !quiet || !response.is_success() {
        let pretty = serde_json::to_string_pretty(&response.body).map_err(|e| e.to_string())?;
        println!("{pretty}");
    }
    if response.is_success() {
        Ok(())
    } else {
        Err(format!("export failed with status {}", response.status))
    }
}

fn inspect(input: &Path) -> Result<(), String> {
    let bytes =
        std::fs::read(input).map_err(|e| format!("cannot read {}: {e}", input.display()))?;

    if bytes.starts_with(b"PK") {
        let summary = inspect_package(&bytes).map_err(|e| e.to_string())?;
        println!("File: {}", input.display());
        print_manifest(&summary.manifest);
        println!("Entries: {}", summary.entries.len());
        if summary.is_complete() {
            println!("Missing files: none");
        } else {
            println!("Missing files: {}", summary.missing_files.join(", "));
        }
        summary.manifest.check().map_err(|e| e.to_string())?;
        if !summary.is_complete() {
            return Err("package is incomplete".into());
        }
    } else {
        let content = String::from_utf8(bytes).map_err(|e| e.to_string())?;
        let manifest = parse_manifest(&content).map_err(|e| e.to_string())?;
        println!("File: {}", input.display());
        print_manifest(&manifest);
        manifest.check().map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn print_manifest(manifest: &ManifestSummary) {
    println!("Identifier: {}", manifest.identifier);
    match manifest.version {
        Some(version) => println!("Version: {version}"),
        None => println!("Version: unknown"),
    }
    if let Some(ref title) = manifest.title {
        println!("Title: {title}");
    }
    if let Some(score) = manifest.mastery_score {
        println!("Mastery score: {score}");
    }
    println!("Items: {}", manifest.items.len());
    for item in &manifest.items {
        let indent = "  ".repeat(item.depth + 1);
        let target = item.identifierref.as_deref().unwrap_or("-");
        println!("{indent}{} -> {target}  {}", item.identifier, item.title);
    }
    println!("Resources: {}", manifest.resources.len());
    for resource in &manifest.resources {
        println!(
            "  {} {} ({} files)",
            resource.identifier,
            resource.href.as_deref().unwrap_or("-"),
            resource.files.len()
        );
    }
}
