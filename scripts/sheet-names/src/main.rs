use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser};
use log::{debug, info};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs;
use std::path::{Path, PathBuf};

use sheet_names::metadata::MetaData;
use sheet_names::{
    ConsoleOperator, CorrectionOptions, FilenameGrammar, MatchPolicy, NameComparator, Operator,
    SheetFolder,
};

#[derive(Parser, Debug)]
#[command(
    name = "sheet-names",
    version,
    about = "Check and repair the filenames of submitted exercise archives"
)]
struct Cli {
    /// Exercise sheet number
    #[arg(short, long)]
    sheet: u32,

    /// Working root containing MetaData/ and the Blatt_NN folders
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Tutor last name (default: Lastname from MetaData/tutordata.json)
    #[arg(long)]
    tutor: Option<String>,

    /// Never prompt; names that cannot be fixed automatically stay unresolved
    #[arg(long, action = ArgAction::SetTrue)]
    non_interactive: bool,

    /// Keep submissions whose sender is not on the roster
    #[arg(long, action = ArgAction::SetTrue)]
    keep_unknown: bool,

    /// Count short name parts against the same roster name part more than once
    #[arg(long, action = ArgAction::SetTrue)]
    legacy_match: bool,

    /// Run again even if corrected archives are present
    #[arg(long, action = ArgAction::SetTrue)]
    force: bool,

    /// Show decisions without copying or writing anything
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Enable debug logs (written to <sheet folder>/logs/sheet-names.log)
    #[arg(long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Explicit log file path (enables file logging). Ignored if empty.
    #[arg(long, default_value = "")]
    log_file: String,
}

fn init_logging(cli: &Cli, sheet_dir: &Path) {
    let env_logger_init = || {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init()
    };
    if !cli.debug && cli.log_file.is_empty() {
        env_logger_init();
        return;
    }

    let log_path = if cli.log_file.is_empty() {
        sheet_dir.join("logs").join("sheet-names.log")
    } else {
        PathBuf::from(&cli.log_file)
    };
    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match fs::File::create(&log_path) {
        Ok(file) => {
            let cfg = ConfigBuilder::new()
                .set_time_format_rfc3339()
                .set_target_level(LevelFilter::Off)
                .build();
            if let Err(e) = WriteLogger::init(LevelFilter::Debug, cfg, file) {
                eprintln!("[warn] file logger init failed: {e}");
            } else {
                println!("[debug] logs → {:?}", log_path);
            }
        }
        Err(e) => {
            eprintln!("[warn] cannot create log file {:?}: {e}", log_path);
            env_logger_init();
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let folder = SheetFolder::new(&cli.root, cli.sheet);
    init_logging(&cli, folder.path());
    debug!("sheet folder: {:?}", folder.path());

    let metadata = MetaData::new(&cli.root);
    let tutor = match &cli.tutor {
        Some(name) => name.clone(),
        None => metadata.tutor_data()?.lastname,
    };

    if !cli.dry_run {
        folder.create()?;
    }
    if !cli.force {
        if let Some(existing) = folder.local_submissions()? {
            println!(
                "Corrected archives present ({} submissions), use --force to redo",
                existing.len()
            );
            return Ok(());
        }
    }

    let originals = folder.original_submissions()?.ok_or_else(|| {
        anyhow!(
            "No downloaded submissions: {:?} is missing",
            folder.origin().join("lsubms.table")
        )
    })?;

    let policy = if cli.legacy_match {
        MatchPolicy::Legacy
    } else {
        MatchPolicy::Injective
    };
    let roster = metadata.roster(NameComparator::new(policy))?;
    info!(
        "roster: {} students ({:?} matching)",
        roster.len(),
        roster.comparator().policy()
    );

    let grammar = FilenameGrammar::new(&tutor, cli.sheet)?;
    info!("expected names: {}_First-Last.<zip|tar.gz|tar|rar>", grammar.prefix());
    let mut console = ConsoleOperator;
    let operator: Option<&mut dyn Operator> = if cli.non_interactive {
        None
    } else {
        Some(&mut console)
    };
    let options = CorrectionOptions {
        keep_unknown: cli.keep_unknown,
        dry_run: cli.dry_run,
    };

    let result = folder.correct_origin(originals, &grammar, &roster, operator, options)?;
    let s = result.summary;
    println!("Original correct: {}", s.original_correct);
    println!("Automatically fixed: {}", s.auto_fixed);
    println!("Manually fixed: {}", s.manually_fixed);
    println!("Unresolved: {}", s.unresolved);
    if s.dropped_unknown > 0 {
        println!("Not on roster: {}", s.dropped_unknown);
    }
    if !cli.dry_run {
        println!("Report: {:?}", folder.report_path());
    }
    Ok(())
}

fn main() -> Result<()> {
    run(Cli::parse())
}
