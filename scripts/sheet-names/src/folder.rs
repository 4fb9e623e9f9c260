//! Per-sheet folder layout and the name correction pass.
//!
//! ```text
//! <root>/Blatt_NN/0_Origin/        downloaded files + lsubms.table
//! <root>/Blatt_NN/1_Modificated/   canonically named copies + localsubms.table
//! <root>/Blatt_NN/1_Working/
//! <root>/Blatt_NN/2_Finished/
//! ```

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::autocorrect::{Autocorrector, Correction};
use crate::filter::StudentFilter;
use crate::grammar::{basename, FilenameGrammar};
use crate::resolver::{self, Operator};
use crate::roster::Roster;
use crate::student::LocalSubmission;
use crate::table;

const ORIGIN_DIR: &str = "0_Origin";
const MODIFIED_DIR: &str = "1_Modificated";
const WORKING_DIR: &str = "1_Working";
const FINISHED_DIR: &str = "2_Finished";
const ORIGIN_TABLE: &str = "lsubms.table";
const LOCAL_TABLE: &str = "localsubms.table";
const REPORT_FILE: &str = "report.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    AutoFixed,
    ManuallyFixed,
    Unresolved,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Correct => "correct",
            Outcome::AutoFixed => "auto",
            Outcome::ManuallyFixed => "manual",
            Outcome::Unresolved => "unresolved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub student: String,
    pub original: String,
    pub result: String,
    pub outcome: Outcome,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionSummary {
    pub original_correct: usize,
    pub auto_fixed: usize,
    pub manually_fixed: usize,
    pub unresolved: usize,
    pub dropped_unknown: usize,
}

impl CorrectionSummary {
    fn count(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Correct => self.original_correct += 1,
            Outcome::AutoFixed => self.auto_fixed += 1,
            Outcome::ManuallyFixed => self.manually_fixed += 1,
            Outcome::Unresolved => self.unresolved += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CorrectionOptions {
    /// Keep submissions whose sender is not on the roster.
    pub keep_unknown: bool,
    /// Log decisions only: no copies, no tables, no prompts.
    pub dry_run: bool,
}

#[derive(Debug, Default)]
pub struct CorrectionResult {
    pub summary: CorrectionSummary,
    /// Submissions now stored in the modified folder, in processing order.
    pub placed: Vec<LocalSubmission>,
    pub report: Vec<ReportRow>,
}

#[derive(Debug, Clone)]
pub struct SheetFolder {
    path: PathBuf,
    sheet_nr: u32,
}

impl SheetFolder {
    pub fn new(root: &Path, sheet_nr: u32) -> Self {
        SheetFolder {
            path: root.join(format!("Blatt_{:02}", sheet_nr)),
            sheet_nr,
        }
    }

    pub fn create(&self) -> Result<()> {
        for dir in [
            self.path.clone(),
            self.origin(),
            self.modified(),
            self.working(),
            self.finished(),
        ] {
            fs::create_dir_all(&dir).with_context(|| format!("Creating folder {:?}", dir))?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> PathBuf {
        self.path.join(ORIGIN_DIR)
    }

    pub fn modified(&self) -> PathBuf {
        self.path.join(MODIFIED_DIR)
    }

    pub fn working(&self) -> PathBuf {
        self.path.join(WORKING_DIR)
    }

    pub fn finished(&self) -> PathBuf {
        self.path.join(FINISHED_DIR)
    }

    pub fn report_path(&self) -> PathBuf {
        self.modified().join(REPORT_FILE)
    }

    /// Submissions as downloaded, `None` before the download ran.
    pub fn original_submissions(&self) -> Result<Option<Vec<LocalSubmission>>> {
        read_optional(&self.origin().join(ORIGIN_TABLE))
    }

    pub fn save_original_submissions(&self, submissions: &[LocalSubmission]) -> Result<()> {
        table::write_file(&self.origin().join(ORIGIN_TABLE), submissions)
    }

    /// Result of an earlier correction pass, `None` if there was none.
    pub fn local_submissions(&self) -> Result<Option<Vec<LocalSubmission>>> {
        read_optional(&self.modified().join(LOCAL_TABLE))
    }

    /// Copies every submission into the modified folder under a canonical
    /// name. Items the autocorrector cannot fix, or whose name is already
    /// taken in this pass, go to `operator`; without one they stay
    /// unresolved. A failing item never stops the batch.
    pub fn correct_origin(
        &self,
        submissions: Vec<LocalSubmission>,
        grammar: &FilenameGrammar,
        roster: &Roster,
        mut operator: Option<&mut dyn Operator>,
        options: CorrectionOptions,
    ) -> Result<CorrectionResult> {
        let mut result = CorrectionResult::default();
        info!(
            "correcting sheet {:02} ({} submissions){}",
            self.sheet_nr,
            submissions.len(),
            if options.dry_run { " [dry-run]" } else { "" }
        );

        let submissions = if options.keep_unknown {
            submissions
        } else {
            let total = submissions.len();
            let known = StudentFilter::new(roster).filter_local(submissions);
            result.summary.dropped_unknown = total - known.len();
            if result.summary.dropped_unknown > 0 {
                warn!(
                    "dropped {} submissions from senders not on the roster",
                    result.summary.dropped_unknown
                );
            }
            known
        };

        let (right, wrong) = grammar.filter_paths(submissions);
        info!("Correct syntax {}, wrong syntax {}", right.len(), wrong.len());

        let pb = ProgressBar::new((right.len() + wrong.len()) as u64);
        pb.set_style(ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
        )?);

        let modified = self.modified();
        let mut claimed: HashSet<String> = HashSet::new();
        for lsubm in right {
            let original = lsubm.file_name();
            let row = match self.place(&lsubm, &original, options.dry_run) {
                Ok(placed) => {
                    claimed.insert(original.clone());
                    result.placed.push(placed);
                    self.row(&lsubm, &original, Outcome::Correct, "")
                }
                Err(err) => {
                    warn!("copy failed for {}: {:#}", original, err);
                    self.row(&lsubm, "", Outcome::Unresolved, &format!("{err:#}"))
                }
            };
            result.summary.count(row.outcome);
            result.report.push(row);
            pb.inc(1);
        }

        let autocorrector = Autocorrector::new(grammar);
        for lsubm in wrong {
            let original = lsubm.file_name();
            pb.set_message(original.clone());
            info!("Try autocorrect on {} ({})", original, lsubm.submission().name);

            let correction = autocorrector.correct(lsubm.path(), roster);
            let failure = match &correction {
                Correction::Failed { error, .. } => Some(error.to_string()),
                done if claimed.contains(done.name()) => Some(format!(
                    "'{}' is already used by another submission",
                    done.name()
                )),
                _ => None,
            };
            let attempt = match failure {
                None => {
                    debug!("autocorrect -> {}", correction.name());
                    self.place(&lsubm, correction.name(), options.dry_run)
                        .map(|placed| (placed, Outcome::AutoFixed, String::new()))
                }
                Some(reason) => {
                    info!("Failure - need human advice: {}", reason);
                    match operator.as_deref_mut() {
                        Some(op) if !options.dry_run => pb
                            .suspend(|| resolver::resolve(op, grammar, &lsubm, &modified, &claimed))
                            .map(|placed| (placed, Outcome::ManuallyFixed, reason)),
                        _ => Err(anyhow::anyhow!(reason)),
                    }
                }
            };

            let row = match attempt {
                Ok((placed, outcome, reason)) => {
                    let row = self.row(&lsubm, &placed.file_name(), outcome, &reason);
                    claimed.insert(placed.file_name());
                    result.placed.push(placed);
                    row
                }
                Err(err) => {
                    warn!("unresolved {}: {:#}", original, err);
                    self.row(&lsubm, "", Outcome::Unresolved, &format!("{err:#}"))
                }
            };
            result.summary.count(row.outcome);
            result.report.push(row);
            pb.inc(1);
        }
        pb.finish_and_clear();

        let s = &result.summary;
        info!("Original correct: {}", s.original_correct);
        info!("Automatically fixed: {}", s.auto_fixed);
        info!("Manually fixed: {}", s.manually_fixed);
        info!("Unresolved: {}", s.unresolved);

        if !options.dry_run {
            table::write_file(&modified.join(LOCAL_TABLE), &result.placed)?;
            write_report(&self.report_path(), &result.report)?;
        }
        Ok(result)
    }

    // Copies the file into the modified folder under `name`.
    fn place(&self, lsubm: &LocalSubmission, name: &str, dry_run: bool) -> Result<LocalSubmission> {
        let target = self.modified().join(basename(Path::new(name)));
        if !dry_run {
            fs::create_dir_all(self.modified())?;
            fs::copy(lsubm.path(), &target)
                .with_context(|| format!("Copy {:?} -> {:?}", lsubm.path(), &target))?;
        }
        Ok(lsubm.moved_to(target))
    }

    fn row(&self, lsubm: &LocalSubmission, result: &str, outcome: Outcome, reason: &str) -> ReportRow {
        ReportRow {
            student: lsubm.submission().name.clone(),
            original: lsubm.file_name(),
            result: result.to_string(),
            outcome,
            reason: reason.to_string(),
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<Vec<LocalSubmission>>> {
    if path.exists() {
        table::read_file(path).map(Some)
    } else {
        Ok(None)
    }
}

fn write_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(path)
        .with_context(|| format!("Open report {:?}", path))?;
    writer.write_record(["name", "original", "result", "outcome", "reason", "checked_at"])?;
    let checked_at = chrono::Utc::now().to_rfc3339();
    for row in rows {
        writer.write_record([
            row.student.as_str(),
            row.original.as_str(),
            row.result.as_str(),
            row.outcome.as_str(),
            row.reason.as_str(),
            checked_at.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
