//! Manual filename correction when the autocorrector gives up.
//!
//! The exchange is split into a pending decision (what the operator is shown)
//! and an answer (what the operator typed), so the same loop drives a console
//! prompt or a scripted list of answers.

use anyhow::{anyhow, bail, Context, Result};
use log::{info, warn};
use std::collections::{HashSet, VecDeque};
use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::grammar::{split_archive_extension, FilenameGrammar};
use crate::student::LocalSubmission;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("'{0}' does not follow the naming scheme")]
    GrammarMismatch(String),
    #[error("'{name}' must keep the archive type .{expected}")]
    ExtensionMismatch { name: String, expected: String },
    #[error("'{0}' must end in .zip, the file will be packed into a new zip archive")]
    ArchiveMustBeZip(String),
    #[error("'{0}' is already used by another submission")]
    NameTaken(String),
}

/// What the operator is asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDecision {
    pub submitter: String,
    pub current_name: String,
    /// False when the file has to be packed into a new archive.
    pub is_archive: bool,
    pub rejected: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Keep the archive, store it under the new name.
    Rename(String),
    /// Pack the file into a new zip with this name.
    Archive(String),
}

impl Decision {
    pub fn name(&self) -> &str {
        match self {
            Decision::Rename(name) | Decision::Archive(name) => name,
        }
    }
}

pub struct ManualCorrection<'g> {
    grammar: &'g FilenameGrammar,
    pending: PendingDecision,
    archive_ext: Option<String>,
    taken: HashSet<String>,
}

impl<'g> ManualCorrection<'g> {
    pub fn new(grammar: &'g FilenameGrammar, submission: &LocalSubmission) -> Self {
        let current_name = submission.file_name();
        let archive_ext = split_archive_extension(&current_name)
            .filter(|_| !submission.path().is_dir())
            .map(|(_, ext)| ext.to_ascii_lowercase());
        ManualCorrection {
            grammar,
            pending: PendingDecision {
                submitter: submission.submission().name.clone(),
                current_name,
                is_archive: archive_ext.is_some(),
                rejected: Vec::new(),
            },
            archive_ext,
            taken: HashSet::new(),
        }
    }

    /// Names other submissions already occupy; answers must avoid them.
    pub fn with_taken(mut self, taken: &HashSet<String>) -> Self {
        self.taken = taken.clone();
        self
    }

    pub fn pending(&self) -> &PendingDecision {
        &self.pending
    }

    /// Validates one operator answer. Rejected answers are remembered and the
    /// decision stays pending.
    pub fn answer(&mut self, input: &str) -> Result<Decision, ResolveError> {
        let name = input.trim();
        let checked = self.check(name);
        if checked.is_err() {
            self.pending.rejected.push(name.to_string());
        }
        checked
    }

    fn check(&self, name: &str) -> Result<Decision, ResolveError> {
        if name.contains(['/', '\\']) || !self.grammar.is_correct(name) {
            return Err(ResolveError::GrammarMismatch(name.to_string()));
        }
        if self.taken.contains(name) {
            return Err(ResolveError::NameTaken(name.to_string()));
        }
        let given = split_archive_extension(name)
            .map(|(_, ext)| ext.to_string())
            .unwrap_or_default();
        match &self.archive_ext {
            Some(expected) if *expected == given => Ok(Decision::Rename(name.to_string())),
            Some(expected) => Err(ResolveError::ExtensionMismatch {
                name: name.to_string(),
                expected: expected.clone(),
            }),
            None if given == "zip" => Ok(Decision::Archive(name.to_string())),
            None => Err(ResolveError::ArchiveMustBeZip(name.to_string())),
        }
    }
}

/// Someone who supplies corrected filenames.
pub trait Operator {
    fn ask(&mut self, pending: &PendingDecision) -> Result<String>;

    fn rejected(&mut self, _error: &ResolveError) {}
}

/// Prompts on stdout and reads answers from stdin. Blocks until a line arrives.
#[derive(Debug, Default)]
pub struct ConsoleOperator;

impl Operator for ConsoleOperator {
    fn ask(&mut self, pending: &PendingDecision) -> Result<String> {
        let mut stdout = io::stdout();
        if pending.rejected.is_empty() {
            writeln!(stdout, "Submitted by: {}", pending.submitter)?;
            writeln!(stdout, "Current name: {}", pending.current_name)?;
        }
        write!(stdout, "Corrected name [.zip if file is not an archive]: ")?;
        stdout.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            bail!("stdin closed while waiting for a corrected name");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn rejected(&mut self, error: &ResolveError) {
        println!("{error} - try again please");
    }
}

/// Replays prepared answers in order.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    pub asked: Vec<PendingDecision>,
    pub errors: Vec<ResolveError>,
}

impl ScriptedOperator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedOperator {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

impl Operator for ScriptedOperator {
    fn ask(&mut self, pending: &PendingDecision) -> Result<String> {
        self.asked.push(pending.clone());
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted answer left for {}", pending.current_name))
    }

    fn rejected(&mut self, error: &ResolveError) {
        self.errors.push(error.clone());
    }
}

/// Asks until an acceptable name outside `taken` is given.
pub fn decide(
    operator: &mut dyn Operator,
    grammar: &FilenameGrammar,
    submission: &LocalSubmission,
    taken: &HashSet<String>,
) -> Result<Decision> {
    let mut correction = ManualCorrection::new(grammar, submission).with_taken(taken);
    loop {
        let input = operator.ask(correction.pending())?;
        match correction.answer(&input) {
            Ok(decision) => return Ok(decision),
            Err(err) => {
                warn!("rejected '{}': {}", input.trim(), err);
                operator.rejected(&err);
            }
        }
    }
}

/// Runs the decision loop and places the result in `dest_dir`. The original
/// file is left where it is.
pub fn resolve(
    operator: &mut dyn Operator,
    grammar: &FilenameGrammar,
    submission: &LocalSubmission,
    dest_dir: &Path,
    taken: &HashSet<String>,
) -> Result<LocalSubmission> {
    let decision = decide(operator, grammar, submission, taken)?;
    fs::create_dir_all(dest_dir).with_context(|| format!("Creating folder {:?}", dest_dir))?;
    let target = dest_dir.join(decision.name());
    match &decision {
        Decision::Rename(_) => {
            fs::copy(submission.path(), &target).with_context(|| {
                format!("Copy {:?} -> {:?}", submission.path(), &target)
            })?;
        }
        Decision::Archive(_) => {
            info!("packing {:?} into {:?}", submission.path(), &target);
            pack_zip(submission.path(), &target)?;
        }
    }
    Ok(submission.moved_to(target))
}

/// Writes `source` (a file, or a directory tree) into a new zip at `target`.
/// Entries are named relative to the parent of `source`.
pub fn pack_zip(source: &Path, target: &Path) -> Result<PathBuf> {
    let out = File::create(target).with_context(|| format!("Creating archive {:?}", target))?;
    let mut zip = ZipWriter::new(out);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let base = source.parent().unwrap_or_else(|| Path::new(""));

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        let rel = entry.path().strip_prefix(base)?;
        let entry_name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if entry.file_type().is_dir() {
            zip.add_directory(entry_name, opts)?;
        } else if entry.file_type().is_file() {
            zip.start_file(entry_name, opts)?;
            let mut input = File::open(entry.path())
                .with_context(|| format!("Reading {:?}", entry.path()))?;
            io::copy(&mut input, &mut zip)?;
        }
    }
    zip.finish().context("failed to finalize zip archive")?;
    Ok(target.to_path_buf())
}
