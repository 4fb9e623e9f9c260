use std::fmt;
use std::path::{Path, PathBuf};

use crate::table::{Row, TableError, TableRecord};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StudentState {
    #[default]
    Internal,
    Owned,
    Other(String),
}

impl StudentState {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "INTERNAL" => StudentState::Internal,
            "OWNED" => StudentState::Owned,
            other => StudentState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for StudentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentState::Internal => f.write_str("INTERNAL"),
            StudentState::Owned => f.write_str("OWNED"),
            StudentState::Other(s) => f.write_str(s),
        }
    }
}

/// A roster entry. The mail address is the authoritative identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub name: String,
    pub mail: String,
    pub subject: String,
    pub day: String,
    pub time: String,
    pub tutor: String,
    pub state: StudentState,
}

impl Student {
    pub fn new(name: &str, mail: &str) -> Self {
        Student {
            name: name.to_string(),
            mail: mail.to_string(),
            subject: String::new(),
            day: String::new(),
            time: String::new(),
            tutor: String::new(),
            state: StudentState::Internal,
        }
    }

    /// Tutorial id, e.g. `Mo_14-00`.
    pub fn tutorial_id(&self) -> String {
        format!("{}_{}", self.day, self.time.replace(':', "-"))
    }
}

impl TableRecord for Student {
    fn columns() -> Vec<&'static str> {
        vec!["Name", "Mail", "Subject", "State", "Day", "Time", "Tutor"]
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.mail.clone(),
            self.subject.clone(),
            self.state.to_string(),
            self.day.clone(),
            self.time.clone(),
            self.tutor.clone(),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, TableError> {
        Ok(Student {
            name: row.get("Name")?.to_string(),
            mail: row.get("Mail")?.to_string(),
            subject: row.get("Subject")?.to_string(),
            state: StudentState::parse(row.get("State")?),
            day: row.get("Day")?.to_string(),
            time: row.get("Time")?.to_string(),
            tutor: row.get("Tutor")?.to_string(),
        })
    }
}

/// Snapshot of one upload as reported by the course portal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Submission {
    pub name: String,
    pub mail: String,
    pub state: String,
    pub overdue: String,
    pub file_url: String,
    pub file_name: String,
}

const SUBMISSION_COLUMNS: [&str; 6] = ["Name", "Mail", "SubmState", "Overdue", "FileURL", "FileName"];

impl TableRecord for Submission {
    fn columns() -> Vec<&'static str> {
        SUBMISSION_COLUMNS.to_vec()
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.mail.clone(),
            self.state.clone(),
            self.overdue.clone(),
            self.file_url.clone(),
            self.file_name.clone(),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, TableError> {
        Ok(Submission {
            name: row.get("Name")?.to_string(),
            mail: row.get("Mail")?.to_string(),
            state: row.get("SubmState")?.to_string(),
            overdue: row.get("Overdue")?.to_string(),
            file_url: row.get("FileURL")?.to_string(),
            file_name: row.get("FileName")?.to_string(),
        })
    }
}

/// A submission together with where its file currently lives.
///
/// Moving the file produces a new value; earlier locations are kept in
/// `history`, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSubmission {
    submission: Submission,
    path: PathBuf,
    history: Vec<PathBuf>,
}

impl LocalSubmission {
    pub fn new(submission: Submission, path: impl Into<PathBuf>) -> Self {
        LocalSubmission {
            submission,
            path: path.into(),
            history: Vec::new(),
        }
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn history(&self) -> &[PathBuf] {
        &self.history
    }

    /// Basename of the current path, empty if it has none.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn moved_to(&self, path: impl Into<PathBuf>) -> Self {
        let mut history = self.history.clone();
        history.push(self.path.clone());
        LocalSubmission {
            submission: self.submission.clone(),
            path: path.into(),
            history,
        }
    }
}

impl TableRecord for LocalSubmission {
    fn columns() -> Vec<&'static str> {
        let mut columns = SUBMISSION_COLUMNS.to_vec();
        columns.push("Path");
        columns
    }

    fn to_row(&self) -> Vec<String> {
        let mut row = self.submission.to_row();
        row.push(self.path.to_string_lossy().to_string());
        row
    }

    fn from_row(row: &Row) -> Result<Self, TableError> {
        Ok(LocalSubmission::new(
            Submission::from_row(row)?,
            row.get_non_empty("Path")?,
        ))
    }
}
