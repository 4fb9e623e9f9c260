//! Run configuration stored under `<root>/MetaData/`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::compare::NameComparator;
use crate::roster::Roster;
use crate::student::Student;
use crate::table;

pub const METADATA_DIR: &str = "MetaData";
const TUTOR_DATA_FILE: &str = "tutordata.json";
const STUDENTS_FILE: &str = "students.table";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TutorData {
    pub firstname: String,
    pub lastname: String,
}

#[derive(Debug, Clone)]
pub struct MetaData {
    dir: PathBuf,
}

impl MetaData {
    pub fn new(root: &Path) -> Self {
        MetaData {
            dir: root.join(METADATA_DIR),
        }
    }

    pub fn tutor_data(&self) -> Result<TutorData> {
        let path = self.dir.join(TUTOR_DATA_FILE);
        let text =
            fs::read_to_string(&path).with_context(|| format!("Reading tutor data {:?}", path))?;
        serde_json::from_str(&text).with_context(|| format!("Parsing tutor data {:?}", path))
    }

    pub fn save_tutor_data(&self, data: &TutorData) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| format!("Creating folder {:?}", self.dir))?;
        let path = self.dir.join(TUTOR_DATA_FILE);
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&path, json).with_context(|| format!("Writing tutor data {:?}", path))
    }

    pub fn students(&self) -> Result<Vec<Student>> {
        table::read_file(&self.dir.join(STUDENTS_FILE))
    }

    pub fn save_students(&self, students: &[Student]) -> Result<()> {
        table::write_file(&self.dir.join(STUDENTS_FILE), students)
    }

    pub fn roster(&self, comparator: NameComparator) -> Result<Roster> {
        Ok(Roster::with_comparator(self.students()?, comparator))
    }
}
