//! Checks and repairs the filenames of submitted exercise archives.
//!
//! Canonical names look like `MUELLER_Blatt03_Max-Mustermann.zip`. Names
//! that do not follow the scheme are rebuilt by matching their fragments
//! against the roster; what cannot be rebuilt safely is handed to an operator.

pub mod autocorrect;
pub mod compare;
pub mod filter;
pub mod folder;
pub mod grammar;
pub mod metadata;
pub mod normalize;
pub mod resolver;
pub mod roster;
pub mod student;
pub mod table;

pub use autocorrect::{Autocorrector, Correction, CorrectionError};
pub use compare::{MatchPolicy, NameComparator};
pub use filter::StudentFilter;
pub use folder::{CorrectionOptions, CorrectionSummary, SheetFolder};
pub use grammar::FilenameGrammar;
pub use resolver::{ConsoleOperator, Operator, ScriptedOperator};
pub use roster::{Roster, StudentLookup};
pub use student::{LocalSubmission, Student, StudentState, Submission};
