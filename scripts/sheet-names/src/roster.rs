use std::collections::BTreeSet;

use crate::compare::NameComparator;
use crate::student::Student;

/// Name lookup against the known students of a run.
pub trait StudentLookup {
    /// All students whose name is equal to `name`, earliest roster entry first.
    fn find_by_name(&self, name: &str) -> Vec<&Student>;
}

/// The students of one run, in load order. Never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vec<Student>,
    comparator: NameComparator,
}

impl Roster {
    pub fn new(students: Vec<Student>) -> Self {
        Self::with_comparator(students, NameComparator::default())
    }

    pub fn with_comparator(students: Vec<Student>, comparator: NameComparator) -> Self {
        Roster {
            students,
            comparator,
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn comparator(&self) -> &NameComparator {
        &self.comparator
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn find_by_mail(&self, mail: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.mail == mail)
    }

    /// Distinct tutorial ids, sorted.
    pub fn tutorial_ids(&self) -> Vec<String> {
        self.students
            .iter()
            .map(Student::tutorial_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl StudentLookup for Roster {
    fn find_by_name(&self, name: &str) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|s| self.comparator.equal(name, &s.name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(vec![
            Student::new("Anna Schmidt", "a@x"),
            Student::new("Anna Schneider", "b@x"),
            Student::new("Max Mustermann", "c@x"),
        ])
    }

    #[test]
    fn find_by_name_keeps_roster_order() {
        let r = roster();
        let hits: Vec<&str> = r.find_by_name("Anna").iter().map(|s| s.mail.as_str()).collect();
        assert_eq!(hits, vec!["a@x", "b@x"]);
        assert_eq!(r.find_by_name("Anna Schmidt").len(), 1);
        assert!(r.find_by_name("Moritz").is_empty());
    }

    #[test]
    fn tutorial_ids_are_unique() {
        let mut a = Student::new("A B", "a@x");
        a.day = "Mo".into();
        a.time = "14:00".into();
        let mut b = a.clone();
        b.mail = "b@x".into();
        let mut c = a.clone();
        c.day = "Di".into();
        let r = Roster::new(vec![a, b, c]);
        assert_eq!(r.tutorial_ids(), vec!["Di_14-00", "Mo_14-00"]);
    }
}
