use log::debug;

use crate::roster::{Roster, StudentLookup};
use crate::student::{LocalSubmission, Student, Submission};

/// Answers whether a submitter is one of the roster's students.
pub struct StudentFilter<'a> {
    roster: &'a Roster,
}

impl<'a> StudentFilter<'a> {
    pub fn new(roster: &'a Roster) -> Self {
        StudentFilter { roster }
    }

    /// Ranked candidates: an exact mail hit on its own, otherwise every name
    /// match in roster order.
    pub fn candidates(&self, name: &str, mail: Option<&str>) -> Vec<&'a Student> {
        let roster: &'a Roster = self.roster;
        if let Some(student) = mail.and_then(|m| roster.find_by_mail(m)) {
            return vec![student];
        }
        roster.find_by_name(name)
    }

    /// First candidate wins, even when a later roster entry also matches.
    pub fn matches(&self, name: &str, mail: Option<&str>) -> Option<&'a Student> {
        self.candidates(name, mail).into_iter().next()
    }

    pub fn filter_list(&self, submissions: Vec<Submission>) -> Vec<Submission> {
        submissions
            .into_iter()
            .filter(|s| self.is_known(s))
            .collect()
    }

    pub fn filter_local(&self, submissions: Vec<LocalSubmission>) -> Vec<LocalSubmission> {
        submissions
            .into_iter()
            .filter(|s| self.is_known(s.submission()))
            .collect()
    }

    fn is_known(&self, submission: &Submission) -> bool {
        let mail = Some(submission.mail.as_str()).filter(|m| !m.is_empty());
        let known = self.matches(&submission.name, mail).is_some();
        if !known {
            debug!("no roster student for {} <{}>", submission.name, submission.mail);
        }
        known
    }
}
