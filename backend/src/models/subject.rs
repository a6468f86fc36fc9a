//! Closed catalog of examinable subjects.

use crate::define_subject_catalog;

/// Error returned when a string does not name a catalog subject.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown subject code: {0}.")]
pub struct UnknownSubjectCode(pub String);

define_subject_catalog! {
    Math101 => ("MATH101", "Mathematics I"),
    Math201 => ("MATH201", "Mathematics II"),
    Stat101 => ("STAT101", "Introductory Statistics"),
    Phys101 => ("PHYS101", "Physics I"),
    Phys201 => ("PHYS201", "Physics II"),
    Chem101 => ("CHEM101", "General Chemistry"),
    Chem201 => ("CHEM201", "Organic Chemistry"),
    Biol101 => ("BIOL101", "Biology I"),
    Biol201 => ("BIOL201", "Biology II"),
    Comp101 => ("COMP101", "Introduction to Programming"),
    Comp201 => ("COMP201", "Data Structures and Algorithms"),
    Info101 => ("INFO101", "Information Systems"),
    Engl101 => ("ENGL101", "English Communication"),
    Engl201 => ("ENGL201", "Academic Writing"),
    Hist101 => ("HIST101", "World History"),
    Geog101 => ("GEOG101", "Physical Geography"),
    Econ101 => ("ECON101", "Microeconomics"),
    Econ201 => ("ECON201", "Macroeconomics"),
    Acct101 => ("ACCT101", "Financial Accounting"),
    Busm101 => ("BUSM101", "Business Management"),
}
