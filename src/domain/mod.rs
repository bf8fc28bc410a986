//! Domain model.

pub mod person;

pub use person::{NewPerson, Person, PersonQuery, PersonView, SortOrder};
