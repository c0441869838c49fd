mod question;

pub use question::{CatalogItem, Question, QuizDoc, Tier};
