mod loader;

pub use loader::{load_quiz_from_json, parse_quiz_payload, LoadError};
