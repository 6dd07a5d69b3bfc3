pub mod config;
pub mod dates;
pub mod db;
pub mod loader;
pub mod metadata;
pub mod schema;
pub mod thesaurus;
pub mod vocabulary;
