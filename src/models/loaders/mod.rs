pub mod file_loader;

pub use file_loader::{load_all_files, load_file};
