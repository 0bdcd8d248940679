pub mod client;
pub mod error;
pub mod grid;
pub mod models;

pub use client::{busting_url, DEFAULT_SERVER, DOWNLOAD_FILENAME, ForgeClient};
pub use error::ArtForgeError;
pub use grid::{CellKind, EditableGrid, GridCell};
pub use models::{CellValue, DataTable, GeneratedArt, Row};
