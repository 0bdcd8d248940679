use std::fmt;

#[derive(Debug)]
pub enum ArtForgeError {
    Network(reqwest::Error),
    Json(serde_json::Error),
    Backend(String),
    Io(std::io::Error),
}

impl fmt::Display for ArtForgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtForgeError::Network(e) => write!(f, "Network error: {}", e),
            ArtForgeError::Json(e) => write!(f, "JSON parsing error: {}", e),
            ArtForgeError::Backend(e) => write!(f, "Backend error: {}", e),
            ArtForgeError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ArtForgeError {}

impl From<reqwest::Error> for ArtForgeError {
    fn from(err: reqwest::Error) -> Self {
        ArtForgeError::Network(err)
    }
}

impl From<serde_json::Error> for ArtForgeError {
    fn from(err: serde_json::Error) -> Self {
        ArtForgeError::Json(err)
    }
}

impl From<std::io::Error> for ArtForgeError {
    fn from(err: std::io::Error) -> Self {
        ArtForgeError::Io(err)
    }
}
