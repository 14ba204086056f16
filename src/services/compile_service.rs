use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Language name to backend version index
const LANGUAGES: &[(&str, &str)] = &[
    ("python3", "3"),
    ("java", "3"),
    ("cpp", "4"),
    ("nodejs", "3"),
    ("c", "4"),
    ("ruby", "3"),
    ("go", "3"),
    ("scala", "3"),
    ("bash", "3"),
    ("sql", "3"),
    ("pascal", "2"),
    ("csharp", "3"),
    ("php", "3"),
    ("swift", "3"),
    ("rust", "3"),
    ("r", "3"),
];

pub fn version_index(language: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, version)| *version)
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Unsupported language '{0}'")]
    UnsupportedLanguage(String),
    #[error("Execution backend credentials are not configured")]
    MissingCredentials,
    #[error("Execution backend failed: {0}")]
    Backend(String),
}

/// Something that can run a program and report what happened
pub trait ExecutionBackend: Send + Sync {
    fn execute<'a>(
        &'a self,
        code: &'a str,
        language: &'a str,
        version_index: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Value, CompileError>> + Send + 'a>>;
}

pub struct CompileService {
    backend: Arc<dyn ExecutionBackend>,
}

impl CompileService {
    pub fn new(backend: Arc<dyn ExecutionBackend>) -> Self {
        Self { backend }
    }

    /// Run `code`, rejecting unknown languages before the backend sees them
    pub async fn compile(&self, code: &str, language: &str) -> Result<Value, CompileError> {
        let Some(version) = version_index(language) else {
            warn!("Rejected compile request for unsupported language '{}'", language);
            return Err(CompileError::UnsupportedLanguage(language.to_string()));
        };
        info!("Compiling {} program ({} bytes)", language, code.len());
        self.backend.execute(code, language, version).await
    }
}
