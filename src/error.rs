use thiserror::Error;

/// Application-level error carrying the process exit code.
///
/// Exit codes: 2 = bad input/config, 3 = no usable data, 4 = runtime
/// (network, terminal, file I/O).
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures of the import flow (select → preview → upload).
///
/// The `Display` text is what the user sees.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Please select a valid CSV file")]
    WrongExtension { file_name: String },

    #[error("Failed to read '{file_name}': {source}")]
    Read {
        file_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload failed")]
    Rejected { status: u16 },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        let code = match err {
            ImportError::WrongExtension { .. } => 2,
            ImportError::Read { .. } | ImportError::Rejected { .. } | ImportError::Transport(_) => 4,
        };
        AppError::new(code, err.to_string())
    }
}
