#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Record error at line {line}: {source}")]
    RecordError {
        line: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Line too long: {length} > {max_length}")]
    LineTooLong { length: usize, max_length: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("YAML error: {0}")]
    YamlError(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::YamlError(format!("{}", err))
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::FileNotFound(err.to_string())
    }
}

impl From<regex::Error> for ConfigError {
    fn from(err: regex::Error) -> Self {
        ConfigError::InvalidDelimiter(err.to_string())
    }
}
