use crate::config::toml_config::AssistantConfig;
use crate::domain::model::SyllabusLevel;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "campus-assistant")]
#[command(about = "Campus information assistant backed by a local knowledge base")]
pub struct CliConfig {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Knowledge document, overrides `knowledge.path`
    #[arg(long, global = true)]
    pub data: Option<String>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Answer a single question
    Ask {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Interactive session on stdin; `exit` or `quit` ends it
    Chat,
    /// Print a catalogue from the knowledge base
    List {
        #[command(subcommand)]
        target: ListTarget,
    },
    /// Report whether the AI service key is configured
    CheckKey,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ListTarget {
    Departments,
    Facilities,
    Syllabi {
        #[arg(long, value_enum, default_value_t = LevelFilter::All)]
        level: LevelFilter,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LevelFilter {
    Ug,
    Pg,
    All,
}

impl LevelFilter {
    pub fn levels(self) -> &'static [SyllabusLevel] {
        match self {
            LevelFilter::Ug => &[SyllabusLevel::Undergraduate],
            LevelFilter::Pg => &[SyllabusLevel::Postgraduate],
            LevelFilter::All => &[SyllabusLevel::Undergraduate, SyllabusLevel::Postgraduate],
        }
    }
}

impl CliConfig {
    /// File settings (or defaults) with command-line overrides applied, validated.
    pub fn resolve(&self) -> Result<AssistantConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("📁 Loading configuration from {}", path.display());
                AssistantConfig::from_file(path)?
            }
            None => AssistantConfig::default(),
        };
        if let Some(data) = &self.data {
            config = config.with_knowledge_path(data.clone());
        }
        config.validate()?;
        Ok(config)
    }

    pub fn query_text(query: &[String]) -> String {
        query.join(" ")
    }
}

/// Reads files relative to `base_path`; absolute paths are used as given.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;
    use crate::utils::error::AssistantError;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_parse_ask_with_global_flags() {
        let cli = CliConfig::try_parse_from([
            "campus-assistant",
            "ask",
            "where",
            "is",
            "the",
            "canteen",
            "--data",
            "campus.json",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.data.as_deref(), Some("campus.json"));
        match cli.command {
            Command::Ask { query } => {
                assert_eq!(CliConfig::query_text(&query), "where is the canteen")
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_syllabi_level() {
        let cli =
            CliConfig::try_parse_from(["campus-assistant", "list", "syllabi", "--level", "pg"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Command::List {
                target: ListTarget::Syllabi { level: LevelFilter::Pg }
            }
        ));
        assert_eq!(LevelFilter::All.levels().len(), 2);
    }

    #[test]
    fn test_ask_requires_a_query() {
        assert!(CliConfig::try_parse_from(["campus-assistant", "ask"]).is_err());
    }

    #[test]
    fn test_resolve_applies_data_override() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[knowledge]\npath = \"from-file.json\"\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from(["campus-assistant", "--config", &path, "chat"]).unwrap();
        assert_eq!(cli.resolve().unwrap().knowledge_path(), "from-file.json");

        let cli = CliConfig::try_parse_from([
            "campus-assistant",
            "--config",
            &path,
            "--data",
            "override.json",
            "check-key",
        ])
        .unwrap();
        assert_eq!(cli.resolve().unwrap().knowledge_path(), "override.json");
    }

    #[test]
    fn test_resolve_rejects_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[matching]\nstaff_threshold = 2.0\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from(["campus-assistant", "--config", &path, "chat"]).unwrap();
        assert!(matches!(
            cli.resolve().unwrap_err(),
            AssistantError::InvalidConfigValueError { .. }
        ));
    }

    #[tokio::test]
    async fn test_local_storage_reads_relative_paths() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("data.json"), b"{}").unwrap();

        let storage = LocalStorage::new(dir.path());
        assert_eq!(storage.read_file("data.json").await.unwrap(), b"{}".to_vec());
        assert!(matches!(
            storage.read_file("missing.json").await.unwrap_err(),
            AssistantError::IoError(_)
        ));
    }
}
