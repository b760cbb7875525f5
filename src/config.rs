//! Configuração do complaint-desk carregada a partir de `desk.toml`.
//!
//! A struct [`DeskConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `COMPLAINT_DESK_DATA` tem precedência sobre `data_file`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::DeskError;

const DEFAULT_CONFIG_FILE: &str = "desk.toml";
const DATA_FILE_ENV: &str = "COMPLAINT_DESK_DATA";

/// Configuração de nível superior carregada de `desk.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeskConfig {
    /// Snapshot JSON com as reclamações e o histórico de status.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Permite que qualquer funcionário faça a triagem de reclamações em `pending`.
    #[serde(default)]
    pub staff_may_triage: bool,

    /// Filtro de tracing padrão quando `RUST_LOG` não está definido.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Retentativas para transições que perderam a corrida para outro escritor.
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Configuração de backoff para conflitos de escrita concorrente.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retentativas após a primeira tentativa antes de desistir com `Conflict`.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Atraso base em milissegundos para backoff exponencial.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

// Valor padrão para o arquivo de dados: "complaints.json".
fn default_data_file() -> PathBuf {
    PathBuf::from("complaints.json")
}

// Valor padrão para o filtro de log: "info".
fn default_log_filter() -> String {
    "info".to_string()
}

// Valor padrão para retentativas máximas: 3.
fn default_max_retries() -> u32 {
    3
}

// Valor padrão para o atraso base: 50ms.
fn default_base_delay_ms() -> u64 {
    50
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetryConfig {
    /// Calcula o atraso para uma tentativa usando backoff exponencial.
    /// delay = base_delay_ms * 2^(attempt - 1)
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        self.base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            staff_may_triage: false,
            log_filter: default_log_filter(),
            retry: RetryConfig::default(),
        }
    }
}

impl DeskConfig {
    /// Carrega `path`, ou `desk.toml` no diretório atual quando nenhum é dado.
    ///
    /// Um arquivo pedido explicitamente precisa existir; o padrão é opcional.
    pub fn load(path: Option<&Path>) -> Result<Self, DeskError> {
        Self::load_with(path, std::env::var(DATA_FILE_ENV).ok())
    }

    fn load_with(path: Option<&Path>, data_override: Option<String>) -> Result<Self, DeskError> {
        let mut config = match path {
            Some(path) if !path.exists() => {
                return Err(DeskError::Config(format!(
                    "config file {} not found",
                    path.display()
                )));
            }
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        // Variável de ambiente tem precedência sobre o arquivo de configuração.
        if let Some(data) = data_override
            && !data.is_empty()
        {
            config.data_file = PathBuf::from(data);
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, DeskError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str::<DeskConfig>(&contents)?)
    }
}
