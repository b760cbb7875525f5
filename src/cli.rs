//! Interface de linha de comando do complaint-desk usando clap.
//!
//! Todo subcomando que altera dados identifica o usuário com `--actor` e
//! `--role`. Não há login: quem chama declara quem é.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::access::{Actor, Role, UserId};
use crate::lifecycle::{ComplaintId, Priority, Status};

/// complaint-desk — registre, faça a triagem e resolva reclamações pelo terminal.
#[derive(Debug, Parser)]
#[command(name = "complaint-desk", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Arquivo de configuração (padrão: ./desk.toml, se existir).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Imprime reclamações e histórico como JSON.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Ativa logs de depuração.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Papel institucional aceito em `--role`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    Staff,
    Parent,
    Student,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Role::Admin,
            RoleArg::Staff => Role::Staff,
            RoleArg::Parent => Role::Parent,
            RoleArg::Student => Role::Student,
        }
    }
}

/// Status aceitos na linha de comando (apenas o vocabulário canônico).
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    InProgress,
    Resolved,
    Rejected,
    Closed,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Status::Pending,
            StatusArg::InProgress => Status::InProgress,
            StatusArg::Resolved => Status::Resolved,
            StatusArg::Rejected => Status::Rejected,
            StatusArg::Closed => Status::Closed,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
    Urgent,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
            PriorityArg::Urgent => Priority::Urgent,
        }
    }
}

/// Usuário em nome de quem o comando é executado.
#[derive(Debug, Clone, Args)]
pub struct ActorArgs {
    /// Id do usuário que executa a ação.
    #[arg(long, value_parser = parse_user_id)]
    pub actor: UserId,

    /// Papel institucional do usuário.
    #[arg(long, value_enum)]
    pub role: RoleArg,
}

impl ActorArgs {
    pub fn actor(&self) -> Actor {
        Actor::new(self.actor, self.role.into())
    }
}

fn parse_user_id(s: &str) -> Result<UserId, String> {
    s.parse().map_err(|e: crate::error::DeskError| e.to_string())
}

fn parse_complaint_id(s: &str) -> Result<ComplaintId, String> {
    s.parse().map_err(|e: crate::error::DeskError| e.to_string())
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Registra uma nova reclamação.
    File {
        /// Título curto da reclamação.
        #[arg(long)]
        title: String,

        /// Texto completo da reclamação.
        #[arg(long)]
        body: String,

        #[arg(long, default_value = "general")]
        category: String,

        #[arg(long, default_value = "general")]
        department: String,

        #[arg(long, value_enum, default_value = "medium")]
        priority: PriorityArg,

        #[command(flatten)]
        who: ActorArgs,
    },

    /// Atribui uma reclamação a um funcionário.
    Assign {
        #[arg(value_parser = parse_complaint_id)]
        id: ComplaintId,

        /// Usuário que vai cuidar da reclamação.
        #[arg(long, value_parser = parse_user_id)]
        to: UserId,

        #[command(flatten)]
        who: ActorArgs,
    },

    /// Move uma reclamação para um novo status.
    Transition {
        #[arg(value_parser = parse_complaint_id)]
        id: ComplaintId,

        #[arg(value_enum)]
        status: StatusArg,

        /// Observação livre registrada junto com a mudança de status.
        #[arg(long)]
        note: Option<String>,

        #[command(flatten)]
        who: ActorArgs,
    },

    /// Exibe uma reclamação.
    Show {
        #[arg(value_parser = parse_complaint_id)]
        id: ComplaintId,
    },

    /// Exibe o histórico de status de uma reclamação.
    History {
        #[arg(value_parser = parse_complaint_id)]
        id: ComplaintId,
    },

    /// Lista reclamações, opcionalmente filtrando por status.
    List {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const USER: &str = "6f1c2a9e-3b0d-4c7e-9a51-2d8e4f7b1c30";
    const COMPLAINT: &str = "0b7e9d42-5a13-4f6c-8e2b-91c3d4a5f607";

    #[test]
    fn cli_parses_transition_subcommand() {
        let cli = Cli::parse_from([
            "complaint-desk",
            "transition",
            COMPLAINT,
            "in-progress",
            "--note",
            "picked up",
            "--actor",
            USER,
            "--role",
            "staff",
        ]);
        match cli.command {
            Command::Transition {
                id,
                status,
                note,
                who,
            } => {
                assert_eq!(id.to_string(), COMPLAINT);
                assert_eq!(Status::from(status), Status::InProgress);
                assert_eq!(note.as_deref(), Some("picked up"));
                assert_eq!(who.actor().role, Role::Staff);
                assert_eq!(who.actor().id.to_string(), USER);
            }
            _ => panic!("expected Transition command"),
        }
    }

    #[test]
    fn cli_parses_file_with_defaults() {
        let cli = Cli::parse_from([
            "complaint-desk",
            "file",
            "--title",
            "Late bus",
            "--body",
            "Again",
            "--actor",
            USER,
            "--role",
            "parent",
        ]);
        match cli.command {
            Command::File {
                category, priority, ..
            } => {
                assert_eq!(category, "general");
                assert_eq!(Priority::from(priority), Priority::Medium);
            }
            _ => panic!("expected File command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from(["complaint-desk", "--json", "-v", "list", "--status", "closed"]);
        assert!(cli.json);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::List {
                status: Some(StatusArg::Closed)
            }
        ));
    }

    #[test]
    fn cli_rejects_bad_ids_and_legacy_statuses() {
        assert!(Cli::try_parse_from(["complaint-desk", "show", "42"]).is_err());
        assert!(Cli::try_parse_from(["complaint-desk", "list", "--status", "in_review"]).is_err());
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
