//! Interface de terminal do complaint-desk — saída colorida e JSON.
//!
//! Usa a crate `console` para estilização com cores: verde para mudanças
//! aceitas, vermelho para falhas e amarelo para reclamações que ainda
//! aguardam alguém. Com `--json` tudo sai como JSON formatado.

use console::Style;
use serde::Serialize;

use crate::audit::StatusLogEntry;
use crate::desk::Transition;
use crate::lifecycle::{Complaint, Status};

/// Imprime reclamações, históricos e erros no terminal.
pub struct Printer {
    // Estilo verde para sucesso e status finalizados.
    green: Style,
    // Estilo vermelho para falhas e reclamações rejeitadas.
    red: Style,
    // Estilo amarelo para reclamações em aberto.
    yellow: Style,
    // Estilo esmaecido para ids e textos secundários.
    dim: Style,
    // Quando verdadeiro, toda saída é JSON em vez de texto.
    json: bool,
}

impl Printer {
    /// Cria o impressor; `json` troca a saída colorida por JSON formatado.
    pub fn new(json: bool) -> Self {
        Self {
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
            json,
        }
    }

    fn status_style(&self, status: Status) -> &Style {
        match status {
            Status::Pending | Status::InProgress => &self.yellow,
            Status::Resolved | Status::Closed => &self.green,
            Status::Rejected => &self.red,
        }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) {
        println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
    }

    /// Exibe uma reclamação com todos os campos e o texto completo.
    pub fn complaint(&self, c: &Complaint) {
        if self.json {
            return self.print_json(c);
        }
        println!("{} {}", self.dim.apply_to(c.id), c.title);
        println!(
            "  status:     {}",
            self.status_style(c.status).apply_to(c.status)
        );
        println!("  priority:   {}", c.priority);
        println!("  category:   {} / {}", c.category, c.department);
        println!("  submitter:  {}", c.submitter);
        match c.assignee {
            Some(assignee) => println!("  assignee:   {assignee}"),
            None => println!("  assignee:   {}", self.dim.apply_to("unassigned")),
        }
        println!("  filed:      {}", c.created_at.format("%Y-%m-%d %H:%M"));
        if let Some(resolved) = c.resolved_at {
            println!("  resolved:   {}", resolved.format("%Y-%m-%d %H:%M"));
        }
        println!();
        println!("{}", c.body);
    }

    /// Lista reclamações, uma por linha, em colunas alinhadas.
    pub fn list(&self, complaints: &[Complaint]) {
        if self.json {
            return self.print_json(complaints);
        }
        if complaints.is_empty() {
            println!("{}", self.dim.apply_to("No complaints."));
            return;
        }
        for c in complaints {
            println!(
                "{}  {}  {:<6}  {}",
                self.dim.apply_to(c.id),
                self.status_style(c.status)
                    .apply_to(format!("{:<11}", c.status)),
                c.priority,
                c.title
            );
        }
    }

    /// Imprime o histórico de status em ordem cronológica.
    pub fn history(&self, entries: &[StatusLogEntry]) {
        if self.json {
            return self.print_json(entries);
        }
        if entries.is_empty() {
            println!("{}", self.dim.apply_to("No status changes yet."));
            return;
        }
        for e in entries {
            print!(
                "{}  {} -> {}  by {}",
                e.at.format("%Y-%m-%d %H:%M:%S"),
                e.from,
                self.status_style(e.to).apply_to(e.to),
                e.actor
            );
            match &e.note {
                Some(note) => println!("  {}", self.dim.apply_to(format!("\"{note}\""))),
                None => println!(),
            }
        }
    }

    pub fn transition(&self, t: &Transition) {
        if self.json {
            return self.print_json(&t.complaint);
        }
        println!(
            "  {} {} -> {}",
            self.green.apply_to("✓"),
            t.entry.from,
            self.status_style(t.entry.to).apply_to(t.entry.to)
        );
    }

    pub fn filed(&self, c: &Complaint) {
        if self.json {
            return self.print_json(c);
        }
        println!("  {} Filed {}", self.green.apply_to("✓"), c.id);
    }

    pub fn assigned(&self, c: &Complaint) {
        if self.json {
            return self.print_json(c);
        }
        if let Some(assignee) = c.assignee {
            println!("  {} Assigned to {assignee}", self.green.apply_to("✓"));
        }
    }

    /// Exibe o erro em vermelho na saída de erro padrão.
    pub fn error(&self, err: &anyhow::Error) {
        eprintln!("  {} {err:#}", self.red.apply_to("✗"));
    }
}
