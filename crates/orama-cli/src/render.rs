//! Terminal output for streamed answers.

use std::io::Write;

use futures_util::StreamExt;
use orama_answer::{AnswerSession, AskStream, Interaction, InteractionState};

/// Print an ask's response as it grows and return the final interaction.
///
/// Ctrl-C while streaming aborts the interaction instead of exiting.
pub async fn follow(session: &AnswerSession, mut stream: AskStream) -> Option<Interaction> {
    let mut printed = 0;
    let mut last = None;
    let mut stdout = std::io::stdout();

    loop {
        tokio::select! {
            next = stream.next() => match next {
                Some(interaction) => {
                    let delta = unprinted(&interaction.response, printed);
                    if !delta.is_empty() {
                        let _ = write!(stdout, "{delta}");
                        let _ = stdout.flush();
                        printed = interaction.response.len();
                    }
                    last = Some(interaction);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupt, aborting interaction");
                session.abort();
            }
        }
    }

    if printed > 0 {
        println!();
    }
    if let Some(interaction) = &last {
        let summary = summary(interaction);
        if !summary.is_empty() {
            println!("{summary}");
        }
    }
    last
}

/// The part of `response` not yet written, given `printed` bytes were.
fn unprinted(response: &str, printed: usize) -> &str {
    response.get(printed..).unwrap_or("")
}

/// Trailing notes for a finished interaction.
pub fn summary(interaction: &Interaction) -> String {
    let mut lines = Vec::new();
    if interaction.aborted {
        lines.push("(aborted)".to_string());
    }
    if interaction.state == InteractionState::Error {
        let reason = interaction.error.as_deref().unwrap_or("unknown error");
        lines.push(format!("error: {reason}"));
    }
    if let Some(sources) = interaction.sources.as_ref().filter(|s| !s.is_empty()) {
        let ids: Vec<&str> = sources.iter().map(|s| s.id.as_str()).collect();
        lines.push(format!("sources: {}", ids.join(", ")));
    }
    if let Some(related) = interaction.related_queries.as_ref().filter(|r| !r.is_empty()) {
        lines.push(format!("related: {}", related.join(" | ")));
    }
    lines.join("\n")
}

pub fn history_line(position: usize, interaction: &Interaction) -> String {
    let marker = if interaction.aborted {
        "aborted".to_string()
    } else {
        format!("{:?}", interaction.state).to_lowercase()
    };
    format!(
        "{:>3}. [{marker}] {} ({} chars)",
        position + 1,
        interaction.query,
        interaction.response.chars().count()
    )
}
