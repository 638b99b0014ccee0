use std::path::PathBuf;

use clap::Parser;

/// Ask questions against an Orama collection and stream the answers.
#[derive(Parser, Debug)]
#[command(name = "orama-ask", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Answer service base URL.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Collection to query.
    #[arg(short, long)]
    pub collection: Option<String>,

    /// Read API key (otherwise taken from the config or environment).
    #[arg(long)]
    pub api_key: Option<String>,

    /// LLM provider override.
    #[arg(long)]
    pub provider: Option<String>,

    /// LLM model override.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the loaded config as JSON (read key redacted) and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Question to answer. Starts an interactive session when omitted.
    pub query: Vec<String>,
}

impl Args {
    /// The positional words joined into one question, if any were given.
    pub fn query(&self) -> Option<String> {
        let query = self.query.join(" ");
        (!query.trim().is_empty()).then_some(query)
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_words_form_the_query() {
        let args = Args::parse_from(["orama-ask", "-c", "docs", "what", "is", "orama?"]);
        assert_eq!(args.collection.as_deref(), Some("docs"));
        assert_eq!(args.query().as_deref(), Some("what is orama?"));
    }

    #[test]
    fn no_query_means_interactive() {
        let args = Args::parse_from(["orama-ask", "--model", "gpt-4o-mini"]);
        assert!(args.query().is_none());
        assert_eq!(args.model.as_deref(), Some("gpt-4o-mini"));
        assert!(!args.print_config);
    }

    #[test]
    fn print_config_flag() {
        let args = Args::parse_from(["orama-ask", "--print-config"]);
        assert!(args.print_config);
    }
}
