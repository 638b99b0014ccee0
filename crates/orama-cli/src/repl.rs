//! Interactive prompt.

use std::io::Write;

use orama_answer::AnswerSession;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Ask(&'a str),
    Regenerate,
    History,
    Reset,
    Quit,
    Help,
    Unknown(&'a str),
    Empty,
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line {
            "" => Command::Empty,
            "/regen" => Command::Regenerate,
            "/history" => Command::History,
            "/reset" => Command::Reset,
            "/quit" | "/exit" => Command::Quit,
            "/help" => Command::Help,
            other if other.starts_with('/') => Command::Unknown(other),
            query => Command::Ask(query),
        }
    }
}

const HELP: &str = "commands: /regen  /history  /reset  /quit";

pub async fn run(session: &AnswerSession) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        match Command::parse(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Unknown(cmd) => println!("unknown command {cmd}; {HELP}"),
            Command::History => {
                for (position, interaction) in session.interactions().iter().enumerate() {
                    println!("{}", render::history_line(position, interaction));
                }
            }
            Command::Reset => {
                session.reset();
                println!("(history cleared)");
            }
            Command::Regenerate => match session.regenerate_last() {
                Ok(stream) => {
                    render::follow(session, stream).await;
                }
                Err(e) => println!("{e}"),
            },
            Command::Ask(query) => match session.ask(query) {
                Ok(stream) => {
                    render::follow(session, stream).await;
                }
                Err(e) => println!("{e}"),
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("  /regen "), Command::Regenerate);
        assert_eq!(Command::parse("/history"), Command::History);
        assert_eq!(Command::parse("/reset"), Command::Reset);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(Command::parse("/frobnicate"), Command::Unknown("/frobnicate"));
        assert_eq!(Command::parse("   "), Command::Empty);
    }

    #[test]
    fn anything_else_is_a_question() {
        assert_eq!(
            Command::parse(" What is Orama? "),
            Command::Ask("What is Orama?")
        );
    }
}
