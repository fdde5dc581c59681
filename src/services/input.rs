use crate::errors::Result;
use crate::models::query::DayCount;

pub const HELP: &str = "\
Commands:
  <SYMBOL>     look up a ticker, e.g. AAPL
  :days <N>    show the last 7, 14, 21 or 28 points
  :help        show this help
  :quit        exit";

/// One line typed in interactive mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Submit(String),
    Days(DayCount),
    Help,
    Quit,
}

impl Input {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        match line.strip_prefix(':') {
            Some(command) => {
                let mut parts = command.split_whitespace();
                match (parts.next(), parts.next()) {
                    (Some("days"), Some(value)) => Ok(Input::Days(value.parse()?)),
                    (Some("help"), None) => Ok(Input::Help),
                    (Some("quit") | Some("q"), None) => Ok(Input::Quit),
                    _ => Err(format!("unknown command ':{}', try :help", command).into()),
                }
            }
            // 其余输入一律视为提交代码，空行会清空当前代码
            None => Ok(Input::Submit(line.to_string())),
        }
    }
}
