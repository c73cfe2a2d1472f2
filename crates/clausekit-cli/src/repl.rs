//! Line-oriented interactive mode over a [`Workflow`].

use std::path::PathBuf;

use anyhow::Context;
use clausekit_core::{Analyzer, CandidateFile, ClauseId, Submission, Workflow};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::display;

const HELP: &str = "\
Commands:
  <id>           expand or collapse a clause
  all | none     expand or collapse every clause
  open <path>    select a new document
  drop <path>... select the first of several dropped documents
  submit         analyze the selected document
  show           print the current state again
  reset          start over
  quit";

#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    Toggle(ClauseId),
    ExpandAll,
    CollapseAll,
    Open(PathBuf),
    Drop(Vec<PathBuf>),
    Submit,
    Show,
    Reset,
    Help,
    Quit,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match word {
            "all" => Ok(Self::ExpandAll),
            "none" => Ok(Self::CollapseAll),
            "submit" | "analyze" => Ok(Self::Submit),
            "show" | "" => Ok(Self::Show),
            "reset" | "clear" => Ok(Self::Reset),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "open" if !rest.is_empty() => Ok(Self::Open(PathBuf::from(rest))),
            "drop" if !rest.is_empty() => Ok(Self::Drop(
                rest.split_whitespace().map(PathBuf::from).collect(),
            )),
            "open" | "drop" => Err(format!("usage: {word} <path>")),
            id => id
                .trim_start_matches('#')
                .parse::<u64>()
                .map(|n| Self::Toggle(ClauseId(n)))
                .map_err(|_| format!("unknown command: {line} (try `help`)")),
        }
    }
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run<A: Analyzer>(flow: &Workflow<A>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();
    println!("{HELP}");

    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let command = match ReplCommand::parse(&line) {
            Ok(command) => command,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };

        match command {
            ReplCommand::Quit => break,
            ReplCommand::Help => {
                println!("{HELP}");
                continue;
            }
            ReplCommand::Toggle(id) => {
                if !flow.update(|s| s.toggle(id)) {
                    println!("no clause #{id} in the current result");
                    continue;
                }
            }
            ReplCommand::ExpandAll => flow.update(|s| {
                if let Some(view) = s.results_mut() {
                    view.expand_all();
                }
            }),
            ReplCommand::CollapseAll => flow.update(|s| {
                if let Some(view) = s.results_mut() {
                    view.collapse_all();
                }
            }),
            ReplCommand::Open(path) => match CandidateFile::from_path(&path) {
                Ok(file) => {
                    let _ = flow.update(|s| s.select(file));
                }
                Err(err) => {
                    println!("{err}");
                    continue;
                }
            },
            ReplCommand::Drop(paths) => {
                if paths.len() > 1 {
                    println!("Only one document at a time: ignoring {} more", paths.len() - 1);
                }
                let files: Result<Vec<CandidateFile>, _> = paths
                    .iter()
                    .take(1)
                    .map(|p| CandidateFile::from_path(p))
                    .collect();
                match files {
                    Ok(files) => {
                        let _ = flow.update(|s| s.drop_files(files));
                    }
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                }
            }
            ReplCommand::Submit => {
                if let Some(file) = flow.session().candidate() {
                    println!("Processing {}...", file.name);
                }
                if let Submission::Skipped(reason) = flow.submit().await {
                    tracing::debug!(%reason, "nothing submitted");
                }
            }
            ReplCommand::Reset => {
                flow.update(|s| s.reset());
            }
            ReplCommand::Show => {}
        }

        let session = flow.session();
        match session.results() {
            Some(view) => display::print_results(&mut stdout, view)?,
            None => display::print_status(&mut stdout, &session)?,
        }
    }
    Ok(())
}
