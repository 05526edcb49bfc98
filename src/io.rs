//! Scenario-file parsing for the driver binary.
//!
//! A scenario is a line-oriented script, one command per line, `#` starting
//! a comment. Tokens are whitespace-separated:
//!
//! ```text
//! init 256 64
//! paging P1 200
//! access P1 0 fifo
//! touch P1 lru
//! seg S1 code:100 data:50
//! free P1
//! report
//! export state.json
//! reset
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::SimError;
use crate::segmentation::SegmentRequest;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("failed to serialize export: {0}")]
    Export(#[from] serde_json::Error),

    #[error(transparent)]
    Sim(#[from] SimError),
}

/// One parsed scenario command. Replacement algorithm names stay as the
/// raw strings the user typed; the engine decides what they mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init { memory_size: usize, frame_size: usize },
    Paging { pid: String, size: usize },
    Segmentation { pid: String, requests: Vec<SegmentRequest> },
    Access { pid: String, page: usize, algorithm: String },
    Touch { pid: String, algorithm: String },
    Free { pid: String },
    Reset,
    Report,
    Export { path: String },
}

#[derive(Debug, Default)]
pub struct Scenario {
    pub commands: Vec<Command>,
}

impl Scenario {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ScenarioError::Read {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ScenarioError> {
        let mut commands = Vec::new();
        for (index, raw_line) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            commands.push(parse_command(line_no, &tokens)?);
        }
        Ok(Scenario { commands })
    }
}

fn parse_command(line: usize, tokens: &[&str]) -> Result<Command, ScenarioError> {
    let keyword = tokens[0].to_ascii_lowercase();
    match keyword.as_str() {
        "init" => {
            expect_args(line, tokens, 2, "init <memory_size> <frame_size>")?;
            Ok(Command::Init {
                memory_size: parse_number(line, tokens[1], "memory size")?,
                frame_size: parse_number(line, tokens[2], "frame size")?,
            })
        }
        "paging" => {
            expect_args(line, tokens, 2, "paging <pid> <size>")?;
            Ok(Command::Paging {
                pid: tokens[1].to_string(),
                size: parse_number(line, tokens[2], "process size")?,
            })
        }
        "seg" | "segmentation" => {
            if tokens.len() < 3 {
                return Err(ScenarioError::Parse {
                    line,
                    message: format!("usage: {keyword} <pid> <name:size>..."),
                });
            }
            let requests = tokens[2..]
                .iter()
                .map(|spec| parse_segment_spec(line, spec))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Command::Segmentation { pid: tokens[1].to_string(), requests })
        }
        "access" => {
            if tokens.len() < 3 || tokens.len() > 4 {
                return Err(ScenarioError::Parse {
                    line,
                    message: "usage: access <pid> <page> [algorithm]".to_string(),
                });
            }
            Ok(Command::Access {
                pid: tokens[1].to_string(),
                page: parse_number(line, tokens[2], "page number")?,
                algorithm: tokens.get(3).unwrap_or(&"FIFO").to_string(),
            })
        }
        "touch" => {
            if tokens.len() < 2 || tokens.len() > 3 {
                return Err(ScenarioError::Parse {
                    line,
                    message: "usage: touch <pid> [algorithm]".to_string(),
                });
            }
            Ok(Command::Touch {
                pid: tokens[1].to_string(),
                algorithm: tokens.get(2).unwrap_or(&"FIFO").to_string(),
            })
        }
        "free" => {
            expect_args(line, tokens, 1, "free <pid>")?;
            Ok(Command::Free { pid: tokens[1].to_string() })
        }
        "reset" => {
            expect_args(line, tokens, 0, "reset")?;
            Ok(Command::Reset)
        }
        "report" => {
            expect_args(line, tokens, 0, "report")?;
            Ok(Command::Report)
        }
        "export" => {
            expect_args(line, tokens, 1, "export <path>")?;
            Ok(Command::Export { path: tokens[1].to_string() })
        }
        other => Err(ScenarioError::Parse {
            line,
            message: format!("unknown command: {other}"),
        }),
    }
}

fn expect_args(line: usize, tokens: &[&str], count: usize, usage: &str) -> Result<(), ScenarioError> {
    if tokens.len() != count + 1 {
        return Err(ScenarioError::Parse { line, message: format!("usage: {usage}") });
    }
    Ok(())
}

fn parse_number(line: usize, token: &str, what: &str) -> Result<usize, ScenarioError> {
    token.parse().map_err(|_| ScenarioError::Parse {
        line,
        message: format!("invalid {what}: {token}"),
    })
}

fn parse_segment_spec(line: usize, spec: &str) -> Result<SegmentRequest, ScenarioError> {
    let Some((name, size)) = spec.split_once(':') else {
        return Err(ScenarioError::Parse {
            line,
            message: format!("invalid segment spec (want name:size): {spec}"),
        });
    };
    if name.is_empty() {
        return Err(ScenarioError::Parse {
            line,
            message: format!("segment name missing in: {spec}"),
        });
    }
    Ok(SegmentRequest::new(name, parse_number(line, size, "segment size")?))
}
