use crate::RalphError;
use std::path::PathBuf;

/// What the binary was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP control surface.
    Serve,
    /// Run one cycle and print the report.
    Cycle,
    /// Print usage.
    Help,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    /// Subcommand; `serve` when omitted.
    pub command: Command,
    /// `--config PATH`
    pub config_path: Option<PathBuf>,
    /// `--bind ADDR`
    pub bind: Option<String>,
    /// `--data-dir PATH`
    pub data_dir: Option<PathBuf>,
    /// `--interval-ms N`
    pub interval_ms: Option<u64>,
}

/// Usage line.
pub const USAGE: &str = "ralph [serve|cycle] [--config ralph.json] [--bind ADDR] [--data-dir PATH] [--interval-ms N]";

/// Parse arguments (without the program name).
pub fn parse_args(args: Vec<String>) -> Result<CliArgs, RalphError> {
    let mut remaining = args;
    let mut command = Command::Serve;
    if let Some(first) = remaining.first().cloned() {
        match first.as_str() {
            "serve" => {
                remaining.remove(0);
            }
            "cycle" => {
                command = Command::Cycle;
                remaining.remove(0);
            }
            "--help" | "-h" | "help" => {
                return Ok(CliArgs {
                    command: Command::Help,
                    config_path: None,
                    bind: None,
                    data_dir: None,
                    interval_ms: None,
                });
            }
            flag if flag.starts_with('-') => {}
            other => return Err(RalphError::Config(format!("unknown subcommand: {other}"))),
        }
    }

    let mut parsed = CliArgs {
        command,
        config_path: None,
        bind: None,
        data_dir: None,
        interval_ms: None,
    };
    while let Some(flag) = remaining.first().cloned() {
        remaining.remove(0);
        match flag.as_str() {
            "--config" => {
                parsed.config_path = Some(PathBuf::from(take_arg("--config", &mut remaining)?))
            }
            "--bind" => parsed.bind = Some(take_arg("--bind", &mut remaining)?),
            "--data-dir" => {
                parsed.data_dir = Some(PathBuf::from(take_arg("--data-dir", &mut remaining)?))
            }
            "--interval-ms" => {
                let raw = take_arg("--interval-ms", &mut remaining)?;
                let ms = raw
                    .parse()
                    .map_err(|e| RalphError::Config(format!("invalid --interval-ms {raw:?}: {e}")))?;
                parsed.interval_ms = Some(ms);
            }
            "--help" | "-h" => parsed.command = Command::Help,
            other => return Err(RalphError::Config(format!("unknown flag: {other}"))),
        }
    }
    Ok(parsed)
}

fn take_arg(flag: &str, remaining: &mut Vec<String>) -> Result<String, RalphError> {
    if remaining.is_empty() {
        return Err(RalphError::Config(format!("missing value for {flag}")));
    }
    Ok(remaining.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn empty_means_serve() {
        let parsed = parse_args(Vec::new()).unwrap();
        assert_eq!(parsed.command, Command::Serve);
        assert!(parsed.config_path.is_none());
    }

    #[test]
    fn flags_without_subcommand_mean_serve() {
        let parsed = parse_args(args(&["--bind", "0.0.0.0:9000"])).unwrap();
        assert_eq!(parsed.command, Command::Serve);
        assert_eq!(parsed.bind.as_deref(), Some("0.0.0.0:9000"));
    }

    #[test]
    fn cycle_with_every_flag() {
        let parsed = parse_args(args(&[
            "cycle",
            "--config",
            "x.json",
            "--data-dir",
            "/tmp/r",
            "--interval-ms",
            "1000",
        ]))
        .unwrap();
        assert_eq!(parsed.command, Command::Cycle);
        assert_eq!(parsed.config_path, Some(PathBuf::from("x.json")));
        assert_eq!(parsed.data_dir, Some(PathBuf::from("/tmp/r")));
        assert_eq!(parsed.interval_ms, Some(1000));
    }

    #[test]
    fn help() {
        assert_eq!(parse_args(args(&["--help"])).unwrap().command, Command::Help);
        assert_eq!(parse_args(args(&["serve", "-h"])).unwrap().command, Command::Help);
    }

    #[test]
    fn errors() {
        assert!(parse_args(args(&["launch"])).is_err());
        assert!(parse_args(args(&["--bind"])).is_err());
        assert!(parse_args(args(&["--interval-ms", "soon"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
    }
}
