// src/main.rs
//
// adoc-reflow: re-wrap AsciiDoc prose to a column width
//
// - Reads INPUT (or stdin for `-`), reflows it, writes OUTPUT (default:
//   overwrite INPUT; stdout for stdin input).
// - A file whose reflowed text equals its current text is not rewritten.
// - Width: --width, else `width` from the config file, else 80; always clamped
//   to 20..=200 here before the engine sees it.
// - Config file: --config PATH, else the nearest `.adoc-reflow.toml` at or
//   above the input's directory (the working directory for stdin).
//
// CLI flags:
//   -w, --width N   : target column width
//   --config PATH   : explicit config file
//   --line N        : only the paragraph containing 1-based line N
//   --lines A:B     : only 1-based lines A through B, inclusive
//   --check         : write nothing; exit 1 if reflowing would change the text
//
// Exit status: 0 ok, 1 --check found changes, 2 error.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use adoc_reflow::config::{clamp_width, Config};
use adoc_reflow::edit;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{info, warn};

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Target column width (clamped to 20..=200)
    #[arg(short, long, value_name = "N")]
    width: Option<usize>,

    /// Config file (default: nearest .adoc-reflow.toml above the input)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Reflow only the paragraph containing this 1-based line
    #[arg(long, value_name = "N", value_parser = parse_line_number, conflicts_with = "lines")]
    line: Option<usize>,

    /// Reflow only this 1-based inclusive line range
    #[arg(long, value_name = "A:B", value_parser = parse_line_span)]
    lines: Option<LineSpan>,

    /// Don't write anything; exit with status 1 if the text would change
    #[arg(long, action = ArgAction::SetTrue)]
    check: bool,

    /// Input file, or `-` for stdin
    input: PathBuf,

    /// Output file (default: overwrite input, or stdout when reading stdin)
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LineSpan {
    first: usize,
    last: usize,
}

fn parse_line_number(arg: &str) -> Result<usize, String> {
    match arg.trim().parse::<usize>() {
        Ok(0) => Err("line numbers start at 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("`{arg}` is not a line number: {e}")),
    }
}

fn parse_line_span(arg: &str) -> Result<LineSpan, String> {
    let (first, last) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected A:B, got `{arg}`"))?;
    let span = LineSpan {
        first: parse_line_number(first)?,
        last: parse_line_number(last)?,
    };
    if span.last < span.first {
        return Err(format!("range `{arg}` ends before it starts"));
    }
    Ok(span)
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("adoc-reflow: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let from_stdin = is_stdio(&cli.input);
    let source = if from_stdin {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(&cli.input)
            .with_context(|| format!("failed to read {}", cli.input.display()))?
    };

    let width = resolve_width(cli, from_stdin)?;
    let reflowed = reflow_selection(cli, &source, width)?;

    if cli.check {
        return Ok(match reflowed {
            Some(_) => {
                info!("{} would be reflowed", cli.input.display());
                ExitCode::FAILURE
            }
            None => ExitCode::SUCCESS,
        });
    }

    let changed = reflowed.is_some();
    let out = reflowed.unwrap_or(source);

    let out_path = match &cli.output {
        Some(path) => path.as_path(),
        None if from_stdin => Path::new("-"),
        None => cli.input.as_path(),
    };

    if is_stdio(out_path) {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(out.as_bytes())
            .and_then(|()| stdout.flush())
            .context("failed to write stdout")?;
    } else if out_path == cli.input && !changed {
        info!("{} unchanged", out_path.display());
    } else {
        fs::write(out_path, out)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        info!("wrote {}", out_path.display());
    }
    Ok(ExitCode::SUCCESS)
}

/// Flag, then config file, then the default; clamped.
fn resolve_width(cli: &Cli, from_stdin: bool) -> Result<usize> {
    let config = match &cli.config {
        Some(path) => {
            let config = Config::load_from_path(path)?
                .with_context(|| format!("config file {} does not exist", path.display()))?;
            info!("using config {}", path.display());
            config
        }
        None => {
            let start_dir = if from_stdin {
                std::env::current_dir().context("failed to resolve working directory")?
            } else {
                let input = fs::canonicalize(&cli.input)
                    .with_context(|| format!("failed to resolve {}", cli.input.display()))?;
                input.parent().map(Path::to_path_buf).unwrap_or(input)
            };
            match Config::discover(&start_dir)? {
                Some((path, config)) => {
                    info!("using config {}", path.display());
                    config
                }
                None => Config::default(),
            }
        }
    };

    let requested = cli.width.unwrap_or(config.width);
    let width = clamp_width(requested);
    if width != requested {
        warn!("width {requested} is out of range; using {width}");
    }
    Ok(width)
}

fn reflow_selection(cli: &Cli, source: &str, width: usize) -> Result<Option<String>> {
    if let Some(line) = cli.line {
        return Ok(edit::reflow_paragraph_at(source, line - 1, width)?);
    }
    if let Some(span) = cli.lines {
        return Ok(edit::reflow_lines(source, span.first - 1..span.last, width)?);
    }
    let out = adoc_reflow::reflow(source, width);
    Ok((out != source).then_some(out))
}
