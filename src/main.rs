use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use bitvec::prelude::*;
use clap::{Parser, Subcommand};
use cmdtree::{CmdId, CmdRange, Direction, FillConfig, Group, GroupOrId};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Upper bound on `--commands`; the hidden-id mask holds one bit per command.
const MAX_COMMANDS: u64 = 1 << 32;

#[derive(Parser, Debug)]
#[command(name = "cmdtree", about = "Inspect a recorded command stream as a tree of groups")]
struct Cli {
    /// Number of recorded commands (identifiers `0..N`).
    #[arg(long)]
    commands: u64,
    /// Layout file (`<start> <end> <name>` per line, `#` starts a comment).
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Extra group as `START:END:NAME` (repeatable).
    #[arg(long = "group", value_parser = parse_group)]
    groups: Vec<GroupSpec>,
    /// Commands to leave out of the tree: `ID` or `START..END` (repeatable).
    #[arg(long = "hide", value_parser = parse_hidden)]
    hidden: Vec<CmdRange>,
    /// Maximum items per group (0 = unbounded).
    #[arg(long, default_value_t = 0)]
    max_children: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the filled tree.
    Tree,
    /// Print the root index and full path of a command.
    Locate {
        /// Command identifier.
        id: CmdId,
    },
    /// Walk the tree depth-first from a path.
    Walk {
        /// Comma-separated start path (default: whole tree).
        #[arg(long, value_delimiter = ',')]
        from: Vec<u64>,
        /// Walk towards earlier commands.
        #[arg(long)]
        backwards: bool,
        /// Stop after this many items.
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupSpec {
    start: CmdId,
    end: CmdId,
    name: String,
}

/// Raised by the walk callback to stop at `--limit`.
#[derive(Debug)]
struct LimitReached;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = build_tree(&cli)?;

    match cli.command {
        Commands::Tree => println!("{:#}", root),
        Commands::Locate { id } => run_locate(&root, id),
        Commands::Walk {
            from,
            backwards,
            limit,
        } => run_walk(&root, &from, backwards, limit),
    }

    Ok(())
}

fn build_tree(cli: &Cli) -> Result<Group> {
    let hidden = hidden_mask(cli.commands, &cli.hidden)?;
    let mut specs = match &cli.layout {
        Some(path) => read_layout_file(path)
            .with_context(|| format!("failed to read layout from {}", path.display()))?,
        None => Vec::new(),
    };
    specs.extend(cli.groups.iter().cloned());

    let mut root = Group::new("Commands", 0..cli.commands);
    for spec in &specs {
        root.add_group(spec.start, spec.end, spec.name.as_str())
            .with_context(|| format!("failed to add group '{}'", spec.name))?;
    }

    let config = FillConfig::new(cli.max_children).context("invalid --max-children")?;
    root.fill_with(|id| !hidden[id as usize], &config);
    info!(
        groups = specs.len(),
        hidden = hidden.count_ones(),
        items = root.count(),
        "tree built"
    );
    Ok(root)
}

/// One bit per command, set for commands left out of the tree.
fn hidden_mask(commands: u64, hidden: &[CmdRange]) -> Result<BitVec> {
    ensure!(
        commands <= MAX_COMMANDS,
        "--commands {} exceeds the supported maximum of {}",
        commands,
        MAX_COMMANDS
    );
    let len = usize::try_from(commands).context("--commands does not fit in memory")?;

    let mut mask = bitvec![0; len];
    for range in hidden {
        let start = range.start.min(commands) as usize;
        let end = range.end.min(commands) as usize;
        mask[start..end.max(start)].fill(true);
    }
    Ok(mask)
}

fn run_locate(root: &Group, id: CmdId) {
    match (root.index_of(id), root.path_of(id)) {
        (Some(index), Some(path)) => {
            println!("cmd {}\tindex={}\tpath={}", id, index, format_path(&path))
        }
        _ => println!("cmd {} is hidden or outside the trace", id),
    }
}

fn run_walk(root: &Group, from: &[u64], backwards: bool, limit: Option<usize>) {
    let direction = if backwards {
        Direction::Backwards
    } else {
        Direction::Forwards
    };

    let mut printed = 0;
    let result = root.traverse(direction, from, |path, item| {
        if limit.is_some_and(|limit| printed >= limit) {
            return Err(LimitReached);
        }
        printed += 1;
        match item {
            GroupOrId::Id(id) => println!("{}\tcmd {}", format_path(path), id),
            GroupOrId::Group(group) => println!("{}\t{}", format_path(path), group),
        }
        Ok(())
    });

    if result.is_err() {
        info!(printed, "walk stopped at limit");
    }
}

fn format_path(path: &[u64]) -> String {
    if path.is_empty() {
        return "-".to_string();
    }
    path.iter()
        .map(|index| index.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

fn read_layout_file(path: &PathBuf) -> Result<Vec<GroupSpec>> {
    let file = File::open(path)?;
    parse_layout(BufReader::new(file))
}

/// Parse `<start> <end> <name>` lines; columns are separated by any run of
/// whitespace and the name runs to the end of the line.
fn parse_layout(reader: impl BufRead) -> Result<Vec<GroupSpec>> {
    let mut specs = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(spec) =
            parse_layout_line(&line).with_context(|| format!("line {}", line_no + 1))?
        {
            specs.push(spec);
        }
    }
    Ok(specs)
}

fn parse_layout_line(line: &str) -> Result<Option<GroupSpec>> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (start, rest) = next_field(line);
    let (end, name) = next_field(rest);
    let parse_id = |what: &str, field: &str| -> Result<CmdId> {
        if field.is_empty() {
            bail!("missing {}", what);
        }
        field
            .parse()
            .with_context(|| format!("invalid {} '{}'", what, field))
    };
    let start = parse_id("start", start)?;
    let end = parse_id("end", end)?;
    if name.is_empty() {
        bail!("missing name");
    }

    Ok(Some(GroupSpec {
        start,
        end,
        name: name.to_string(),
    }))
}

/// Split off the first whitespace-delimited field.
fn next_field(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((field, rest)) => (field, rest.trim_start()),
        None => (text, ""),
    }
}

fn parse_group(value: &str) -> Result<GroupSpec, String> {
    let mut fields = value.splitn(3, ':');
    let (Some(start), Some(end), Some(name)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(format!("expected START:END:NAME, got '{}'", value));
    };
    Ok(GroupSpec {
        start: start.parse().map_err(|_| format!("invalid start '{}'", start))?,
        end: end.parse().map_err(|_| format!("invalid end '{}'", end))?,
        name: name.to_string(),
    })
}

fn parse_hidden(value: &str) -> Result<CmdRange, String> {
    let parse = |field: &str| {
        field
            .parse::<CmdId>()
            .map_err(|_| format!("invalid command id '{}'", field))
    };
    match value.split_once("..") {
        Some((start, end)) => Ok(CmdRange::new(parse(start)?, parse(end)?)),
        None => {
            let id = parse(value)?;
            let end = id
                .checked_add(1)
                .ok_or_else(|| format!("command id '{}' is out of range", value))?;
            Ok(CmdRange::new(id, end))
        }
    }
}
