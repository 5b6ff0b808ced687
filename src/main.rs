use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{bail, Context};
use crossterm::{style::Stylize, tty::IsTty};
use log::{info, warn};
use rand::thread_rng;
use slider_puzzle::{parse_board, Board, Move, Priority, Solver, SolverConfig};

const USAGE: &str =
    "usage: slider-puzzle [--priority manhattan|hamming|linear-conflict] [--random N] [--plain] [FILE]";

#[derive(Debug, Default)]
struct Options {
    priority: Priority,
    random: Option<usize>,
    plain: bool,
    path: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Options> {
    let mut options = Options::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--priority" => {
                let value = args.next().context("--priority needs a value")?;
                options.priority = value.parse()?;
            }
            "--random" => {
                let value = args.next().context("--random needs a dimension")?;
                let size = value
                    .parse()
                    .with_context(|| format!("invalid dimension `{}`", value))?;
                if !(Board::MIN_DIMENSION..=Board::MAX_DIMENSION).contains(&size) {
                    bail!(
                        "dimension {} is out of range, expected {} to {}",
                        size,
                        Board::MIN_DIMENSION,
                        Board::MAX_DIMENSION
                    );
                }
                options.random = Some(size);
            }
            "--plain" => options.plain = true,
            "-h" | "--help" => bail!(USAGE),
            flag if flag.starts_with("--") => bail!("unknown option `{}`\n{}", flag, USAGE),
            _ if options.path.is_none() => options.path = Some(PathBuf::from(arg)),
            _ => bail!("only one board file can be given\n{}", USAGE),
        }
    }
    Ok(options)
}

fn read_board(options: &Options) -> anyhow::Result<Board> {
    if let Some(size) = options.random {
        if size > 3 {
            warn!("random {0}x{0} boards can take a very long time to solve", size);
        }
        return Ok(Board::random_solvable(size, &mut thread_rng()));
    }

    let text = match &options.path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read the board from stdin")?;
            text
        }
    };
    Ok(parse_board(&text)?)
}

fn render(board: &Board, styled: bool) -> String {
    if !styled {
        return board.to_string();
    }

    let size = board.dimension();
    let width = (size * size - 1).to_string().len();
    let mut out = format!("{}\n", size);
    for (i, row) in board.rows().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(j, &value)| {
                let cell = format!("{:>width$}", value, width = width);
                if value == 0 {
                    cell.dark_grey().to_string()
                } else if value as usize == i * size + j + 1 {
                    cell.green().to_string()
                } else {
                    cell.bold().to_string()
                }
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = parse_args(std::env::args().skip(1))?;
    let styled = !options.plain && io::stdout().is_tty();
    let initial = read_board(&options)?;

    info!(
        "solving {0}x{0} board, manhattan {1}, hamming {2}",
        initial.dimension(),
        initial.manhattan(),
        initial.hamming()
    );

    let solver = Solver::with_config(
        initial,
        SolverConfig {
            priority: options.priority,
        },
    );

    let Some(solution) = solver.solution() else {
        println!("No solution possible");
        return Ok(());
    };

    println!("Minimum number of moves = {}", solver.moves());
    println!("{}", render(&solution[0], styled));
    for pair in solution.windows(2) {
        if let Some(movement) = Move::between(&pair[0], &pair[1]) {
            println!("{}", movement);
        }
        println!("{}", render(&pair[1], styled));
    }
    Ok(())
}
