use std::env;
use std::fs;
use std::io::{BufWriter, Write};
use std::process;

use anyhow::{Context, Result};
use log::info;

use klotski_solver::search::Strategy;
use klotski_solver::{level, search, write_solution};

struct Args {
    inputfile: String,
    outputfile: String,
    strategy: Strategy,
}

fn parse_args() -> Option<Args> {
    let mut inputfile = None;
    let mut outputfile = None;
    let mut strategy = None;

    let mut args = env::args().skip(1);
    while let Some(flag) = args.next() {
        let value = args.next()?;
        match flag.as_str() {
            "--inputfile" => inputfile = Some(value),
            "--outputfile" => outputfile = Some(value),
            "--algo" => {
                strategy = Some(match value.as_str() {
                    "astar" => Strategy::AStar,
                    "dfs" => Strategy::Dfs,
                    _ => return None,
                })
            }
            _ => return None,
        }
    }

    Some(Args {
        inputfile: inputfile?,
        outputfile: outputfile?,
        strategy: strategy?,
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(args) = parse_args() else {
        eprintln!("Usage: klotski --inputfile PATH --outputfile PATH --algo {{astar|dfs}}");
        process::exit(2);
    };

    let text = fs::read_to_string(&args.inputfile)
        .with_context(|| format!("reading {}", args.inputfile))?;
    let puzzle = level::parse(&text)
        .with_context(|| format!("invalid puzzle definition in {}", args.inputfile))?;
    info!(
        "loaded a 4x{} puzzle with {} pieces",
        puzzle.initial.height(),
        puzzle.initial.piece_count()
    );

    let result = search::solve(&puzzle.initial, &puzzle.goal, &puzzle.goals, args.strategy);
    match &result.path {
        Some(path) => info!(
            "solved in {} moves ({} expanded, {} generated)",
            path.len() - 1,
            result.stats.expanded,
            result.stats.generated
        ),
        None => info!(
            "no solution ({} expanded, {} generated)",
            result.stats.expanded, result.stats.generated
        ),
    }

    let file = fs::File::create(&args.outputfile)
        .with_context(|| format!("creating {}", args.outputfile))?;
    let mut sink = BufWriter::new(file);
    write_solution(&mut sink, result.path.as_deref())?;
    sink.flush()
        .with_context(|| format!("writing {}", args.outputfile))?;
    Ok(())
}
