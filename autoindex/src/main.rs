use autoindex_core::{Configuration, IndexPlanner, IndexSelection, parse_relations};
use clap::Parser;
use std::{
    fmt::Write as _,
    fs,
    io::{self, Read as _, Write as _},
    path::PathBuf,
    process::ExitCode,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Relation description (`name/arity: {0,1} {1} ...` per line), if not stdin.
    input: Option<PathBuf>,

    /// Output file, if not stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Disable index sharing, one index per access pattern.
    ///
    /// Any value of the environment variable other than a falsey one (`0`, `false`, `no`, `off`)
    /// turns this on.
    #[arg(
        long,
        env = "AUTOINDEX_USE_NAIVE_INDEX",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    naive: bool,

    /// Print every index as a full permutation of the relation's columns.
    #[arg(long)]
    full: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let input = if let Some(path) = &cli.input {
        fs::read_to_string(path)?
    } else {
        let mut input = String::new();
        io::stdin().lock().read_to_string(&mut input)?;
        input
    };

    let config = Configuration {
        index_selection: if cli.naive {
            IndexSelection::Naive
        } else {
            IndexSelection::Matching
        },
    };
    let mut planner = IndexPlanner::new(config);

    let mut output = String::new();
    for relation in parse_relations(&input)? {
        let plan = planner.plan(&relation.patterns);
        tracing::info!(
            relation = %relation.name,
            patterns = relation.patterns.len(),
            indexes = plan.len(),
            "planned"
        );

        writeln!(output, "{}/{}:", relation.name, relation.arity)?;
        if cli.full {
            for (id, permutation) in plan.permutations(relation.arity)?.iter().enumerate() {
                let columns: Vec<String> = permutation.iter().map(|c| c.0.to_string()).collect();
                writeln!(output, "  ix{id}: [{}]", columns.join(" "))?;
            }
        } else {
            for line in plan.dbg_summary().lines() {
                writeln!(output, "  {line}")?;
            }
        }
    }

    match &cli.output {
        Some(path) => fs::write(path, output)?,
        None => io::stdout().lock().write_all(output.as_bytes())?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(unsafe_code)]
mod test {
    use super::Cli;
    use clap::Parser as _;

    const NAIVE_ENV: &str = "AUTOINDEX_USE_NAIVE_INDEX";

    fn naive_with_env(value: Option<&str>, args: &[&str]) -> bool {
        match value {
            // SAFETY: no other test reads or writes this variable.
            Some(value) => unsafe { std::env::set_var(NAIVE_ENV, value) },
            // SAFETY: as above.
            None => unsafe { std::env::remove_var(NAIVE_ENV) },
        }
        let cli = Cli::try_parse_from(std::iter::once("autoindex").chain(args.iter().copied()))
            .unwrap_or_else(|err| panic!("{value:?} {args:?}: {err}"));
        cli.naive
    }

    #[test]
    fn naive_env_var() {
        assert!(!naive_with_env(None, &[]));
        assert!(naive_with_env(None, &["--naive"]));
        assert!(naive_with_env(Some("1"), &[]));
        assert!(naive_with_env(Some("yes"), &["in.txt"]));
        assert!(naive_with_env(Some("true"), &[]));
        assert!(!naive_with_env(Some("0"), &[]));
        assert!(!naive_with_env(Some("false"), &[]));
        assert!(naive_with_env(Some("0"), &["--naive"]));
        // SAFETY: no other test reads or writes this variable.
        unsafe { std::env::remove_var(NAIVE_ENV) };
    }
}
