use super::{
    app_helper::AppHelper, command::Command, AuthorsCommand, CheckCommand, EncodeToSatCommand,
    SolveCommand,
};
use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches};
use log::{info, warn};
use satplan::{
    io::{GroundedProblemReader, InstanceReader},
    planning::PlanningProblem,
    sat::{
        DefaultSatSolverFactory, ExternalSatSolverFactory, SatSolverFactory, SolverEngine,
        SolvingListener, SolvingResult,
    },
};
use std::{
    fs::{self, File},
    io::BufReader,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};
use strum::VariantNames;

pub(crate) fn create_app_helper() -> AppHelper<'static> {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let authors = option_env!("CARGO_PKG_AUTHORS").unwrap_or("unknown authors");
    let mut app = AppHelper::new(
        app_name,
        app_version,
        authors,
        "Satplan, a SAT-based classical planner.",
    );
    for c in planner_commands(app_name, app_version, authors) {
        app.add_command(c);
    }
    app
}

fn planner_commands(
    app_name: &'static str,
    app_version: &'static str,
    authors: &'static str,
) -> Vec<Box<dyn Command<'static>>> {
    vec![
        Box::new(AuthorsCommand::new(app_name, app_version, authors)),
        Box::new(CheckCommand::new()),
        Box::new(EncodeToSatCommand::new()),
        Box::new(SolveCommand::new()),
    ]
}

pub(crate) const ARG_INPUT: &str = "INPUT";

pub(crate) fn input_args() -> Arg<'static, 'static> {
    Arg::with_name(ARG_INPUT)
        .short("f")
        .empty_values(false)
        .multiple(false)
        .help("the input file that contains the grounded problem")
        .required(true)
}

pub(crate) fn read_file_path(file_path: &str) -> Result<PlanningProblem<String>> {
    let mut reader = GroundedProblemReader::default();
    reader.add_warning_handler(Box::new(|line, msg| warn!("at line {}: {}", line, msg)));
    let canonicalized = canonicalize_file_path(file_path)?;
    info!("reading input file {:?}", canonicalized);
    let mut file_reader = BufReader::new(
        File::open(&canonicalized)
            .with_context(|| format!(r#"while opening file "{}""#, file_path))?,
    );
    let problem = reader
        .read(&mut file_reader)
        .with_context(|| format!(r#"while reading file "{}""#, file_path))?;
    info!(
        "the problem has {} fluent(s), {} operator(s) and {} goal condition(s)",
        problem.n_fluents(),
        problem.n_operators(),
        problem.goal().len(),
    );
    Ok(problem)
}

/// Canonicalize a path given by the user.
pub(crate) fn canonicalize_file_path(file_path: &str) -> Result<PathBuf> {
    fs::canonicalize(PathBuf::from(file_path))
        .with_context(|| format!(r#"while opening file "{}""#, file_path))
}

/// Reads an optional non-negative integer argument.
pub(crate) fn parse_usize_arg(arg_matches: &ArgMatches<'_>, arg: &str) -> Result<Option<usize>> {
    arg_matches
        .value_of(arg)
        .map(|s| {
            s.parse::<usize>()
                .with_context(|| format!("invalid value {:?}: expected a non-negative integer", s))
        })
        .transpose()
}

const MAX_DURATION_SECS: f64 = 1e12;

/// Reads an optional duration argument, given in seconds.
pub(crate) fn parse_duration_arg(
    arg_matches: &ArgMatches<'_>,
    arg: &str,
) -> Result<Option<Duration>> {
    arg_matches
        .value_of(arg)
        .map(|s| {
            s.parse::<f64>()
                .ok()
                .filter(|d| d.is_finite() && *d >= 0. && *d < MAX_DURATION_SECS)
                .map(Duration::from_secs_f64)
                .ok_or_else(|| anyhow!("invalid value {:?}: expected a number of seconds", s))
        })
        .transpose()
}

const ARG_SAT_SOLVER: &str = "SAT_SOLVER";
const ARG_EXTERNAL_SAT_SOLVER: &str = "EXTERNAL_SAT_SOLVER";
const ARG_EXTERNAL_SAT_SOLVER_OPTIONS: &str = "EXTERNAL_SAT_SOLVER_OPTIONS";

pub(crate) fn sat_solver_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_SAT_SOLVER)
            .long("sat-solver")
            .empty_values(false)
            .multiple(false)
            .possible_values(SolverEngine::VARIANTS)
            .help("the SAT solving engine (defaults to the external one when a path is given, cadical otherwise)")
            .required(false),
        Arg::with_name(ARG_EXTERNAL_SAT_SOLVER)
            .long("external-sat-solver")
            .empty_values(false)
            .multiple(false)
            .required_if(ARG_SAT_SOLVER, SolverEngine::External.into())
            .help("a path to an external SAT solver (for the external engine)")
            .required(false),
        Arg::with_name(ARG_EXTERNAL_SAT_SOLVER_OPTIONS)
            .long("external-sat-solver-opt")
            .requires(ARG_EXTERNAL_SAT_SOLVER)
            .empty_values(false)
            .multiple(true)
            .number_of_values(1)
            .allow_hyphen_values(true)
            .help("an option to give to the external SAT solver")
            .required(false),
    ]
}

pub(crate) fn create_sat_solver_factory(
    arg_matches: &ArgMatches<'_>,
) -> Result<Box<dyn SatSolverFactory>> {
    let engine = match arg_matches.value_of(ARG_SAT_SOLVER) {
        Some(s) => SolverEngine::from_str(s).map_err(|_| anyhow!("unknown SAT solver {:?}", s))?,
        None if arg_matches.is_present(ARG_EXTERNAL_SAT_SOLVER) => SolverEngine::External,
        None => SolverEngine::default(),
    };
    let external_solver = arg_matches.value_of(ARG_EXTERNAL_SAT_SOLVER);
    if engine == SolverEngine::Cadical && external_solver.is_some() {
        warn!("the external SAT solver is ignored since the selected engine is the embedded one");
    }
    match engine {
        SolverEngine::Cadical => {
            info!("using the embedded SAT solver");
            let mut factory = DefaultSatSolverFactory::default();
            factory.add_solver_listener(Box::new(|| {
                Box::<SatSolvingLogger>::default() as Box<dyn SolvingListener>
            }));
            Ok(Box::new(factory))
        }
        SolverEngine::External => {
            let s = external_solver.ok_or_else(|| anyhow!("no external SAT solver provided"))?;
            let path = canonicalize_file_path(s)?;
            info!("using {:?} as the SAT solver", path);
            let external_solver_options = arg_matches
                .values_of(ARG_EXTERNAL_SAT_SOLVER_OPTIONS)
                .map(|v| v.map(|o| o.to_string()).collect::<Vec<String>>())
                .unwrap_or_default();
            let mut factory = ExternalSatSolverFactory::new(
                path.to_string_lossy().to_string(),
                external_solver_options,
            );
            factory.add_solver_listener(Box::new(|| {
                Box::<SatSolvingLogger>::default() as Box<dyn SolvingListener>
            }));
            Ok(Box::new(factory))
        }
    }
}

#[derive(Default)]
struct SatSolvingLogger;

impl SolvingListener for SatSolvingLogger {
    fn solving_start(&self, n_vars: usize, n_clauses: usize) {
        info!(
            "launching SAT solver on an instance with {} variables and {} clauses",
            n_vars, n_clauses
        );
    }

    fn solving_end(&self, result: &SolvingResult) {
        info!("SAT solver ended with result {}", result.short_name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planner_commands() {
        let commands = planner_commands("satplan", "0.1.0", "authors");
        assert_eq!(
            vec!["authors", "check", "encode-to-sat", "solve"],
            commands.iter().map(|c| c.name()).collect::<Vec<_>>()
        );
        for c in commands.iter() {
            assert_eq!(c.name(), c.clap_subcommand().get_name());
            let matches = c
                .clap_subcommand()
                .get_matches_from_safe(vec![c.name(), "--logging-level", "off", "--help"]);
            assert_eq!(
                clap::ErrorKind::HelpDisplayed,
                matches.map(|_| ()).unwrap_err().kind
            );
        }
    }
}
