use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::{info, warn};
use satplan::{
    io::PlanWriter,
    solvers::{HorizonSearch, PlannerConfig, SearchOutcome},
};

const CMD_NAME: &str = "solve";

const ARG_MIN_HORIZON: &str = "MIN_HORIZON";
const ARG_MAX_HORIZON: &str = "MAX_HORIZON";
const ARG_TIMEOUT: &str = "TIMEOUT";
const ARG_ATTEMPT_TIMEOUT: &str = "ATTEMPT_TIMEOUT";

pub(crate) struct SolveCommand;

impl SolveCommand {
    pub(crate) fn new() -> Self {
        SolveCommand
    }
}

impl<'a> Command<'a> for SolveCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Looks for a plan of minimal horizon")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(
                Arg::with_name(ARG_MIN_HORIZON)
                    .long("min-horizon")
                    .empty_values(false)
                    .multiple(false)
                    .help("the first horizon to consider [default: 0]")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_MAX_HORIZON)
                    .long("max-horizon")
                    .empty_values(false)
                    .multiple(false)
                    .help("the last horizon to consider [default: 256]")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_TIMEOUT)
                    .long("timeout")
                    .empty_values(false)
                    .multiple(false)
                    .help("the time budget of the whole search, in seconds [default: 600]")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_ATTEMPT_TIMEOUT)
                    .long("attempt-timeout")
                    .empty_values(false)
                    .multiple(false)
                    .help("the time limit of a single SAT solver call, in seconds")
                    .required(false),
            )
            .args(&common::sat_solver_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches
            .value_of(common::ARG_INPUT)
            .ok_or_else(|| anyhow!("missing input file"))?;
        let config = read_planner_config(arg_matches)?;
        config.validate()?;
        let problem = common::read_file_path(file)?;
        problem.unreachable_goals().iter().for_each(|f| {
            warn!(
                "the goal condition on fluent {} can never be satisfied",
                f
            )
        });
        let solver_factory = common::create_sat_solver_factory(arg_matches)?;
        info!(
            "looking for a plan with horizon in [{}, {}] within {:?}",
            config.min_horizon, config.max_horizon, config.timeout
        );
        let mut search =
            HorizonSearch::new_with_sat_solver_factory(&problem, config, solver_factory)?;
        let outcome = search.run();
        match &outcome {
            SearchOutcome::PlanFound { plan, .. } => plan.validate(&problem)?,
            SearchOutcome::HorizonExhausted {
                max_horizon,
                proven: true,
            } => info!(
                "horizon {} exceeds the number of states: the problem has no plan",
                max_horizon
            ),
            _ => {}
        }
        let n_attempts = search.statistics().len();
        let solving_time = search
            .statistics()
            .iter()
            .map(|s| s.encoding_time + s.solving_time)
            .sum::<std::time::Duration>();
        info!(
            "{} attempt(s) in {:.3}s",
            n_attempts,
            solving_time.as_secs_f64()
        );
        let mut out = std::io::stdout();
        PlanWriter.write_outcome(&mut out, &problem, &outcome)
    }
}

fn read_planner_config(arg_matches: &ArgMatches<'_>) -> Result<PlannerConfig> {
    let mut config = PlannerConfig::default();
    if let Some(h) = common::parse_usize_arg(arg_matches, ARG_MIN_HORIZON)? {
        config.min_horizon = h;
    }
    if let Some(h) = common::parse_usize_arg(arg_matches, ARG_MAX_HORIZON)? {
        config.max_horizon = h;
    }
    if let Some(d) = common::parse_duration_arg(arg_matches, ARG_TIMEOUT)? {
        config.timeout = d;
    }
    config.attempt_timeout = common::parse_duration_arg(arg_matches, ARG_ATTEMPT_TIMEOUT)?;
    Ok(config)
}
