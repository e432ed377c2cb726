use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Result};
use clap::{App, AppSettings, ArgMatches, SubCommand};
use log::{info, warn};

const CMD_NAME: &str = "check";

pub(crate) struct CheckCommand;

impl CheckCommand {
    pub(crate) fn new() -> Self {
        CheckCommand
    }
}

impl<'a> Command<'a> for CheckCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks input problem files for errors")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches
            .value_of(common::ARG_INPUT)
            .ok_or_else(|| anyhow!("missing input file"))?;
        let problem = common::read_file_path(file)?;
        let n_initially_true = problem.initial_state().iter().filter(|b| **b).count();
        info!("{} fluent(s) are initially true", n_initially_true);
        let unreachable_goals = problem.unreachable_goals();
        if unreachable_goals.is_empty() {
            info!("every goal condition is either initially satisfied or produced by an operator");
        } else {
            unreachable_goals.iter().for_each(|f| {
                warn!(
                    "the goal condition on fluent {} can never be satisfied: the problem has no plan",
                    f
                )
            });
        }
        Ok(())
    }
}
