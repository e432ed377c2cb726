use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use satplan::{
    encodings::ClauseGenerator,
    sat::{BufferedSatSolver, SatSolver},
};
use std::{cell::RefCell, fs, io::Read, rc::Rc};

const CMD_NAME: &str = "encode-to-sat";

const ARG_HORIZON: &str = "ARG_HORIZON";
const ARG_OUT: &str = "ARG_OUT";

pub(crate) struct EncodeToSatCommand;

impl EncodeToSatCommand {
    pub(crate) fn new() -> Self {
        EncodeToSatCommand
    }
}

impl<'a> Command<'a> for EncodeToSatCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Writes the DIMACS encoding of a planning problem for a given horizon")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(cli_manager::logging_level_cli_arg())
            .arg(
                Arg::with_name(ARG_HORIZON)
                    .long("horizon")
                    .empty_values(false)
                    .multiple(false)
                    .help("the horizon to encode")
                    .required(true),
            )
            .arg(
                Arg::with_name(ARG_OUT)
                    .short("o")
                    .long("output")
                    .empty_values(false)
                    .multiple(false)
                    .help("the output file for the encoding")
                    .required(false),
            )
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches
            .value_of(common::ARG_INPUT)
            .ok_or_else(|| anyhow!("missing input file"))?;
        let horizon = common::parse_usize_arg(arg_matches, ARG_HORIZON)?
            .ok_or_else(|| anyhow!("missing horizon"))?;
        let problem = common::read_file_path(file)?;
        let generator = ClauseGenerator::new(&problem);
        let table = generator.variable_table(horizon);
        let clauses = generator.encode(&table);
        info!(
            "the encoding for horizon {} has {} variables and {} clauses",
            horizon,
            table.n_vars(),
            clauses.len()
        );
        let instance = Rc::new(RefCell::new(Vec::new()));
        let mut solver = BufferedSatSolver::new(Box::new({
            let instance_cl = Rc::clone(&instance);
            move |mut r, _| {
                let mut content = instance_cl.borrow_mut();
                if r.read_to_end(&mut content).is_err() {
                    content.clear();
                }
                Box::new("s UNKNOWN".as_bytes())
            }
        }));
        solver.reserve(table.n_vars());
        clauses.add_to_solver(&mut solver);
        solver.solve();
        let instance_content = String::from_utf8(instance.take())
            .context("while building the DIMACS instance")?;
        if let Some(output_file) = arg_matches.value_of(ARG_OUT) {
            fs::write(output_file, instance_content)
                .with_context(|| format!(r#"while writing file "{}""#, output_file))?;
        } else {
            print!("{}", instance_content);
        }
        Ok(())
    }
}
