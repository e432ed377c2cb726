mod app_helper;

mod authors_command;
pub(crate) use authors_command::AuthorsCommand;

mod check_command;
pub(crate) use check_command::CheckCommand;

mod cli_manager;

mod command;

pub(crate) mod common;

mod encode_to_sat_command;
pub(crate) use encode_to_sat_command::EncodeToSatCommand;

mod solve_command;
pub(crate) use solve_command::SolveCommand;
