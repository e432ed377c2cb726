// crusti_app_helper
// Copyright (C) 2020  Univ. Artois & CNRS
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use anyhow::Result;
use clap::App;
use clap::ArgMatches;

/// A subcommand of the satplan binary (`authors`, `check`, `encode-to-sat`, `solve`).
///
/// The name is the word typed on the command line after the binary name;
/// [`CliManager`](super::cli_manager::CliManager) dispatches to the command whose name matches.
pub(crate) trait Command<'a> {
    /// Returns the subcommand word.
    fn name(&self) -> &str;

    /// Returns the clap description of the subcommand.
    ///
    /// It must declare the `--logging-level` argument, since the logger is set up from it before [`execute`](Self::execute) is called.
    fn clap_subcommand(&self) -> App<'a, 'a>;

    /// Runs the subcommand on the matches of its own clap description.
    ///
    /// Results (plans, DIMACS text, authors) go to the standard output;
    /// an error makes the binary log its cause chain and exit with status 1.
    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()>;
}
