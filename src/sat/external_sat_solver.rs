use super::{
    buffered_sat_solver::{BufferedSatSolver, DimacsInstanceRead},
    sat_solver::{SolvingListener, SolvingResult},
    Literal, SatSolver, SatSolverFactory,
};
use log::{debug, warn};
use std::{
    io::{Cursor, Read, Write},
    process::{Child, Command, Stdio},
    time::{Duration, Instant},
};

const WAIT_POLLING_DELAY: Duration = Duration::from_millis(10);

/// A SAT solver which execution is made by a system command.
///
/// The system command is composed by an executable program, and a potential list of CLI arguments.
///
/// The SAT solver must read from the standard input (if it does not by default, this may be possible with the right CLI arguments).
/// The input and output formats must follow the ones from the SAT competitions.
///
/// When a time limit is set, the process is killed as soon as it is reached;
/// the result is then [SolvingResult::Unknown].
pub struct ExternalSatSolver {
    buffered_sat_solver: BufferedSatSolver,
}

impl ExternalSatSolver {
    /// Builds a new external SAT solver.
    ///
    /// The `program` argument is the path from a directory in execution path to the software to execute.
    /// The `options` parameter is the CLI options to provide to the software under execution.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use satplan::sat::{ExternalSatSolver, Literal, SatSolver};
    /// let mut solver = ExternalSatSolver::new(
    ///     "/home/me/my_solver".to_string(),
    ///     vec!["-i".to_string(), "/dev/stdin".to_string()],
    /// );
    /// solver.add_clause(vec![Literal::from(-1), Literal::from(-2)]);
    /// solver.add_clause(vec![Literal::from(-1), Literal::from(2)]);
    /// let model = solver.solve().unwrap_model().unwrap();
    /// assert_eq!(Some(false), model.value_of(1));
    /// ```
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self {
            buffered_sat_solver: BufferedSatSolver::new(Box::new(move |r, time_limit| {
                exec_solver(r, &program, &options, time_limit)
            })),
        }
    }
}

impl SatSolver for ExternalSatSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        self.buffered_sat_solver.add_clause(cl)
    }

    fn solve(&mut self) -> SolvingResult {
        self.buffered_sat_solver.solve()
    }

    fn n_vars(&self) -> usize {
        self.buffered_sat_solver.n_vars()
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.buffered_sat_solver.add_listener(listener);
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.buffered_sat_solver.reserve(new_max_id)
    }

    fn set_time_limit(&mut self, limit: Duration) {
        self.buffered_sat_solver.set_time_limit(limit)
    }
}

fn exec_solver(
    mut reader: DimacsInstanceRead,
    program: &str,
    options: &[String],
    time_limit: Option<Duration>,
) -> Box<dyn Read> {
    let start = Instant::now();
    let mut child = match Command::new(program)
        .args(options)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
    {
        Ok(c) => c,
        Err(e) => {
            warn!("failed to launch external SAT solver {:?}: {}", program, e);
            return Box::new(Cursor::new(Vec::new()));
        }
    };
    let mut stdin = child.stdin.take().expect("Failed to open stdin");
    std::thread::spawn(move || {
        let mut buffer = String::new();
        if reader.read_to_string(&mut buffer).is_ok() {
            // the solver may exit before reading its whole input
            let _ = stdin.write_all(buffer.as_bytes());
        }
        stdin.flush()
    });
    let mut stdout = child.stdout.take().expect("Failed to open stdout");
    let output_reader = std::thread::spawn(move || {
        let mut output = Vec::new();
        let _ = stdout.read_to_end(&mut output);
        output
    });
    if !wait_until(&mut child, time_limit.map(|l| start + l)) {
        debug!("external SAT solver reached its time limit; killing it");
        let _ = child.kill();
        let _ = child.wait();
    }
    let output = output_reader.join().unwrap_or_default();
    Box::new(Cursor::new(output))
}

/// Waits for the child to exit; returns `false` if the deadline was reached first.
fn wait_until(child: &mut Child, deadline: Option<Instant>) -> bool {
    let deadline = match deadline {
        Some(d) => d,
        None => return child.wait().is_ok(),
    };
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return true,
            Ok(None) => {}
            Err(_) => return false,
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(WAIT_POLLING_DELAY);
    }
}

/// A factory building [ExternalSatSolver] instances, all running the same command.
pub struct ExternalSatSolverFactory {
    program: String,
    options: Vec<String>,
    listener_builders: Vec<Box<dyn Fn() -> Box<dyn SolvingListener>>>,
}

impl ExternalSatSolverFactory {
    /// Builds a new factory given the program and its options (see [ExternalSatSolver::new]).
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self {
            program,
            options,
            listener_builders: vec![],
        }
    }

    /// Adds a function building a listener to attach to every new solver.
    pub fn add_solver_listener(&mut self, builder: Box<dyn Fn() -> Box<dyn SolvingListener>>) {
        self.listener_builders.push(builder);
    }
}

impl SatSolverFactory for ExternalSatSolverFactory {
    fn new_solver(&self) -> Box<dyn SatSolver> {
        let mut solver = ExternalSatSolver::new(self.program.clone(), self.options.clone());
        self.listener_builders
            .iter()
            .for_each(|b| solver.add_listener(b()));
        Box::new(solver)
    }
}
