use super::{
    sat_solver::{SolvingListener, SolvingResult},
    Assignment, Literal, SatSolver,
};
use std::{
    io::{BufRead, BufReader, Cursor, Read},
    time::Duration,
};

/// The type of the functions used by [BufferedSatSolver] to solve its DIMACS instance.
///
/// The function receives the instance and the time limit (if any);
/// it returns the output of the solver, following the SAT competition format.
pub type SolvingFn = dyn Fn(DimacsInstanceRead, Option<Duration>) -> Box<dyn Read>;

/// A reader over a DIMACS instance built by a [BufferedSatSolver].
pub struct DimacsInstanceRead {
    preamble: Cursor<String>,
    clauses: Cursor<String>,
}

impl Read for DimacsInstanceRead {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let r = self.preamble.read(buf)?;
        if r > 0 {
            return Ok(r);
        }
        self.clauses.read(buf)
    }
}

const DEFAULT_BUFFER_CAP: usize = 1 << 20;

/// A SAT solver that stores the clauses as DIMACS text and delegates the solving to a function.
///
/// The solving function reads the DIMACS instance and returns the output of a SAT solver,
/// using the format of the SAT competitions (`s` and `v` lines).
pub struct BufferedSatSolver {
    n_vars: usize,
    n_clauses: usize,
    clauses: String,
    solving_fn: Box<SolvingFn>,
    listeners: Vec<Box<dyn SolvingListener>>,
    time_limit: Option<Duration>,
}

impl BufferedSatSolver {
    /// Builds a new buffered solver given the solving function.
    pub fn new(solving_fn: Box<SolvingFn>) -> Self {
        Self {
            n_vars: 0,
            n_clauses: 0,
            clauses: String::with_capacity(DEFAULT_BUFFER_CAP),
            solving_fn,
            listeners: Vec::new(),
            time_limit: None,
        }
    }
}

impl SatSolver for BufferedSatSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        cl.iter().for_each(|l| {
            self.n_vars = usize::max(self.n_vars, usize::from(l.var()));
            self.clauses.push_str(&format!("{} ", l));
        });
        self.clauses.push('0');
        self.clauses.push('\n');
        self.n_clauses += 1;
    }

    fn solve(&mut self) -> SolvingResult {
        self.listeners
            .iter()
            .for_each(|l| l.solving_start(self.n_vars(), self.n_clauses));
        let preamble = format!("p cnf {} {}\n", self.n_vars, self.n_clauses);
        let instance_reader = DimacsInstanceRead {
            clauses: Cursor::new(self.clauses.clone()),
            preamble: Cursor::new(preamble),
        };
        let solver_output =
            BufReader::new((self.solving_fn)(instance_reader, self.time_limit));
        let solving_result = read_solver_output(solver_output, self.n_vars);
        self.listeners
            .iter()
            .for_each(|l| l.solving_end(&solving_result));
        solving_result
    }

    fn n_vars(&self) -> usize {
        self.n_vars
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.listeners.push(listener);
    }

    fn reserve(&mut self, new_max_id: usize) {
        if new_max_id > self.n_vars {
            self.n_vars = new_max_id;
        }
    }

    fn set_time_limit(&mut self, limit: Duration) {
        self.time_limit = Some(limit);
    }
}

fn read_solver_output<R>(solver_output: R, n_vars: usize) -> SolvingResult
where
    R: BufRead,
{
    let context = "error while reading solving function output in BufferedSatSolver";
    let mut status = None;
    let mut assignment = vec![None; n_vars];
    let mut assignment_line_seen = false;
    let mut assignment_line_end = false;
    for line in solver_output.lines().map(|r| match r {
        Ok(l) => l,
        Err(e) => panic!("{}: {}", context, e),
    }) {
        let mut set_status = |b| {
            if status.is_some() {
                panic!("{}: multiple status lines", context)
            }
            status = Some(b);
        };
        if line == "s SATISFIABLE" {
            set_status(Some(true));
        } else if line == "s UNSATISFIABLE" {
            set_status(Some(false));
        } else if line == "s UNKNOWN" {
            set_status(None);
        } else if line.starts_with("v ") {
            assignment_line_seen = true;
            line.split_ascii_whitespace().skip(1).for_each(|w| {
                let n = match w.parse::<isize>() {
                    Ok(n) => n,
                    Err(_) => panic!(r#"{}: "{}" is not a literal"#, context, w),
                };
                if n == 0 {
                    if assignment_line_end {
                        panic!("{}: multiple zeroes on value line", context)
                    } else {
                        assignment_line_end = true;
                    }
                } else {
                    let v = n.unsigned_abs() - 1;
                    if v >= n_vars {
                        panic!("{}: a variable in value line is out of bounds", context)
                    }
                    assignment[v] = Some(n > 0);
                }
            });
        } else if !line.starts_with("c ") && line != "c" && line != "v" && !line.is_empty() {
            panic!(r#"{}: unexpected line "{}""#, context, line)
        }
    }
    match status {
        Some(Some(true)) => {
            if assignment_line_seen {
                SolvingResult::Satisfiable(Assignment::new(assignment))
            } else {
                SolvingResult::Unknown
            }
        }
        Some(Some(false)) => SolvingResult::Unsatisfiable,
        Some(None) | None => SolvingResult::Unknown,
    }
}
