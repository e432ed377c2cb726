//! Satplan is a SAT-based classical planner.
//!
//! Given a grounded planning problem, the planner looks for a plan by encoding the existence of a plan of a given horizon into SAT,
//! for increasing horizons, until a SAT solver finds a model.
//! The model of the smallest satisfiable horizon is then decoded into a plan.
//!
//! ```
//! # use satplan::io::{GroundedProblemReader, InstanceReader};
//! # use satplan::solvers::{HorizonSearch, PlannerConfig, SearchOutcome};
//! let instance = r#"
//! fluent(p).
//! fluent(q).
//! operator(make-p).
//! operator(make-q).
//! eff(make-p, p).
//! eff(make-q, q).
//! goal(p).
//! goal(q).
//! "#;
//! let problem = GroundedProblemReader::default()
//!     .read(&mut instance.as_bytes())
//!     .unwrap();
//! let mut search = HorizonSearch::new(&problem, PlannerConfig::default()).unwrap();
//! match search.run() {
//!     SearchOutcome::PlanFound { horizon, plan } => {
//!         assert_eq!(1, horizon);
//!         assert_eq!(2, plan.n_actions());
//!         plan.validate(&problem).unwrap();
//!     }
//!     _ => panic!(),
//! }
//! ```

#![warn(missing_docs)]

pub mod encodings;

pub mod io;

pub mod planning;

pub mod sat;

pub mod solvers;
