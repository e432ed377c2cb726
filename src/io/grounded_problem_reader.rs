use super::{warning_result::WarningResult, InstanceReader, WarningHandler};
use crate::planning::{FluentSet, PlanningProblem};
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    collections::HashMap,
    io::{BufRead, BufReader, Read},
};

const NAME_PATTERN: &str = r"[_[:alpha:]][-_[:alnum:]]*";

lazy_static! {
    static ref DECLARATION_LINE_PATTERN: Regex =
        Regex::new(r"^\s*(fluent|operator|pre|eff|init|goal)\s*\(([^()]*)\)\s*\.\s*$").unwrap();
    static ref NAME_ARG_PATTERN: Regex =
        Regex::new(&format!(r"^\s*({})\s*$", NAME_PATTERN)).unwrap();
    static ref LITERAL_ARG_PATTERN: Regex =
        Regex::new(&format!(r"^\s*(-?)\s*({})\s*$", NAME_PATTERN)).unwrap();
    static ref CONDITION_ARGS_PATTERN: Regex = Regex::new(&format!(
        r"^\s*({})\s*,\s*(-?)\s*({})\s*$",
        NAME_PATTERN, NAME_PATTERN
    ))
    .unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Declaration {
    Fluent(String),
    Operator(String),
    Precondition(String, String, bool),
    Effect(String, String, bool),
    Init(String, bool),
    Goal(String, bool),
}

fn read_name(args: &str) -> Option<String> {
    NAME_ARG_PATTERN
        .captures(args)
        .map(|c| c.get(1).unwrap().as_str().to_string())
}

fn read_literal(args: &str) -> Option<(String, bool)> {
    LITERAL_ARG_PATTERN.captures(args).map(|c| {
        (
            c.get(2).unwrap().as_str().to_string(),
            c.get(1).unwrap().as_str().is_empty(),
        )
    })
}

fn read_condition(args: &str) -> Option<(String, String, bool)> {
    CONDITION_ARGS_PATTERN.captures(args).map(|c| {
        (
            c.get(1).unwrap().as_str().to_string(),
            c.get(3).unwrap().as_str().to_string(),
            c.get(2).unwrap().as_str().is_empty(),
        )
    })
}

fn try_read_declaration_line<T>(l: T) -> Result<Option<WarningResult<Declaration, String>>>
where
    T: AsRef<str>,
{
    let captures = match DECLARATION_LINE_PATTERN.captures(l.as_ref()) {
        Some(c) => c,
        None => return Ok(None),
    };
    let keyword = captures.get(1).unwrap().as_str();
    let args = captures.get(2).unwrap().as_str();
    let invalid_args = || anyhow!("invalid arguments for {} in {}", keyword, l.as_ref().trim());
    let declaration = match keyword {
        "fluent" => WarningResult::Ok(Declaration::Fluent(
            read_name(args).ok_or_else(invalid_args)?,
        )),
        "operator" => WarningResult::Ok(Declaration::Operator(
            read_name(args).ok_or_else(invalid_args)?,
        )),
        "pre" => {
            let (op, f, p) = read_condition(args).ok_or_else(invalid_args)?;
            WarningResult::Ok(Declaration::Precondition(op, f, p))
        }
        "eff" => {
            let (op, f, p) = read_condition(args).ok_or_else(invalid_args)?;
            WarningResult::Ok(Declaration::Effect(op, f, p))
        }
        "init" => {
            let (f, p) = read_literal(args).ok_or_else(invalid_args)?;
            if p {
                WarningResult::Ok(Declaration::Init(f, p))
            } else {
                WarningResult::Warned(
                    Declaration::Init(f, p),
                    vec![
                        "negative initial fluents are ignored since fluents are false by default"
                            .to_string(),
                    ],
                )
            }
        }
        "goal" => {
            let (f, p) = read_literal(args).ok_or_else(invalid_args)?;
            WarningResult::Ok(Declaration::Goal(f, p))
        }
        _ => unreachable!(),
    };
    Ok(Some(declaration))
}

/// A reader for grounded planning problems.
///
/// This object is used to read a [`PlanningProblem`] given by the list of its fluents, its operators, its initial state and its goal.
/// The [LabelType](crate::planning::LabelType) of the returned problems is [String].
///
/// # Format
///
/// Each non-empty line contains a single declaration; lines beginning by `%` are comments.
/// Names begin with a letter or an underscore, followed by letters, digits, underscores and dashes.
/// A dash before a fluent name stands for the fluent being false.
///
/// * `fluent(f).` declares the fluent `f`;
/// * `operator(o).` declares the operator `o`;
/// * `pre(o, f).` (resp. `pre(o, -f).`) states `f` must be true (resp. false) for `o` to be applicable;
/// * `eff(o, f).` (resp. `eff(o, -f).`) states `o` sets `f` to true (resp. false);
/// * `init(f).` states `f` is true in the initial state; other fluents are initially false;
/// * `goal(f).` (resp. `goal(-f).`) states `f` must be true (resp. false) at the end of the plan.
///
/// Declarations may appear in any order.
/// Fluents and operators get their ids in the order they are declared.
///
/// The following content defines a problem where a single action is needed to leave home.
///
/// ```text
/// fluent(at-home).
/// operator(go-to-work).
/// pre(go-to-work, at-home).
/// eff(go-to-work, -at-home).
/// init(at-home).
/// goal(-at-home).
/// ```
///
/// # Example
///
/// ```
/// # use satplan::io::{GroundedProblemReader, InstanceReader};
/// # use satplan::planning::PlanningProblem;
/// fn read_problem_from_str(s: &str) -> PlanningProblem<String> {
///     let reader = GroundedProblemReader::default();
///     reader.read(&mut s.as_bytes()).expect("invalid problem")
/// }
/// # read_problem_from_str("fluent(a).\ngoal(a).");
/// ```
#[derive(Default)]
pub struct GroundedProblemReader {
    warning_handlers: Vec<WarningHandler>,
}

impl GroundedProblemReader {
    fn warn(&self, line: usize, warning: String) {
        self.warning_handlers
            .iter()
            .for_each(|h| (h)(line, warning.clone()));
    }

    fn read_declarations(&self, reader: &mut dyn Read) -> Result<Vec<(usize, Declaration)>> {
        let mut declarations = vec![];
        let br = BufReader::new(reader);
        for (i, line) in br.lines().enumerate() {
            let context = || format!("while reading line {}", i + 1);
            let l = &line.with_context(context)?;
            let trimmed = l.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') {
                continue;
            }
            match try_read_declaration_line(l).with_context(context)? {
                Some(d) => declarations.push((
                    i + 1,
                    d.consume_warnings(|warnings| {
                        warnings.into_iter().for_each(|w| self.warn(i + 1, w))
                    }),
                )),
                None => {
                    return Err(anyhow!("syntax error in line \"{}\"", trimmed))
                        .with_context(context)
                }
            }
        }
        Ok(declarations)
    }
}

type Conditions = (Vec<(String, bool)>, Vec<(String, bool)>);

impl InstanceReader<String> for GroundedProblemReader {
    fn read(&self, reader: &mut dyn Read) -> Result<PlanningProblem<String>> {
        let declarations = self.read_declarations(reader)?;
        let mut fluent_set = FluentSet::default();
        let mut operator_labels = vec![];
        let mut operator_conditions: HashMap<String, Conditions> = HashMap::new();
        for (line, d) in declarations.iter() {
            match d {
                Declaration::Fluent(f) => {
                    if fluent_set.contains(f) {
                        self.warn(*line, format!("fluent {} is already declared", f));
                    } else {
                        fluent_set.new_fluent(f.clone());
                    }
                }
                Declaration::Operator(o) => {
                    if operator_conditions.contains_key(o) {
                        self.warn(*line, format!("operator {} is already declared", o));
                    } else {
                        operator_labels.push(o.clone());
                        operator_conditions.insert(o.clone(), (vec![], vec![]));
                    }
                }
                _ => {}
            }
        }
        let check_fluent = |line: usize, f: &String| {
            if fluent_set.contains(f) {
                Ok(())
            } else {
                Err(anyhow!("undeclared fluent {}", f))
                    .with_context(|| format!("while reading line {}", line))
            }
        };
        let mut initially_true = vec![];
        let mut goal = vec![];
        for (line, d) in declarations.iter() {
            match d {
                Declaration::Fluent(_) | Declaration::Operator(_) => {}
                Declaration::Precondition(o, f, p) | Declaration::Effect(o, f, p) => {
                    check_fluent(*line, f)?;
                    let conditions = operator_conditions.get_mut(o).ok_or_else(|| {
                        anyhow!("undeclared operator {}", o)
                            .context(format!("while reading line {}", line))
                    })?;
                    if matches!(d, Declaration::Precondition(..)) {
                        conditions.0.push((f.clone(), *p));
                    } else {
                        conditions.1.push((f.clone(), *p));
                    }
                }
                Declaration::Init(f, p) => {
                    check_fluent(*line, f)?;
                    if *p {
                        initially_true.push(f);
                    }
                }
                Declaration::Goal(f, p) => {
                    check_fluent(*line, f)?;
                    goal.push((*line, f, *p));
                }
            }
        }
        let mut problem = PlanningProblem::new_with_fluent_set(fluent_set);
        for o in operator_labels.into_iter() {
            let (preconditions, effects) = operator_conditions.remove(&o).unwrap_or_default();
            problem.new_operator(o, &preconditions, &effects)?;
        }
        for f in initially_true {
            problem.set_initially_true(f)?;
        }
        for (line, f, p) in goal {
            problem
                .add_goal(f, p)
                .with_context(|| format!("while reading line {}", line))?;
        }
        Ok(problem)
    }

    fn add_warning_handler(&mut self, h: WarningHandler) {
        self.warning_handlers.push(h);
    }
}
