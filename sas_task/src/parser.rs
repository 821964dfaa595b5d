use crate::ids::{Fact, VarId};
use crate::state::State;
use crate::task::{SasEffect, SasOperator, SasTask};
use thiserror::Error;

/// A malformed SAS⁺ input file. Every variant carries the 1-indexed source
/// line so a caller can point a user at the offending text; these are fatal
/// (abort, nonzero exit) — no recovery is attempted once one is raised.
#[derive(Debug, Error)]
pub enum InputFormatError {
    #[error("unexpected end of input while parsing a SAS⁺ task")]
    UnexpectedEof,
    #[error("line {line}: expected `{expected}`, found `{found}`")]
    UnexpectedMarker { expected: String, found: String, line: usize },
    #[error("line {line}: expected an integer, found `{text}`")]
    MalformedInteger { line: usize, text: String },
    #[error("line {line}: expected a non-negative integer, found {value}")]
    NegativeWhereNonNegative { line: usize, value: i64 },
    #[error("unsupported SAS file version {found}, only version 3 is supported")]
    UnsupportedVersion { found: i64 },
    #[error("operator `{operator}`, effect {effect_index}: conditional effects are not supported")]
    ConditionalEffectUnsupported { operator: String, effect_index: usize },
    #[error("line {line}: expected `{what}`, found `{text}`")]
    MalformedLine { line: usize, what: &'static str, text: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

struct Cursor<'a> {
    lines: std::str::Lines<'a>,
    line_no: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Cursor { lines: text.lines(), line_no: 0 }
    }

    fn eat(&mut self) -> Result<(usize, &'a str), InputFormatError> {
        self.line_no += 1;
        self.lines
            .next()
            .map(|l| (self.line_no, l.trim()))
            .ok_or(InputFormatError::UnexpectedEof)
    }

    fn expect_marker(&mut self, marker: &str) -> Result<(), InputFormatError> {
        let (line, text) = self.eat()?;
        if text == marker {
            Ok(())
        } else {
            Err(InputFormatError::UnexpectedMarker {
                expected: marker.to_string(),
                found: text.to_string(),
                line,
            })
        }
    }

    fn eat_text(&mut self) -> Result<&'a str, InputFormatError> {
        Ok(self.eat()?.1)
    }

    fn eat_int(&mut self) -> Result<i64, InputFormatError> {
        let (line, text) = self.eat()?;
        text.parse::<i64>()
            .map_err(|_| InputFormatError::MalformedInteger { line, text: text.to_string() })
    }

    fn eat_nonneg(&mut self) -> Result<u32, InputFormatError> {
        let (line, text) = self.eat()?;
        let v: i64 = text
            .parse()
            .map_err(|_| InputFormatError::MalformedInteger { line, text: text.to_string() })?;
        u32::try_from(v).map_err(|_| InputFormatError::NegativeWhereNonNegative { line, value: v })
    }

    fn eat_fact(&mut self) -> Result<(i64, i64), InputFormatError> {
        let (line, text) = self.eat()?;
        let mut parts = text.split_whitespace();
        let var = parts
            .next()
            .ok_or_else(|| InputFormatError::MalformedLine { line, what: "var val", text: text.to_string() })?;
        let val = parts
            .next()
            .ok_or_else(|| InputFormatError::MalformedLine { line, what: "var val", text: text.to_string() })?;
        let var: i64 = var
            .parse()
            .map_err(|_| InputFormatError::MalformedInteger { line, text: var.to_string() })?;
        let val: i64 = val
            .parse()
            .map_err(|_| InputFormatError::MalformedInteger { line, text: val.to_string() })?;
        Ok((var, val))
    }
}

/// Parses the textual SAS⁺ (version 3) format.
pub fn parse_sas_task(text: &str) -> Result<SasTask, InputFormatError> {
    let mut cur = Cursor::new(text);

    // 1. version
    cur.expect_marker("begin_version")?;
    let version = cur.eat_int()?;
    if version != 3 {
        return Err(InputFormatError::UnsupportedVersion { found: version });
    }
    cur.expect_marker("end_version")?;

    // 2. metric (read and discarded beyond the flag itself, which this planner
    // does not special-case: action costs are always present in the format).
    cur.expect_marker("begin_metric")?;
    let _uses_action_costs = cur.eat_int()?;
    cur.expect_marker("end_metric")?;

    // 3. variables
    let num_variables = cur.eat_nonneg()? as usize;
    let mut domains = Vec::with_capacity(num_variables);
    for _ in 0..num_variables {
        cur.expect_marker("begin_variable")?;
        let _name = cur.eat_text()?;
        let _axiom_layer = cur.eat_int()?;
        let domain_size = cur.eat_nonneg()?;
        for _ in 0..domain_size {
            let _value_name = cur.eat_text()?;
        }
        cur.expect_marker("end_variable")?;
        domains.push(domain_size);
    }

    // 4. mutex groups, read and discarded.
    let num_mutex_groups = cur.eat_nonneg()?;
    for _ in 0..num_mutex_groups {
        cur.expect_marker("begin_mutex_group")?;
        let num_facts = cur.eat_nonneg()?;
        for _ in 0..num_facts {
            cur.eat_fact()?;
        }
        cur.expect_marker("end_mutex_group")?;
    }

    // 5. initial state
    cur.expect_marker("begin_state")?;
    let mut initial = Vec::with_capacity(num_variables);
    for _ in 0..num_variables {
        initial.push(cur.eat_nonneg()?);
    }
    cur.expect_marker("end_state")?;

    // 6. goal
    cur.expect_marker("begin_goal")?;
    let num_goal_facts = cur.eat_nonneg()?;
    let mut goal = Vec::with_capacity(num_goal_facts as usize);
    for _ in 0..num_goal_facts {
        let (var, val) = cur.eat_fact()?;
        goal.push(Fact::new(var as u32, val as u32));
    }
    cur.expect_marker("end_goal")?;

    // 7. operators
    let num_operators = cur.eat_nonneg()?;
    let mut operators = Vec::with_capacity(num_operators as usize);
    for _ in 0..num_operators {
        cur.expect_marker("begin_operator")?;
        let name = cur.eat_text()?.to_string();

        let num_prevail = cur.eat_nonneg()?;
        let mut prevail = Vec::with_capacity(num_prevail as usize);
        for _ in 0..num_prevail {
            let (var, val) = cur.eat_fact()?;
            prevail.push(Fact::new(var as u32, val as u32));
        }

        let num_effects = cur.eat_nonneg()?;
        let mut effects = Vec::with_capacity(num_effects as usize);
        for effect_index in 0..num_effects {
            let (line, text) = cur.eat()?;
            let mut parts = text.split_whitespace();
            let mut next_int = |what: &'static str| -> Result<i64, InputFormatError> {
                parts
                    .next()
                    .ok_or(InputFormatError::MalformedLine { line, what, text: text.to_string() })?
                    .parse()
                    .map_err(|_| InputFormatError::MalformedLine { line, what, text: text.to_string() })
            };
            let num_effect_conditions = next_int("effect-condition count")?;
            if num_effect_conditions != 0 {
                return Err(InputFormatError::ConditionalEffectUnsupported {
                    operator: name,
                    effect_index: effect_index as usize,
                });
            }
            let var = next_int("var")?;
            let from = next_int("from")?;
            let to = next_int("to")?;
            effects.push(SasEffect {
                var: VarId(var as u32),
                from: if from == -1 { None } else { Some(from as u32) },
                to: to as u32,
            });
        }

        let cost = cur.eat_nonneg()?;
        cur.expect_marker("end_operator")?;

        operators.push(SasOperator { name, cost, prevail, effects });
    }

    Ok(SasTask {
        domains,
        initial: State::new(initial),
        goal,
        operators,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_STEP: &str = "\
begin_version
3
end_version
begin_metric
1
end_metric
1
begin_variable
var0
-1
2
val0
val1
end_variable
0
begin_state
0
end_state
begin_goal
1
0 1
end_goal
1
begin_operator
a
0
1
0 0 0 1
5
end_operator
";

    #[test]
    fn parses_one_step_scenario() {
        let task = parse_sas_task(ONE_STEP).unwrap();
        assert_eq!(task.domains, vec![2]);
        assert_eq!(task.initial.values(), &[0]);
        assert_eq!(task.goal, vec![Fact::new(0, 1)]);
        assert_eq!(task.operators.len(), 1);
        let op = &task.operators[0];
        assert_eq!(op.name, "a");
        assert_eq!(op.cost, 5);
        assert!(op.prevail.is_empty());
        assert_eq!(op.effects.len(), 1);
        assert_eq!(op.effects[0].from, Some(0));
        assert_eq!(op.effects[0].to, 1);
    }

    #[test]
    fn rejects_wrong_version() {
        let bad = ONE_STEP.replacen("3\nend_version", "2\nend_version", 1);
        let err = parse_sas_task(&bad).unwrap_err();
        assert!(matches!(err, InputFormatError::UnsupportedVersion { found: 2 }));
    }

    #[test]
    fn rejects_missing_marker() {
        let bad = ONE_STEP.replacen("begin_state", "begin_statex", 1);
        let err = parse_sas_task(&bad).unwrap_err();
        assert!(matches!(err, InputFormatError::UnexpectedMarker { .. }));
    }

    #[test]
    fn rejects_conditional_effects() {
        let bad = ONE_STEP.replacen("0 0 0 1", "1 0 0 1", 1);
        let err = parse_sas_task(&bad).unwrap_err();
        assert!(matches!(err, InputFormatError::ConditionalEffectUnsupported { .. }));
    }

    #[test]
    fn trivial_task_with_no_variables_parses() {
        // V=∅, G=∅, O=∅: the empty task still parses.
        let text = "\
begin_version
3
end_version
begin_metric
0
end_metric
0
0
begin_state
end_state
begin_goal
0
end_goal
0
";
        let task = parse_sas_task(text).unwrap();
        assert!(task.domains.is_empty());
        assert!(task.initial.is_empty());
        assert!(task.goal.is_empty());
        assert!(task.operators.is_empty());
    }
}
