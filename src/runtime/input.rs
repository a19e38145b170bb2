//! Input providers for `Input` nodes.

use std::collections::VecDeque;

use crate::expression::Variable;

/// Supplies text for `Input` nodes.
pub trait InputSource {
    /// Returns the next line for `variable`, or `None` if no input is left.
    fn read_line(&mut self, variable: &Variable) -> Option<String>;
}

/// Replays a fixed list of lines in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    /// Creates a source returning `lines` in order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedInput {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Lines not read yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self, _variable: &Variable) -> Option<String> {
        self.lines.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::VariableType;

    #[test]
    fn test_scripted_input_in_order() {
        let var = Variable::scalar("x", "x", VariableType::String);
        let mut input = ScriptedInput::new(["a", "b"]);
        assert_eq!(input.read_line(&var).as_deref(), Some("a"));
        assert_eq!(input.remaining(), 1);
        assert_eq!(input.read_line(&var).as_deref(), Some("b"));
        assert_eq!(input.read_line(&var), None);
    }
}
