use crate::{
    builder::{BuilderError, BuilderOperator, MutableClause},
    clause::Clause,
};

///
/// BuildState
///
/// Where the builder is in the token stream. `Clause` remembers the
/// connective that was just pushed.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildState {
    Start,
    Not,
    Operator,
    Clause(BuilderOperator),
    StartGroup,
    Illegal,
}

impl BuildState {
    // Token naming the state on the left side of an illegal pair.
    const fn token(self) -> &'static str {
        match self {
            Self::Start => "",
            Self::Not => "NOT",
            Self::Operator => "<clause>",
            Self::Clause(op) => op.as_str(),
            Self::StartGroup => "(",
            Self::Illegal => "<illegal>",
        }
    }
}

///
/// PrecedenceBuilder
///
/// Shunting-Yard state machine turning an ordered stream of builder events
/// into a clause tree that respects `NOT > AND > OR`. Owns an operator
/// stack, an operand stack, the open-group depth and the current state.
///
/// `build` reduces a private copy of both stacks, so it can be called
/// repeatedly and interleaved with further events.
///

#[derive(Clone, Debug)]
pub struct PrecedenceBuilder {
    operators: Vec<BuilderOperator>,
    operands: Vec<MutableClause>,
    level: usize,
    state: BuildState,
    default_operator: Option<BuilderOperator>,
    tokens: Vec<String>,
}

impl Default for PrecedenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PrecedenceBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            operators: Vec::new(),
            operands: Vec::new(),
            level: 0,
            state: BuildState::Start,
            default_operator: None,
            tokens: Vec::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> BuildState {
        self.state
    }

    /// Number of currently open sub-expressions.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub const fn default_operator(&self) -> Option<BuilderOperator> {
        self.default_operator
    }

    /// Tokens accepted so far, for diagnostics.
    #[must_use]
    pub fn partial(&self) -> String {
        self.tokens.join(" ")
    }

    // ------------------------------------------------------------------
    // Default combine operator
    // ------------------------------------------------------------------

    pub const fn default_and(&mut self) {
        self.default_operator = Some(BuilderOperator::And);
    }

    pub const fn default_or(&mut self) {
        self.default_operator = Some(BuilderOperator::Or);
    }

    pub const fn default_none(&mut self) {
        self.default_operator = None;
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn not(&mut self) -> Result<(), BuilderError> {
        match self.state {
            BuildState::Start | BuildState::Not | BuildState::Clause(_) | BuildState::StartGroup => {
            }
            BuildState::Operator => {
                self.implicit_operator("cannot add NOT directly after a clause")?;
            }
            BuildState::Illegal => return Err(self.illegal_state()),
        }
        self.tokens.push(BuilderOperator::Not.as_str().to_string());
        self.enter(BuildState::Not);

        Ok(())
    }

    pub fn and(&mut self) -> Result<(), BuilderError> {
        self.connective(BuilderOperator::And)
    }

    pub fn or(&mut self) -> Result<(), BuilderError> {
        self.connective(BuilderOperator::Or)
    }

    pub fn clause(&mut self, clause: impl Into<Clause>) -> Result<(), BuilderError> {
        let clause = clause.into();
        match self.state {
            BuildState::Start | BuildState::Not | BuildState::Clause(_) | BuildState::StartGroup => {
            }
            BuildState::Operator => {
                self.implicit_operator("two clauses with no operator between them")?;
            }
            BuildState::Illegal => return Err(self.illegal_state()),
        }
        self.tokens.push(clause.to_string());
        self.operands.push(MutableClause::single(clause));
        self.enter(BuildState::Operator);

        Ok(())
    }

    /// Open a sub-expression.
    pub fn sub(&mut self) -> Result<(), BuilderError> {
        match self.state {
            BuildState::Start | BuildState::Not | BuildState::Clause(_) | BuildState::StartGroup => {
            }
            BuildState::Operator => {
                self.implicit_operator("cannot open a sub-expression directly after a clause")?;
            }
            BuildState::Illegal => return Err(self.illegal_state()),
        }
        self.tokens.push(BuilderOperator::LParen.as_str().to_string());
        self.level += 1;
        self.enter(BuildState::StartGroup);

        Ok(())
    }

    /// Close the innermost sub-expression.
    pub fn endsub(&mut self) -> Result<(), BuilderError> {
        match self.state {
            BuildState::Operator if self.level > 0 => {}
            BuildState::Operator => {
                return Err(self.illegal("no open sub-expression to close"));
            }
            BuildState::StartGroup => return Err(self.illegal("empty sub-expression")),
            BuildState::Illegal => return Err(self.illegal_state()),
            state => {
                return Err(self.illegal(format!(
                    "cannot close a sub-expression after '{}'",
                    state.token()
                )));
            }
        }
        self.reduce_in_place(BuilderOperator::RParen)?;
        self.tokens.push(BuilderOperator::RParen.as_str().to_string());
        self.level -= 1;

        Ok(())
    }

    /// Reduce a copy of the stacks to one clause. `Ok(None)` means nothing
    /// was ever added.
    pub fn build(&self) -> Result<Option<Clause>, BuilderError> {
        match self.state {
            BuildState::Start if self.operands.is_empty() => return Ok(None),
            BuildState::Operator if self.level == 0 => {}
            BuildState::Operator => {
                return Err(self.illegal(format!(
                    "cannot build with {} unclosed sub-expression(s)",
                    self.level
                )));
            }
            BuildState::Illegal => return Err(self.illegal_state()),
            _ => return Err(self.illegal("cannot build an incomplete condition")),
        }

        let mut operators = self.operators.clone();
        let mut operands = self.operands.clone();
        reduce(&mut operators, &mut operands, BuilderOperator::None)
            .map_err(|message| self.illegal(message))?;

        match (operands.pop(), operands.is_empty()) {
            (Some(root), true) => Ok(root.as_clause()),
            _ => Err(self.illegal("reduction did not produce exactly one clause")),
        }
    }

    /// Fully independent copy of the builder state.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn connective(&mut self, op: BuilderOperator) -> Result<(), BuilderError> {
        match self.state {
            BuildState::Operator => {}
            BuildState::Start => {
                return Err(self.illegal(format!("cannot start a condition with {op}")));
            }
            BuildState::Illegal => return Err(self.illegal_state()),
            state => {
                return Err(self.illegal(format!(
                    "illegal operator sequence '{} {op}'",
                    state.token()
                )));
            }
        }
        self.reduce_in_place(op)?;
        self.tokens.push(op.as_str().to_string());
        self.enter(BuildState::Clause(op));

        Ok(())
    }

    // Insert the configured default connective, or fail with `message`.
    fn implicit_operator(&mut self, message: &str) -> Result<(), BuilderError> {
        let Some(op) = self.default_operator else {
            return Err(self.illegal(message));
        };
        self.reduce_in_place(op)?;
        self.tokens.push(op.as_str().to_string());

        Ok(())
    }

    // Switch state; entering `Not` or `StartGroup` pushes its operator.
    fn enter(&mut self, next: BuildState) {
        match next {
            BuildState::Not => self.operators.push(BuilderOperator::Not),
            BuildState::StartGroup => self.operators.push(BuilderOperator::LParen),
            BuildState::Start
            | BuildState::Operator
            | BuildState::Clause(_)
            | BuildState::Illegal => {}
        }
        self.state = next;
    }

    fn reduce_in_place(&mut self, incoming: BuilderOperator) -> Result<(), BuilderError> {
        if let Err(message) = reduce(&mut self.operators, &mut self.operands, incoming) {
            let err = self.illegal(message);
            self.state = BuildState::Illegal;
            return Err(err);
        }

        Ok(())
    }

    fn illegal(&self, message: impl Into<String>) -> BuilderError {
        BuilderError::IllegalState {
            message: message.into(),
            partial: self.partial(),
        }
    }

    fn illegal_state(&self) -> BuilderError {
        self.illegal("builder is in an illegal state and must be cleared")
    }
}

/// Reduce the stacks ahead of pushing `incoming`.
///
/// `None` finalizes (reduce everything, push nothing), `RParen` reduces to
/// and removes the matching `LParen`, `And` / `Or` reduce while the top
/// binds at least as tightly and are then pushed. `Not` is right-associative
/// so it only yields to strictly looser incoming operators.
fn reduce(
    operators: &mut Vec<BuilderOperator>,
    operands: &mut Vec<MutableClause>,
    incoming: BuilderOperator,
) -> Result<(), String> {
    while let Some(&top) = operators.last() {
        if top == BuilderOperator::LParen {
            match incoming {
                BuilderOperator::RParen => {
                    operators.pop();
                    return Ok(());
                }
                BuilderOperator::None => return Err("unbalanced sub-expression".to_string()),
                _ => break,
            }
        }

        let yields = if top == BuilderOperator::Not {
            incoming.rank() < top.rank()
        } else {
            incoming.rank() <= top.rank()
        };
        if !yields {
            break;
        }

        operators.pop();
        apply(top, operands)?;
    }

    match incoming {
        BuilderOperator::RParen => Err("no matching sub-expression to close".to_string()),
        BuilderOperator::And | BuilderOperator::Or => {
            operators.push(incoming);
            Ok(())
        }
        BuilderOperator::None | BuilderOperator::LParen | BuilderOperator::Not => Ok(()),
    }
}

fn apply(op: BuilderOperator, operands: &mut Vec<MutableClause>) -> Result<(), String> {
    let reduced = if op == BuilderOperator::Not {
        let inner = operands.pop().ok_or("NOT without an operand")?;
        inner.combine(op, None)
    } else {
        let right = operands.pop().ok_or_else(|| format!("{op} without a right operand"))?;
        let left = operands.pop().ok_or_else(|| format!("{op} without a left operand"))?;
        left.combine(op, Some(right))
    };
    operands.push(reduced.map_err(|err| err.to_string())?);

    Ok(())
}
