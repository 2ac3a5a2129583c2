mod mask;

pub use mask::Mask;

use crate::{Error, Literal, Term, Variables};
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Formula {
    False,
    Conjunction(Vec<Literal>),
}

impl Formula {
    pub fn vacuous() -> Self {
        Formula::Conjunction(Vec::new())
    }

    pub fn parse(text: &str, variables: &Variables) -> Result<Formula, Error> {
        let mut tokens = text.split_whitespace();
        let mut formula = match tokens.next() {
            Some(token) => Formula::vacuous().and(Term::parse(token, variables)?),
            None => return Ok(Formula::vacuous()),
        };

        loop {
            match (tokens.next(), tokens.next()) {
                (None, _) => return Ok(formula),
                (Some("and"), Some(token)) => {
                    formula = formula.and(Term::parse(token, variables)?)
                }
                (Some("and"), None) => {
                    return Err(Error::syntax(format!(
                        "dangling \"and\" in \"{}\"",
                        text.trim()
                    )))
                }
                (Some(_), _) => {
                    return Err(Error::syntax(format!(
                        "expected \"and\" between literals in \"{}\"",
                        text.trim()
                    )))
                }
            }
        }
    }

    /// Conjoins a term, keeping literals sorted and unique.
    pub fn and(self, term: Term) -> Formula {
        match (self, term) {
            (Formula::False, _) | (_, Term::Constant(false)) => Formula::False,
            (formula, Term::Constant(true)) => formula,
            (Formula::Conjunction(mut literals), Term::Literal(literal)) => {
                if let Err(position) = literals.binary_search(&literal) {
                    literals.insert(position, literal);
                }
                Formula::Conjunction(literals)
            }
        }
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Formula::False)
    }

    pub fn is_vacuous(&self) -> bool {
        matches!(self, Formula::Conjunction(literals) if literals.is_empty())
    }

    /// `None` when no world satisfies the formula.
    pub fn mask(&self) -> Option<Mask> {
        match self {
            Formula::False => None,
            Formula::Conjunction(literals) => literals
                .iter()
                .try_fold(Mask::FREE, |mask, literal| mask.with(*literal)),
        }
    }

    pub fn display<'a>(&'a self, variables: &'a Variables) -> impl fmt::Display + 'a {
        FormulaDisplay {
            formula: self,
            variables,
        }
    }
}

struct FormulaDisplay<'a> {
    formula: &'a Formula,
    variables: &'a Variables,
}

impl fmt::Display for FormulaDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.formula {
            Formula::False => write!(f, "false"),
            Formula::Conjunction(literals) if literals.is_empty() => write!(f, "true"),
            Formula::Conjunction(literals) => {
                for (i, literal) in literals.iter().enumerate() {
                    if i > 0 {
                        write!(f, " and ")?;
                    }
                    write!(f, "{}", Term::from(*literal).display(self.variables))?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
use crate::variables::declared;

#[test]
fn parse_conjunctions() -> Result<(), Error> {
    let vars = declared("a b c");
    let (a, b, c) = (
        Literal::new(0, true),
        Literal::new(1, true),
        Literal::new(2, true),
    );

    assert_eq!(
        Formula::parse("c and -a and b", &vars)?,
        Formula::Conjunction(vec![!a, b, c])
    );
    assert_eq!(
        Formula::parse("a and a", &vars)?,
        Formula::Conjunction(vec![a])
    );
    assert_eq!(
        Formula::parse("a and true and b", &vars)?,
        Formula::Conjunction(vec![a, b])
    );
    assert!(Formula::parse("", &vars)?.is_vacuous());
    assert!(Formula::parse(" true ", &vars)?.is_vacuous());
    assert!(Formula::parse("a and false and b", &vars)?.is_false());
    assert!(Formula::parse("a and -true", &vars)?.is_false());

    Ok(())
}

#[test]
fn malformed_conjunctions() {
    let vars = declared("a b");

    for text in &["and", "a and", "and a", "a b", "a and and b", "a or b"] {
        assert!(
            matches!(Formula::parse(text, &vars), Err(Error::Syntax(_))),
            "{} should not parse",
            text
        );
    }
    assert_eq!(
        Formula::parse("a and z", &vars),
        Err(Error::UndeclaredVariable("z".to_string()))
    );
}

#[test]
fn contradictions_have_no_mask() -> Result<(), Error> {
    let vars = declared("a b");

    assert_eq!(Formula::parse("a and -a", &vars)?.mask(), None);
    assert_eq!(Formula::parse("false", &vars)?.mask(), None);
    assert_eq!(Formula::parse("true", &vars)?.mask(), Some(Mask::FREE));

    let mask = Formula::parse("-a and b", &vars)?.mask().unwrap();
    assert!(mask.matches(0b10));
    assert!(!mask.matches(0b11));

    Ok(())
}

#[test]
fn display_round_trips_text() -> Result<(), Error> {
    let vars = declared("a b c");
    let formula = Formula::parse("c and -a", &vars)?;
    assert_eq!(formula.display(&vars).to_string(), "-a and c");
    assert_eq!(Formula::vacuous().display(&vars).to_string(), "true");
    assert_eq!(Formula::False.display(&vars).to_string(), "false");
    Ok(())
}
