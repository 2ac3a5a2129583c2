use crate::{Error, Formula, Mask, Term, Variables};
use std::fmt;

const DEFAULT: &str = "=>";
const MATERIAL: &str = "->";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Conditional {
    antecedent: Formula,
    consequent: Term,
    positive: Option<Mask>,
    exception: Option<Mask>,
}

impl Conditional {
    pub fn new(antecedent: Formula, consequent: Term) -> Self {
        let positive = antecedent.clone().and(consequent).mask();
        let exception = antecedent.clone().and(!consequent).mask();
        Self {
            antecedent,
            consequent,
            positive,
            exception,
        }
    }

    /// `a -> c` is read as the constraint `a and -c => false`.
    pub fn parse(text: &str, variables: &Variables) -> Result<Self, Error> {
        let text = text.trim();
        match text.matches(DEFAULT).count() + text.matches(MATERIAL).count() {
            1 => (),
            0 => {
                return Err(Error::syntax(format!(
                    "\"{}\" has no \"{}\" or \"{}\"",
                    text, DEFAULT, MATERIAL
                )))
            }
            _ => {
                return Err(Error::syntax(format!(
                    "\"{}\" has more than one connective",
                    text
                )))
            }
        }

        let (lhs, rhs, material) = match text.split_once(MATERIAL) {
            Some((lhs, rhs)) => (lhs, rhs, true),
            None => match text.split_once(DEFAULT) {
                Some((lhs, rhs)) => (lhs, rhs, false),
                None => unreachable!(),
            },
        };

        let undeclared = |e: Error| match e {
            Error::UndeclaredVariable(name) => {
                Error::UndeclaredVariable(format!("\"{}\" in \"{}\"", name, text))
            }
            e => e,
        };

        let antecedent = Formula::parse(lhs, variables).map_err(undeclared)?;
        let consequent = match rhs.split_whitespace().collect::<Vec<_>>().as_slice() {
            [token] => Term::parse(token, variables).map_err(undeclared)?,
            [] => {
                return Err(Error::syntax(format!(
                    "\"{}\" has no consequent",
                    text
                )))
            }
            _ => {
                return Err(Error::syntax(format!(
                    "the consequent of \"{}\" must be a single literal",
                    text
                )))
            }
        };

        if material {
            Ok(Conditional::new(
                antecedent.and(!consequent),
                Term::Constant(false),
            ))
        } else {
            Ok(Conditional::new(antecedent, consequent))
        }
    }

    pub fn antecedent(&self) -> &Formula {
        &self.antecedent
    }

    pub fn consequent(&self) -> Term {
        self.consequent
    }

    pub fn positive_formula(&self) -> Formula {
        self.antecedent.clone().and(self.consequent)
    }

    pub fn exception_formula(&self) -> Formula {
        self.antecedent.clone().and(!self.consequent)
    }

    pub fn positive(&self) -> Option<Mask> {
        self.positive
    }

    pub fn exception(&self) -> Option<Mask> {
        self.exception
    }

    pub fn is_constraint(&self) -> bool {
        self.positive_formula().is_false()
    }

    pub fn display<'a>(&'a self, variables: &'a Variables) -> impl fmt::Display + 'a {
        ConditionalDisplay {
            conditional: self,
            variables,
        }
    }
}

struct ConditionalDisplay<'a> {
    conditional: &'a Conditional,
    variables: &'a Variables,
}

impl fmt::Display for ConditionalDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.conditional.antecedent.display(self.variables),
            DEFAULT,
            self.conditional.consequent.display(self.variables)
        )
    }
}

#[cfg(test)]
use crate::{variables::declared, Literal};

#[test]
fn default_conditionals() -> Result<(), Error> {
    let vars = declared("shoot loaded dead");
    let (shoot, loaded, dead) = (
        Literal::new(0, true),
        Literal::new(1, true),
        Literal::new(2, true),
    );

    let c = Conditional::parse("shoot and loaded=>dead", &vars)?;
    assert_eq!(c.antecedent(), &Formula::Conjunction(vec![shoot, loaded]));
    assert_eq!(c.consequent(), Term::Literal(dead));
    assert_eq!(
        c.positive_formula(),
        Formula::Conjunction(vec![shoot, loaded, dead])
    );
    assert_eq!(
        c.exception_formula(),
        Formula::Conjunction(vec![shoot, loaded, !dead])
    );
    assert!(!c.is_constraint());

    let exception = c.exception().unwrap();
    assert!(exception.matches(0b011));
    assert!(!exception.matches(0b111));
    assert!(c.positive().unwrap().matches(0b111));

    Ok(())
}

#[test]
fn constants_simplify() -> Result<(), Error> {
    let vars = declared("a b");
    let a = Literal::new(0, true);

    let vacuous = Conditional::parse("true => a", &vars)?;
    assert_eq!(vacuous.positive_formula(), Formula::Conjunction(vec![a]));
    assert_eq!(vacuous.exception_formula(), Formula::Conjunction(vec![!a]));

    let trivial = Conditional::parse("a => true", &vars)?;
    assert_eq!(trivial.positive_formula(), Formula::Conjunction(vec![a]));
    assert!(trivial.exception_formula().is_false());
    assert_eq!(trivial.exception(), None);

    let constraint = Conditional::parse("a => false", &vars)?;
    assert!(constraint.is_constraint());
    assert_eq!(constraint.exception_formula(), Formula::Conjunction(vec![a]));

    let impossible = Conditional::parse("false => a", &vars)?;
    assert!(impossible.positive_formula().is_false());
    assert!(impossible.exception_formula().is_false());

    let empty = Conditional::parse("=> a", &vars)?;
    assert!(empty.antecedent().is_vacuous());

    Ok(())
}

#[test]
fn material_implication() -> Result<(), Error> {
    let vars = declared("walking alive");
    let (walking, alive) = (Literal::new(0, true), Literal::new(1, true));

    let c = Conditional::parse("walking -> alive", &vars)?;
    assert_eq!(c.antecedent(), &Formula::Conjunction(vec![walking, !alive]));
    assert_eq!(c.consequent(), Term::Constant(false));
    assert!(c.is_constraint());

    // double negation cancels
    let c = Conditional::parse("walking -> -alive", &vars)?;
    assert_eq!(c.antecedent(), &Formula::Conjunction(vec![walking, alive]));

    assert_eq!(
        c.display(&vars).to_string(),
        "walking and alive => false"
    );

    Ok(())
}

#[test]
fn rejected_conditionals() {
    let vars = declared("a b");

    for text in &["a and b", "a => b => a", "a -> b => a", "a =>", "a => b and a", "a => b c"] {
        assert!(
            matches!(Conditional::parse(text, &vars), Err(Error::Syntax(_))),
            "{} should not parse",
            text
        );
    }

    assert_eq!(
        Conditional::parse("a and x => b", &vars),
        Err(Error::UndeclaredVariable(
            "\"x\" in \"a and x => b\"".to_string()
        ))
    );
    assert_eq!(
        Conditional::parse("a -> y", &vars),
        Err(Error::UndeclaredVariable("\"y\" in \"a -> y\"".to_string()))
    );
}
