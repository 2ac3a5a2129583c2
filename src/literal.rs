use crate::{variables::is_identifier, Config, Error, Variable, Variables};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl From<bool> for Sign {
    #[inline]
    fn from(x: bool) -> Self {
        if x {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

impl std::ops::Not for Sign {
    type Output = Sign;

    fn not(self) -> Self::Output {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

impl Sign {
    fn prefix(self) -> &'static str {
        match self {
            Sign::Positive => "",
            Sign::Negative => "-",
        }
    }
}

/// A variable with a polarity, packed as `var << 1 | positive`.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Literal {
    code: usize,
}

impl Literal {
    pub fn new(var: Variable, sign: impl Into<Sign>) -> Self {
        debug_assert!(var < Config::MAX_VARIABLES);
        let positive = sign.into() == Sign::Positive;
        Literal {
            code: var << 1 | positive as usize,
        }
    }

    #[inline]
    pub fn var(self) -> Variable {
        self.code >> 1
    }

    #[inline]
    pub fn sign(self) -> Sign {
        (self.code & 1 == 1).into()
    }

    /// The world bit the literal constrains.
    #[inline]
    pub fn bit(self) -> usize {
        1 << self.var()
    }

    /// What a world satisfying the literal holds at [`bit`](Literal::bit).
    #[inline]
    pub fn value(self) -> usize {
        (self.code & 1) << self.var()
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            code: self.code ^ 1,
        }
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}v{}", self.sign().prefix(), self.var())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Term {
    Constant(bool),
    Literal(Literal),
}

impl Term {
    /// Reads `name`, `-name`, `true`, `false`, `-true` or `-false`.
    pub fn parse(token: &str, variables: &Variables) -> Result<Term, Error> {
        let (sign, body) = match token.strip_prefix('-') {
            Some(rest) => (Sign::Negative, rest),
            None => (Sign::Positive, token),
        };
        let positive = matches!(sign, Sign::Positive);

        match body {
            "true" => Ok(Term::Constant(positive)),
            "false" => Ok(Term::Constant(!positive)),
            name if is_identifier(name) => match variables.get(name) {
                Some(var) => Ok(Term::Literal(Literal::new(var, sign))),
                None => Err(Error::UndeclaredVariable(name.to_string())),
            },
            _ => Err(Error::syntax(format!("\"{}\" is not a literal", token))),
        }
    }

    pub fn display<'a>(&'a self, variables: &'a Variables) -> impl fmt::Display + 'a {
        TermDisplay {
            term: *self,
            variables,
        }
    }
}

impl std::ops::Not for Term {
    type Output = Term;

    fn not(self) -> Self::Output {
        match self {
            Term::Constant(value) => Term::Constant(!value),
            Term::Literal(literal) => Term::Literal(!literal),
        }
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

struct TermDisplay<'a> {
    term: Term,
    variables: &'a Variables,
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.term {
            Term::Constant(value) => write!(f, "{}", value),
            Term::Literal(literal) => {
                write!(f, "{}{}", literal.sign().prefix(), &self.variables[literal.var()])
            }
        }
    }
}

#[test]
fn literal_bits() {
    let not_f = Literal::new(5, false);
    assert_eq!(not_f.var(), 5);
    assert_eq!(not_f.sign(), Sign::Negative);
    assert_eq!((!not_f).sign(), Sign::Positive);
    assert_eq!(!!not_f, not_f);

    assert_eq!(not_f.bit(), 0b100000);
    assert_eq!(not_f.value(), 0);
    assert_eq!((!not_f).value(), 0b100000);
    assert_eq!(format!("{:?}", not_f), "-v5");

    // opposite literals sort next to each other, negative first
    assert!(not_f < !not_f && !not_f < Literal::new(6, false));
}

#[test]
fn parse_terms() -> Result<(), Error> {
    let vars = crate::variables::declared("alive loaded");

    assert_eq!(
        Term::parse("loaded", &vars)?,
        Term::Literal(Literal::new(1, true))
    );
    assert_eq!(
        Term::parse("-alive", &vars)?,
        Term::Literal(Literal::new(0, false))
    );
    assert_eq!(Term::parse("true", &vars)?, Term::Constant(true));
    assert_eq!(Term::parse("-true", &vars)?, Term::Constant(false));
    assert_eq!(Term::parse("-false", &vars)?, Term::Constant(true));

    assert_eq!(
        Term::parse("dead", &vars),
        Err(Error::UndeclaredVariable("dead".to_string()))
    );
    assert!(matches!(Term::parse("-", &vars), Err(Error::Syntax(_))));
    assert!(matches!(Term::parse("--alive", &vars), Err(Error::Syntax(_))));
    assert!(matches!(Term::parse("a=>b", &vars), Err(Error::Syntax(_))));

    Ok(())
}

#[test]
fn display_terms() -> Result<(), Error> {
    let vars = crate::variables::declared("alive loaded");
    let term = Term::parse("-loaded", &vars)?;
    assert_eq!(term.display(&vars).to_string(), "-loaded");
    assert_eq!((!term).display(&vars).to_string(), "loaded");
    assert_eq!(Term::Constant(false).display(&vars).to_string(), "false");
    Ok(())
}
