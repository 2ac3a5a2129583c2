
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    Syntax(String),

    UndeclaredVariable(String),

    DuplicateVariable(String),

    TooManyVariables { requested: usize, limit: usize },
}

impl Error {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Error::Syntax(message.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Syntax(message) => write!(f, "syntax error: {}", message),
            Error::UndeclaredVariable(message) => write!(f, "undeclared variable: {}", message),
            Error::DuplicateVariable(name) => write!(f, "variable \"{}\" is already declared", name),
            Error::TooManyVariables { requested, limit } => write!(
                f,
                "declaring {} variables exceeds the limit of {}",
                requested, limit
            ),
        }
    }
}

impl std::error::Error for Error {}

#[test]
fn messages_name_the_offender() {
    let undeclared = Error::UndeclaredVariable("\"x\" in \"x => y\"".to_string());
    assert_eq!(
        undeclared.to_string(),
        "undeclared variable: \"x\" in \"x => y\""
    );

    let too_many = Error::TooManyVariables {
        requested: 30,
        limit: 20,
    };
    assert_eq!(
        too_many.to_string(),
        "declaring 30 variables exceeds the limit of 20"
    );
}
