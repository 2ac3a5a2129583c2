use crate::{Error, Variable};
use std::{collections::HashMap, ops::Index};

#[derive(Clone, Debug, Default)]
pub struct Variables {
    names: Vec<String>,
    positions: HashMap<String, Variable>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks a declaration without registering anything.
    pub fn parse_declaration<'a>(&self, text: &'a str) -> Result<Vec<&'a str>, Error> {
        let mut fresh: Vec<&str> = Vec::new();
        for name in text.split_whitespace() {
            if !is_identifier(name) {
                return Err(Error::syntax(format!(
                    "\"{}\" is not a valid variable name",
                    name
                )));
            }
            if self.positions.contains_key(name) || fresh.contains(&name) {
                return Err(Error::DuplicateVariable(name.to_string()));
            }
            fresh.push(name);
        }

        if fresh.is_empty() {
            return Err(Error::syntax("declaration names no variables"));
        }
        Ok(fresh)
    }

    pub(crate) fn extend<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.positions.insert(name.to_string(), self.names.len());
            self.names.push(name.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<Variable> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Index<Variable> for Variables {
    type Output = str;

    #[inline]
    fn index(&self, var: Variable) -> &Self::Output {
        &self.names[var]
    }
}

pub(crate) fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && !matches!(name, "and" | "true" | "false")
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
pub(crate) fn declared(names: &str) -> Variables {
    let mut variables = Variables::new();
    let names = variables.parse_declaration(names).unwrap();
    variables.extend(names);
    variables
}

#[test]
fn declaration_order_fixes_positions() -> Result<(), Error> {
    let mut variables = Variables::new();
    let names = variables.parse_declaration("load  sound loaded")?;
    variables.extend(names);

    assert_eq!(variables.len(), 3);
    assert_eq!(variables.get("load"), Some(0));
    assert_eq!(variables.get("loaded"), Some(2));
    assert_eq!(&variables[1], "sound");
    assert_eq!(variables.get("dead"), None);

    let names = variables.parse_declaration("dead")?;
    variables.extend(names);
    assert_eq!(variables.get("dead"), Some(3));

    Ok(())
}

#[test]
fn rejected_declarations() {
    let mut variables = Variables::new();
    variables.extend(vec!["a"]);

    assert_eq!(
        variables.parse_declaration("b a"),
        Err(Error::DuplicateVariable("a".to_string()))
    );
    assert_eq!(
        variables.parse_declaration("c c"),
        Err(Error::DuplicateVariable("c".to_string()))
    );
    assert!(matches!(variables.parse_declaration("-b"), Err(Error::Syntax(_))));
    assert!(matches!(variables.parse_declaration("true"), Err(Error::Syntax(_))));
    assert!(matches!(variables.parse_declaration("a,b"), Err(Error::Syntax(_))));
    assert!(matches!(variables.parse_declaration("   "), Err(Error::Syntax(_))));
    assert_eq!(variables.len(), 1);
}
