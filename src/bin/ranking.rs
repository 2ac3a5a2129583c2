use std::{
    fs::File,
    io::{BufRead, BufReader},
    time::Instant,
};

use ranking::*;

fn main() -> Result<(), String> {
    #[cfg(feature = "logging")]
    env_logger::init();

    match std::env::args().collect::<Vec<_>>().as_slice() {
        [_, path] => {
            let start = Instant::now();
            let lines = File::open(path)
                .map(|f| BufReader::new(f).lines().filter_map(Result::ok))
                .map_err(|e| format!("{}", e))?;
            run_scenario(lines)?;
            println!("c finished in {}ms", start.elapsed().as_millis());
            Ok(())
        }
        _ => Err("Usage: ranking <scenario file>".into()),
    }
}

fn run_scenario(lines: impl IntoIterator<Item = impl AsRef<str>>) -> Result<(), String> {
    let mut kb = KnowledgeBase::new();

    for (number, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let result = match line.split_once(':') {
            Some(("vars", names)) => kb.declare(names),
            Some(("rules", rules)) => kb.accept(rules),
            Some(("query", query)) => kb.query(query).map(|holds| {
                println!("{}: {}", query.trim(), holds);
            }),
            _ => Err(Error::Syntax(format!("unknown directive \"{}\"", line))),
        };
        result.map_err(|e| format!("line {}: {}", number + 1, e))?;
    }

    Ok(())
}
