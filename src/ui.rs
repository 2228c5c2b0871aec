use std::io::{self, BufRead, Write};

/// Where commands send their text. Output and errors are separate streams so
/// callers (and tests) can tell them apart.
pub trait Ui {
    fn output(&mut self, message: &str);
    fn error(&mut self, message: &str);
    /// Show `query` and read one line of input.
    fn ask(&mut self, query: &str) -> io::Result<String>;
}

/// Terminal-backed `Ui`: stdout, stderr and stdin.
#[derive(Debug, Default)]
pub struct ConsoleUi;

impl Ui for ConsoleUi {
    fn output(&mut self, message: &str) {
        println!("{}", message);
    }

    fn error(&mut self, message: &str) {
        eprintln!("{}", message);
    }

    fn ask(&mut self, query: &str) -> io::Result<String> {
        print!("{}", query);
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Captures everything written to it. Answers for `ask` are replayed in order;
/// once they run out, `ask` returns an empty line.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockUi {
    pub output: String,
    pub error: String,
    answers: std::collections::VecDeque<String>,
}

#[cfg(test)]
impl MockUi {
    pub fn with_answers(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl Ui for MockUi {
    fn output(&mut self, message: &str) {
        self.output.push_str(message);
        self.output.push('\n');
    }

    fn error(&mut self, message: &str) {
        self.error.push_str(message);
        self.error.push('\n');
    }

    fn ask(&mut self, query: &str) -> io::Result<String> {
        self.output.push_str(query);
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}
