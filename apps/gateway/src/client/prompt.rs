use std::io::{self, BufRead, Write};

/// User interaction used by the session: blocking notifications and yes/no questions.
pub trait Prompter: Send + Sync {
    fn alert(&self, message: &str);
    fn confirm(&self, question: &str) -> bool;
}

/// Terminal prompter. With `assume_yes`, every confirmation is accepted.
pub struct TerminalPrompter {
    pub assume_yes: bool,
}

impl Prompter for TerminalPrompter {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{question} [y/N] ");
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}
