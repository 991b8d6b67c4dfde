//! Line-oriented prompting over any reader/writer pair.
//!
//! End of input is reported as `None` so menus can unwind instead of
//! re-prompting forever.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Writes one line.
    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Writes `prompt` without a newline and reads one line of input.
    ///
    /// The trailing line terminator is stripped.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Lists numbered options and reads a selection until it is valid.
    ///
    /// Returns the zero-based index of the chosen option.
    pub fn select<S: AsRef<str>>(
        &mut self,
        options: &[S],
        indented: bool,
    ) -> io::Result<Option<usize>> {
        let tab = if indented { "\t" } else { "" };
        loop {
            for (index, option) in options.iter().enumerate() {
                writeln!(self.output, "{tab}{}) {}", index + 1, option.as_ref())?;
            }
            let Some(answer) = self.ask("Selection: ")? else {
                return Ok(None);
            };
            match answer.trim().parse::<usize>() {
                Ok(choice) if (1..=options.len()).contains(&choice) => {
                    return Ok(Some(choice - 1));
                }
                _ => self.say("Invalid selection, please select again")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Prompter;
    use std::io::Cursor;

    #[test]
    fn ask_strips_line_terminators_and_reports_eof() {
        let mut prompter = Prompter::new(Cursor::new("Steel\r\n"), Vec::new());
        assert_eq!(prompter.ask("Name: ").unwrap().as_deref(), Some("Steel"));
        assert_eq!(prompter.ask("Name: ").unwrap(), None);
    }

    #[test]
    fn select_reprompts_until_valid() {
        let mut prompter = Prompter::new(Cursor::new("0\nabc\n4\n2\n"), Vec::new());
        let choice = prompter.select(&["A", "B", "C"], true).unwrap();
        assert_eq!(choice, Some(1));

        let output = String::from_utf8(prompter.into_output()).unwrap();
        assert_eq!(
            output.matches("Invalid selection, please select again").count(),
            3
        );
        assert!(output.contains("\t1) A\n\t2) B\n\t3) C\n"));
    }

    #[test]
    fn select_returns_none_at_end_of_input() {
        let mut prompter = Prompter::new(Cursor::new("9\n"), Vec::new());
        assert_eq!(prompter.select(&["A"], false).unwrap(), None);
    }
}
