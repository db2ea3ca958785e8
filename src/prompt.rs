use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Line-oriented user interaction. The workflow only talks to the user
/// through this trait, so sessions can be driven from a script.
pub trait Console: Write {
    /// One line of input without the trailing newline, or `None` at end of
    /// input.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Print `prompt` (no newline) and read the answer, trimmed.
pub fn ask(console: &mut dyn Console, prompt: &str) -> io::Result<Option<String>> {
    write!(console, "{}", prompt)?;
    console.flush()?; // Make sure the prompt is immediately displayed
    Ok(console.read_line()?.map(|line| line.trim().to_string()))
}

/// Yes/no question. Re-asks on anything else; end of input counts as "no".
pub fn prompt_confirm(
    console: &mut dyn Console,
    prompt: &str,
    default: Option<bool>,
) -> io::Result<bool> {
    loop {
        let question = match default {
            Some(true) => format!("{} (Y/n): ", prompt),
            Some(false) | None => format!("{} (y/N): ", prompt),
        };

        let Some(answer) = ask(console, &question)? else {
            return Ok(false);
        };

        match answer.to_uppercase().as_str() {
            "Y" | "YES" => return Ok(true),
            "N" | "NO" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}

/// Reads stdin, writes stdout.
pub struct TerminalConsole {
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for TerminalConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl Console for TerminalConsole {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut input = String::new();
        let read = self.stdin.lock().read_line(&mut input)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Replays canned answers and records everything written.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    output: Vec<u8>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Write for ScriptedConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.inputs.pop_front())
    }
}
