use std::io::{self, BufRead, Write};

use termion::{color, style};

use crate::{
    config::Config,
    error::{report, ShellError},
    parse::parse_command_with,
    process::fork::ForkExec,
    signals,
};

/// Ends the read loop when it is the first word of a line.
pub const EXIT_COMMAND: &str = "exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct State {
    pub config: Config,
    spawner: ForkExec,
}

impl State {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            spawner: ForkExec,
        }
    }

    /// Writes `<cwd><prompt>`, colouring the directory on a terminal.
    pub fn render<W: Write>(&self, stdout: &mut W) -> io::Result<()> {
        let cwd = std::env::current_dir()
            .map(|cwd| cwd.display().to_string())
            .unwrap_or_else(|_| "?".into());

        if termion::is_tty(&io::stdout()) {
            write!(
                stdout,
                "{}{}{}{}{}",
                style::Bold,
                color::Fg(color::Blue),
                cwd,
                style::Reset,
                self.config.prompt
            )?;
        } else {
            write!(stdout, "{}{}", cwd, self.config.prompt)?;
        }

        stdout.flush()
    }

    /// Prompts, reads and runs lines until `exit` or end of input.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected, so
    /// no line typed at the prompt can end the loop by itself.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, stdout: &mut W) -> io::Result<()> {
        let mut buf = Vec::new();

        loop {
            self.render(stdout)?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                trace!("end of input");
                writeln!(stdout)?;
                return Ok(());
            }

            let line = String::from_utf8_lossy(&buf);

            if self.handle_line(strip_line_ending(&line)) == Flow::Exit {
                writeln!(stdout, "Exiting shell...")?;
                return Ok(());
            }
        }
    }

    /// A line read while an interrupt was pending is dropped unexecuted.
    pub fn handle_line(&mut self, line: &str) -> Flow {
        if signals::take_interrupt() {
            trace!("interrupted at the prompt, discarding line");
            return Flow::Continue;
        }

        self.execute(line)
    }

    /// Parses and runs one line. Every failure is reported here; none of
    /// them end the loop.
    pub fn execute(&mut self, line: &str) -> Flow {
        let plan = match parse_command_with(line, &self.config.limits) {
            Ok(plan) => plan,
            Err(err) => {
                report(&ShellError::from(err));
                return Flow::Continue;
            }
        };

        if plan
            .commands()
            .first()
            .map_or(false, |cmd| cmd.program() == EXIT_COMMAND)
        {
            return Flow::Exit;
        }

        if plan.is_noop() {
            return Flow::Continue;
        }

        trace!(?plan, "execution plan");

        if let Err(err) = plan.execute(&mut self.spawner, &self.config) {
            report(&err);
        }

        // an interrupt that arrived while children ran was theirs
        if signals::take_interrupt() {
            trace!("dropping interrupt delivered during execution");
        }

        Flow::Continue
    }
}

/// Strips the line terminator the way the terminal delivers it.
pub fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use std::{fs, io::Cursor};

    use nix::sys::signal::{raise, Signal};
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    #[test]
    fn exit_ends_the_loop() {
        let mut state = State::new(Config::default());

        assert_eq!(state.execute("exit"), Flow::Exit);
        assert_eq!(state.execute("exit ## ls"), Flow::Exit);
        assert_eq!(state.execute("  exit 3"), Flow::Exit);
    }

    #[test]
    fn blank_and_invalid_lines_continue() {
        let mut state = State::new(Config::default());

        assert_eq!(state.execute(""), Flow::Continue);
        assert_eq!(state.execute("ls &&"), Flow::Continue);
        assert_eq!(state.execute("echo >"), Flow::Continue);
    }

    #[test]
    fn strips_lf_and_crlf() {
        assert_eq!(strip_line_ending("ls\n"), "ls");
        assert_eq!(strip_line_ending("ls\r\n"), "ls");
        assert_eq!(strip_line_ending("ls"), "ls");
    }

    #[test]
    #[serial(cwd)]
    fn prompt_ends_with_configured_suffix() {
        let state = State::new(Config {
            prompt: "% ".into(),
            ..Config::default()
        });
        let mut out = Vec::new();

        state.render(&mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().ends_with("% "));
    }

    #[test]
    #[serial(signals)]
    fn invalid_utf8_line_does_not_end_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let path = |name: &str| dir.path().join(name);
        let mut input = Vec::new();
        input.extend_from_slice(format!("echo one > {}\n", path("one").display()).as_bytes());
        input.extend_from_slice(b"echo \xff\xfe > ");
        input.extend_from_slice(format!("{}\n", path("bad").display()).as_bytes());
        input.extend_from_slice(format!("echo two > {}\n", path("two").display()).as_bytes());
        input.extend_from_slice(b"exit\n");
        input.extend_from_slice(format!("echo after > {}\n", path("after").display()).as_bytes());

        let mut state = State::new(Config::default());
        let mut out = Vec::new();
        state.run(&mut Cursor::new(input), &mut out).unwrap();

        assert_eq!(fs::read_to_string(path("one")).unwrap(), "one\n");
        assert_eq!(fs::read_to_string(path("bad")).unwrap(), "\u{fffd}\u{fffd}\n");
        assert_eq!(fs::read_to_string(path("two")).unwrap(), "two\n");
        assert!(!path("after").exists());
        assert!(String::from_utf8(out).unwrap().ends_with("Exiting shell...\n"));
    }

    #[test]
    #[serial(signals)]
    fn end_of_input_returns_cleanly() {
        let mut state = State::new(Config::default());
        let mut out = Vec::new();

        state.run(&mut Cursor::new(b"\n\n".to_vec()), &mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().ends_with("$ \n"));
    }

    #[test]
    #[serial(signals)]
    fn line_read_after_interrupt_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let line = format!("touch {}", marker.display());
        let mut state = State::new(Config::default());

        signals::install().unwrap();
        signals::take_interrupt();
        raise(Signal::SIGINT).unwrap();

        assert_eq!(state.handle_line(&line), Flow::Continue);
        assert!(!marker.exists());

        // the flag is one-shot, so the next line runs
        assert_eq!(state.handle_line(&line), Flow::Continue);
        assert!(marker.exists());
    }
}
