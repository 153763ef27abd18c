//! Interactive loop over the pipeline entry point.

use std::io::{self, BufRead, Write};

pub const BANNER: &str = "🔥 Agentic AI Template 🔥";
pub const USER_PROMPT: &str = "You > ";
pub const REPLY_PREFIX: &str = "Agent > ";

/// `exit` or `quit`, ignoring case and surrounding whitespace.
pub fn is_exit_command(line: &str) -> bool {
    let command = line.trim();
    command.eq_ignore_ascii_case("exit") || command.eq_ignore_ascii_case("quit")
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub queries: usize,
}

/// Reads one line per turn until `exit`, `quit`, or end of input.
///
/// `answer` is called once per query and must return the text to show.
pub fn run_session<R, W, F>(mut input: R, mut output: W, mut answer: F) -> io::Result<SessionSummary>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> String,
{
    let mut summary = SessionSummary::default();
    writeln!(output, "\n{BANNER}\n")?;

    loop {
        write!(output, "{USER_PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        let query = line.trim_end_matches(['\r', '\n']);
        if is_exit_command(query) {
            break;
        }

        let reply = answer(query);
        summary.queries += 1;
        writeln!(output, "{REPLY_PREFIX}{reply}\n")?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{is_exit_command, run_session, BANNER};

    #[test]
    fn exit_commands_ignore_case_and_whitespace() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("QUIT"));
        assert!(is_exit_command("  Exit \n"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command(""));
    }

    #[test]
    fn loop_answers_each_line_until_quit() {
        let input = Cursor::new("show sales\n\nQuit\nnever read\n");
        let mut output = Vec::new();
        let mut seen = Vec::new();

        let summary = run_session(input, &mut output, |query| {
            seen.push(query.to_string());
            format!("echo:{query}")
        })
        .expect("session should run");

        assert_eq!(summary.queries, 2);
        assert_eq!(seen, vec!["show sales".to_string(), String::new()]);

        let transcript = String::from_utf8(output).expect("utf8 transcript");
        assert!(transcript.starts_with(&format!("\n{BANNER}\n")));
        assert!(transcript.contains("You > Agent > echo:show sales\n\n"));
        assert!(!transcript.contains("never read"));
    }

    #[test]
    fn end_of_input_ends_the_session() {
        let mut output = Vec::new();
        let summary =
            run_session(Cursor::new("one\r\n"), &mut output, |_| "ok".to_string()).expect("session");
        assert_eq!(summary.queries, 1);
        let transcript = String::from_utf8(output).expect("utf8 transcript");
        assert!(transcript.contains("Agent > ok\n\n"));
    }
}
