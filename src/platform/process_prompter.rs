//! Process-backed prompter speaking to the terminal on stdin/stdout.

use crate::prompt::{Choice, PromptError, PromptProvider};

#[cfg(unix)]
use libc::{self, c_int};

/// Marker printed in front of every question.
pub const PROMPT_PREFIX: &str = ">";

#[cfg(unix)]
fn write_all_fd_with<FWrite>(fd: c_int, bytes: &[u8], mut write_once: FWrite) -> std::io::Result<()>
where
    FWrite: FnMut(c_int, &[u8]) -> std::io::Result<usize>,
{
    let mut written = 0;
    while written < bytes.len() {
        match write_once(fd, &bytes[written..]) {
            Ok(0) => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    "write returned 0",
                ));
            }
            Ok(count) => {
                let remaining = bytes.len() - written;
                if count > remaining {
                    return Err(std::io::Error::other(
                        "write returned more bytes than requested",
                    ));
                }
                written += count;
            }
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {
                continue;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

#[cfg(unix)]
fn write_fd(fd: c_int, data: &str) -> std::io::Result<()> {
    if data.is_empty() {
        return Ok(());
    }

    write_all_fd_with(fd, data.as_bytes(), |fd, buf| {
        let result = unsafe { libc::write(fd, buf.as_ptr() as *const libc::c_void, buf.len()) };
        if result < 0 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(result as usize)
        }
    })
}

#[cfg(unix)]
fn read_line_with<FRead>(fd: c_int, mut read_once: FRead) -> Result<String, PromptError>
where
    FRead: FnMut(c_int, &mut [u8]) -> std::io::Result<usize>,
{
    let mut line: Vec<u8> = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match read_once(fd, &mut byte) {
            Ok(0) => {
                if line.is_empty() {
                    return Err(PromptError::Closed);
                }
                break;
            }
            Ok(_) => {
                if byte[0] == b'\n' {
                    break;
                }
                line.push(byte[0]);
            }
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {
                continue;
            }
            Err(err) => return Err(PromptError::Io(err)),
        }
    }

    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(String::from_utf8_lossy(&line).into_owned())
}

#[cfg(unix)]
fn read_line_fd(fd: c_int) -> Result<String, PromptError> {
    read_line_with(fd, |fd, buf| {
        let result = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
        if result < 0 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(result as usize)
        }
    })
}

#[cfg(unix)]
fn get_termios(fd: c_int) -> std::io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(termios)
}

#[cfg(unix)]
fn set_termios(fd: c_int, termios: &libc::termios) -> std::io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Turns terminal echo off for as long as it lives.
///
/// Dropping the guard restores the termios settings captured when it was
/// created, so echo comes back even when the read in between fails.
#[cfg(unix)]
struct EchoGuard {
    fd: c_int,
    original: libc::termios,
}

#[cfg(unix)]
impl EchoGuard {
    fn silence(fd: c_int) -> std::io::Result<Self> {
        let original = get_termios(fd)?;
        let mut quiet = original;
        quiet.c_lflag &= !libc::ECHO;
        set_termios(fd, &quiet)?;
        Ok(Self { fd, original })
    }
}

#[cfg(unix)]
impl Drop for EchoGuard {
    fn drop(&mut self) {
        let _ = set_termios(self.fd, &self.original);
    }
}

/// Prompter bound to the process terminal.
///
/// Questions are written to stdout as `"{prefix} {label} "` and answers read
/// line-wise from stdin. Secret entry keeps the terminal in canonical mode
/// and only clears the echo flag, restoring it once the line is read.
#[cfg(unix)]
pub struct ProcessPrompter {
    input_fd: c_int,
    output_fd: c_int,
}

#[cfg(unix)]
impl ProcessPrompter {
    pub fn new() -> Self {
        Self {
            input_fd: libc::STDIN_FILENO,
            output_fd: libc::STDOUT_FILENO,
        }
    }

    fn write_output(&mut self, data: &str) -> Result<(), PromptError> {
        write_fd(self.output_fd, data)?;
        Ok(())
    }

    fn write_question(&mut self, label: &str) -> Result<(), PromptError> {
        self.write_output(&format!("{PROMPT_PREFIX} {label} "))
    }
}

#[cfg(unix)]
impl Default for ProcessPrompter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl PromptProvider for ProcessPrompter {
    fn ask_text(&mut self, label: &str) -> Result<String, PromptError> {
        self.write_question(label)?;
        read_line_fd(self.input_fd)
    }

    fn ask_masked_text(&mut self, label: &str) -> Result<String, PromptError> {
        self.write_question(label)?;

        let guard = EchoGuard::silence(self.input_fd)?;
        let answer = read_line_fd(self.input_fd);
        drop(guard);

        // The user's newline was swallowed along with the rest of the input.
        self.write_output("\n")?;
        answer
    }

    fn ask_choice(&mut self, label: &str, choices: &[Choice]) -> Result<String, PromptError> {
        if choices.is_empty() {
            return Err(PromptError::NoChoices);
        }

        loop {
            let mut menu = format!("{PROMPT_PREFIX} {label}\n");
            for (index, choice) in choices.iter().enumerate() {
                menu.push_str(&format!("  {}) {}\n", index + 1, choice.label));
            }
            menu.push_str(PROMPT_PREFIX);
            menu.push(' ');
            self.write_output(&menu)?;

            let answer = read_line_fd(self.input_fd)?;
            match answer.trim().parse::<usize>() {
                Ok(number) if (1..=choices.len()).contains(&number) => {
                    return Ok(choices[number - 1].value.clone());
                }
                _ => {
                    self.write_output("Please enter one of the listed numbers.\n")?;
                }
            }
        }
    }
}

#[cfg(not(unix))]
pub struct ProcessPrompter;

#[cfg(not(unix))]
impl ProcessPrompter {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(unix))]
impl Default for ProcessPrompter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(unix))]
impl PromptProvider for ProcessPrompter {
    fn ask_text(&mut self, _label: &str) -> Result<String, PromptError> {
        panic!("ProcessPrompter is only supported on Unix platforms");
    }

    fn ask_masked_text(&mut self, _label: &str) -> Result<String, PromptError> {
        panic!("ProcessPrompter is only supported on Unix platforms");
    }

    fn ask_choice(&mut self, _label: &str, _choices: &[Choice]) -> Result<String, PromptError> {
        panic!("ProcessPrompter is only supported on Unix platforms");
    }
}
