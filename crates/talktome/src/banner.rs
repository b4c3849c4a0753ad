//! Startup name plate.

use std::io::{self, Write};

/// RIS full terminal reset: clears the screen and the scrollback.
const CLEAR_SCREEN: &str = "\x1bc";

const NAME: &str = r"  __        ____   __
 / /____ _/ / /__/ /____  __ _  ___
/ __/ _ `/ / '_// __/ _ \/  ' \/ -_)
\__/\_,_/_/_/\_\\__/\___/_/_/_/\__/";

const TAGLINE: &str = "A CLI app for sending and receiving direct messages.";

/// Clears the screen and prints the name plate, tagline, and version.
pub fn print(screen: &mut dyn Write) -> io::Result<()> {
    write!(screen, "{CLEAR_SCREEN}")?;
    writeln!(screen, "{NAME}")?;
    writeln!(screen, "{TAGLINE}")?;
    writeln!(screen, "Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(screen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{print, CLEAR_SCREEN, TAGLINE};

    #[test]
    fn banner_clears_the_screen_before_anything_else() {
        let mut screen: Vec<u8> = Vec::new();
        print(&mut screen).expect("banner should print");

        let output = String::from_utf8(screen).expect("banner should be UTF-8");
        assert!(output.starts_with(CLEAR_SCREEN));
        assert!(output.contains(TAGLINE));
        assert!(output.contains(&format!("Version: {}", env!("CARGO_PKG_VERSION"))));
    }
}
