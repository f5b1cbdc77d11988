use anyhow::bail;

pub const HELP: &str = "Commands: add <url> <title>, delete <id>, list, help, quit";

/// A line typed while watching the list.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Add { url: String, title: String },
    Delete(String),
    List,
    Help,
    Quit,
}

/// `Ok(None)` for a blank line.
pub fn parse(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name {
        "" => return Ok(None),
        "add" => match rest.split_once(char::is_whitespace) {
            Some((url, title)) => Command::Add {
                url: url.to_string(),
                title: title.trim().to_string(),
            },
            None => bail!("usage: add <url> <title>"),
        },
        "delete" | "rm" if !rest.is_empty() && !rest.contains(char::is_whitespace) => {
            Command::Delete(rest.to_string())
        }
        "delete" | "rm" => bail!("usage: delete <id>"),
        "list" | "ls" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command `{other}`, try `help`"),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse("   ").unwrap(), None);
        assert_eq!(parse("ls").unwrap(), Some(Command::List));
        assert_eq!(parse("quit").unwrap(), Some(Command::Quit));
        assert_eq!(
            parse("delete 2ZyGvHWo1d3nqHFUxLIAX6LYnWq").unwrap(),
            Some(Command::Delete(String::from("2ZyGvHWo1d3nqHFUxLIAX6LYnWq")))
        );
        assert_eq!(
            parse("add https://example.com  The Example Site ").unwrap(),
            Some(Command::Add {
                url: String::from("https://example.com"),
                title: String::from("The Example Site"),
            })
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse("add https://example.com").is_err());
        assert!(parse("delete").is_err());
        assert!(parse("delete a b").is_err());
        assert_eq!(
            parse("frobnicate").unwrap_err().to_string(),
            "unknown command `frobnicate`, try `help`"
        );
    }
}
