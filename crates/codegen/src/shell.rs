use crate::prelude::{eprintln, println, *};
use codegen_core::language::Language;
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::client::HttpService;
use crate::orchestrator::Orchestrator;
use crate::presenter::TerminalPresenter;

/// Line that ends a multi-line reference block
const END_OF_BLOCK: &str = ".";

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ShellOptions {
    /// Initially selected language
    #[arg(short, long, env = "CODEGEN_LANGUAGE", default_value = "python")]
    pub language: String,

    /// Directory downloaded files are written to
    #[arg(short, long, env = "CODEGEN_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Generate(String),
    Language(String),
    Reference(String),
    /// Start a multi-line reference block
    ReferenceBlock,
    ReferenceFile(PathBuf),
    Validate,
    Download,
    /// Replace the displayed code with a file's content
    Load(PathBuf),
    Show,
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    match (name, rest) {
        ("", _) => Command::Empty,
        ("generate" | "gen" | "g", query) => Command::Generate(query.to_string()),
        ("lang" | "language", "") => Command::Unknown(line.to_string()),
        ("lang" | "language", language) => Command::Language(language.to_string()),
        ("reference" | "ref", "") => Command::ReferenceBlock,
        ("reference" | "ref", text) => Command::Reference(text.to_string()),
        ("reference-file" | "ref-file", path) if !path.is_empty() => {
            Command::ReferenceFile(PathBuf::from(path))
        }
        ("validate" | "v", "") => Command::Validate,
        ("download" | "save" | "d", "") => Command::Download,
        ("load", path) if !path.is_empty() => Command::Load(PathBuf::from(path)),
        ("show", "") => Command::Show,
        ("status", "") => Command::Status,
        ("help" | "?", "") => Command::Help,
        ("quit" | "exit" | "q", "") => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

fn help_text() -> String {
    let mut result = String::new();
    let commands = [
        ("generate <query>", "Generate code for the request"),
        ("lang <language>", "Select the language (python, cpp, java, javascript, c, ...)"),
        ("reference <text>", "Set single-line reference code"),
        ("reference", "Enter multi-line reference code, end with a lone '.'"),
        ("reference-file <path>", "Load reference code from a file"),
        ("validate", "Validate the displayed code against the reference"),
        ("download", "Save the generated code to the output directory"),
        ("load <path>", "Replace the displayed code with a file's content"),
        ("show", "Print the displayed code and validation results"),
        ("status", "Show the session status"),
        ("quit", "Leave the shell"),
    ];

    result.push_str(&format!("\n{}\n", "COMMANDS".bright_cyan().bold()));
    for (usage, description) in commands {
        result.push_str(&format!("  {:<24} {}\n", usage.green(), description));
    }
    result
}

fn prompt(language: &Language) {
    print!("{} ", format!("codegen[{language}]>").bright_cyan().bold());
    if let Err(err) = std::io::stdout().flush() {
        log::debug!("flushing the prompt failed: {err}");
    }
}

/// Read one line, replacing invalid UTF-8 instead of failing
///
/// Returns `None` at end of input. A read error also ends input, after being
/// reported, since retrying a broken stdin would spin.
async fn read_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> Option<String> {
    let mut buf = Vec::new();

    match reader.read_until(b'\n', &mut buf).await {
        Ok(0) => None,
        Ok(_) => {
            let line = String::from_utf8_lossy(&buf);
            Some(line.trim_end_matches(['\n', '\r']).to_string())
        }
        Err(err) => {
            log::error!("reading input failed: {err}");
            eprintln!("{}", format!("Failed to read input: {err}").red());
            None
        }
    }
}

pub async fn run(options: ShellOptions, global: crate::Global) -> Result<()> {
    let service = HttpService::from_global(&global)?;
    let presenter = TerminalPresenter::new(&options.output_dir);
    let mut orchestrator =
        Orchestrator::new(service, presenter).with_start_hint(global.start_hint.clone());

    let mut language = Language::from(options.language.as_str());
    let mut reference = String::new();

    println!(
        "{} {}",
        "codegen shell".bright_cyan().bold(),
        format!("({}, type 'help' for commands)", global.api_url).bright_black()
    );
    orchestrator.check_health().await;

    let mut input = BufReader::new(tokio::io::stdin());

    loop {
        prompt(&language);
        let Some(line) = read_line(&mut input).await else {
            break;
        };

        // Failures are already shown as notices, so they only get logged here.
        match parse_command(&line) {
            Command::Empty => {}
            Command::Generate(query) => {
                if let Err(err) = orchestrator.generate(&query, &language).await {
                    log::debug!("generate failed: {err}");
                }
            }
            Command::Language(name) => {
                language = Language::from(name.as_str());
                println!("Language set to {}", language.to_string().bright_white());
            }
            Command::Reference(text) => {
                reference = text;
            }
            Command::ReferenceBlock => {
                println!(
                    "{}",
                    "Enter reference code, finish with a line containing only '.'".bright_black()
                );
                let mut block = Vec::new();
                while let Some(line) = read_line(&mut input).await {
                    if line.trim_end() == END_OF_BLOCK {
                        break;
                    }
                    block.push(line);
                }
                reference = block.join("\n");
            }
            Command::ReferenceFile(path) => match fs::read_to_string(&path) {
                Ok(text) => {
                    reference = text;
                    println!("Reference loaded from {}", path.display());
                }
                Err(err) => eprintln!(
                    "{}",
                    format!("Failed to read {}: {}", path.display(), err).red()
                ),
            },
            Command::Validate => {
                if let Err(err) = orchestrator.validate(&reference, &language).await {
                    log::debug!("validate failed: {err}");
                }
            }
            Command::Download => match orchestrator.download(&language) {
                Ok(path) => println!("Saved to {}", path.display()),
                Err(err) => log::debug!("download failed: {err}"),
            },
            Command::Load(path) => match fs::read_to_string(&path) {
                Ok(code) => {
                    orchestrator.presenter().edit_displayed_code(code);
                    println!("Displayed code replaced with {}", path.display());
                }
                Err(err) => eprintln!(
                    "{}",
                    format!("Failed to read {}: {}", path.display(), err).red()
                ),
            },
            Command::Show => orchestrator.presenter().redraw(),
            Command::Status => print_status(&orchestrator, &language, &reference),
            Command::Help => println!("{}", help_text()),
            Command::Quit => break,
            Command::Unknown(input) => eprintln!(
                "{}",
                format!("Unknown command: {input} (type 'help')").yellow()
            ),
        }
    }

    Ok(())
}

fn print_status(
    orchestrator: &Orchestrator<HttpService, TerminalPresenter>,
    language: &Language,
    reference: &str,
) {
    let session = orchestrator.session();
    let presenter = orchestrator.presenter();

    let validate = if presenter.validate_enabled() {
        "enabled"
    } else {
        "disabled"
    };

    let mut table = new_table();
    table.add_row(prettytable::row!["Phase".green(), f!("{:?}", session.phase())]);
    table.add_row(prettytable::row!["Language".green(), language]);
    table.add_row(prettytable::row![
        "Filename".green(),
        session.current_filename().unwrap_or("(synthesized on download)")
    ]);
    table.add_row(prettytable::row!["Validate".green(), validate]);
    table.add_row(prettytable::row![
        "Reference".green(),
        f!("{} lines", reference.lines().count())
    ]);
    table.add_row(prettytable::row![
        "Output dir".green(),
        presenter.output_dir().display()
    ]);
    if let Some(notice) = presenter.visible_notice() {
        table.add_row(prettytable::row!["Last notice".green(), notice.message]);
    }

    println!("{}", table);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_keeps_query() {
        assert_eq!(
            parse_command("generate sort a list"),
            Command::Generate("sort a list".to_string())
        );
        assert_eq!(
            parse_command("  g   reverse a string  "),
            Command::Generate("reverse a string".to_string())
        );
    }

    #[test]
    fn test_parse_generate_without_query_is_passed_through() {
        // The orchestrator reports the blank query
        assert_eq!(parse_command("generate"), Command::Generate(String::new()));
    }

    #[test]
    fn test_parse_language() {
        assert_eq!(
            parse_command("lang java"),
            Command::Language("java".to_string())
        );
        assert_eq!(
            parse_command("lang"),
            Command::Unknown("lang".to_string())
        );
    }

    #[test]
    fn test_parse_reference_forms() {
        assert_eq!(
            parse_command("reference x = 1"),
            Command::Reference("x = 1".to_string())
        );
        assert_eq!(parse_command("reference"), Command::ReferenceBlock);
        assert_eq!(
            parse_command("reference-file ref.py"),
            Command::ReferenceFile(PathBuf::from("ref.py"))
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("validate"), Command::Validate);
        assert_eq!(parse_command("download"), Command::Download);
        assert_eq!(parse_command("show"), Command::Show);
        assert_eq!(parse_command("status"), Command::Status);
        assert_eq!(parse_command("help"), Command::Help);
        assert_eq!(parse_command("exit"), Command::Quit);
        assert_eq!(parse_command("   "), Command::Empty);
    }

    #[test]
    fn test_parse_load() {
        assert_eq!(
            parse_command("load edited.py"),
            Command::Load(PathBuf::from("edited.py"))
        );
        assert_eq!(parse_command("load"), Command::Unknown("load".to_string()));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_command("validate now"),
            Command::Unknown("validate now".to_string())
        );
        assert_eq!(parse_command("frobnicate"), Command::Unknown("frobnicate".to_string()));
    }

    #[test]
    fn test_help_lists_every_command() {
        colored::control::set_override(false);
        let help = help_text();
        for command in ["generate", "lang", "reference", "validate", "download", "load", "status", "quit"] {
            assert!(help.contains(command), "missing {command}");
        }
    }

    #[tokio::test]
    async fn test_read_line_tolerates_invalid_utf8() {
        let mut input: &[u8] = b"\xff\xfe generate x\r\nstatus\nlast";

        let first = read_line(&mut input).await.unwrap();
        assert!(first.ends_with(" generate x"));
        assert!(first.contains('\u{FFFD}'));

        assert_eq!(read_line(&mut input).await.as_deref(), Some("status"));
        assert_eq!(read_line(&mut input).await.as_deref(), Some("last"));
        assert_eq!(read_line(&mut input).await, None);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_still_parses_as_unknown_command() {
        let mut input: &[u8] = b"\xffquit\nquit\n";

        let garbled = read_line(&mut input).await.unwrap();
        assert!(matches!(parse_command(&garbled), Command::Unknown(_)));

        let next = read_line(&mut input).await.unwrap();
        assert_eq!(parse_command(&next), Command::Quit);
    }
}
