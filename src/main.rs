// PinQuest: a pin-and-LED playground for learning to code

use std::fs;
use std::io;
use std::path::PathBuf;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use pinquest::config::Settings;
use pinquest::content::Course;
use pinquest::logging::init_tracing;
use pinquest::ui::App;

/// Command-line options
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    content: Option<PathBuf>,
    program: Option<PathBuf>,
}

fn usage(program_name: &str) {
    eprintln!("Usage: {} [--config settings.json] [--content course.json] [program.pin]", program_name);
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} mon_code.pin                       # Write your code, check it against the exercise", program_name);
    eprintln!("  {} --config rapide.json mon_code.pin  # Custom timing", program_name);
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config needs a file")?;
                options.config = Some(PathBuf::from(path));
            }
            "--content" => {
                let path = iter.next().ok_or("--content needs a file")?;
                options.content = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option '{}'", flag)),
            file => {
                if options.program.is_some() {
                    return Err(format!("unexpected argument '{}'", file));
                }
                options.program = Some(PathBuf::from(file));
            }
        }
    }
    Ok(options)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("pinquest");

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            usage(program_name);
            std::process::exit(1);
        }
    };

    let settings = match &options.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let course = match &options.content {
        Some(path) => Course::load(path)?,
        None => Course::builtin()?,
    };

    // A missing program file is created empty so the learner can start writing
    let source = match &options.program {
        Some(path) if path.exists() => fs::read_to_string(path)?,
        Some(path) => {
            fs::write(path, "")?;
            eprintln!("Created empty program file '{}'", path.display());
            String::new()
        }
        None => String::new(),
    };

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings, course, options.program, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("pinquest")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args() {
        let options = parse_args(&args(&["--config", "t.json", "code.pin"])).unwrap();
        assert_eq!(options.config, Some(PathBuf::from("t.json")));
        assert_eq!(options.content, None);
        assert_eq!(options.program, Some(PathBuf::from("code.pin")));

        assert!(parse_args(&args(&["--config"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
        assert!(parse_args(&args(&["a.pin", "b.pin"])).is_err());
    }
}
