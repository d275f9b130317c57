use recycle_bin_core::prelude::*;
use std::env;
use std::fmt::{self, Display, Formatter};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_ENV: &str = "RECYCLE_BIN_LOG";

#[derive(Debug, Default)]
struct PutConfig {
    paths: Vec<String>,
    platform: Option<Platform>,
    home: Option<PathBuf>,
    force: bool,
    verbosity: u8,
    show_help: bool,
    show_version: bool,
}

#[derive(Debug)]
struct CliError(String);

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn print_help(prog: &str) {
    println!(
        "\
usage: {prog} [-h] [--version] [-f] [-v] [--platform PLATFORM] [--home DIR] PATH...

Send files to the Recycle Bin / Trash

positional arguments:
  PATH                  files or directories to trash

options:
  -h, --help            show this help message and exit
  --version             show program's version number and exit
  -f, --force           do not ask for confirmation
  -v, --verbose         explain what is being done (repeat for more)
  --platform PLATFORM   trash implementation to use (win32, darwin, linux, ...)
  --home DIR            home directory holding the trash

environment:
  {confirm}=0   never ask for confirmation
  {log}         log filter, e.g. debug
",
        prog = prog,
        confirm = CONFIRM_ENV,
        log = LOG_ENV,
    );
}

fn parse_args(args: &[String]) -> std::result::Result<PutConfig, CliError> {
    let mut config = PutConfig::default();
    let mut only_paths = false;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if only_paths {
            config.paths.push(arg.clone());
            i += 1;
            continue;
        }
        match arg.as_str() {
            "--" => only_paths = true,
            "-h" | "--help" => config.show_help = true,
            "--version" => config.show_version = true,
            "-f" | "--force" => config.force = true,
            "-v" | "--verbose" => config.verbosity = config.verbosity.saturating_add(1),
            "--platform" | "--home" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| CliError(format!("missing value for {arg}")))?;
                apply_valued(&mut config, arg, value);
                i += 1;
            }
            _ if arg.starts_with("--platform=") || arg.starts_with("--home=") => {
                let (flag, value) = arg.split_once('=').unwrap_or((arg.as_str(), ""));
                if value.is_empty() {
                    return Err(CliError(format!("missing value for {flag}")));
                }
                apply_valued(&mut config, flag, value);
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(CliError(format!("unrecognized arguments: {arg}")));
            }
            _ => config.paths.push(arg.clone()),
        }
        i += 1;
    }

    Ok(config)
}

fn apply_valued(config: &mut PutConfig, flag: &str, value: &str) {
    if flag == "--platform" {
        config.platform = Some(Platform::from_identifier(value));
    } else {
        config.home = Some(PathBuf::from(value));
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env(LOG_ENV)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Asks on the terminal; anything but an explicit yes declines.
struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&mut self, count: usize) -> ConfirmDecision {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            return ConfirmDecision::yes();
        }

        let mut stderr = io::stderr();
        let _ = write!(stderr, "{}", confirmation_prompt(count));
        let _ = stderr.flush();

        let mut answer = String::new();
        if stdin.lock().read_line(&mut answer).is_err() {
            return ConfirmDecision::no();
        }
        parse_answer(&answer)
    }
}

/// Each run asks again; only `RECYCLE_BIN_CONFIRM=0` or `-f` silences the prompt.
fn confirmation_prompt(count: usize) -> String {
    format!(
        "Send {count} file(s) to the Recycle Bin? This can usually be undone from the Recycle Bin / Trash. [y/N] "
    )
}

fn parse_answer(answer: &str) -> ConfirmDecision {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => ConfirmDecision::yes(),
        _ => ConfirmDecision::no(),
    }
}

fn run() -> i32 {
    let args: Vec<String> = env::args().skip(1).collect();
    let program = env::args().next().unwrap_or_else(|| "recycle-bin".to_string());
    let environ: EnvVarMap = env::vars().collect();

    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("recycle-bin: {error}");
            return 1;
        }
    };
    if config.show_help {
        print_help(&program);
        return 0;
    }
    if config.show_version {
        println!("recycle-bin {VERSION}");
        return 0;
    }
    if config.paths.is_empty() {
        eprintln!("recycle-bin: missing PATH operand");
        return 1;
    }

    init_logging(config.verbosity);

    let mut settings = match Settings::from_environ(&environ) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("recycle-bin: {error}");
            return 1;
        }
    };
    if config.force {
        settings.confirm_trash = false;
    }

    let mut ctx = TrashContext::from_environ(&environ);
    if let Some(home) = config.home {
        ctx = ctx.with_home(home);
    }
    if let Some(platform) = config.platform {
        ctx = ctx.with_platform(platform);
    }

    let items: Vec<SelectionItem> = config
        .paths
        .iter()
        .zip(0u64..)
        .map(|(path, id)| SelectionItem::File(HostFile::new(id, path)))
        .collect();

    let mut action = SendToTrashAction::new(TrashDispatcher::default(), ctx, settings);
    let report = action.run(&items, &mut TerminalConfirmer, None);

    match report.status {
        ActionStatus::NoPaths => {
            eprintln!("recycle-bin: nothing to trash");
            1
        }
        ActionStatus::Cancelled => 1,
        ActionStatus::Completed => {
            for path in &report.outcome.failed {
                eprintln!("recycle-bin: cannot trash '{}'", sanitize_user_path(path));
            }
            i32::from(report.outcome.status().as_code())
        }
    }
}

fn main() {
    std::process::exit(run());
}
