//! workstrap CLI entry point.

use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use workstrap::cli::{parse_invocation, CommandDispatcher, Invocation};
use workstrap::shell::{has_controlling_terminal, is_ci};
use workstrap::ui::{create_ui, ColorChoice, NonInteractiveUI, OutputMode, UserInterface};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr so they never mix with step output.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("workstrap=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("workstrap=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = match parse_invocation(std::env::args_os()) {
        Ok(Invocation::Run(cli)) => cli,
        Ok(Invocation::Info(text)) => {
            print!("{}", text);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let colors = ColorChoice::detect(false);
            colors.apply_globally();
            NonInteractiveUI::new(OutputMode::Normal, colors).error(&e.to_string());
            return ExitCode::from(1);
        }
    };
    init_tracing(cli.debug);

    tracing::debug!("workstrap starting with args: {:?}", cli);

    let colors = ColorChoice::detect(cli.no_color);
    colors.apply_globally();

    let is_interactive = !cli.non_interactive && !is_ci() && has_controlling_terminal();
    let mut ui = create_ui(is_interactive, cli.output_mode(), colors);

    let working_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            ui.error(&format!("Error: cannot read the current directory: {}", e));
            return ExitCode::from(1);
        }
    };

    let dispatcher = CommandDispatcher::new(working_dir, colors);
    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code.clamp(0, 255) as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
