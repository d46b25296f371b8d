//! Terminal frontend for the simulated debugger session.
//!
//! Pure presentation: this binary generates a session, draws the four panes
//! (disassembly, registers, memory dump, history), and feeds stdin lines to
//! the engine's interpreter. All session state lives behind the engine's
//! snapshot accessors; the only write path is `SessionController::apply`.

use std::env;
use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use session_core::{
    hex64, interpret, InstructionStream, MemoryImage, SessionConfig, SessionController,
    visible_window, SessionPhase, Transition, ViewSync, DEFAULT_BASE_ADDRESS,
    DEFAULT_INSTRUCTION_COUNT, DEFAULT_MEMORY_BYTES,
};

const USAGE_TEXT: &str = "\
Usage: dbgsession [options]

Options:
  --seed <u64>   Seed the session generator for a reproducible layout
  --rows <n>     Disassembly rows to display (default 16)
  -h, --help     Show this help message

Commands inside the session:
  n, next, s     Step one instruction
  r, reset       Restore the initial session snapshot
  q, quit        Leave the session
";

const DEFAULT_LISTING_ROWS: usize = 16;
const MEMORY_ROW_BYTES: usize = 16;
const HISTORY_TAIL: usize = 6;

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    seed: Option<u64>,
    rows: usize,
}

#[derive(Debug)]
enum ParseResult {
    Run(RunArgs),
    Help,
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut seed: Option<u64> = None;
    let mut rows = DEFAULT_LISTING_ROWS;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "--seed" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --seed".to_string())?;
            seed = Some(
                value
                    .to_string_lossy()
                    .parse::<u64>()
                    .map_err(|_| format!("invalid seed: {}", value.to_string_lossy()))?,
            );
            continue;
        }

        if arg == "--rows" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --rows".to_string())?;
            rows = value
                .to_string_lossy()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("invalid row count: {}", value.to_string_lossy()))?;
            continue;
        }

        return Err(format!("unknown option: {}", arg.to_string_lossy()));
    }

    Ok(ParseResult::Run(RunArgs { seed, rows }))
}

/// Scroll state for the disassembly pane.
///
/// The engine pushes the active row through [`ViewSync`]; the viewport
/// re-centers without ever touching session state.
struct Viewport {
    top: usize,
    height: usize,
    total: usize,
}

impl Viewport {
    fn new(height: usize, total: usize, active: usize) -> Self {
        let mut viewport = Self {
            top: 0,
            height,
            total,
        };
        viewport.scroll_to(active, 0);
        viewport
    }
}

impl ViewSync for Viewport {
    fn scroll_to(&mut self, index: usize, _address: u64) {
        self.top = visible_window(index, self.total, self.height).start;
    }
}

fn main() -> ExitCode {
    match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            print!("{USAGE_TEXT}");
            ExitCode::SUCCESS
        }
        Ok(ParseResult::Run(args)) => match run(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                eprintln!("error: {message}");
                ExitCode::FAILURE
            }
        },
        Err(message) => {
            eprintln!("error: {message}");
            eprint!("{USAGE_TEXT}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &RunArgs) -> Result<(), String> {
    let mut rng = args
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let stream = InstructionStream::generate(DEFAULT_BASE_ADDRESS, DEFAULT_INSTRUCTION_COUNT, &mut rng);
    let memory = MemoryImage::generate(DEFAULT_MEMORY_BYTES, &mut rng);
    let mut session = SessionController::new(stream, memory, SessionConfig::default(), rng)
        .map_err(|err| err.to_string())?;
    let mut viewport = Viewport::new(args.rows, session.stream().len(), session.pc_index());

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        session.expire_highlight(Instant::now());
        render(&session, &viewport);

        print!("(dbg) ");
        io::stdout().flush().map_err(|err| err.to_string())?;

        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|err| err.to_string())?;
        if read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed == "q" || trimmed == "quit" {
            break;
        }

        let transition = session
            .apply(interpret(trimmed), Instant::now())
            .map_err(|err| err.to_string())?;
        if transition == Transition::Ignored && !trimmed.is_empty() {
            println!("unrecognized command: {trimmed} (try: n, next, s, r, reset, q)");
        }
        session.sync_view(&mut viewport);
    }

    Ok(())
}

fn render(session: &SessionController, viewport: &Viewport) {
    println!();
    render_listing(session, viewport);
    println!();
    render_registers(session);
    println!();
    render_memory(session);
    println!();
    render_history(session);
    if session.phase() == SessionPhase::Halted {
        println!("-- end of program; r to reset --");
    }
}

fn render_listing(session: &SessionController, viewport: &Viewport) {
    let end = (viewport.top + viewport.height).min(session.stream().len());
    for index in viewport.top..end {
        let Some(instruction) = session.stream().get(index) else {
            break;
        };
        let marker = if index == session.pc_index() { '>' } else { ' ' };
        let annotation = instruction
            .annotation
            .map(|tag| format!("  ; {tag}"))
            .unwrap_or_default();
        println!(
            "{marker} {}  {:<6} {}{annotation}",
            hex64(instruction.address),
            instruction.mnemonic,
            instruction.operands
        );
    }
}

fn render_registers(session: &SessionController) {
    let snapshot = session.register_snapshot();
    let changed = session.changed_registers();
    let cells: Vec<String> = snapshot
        .iter()
        .map(|(id, value)| {
            let mark = if changed.contains(&id) { '*' } else { ' ' };
            format!("{mark}{:>3} {}", id.to_string(), hex64(value))
        })
        .collect();

    for row in cells.chunks(4) {
        println!("{}", row.join("   "));
    }
}

fn render_memory(session: &SessionController) {
    for (row, bytes) in session.memory().bytes().chunks(MEMORY_ROW_BYTES).enumerate() {
        let offset = row * MEMORY_ROW_BYTES;
        let hex: Vec<String> = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
        let ascii: String = bytes
            .iter()
            .map(|byte| {
                if byte.is_ascii_graphic() {
                    *byte as char
                } else {
                    '.'
                }
            })
            .collect();
        println!("{offset:08x}  {:<47}  {ascii}", hex.join(" "));
    }
}

fn render_history(session: &SessionController) {
    let entries: Vec<&str> = session.history().collect();
    let tail_start = entries.len().saturating_sub(HISTORY_TAIL);
    for entry in &entries[tail_start..] {
        println!("  {entry}");
    }
}
