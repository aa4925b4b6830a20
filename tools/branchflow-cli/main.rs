use branchflow::prelude::*;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Validate, compile and walk branching survey flows
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. "debug" or "branchflow=trace")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a flow and print its steps and rules
    Validate {
        /// Flow document (.json) or compiled artifact (.bin)
        flow_path: String,
    },
    /// Compile a JSON flow document into a binary artifact
    Compile {
        flow_path: String,
        /// Where to write the artifact
        output_path: String,
    },
    /// Walk a flow non-interactively, taking answers from a JSON answers file
    Walk {
        flow_path: String,
        answers_path: String,
        /// Stop after this many steps, guarding against flows that loop back
        #[arg(long, default_value_t = 100)]
        max_steps: usize,
    },
    /// Walk a flow interactively, prompting for each answer
    Interactive {
        /// Defaults to the bundled sample survey when omitted
        flow_path: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Validate { flow_path } => run_validate(&flow_path),
        Command::Compile {
            flow_path,
            output_path,
        } => run_compile(&flow_path, &output_path),
        Command::Walk {
            flow_path,
            answers_path,
            max_steps,
        } => run_walk(&flow_path, &answers_path, max_steps),
        Command::Interactive { flow_path } => run_interactive(flow_path),
    }
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Loads a flow from a compiled artifact when the path ends in `.bin`, otherwise from JSON.
fn load_flow(path: &str) -> FlowDefinition {
    if path.ends_with(".bin") {
        FlowArtifact::from_file(path)
            .and_then(FlowArtifact::into_definition)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load artifact: {}", e)))
    } else {
        FlowDocument::load_flow(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load flow document: {}", e)))
    }
}

fn run_validate(flow_path: &str) {
    let flow = load_flow(flow_path);

    println!(
        "Flow '{}' is valid: {} steps, {} navigation rules, {} skip rules",
        flow.identifier(),
        flow.step_count(),
        flow.rules().len(),
        flow.skip_rules().len()
    );

    println!("\n--- Steps ---");
    for (index, step) in flow.steps().iter().enumerate() {
        let optional = if step.optional { " (optional)" } else { "" };
        println!("{:>3}. {}{}", index + 1, step.id, optional);
    }

    println!("\n--- Navigation Rules ---");
    for (trigger, rule) in flow.rules() {
        match rule {
            NavigationRule::Direct { destination } => {
                println!("  {} -> {}", trigger, destination)
            }
            NavigationRule::Predicate { branches, default } => {
                for branch in branches {
                    println!(
                        "  {} -> {} when {}",
                        trigger, branch.destination, branch.condition
                    );
                }
                if let Some(default) = default {
                    println!("  {} -> {} otherwise", trigger, default);
                }
            }
        }
    }

    let skip_rules = flow.skip_rules();
    if !skip_rules.is_empty() {
        println!("\n--- Skip Rules ---");
        for (step, condition) in skip_rules {
            println!("  skip {} when {}", step, condition);
        }
    }
}

fn run_compile(flow_path: &str, output_path: &str) {
    let start = Instant::now();
    let flow = load_flow(flow_path);
    FlowArtifact::from_definition(&flow)
        .save(output_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to write artifact: {}", e)));
    println!(
        "Compiled flow '{}' to '{}' in {:?}",
        flow.identifier(),
        output_path,
        start.elapsed()
    );
}

fn run_walk(flow_path: &str, answers_path: &str, max_steps: usize) {
    let flow = load_flow(flow_path);
    let answers = AnswerSet::from_file(answers_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load answers: {}", e)));

    let mut session = FlowSession::new(&flow)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to start flow: {}", e)));

    println!("Walking flow '{}'...\n", flow.identifier());
    let mut presented = 0;
    while let Some(step) = session.current_step() {
        if presented == max_steps {
            exit_with_error(&format!(
                "Stopped after {} steps; the flow may be looping",
                max_steps
            ));
        }
        presented += 1;

        let resolution = if step.optional && !answers.has_step(&step.id) {
            session.skip()
        } else {
            session.submit(answers.clone())
        }
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to advance: {}", e)));

        println!("{:>3}. {} -> {}", presented, step.id, resolution.destination);
        println!("     Reason: {}", resolution.reason);
    }

    println!("\nFlow finished after {} steps.", presented);
}

/// Runs the flow in an interactive, human-friendly mode with prompts.
fn run_interactive(flow_path: Option<String>) {
    println!("--- branchflow Interactive Mode ---");

    let flow = match flow_path {
        Some(path) => load_flow(&path),
        None => branchflow::samples::navigable_survey()
            .unwrap_or_else(|e| exit_with_error(&format!("Sample flow is invalid: {}", e))),
    };
    let mut session = FlowSession::new(&flow)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to start flow: {}", e)));

    println!("Type 'back' to return to the previous step, 'skip' to leave an optional step.\n");

    while let Some(step) = session.current_step() {
        println!("[{}] {}", step.id, step.title.as_deref().unwrap_or(""));

        let outcome = match prompt_for_step(step) {
            StepInput::Back => {
                if let Err(e) = session.back() {
                    println!("  {}", e);
                }
                continue;
            }
            StepInput::Skip => session.skip(),
            StepInput::Answers(answers) => session.submit(answers),
        };

        match outcome {
            Ok(resolution) => {
                println!("  -> {} ({})\n", resolution.destination, resolution.reason)
            }
            Err(SessionError::RequiredStep(id)) => println!("  '{}' needs an answer.\n", id),
            Err(e) => exit_with_error(&format!("Failed to advance: {}", e)),
        }
    }

    println!("Flow finished. Collected answers:");
    for (key, value) in session.answers().iter() {
        match &key.item {
            Some(item) => println!("  {}.{} = {}", key.step, item, value),
            None => println!("  {} = {}", key.step, value),
        }
    }
}

enum StepInput {
    Back,
    Skip,
    Answers(AnswerSet),
}

fn prompt_for_step(step: &Step) -> StepInput {
    let mut answers = AnswerSet::new();
    match &step.kind {
        StepKind::Instruction | StepKind::Completion => {
            let input = prompt_for_input("Press Enter to continue");
            if let Some(command) = parse_command(&input) {
                return command;
            }
        }
        StepKind::SingleChoice { choices } => loop {
            println!("  Choices: {}", choices.join(", "));
            let input = prompt_for_input("Your choice");
            if let Some(command) = parse_command(&input) {
                return command;
            }
            if choices.iter().any(|c| *c == input) {
                answers.record_choice(&step.id, input);
                break;
            }
            println!("  Invalid choice. Please enter one of the listed values.");
        },
        StepKind::Boolean => loop {
            let input = prompt_for_input("Yes or no (y/n)");
            if let Some(command) = parse_command(&input) {
                return command;
            }
            match input.to_lowercase().as_str() {
                "y" | "yes" => answers.record(&step.id, true),
                "n" | "no" => answers.record(&step.id, false),
                _ => {
                    println!("  Please answer y or n.");
                    continue;
                }
            };
            break;
        },
        StepKind::Numeric => loop {
            let input = prompt_for_input("A number");
            if let Some(command) = parse_command(&input) {
                return command;
            }
            match input.parse::<f64>() {
                Ok(number) => {
                    answers.record(&step.id, number);
                    break;
                }
                Err(_) => println!("  Please enter a number."),
            }
        },
        StepKind::Date => loop {
            let input = prompt_for_input("A date (YYYY-MM-DD)");
            if let Some(command) = parse_command(&input) {
                return command;
            }
            match input.parse::<NaiveDate>() {
                Ok(date) => {
                    answers.record(&step.id, date);
                    break;
                }
                Err(_) => println!("  Please enter a date such as 2024-05-01."),
            }
        },
        StepKind::Form { items } => {
            for item in items {
                let input = loop {
                    if !item.choices.is_empty() {
                        println!("  Choices for {}: {}", item.id, item.choices.join(", "));
                    }
                    let input = prompt_for_input(&format!("  {}", item.id));
                    if let Some(command) = parse_command(&input) {
                        return command;
                    }
                    if item.accepts(&input) {
                        break input;
                    }
                    println!("  Invalid choice. Please enter one of the listed values.");
                };
                answers.record_item(&step.id, &item.id, AnswerValue::Choice(input));
            }
        }
    }
    StepInput::Answers(answers)
}

fn parse_command(input: &str) -> Option<StepInput> {
    match input {
        "back" => Some(StepInput::Back),
        "skip" => Some(StepInput::Skip),
        _ => None,
    }
}

/// Prompts the user and reads one trimmed line, exiting when stdin is exhausted.
fn prompt_for_input(prompt_text: &str) -> String {
    print!("> {}: ", prompt_text);
    io::stdout()
        .flush()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to flush stdout: {}", e)));

    read_trimmed_line(&mut io::stdin().lock())
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read line: {}", e)))
        .unwrap_or_else(|| exit_with_error("Unexpected end of input"))
}

/// Reads one trimmed line. `Ok(None)` once the input is exhausted.
fn read_trimmed_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
