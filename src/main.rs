use std::io;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use log::info;
use simplelog::LevelFilter;

use obdd_editor::{
    document, export, launcher, logging, Config, Controller, DotConfig, EdgeKind, Graph,
};

#[derive(Parser, Debug)]
#[command(name = "obdd-editor")]
#[command(author, version, about = "Interactive editor for ordered binary decision diagrams")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Diagram to open in the editor (created on first export if missing)
    file: Option<PathBuf>,

    /// Config file (default: nearest .obdd-editor/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive editor (the default)
    Edit {
        /// Diagram to open
        file: Option<PathBuf>,
    },

    /// Write a new diagram holding only the terminals 0 and 1
    New {
        /// Where to write the diagram
        file: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check that a diagram file is valid
    Validate {
        /// Diagram to check
        file: PathBuf,
    },

    /// Print the nodes and edges of a diagram
    Show {
        /// Diagram to print
        file: PathBuf,
    },

    /// Export a diagram as Graphviz DOT
    Dot {
        /// Diagram to export
        file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Graph title
        #[arg(long)]
        title: Option<String>,

        /// Layout direction
        #[arg(long, default_value = "TB", value_parser = ["TB", "LR"])]
        rankdir: String,

        /// Only nodes reachable from the root
        #[arg(long)]
        reachable: bool,

        /// Prefix labels with node ids
        #[arg(long)]
        ids: bool,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    let args = Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => fail(&e),
        },
        None => Config::load(),
    };

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        logging::parse_level(&config.log.level)
    };

    let result = match args.command {
        None => launch(args.file, &config, level),
        Some(Command::Edit { file }) => launch(file.or(args.file), &config, level),
        Some(command) => {
            logging::init_term_logger(level);
            run_command(command, &config)
        }
    };

    if let Err(e) = result {
        fail(&*e);
    }
}

fn fail(error: &dyn std::error::Error) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), error);
    std::process::exit(1);
}

/// Start the interactive editor
fn launch(
    file: Option<PathBuf>,
    config: &Config,
    level: LevelFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(problem) = launcher::check_current() {
        eprintln!(
            "{} cannot start the editor: {}",
            "Error:".red().bold(),
            problem.describe()
        );
        eprintln!("{} {}", "Hint:".yellow().bold(), launcher::platform_hint());
        std::process::exit(1);
    }

    let log_path = config.log.file_path();
    logging::init_file_logger(level, &log_path)?;

    let mut controller = Controller::new(config.canvas.clone());
    if let Some(path) = file {
        if path.exists() {
            let graph = document::load(&path)?;
            controller.load_graph(graph, Some(path));
        } else {
            info!("{} does not exist yet; starting a new diagram", path.display());
            controller.set_document_path(Some(path));
        }
    }

    obdd_editor::tui::run(controller)
}

fn run_command(command: Command, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        // Dispatched to launch() before any logger is installed
        Command::Edit { .. } => {}

        Command::New { file, force } => {
            if file.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    file.display()
                )
                .into());
            }
            let (zero, one) = config.canvas.terminal_positions();
            document::save(&Graph::with_terminals(zero, one), &file)?;
            println!("   {} {}", "Creating".green(), file.display());
        }

        Command::Validate { file } => {
            let graph = document::load(&file)?;
            let decisions = graph.nodes().filter(|n| !n.is_terminal()).count();
            println!(
                "{} {}: {} nodes ({} decision, {} terminal), {} edges",
                "Valid".green().bold(),
                file.display(),
                graph.len(),
                decisions,
                graph.len() - decisions,
                graph.edge_count()
            );
        }

        Command::Show { file } => show(&file)?,

        Command::Dot {
            file,
            output,
            title,
            rankdir,
            reachable,
            ids,
        } => {
            let graph = document::load(&file)?;
            let dot_config = DotConfig {
                title,
                show_ids: ids,
                rankdir,
                reachable_only: reachable,
            };
            let dot = export::graph_to_dot(&graph, &dot_config);
            match output {
                Some(path) => {
                    std::fs::write(&path, dot)
                        .map_err(|e| obdd_editor::EditorError::io(&path, e))?;
                    eprintln!("   {} {}", "Exported".green(), path.display());
                }
                None => print!("{}", dot),
            }
        }

        Command::Completion { shell } => {
            clap_complete::generate(shell, &mut Args::command(), "obdd-editor", &mut io::stdout());
        }
    }
    Ok(())
}

/// Print a diagram as a table
fn show(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let graph = document::load(file)?;
    let target = |id: Option<u64>| match id.and_then(|id| graph.node(id)) {
        Some(node) => node.label.clone(),
        None => "-".to_string(),
    };

    println!(
        "{}",
        format!(
            "{:>4}  {:<9} {:<8} {:<6} {:<6} {}",
            "ID", "KIND", "LABEL", "LOW", "HIGH", "POSITION"
        )
        .bold()
    );
    for node in graph.nodes() {
        let kind = if node.is_terminal() { "terminal" } else { "decision" };
        let (low, high) = if node.is_terminal() {
            (String::new(), String::new())
        } else {
            (target(node.edge(EdgeKind::Low)), target(node.edge(EdgeKind::High)))
        };
        let line = format!(
            "{:>4}  {:<9} {:<8} {:<6} {:<6} ({}, {})",
            node.id, kind, node.label, low, high, node.position.x, node.position.y
        );
        if node.is_root {
            println!("{} {}", line.cyan(), "<- root".magenta());
        } else {
            println!("{}", line);
        }
    }

    let root = graph
        .root()
        .and_then(|id| graph.node(id))
        .map(|n| n.label.clone())
        .unwrap_or_else(|| "none".to_string());
    println!(
        "\n{} nodes, {} edges, root: {}",
        graph.len(),
        graph.edge_count(),
        root
    );
    Ok(())
}
