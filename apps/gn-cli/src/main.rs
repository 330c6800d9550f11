use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use gn_app::{AppError, AppResult, Workspace};
use gn_core::{PipeId, StationId};
use gn_graph::{Pipe, PipeQuery, STANDARD_DIAMETERS_MM, Station, StationQuery};

#[derive(Parser)]
#[command(name = "gn-cli")]
#[command(about = "Gas transport network editor and analyser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty network file
    Init {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        /// Network name
        #[arg(long, default_value = "network")]
        name: String,
    },
    /// Validate a network file and rebuild its connection graph
    Validate {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
    },
    /// Print stations, pipes, and connections
    Show {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
    },
    /// Print stations in topological order
    Sort {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
    },
    /// Shortest path by pipe length between two stations
    Path {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        source: u32,
        sink: u32,
    },
    /// Maximum flow and shortest path between two stations
    Flow {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        source: u32,
        sink: u32,
    },
    /// Register a new compressor station
    AddStation {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        name: String,
        #[arg(long, default_value_t = 0)]
        workshops: u32,
        #[arg(long, default_value_t = 0)]
        in_operation: u32,
        #[arg(long, default_value = "")]
        class: String,
    },
    /// Register a new pipe
    AddPipe {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        name: String,
        /// Length in metres
        #[arg(long)]
        length: f64,
        /// Diameter in millimetres
        #[arg(long)]
        diameter: u32,
        #[arg(long)]
        in_repair: bool,
    },
    /// Search pipes by name or repair flag, optionally editing the matches
    FindPipes {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        #[command(flatten)]
        filter: PipeFilter,
        /// Set the repair flag on every match (true/false)
        #[arg(long)]
        set_repair: Option<bool>,
    },
    /// Search stations by name or share of idle workshops
    FindStations {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        #[command(flatten)]
        filter: StationFilter,
    },
    /// Set how many workshops of a station are in operation
    Workshops {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        station: u32,
        in_operation: u32,
    },
    /// Connect two stations with a pipe
    Connect {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        from: u32,
        to: u32,
        #[command(flatten)]
        pipe: PipeChoice,
    },
    /// Remove the connection backed by a pipe
    Disconnect {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        pipe: u32,
    },
    /// Mark a pipe as under repair or back in service
    Repair {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        pipe: u32,
        /// Put the pipe under repair
        #[arg(long, conflicts_with = "off")]
        on: bool,
        /// Return the pipe to service
        #[arg(long)]
        off: bool,
    },
    /// Delete a pipe, detaching it first if connected
    DeletePipe {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        pipe: u32,
    },
    /// Delete a station and all of its connections
    DeleteStation {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        station: u32,
    },
    /// Write connections as a plain `from to pipe` list
    ExportConnections {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace connections with a plain `from to pipe` list
    ImportConnections {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        /// Connection list to read
        input: PathBuf,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct PipeFilter {
    /// Exact pipe name
    #[arg(long)]
    name: Option<String>,
    /// Repair flag to match (true/false)
    #[arg(long)]
    in_repair: Option<bool>,
}

impl PipeFilter {
    fn query(&self) -> AppResult<PipeQuery> {
        match (&self.name, self.in_repair) {
            (Some(name), _) => Ok(PipeQuery::Name(name.clone())),
            (None, Some(flag)) => Ok(PipeQuery::InRepair(flag)),
            (None, None) => Err(AppError::InvalidInput(
                "either --name or --in-repair is required".to_string(),
            )),
        }
    }
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct StationFilter {
    /// Exact station name
    #[arg(long)]
    name: Option<String>,
    /// Minimum percentage of idle workshops
    #[arg(long)]
    min_idle: Option<f64>,
}

impl StationFilter {
    fn query(&self) -> AppResult<StationQuery> {
        match (&self.name, self.min_idle) {
            (Some(name), _) => Ok(StationQuery::Name(name.clone())),
            (None, Some(percent)) => Ok(StationQuery::MinIdlePercent(percent)),
            (None, None) => Err(AppError::InvalidInput(
                "either --name or --min-idle is required".to_string(),
            )),
        }
    }
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct PipeChoice {
    /// Use this pipe id
    #[arg(long)]
    pipe: Option<u32>,
    /// Use the first unused pipe of this diameter (mm)
    #[arg(long)]
    diameter: Option<u32>,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { network_path, name } => cmd_init(&network_path, &name),
        Commands::Validate { network_path } => cmd_validate(&network_path),
        Commands::Show { network_path } => cmd_show(&network_path),
        Commands::Sort { network_path } => cmd_sort(&network_path),
        Commands::Path {
            network_path,
            source,
            sink,
        } => cmd_path(&network_path, StationId::new(source), StationId::new(sink)),
        Commands::Flow {
            network_path,
            source,
            sink,
        } => cmd_flow(&network_path, StationId::new(source), StationId::new(sink)),
        Commands::AddStation {
            network_path,
            name,
            workshops,
            in_operation,
            class,
        } => cmd_add_station(&network_path, name, workshops, in_operation, class),
        Commands::AddPipe {
            network_path,
            name,
            length,
            diameter,
            in_repair,
        } => cmd_add_pipe(&network_path, name, length, diameter, in_repair),
        Commands::FindPipes {
            network_path,
            filter,
            set_repair,
        } => cmd_find_pipes(&network_path, &filter, set_repair),
        Commands::FindStations {
            network_path,
            filter,
        } => cmd_find_stations(&network_path, &filter),
        Commands::Workshops {
            network_path,
            station,
            in_operation,
        } => cmd_workshops(&network_path, StationId::new(station), in_operation),
        Commands::Connect {
            network_path,
            from,
            to,
            pipe,
        } => cmd_connect(&network_path, StationId::new(from), StationId::new(to), &pipe),
        Commands::Disconnect { network_path, pipe } => {
            cmd_disconnect(&network_path, PipeId::new(pipe))
        }
        Commands::Repair {
            network_path,
            pipe,
            on,
            off,
        } => cmd_repair(&network_path, PipeId::new(pipe), on, off),
        Commands::DeletePipe { network_path, pipe } => {
            cmd_delete_pipe(&network_path, PipeId::new(pipe))
        }
        Commands::DeleteStation {
            network_path,
            station,
        } => cmd_delete_station(&network_path, StationId::new(station)),
        Commands::ExportConnections {
            network_path,
            output,
        } => cmd_export_connections(&network_path, output.as_deref()),
        Commands::ImportConnections {
            network_path,
            input,
        } => cmd_import_connections(&network_path, &input),
    }
}

fn cmd_init(network_path: &Path, name: &str) -> AppResult<()> {
    if network_path.exists() {
        return Err(AppError::InvalidInput(format!(
            "{} already exists",
            network_path.display()
        )));
    }
    Workspace::new(name).save(network_path)?;
    println!("✓ Created network '{}' at {}", name, network_path.display());
    Ok(())
}

fn cmd_validate(network_path: &Path) -> AppResult<()> {
    println!("Validating network: {}", network_path.display());
    let ws = Workspace::load(network_path)?;
    println!("✓ Network is valid");
    println!(
        "  {} stations, {} pipes, {} connections",
        ws.inventory.stations.len(),
        ws.inventory.pipes.len(),
        ws.network.connection_count()
    );
    Ok(())
}

fn cmd_show(network_path: &Path) -> AppResult<()> {
    let ws = Workspace::load(network_path)?;
    println!("Network: {}", ws.name);

    if ws.inventory.stations.is_empty() {
        println!("No stations.");
    } else {
        println!("Stations:");
        for s in ws.inventory.stations.values() {
            println!(
                "  KC {} - {} ({}/{} workshops in operation, {:.0}% idle, class {})",
                s.id,
                s.name,
                s.workshops_in_operation,
                s.workshops,
                s.idle_fraction() * 100.0,
                s.class
            );
        }
    }

    if ws.inventory.pipes.is_empty() {
        println!("No pipes.");
    } else {
        println!("Pipes:");
        for p in ws.inventory.pipes.values() {
            let state = match (p.in_repair, ws.network.is_pipe_used(p.id)) {
                (true, _) => "under repair",
                (false, true) => "in use",
                (false, false) => "free",
            };
            println!(
                "  Pipe {} - {} ({} m, {} mm, capacity {}, {})",
                p.id,
                p.name,
                p.length_m(),
                p.diameter_mm,
                p.capacity(),
                state
            );
        }
    }

    println!();
    print!("{}", ws.listing());
    Ok(())
}

fn cmd_sort(network_path: &Path) -> AppResult<()> {
    let ws = Workspace::load(network_path)?;
    let order = ws.topological_order()?;
    println!("Topological order:");
    for (pos, id) in order.iter().enumerate() {
        match ws.inventory.station_name(*id) {
            Some(name) => println!("  {}. KC {} ({})", pos + 1, id, name),
            None => println!("  {}. KC {}", pos + 1, id),
        }
    }
    Ok(())
}

fn cmd_path(network_path: &Path, source: StationId, sink: StationId) -> AppResult<()> {
    let ws = Workspace::load(network_path)?;
    let report = ws.path_report(source, sink)?;
    print!("{}", report);
    Ok(())
}

fn cmd_flow(network_path: &Path, source: StationId, sink: StationId) -> AppResult<()> {
    let ws = Workspace::load(network_path)?;
    let report = ws.flow_report(source, sink)?;
    print!("{}", report);
    Ok(())
}

fn cmd_add_station(
    network_path: &Path,
    name: String,
    workshops: u32,
    in_operation: u32,
    class: String,
) -> AppResult<()> {
    let mut ws = Workspace::load(network_path)?;
    let id = ws.next_station_id()?;
    ws.add_station(Station::new(id, name, workshops, in_operation, class)?)?;
    ws.save(network_path)?;
    println!("✓ Added station KC {}", id);
    Ok(())
}

fn cmd_add_pipe(
    network_path: &Path,
    name: String,
    length_m: f64,
    diameter_mm: u32,
    in_repair: bool,
) -> AppResult<()> {
    let mut ws = Workspace::load(network_path)?;
    let id = ws.next_pipe_id()?;
    ws.add_pipe(Pipe::new(id, name, length_m, diameter_mm, in_repair)?)?;
    ws.save(network_path)?;
    println!("✓ Added pipe {}", id);
    Ok(())
}

fn cmd_find_pipes(
    network_path: &Path,
    filter: &PipeFilter,
    set_repair: Option<bool>,
) -> AppResult<()> {
    let mut ws = Workspace::load(network_path)?;
    let found = ws.find_pipes(&filter.query()?);
    if found.is_empty() {
        println!("No pipes found.");
        return Ok(());
    }
    for id in &found {
        if let Some(p) = ws.inventory.pipe(*id) {
            println!(
                "  Pipe {} - {} ({} m, {} mm, {})",
                p.id,
                p.name,
                p.length_m(),
                p.diameter_mm,
                if p.in_repair { "under repair" } else { "in service" }
            );
        }
    }
    if let Some(flag) = set_repair {
        let refreshed = ws.set_repair_many(&found, flag)?;
        ws.save(network_path)?;
        println!(
            "✓ Updated {} pipe(s), {} connection(s) refreshed",
            found.len(),
            refreshed
        );
    }
    Ok(())
}

fn cmd_find_stations(network_path: &Path, filter: &StationFilter) -> AppResult<()> {
    let ws = Workspace::load(network_path)?;
    let found = ws.find_stations(&filter.query()?);
    if found.is_empty() {
        println!("No stations found.");
        return Ok(());
    }
    for id in &found {
        if let Some(s) = ws.inventory.station(*id) {
            println!(
                "  KC {} - {} ({}/{} workshops in operation, {:.0}% idle)",
                s.id,
                s.name,
                s.workshops_in_operation,
                s.workshops,
                s.idle_fraction() * 100.0
            );
        }
    }
    Ok(())
}

fn cmd_workshops(network_path: &Path, station: StationId, in_operation: u32) -> AppResult<()> {
    let mut ws = Workspace::load(network_path)?;
    ws.set_workshops_in_operation(station, in_operation)?;
    ws.save(network_path)?;
    println!(
        "✓ KC {} now has {} workshop(s) in operation",
        station, in_operation
    );
    Ok(())
}

fn cmd_connect(
    network_path: &Path,
    from: StationId,
    to: StationId,
    choice: &PipeChoice,
) -> AppResult<()> {
    let mut ws = Workspace::load(network_path)?;
    let pipe = match (choice.pipe, choice.diameter) {
        (Some(pipe), _) => {
            let pipe = PipeId::new(pipe);
            ws.connect(from, to, pipe)?;
            pipe
        }
        (None, Some(diameter)) => {
            if !STANDARD_DIAMETERS_MM.contains(&diameter) {
                println!(
                    "Note: {} mm is not a standard diameter ({:?})",
                    diameter, STANDARD_DIAMETERS_MM
                );
            }
            ws.connect_by_diameter(from, to, diameter)?
        }
        (None, None) => {
            return Err(AppError::InvalidInput(
                "either --pipe or --diameter is required".to_string(),
            ));
        }
    };
    ws.save(network_path)?;
    println!("✓ Connected KC {} --> KC {} via pipe {}", from, to, pipe);
    Ok(())
}

fn cmd_disconnect(network_path: &Path, pipe: PipeId) -> AppResult<()> {
    let mut ws = Workspace::load(network_path)?;
    let edge = ws.disconnect(pipe)?;
    ws.save(network_path)?;
    println!(
        "✓ Removed connection KC {} --> KC {} (pipe {})",
        edge.from, edge.to, pipe
    );
    Ok(())
}

fn cmd_repair(network_path: &Path, pipe: PipeId, on: bool, off: bool) -> AppResult<()> {
    if on == off {
        return Err(AppError::InvalidInput(
            "exactly one of --on or --off is required".to_string(),
        ));
    }
    let mut ws = Workspace::load(network_path)?;
    let refreshed = ws.set_repair(pipe, on)?;
    ws.save(network_path)?;
    let state = if on { "under repair" } else { "in service" };
    println!("✓ Pipe {} is now {} ({} connection(s) updated)", pipe, state, refreshed);
    Ok(())
}

fn cmd_delete_pipe(network_path: &Path, pipe: PipeId) -> AppResult<()> {
    let mut ws = Workspace::load(network_path)?;
    let detached = ws.delete_pipe(pipe)?;
    ws.save(network_path)?;
    match detached {
        Some(edge) => println!(
            "✓ Pipe {} deleted (was connecting KC {} --> KC {})",
            pipe, edge.from, edge.to
        ),
        None => println!("✓ Pipe {} deleted", pipe),
    }
    Ok(())
}

fn cmd_delete_station(network_path: &Path, station: StationId) -> AppResult<()> {
    let mut ws = Workspace::load(network_path)?;
    let removed = ws.delete_station(station)?;
    ws.save(network_path)?;
    println!(
        "✓ Station KC {} deleted, {} connection(s) removed",
        station,
        removed.len()
    );
    Ok(())
}

fn cmd_export_connections(network_path: &Path, output: Option<&Path>) -> AppResult<()> {
    let ws = Workspace::load(network_path)?;
    match output {
        Some(path) => {
            let count = ws.export_connections(BufWriter::new(File::create(path)?))?;
            println!("✓ Wrote {} connection(s) to {}", count, path.display());
        }
        None => {
            ws.export_connections(std::io::stdout().lock())?;
        }
    }
    Ok(())
}

fn cmd_import_connections(network_path: &Path, input: &Path) -> AppResult<()> {
    let mut ws = Workspace::load(network_path)?;
    let connections = gn_project::read_connections(File::open(input)?)?;
    let count = ws.import_connections(&connections)?;
    ws.save(network_path)?;
    println!("✓ Imported {} connection(s) from {}", count, input.display());
    Ok(())
}
