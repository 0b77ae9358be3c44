//! sim-runner: headless simulation runner for TradeSim.
//!
//! Usage:
//!   sim-runner --seed 12345 --ticks 365 --data-dir ./data
//!   sim-runner --seed 12345 --load active_game --ticks 30 --save checkpoint
//!   sim-runner --seed 12345 --db run.db
//!   sim-runner --seed 12345 --ipc-mode

use anyhow::{Context, Result};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tradesim_core::{
    config::{SimConfig, CONFIG_FILE},
    engine::{SimEngine, WorldSummary, DEFAULT_SAVE_DIR},
    journal::EventJournal,
};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick {
        count: u64,
    },
    Save {
        #[serde(default)]
        name: Option<String>,
    },
    Load {
        #[serde(default)]
        name: Option<String>,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 365u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = str_arg(&args, "--data-dir").unwrap_or("./data");
    let save_dir = str_arg(&args, "--save-dir").unwrap_or(DEFAULT_SAVE_DIR);
    let load = str_arg(&args, "--load");
    let save = str_arg(&args, "--save");
    let db = str_arg(&args, "--db");

    let config_path = format!("{data_dir}/{CONFIG_FILE}");
    let config = if Path::new(&config_path).exists() {
        SimConfig::load(data_dir)?
    } else {
        log::warn!("{config_path} not found, using built-in defaults");
        SimConfig::default()
    };

    let run_id = format!("run-{seed}-{}", uuid::Uuid::new_v4());

    if !ipc_mode {
        println!("TradeSim sim-runner");
        println!("  run_id:    {run_id}");
        println!("  seed:      {seed}");
        println!("  ticks:     {ticks}");
        println!("  data_dir:  {data_dir}");
        println!("  save_dir:  {save_dir}");
        println!();
    }

    let mut engine = SimEngine::build(run_id.clone(), seed, config)
        .context("building engine")?
        .with_snapshot_dir(save_dir);

    if let Some(path) = db {
        let journal = EventJournal::open(path)?;
        journal.migrate()?;
        journal.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"))?;
        engine = engine.with_journal(journal);
    }

    if let Some(name) = load {
        if !engine.load_snapshot(Some(name))? {
            anyhow::bail!("snapshot '{name}' not found in {save_dir}");
        }
    }

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
        return Ok(());
    }

    engine.run_ticks(ticks)?;
    if let Some(name) = save {
        let path = engine.save_snapshot(Some(name))?;
        println!("  saved:     {}", path.display());
    }
    print_summary(&engine, &run_id)?;
    Ok(())
}

fn run_ipc_loop(engine: &mut SimEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let outcome = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Ok(()),
            IpcCommand::Tick { count } => engine.run_ticks(count).map(|_| ()),
            IpcCommand::Save { name } => engine.save_snapshot(name.as_deref()).map(|_| ()),
            IpcCommand::Load { name } => match engine.load_snapshot(name.as_deref()) {
                Ok(true) => Ok(()),
                Ok(false) => {
                    write_error(&mut stdout, "snapshot not found")?;
                    continue;
                }
                Err(e) => Err(e),
            },
        };

        match outcome {
            Ok(()) => {
                let state = engine.summary();
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
                stdout.flush()?;
            }
            Err(e) => write_error(&mut stdout, &e.to_string())?,
        }
    }
    Ok(())
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(engine: &SimEngine, run_id: &str) -> Result<()> {
    let WorldSummary {
        tick,
        products,
        active_products,
        suppliers,
        companies,
        total_budget,
        mean_base_price,
        total_stock,
        quotes,
    } = engine.summary();

    println!("=== RUN SUMMARY ===");
    println!("  run_id:          {run_id}");
    println!("  final tick:      {tick}");
    println!("  products:        {products} ({active_products} active)");
    println!("  suppliers:       {suppliers}");
    println!("  companies:       {companies}");
    println!("  total budget:    {total_budget:.2}");
    println!("  mean base price: {mean_base_price:.2}");
    println!("  total stock:     {total_stock}");
    println!("  price quotes:    {quotes}");

    if let Some(journal) = engine.journal() {
        println!();
        println!("=== EVENT COUNTS ===");
        for event_type in [
            "budget_recharged",
            "product_restocked",
            "supplier_stock_recharged",
            "price_inflated",
            "price_decayed",
            "product_deactivated",
            "product_reactivated",
        ] {
            let n = journal.count_by_type(run_id, event_type)?;
            println!("  {event_type:<26} {n}");
        }
        println!("  {:<26} {}", "total", journal.count_total(run_id)?);
    }
    Ok(())
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
