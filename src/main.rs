use log::{error, info};
use std::process;

use md_tools::config::{AnalyzeConfig, Command};
use md_tools::histogram::Summary;
use md_tools::thermo::ThermoTable;
use md_tools::{analyze_dump, init, plot, stats, thermo, Result};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // parse command line options and run the requested tool
    if let Err(e) = Command::new().and_then(run) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Analyze(config) => analyze(&config),
        Command::Init(config) => {
            init::make_dat_file(&config.output, &config.params, &config.style)?;
            Ok(())
        }
        Command::CleanLog(config) => {
            thermo::clean_log(&config.input, &config.output, &config.header)?;
            Ok(())
        }
        Command::Stats(config) => {
            let found = stats::do_stats(
                &config.columns,
                &config.table,
                &config.command,
                config.output.as_deref(),
            )?;
            for s in &found {
                println!("{} {} +/- {}", s.name, s.mean, s.std_dev);
            }
            Ok(())
        }
        Command::Plot(config) => {
            let table = ThermoTable::read(&config.table)?;
            let labels = config.labels.unwrap_or_default();
            plot::plot_params(
                &config.output,
                &table,
                &labels,
                config.window,
                config.caption.as_deref(),
            )
        }
    }
}

fn analyze(config: &AnalyzeConfig) -> Result<()> {
    let analysis = analyze_dump(&config.dump, &config.analysis)?;
    let distances = analysis.distances();

    if let Some(s) = Summary::of(&distances) {
        info!(
            "{} bond lengths: mean {:.4} +/- {:.4}, range [{:.4}, {:.4}]",
            s.count, s.mean, s.std_dev, s.min, s.max
        );
    }

    if let Some(path) = &config.bonds_out {
        analysis.save_bonds(path)?;
    }

    let hist = analysis.histogram(&config.analysis)?;
    match &config.hist_out {
        Some(path) => hist.save(path)?,
        None => {
            let stdout = std::io::stdout();
            hist.write_table(&mut stdout.lock())?;
        }
    }

    if let Some(path) = &config.plot {
        plot::plot_histogram(path, &hist, "Bond length distribution")?;
    }

    let zoom = analysis.zoom_histogram(&config.analysis)?;
    let [lo, hi] = config.analysis.zoom_range;
    info!("{} of {} bond lengths fall in [{}, {}]", zoom.total(), distances.len(), lo, hi);
    if let Some(path) = &config.zoom_out {
        zoom.save(path)?;
    }
    if let Some(path) = &config.zoom_plot {
        let title = format!("Bond length distribution in [{}, {}]", lo, hi);
        plot::plot_histogram(path, &zoom, &title)?;
    }
    Ok(())
}
