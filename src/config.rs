use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::init::{InitParams, InitStyle};
use crate::plot::TimeWindow;
use crate::stats::DEFAULT_COMMAND;
use crate::thermo::DEFAULT_HEADER;

/// How bonded neighbors are inferred from atom types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    BeadSpring,
    Colloid,
}

impl FromStr for Style {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "beadspring" => Ok(Style::BeadSpring),
            "colloid" => Ok(Style::Colloid),
            other => Err(Error::config(format!("unknown topology style '{}'", other))),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Style::BeadSpring => write!(f, "beadspring"),
            Style::Colloid => write!(f, "colloid"),
        }
    }
}

/// Validated neighbor rule, one parameter record per style.
#[derive(Debug, Clone, PartialEq)]
pub enum Topology {
    BeadSpring {
        end_type: u32,
        mid_types: BTreeSet<u32>,
        ignored_types: BTreeSet<u32>,
    },
    Colloid {
        colloid_type: u32,
        ignored_types: BTreeSet<u32>,
    },
}

impl Topology {
    pub fn bead_spring<M, I>(end_type: u32, mid_types: M, ignored_types: I) -> Result<Topology>
    where
        M: IntoIterator<Item = u32>,
        I: IntoIterator<Item = u32>,
    {
        let mid_types: BTreeSet<u32> = mid_types.into_iter().collect();
        let ignored_types: BTreeSet<u32> = ignored_types.into_iter().collect();

        if mid_types.contains(&end_type) {
            return Err(Error::config(format!(
                "chain end type {} is also listed as a chain middle type",
                end_type
            )));
        }
        if ignored_types.contains(&end_type) {
            return Err(Error::config(format!(
                "chain end type {} is also listed as ignored",
                end_type
            )));
        }
        if let Some(t) = mid_types.intersection(&ignored_types).next() {
            return Err(Error::config(format!(
                "chain middle type {} is also listed as ignored",
                t
            )));
        }

        Ok(Topology::BeadSpring {
            end_type,
            mid_types,
            ignored_types,
        })
    }

    pub fn colloid<I>(colloid_type: u32, ignored_types: I) -> Result<Topology>
    where
        I: IntoIterator<Item = u32>,
    {
        let ignored_types: BTreeSet<u32> = ignored_types.into_iter().collect();
        if ignored_types.contains(&colloid_type) {
            return Err(Error::config(format!(
                "colloid type {} is also listed as ignored",
                colloid_type
            )));
        }
        Ok(Topology::Colloid {
            colloid_type,
            ignored_types,
        })
    }

    pub fn style(&self) -> Style {
        match self {
            Topology::BeadSpring { .. } => Style::BeadSpring,
            Topology::Colloid { .. } => Style::Colloid,
        }
    }
}

/// Type classification for dump analysis, loadable from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub style: Style,
    pub end_type: u32,
    pub mid_types: Vec<u32>,
    pub colloid_type: u32,
    pub ignored_types: Vec<u32>,
    pub bins: usize,
    /// `[lo, hi]` of the zoomed histogram.
    pub zoom_range: [f64; 2],
    pub zoom_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            style: Style::BeadSpring,
            end_type: 1,
            mid_types: vec![2],
            colloid_type: 4,
            ignored_types: vec![3],
            bins: 200,
            zoom_range: [0.0, 0.2],
            zoom_bins: 1000,
        }
    }
}

impl AnalysisConfig {
    /// Load from an existing TOML file. A missing file is an error rather than
    /// a freshly written default.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<AnalysisConfig> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::config(format!(
                "configuration file {} does not exist",
                path.display()
            )));
        }
        Ok(confy::load_path(path)?)
    }

    /// Reject bin counts and zoom ranges no histogram can be built from.
    pub fn check_histograms(&self) -> Result<()> {
        if self.bins == 0 || self.zoom_bins == 0 {
            return Err(Error::config("histograms need at least one bin"));
        }
        let [lo, hi] = self.zoom_range;
        if !(lo.is_finite() && hi.is_finite() && hi > lo) {
            return Err(Error::config(format!("zoom range [{}, {}] is empty", lo, hi)));
        }
        Ok(())
    }

    pub fn topology(&self) -> Result<Topology> {
        match self.style {
            Style::BeadSpring => Topology::bead_spring(
                self.end_type,
                self.mid_types.iter().copied(),
                self.ignored_types.iter().copied(),
            ),
            Style::Colloid => {
                Topology::colloid(self.colloid_type, self.ignored_types.iter().copied())
            }
        }
    }
}

pub struct AnalyzeConfig {
    pub dump: PathBuf,
    pub analysis: AnalysisConfig,
    pub bonds_out: Option<PathBuf>,
    pub hist_out: Option<PathBuf>,
    pub plot: Option<PathBuf>,
    pub zoom_out: Option<PathBuf>,
    pub zoom_plot: Option<PathBuf>,
}

pub struct InitConfig {
    pub params: InitParams,
    pub style: InitStyle,
    pub output: PathBuf,
}

pub struct CleanLogConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub header: String,
}

pub struct StatsConfig {
    pub table: PathBuf,
    pub columns: Vec<String>,
    pub command: String,
    pub output: Option<PathBuf>,
}

pub struct PlotConfig {
    pub table: PathBuf,
    pub output: PathBuf,
    pub labels: Option<Vec<String>>,
    pub window: TimeWindow,
    pub caption: Option<String>,
}

pub enum Command {
    Analyze(AnalyzeConfig),
    Init(InitConfig),
    CleanLog(CleanLogConfig),
    Stats(StatsConfig),
    Plot(PlotConfig),
}

impl Command {

    // parse the process command line, exiting on --help / usage errors
    pub fn new() -> Result<Command> {
        let matches = Command::app().get_matches();
        Command::from_matches(&matches)
    }

    pub fn from_iter<I, T>(args: I) -> Result<Command>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Command::app()
            .get_matches_from_safe(args)
            .map_err(|e| Error::config(e.to_string()))?;
        Command::from_matches(&matches)
    }

    fn app() -> App<'static, 'static> {
        App::new("md-tools")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Input generation and analysis helpers for bead-spring / colloid MD runs")
            .setting(AppSettings::SubcommandRequiredElseHelp)
            .subcommand(SubCommand::with_name("analyze")
                .about("Rebuild bonds from a dump file and histogram their minimum-image lengths")
                .arg(Arg::with_name("DUMP")
                    .help("Dump file with 'id type xs ys zs' atom rows")
                    .required(true))
                .arg(Arg::with_name("CONFIG")
                    .short("c")
                    .long("config")
                    .help("TOML file with style and type classification")
                    .takes_value(true))
                .arg(Arg::with_name("STYLE")
                    .long("style")
                    .help("Topology style (beadspring or colloid)")
                    .takes_value(true))
                .arg(Arg::with_name("END")
                    .long("end-type")
                    .help("Atom type of chain ends")
                    .takes_value(true))
                .arg(Arg::with_name("MID")
                    .long("mid-types")
                    .help("Atom types of chain middles, space or comma separated")
                    .takes_value(true))
                .arg(Arg::with_name("COLLOID")
                    .long("colloid-type")
                    .help("Atom type of colloids")
                    .takes_value(true))
                .arg(Arg::with_name("IGNORE")
                    .long("ignore-types")
                    .help("Atom types that carry no bonds, space or comma separated")
                    .takes_value(true))
                .arg(Arg::with_name("BINS")
                    .long("bins")
                    .help("Number of histogram bins")
                    .takes_value(true))
                .arg(Arg::with_name("RANGE")
                    .long("range")
                    .help("Distance range of the zoomed histogram [default: 0.0 0.2]")
                    .takes_value(true)
                    .number_of_values(2)
                    .value_names(&["LO", "HI"])
                    .allow_hyphen_values(true))
                .arg(Arg::with_name("ZOOM_BINS")
                    .long("zoom-bins")
                    .help("Number of bins of the zoomed histogram [default: 1000]")
                    .takes_value(true))
                .arg(Arg::with_name("ZOOM_OUT")
                    .long("zoom-out")
                    .help("Write the zoomed histogram table to this file [default: next to --hist-out]")
                    .takes_value(true))
                .arg(Arg::with_name("ZOOM_PLOT")
                    .long("zoom-plot")
                    .help("Write the zoomed histogram as an SVG image [default: next to --plot]")
                    .takes_value(true))
                .arg(Arg::with_name("BONDS")
                    .long("bonds-out")
                    .help("Write per-timestep bond lengths to this file")
                    .takes_value(true))
                .arg(Arg::with_name("HIST")
                    .long("hist-out")
                    .help("Write the histogram table to this file")
                    .takes_value(true))
                .arg(Arg::with_name("PLOT")
                    .long("plot")
                    .help("Write the histogram as an SVG image")
                    .takes_value(true)))
            .subcommand(SubCommand::with_name("init")
                .about("Write a LAMMPS data file with randomly placed polymers and solvent")
                .arg(Arg::with_name("STYLE")
                    .long("style")
                    .help("Polymer style (beadspring, diblock, star, spine)")
                    .takes_value(true)
                    .required(true))
                .arg(Arg::with_name("LX")
                    .long("lx")
                    .help("Box length along x")
                    .takes_value(true)
                    .default_value("20.0"))
                .arg(Arg::with_name("LY")
                    .long("ly")
                    .help("Box length along y")
                    .takes_value(true)
                    .default_value("20.0"))
                .arg(Arg::with_name("LZ")
                    .long("lz")
                    .help("Box length along z")
                    .takes_value(true)
                    .default_value("20.0"))
                .arg(Arg::with_name("NP")
                    .long("np")
                    .help("Number of polymers")
                    .takes_value(true)
                    .default_value("10"))
                .arg(Arg::with_name("NS")
                    .long("ns")
                    .help("Number of solvent beads")
                    .takes_value(true)
                    .default_value("0"))
                .arg(Arg::with_name("N")
                    .short("n")
                    .long("n")
                    .help("Beads per chain, ends included (beadspring)")
                    .takes_value(true))
                .arg(Arg::with_name("N1")
                    .long("n1")
                    .help("Beads in the first block, ends excluded (diblock)")
                    .takes_value(true))
                .arg(Arg::with_name("N2")
                    .long("n2")
                    .help("Beads in the second block, ends excluded (diblock)")
                    .takes_value(true))
                .arg(Arg::with_name("RC")
                    .long("rc")
                    .help("Minimum distance between a solvent bead and any other bead")
                    .takes_value(true)
                    .default_value("0"))
                .arg(Arg::with_name("SEED")
                    .long("seed")
                    .help("Random seed for bead placement")
                    .takes_value(true)
                    .default_value("0"))
                .arg(Arg::with_name("OUT")
                    .short("o")
                    .long("output")
                    .help("Output data file")
                    .takes_value(true)
                    .default_value("polymer0.dat")))
            .subcommand(SubCommand::with_name("clean-log")
                .about("Extract numeric thermo rows from a log file")
                .arg(Arg::with_name("LOG").required(true))
                .arg(Arg::with_name("OUT")
                    .help("Output table, comma separated when it ends in .csv")
                    .required(true))
                .arg(Arg::with_name("HEADER")
                    .long("header")
                    .help("Column names written as the first comment line")
                    .takes_value(true)
                    .default_value(DEFAULT_HEADER)))
            .subcommand(SubCommand::with_name("stats")
                .about("Run the external statistics tool on selected columns")
                .arg(Arg::with_name("TABLE").required(true))
                .arg(Arg::with_name("COLUMNS")
                    .long("columns")
                    .help("Column names, space separated")
                    .takes_value(true)
                    .required(true))
                .arg(Arg::with_name("COMMAND")
                    .long("command")
                    .help("Command template with {column} and {file} placeholders")
                    .takes_value(true)
                    .default_value(DEFAULT_COMMAND))
                .arg(Arg::with_name("OUT")
                    .short("o")
                    .long("output")
                    .takes_value(true)))
            .subcommand(SubCommand::with_name("plot")
                .about("Plot every table column against time")
                .arg(Arg::with_name("TABLE").required(true))
                .arg(Arg::with_name("OUT")
                    .help("SVG output path")
                    .required(true))
                .arg(Arg::with_name("LABELS")
                    .long("labels")
                    .help("Column names including time, space separated (default: table header)")
                    .takes_value(true))
                .arg(Arg::with_name("TLO")
                    .long("t-lo")
                    .takes_value(true))
                .arg(Arg::with_name("THI")
                    .long("t-hi")
                    .takes_value(true))
                .arg(Arg::with_name("CAPTION")
                    .long("caption")
                    .takes_value(true)))
    }

    fn from_matches(matches: &ArgMatches) -> Result<Command> {
        match matches.subcommand() {
            ("analyze", Some(m)) => Command::analyze_from(m).map(Command::Analyze),
            ("init", Some(m)) => Command::init_from(m).map(Command::Init),
            ("clean-log", Some(m)) => Ok(Command::CleanLog(CleanLogConfig {
                input: PathBuf::from(conv_match::<String>(m, "LOG")?),
                output: PathBuf::from(conv_match::<String>(m, "OUT")?),
                header: conv_match(m, "HEADER")?,
            })),
            ("stats", Some(m)) => Ok(Command::Stats(StatsConfig {
                table: PathBuf::from(conv_match::<String>(m, "TABLE")?),
                columns: conv_list::<String>(m, "COLUMNS")?.unwrap_or_default(),
                command: conv_match(m, "COMMAND")?,
                output: m.value_of("OUT").map(PathBuf::from),
            })),
            ("plot", Some(m)) => Ok(Command::Plot(PlotConfig {
                table: PathBuf::from(conv_match::<String>(m, "TABLE")?),
                output: PathBuf::from(conv_match::<String>(m, "OUT")?),
                labels: conv_list::<String>(m, "LABELS")?,
                window: TimeWindow::new(conv_opt::<f64>(m, "TLO")?, conv_opt::<f64>(m, "THI")?)?,
                caption: m.value_of("CAPTION").map(String::from),
            })),
            (other, _) => Err(Error::config(format!("unknown subcommand '{}'", other))),
        }
    }

    fn analyze_from(m: &ArgMatches) -> Result<AnalyzeConfig> {
        let mut analysis = match m.value_of("CONFIG") {
            Some(path) => AnalysisConfig::load(path)?,
            None => AnalysisConfig::default(),
        };

        // flags override the file
        if let Some(style) = conv_opt::<Style>(m, "STYLE")? {
            analysis.style = style;
        }
        if let Some(end) = conv_opt::<u32>(m, "END")? {
            analysis.end_type = end;
        }
        if let Some(mids) = conv_list::<u32>(m, "MID")? {
            analysis.mid_types = mids;
        }
        if let Some(colloid) = conv_opt::<u32>(m, "COLLOID")? {
            analysis.colloid_type = colloid;
        }
        if let Some(ignored) = conv_list::<u32>(m, "IGNORE")? {
            analysis.ignored_types = ignored;
        }
        if let Some(bins) = conv_opt::<usize>(m, "BINS")? {
            analysis.bins = bins;
        }
        if let Some(values) = m.values_of("RANGE") {
            let range = values
                .map(|v| {
                    v.parse::<f64>()
                        .map_err(|e| Error::config(format!("invalid value '{}' for RANGE: {}", v, e)))
                })
                .collect::<Result<Vec<f64>>>()?;
            match range[..] {
                [lo, hi] => analysis.zoom_range = [lo, hi],
                _ => return Err(Error::config("--range takes exactly two values")),
            }
        }
        if let Some(bins) = conv_opt::<usize>(m, "ZOOM_BINS")? {
            analysis.zoom_bins = bins;
        }
        analysis.check_histograms()?;

        let hist_out = m.value_of("HIST").map(PathBuf::from);
        let plot = m.value_of("PLOT").map(PathBuf::from);
        // the zoomed outputs sit next to the full ones unless named
        let zoom_out = m
            .value_of("ZOOM_OUT")
            .map(PathBuf::from)
            .or_else(|| hist_out.as_deref().map(zoom_path));
        let zoom_plot = m
            .value_of("ZOOM_PLOT")
            .map(PathBuf::from)
            .or_else(|| plot.as_deref().map(zoom_path));

        Ok(AnalyzeConfig {
            dump: PathBuf::from(conv_match::<String>(m, "DUMP")?),
            analysis,
            bonds_out: m.value_of("BONDS").map(PathBuf::from),
            hist_out,
            plot,
            zoom_out,
            zoom_plot,
        })
    }

    fn init_from(m: &ArgMatches) -> Result<InitConfig> {
        let style = InitStyle::from_parts(
            &conv_match::<String>(m, "STYLE")?,
            conv_opt(m, "N")?,
            conv_opt(m, "N1")?,
            conv_opt(m, "N2")?,
        )?;
        let params = InitParams {
            lx: conv_match(m, "LX")?,
            ly: conv_match(m, "LY")?,
            lz: conv_match(m, "LZ")?,
            n_p: conv_match(m, "NP")?,
            n_s: conv_match(m, "NS")?,
            rc: conv_match(m, "RC")?,
            seed: conv_match(m, "SEED")?,
        };
        Ok(InitConfig {
            params,
            style,
            output: PathBuf::from(conv_match::<String>(m, "OUT")?),
        })
    }
}

// convert matches to corresponding generic types
/// `dir/hist.dat` -> `dir/hist_zoom.dat`
pub fn zoom_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_zoom.{}", stem, ext.to_string_lossy()),
        None => format!("{}_zoom", stem),
    };
    path.with_file_name(name)
}

fn conv_match<T>(matches: &ArgMatches, tag: &str) -> Result<T>
    where T: FromStr, <T as FromStr>::Err: fmt::Display {
    let raw = matches
        .value_of(tag)
        .ok_or_else(|| Error::config(format!("missing value for {}", tag)))?;
    raw.parse::<T>()
        .map_err(|e| Error::config(format!("invalid value '{}' for {}: {}", raw, tag, e)))
}

fn conv_opt<T>(matches: &ArgMatches, tag: &str) -> Result<Option<T>>
    where T: FromStr, <T as FromStr>::Err: fmt::Display {
    match matches.value_of(tag) {
        Some(_) => conv_match(matches, tag).map(Some),
        None => Ok(None),
    }
}

// lists are accepted either space or comma separated
fn conv_list<T>(matches: &ArgMatches, tag: &str) -> Result<Option<Vec<T>>>
    where T: FromStr, <T as FromStr>::Err: fmt::Display {
    let raw = match matches.value_of(tag) {
        Some(raw) => raw,
        None => return Ok(None),
    };
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<T>()
                .map_err(|e| Error::config(format!("invalid entry '{}' for {}: {}", s, tag, e)))
        })
        .collect::<Result<Vec<T>>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_type_in_mid_types_is_rejected() {
        let err = Topology::bead_spring(1, vec![1, 2], vec![3]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn colloid_type_cannot_be_ignored() {
        assert!(matches!(
            Topology::colloid(4, vec![3, 4]),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn default_config_is_bead_spring() {
        let topology = AnalysisConfig::default().topology().unwrap();
        assert_eq!(topology.style(), Style::BeadSpring);
        match topology {
            Topology::BeadSpring { end_type, mid_types, ignored_types } => {
                assert_eq!(end_type, 1);
                assert!(mid_types.contains(&2));
                assert!(ignored_types.contains(&3));
            }
            _ => panic!("wrong style"),
        }
    }

    #[test]
    fn unknown_style_is_a_configuration_error() {
        assert!(matches!("spine".parse::<Style>(), Err(Error::Configuration(_))));
        assert_eq!("BeadSpring".parse::<Style>().unwrap(), Style::BeadSpring);
    }

    #[test]
    fn flags_override_defaults() {
        let cmd = Command::from_iter(vec![
            "md-tools", "analyze", "dump.txt",
            "--style", "colloid", "--colloid-type", "5", "--ignore-types", "1,2", "--bins", "50",
        ])
        .unwrap();
        match cmd {
            Command::Analyze(cfg) => {
                assert_eq!(cfg.dump, PathBuf::from("dump.txt"));
                assert_eq!(cfg.analysis.style, Style::Colloid);
                assert_eq!(cfg.analysis.colloid_type, 5);
                assert_eq!(cfg.analysis.ignored_types, vec![1, 2]);
                assert_eq!(cfg.analysis.bins, 50);
                assert_eq!(cfg.analysis.zoom_range, [0.0, 0.2]);
                assert_eq!(cfg.analysis.zoom_bins, 1000);
                assert!(cfg.plot.is_none());
                assert!(cfg.zoom_out.is_none() && cfg.zoom_plot.is_none());
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn zoom_flags_are_read() {
        let cmd = Command::from_iter(vec![
            "md-tools", "analyze", "dump.txt", "--range", "-0.1", "0.5", "--zoom-bins", "10",
            "--hist-out", "out/hist.dat", "--plot", "out/hist.svg", "--zoom-plot", "z.svg",
        ])
        .unwrap();
        match cmd {
            Command::Analyze(cfg) => {
                assert_eq!(cfg.analysis.zoom_range, [-0.1, 0.5]);
                assert_eq!(cfg.analysis.zoom_bins, 10);
                assert_eq!(cfg.zoom_out, Some(PathBuf::from("out/hist_zoom.dat")));
                assert_eq!(cfg.zoom_plot, Some(PathBuf::from("z.svg")));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn empty_zoom_range_is_rejected() {
        for args in &[
            vec!["md-tools", "analyze", "d", "--range", "0.2", "0.1"],
            vec!["md-tools", "analyze", "d", "--zoom-bins", "0"],
            vec!["md-tools", "analyze", "d", "--range", "0", "x"],
        ] {
            assert!(matches!(
                Command::from_iter(args.clone()),
                Err(Error::Configuration(_))
            ));
        }
    }

    #[test]
    fn zoom_path_keeps_extension() {
        assert_eq!(zoom_path(Path::new("a/b.svg")), PathBuf::from("a/b_zoom.svg"));
        assert_eq!(zoom_path(Path::new("hist")), PathBuf::from("hist_zoom"));
    }

    #[test]
    fn bad_number_is_reported() {
        let err = Command::from_iter(vec!["md-tools", "analyze", "d", "--end-type", "x"])
            .err()
            .unwrap();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.toml");
        std::fs::write(
            &path,
            "style = \"colloid\"\ncolloid_type = 7\nignored_types = [1, 2, 3]\n",
        )
        .unwrap();
        let cfg = AnalysisConfig::load(&path).unwrap();
        assert_eq!(cfg.style, Style::Colloid);
        assert_eq!(cfg.colloid_type, 7);
        assert_eq!(cfg.bins, 200);
        assert_eq!(cfg.zoom_bins, 1000);
        assert!(AnalysisConfig::load(dir.path().join("missing.toml")).is_err());
    }
}
