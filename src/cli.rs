//! CLI definition, dispatch, and the interactive shell session.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_history_adapter::CsvHistoryAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::static_quote_adapter::StaticQuoteAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::config_validation::validate_config;
use crate::domain::dashboard::{Dashboard, DashboardSettings};
use crate::domain::error::DashboardError;
use crate::domain::portfolio::PortfolioRow;
use crate::domain::price::PriceSeries;
use crate::ports::chart_port::ChartPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::history_port::HistoryPort;
use crate::ports::quote_port::QuotePort;

#[derive(Parser, Debug)]
#[command(name = "stockdash", about = "Stock market dashboard (INR)")]
pub struct Cli {
    /// INI configuration file; built-in defaults when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Use [prices] quotes and CSV history instead of the web
    #[arg(long, global = true)]
    pub offline: bool,
    /// Debug-level diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the current price of a stock
    Price { symbol: String },
    /// Show the recent daily closes of a stock
    History { symbol: String },
    /// Write a price/EMA/MACD chart as SVG
    Chart {
        symbol: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Start an interactive portfolio session
    Shell,
    /// Validate a configuration file
    Validate,
}

/// Quote and history sources chosen from the config and `--offline`.
pub struct MarketPorts {
    pub quotes: Box<dyn QuotePort>,
    pub history: Box<dyn HistoryPort>,
}

pub fn run(cli: Cli) -> ExitCode {
    if let Command::Validate = cli.command {
        return run_validate(cli.config.as_ref());
    }

    let config = match cli.config.as_ref() {
        Some(path) => match load_config(path) {
            Ok(c) => c,
            Err(code) => return code,
        },
        None => FileConfigAdapter::empty(),
    };
    if let Err(e) = validate_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let ports = match build_ports(&config, cli.offline) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let settings = DashboardSettings::from_config(&config);
    let mut dashboard = Dashboard::new(ports.quotes.as_ref(), ports.history.as_ref(), settings);
    let output_dir = chart_output_dir(&config);
    let charts = SvgChartAdapter::new();

    let result = match cli.command {
        Command::Price { symbol } => dashboard
            .spot_price(&symbol)
            .map(|(_, price)| println!("Current Price: {}", format_inr(price))),
        Command::History { symbol } => dashboard
            .price_history(&symbol, today())
            .map(|(symbol, series)| print!("{}", format_history(symbol.as_str(), &series))),
        Command::Chart { symbol, output } => {
            dashboard.price_chart(&symbol, today()).and_then(|chart| {
                let path = output
                    .unwrap_or_else(|| output_dir.join(format!("{}_chart.svg", chart.symbol)));
                charts.render_price_chart(&chart, &path)?;
                eprintln!("Chart written to {}", path.display());
                Ok(())
            })
        }
        Command::Shell => {
            eprintln!("Stock Market Dashboard (INR). Type `help` for commands.");
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            run_session(
                &mut dashboard,
                &charts,
                &output_dir,
                today,
                stdin.lock(),
                &mut stdout,
            )
            .map_err(DashboardError::from)
        }
        Command::Validate => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = DashboardError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_validate(config_path: Option<&PathBuf>) -> ExitCode {
    let Some(config_path) = config_path else {
        eprintln!("error: --config is required for validate");
        return ExitCode::from(2);
    };
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = validate_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let settings = DashboardSettings::from_config(&config);
    eprintln!("  History window: {} days", settings.history_days);
    eprintln!(
        "  Indicators:     EMA {} / EMA {}",
        settings.fast_period, settings.slow_period
    );
    let offline_quotes = config.keys("prices").len();
    if offline_quotes > 0 {
        eprintln!("  Offline quotes: {}", offline_quotes);
    }
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

pub fn build_ports(config: &dyn ConfigPort, offline: bool) -> Result<MarketPorts, DashboardError> {
    if offline {
        let csv_dir = config
            .get_string("history", "csv_dir")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| DashboardError::ConfigInvalid {
                section: "history".into(),
                key: "csv_dir".into(),
                reason: "required with --offline".into(),
            })?;
        return Ok(MarketPorts {
            quotes: Box::new(StaticQuoteAdapter::from_config(config)),
            history: Box::new(CsvHistoryAdapter::new(PathBuf::from(csv_dir))),
        });
    }

    #[cfg(feature = "net")]
    {
        use crate::adapters::google_quote_adapter::GoogleQuoteAdapter;
        use crate::adapters::yahoo_history_adapter::YahooHistoryAdapter;

        Ok(MarketPorts {
            quotes: Box::new(GoogleQuoteAdapter::from_config(config)?),
            history: Box::new(YahooHistoryAdapter::from_config(config)?),
        })
    }

    #[cfg(not(feature = "net"))]
    {
        Err(DashboardError::invalid_input(
            "built without the net feature; use --offline",
        ))
    }
}

fn chart_output_dir(config: &dyn ConfigPort) -> PathBuf {
    config
        .get_string("chart", "output_dir")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn format_inr(value: f64) -> String {
    format!("₹{:.2}", value)
}

pub fn format_history(symbol: &str, series: &PriceSeries) -> String {
    let mut out = format!("Last {} Prices for {}\n", series.len(), symbol);
    for point in series.points() {
        out.push_str(&format!("{}  {}\n", point.date, format_inr(point.price)));
    }
    out
}

pub fn format_portfolio(rows: &[PortfolioRow], total: f64) -> String {
    if rows.is_empty() {
        return format!(
            "Portfolio is empty.\nTotal Portfolio Value: {}\n",
            format_inr(total)
        );
    }
    let mut out = format!(
        "{:<12} {:>8} {:>14} {:>16}\n",
        "Symbol", "Shares", "Price", "Total Value"
    );
    for row in rows {
        out.push_str(&format!(
            "{:<12} {:>8} {:>14} {:>16}\n",
            row.symbol.as_str(),
            row.shares,
            format_inr(row.unit_price),
            format_inr(row.value)
        ));
    }
    out.push_str(&format!("Total Portfolio Value: {}\n", format_inr(total)));
    out
}

const HELP: &str = "\
Commands:
  price SYM            current price of SYM
  add SYM N            buy N shares of SYM at the current price
  delete SYM N         remove N shares of SYM
  show                 portfolio table and total value
  history SYM          recent daily closes of SYM
  chart SYM [PATH]     write a price/EMA/MACD chart (SVG)
  visualize [PATH]     write the portfolio allocation chart (SVG)
  help                 this message
  quit                 end the session
";

/// Reads commands line by line until `quit` or end of input. `today` is
/// asked once per command. Action errors are printed and the session
/// continues; only failures reading `input` or writing `out` end it.
pub fn run_session<R, W, C>(
    dashboard: &mut Dashboard<'_>,
    charts: &dyn ChartPort,
    output_dir: &Path,
    today: C,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    C: Fn() -> NaiveDate,
{
    write!(out, "> ")?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            write!(out, "> ")?;
            out.flush()?;
            continue;
        };

        match command.to_ascii_lowercase().as_str() {
            "quit" | "exit" => return Ok(()),
            "help" => write!(out, "{HELP}")?,
            other => match dispatch(dashboard, charts, output_dir, &today, other, args) {
                Ok(text) => write!(out, "{text}")?,
                Err(e) => writeln!(out, "error: {e}")?,
            },
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

/// Runs one session command and returns the text to show for it.
fn dispatch(
    dashboard: &mut Dashboard<'_>,
    charts: &dyn ChartPort,
    output_dir: &Path,
    today: &dyn Fn() -> NaiveDate,
    command: &str,
    args: &[&str],
) -> Result<String, DashboardError> {
    let text = match (command, args) {
        ("price", [symbol]) => {
            let (_, price) = dashboard.spot_price(symbol)?;
            format!("Current Price: {}\n", format_inr(price))
        }
        ("add", [symbol, shares]) => {
            let entry = dashboard.add_stock(symbol, shares)?;
            format!(
                "Added {} shares of {}. Holding {} @ {}.\n{}",
                shares.trim(),
                entry.symbol(),
                entry.shares(),
                format_inr(entry.unit_price()),
                format_portfolio(&dashboard.rows(), dashboard.total_value())
            )
        }
        ("delete", [symbol, shares]) => {
            let (symbol, deleted, _) = dashboard.delete_stock(symbol, shares)?;
            format!(
                "Deleted {} shares of {} from portfolio.\n{}",
                deleted,
                symbol,
                format_portfolio(&dashboard.rows(), dashboard.total_value())
            )
        }
        ("show", []) => format_portfolio(&dashboard.rows(), dashboard.total_value()),
        ("history", [symbol]) => {
            let (symbol, series) = dashboard.price_history(symbol, today())?;
            format_history(symbol.as_str(), &series)
        }
        ("chart", [symbol, rest @ ..]) if rest.len() <= 1 => {
            let chart = dashboard.price_chart(symbol, today())?;
            let path = rest.first().map(PathBuf::from).unwrap_or_else(|| {
                output_dir.join(format!("{}_chart.svg", chart.symbol))
            });
            charts.render_price_chart(&chart, &path)?;
            format!("Chart written to {}\n", path.display())
        }
        ("visualize", rest) if rest.len() <= 1 => {
            let slices = dashboard.allocation();
            let path = rest
                .first()
                .map(PathBuf::from)
                .unwrap_or_else(|| output_dir.join("portfolio.svg"));
            charts.render_allocation(&slices, &path)?;
            let mut text = String::new();
            if slices.is_empty() {
                text.push_str("No data: the portfolio is empty.\n");
            }
            text.push_str(&format!("Chart written to {}\n", path.display()));
            text
        }
        ("price" | "add" | "delete" | "show" | "history" | "chart" | "visualize", _) => {
            return Err(DashboardError::invalid_input(format!(
                "wrong arguments for `{command}`; type `help` for usage"
            )));
        }
        _ => {
            return Err(DashboardError::invalid_input(format!(
                "unknown command `{command}`; type `help` for usage"
            )));
        }
    };
    Ok(text)
}
