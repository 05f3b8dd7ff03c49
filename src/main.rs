use anyhow::{bail, Context, Result};
use std::{env, fs, path::Path};
use tablekit::{Config, Format, MemoryStore, Workbench};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "usage:
  tablekit generate <OUT> [ROWS] [HEADER...]
  tablekit convert <IN> <OUT>
  tablekit inspect <IN>
  tablekit add-header <IN> <OUT> <NAME>
  tablekit set-cell <IN> <OUT> <ROW> <HEADER> <VALUE>";

fn main() -> Result<()> {
    let config = Config::from_env()?;

    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) dispatch ─────────────────────────────────────────────────
    let args: Vec<String> = env::args().skip(1).collect();
    run(&args, &config)
}

fn run(args: &[String], config: &Config) -> Result<()> {
    let bench = Workbench::from_config(MemoryStore::new(), config);
    let (command, rest) = args.split_first().context(USAGE)?;

    match (command.as_str(), rest) {
        ("generate", [out, tail @ ..]) => {
            let (rows, headers) = match tail.split_first() {
                Some((rows, headers)) => (
                    rows.parse::<usize>()
                        .with_context(|| format!("ROWS must be a count, got {:?}", rows))?,
                    headers.to_vec(),
                ),
                None => (config.default_rows, Vec::new()),
            };
            let headers = if headers.is_empty() {
                config.default_headers.clone()
            } else {
                headers
            };
            bench.generate(&headers, rows);
            save(&bench, out)
        }
        ("convert", [input, out]) => {
            load(&bench, input)?;
            save(&bench, out)
        }
        ("inspect", [input]) => {
            load(&bench, input)?;
            let table = bench.current();
            let summary = serde_json::json!({
                "headers": table.header_defs(),
                "rows": table.len(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        ("add-header", [input, out, name]) => {
            load(&bench, input)?;
            bench.add_header(name);
            save(&bench, out)
        }
        ("set-cell", [input, out, row, header, value]) => {
            load(&bench, input)?;
            let row = row
                .parse::<usize>()
                .with_context(|| format!("ROW must be an index, got {:?}", row))?;
            bench.update_cell(row, header, value.as_str());
            save(&bench, out)
        }
        _ => bail!("unrecognised arguments {:?}\n{}", args, USAGE),
    }
}

fn load(bench: &Workbench<MemoryStore>, path: &str) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path))?;
    let table = bench.import(path, &bytes)?;
    info!(path, rows = table.len(), "loaded");
    Ok(())
}

fn save(bench: &Workbench<MemoryStore>, path: &str) -> Result<()> {
    let format = Format::from_file_name(path)
        .with_context(|| format!("cannot tell output format from {}", path))?;
    let export = bench.export(format)?;
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::write(path, &export.bytes).with_context(|| format!("writing {}", path))?;
    info!(path, bytes = export.bytes.len(), "saved");
    Ok(())
}
