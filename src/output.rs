use crate::charts::ChartSpec;
use crate::error::{MetricsError, MetricsResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

fn output_error(path: &Path) -> impl FnOnce(std::io::Error) -> MetricsError + '_ {
    move |source| MetricsError::Output { path: path.to_path_buf(), source }
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> MetricsResult<()> {
    let csv_err = |source: csv::Error| MetricsError::Csv { path: path.to_path_buf(), source };
    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
    for r in rows {
        wtr.serialize(r).map_err(csv_err)?;
    }
    wtr.flush().map_err(output_error(path))?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> MetricsResult<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).map_err(output_error(path))?;
    Ok(())
}

/// Write one chart as `chart_<id>.json` under `dir`.
pub fn write_chart(dir: &Path, chart: &ChartSpec) -> MetricsResult<PathBuf> {
    let path = dir.join(format!("chart_{}.json", chart.id));
    write_json(&path, chart)?;
    Ok(path)
}

pub fn ensure_dir(dir: &Path) -> MetricsResult<()> {
    std::fs::create_dir_all(dir).map_err(output_error(dir))
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
