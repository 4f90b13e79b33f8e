// ==========================================
// 仓库货位网格系统 - 命令行主入口
// ==========================================
// 职责: 解析命令行参数,调用 WarehouseApi,输出文本结果
// 说明: 日志写 stderr,命令结果写 stdout
// ==========================================

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use warehouse_grid::api::WarehouseApi;
use warehouse_grid::app::{get_default_config_path, AppState, ViewState};
use warehouse_grid::config::{config_keys, AnalysisConfigReader};
use warehouse_grid::domain::grid::GridCoordinate;
use warehouse_grid::domain::view::{CellState, OccupancyMatrix};
use warehouse_grid::engine::export::ExportKind;
use warehouse_grid::importer::{check_parsed_uniqueness, ScanCombiner, ScanCsvParser};
use warehouse_grid::logging;

#[derive(Parser)]
#[command(name = "warehouse-grid")]
#[command(version, about = "仓库货位网格系统 - 扫描数据货位占用分析", long_about = None)]
struct Cli {
    /// 配置文件路径（默认: $WAREHOUSE_GRID_CONFIG_PATH 或用户配置目录）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 加载扫描文件并输出统计摘要
    Summary {
        /// 扫描 CSV 文件
        file: PathBuf,
    },

    /// 按 SKU / 货位子串搜索单元格
    Search {
        file: PathBuf,
        #[arg(long)]
        sku: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },

    /// 输出单元格明细（cell 如 1S32）
    Detail { file: PathBuf, cell: String },

    /// 列出重复 SKU 及其所在单元格
    Duplicates { file: PathBuf },

    /// 列出含空货位的单元格
    Empties { file: PathBuf },

    /// 导出报表 CSV
    Export {
        file: PathBuf,
        #[arg(long, value_enum)]
        kind: ExportTarget,
        /// kind=cell 时必填
        #[arg(long)]
        cell: Option<String>,
        /// 输出路径（默认使用报表默认文件名）
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// 以文本网格输出占用情况
    Grid {
        file: PathBuf,
        #[arg(long, value_enum, default_value = "off")]
        highlight: HighlightTarget,
        #[arg(long)]
        sku: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },

    /// 合并多个扫描文件（文件或目录）,(SKU, 货位) 去重保留首个时间戳
    Combine {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// 检查 (SKU, 货位) 组合是否唯一
    Check { file: PathBuf },

    /// 配置管理
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportTarget {
    Duplicates,
    Empties,
    Cell,
}

#[derive(Clone, Copy, ValueEnum)]
enum HighlightTarget {
    Off,
    Search,
    Duplicates,
    Empties,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// 输出当前配置（JSON）
    Show,
    /// 设置配置项并保存
    Set { key: String, value: String },
    /// 输出配置文件路径
    Path,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(get_default_config_path);
    tracing::debug!(config_path = %config_path.display(), version = warehouse_grid::VERSION, "启动");

    match cli.command {
        Commands::Summary { file } => {
            let api = open_api(config_path)?;
            run_summary(&api, &file)
        }
        Commands::Search {
            file,
            sku,
            location,
        } => {
            let api = open_api(config_path)?;
            run_search(&api, &file, sku.as_deref(), location.as_deref())
        }
        Commands::Detail { file, cell } => {
            let api = open_api(config_path)?;
            run_detail(&api, &file, &cell)
        }
        Commands::Duplicates { file } => {
            let api = open_api(config_path)?;
            api.load_from_file(&file)?;
            for sku in api.duplicate_skus()? {
                println!("{}", sku);
            }
            print_cells(&api.duplicates()?);
            Ok(())
        }
        Commands::Empties { file } => {
            let api = open_api(config_path)?;
            api.load_from_file(&file)?;
            print_cells(&api.empties()?);
            Ok(())
        }
        Commands::Export {
            file,
            kind,
            cell,
            output,
        } => {
            let api = open_api(config_path)?;
            run_export(&api, &file, kind, cell, output)
        }
        Commands::Grid {
            file,
            highlight,
            sku,
            location,
        } => {
            let api = open_api(config_path)?;
            run_grid(&api, &file, highlight, sku.as_deref(), location.as_deref())
        }
        Commands::Combine { inputs, output } => run_combine(&inputs, output.as_deref()),
        Commands::Check { file } => run_check(&file),
        Commands::Config { action } => run_config(config_path, action),
    }
}

fn open_api(config_path: PathBuf) -> Result<Arc<WarehouseApi>> {
    let state = AppState::new(config_path).context("配置加载失败")?;
    Ok(state.warehouse_api)
}

fn run_summary(api: &WarehouseApi, file: &Path) -> Result<()> {
    let report = api.load_from_file(file)?;
    let summary = api.summary()?;
    println!("来源: {}", report.source);
    println!("批次: {}", report.batch_id);
    println!("方言: {}", report.dialect);
    println!(
        "数据行: {}（保留 {}, 跳过 {}）",
        report.total_rows,
        report.loaded_records,
        report.skipped_rows.len()
    );
    println!(
        "入网格记录: {}（不可解码 {}）",
        report.indexed_records, report.unindexed_records
    );
    println!(
        "网格: {} 列 × {} 行 = {} 格",
        summary.columns, summary.rows, summary.total_cells
    );
    println!(
        "已占用: {}（布局外 {}）",
        summary.occupied_cells, summary.off_grid_cells
    );
    println!(
        "重复 SKU: {}（{} 格）",
        summary.duplicate_skus, summary.duplicate_cells
    );
    println!("空货位单元格: {}", summary.empty_cells);
    for skipped in &report.skipped_rows {
        println!("  跳过第 {} 行: {}", skipped.line, skipped.reason);
    }
    Ok(())
}

fn run_search(
    api: &WarehouseApi,
    file: &Path,
    sku: Option<&str>,
    location: Option<&str>,
) -> Result<()> {
    api.load_from_file(file)?;
    print_cells(&api.search(sku, location)?);
    Ok(())
}

fn run_detail(api: &WarehouseApi, file: &Path, cell: &str) -> Result<()> {
    api.load_from_file(file)?;
    let items = api.cell_detail_by_key(cell)?;
    if items.is_empty() {
        println!("{}: 无记录", cell.trim());
    }
    for item in items {
        let mut flags = Vec::new();
        if item.is_duplicate {
            flags.push("重复");
        }
        if item.is_empty {
            flags.push("空");
        }
        println!(
            "{}\t{}\t{}\t{}",
            item.sku,
            item.bin_code,
            item.timestamp.as_deref().unwrap_or("-"),
            flags.join(",")
        );
    }
    Ok(())
}

fn run_export(
    api: &WarehouseApi,
    file: &Path,
    kind: ExportTarget,
    cell: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    api.load_from_file(file)?;
    let kind = match kind {
        ExportTarget::Duplicates => ExportKind::DuplicateSkus,
        ExportTarget::Empties => ExportKind::EmptyBins,
        ExportTarget::Cell => {
            let Some(key) = cell else {
                bail!("--kind cell 需要同时指定 --cell");
            };
            let coordinate = GridCoordinate::parse_key(&key)
                .with_context(|| format!("无效的网格坐标: '{}'", key))?;
            ExportKind::CellDetail(coordinate)
        }
    };
    let csv = api.export_csv(&kind)?;
    let output = output.unwrap_or_else(|| PathBuf::from(kind.default_file_name()));
    fs::write(&output, csv).with_context(|| format!("写入导出文件失败: {}", output.display()))?;
    println!("已导出: {}", output.display());
    Ok(())
}

fn run_grid(
    api: &WarehouseApi,
    file: &Path,
    highlight: HighlightTarget,
    sku: Option<&str>,
    location: Option<&str>,
) -> Result<()> {
    api.load_from_file(file)?;
    let mut view = ViewState::new();
    let highlighted = match highlight {
        HighlightTarget::Off => 0,
        HighlightTarget::Search => view.apply_search(api, sku, location)?,
        HighlightTarget::Duplicates => view.apply_duplicates(api)?,
        HighlightTarget::Empties => view.apply_empties(api)?,
    };
    let matrix = view.occupancy_matrix(api)?;
    print!("{}", render_grid(&matrix));
    println!("高亮单元格: {}", highlighted);
    Ok(())
}

fn run_combine(inputs: &[PathBuf], output: Option<&Path>) -> Result<()> {
    let mut combiner = ScanCombiner::new();
    for input in inputs {
        if input.is_dir() {
            combiner.add_directory(input)?;
        } else {
            combiner.add_file(input);
        }
    }

    let combined = combiner.finish();
    for skipped in &combined.files_skipped {
        eprintln!("跳过 {}: {}", skipped.name, skipped.reason);
    }
    if combined.files_processed.is_empty() {
        bail!("没有可合并的扫描文件");
    }

    let csv = combined.to_csv_string()?;
    match output {
        Some(path) => {
            fs::write(path, csv)
                .with_context(|| format!("写入合并文件失败: {}", path.display()))?;
            println!(
                "已合并 {} 个文件, {} 条唯一记录, 去除重复 {} 条 → {}",
                combined.files_processed.len(),
                combined.records.len(),
                combined.duplicate_rows_dropped,
                path.display()
            );
        }
        None => print!("{}", csv),
    }
    Ok(())
}

fn run_check(file: &Path) -> Result<()> {
    let parsed = ScanCsvParser.parse_file(file)?;
    let report = check_parsed_uniqueness(&parsed);
    println!("总记录: {}", report.total_rows);
    if !parsed.skipped_rows.is_empty() {
        println!("格式错误行: {}", parsed.skipped_rows.len());
    }
    println!("唯一 (SKU, 货位): {}", report.unique_pairs);
    println!("{}", if report.all_unique { "全部唯一" } else { "存在重复组合" });
    Ok(())
}

fn run_config(path: PathBuf, action: ConfigAction) -> Result<()> {
    let state = AppState::new(path)?;
    let config = Arc::clone(&state.config);

    match action {
        ConfigAction::Show => println!("{}", config.get_config_snapshot()?),
        ConfigAction::Path => println!("{}", state.config_path.display()),
        ConfigAction::Set { key, value } => {
            if !config_keys::ALL.contains(&key.as_str()) {
                bail!(
                    "未知配置项: {}（可用: {}）",
                    key,
                    config_keys::ALL.join(", ")
                );
            }
            config.update_config(&key, &value)?;
            // 回读校验: 格式错误的值会在此打出告警
            config.get_sku_length_policy()?;
            config.get_grid_layout()?;
            config.save()?;
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}

fn print_cells(cells: &BTreeSet<GridCoordinate>) {
    for cell in cells {
        println!("{}", cell);
    }
    println!("共 {} 个单元格", cells.len());
}

/// 文本网格: 行号从大到小自上而下, '#' 占用, '*' 高亮, '.' 空闲
fn render_grid(matrix: &OccupancyMatrix) -> String {
    let mut out = String::new();
    // 列名两行显示: 首字符 / 次字符
    for nth in 0..2 {
        out.push_str("   ");
        for column in &matrix.columns {
            out.push(column.chars().nth(nth).unwrap_or(' '));
        }
        out.push('\n');
    }

    for (row_idx, row) in matrix.rows.iter().enumerate().rev() {
        out.push_str(&format!("{:>2} ", row));
        for column_idx in 0..matrix.columns.len() {
            let symbol = match matrix.cell(column_idx, row_idx).map(|c| c.state) {
                Some(CellState::Highlighted) => '*',
                Some(CellState::Occupied) => '#',
                _ => '.',
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}
