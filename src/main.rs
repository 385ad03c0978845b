// ==========================================
// 供应商到货管控 - 命令行入口
// ==========================================
// 用法: dock-control [--db PATH] [--json-log] <命令> [参数...]
// 输出: stdout 为 JSON，日志走 stderr
// ==========================================

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use dock_control::app::{get_default_db_path, AppState};
use dock_control::domain::SupplierFilter;
use dock_control::logging;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "dock-control")]
#[command(about = "供应商到货预约管控 - 到货/作业登记与时间指标看板")]
#[command(version)]
struct Cli {
    /// 数据库路径（默认取 DOCK_CONTROL_DB_PATH 或用户数据目录）
    #[arg(long)]
    db: Option<String>,

    /// 日志输出为 JSON
    #[arg(long)]
    json_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 导入预约表 (.csv/.xlsx)
    Import {
        /// 预约表文件
        file: PathBuf,
    },

    /// 待到货订单
    Pending {
        /// 日期 YYYY-MM-DD（默认今天）
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// 今天已到货待作业的订单
    Arrived,

    /// 今天作业完成的订单
    Completed,

    /// 登记今天的到货
    Arrive {
        order_id: String,

        /// 到货时刻 HH:MM（默认按预约时段推算）
        #[arg(value_parser = parse_time)]
        time: Option<NaiveTime>,
    },

    /// 登记今天的作业起止
    Serve {
        order_id: String,

        /// 开始时刻 HH:MM
        #[arg(value_parser = parse_time)]
        start: NaiveTime,

        /// 结束时刻 HH:MM
        #[arg(value_parser = parse_time)]
        end: NaiveTime,
    },

    /// 查看管理记录
    Show { order_id: String },

    /// 时间指标看板
    Dashboard {
        /// 回看的已完成周数（默认取配置）
        weeks: Option<u32>,

        /// 供应商（缺省为全部）
        supplier: Option<String>,
    },

    /// 查看配置快照
    Config,

    /// 读取单个配置值
    GetConfig { key: String },

    /// 写入配置
    SetConfig { key: String, value: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json_log {
        logging::init_json();
    } else {
        logging::init();
    }

    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::info!("{} v{}，数据库: {}", dock_control::APP_NAME, dock_control::VERSION, db_path);

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
    run(&state, cli.command)
}

fn run(state: &AppState, command: Command) -> Result<()> {
    let now = Local::now().naive_local();
    let today = now.date();

    match command {
        Command::Import { file } => print_json(&state.import_reservations(file)?),
        Command::Pending { date } => {
            print_json(&state.dock_api.list_pending_arrivals(date.unwrap_or(today))?)
        }
        Command::Arrived => print_json(&state.dock_api.list_arrived_pending_service(today)?),
        Command::Completed => print_json(&state.dock_api.list_completed(today)?),
        Command::Arrive { order_id, time } => {
            let time = match time {
                Some(time) => time,
                None => state.dock_api.arrival_form_defaults(&order_id, today, now)?,
            };
            print_json(&state.dock_api.record_arrival(&order_id, today, time)?)
        }
        Command::Serve {
            order_id,
            start,
            end,
        } => print_json(&state.dock_api.record_service(
            &order_id,
            today.and_time(start),
            today.and_time(end),
        )?),
        Command::Show { order_id } => {
            print_json(&state.dock_api.get_management_record(&order_id)?)
        }
        Command::Dashboard { weeks, supplier } => {
            let weeks_back = weeks.unwrap_or_else(|| state.dashboard_api.default_weeks_back());
            let supplier = SupplierFilter::from_selection(supplier.as_deref());
            print_json(&state.dashboard_api.get_report(today, weeks_back, supplier)?)
        }
        Command::Config => {
            let snapshot = state
                .config_manager
                .get_config_snapshot()
                .map_err(|e| anyhow!("读取配置失败: {}", e))?;
            print_json(&snapshot)
        }
        Command::GetConfig { key } => {
            let value = state
                .config_manager
                .get_global_config_value(&key)
                .map_err(|e| anyhow!("读取配置失败: {}", e))?;
            print_json(&value)
        }
        Command::SetConfig { key, value } => {
            state
                .config_manager
                .set_global_value(&key, &value)
                .map_err(|e| anyhow!("写入配置失败: {}", e))?;
            let config = state
                .config_manager
                .load_dock_config()
                .map_err(|e| anyhow!("配置无效: {}", e))?;
            print_json(&config)
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("日期格式应为 YYYY-MM-DD: {}", raw))
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| format!("时间格式应为 HH:MM: {}", raw))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_arguments_parsed() {
        let cli = Cli::try_parse_from([
            "dock-control", "--db", "dock.db", "serve", "OC-1", "10:15", "10:40",
        ])
        .unwrap();
        assert_eq!(cli.db.as_deref(), Some("dock.db"));
        match cli.command {
            Command::Serve {
                order_id,
                start,
                end,
            } => {
                assert_eq!(order_id, "OC-1");
                assert_eq!(start, NaiveTime::from_hms_opt(10, 15, 0).unwrap());
                assert_eq!(end, NaiveTime::from_hms_opt(10, 40, 0).unwrap());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_bad_arguments_rejected() {
        assert!(Cli::try_parse_from(["dock-control", "arrive", "OC-1", "25:99"]).is_err());
        assert!(Cli::try_parse_from(["dock-control", "dashboard", "many"]).is_err());
        assert!(Cli::try_parse_from(["dock-control", "pending", "07/08/2024"]).is_err());
    }

    #[test]
    fn test_optional_arguments() {
        let cli = Cli::try_parse_from(["dock-control", "dashboard", "4", "Acme"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Dashboard { weeks: Some(4), supplier: Some(ref s) } if s == "Acme"
        ));

        let cli = Cli::try_parse_from(["dock-control", "set-config", "operating_hours.open_hour", "8"])
            .unwrap();
        assert!(matches!(cli.command, Command::SetConfig { .. }));
    }
}
