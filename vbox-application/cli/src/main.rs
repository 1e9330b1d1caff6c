//! vbox CLI 应用

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use vbox_client::Session;
use vbox_gateway::SoapGateway;

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "vbox")]
#[command(about = "VirtualBox Web 服务命令行客户端", long_about = None)]
#[command(version)]
struct Cli {
    /// 服务端点 URL（默认 http://127.0.0.1:18083）
    endpoint: Option<String>,

    /// 用户名（默认为空）
    #[arg(short, long)]
    username: Option<String>,

    /// 密码（默认为空）
    #[arg(short, long)]
    password: Option<String>,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 不指定命令时只登录并输出会话句柄
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 创建硬盘
    CreateDisk {
        /// 磁盘格式 (VDI/VMDK/VHD ...)
        #[arg(long)]
        format: String,

        /// 磁盘文件位置（服务端路径）
        #[arg(long)]
        location: String,
    },

    /// 列出虚拟机
    Machines,

    /// 查看虚拟机详情
    Machine {
        /// 虚拟机名称或 UUID
        name: String,

        /// 查询的网卡插槽数量
        #[arg(long, default_value = "1")]
        slots: u32,

        /// 输出格式 (table/json)
        #[arg(short = 'f', long, default_value = "table", value_parser = ["table", "json"])]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日志
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let gateway_config = config.gateway_config(cli.endpoint.as_deref());
    let credentials = config.credentials(cli.username.as_deref(), cli.password.as_deref());

    info!("连接 VirtualBox Web 服务: {}", gateway_config.endpoint);

    let gateway = SoapGateway::new(&gateway_config).context("创建网关失败")?;
    let session = Session::new(Arc::new(gateway), credentials);

    match cli.command {
        None => commands::logon::handle(&session).await?,
        Some(Commands::CreateDisk { format, location }) => {
            commands::disk::create(&session, &format, &location).await?
        }
        Some(Commands::Machines) => commands::machine::list(&session).await?,
        Some(Commands::Machine { name, slots, format }) => {
            commands::machine::show(&session, &name, slots, &format).await?
        }
    }

    Ok(())
}
