//! 虚拟机命令

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use vbox_client::{Machine, Session};

/// 虚拟机概要
#[derive(Debug, Serialize)]
struct MachineSummary {
    id: String,
    name: String,
    chipset: String,
    adapters: Vec<AdapterSummary>,
}

/// 网卡概要
#[derive(Debug, Serialize)]
struct AdapterSummary {
    slot: u32,
    id: String,
    mac_address: String,
    enabled: bool,
}

/// 列出所有虚拟机
pub async fn list(session: &Session) -> Result<()> {
    let machines = session.machines().await?;

    if machines.is_empty() {
        println!("{}", "没有已注册的虚拟机".yellow());
        return Ok(());
    }

    println!("{}\n", "虚拟机列表:".bold());
    for machine in &machines {
        let name = machine.name().await?;
        println!("{} {}", "●".green(), name.cyan().bold());
        println!("  ID: {}", machine.id().bright_black());
    }

    Ok(())
}

/// 显示虚拟机详情
pub async fn show(session: &Session, name_or_id: &str, slots: u32, format: &str) -> Result<()> {
    let machine = session
        .find_machine(name_or_id)
        .await
        .with_context(|| format!("查找虚拟机失败: {}", name_or_id))?;

    let summary = summarize(&machine, slots).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{} {}", "虚拟机:".bold(), summary.name.cyan().bold());
    println!("  ID:     {}", summary.id);
    println!("  芯片组: {}", summary.chipset.yellow());
    println!("  网卡:");
    for adapter in &summary.adapters {
        let state = if adapter.enabled {
            "已启用".green()
        } else {
            "未启用".bright_black()
        };
        println!("    [{}] {} {}", adapter.slot, adapter.mac_address, state);
    }

    Ok(())
}

async fn summarize(machine: &Machine<'_>, slots: u32) -> Result<MachineSummary> {
    let mut adapters = Vec::new();
    for slot in 0..slots {
        let adapter = machine.network_adapter(slot).await?;
        adapters.push(AdapterSummary {
            slot,
            id: adapter.id().to_string(),
            mac_address: adapter.mac_address().await?,
            enabled: adapter.enabled().await?,
        });
    }

    Ok(MachineSummary {
        id: machine.id().to_string(),
        name: machine.name().await?,
        chipset: machine.chipset_type().await?.to_string(),
        adapters,
    })
}
