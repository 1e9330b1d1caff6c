//! 硬盘命令

use anyhow::Result;
use colored::Colorize;
use vbox_client::Session;

/// 创建硬盘
pub async fn create(session: &Session, format: &str, location: &str) -> Result<()> {
    let disk = session.create_hard_disk(format, location).await?;

    println!("{} 硬盘创建成功", "✓".green().bold());
    println!("  ID:   {}", disk.id().cyan());
    println!("  格式: {}", format.yellow());
    println!("  位置: {}", location.yellow());

    Ok(())
}
