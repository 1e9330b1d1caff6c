//! 登录命令

use anyhow::Result;
use vbox_client::Session;

/// 登录并输出会话句柄
pub async fn handle(session: &Session) -> Result<()> {
    let handle = session.logon().await?;

    println!("{}", handle);

    Ok(())
}
