use crate::context::Context;
use crate::render;
use colored::Colorize;
use dflow_core::{ServerRecord, SnapshotFormat, parse_servers};
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

async fn load(path: &Path) -> anyhow::Result<Vec<ServerRecord>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(parse_servers(&content, SnapshotFormat::from_path(path))?)
}

pub async fn handle(
    ctx: &Context,
    path: &Path,
    interval: Option<u64>,
    iterations: Option<u64>,
) -> anyhow::Result<()> {
    let secs = interval.unwrap_or(ctx.settings.poll_interval);
    if secs == 0 {
        anyhow::bail!("--interval は1以上を指定してください");
    }

    let interactive = std::io::stdout().is_terminal();
    let mut ticker = tokio::time::interval(Duration::from_secs(secs));
    let mut rendered = 0u64;

    // ループ全体で同じリスナーを使い、描画中のCtrl-Cも取りこぼさない
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match load(path).await {
                    Ok(records) => {
                        if interactive {
                            // 画面をクリアしてから再描画
                            print!("\x1B[2J\x1B[H");
                        }
                        println!(
                            "{} {} ({}秒ごとに更新, Ctrl-Cで終了)",
                            "監視中:".bold(),
                            path.display().to_string().cyan(),
                            secs
                        );
                        println!();
                        render::print_table(&ctx.build_cards(&records));
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "failed to reload snapshot");
                        eprintln!("{} {}", "⚠ 読み込みに失敗しました:".yellow(), e);
                    }
                }

                rendered += 1;
                if iterations.is_some_and(|n| rendered >= n) {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                println!();
                println!("{}", "監視を終了しました".dimmed());
                break;
            }
        }
    }

    Ok(())
}
