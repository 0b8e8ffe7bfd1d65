use crate::context::Context;
use colored::Colorize;

pub fn handle(ctx: &Context) -> anyhow::Result<()> {
    match &ctx.settings_source {
        Some(path) => println!(
            "{} {}",
            "設定ファイル:".bold(),
            path.display().to_string().cyan()
        ),
        None => println!(
            "{} {}",
            "設定ファイル:".bold(),
            "(なし、既定値を使用)".dimmed()
        ),
    }
    println!();
    print!("{}", serde_yaml::to_string(&ctx.settings)?);

    Ok(())
}
