mod commands;
mod context;
mod render;
mod snapshot;

use clap::{Args, Parser, Subcommand};
use context::Context;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dflow")]
#[command(about = "サーバーの状態を、ひと目で。", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// 全コマンド共通のオプション（設定ファイルより優先）
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// 詳細リンクに使う組織スラッグ
    #[arg(long = "org", env = "DFLOW_ORGANISATION", global = true)]
    pub organisation: Option<String>,

    /// dFlowサーバーの接続試行回数の上限
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// オンボーディング判定より先にdpkgロックを判定する
    #[arg(long, global = true)]
    pub dpkg_first: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// サーバーの一覧と状態を表示
    Ps {
        /// スナップショットファイル（JSON / YAML）。省略または "-" で標準入力
        file: Option<PathBuf>,
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },
    /// サーバーカードを表示
    Show {
        /// スナップショットファイル（JSON / YAML）。省略または "-" で標準入力
        file: Option<PathBuf>,
        /// 表示するサーバー（名前またはID）
        #[arg(short = 'n', long)]
        server: Option<String>,
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },
    /// スナップショットを定期的に読み直して一覧を表示
    Watch {
        /// スナップショットファイル（JSON / YAML）
        file: PathBuf,
        /// 読み直し間隔（秒）。省略時は設定ファイルの poll-interval
        #[arg(short, long, env = "DFLOW_POLL_INTERVAL")]
        interval: Option<u64>,
        /// 指定回数表示したら終了
        #[arg(long, hide = true)]
        iterations: Option<u64>,
    },
    /// 読み込んだ設定を表示
    Config,
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 標準出力はカード表示に使うので、ログはstderrへ
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Versionコマンドは設定ファイル不要
    if matches!(cli.command, Commands::Version) {
        println!("dflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let loaded = dflow_config::load_settings()?;
    let ctx = Context::new(loaded, &cli.global)?;

    match cli.command {
        Commands::Ps { file, json } => {
            commands::ps::handle(&ctx, file.as_deref(), json)?;
        }
        Commands::Show { file, server, json } => {
            commands::show::handle(&ctx, file.as_deref(), server.as_deref(), json)?;
        }
        Commands::Watch {
            file,
            interval,
            iterations,
        } => {
            commands::watch::handle(&ctx, &file, interval, iterations).await?;
        }
        Commands::Config => {
            commands::config::handle(&ctx)?;
        }
        Commands::Version => {}
    }

    Ok(())
}
