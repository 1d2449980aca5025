//! qblook 命令行入口
//!
//! 命令：
//! - `qblook resolve <注释>`：把一段注释按 web_modes 解析成站点详情页URL
//! - `qblook modes`：列出配置中的全部Web模式
//! - `qblook categories`：列出 qBittorrent 中的全部分类
//! - `qblook torrents [--category <分类>]`：拉取种子列表并逐条解析详情页URL
//!
//! 配置文件默认取工作目录下的 config.json，不存在时自动生成默认配置。

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use qblook::{
    CommentResolver, ConfigLoader, CookieDirective, DEFAULT_CONFIG_PATH, PageDirective,
    QbWebClient, WebModeStore, diagnostic_message, fetch_categories, fetch_torrents,
    group_by_category, page_directive,
};

#[derive(Parser, Debug)]
#[command(name = "qblook")]
#[command(version)]
#[command(about = "qBittorrent 注释面板核心：种子注释转站点详情页URL")]
struct Cli {
    /// 配置文件路径（不存在时自动生成默认配置）
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// 输出调试日志到 stderr
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 把一段注释解析成站点详情页URL
    Resolve {
        /// 待解析的注释文本
        comment: String,
        /// 临时指定活动模式，覆盖配置中的 active_web_mode
        #[arg(short, long)]
        mode: Option<String>,
    },
    /// 列出配置中的全部Web模式
    Modes,
    /// 列出 qBittorrent 中的全部分类
    Categories,
    /// 拉取种子列表，按分类分组并逐条解析详情页URL
    Torrents {
        /// 只拉取指定分类，可多次指定
        #[arg(short = 'c', long = "category")]
        categories: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 日志过滤：--debug 开调试级，否则从环境变量取，默认 warn
    let filter = if cli.debug {
        EnvFilter::new("qblook=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("错误：{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let doc = ConfigLoader::ensure(&cli.config).await?;

    match cli.command {
        Commands::Resolve { comment, mode } => {
            let store = WebModeStore::from_document(&doc)?;
            let store = match mode {
                Some(name) => store.with_active(Some(name)),
                None => store,
            };
            match CommentResolver::resolve(&comment, store.effective_order()) {
                Some(resolution) => {
                    println!("{}", resolution.url);
                    let cookies =
                        CookieDirective::for_url(resolution.mode.cookie(), &resolution.url);
                    for cookie in &cookies {
                        println!(
                            "cookie: {}={}（domain: {}）",
                            cookie.name, cookie.value, cookie.domain
                        );
                    }
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    println!("{}", diagnostic_message(&comment));
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Commands::Modes => {
            let store = WebModeStore::from_document(&doc)?;
            if store.is_empty() {
                println!("（配置中没有Web模式）");
                return Ok(ExitCode::SUCCESS);
            }
            // 按配置文档顺序列出，活动模式打星号
            for mode in store.modes() {
                let marker = if store.active() == Some(mode.name()) {
                    "*"
                } else {
                    " "
                };
                println!("{} {}", marker, mode.to_spec());
                println!("    正则：{}", mode.pattern());
                println!(
                    "    模板：{}",
                    if mode.template().trim().is_empty() {
                        "{value}"
                    } else {
                        mode.template()
                    }
                );
                if !mode.categories().is_empty() {
                    println!("    分类：{}", mode.categories().join("、"));
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Categories => {
            let client = QbWebClient::new(&doc.qbittorrent)?;
            let names = fetch_categories(&client).await?;
            if names.is_empty() {
                println!("（没有分类）");
            }
            for name in names {
                println!("{}", name);
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Torrents { categories } => {
            if doc.ui.require_category_selection && categories.is_empty() {
                eprintln!("当前配置要求先选分类再抓取，请用 --category 指定分类");
                return Ok(ExitCode::FAILURE);
            }

            let store = WebModeStore::from_document(&doc)?;
            let client = QbWebClient::new(&doc.qbittorrent)?;
            let filter = if categories.is_empty() {
                None
            } else {
                Some(categories.as_slice())
            };
            let records = fetch_torrents(&client, filter).await?;

            println!("已加载 {} 个任务", records.len());
            for (category, group) in group_by_category(&records) {
                println!("\n[{}]（{} 个）", category, group.len());
                for record in group {
                    let target = match page_directive(&store, record) {
                        PageDirective::Navigate { url, .. } => url,
                        PageDirective::Diagnostic { .. } => "（未匹配到请求模式）".to_string(),
                    };
                    println!("  {}  {}", record.name, target);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
