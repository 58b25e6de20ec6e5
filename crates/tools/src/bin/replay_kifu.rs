//! 棋譜を再生して各手の局面を JSONL に書き出す
//!
//! # 使用例
//!
//! ```bash
//! # ディレクトリ以下の .kif を全て再生
//! cargo run -p tools --bin replay_kifu -- --root kifu/ --out plies.jsonl.gz
//!
//! # 方言を固定し、1局でも失敗したらエラー終了
//! cargo run -p tools --bin replay_kifu -- --root 81dojo/ --dialect dojo81 --fail-fast
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result, bail};
use clap::Parser;
use rayon::prelude::*;
use rshogi_kifu::{GameReplayer, NotationDecoder, PlyRecord, ReadingTable};
use tools::common::io::{open_writer, read_text};
use tools::common::record::{RecordDialect, extract_tokens};
use tools::config::ReplayConfig;
use tools::snapshot::{GameSnapshot, PlySnapshot, Snapshot};

#[derive(Parser)]
#[command(
    name = "replay-kifu",
    version,
    about = "棋譜を再生して各手の局面をJSONLに書き出す\n\nKIF → 指し手トークン → 読み → 指し手 → 盤面"
)]
struct Cli {
    /// 棋譜ファイル、またはそれを含むディレクトリ（再帰的に探索）
    #[arg(long)]
    root: PathBuf,
    /// 出力パス ("-" で標準出力; .gz対応)
    #[arg(long, default_value = "-")]
    out: String,
    /// 設定ファイル (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// 全ファイルをこの方言で読む（ファイル名規則より優先）
    #[arg(long, value_enum)]
    dialect: Option<RecordDialect>,
    /// 並列数（0 = 論理CPU数）
    #[arg(long)]
    threads: Option<usize>,
    /// 1局でも再生に失敗したらエラー終了する
    #[arg(long)]
    fail_fast: bool,
    /// debug ログを出す
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .write_style(env_logger::WriteStyle::Never)
    .target(env_logger::Target::Stderr)
    .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => ReplayConfig::load(path)?,
        None => ReplayConfig::default(),
    };
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    config.fail_fast |= cli.fail_fast;

    let rules = config.dialect_rules()?;
    let table = config.reading_table()?;
    let files = collect_record_files(&cli.root, &config)?;
    if files.is_empty() {
        log::warn!("no record files under {}", cli.root.display());
    }
    log::info!("replaying {} record files", files.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .context("build thread pool")?;

    let replayed_plies = AtomicU64::new(0);
    // par_iter の collect は入力順を保つので出力はファイル名順になる
    let results: Vec<(PathBuf, Result<Vec<Snapshot>>)> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let dialect = cli.dialect.unwrap_or_else(|| rules.dialect_for(path));
                let game = game_id(&cli.root, path);
                let result = replay_file(path, &game, dialect, &table);
                if let Ok(snaps) = &result {
                    replayed_plies.fetch_add(snaps.len().saturating_sub(1) as u64, Ordering::Relaxed);
                }
                (path.clone(), result)
            })
            .collect()
    });

    let mut writer = open_writer(&cli.out).with_context(|| format!("open output: {}", cli.out))?;
    let mut games = 0usize;
    let mut skipped = 0usize;
    let mut first_failure = None;
    for (path, result) in results {
        match result {
            Ok(snaps) => {
                for snap in &snaps {
                    serde_json::to_writer(&mut writer, snap)?;
                    writer.write_all(b"\n")?;
                }
                games += 1;
            }
            Err(e) => {
                log::warn!("skip {}: {e:#}", path.display());
                skipped += 1;
                first_failure.get_or_insert(path);
            }
        }
    }
    writer.close().with_context(|| format!("close output: {}", cli.out))?;

    log::info!(
        "done: {games} games, {} plies, {skipped} skipped",
        replayed_plies.load(Ordering::Relaxed)
    );
    if config.fail_fast {
        if let Some(path) = first_failure {
            bail!("replay failed for {} of {} games (first: {})", skipped, games + skipped, path.display());
        }
    }
    Ok(())
}

/// `root` がファイルならそれ1つ、ディレクトリなら拡張子の合うファイルを名前順で
fn collect_record_files(root: &Path, config: &ReplayConfig) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        bail!("root not found: {}", root.display());
    }
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() && config.accepts(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// 出力の `game` 欄。`root` からの相対パス
fn game_id(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().replace('\\', "/"),
        _ => path.file_name().map_or_else(
            || path.to_string_lossy().into_owned(),
            |n| n.to_string_lossy().into_owned(),
        ),
    }
}

fn replay_file(
    path: &Path,
    game: &str,
    dialect: RecordDialect,
    table: &ReadingTable,
) -> Result<Vec<Snapshot>> {
    let text = read_text(path).with_context(|| format!("read {}", path.display()))?;
    let tokens =
        extract_tokens(&text, dialect.layout()).with_context(|| format!("extract moves as {dialect}"))?;

    let mut snaps = Vec::with_capacity(tokens.len() + 1);
    let replayer = GameReplayer::new(NotationDecoder::new(table));
    let outcome = replayer.replay(&tokens, &mut |rec: &PlyRecord<'_>| {
        snaps.push(Snapshot::Ply(PlySnapshot::from_record(game, rec)))
    })?;
    log::debug!("{game}: {} plies ({dialect})", outcome.plies);
    snaps.push(Snapshot::Game(GameSnapshot::from_outcome(game, &outcome)));
    Ok(snaps)
}
