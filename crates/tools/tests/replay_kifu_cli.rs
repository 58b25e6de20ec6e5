use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const KIF_GAME: &str = "\
# ---- Kifu for Windows ----
手合割：平手
手数----指手---------消費時間--
   1 ７六歩(77)
   2 ３四歩(33)
   3 ２二角成(88)
   4 同　銀(31)
   5 投了
";

const DOJO81_GAME: &str = "\
開始日時：2024/01/01
手数----指手---------消費時間--
   1 ７六歩(77)   ( 0:01/00:00:01)
   2 ８四歩(83)   ( 0:03/00:00:03)
まで2手で後手の勝ち";

// 先手は角を持っていない
const BROKEN_GAME: &str = "   1 ５五角打\n";

fn write_file(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dir");
    }
    fs::write(path, text).expect("write input");
}

fn read_jsonl(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .expect("read output")
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid json line"))
        .collect()
}

fn games(records: &[Value]) -> Vec<(String, u64)> {
    records
        .iter()
        .filter(|r| r["type"] == "game")
        .map(|r| (r["game"].as_str().unwrap().to_string(), r["plies"].as_u64().unwrap()))
        .collect()
}

fn mixed_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_file(&tmp.path().join("kifu/a_game.kif"), KIF_GAME);
    write_file(&tmp.path().join("kifu/b_broken.kif"), BROKEN_GAME);
    write_file(&tmp.path().join("kifu/sub/81Dojo-c.kif"), DOJO81_GAME);
    write_file(&tmp.path().join("kifu/notes.txt"), "not a record");
    tmp
}

#[test]
fn replays_directory_and_skips_broken_games() {
    let tmp = mixed_dir();
    let out = tmp.path().join("out/plies.jsonl");

    let mut cmd = Command::cargo_bin("replay_kifu").expect("binary exists");
    cmd.arg("--root")
        .arg(tmp.path().join("kifu"))
        .arg("--out")
        .arg(&out)
        .args(["--threads", "2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("skip").and(predicate::str::contains("b_broken.kif")));

    let records = read_jsonl(&out);
    assert_eq!(records.len(), 4 + 1 + 2 + 1);
    assert_eq!(
        games(&records),
        [("a_game.kif".to_string(), 4), ("sub/81Dojo-c.kif".to_string(), 2)]
    );

    let recapture = &records[3];
    assert_eq!(recapture["type"], "ply");
    assert_eq!(recapture["ply"], 4);
    assert_eq!(recapture["side"], "gote");
    assert_eq!(recapture["dest"], "22");
    assert_eq!(recapture["recapture"], true);
    assert_eq!(recapture["piece"], "S");

    let end = &records[4];
    assert_eq!(end["black_hand"]["B"], 1);
    assert_eq!(end["white_hand"]["B"], 1);
    assert_eq!(
        end["sfen"],
        "lnsgkg1nl/1r5s1/pppppp1pp/6p2/9/2P6/PP1PPPPPP/7R1/LNSGKGSNL b Bb 5"
    );
}

#[test]
fn fail_fast_reports_error() {
    let tmp = mixed_dir();
    let out = tmp.path().join("plies.jsonl");

    let mut cmd = Command::cargo_bin("replay_kifu").expect("binary exists");
    cmd.arg("--root")
        .arg(tmp.path().join("kifu"))
        .arg("--out")
        .arg(&out)
        .arg("--fail-fast")
        .assert()
        .failure()
        .stderr(predicate::str::contains("replay failed for 1 of 3 games"));

    // 成功した局は書き出されている
    assert_eq!(games(&read_jsonl(&out)).len(), 2);
}

#[test]
fn config_readings_and_gz_io() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("kifu/game.txt.gz");
    fs::create_dir_all(input.parent().unwrap()).unwrap();
    let mut enc = flate2::write::GzEncoder::new(
        fs::File::create(&input).unwrap(),
        flate2::Compression::default(),
    );
    enc.write_all(KIF_GAME.replace("   5 投了", "   5 ５五Ｂ打").as_bytes()).unwrap();
    enc.finish().unwrap();

    let config = tmp.path().join("replay.toml");
    write_file(
        &config,
        "extensions = [\"txt\"]\nthreads = 1\n\n[readings]\n\"Ｂ\" = \"kaku\"\n",
    );
    let out = tmp.path().join("plies.jsonl.gz");

    let mut cmd = Command::cargo_bin("replay_kifu").expect("binary exists");
    cmd.arg("--root")
        .arg(tmp.path().join("kifu"))
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(&out)
        .args(["--dialect", "kif"])
        .assert()
        .success();

    let mut text = String::new();
    flate2::read::GzDecoder::new(fs::File::open(&out).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    let records: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(games(&records), [("game.txt.gz".to_string(), 5)]);

    let drop = &records[4];
    assert_eq!(drop["drop"], true);
    assert_eq!(drop["drop_piece"], "B");
    assert_eq!(drop["dest"], "55");
    assert!(drop["origin"].is_null());
    assert!(records[5]["black_hand"].as_object().unwrap().is_empty());
}

#[test]
fn single_file_to_stdout() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("81Dojo-x.kif");
    write_file(&input, DOJO81_GAME);

    let mut cmd = Command::cargo_bin("replay_kifu").expect("binary exists");
    cmd.arg("--root")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\":\"game\"").and(predicate::str::contains("\"game\":\"81Dojo-x.kif\"")));
}

#[test]
fn unknown_config_key_fails() {
    let tmp = mixed_dir();
    let config = tmp.path().join("bad.toml");
    write_file(&config, "thread = 2\n");

    let mut cmd = Command::cargo_bin("replay_kifu").expect("binary exists");
    cmd.arg("--root")
        .arg(tmp.path().join("kifu"))
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}
