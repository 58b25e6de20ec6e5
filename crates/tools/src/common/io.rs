//! 入出力ユーティリティ（.gz 対応）
//!
//! パス `-` は標準入出力を表す。

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

const READER_BUF_CAP: usize = 64 * 1024;

fn is_stdio(p: &Path) -> bool {
    p.as_os_str() == "-"
}

fn is_gz(p: &Path) -> bool {
    p.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// 拡張子が .gz なら展開しながら読む
pub fn open_reader<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead>> {
    let p = path.as_ref();
    if is_stdio(p) {
        return Ok(Box::new(BufReader::with_capacity(READER_BUF_CAP, io::stdin())));
    }
    let f = File::open(p)?;
    if is_gz(p) {
        let dec = flate2::read::GzDecoder::new(f);
        return Ok(Box::new(BufReader::with_capacity(READER_BUF_CAP, dec)));
    }
    Ok(Box::new(BufReader::with_capacity(READER_BUF_CAP, f)))
}

/// 棋譜1ファイルを文字列として読む。先頭の BOM は落とす。
///
/// UTF-8 以外は `InvalidData` になる。
pub fn read_text<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let mut text = String::new();
    open_reader(path)?.read_to_string(&mut text)?;
    if let Some(stripped) = text.strip_prefix('\u{feff}') {
        return Ok(stripped.to_string());
    }
    Ok(text)
}

/// 出力先。圧縮ストリームの終端処理のエラーを握りつぶさないよう
/// 最後に [`Writer::close`] を呼ぶこと。
#[must_use = "call .close() to propagate compression/IO errors"]
pub enum Writer {
    Plain(BufWriter<File>),
    Stdout(io::Stdout),
    Gz(flate2::write::GzEncoder<BufWriter<File>>),
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Writer::Plain(w) => w.write(buf),
            Writer::Stdout(w) => w.write(buf),
            Writer::Gz(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Writer::Plain(w) => w.flush(),
            Writer::Stdout(w) => w.flush(),
            Writer::Gz(w) => w.flush(),
        }
    }
}

impl Writer {
    /// gzip のトレーラまで書き切ってフラッシュする
    pub fn close(self) -> io::Result<()> {
        match self {
            Writer::Plain(w) => w.into_inner().map_err(|e| e.into_error())?.flush(),
            Writer::Stdout(mut w) => w.flush(),
            Writer::Gz(w) => w.finish()?.into_inner().map_err(|e| e.into_error())?.flush(),
        }
    }
}

/// 出力ファイルを作る。親ディレクトリが無ければ作成する。
pub fn open_writer<P: AsRef<Path>>(path: P) -> io::Result<Writer> {
    let p = path.as_ref();
    if is_stdio(p) {
        return Ok(Writer::Stdout(io::stdout()));
    }
    if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let f = BufWriter::new(File::create(p)?);
    if is_gz(p) {
        let enc = flate2::write::GzEncoder::new(f, flate2::Compression::default());
        return Ok(Writer::Gz(enc));
    }
    Ok(Writer::Plain(f))
}
