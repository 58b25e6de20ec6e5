//! 読みテーブル（要素 → ローマ字読み）

use std::collections::HashMap;

use crate::error::ReadingTableError;

/// 指し手トークンの1要素をローマ字（ヘボン式）読みに変換する
pub trait PhoneticReader {
    /// 読みを返す。知らない要素は None。
    fn read(&self, element: char) -> Option<&str>;
}

impl<R: PhoneticReader + ?Sized> PhoneticReader for &R {
    fn read(&self, element: char) -> Option<&str> {
        (**self).read(element)
    }
}

/// 組み込みのヘボン式読み
///
/// KIF の指し手に現れる要素だけを持つ。
#[derive(Debug, Clone, Copy, Default)]
pub struct HepburnReader;

impl PhoneticReader for HepburnReader {
    fn read(&self, element: char) -> Option<&str> {
        let reading = match element {
            '1' | '１' => "1",
            '2' | '２' => "2",
            '3' | '３' => "3",
            '4' | '４' => "4",
            '5' | '５' => "5",
            '6' | '６' => "6",
            '7' | '７' => "7",
            '8' | '８' => "8",
            '9' | '９' => "9",
            '一' => "ichi",
            '二' => "ni",
            '三' => "san",
            '四' => "shi",
            '五' => "go",
            '六' => "roku",
            '七' => "shichi",
            '八' => "hachi",
            '九' => "kyuu",
            '同' => "dou",
            '打' => "da",
            '成' => "sei",
            '不' => "fu",
            '歩' => "ho",
            '香' => "kaori",
            '桂' => "katsura",
            '銀' => "gin",
            '金' => "kin",
            '角' => "kaku",
            '飛' => "hi",
            '玉' => "gyoku",
            '王' => "ou",
            '龍' | '竜' => "ryuu",
            '馬' => "uma",
            'と' => "to",
            _ => return None,
        };
        Some(reading)
    }
}

/// 設定から与える読みテーブル
///
/// 登録済みの要素を優先し、無ければ [`HepburnReader`] に委ねる
/// （[`ReadingTable::without_fallback`] で委譲しない表にできる）。
#[derive(Debug, Clone, Default)]
pub struct ReadingTable {
    entries: HashMap<char, String>,
    no_fallback: bool,
}

impl ReadingTable {
    /// (要素, 読み) の組から構築。キーは1文字でなければならない。
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ReadingTableError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut entries = HashMap::new();
        for (key, reading) in pairs {
            let key = key.as_ref();
            let mut chars = key.chars();
            let element = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(ReadingTableError::NotSingleElement(key.to_string())),
            };
            let reading = reading.into();
            if reading.trim().is_empty() {
                return Err(ReadingTableError::EmptyReading(element));
            }
            entries.insert(element, reading.trim().to_string());
        }
        Ok(Self {
            entries,
            no_fallback: false,
        })
    }

    /// 組み込み読みへ委譲しない
    pub fn without_fallback(mut self) -> Self {
        self.no_fallback = true;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PhoneticReader for ReadingTable {
    fn read(&self, element: char) -> Option<&str> {
        match self.entries.get(&element) {
            Some(reading) => Some(reading.as_str()),
            None if self.no_fallback => None,
            None => HepburnReader.read(element),
        }
    }
}
