//! 共有ドキュメント（バスティオンの状態）の表現
//!
//! ドキュメントはスキーマ検証を行わないオープンなフィールドの集まりです。
//! フィールド順を保持するため `IndexMap` を使用し、マージは
//! トップレベルのフィールド単位の上書き（shallow merge / last-write-wins）
//! として定義します。

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 参加者リストの派生フィールド名
///
/// このフィールドは常に `Room::participants` から再計算され、
/// クライアントが送ってきた値は保持されません。
pub const CONNECTED_PLAYERS_FIELD: &str = "connectedPlayers";

/// ドキュメントのフィールド値
///
/// JSON と 1:1 に対応するタグなし表現。整数は浮動小数点より先に
/// マッチさせるため、バリアントの順序に意味があります。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FieldValue>),
    Map(IndexMap<String, FieldValue>),
}

/// 共有ドキュメント
///
/// フィールド名から [`FieldValue`] への順序付きマップ。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: IndexMap<String, FieldValue>,
}

impl Document {
    /// 空のドキュメントを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// バスティオンの初期ドキュメントを作成
    ///
    /// フィールドと初期値はバスティオントラッカーのゲーム状態に対応します。
    pub fn default_bastion() -> Self {
        let mut doc = Self::new();
        doc.insert("party", FieldValue::List(vec![]));
        doc.insert("bastionGold", FieldValue::Int(5000));
        doc.insert("bastionDefenders", FieldValue::Int(0));
        doc.insert("bastionTurn", FieldValue::Int(1));
        doc.insert("defensiveWalls", FieldValue::Int(0));
        doc.insert("armoryStocked", FieldValue::Bool(false));
        doc.insert("basicFacilities", FieldValue::List(vec![]));
        doc.insert("specialFacilities", FieldValue::List(vec![]));
        doc.insert(CONNECTED_PLAYERS_FIELD, FieldValue::List(vec![]));
        doc
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// 部分ドキュメントをシャローマージ
    ///
    /// `partial` の各トップレベルフィールドが既存の値を無条件に置き換えます
    /// （last-write-wins）。触れられていないフィールドは値も位置も保持されます。
    /// ネストした値の再帰的なマージは行いません。
    pub fn merge(&mut self, partial: Document) {
        for (field, value) in partial.fields {
            self.fields.insert(field, value);
        }
    }

    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    pub fn into_fields(self) -> IndexMap<String, FieldValue> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<IndexMap<String, FieldValue>> for Document {
    fn from(fields: IndexMap<String, FieldValue>) -> Self {
        Self { fields }
    }
}
