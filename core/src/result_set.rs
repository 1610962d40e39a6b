//! 查询结果：带游标的缓冲结果集与按列名访问的行

use crate::value::SqlValue;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// 一行数据，列名 -> 值，保持查询返回的列顺序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, SqlValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// 追加一列；同名列（如 JOIN 结果）后者覆盖前者
    pub fn push(&mut self, name: impl Into<String>, value: SqlValue) {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// 转为 JSON 对象
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .columns
            .iter()
            .map(|(n, v)| (n.clone(), serde_json::Value::from(v.clone())))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

impl<K: Into<String>> FromIterator<(K, SqlValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, SqlValue)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.push(name, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// 缓冲结果集
///
/// 所有行在执行时已全部读出，`fetch_row` 依次移动游标，`reset_cursor` 回到开头。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    rows: Vec<Row>,
    cursor: usize,
    affected_rows: u64,
}

impl ResultSet {
    /// 查询结果（SELECT 等），影响行数即返回行数
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let affected_rows = rows.len() as u64;
        Self {
            rows,
            cursor: 0,
            affected_rows,
        }
    }

    /// 写操作结果（INSERT / UPDATE / DELETE），没有行
    pub fn from_affected(affected_rows: u64) -> Self {
        Self {
            rows: Vec::new(),
            cursor: 0,
            affected_rows,
        }
    }

    /// 读取游标处的一行并前移，没有更多行时返回 None
    pub fn fetch_row(&mut self) -> Option<Row> {
        let row = self.rows.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(row)
    }

    /// 游标回到第一行
    pub fn reset_cursor(&mut self) {
        self.seek(0);
    }

    /// 游标移动到指定行，超出范围时停在末尾
    pub fn seek(&mut self, position: usize) {
        self.cursor = position.min(self.rows.len());
    }

    pub fn row_count(&self) -> u64 {
        self.rows.len() as u64
    }

    pub fn affected_rows(&self) -> u64 {
        self.affected_rows
    }

    /// 重置游标并读出全部行
    pub fn fetch_all(&mut self) -> Vec<Row> {
        self.reset_cursor();
        let mut rows = Vec::with_capacity(self.rows.len());
        while let Some(row) = self.fetch_row() {
            rows.push(row);
        }
        rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, name: &str) -> Row {
        let mut row = Row::new();
        row.push("id", SqlValue::Int64(id));
        row.push("name", SqlValue::String(name.to_string()));
        row
    }

    #[test]
    fn test_fetch_row_advances_cursor() {
        let mut rs = ResultSet::from_rows(vec![user(1, "Alice"), user(2, "Bob")]);
        assert_eq!(rs.fetch_row(), Some(user(1, "Alice")));
        assert_eq!(rs.fetch_row(), Some(user(2, "Bob")));
        assert_eq!(rs.fetch_row(), None);
        assert_eq!(rs.row_count(), 2);
    }

    #[test]
    fn test_fetch_all_resets_and_is_idempotent() {
        let mut rs = ResultSet::from_rows(vec![user(1, "Alice"), user(2, "Bob"), user(3, "Eve")]);
        // 先消费一行，fetch_all 仍然从头开始
        rs.fetch_row();
        let first = rs.fetch_all();
        let second = rs.fetch_all();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert_eq!(first[2].get("name"), Some(&SqlValue::String("Eve".to_string())));
    }

    #[test]
    fn test_empty_result() {
        let mut rs = ResultSet::from_rows(Vec::new());
        assert_eq!(rs.fetch_row(), None);
        assert!(rs.fetch_all().is_empty());
        assert_eq!(rs.row_count(), 0);
    }

    #[test]
    fn test_affected_result_has_no_rows() {
        let mut rs = ResultSet::from_affected(4);
        assert_eq!(rs.affected_rows(), 4);
        assert_eq!(rs.row_count(), 0);
        assert_eq!(rs.fetch_row(), None);
    }

    #[test]
    fn test_seek_is_clamped() {
        let mut rs = ResultSet::from_rows(vec![user(1, "Alice")]);
        rs.seek(10);
        assert_eq!(rs.fetch_row(), None);
        rs.reset_cursor();
        assert!(rs.fetch_row().is_some());
    }

    #[test]
    fn test_row_serialization_keeps_column_order() {
        let row = user(7, "Zed");
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"id":7,"name":"Zed"}"#);
        assert_eq!(row.to_json(), serde_json::json!({"id": 7, "name": "Zed"}));
        let names: Vec<&str> = row.column_names().collect();
        assert_eq!(names, vec!["id", "name"]);
    }
}
