//! 有序参数映射：占位符标记 -> 参数值

use crate::value::SqlValue;

/// 构造 [`Params`]
///
/// ```rust,ignore
/// let params = sqlxmap::params! {
///     ":name" => "Alice",
///     ":age" => 30,
/// };
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($marker:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::Params::new();
        $(
            params.insert($marker, $value);
        )+
        params
    }};
}

/// 有序参数映射
///
/// 插入顺序就是绑定顺序；重复插入同一个标记会原地覆盖值，位置不变。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, SqlValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// 插入或覆盖一个参数
    pub fn insert(&mut self, marker: impl Into<String>, value: impl Into<SqlValue>) {
        let marker = marker.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(m, _)| *m == marker) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((marker, value)),
        }
    }

    /// 链式插入
    pub fn with(mut self, marker: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(marker, value);
        self
    }

    pub fn get(&self, marker: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(m, _)| m == marker)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, marker: &str) -> bool {
        self.get(marker).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(m, v)| (m.as_str(), v))
    }

    pub fn markers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(m, _)| m.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (marker, value) in iter {
            params.insert(marker, value);
        }
        params
    }
}

impl IntoIterator for Params {
    type Item = (String, SqlValue);
    type IntoIter = std::vec::IntoIter<(String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
