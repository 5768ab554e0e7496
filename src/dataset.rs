use std::io::Read;

use ajs::Js;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Row = Map<String, Value>;

/// The rows handed to the client side crossfilter, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset(Vec<Row>);

impl Dataset {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Dataset(rows)
    }

    /// Parse a JSON array of objects.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("parsing dataset, expecting an array of objects")
    }

    pub fn from_reader(r: impl Read) -> Result<Self> {
        serde_json::from_reader(r).context("reading dataset, expecting an array of objects")
    }

    pub fn rows(&self) -> &[Row] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_js(&self) -> Js {
        Js::Json(Value::Array(self.0.iter().cloned().map(Value::Object).collect()))
    }
}

impl FromIterator<Row> for Dataset {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Dataset(iter.into_iter().collect())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use ajs::Print;

    #[test]
    fn t_from_json_str() {
        let d = Dataset::from_json_str(r#"[{"a": 1, "b": "x"}, {"a": 2}]"#).unwrap();
        assert_eq!(d.len(), 2);
        assert_eq!(d.rows()[1]["a"], Value::from(2));
        assert!(Dataset::from_json_str(r#"{"a": 1}"#).is_err());
        assert!(Dataset::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn t_to_js() {
        let d = Dataset::from_reader(&b"[{\"name\": \"</script>\"}]"[..]).unwrap();
        assert_eq!(d.to_js().to_code_string().unwrap(), "[{\"name\":\"\\u003c/script>\"}]");
        assert_eq!(Dataset::default().to_js().to_code_string().unwrap(), "[]");
    }
}
