//! YAML file configuration adapter.

use crate::domain::error::BandplotError;
use crate::ports::config_port::ConfigPort;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub struct YamlConfigAdapter {
    root: Value,
}

impl YamlConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BandplotError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| BandplotError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_string(&content).map_err(|reason| BandplotError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let root: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        match root {
            Value::Mapping(_) => Ok(Self { root }),
            Value::Null => Err("configuration is empty".to_string()),
            _ => Err("top level must be a mapping".to_string()),
        }
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        key.split('.').try_fold(&self.root, |node, part| node.get(part))
    }

    fn scalar_to_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for YamlConfigAdapter {
    fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some_and(|v| !v.is_null())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.lookup(key).and_then(Self::scalar_to_string)
    }

    fn get_list(&self, key: &str) -> Option<Vec<String>> {
        match self.lookup(key)? {
            Value::Sequence(items) => items.iter().map(Self::scalar_to_string).collect(),
            _ => None,
        }
    }

    fn get_int(&self, key: &str) -> Result<Option<i64>, String> {
        match self.lookup(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| format!("expected an integer, got {n}")),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| format!("expected an integer, got {s:?}")),
            Some(_) => Err("expected an integer".to_string()),
        }
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, String> {
        match self.lookup(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => {
                let raw = Self::scalar_to_string(other);
                raw.as_deref()
                    .and_then(Self::parse_bool)
                    .map(Some)
                    .ok_or_else(|| match raw {
                        Some(raw) => format!("expected true or false, got {raw:?}"),
                        None => "expected true or false".to_string(),
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const SAMPLE: &str = r#"
stocks:
  - AAPL
  - MSFT
period: [1y, 6mo]
metrics:
  - Close
  - Volume
output:
  dir: charts
  width: 800
  quality: 85
  transparent: no
fetch:
  timeout_secs: "12"
  auto_adjust: maybe
"#;

    #[test]
    fn from_string_parses_lists() {
        let adapter = YamlConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_list("stocks"),
            Some(vec!["AAPL".to_string(), "MSFT".to_string()])
        );
        assert_eq!(
            adapter.get_list("period"),
            Some(vec!["1y".to_string(), "6mo".to_string()])
        );
        assert_eq!(
            adapter.get_list("metrics"),
            Some(vec!["Close".to_string(), "Volume".to_string()])
        );
    }

    #[test]
    fn numeric_list_items_are_stringified() {
        let adapter = YamlConfigAdapter::from_string("stocks: [7203, AAPL]\n").unwrap();
        assert_eq!(
            adapter.get_list("stocks"),
            Some(vec!["7203".to_string(), "AAPL".to_string()])
        );
    }

    #[test]
    fn get_list_rejects_non_lists() {
        let adapter =
            YamlConfigAdapter::from_string("stocks: AAPL\nperiod:\n  - [1y]\n").unwrap();
        assert_eq!(adapter.get_list("stocks"), None);
        assert_eq!(adapter.get_list("period"), None);
        assert!(adapter.contains("stocks"));
    }

    #[test]
    fn nested_keys() {
        let adapter = YamlConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("output.dir"), Some("charts".to_string()));
        assert_eq!(adapter.get_int("output.width"), Ok(Some(800)));
        assert_eq!(adapter.get_int("output.height"), Ok(None));
        assert_eq!(adapter.get_int("fetch.timeout_secs"), Ok(Some(12)));
        assert_eq!(adapter.get_bool("output.transparent"), Ok(Some(false)));
        assert_eq!(adapter.get_bool("output.missing"), Ok(None));
    }

    #[test]
    fn unrecognized_bool_is_an_error() {
        let adapter = YamlConfigAdapter::from_string(SAMPLE).unwrap();
        let err = adapter.get_bool("fetch.auto_adjust").unwrap_err();
        assert!(err.contains("maybe"));
    }

    #[test]
    fn missing_keys() {
        let adapter = YamlConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("nope"), None);
        assert_eq!(adapter.get_string("output.nope"), None);
        assert_eq!(adapter.get_list("nope"), None);
        assert!(!adapter.contains("fetch.data_dir"));
    }

    #[test]
    fn null_value_is_absent() {
        let adapter = YamlConfigAdapter::from_string("stocks:\nperiod: [1y]\n").unwrap();
        assert!(!adapter.contains("stocks"));
    }

    #[test]
    fn get_int_rejects_non_numeric() {
        let adapter =
            YamlConfigAdapter::from_string("output:\n  width: wide\n  height: 1.5\n  dir: [a]\n")
                .unwrap();
        assert!(adapter.get_int("output.width").unwrap_err().contains("wide"));
        assert!(adapter.get_int("output.height").is_err());
        assert!(adapter.get_int("output.dir").is_err());
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(YamlConfigAdapter::from_string("stocks: [AAPL\n").is_err());
    }

    #[test]
    fn rejects_empty_and_scalar_documents() {
        assert!(YamlConfigAdapter::from_string("").is_err());
        assert!(YamlConfigAdapter::from_string("just a string").is_err());
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config(SAMPLE);
        let adapter = YamlConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("output.dir"), Some("charts".to_string()));
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = YamlConfigAdapter::from_file("/nonexistent/path/config.yaml");
        assert!(matches!(result, Err(BandplotError::ConfigParse { .. })));
    }
}
