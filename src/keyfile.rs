//! Key-file document parsing
//!
//! `[group]` headers followed by `key=value` lines, with `#` comments.
//! Typed lookups mirror the usual desktop key-file rules: strings are
//! unescaped, booleans are `true`/`false`/`1`/`0`, integers are 32-bit decimal.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyFileError {
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("group '{0}' not found")]
    GroupNotFound(String),

    #[error("key '{key}' not found in group '{group}'")]
    KeyNotFound { group: String, key: String },

    #[error("value '{value}' of key '{key}' in group '{group}' is not a valid {expected}")]
    InvalidValue {
        group: String,
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Read access to a key-file style document
pub trait KeyFileSource {
    fn has_group(&self, group: &str) -> bool;

    fn has_key(&self, group: &str, key: &str) -> bool;

    /// Raw value, exactly as written after trimming
    fn raw_value(&self, group: &str, key: &str) -> Result<&str, KeyFileError>;

    fn get_string(&self, group: &str, key: &str) -> Result<String, KeyFileError> {
        let raw = self.raw_value(group, key)?;
        unescape(raw).ok_or_else(|| invalid(group, key, raw, "string"))
    }

    fn get_boolean(&self, group: &str, key: &str) -> Result<bool, KeyFileError> {
        match self.raw_value(group, key)? {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(invalid(group, key, other, "boolean")),
        }
    }

    fn get_integer(&self, group: &str, key: &str) -> Result<i32, KeyFileError> {
        let raw = self.raw_value(group, key)?;
        raw.trim()
            .parse::<i32>()
            .map_err(|_| invalid(group, key, raw, "integer"))
    }
}

fn invalid(group: &str, key: &str, value: &str, expected: &'static str) -> KeyFileError {
    KeyFileError::InvalidValue {
        group: group.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}

/// Expand `\s`, `\n`, `\t`, `\r` and `\\`. `None` on any other escape.
fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            's' => out.push(' '),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '\\' => out.push('\\'),
            _ => return None,
        }
    }
    Some(out)
}

/// Value bytes as found in the file; only UTF-8 values are readable
#[derive(Debug, Clone, PartialEq, Eq)]
enum RawValue {
    Text(String),
    NotUtf8(Vec<u8>),
}

/// Parsed key-file held fully in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFile {
    groups: HashMap<String, HashMap<String, RawValue>>,
}

impl KeyFile {
    pub fn parse(contents: &str) -> Result<Self, KeyFileError> {
        Self::parse_bytes(contents.as_bytes())
    }

    /// Parse raw file contents. Values need not be UTF-8; such values fail
    /// only when looked up. Group headers and key names must be UTF-8.
    pub fn parse_bytes(contents: &[u8]) -> Result<Self, KeyFileError> {
        let mut file = Self::default();
        let mut current: Option<String> = None;

        for (index, line) in contents.split(|&b| b == b'\n').enumerate() {
            let line_no = index + 1;
            let line = line.trim_ascii();

            if line.is_empty() || line.starts_with(b"#") {
                continue;
            }

            if line.starts_with(b"[") {
                let header = utf8(line, line_no)?;
                current = Some(file.open_group(header, line_no)?);
                continue;
            }

            let Some(group) = current.as_ref() else {
                return Err(KeyFileError::Parse {
                    line: line_no,
                    reason: "key file does not start with a group".to_string(),
                });
            };

            let split = line.iter().position(|&b| b == b'=').ok_or_else(|| KeyFileError::Parse {
                line: line_no,
                reason: format!(
                    "'{}' is not a group, key-value pair, or comment",
                    String::from_utf8_lossy(line)
                ),
            })?;
            let key = utf8(&line[..split], line_no)?.trim_end();
            if key.is_empty() {
                return Err(KeyFileError::Parse {
                    line: line_no,
                    reason: "empty key name".to_string(),
                });
            }

            let value = line[split + 1..].trim_ascii_start();
            let value = match std::str::from_utf8(value) {
                Ok(text) => RawValue::Text(text.to_string()),
                Err(_) => RawValue::NotUtf8(value.to_vec()),
            };

            file.groups
                .entry(group.clone())
                .or_default()
                .insert(key.to_string(), value);
        }

        Ok(file)
    }

    fn open_group(&mut self, header: &str, line_no: usize) -> Result<String, KeyFileError> {
        let name = header
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| KeyFileError::Parse {
                line: line_no,
                reason: format!("unterminated group header '{header}'"),
            })?;
        if name.is_empty() || name.contains(['[', ']']) || name.chars().any(char::is_control) {
            return Err(KeyFileError::Parse {
                line: line_no,
                reason: format!("invalid group name '{name}'"),
            });
        }
        self.groups.entry(name.to_string()).or_default();
        Ok(name.to_string())
    }
}

fn utf8(bytes: &[u8], line_no: usize) -> Result<&str, KeyFileError> {
    std::str::from_utf8(bytes).map_err(|_| KeyFileError::Parse {
        line: line_no,
        reason: "group or key name is not valid UTF-8".to_string(),
    })
}

impl KeyFileSource for KeyFile {
    fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    fn has_key(&self, group: &str, key: &str) -> bool {
        self.groups.get(group).is_some_and(|entries| entries.contains_key(key))
    }

    fn raw_value(&self, group: &str, key: &str) -> Result<&str, KeyFileError> {
        let entries = self
            .groups
            .get(group)
            .ok_or_else(|| KeyFileError::GroupNotFound(group.to_string()))?;
        match entries.get(key) {
            Some(RawValue::Text(text)) => Ok(text.as_str()),
            Some(RawValue::NotUtf8(bytes)) => {
                Err(invalid(group, key, &String::from_utf8_lossy(bytes), "UTF-8 string"))
            }
            None => Err(KeyFileError::KeyNotFound {
                group: group.to_string(),
                key: key.to_string(),
            }),
        }
    }
}
