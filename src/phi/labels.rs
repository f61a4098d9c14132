//! Axis label text such as "Binding Energy(eV),reverse".

use crate::models::{Header, Value};
use regex::Regex;
use std::sync::LazyLock;

static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^,(]+)").expect("axis name pattern is valid"));
static UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((.*?)\)").expect("axis unit pattern is valid"));
static OPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",([^,]+)$").expect("axis option pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLabel {
    pub name: String,
    pub unit: String,
    pub option: String,
    /// "name (unit)"
    pub label: String,
}

impl AxisLabel {
    pub fn parse(text: &str) -> Self {
        let capture = |re: &Regex| {
            re.captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default()
        };

        let name = capture(&NAME);
        let mut unit = capture(&UNIT);
        if unit == "c/s" {
            unit = "cps".to_string();
        }
        let option = capture(&OPTION);
        let label = format!("{} ({})", name, unit);

        Self {
            name,
            unit,
            option,
            label,
        }
    }

    /// Whether the axis is drawn reversed
    pub fn is_reversed(&self) -> bool {
        !self.option.is_empty()
    }

    /// Store under `<axis>labelname`, `<axis>labelunit`, `<axis>option` and `<axis>label`
    pub fn merge_into(&self, header: &mut Header, axis: char) {
        header.insert(format!("{}labelname", axis), Value::text(self.name.as_str()));
        header.insert(format!("{}labelunit", axis), Value::text(self.unit.as_str()));
        header.insert(format!("{}option", axis), Value::text(self.option.as_str()));
        header.insert(format!("{}label", axis), Value::text(self.label.as_str()));
    }
}
