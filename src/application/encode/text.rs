//! Human-readable plain-text table.

use crate::domain::ResultSet;

const SEPARATOR: &str = " | ";

pub fn encode(result: &ResultSet) -> String {
    let mut out = String::from("# Results:\n#\n# Headers:\n# ");
    out.push_str(&result.columns().join(SEPARATOR));
    out.push('\n');

    for row in result.rows() {
        let line: Vec<String> = row.iter().map(ToString::to_string).collect();
        out.push_str(&line.join(SEPARATOR));
        out.push('\n');
    }
    out
}
