//! HTML page for `/`.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::environment::snapshot::EnvSnapshot;

pub fn render_html(snapshot: &EnvSnapshot) -> String {
    let mut page = String::with_capacity(8 * 1024);
    page.push_str(concat!(
        "<!DOCTYPE html>\n",
        "<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Environment</title>\n",
        "<style>table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:4px 8px;text-align:left;vertical-align:top}td pre{margin:0}</style>\n",
        "</head>\n<body>\n",
    ));

    push_table(&mut page, "Environment variables", &snapshot.envs);
    if let Some(files) = &snapshot.file {
        push_table(&mut page, "Secret files", files);
    }

    page.push_str("</body>\n</html>\n");
    page
}

fn push_table(page: &mut String, title: &str, vars: &BTreeMap<String, String>) {
    let _ = writeln!(page, "<h2>{}</h2>", escape(title));
    page.push_str("<table>\n<tr><th>Name</th><th>Value</th></tr>\n");
    for (name, value) in vars {
        let _ = writeln!(
            page,
            "<tr><td>{}</td><td><pre>{}</pre></td></tr>",
            escape(name),
            escape(value)
        );
    }
    page.push_str("</table>\n");
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
