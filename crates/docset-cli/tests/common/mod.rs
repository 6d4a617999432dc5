#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Create a `docset-index` command suitable for integration tests.
#[allow(dead_code)]
pub fn docset_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docset-index"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env_remove("DOCSET_INDEX_CONFIG");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Lay out a small manual: one module page, its `Stdlib.` duplicate, a library
/// chapter, an ocamldoc type listing and a compiler-libs page.
#[allow(dead_code)]
pub fn write_manual(root: &Path) {
    let pages = [
        (
            "libref/Bool.html",
            concat!(
                "<html><body>\n",
                "<h1>Module <a href=\"type_Bool.html\">Bool</a></h1>\n",
                "<pre><code><span id=\"TYPEELTt.false\">false</span></code></pre>\n",
                "<pre><span id=\"VALnot\">val not</span> : bool -&gt; bool</pre>\n",
                "</body></html>\n",
            ),
        ),
        (
            "libref/Stdlib.Bool.html",
            "<html><body><h1>Module <a href=\"type_Stdlib.Bool.html\">Stdlib.Bool</a></h1></body></html>\n",
        ),
        (
            "libref/type_Bool.html",
            "<html><body><pre>sig .. end</pre></body></html>\n",
        ),
        (
            "libstr.html",
            concat!(
                "<html><body>\n",
                "<h1 id=\"c:str\">Chapter 29 The str library</h1>\n",
                "<pre>type regexp</pre>\n",
                "</body></html>\n",
            ),
        ),
        (
            "compilerlibref/Ast_helper.html",
            "<html><body><h1>Module Ast_helper</h1></body></html>\n",
        ),
    ];
    for (rel, content) in pages {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

/// `(name, type, path)` rows ordered by id.
#[allow(dead_code)]
pub fn index_rows(db: &Path) -> Vec<(String, String, String)> {
    let conn = rusqlite::Connection::open(db).unwrap();
    let mut stmt = conn
        .prepare("SELECT name, type, path FROM searchIndex ORDER BY id")
        .unwrap();
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}
