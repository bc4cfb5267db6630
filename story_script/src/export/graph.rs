use std::io::{self, Write};

use story_data::Story;

/// One `"from" -> "to";` edge per choice, inside a single `digraph` block.
///
/// The quit scene is walked like any other; edges into it are kept.
///
/// # Errors
/// Propagates write failures from `out`.
pub fn export_graph<W: Write>(story: &Story<'_>, out: &mut W) -> io::Result<()> {
    writeln!(out, "digraph {{")?;
    writeln!(out, "    node [fontname=\"sans-serif\", shape=\"box\"];")?;

    for (label, scene) in story.scenes.iter() {
        for choice in scene.choices() {
            out.write_all(b"    ")?;
            write_quoted(out, label)?;
            out.write_all(b" -> ")?;
            write_quoted(out, choice.link)?;
            out.write_all(b";\n")?;
        }
    }

    writeln!(out, "}}")?;
    out.flush()
}

/// DOT quoted id; only `"` needs escaping.
fn write_quoted<W: Write>(out: &mut W, label: &[u8]) -> io::Result<()> {
    out.write_all(b"\"")?;
    for chunk in label.split_inclusive(|&b| b == b'"') {
        match chunk.split_last() {
            Some((&b'"', head)) => {
                out.write_all(head)?;
                out.write_all(b"\\\"")?;
            },
            _ => out.write_all(chunk)?,
        }
    }
    out.write_all(b"\"")
}

#[cfg(test)]
mod tests {
    use story_data::{Choice, HashTable, LanguageTable, Scene};

    use super::*;

    #[test]
    fn quotes_are_escaped_in_ids() {
        let mut out = Vec::new();
        write_quoted(&mut out, b"say \"hi\"").unwrap();
        assert_eq!(out, b"\"say \\\"hi\\\"\"");
    }

    #[test]
    fn emits_every_edge_including_quit_targets() {
        let mut scenes = HashTable::new();
        let mut hub = Scene::default();
        hub.push_choice(Choice::new(b"left")).unwrap();
        hub.push_choice(Choice::new(b"end")).unwrap();
        scenes.put(b"hub", hub).unwrap();
        scenes.put(b"left", Scene::default()).unwrap();
        scenes.put(b"end", Scene::default()).unwrap();
        let story = Story {
            scenes,
            languages: LanguageTable::new(),
            start: b"hub",
            quit: b"end",
        };

        let mut out = Vec::new();
        export_graph(&story, &mut out).unwrap();
        let dot = String::from_utf8(out).unwrap();
        assert!(dot.starts_with("digraph {\n"));
        assert!(dot.trim_end().ends_with('}'));
        assert!(dot.contains("    \"hub\" -> \"left\";\n"));
        assert!(dot.contains("    \"hub\" -> \"end\";\n"));
        assert_eq!(dot.matches("->").count(), 2);
    }
}
