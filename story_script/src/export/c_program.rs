//! Standalone C99 program export.
//!
//! The generated program embeds every scene in a static table and runs the
//! same interactive loop as the engine, with one difference kept on purpose:
//! commands are recognised by substring (`strstr`), not by exact words.

use std::io::{self, Write};

use story_data::{Localized, MAX_CHOICES, Story};

const SCENE_PREFIX: &str = "identifier_";
const LANGUAGE_PREFIX: &str = "language_";

/// C string literal for raw bytes, quotes included.
pub fn escape_c_string(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(b'"');
    for &b in bytes {
        match b {
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x0c => out.extend_from_slice(b"\\f"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            b if b < 0x20 => out.extend_from_slice(format!("\\u{b:04x}").as_bytes()),
            b => out.push(b),
        }
    }
    out.push(b'"');
    out
}

/// Injective identifier for a label: the prefix plus two hex digits per byte.
pub fn scene_identifier(label: &[u8]) -> String {
    hex_identifier(SCENE_PREFIX, label)
}

/// Injective identifier for a language code.
pub fn language_identifier(code: &[u8]) -> String {
    hex_identifier(LANGUAGE_PREFIX, code)
}

fn hex_identifier(prefix: &str, bytes: &[u8]) -> String {
    let mut id = String::with_capacity(prefix.len() + bytes.len() * 2);
    id.push_str(prefix);
    for b in bytes {
        id.push_str(&format!("{b:02x}"));
    }
    id
}

/// Write a self-contained C program that plays `story`.
///
/// # Errors
/// Propagates write failures from `out`.
pub fn export_c<W: Write>(story: &Story<'_>, out: &mut W) -> io::Result<()> {
    let language_slots = story.languages.len().max(1);

    writeln!(out, "#include <stdio.h>")?;
    writeln!(out, "#include <string.h>")?;
    writeln!(out)?;

    writeln!(out, "typedef struct {{")?;
    writeln!(out, "    int   link;")?;
    writeln!(out, "    char* text[{language_slots}];")?;
    writeln!(out, "}} Choice;")?;
    writeln!(out)?;

    writeln!(out, "typedef struct {{")?;
    writeln!(out, "    char*  text[{language_slots}];")?;
    writeln!(out, "    Choice choices[{MAX_CHOICES}];")?;
    writeln!(out, "    int    choice_count;")?;
    writeln!(out, "}} Scene;")?;
    writeln!(out)?;

    out.write_all(PRINT_SCENE.as_bytes())?;

    if !story.languages.is_empty() {
        writeln!(out, "enum {{")?;
        for code in story.languages.iter() {
            writeln!(out, "    {},", language_identifier(code))?;
        }
        writeln!(out, "}};")?;
        writeln!(out)?;
    }

    writeln!(out, "enum {{")?;
    for label in story.scenes.keys() {
        writeln!(out, "    {},", scene_identifier(label))?;
    }
    writeln!(out, "}};")?;
    writeln!(out)?;

    write_scene_table(story, out)?;
    write_main(story, out)?;
    out.flush()
}

const PRINT_SCENE: &str = r#"void print_scene(Scene* scene, int language) {
    printf("\n%s\n", scene->text[language]);
    for (int i = 0; i < scene->choice_count; i++) {
        printf("[%d] %s\n", i + 1, scene->choices[i].text[language]);
    }
}

"#;

fn write_scene_table<W: Write>(story: &Story<'_>, out: &mut W) -> io::Result<()> {
    let playable = story.scenes.iter().filter(|(label, _)| !story.is_quit(label));
    if story.scenes.iter().all(|(label, _)| story.is_quit(label)) {
        writeln!(out, "Scene scenes[1];")?;
        return writeln!(out);
    }

    writeln!(out, "Scene scenes[] = {{")?;
    for (label, scene) in playable {
        writeln!(out, "    [{}] = {{", scene_identifier(label))?;

        writeln!(out, "        {{")?;
        write_localized(story, &scene.text, "            ", out)?;
        writeln!(out, "        }},")?;

        writeln!(out, "        {{")?;
        for choice in scene.choices() {
            writeln!(out, "            {{")?;
            writeln!(out, "                {},", scene_identifier(choice.link))?;
            writeln!(out, "                {{")?;
            write_localized(story, &choice.text, "                    ", out)?;
            writeln!(out, "                }},")?;
            writeln!(out, "            }},")?;
        }
        writeln!(out, "        }},")?;

        writeln!(out, "        {}", scene.choice_count())?;
        writeln!(out, "    }},")?;
    }
    writeln!(out, "}};")?;
    writeln!(out)
}

/// One designated initializer per declared language; missing text is `""`.
fn write_localized<W: Write>(story: &Story<'_>, text: &Localized<'_>, indent: &str, out: &mut W) -> io::Result<()> {
    for (index, code) in story.languages.iter().enumerate() {
        write!(out, "{indent}[{}] = ", language_identifier(code))?;
        out.write_all(&escape_c_string(text.get(index).unwrap_or_default()))?;
        writeln!(out, ",")?;
    }
    Ok(())
}

fn write_main<W: Write>(story: &Story<'_>, out: &mut W) -> io::Result<()> {
    writeln!(out, "int main() {{")?;
    writeln!(out)?;
    writeln!(out, "    setvbuf(stdout, NULL, _IONBF, 0);")?;
    writeln!(out)?;
    writeln!(out, "    int  language = 0;")?;
    writeln!(out, "    int  current_scene_index = {};", scene_identifier(story.start))?;
    writeln!(out, "    char input[256];")?;
    writeln!(out)?;
    writeln!(out, "    while (1) {{")?;
    writeln!(out)?;
    writeln!(out, "        if (current_scene_index == {}) break;", scene_identifier(story.quit))?;
    out.write_all(LOOP_HEAD.as_bytes())?;

    writeln!(out, "            const char* langs[] = {{")?;
    if story.languages.is_empty() {
        writeln!(out, "                \"\",")?;
    }
    for code in story.languages.iter() {
        write!(out, "                [{}] = ", language_identifier(code))?;
        out.write_all(&escape_c_string(code))?;
        writeln!(out, ",")?;
    }
    writeln!(out, "            }};")?;
    writeln!(out, "            for (int i = 0; i < {}; i++) {{", story.languages.len())?;
    out.write_all(LOOP_TAIL.as_bytes())
}

const LOOP_HEAD: &str = r#"
        Scene* scene = &scenes[current_scene_index];
        print_scene(scene, language);

        ask_again:
        printf("> ");
        if (!fgets(input, sizeof(input), stdin)) break;

        if (strstr(input, "quit")  || strstr(input, "exit"))  break;
        if (strstr(input, "scene") || strstr(input, "print")) continue;

        if (strstr(input, "lang")) {
"#;

const LOOP_TAIL: &str = r#"                if (strstr(input, langs[i])) {
                    language = i;
                    goto next;
                }
            }
            goto ask_again;
        }

        {
            const char* nums[] = {"1", "2", "3", "4", "5", "6", "7", "8"};
            for (int i = 0; i < scene->choice_count; i++) {
                if (strstr(input, nums[i])) {
                    current_scene_index = scene->choices[i].link;
                    goto next;
                }
            }
        }

        printf("We don't know what you want to do!\nType the option number to choose it.\n");
        goto ask_again;

        next: continue;
    }
}
"#;
