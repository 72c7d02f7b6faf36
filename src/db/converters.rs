//! Row → domain-type converters shared by the store queries.

use rusqlite::Row;

use crate::types::{Definition, LanguageInfo, Link, LinkTarget, Word};

/// Convert a row of `word_ix, lang, lexeme, sense` into a [`Word`].
pub fn row_to_word(row: &Row<'_>) -> rusqlite::Result<Word> {
    Ok(Word {
        id: row.get("word_ix")?,
        lang: row.get("lang")?,
        lexeme: row.get("lexeme")?,
        sense: row.get("sense")?,
    })
}

/// Convert a row of `type, source, target` into a [`Link`], decoding the
/// signed target into its tagged form.
pub fn row_to_link(row: &Row<'_>) -> rusqlite::Result<Link> {
    let raw_target: i64 = row.get("target")?;
    Ok(Link {
        source: row.get("source")?,
        target: LinkTarget::from_raw(raw_target),
        kind: row.get("type")?,
    })
}

/// Convert a row of `lang_name, family, branch` into a [`LanguageInfo`].
pub fn row_to_language_info(row: &Row<'_>) -> rusqlite::Result<LanguageInfo> {
    Ok(LanguageInfo {
        name: row.get("lang_name")?,
        family: row.get("family")?,
        branch: row.get("branch")?,
    })
}

/// Convert a row of `definition, part_of_speech, phonetic` into a
/// [`Definition`].
pub fn row_to_definition(row: &Row<'_>) -> rusqlite::Result<Definition> {
    Ok(Definition {
        definition: row.get("definition")?,
        part_of_speech: row.get("part_of_speech")?,
        phonetic: row.get("phonetic")?,
    })
}
