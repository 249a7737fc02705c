//! CEDICT-family line parsing

use crate::error::Result;
use crate::models::WordEntry;
use crate::sources::{GlossLang, LineFormat, SourceDefinition};
use regex::Regex;
use std::io::BufRead;
use std::sync::OnceLock;

fn cedict_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\S+) (\S+) \[([^\]]+)\] (.+)$").expect("valid CEDICT line regex")
    })
}

fn canto_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\S+) (\S+) \[([^\]]+)\] \{([^}]+)\} /(.+)/$")
            .expect("valid CC-Canto line regex")
    })
}

fn taiwan_pronunciation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Taiwan pr\. \[(.*?)\]").expect("valid Taiwan pr. regex"))
}

/// Structured pieces pulled out of a raw definition blob
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definitions {
    pub glosses: Vec<String>,
    pub pinyin_tw: Option<String>,
    pub classifiers: Option<String>,
    pub variants: Option<String>,
}

impl Definitions {
    /// Newline-joined non-empty glosses, `None` when there are none
    pub fn joined(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .glosses
            .iter()
            .map(String::as_str)
            .filter(|g| !g.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }
}

/// Split a definition blob into glosses and sub-fields
pub fn parse_definitions(raw: &str, lang: GlossLang) -> Definitions {
    let mut defs = Definitions::default();

    for part in raw.split(lang.delimiter()) {
        if part.starts_with("Taiwan pr.") {
            if let Some(caps) = taiwan_pronunciation().captures(part) {
                defs.pinyin_tw = Some(caps[1].to_string());
            }
        } else if part.starts_with("CL:") {
            defs.classifiers = Some(part.replace("CL:", ""));
        } else if part.starts_with("also written") {
            defs.variants = Some(part.replace("also written", "").trim().to_string());
        } else {
            defs.glosses.push(part.trim().to_string());
        }
    }

    defs
}

/// Parse one dictionary line; comments and malformed lines yield `None`
pub fn parse_line(line: &str, source: &SourceDefinition) -> Option<WordEntry> {
    let line = line.trim_end_matches(['\n', '\r']);

    let (caps, jyutping, raw_defs) = match source.format {
        LineFormat::Cedict => {
            let caps = cedict_line().captures(line)?;
            let defs = caps.get(4)?.as_str();
            (caps, None, defs)
        }
        LineFormat::Canto => {
            let caps = canto_line().captures(line)?;
            let jyutping = caps.get(4).map(|m| m.as_str().to_string());
            let defs = caps.get(5)?.as_str();
            (caps, jyutping, defs)
        }
    };

    let defs = parse_definitions(raw_defs, source.lang);

    let mut entry = WordEntry {
        traditional: caps[1].to_string(),
        simplified: caps[2].to_string(),
        pinyin: caps[3].replace("u:", "ü"),
        pinyin_tw: defs.pinyin_tw.clone(),
        jyutping,
        classifiers: defs.classifiers.clone(),
        variants: defs.variants.clone(),
        ..Default::default()
    };
    entry.set_gloss(source.lang, defs.joined());

    Some(entry)
}

/// Iterate over the entries of a dictionary file, skipping non-entry lines
pub fn read_entries<'a, R: BufRead + 'a>(
    reader: R,
    source: &'a SourceDefinition,
) -> impl Iterator<Item = Result<WordEntry>> + 'a {
    reader.lines().filter_map(move |line| match line {
        Ok(line) => parse_line(&line, source).map(Ok),
        Err(e) => Some(Err(e.into())),
    })
}

/// Comment lines (`#...`) that make up a dictionary's license header.
///
/// With a stop marker, copying ends after the first comment line starting
/// with it.
pub fn license_lines<R: BufRead>(reader: R, stop_marker: Option<&str>) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.starts_with('#') {
            continue;
        }
        let stop = stop_marker.is_some_and(|marker| line.starts_with(marker));
        lines.push(line);
        if stop {
            break;
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_dictionaries;
    fn source(name: &str) -> SourceDefinition {
        default_dictionaries()
            .into_iter()
            .find(|s| s.name == name)
            .unwrap()
    }

    #[test]
    fn test_parse_cedict_line() {
        let cedict = source("CC-CEDICT");
        let entry = parse_line(
            "個 个 [ge4] /individual/this/that/size/classifier for people or objects in general/\n",
            &cedict,
        )
        .unwrap();

        assert_eq!(entry.traditional, "個");
        assert_eq!(entry.simplified, "个");
        assert_eq!(entry.pinyin, "ge4");
        assert_eq!(
            entry.english.as_deref(),
            Some("individual\nthis\nthat\nsize\nclassifier for people or objects in general")
        );
        assert!(entry.german.is_none());
        assert!(entry.jyutping.is_none());
    }

    #[test]
    fn test_parse_subfields() {
        let cedict = source("CC-CEDICT");
        let entry = parse_line(
            "垃圾 垃圾 [la1 ji1] /trash/refuse/garbage/(coll.) of poor quality/Taiwan pr. [le4 se4]/CL:堆[dui1]/also written 拉圾/",
            &cedict,
        )
        .unwrap();

        assert_eq!(entry.pinyin_tw.as_deref(), Some("le4 se4"));
        assert_eq!(entry.classifiers.as_deref(), Some("堆[dui1]"));
        assert_eq!(entry.variants.as_deref(), Some("拉圾"));
        assert_eq!(
            entry.english.as_deref(),
            Some("trash\nrefuse\ngarbage\n(coll.) of poor quality")
        );
    }

    #[test]
    fn test_umlaut_pinyin() {
        let cedict = source("CC-CEDICT");
        let entry = parse_line("女 女 [nu:3] /female/woman/", &cedict).unwrap();
        assert_eq!(entry.pinyin, "nü3");
    }

    #[test]
    fn test_comment_and_blank_lines_skipped() {
        let cedict = source("CC-CEDICT");
        assert!(parse_line("# CC-CEDICT", &cedict).is_none());
        assert!(parse_line("", &cedict).is_none());
        assert!(parse_line("broken line without brackets", &cedict).is_none());
    }

    #[test]
    fn test_parse_canto_line() {
        let canto = source("CC-Canto");
        let entry = parse_line(
            "一下 一下 [yi1 xia4] {jat1 haa5} /a while; in a moment; once/\r\n",
            &canto,
        )
        .unwrap();

        assert_eq!(entry.jyutping.as_deref(), Some("jat1 haa5"));
        assert_eq!(entry.english_hk.as_deref(), Some("a while\nin a moment\nonce"));
        assert!(entry.english.is_none());
        assert!(entry.is_cantonese());
    }

    #[test]
    fn test_canto_requires_jyutping() {
        let canto = source("CC-Canto");
        assert!(parse_line("一下 一下 [yi1 xia4] /a while/", &canto).is_none());
    }

    #[test]
    fn test_taiwan_pr_without_brackets_is_dropped() {
        let defs = parse_definitions("/Taiwan pr. unknown/word/", GlossLang::English);
        assert!(defs.pinyin_tw.is_none());
        assert_eq!(defs.joined().as_deref(), Some("word"));
    }

    #[test]
    fn test_empty_gloss_is_none() {
        let defs = parse_definitions("/CL:個|个[ge4]/", GlossLang::English);
        assert_eq!(defs.classifiers.as_deref(), Some("個|个[ge4]"));
        assert_eq!(defs.joined(), None);
    }

    #[test]
    fn test_read_entries() {
        let german = source("HanDeDICT");
        let data = "# HanDeDict\n你好 你好 [ni3 hao3] /Hallo/Guten Tag/\n\n再見 再见 [zai4 jian4] /Auf Wiedersehen/\n";
        let entries: Vec<_> = read_entries(data.as_bytes(), &german)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].german.as_deref(), Some("Hallo\nGuten Tag"));
        assert_eq!(entries[1].simplified, "再见");
    }

    #[test]
    fn test_license_lines() {
        let data = "# HanDeDict\n# Lizenz: CC BY-SA\n# Siehe https://example.org\n# trailing\n你好 你好 [ni3 hao3] /Hallo/\n";
        let lines = license_lines(data.as_bytes(), Some("# Siehe https")).unwrap();
        assert_eq!(
            lines,
            vec!["# HanDeDict", "# Lizenz: CC BY-SA", "# Siehe https://example.org"]
        );

        let all = license_lines(data.as_bytes(), None).unwrap();
        assert_eq!(all.len(), 4);
    }
}
