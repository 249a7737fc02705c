//! Tatoeba sentence corpus
//!
//! Two monolingual sentence exports are joined through the link table into
//! an ordered source → target mapping, cached as a tab-separated file, and
//! searched for usage sentences while words are imported.

use crate::error::Result;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Sentence exports: `id \t lang \t text` → id → text
pub fn parse_sentences<R: BufRead>(reader: R) -> Result<IndexMap<String, String>> {
    let mut sentences = IndexMap::new();
    for line in reader.lines() {
        let line = line?;
        let mut cols = line.split('\t');
        if let (Some(id), Some(_lang), Some(text)) = (cols.next(), cols.next(), cols.next()) {
            sentences.insert(id.to_string(), text.to_string());
        }
    }
    Ok(sentences)
}

/// Link table: `id \t id`; a later link for the same id replaces the earlier one
pub fn parse_links<R: BufRead>(reader: R) -> Result<IndexMap<String, String>> {
    let mut links = IndexMap::new();
    for line in reader.lines() {
        let line = line?;
        let mut cols = line.split('\t');
        if let (Some(from), Some(to)) = (cols.next(), cols.next()) {
            links.insert(from.to_string(), to.to_string());
        }
    }
    Ok(links)
}

/// Ordered (source sentence, target sentence) pairs with a per-character
/// index over the target sentences
#[derive(Debug, Clone, Default)]
pub struct SentenceCorpus {
    pairs: Vec<(String, String)>,
    index: HashMap<char, Vec<usize>>,
}

impl SentenceCorpus {
    /// Build from pairs; a repeated source sentence keeps its first position
    /// and takes the last target
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut merged: IndexMap<String, String> = IndexMap::new();
        for (source, target) in pairs {
            merged.insert(source, target);
        }

        let pairs: Vec<(String, String)> = merged.into_iter().collect();
        let mut index: HashMap<char, Vec<usize>> = HashMap::new();
        for (i, (_, target)) in pairs.iter().enumerate() {
            let mut seen = std::collections::HashSet::new();
            for ch in target.chars() {
                if seen.insert(ch) {
                    index.entry(ch).or_default().push(i);
                }
            }
        }

        Self { pairs, index }
    }

    /// Join two sentence sets through the link table
    pub fn merge(
        source: &IndexMap<String, String>,
        target: &IndexMap<String, String>,
        links: &IndexMap<String, String>,
    ) -> Self {
        let pairs = links.iter().filter_map(|(from, to)| {
            let src = source.get(from)?;
            let dst = target.get(to)?;
            Some((src.clone(), dst.clone()))
        });
        Self::from_pairs(pairs)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Write the `source \t target` cache file
    pub fn write_cache(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        for (source, target) in &self.pairs {
            writeln!(out, "{}\t{}", source, target)?;
        }
        out.flush()?;
        debug!(path = %path.display(), pairs = self.pairs.len(), "Wrote sentence corpus cache");
        Ok(())
    }

    /// Read a cache file written by [`SentenceCorpus::write_cache`]
    pub fn read_cache<R: BufRead>(reader: R) -> Result<Self> {
        let mut pairs = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let mut cols = line.split('\t');
            if let (Some(source), Some(target)) = (cols.next(), cols.next()) {
                pairs.push((source.to_string(), target.to_string()));
            }
        }
        Ok(Self::from_pairs(pairs))
    }

    /// Positions of target sentences that may contain `word`, ascending
    fn candidates(&self, word: &str) -> &[usize] {
        let mut best: Option<&[usize]> = None;
        for ch in word.chars() {
            let Some(postings) = self.index.get(&ch) else {
                return &[];
            };
            if best.map_or(true, |b| postings.len() < b.len()) {
                best = Some(postings.as_slice());
            }
        }
        best.unwrap_or(&[])
    }

    /// Usage blob for a word: every pair whose target sentence contains the
    /// simplified or traditional form, as `"<target>\n<source>"` blocks
    /// separated by blank lines, in corpus order. `max` of 0 keeps all.
    pub fn usage_for(&self, simplified: &str, traditional: &str, max: usize) -> Option<String> {
        let mut positions: Vec<usize> = self
            .candidates(simplified)
            .iter()
            .chain(self.candidates(traditional))
            .copied()
            .collect();
        positions.sort_unstable();
        positions.dedup();

        let mut usage = String::new();
        let mut kept = 0;
        for i in positions {
            let (source, target) = &self.pairs[i];
            if !target.contains(simplified) && !target.contains(traditional) {
                continue;
            }
            usage.push_str(target);
            usage.push('\n');
            usage.push_str(source);
            usage.push_str("\n\n");
            kept += 1;
            if max > 0 && kept >= max {
                break;
            }
        }

        let usage = usage.trim_matches('\n');
        if usage.is_empty() {
            None
        } else {
            Some(usage.to_string())
        }
    }
}
