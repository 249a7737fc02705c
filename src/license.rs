//! License aggregation document
//!
//! Every upstream source carries its license in comments: XML comments in
//! the Unihan export, `#` header lines in the CEDICT-family files. They are
//! concatenated into one attribution file shipped next to the database.

use crate::config::Config;
use crate::error::Result;
use crate::parse::{license_comments, license_lines, open_source, read_source};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::info;

const RULE: &str = "#########################\n";

fn section_heading(out: &mut String, what: &str) {
    out.push_str(RULE);
    let _ = write!(out, "This database contains an extract of {}\n\n", what);
}

/// Build the attribution document from the downloaded sources
pub fn render_license(config: &Config) -> Result<String> {
    let mut out = String::new();
    out.push_str(RULE);
    let _ = write!(
        out,
        "The {} database was created by aggregating the following sources.\n\n",
        config.db_file_name
    );

    section_heading(&mut out, "the Unihan database");
    let unihan = read_source(&config.source_path(&config.unihan.out_filename))?;
    out.push_str(&license_comments(&unihan).concat());
    out.push_str("\n\n");

    // Sources without a stop marker first, then the truncated ones
    let (full, truncated): (Vec<_>, Vec<_>) = config
        .dictionaries
        .iter()
        .partition(|source| source.license_stop_marker.is_none());

    for source in full.into_iter().chain(truncated) {
        section_heading(&mut out, &source.name);
        let reader = open_source(&config.source_path(&source.out_filename))?;
        for line in license_lines(reader, source.license_stop_marker.as_deref())? {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str("\n\n");
    }

    Ok(out)
}

/// Write the attribution document to the configured license path
pub fn write_license(config: &Config) -> Result<PathBuf> {
    let text = render_license(config)?;
    let path = config.license_path();
    std::fs::write(&path, text)?;
    info!(path = %path.display(), "Wrote license document");
    Ok(path)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::Config;
    use std::fs;

    pub const UNIHAN_XML: &str = "<?xml version=\"1.0\"?>\n<!-- Unihan license -->\n<ucd>\n<char cp=\"4E07\" kMandarin=\"wàn\" kTraditionalVariant=\"U+842C\"/>\n<char cp=\"842C\" kMandarin=\"wàn\" kCantonese=\"maan6\" kSimplifiedVariant=\"U+4E07\"/>\n</ucd>\n";
    pub const CEDICT: &str = "# CC-CEDICT\n# License: CC BY-SA 4.0\n萬 万 [wan4] /ten thousand/CL:個|个[ge4]/\n你好 你好 [ni3 hao3] /hello/hi/\n";
    pub const HANDEDICT: &str = "# HanDeDict\n# Siehe https://handedict.zydeo.net\n# not copied\n你好 你好 [ni3 hao3] /Hallo/\n";
    pub const CFDICT: &str = "# CFDICT\n你好 你好 [ni3 hao3] /bonjour/\n";
    pub const CCCANTO: &str = "# CC-Canto\n你好 你好 [ni3 hao3] {nei5 hou2} /hello; how do you do/\n";

    /// Populate a data directory with small versions of every source
    pub fn write_sources(config: &Config) {
        fs::create_dir_all(&config.data_dir).unwrap();
        fs::write(config.source_path(&config.unihan.out_filename), UNIHAN_XML).unwrap();
        for (name, content) in [
            ("CC-CEDICT", CEDICT),
            ("HanDeDICT", HANDEDICT),
            ("CFDICT", CFDICT),
            ("CC-Canto", CCCANTO),
        ] {
            let source = config
                .dictionaries
                .iter()
                .find(|s| s.name == name)
                .unwrap();
            fs::write(config.source_path(&source.out_filename), content).unwrap();
        }
    }
}
