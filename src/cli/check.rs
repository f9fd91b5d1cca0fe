//! `check`: verify that a written feed is well-formed.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::config::SiteConfig;
use crate::log;
use crate::utils::plural_count;

/// Parse `xml` and count its `<product>` elements.
///
/// Fails on malformed markup or an unexpected root element.
pub fn count_products(xml: &str) -> Result<usize> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut products = 0;

    loop {
        let event = reader
            .read_event()
            .with_context(|| format!("malformed XML at byte {}", reader.buffer_position()))?;
        match event {
            Event::Start(e) => {
                if depth == 0 && e.name().as_ref() != b"products" {
                    bail!(
                        "unexpected root element <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    );
                }
                if depth == 1 && e.name().as_ref() == b"product" {
                    products += 1;
                }
                depth += 1;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        bail!("document ends inside an open element");
    }
    Ok(products)
}

/// Check `path`, or the configured feed file when `None`.
pub fn check(config: &SiteConfig, path: Option<&Path>) -> Result<()> {
    let feed_path = config.feed_path();
    let path = path.unwrap_or(&feed_path);

    let xml = fs::read_to_string(path)
        .with_context(|| format!("Failed to read feed {}", path.display()))?;
    let products =
        count_products(&xml).with_context(|| format!("Invalid feed {}", path.display()))?;

    log!("check"; "{} is well-formed, {}", path.display(), plural_count(products, "product"));
    Ok(())
}
