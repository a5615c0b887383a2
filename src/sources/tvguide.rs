//! TV Guide listing page scrape
//!
//! The page is fetched from a URL template and scanned for elements whose
//! class mentions `program` or `listing`. Inside each, the first descendants
//! whose classes mention `time`, `title`/`name` and `desc`/`summary` supply
//! the entry. Entries without a time and a title are skipped, and a matching
//! element that wraps other complete rows (a `listings-grid`) is not a row.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::debug;

use super::status::SCRAPED;
use super::traits::{AdapterKind, SourceAdapter};
use crate::config::TvGuideConfig;
use crate::errors::{SourceError, SourceResult};
use crate::models::{ItemDraft, Query, RawListing, StartTime};
use crate::utils::url::UrlUtils;
use crate::utils::HttpClient;

pub const NAME: &str = "tvguide";

const CONTAINER_CLASSES: &[&str] = &["program", "listing"];
const TIME_CLASSES: &[&str] = &["time"];
const TITLE_CLASSES: &[&str] = &["title", "name"];
const DESCRIPTION_CLASSES: &[&str] = &["desc", "summary"];

fn class_mentions(element: &ElementRef, needles: &[&str]) -> bool {
    element
        .value()
        .attr("class")
        .map(|class| class.to_lowercase())
        .is_some_and(|class| needles.iter().any(|needle| class.contains(needle)))
}

fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(
    container: &ElementRef,
    selector: &Selector,
    needles: &[&str],
) -> Option<String> {
    container
        .select(selector)
        .find(|el| class_mentions(el, needles))
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
}

struct RowSelectors {
    container: Selector,
    field: Selector,
    title: Selector,
}

impl RowSelectors {
    fn new() -> Result<Self, String> {
        let parse = |css: &str| Selector::parse(css).map_err(|e| e.to_string());
        Ok(Self {
            container: parse("div[class], li[class]")?,
            field: parse("span[class], div[class]")?,
            title: parse("span[class], div[class], a[class]")?,
        })
    }

    fn is_container(&self, element: &ElementRef) -> bool {
        class_mentions(element, CONTAINER_CLASSES)
    }

    /// Draft for `program` if it carries both a time and a title
    fn row(&self, program: &ElementRef) -> Option<ItemDraft> {
        let time = first_text(program, &self.field, TIME_CLASSES)?;
        let title = first_text(program, &self.title, TITLE_CLASSES)?;
        let description = first_text(program, &self.field, DESCRIPTION_CLASSES);

        Some(ItemDraft {
            description,
            ..ItemDraft::new(StartTime::parse(&time), title)
        })
    }

    fn wraps_rows(&self, element: &ElementRef) -> bool {
        element
            .select(&self.container)
            .any(|inner| self.is_container(&inner) && self.row(&inner).is_some())
    }
}

/// Extract up to `max_items` programme entries from a listing page
pub fn parse_listing_page(html: &str, max_items: usize) -> Result<Vec<ItemDraft>, String> {
    let document = Html::parse_document(html);
    let selectors = RowSelectors::new()?;

    let drafts = document
        .select(&selectors.container)
        .filter(|el| selectors.is_container(el) && !selectors.wraps_rows(el))
        .filter_map(|program| selectors.row(&program))
        .take(max_items)
        .collect();

    Ok(drafts)
}

pub struct TvGuideAdapter {
    client: HttpClient,
    config: TvGuideConfig,
}

impl TvGuideAdapter {
    pub fn new(client: HttpClient, config: TvGuideConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl SourceAdapter for TvGuideAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Scrape
    }

    fn timeout(&self) -> Option<Duration> {
        self.config.timeout
    }

    async fn fetch(&self, query: &Query) -> SourceResult<RawListing> {
        let url = UrlUtils::fill_template(&self.config.url_template, query.entity(), &query.date_string());
        let html = self.client.get_text(NAME, &url).await?;

        let drafts = parse_listing_page(&html, self.config.max_items)
            .map_err(|e| SourceError::parse(NAME, e))?;
        debug!("{}: scraped {} entries from {}", NAME, drafts.len(), url);

        if drafts.is_empty() {
            return Err(SourceError::empty(NAME));
        }
        Ok(RawListing::new(drafts, SCRAPED))
    }
}
