//! HTML parsing for the vendor directory
//!
//! Listing pages hold one `.bizLinkDiv` card per vendor, wrapped in the link
//! to that vendor's detail page.

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::error::{ScrapeError, ScrapeResult};

const ADDRESS_SUFFIX: &str = ", ישראל";

/// A vendor card as it appears on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCard {
    pub name: String,
    pub image_url: Option<String>,
    pub brief_description: String,
    pub address: String,
    pub phone: String,
    /// `href` of the link wrapping the card, relative to the site root
    pub detail_href: Option<String>,
}

/// Long-form content from a vendor's own page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorDetails {
    pub description: String,
    pub gallery: Vec<String>,
}

/// One entry of the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub brief_description: String,
    pub description: String,
    pub address: String,
    pub phone: String,
    pub gallery: Vec<String>,
}

impl Provider {
    pub fn new(card: ListingCard, details: VendorDetails) -> Self {
        Self {
            name: card.name,
            image_url: card.image_url,
            brief_description: card.brief_description,
            description: details.description,
            address: card.address,
            phone: card.phone,
            gallery: details.gallery,
        }
    }
}

/// Compiled selectors for listing and detail pages.
pub struct VendorParser {
    card: Selector,
    name: Selector,
    image: Selector,
    brief: Selector,
    address: Selector,
    phone: Selector,
    description: Selector,
    gallery: Selector,
}

impl VendorParser {
    pub fn new() -> ScrapeResult<Self> {
        Ok(Self {
            card: selector(".bizLinkDiv")?,
            name: selector(".bizName h3")?,
            image: selector(".businessImageWrapper img")?,
            brief: selector(".bizDetails .categoriesLine")?,
            address: selector(r#".bizDetails meta[itemprop="address"]"#)?,
            phone: selector(r#".bizExtraDetails meta[itemprop="telephone"]"#)?,
            description: selector("div.prettyParagraph .bizDescriptionText")?,
            gallery: selector("div.tabcontent.styledBorder a.galleryPicWrapper img")?,
        })
    }

    /// Number of vendor cards on the page, phone or not.
    pub fn count_cards(&self, html: &str) -> usize {
        Html::parse_document(html).select(&self.card).count()
    }

    /// Cards on a listing page. Cards without a phone number are skipped.
    pub fn parse_listing(&self, html: &str) -> Vec<ListingCard> {
        let document = Html::parse_document(html);
        document
            .select(&self.card)
            .filter_map(|card| self.parse_card(card))
            .collect()
    }

    fn parse_card(&self, card: ElementRef<'_>) -> Option<ListingCard> {
        let phone = first_attr(card, &self.phone, "content")?;

        let address = first_attr(card, &self.address, "content")
            .map(|a| a.replacen(ADDRESS_SUFFIX, "", 1))
            .unwrap_or_default();

        let detail_href = card
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|link| link.value().attr("href"))
            .map(str::to_string);

        Some(ListingCard {
            name: text_of(card, &self.name),
            image_url: first_attr(card, &self.image, "src"),
            brief_description: text_of(card, &self.brief),
            address,
            phone,
            detail_href,
        })
    }

    pub fn parse_details(&self, html: &str) -> VendorDetails {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let gallery = root
            .select(&self.gallery)
            .filter_map(|img| img.value().attr("src"))
            .map(str::to_string)
            .collect();

        VendorDetails {
            description: text_of(root, &self.description),
            gallery,
        }
    }
}

fn selector(raw: &str) -> ScrapeResult<Selector> {
    Selector::parse(raw).map_err(|e| ScrapeError::Selector {
        selector: raw.to_string(),
        details: e.to_string(),
    })
}

/// Concatenated, trimmed text of every match.
fn text_of(scope: ElementRef<'_>, selector: &Selector) -> String {
    let text: String = scope.select(selector).flat_map(|e| e.text()).collect();
    text.trim().to_string()
}

fn first_attr(scope: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <a href="/biz/studio-or">
            <div class="bizLinkDiv">
              <div class="businessImageWrapper"><img src="https://cdn.example/or.jpg"></div>
              <div class="bizName"><h3> Studio Or </h3></div>
              <div class="bizDetails">
                <span class="categoriesLine">צילום חתונות</span>
                <meta itemprop="address" content="תל אביב, ישראל">
              </div>
              <div class="bizExtraDetails"><meta itemprop="telephone" content="050-1234567"></div>
            </div>
          </a>
          <a href="/biz/no-phone">
            <div class="bizLinkDiv">
              <div class="bizName"><h3>Silent Studio</h3></div>
            </div>
          </a>
          <a href="/biz/lens">
            <div class="bizLinkDiv">
              <div class="bizName"><h3>Lens</h3></div>
              <div class="bizDetails"><span class="categoriesLine">וידאו</span></div>
              <div class="bizExtraDetails"><meta itemprop="telephone" content="052-7654321"></div>
            </div>
          </a>
        </body></html>
    "#;

    const DETAILS: &str = r#"
        <html><body>
          <div class="prettyParagraph"><p class="bizDescriptionText">
            Twenty years behind the camera.
          </p></div>
          <div class="tabcontent styledBorder">
            <a class="galleryPicWrapper"><img src="/g/1.jpg"></a>
            <a class="galleryPicWrapper"><img src="/g/2.jpg"></a>
            <a class="other"><img src="/g/skip.jpg"></a>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_listing_skips_cards_without_phone() {
        let parser = VendorParser::new().unwrap();
        let cards = parser.parse_listing(LISTING);

        assert_eq!(parser.count_cards(LISTING), 3);
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c.name != "Silent Studio"));
    }

    #[test]
    fn test_parse_listing_extracts_card_fields() {
        let parser = VendorParser::new().unwrap();
        let cards = parser.parse_listing(LISTING);

        assert_eq!(
            cards[0],
            ListingCard {
                name: "Studio Or".into(),
                image_url: Some("https://cdn.example/or.jpg".into()),
                brief_description: "צילום חתונות".into(),
                address: "תל אביב".into(),
                phone: "050-1234567".into(),
                detail_href: Some("/biz/studio-or".into()),
            }
        );
        assert_eq!(cards[1].address, "");
        assert_eq!(cards[1].image_url, None);
    }

    #[test]
    fn test_empty_listing_page() {
        let parser = VendorParser::new().unwrap();
        let html = "<html><body><p>No results</p></body></html>";
        assert_eq!(parser.count_cards(html), 0);
        assert!(parser.parse_listing(html).is_empty());
    }

    #[test]
    fn test_parse_details() {
        let parser = VendorParser::new().unwrap();
        let details = parser.parse_details(DETAILS);

        assert_eq!(details.description, "Twenty years behind the camera.");
        assert_eq!(details.gallery, vec!["/g/1.jpg", "/g/2.jpg"]);
    }

    #[test]
    fn test_provider_json_shape() {
        let card = ListingCard {
            name: "Lens".into(),
            image_url: None,
            brief_description: "וידאו".into(),
            address: "חיפה".into(),
            phone: "052-7654321".into(),
            detail_href: None,
        };
        let value = serde_json::to_value(Provider::new(card, VendorDetails::default())).unwrap();

        assert_eq!(value["briefDescription"], "וידאו");
        assert_eq!(value["gallery"], serde_json::json!([]));
        assert!(value.get("imageUrl").is_none());
        assert!(value.get("detailHref").is_none());
    }
}
